//! Repository layer - Data access abstraction
//!
//! Repositories provide an abstraction over data persistence,
//! following the Repository pattern for clean separation of concerns.

mod base;
mod contact_repository;
pub(crate) mod entities;
mod order_repository;
mod product_repository;
mod user_repository;
mod wishlist_repository;

pub use base::{ReadRepository, WriteRepository};
pub use contact_repository::{ContactRepository, ContactStore};
pub use order_repository::{
    OrderRepository, OrderStore, PaymentMethodStat, StatusCount, TopProduct,
};
pub(crate) use order_repository::{assemble_order, hydrate_order, hydrate_orders};
pub use product_repository::{ProductRepository, ProductStore};
pub use user_repository::{UserRepository, UserStore};
pub use wishlist_repository::{WishlistRepository, WishlistStore};

// Export mocks for tests (both unit and integration)
#[cfg(any(test, feature = "test-utils"))]
pub use contact_repository::MockContactRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use order_repository::MockOrderRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use product_repository::MockProductRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use user_repository::MockUserRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use wishlist_repository::MockWishlistRepository;
