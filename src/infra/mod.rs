//! Infrastructure layer - External systems integration
//!
//! This module handles all external system concerns:
//! - Database connections and repositories
//! - Background job storage
//! - Unit of Work for transaction management

pub mod db;
pub mod repositories;
pub mod unit_of_work;

pub use db::Database;
pub use repositories::{
    ContactRepository, ContactStore, OrderRepository, OrderStore, PaymentMethodStat, ProductRepository,
    ProductStore, StatusCount, TopProduct, UserRepository, UserStore, WishlistRepository,
    WishlistStore,
};
pub use unit_of_work::{
    Persistence, TransactionContext, TxOrderRepository, TxProductRepository, UnitOfWork,
};

#[cfg(any(test, feature = "test-utils"))]
pub use repositories::{
    MockContactRepository, MockOrderRepository, MockProductRepository, MockUserRepository,
    MockWishlistRepository,
};
