//! Domain layer - Core business entities and logic
//!
//! This module contains the core domain models that represent
//! business concepts independent of infrastructure concerns.
//!
//! DDD: Domain layer has NO external dependencies (except error types).
//! Contains: Entities, Value Objects, Domain Services.

pub mod contact;
pub mod order;
pub mod password;
pub mod product;
pub mod user;
pub mod wishlist;

pub use contact::{ContactMessage, CreateContactMessage, UpdateContactMessage};
pub use order::{
    AdminOrderUpdate, CreateOrder, CreateOrderItem, CreateShippingAddress, NewOrderItem, Order,
    OrderCustomer, OrderItem, OrderListQuery, OrderResponse, OrderStatus, RefundRequest, Requester,
    ShippingAddress, TrackingUpdate,
};
pub use password::Password;
pub use product::{CreateProduct, Product, ProductQuery, ProductSort, UpdateProduct};
pub use user::{User, UserResponse, UserRole};
pub use wishlist::WishlistStatus;
