//! SeaORM entity definitions
//!
//! These are database-specific entities separate from domain models.
//! Repositories map them into the domain types before anything outside
//! the infra layer sees them.

pub mod contact_message;
pub mod order;
pub mod order_item;
pub mod product;
pub mod shipping_address;
pub mod user;
pub mod wishlist_item;
