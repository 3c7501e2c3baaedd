//! HTTP request handlers.

pub mod analytics_handler;
pub mod auth_handler;
pub mod contact_handler;
pub mod order_handler;
pub mod product_handler;
pub mod user_handler;
pub mod wishlist_handler;

pub use analytics_handler::analytics_routes;
pub use auth_handler::auth_routes;
pub use contact_handler::contact_routes;
pub use order_handler::order_routes;
pub use product_handler::{product_admin_routes, product_routes};
pub use user_handler::user_routes;
pub use wishlist_handler::wishlist_routes;
