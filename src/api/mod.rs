//! API layer - HTTP surface of the storefront
//!
//! This module contains all HTTP-related concerns:
//! - Request handlers for catalog, accounts, orders, wishlist, messages
//! - Bearer-auth middleware
//! - Validated JSON body extractor
//! - Route assembly and the OpenAPI document

pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod openapi;
pub mod routes;
pub mod state;

pub use openapi::ApiDoc;
pub use routes::create_router;
pub use state::AppState;
