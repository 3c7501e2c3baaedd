//! Application state - Dependency injection container.
//!
//! Provides centralized access to all application services and infrastructure.

use std::sync::Arc;

use apalis_sql::postgres::PostgresStorage;

use crate::infra::Database;
use crate::jobs::EmailJob;
use crate::services::{
    AnalyticsService, AuthService, ContactService, OrderService, ProductService, ServiceContainer,
    Services, UserService, WishlistService,
};

/// Application state containing all services (DI container).
#[derive(Clone)]
pub struct AppState {
    /// Authentication service
    pub auth_service: Arc<dyn AuthService>,
    /// User service
    pub user_service: Arc<dyn UserService>,
    /// Product catalog service
    pub product_service: Arc<dyn ProductService>,
    /// Order lifecycle service
    pub order_service: Arc<dyn OrderService>,
    /// Wishlist service
    pub wishlist_service: Arc<dyn WishlistService>,
    /// Contact message service
    pub contact_service: Arc<dyn ContactService>,
    /// Analytics service
    pub analytics_service: Arc<dyn AnalyticsService>,
    /// Database connection
    pub database: Arc<Database>,
}

impl AppState {
    /// Create application state from database connection, job storage, and config.
    pub fn from_config(
        database: Arc<Database>,
        storage: PostgresStorage<EmailJob>,
        config: crate::config::Config,
    ) -> Self {
        let container = Services::from_connection(database.get_connection(), storage, config);

        Self {
            auth_service: container.auth(),
            user_service: container.users(),
            product_service: container.products(),
            order_service: container.orders(),
            wishlist_service: container.wishlists(),
            contact_service: container.contacts(),
            analytics_service: container.analytics(),
            database,
        }
    }
}
