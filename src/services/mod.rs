//! Application services layer - Use cases and business logic.
//!
//! Services orchestrate domain logic and infrastructure to fulfill
//! application use cases. They depend on abstractions (traits) for
//! dependency inversion.
//!
//! All services use Unit of Work pattern for centralized repository
//! access and transaction management.

mod analytics_service;
mod auth_service;
mod contact_service;
pub mod container;
mod mailer;
mod order_service;
mod product_service;
mod user_service;
mod wishlist_service;

// Service Container
pub use container::{ServiceContainer, Services};

// Service traits and implementations
pub use analytics_service::{
    AnalyticsManager, AnalyticsResponse, AnalyticsService, AnalyticsSummary,
};
pub use auth_service::{AuthService, Authenticator, Claims, TokenResponse};
pub use contact_service::{ContactManager, ContactService};
pub use mailer::{Mailer, QueueMailer};
pub use order_service::{OrderManager, OrderService};
pub use product_service::{ProductManager, ProductService};
pub use user_service::{UserManager, UserService};
pub use wishlist_service::{WishlistManager, WishlistService};

// Parallel execution utilities
pub use container::parallel;

#[cfg(any(test, feature = "test-utils"))]
pub use mailer::MockMailer;
