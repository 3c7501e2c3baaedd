//! Service Container - Centralized service access with parallel execution support.
//!
//! SOLID (SRP): Manages service lifecycle and access.
//! SOLID (DIP): Depends on service traits, not implementations.
//!
//! Features:
//! - Centralized access to all application services
//! - Thread-safe concurrent access via Arc
//! - Parallel execution utilities for independent operations
//! - Compatible with async/await and tokio runtime

use std::future::Future;
use std::sync::Arc;

use apalis_sql::postgres::PostgresStorage;

use super::mailer::{Mailer, QueueMailer};
use super::{
    AnalyticsService, AuthService, ContactService, OrderService, ProductService, UserService,
    WishlistService,
};
use crate::config::Config;
use crate::errors::AppResult;
use crate::infra::Persistence;
use crate::jobs::EmailJob;

/// Service container trait for dependency injection.
///
/// Provides centralized access to all application services.
pub trait ServiceContainer: Send + Sync {
    /// Get authentication service
    fn auth(&self) -> Arc<dyn AuthService>;

    /// Get user service
    fn users(&self) -> Arc<dyn UserService>;

    /// Get product catalog service
    fn products(&self) -> Arc<dyn ProductService>;

    /// Get order lifecycle service
    fn orders(&self) -> Arc<dyn OrderService>;

    /// Get wishlist service
    fn wishlists(&self) -> Arc<dyn WishlistService>;

    /// Get contact message service
    fn contacts(&self) -> Arc<dyn ContactService>;

    /// Get analytics service
    fn analytics(&self) -> Arc<dyn AnalyticsService>;
}

/// Concrete implementation of ServiceContainer
pub struct Services {
    auth_service: Arc<dyn AuthService>,
    user_service: Arc<dyn UserService>,
    product_service: Arc<dyn ProductService>,
    order_service: Arc<dyn OrderService>,
    wishlist_service: Arc<dyn WishlistService>,
    contact_service: Arc<dyn ContactService>,
    analytics_service: Arc<dyn AnalyticsService>,
}

impl Services {
    /// Create service container from a database connection, job storage, and config
    pub fn from_connection(
        db: sea_orm::DatabaseConnection,
        storage: PostgresStorage<EmailJob>,
        config: Config,
    ) -> Self {
        use super::{
            AnalyticsManager, Authenticator, ContactManager, OrderManager, ProductManager,
            UserManager, WishlistManager,
        };

        let uow = Arc::new(Persistence::new(db));
        let mailer: Arc<dyn Mailer> = Arc::new(QueueMailer::new(storage));
        let mail = config.mail.clone();

        let auth_service = Arc::new(Authenticator::new(uow.clone(), config));
        let user_service = Arc::new(UserManager::new(uow.clone()));
        let product_service = Arc::new(ProductManager::new(uow.clone()));
        let order_service = Arc::new(OrderManager::new(uow.clone(), mailer.clone(), mail.clone()));
        let wishlist_service = Arc::new(WishlistManager::new(uow.clone()));
        let contact_service = Arc::new(ContactManager::new(uow.clone(), mailer, mail));
        let analytics_service = Arc::new(AnalyticsManager::new(uow));

        Self {
            auth_service,
            user_service,
            product_service,
            order_service,
            wishlist_service,
            contact_service,
            analytics_service,
        }
    }
}

impl ServiceContainer for Services {
    fn auth(&self) -> Arc<dyn AuthService> {
        self.auth_service.clone()
    }

    fn users(&self) -> Arc<dyn UserService> {
        self.user_service.clone()
    }

    fn products(&self) -> Arc<dyn ProductService> {
        self.product_service.clone()
    }

    fn orders(&self) -> Arc<dyn OrderService> {
        self.order_service.clone()
    }

    fn wishlists(&self) -> Arc<dyn WishlistService> {
        self.wishlist_service.clone()
    }

    fn contacts(&self) -> Arc<dyn ContactService> {
        self.contact_service.clone()
    }

    fn analytics(&self) -> Arc<dyn AnalyticsService> {
        self.analytics_service.clone()
    }
}

/// Parallel execution utilities for running independent operations concurrently.
///
/// These functions leverage tokio's async runtime to execute multiple
/// independent operations in parallel, improving throughput.
pub mod parallel {
    use super::*;
    use tokio::try_join;

    /// Execute two independent async operations in parallel.
    ///
    /// Both operations run concurrently and the function returns when both complete.
    /// If either operation fails, the error is returned immediately.
    ///
    /// # Example
    /// ```ignore
    /// let (orders, revenue) = parallel::join2(
    ///     repo.count(),
    ///     repo.revenue_paid(None),
    /// ).await?;
    /// ```
    pub async fn join2<F1, F2, T1, T2>(f1: F1, f2: F2) -> AppResult<(T1, T2)>
    where
        F1: Future<Output = AppResult<T1>>,
        F2: Future<Output = AppResult<T2>>,
    {
        try_join!(f1, f2)
    }

    /// Execute three independent async operations in parallel.
    pub async fn join3<F1, F2, F3, T1, T2, T3>(f1: F1, f2: F2, f3: F3) -> AppResult<(T1, T2, T3)>
    where
        F1: Future<Output = AppResult<T1>>,
        F2: Future<Output = AppResult<T2>>,
        F3: Future<Output = AppResult<T3>>,
    {
        try_join!(f1, f2, f3)
    }

    /// Execute four independent async operations in parallel.
    pub async fn join4<F1, F2, F3, F4, T1, T2, T3, T4>(
        f1: F1,
        f2: F2,
        f3: F3,
        f4: F4,
    ) -> AppResult<(T1, T2, T3, T4)>
    where
        F1: Future<Output = AppResult<T1>>,
        F2: Future<Output = AppResult<T2>>,
        F3: Future<Output = AppResult<T3>>,
        F4: Future<Output = AppResult<T4>>,
    {
        try_join!(f1, f2, f3, f4)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::AppError;

    #[tokio::test]
    async fn test_parallel_join2() {
        async fn op1() -> AppResult<i32> {
            Ok(1)
        }
        async fn op2() -> AppResult<i32> {
            Ok(2)
        }

        let (a, b) = parallel::join2(op1(), op2()).await.unwrap();
        assert_eq!(a, 1);
        assert_eq!(b, 2);
    }

    #[tokio::test]
    async fn test_parallel_join4() {
        async fn op(n: i32) -> AppResult<i32> {
            Ok(n)
        }

        let (a, b, c, d) = parallel::join4(op(1), op(2), op(3), op(4)).await.unwrap();
        assert_eq!((a, b, c, d), (1, 2, 3, 4));
    }

    #[tokio::test]
    async fn test_parallel_join_propagates_error() {
        async fn ok_op() -> AppResult<i32> {
            Ok(1)
        }
        async fn failing_op() -> AppResult<i32> {
            Err(AppError::NotFound)
        }

        let result = parallel::join3(ok_op(), failing_op(), ok_op()).await;
        assert!(matches!(result, Err(AppError::NotFound)));
    }
}
