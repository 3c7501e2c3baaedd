//! Shared test doubles for service-level tests.
#![allow(dead_code)]

use std::sync::Arc;

use async_trait::async_trait;

use mamiglo_api::errors::{AppError, AppResult};
use mamiglo_api::infra::repositories::{
    MockContactRepository, MockOrderRepository, MockProductRepository, MockUserRepository,
    MockWishlistRepository,
};
use mamiglo_api::infra::{
    ContactRepository, OrderRepository, ProductRepository, TransactionContext, UnitOfWork,
    UserRepository, WishlistRepository,
};

/// Test mock for UnitOfWork that hands out pre-configured mock repositories.
///
/// Transactions are not supported here; lifecycle writes that need them
/// are covered by the domain transition tests and integration tests.
pub struct TestUnitOfWork {
    pub users: Arc<MockUserRepository>,
    pub products: Arc<MockProductRepository>,
    pub orders: Arc<MockOrderRepository>,
    pub wishlists: Arc<MockWishlistRepository>,
    pub contacts: Arc<MockContactRepository>,
}

impl Default for TestUnitOfWork {
    fn default() -> Self {
        Self {
            users: Arc::new(MockUserRepository::new()),
            products: Arc::new(MockProductRepository::new()),
            orders: Arc::new(MockOrderRepository::new()),
            wishlists: Arc::new(MockWishlistRepository::new()),
            contacts: Arc::new(MockContactRepository::new()),
        }
    }
}

impl TestUnitOfWork {
    /// Harness around a configured user repository mock
    pub fn with_users(repo: MockUserRepository) -> Self {
        Self {
            users: Arc::new(repo),
            ..Default::default()
        }
    }

    /// Harness around a configured order repository mock
    pub fn with_orders(repo: MockOrderRepository) -> Self {
        Self {
            orders: Arc::new(repo),
            ..Default::default()
        }
    }
}

#[async_trait]
impl UnitOfWork for TestUnitOfWork {
    fn users(&self) -> Arc<dyn UserRepository> {
        self.users.clone()
    }

    fn products(&self) -> Arc<dyn ProductRepository> {
        self.products.clone()
    }

    fn orders(&self) -> Arc<dyn OrderRepository> {
        self.orders.clone()
    }

    fn wishlists(&self) -> Arc<dyn WishlistRepository> {
        self.wishlists.clone()
    }

    fn contacts(&self) -> Arc<dyn ContactRepository> {
        self.contacts.clone()
    }

    async fn transaction<F, T>(&self, _f: F) -> AppResult<T>
    where
        F: for<'a> FnOnce(TransactionContext<'a>) -> std::pin::Pin<
                Box<dyn std::future::Future<Output = AppResult<T>> + Send + 'a>,
            > + Send,
        T: Send,
    {
        // Transaction not supported in test mock
        Err(AppError::internal("Transactions not supported in test mock"))
    }

    async fn transaction_serializable<F, T>(&self, _f: F) -> AppResult<T>
    where
        F: for<'a> FnOnce(TransactionContext<'a>) -> std::pin::Pin<
                Box<dyn std::future::Future<Output = AppResult<T>> + Send + 'a>,
            > + Send,
        T: Send,
    {
        // Transaction not supported in test mock
        Err(AppError::internal("Transactions not supported in test mock"))
    }
}
