//! Wishlist service - Private product bookmarks per user.
//!
//! SOLID (SRP): Handles wishlist use cases only.
//! DDD: Orchestrates domain operations via Unit of Work.

use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::Product;
use crate::errors::{AppError, AppResult};
use crate::infra::UnitOfWork;

/// Wishlist service trait for dependency injection.
///
/// Add and remove return the affected product so handlers can echo its
/// name back to the client.
#[async_trait]
pub trait WishlistService: Send + Sync {
    /// The caller's wishlisted products, newest first
    async fn list_wishlist(&self, user_id: Uuid) -> AppResult<Vec<Product>>;

    /// Add a product; adding one already present is a no-op
    async fn add_to_wishlist(&self, user_id: Uuid, product_id: i64) -> AppResult<Product>;

    /// Remove a product; removing one not present is a no-op
    async fn remove_from_wishlist(&self, user_id: Uuid, product_id: i64) -> AppResult<Product>;

    /// Whether the product is on the caller's wishlist
    async fn is_wishlisted(&self, user_id: Uuid, product_id: i64) -> AppResult<bool>;
}

/// Concrete implementation of WishlistService using Unit of Work.
pub struct WishlistManager<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> WishlistManager<U> {
    /// Create new wishlist service instance with Unit of Work
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }

    async fn require_product(&self, product_id: i64) -> AppResult<Product> {
        self.uow
            .products()
            .find_by_id(product_id)
            .await?
            .ok_or(AppError::NotFound)
    }
}

#[async_trait]
impl<U: UnitOfWork> WishlistService for WishlistManager<U> {
    async fn list_wishlist(&self, user_id: Uuid) -> AppResult<Vec<Product>> {
        self.uow.wishlists().products_for_user(user_id).await
    }

    async fn add_to_wishlist(&self, user_id: Uuid, product_id: i64) -> AppResult<Product> {
        let product = self.require_product(product_id).await?;
        self.uow.wishlists().add(user_id, product_id).await?;
        Ok(product)
    }

    async fn remove_from_wishlist(&self, user_id: Uuid, product_id: i64) -> AppResult<Product> {
        let product = self.require_product(product_id).await?;
        self.uow.wishlists().remove(user_id, product_id).await?;
        Ok(product)
    }

    async fn is_wishlisted(&self, user_id: Uuid, product_id: i64) -> AppResult<bool> {
        self.uow.wishlists().contains(user_id, product_id).await
    }
}
