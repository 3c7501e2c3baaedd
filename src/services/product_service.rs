//! Product service - Catalog browsing and admin catalog maintenance.
//!
//! SOLID (SRP): Handles catalog use cases only.
//! DDD: Orchestrates domain operations via Unit of Work.

use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::{CreateProduct, Product, ProductQuery, UpdateProduct};
use crate::errors::{AppError, AppResult};
use crate::infra::UnitOfWork;
use crate::types::PaginationParams;

/// Product service trait for dependency injection
#[async_trait]
pub trait ProductService: Send + Sync {
    /// Search the catalog with filters, sorting, and pagination
    async fn search_products(
        &self,
        query: &ProductQuery,
        pagination: &PaginationParams,
    ) -> AppResult<(Vec<Product>, u64)>;

    /// Get product by ID
    async fn get_product(&self, id: i64) -> AppResult<Product>;

    /// Create a catalog entry
    async fn create_product(&self, created_by: Uuid, data: CreateProduct) -> AppResult<Product>;

    /// Partially update a catalog entry
    async fn update_product(&self, id: i64, data: UpdateProduct) -> AppResult<Product>;

    /// Remove a catalog entry; past order lines keep their snapshot
    async fn delete_product(&self, id: i64) -> AppResult<()>;
}

/// Concrete implementation of ProductService using Unit of Work.
pub struct ProductManager<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> ProductManager<U> {
    /// Create new product service instance with Unit of Work
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }
}

#[async_trait]
impl<U: UnitOfWork> ProductService for ProductManager<U> {
    async fn search_products(
        &self,
        query: &ProductQuery,
        pagination: &PaginationParams,
    ) -> AppResult<(Vec<Product>, u64)> {
        self.uow.products().search(query, pagination).await
    }

    async fn get_product(&self, id: i64) -> AppResult<Product> {
        self.uow
            .products()
            .find_by_id(id)
            .await?
            .ok_or(AppError::NotFound)
    }

    async fn create_product(&self, created_by: Uuid, data: CreateProduct) -> AppResult<Product> {
        self.uow.products().create(created_by, data).await
    }

    async fn update_product(&self, id: i64, data: UpdateProduct) -> AppResult<Product> {
        self.uow.products().update(id, data).await
    }

    async fn delete_product(&self, id: i64) -> AppResult<()> {
        self.uow.products().delete(id).await
    }
}
