//! Wishlist repository.

use async_trait::async_trait;
use chrono::Utc;
#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;
use sea_orm::sea_query::OnConflict;
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

use super::entities::wishlist_item::{self, ActiveModel, Entity as WishlistItemEntity};
use super::entities::product;
use crate::domain::Product;
use crate::errors::AppResult;

/// Wishlist repository trait for dependency injection
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait WishlistRepository: Send + Sync {
    /// Products the user has saved, most recently added first
    async fn products_for_user(&self, user_id: Uuid) -> AppResult<Vec<Product>>;

    /// Add a product to the user's wishlist. Adding twice is a no-op.
    async fn add(&self, user_id: Uuid, product_id: i64) -> AppResult<()>;

    /// Remove a product from the user's wishlist. Removing an absent entry is a no-op.
    async fn remove(&self, user_id: Uuid, product_id: i64) -> AppResult<()>;

    async fn contains(&self, user_id: Uuid, product_id: i64) -> AppResult<bool>;
}

/// SeaORM-backed wishlist repository
pub struct WishlistStore {
    db: DatabaseConnection,
}

impl WishlistStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl WishlistRepository for WishlistStore {
    async fn products_for_user(&self, user_id: Uuid) -> AppResult<Vec<Product>> {
        let rows = WishlistItemEntity::find()
            .filter(wishlist_item::Column::UserId.eq(user_id))
            .find_also_related(product::Entity)
            .order_by_desc(wishlist_item::Column::CreatedAt)
            .all(&self.db)
            .await?;

        Ok(rows
            .into_iter()
            .filter_map(|(_, product)| product.map(Product::from))
            .collect())
    }

    async fn add(&self, user_id: Uuid, product_id: i64) -> AppResult<()> {
        let active = ActiveModel {
            user_id: Set(user_id),
            product_id: Set(product_id),
            created_at: Set(Utc::now()),
            ..Default::default()
        };

        // DO NOTHING on the (user_id, product_id) unique index keeps adds idempotent.
        WishlistItemEntity::insert(active)
            .on_conflict(
                OnConflict::columns([
                    wishlist_item::Column::UserId,
                    wishlist_item::Column::ProductId,
                ])
                .do_nothing()
                .to_owned(),
            )
            .exec_without_returning(&self.db)
            .await?;

        Ok(())
    }

    async fn remove(&self, user_id: Uuid, product_id: i64) -> AppResult<()> {
        WishlistItemEntity::delete_many()
            .filter(wishlist_item::Column::UserId.eq(user_id))
            .filter(wishlist_item::Column::ProductId.eq(product_id))
            .exec(&self.db)
            .await?;

        Ok(())
    }

    async fn contains(&self, user_id: Uuid, product_id: i64) -> AppResult<bool> {
        let count = WishlistItemEntity::find()
            .filter(wishlist_item::Column::UserId.eq(user_id))
            .filter(wishlist_item::Column::ProductId.eq(product_id))
            .count(&self.db)
            .await?;

        Ok(count > 0)
    }
}
