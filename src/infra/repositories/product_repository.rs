//! Product repository - catalog queries and admin CRUD.

use async_trait::async_trait;
use chrono::Utc;
#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;
use rust_decimal::Decimal;
use sea_orm::sea_query::extension::postgres::PgExpr;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ColumnTrait, Condition, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set,
};
use uuid::Uuid;

use super::base::{ReadRepository, WriteRepository};
use super::entities::product::{self, ActiveModel, Entity as ProductEntity, Model as ProductModel};
use crate::config::{DEFAULT_PRICE_CURRENCY, DEFAULT_PRODUCT_IMAGE};
use crate::domain::{CreateProduct, Product, ProductQuery, ProductSort, UpdateProduct};
use crate::errors::{AppError, AppResult};
use crate::types::PaginationParams;

/// Product repository trait for dependency injection
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait ProductRepository: Send + Sync {
    async fn find_by_id(&self, id: i64) -> AppResult<Option<Product>>;

    /// Filtered, sorted catalog listing
    async fn search(
        &self,
        query: &ProductQuery,
        pagination: &PaginationParams,
    ) -> AppResult<(Vec<Product>, u64)>;

    async fn create(&self, created_by: Uuid, data: CreateProduct) -> AppResult<Product>;

    async fn update(&self, id: i64, data: UpdateProduct) -> AppResult<Product>;

    async fn delete(&self, id: i64) -> AppResult<()>;

    async fn count(&self) -> AppResult<u64>;
}

/// SeaORM-backed product repository
pub struct ProductStore {
    db: DatabaseConnection,
}

impl ProductStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

impl ReadRepository<ProductEntity, ProductModel> for ProductStore {
    fn db(&self) -> &DatabaseConnection {
        &self.db
    }
}

impl WriteRepository<ProductEntity, ProductModel, ActiveModel> for ProductStore {
    fn db(&self) -> &DatabaseConnection {
        &self.db
    }
}

#[async_trait]
impl ProductRepository for ProductStore {
    async fn find_by_id(&self, id: i64) -> AppResult<Option<Product>> {
        let model = ReadRepository::find_by_id(self, id).await?;
        Ok(model.map(Product::from))
    }

    async fn search(
        &self,
        query: &ProductQuery,
        pagination: &PaginationParams,
    ) -> AppResult<(Vec<Product>, u64)> {
        let mut select = ProductEntity::find();

        if let Some(term) = query.search.as_deref().filter(|t| !t.is_empty()) {
            let pattern = format!("%{term}%");
            select = select.filter(
                Condition::any()
                    .add(Expr::col(product::Column::Name).ilike(pattern.as_str()))
                    .add(Expr::col(product::Column::Brand).ilike(pattern.as_str()))
                    .add(Expr::col(product::Column::Category).ilike(pattern.as_str())),
            );
        }
        if let Some(category) = query.category.as_deref().filter(|c| !c.is_empty()) {
            select = select.filter(Expr::col(product::Column::Category).ilike(category));
        }
        if let Some(min) = query.min_price {
            select = select.filter(product::Column::Price.gte(min));
        }
        if let Some(max) = query.max_price {
            select = select.filter(product::Column::Price.lte(max));
        }
        if let Some(rating) = query.min_rating {
            select = select.filter(product::Column::Rating.gte(rating));
        }
        if query.in_stock == Some(true) {
            select = select.filter(product::Column::CountInStock.gt(0));
        }

        let select = match query.sort_by {
            Some(ProductSort::PriceAsc) => select.order_by_asc(product::Column::Price),
            Some(ProductSort::PriceDesc) => select.order_by_desc(product::Column::Price),
            Some(ProductSort::Rating) => select.order_by_desc(product::Column::Rating),
            Some(ProductSort::Newest) | None => select.order_by_desc(product::Column::CreatedAt),
        };

        let paginator = select.paginate(&self.db, pagination.limit());
        let total = paginator.num_items().await?;
        let models = paginator
            .fetch_page(pagination.page.saturating_sub(1))
            .await?;

        Ok((models.into_iter().map(Product::from).collect(), total))
    }

    async fn create(&self, created_by: Uuid, data: CreateProduct) -> AppResult<Product> {
        let image = data
            .image
            .filter(|i| !i.is_empty())
            .unwrap_or_else(|| DEFAULT_PRODUCT_IMAGE.to_string());
        let currency = data
            .price_currency
            .filter(|c| !c.is_empty())
            .unwrap_or_else(|| DEFAULT_PRICE_CURRENCY.to_string());

        let active = ActiveModel {
            user_id: Set(Some(created_by)),
            name: Set(data.name),
            image: Set(Some(image)),
            brand: Set(data.brand),
            category: Set(data.category),
            description: Set(data.description),
            rating: Set(Decimal::ZERO),
            num_reviews: Set(0),
            price: Set(data.price),
            price_currency: Set(currency),
            count_in_stock: Set(data.count_in_stock),
            created_at: Set(Utc::now()),
            ..Default::default()
        };

        let model = WriteRepository::insert(self, active).await?;
        Ok(Product::from(model))
    }

    async fn update(&self, id: i64, data: UpdateProduct) -> AppResult<Product> {
        let model = ReadRepository::find_by_id(self, id)
            .await?
            .ok_or(AppError::NotFound)?;

        let mut active: ActiveModel = model.into();
        if let Some(name) = data.name {
            active.name = Set(name);
        }
        if let Some(image) = data.image {
            active.image = Set(Some(image));
        }
        if let Some(brand) = data.brand {
            active.brand = Set(Some(brand));
        }
        if let Some(category) = data.category {
            active.category = Set(Some(category));
        }
        if let Some(description) = data.description {
            active.description = Set(Some(description));
        }
        if let Some(price) = data.price {
            active.price = Set(price);
        }
        if let Some(currency) = data.price_currency {
            active.price_currency = Set(currency);
        }
        if let Some(count) = data.count_in_stock {
            active.count_in_stock = Set(count);
        }

        let model = WriteRepository::update(self, active).await?;
        Ok(Product::from(model))
    }

    async fn delete(&self, id: i64) -> AppResult<()> {
        let result = ProductEntity::delete_by_id(id).exec(&self.db).await?;
        if result.rows_affected == 0 {
            return Err(AppError::NotFound);
        }
        Ok(())
    }

    async fn count(&self) -> AppResult<u64> {
        ReadRepository::count(self).await
    }
}
