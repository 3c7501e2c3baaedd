//! Product catalog entity and query types.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

/// Catalog entry. Orders snapshot name/price/image at purchase time,
/// so edits here never rewrite order history.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct Product {
    pub id: i64,
    /// Admin account that created the entry
    pub user_id: Option<Uuid>,
    pub name: String,
    pub image: Option<String>,
    pub brand: Option<String>,
    pub category: Option<String>,
    pub description: Option<String>,
    pub rating: Decimal,
    pub num_reviews: i32,
    pub price: Decimal,
    /// ISO 4217 code, e.g. "USD" or "NGN"
    pub price_currency: String,
    pub count_in_stock: i32,
    pub created_at: DateTime<Utc>,
}

/// Product creation payload (admin)
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateProduct {
    #[validate(length(min = 1, message = "Name is required"))]
    #[schema(example = "Silk Scarf")]
    pub name: String,
    pub image: Option<String>,
    pub brand: Option<String>,
    pub category: Option<String>,
    pub description: Option<String>,
    pub price: Decimal,
    /// Defaults to "USD" when omitted
    pub price_currency: Option<String>,
    #[serde(default)]
    pub count_in_stock: i32,
}

/// Product update payload (admin); absent fields are untouched
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateProduct {
    #[validate(length(min = 1, message = "Name cannot be empty"))]
    pub name: Option<String>,
    pub image: Option<String>,
    pub brand: Option<String>,
    pub category: Option<String>,
    pub description: Option<String>,
    pub price: Option<Decimal>,
    pub price_currency: Option<String>,
    pub count_in_stock: Option<i32>,
}

/// Catalog sort options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ProductSort {
    PriceAsc,
    PriceDesc,
    Rating,
    Newest,
}

/// Catalog search and filter parameters
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProductQuery {
    /// Matches name, brand, or category (case-insensitive)
    pub search: Option<String>,
    /// Exact category match (case-insensitive)
    pub category: Option<String>,
    pub min_price: Option<Decimal>,
    pub max_price: Option<Decimal>,
    /// Minimum rating, inclusive
    pub min_rating: Option<Decimal>,
    /// Only products with stock remaining
    pub in_stock: Option<bool>,
    #[serde(rename = "sort")]
    pub sort_by: Option<ProductSort>,
}
