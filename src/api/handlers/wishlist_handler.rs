//! Wishlist handlers.
//!
//! Membership is keyed on (user, product); adding twice is a no-op.

use axum::{
    extract::{Extension, Path, State},
    http::StatusCode,
    response::Json,
    routing::get,
    Router,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::api::middleware::CurrentUser;
use crate::api::AppState;
use crate::domain::{Product, WishlistStatus};
use crate::errors::AppResult;

/// Add/remove payload
#[derive(Debug, Deserialize, ToSchema)]
pub struct WishlistItemRequest {
    /// Catalog product ID
    #[schema(example = 42)]
    pub product_id: i64,
}

/// Wishlist contents
#[derive(Debug, Serialize, ToSchema)]
pub struct WishlistResponse {
    pub count: usize,
    pub items: Vec<Product>,
}

/// Add/remove confirmation
#[derive(Debug, Serialize, ToSchema)]
pub struct WishlistActionResponse {
    #[schema(example = "Silk Scarf added to wishlist")]
    pub detail: String,
    pub product_id: i64,
}

/// Create wishlist routes
pub fn wishlist_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_wishlist).post(add_to_wishlist).delete(remove_from_wishlist))
        .route("/check/:product_id", get(check_wishlist))
}

/// Get the caller's wishlist
#[utoipa::path(
    get,
    path = "/wishlist",
    tag = "Wishlist",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Wishlist products with count", body = WishlistResponse),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn list_wishlist(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
) -> AppResult<Json<WishlistResponse>> {
    let items = state.wishlist_service.list_wishlist(current_user.id).await?;

    Ok(Json(WishlistResponse {
        count: items.len(),
        items,
    }))
}

/// Add a product to the caller's wishlist
#[utoipa::path(
    post,
    path = "/wishlist",
    tag = "Wishlist",
    security(("bearer_auth" = [])),
    request_body = WishlistItemRequest,
    responses(
        (status = 201, description = "Product added", body = WishlistActionResponse),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Product not found")
    )
)]
pub async fn add_to_wishlist(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    Json(payload): Json<WishlistItemRequest>,
) -> AppResult<(StatusCode, Json<WishlistActionResponse>)> {
    let product = state
        .wishlist_service
        .add_to_wishlist(current_user.id, payload.product_id)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(WishlistActionResponse {
            detail: format!("{} added to wishlist", product.name),
            product_id: product.id,
        }),
    ))
}

/// Remove a product from the caller's wishlist
#[utoipa::path(
    delete,
    path = "/wishlist",
    tag = "Wishlist",
    security(("bearer_auth" = [])),
    request_body = WishlistItemRequest,
    responses(
        (status = 200, description = "Product removed", body = WishlistActionResponse),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Product not found")
    )
)]
pub async fn remove_from_wishlist(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    Json(payload): Json<WishlistItemRequest>,
) -> AppResult<Json<WishlistActionResponse>> {
    let product = state
        .wishlist_service
        .remove_from_wishlist(current_user.id, payload.product_id)
        .await?;

    Ok(Json(WishlistActionResponse {
        detail: format!("{} removed from wishlist", product.name),
        product_id: product.id,
    }))
}

/// Check whether a product is on the caller's wishlist
#[utoipa::path(
    get,
    path = "/wishlist/check/{product_id}",
    tag = "Wishlist",
    security(("bearer_auth" = [])),
    params(
        ("product_id" = i64, Path, description = "Product ID")
    ),
    responses(
        (status = 200, description = "Membership status", body = WishlistStatus),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn check_wishlist(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    Path(product_id): Path<i64>,
) -> AppResult<Json<WishlistStatus>> {
    let in_wishlist = state
        .wishlist_service
        .is_wishlisted(current_user.id, product_id)
        .await?;

    Ok(Json(WishlistStatus { in_wishlist }))
}
