//! Admin analytics handler.

use axum::{
    extract::{Extension, State},
    response::Json,
    routing::get,
    Router,
};

use crate::api::middleware::{require_admin, CurrentUser};
use crate::api::AppState;
use crate::errors::AppResult;
use crate::services::AnalyticsResponse;

/// Create analytics routes
pub fn analytics_routes() -> Router<AppState> {
    Router::new().route("/", get(dashboard))
}

/// Store-wide sales and customer metrics (admin only)
#[utoipa::path(
    get,
    path = "/analytics",
    tag = "Analytics",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Dashboard metrics", body = AnalyticsResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - Admin only")
    )
)]
pub async fn dashboard(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
) -> AppResult<Json<AnalyticsResponse>> {
    require_admin(&current_user)?;

    let dashboard = state.analytics_service.dashboard().await?;
    Ok(Json(dashboard))
}
