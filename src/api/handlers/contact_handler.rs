//! Contact message handlers.
//!
//! Submission is open to any authenticated user; triage is admin work.

use axum::{
    extract::{Extension, Path, Query, State},
    http::StatusCode,
    response::Json,
    routing::get,
    Router,
};
use serde::Deserialize;

use crate::api::extractors::ValidatedJson;
use crate::api::middleware::{require_admin, CurrentUser};
use crate::api::AppState;
use crate::domain::{ContactMessage, CreateContactMessage, UpdateContactMessage};
use crate::errors::AppResult;
use crate::types::{Paginated, PaginationParams};

/// Message list filters
#[derive(Debug, Deserialize)]
pub struct MessageListQuery {
    /// Matches message body, email, or subject (case-insensitive)
    pub search: Option<String>,
    /// Only messages awaiting triage
    pub unread: Option<bool>,
}

/// Create contact message routes
pub fn contact_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_messages).post(create_message))
        .route("/:id", get(get_message).patch(update_message))
}

/// Submit a contact message
#[utoipa::path(
    post,
    path = "/messages",
    tag = "Messages",
    security(("bearer_auth" = [])),
    request_body = CreateContactMessage,
    responses(
        (status = 201, description = "Message stored", body = ContactMessage),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn create_message(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<CreateContactMessage>,
) -> AppResult<(StatusCode, Json<ContactMessage>)> {
    let message = state
        .contact_service
        .create_message(current_user.id, &current_user.email, payload)
        .await?;

    Ok((StatusCode::CREATED, Json(message)))
}

/// List contact messages, newest first (admin only)
#[utoipa::path(
    get,
    path = "/messages",
    tag = "Messages",
    security(("bearer_auth" = [])),
    params(
        ("search" = Option<String>, Query, description = "Match on message, email, or subject"),
        ("unread" = Option<bool>, Query, description = "Only unread messages"),
        ("page" = Option<u64>, Query, description = "Page number"),
        ("page_size" = Option<u64>, Query, description = "Items per page")
    ),
    responses(
        (status = 200, description = "Paginated list of messages"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - Admin only")
    )
)]
pub async fn list_messages(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    Query(query): Query<MessageListQuery>,
    Query(pagination): Query<PaginationParams>,
) -> AppResult<Json<Paginated<ContactMessage>>> {
    require_admin(&current_user)?;

    let (messages, total) = state
        .contact_service
        .list_messages(query.search, query.unread, &pagination)
        .await?;

    Ok(Json(Paginated::new(
        messages,
        pagination.page,
        pagination.limit(),
        total,
    )))
}

/// Get a contact message by ID (admin only)
#[utoipa::path(
    get,
    path = "/messages/{id}",
    tag = "Messages",
    security(("bearer_auth" = [])),
    params(
        ("id" = i64, Path, description = "Message ID")
    ),
    responses(
        (status = 200, description = "Contact message", body = ContactMessage),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - Admin only"),
        (status = 404, description = "Message not found")
    )
)]
pub async fn get_message(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<ContactMessage>> {
    require_admin(&current_user)?;

    let message = state.contact_service.get_message(id).await?;
    Ok(Json(message))
}

/// Mark a message read and/or attach a reply (admin only)
#[utoipa::path(
    patch,
    path = "/messages/{id}",
    tag = "Messages",
    security(("bearer_auth" = [])),
    params(
        ("id" = i64, Path, description = "Message ID")
    ),
    request_body = UpdateContactMessage,
    responses(
        (status = 200, description = "Message updated", body = ContactMessage),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - Admin only"),
        (status = 404, description = "Message not found")
    )
)]
pub async fn update_message(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<UpdateContactMessage>,
) -> AppResult<Json<ContactMessage>> {
    require_admin(&current_user)?;

    let message = state.contact_service.update_message(id, payload).await?;
    Ok(Json(message))
}
