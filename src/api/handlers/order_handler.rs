//! Order lifecycle handlers.
//!
//! Checkout, payment confirmation (card and bank transfer), fulfillment
//! tracking, refunds, invoices, and admin maintenance.

use axum::{
    extract::{Extension, Path, Query, State},
    http::StatusCode,
    response::Json,
    routing::{get, post, put},
    Router,
};
use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use crate::api::extractors::ValidatedJson;
use crate::api::middleware::{require_admin, CurrentUser};
use crate::api::AppState;
use crate::domain::{
    AdminOrderUpdate, CreateOrder, Order, OrderCustomer, OrderListQuery, OrderResponse,
    OrderStatus, RefundRequest, Requester, TrackingUpdate,
};
use crate::errors::AppResult;
use crate::types::{Paginated, PaginationParams};
use crate::utils::invoice::InvoiceDocument;

/// Lifecycle operation result: a human-readable detail plus the updated order
#[derive(Debug, Serialize, ToSchema)]
pub struct OrderActionResponse {
    #[schema(example = "Transfer confirmed. Awaiting admin verification.")]
    pub detail: String,
    pub order: OrderResponse,
}

impl OrderActionResponse {
    fn new(detail: &str, order: Order) -> Self {
        Self {
            detail: detail.to_string(),
            order: OrderResponse::from(order),
        }
    }
}

/// Fulfillment subset of an order
#[derive(Debug, Serialize, ToSchema)]
pub struct TrackingResponse {
    pub id: i64,
    pub status: OrderStatus,
    pub tracking_number: Option<String>,
    pub estimated_delivery: Option<NaiveDate>,
    pub is_delivered: bool,
    pub delivered_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl From<Order> for TrackingResponse {
    fn from(order: Order) -> Self {
        Self {
            id: order.id,
            status: order.status,
            tracking_number: order.tracking_number,
            estimated_delivery: order.estimated_delivery,
            is_delivered: order.is_delivered,
            delivered_at: order.delivered_at,
            created_at: order.created_at,
        }
    }
}

/// Served when a PDF invoice is requested; rendering happens client side
#[derive(Debug, Serialize, ToSchema)]
pub struct InvoicePdfFallback {
    pub message: String,
    pub invoice_html: String,
    pub fallback: bool,
}

/// Create order routes
pub fn order_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(place_order).get(list_orders))
        .route("/my", get(my_orders))
        .route(
            "/:id",
            get(get_order).put(admin_update_order).delete(delete_order),
        )
        .route("/:id/pay", put(pay_order))
        .route("/:id/confirm-transfer", post(confirm_transfer))
        .route("/:id/approve-transfer", post(approve_transfer))
        .route("/:id/tracking", get(get_tracking).put(update_tracking))
        .route("/:id/refund", post(refund_order))
        .route("/:id/invoice", get(get_invoice))
        .route("/:id/invoice/pdf", get(get_invoice_pdf))
}

/// Place a new order
#[utoipa::path(
    post,
    path = "/orders",
    tag = "Orders",
    security(("bearer_auth" = [])),
    request_body = CreateOrder,
    responses(
        (status = 201, description = "Order placed successfully", body = OrderResponse),
        (status = 400, description = "Validation error or empty item list"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Product not found")
    )
)]
pub async fn place_order(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<CreateOrder>,
) -> AppResult<(StatusCode, Json<OrderResponse>)> {
    let customer = OrderCustomer {
        id: current_user.id,
        name: current_user.name.clone(),
        email: current_user.email.clone(),
    };

    let order = state.order_service.place_order(customer, payload).await?;

    Ok((StatusCode::CREATED, Json(OrderResponse::from(order))))
}

/// List all orders (admin only)
#[utoipa::path(
    get,
    path = "/orders",
    tag = "Orders",
    security(("bearer_auth" = [])),
    params(
        ("search" = Option<String>, Query, description = "Match on buyer email/name or order id"),
        ("paid" = Option<bool>, Query, description = "Filter by payment status"),
        ("page" = Option<u64>, Query, description = "Page number"),
        ("page_size" = Option<u64>, Query, description = "Items per page")
    ),
    responses(
        (status = 200, description = "Paginated list of orders"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - Admin only")
    )
)]
pub async fn list_orders(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    Query(filter): Query<OrderListQuery>,
    Query(pagination): Query<PaginationParams>,
) -> AppResult<Json<Paginated<OrderResponse>>> {
    require_admin(&current_user)?;

    let (orders, total) = state.order_service.list_orders(&filter, &pagination).await?;

    Ok(Json(Paginated::new(
        orders.into_iter().map(OrderResponse::from).collect(),
        pagination.page,
        pagination.limit(),
        total,
    )))
}

/// List the caller's orders, newest first
#[utoipa::path(
    get,
    path = "/orders/my",
    tag = "Orders",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "The caller's orders", body = Vec<OrderResponse>),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn my_orders(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
) -> AppResult<Json<Vec<OrderResponse>>> {
    let orders = state.order_service.my_orders(current_user.id).await?;
    Ok(Json(orders.into_iter().map(OrderResponse::from).collect()))
}

/// Get order by ID (owner or admin)
#[utoipa::path(
    get,
    path = "/orders/{id}",
    tag = "Orders",
    security(("bearer_auth" = [])),
    params(
        ("id" = i64, Path, description = "Order ID")
    ),
    responses(
        (status = 200, description = "Hydrated order", body = OrderResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - Not the order owner"),
        (status = 404, description = "Order not found")
    )
)]
pub async fn get_order(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<OrderResponse>> {
    let requester = Requester::from(&current_user);
    let order = state.order_service.get_order(&requester, id).await?;
    Ok(Json(OrderResponse::from(order)))
}

/// Record a payment result and mark the order paid (owner or admin)
#[utoipa::path(
    put,
    path = "/orders/{id}/pay",
    tag = "Orders",
    security(("bearer_auth" = [])),
    params(
        ("id" = i64, Path, description = "Order ID")
    ),
    responses(
        (status = 200, description = "Order marked as paid", body = OrderResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - Not the order owner"),
        (status = 404, description = "Order not found")
    )
)]
pub async fn pay_order(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payment_result): Json<serde_json::Value>,
) -> AppResult<Json<OrderResponse>> {
    let requester = Requester::from(&current_user);
    let order = state
        .order_service
        .update_payment(&requester, id, payment_result)
        .await?;

    Ok(Json(OrderResponse::from(order)))
}

/// Declare a bank transfer as sent (owner only)
#[utoipa::path(
    post,
    path = "/orders/{id}/confirm-transfer",
    tag = "Orders",
    security(("bearer_auth" = [])),
    params(
        ("id" = i64, Path, description = "Order ID")
    ),
    responses(
        (status = 200, description = "Transfer declared", body = OrderActionResponse),
        (status = 400, description = "Order does not use the Transfer payment method"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - Not the order owner"),
        (status = 404, description = "Order not found")
    )
)]
pub async fn confirm_transfer(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<OrderActionResponse>> {
    let requester = Requester::from(&current_user);
    let order = state.order_service.confirm_transfer(&requester, id).await?;

    Ok(Json(OrderActionResponse::new(
        "Transfer confirmed. Awaiting admin verification.",
        order,
    )))
}

/// Verify a declared transfer and mark the order paid (admin only)
#[utoipa::path(
    post,
    path = "/orders/{id}/approve-transfer",
    tag = "Orders",
    security(("bearer_auth" = [])),
    params(
        ("id" = i64, Path, description = "Order ID")
    ),
    responses(
        (status = 200, description = "Transfer approved", body = OrderActionResponse),
        (status = 400, description = "Transfer not yet confirmed by the buyer"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - Admin only"),
        (status = 404, description = "Order not found")
    )
)]
pub async fn approve_transfer(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<OrderActionResponse>> {
    require_admin(&current_user)?;

    let requester = Requester::from(&current_user);
    let order = state.order_service.approve_transfer(&requester, id).await?;

    Ok(Json(OrderActionResponse::new(
        "Transfer payment approved. Order marked as paid.",
        order,
    )))
}

/// Get the fulfillment subset of an order (owner or admin)
#[utoipa::path(
    get,
    path = "/orders/{id}/tracking",
    tag = "Orders",
    security(("bearer_auth" = [])),
    params(
        ("id" = i64, Path, description = "Order ID")
    ),
    responses(
        (status = 200, description = "Tracking details", body = TrackingResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - Not the order owner"),
        (status = 404, description = "Order not found")
    )
)]
pub async fn get_tracking(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<TrackingResponse>> {
    let requester = Requester::from(&current_user);
    let order = state.order_service.get_order(&requester, id).await?;
    Ok(Json(TrackingResponse::from(order)))
}

/// Update status, tracking number, and estimated delivery (admin only)
#[utoipa::path(
    put,
    path = "/orders/{id}/tracking",
    tag = "Orders",
    security(("bearer_auth" = [])),
    params(
        ("id" = i64, Path, description = "Order ID")
    ),
    request_body = TrackingUpdate,
    responses(
        (status = 200, description = "Tracking updated", body = OrderActionResponse),
        (status = 400, description = "Unrecognized status value"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - Admin only"),
        (status = 404, description = "Order not found")
    )
)]
pub async fn update_tracking(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<TrackingUpdate>,
) -> AppResult<Json<OrderActionResponse>> {
    require_admin(&current_user)?;

    let order = state.order_service.update_tracking(id, payload).await?;

    Ok(Json(OrderActionResponse::new(
        "Order tracking updated.",
        order,
    )))
}

/// Flag a paid order refunded (owner or admin)
#[utoipa::path(
    post,
    path = "/orders/{id}/refund",
    tag = "Orders",
    security(("bearer_auth" = [])),
    params(
        ("id" = i64, Path, description = "Order ID")
    ),
    request_body = RefundRequest,
    responses(
        (status = 200, description = "Refund recorded", body = OrderActionResponse),
        (status = 400, description = "Order unpaid or already refunded"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - Not the order owner"),
        (status = 404, description = "Order not found")
    )
)]
pub async fn refund_order(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    Path(id): Path<i64>,
    body: Option<Json<RefundRequest>>,
) -> AppResult<Json<OrderActionResponse>> {
    let requester = Requester::from(&current_user);
    let reason = body.and_then(|Json(r)| r.reason);

    let order = state
        .order_service
        .refund_order(&requester, id, reason)
        .await?;

    Ok(Json(OrderActionResponse::new(
        "Refund processed successfully.",
        order,
    )))
}

/// Directly set the paid/delivered/refunded flags (admin only)
#[utoipa::path(
    put,
    path = "/orders/{id}",
    tag = "Orders",
    security(("bearer_auth" = [])),
    params(
        ("id" = i64, Path, description = "Order ID")
    ),
    request_body = AdminOrderUpdate,
    responses(
        (status = 200, description = "Order flags updated", body = OrderResponse),
        (status = 400, description = "Refunded flag cannot be cleared"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - Admin only"),
        (status = 404, description = "Order not found")
    )
)]
pub async fn admin_update_order(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<AdminOrderUpdate>,
) -> AppResult<Json<OrderResponse>> {
    require_admin(&current_user)?;

    let order = state.order_service.admin_update_flags(id, payload).await?;
    Ok(Json(OrderResponse::from(order)))
}

/// Delete an order (admin only)
#[utoipa::path(
    delete,
    path = "/orders/{id}",
    tag = "Orders",
    security(("bearer_auth" = [])),
    params(
        ("id" = i64, Path, description = "Order ID")
    ),
    responses(
        (status = 204, description = "Order deleted"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - Admin only"),
        (status = 404, description = "Order not found")
    )
)]
pub async fn delete_order(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<StatusCode> {
    require_admin(&current_user)?;

    state.order_service.delete_order(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Get the HTML invoice for an order (owner or admin)
#[utoipa::path(
    get,
    path = "/orders/{id}/invoice",
    tag = "Orders",
    security(("bearer_auth" = [])),
    params(
        ("id" = i64, Path, description = "Order ID")
    ),
    responses(
        (status = 200, description = "Rendered invoice", body = InvoiceDocument),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - Not the order owner"),
        (status = 404, description = "Order not found")
    )
)]
pub async fn get_invoice(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<InvoiceDocument>> {
    let requester = Requester::from(&current_user);
    let document = state.order_service.invoice(&requester, id).await?;
    Ok(Json(document))
}

/// Get the invoice for PDF download (owner or admin).
///
/// PDF generation is not bundled; the response carries the HTML
/// document and a fallback marker so clients can print or convert it.
#[utoipa::path(
    get,
    path = "/orders/{id}/invoice/pdf",
    tag = "Orders",
    security(("bearer_auth" = [])),
    params(
        ("id" = i64, Path, description = "Order ID")
    ),
    responses(
        (status = 200, description = "HTML fallback payload", body = InvoicePdfFallback),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - Not the order owner"),
        (status = 404, description = "Order not found")
    )
)]
pub async fn get_invoice_pdf(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<InvoicePdfFallback>> {
    let requester = Requester::from(&current_user);
    let document = state.order_service.invoice(&requester, id).await?;

    Ok(Json(InvoicePdfFallback {
        message: "PDF generation is not available. Use the HTML invoice instead.".to_string(),
        invoice_html: document.invoice_html,
        fallback: true,
    }))
}
