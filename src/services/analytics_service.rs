//! Analytics service - Aggregated store metrics for the admin dashboard.
//!
//! SOLID (SRP): Read-only aggregation, no mutations.
//! All aggregate queries are independent, so they run in parallel over
//! the connection pool.

use async_trait::async_trait;
use chrono::{Duration, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use std::sync::Arc;
use utoipa::ToSchema;

use crate::config::{ANALYTICS_RECENT_ORDERS, ANALYTICS_TOP_PRODUCTS, ANALYTICS_WINDOW_DAYS};
use crate::domain::OrderResponse;
use crate::errors::AppResult;
use crate::infra::{PaymentMethodStat, StatusCount, TopProduct, UnitOfWork};
use crate::services::parallel;

/// Store-wide headline numbers
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct AnalyticsSummary {
    pub total_orders: u64,
    /// Gross revenue over paid orders
    pub total_revenue: Decimal,
    pub total_products: u64,
    pub total_users: u64,
    /// Revenue from paid orders created in the rolling window
    pub monthly_revenue: Decimal,
    pub new_customers_30d: u64,
    /// Refunded order count
    pub refund_requests: u64,
    /// Unpaid transfer orders awaiting buyer confirmation
    pub pending_transfers: u64,
}

/// Full dashboard payload
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct AnalyticsResponse {
    pub summary: AnalyticsSummary,
    pub orders_by_status: Vec<StatusCount>,
    pub payment_methods: Vec<PaymentMethodStat>,
    pub top_products: Vec<TopProduct>,
    pub recent_orders: Vec<OrderResponse>,
}

/// Analytics service trait for dependency injection
#[async_trait]
pub trait AnalyticsService: Send + Sync {
    /// Assemble the admin dashboard payload
    async fn dashboard(&self) -> AppResult<AnalyticsResponse>;
}

/// Concrete implementation of AnalyticsService using Unit of Work.
pub struct AnalyticsManager<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> AnalyticsManager<U> {
    /// Create new analytics service instance with Unit of Work
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }
}

#[async_trait]
impl<U: UnitOfWork> AnalyticsService for AnalyticsManager<U> {
    async fn dashboard(&self) -> AppResult<AnalyticsResponse> {
        let orders = self.uow.orders();
        let products = self.uow.products();
        let users = self.uow.users();
        let window_start = Utc::now() - Duration::days(ANALYTICS_WINDOW_DAYS);

        let (total_orders, total_revenue, total_products, total_users) = parallel::join4(
            orders.count(),
            orders.revenue_paid(None),
            products.count(),
            users.count(),
        )
        .await?;

        let (monthly_revenue, new_customers_30d, refund_requests, pending_transfers) =
            parallel::join4(
                orders.revenue_paid(Some(window_start)),
                users.count_since(window_start),
                orders.count_refunded(),
                orders.count_pending_transfers(),
            )
            .await?;

        let (orders_by_status, payment_methods, top_products, recent_orders) = parallel::join4(
            orders.count_by_status(),
            orders.payment_method_stats(),
            orders.top_products(ANALYTICS_TOP_PRODUCTS),
            orders.recent(ANALYTICS_RECENT_ORDERS),
        )
        .await?;

        Ok(AnalyticsResponse {
            summary: AnalyticsSummary {
                total_orders,
                total_revenue,
                total_products,
                total_users,
                monthly_revenue,
                new_customers_30d,
                refund_requests,
                pending_transfers,
            },
            orders_by_status,
            payment_methods,
            top_products,
            recent_orders: recent_orders.into_iter().map(OrderResponse::from).collect(),
        })
    }
}
