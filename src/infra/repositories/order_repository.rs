//! Order repository - hydrated reads, admin listings, and dashboard aggregates.
//!
//! Lifecycle writes go through the transactional repository in the
//! unit of work; this pooled repository serves reads and reporting.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;
use rust_decimal::Decimal;
use sea_orm::sea_query::extension::postgres::PgExpr;
use sea_orm::sea_query::{Alias, Expr};
use sea_orm::{
    ColumnTrait, Condition, ConnectionTrait, DatabaseConnection, EntityTrait, FromQueryResult,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect,
};
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use super::entities::{order, order_item, shipping_address, user};
use crate::config::PAYMENT_METHOD_TRANSFER;
use crate::domain::{Order, OrderCustomer, OrderItem, OrderListQuery, OrderStatus, ShippingAddress};
use crate::errors::{AppError, AppResult};
use crate::types::PaginationParams;

/// Orders per fulfillment status
#[derive(Debug, Clone, Serialize, FromQueryResult, ToSchema)]
pub struct StatusCount {
    pub status: String,
    pub count: i64,
}

/// Order count and gross total per payment method
#[derive(Debug, Clone, Serialize, FromQueryResult, ToSchema)]
pub struct PaymentMethodStat {
    pub payment_method: String,
    pub count: i64,
    pub total: Decimal,
}

/// Best-selling product by quantity sold
#[derive(Debug, Clone, Serialize, FromQueryResult, ToSchema)]
pub struct TopProduct {
    pub product_id: Option<i64>,
    pub name: String,
    pub total_qty: i64,
    pub total_revenue: Decimal,
}

#[derive(FromQueryResult)]
struct RevenueRow {
    total: Option<Decimal>,
}

/// Order repository trait for dependency injection
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait OrderRepository: Send + Sync {
    /// Fully hydrated order: customer, items, address
    async fn find(&self, id: i64) -> AppResult<Option<Order>>;

    /// Admin listing, newest first
    async fn list(
        &self,
        filter: &OrderListQuery,
        pagination: &PaginationParams,
    ) -> AppResult<(Vec<Order>, u64)>;

    /// A user's own orders, newest first
    async fn list_by_user(&self, user_id: Uuid) -> AppResult<Vec<Order>>;

    async fn delete(&self, id: i64) -> AppResult<()>;

    async fn count(&self) -> AppResult<u64>;

    /// Gross revenue over paid orders, optionally created at or after `since`
    async fn revenue_paid(&self, since: Option<DateTime<Utc>>) -> AppResult<Decimal>;

    async fn count_by_status(&self) -> AppResult<Vec<StatusCount>>;

    /// Breakdown over orders that chose a payment method
    async fn payment_method_stats(&self) -> AppResult<Vec<PaymentMethodStat>>;

    async fn top_products(&self, limit: u64) -> AppResult<Vec<TopProduct>>;

    async fn count_refunded(&self) -> AppResult<u64>;

    /// Unpaid transfer orders the buyer has not yet confirmed sending
    async fn count_pending_transfers(&self) -> AppResult<u64>;

    /// Transfer orders where the buyer has not yet declared the payment
    async fn list_unconfirmed_transfers(&self) -> AppResult<Vec<Order>>;

    /// Latest orders for the dashboard
    async fn recent(&self, limit: u64) -> AppResult<Vec<Order>>;
}

/// SeaORM-backed order repository
pub struct OrderStore {
    db: DatabaseConnection,
}

impl OrderStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl OrderRepository for OrderStore {
    async fn find(&self, id: i64) -> AppResult<Option<Order>> {
        let row = order::Entity::find_by_id(id)
            .find_also_related(user::Entity)
            .one(&self.db)
            .await?;

        match row {
            Some((model, customer)) => Ok(Some(hydrate_order(&self.db, model, customer).await?)),
            None => Ok(None),
        }
    }

    async fn list(
        &self,
        filter: &OrderListQuery,
        pagination: &PaginationParams,
    ) -> AppResult<(Vec<Order>, u64)> {
        let mut select = order::Entity::find()
            .find_also_related(user::Entity)
            .order_by_desc(order::Column::CreatedAt);

        if let Some(term) = filter.search.as_deref().filter(|t| !t.is_empty()) {
            let pattern = format!("%{term}%");
            let mut cond = Condition::any()
                .add(Expr::col((user::Entity, user::Column::Name)).ilike(pattern.as_str()))
                .add(Expr::col((user::Entity, user::Column::Email)).ilike(pattern.as_str()));
            if let Ok(id) = term.parse::<i64>() {
                cond = cond.add(order::Column::Id.eq(id));
            }
            select = select.filter(cond);
        }
        if let Some(paid) = filter.paid {
            select = select.filter(order::Column::IsPaid.eq(paid));
        }

        let paginator = select.paginate(&self.db, pagination.limit());
        let total = paginator.num_items().await?;
        let rows = paginator
            .fetch_page(pagination.page.saturating_sub(1))
            .await?;

        Ok((hydrate_orders(&self.db, rows).await?, total))
    }

    async fn list_by_user(&self, user_id: Uuid) -> AppResult<Vec<Order>> {
        let rows = order::Entity::find()
            .filter(order::Column::UserId.eq(user_id))
            .find_also_related(user::Entity)
            .order_by_desc(order::Column::CreatedAt)
            .all(&self.db)
            .await?;

        hydrate_orders(&self.db, rows).await
    }

    async fn delete(&self, id: i64) -> AppResult<()> {
        // Items and address cascade with the order row
        let result = order::Entity::delete_by_id(id).exec(&self.db).await?;
        if result.rows_affected == 0 {
            return Err(AppError::NotFound);
        }
        Ok(())
    }

    async fn count(&self) -> AppResult<u64> {
        order::Entity::find()
            .count(&self.db)
            .await
            .map_err(Into::into)
    }

    async fn revenue_paid(&self, since: Option<DateTime<Utc>>) -> AppResult<Decimal> {
        let mut select = order::Entity::find()
            .select_only()
            .column_as(order::Column::TotalPrice.sum(), "total")
            .filter(order::Column::IsPaid.eq(true));

        if let Some(since) = since {
            select = select.filter(order::Column::CreatedAt.gte(since));
        }

        let row = select.into_model::<RevenueRow>().one(&self.db).await?;
        Ok(row.and_then(|r| r.total).unwrap_or(Decimal::ZERO))
    }

    async fn count_by_status(&self) -> AppResult<Vec<StatusCount>> {
        order::Entity::find()
            .select_only()
            .column(order::Column::Status)
            .column_as(order::Column::Id.count(), "count")
            .group_by(order::Column::Status)
            .into_model::<StatusCount>()
            .all(&self.db)
            .await
            .map_err(Into::into)
    }

    async fn payment_method_stats(&self) -> AppResult<Vec<PaymentMethodStat>> {
        order::Entity::find()
            .select_only()
            .column(order::Column::PaymentMethod)
            .column_as(order::Column::Id.count(), "count")
            .column_as(order::Column::TotalPrice.sum(), "total")
            .filter(order::Column::PaymentMethod.is_not_null())
            .group_by(order::Column::PaymentMethod)
            .into_model::<PaymentMethodStat>()
            .all(&self.db)
            .await
            .map_err(Into::into)
    }

    async fn top_products(&self, limit: u64) -> AppResult<Vec<TopProduct>> {
        let revenue = Expr::expr(
            Expr::col(order_item::Column::Price).mul(Expr::col(order_item::Column::Qty)),
        )
        .sum();

        order_item::Entity::find()
            .select_only()
            .column(order_item::Column::ProductId)
            .column(order_item::Column::Name)
            .column_as(order_item::Column::Qty.sum(), "total_qty")
            .column_as(revenue, "total_revenue")
            .group_by(order_item::Column::ProductId)
            .group_by(order_item::Column::Name)
            .order_by_desc(Expr::col(Alias::new("total_qty")))
            .limit(limit)
            .into_model::<TopProduct>()
            .all(&self.db)
            .await
            .map_err(Into::into)
    }

    async fn count_refunded(&self) -> AppResult<u64> {
        order::Entity::find()
            .filter(order::Column::IsRefunded.eq(true))
            .count(&self.db)
            .await
            .map_err(Into::into)
    }

    async fn count_pending_transfers(&self) -> AppResult<u64> {
        order::Entity::find()
            .filter(order::Column::PaymentMethod.eq(PAYMENT_METHOD_TRANSFER))
            .filter(order::Column::TransferConfirmed.eq(false))
            .filter(order::Column::IsPaid.eq(false))
            .count(&self.db)
            .await
            .map_err(Into::into)
    }

    async fn list_unconfirmed_transfers(&self) -> AppResult<Vec<Order>> {
        let rows = order::Entity::find()
            .filter(order::Column::PaymentMethod.eq(PAYMENT_METHOD_TRANSFER))
            .filter(order::Column::IsPaid.eq(false))
            .filter(order::Column::TransferConfirmed.eq(false))
            .find_also_related(user::Entity)
            .order_by_desc(order::Column::CreatedAt)
            .all(&self.db)
            .await?;

        hydrate_orders(&self.db, rows).await
    }

    async fn recent(&self, limit: u64) -> AppResult<Vec<Order>> {
        let rows = order::Entity::find()
            .find_also_related(user::Entity)
            .order_by_desc(order::Column::CreatedAt)
            .limit(limit)
            .all(&self.db)
            .await?;

        hydrate_orders(&self.db, rows).await
    }
}

/// Build the domain aggregate from its persistence parts.
pub(crate) fn assemble_order(
    model: order::Model,
    customer: Option<user::Model>,
    items: Vec<order_item::Model>,
    address: Option<shipping_address::Model>,
) -> Order {
    Order {
        id: model.id,
        customer: customer.map(|u| OrderCustomer {
            id: u.id,
            name: u.name,
            email: u.email,
        }),
        payment_method: model.payment_method,
        tax_price: model.tax_price,
        shipping_price: model.shipping_price,
        total_price: model.total_price,
        is_paid: model.is_paid,
        paid_at: model.paid_at,
        payment_result: model.payment_result,
        is_delivered: model.is_delivered,
        delivered_at: model.delivered_at,
        is_refunded: model.is_refunded,
        transfer_confirmed: model.transfer_confirmed,
        transfer_confirmed_at: model.transfer_confirmed_at,
        status: OrderStatus::from(model.status.as_str()),
        tracking_number: model.tracking_number,
        estimated_delivery: model.estimated_delivery,
        created_at: model.created_at,
        items: items.into_iter().map(OrderItem::from).collect(),
        shipping_address: address.map(ShippingAddress::from),
    }
}

/// Load items and address for one order and assemble the aggregate.
pub(crate) async fn hydrate_order<C: ConnectionTrait>(
    conn: &C,
    model: order::Model,
    customer: Option<user::Model>,
) -> AppResult<Order> {
    let items = order_item::Entity::find()
        .filter(order_item::Column::OrderId.eq(model.id))
        .order_by_asc(order_item::Column::Id)
        .all(conn)
        .await?;

    let address = shipping_address::Entity::find()
        .filter(shipping_address::Column::OrderId.eq(model.id))
        .one(conn)
        .await?;

    Ok(assemble_order(model, customer, items, address))
}

/// Batch-load items and addresses for a page of orders.
pub(crate) async fn hydrate_orders<C: ConnectionTrait>(
    conn: &C,
    rows: Vec<(order::Model, Option<user::Model>)>,
) -> AppResult<Vec<Order>> {
    if rows.is_empty() {
        return Ok(Vec::new());
    }

    let ids: Vec<i64> = rows.iter().map(|(model, _)| model.id).collect();

    let items = order_item::Entity::find()
        .filter(order_item::Column::OrderId.is_in(ids.clone()))
        .order_by_asc(order_item::Column::Id)
        .all(conn)
        .await?;
    let mut items_by_order: HashMap<i64, Vec<order_item::Model>> = HashMap::new();
    for item in items {
        items_by_order.entry(item.order_id).or_default().push(item);
    }

    let addresses = shipping_address::Entity::find()
        .filter(shipping_address::Column::OrderId.is_in(ids))
        .all(conn)
        .await?;
    let mut addresses_by_order: HashMap<i64, shipping_address::Model> =
        addresses.into_iter().map(|a| (a.order_id, a)).collect();

    Ok(rows
        .into_iter()
        .map(|(model, customer)| {
            let items = items_by_order.remove(&model.id).unwrap_or_default();
            let address = addresses_by_order.remove(&model.id);
            assemble_order(model, customer, items, address)
        })
        .collect())
}
