//! Order service - The order lifecycle from checkout to refund.
//!
//! SOLID (SRP): Handles order use cases only; state rules live on the
//! domain Order aggregate.
//! DDD: Mutations run inside a Unit of Work transaction against a
//! row-locked order, so concurrent lifecycle calls serialize per order.
//! Emails go out after commit and never fail the request.

use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

use crate::config::{MailConfig, PAYMENT_METHOD_TRANSFER};
use crate::domain::{
    AdminOrderUpdate, CreateOrder, NewOrderItem, Order, OrderCustomer, OrderListQuery, Requester,
    TrackingUpdate,
};
use crate::errors::{AppError, AppResult};
use crate::infra::UnitOfWork;
use crate::jobs::EmailJob;
use crate::services::mailer::Mailer;
use crate::types::PaginationParams;
use crate::utils::emails;
use crate::utils::invoice::InvoiceDocument;
use crate::with_transaction;

/// Order service trait for dependency injection
#[async_trait]
pub trait OrderService: Send + Sync {
    /// Atomically create an order with its items and shipping address.
    ///
    /// Fails with InvalidState on an empty item list and NotFound on an
    /// unknown product; either way nothing is persisted.
    async fn place_order(&self, customer: OrderCustomer, data: CreateOrder) -> AppResult<Order>;

    /// Get a hydrated order, owner or admin only
    async fn get_order(&self, requester: &Requester, id: i64) -> AppResult<Order>;

    /// Render the invoice document for an order, owner or admin only
    async fn invoice(&self, requester: &Requester, id: i64) -> AppResult<InvoiceDocument>;

    /// The caller's orders, newest first
    async fn my_orders(&self, user_id: Uuid) -> AppResult<Vec<Order>>;

    /// Admin listing with search and payment filter
    async fn list_orders(
        &self,
        filter: &OrderListQuery,
        pagination: &PaginationParams,
    ) -> AppResult<(Vec<Order>, u64)>;

    /// Record a card/direct payment result and mark the order paid
    async fn update_payment(
        &self,
        requester: &Requester,
        id: i64,
        payment_result: serde_json::Value,
    ) -> AppResult<Order>;

    /// Buyer declares their bank transfer as sent
    async fn confirm_transfer(&self, requester: &Requester, id: i64) -> AppResult<Order>;

    /// Admin verifies the transfer and marks the order paid
    async fn approve_transfer(&self, requester: &Requester, id: i64) -> AppResult<Order>;

    /// Admin updates status, tracking number, and estimated delivery
    async fn update_tracking(&self, id: i64, update: TrackingUpdate) -> AppResult<Order>;

    /// Flag a paid order refunded and notify the buyer
    async fn refund_order(
        &self,
        requester: &Requester,
        id: i64,
        reason: Option<String>,
    ) -> AppResult<Order>;

    /// Admin override of the paid/delivered/refunded flags
    async fn admin_update_flags(&self, id: i64, flags: AdminOrderUpdate) -> AppResult<Order>;

    /// Hard delete; items and address go with the order
    async fn delete_order(&self, id: i64) -> AppResult<()>;
}

/// Concrete implementation of OrderService using Unit of Work.
pub struct OrderManager<U: UnitOfWork> {
    uow: Arc<U>,
    mailer: Arc<dyn Mailer>,
    mail: MailConfig,
}

impl<U: UnitOfWork> OrderManager<U> {
    /// Create new order service instance with Unit of Work
    pub fn new(uow: Arc<U>, mailer: Arc<dyn Mailer>, mail: MailConfig) -> Self {
        Self { uow, mailer, mail }
    }

    /// Queue an email without letting a queue failure surface
    async fn notify(&self, email: EmailJob, order_id: i64, kind: &str) {
        if let Err(e) = self.mailer.send(email).await {
            tracing::warn!(order_id, "Failed to queue {} email: {}", kind, e);
        }
    }

    /// Buyer address and greeting name, absent once the account is gone
    fn recipient(order: &Order) -> Option<(String, String)> {
        order
            .customer
            .as_ref()
            .map(|c| (c.email.clone(), c.name.clone()))
    }
}

#[async_trait]
impl<U: UnitOfWork> OrderService for OrderManager<U> {
    async fn place_order(&self, customer: OrderCustomer, data: CreateOrder) -> AppResult<Order> {
        if data.order_items.is_empty() {
            return Err(AppError::invalid_state("No order items"));
        }

        let tx_customer = customer.clone();
        let order = with_transaction!(self.uow, |ctx| {
            let mut lines = Vec::with_capacity(data.order_items.len());
            for line in &data.order_items {
                let product = ctx
                    .products()
                    .find_by_id(line.product_id)
                    .await?
                    .ok_or(AppError::NotFound)?;
                lines.push(NewOrderItem::snapshot(&product, line));
            }
            ctx.orders().create(Some(tx_customer), &data, lines).await
        })?;

        self.notify(
            emails::order_confirmation(&order, &customer.email, &customer.name, &self.mail),
            order.id,
            "order confirmation",
        )
        .await;

        if order.payment_method.as_deref() == Some(PAYMENT_METHOD_TRANSFER) {
            self.notify(
                emails::transfer_reminder(&order, &customer.email, &customer.name, &self.mail),
                order.id,
                "transfer reminder",
            )
            .await;
        }

        Ok(order)
    }

    async fn get_order(&self, requester: &Requester, id: i64) -> AppResult<Order> {
        let order = self.uow.orders().find(id).await?.ok_or(AppError::NotFound)?;
        order.ensure_owner_or_admin(requester)?;
        Ok(order)
    }

    async fn invoice(&self, requester: &Requester, id: i64) -> AppResult<InvoiceDocument> {
        let order = self.get_order(requester, id).await?;
        Ok(InvoiceDocument::render(&order, &self.mail))
    }

    async fn my_orders(&self, user_id: Uuid) -> AppResult<Vec<Order>> {
        self.uow.orders().list_by_user(user_id).await
    }

    async fn list_orders(
        &self,
        filter: &OrderListQuery,
        pagination: &PaginationParams,
    ) -> AppResult<(Vec<Order>, u64)> {
        self.uow.orders().list(filter, pagination).await
    }

    async fn update_payment(
        &self,
        requester: &Requester,
        id: i64,
        payment_result: serde_json::Value,
    ) -> AppResult<Order> {
        let requester = requester.clone();
        let order = with_transaction!(self.uow, |ctx| {
            let mut order = ctx
                .orders()
                .find_for_update(id)
                .await?
                .ok_or(AppError::NotFound)?;
            order.ensure_owner_or_admin(&requester)?;
            order.record_payment(payment_result);
            ctx.orders().save(&order).await?;
            Ok(order)
        })?;

        if let Some((email, name)) = Self::recipient(&order) {
            self.notify(
                emails::payment_confirmation(&order, &email, &name, &self.mail),
                order.id,
                "payment confirmation",
            )
            .await;
        }

        Ok(order)
    }

    async fn confirm_transfer(&self, requester: &Requester, id: i64) -> AppResult<Order> {
        let requester = requester.clone();
        with_transaction!(self.uow, |ctx| {
            let mut order = ctx
                .orders()
                .find_for_update(id)
                .await?
                .ok_or(AppError::NotFound)?;
            order.ensure_owner(&requester)?;
            order.confirm_transfer()?;
            ctx.orders().save(&order).await?;
            Ok(order)
        })
    }

    async fn approve_transfer(&self, requester: &Requester, id: i64) -> AppResult<Order> {
        let approved_by = requester.name.clone();
        with_transaction!(self.uow, |ctx| {
            let mut order = ctx
                .orders()
                .find_for_update(id)
                .await?
                .ok_or(AppError::NotFound)?;
            order.approve_transfer(&approved_by)?;
            ctx.orders().save(&order).await?;
            Ok(order)
        })
    }

    async fn update_tracking(&self, id: i64, update: TrackingUpdate) -> AppResult<Order> {
        let (order, delivered_now) = with_transaction!(self.uow, |ctx| {
            let mut order = ctx
                .orders()
                .find_for_update(id)
                .await?
                .ok_or(AppError::NotFound)?;
            let delivered_now = order.update_tracking(&update);
            ctx.orders().save(&order).await?;
            Ok((order, delivered_now))
        })?;

        if delivered_now {
            if let Some((email, name)) = Self::recipient(&order) {
                self.notify(
                    emails::order_shipped(&order, &email, &name, &self.mail),
                    order.id,
                    "shipping notice",
                )
                .await;
            }
        }

        Ok(order)
    }

    async fn refund_order(
        &self,
        requester: &Requester,
        id: i64,
        reason: Option<String>,
    ) -> AppResult<Order> {
        let requester = requester.clone();
        let order = with_transaction!(self.uow, |ctx| {
            let mut order = ctx
                .orders()
                .find_for_update(id)
                .await?
                .ok_or(AppError::NotFound)?;
            order.ensure_owner_or_admin(&requester)?;
            order.refund()?;
            ctx.orders().save(&order).await?;
            Ok(order)
        })?;

        let reason = reason
            .filter(|r| !r.is_empty())
            .unwrap_or_else(|| "Refund requested".to_string());
        if let Some((email, name)) = Self::recipient(&order) {
            self.notify(
                emails::refund_notice(&order, &email, &name, &reason, &self.mail),
                order.id,
                "refund notice",
            )
            .await;
        }

        Ok(order)
    }

    async fn admin_update_flags(&self, id: i64, flags: AdminOrderUpdate) -> AppResult<Order> {
        with_transaction!(self.uow, |ctx| {
            let mut order = ctx
                .orders()
                .find_for_update(id)
                .await?
                .ok_or(AppError::NotFound)?;
            order.apply_admin_flags(&flags)?;
            ctx.orders().save(&order).await?;
            Ok(order)
        })
    }

    async fn delete_order(&self, id: i64) -> AppResult<()> {
        self.uow.orders().delete(id).await
    }
}
