//! Order domain entities and lifecycle rules.
//!
//! The order aggregate owns every payment, fulfillment, and refund
//! transition. Handlers and services authorize the caller and load the
//! row; the methods here decide whether a transition is legal and apply
//! it, so the rules stay testable without a database.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use super::product::Product;
use crate::config::{DEFAULT_PRODUCT_IMAGE, PAYMENT_METHOD_TRANSFER};
use crate::errors::{AppError, AppResult};

/// Fulfillment status values.
///
/// Transitions are deliberately unordered: an admin may move an order
/// from any status to any other. The paid / refunded / transfer flags
/// carry the one-way rules, not this enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Pending,
    Processing,
    Shipped,
    Delivered,
    Cancelled,
    Refunded,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Processing => "processing",
            OrderStatus::Shipped => "shipped",
            OrderStatus::Delivered => "delivered",
            OrderStatus::Cancelled => "cancelled",
            OrderStatus::Refunded => "refunded",
        }
    }
}

impl From<&str> for OrderStatus {
    fn from(s: &str) -> Self {
        match s {
            "processing" => OrderStatus::Processing,
            "shipped" => OrderStatus::Shipped,
            "delivered" => OrderStatus::Delivered,
            "cancelled" => OrderStatus::Cancelled,
            "refunded" => OrderStatus::Refunded,
            _ => OrderStatus::Pending,
        }
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Identity of the user performing an order operation
#[derive(Debug, Clone)]
pub struct Requester {
    pub id: Uuid,
    pub name: String,
    pub is_admin: bool,
}

/// Customer summary hydrated onto an order (None once the account is deleted)
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct OrderCustomer {
    pub id: Uuid,
    pub name: String,
    pub email: String,
}

/// Purchased line with product details snapshotted at order time
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct OrderItem {
    pub id: i64,
    /// Original catalog entry; None once the product is deleted
    pub product_id: Option<i64>,
    pub name: String,
    pub qty: i32,
    pub price: Decimal,
    pub image: String,
}

impl OrderItem {
    pub fn line_total(&self) -> Decimal {
        self.price * Decimal::from(self.qty)
    }
}

/// Destination recorded with the order
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ShippingAddress {
    pub id: i64,
    pub address: String,
    pub city: String,
    pub postal_code: String,
    pub country: String,
    pub shipping_price: Decimal,
}

/// Order aggregate root
#[derive(Debug, Clone)]
pub struct Order {
    pub id: i64,
    pub customer: Option<OrderCustomer>,
    pub payment_method: Option<String>,
    pub tax_price: Decimal,
    pub shipping_price: Decimal,
    pub total_price: Decimal,
    pub is_paid: bool,
    pub paid_at: Option<DateTime<Utc>>,
    /// Opaque payload from whichever payment path confirmed the order
    pub payment_result: Option<serde_json::Value>,
    pub is_delivered: bool,
    pub delivered_at: Option<DateTime<Utc>>,
    pub is_refunded: bool,
    pub transfer_confirmed: bool,
    pub transfer_confirmed_at: Option<DateTime<Utc>>,
    pub status: OrderStatus,
    pub tracking_number: Option<String>,
    pub estimated_delivery: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub items: Vec<OrderItem>,
    pub shipping_address: Option<ShippingAddress>,
}

impl Order {
    /// Check whether the given user placed this order
    pub fn is_owned_by(&self, user_id: Uuid) -> bool {
        self.customer.as_ref().map_or(false, |c| c.id == user_id)
    }

    /// Guard: owner or admin may proceed
    pub fn ensure_owner_or_admin(&self, requester: &Requester) -> AppResult<()> {
        if requester.is_admin || self.is_owned_by(requester.id) {
            Ok(())
        } else {
            Err(AppError::Forbidden)
        }
    }

    /// Guard: only the owner may proceed, admins included out
    pub fn ensure_owner(&self, requester: &Requester) -> AppResult<()> {
        if self.is_owned_by(requester.id) {
            Ok(())
        } else {
            Err(AppError::Forbidden)
        }
    }

    fn uses_transfer(&self) -> bool {
        self.payment_method.as_deref() == Some(PAYMENT_METHOD_TRANSFER)
    }

    /// Sum of item line totals (differs from total_price, which the
    /// storefront computes and sends; no reconciliation is enforced)
    pub fn items_total(&self) -> Decimal {
        self.items.iter().map(OrderItem::line_total).sum()
    }

    /// Mark the order paid with an opaque payment-result payload.
    ///
    /// Re-recording is allowed: the flag stays true and the timestamp
    /// and payload are overwritten with the newest confirmation.
    pub fn record_payment(&mut self, result: serde_json::Value) {
        self.is_paid = true;
        self.paid_at = Some(Utc::now());
        self.payment_result = Some(result);
    }

    /// Buyer declares the bank transfer as sent.
    ///
    /// Only stamps `transfer_confirmed_at`; the confirmed flag stays
    /// false until an admin verifies the funds arrived.
    pub fn confirm_transfer(&mut self) -> AppResult<()> {
        if !self.uses_transfer() {
            return Err(AppError::invalid_state(
                "This order does not use the Transfer payment method",
            ));
        }
        self.transfer_confirmed_at = Some(Utc::now());
        Ok(())
    }

    /// Admin verifies the transfer and marks the order paid.
    ///
    /// Requires the buyer declaration first; there is no path that
    /// skips it, and no path reverts an approved transfer.
    pub fn approve_transfer(&mut self, approved_by: &str) -> AppResult<()> {
        if !self.uses_transfer() {
            return Err(AppError::invalid_state(
                "This order does not use the Transfer payment method",
            ));
        }
        if self.transfer_confirmed_at.is_none() {
            return Err(AppError::invalid_state(
                "User has not confirmed the transfer yet",
            ));
        }
        self.transfer_confirmed = true;
        self.is_paid = true;
        self.paid_at = Some(Utc::now());
        self.payment_result = Some(json!({
            "approvedBy": approved_by,
            "method": PAYMENT_METHOD_TRANSFER,
        }));
        Ok(())
    }

    /// Flag the order refunded. One-way: paid orders only, never twice.
    ///
    /// Leaves `is_paid` and `status` untouched; the refunded flag is
    /// the only record that money went back.
    pub fn refund(&mut self) -> AppResult<()> {
        if !self.is_paid {
            return Err(AppError::invalid_state("Cannot refund unpaid order"));
        }
        if self.is_refunded {
            return Err(AppError::invalid_state("Order already refunded"));
        }
        self.is_refunded = true;
        Ok(())
    }

    /// Apply a partial tracking update; absent fields are untouched.
    ///
    /// Returns true when this update set the status to delivered, which
    /// also forces the delivered flag and triggers the shipped
    /// notification.
    pub fn update_tracking(&mut self, update: &TrackingUpdate) -> bool {
        let mut delivered = false;
        if let Some(status) = update.status {
            if status == OrderStatus::Delivered {
                self.is_delivered = true;
                self.delivered_at = Some(Utc::now());
                delivered = true;
            }
            self.status = status;
        }
        if let Some(tracking) = &update.tracking_number {
            self.tracking_number = Some(tracking.clone());
        }
        if let Some(date) = update.estimated_delivery {
            self.estimated_delivery = Some(date);
        }
        delivered
    }

    /// Admin override of the payment and fulfillment flags.
    ///
    /// The refunded flag stays one-way even here: it can be forced on,
    /// never cleared.
    pub fn apply_admin_flags(&mut self, flags: &AdminOrderUpdate) -> AppResult<()> {
        if let Some(paid) = flags.is_paid {
            self.is_paid = paid;
            self.paid_at = paid.then(Utc::now);
        }
        if let Some(delivered) = flags.is_delivered {
            self.is_delivered = delivered;
            self.delivered_at = delivered.then(Utc::now);
        }
        if let Some(refunded) = flags.is_refunded {
            if refunded {
                self.is_refunded = true;
            } else if self.is_refunded {
                return Err(AppError::invalid_state("Order already refunded"));
            }
        }
        Ok(())
    }
}

/// Order creation payload
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateOrder {
    /// Purchased lines; must be non-empty
    #[validate(nested)]
    pub order_items: Vec<CreateOrderItem>,
    #[validate(nested)]
    pub shipping_address: CreateShippingAddress,
    /// Free-form payment method label, e.g. "Card" or "Transfer"
    #[schema(example = "Transfer")]
    pub payment_method: Option<String>,
    pub tax_price: Decimal,
    pub shipping_price: Decimal,
    pub total_price: Decimal,
}

/// Single line in an order creation payload
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateOrderItem {
    /// Catalog product to purchase
    pub product_id: i64,
    #[validate(range(min = 1, message = "Quantity must be at least 1"))]
    pub qty: i32,
    /// Unit price as shown to the buyer at checkout
    pub price: Decimal,
}

/// Shipping address fields in an order creation payload
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateShippingAddress {
    #[validate(length(min = 1, message = "Address is required"))]
    pub address: String,
    #[validate(length(min = 1, message = "City is required"))]
    pub city: String,
    #[validate(length(min = 1, message = "Postal code is required"))]
    pub postal_code: String,
    #[validate(length(min = 1, message = "Country is required"))]
    pub country: String,
}

/// Order line resolved against the catalog, ready to persist.
///
/// Name and image are snapshotted from the catalog row; qty and unit
/// price come from the checkout payload. Later product edits never
/// rewrite these.
#[derive(Debug, Clone)]
pub struct NewOrderItem {
    pub product_id: i64,
    pub name: String,
    pub qty: i32,
    pub price: Decimal,
    pub image: String,
}

impl NewOrderItem {
    pub fn snapshot(product: &Product, line: &CreateOrderItem) -> Self {
        Self {
            product_id: product.id,
            name: product.name.clone(),
            qty: line.qty,
            price: line.price,
            image: product
                .image
                .clone()
                .unwrap_or_else(|| DEFAULT_PRODUCT_IMAGE.to_string()),
        }
    }
}

/// Partial tracking update (admin)
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct TrackingUpdate {
    pub status: Option<OrderStatus>,
    #[schema(example = "TRK-123456789")]
    pub tracking_number: Option<String>,
    pub estimated_delivery: Option<NaiveDate>,
}

/// Admin override of order flags
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct AdminOrderUpdate {
    pub is_paid: Option<bool>,
    pub is_delivered: Option<bool>,
    pub is_refunded: Option<bool>,
}

/// Refund request payload
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct RefundRequest {
    /// Free-text reason included in the refund notice
    pub reason: Option<String>,
}

/// Admin order listing filters
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OrderListQuery {
    /// Matches customer name, customer email, or an exact order id
    pub search: Option<String>,
    /// Filter by payment status
    pub paid: Option<bool>,
}

/// Order response (full aggregate)
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct OrderResponse {
    pub id: i64,
    pub customer: Option<OrderCustomer>,
    pub payment_method: Option<String>,
    pub tax_price: Decimal,
    pub shipping_price: Decimal,
    pub total_price: Decimal,
    pub is_paid: bool,
    pub paid_at: Option<DateTime<Utc>>,
    pub payment_result: Option<serde_json::Value>,
    pub is_delivered: bool,
    pub delivered_at: Option<DateTime<Utc>>,
    pub is_refunded: bool,
    pub transfer_confirmed: bool,
    pub transfer_confirmed_at: Option<DateTime<Utc>>,
    pub status: OrderStatus,
    pub tracking_number: Option<String>,
    pub estimated_delivery: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub items: Vec<OrderItem>,
    pub shipping_address: Option<ShippingAddress>,
}

impl From<Order> for OrderResponse {
    fn from(order: Order) -> Self {
        Self {
            id: order.id,
            customer: order.customer,
            payment_method: order.payment_method,
            tax_price: order.tax_price,
            shipping_price: order.shipping_price,
            total_price: order.total_price,
            is_paid: order.is_paid,
            paid_at: order.paid_at,
            payment_result: order.payment_result,
            is_delivered: order.is_delivered,
            delivered_at: order.delivered_at,
            is_refunded: order.is_refunded,
            transfer_confirmed: order.transfer_confirmed,
            transfer_confirmed_at: order.transfer_confirmed_at,
            status: order.status,
            tracking_number: order.tracking_number,
            estimated_delivery: order.estimated_delivery,
            created_at: order.created_at,
            items: order.items,
            shipping_address: order.shipping_address,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn customer(id: Uuid) -> OrderCustomer {
        OrderCustomer {
            id,
            name: "Jane Buyer".to_string(),
            email: "jane@example.com".to_string(),
        }
    }

    fn sample_order(id: i64, payment_method: Option<&str>) -> Order {
        Order {
            id,
            customer: Some(customer(Uuid::new_v4())),
            payment_method: payment_method.map(String::from),
            tax_price: dec!(8.00),
            shipping_price: dec!(5.00),
            total_price: dec!(100.00),
            is_paid: false,
            paid_at: None,
            payment_result: None,
            is_delivered: false,
            delivered_at: None,
            is_refunded: false,
            transfer_confirmed: false,
            transfer_confirmed_at: None,
            status: OrderStatus::Pending,
            tracking_number: None,
            estimated_delivery: None,
            created_at: Utc::now(),
            items: vec![OrderItem {
                id: 1,
                product_id: Some(7),
                name: "Silk Scarf".to_string(),
                qty: 2,
                price: dec!(43.50),
                image: "/media/scarf.jpg".to_string(),
            }],
            shipping_address: None,
        }
    }

    fn requester_for(order: &Order) -> Requester {
        let customer = order.customer.as_ref().unwrap();
        Requester {
            id: customer.id,
            name: customer.name.clone(),
            is_admin: false,
        }
    }

    fn admin() -> Requester {
        Requester {
            id: Uuid::new_v4(),
            name: "admin1".to_string(),
            is_admin: true,
        }
    }

    #[test]
    fn test_record_payment_sets_flags() {
        let mut order = sample_order(1, Some("Card"));
        order.record_payment(json!({"txn": "abc-123"}));

        assert!(order.is_paid);
        assert!(order.paid_at.is_some());
        assert_eq!(order.payment_result, Some(json!({"txn": "abc-123"})));
    }

    #[test]
    fn test_record_payment_overwrites_on_repeat() {
        let mut order = sample_order(1, Some("Card"));
        order.record_payment(json!({"txn": "first"}));
        order.record_payment(json!({"txn": "second"}));

        assert!(order.is_paid);
        assert_eq!(order.payment_result, Some(json!({"txn": "second"})));
    }

    #[test]
    fn test_confirm_transfer_stamps_timestamp_only() {
        let mut order = sample_order(1, Some("Transfer"));
        order.confirm_transfer().unwrap();

        assert!(order.transfer_confirmed_at.is_some());
        assert!(!order.transfer_confirmed);
        assert!(!order.is_paid);
    }

    #[test]
    fn test_confirm_transfer_rejects_other_methods() {
        let mut order = sample_order(1, Some("Card"));
        let err = order.confirm_transfer().unwrap_err();

        assert!(matches!(err, AppError::InvalidState(_)));
        assert_eq!(
            err.to_string(),
            "This order does not use the Transfer payment method"
        );
        assert!(order.transfer_confirmed_at.is_none());
    }

    #[test]
    fn test_confirm_transfer_rejects_missing_method() {
        let mut order = sample_order(1, None);
        assert!(order.confirm_transfer().is_err());
    }

    #[test]
    fn test_approve_transfer_requires_buyer_confirmation() {
        let mut order = sample_order(1, Some("Transfer"));
        let err = order.approve_transfer("admin1").unwrap_err();

        assert!(matches!(err, AppError::InvalidState(_)));
        assert_eq!(err.to_string(), "User has not confirmed the transfer yet");
        assert!(!order.is_paid);
        assert!(!order.transfer_confirmed);
    }

    #[test]
    fn test_transfer_flow_confirm_then_approve() {
        let mut order = sample_order(42, Some("Transfer"));

        order.confirm_transfer().unwrap();
        assert!(!order.is_paid);

        order.approve_transfer("admin1").unwrap();
        assert!(order.is_paid);
        assert!(order.paid_at.is_some());
        assert!(order.transfer_confirmed);
        assert_eq!(
            order.payment_result,
            Some(json!({"approvedBy": "admin1", "method": "Transfer"}))
        );
    }

    #[test]
    fn test_approve_transfer_rejects_other_methods() {
        let mut order = sample_order(1, Some("Card"));
        order.transfer_confirmed_at = Some(Utc::now());
        assert!(order.approve_transfer("admin1").is_err());
    }

    #[test]
    fn test_refund_requires_payment() {
        let mut order = sample_order(1, Some("Card"));
        let err = order.refund().unwrap_err();

        assert_eq!(err.to_string(), "Cannot refund unpaid order");
        assert!(!order.is_refunded);
    }

    #[test]
    fn test_refund_only_once() {
        let mut order = sample_order(1, Some("Card"));
        order.record_payment(json!({}));

        order.refund().unwrap();
        let err = order.refund().unwrap_err();

        assert_eq!(err.to_string(), "Order already refunded");
        assert!(order.is_refunded);
    }

    #[test]
    fn test_refund_leaves_paid_flag_and_status() {
        let mut order = sample_order(1, Some("Card"));
        order.record_payment(json!({}));
        order.status = OrderStatus::Delivered;

        order.refund().unwrap();

        assert!(order.is_paid);
        assert_eq!(order.status, OrderStatus::Delivered);
    }

    #[test]
    fn test_update_tracking_partial_fields() {
        let mut order = sample_order(1, Some("Card"));
        order.status = OrderStatus::Processing;

        let delivered = order.update_tracking(&TrackingUpdate {
            tracking_number: Some("TRK-1".to_string()),
            ..Default::default()
        });

        assert!(!delivered);
        assert_eq!(order.tracking_number.as_deref(), Some("TRK-1"));
        assert_eq!(order.status, OrderStatus::Processing);
        assert!(!order.is_delivered);
    }

    #[test]
    fn test_update_tracking_delivered_forces_flags() {
        let mut order = sample_order(1, Some("Card"));

        let delivered = order.update_tracking(&TrackingUpdate {
            status: Some(OrderStatus::Delivered),
            ..Default::default()
        });

        assert!(delivered);
        assert!(order.is_delivered);
        assert!(order.delivered_at.is_some());
        assert_eq!(order.status, OrderStatus::Delivered);
    }

    #[test]
    fn test_update_tracking_allows_any_transition() {
        let mut order = sample_order(1, Some("Card"));
        order.status = OrderStatus::Delivered;

        order.update_tracking(&TrackingUpdate {
            status: Some(OrderStatus::Pending),
            ..Default::default()
        });

        assert_eq!(order.status, OrderStatus::Pending);
    }

    #[test]
    fn test_admin_flags_paid_toggle() {
        let mut order = sample_order(1, Some("Card"));

        order
            .apply_admin_flags(&AdminOrderUpdate {
                is_paid: Some(true),
                ..Default::default()
            })
            .unwrap();
        assert!(order.is_paid);
        assert!(order.paid_at.is_some());

        order
            .apply_admin_flags(&AdminOrderUpdate {
                is_paid: Some(false),
                ..Default::default()
            })
            .unwrap();
        assert!(!order.is_paid);
        assert!(order.paid_at.is_none());
    }

    #[test]
    fn test_admin_flags_cannot_clear_refund() {
        let mut order = sample_order(1, Some("Card"));
        order.record_payment(json!({}));
        order.refund().unwrap();

        let err = order
            .apply_admin_flags(&AdminOrderUpdate {
                is_refunded: Some(false),
                ..Default::default()
            })
            .unwrap_err();

        assert!(matches!(err, AppError::InvalidState(_)));
        assert!(order.is_refunded);
    }

    #[test]
    fn test_ensure_owner_or_admin() {
        let order = sample_order(1, Some("Card"));

        assert!(order.ensure_owner_or_admin(&requester_for(&order)).is_ok());
        assert!(order.ensure_owner_or_admin(&admin()).is_ok());

        let stranger = Requester {
            id: Uuid::new_v4(),
            name: "Mallory".to_string(),
            is_admin: false,
        };
        assert!(matches!(
            order.ensure_owner_or_admin(&stranger),
            Err(AppError::Forbidden)
        ));
    }

    #[test]
    fn test_ensure_owner_excludes_non_owner_admin() {
        let order = sample_order(1, Some("Transfer"));

        assert!(order.ensure_owner(&requester_for(&order)).is_ok());
        assert!(matches!(
            order.ensure_owner(&admin()),
            Err(AppError::Forbidden)
        ));
    }

    #[test]
    fn test_ownerless_order_only_admin_passes() {
        let mut order = sample_order(1, Some("Card"));
        order.customer = None;

        assert!(order.ensure_owner_or_admin(&admin()).is_ok());

        let user = Requester {
            id: Uuid::new_v4(),
            name: "Someone".to_string(),
            is_admin: false,
        };
        assert!(order.ensure_owner_or_admin(&user).is_err());
    }

    #[test]
    fn test_status_from_str_defaults_to_pending() {
        assert_eq!(OrderStatus::from("shipped"), OrderStatus::Shipped);
        assert_eq!(OrderStatus::from("bogus"), OrderStatus::Pending);
    }

    #[test]
    fn test_items_total_sums_line_totals() {
        let order = sample_order(1, Some("Card"));
        assert_eq!(order.items_total(), dec!(87.00));
    }

    #[test]
    fn test_new_order_item_snapshots_catalog_but_keeps_checkout_price() {
        let product = Product {
            id: 7,
            user_id: None,
            name: "Silk Scarf".to_string(),
            image: None,
            brand: None,
            category: None,
            description: None,
            rating: dec!(4.50),
            num_reviews: 3,
            price: dec!(60.00),
            price_currency: "USD".to_string(),
            count_in_stock: 5,
            created_at: Utc::now(),
        };
        let line = CreateOrderItem {
            product_id: 7,
            qty: 2,
            price: dec!(43.50),
        };

        let item = NewOrderItem::snapshot(&product, &line);

        assert_eq!(item.product_id, 7);
        assert_eq!(item.name, "Silk Scarf");
        assert_eq!(item.image, "/placeholder.png");
        assert_eq!(item.qty, 2);
        assert_eq!(item.price, dec!(43.50));
    }
}
