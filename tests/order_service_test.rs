//! Order service unit tests.
//!
//! Covers access control and read paths through mocked repositories.
//! State transitions (payment, transfer approval, tracking, refunds)
//! run inside database transactions and are exercised by the domain
//! transition tests instead.

mod common;

use std::sync::Arc;

use chrono::Utc;
use mockall::predicate::eq;
use rust_decimal_macros::dec;
use uuid::Uuid;

use mamiglo_api::domain::{
    CreateOrder, CreateShippingAddress, Order, OrderCustomer, OrderItem, OrderListQuery,
    OrderStatus, Requester, ShippingAddress,
};
use mamiglo_api::errors::AppError;
use mamiglo_api::infra::repositories::MockOrderRepository;
use mamiglo_api::services::{Mailer, MockMailer, OrderManager, OrderService};
use mamiglo_api::types::PaginationParams;
use mamiglo_api::config::MailConfig;

use common::TestUnitOfWork;

fn test_mail_config() -> MailConfig {
    MailConfig {
        from_address: "shop@mamigloexclusive.com".to_string(),
        admin_email: "admin@mamigloexclusive.com".to_string(),
        store_name: "mamigloexclusive".to_string(),
        support_email: "support@mamigloexclusive.com".to_string(),
        store_url: "https://mamigloexclusive.com".to_string(),
    }
}

fn sample_order(id: i64, owner: Uuid) -> Order {
    Order {
        id,
        customer: Some(OrderCustomer {
            id: owner,
            name: "Ana Buyer".to_string(),
            email: "ana@example.com".to_string(),
        }),
        payment_method: Some("Transfer".to_string()),
        tax_price: dec!(2.50),
        shipping_price: dec!(5.00),
        total_price: dec!(57.50),
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
            name: "Gold Hoop Earrings".to_string(),
            qty: 2,
            price: dec!(25.00),
            image: "/media/products/hoops.jpg".to_string(),
        }],
        shipping_address: Some(ShippingAddress {
            id: 1,
            address: "12 Rose Lane".to_string(),
            city: "Lagos".to_string(),
            postal_code: "100001".to_string(),
            country: "Nigeria".to_string(),
            shipping_price: dec!(5.00),
        }),
    }
}

fn owner(order: &Order) -> Requester {
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
        name: "Store Admin".to_string(),
        is_admin: true,
    }
}

fn service_with(repo: MockOrderRepository) -> OrderManager<TestUnitOfWork> {
    let mailer: Arc<dyn Mailer> = Arc::new(MockMailer::new());
    OrderManager::new(
        Arc::new(TestUnitOfWork::with_orders(repo)),
        mailer,
        test_mail_config(),
    )
}

#[tokio::test]
async fn test_get_order_owner_allowed() {
    let buyer = Uuid::new_v4();

    let mut repo = MockOrderRepository::new();
    repo.expect_find()
        .with(eq(42i64))
        .returning(move |id| Ok(Some(sample_order(id, buyer))));

    let service = service_with(repo);
    let order = sample_order(42, buyer);
    let result = service.get_order(&owner(&order), 42).await;

    assert!(result.is_ok());
    assert_eq!(result.unwrap().id, 42);
}

#[tokio::test]
async fn test_get_order_admin_allowed() {
    let buyer = Uuid::new_v4();

    let mut repo = MockOrderRepository::new();
    repo.expect_find()
        .returning(move |id| Ok(Some(sample_order(id, buyer))));

    let service = service_with(repo);
    let result = service.get_order(&admin(), 42).await;

    assert!(result.is_ok());
}

#[tokio::test]
async fn test_get_order_stranger_forbidden() {
    let buyer = Uuid::new_v4();

    let mut repo = MockOrderRepository::new();
    repo.expect_find()
        .returning(move |id| Ok(Some(sample_order(id, buyer))));

    let service = service_with(repo);
    let stranger = Requester {
        id: Uuid::new_v4(),
        name: "Mallory".to_string(),
        is_admin: false,
    };
    let result = service.get_order(&stranger, 42).await;

    assert!(result.is_err());
    assert!(matches!(result.unwrap_err(), AppError::Forbidden));
}

#[tokio::test]
async fn test_get_order_not_found() {
    let mut repo = MockOrderRepository::new();
    repo.expect_find().returning(|_| Ok(None));

    let service = service_with(repo);
    let result = service.get_order(&admin(), 999).await;

    assert!(result.is_err());
    assert!(matches!(result.unwrap_err(), AppError::NotFound));
}

#[tokio::test]
async fn test_my_orders_queries_by_user() {
    let buyer = Uuid::new_v4();

    let mut repo = MockOrderRepository::new();
    repo.expect_list_by_user()
        .with(eq(buyer))
        .returning(move |_| Ok(vec![sample_order(1, buyer), sample_order(2, buyer)]));

    let service = service_with(repo);
    let result = service.my_orders(buyer).await;

    assert!(result.is_ok());
    assert_eq!(result.unwrap().len(), 2);
}

#[tokio::test]
async fn test_list_orders_passes_filter() {
    let buyer = Uuid::new_v4();

    let mut repo = MockOrderRepository::new();
    repo.expect_list()
        .withf(|filter, _pagination| filter.paid == Some(true))
        .returning(move |_, _| Ok((vec![sample_order(1, buyer)], 1)));

    let service = service_with(repo);
    let filter = OrderListQuery {
        search: None,
        paid: Some(true),
    };
    let result = service
        .list_orders(&filter, &PaginationParams::default())
        .await;

    assert!(result.is_ok());
    let (orders, total) = result.unwrap();
    assert_eq!(orders.len(), 1);
    assert_eq!(total, 1);
}

#[tokio::test]
async fn test_place_order_rejects_empty_cart() {
    let buyer = Uuid::new_v4();

    let service = service_with(MockOrderRepository::new());
    let customer = OrderCustomer {
        id: buyer,
        name: "Ana Buyer".to_string(),
        email: "ana@example.com".to_string(),
    };
    let data = CreateOrder {
        order_items: vec![],
        shipping_address: CreateShippingAddress {
            address: "12 Rose Lane".to_string(),
            city: "Lagos".to_string(),
            postal_code: "100001".to_string(),
            country: "Nigeria".to_string(),
        },
        payment_method: Some("Transfer".to_string()),
        tax_price: dec!(0),
        shipping_price: dec!(0),
        total_price: dec!(0),
    };

    let result = service.place_order(customer, data).await;

    assert!(result.is_err());
    assert!(matches!(result.unwrap_err(), AppError::InvalidState(_)));
}

#[tokio::test]
async fn test_invoice_renders_document_for_owner() {
    let buyer = Uuid::new_v4();

    let mut repo = MockOrderRepository::new();
    repo.expect_find()
        .with(eq(42i64))
        .returning(move |id| Ok(Some(sample_order(id, buyer))));

    let service = service_with(repo);
    let order = sample_order(42, buyer);
    let result = service.invoice(&owner(&order), 42).await;

    assert!(result.is_ok());
    let invoice = result.unwrap();
    assert_eq!(invoice.order_id, 42);
    assert!(invoice.filename.starts_with("Invoice-Order-000042-"));
    assert!(invoice.invoice_html.contains("mamigloexclusive"));
    assert!(invoice.invoice_html.contains("Gold Hoop Earrings"));
    assert!(invoice.invoice_html.contains("$57.50"));
}

#[tokio::test]
async fn test_invoice_forbidden_for_stranger() {
    let buyer = Uuid::new_v4();

    let mut repo = MockOrderRepository::new();
    repo.expect_find()
        .returning(move |id| Ok(Some(sample_order(id, buyer))));

    let service = service_with(repo);
    let stranger = Requester {
        id: Uuid::new_v4(),
        name: "Mallory".to_string(),
        is_admin: false,
    };
    let result = service.invoice(&stranger, 42).await;

    assert!(result.is_err());
    assert!(matches!(result.unwrap_err(), AppError::Forbidden));
}

#[tokio::test]
async fn test_delete_order_success() {
    let mut repo = MockOrderRepository::new();
    repo.expect_delete().with(eq(42i64)).returning(|_| Ok(()));

    let service = service_with(repo);
    let result = service.delete_order(42).await;

    assert!(result.is_ok());
}
