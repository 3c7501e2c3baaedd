//! Transactional email rendering.
//!
//! Every customer-facing notification is rendered here into a finished
//! `EmailJob` (subject, plain text, optional HTML alternative) before it
//! is handed to the mailer. Branding comes from `MailConfig`; nothing in
//! these templates reads the environment directly.

use chrono::Utc;
use rust_decimal::Decimal;

use crate::config::MailConfig;
use crate::domain::{ContactMessage, Order};
use crate::jobs::EmailJob;

/// Two-decimal dollar amount, e.g. `$43.50`
fn usd(amount: Decimal) -> String {
    format!("${amount:.2}")
}

fn footer(mail: &MailConfig) -> String {
    format!(
        r#"<div class="footer">
                    <p>If you have any questions, please contact us at {support}</p>
                    <p>&copy; {year} {store}. All rights reserved.</p>
                </div>"#,
        support = mail.support_email,
        year = Utc::now().format("%Y"),
        store = mail.store_name,
    )
}

/// Order confirmation sent right after checkout
pub fn order_confirmation(order: &Order, to: &str, recipient: &str, mail: &MailConfig) -> EmailJob {
    let subject = format!(
        "Order Confirmation - {} #{}",
        mail.store_name, order.id
    );

    let mut item_rows = String::new();
    for item in &order.items {
        item_rows.push_str(&format!(
            r#"<tr>
                            <td>{name}</td>
                            <td>{qty}</td>
                            <td>{price}</td>
                            <td>{total}</td>
                        </tr>
"#,
            name = item.name,
            qty = item.qty,
            price = usd(item.price),
            total = usd(item.line_total()),
        ));
    }

    let (address, city_postal, country) = match order.shipping_address.as_ref() {
        Some(a) => (
            a.address.clone(),
            format!("{}, {}", a.city, a.postal_code),
            a.country.clone(),
        ),
        None => (String::new(), String::new(), String::new()),
    };

    let subtotal = order.total_price - order.shipping_price - order.tax_price;

    let html = format!(
        r#"<html>
        <head>
            <style>
                body {{ font-family: Arial, sans-serif; background-color: #f5f5f5; }}
                .container {{ max-width: 600px; margin: 20px auto; background-color: white; padding: 20px; border-radius: 8px; }}
                .header {{ border-bottom: 2px solid #0dcaf0; padding-bottom: 10px; margin-bottom: 20px; }}
                .header h1 {{ color: #333; margin: 0; }}
                .order-details {{ background-color: #f9f9f9; padding: 15px; border-radius: 5px; margin: 15px 0; }}
                .order-details p {{ margin: 5px 0; }}
                .items-table {{ width: 100%; border-collapse: collapse; margin: 20px 0; }}
                .items-table th, .items-table td {{ padding: 10px; border-bottom: 1px solid #ddd; text-align: left; }}
                .items-table th {{ background-color: #0dcaf0; color: white; }}
                .total {{ font-weight: bold; font-size: 18px; color: #333; }}
                .footer {{ background-color: #f5f5f5; padding: 20px; border-radius: 5px; margin-top: 20px; text-align: center; }}
                .footer p {{ margin: 5px 0; font-size: 12px; color: #666; }}
                .button {{ display: inline-block; background-color: #0dcaf0; color: white; padding: 10px 20px; text-decoration: none; border-radius: 5px; margin: 10px 0; }}
            </style>
        </head>
        <body>
            <div class="container">
                <div class="header">
                    <h1>Thank you for your order!</h1>
                    <p>Order #<strong>{id}</strong></p>
                </div>

                <p>Hello {recipient},</p>
                <p>We've received your order and it's being processed. Here are the details:</p>

                <div class="order-details">
                    <h3>Shipping Address</h3>
                    <p>{address}</p>
                    <p>{city_postal}</p>
                    <p>{country}</p>
                </div>

                <h3>Order Items</h3>
                <table class="items-table">
                    <thead>
                        <tr>
                            <th>Product</th>
                            <th>Quantity</th>
                            <th>Price</th>
                            <th>Total</th>
                        </tr>
                    </thead>
                    <tbody>
                        {item_rows}
                    </tbody>
                </table>

                <div class="order-details">
                    <p><strong>Subtotal:</strong> {subtotal}</p>
                    <p><strong>Shipping:</strong> {shipping}</p>
                    <p><strong>Tax:</strong> {tax}</p>
                    <p class="total"><strong>Total:</strong> {total}</p>
                </div>

                <div style="text-align: center;">
                    <a href="{store_url}/order/{id}" class="button">View Order Status</a>
                </div>

                {footer}
            </div>
        </body>
    </html>"#,
        id = order.id,
        recipient = recipient,
        address = address,
        city_postal = city_postal,
        country = country,
        item_rows = item_rows,
        subtotal = usd(subtotal),
        shipping = usd(order.shipping_price),
        tax = usd(order.tax_price),
        total = usd(order.total_price),
        store_url = mail.store_url,
        footer = footer(mail),
    );

    EmailJob::new(
        to,
        subject,
        format!("Order Confirmation for order #{}", order.id),
    )
    .with_html(html)
}

/// Payment receipt sent when an order is marked paid
pub fn payment_confirmation(order: &Order, to: &str, recipient: &str, mail: &MailConfig) -> EmailJob {
    let subject = format!(
        "Payment Confirmed - Order #{} - {}",
        order.id, mail.store_name
    );

    let method = order.payment_method.as_deref().unwrap_or("Payment");
    let paid_date = order
        .paid_at
        .map(|d| d.format("%B %d, %Y").to_string())
        .unwrap_or_else(|| "Processing".to_string());

    let html = format!(
        r#"<html>
        <head>
            <style>
                body {{ font-family: Arial, sans-serif; background-color: #f5f5f5; }}
                .container {{ max-width: 600px; margin: 20px auto; background-color: white; padding: 20px; border-radius: 8px; }}
                .header {{ border-bottom: 2px solid #28a745; padding-bottom: 10px; margin-bottom: 20px; }}
                .header h1 {{ color: #28a745; margin: 0; }}
                .order-details {{ background-color: #f9f9f9; padding: 15px; border-radius: 5px; margin: 15px 0; }}
                .footer {{ background-color: #f5f5f5; padding: 20px; border-radius: 5px; margin-top: 20px; text-align: center; }}
                .footer p {{ margin: 5px 0; font-size: 12px; color: #666; }}
            </style>
        </head>
        <body>
            <div class="container">
                <div class="header">
                    <h1>&#10003; Payment Confirmed!</h1>
                </div>

                <p>Hello {recipient},</p>
                <p>Thank you! Your payment has been successfully processed.</p>

                <div class="order-details">
                    <p><strong>Order Number:</strong> #{id}</p>
                    <p><strong>Payment Method:</strong> {method}</p>
                    <p><strong>Amount:</strong> {amount}</p>
                    <p><strong>Date:</strong> {paid_date}</p>
                </div>

                <p>Your order is now being prepared for shipment. You'll receive a tracking number via email once it ships.</p>

                {footer}
            </div>
        </body>
    </html>"#,
        recipient = recipient,
        id = order.id,
        method = method,
        amount = usd(order.total_price),
        paid_date = paid_date,
        footer = footer(mail),
    );

    EmailJob::new(
        to,
        subject,
        format!("Payment confirmed for order #{}", order.id),
    )
    .with_html(html)
}

/// Shipping notice sent when tracking marks the order delivered-bound
pub fn order_shipped(order: &Order, to: &str, recipient: &str, mail: &MailConfig) -> EmailJob {
    let subject = format!(
        "Your Order Has Shipped - #{} - {}",
        order.id, mail.store_name
    );

    let tracking_info = order
        .tracking_number
        .as_deref()
        .map(|t| format!("<p><strong>Tracking Number:</strong> {t}</p>"))
        .unwrap_or_default();

    let html = format!(
        r#"<html>
        <head>
            <style>
                body {{ font-family: Arial, sans-serif; background-color: #f5f5f5; }}
                .container {{ max-width: 600px; margin: 20px auto; background-color: white; padding: 20px; border-radius: 8px; }}
                .header {{ border-bottom: 2px solid #0dcaf0; padding-bottom: 10px; margin-bottom: 20px; }}
                .header h1 {{ color: #0dcaf0; margin: 0; }}
                .order-details {{ background-color: #f9f9f9; padding: 15px; border-radius: 5px; margin: 15px 0; }}
                .footer {{ background-color: #f5f5f5; padding: 20px; border-radius: 5px; margin-top: 20px; text-align: center; }}
                .footer p {{ margin: 5px 0; font-size: 12px; color: #666; }}
            </style>
        </head>
        <body>
            <div class="container">
                <div class="header">
                    <h1>&#128230; Your Order Has Shipped!</h1>
                </div>

                <p>Hello {recipient},</p>
                <p>Great news! Your order is on its way.</p>

                <div class="order-details">
                    <p><strong>Order Number:</strong> #{id}</p>
                    {tracking_info}
                    <p><strong>Estimated Delivery:</strong> 5-7 business days</p>
                </div>

                <p>You can track your package using the tracking number above. Click the button below to view your order status.</p>

                <div style="text-align: center;">
                    <a href="{store_url}/order/{id}" style="display: inline-block; background-color: #0dcaf0; color: white; padding: 10px 20px; text-decoration: none; border-radius: 5px;">Track Order</a>
                </div>

                {footer}
            </div>
        </body>
    </html>"#,
        recipient = recipient,
        id = order.id,
        tracking_info = tracking_info,
        store_url = mail.store_url,
        footer = footer(mail),
    );

    EmailJob::new(
        to,
        subject,
        format!("Your order #{} has been shipped", order.id),
    )
    .with_html(html)
}

/// Reminder nudging a bank-transfer buyer to complete payment
pub fn transfer_reminder(order: &Order, to: &str, recipient: &str, mail: &MailConfig) -> EmailJob {
    let subject = format!("Payment Reminder - Bank Transfer for Order #{}", order.id);

    let html = format!(
        r#"<html>
        <head>
            <style>
                body {{ font-family: Arial, sans-serif; background-color: #f5f5f5; }}
                .container {{ max-width: 600px; margin: 20px auto; background-color: white; padding: 20px; border-radius: 8px; }}
                .header {{ border-bottom: 2px solid #ffc107; padding-bottom: 10px; margin-bottom: 20px; }}
                .header h1 {{ color: #ffc107; margin: 0; }}
                .order-details {{ background-color: #fff8e1; padding: 15px; border-radius: 5px; margin: 15px 0; }}
                .footer {{ background-color: #f5f5f5; padding: 20px; border-radius: 5px; margin-top: 20px; text-align: center; }}
                .footer p {{ margin: 5px 0; font-size: 12px; color: #666; }}
            </style>
        </head>
        <body>
            <div class="container">
                <div class="header">
                    <h1>&#9200; Payment Pending</h1>
                </div>

                <p>Hello {recipient},</p>
                <p>We're still waiting for your bank transfer payment for order #{id}.</p>

                <div class="order-details">
                    <p><strong>Order Number:</strong> #{id}</p>
                    <p><strong>Amount Due:</strong> {amount}</p>
                    <p>Please complete your transfer to activate this order. You can view the bank details in your order page.</p>
                </div>

                <div style="text-align: center;">
                    <a href="{store_url}/order/{id}" style="display: inline-block; background-color: #0dcaf0; color: white; padding: 10px 20px; text-decoration: none; border-radius: 5px;">Complete Payment</a>
                </div>

                {footer}
            </div>
        </body>
    </html>"#,
        recipient = recipient,
        id = order.id,
        amount = usd(order.total_price),
        store_url = mail.store_url,
        footer = footer(mail),
    );

    EmailJob::new(
        to,
        subject,
        format!("Payment reminder for order #{}", order.id),
    )
    .with_html(html)
}

/// Plain text refund notice
pub fn refund_notice(
    order: &Order,
    to: &str,
    recipient: &str,
    reason: &str,
    mail: &MailConfig,
) -> EmailJob {
    let subject = format!("Refund Processed - Order #{}", order.id);
    let body = format!(
        "Hello {recipient},\n\n\
         Your refund request for order #{id} has been processed.\n\n\
         Amount: {amount}\n\
         Reason: {reason}\n\n\
         The refund should appear in your account within 5-10 business days.\n\n\
         Thank you for shopping with {store}!",
        recipient = recipient,
        id = order.id,
        amount = usd(order.total_price),
        reason = reason,
        store = mail.store_name,
    );

    EmailJob::new(to, subject, body)
}

/// Plain text alert to the store admin about a new contact message
pub fn contact_notice(message: &ContactMessage, mail: &MailConfig) -> EmailJob {
    let subject = format!(
        "New contact message: {}",
        message
            .subject
            .as_deref()
            .filter(|s| !s.is_empty())
            .unwrap_or("No subject")
    );
    let body = format!(
        "From: {from}\n\n{text}\n\nMessage #{id}",
        from = message.email.as_deref().unwrap_or("unknown"),
        text = message.message,
        id = message.id,
    );

    EmailJob::new(mail.admin_email.clone(), subject, body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{OrderCustomer, OrderItem, OrderStatus, ShippingAddress};
    use chrono::TimeZone;
    use rust_decimal_macros::dec;
    use uuid::Uuid;

    fn mail_config() -> MailConfig {
        MailConfig {
            from_address: "noreply@mamigloexclusive.com".to_string(),
            admin_email: "admin@mamigloexclusive.com".to_string(),
            store_name: "mamigloexclusive".to_string(),
            support_email: "support@mamigloexclusive.com".to_string(),
            store_url: "http://localhost:3000".to_string(),
        }
    }

    fn sample_order() -> Order {
        Order {
            id: 42,
            customer: Some(OrderCustomer {
                id: Uuid::new_v4(),
                name: "Ada".to_string(),
                email: "ada@example.com".to_string(),
            }),
            payment_method: Some("Transfer".to_string()),
            tax_price: dec!(4.00),
            shipping_price: dec!(10.00),
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
            created_at: Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap(),
            items: vec![OrderItem {
                id: 1,
                product_id: Some(7),
                name: "Silk Scarf".to_string(),
                qty: 2,
                price: dec!(43.00),
                image: "/placeholder.png".to_string(),
            }],
            shipping_address: Some(ShippingAddress {
                id: 1,
                address: "1 Main St".to_string(),
                city: "Lagos".to_string(),
                postal_code: "100001".to_string(),
                country: "Nigeria".to_string(),
                shipping_price: dec!(10.00),
            }),
        }
    }

    #[test]
    fn test_order_confirmation_renders_totals_and_items() {
        let order = sample_order();
        let email = order_confirmation(&order, "ada@example.com", "Ada", &mail_config());

        assert_eq!(email.to, "ada@example.com");
        assert_eq!(email.subject, "Order Confirmation - mamigloexclusive #42");
        assert_eq!(email.body, "Order Confirmation for order #42");

        let html = email.html_body.expect("confirmation has an html body");
        assert!(html.contains("Hello Ada,"));
        assert!(html.contains("Silk Scarf"));
        assert!(html.contains("$86.00")); // line total 2 x 43.00
        assert!(html.contains("<strong>Subtotal:</strong> $86.00"));
        assert!(html.contains("<strong>Shipping:</strong> $10.00"));
        assert!(html.contains("<strong>Tax:</strong> $4.00"));
        assert!(html.contains("<strong>Total:</strong> $100.00"));
        assert!(html.contains("Lagos, 100001"));
        assert!(html.contains("http://localhost:3000/order/42"));
    }

    #[test]
    fn test_payment_confirmation_falls_back_to_generic_method_label() {
        let mut order = sample_order();
        order.payment_method = None;
        let email = payment_confirmation(&order, "ada@example.com", "Ada", &mail_config());

        assert_eq!(
            email.subject,
            "Payment Confirmed - Order #42 - mamigloexclusive"
        );
        let html = email.html_body.expect("receipt has an html body");
        assert!(html.contains("<strong>Payment Method:</strong> Payment"));
        assert!(html.contains("<strong>Date:</strong> Processing"));
    }

    #[test]
    fn test_payment_confirmation_formats_paid_date() {
        let mut order = sample_order();
        order.paid_at = Some(Utc.with_ymd_and_hms(2025, 3, 5, 9, 30, 0).unwrap());
        let email = payment_confirmation(&order, "ada@example.com", "Ada", &mail_config());

        let html = email.html_body.expect("receipt has an html body");
        assert!(html.contains("<strong>Date:</strong> March 05, 2025"));
    }

    #[test]
    fn test_order_shipped_includes_tracking_when_present() {
        let mut order = sample_order();
        order.tracking_number = Some("TRK-123".to_string());
        let email = order_shipped(&order, "ada@example.com", "Ada", &mail_config());

        assert_eq!(email.body, "Your order #42 has been shipped");
        let html = email.html_body.expect("shipping notice has an html body");
        assert!(html.contains("<strong>Tracking Number:</strong> TRK-123"));
    }

    #[test]
    fn test_order_shipped_omits_tracking_row_when_absent() {
        let order = sample_order();
        let email = order_shipped(&order, "ada@example.com", "Ada", &mail_config());

        let html = email.html_body.expect("shipping notice has an html body");
        assert!(!html.contains("Tracking Number"));
    }

    #[test]
    fn test_transfer_reminder_shows_amount_due() {
        let order = sample_order();
        let email = transfer_reminder(&order, "ada@example.com", "Ada", &mail_config());

        assert_eq!(
            email.subject,
            "Payment Reminder - Bank Transfer for Order #42"
        );
        assert_eq!(email.body, "Payment reminder for order #42");
        let html = email.html_body.expect("reminder has an html body");
        assert!(html.contains("<strong>Amount Due:</strong> $100.00"));
    }

    #[test]
    fn test_refund_notice_is_plain_text_with_reason() {
        let order = sample_order();
        let email = refund_notice(
            &order,
            "ada@example.com",
            "Ada",
            "Damaged on arrival",
            &mail_config(),
        );

        assert_eq!(email.subject, "Refund Processed - Order #42");
        assert!(email.html_body.is_none());
        assert!(email.body.contains("Amount: $100.00"));
        assert!(email.body.contains("Reason: Damaged on arrival"));
        assert!(email.body.contains("5-10 business days"));
    }

    #[test]
    fn test_contact_notice_goes_to_admin_with_subject_fallback() {
        let message = ContactMessage {
            id: 9,
            user_id: Some(Uuid::new_v4()),
            email: Some("shopper@example.com".to_string()),
            subject: None,
            message: "Where is my order?".to_string(),
            is_read: false,
            admin_reply: None,
            created_at: Utc::now(),
        };
        let email = contact_notice(&message, &mail_config());

        assert_eq!(email.to, "admin@mamigloexclusive.com");
        assert_eq!(email.subject, "New contact message: No subject");
        assert!(email.body.starts_with("From: shopper@example.com"));
        assert!(email.body.contains("Where is my order?"));
        assert!(email.html_body.is_none());
    }
}
