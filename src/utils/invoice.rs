//! Invoice document rendering.
//!
//! Produces a self-contained HTML invoice for an order. The document is
//! returned to API clients as a string; printable/PDF conversion happens
//! client side.

use rust_decimal::Decimal;
use serde::Serialize;
use utoipa::ToSchema;

use crate::config::{MailConfig, PAYMENT_METHOD_PENDING_LABEL};
use crate::domain::Order;

/// Rendered invoice as delivered to API clients
#[derive(Debug, Serialize, ToSchema)]
pub struct InvoiceDocument {
    /// Self-contained HTML document
    pub invoice_html: String,
    /// Suggested download name, without extension
    pub filename: String,
    pub order_id: i64,
}

impl InvoiceDocument {
    pub fn render(order: &Order, mail: &MailConfig) -> Self {
        Self {
            invoice_html: render_invoice_html(order, mail),
            filename: invoice_filename(order),
            order_id: order.id,
        }
    }
}

fn usd(amount: Decimal) -> String {
    format!("${amount:.2}")
}

/// Invoice reference shown in the document header, e.g. `ON-000042`
pub fn invoice_number(order: &Order) -> String {
    format!("ON-{:06}", order.id)
}

/// Download name without extension, e.g. `Invoice-Order-000042-20250301`
pub fn invoice_filename(order: &Order) -> String {
    format!(
        "Invoice-Order-{:06}-{}",
        order.id,
        order.created_at.format("%Y%m%d")
    )
}

/// Render the full HTML invoice document for an order
pub fn render_invoice_html(order: &Order, mail: &MailConfig) -> String {
    let mut item_rows = String::new();
    let mut items_subtotal = Decimal::ZERO;
    for item in &order.items {
        let line_total = item.line_total();
        items_subtotal += line_total;
        item_rows.push_str(&format!(
            r#"<tr>
            <td>{name}</td>
            <td style="text-align: center;">{qty}</td>
            <td style="text-align: right;">{price}</td>
            <td style="text-align: right;">{total}</td>
        </tr>
"#,
            name = item.name,
            qty = item.qty,
            price = usd(item.price),
            total = usd(line_total),
        ));
    }

    let (ship_address, ship_city_postal, ship_country) = match order.shipping_address.as_ref() {
        Some(a) => (
            a.address.clone(),
            format!("{}, {}", a.city, a.postal_code),
            a.country.clone(),
        ),
        None => (String::new(), String::new(), String::new()),
    };

    let (buyer_name, buyer_email) = match order.customer.as_ref() {
        Some(c) => (c.name.clone(), c.email.clone()),
        None => (String::new(), String::new()),
    };

    let status_badge = if order.is_paid {
        let paid_on = order
            .paid_at
            .map(|d| format!(" on {}", d.format("%B %d, %Y")))
            .unwrap_or_default();
        format!(
            r#"<span style="color: #28a745; font-weight: bold;">&#10003; PAID{paid_on}</span>"#
        )
    } else {
        r#"<span style="color: #dc3545; font-weight: bold;">UNPAID</span>"#.to_string()
    };

    format!(
        r#"<!DOCTYPE html>
    <html>
    <head>
        <meta charset="utf-8">
        <style>
            * {{ margin: 0; padding: 0; box-sizing: border-box; }}
            body {{ font-family: 'Arial', sans-serif; background: white; color: #333; line-height: 1.6; }}
            .container {{ max-width: 800px; margin: 0 auto; padding: 40px; }}
            .header {{ display: flex; justify-content: space-between; align-items: center; margin-bottom: 40px; border-bottom: 2px solid #007bff; padding-bottom: 20px; }}
            .logo {{ font-size: 28px; font-weight: bold; color: #007bff; }}
            .invoice-title {{ font-size: 24px; font-weight: bold; }}
            .invoice-number {{ color: #666; margin-top: 5px; }}
            .section-title {{ font-size: 12px; font-weight: bold; color: #555; text-transform: uppercase; margin-bottom: 10px; letter-spacing: 1px; }}
            .section-content {{ margin-bottom: 20px; }}
            .info-row {{ display: flex; margin-bottom: 8px; }}
            table {{ width: 100%; border-collapse: collapse; margin: 20px 0; }}
            th {{ background-color: #f8f9fa; padding: 12px; text-align: left; font-weight: bold; border-bottom: 2px solid #dee2e6; }}
            td {{ padding: 12px; border-bottom: 1px solid #dee2e6; }}
            .total-section {{ display: flex; justify-content: flex-end; margin: 30px 0; }}
            .total-table {{ width: 300px; }}
            .total-table tr td {{ padding: 10px; }}
            .total-table .total-row {{ font-weight: bold; font-size: 18px; border-top: 2px solid #333; }}
            .total-table .total-row td {{ padding: 15px 10px; }}
            .footer {{ text-align: center; margin-top: 40px; padding-top: 20px; border-top: 1px solid #ddd; color: #666; font-size: 12px; }}
        </style>
    </head>
    <body>
        <div class="container">
            <div class="header">
                <div>
                    <div class="logo">{store}</div>
                    <div class="invoice-number">E-Commerce Platform</div>
                </div>
                <div style="text-align: right;">
                    <div class="invoice-title">INVOICE</div>
                    <div class="invoice-number">#{number}</div>
                </div>
            </div>

            <div style="display: grid; grid-template-columns: 1fr 1fr; gap: 40px; margin-bottom: 40px;">
                <div>
                    <div class="section-title">Bill To</div>
                    <div class="section-content">
                        <div class="info-row">
                            <span>{buyer_name}</span>
                        </div>
                        <div class="info-row">
                            <span>{buyer_email}</span>
                        </div>
                    </div>
                </div>

                <div>
                    <div class="section-title">Ship To</div>
                    <div class="section-content">
                        <div class="info-row">
                            <span>{ship_address}</span>
                        </div>
                        <div class="info-row">
                            <span>{ship_city_postal}</span>
                        </div>
                        <div class="info-row">
                            <span>{ship_country}</span>
                        </div>
                    </div>
                </div>
            </div>

            <div style="display: grid; grid-template-columns: 1fr 1fr 1fr; gap: 20px; margin-bottom: 40px;">
                <div>
                    <div class="section-title">Order Date</div>
                    <div class="section-content">{order_date}</div>
                </div>
                <div>
                    <div class="section-title">Payment Method</div>
                    <div class="section-content">{payment_method}</div>
                </div>
                <div>
                    <div class="section-title">Status</div>
                    <div class="section-content">{status_badge}</div>
                </div>
            </div>

            <table>
                <thead>
                    <tr>
                        <th>Item Description</th>
                        <th style="text-align: center; width: 80px;">Qty</th>
                        <th style="text-align: right; width: 100px;">Unit Price</th>
                        <th style="text-align: right; width: 100px;">Amount</th>
                    </tr>
                </thead>
                <tbody>
                    {item_rows}
                </tbody>
            </table>

            <div class="total-section">
                <table class="total-table">
                    <tr>
                        <td style="text-align: right;">Subtotal:</td>
                        <td style="text-align: right;">{subtotal}</td>
                    </tr>
                    <tr>
                        <td style="text-align: right;">Shipping:</td>
                        <td style="text-align: right;">{shipping}</td>
                    </tr>
                    <tr>
                        <td style="text-align: right;">Tax:</td>
                        <td style="text-align: right;">{tax}</td>
                    </tr>
                    <tr class="total-row">
                        <td style="text-align: right;">Total:</td>
                        <td style="text-align: right;">{total}</td>
                    </tr>
                </table>
            </div>

            <div class="footer">
                <p>Thank you for your purchase!</p>
                <p>For support, contact: {support}</p>
                <p>&copy; {year} {store}. All rights reserved.</p>
            </div>
        </div>
    </body>
    </html>"#,
        store = mail.store_name,
        number = invoice_number(order),
        buyer_name = buyer_name,
        buyer_email = buyer_email,
        ship_address = ship_address,
        ship_city_postal = ship_city_postal,
        ship_country = ship_country,
        order_date = order.created_at.format("%B %d, %Y"),
        payment_method = order
            .payment_method
            .as_deref()
            .unwrap_or(PAYMENT_METHOD_PENDING_LABEL),
        status_badge = status_badge,
        item_rows = item_rows,
        subtotal = usd(items_subtotal),
        shipping = usd(order.shipping_price),
        tax = usd(order.tax_price),
        total = usd(order.total_price),
        support = mail.support_email,
        year = chrono::Utc::now().format("%Y"),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{OrderCustomer, OrderItem, OrderStatus, ShippingAddress};
    use chrono::{TimeZone, Utc};
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
            payment_method: None,
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
            items: vec![
                OrderItem {
                    id: 1,
                    product_id: Some(7),
                    name: "Silk Scarf".to_string(),
                    qty: 2,
                    price: dec!(43.00),
                    image: "/placeholder.png".to_string(),
                },
                OrderItem {
                    id: 2,
                    product_id: None,
                    name: "Gift Wrap".to_string(),
                    qty: 1,
                    price: dec!(0.00),
                    image: "/placeholder.png".to_string(),
                },
            ],
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
    fn test_invoice_number_is_zero_padded() {
        assert_eq!(invoice_number(&sample_order()), "ON-000042");
    }

    #[test]
    fn test_invoice_filename_uses_creation_date() {
        assert_eq!(invoice_filename(&sample_order()), "Invoice-Order-000042-20250301");
    }

    #[test]
    fn test_unpaid_invoice_shows_unpaid_badge_and_pending_method() {
        let html = render_invoice_html(&sample_order(), &mail_config());

        assert!(html.contains("#ON-000042"));
        assert!(html.contains("UNPAID"));
        assert!(!html.contains("PAID on"));
        assert!(html.contains(r#"<div class="section-content">Pending</div>"#));
        assert!(html.contains("March 01, 2025"));
    }

    #[test]
    fn test_paid_invoice_shows_paid_badge_with_date() {
        let mut order = sample_order();
        order.is_paid = true;
        order.paid_at = Some(Utc.with_ymd_and_hms(2025, 3, 5, 9, 0, 0).unwrap());
        order.payment_method = Some("Transfer".to_string());

        let html = render_invoice_html(&order, &mail_config());

        assert!(html.contains("PAID on March 05, 2025"));
        assert!(html.contains(r#"<div class="section-content">Transfer</div>"#));
    }

    #[test]
    fn test_invoice_subtotal_sums_line_totals() {
        let html = render_invoice_html(&sample_order(), &mail_config());

        // 2 x 43.00 + 1 x 0.00
        assert!(html.contains("$86.00"));
        assert!(html.contains("Silk Scarf"));
        assert!(html.contains("Gift Wrap"));
        assert!(html.contains("ada@example.com"));
        assert!(html.contains("Lagos, 100001"));
    }
}
