//! OpenAPI documentation configuration.
//!
//! Provides Swagger UI for API exploration and testing.

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::api::handlers::{
    analytics_handler, auth_handler, contact_handler, order_handler, product_handler,
    user_handler, wishlist_handler,
};
use crate::domain::{
    AdminOrderUpdate, ContactMessage, CreateContactMessage, CreateOrder, CreateOrderItem,
    CreateProduct, CreateShippingAddress, OrderCustomer, OrderItem, OrderResponse, OrderStatus,
    Product, ProductSort, RefundRequest, ShippingAddress, TrackingUpdate, UpdateContactMessage,
    UpdateProduct, UserResponse, UserRole, WishlistStatus,
};
use crate::infra::{PaymentMethodStat, StatusCount, TopProduct};
use crate::services::{AnalyticsResponse, AnalyticsSummary, TokenResponse};
use crate::utils::invoice::InvoiceDocument;

/// OpenAPI documentation for the storefront API
#[derive(OpenApi)]
#[openapi(
    info(
        title = "mamigloexclusive API",
        version = "0.1.0",
        description = "E-commerce storefront backend with order lifecycle, bank-transfer verification, and admin analytics",
        contact(name = "API Support", email = "support@mamigloexclusive.com")
    ),
    servers(
        (url = "/api", description = "Storefront API root")
    ),
    paths(
        // Authentication endpoints
        auth_handler::register,
        auth_handler::login,
        // User endpoints
        user_handler::get_profile,
        user_handler::update_profile,
        user_handler::list_users,
        user_handler::get_user,
        user_handler::update_user,
        user_handler::delete_user,
        // Product endpoints
        product_handler::list_products,
        product_handler::get_product,
        product_handler::create_product,
        product_handler::update_product,
        product_handler::delete_product,
        // Order endpoints
        order_handler::place_order,
        order_handler::list_orders,
        order_handler::my_orders,
        order_handler::get_order,
        order_handler::pay_order,
        order_handler::confirm_transfer,
        order_handler::approve_transfer,
        order_handler::get_tracking,
        order_handler::update_tracking,
        order_handler::refund_order,
        order_handler::admin_update_order,
        order_handler::delete_order,
        order_handler::get_invoice,
        order_handler::get_invoice_pdf,
        // Wishlist endpoints
        wishlist_handler::list_wishlist,
        wishlist_handler::add_to_wishlist,
        wishlist_handler::remove_from_wishlist,
        wishlist_handler::check_wishlist,
        // Contact message endpoints
        contact_handler::create_message,
        contact_handler::list_messages,
        contact_handler::get_message,
        contact_handler::update_message,
        // Analytics endpoints
        analytics_handler::dashboard,
    ),
    components(
        schemas(
            // Domain types
            UserRole,
            UserResponse,
            Product,
            ProductSort,
            CreateProduct,
            UpdateProduct,
            OrderStatus,
            OrderCustomer,
            OrderItem,
            ShippingAddress,
            OrderResponse,
            CreateOrder,
            CreateOrderItem,
            CreateShippingAddress,
            TrackingUpdate,
            AdminOrderUpdate,
            RefundRequest,
            ContactMessage,
            CreateContactMessage,
            UpdateContactMessage,
            WishlistStatus,
            InvoiceDocument,
            // Analytics types
            AnalyticsResponse,
            AnalyticsSummary,
            StatusCount,
            PaymentMethodStat,
            TopProduct,
            // Auth types
            auth_handler::RegisterRequest,
            auth_handler::LoginRequest,
            auth_handler::AuthResponse,
            TokenResponse,
            // Handler request/response types
            user_handler::UpdateProfileRequest,
            user_handler::AdminUpdateUserRequest,
            order_handler::OrderActionResponse,
            order_handler::TrackingResponse,
            order_handler::InvoicePdfFallback,
            wishlist_handler::WishlistItemRequest,
            wishlist_handler::WishlistResponse,
            wishlist_handler::WishlistActionResponse,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Authentication", description = "User registration and login"),
        (name = "Users", description = "Profile and admin user management"),
        (name = "Products", description = "Product catalog"),
        (name = "Orders", description = "Order lifecycle from checkout to refund"),
        (name = "Wishlist", description = "Saved products"),
        (name = "Messages", description = "Contact form and admin triage"),
        (name = "Analytics", description = "Admin dashboard metrics")
    )
)]
pub struct ApiDoc;

/// Security scheme modifier for JWT Bearer authentication
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("JWT token obtained from /api/users/login"))
                        .build(),
                ),
            );
        }
    }
}
