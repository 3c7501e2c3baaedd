//! Contact message entity and related types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

/// Message sent through the storefront contact form
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ContactMessage {
    pub id: i64,
    /// Sender account; None once the account is deleted
    pub user_id: Option<Uuid>,
    pub email: Option<String>,
    pub subject: Option<String>,
    pub message: String,
    pub is_read: bool,
    pub admin_reply: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Contact form payload
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateContactMessage {
    /// Reply-to address; defaults to the sender's account email
    #[validate(email(message = "Invalid email address"))]
    pub email: Option<String>,
    #[schema(example = "Question about my order")]
    pub subject: Option<String>,
    #[validate(length(min = 1, message = "Message is required"))]
    pub message: String,
}

/// Admin update: mark read and attach a reply
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct UpdateContactMessage {
    pub is_read: Option<bool>,
    pub admin_reply: Option<String>,
}
