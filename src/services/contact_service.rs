//! Contact message service - Stores customer messages and alerts admins.
//!
//! SOLID (SRP): Handles contact form use cases only.
//! DDD: Orchestrates domain operations via Unit of Work.

use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

use crate::config::MailConfig;
use crate::domain::{ContactMessage, CreateContactMessage, UpdateContactMessage};
use crate::errors::{AppError, AppResult};
use crate::infra::UnitOfWork;
use crate::services::mailer::Mailer;
use crate::types::PaginationParams;
use crate::utils::emails;

/// Contact message service trait for dependency injection
#[async_trait]
pub trait ContactService: Send + Sync {
    /// Store a message from an authenticated user, alerting the admin
    async fn create_message(
        &self,
        user_id: Uuid,
        caller_email: &str,
        data: CreateContactMessage,
    ) -> AppResult<ContactMessage>;

    /// List messages, newest first, with optional search and unread filter
    async fn list_messages(
        &self,
        search: Option<String>,
        unread: Option<bool>,
        pagination: &PaginationParams,
    ) -> AppResult<(Vec<ContactMessage>, u64)>;

    /// Get message by ID
    async fn get_message(&self, id: i64) -> AppResult<ContactMessage>;

    /// Mark read and/or attach an admin reply
    async fn update_message(&self, id: i64, data: UpdateContactMessage)
        -> AppResult<ContactMessage>;
}

/// Concrete implementation of ContactService using Unit of Work.
pub struct ContactManager<U: UnitOfWork> {
    uow: Arc<U>,
    mailer: Arc<dyn Mailer>,
    mail: MailConfig,
}

impl<U: UnitOfWork> ContactManager<U> {
    /// Create new contact service instance with Unit of Work
    pub fn new(uow: Arc<U>, mailer: Arc<dyn Mailer>, mail: MailConfig) -> Self {
        Self { uow, mailer, mail }
    }
}

#[async_trait]
impl<U: UnitOfWork> ContactService for ContactManager<U> {
    async fn create_message(
        &self,
        user_id: Uuid,
        caller_email: &str,
        data: CreateContactMessage,
    ) -> AppResult<ContactMessage> {
        let email = data
            .email
            .filter(|e| !e.is_empty())
            .unwrap_or_else(|| caller_email.to_string());

        let message = self
            .uow
            .contacts()
            .create(user_id, Some(email), data.subject, data.message)
            .await?;

        // Best-effort admin alert; a queue failure never fails the request
        let alert = emails::contact_notice(&message, &self.mail);
        if let Err(e) = self.mailer.send(alert).await {
            tracing::warn!(message_id = message.id, "Failed to queue contact alert: {}", e);
        }

        Ok(message)
    }

    async fn list_messages(
        &self,
        search: Option<String>,
        unread: Option<bool>,
        pagination: &PaginationParams,
    ) -> AppResult<(Vec<ContactMessage>, u64)> {
        self.uow.contacts().list(search, unread, pagination).await
    }

    async fn get_message(&self, id: i64) -> AppResult<ContactMessage> {
        self.uow
            .contacts()
            .find_by_id(id)
            .await?
            .ok_or(AppError::NotFound)
    }

    async fn update_message(
        &self,
        id: i64,
        data: UpdateContactMessage,
    ) -> AppResult<ContactMessage> {
        self.uow.contacts().update(id, data).await
    }
}
