//! Contact message repository.

use async_trait::async_trait;
use chrono::Utc;
#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;
use sea_orm::sea_query::extension::postgres::PgExpr;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

use super::entities::contact_message::{self, ActiveModel, Entity as ContactMessageEntity};
use crate::domain::{ContactMessage, UpdateContactMessage};
use crate::errors::{AppError, AppResult};
use crate::types::PaginationParams;

/// Contact message repository trait for dependency injection
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait ContactRepository: Send + Sync {
    async fn create(
        &self,
        user_id: Uuid,
        email: Option<String>,
        subject: Option<String>,
        message: String,
    ) -> AppResult<ContactMessage>;

    async fn find_by_id(&self, id: i64) -> AppResult<Option<ContactMessage>>;

    /// List messages, optionally matching body, email, or subject, newest first
    async fn list(
        &self,
        search: Option<String>,
        unread: Option<bool>,
        pagination: &PaginationParams,
    ) -> AppResult<(Vec<ContactMessage>, u64)>;

    async fn update(&self, id: i64, data: UpdateContactMessage) -> AppResult<ContactMessage>;
}

/// SeaORM-backed contact message repository
pub struct ContactStore {
    db: DatabaseConnection,
}

impl ContactStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ContactRepository for ContactStore {
    async fn create(
        &self,
        user_id: Uuid,
        email: Option<String>,
        subject: Option<String>,
        message: String,
    ) -> AppResult<ContactMessage> {
        let active = ActiveModel {
            user_id: Set(Some(user_id)),
            email: Set(email),
            subject: Set(subject),
            message: Set(message),
            is_read: Set(false),
            admin_reply: Set(None),
            created_at: Set(Utc::now()),
            ..Default::default()
        };

        let model = active.insert(&self.db).await?;
        Ok(ContactMessage::from(model))
    }

    async fn find_by_id(&self, id: i64) -> AppResult<Option<ContactMessage>> {
        let model = ContactMessageEntity::find_by_id(id).one(&self.db).await?;
        Ok(model.map(ContactMessage::from))
    }

    async fn list(
        &self,
        search: Option<String>,
        unread: Option<bool>,
        pagination: &PaginationParams,
    ) -> AppResult<(Vec<ContactMessage>, u64)> {
        let mut query =
            ContactMessageEntity::find().order_by_desc(contact_message::Column::CreatedAt);

        if let Some(term) = search.filter(|t| !t.is_empty()) {
            let pattern = format!("%{term}%");
            query = query.filter(
                Condition::any()
                    .add(Expr::col(contact_message::Column::Message).ilike(pattern.as_str()))
                    .add(Expr::col(contact_message::Column::Email).ilike(pattern.as_str()))
                    .add(Expr::col(contact_message::Column::Subject).ilike(pattern.as_str())),
            );
        }
        if unread == Some(true) {
            query = query.filter(contact_message::Column::IsRead.eq(false));
        }

        let paginator = query.paginate(&self.db, pagination.limit());
        let total = paginator.num_items().await?;
        let models = paginator
            .fetch_page(pagination.page.saturating_sub(1))
            .await?;

        Ok((models.into_iter().map(ContactMessage::from).collect(), total))
    }

    async fn update(&self, id: i64, data: UpdateContactMessage) -> AppResult<ContactMessage> {
        let model = ContactMessageEntity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(AppError::NotFound)?;

        let mut active: ActiveModel = model.into();
        if let Some(is_read) = data.is_read {
            active.is_read = Set(is_read);
        }
        if let Some(reply) = data.admin_reply {
            active.admin_reply = Set(Some(reply));
        }

        let model = active.update(&self.db).await?;
        Ok(ContactMessage::from(model))
    }
}
