//! User service - Handles account profile and admin user management.
//!
//! SOLID (SRP): Handles user-related use cases only.
//! DDD: Orchestrates domain operations via Unit of Work.

use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::{Password, User};
use crate::errors::{AppError, AppResult};
use crate::infra::UnitOfWork;
use crate::types::PaginationParams;

/// User service trait for dependency injection.
///
/// Profile methods act on the calling account; the remaining methods are
/// admin maintenance over arbitrary accounts.
#[async_trait]
pub trait UserService: Send + Sync {
    /// Get the calling user's profile
    async fn get_profile(&self, user_id: Uuid) -> AppResult<User>;

    /// Update the calling user's profile; a new password is re-hashed
    async fn update_profile(
        &self,
        user_id: Uuid,
        name: Option<String>,
        email: Option<String>,
        password: Option<String>,
    ) -> AppResult<User>;

    /// List users, optionally filtered by an email/name search term
    async fn list_users(
        &self,
        search: Option<String>,
        pagination: &PaginationParams,
    ) -> AppResult<(Vec<User>, u64)>;

    /// Get user by ID
    async fn get_user(&self, id: Uuid) -> AppResult<User>;

    /// Update user details, including role and password resets
    async fn update_user(
        &self,
        id: Uuid,
        name: Option<String>,
        email: Option<String>,
        role: Option<String>,
        password: Option<String>,
    ) -> AppResult<User>;

    /// Permanently delete a user; their orders keep a null user ref
    async fn delete_user(&self, id: Uuid) -> AppResult<()>;
}

/// Concrete implementation of UserService using Unit of Work.
pub struct UserManager<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> UserManager<U> {
    /// Create new user service instance with Unit of Work
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }

    /// Reject an email change that would collide with another account
    async fn check_email_available(&self, email: &str, user_id: Uuid) -> AppResult<()> {
        if let Some(existing) = self.uow.users().find_by_email(email).await? {
            if existing.id != user_id {
                return Err(AppError::conflict("User"));
            }
        }
        Ok(())
    }
}

#[async_trait]
impl<U: UnitOfWork> UserService for UserManager<U> {
    async fn get_profile(&self, user_id: Uuid) -> AppResult<User> {
        self.uow
            .users()
            .find_by_id(user_id)
            .await?
            .ok_or(AppError::NotFound)
    }

    async fn update_profile(
        &self,
        user_id: Uuid,
        name: Option<String>,
        email: Option<String>,
        password: Option<String>,
    ) -> AppResult<User> {
        if let Some(email) = email.as_deref() {
            self.check_email_available(email, user_id).await?;
        }

        let password_hash = match password {
            Some(p) => Some(Password::new(&p)?.into_string()),
            None => None,
        };

        self.uow
            .users()
            .update(user_id, name, email, None, password_hash)
            .await
    }

    async fn list_users(
        &self,
        search: Option<String>,
        pagination: &PaginationParams,
    ) -> AppResult<(Vec<User>, u64)> {
        self.uow.users().list(search, pagination).await
    }

    async fn get_user(&self, id: Uuid) -> AppResult<User> {
        self.uow
            .users()
            .find_by_id(id)
            .await?
            .ok_or(AppError::NotFound)
    }

    async fn update_user(
        &self,
        id: Uuid,
        name: Option<String>,
        email: Option<String>,
        role: Option<String>,
        password: Option<String>,
    ) -> AppResult<User> {
        if let Some(email) = email.as_deref() {
            self.check_email_available(email, id).await?;
        }

        let password_hash = match password {
            Some(p) => Some(Password::new(&p)?.into_string()),
            None => None,
        };

        self.uow
            .users()
            .update(id, name, email, role, password_hash)
            .await
    }

    async fn delete_user(&self, id: Uuid) -> AppResult<()> {
        self.uow.users().delete(id).await
    }
}
