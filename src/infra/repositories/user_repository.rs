//! User repository - pooled data access for user accounts.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;
use sea_orm::sea_query::extension::postgres::PgExpr;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

use super::base::{ReadRepository, WriteRepository};
use super::entities::user::{self, ActiveModel, Entity as UserEntity, Model as UserModel};
use crate::domain::User;
use crate::errors::{AppError, AppResult};
use crate::types::PaginationParams;

/// User repository trait for dependency injection
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>>;

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>>;

    /// List users, optionally matching name or email, newest first
    async fn list(
        &self,
        search: Option<String>,
        pagination: &PaginationParams,
    ) -> AppResult<(Vec<User>, u64)>;

    async fn create(&self, email: String, password_hash: String, name: String) -> AppResult<User>;

    /// Update user fields; absent fields are untouched
    async fn update(
        &self,
        id: Uuid,
        name: Option<String>,
        email: Option<String>,
        role: Option<String>,
        password_hash: Option<String>,
    ) -> AppResult<User>;

    async fn delete(&self, id: Uuid) -> AppResult<()>;

    async fn count(&self) -> AppResult<u64>;

    /// Accounts created at or after the given instant
    async fn count_since(&self, since: DateTime<Utc>) -> AppResult<u64>;
}

/// SeaORM-backed user repository
pub struct UserStore {
    db: DatabaseConnection,
}

impl UserStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

impl ReadRepository<UserEntity, UserModel> for UserStore {
    fn db(&self) -> &DatabaseConnection {
        &self.db
    }
}

impl WriteRepository<UserEntity, UserModel, ActiveModel> for UserStore {
    fn db(&self) -> &DatabaseConnection {
        &self.db
    }
}

#[async_trait]
impl UserRepository for UserStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>> {
        let model = ReadRepository::find_by_id(self, id).await?;
        Ok(model.map(User::from))
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let model = UserEntity::find()
            .filter(user::Column::Email.eq(email))
            .one(&self.db)
            .await?;

        Ok(model.map(User::from))
    }

    async fn list(
        &self,
        search: Option<String>,
        pagination: &PaginationParams,
    ) -> AppResult<(Vec<User>, u64)> {
        let mut query = UserEntity::find().order_by_desc(user::Column::CreatedAt);

        if let Some(term) = search.filter(|t| !t.is_empty()) {
            let pattern = format!("%{term}%");
            query = query.filter(
                sea_orm::Condition::any()
                    .add(Expr::col(user::Column::Name).ilike(pattern.as_str()))
                    .add(Expr::col(user::Column::Email).ilike(pattern.as_str())),
            );
        }

        let paginator = query.paginate(&self.db, pagination.limit());
        let total = paginator.num_items().await?;
        let models = paginator
            .fetch_page(pagination.page.saturating_sub(1))
            .await?;

        Ok((models.into_iter().map(User::from).collect(), total))
    }

    async fn create(&self, email: String, password_hash: String, name: String) -> AppResult<User> {
        use crate::config::ROLE_USER;

        let now = Utc::now();
        let active = ActiveModel {
            id: Set(Uuid::new_v4()),
            email: Set(email),
            password_hash: Set(password_hash),
            name: Set(name),
            role: Set(ROLE_USER.to_string()),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let model = WriteRepository::insert(self, active).await?;
        Ok(User::from(model))
    }

    async fn update(
        &self,
        id: Uuid,
        name: Option<String>,
        email: Option<String>,
        role: Option<String>,
        password_hash: Option<String>,
    ) -> AppResult<User> {
        let model = ReadRepository::find_by_id(self, id)
            .await?
            .ok_or(AppError::NotFound)?;

        let mut active: ActiveModel = model.into();
        if let Some(name) = name {
            active.name = Set(name);
        }
        if let Some(email) = email {
            active.email = Set(email);
        }
        if let Some(role) = role {
            active.role = Set(role);
        }
        if let Some(hash) = password_hash {
            active.password_hash = Set(hash);
        }
        active.updated_at = Set(Utc::now());

        let model = WriteRepository::update(self, active).await?;
        Ok(User::from(model))
    }

    async fn delete(&self, id: Uuid) -> AppResult<()> {
        let result = UserEntity::delete_by_id(id).exec(&self.db).await?;
        if result.rows_affected == 0 {
            return Err(AppError::NotFound);
        }
        Ok(())
    }

    async fn count(&self) -> AppResult<u64> {
        ReadRepository::count(self).await
    }

    async fn count_since(&self, since: DateTime<Utc>) -> AppResult<u64> {
        UserEntity::find()
            .filter(user::Column::CreatedAt.gte(since))
            .count(&self.db)
            .await
            .map_err(Into::into)
    }
}
