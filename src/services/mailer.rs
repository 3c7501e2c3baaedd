//! Outbound mail dispatch.
//!
//! Services hand fully rendered emails to a `Mailer`. The production
//! implementation pushes them onto the shared apalis Postgres queue for
//! the worker process (`jobs work`) to deliver. Callers treat dispatch
//! as best-effort: a failed enqueue is logged at the call site, never
//! surfaced to the customer.

use apalis::prelude::Storage;
use apalis_sql::postgres::PostgresStorage;
use async_trait::async_trait;
#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

use crate::errors::{AppError, AppResult};
use crate::jobs::EmailJob;

/// Mail dispatch trait for dependency injection
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait Mailer: Send + Sync {
    /// Queue one email for delivery
    async fn send(&self, email: EmailJob) -> AppResult<()>;
}

/// Queue-backed mailer over apalis Postgres storage
pub struct QueueMailer {
    storage: PostgresStorage<EmailJob>,
}

impl QueueMailer {
    pub fn new(storage: PostgresStorage<EmailJob>) -> Self {
        Self { storage }
    }
}

#[async_trait]
impl Mailer for QueueMailer {
    async fn send(&self, email: EmailJob) -> AppResult<()> {
        // Storage::push wants &mut; the storage is a cheap pool handle clone.
        let mut storage = self.storage.clone();
        storage
            .push(email)
            .await
            .map_err(|e| AppError::internal(format!("Failed to enqueue email job: {e}")))?;
        Ok(())
    }
}
