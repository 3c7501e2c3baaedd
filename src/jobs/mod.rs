//! Background job definitions.
//!
//! Jobs are serialized onto the Postgres-backed apalis queue and picked
//! up by the worker process (`jobs work`).

pub mod email_job;

pub use email_job::{email_job_handler, EmailJob};
