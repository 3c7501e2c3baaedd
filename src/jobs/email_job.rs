//! Email background job.
//!
//! Store mail (order confirmations, payment receipts, shipping notices,
//! transfer reminders, refund notices, contact alerts) is rendered up
//! front and carried here as finished subject/body strings. Without SMTP
//! settings the handler logs the message instead of sending, so local
//! runs never need a mail server.

use serde::{Deserialize, Serialize};
use std::env;

use crate::config::DEFAULT_FROM_ADDRESS;
use crate::errors::AppError;

/// Email job payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmailJob {
    /// Recipient email address
    pub to: String,
    /// Email subject line
    pub subject: String,
    /// Plain text body
    pub body: String,
    /// Optional HTML alternative body
    #[serde(default)]
    pub html_body: Option<String>,
    /// Optional sender override (defaults to the configured from address)
    #[serde(default)]
    pub from: Option<String>,
}

impl EmailJob {
    /// Create a new plain text email job
    pub fn new(to: impl Into<String>, subject: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            to: to.into(),
            subject: subject.into(),
            body: body.into(),
            html_body: None,
            from: None,
        }
    }

    /// Attach an HTML alternative body
    pub fn with_html(mut self, html: impl Into<String>) -> Self {
        self.html_body = Some(html.into());
        self
    }

    /// Set custom sender address
    pub fn with_from(mut self, from: impl Into<String>) -> Self {
        self.from = Some(from.into());
        self
    }
}

/// SMTP transport configuration from environment
struct EmailConfig {
    smtp_host: Option<String>,
    #[allow(dead_code)]
    smtp_port: u16,
    #[allow(dead_code)]
    smtp_user: Option<String>,
    #[allow(dead_code)]
    smtp_password: Option<String>,
    from_address: String,
}

impl EmailConfig {
    fn from_env() -> Self {
        Self {
            smtp_host: env::var("SMTP_HOST").ok(),
            smtp_port: env::var("SMTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(587),
            smtp_user: env::var("SMTP_USER").ok(),
            smtp_password: env::var("SMTP_PASSWORD").ok(),
            from_address: env::var("MAIL_FROM")
                .unwrap_or_else(|_| DEFAULT_FROM_ADDRESS.to_string()),
        }
    }

    fn is_configured(&self) -> bool {
        self.smtp_host.is_some()
    }
}

/// Email job handler - processes queued store mail
pub async fn email_job_handler(job: EmailJob) -> Result<(), AppError> {
    let config = EmailConfig::from_env();
    let from = job.from.as_deref().unwrap_or(&config.from_address);

    tracing::info!(
        to = %job.to,
        from = %from,
        subject = %job.subject,
        "Processing email job"
    );

    if !config.is_configured() {
        // Development mode: log the email instead of sending
        tracing::warn!("SMTP not configured - logging email instead of sending");
        tracing::info!(
            "=== EMAIL (not sent) ===\n\
             From: {}\n\
             To: {}\n\
             Subject: {}\n\
             Body:\n{}\n\
             HTML alternative: {}\n\
             ========================",
            from,
            job.to,
            job.subject,
            job.body,
            if job.html_body.is_some() { "yes" } else { "no" },
        );
        return Ok(());
    }

    // SMTP relay delivery is not wired up yet; lettre with tokio1-native-tls
    // is the planned transport. Until then a configured host still logs.
    tracing::warn!(
        "SMTP is configured but no transport is compiled in - email logged, not sent"
    );

    tokio::time::sleep(tokio::time::Duration::from_millis(100)).await;

    tracing::info!(to = %job.to, "Email processed successfully");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email_job_builders() {
        let job = EmailJob::new("buyer@example.com", "Hello", "plain body")
            .with_html("<p>plain body</p>")
            .with_from("orders@example.com");

        assert_eq!(job.to, "buyer@example.com");
        assert_eq!(job.subject, "Hello");
        assert_eq!(job.body, "plain body");
        assert_eq!(job.html_body.as_deref(), Some("<p>plain body</p>"));
        assert_eq!(job.from.as_deref(), Some("orders@example.com"));
    }

    #[test]
    fn test_email_job_serde_defaults_optional_fields() {
        let job: EmailJob = serde_json::from_str(
            r#"{"to":"a@b.com","subject":"s","body":"b"}"#,
        )
        .unwrap();

        assert!(job.html_body.is_none());
        assert!(job.from.is_none());
    }
}
