//! Application settings loaded from environment variables.

use std::env;

use super::constants::{
    DEFAULT_ADMIN_EMAIL, DEFAULT_DATABASE_URL, DEFAULT_FROM_ADDRESS, DEFAULT_JWT_EXPIRATION_HOURS,
    DEFAULT_STORE_NAME, DEFAULT_STORE_URL, DEFAULT_SUPPORT_EMAIL, MIN_JWT_SECRET_LENGTH,
};

/// Application configuration
#[derive(Clone)]
pub struct Config {
    pub database_url: String,
    jwt_secret: String,
    pub jwt_expiration_hours: i64,
    pub mail: MailConfig,
}

/// Outbound mail settings.
///
/// Kept explicit rather than falling back to server-wide defaults so
/// misconfiguration shows up as a missing variable, not silently wrong
/// sender addresses on customer mail.
#[derive(Clone, Debug)]
pub struct MailConfig {
    /// Sender address on all outbound mail
    pub from_address: String,
    /// Receives copies of contact form messages
    pub admin_email: String,
    /// Display name used in templates and subjects
    pub store_name: String,
    /// Shown in email footers for customer replies
    pub support_email: String,
    /// Storefront base URL for order links inside emails
    pub store_url: String,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("database_url", &"[REDACTED]")
            .field("jwt_secret", &"[REDACTED]")
            .field("jwt_expiration_hours", &self.jwt_expiration_hours)
            .field("mail", &self.mail)
            .finish()
    }
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// # Panics
    /// Panics if JWT_SECRET is not set or is too short (security requirement).
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let jwt_secret = env::var("JWT_SECRET").unwrap_or_else(|_| {
            if cfg!(debug_assertions) {
                // Development mode: use default but warn
                tracing::warn!("JWT_SECRET not set, using insecure default for development");
                "dev-secret-key-minimum-32-chars!!".to_string()
            } else {
                // Production mode: panic
                panic!("JWT_SECRET environment variable must be set in production");
            }
        });

        // Validate JWT secret length
        if jwt_secret.len() < MIN_JWT_SECRET_LENGTH {
            panic!(
                "JWT_SECRET must be at least {} characters long",
                MIN_JWT_SECRET_LENGTH
            );
        }

        Self {
            database_url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string()),
            jwt_secret,
            jwt_expiration_hours: env::var("JWT_EXPIRATION_HOURS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_JWT_EXPIRATION_HOURS),
            mail: MailConfig::from_env(),
        }
    }

    /// Get JWT secret bytes for token signing/verification.
    pub fn jwt_secret_bytes(&self) -> &[u8] {
        self.jwt_secret.as_bytes()
    }
}

impl MailConfig {
    pub fn from_env() -> Self {
        Self {
            from_address: env::var("MAIL_FROM")
                .unwrap_or_else(|_| DEFAULT_FROM_ADDRESS.to_string()),
            admin_email: env::var("ADMIN_EMAIL").unwrap_or_else(|_| DEFAULT_ADMIN_EMAIL.to_string()),
            store_name: env::var("STORE_NAME").unwrap_or_else(|_| DEFAULT_STORE_NAME.to_string()),
            support_email: env::var("SUPPORT_EMAIL")
                .unwrap_or_else(|_| DEFAULT_SUPPORT_EMAIL.to_string()),
            store_url: env::var("STORE_URL").unwrap_or_else(|_| DEFAULT_STORE_URL.to_string()),
        }
    }
}
