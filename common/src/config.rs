//! Global application configuration.
//!
//! `Config` is a lazily initialized, process-wide singleton loaded from
//! environment variables (with optional `.env` file support via `dotenvy`).

use once_cell::sync::OnceCell;
use serde::Deserialize;
use std::env;

/// Weak development-only fallback signing key. Never used outside
/// `development`/`test`: startup fails closed when `JWT_SECRET` is unset in
/// any other environment.
const DEV_JWT_SECRET: &str = "mysecretkey";

#[derive(Debug, Deserialize)]
pub struct Config {
    pub env: String,
    pub project_name: String,
    pub log_level: String,
    pub log_file: String,
    pub log_to_stdout: bool,
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub jwt_secret: String,
    pub jwt_duration_minutes: u64,
    pub reset_token_expiry_minutes: i64,
    pub smtp_host: String,
    pub smtp_username: String,
    pub smtp_password: String,
    pub email_from_name: String,
    pub frontend_url: String,
    pub stripe_secret_key: String,
    pub stripe_webhook_secret: String,
}

static CONFIG: OnceCell<Config> = OnceCell::new();

impl Config {
    fn from_env() -> Self {
        let env_name = env::var("APP_ENV").unwrap_or_else(|_| "development".into());

        let jwt_secret = match env::var("JWT_SECRET") {
            Ok(secret) if !secret.is_empty() => secret,
            _ if matches!(env_name.as_str(), "development" | "test") => {
                log::warn!("JWT_SECRET not set; using the development fallback key");
                DEV_JWT_SECRET.into()
            }
            _ => panic!("JWT_SECRET must be set when APP_ENV is not development/test"),
        };

        Config {
            env: env_name,
            project_name: env::var("PROJECT_NAME").unwrap_or_else(|_| "fitmat-api".into()),
            log_level: env::var("LOG_LEVEL").unwrap_or_else(|_| "api=info".into()),
            log_file: env::var("LOG_FILE").unwrap_or_else(|_| "api.log".into()),
            log_to_stdout: env::var("LOG_TO_STDOUT").unwrap_or_else(|_| "false".into()) == "true",
            database_url: env::var("DATABASE_URL").expect("DATABASE_URL must be set"),
            host: env::var("HOST").unwrap_or_else(|_| "127.0.0.1".into()),
            port: env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(4000),
            jwt_secret,
            // Sessions default to one week.
            jwt_duration_minutes: env::var("JWT_DURATION_MINUTES")
                .ok()
                .and_then(|m| m.parse().ok())
                .unwrap_or(7 * 24 * 60),
            reset_token_expiry_minutes: env::var("RESET_TOKEN_EXPIRY_MINUTES")
                .ok()
                .and_then(|m| m.parse().ok())
                .unwrap_or(60),
            smtp_host: env::var("SMTP_HOST").unwrap_or_else(|_| "smtp.gmail.com".into()),
            smtp_username: env::var("EMAIL_USER").unwrap_or_default(),
            smtp_password: env::var("EMAIL_PASSWORD").unwrap_or_default(),
            email_from_name: env::var("EMAIL_FROM_NAME").unwrap_or_else(|_| "Fitmat Support".into()),
            frontend_url: env::var("FRONTEND_URL").unwrap_or_default(),
            stripe_secret_key: env::var("STRIPE_SECRET_KEY").unwrap_or_default(),
            stripe_webhook_secret: env::var("STRIPE_WEBHOOK_SECRET").unwrap_or_default(),
        }
    }

    /// Loads configuration from the given `.env` file (if present) and the
    /// process environment, initializing the singleton.
    pub fn init(env_path: &str) -> &'static Self {
        dotenvy::from_filename(env_path).ok();
        CONFIG.get_or_init(Self::from_env)
    }

    /// Returns the global configuration, loading it from the environment on
    /// first use.
    pub fn get() -> &'static Self {
        CONFIG.get_or_init(Self::from_env)
    }
}
