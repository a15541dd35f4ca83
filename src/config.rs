//! Process configuration, read once at startup.
//!
//! ```bash
//! DATABASE_URL=sqlite://tenantry.db      # default sqlite::memory:
//! JWT_SECRET=...                         # required, at least 32 bytes
//! JWT_ACCESS_EXPIRE_MINUTES=60
//! JWT_REFRESH_EXPIRE_DAYS=7
//! BASE_URL=http://localhost:3000         # used in verification links
//! BIND_ADDRESS=127.0.0.1:8080
//! NOTIFICATION_QUEUE_CAPACITY=256
//! CORS_ALLOWED_ORIGINS=https://app.example.com,https://admin.example.com
//!
//! # Email is disabled unless EMAIL_HOST is set
//! EMAIL_HOST=smtp.example.com
//! EMAIL_PORT=587
//! EMAIL_USERNAME=user
//! EMAIL_PASSWORD=secret
//! EMAIL_FROM=noreply@example.com
//! EMAIL_USE_TLS=true
//! ```

use std::env;
use std::str::FromStr;

use chrono::Duration;
use thiserror::Error;

use crate::jwt::{JwtConfig, MIN_SECRET_LENGTH};
use crate::{AuthError, SecretString};

pub const DEFAULT_DATABASE_URL: &str = "sqlite::memory:";
pub const DEFAULT_ACCESS_EXPIRE_MINUTES: i64 = 60;
pub const DEFAULT_REFRESH_EXPIRE_DAYS: i64 = 7;
pub const DEFAULT_BASE_URL: &str = "http://localhost:3000";
pub const DEFAULT_BIND_ADDRESS: &str = "127.0.0.1:8080";
pub const DEFAULT_QUEUE_CAPACITY: usize = 256;
pub const DEFAULT_EMAIL_PORT: u16 = 587;
pub const DEFAULT_EMAIL_FROM: &str = "noreply@localhost";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("Invalid value for {name}: {value}")]
    Invalid { name: &'static str, value: String },

    #[error("JWT_SECRET must be at least {MIN_SECRET_LENGTH} bytes")]
    SecretTooShort,
}

impl From<ConfigError> for AuthError {
    fn from(e: ConfigError) -> Self {
        AuthError::ConfigurationError(e.to_string())
    }
}

/// SMTP settings. Present only when `EMAIL_HOST` is non-empty.
#[derive(Debug, Clone)]
pub struct EmailConfig {
    pub host: String,
    pub port: u16,
    pub username: Option<String>,
    pub password: Option<SecretString>,
    pub from: String,
    pub use_tls: bool,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub jwt_secret: SecretString,
    pub access_token_expiry: Duration,
    pub refresh_token_expiry: Duration,
    pub base_url: String,
    pub bind_address: String,
    pub notification_queue_capacity: usize,
    /// Origins allowed by the HTTP layer's CORS policy. Empty means any.
    pub cors_allowed_origins: Vec<String>,
    pub email: Option<EmailConfig>,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Builds the config from any name-to-value source. Empty values count as
    /// unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let jwt_secret = get("JWT_SECRET").ok_or(ConfigError::Missing("JWT_SECRET"))?;
        if jwt_secret.len() < MIN_SECRET_LENGTH {
            return Err(ConfigError::SecretTooShort);
        }

        let access_minutes = parse_or(
            "JWT_ACCESS_EXPIRE_MINUTES",
            get("JWT_ACCESS_EXPIRE_MINUTES"),
            DEFAULT_ACCESS_EXPIRE_MINUTES,
        )?;
        let refresh_days = parse_or(
            "JWT_REFRESH_EXPIRE_DAYS",
            get("JWT_REFRESH_EXPIRE_DAYS"),
            DEFAULT_REFRESH_EXPIRE_DAYS,
        )?;
        let notification_queue_capacity = parse_or(
            "NOTIFICATION_QUEUE_CAPACITY",
            get("NOTIFICATION_QUEUE_CAPACITY"),
            DEFAULT_QUEUE_CAPACITY,
        )?;

        let email = match get("EMAIL_HOST") {
            None => None,
            Some(host) => Some(EmailConfig {
                host,
                port: parse_or("EMAIL_PORT", get("EMAIL_PORT"), DEFAULT_EMAIL_PORT)?,
                username: get("EMAIL_USERNAME"),
                password: get("EMAIL_PASSWORD").map(SecretString::from),
                from: get("EMAIL_FROM").unwrap_or_else(|| DEFAULT_EMAIL_FROM.to_owned()),
                use_tls: parse_flag("EMAIL_USE_TLS", get("EMAIL_USE_TLS"), true)?,
            }),
        };

        Ok(Self {
            database_url: get("DATABASE_URL").unwrap_or_else(|| DEFAULT_DATABASE_URL.to_owned()),
            jwt_secret: jwt_secret.into(),
            access_token_expiry: Duration::minutes(access_minutes),
            refresh_token_expiry: Duration::days(refresh_days),
            base_url: get("BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.to_owned()),
            bind_address: get("BIND_ADDRESS").unwrap_or_else(|| DEFAULT_BIND_ADDRESS.to_owned()),
            notification_queue_capacity,
            cors_allowed_origins: get("CORS_ALLOWED_ORIGINS")
                .map(|origins| split_list(&origins))
                .unwrap_or_default(),
            email,
        })
    }

    pub fn jwt_config(&self) -> Result<JwtConfig, AuthError> {
        Ok(JwtConfig::new(self.jwt_secret.clone())?
            .with_access_expiry(self.access_token_expiry)
            .with_refresh_expiry(self.refresh_token_expiry))
    }
}

fn parse_or<T: FromStr>(
    name: &'static str,
    value: Option<String>,
    default: T,
) -> Result<T, ConfigError> {
    match value {
        None => Ok(default),
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { name, value }),
    }
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(ToOwned::to_owned)
        .collect()
}

fn parse_flag(name: &'static str, value: Option<String>, default: bool) -> Result<bool, ConfigError> {
    let Some(value) = value else {
        return Ok(default);
    };
    let normalized = value.trim().to_lowercase();
    match normalized.as_str() {
        "true" | "1" | "yes" => Ok(true),
        "false" | "0" | "no" => Ok(false),
        _ => Err(ConfigError::Invalid { name, value }),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use serial_test::serial;

    use super::*;

    const SECRET: &str = "test-secret-32-bytes-long-key-01";

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = AppConfig::from_lookup(lookup(&[("JWT_SECRET", SECRET)])).unwrap();

        assert_eq!(config.database_url, DEFAULT_DATABASE_URL);
        assert_eq!(config.access_token_expiry, Duration::minutes(60));
        assert_eq!(config.refresh_token_expiry, Duration::days(7));
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.bind_address, DEFAULT_BIND_ADDRESS);
        assert_eq!(config.notification_queue_capacity, 256);
        assert!(config.email.is_none());
        assert!(config.cors_allowed_origins.is_empty());
    }

    #[test]
    fn test_cors_origins_list() {
        let config = AppConfig::from_lookup(lookup(&[
            ("JWT_SECRET", SECRET),
            ("CORS_ALLOWED_ORIGINS", "https://a.example.com, ,https://b.example.com "),
        ]))
        .unwrap();
        assert_eq!(
            config.cors_allowed_origins,
            vec!["https://a.example.com", "https://b.example.com"]
        );
    }

    #[test]
    fn test_secret_required_and_long_enough() {
        assert_eq!(
            AppConfig::from_lookup(lookup(&[])).unwrap_err(),
            ConfigError::Missing("JWT_SECRET")
        );
        assert_eq!(
            AppConfig::from_lookup(lookup(&[("JWT_SECRET", "short")])).unwrap_err(),
            ConfigError::SecretTooShort
        );
    }

    #[test]
    fn test_invalid_number() {
        let err = AppConfig::from_lookup(lookup(&[
            ("JWT_SECRET", SECRET),
            ("JWT_ACCESS_EXPIRE_MINUTES", "soon"),
        ]))
        .unwrap_err();
        assert_eq!(
            err,
            ConfigError::Invalid {
                name: "JWT_ACCESS_EXPIRE_MINUTES",
                value: "soon".to_owned()
            }
        );
    }

    #[test]
    fn test_email_settings() {
        let config = AppConfig::from_lookup(lookup(&[
            ("JWT_SECRET", SECRET),
            ("EMAIL_HOST", "smtp.example.com"),
            ("EMAIL_PORT", "465"),
            ("EMAIL_PASSWORD", "hunter2"),
            ("EMAIL_USE_TLS", "false"),
        ]))
        .unwrap();

        let email = config.email.unwrap();
        assert_eq!(email.host, "smtp.example.com");
        assert_eq!(email.port, 465);
        assert_eq!(email.from, DEFAULT_EMAIL_FROM);
        assert!(!email.use_tls);
        assert!(!format!("{email:?}").contains("hunter2"));
    }

    #[test]
    fn test_blank_email_host_disables_email() {
        let config =
            AppConfig::from_lookup(lookup(&[("JWT_SECRET", SECRET), ("EMAIL_HOST", "  ")])).unwrap();
        assert!(config.email.is_none());
    }

    #[test]
    fn test_jwt_config_carries_expiries() {
        let config = AppConfig::from_lookup(lookup(&[
            ("JWT_SECRET", SECRET),
            ("JWT_ACCESS_EXPIRE_MINUTES", "15"),
            ("JWT_REFRESH_EXPIRE_DAYS", "30"),
        ]))
        .unwrap();
        let jwt = config.jwt_config().unwrap();
        assert_eq!(jwt.access_expiry(), Duration::minutes(15));
        assert_eq!(jwt.refresh_expiry(), Duration::days(30));
    }

    #[test]
    #[serial]
    fn test_from_env() {
        env::set_var("JWT_SECRET", SECRET);
        env::set_var("BASE_URL", "https://app.example.com");
        let config = AppConfig::from_env();
        env::remove_var("JWT_SECRET");
        env::remove_var("BASE_URL");

        assert_eq!(config.unwrap().base_url, "https://app.example.com");
    }
}
