use chrono::Duration;
use std::fmt;

use crate::{AuthError, SecretString};

/// Minimum required length for the signing secret in bytes.
pub const MIN_SECRET_LENGTH: usize = 32;

/// Signing key and lifetimes for access and refresh credentials.
///
/// Built once at startup and shared read-only afterwards.
#[derive(Clone)]
pub struct JwtConfig {
    pub(crate) secret: SecretString,
    pub(crate) access_expiry: Duration,
    pub(crate) refresh_expiry: Duration,
    pub(crate) issuer: Option<String>,
}

impl fmt::Debug for JwtConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JwtConfig")
            .field("secret", &self.secret)
            .field("access_expiry", &self.access_expiry)
            .field("refresh_expiry", &self.refresh_expiry)
            .field("issuer", &self.issuer)
            .finish()
    }
}

impl JwtConfig {
    /// Access tokens default to 60 minutes, refresh tokens to 7 days.
    ///
    /// # Errors
    /// Returns `AuthError::ConfigurationError` if the secret is shorter than
    /// [`MIN_SECRET_LENGTH`] bytes.
    pub fn new(secret: impl Into<SecretString>) -> Result<Self, AuthError> {
        let secret = secret.into();
        let len = secret.expose_secret().len();

        if len < MIN_SECRET_LENGTH {
            return Err(AuthError::ConfigurationError(format!(
                "JWT secret must be at least {MIN_SECRET_LENGTH} bytes, got {len}"
            )));
        }

        Ok(Self {
            secret,
            access_expiry: Duration::minutes(60),
            refresh_expiry: Duration::days(7),
            issuer: None,
        })
    }

    #[must_use]
    pub fn with_access_expiry(mut self, expiry: Duration) -> Self {
        self.access_expiry = expiry;
        self
    }

    #[must_use]
    pub fn with_refresh_expiry(mut self, expiry: Duration) -> Self {
        self.refresh_expiry = expiry;
        self
    }

    /// Adds an `iss` claim to issued tokens and requires it on verification.
    #[must_use]
    pub fn with_issuer(mut self, issuer: impl Into<String>) -> Self {
        self.issuer = Some(issuer.into());
        self
    }

    pub fn access_expiry(&self) -> Duration {
        self.access_expiry
    }

    pub fn refresh_expiry(&self) -> Duration {
        self.refresh_expiry
    }
}
