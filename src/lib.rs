//! Multi-tenant identity and access core.
//!
//! `tenantry` provisions tenant organizations, authenticates their users,
//! issues access and refresh credentials, proves email ownership and answers
//! role questions for both the platform and the organization tier.
//!
//! Every workflow is an action struct with a `new` constructor and an async
//! `execute` method. Actions run against an [`AccountStore`], one transaction
//! per call, and hand verification emails to a [`NotificationDispatcher`]
//! only after that transaction has committed.
//!
//! # Features
//!
//! | Feature | Description |
//! |---------|-------------|
//! | `sqlx_sqlite` | `SQLite` store and embedded migrations (default) |
//! | `axum_api` | HTTP routes for Axum (default) |
//! | `smtp` | SMTP notifier built on `lettre` |
//! | `tracing` | Spans on actions and a tracing event listener |
//! | `mocks` | In-memory store and notifier for tests |

pub mod actions;
pub mod config;
pub mod crypto;
pub mod events;
pub mod jwt;
pub mod notifier;
pub mod repository;
pub mod roles;
pub mod validators;

mod clock;
mod secret;

pub mod api;

#[cfg(feature = "sqlx_sqlite")]
pub mod sqlite;

pub use clock::now_millis;
pub use crypto::{Argon2Hasher, PasswordHasher};
pub use events::{AuthEvent, Listener, dispatch, register_event_listeners};
pub use jwt::{AuthContext, JwtConfig, TokenSigner};
pub use notifier::{NotificationDispatcher, Notifier, NotifyError, VerificationEmail};
pub use repository::{
    AccountStore, AccountTransaction, AuditLog, Organization, OrganizationMember, Plan,
    Subscription, SubscriptionStatus, User,
};
pub use roles::{OrgRole, Role, SystemRole};
pub use secret::SecretString;
pub use validators::ValidationError;

#[cfg(any(test, feature = "mocks"))]
pub use notifier::MockNotifier;
#[cfg(any(test, feature = "mocks"))]
pub use repository::{FailPoint, MockAccountStore, MockState};

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    #[error("{0}")]
    Validation(#[from] ValidationError),
    #[error("Email already exists")]
    EmailConflict,
    #[error("Organization slug already exists")]
    SlugConflict,
    #[error("Invalid email or password")]
    InvalidCredentials,
    #[error("Invalid refresh token")]
    InvalidRefreshToken,
    #[error("Refresh token expired")]
    RefreshTokenExpired,
    #[error("Invalid or expired verification token")]
    InvalidVerificationToken,
    #[error("Unauthenticated")]
    Unauthenticated,
    #[error("Not found")]
    NotFound,
    #[error("Forbidden")]
    Forbidden,
    #[error("Default plan is not configured")]
    DefaultPlanMissing,
    #[error("Failed to hash password")]
    PasswordHashError,
    #[error("Database error: {0}")]
    DatabaseError(String),
    #[error("Configuration error: {0}")]
    ConfigurationError(String),
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AuthError {
    /// True for failures that are not attributable to caller input.
    pub fn is_internal(&self) -> bool {
        matches!(
            self,
            Self::DefaultPlanMissing
                | Self::PasswordHashError
                | Self::DatabaseError(_)
                | Self::ConfigurationError(_)
                | Self::Internal(_)
        )
    }
}
