//! Outbound verification email.
//!
//! Delivery is best effort. Workflows never call a [`Notifier`] directly:
//! they hand a [`VerificationEmail`] to the [`NotificationDispatcher`] after
//! their transaction commits, and the dispatcher's worker does the sending.

mod dispatcher;
mod logging;
#[cfg(any(test, feature = "mocks"))]
mod mock;
#[cfg(feature = "smtp")]
mod smtp;
mod templates;

pub use logging::LogNotifier;
pub use dispatcher::{NotificationDispatcher, VerificationEmail};
#[cfg(any(test, feature = "mocks"))]
pub use mock::{MockNotifier, SentEmail};
#[cfg(feature = "smtp")]
pub use smtp::SmtpNotifier;
pub use templates::{VerificationEmailContent, verification_link};

use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NotifyError {
    #[error("Failed to send email: {0}")]
    SendFailed(String),
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Sends account email. A no-op implementation is valid when no transport
/// is configured.
#[async_trait]
pub trait Notifier: Send + Sync + 'static {
    async fn send_verification_email(
        &self,
        to: &str,
        name: &str,
        token: &str,
        base_url: &str,
    ) -> Result<(), NotifyError>;
}
