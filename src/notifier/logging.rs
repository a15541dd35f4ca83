use async_trait::async_trait;

use super::{Notifier, NotifyError};

/// Used when no email transport is configured. Logs and succeeds.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn send_verification_email(
        &self,
        to: &str,
        _name: &str,
        _token: &str,
        _base_url: &str,
    ) -> Result<(), NotifyError> {
        log::info!(target: "tenantry_auth", "msg=\"email delivery disabled\", kind=\"verification\", to=\"{to}\"");
        Ok(())
    }
}
