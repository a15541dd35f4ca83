use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;

use super::Notifier;
use crate::SecretString;

/// A verification email waiting for delivery.
#[derive(Debug, Clone)]
pub struct VerificationEmail {
    pub to: String,
    pub name: String,
    pub token: SecretString,
}

/// Fire-and-forget front of a bounded delivery queue.
///
/// [`dispatch`](Self::dispatch) never waits and never fails. A full or closed
/// queue drops the email with a warning. One background worker drains the
/// queue and logs delivery failures.
#[derive(Clone)]
pub struct NotificationDispatcher {
    tx: mpsc::Sender<VerificationEmail>,
}

impl NotificationDispatcher {
    /// Starts the worker on the current tokio runtime.
    pub fn spawn<N: Notifier>(notifier: N, base_url: impl Into<String>, capacity: usize) -> Self {
        let (tx, mut rx) = mpsc::channel::<VerificationEmail>(capacity.max(1));
        let notifier = Arc::new(notifier);
        let base_url = base_url.into();

        tokio::spawn(async move {
            while let Some(email) = rx.recv().await {
                match notifier
                    .send_verification_email(
                        &email.to,
                        &email.name,
                        email.token.expose_secret(),
                        &base_url,
                    )
                    .await
                {
                    Ok(()) => {
                        log::info!(target: "tenantry_auth", "msg=\"verification email sent\", to=\"{}\"", email.to);
                    }
                    Err(e) => {
                        log::warn!(target: "tenantry_auth", "msg=\"verification email failed\", to=\"{}\", error=\"{e}\"", email.to);
                    }
                }
            }
            log::debug!(target: "tenantry_auth", "msg=\"notification worker stopped\"");
        });

        Self { tx }
    }

    pub fn dispatch(&self, email: VerificationEmail) {
        match self.tx.try_send(email) {
            Ok(()) => {}
            Err(TrySendError::Full(email)) => {
                log::warn!(target: "tenantry_auth", "msg=\"notification queue full, email dropped\", to=\"{}\"", email.to);
            }
            Err(TrySendError::Closed(email)) => {
                log::warn!(target: "tenantry_auth", "msg=\"notification queue closed, email dropped\", to=\"{}\"", email.to);
            }
        }
    }
}
