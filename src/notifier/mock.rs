use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use super::{Notifier, NotifyError};

/// One recorded call to [`MockNotifier`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentEmail {
    pub to: String,
    pub name: String,
    pub token: String,
    pub base_url: String,
}

/// Records verification emails instead of sending them.
#[derive(Clone, Default)]
pub struct MockNotifier {
    sent: Arc<Mutex<Vec<SentEmail>>>,
    fail: bool,
}

impl MockNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// A notifier whose every send fails after being recorded.
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn sent(&self) -> Vec<SentEmail> {
        self.sent.lock().map(|sent| sent.clone()).unwrap_or_default()
    }

    /// Token from the most recent email to `to`.
    pub fn last_token_for(&self, to: &str) -> Option<String> {
        self.sent()
            .into_iter()
            .rev()
            .find(|email| email.to == to)
            .map(|email| email.token)
    }

    /// Waits up to two seconds for at least `count` recorded sends.
    pub async fn wait_for(&self, count: usize) -> Vec<SentEmail> {
        for _ in 0..200 {
            let sent = self.sent();
            if sent.len() >= count {
                return sent;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        self.sent()
    }
}

#[async_trait]
impl Notifier for MockNotifier {
    async fn send_verification_email(
        &self,
        to: &str,
        name: &str,
        token: &str,
        base_url: &str,
    ) -> Result<(), NotifyError> {
        if let Ok(mut sent) = self.sent.lock() {
            sent.push(SentEmail {
                to: to.to_owned(),
                name: name.to_owned(),
                token: token.to_owned(),
                base_url: base_url.to_owned(),
            });
        }

        if self.fail {
            return Err(NotifyError::SendFailed("mock failure".to_owned()));
        }
        Ok(())
    }
}
