use async_trait::async_trait;

use crate::events::{AuthEvent, Listener};

/// Writes every event through the `log` facade.
///
/// Failed logins are raised to `warn` regardless of the configured level.
pub struct LoggingListener {
    level: log::Level,
}

impl LoggingListener {
    pub fn new() -> Self {
        Self {
            level: log::Level::Info,
        }
    }

    pub fn with_level(level: log::Level) -> Self {
        Self { level }
    }

    fn level_for(&self, event: &AuthEvent) -> log::Level {
        match event {
            AuthEvent::LoginFailed { .. } => self.level.min(log::Level::Warn),
            _ => self.level,
        }
    }
}

impl Default for LoggingListener {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Listener for LoggingListener {
    async fn handle(&self, event: &AuthEvent) {
        log::log!(
            target: "tenantry::events",
            self.level_for(event),
            "event={} at={} {:?}",
            event.name(),
            event.timestamp(),
            event
        );
    }
}
