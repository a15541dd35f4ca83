use async_trait::async_trait;

use crate::events::{AuthEvent, Listener};

/// Emits every event as a `tracing` event. Requires the `tracing` feature.
pub struct TracingListener;

#[async_trait]
impl Listener for TracingListener {
    async fn handle(&self, event: &AuthEvent) {
        match event {
            AuthEvent::LoginFailed { reason, .. } => tracing::warn!(
                target: "tenantry::events",
                event_name = event.name(),
                at = event.timestamp(),
                reason = %reason,
                "auth event"
            ),
            _ => tracing::info!(
                target: "tenantry::events",
                event_name = event.name(),
                at = event.timestamp(),
                ?event,
                "auth event"
            ),
        }
    }
}
