use async_trait::async_trait;

use super::AuthEvent;

/// Receives every dispatched [`AuthEvent`].
///
/// ```rust,ignore
/// use async_trait::async_trait;
/// use tenantry::events::{AuthEvent, Listener};
///
/// struct FailedLoginCounter;
///
/// #[async_trait]
/// impl Listener for FailedLoginCounter {
///     async fn handle(&self, event: &AuthEvent) {
///         if let AuthEvent::LoginFailed { .. } = event {
///             // increment a counter
///         }
///     }
/// }
/// ```
#[async_trait]
pub trait Listener: Send + Sync + 'static {
    async fn handle(&self, event: &AuthEvent);
}
