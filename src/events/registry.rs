use std::sync::OnceLock;

use super::{AuthEvent, Listener};

static LISTENERS: OnceLock<EventRegistry> = OnceLock::new();

/// Listeners registered at startup, called in registration order.
#[derive(Default)]
pub struct EventRegistry {
    listeners: Vec<Box<dyn Listener>>,
}

impl EventRegistry {
    pub fn listen(&mut self, listener: impl Listener) -> &mut Self {
        self.listeners.push(Box::new(listener));
        self
    }

    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }

    async fn notify(&self, event: &AuthEvent) {
        for listener in &self.listeners {
            listener.handle(event).await;
        }
    }
}

/// Installs the process-wide listener set.
///
/// Returns `false`, and changes nothing, when listeners were already
/// installed.
///
/// ```rust,ignore
/// use tenantry::register_event_listeners;
/// use tenantry::events::listeners::LoggingListener;
///
/// register_event_listeners(|registry| {
///     registry.listen(LoggingListener::new());
/// });
/// ```
pub fn register_event_listeners<F>(f: F) -> bool
where
    F: FnOnce(&mut EventRegistry),
{
    let mut registry = EventRegistry::default();
    f(&mut registry);
    let count = registry.len();

    if LISTENERS.set(registry).is_err() {
        log::warn!(target: "tenantry", "msg=\"event listeners already registered, ignoring\"");
        return false;
    }

    log::debug!(target: "tenantry", "msg=\"event listeners registered\", count={count}");
    true
}

/// Hands `event` to every registered listener. A no-op before registration.
pub async fn dispatch(event: AuthEvent) {
    if let Some(registry) = LISTENERS.get() {
        registry.notify(&event).await;
    }
}
