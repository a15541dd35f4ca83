//! Domain events fired by the workflows.
//!
//! Every successful workflow dispatches an [`AuthEvent`] after its transaction
//! commits. With no listeners registered the dispatch does nothing.
//!
//! ```rust,ignore
//! use tenantry::register_event_listeners;
//! use tenantry::events::listeners::LoggingListener;
//!
//! register_event_listeners(|registry| {
//!     registry.listen(LoggingListener::new());
//! });
//! ```

mod event;
mod listener;
mod registry;

pub mod listeners;

pub use event::AuthEvent;
pub use listener::Listener;
pub use registry::{EventRegistry, dispatch, register_event_listeners};
