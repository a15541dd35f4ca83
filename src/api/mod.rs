//! Transport layer. `types` holds the wire DTOs shared by any framework;
//! the `axum` module wires them to routes.

mod types;

pub use types::*;

#[cfg(feature = "axum_api")]
pub mod axum;
