//! Axum wiring: shared state, the bearer-token extractor, handlers and
//! routes under `/api/v1` plus the `/health` and `/ready` probes.

mod cors;
mod error;
mod handlers;
mod middleware;
mod routes;

pub use cors::{cors_layer, permissive as permissive_cors, restricted as restricted_cors};
pub use error::AppError;
pub use middleware::{Authenticated, JsonBody, extract_bearer_token};
pub use routes::{API_PREFIX, AppState, api_routes, probe_routes, router};
