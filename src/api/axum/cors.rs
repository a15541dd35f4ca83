//! CORS configuration for Axum using tower-http.

use std::time::Duration;

use axum::http::{HeaderValue, Method, header};
use tower_http::cors::CorsLayer;

/// Allows any origin, method and header. Meant for local development.
pub fn permissive() -> CorsLayer {
    CorsLayer::permissive()
}

/// Allows the listed origins with the methods and headers the API uses.
/// Unparseable origins are skipped.
pub fn restricted<O: AsRef<str>>(allowed_origins: &[O]) -> CorsLayer {
    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| origin.as_ref().parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE, header::ACCEPT])
        .allow_credentials(true)
        .max_age(Duration::from_secs(3600))
}

/// [`permissive`] when no origins are configured, [`restricted`] otherwise.
pub fn cors_layer<O: AsRef<str>>(allowed_origins: &[O]) -> CorsLayer {
    if allowed_origins.is_empty() {
        log::warn!(target: "tenantry_auth", "msg=\"no CORS origins configured, allowing any origin\"");
        permissive()
    } else {
        restricted(allowed_origins)
    }
}
