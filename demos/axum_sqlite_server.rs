#![allow(
    clippy::print_stdout,
    clippy::expect_used,
    clippy::doc_markdown
)]

//! Tenantry server on Axum and SQLite.
//!
//! Run with: `cargo run --example axum_sqlite_server`
//! (add `--features smtp` to deliver email through `EMAIL_HOST`)
//!
//! Environment variables:
//!   JWT_SECRET=...                     (required, at least 32 bytes)
//!   DATABASE_URL=sqlite://tenantry.db  (optional, defaults to in-memory)
//!   RUST_LOG=info,tenantry_auth=debug  (optional)
//!
//! Try it:
//!   curl -X POST http://localhost:8080/api/v1/auth/register \
//!     -H "Content-Type: application/json" \
//!     -d '{"name": "Jane", "email": "jane@example.com", "password": "pw123456", "organization_name": "Acme Corp"}'

use sqlx::sqlite::SqlitePoolOptions;
use tenantry::api::axum::{AppState, cors_layer, router};
use tenantry::config::AppConfig;
use tenantry::events::listeners::LoggingListener;
use tenantry::notifier::{LogNotifier, NotificationDispatcher};
use tenantry::sqlite::{SqliteAccountStore, migrations};
use tenantry::{TokenSigner, register_event_listeners};
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

fn notification_dispatcher(config: &AppConfig) -> NotificationDispatcher {
    let capacity = config.notification_queue_capacity;

    #[cfg(feature = "smtp")]
    {
        if let Some(email) = &config.email {
            let notifier =
                tenantry::notifier::SmtpNotifier::new(email).expect("invalid email settings");
            return NotificationDispatcher::spawn(notifier, config.base_url.clone(), capacity);
        }
    }

    if config.email.is_some() {
        println!("EMAIL_HOST is set but the smtp feature is off; emails will only be logged");
    }
    NotificationDispatcher::spawn(LogNotifier, config.base_url.clone(), capacity)
}

#[tokio::main]
async fn main() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let config = AppConfig::from_env().expect("invalid configuration");

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect(&config.database_url)
        .await
        .expect("Failed to create pool");

    migrations::run(&pool).await.expect("Failed to run migrations");

    register_event_listeners(|registry| {
        registry.listen(LoggingListener::new());
    });

    let signer = TokenSigner::new(config.jwt_config().expect("invalid JWT settings"));
    let state = AppState::new(
        SqliteAccountStore::new(pool),
        signer,
        notification_dispatcher(&config),
    );

    let app = router(state).layer(cors_layer(&config.cors_allowed_origins));

    println!("Starting tenantry on http://{}", config.bind_address);
    println!("Database: {}", config.database_url);
    println!("Endpoints (under /api/v1):");
    println!("  POST   /auth/register             - Create organization and owner");
    println!("  POST   /auth/login                - Access and refresh tokens");
    println!("  POST   /auth/refresh              - New access token");
    println!("  POST   /auth/verify-email         - Redeem verification token");
    println!("  POST   /auth/resend-verification  - Send a new verification link");
    println!("  DELETE /auth/logout               - Revoke refresh token");
    println!("  GET    /users/current             - Current user");
    println!("  GET    /organizations/members     - Organization members");
    println!("  GET    /subscriptions/current     - Active subscription");
    println!("Probes: GET /health, GET /ready");

    let listener = TcpListener::bind(&config.bind_address)
        .await
        .expect("Failed to bind");
    axum::serve(listener, app).await.expect("server error");
}
