//! Shared setup for the SQLite-backed integration tests.

#![allow(dead_code, clippy::unwrap_used, clippy::expect_used)]

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use sqlx::SqlitePool;
use sqlx::sqlite::SqlitePoolOptions;
use tenantry::notifier::{NotificationDispatcher, Notifier, NotifyError};
use tenantry::sqlite::{SqliteAccountStore, migrations};
use tenantry::{Argon2Hasher, JwtConfig, TokenSigner};

pub const SECRET: &str = "integration-secret-at-least-32-bytes";

/// Records every verification email instead of sending it.
#[derive(Clone, Default)]
pub struct RecordingNotifier {
    sent: Arc<Mutex<Vec<(String, String)>>>,
}

impl RecordingNotifier {
    pub fn sent(&self) -> Vec<(String, String)> {
        self.sent.lock().unwrap().clone()
    }

    /// Waits for the background worker to deliver at least `count` emails and
    /// returns the token of the latest one sent to `to`.
    pub async fn token_for(&self, to: &str, count: usize) -> String {
        for _ in 0..200 {
            if self.sent().len() >= count {
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        self.sent()
            .into_iter()
            .rev()
            .find(|(recipient, _)| recipient == to)
            .map(|(_, token)| token)
            .expect("no verification email recorded")
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn send_verification_email(
        &self,
        to: &str,
        _name: &str,
        token: &str,
        _base_url: &str,
    ) -> Result<(), NotifyError> {
        self.sent.lock().unwrap().push((to.to_owned(), token.to_owned()));
        Ok(())
    }
}

/// One long-lived connection so the in-memory database survives the test.
pub async fn setup_db() -> SqlitePool {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect("sqlite::memory:")
        .await
        .expect("Failed to connect to in-memory SQLite database");

    migrations::run(&pool).await.expect("Failed to run migrations");

    pool
}

pub async fn setup_store() -> (SqliteAccountStore, SqlitePool) {
    let pool = setup_db().await;
    (SqliteAccountStore::new(pool.clone()), pool)
}

pub fn signer() -> TokenSigner {
    TokenSigner::new(JwtConfig::new(SECRET).unwrap())
}

pub fn hasher() -> Argon2Hasher {
    Argon2Hasher::new(1024, 1, 1)
}

pub fn dispatcher() -> (NotificationDispatcher, RecordingNotifier) {
    let notifier = RecordingNotifier::default();
    let dispatcher = NotificationDispatcher::spawn(notifier.clone(), "http://app.test", 16);
    (dispatcher, notifier)
}

pub async fn count(pool: &SqlitePool, table: &str) -> i64 {
    sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {table}"))
        .fetch_one(pool)
        .await
        .unwrap()
}
