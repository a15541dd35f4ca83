//! `SQLite` backend for [`AccountStore`](crate::AccountStore).
//!
//! Enable the `sqlx_sqlite` feature to use it. Run [`migrations::run`] once
//! at startup before opening transactions.
//!
//! ```rust,ignore
//! use sqlx::sqlite::SqlitePoolOptions;
//! use tenantry::sqlite::{SqliteAccountStore, migrations};
//!
//! let pool = SqlitePoolOptions::new().connect("sqlite://tenantry.db").await?;
//! migrations::run(&pool).await?;
//! let store = SqliteAccountStore::new(pool);
//! ```

pub mod migrations;
mod records;
mod store;

pub use store::{SqliteAccountStore, SqliteTransaction};
