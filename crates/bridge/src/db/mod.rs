//! Database operations for the bridge `PostgreSQL` state store.
//!
//! The bridge keeps only small pieces of durable state (see [`settings`]):
//! per-category backfill status, the store-connected marker, and per-user
//! one-shot identify flags. SureCart remains the source of truth for all
//! commerce data.
//!
//! # Migrations
//!
//! Migrations are stored in `crates/bridge/migrations/` and run on startup
//! via `sqlx::migrate!`.

use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;

pub mod settings;

pub use settings::SettingsStore;

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}

/// Run pending migrations.
///
/// # Errors
///
/// Returns an error if a migration fails to apply.
pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}
