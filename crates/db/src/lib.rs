//! Persistence layer for the Casewise annotation sync service.
//!
//! Exposes the annotation store contract ([`AnnotationStore`]), its
//! PostgreSQL and in-memory implementations, the version snapshot ledger
//! ([`VersionLedger`]), and connection-pool / migration helpers.

pub mod ledger;
pub mod models;
pub mod store;

pub use ledger::{LedgerError, VersionLedger};
pub use store::{AnnotationStore, MemoryStore, PgStore, StoreError};

use sqlx::postgres::PgPoolOptions;

pub type DbPool = sqlx::PgPool;

/// Create a connection pool from a database URL.
pub async fn create_pool(database_url: &str) -> Result<DbPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(20)
        .connect(database_url)
        .await
}

/// Verify the database is reachable.
pub async fn health_check(pool: &DbPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}

/// Apply embedded migrations.
pub async fn run_migrations(pool: &DbPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}
