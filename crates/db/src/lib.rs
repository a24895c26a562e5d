//! Persistence gateway.
//!
//! Owns the PostgreSQL pool lifecycle (create, probe, migrate, close), the
//! row models, one store trait per entity, the PostgreSQL repositories that
//! implement them, and an in-memory substitute used by tests.

use std::time::Duration;

use sqlx::postgres::PgPoolOptions;

pub mod error;
pub mod memory;
pub mod models;
pub mod repositories;
pub mod seed;
pub mod store;

pub use error::StoreError;
pub use store::Stores;

pub type DbPool = sqlx::PgPool;

/// Create a connection pool from a database URL.
///
/// Called once per process; the pool is then cloned into every consumer.
pub async fn create_pool(database_url: &str, max_connections: u32) -> Result<DbPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(max_connections)
        .acquire_timeout(Duration::from_secs(5))
        .connect(database_url)
        .await
}

/// Verify the database is reachable.
pub async fn health_check(pool: &DbPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}

/// Apply pending migrations from `db/migrations`.
pub async fn run_migrations(pool: &DbPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("../../db/migrations").run(pool).await
}

/// Close every pooled connection. Run once after the server has drained.
pub async fn close_pool(pool: &DbPool) {
    tracing::info!(
        open_connections = pool.size(),
        "Closing database connection pool"
    );
    pool.close().await;
}
