//! Persistence layer: connection pool, migrations, models, repositories.
//!
//! Every invariant-bearing write in this crate is a single SQL statement
//! (conditional `UPDATE` or `INSERT ... ON CONFLICT ... DO UPDATE ...
//! WHERE`), so correctness holds when multiple server instances run
//! against the same database. No repository takes an in-process lock.

pub mod models;
pub mod repositories;

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

/// Apply all embedded migrations.
pub async fn run_migrations(pool: &DbPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}
