//! Persistence layer for the advertising sync service.
//!
//! Postgres via `sqlx`. [`models`] holds the `FromRow` entity structs
//! and insert DTOs, [`repositories`] the zero-sized `*Repo` structs
//! whose async methods take `&PgPool` as the first argument.
//!
//! The campaign state store read contract is deliberately tri-state:
//! `Ok(Some)` found, `Ok(None)` first sight, `Err` store unavailable.
//! Callers must never collapse `Err` into "no prior state" — that
//! would make a storage outage look like a silent no-change cycle.

pub mod models;
pub mod repositories;

use sqlx::postgres::PgPoolOptions;

/// Shared connection pool alias used across the workspace.
pub type DbPool = sqlx::PgPool;

/// Default maximum pool size.
const DEFAULT_MAX_CONNECTIONS: u32 = 10;

/// Connect to Postgres and run pending migrations.
pub async fn connect(database_url: &str) -> Result<DbPool, sqlx::Error> {
    let pool = PgPoolOptions::new()
        .max_connections(DEFAULT_MAX_CONNECTIONS)
        .connect(database_url)
        .await?;

    sqlx::migrate!("../../migrations").run(&pool).await?;

    tracing::info!("Database pool ready");
    Ok(pool)
}
