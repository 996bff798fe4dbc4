//! # Postgres Persistence
//!
//! Optional write-through persistence for the metadata stores. All
//! functions take a `&PgPool` and use runtime-checked queries, so the
//! crate builds without a database present.
//!
//! The in-memory stores in [`crate::state`] remain the read path; these
//! modules exist so a restart can rebuild them via
//! [`crate::state::AppState::hydrate_from_db()`].

use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

pub mod assets;
pub mod tokens;
pub mod versions;

/// Connect to the database named by `DATABASE_URL`, if set.
///
/// Absent variable means in-memory-only operation — a supported mode, not
/// an error. A present-but-unreachable database is an error: silently
/// degrading to non-persistent operation would lose writes the operator
/// expects to survive a restart.
pub async fn init_pool() -> Result<Option<PgPool>, sqlx::Error> {
    let Ok(url) = std::env::var("DATABASE_URL") else {
        tracing::info!("DATABASE_URL not set — metadata persistence disabled");
        return Ok(None);
    };

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&url)
        .await?;
    ensure_schema(&pool).await?;
    tracing::info!("connected to metadata database");
    Ok(Some(pool))
}

/// Create the metadata tables if they do not exist.
pub async fn ensure_schema(pool: &PgPool) -> Result<(), sqlx::Error> {
    const STATEMENTS: &[&str] = &[
        "CREATE TABLE IF NOT EXISTS assets (
            id UUID PRIMARY KEY,
            storage_key TEXT NOT NULL UNIQUE,
            filename TEXT NOT NULL,
            media_type TEXT NOT NULL,
            size_bytes BIGINT NOT NULL,
            fingerprint TEXT NOT NULL,
            is_private BOOLEAN NOT NULL DEFAULT FALSE,
            created_at TIMESTAMPTZ NOT NULL,
            updated_at TIMESTAMPTZ NOT NULL
        )",
        "CREATE TABLE IF NOT EXISTS asset_versions (
            id UUID PRIMARY KEY,
            asset_id UUID NOT NULL REFERENCES assets(id),
            storage_key TEXT NOT NULL UNIQUE,
            fingerprint TEXT NOT NULL,
            created_at TIMESTAMPTZ NOT NULL
        )",
        "CREATE TABLE IF NOT EXISTS access_tokens (
            token TEXT PRIMARY KEY,
            asset_id UUID NOT NULL REFERENCES assets(id),
            issued_at TIMESTAMPTZ NOT NULL,
            expires_at TIMESTAMPTZ NOT NULL
        )",
    ];

    for statement in STATEMENTS {
        sqlx::query(statement).execute(pool).await?;
    }
    Ok(())
}
