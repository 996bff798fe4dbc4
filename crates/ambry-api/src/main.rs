//! # ambry-api — Binary Entry Point
//!
//! Starts the Axum HTTP server. Configuration comes from the environment:
//!
//! - `PORT` — bind port (default 8080)
//! - `DATABASE_URL` — optional Postgres persistence
//! - `BLOB_ROOT` — optional directory for the filesystem blob store;
//!   absent means in-memory blobs
//! - `DEFAULT_TOKEN_TTL_SECS` / `MAX_TOKEN_TTL_SECS` — token lifetimes

use std::sync::Arc;

use anyhow::Context;

use ambry_access::TtlPolicy;
use ambry_api::blob::{FsObjectStore, MemoryObjectStore, ObjectStore};
use ambry_api::state::{AppConfig, AppState};
use ambry_core::Timestamp;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize structured tracing.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    // Build configuration from environment.
    let port: u16 = env_parsed("PORT").unwrap_or(8080);
    let config = AppConfig {
        port,
        default_token_ttl_secs: env_parsed("DEFAULT_TOKEN_TTL_SECS")
            .unwrap_or(ambry_access::DEFAULT_TOKEN_TTL_SECS),
        ttl_policy: match env_parsed("MAX_TOKEN_TTL_SECS") {
            Some(max_ttl_secs) => TtlPolicy { max_ttl_secs },
            None => TtlPolicy::default(),
        },
    };

    // Blob store: filesystem when BLOB_ROOT is set, in-memory otherwise.
    let blobs: Arc<dyn ObjectStore> = match std::env::var("BLOB_ROOT") {
        Ok(root) => {
            tracing::info!(root = %root, "using filesystem blob store");
            Arc::new(FsObjectStore::new(root))
        }
        Err(_) => {
            tracing::warn!("BLOB_ROOT not set — blobs are in-memory and lost on restart");
            Arc::new(MemoryObjectStore::new())
        }
    };

    // Metadata persistence: optional Postgres pool.
    let db = ambry_api::db::init_pool()
        .await
        .context("database initialization failed")?;

    let state = AppState::with_config(config, blobs, db);

    // Rebuild the in-memory stores and drop dead token rows.
    state
        .hydrate_from_db()
        .await
        .context("database hydration failed")?;
    if let Some(pool) = &state.db {
        let pruned = ambry_api::db::tokens::prune_expired(pool, Timestamp::now())
            .await
            .context("expired token pruning failed")?;
        if pruned > 0 {
            tracing::info!(pruned, "pruned expired access tokens");
        }
    }

    let app = ambry_api::app(state);

    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("ambry API listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Read and parse an environment variable, `None` when absent or unparseable.
fn env_parsed<T: std::str::FromStr>(name: &str) -> Option<T> {
    std::env::var(name).ok().and_then(|v| v.parse().ok())
}
