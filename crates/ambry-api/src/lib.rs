//! # ambry-api — Axum Delivery Service
//!
//! The HTTP layer over the Ambry decision crates. Handlers own the
//! collaborators — blob store, metadata stores — and delegate every
//! caching and access decision to `ambry-cache`, `ambry-access`, and
//! `ambry-registry`; no header policy or validity rule lives in a handler.
//!
//! ## API Surface
//!
//! | Route                          | Behavior                                  |
//! |--------------------------------|-------------------------------------------|
//! | `POST /v1/assets`              | Upload raw bytes, fingerprint at write    |
//! | `GET  /v1/assets/:id`          | Asset metadata                            |
//! | `GET/HEAD /v1/assets/:id/content` | Mutable delivery, conditional GET      |
//! | `PUT  /v1/assets/:id/content`  | Replace content, revalidator rotates      |
//! | `POST /v1/assets/:id/publish`  | Freeze content into an immutable version  |
//! | `GET/HEAD /v1/versions/:id`    | Immutable delivery, permanent caching     |
//! | `POST /v1/assets/:id/tokens`   | Mint a time-boxed access token            |
//! | `GET  /v1/assets/:id/private`  | Tokened delivery, never cached            |
//! | `GET  /health/*`               | Unauthenticated probes                    |
//!
//! ## Crate Policy
//!
//! - Sits at the top of the dependency DAG — depends on all other crates.
//! - No decision logic in route handlers — they load records, call the
//!   decision functions, and attach the header values those produce.
//! - All errors map to structured HTTP responses via `AppError`.

pub mod blob;
pub mod db;
pub mod error;
pub mod extractors;
pub mod headers;
pub mod openapi;
pub mod routes;
pub mod state;

use axum::Router;
use tower_http::trace::TraceLayer;

pub use error::AppError;
pub use state::{AppConfig, AppState};

/// Assemble the full application router with all routes and middleware.
///
/// Health probes (`/health/*`) are mounted outside the traced API router
/// so probe traffic does not flood the request log.
pub fn app(state: AppState) -> Router {
    let api = Router::new()
        .merge(routes::assets::router())
        .merge(routes::versions::router())
        .merge(routes::tokens::router())
        .merge(openapi::router())
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    let health = Router::new()
        .route("/health/liveness", axum::routing::get(liveness))
        .route("/health/readiness", axum::routing::get(readiness));

    Router::new().merge(health).merge(api)
}

/// Liveness probe — always returns 200 if the process is running.
async fn liveness() -> &'static str {
    "ok"
}

/// Readiness probe — returns 200 when the application is ready to serve.
async fn readiness() -> &'static str {
    "ready"
}
