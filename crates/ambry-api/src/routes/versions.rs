//! # Version Routes — Immutable Delivery
//!
//! ## Endpoints
//!
//! - `GET  /v1/versions/:id` — immutable content, permanently cacheable
//! - `HEAD /v1/versions/:id` — delivery headers without a body
//!
//! Version content never changes, so responses carry an effectively
//! permanent caching lifetime and clients holding the entity tag need
//! never revalidate. Conditional requests are still honored for caches
//! that revalidate anyway.

use axum::extract::{Path, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use ambry_cache::{negotiate, select, DeliveryMode, Negotiation};
use ambry_core::VersionId;
use ambry_registry::{resolve, VersionRecord};

use crate::error::AppError;
use crate::headers::{attach_content_meta, caching_headers};
use crate::state::AppState;

/// Version snapshots carry bytes, not media metadata.
const VERSION_MEDIA_TYPE: &str = "application/octet-stream";

// ── Response DTO ────────────────────────────────────────────────────

/// Published version metadata as returned by the API.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct VersionResponse {
    /// Version identifier — public, permanent, cacheable.
    pub version_id: Uuid,
    /// The asset this version was published from.
    pub asset_id: Uuid,
    /// The strong validator of the frozen content, exactly as it appears
    /// in the `ETag` header.
    pub etag: String,
    /// Publication instant (RFC 3339).
    pub created_at: String,
}

impl VersionResponse {
    pub(crate) fn from_record(record: &VersionRecord) -> Self {
        Self {
            version_id: *record.id.as_uuid(),
            asset_id: *record.asset_id.as_uuid(),
            etag: record.fingerprint.entity_tag(),
            created_at: record.created_at.to_rfc3339(),
        }
    }
}

// ── Router ──────────────────────────────────────────────────────────

/// Build the versions router.
pub fn router() -> Router<AppState> {
    Router::new().route("/v1/versions/:id", get(download_version).head(head_version))
}

// ── Handlers ────────────────────────────────────────────────────────

/// GET /v1/versions/:id — Immutable content delivery.
#[utoipa::path(
    get,
    path = "/v1/versions/{id}",
    params(("id" = Uuid, Path, description = "Version ID")),
    responses(
        (status = 200, description = "Frozen content", body = Vec<u8>),
        (status = 304, description = "Client copy is current"),
        (status = 404, description = "Version not found", body = crate::error::ErrorBody),
    ),
    tag = "versions"
)]
pub(crate) async fn download_version(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    headers: HeaderMap,
) -> Result<Response, AppError> {
    let record = resolve(&state.versions, &VersionId(id))?;

    let validator = headers
        .get(header::IF_NONE_MATCH)
        .and_then(|v| v.to_str().ok());
    let directives = select(DeliveryMode::ImmutableVersion);
    let mut response_headers =
        caching_headers(&record.fingerprint, &directives, record.created_at)?;

    match negotiate(validator, &record.fingerprint) {
        Negotiation::NotModified => {
            Ok((StatusCode::NOT_MODIFIED, response_headers).into_response())
        }
        Negotiation::FullResponse => {
            let bytes = state
                .blobs
                .get(&record.storage_key)?
                .ok_or_else(|| AppError::Internal(format!("blob missing for {}", record.id)))?;
            attach_content_meta(&mut response_headers, VERSION_MEDIA_TYPE, None, None)?;
            Ok((StatusCode::OK, response_headers, bytes).into_response())
        }
    }
}

/// HEAD /v1/versions/:id — Delivery headers without a body.
#[utoipa::path(
    head,
    path = "/v1/versions/{id}",
    params(("id" = Uuid, Path, description = "Version ID")),
    responses(
        (status = 200, description = "Delivery headers"),
        (status = 304, description = "Client copy is current"),
        (status = 404, description = "Version not found", body = crate::error::ErrorBody),
    ),
    tag = "versions"
)]
pub(crate) async fn head_version(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    headers: HeaderMap,
) -> Result<Response, AppError> {
    let record = resolve(&state.versions, &VersionId(id))?;

    let validator = headers
        .get(header::IF_NONE_MATCH)
        .and_then(|v| v.to_str().ok());
    let directives = select(DeliveryMode::ImmutableVersion);
    let mut response_headers =
        caching_headers(&record.fingerprint, &directives, record.created_at)?;

    match negotiate(validator, &record.fingerprint) {
        Negotiation::NotModified => {
            Ok((StatusCode::NOT_MODIFIED, response_headers).into_response())
        }
        Negotiation::FullResponse => {
            attach_content_meta(&mut response_headers, VERSION_MEDIA_TYPE, None, None)?;
            Ok((StatusCode::OK, response_headers).into_response())
        }
    }
}
