//! # Asset Routes — Upload, Mutable Delivery, Publication
//!
//! ## Endpoints
//!
//! - `POST /v1/assets` — upload raw body bytes as a new asset
//! - `GET  /v1/assets/:id` — asset metadata
//! - `GET  /v1/assets/:id/content` — mutable download with conditional GET
//! - `HEAD /v1/assets/:id/content` — delivery headers without a body
//! - `PUT  /v1/assets/:id/content` — replace content (fingerprint recomputed)
//! - `POST /v1/assets/:id/publish` — freeze current content into a version
//!
//! The fingerprint is computed once, at write time, and stored on the
//! record; the download path only compares stored values.

use axum::body::Bytes;
use axum::extract::{Path, Query, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use ambry_cache::{negotiate, select, DeliveryMode, Negotiation};
use ambry_core::{AssetId, AssetRecord, Timestamp};
use ambry_registry::{mint_version, VersionStore};

use crate::error::AppError;
use crate::headers::{attach_content_meta, caching_headers};
use crate::routes::versions::VersionResponse;
use crate::state::AppState;

/// Media type recorded when an upload carries no `Content-Type` header.
const DEFAULT_MEDIA_TYPE: &str = "application/octet-stream";

/// Filename recorded when an upload names none.
const DEFAULT_FILENAME: &str = "asset.bin";

// ── Request/Response DTOs ───────────────────────────────────────────

/// Query parameters accepted by the upload endpoint.
#[derive(Debug, Deserialize)]
pub(crate) struct UploadParams {
    /// Filename to record for `Content-Disposition`.
    pub filename: Option<String>,
    /// Whether the asset is only reachable through access tokens.
    pub private: Option<bool>,
}

/// Asset metadata as returned by the API.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AssetResponse {
    /// Asset identifier.
    pub id: Uuid,
    /// Recorded filename.
    pub filename: String,
    /// Recorded media type.
    pub media_type: String,
    /// Content length in bytes.
    pub size_bytes: u64,
    /// The strong validator for the current content, exactly as it appears
    /// in the `ETag` header. Send it back in `If-None-Match`.
    pub etag: String,
    /// Whether delivery requires an access token.
    pub is_private: bool,
    /// Upload instant (RFC 3339).
    pub created_at: String,
    /// Last content replacement instant (RFC 3339).
    pub updated_at: String,
}

impl AssetResponse {
    pub(crate) fn from_record(record: &AssetRecord) -> Self {
        Self {
            id: *record.id.as_uuid(),
            filename: record.filename.clone(),
            media_type: record.media_type.clone(),
            size_bytes: record.size_bytes,
            etag: record.fingerprint.entity_tag(),
            is_private: record.is_private,
            created_at: record.created_at.to_rfc3339(),
            updated_at: record.updated_at.to_rfc3339(),
        }
    }
}

// ── Router ──────────────────────────────────────────────────────────

/// Build the assets router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/v1/assets", post(upload_asset))
        .route("/v1/assets/:id", get(get_asset))
        .route(
            "/v1/assets/:id/content",
            get(download_content)
                .head(head_content)
                .put(replace_content),
        )
        .route("/v1/assets/:id/publish", post(publish_version))
}

// ── Handlers ────────────────────────────────────────────────────────

fn asset_not_found(id: Uuid) -> AppError {
    AppError::NotFound(format!("asset {id} not found"))
}

fn load_asset(state: &AppState, id: Uuid) -> Result<AssetRecord, AppError> {
    state.assets.get(&id).ok_or_else(|| asset_not_found(id))
}

/// POST /v1/assets — Store the request body as a new asset.
#[utoipa::path(
    post,
    path = "/v1/assets",
    params(
        ("filename" = Option<String>, Query, description = "Filename to record"),
        ("private" = Option<bool>, Query, description = "Restrict delivery to access tokens"),
    ),
    responses(
        (status = 201, description = "Asset stored", body = AssetResponse),
    ),
    tag = "assets"
)]
pub(crate) async fn upload_asset(
    State(state): State<AppState>,
    Query(params): Query<UploadParams>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<(StatusCode, Json<AssetResponse>), AppError> {
    let media_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or(DEFAULT_MEDIA_TYPE)
        .to_string();
    let filename = params
        .filename
        .unwrap_or_else(|| DEFAULT_FILENAME.to_string());

    let record = AssetRecord::create(
        AssetId::new(),
        filename,
        media_type,
        &body,
        params.private.unwrap_or(false),
        Timestamp::now(),
    );

    state.blobs.put(&record.storage_key, &body)?;
    if let Some(pool) = &state.db {
        crate::db::assets::insert(pool, &record).await?;
    }
    state.assets.insert(*record.id.as_uuid(), record.clone());

    tracing::info!(
        asset_id = %record.id,
        size_bytes = record.size_bytes,
        is_private = record.is_private,
        "asset uploaded"
    );
    Ok((StatusCode::CREATED, Json(AssetResponse::from_record(&record))))
}

/// GET /v1/assets/:id — Asset metadata.
#[utoipa::path(
    get,
    path = "/v1/assets/{id}",
    params(("id" = Uuid, Path, description = "Asset ID")),
    responses(
        (status = 200, description = "Asset metadata", body = AssetResponse),
        (status = 404, description = "Asset not found", body = crate::error::ErrorBody),
    ),
    tag = "assets"
)]
pub(crate) async fn get_asset(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<AssetResponse>, AppError> {
    let record = load_asset(&state, id)?;
    Ok(Json(AssetResponse::from_record(&record)))
}

/// GET /v1/assets/:id/content — Mutable download with conditional GET.
///
/// A request whose `If-None-Match` carries the current entity tag gets an
/// empty 304; everything else gets the full body. Both outcomes carry the
/// caching headers for the mutable delivery mode.
#[utoipa::path(
    get,
    path = "/v1/assets/{id}/content",
    params(("id" = Uuid, Path, description = "Asset ID")),
    responses(
        (status = 200, description = "Full content", body = Vec<u8>),
        (status = 304, description = "Client copy is current"),
        (status = 404, description = "Asset not found", body = crate::error::ErrorBody),
    ),
    tag = "assets"
)]
pub(crate) async fn download_content(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    headers: HeaderMap,
) -> Result<Response, AppError> {
    let asset = load_asset(&state, id)?;
    if asset.is_private {
        // Private assets are only reachable through the tokened route;
        // their existence is not disclosed here.
        return Err(asset_not_found(id));
    }

    let validator = headers
        .get(header::IF_NONE_MATCH)
        .and_then(|v| v.to_str().ok());
    let directives = select(DeliveryMode::Mutable);
    let mut response_headers = caching_headers(&asset.fingerprint, &directives, asset.updated_at)?;

    match negotiate(validator, &asset.fingerprint) {
        Negotiation::NotModified => {
            Ok((StatusCode::NOT_MODIFIED, response_headers).into_response())
        }
        Negotiation::FullResponse => {
            let bytes = state
                .blobs
                .get(&asset.storage_key)?
                .ok_or_else(|| AppError::Internal(format!("blob missing for {}", asset.id)))?;
            attach_content_meta(
                &mut response_headers,
                &asset.media_type,
                Some(&asset.filename),
                None,
            )?;
            Ok((StatusCode::OK, response_headers, bytes).into_response())
        }
    }
}

/// HEAD /v1/assets/:id/content — Delivery headers without a body.
#[utoipa::path(
    head,
    path = "/v1/assets/{id}/content",
    params(("id" = Uuid, Path, description = "Asset ID")),
    responses(
        (status = 200, description = "Delivery headers"),
        (status = 304, description = "Client copy is current"),
        (status = 404, description = "Asset not found", body = crate::error::ErrorBody),
    ),
    tag = "assets"
)]
pub(crate) async fn head_content(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    headers: HeaderMap,
) -> Result<Response, AppError> {
    let asset = load_asset(&state, id)?;
    if asset.is_private {
        return Err(asset_not_found(id));
    }

    let validator = headers
        .get(header::IF_NONE_MATCH)
        .and_then(|v| v.to_str().ok());
    let directives = select(DeliveryMode::Mutable);
    let mut response_headers = caching_headers(&asset.fingerprint, &directives, asset.updated_at)?;

    match negotiate(validator, &asset.fingerprint) {
        Negotiation::NotModified => {
            Ok((StatusCode::NOT_MODIFIED, response_headers).into_response())
        }
        Negotiation::FullResponse => {
            attach_content_meta(
                &mut response_headers,
                &asset.media_type,
                Some(&asset.filename),
                Some(asset.size_bytes),
            )?;
            Ok((StatusCode::OK, response_headers).into_response())
        }
    }
}

/// PUT /v1/assets/:id/content — Replace the asset's content.
///
/// The blob is written first, then size, fingerprint, media type, and
/// updated-at change under one store lock, so no reader can pair the new
/// fingerprint with metadata from the old content.
#[utoipa::path(
    put,
    path = "/v1/assets/{id}/content",
    params(("id" = Uuid, Path, description = "Asset ID")),
    responses(
        (status = 200, description = "Content replaced", body = AssetResponse),
        (status = 404, description = "Asset not found", body = crate::error::ErrorBody),
    ),
    tag = "assets"
)]
pub(crate) async fn replace_content(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<AssetResponse>, AppError> {
    let existing = load_asset(&state, id)?;
    let media_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);

    state.blobs.put(&existing.storage_key, &body)?;

    let now = Timestamp::now();
    let updated = state
        .assets
        .update(&id, |record| {
            if let Some(mt) = &media_type {
                record.media_type = mt.clone();
            }
            record.replace_content(&body, now);
        })
        .ok_or_else(|| asset_not_found(id))?;

    if let Some(pool) = &state.db {
        crate::db::assets::update_content(pool, &updated).await?;
    }

    tracing::info!(
        asset_id = %updated.id,
        size_bytes = updated.size_bytes,
        "asset content replaced"
    );
    Ok(Json(AssetResponse::from_record(&updated)))
}

/// POST /v1/assets/:id/publish — Freeze the current content into a version.
///
/// Copies the asset's bytes under a version-owned storage key before the
/// record is appended, so the snapshot is unreachable from any future
/// re-upload of the asset.
#[utoipa::path(
    post,
    path = "/v1/assets/{id}/publish",
    params(("id" = Uuid, Path, description = "Asset ID")),
    responses(
        (status = 201, description = "Version published", body = VersionResponse),
        (status = 404, description = "Asset not found", body = crate::error::ErrorBody),
    ),
    tag = "assets"
)]
pub(crate) async fn publish_version(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<(StatusCode, Json<VersionResponse>), AppError> {
    let asset = load_asset(&state, id)?;
    let bytes = state
        .blobs
        .get(&asset.storage_key)?
        .ok_or_else(|| AppError::Internal(format!("blob missing for {}", asset.id)))?;

    let record = mint_version(asset.id, asset.fingerprint.clone(), Timestamp::now());
    state.blobs.put(&record.storage_key, &bytes)?;
    if let Some(pool) = &state.db {
        crate::db::versions::insert(pool, &record).await?;
    }
    state.versions.insert_new(&record)?;

    tracing::info!(
        asset_id = %asset.id,
        version_id = %record.id,
        "version published"
    );
    Ok((
        StatusCode::CREATED,
        Json(VersionResponse::from_record(&record)),
    ))
}
