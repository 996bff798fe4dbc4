//! # Token Routes — Issuance and Private Delivery
//!
//! ## Endpoints
//!
//! - `POST /v1/assets/:id/tokens` — mint an access token for one asset
//! - `GET  /v1/assets/:id/private?token=...` — tokened delivery
//!
//! Every denial — unknown value, expired, wrong asset — surfaces to the
//! client as the same generic 401. The specific reason goes to the server
//! log only, so the response cannot be used as an oracle to probe token
//! state.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use ambry_access::{issue, validate, AccessDecision};
use ambry_cache::{select, DeliveryMode};
use ambry_core::{AssetId, Timestamp};

use crate::error::AppError;
use crate::extractors::extract_json;
use crate::headers::{attach_content_meta, caching_headers};
use crate::state::AppState;

// ── Request/Response DTOs ───────────────────────────────────────────

/// Request body for token issuance.
#[derive(Debug, Deserialize, ToSchema)]
pub struct IssueTokenRequest {
    /// Requested lifetime in seconds. Defaults to the service-configured
    /// lifetime when omitted; rejected when non-positive or above the
    /// configured maximum.
    pub ttl_secs: Option<i64>,
}

/// Response from the token issuance endpoint.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct IssueTokenResponse {
    /// The opaque token value. Treat as a secret; it is the whole
    /// credential.
    pub token: String,
    /// The asset this token can read.
    pub asset_id: Uuid,
    /// Expiry instant (RFC 3339).
    pub expires_at: String,
}

/// Query parameters for the private delivery endpoint.
#[derive(Debug, Deserialize)]
pub(crate) struct PrivateAccessParams {
    /// The presented token value.
    pub token: Option<String>,
}

// ── Router ──────────────────────────────────────────────────────────

/// Build the tokens router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/v1/assets/:id/tokens", post(issue_token))
        .route("/v1/assets/:id/private", get(private_content))
}

// ── Handlers ────────────────────────────────────────────────────────

/// POST /v1/assets/:id/tokens — Mint an access token.
#[utoipa::path(
    post,
    path = "/v1/assets/{id}/tokens",
    params(("id" = Uuid, Path, description = "Asset ID")),
    request_body = IssueTokenRequest,
    responses(
        (status = 201, description = "Token issued", body = IssueTokenResponse),
        (status = 404, description = "Asset not found", body = crate::error::ErrorBody),
        (status = 422, description = "Invalid TTL", body = crate::error::ErrorBody),
    ),
    tag = "tokens"
)]
pub(crate) async fn issue_token(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    body: Result<Json<IssueTokenRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<IssueTokenResponse>), AppError> {
    let req = extract_json(body)?;
    let asset = state
        .assets
        .get(&id)
        .ok_or_else(|| AppError::NotFound(format!("asset {id} not found")))?;

    let ttl_secs = req.ttl_secs.unwrap_or(state.config.default_token_ttl_secs);
    let record = issue(asset.id, ttl_secs, Timestamp::now(), &state.config.ttl_policy)?;

    if let Some(pool) = &state.db {
        crate::db::tokens::insert(pool, &record).await?;
    }
    state
        .tokens
        .insert(record.token.expose().to_string(), record.clone());

    tracing::info!(
        asset_id = %asset.id,
        expires_at = %record.expires_at,
        "access token issued"
    );
    Ok((
        StatusCode::CREATED,
        Json(IssueTokenResponse {
            token: record.token.expose().to_string(),
            asset_id: id,
            expires_at: record.expires_at.to_rfc3339(),
        }),
    ))
}

/// GET /v1/assets/:id/private — Tokened delivery of a private asset.
///
/// Responses are never cacheable by any intermediary: the grant is scoped
/// to the bearer of the token, not to the URL.
#[utoipa::path(
    get,
    path = "/v1/assets/{id}/private",
    params(
        ("id" = Uuid, Path, description = "Asset ID"),
        ("token" = Option<String>, Query, description = "Access token value"),
    ),
    responses(
        (status = 200, description = "Content", body = Vec<u8>),
        (status = 401, description = "Access denied", body = crate::error::ErrorBody),
    ),
    tag = "tokens"
)]
pub(crate) async fn private_content(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(params): Query<PrivateAccessParams>,
) -> Result<Response, AppError> {
    let requested = AssetId(id);
    let presented = params.token.as_deref().unwrap_or("");
    let record = state.tokens.get(&presented.to_string());

    match validate(presented, record.as_ref(), &requested, Timestamp::now()) {
        AccessDecision::Grant => {}
        AccessDecision::Deny(reason) => {
            tracing::warn!(
                asset_id = %requested,
                reason = reason.as_str(),
                "private access denied"
            );
            return Err(AppError::Unauthorized("access denied".to_string()));
        }
    }

    let asset = state
        .assets
        .get(&id)
        .ok_or_else(|| AppError::NotFound(format!("asset {id} not found")))?;

    let directives = select(DeliveryMode::Private);
    let mut response_headers = caching_headers(&asset.fingerprint, &directives, asset.updated_at)?;
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
