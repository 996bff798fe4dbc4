//! # OpenAPI Specification Assembly
//!
//! Assembles all utoipa-documented routes into a single OpenAPI spec,
//! served at `/openapi.json`.

use axum::routing::get;
use axum::{Json, Router};
use utoipa::OpenApi;

use crate::state::AppState;

/// Assembled OpenAPI spec for the entire API surface.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Ambry Delivery API",
        version = "0.3.2",
        description = "Cache-correct asset delivery: strong validators, conditional GET, immutable versioned publication, and time-boxed private access.",
        license(name = "Apache-2.0")
    ),
    paths(
        // Assets
        crate::routes::assets::upload_asset,
        crate::routes::assets::get_asset,
        crate::routes::assets::download_content,
        crate::routes::assets::head_content,
        crate::routes::assets::replace_content,
        crate::routes::assets::publish_version,
        // Versions
        crate::routes::versions::download_version,
        crate::routes::versions::head_version,
        // Tokens
        crate::routes::tokens::issue_token,
        crate::routes::tokens::private_content,
    ),
    components(schemas(
        crate::routes::assets::AssetResponse,
        crate::routes::versions::VersionResponse,
        crate::routes::tokens::IssueTokenRequest,
        crate::routes::tokens::IssueTokenResponse,
        crate::error::ErrorBody,
        crate::error::ErrorDetail,
    )),
    tags(
        (name = "assets", description = "Upload, mutable delivery, and publication"),
        (name = "versions", description = "Immutable version delivery"),
        (name = "tokens", description = "Access token issuance and private delivery"),
    )
)]
pub struct ApiDoc;

/// Build the OpenAPI router.
///
/// Serves the OpenAPI JSON spec at `/openapi.json`.
pub fn router() -> Router<AppState> {
    Router::new().route("/openapi.json", get(openapi_json))
}

/// GET /openapi.json — Return the generated OpenAPI specification.
async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
