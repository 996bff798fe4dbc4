//! # Integration Tests for ambry-api
//!
//! Drives the assembled router end-to-end: upload and conditional
//! delivery, validator rotation on re-upload, immutable version
//! publication, tokened private access, and the caching headers each
//! delivery mode must emit.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use tower::ServiceExt;

use ambry_api::state::AppState;

/// Helper: build the test app with in-memory collaborators.
fn test_app() -> axum::Router {
    ambry_api::app(AppState::new())
}

/// Helper: read a response body as raw bytes.
async fn body_bytes(response: axum::http::Response<Body>) -> Vec<u8> {
    response
        .into_body()
        .collect()
        .await
        .unwrap()
        .to_bytes()
        .to_vec()
}

/// Helper: read a response body as JSON.
async fn body_json(response: axum::http::Response<Body>) -> serde_json::Value {
    let bytes = body_bytes(response).await;
    serde_json::from_slice(&bytes).unwrap()
}

/// Helper: header value as &str.
fn header<'a>(response: &'a axum::http::Response<Body>, name: &str) -> Option<&'a str> {
    response.headers().get(name).and_then(|v| v.to_str().ok())
}

/// Helper: upload a body and return the parsed response JSON.
async fn upload(app: &axum::Router, query: &str, content_type: &str, bytes: &[u8]) -> serde_json::Value {
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(format!("/v1/assets{query}"))
                .header("content-type", content_type)
                .body(Body::from(bytes.to_vec()))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await
}

/// Helper: plain GET.
async fn get(app: &axum::Router, uri: &str) -> axum::http::Response<Body> {
    app.clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap()
}

/// Helper: GET with an `If-None-Match` header.
async fn get_conditional(
    app: &axum::Router,
    uri: &str,
    validator: &str,
) -> axum::http::Response<Body> {
    app.clone()
        .oneshot(
            Request::builder()
                .uri(uri)
                .header("if-none-match", validator)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap()
}

// -- Health Probes ------------------------------------------------------------

#[tokio::test]
async fn liveness_probe() {
    let response = get(&test_app(), "/health/liveness").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_bytes(response).await, b"ok");
}

#[tokio::test]
async fn readiness_probe() {
    let response = get(&test_app(), "/health/readiness").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_bytes(response).await, b"ready");
}

// -- Upload -------------------------------------------------------------------

#[tokio::test]
async fn upload_returns_metadata_with_validator() {
    let app = test_app();
    let created = upload(&app, "?filename=hello.txt", "text/plain", b"hello").await;

    assert_eq!(created["filename"], "hello.txt");
    assert_eq!(created["media_type"], "text/plain");
    assert_eq!(created["size_bytes"], 5);
    assert_eq!(created["is_private"], false);

    let etag = created["etag"].as_str().unwrap();
    assert!(etag.starts_with('"') && etag.ends_with('"'));
    // SHA256("hello"), quoted.
    assert_eq!(
        etag,
        "\"2cf24dba5fb0a30e26e83b2ac5b9e29e1b161e5c1fa7425e73043362938b9824\""
    );
}

#[tokio::test]
async fn upload_defaults_filename_and_media_type() {
    let app = test_app();
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/v1/assets")
                .body(Body::from("raw"))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let created = body_json(response).await;
    assert_eq!(created["filename"], "asset.bin");
    assert_eq!(created["media_type"], "application/octet-stream");
}

#[tokio::test]
async fn asset_metadata_roundtrip() {
    let app = test_app();
    let created = upload(&app, "?filename=a.txt", "text/plain", b"abc").await;
    let id = created["id"].as_str().unwrap();

    let response = get(&app, &format!("/v1/assets/{id}")).await;
    assert_eq!(response.status(), StatusCode::OK);
    let fetched = body_json(response).await;
    assert_eq!(fetched["etag"], created["etag"]);
    assert_eq!(fetched["size_bytes"], 3);
}

// -- Mutable Delivery ---------------------------------------------------------

#[tokio::test]
async fn download_serves_body_with_caching_headers() {
    let app = test_app();
    let created = upload(&app, "?filename=hello.txt", "text/plain", b"hello").await;
    let id = created["id"].as_str().unwrap();

    let response = get(&app, &format!("/v1/assets/{id}/content")).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(header(&response, "etag"), created["etag"].as_str());
    assert_eq!(
        header(&response, "cache-control"),
        Some("public, max-age=60, s-maxage=3600")
    );
    assert!(header(&response, "last-modified").unwrap().ends_with("GMT"));
    assert_eq!(
        header(&response, "content-disposition"),
        Some("inline; filename=\"hello.txt\"")
    );
    assert_eq!(header(&response, "content-type"), Some("text/plain"));
    assert_eq!(body_bytes(response).await, b"hello");
}

#[tokio::test]
async fn matching_validator_returns_304_with_empty_body() {
    let app = test_app();
    let created = upload(&app, "", "text/plain", b"cache test").await;
    let id = created["id"].as_str().unwrap();
    let etag = created["etag"].as_str().unwrap();

    let response = get_conditional(&app, &format!("/v1/assets/{id}/content"), etag).await;
    assert_eq!(response.status(), StatusCode::NOT_MODIFIED);
    assert_eq!(header(&response, "etag"), Some(etag));
    assert_eq!(
        header(&response, "cache-control"),
        Some("public, max-age=60, s-maxage=3600")
    );
    assert!(body_bytes(response).await.is_empty());
}

#[tokio::test]
async fn stale_validator_returns_full_body() {
    let app = test_app();
    let created = upload(&app, "", "text/plain", b"current").await;
    let id = created["id"].as_str().unwrap();

    let response = get_conditional(
        &app,
        &format!("/v1/assets/{id}/content"),
        "\"0000000000000000000000000000000000000000000000000000000000000000\"",
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_bytes(response).await, b"current");
}

#[tokio::test]
async fn malformed_validator_degrades_to_full_body() {
    let app = test_app();
    let created = upload(&app, "", "text/plain", b"content").await;
    let id = created["id"].as_str().unwrap();

    for garbage in ["W/\"weak\"", "*", "not-an-etag", ",,,"] {
        let response = get_conditional(&app, &format!("/v1/assets/{id}/content"), garbage).await;
        assert_eq!(response.status(), StatusCode::OK, "validator {garbage:?}");
    }
}

#[tokio::test]
async fn reupload_rotates_the_validator() {
    let app = test_app();
    let created = upload(&app, "?filename=hello.txt", "text/plain", b"hello").await;
    let id = created["id"].as_str().unwrap();
    let old_etag = created["etag"].as_str().unwrap();

    // Old validator currently matches.
    let response = get_conditional(&app, &format!("/v1/assets/{id}/content"), old_etag).await;
    assert_eq!(response.status(), StatusCode::NOT_MODIFIED);

    // Replace the content.
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("PUT")
                .uri(format!("/v1/assets/{id}/content"))
                .header("content-type", "text/plain")
                .body(Body::from("hello2"))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let updated = body_json(response).await;
    let new_etag = updated["etag"].as_str().unwrap();
    assert_ne!(new_etag, old_etag);
    assert_eq!(updated["size_bytes"], 6);

    // The old validator no longer matches; the new one does.
    let response = get_conditional(&app, &format!("/v1/assets/{id}/content"), old_etag).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_bytes(response).await, b"hello2");

    let response = get_conditional(&app, &format!("/v1/assets/{id}/content"), new_etag).await;
    assert_eq!(response.status(), StatusCode::NOT_MODIFIED);
}

#[tokio::test]
async fn head_returns_headers_without_body() {
    let app = test_app();
    let created = upload(&app, "?filename=hello.txt", "text/plain", b"hello world").await;
    let id = created["id"].as_str().unwrap();

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("HEAD")
                .uri(format!("/v1/assets/{id}/content"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(header(&response, "etag"), created["etag"].as_str());
    assert_eq!(header(&response, "content-length"), Some("11"));
    assert!(body_bytes(response).await.is_empty());
}

#[tokio::test]
async fn download_unknown_asset_is_404() {
    let response = get(
        &test_app(),
        "/v1/assets/00000000-0000-0000-0000-000000000000/content",
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = body_json(response).await;
    assert_eq!(body["error"]["code"], "NOT_FOUND");
}

// -- Immutable Versions -------------------------------------------------------

async fn publish(app: &axum::Router, id: &str) -> serde_json::Value {
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(format!("/v1/assets/{id}/publish"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await
}

#[tokio::test]
async fn published_version_serves_frozen_content() {
    let app = test_app();
    let created = upload(&app, "", "text/plain", b"frozen").await;
    let id = created["id"].as_str().unwrap();

    let version = publish(&app, id).await;
    let version_id = version["version_id"].as_str().unwrap();
    assert_eq!(version["etag"], created["etag"]);

    let response = get(&app, &format!("/v1/versions/{version_id}")).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        header(&response, "cache-control"),
        Some("public, max-age=31536000, immutable")
    );
    assert_eq!(header(&response, "etag"), created["etag"].as_str());
    assert_eq!(body_bytes(response).await, b"frozen");
}

#[tokio::test]
async fn version_survives_asset_reupload() {
    let app = test_app();
    let created = upload(&app, "", "text/plain", b"first").await;
    let id = created["id"].as_str().unwrap();

    let v1 = publish(&app, id).await;
    let v1_id = v1["version_id"].as_str().unwrap();

    // Mutate the asset, then publish again.
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("PUT")
                .uri(format!("/v1/assets/{id}/content"))
                .body(Body::from("second"))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let v2 = publish(&app, id).await;
    let v2_id = v2["version_id"].as_str().unwrap();
    assert_ne!(v1_id, v2_id);
    assert_ne!(v1["etag"], v2["etag"]);

    // v1 still serves the first content, byte for byte.
    let response = get(&app, &format!("/v1/versions/{v1_id}")).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(header(&response, "etag"), v1["etag"].as_str());
    assert_eq!(body_bytes(response).await, b"first");

    let response = get(&app, &format!("/v1/versions/{v2_id}")).await;
    assert_eq!(body_bytes(response).await, b"second");
}

#[tokio::test]
async fn version_conditional_get_returns_304() {
    let app = test_app();
    let created = upload(&app, "", "text/plain", b"frozen").await;
    let id = created["id"].as_str().unwrap();
    let version = publish(&app, id).await;
    let version_id = version["version_id"].as_str().unwrap();
    let etag = version["etag"].as_str().unwrap();

    let response = get_conditional(&app, &format!("/v1/versions/{version_id}"), etag).await;
    assert_eq!(response.status(), StatusCode::NOT_MODIFIED);
    assert!(body_bytes(response).await.is_empty());
}

#[tokio::test]
async fn unknown_version_is_404() {
    let response = get(
        &test_app(),
        "/v1/versions/00000000-0000-0000-0000-000000000000",
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = body_json(response).await;
    assert_eq!(body["error"]["code"], "NOT_FOUND");
}

#[tokio::test]
async fn version_head_carries_immutable_headers() {
    let app = test_app();
    let created = upload(&app, "", "text/plain", b"frozen").await;
    let id = created["id"].as_str().unwrap();
    let version = publish(&app, id).await;
    let version_id = version["version_id"].as_str().unwrap();

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("HEAD")
                .uri(format!("/v1/versions/{version_id}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        header(&response, "cache-control"),
        Some("public, max-age=31536000, immutable")
    );
    assert!(body_bytes(response).await.is_empty());
}

// -- Access Tokens ------------------------------------------------------------

async fn issue_token(app: &axum::Router, id: &str, body: &str) -> axum::http::Response<Body> {
    app.clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(format!("/v1/assets/{id}/tokens"))
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap()
}

#[tokio::test]
async fn private_asset_hidden_from_public_route() {
    let app = test_app();
    let created = upload(&app, "?private=true", "text/plain", b"secret").await;
    let id = created["id"].as_str().unwrap();
    assert_eq!(created["is_private"], true);

    let response = get(&app, &format!("/v1/assets/{id}/content")).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn token_grants_private_access() {
    let app = test_app();
    let created = upload(&app, "?private=true&filename=secret.txt", "text/plain", b"secret").await;
    let id = created["id"].as_str().unwrap();

    let response = issue_token(&app, id, "{}").await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let issued = body_json(response).await;
    let token = issued["token"].as_str().unwrap();
    assert_eq!(token.len(), 64);
    assert_eq!(issued["asset_id"].as_str().unwrap(), id);

    let response = get(&app, &format!("/v1/assets/{id}/private?token={token}")).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        header(&response, "cache-control"),
        Some("private, no-store, no-cache, must-revalidate")
    );
    assert_eq!(body_bytes(response).await, b"secret");
}

#[tokio::test]
async fn token_is_reusable_within_its_window() {
    let app = test_app();
    let created = upload(&app, "?private=true", "text/plain", b"secret").await;
    let id = created["id"].as_str().unwrap();
    let issued = body_json(issue_token(&app, id, "{}").await).await;
    let token = issued["token"].as_str().unwrap();

    for _ in 0..3 {
        let response = get(&app, &format!("/v1/assets/{id}/private?token={token}")).await;
        assert_eq!(response.status(), StatusCode::OK);
    }
}

#[tokio::test]
async fn token_for_one_asset_denied_on_another() {
    let app = test_app();
    let first = upload(&app, "?private=true", "text/plain", b"one").await;
    let second = upload(&app, "?private=true", "text/plain", b"two").await;
    let first_id = first["id"].as_str().unwrap();
    let second_id = second["id"].as_str().unwrap();

    let issued = body_json(issue_token(&app, first_id, "{}").await).await;
    let token = issued["token"].as_str().unwrap();

    let response = get(&app, &format!("/v1/assets/{second_id}/private?token={token}")).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = body_json(response).await;
    assert_eq!(body["error"]["code"], "UNAUTHORIZED");
    // The denial must not disclose why.
    let message = body["error"]["message"].as_str().unwrap().to_lowercase();
    assert!(!message.contains("mismatch"));
    assert!(!message.contains("expired"));
}

#[tokio::test]
async fn unknown_token_denied() {
    let app = test_app();
    let created = upload(&app, "?private=true", "text/plain", b"secret").await;
    let id = created["id"].as_str().unwrap();

    let bogus = "ff".repeat(32);
    let response = get(&app, &format!("/v1/assets/{id}/private?token={bogus}")).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn missing_token_denied() {
    let app = test_app();
    let created = upload(&app, "?private=true", "text/plain", b"secret").await;
    let id = created["id"].as_str().unwrap();

    let response = get(&app, &format!("/v1/assets/{id}/private")).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn zero_and_negative_ttl_rejected() {
    let app = test_app();
    let created = upload(&app, "", "text/plain", b"x").await;
    let id = created["id"].as_str().unwrap();

    for body in ["{\"ttl_secs\": 0}", "{\"ttl_secs\": -5}"] {
        let response = issue_token(&app, id, body).await;
        assert_eq!(
            response.status(),
            StatusCode::UNPROCESSABLE_ENTITY,
            "body {body:?}"
        );
        let err = body_json(response).await;
        assert_eq!(err["error"]["code"], "VALIDATION_ERROR");
    }
}

#[tokio::test]
async fn oversized_ttl_rejected() {
    let app = test_app();
    let created = upload(&app, "", "text/plain", b"x").await;
    let id = created["id"].as_str().unwrap();

    // Far above the default seven-day ceiling.
    let response = issue_token(&app, id, "{\"ttl_secs\": 99999999}").await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn token_for_unknown_asset_is_404() {
    let response = issue_token(
        &test_app(),
        "00000000-0000-0000-0000-000000000000",
        "{}",
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn token_expires() {
    let app = test_app();
    let created = upload(&app, "?private=true", "text/plain", b"secret").await;
    let id = created["id"].as_str().unwrap();

    let issued = body_json(issue_token(&app, id, "{\"ttl_secs\": 1}").await).await;
    let token = issued["token"].as_str().unwrap();

    // Valid immediately.
    let response = get(&app, &format!("/v1/assets/{id}/private?token={token}")).await;
    assert_eq!(response.status(), StatusCode::OK);

    // Expired after the window passes. Timestamps have one-second
    // resolution, so wait comfortably past the boundary.
    tokio::time::sleep(std::time::Duration::from_millis(2_100)).await;
    let response = get(&app, &format!("/v1/assets/{id}/private?token={token}")).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

// -- OpenAPI ------------------------------------------------------------------

#[tokio::test]
async fn openapi_spec_is_served() {
    let response = get(&test_app(), "/openapi.json").await;
    assert_eq!(response.status(), StatusCode::OK);
    let spec = body_json(response).await;
    assert!(spec["paths"]["/v1/assets"].is_object());
    assert!(spec["paths"]["/v1/versions/{id}"].is_object());
}
