//! # Response Header Assembly
//!
//! Renders the header values the decision logic produces: the entity tag,
//! the cache-control directives for the delivery mode, and the standard
//! content metadata. Handlers call these helpers instead of assembling
//! header strings inline, so every route emits the same header shapes.

use axum::http::header::{
    HeaderMap, HeaderValue, CACHE_CONTROL, CONTENT_DISPOSITION, CONTENT_LENGTH, CONTENT_TYPE, ETAG,
    LAST_MODIFIED,
};

use ambry_cache::DirectiveSet;
use ambry_core::{ContentFingerprint, Timestamp};

use crate::error::AppError;

/// Build the caching header set for a delivery response: `ETag`,
/// `Cache-Control`, and `Last-Modified`. Emitted on both full and
/// not-modified responses so caches can refresh their stored metadata.
pub fn caching_headers(
    fingerprint: &ContentFingerprint,
    directives: &DirectiveSet,
    last_modified: Timestamp,
) -> Result<HeaderMap, AppError> {
    let mut headers = HeaderMap::new();
    headers.insert(ETAG, header_value(&fingerprint.entity_tag())?);
    headers.insert(CACHE_CONTROL, header_value(&directives.cache_control())?);
    headers.insert(LAST_MODIFIED, header_value(&last_modified.to_http_date())?);
    Ok(headers)
}

/// Attach content metadata to a response: `Content-Type`, an inline
/// `Content-Disposition` when a filename is known, and `Content-Length`
/// when the caller supplies one (HEAD responses carry it without a body).
pub fn attach_content_meta(
    headers: &mut HeaderMap,
    media_type: &str,
    filename: Option<&str>,
    content_length: Option<u64>,
) -> Result<(), AppError> {
    headers.insert(CONTENT_TYPE, header_value(media_type)?);
    if let Some(name) = filename {
        let disposition = format!("inline; filename=\"{}\"", sanitize_filename(name));
        headers.insert(CONTENT_DISPOSITION, header_value(&disposition)?);
    }
    if let Some(len) = content_length {
        headers.insert(CONTENT_LENGTH, header_value(&len.to_string())?);
    }
    Ok(())
}

/// Strip characters that would break the quoted-string filename parameter.
fn sanitize_filename(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c == '"' || c == '\\' || c.is_control() {
                '_'
            } else {
                c
            }
        })
        .collect()
}

fn header_value(value: &str) -> Result<HeaderValue, AppError> {
    HeaderValue::from_str(value)
        .map_err(|e| AppError::Internal(format!("unencodable header value: {e}")))
}
