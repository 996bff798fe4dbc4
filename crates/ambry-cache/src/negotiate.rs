//! # Conditional Request Negotiation
//!
//! Compares the client's `If-None-Match` header value against the canonical
//! entity-tag rendering of the current content fingerprint.
//!
//! Comparison is strong-validator only: exact string equality, no weak
//! (`W/`) semantics, no wildcard handling. Anything that is not exactly the
//! canonical rendering — including `W/"..."`, `*`, unquoted digests, or
//! arbitrary garbage — simply does not match. The worst outcome of a
//! malformed header is a full 200 response, never a failed request.

use ambry_core::ContentFingerprint;

/// Outcome of conditional negotiation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Negotiation {
    /// Serve the full body with a 200-class status.
    FullResponse,
    /// The client's copy is current: emit 304 with an empty body.
    NotModified,
}

/// Decide between a full response and a not-modified response.
///
/// `client_validator` is the raw `If-None-Match` header value, if the
/// request carried one. It may hold a single entity tag or a
/// comma-separated list; a match on any member yields
/// [`Negotiation::NotModified`].
pub fn negotiate(
    client_validator: Option<&str>,
    current: &ContentFingerprint,
) -> Negotiation {
    let Some(header) = client_validator else {
        return Negotiation::FullResponse;
    };

    let current_tag = current.entity_tag();
    let matched = header
        .split(',')
        .map(str::trim)
        .any(|candidate| candidate == current_tag);

    if matched {
        Negotiation::NotModified
    } else {
        Negotiation::FullResponse
    }
}
