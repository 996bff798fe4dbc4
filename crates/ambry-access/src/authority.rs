//! # Issuance and Validation
//!
//! The two operations of the token authority. Both are pure over their
//! inputs: `issue` derives a record from the clock value it is handed, and
//! `validate` inspects a record the caller loaded — neither touches
//! storage, so both are safe under arbitrary concurrency.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use ambry_core::{AssetId, Timestamp};

use crate::token::TokenValue;

/// Default token lifetime when the caller does not specify one: 5 minutes.
pub const DEFAULT_TOKEN_TTL_SECS: i64 = 300;

/// Bounds on requested token lifetimes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TtlPolicy {
    /// Longest lifetime a caller may request, in seconds.
    pub max_ttl_secs: i64,
}

impl Default for TtlPolicy {
    /// Seven days. Long enough for share links, short enough that a leaked
    /// token has a bounded window.
    fn default() -> Self {
        Self {
            max_ttl_secs: 7 * 24 * 3_600,
        }
    }
}

/// Error issuing a token.
///
/// A rejected TTL is a caller bug or misconfiguration, not a retryable
/// condition.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum IssueError {
    /// The requested lifetime was non-positive or above the policy maximum.
    #[error("invalid token ttl {ttl_secs}s: must be positive and at most {max_ttl_secs}s")]
    InvalidTtl {
        /// The rejected lifetime.
        ttl_secs: i64,
        /// The policy ceiling in force.
        max_ttl_secs: i64,
    },
}

/// A stored access token: the secret value plus its binding and window.
///
/// Append-only — records are created by [`issue()`] and never mutated.
/// `Debug` output redacts the token value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccessTokenRecord {
    /// The secret token value presented by clients.
    pub token: TokenValue,
    /// The one asset this token can read.
    pub asset_id: AssetId,
    /// When the token was minted.
    pub issued_at: Timestamp,
    /// First instant at which the token is no longer valid.
    pub expires_at: Timestamp,
}

/// Mint a token granting read access to `asset_id` for `ttl_secs` seconds.
///
/// The clock is an argument rather than read internally so issuance is a
/// pure function of its inputs and trivially testable at fixed instants.
pub fn issue(
    asset_id: AssetId,
    ttl_secs: i64,
    now: Timestamp,
    policy: &TtlPolicy,
) -> Result<AccessTokenRecord, IssueError> {
    if ttl_secs <= 0 || ttl_secs > policy.max_ttl_secs {
        return Err(IssueError::InvalidTtl {
            ttl_secs,
            max_ttl_secs: policy.max_ttl_secs,
        });
    }
    Ok(AccessTokenRecord {
        token: TokenValue::generate(),
        asset_id,
        issued_at: now,
        expires_at: now.plus_seconds(ttl_secs),
    })
}

/// Why a validation attempt was denied.
///
/// The distinction exists for server-side logging; clients receive one
/// undifferentiated denial so the reason cannot be used as an oracle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DenyReason {
    /// No stored token matches the presented value.
    Unknown,
    /// The token exists but its lifetime has elapsed.
    Expired,
    /// The token is bound to a different asset.
    AssetMismatch,
}

impl DenyReason {
    /// Stable string form for structured log fields.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unknown => "unknown",
            Self::Expired => "expired",
            Self::AssetMismatch => "asset_mismatch",
        }
    }
}

/// Outcome of a validation attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessDecision {
    /// The token is valid for the requested asset at this instant.
    Grant,
    /// Access denied; the reason is for logs only.
    Deny(DenyReason),
}

/// Validate a presented token value against the record the caller loaded.
///
/// `record` is `None` when the lookup found nothing. The stored value is
/// still compared in constant time when a record is present, so a lookup
/// that was satisfied by an index does not short-circuit the comparison.
///
/// Pure: no side effects, no lifetime extension on use. A token remains
/// reusable until its expiry instant; at `now >= expires_at` it is expired.
pub fn validate(
    presented: &str,
    record: Option<&AccessTokenRecord>,
    requested_asset: &AssetId,
    now: Timestamp,
) -> AccessDecision {
    let Some(record) = record else {
        return AccessDecision::Deny(DenyReason::Unknown);
    };
    if !record.token.matches(presented) {
        return AccessDecision::Deny(DenyReason::Unknown);
    }
    if now >= record.expires_at {
        return AccessDecision::Deny(DenyReason::Expired);
    }
    if record.asset_id != *requested_asset {
        return AccessDecision::Deny(DenyReason::AssetMismatch);
    }
    AccessDecision::Grant
}
