#![deny(missing_docs)]

//! # ambry-access — Access Token Authority
//!
//! Issues and validates the opaque tokens that grant time-boxed anonymous
//! access to a single private asset.
//!
//! ## Token Model
//!
//! A token is 32 bytes of CSPRNG output rendered as lowercase hex — an
//! opaque value with no internal structure for callers to parse. Each token
//! is bound to exactly one asset and carries an expiry instant; validity is
//! a pure function of the stored record, the requested asset, and the
//! current time. Validation has no side effects: it does not consume the
//! token, extend its lifetime, or write anything.
//!
//! ## Security Invariant
//!
//! Presented token values are compared against stored values in constant
//! time, so response timing cannot reveal how much of a guessed token
//! prefix was correct. There is no revocation state — expiry is the only
//! terminal condition, and early revocation means deleting the record.

pub mod authority;
pub mod token;

pub use authority::{
    issue, validate, AccessDecision, AccessTokenRecord, DenyReason, IssueError, TtlPolicy,
    DEFAULT_TOKEN_TTL_SECS,
};
pub use token::TokenValue;
