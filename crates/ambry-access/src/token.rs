//! # Token Values
//!
//! [`TokenValue`] is the opaque secret handed to clients. It generates from
//! the operating system CSPRNG, compares in constant time, zeroizes its
//! memory on drop, and redacts itself from `Debug` output so it cannot leak
//! through logs.

use rand_core::{OsRng, RngCore};
use serde::{Deserialize, Serialize};
use subtle::ConstantTimeEq;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Bytes of CSPRNG entropy behind each token (256 bits).
const TOKEN_ENTROPY_BYTES: usize = 32;

/// An opaque, unguessable token value.
///
/// Rendered as lowercase hex; clients treat it as a black box. Equality —
/// against another `TokenValue` or a presented string — is constant-time.
#[derive(Clone, Serialize, Deserialize, Zeroize, ZeroizeOnDrop)]
#[serde(transparent)]
pub struct TokenValue(String);

impl TokenValue {
    /// Generate a fresh token from the operating system CSPRNG.
    pub fn generate() -> Self {
        let mut buf = [0u8; TOKEN_ENTROPY_BYTES];
        OsRng.fill_bytes(&mut buf);
        Self(buf.iter().map(|b| format!("{b:02x}")).collect())
    }

    /// Wrap a value loaded back from the metadata store.
    pub fn from_raw(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// The token as a string slice, for transport and persistence.
    pub fn expose(&self) -> &str {
        &self.0
    }

    /// Constant-time comparison against a presented value.
    ///
    /// When lengths differ a dummy comparison runs anyway, so the length
    /// mismatch is not observable through timing variance either.
    pub fn matches(&self, presented: &str) -> bool {
        let stored = self.0.as_bytes();
        let presented = presented.as_bytes();
        if stored.len() != presented.len() {
            let _ = stored.ct_eq(stored);
            return false;
        }
        stored.ct_eq(presented).into()
    }
}

impl PartialEq for TokenValue {
    fn eq(&self, other: &Self) -> bool {
        self.matches(&other.0)
    }
}

impl Eq for TokenValue {}

/// Redacted — token values must never reach logs or error messages.
impl std::fmt::Debug for TokenValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("TokenValue([REDACTED])")
    }
}
