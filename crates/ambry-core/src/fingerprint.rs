//! # Content Fingerprints — Strong Cache Validators
//!
//! Defines [`ContentFingerprint`] and the [`fingerprint_bytes()`] function
//! that produces one from a raw body. A fingerprint is a strong validator:
//! it changes whenever the content changes byte-for-byte, with no tolerance
//! for semantically-equivalent rewrites.
//!
//! ## Invariant
//!
//! Fingerprints are computed at write time and stored alongside the bytes
//! they describe. Comparison paths only ever compare stored values — they
//! never recompute unless handed fresh bytes, so they are correct whether
//! or not the caller memoizes.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use thiserror::Error;

/// The hash algorithm used to produce a content fingerprint.
///
/// SHA-256 is the only algorithm in use. The tag is carried anyway so that
/// stored fingerprints remain self-describing if a migration ever becomes
/// necessary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FingerprintAlgorithm {
    /// SHA-256 — 256-bit strong digest.
    Sha256,
}

impl FingerprintAlgorithm {
    /// Returns the algorithm identifier string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Sha256 => "sha256",
        }
    }
}

impl std::fmt::Display for FingerprintAlgorithm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A strong content fingerprint with its algorithm tag.
///
/// The 32-byte digest and algorithm tag together form a self-describing
/// content identifier. Two fingerprints are equal iff the algorithm and
/// every digest byte are equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ContentFingerprint {
    /// The hash algorithm that produced this fingerprint.
    pub algorithm: FingerprintAlgorithm,
    /// The raw 32-byte digest value.
    pub bytes: [u8; 32],
}

impl ContentFingerprint {
    /// Create a SHA-256 fingerprint from a raw 32-byte digest.
    ///
    /// Prefer [`fingerprint_bytes()`] for computing fingerprints from
    /// content.
    pub fn sha256(bytes: [u8; 32]) -> Self {
        Self {
            algorithm: FingerprintAlgorithm::Sha256,
            bytes,
        }
    }

    /// Render the digest as a lowercase hex string.
    pub fn to_hex(&self) -> String {
        self.bytes.iter().map(|b| format!("{b:02x}")).collect()
    }

    /// The canonical validator rendering: a quoted strong entity tag.
    ///
    /// This is the exact string emitted in the `ETag` response header and
    /// the exact string conditional requests are compared against.
    pub fn entity_tag(&self) -> String {
        format!("\"{}\"", self.to_hex())
    }

    /// Parse the `{algorithm}:{hex}` rendering produced by [`Display`].
    ///
    /// Used when rehydrating fingerprints persisted as text.
    ///
    /// [`Display`]: std::fmt::Display
    pub fn parse(s: &str) -> Result<Self, ParseFingerprintError> {
        let (algo, hex) = s
            .split_once(':')
            .ok_or_else(|| ParseFingerprintError::MissingAlgorithmTag(s.to_string()))?;
        if algo != "sha256" {
            return Err(ParseFingerprintError::UnknownAlgorithm(algo.to_string()));
        }
        if hex.len() != 64 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(ParseFingerprintError::MalformedDigest(hex.to_string()));
        }
        let mut bytes = [0u8; 32];
        for (i, chunk) in hex.as_bytes().chunks(2).enumerate() {
            // Infallible: both characters were verified as hex digits above.
            let high = (chunk[0] as char).to_digit(16).unwrap_or(0) as u8;
            let low = (chunk[1] as char).to_digit(16).unwrap_or(0) as u8;
            bytes[i] = (high << 4) | low;
        }
        Ok(Self::sha256(bytes))
    }
}

impl std::fmt::Display for ContentFingerprint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.algorithm, self.to_hex())
    }
}

/// Error parsing a textual fingerprint rendering.
#[derive(Error, Debug)]
pub enum ParseFingerprintError {
    /// The string carries no `{algorithm}:` prefix.
    #[error("fingerprint missing algorithm tag: {0:?}")]
    MissingAlgorithmTag(String),

    /// The algorithm tag is not one this build understands.
    #[error("unknown fingerprint algorithm: {0:?}")]
    UnknownAlgorithm(String),

    /// The digest portion is not 64 lowercase hex characters.
    #[error("malformed fingerprint digest: {0:?}")]
    MalformedDigest(String),
}

/// Compute a SHA-256 content fingerprint over raw body bytes.
///
/// Deterministic and total: identical bytes always yield identical output,
/// and the empty body fingerprints to the digest of the empty sequence
/// rather than erroring.
pub fn fingerprint_bytes(data: &[u8]) -> ContentFingerprint {
    let hash = Sha256::digest(data);
    let mut bytes = [0u8; 32];
    bytes.copy_from_slice(&hash);
    ContentFingerprint::sha256(bytes)
}
