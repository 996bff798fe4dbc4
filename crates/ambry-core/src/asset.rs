//! # Asset Records
//!
//! [`AssetRecord`] is the metadata row for a mutable asset: identity,
//! current blob location, media metadata, and the fingerprint of the bytes
//! currently at that location.
//!
//! ## Invariant
//!
//! The fingerprint, size, and updated-at fields change together, inside
//! [`AssetRecord::create()`] and [`AssetRecord::replace_content()`], and
//! are computed from the bytes those calls receive. No other code path
//! writes them, so a record can never be observed mid-update with a
//! fingerprint describing bytes it no longer has.

use serde::{Deserialize, Serialize};

use crate::fingerprint::{fingerprint_bytes, ContentFingerprint};
use crate::identity::{AssetId, StorageKey};
use crate::temporal::Timestamp;

/// Metadata record for a mutable asset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetRecord {
    /// Asset identity.
    pub id: AssetId,
    /// Where the current content bytes live in the object store.
    pub storage_key: StorageKey,
    /// Original filename, used for `Content-Disposition`.
    pub filename: String,
    /// MIME type of the content.
    pub media_type: String,
    /// Content length in bytes.
    pub size_bytes: u64,
    /// Fingerprint of the bytes at `storage_key`.
    pub fingerprint: ContentFingerprint,
    /// Whether the asset is only reachable through access tokens.
    pub is_private: bool,
    /// When the asset was first uploaded.
    pub created_at: Timestamp,
    /// When the content was last replaced.
    pub updated_at: Timestamp,
}

impl AssetRecord {
    /// Create the record for a freshly uploaded asset.
    ///
    /// The fingerprint and size are derived from `content` here, in the
    /// same call that fixes the storage key, so they start out consistent.
    pub fn create(
        id: AssetId,
        filename: impl Into<String>,
        media_type: impl Into<String>,
        content: &[u8],
        is_private: bool,
        now: Timestamp,
    ) -> Self {
        Self {
            storage_key: StorageKey::for_asset(&id),
            id,
            filename: filename.into(),
            media_type: media_type.into(),
            size_bytes: content.len() as u64,
            fingerprint: fingerprint_bytes(content),
            is_private,
            created_at: now,
            updated_at: now,
        }
    }

    /// Replace the asset's content metadata after a re-upload.
    ///
    /// Recomputes the fingerprint and size from the new bytes and stamps
    /// `updated_at` in one step. The caller writes `content` to
    /// `storage_key` as part of the same logical operation.
    pub fn replace_content(&mut self, content: &[u8], now: Timestamp) {
        self.size_bytes = content.len() as u64;
        self.fingerprint = fingerprint_bytes(content);
        self.updated_at = now;
    }
}
