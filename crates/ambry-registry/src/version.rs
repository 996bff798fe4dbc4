//! # Version Records
//!
//! [`VersionRecord`] snapshots an asset's content identity at publish time:
//! the fingerprint of the frozen bytes and the storage key those bytes were
//! copied to. Records are created by [`mint_version()`] and never mutated.

use serde::{Deserialize, Serialize};

use ambry_core::{AssetId, ContentFingerprint, StorageKey, Timestamp, VersionId};

/// Metadata record for one immutable published version.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VersionRecord {
    /// Version identity — public, permanent, cacheable.
    pub id: VersionId,
    /// The asset this version was published from.
    pub asset_id: AssetId,
    /// Version-owned blob location. Distinct from the asset's key so the
    /// asset's future re-uploads cannot reach this version's bytes.
    pub storage_key: StorageKey,
    /// Fingerprint of the frozen bytes.
    pub fingerprint: ContentFingerprint,
    /// When the version was published.
    pub created_at: Timestamp,
}

/// Mint the record for a new version of `asset_id`.
///
/// Generates a fresh [`VersionId`] and derives the version-owned storage
/// key from it. The caller copies the asset's current bytes to that key
/// and appends the record to the store as one logical publish operation.
pub fn mint_version(
    asset_id: AssetId,
    fingerprint: ContentFingerprint,
    now: Timestamp,
) -> VersionRecord {
    let id = VersionId::new();
    VersionRecord {
        storage_key: StorageKey::for_version(&id),
        id,
        asset_id,
        fingerprint,
        created_at: now,
    }
}
