//! # Domain Identity Newtypes
//!
//! Newtype wrappers for the identifiers in the delivery pipeline. These
//! prevent accidental identifier confusion — you cannot pass a [`VersionId`]
//! where an [`AssetId`] is expected, and a raw blob key cannot masquerade
//! as either.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a mutable asset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AssetId(pub Uuid);

/// Unique identifier for an immutable published version.
///
/// Version ids are public and permanently cacheable; they are generated
/// from a CSPRNG-backed UUID so they cannot be enumerated, but they carry
/// no secret and require no protection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VersionId(pub Uuid);

impl AssetId {
    /// Generate a new random asset identifier.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Access the inner UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for AssetId {
    fn default() -> Self {
        Self::new()
    }
}

impl VersionId {
    /// Generate a new random version identifier.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Access the inner UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for VersionId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for AssetId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "asset:{}", self.0)
    }
}

impl std::fmt::Display for VersionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "version:{}", self.0)
    }
}

/// Location of a blob in the object store.
///
/// Assets own one key each and overwrite it in place on re-upload.
/// Published versions get their own key at publish time so that later
/// re-uploads of the asset can never reach version content.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StorageKey(String);

impl StorageKey {
    /// The key owned by a mutable asset's current content.
    pub fn for_asset(id: &AssetId) -> Self {
        Self(format!("assets/{}", id.as_uuid()))
    }

    /// The key owned by an immutable version's snapshot.
    pub fn for_version(id: &VersionId) -> Self {
        Self(format!("versions/{}", id.as_uuid()))
    }

    /// Wrap an existing key loaded from the metadata store.
    pub fn from_raw(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// The key as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for StorageKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
