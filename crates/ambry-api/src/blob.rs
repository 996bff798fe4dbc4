//! # Blob Storage Collaborators
//!
//! The [`ObjectStore`] trait is the byte-addressed seam the delivery
//! handlers read and write through. Two implementations ship in-tree:
//! an in-memory map for tests and database-less deployments, and a
//! filesystem store that keeps one content file per storage key.
//!
//! Failures surface as [`StoreError`] and propagate to the caller —
//! substituting empty or stale bytes for a failed read would break the
//! fingerprint/content pairing the delivery guarantees rest on.

use std::collections::HashMap;
use std::path::PathBuf;

use parking_lot::RwLock;

use ambry_core::{StorageKey, StoreError};

/// Byte-addressed blob storage.
///
/// Keys are namespaced by the metadata layer (`assets/...`,
/// `versions/...`); the store treats them as opaque paths.
pub trait ObjectStore: Send + Sync {
    /// Write `bytes` at `key`, replacing any previous content.
    fn put(&self, key: &StorageKey, bytes: &[u8]) -> Result<(), StoreError>;

    /// Read the content at `key`; `Ok(None)` when the key has never been
    /// written.
    fn get(&self, key: &StorageKey) -> Result<Option<Vec<u8>>, StoreError>;
}

// -- In-Memory ----------------------------------------------------------------

/// In-memory blob store backed by a `parking_lot::RwLock` map.
#[derive(Debug, Default)]
pub struct MemoryObjectStore {
    data: RwLock<HashMap<String, Vec<u8>>>,
}

impl MemoryObjectStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

impl ObjectStore for MemoryObjectStore {
    fn put(&self, key: &StorageKey, bytes: &[u8]) -> Result<(), StoreError> {
        self.data
            .write()
            .insert(key.as_str().to_string(), bytes.to_vec());
        Ok(())
    }

    fn get(&self, key: &StorageKey) -> Result<Option<Vec<u8>>, StoreError> {
        Ok(self.data.read().get(key.as_str()).cloned())
    }
}

// -- Filesystem ---------------------------------------------------------------

/// Filesystem blob store: one file per key under a root directory.
#[derive(Debug, Clone)]
pub struct FsObjectStore {
    root: PathBuf,
}

impl FsObjectStore {
    /// Create a store rooted at the given directory. The directory is
    /// created lazily on first write.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Returns the root directory of this store.
    pub fn root(&self) -> &PathBuf {
        &self.root
    }

    fn path_for(&self, key: &StorageKey) -> PathBuf {
        self.root.join(key.as_str())
    }
}

impl ObjectStore for FsObjectStore {
    fn put(&self, key: &StorageKey, bytes: &[u8]) -> Result<(), StoreError> {
        let path = self.path_for(key);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        // Write through a sibling temp file and rename, so a reader never
        // observes a partially written blob.
        let tmp = path.with_extension("tmp");
        std::fs::write(&tmp, bytes)?;
        std::fs::rename(&tmp, &path)?;
        Ok(())
    }

    fn get(&self, key: &StorageKey) -> Result<Option<Vec<u8>>, StoreError> {
        match std::fs::read(self.path_for(key)) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StoreError::Io(e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ambry_core::AssetId;

    #[test]
    fn memory_put_then_get() {
        let store = MemoryObjectStore::new();
        let key = StorageKey::for_asset(&AssetId::new());
        store.put(&key, b"bytes").unwrap();
        assert_eq!(store.get(&key).unwrap(), Some(b"bytes".to_vec()));
    }

    #[test]
    fn memory_get_missing_is_none() {
        let store = MemoryObjectStore::new();
        let key = StorageKey::for_asset(&AssetId::new());
        assert_eq!(store.get(&key).unwrap(), None);
    }

    #[test]
    fn memory_put_overwrites() {
        let store = MemoryObjectStore::new();
        let key = StorageKey::for_asset(&AssetId::new());
        store.put(&key, b"one").unwrap();
        store.put(&key, b"two").unwrap();
        assert_eq!(store.get(&key).unwrap(), Some(b"two".to_vec()));
    }

    #[test]
    fn fs_put_then_get() {
        let dir = std::env::temp_dir().join(format!("ambry-blob-test-{}", uuid::Uuid::new_v4()));
        let store = FsObjectStore::new(&dir);
        let key = StorageKey::for_asset(&AssetId::new());

        store.put(&key, b"on disk").unwrap();
        assert_eq!(store.get(&key).unwrap(), Some(b"on disk".to_vec()));

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn fs_get_missing_is_none() {
        let dir = std::env::temp_dir().join(format!("ambry-blob-test-{}", uuid::Uuid::new_v4()));
        let store = FsObjectStore::new(&dir);
        let key = StorageKey::for_asset(&AssetId::new());
        assert_eq!(store.get(&key).unwrap(), None);
        std::fs::remove_dir_all(&dir).ok();
    }
}
