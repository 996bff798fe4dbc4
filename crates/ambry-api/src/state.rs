//! # Application State
//!
//! Shared state for the Axum application, passed to all route handlers
//! via the `State` extractor.
//!
//! The in-memory stores are the hot path for every request. When a
//! database pool is configured they are hydrated from Postgres at boot and
//! written through on every mutation, so a restart reconstructs the same
//! state.

use std::collections::HashMap;
use std::hash::Hash;
use std::sync::Arc;

use parking_lot::RwLock;
use sqlx::PgPool;
use uuid::Uuid;

use ambry_access::{AccessTokenRecord, TtlPolicy, DEFAULT_TOKEN_TTL_SECS};
use ambry_core::{AssetRecord, StoreError, VersionId};
use ambry_registry::{RegistryError, VersionRecord, VersionStore};

use crate::blob::{MemoryObjectStore, ObjectStore};
use crate::db;

// -- Generic In-Memory Store --------------------------------------------------

/// Thread-safe, cloneable in-memory key-value store.
///
/// All operations are synchronous (the RwLock is `parking_lot`, not
/// `tokio::sync`) because no lock is ever held across an `.await` point.
/// `parking_lot::RwLock` is non-poisonable — a panicking writer does not
/// permanently corrupt the store.
#[derive(Debug)]
pub struct Store<K, V> {
    data: Arc<RwLock<HashMap<K, V>>>,
}

impl<K, V> Clone for Store<K, V> {
    fn clone(&self) -> Self {
        Self {
            data: Arc::clone(&self.data),
        }
    }
}

impl<K: Eq + Hash + Clone, V: Clone> Store<K, V> {
    /// Create an empty store.
    pub fn new() -> Self {
        Self {
            data: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Insert a record, returning the previous value if the key existed.
    pub fn insert(&self, key: K, value: V) -> Option<V> {
        self.data.write().insert(key, value)
    }

    /// Retrieve a record by key.
    pub fn get(&self, key: &K) -> Option<V> {
        self.data.read().get(key).cloned()
    }

    /// Update a record in place. Returns the updated record, or `None` if
    /// not found. The closure runs under the write lock, so readers never
    /// observe a half-applied update.
    pub fn update(&self, key: &K, f: impl FnOnce(&mut V)) -> Option<V> {
        let mut guard = self.data.write();
        if let Some(entry) = guard.get_mut(key) {
            f(entry);
            Some(entry.clone())
        } else {
            None
        }
    }

    /// Insert only if the key is absent. Returns `false` when the key was
    /// already present (and leaves the existing value untouched).
    pub fn insert_if_absent(&self, key: K, value: V) -> bool {
        let mut guard = self.data.write();
        if guard.contains_key(&key) {
            return false;
        }
        guard.insert(key, value);
        true
    }

    /// Check if a record exists.
    pub fn contains(&self, key: &K) -> bool {
        self.data.read().contains_key(key)
    }

    /// Return the number of records.
    pub fn len(&self) -> usize {
        self.data.read().len()
    }

    /// Whether the store is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<K: Eq + Hash + Clone, V: Clone> Default for Store<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

/// The version store is append-only: an id can be inserted once and never
/// replaced, which is what makes version responses permanently cacheable.
impl VersionStore for Store<Uuid, VersionRecord> {
    fn insert_new(&self, record: &VersionRecord) -> Result<(), RegistryError> {
        if self.insert_if_absent(*record.id.as_uuid(), record.clone()) {
            Ok(())
        } else {
            Err(RegistryError::Conflict(record.id))
        }
    }

    fn load(&self, id: &VersionId) -> Result<Option<VersionRecord>, StoreError> {
        Ok(self.get(id.as_uuid()))
    }
}

// -- Configuration ------------------------------------------------------------

/// Service configuration, assembled from the environment in `main`.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// TCP port the server binds.
    pub port: u16,
    /// Token lifetime applied when an issuance request names none.
    pub default_token_ttl_secs: i64,
    /// Bounds on requested token lifetimes.
    pub ttl_policy: TtlPolicy,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            port: 8080,
            default_token_ttl_secs: DEFAULT_TOKEN_TTL_SECS,
            ttl_policy: TtlPolicy::default(),
        }
    }
}

// -- Application State --------------------------------------------------------

/// Shared application state.
///
/// Cloning is cheap — every field is an `Arc` or a handle around one.
#[derive(Clone)]
pub struct AppState {
    /// Service configuration.
    pub config: AppConfig,
    /// Mutable asset metadata, keyed by asset id.
    pub assets: Store<Uuid, AssetRecord>,
    /// Immutable version metadata, keyed by version id. Append-only.
    pub versions: Store<Uuid, VersionRecord>,
    /// Access token records, keyed by token value.
    pub tokens: Store<String, AccessTokenRecord>,
    /// Blob storage collaborator.
    pub blobs: Arc<dyn ObjectStore>,
    /// Optional Postgres persistence; `None` means in-memory only.
    pub db: Option<PgPool>,
}

impl AppState {
    /// In-memory state with default configuration. Used by tests and by
    /// deployments without a configured database.
    pub fn new() -> Self {
        Self::with_config(
            AppConfig::default(),
            Arc::new(MemoryObjectStore::new()),
            None,
        )
    }

    /// Build state from explicit configuration and collaborators.
    pub fn with_config(
        config: AppConfig,
        blobs: Arc<dyn ObjectStore>,
        db: Option<PgPool>,
    ) -> Self {
        Self {
            config,
            assets: Store::new(),
            versions: Store::new(),
            tokens: Store::new(),
            blobs,
            db,
        }
    }

    /// Load persisted metadata into the in-memory stores.
    ///
    /// No-op without a database pool. Store failures propagate — booting
    /// with partially hydrated state would violate the delivery guarantees,
    /// so a failed hydration fails startup.
    pub async fn hydrate_from_db(&self) -> Result<(), StoreError> {
        let Some(pool) = &self.db else {
            return Ok(());
        };

        let assets = db::assets::load_all(pool).await?;
        for record in assets {
            self.assets.insert(*record.id.as_uuid(), record);
        }

        let versions = db::versions::load_all(pool).await?;
        for record in versions {
            self.versions.insert(*record.id.as_uuid(), record);
        }

        let tokens = db::tokens::load_all(pool).await?;
        for record in tokens {
            self.tokens
                .insert(record.token.expose().to_string(), record);
        }

        tracing::info!(
            assets = self.assets.len(),
            versions = self.versions.len(),
            tokens = self.tokens.len(),
            "hydrated metadata stores from database"
        );
        Ok(())
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ambry_core::{fingerprint_bytes, AssetId, Timestamp};
    use ambry_registry::mint_version;

    #[test]
    fn store_insert_and_get() {
        let store: Store<Uuid, String> = Store::new();
        let key = Uuid::new_v4();
        assert!(store.insert(key, "a".to_string()).is_none());
        assert_eq!(store.get(&key), Some("a".to_string()));
        assert!(store.contains(&key));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn store_update_returns_updated_value() {
        let store: Store<Uuid, String> = Store::new();
        let key = Uuid::new_v4();
        store.insert(key, "a".to_string());
        let updated = store.update(&key, |v| v.push('b'));
        assert_eq!(updated, Some("ab".to_string()));
    }

    #[test]
    fn store_update_missing_key_is_none() {
        let store: Store<Uuid, String> = Store::new();
        assert!(store.update(&Uuid::new_v4(), |v| v.push('x')).is_none());
    }

    #[test]
    fn insert_if_absent_refuses_existing_key() {
        let store: Store<Uuid, String> = Store::new();
        let key = Uuid::new_v4();
        assert!(store.insert_if_absent(key, "first".to_string()));
        assert!(!store.insert_if_absent(key, "second".to_string()));
        assert_eq!(store.get(&key), Some("first".to_string()));
    }

    #[test]
    fn clones_share_data() {
        let store: Store<Uuid, String> = Store::new();
        let clone = store.clone();
        let key = Uuid::new_v4();
        store.insert(key, "shared".to_string());
        assert_eq!(clone.get(&key), Some("shared".to_string()));
    }

    #[test]
    fn version_store_is_append_only() {
        let store: Store<Uuid, VersionRecord> = Store::new();
        let t0 = Timestamp::parse("2026-01-15T12:00:00Z").unwrap();
        let record = mint_version(AssetId::new(), fingerprint_bytes(b"v1"), t0);

        store.insert_new(&record).unwrap();
        let clash = VersionRecord {
            fingerprint: fingerprint_bytes(b"imposter"),
            ..record.clone()
        };
        assert!(matches!(
            store.insert_new(&clash),
            Err(RegistryError::Conflict(_))
        ));
        assert_eq!(
            store.load(&record.id).unwrap().unwrap().fingerprint,
            record.fingerprint
        );
    }

    #[test]
    fn default_config_values() {
        let config = AppConfig::default();
        assert_eq!(config.port, 8080);
        assert_eq!(config.default_token_ttl_secs, DEFAULT_TOKEN_TTL_SECS);
    }
}
