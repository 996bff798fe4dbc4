//! Version metadata persistence.
//!
//! All functions take a `&PgPool` and operate on the `asset_versions`
//! table. Versions are immutable once created — there are no update
//! operations, and the primary-key constraint backs up the append-only
//! contract of the in-memory store.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use ambry_core::{AssetId, ContentFingerprint, StorageKey, StoreError, Timestamp, VersionId};
use ambry_registry::VersionRecord;

/// Insert a freshly minted version record.
pub async fn insert(pool: &PgPool, record: &VersionRecord) -> Result<(), StoreError> {
    sqlx::query(
        "INSERT INTO asset_versions (id, asset_id, storage_key, fingerprint, created_at)
         VALUES ($1, $2, $3, $4, $5)",
    )
    .bind(record.id.as_uuid())
    .bind(record.asset_id.as_uuid())
    .bind(record.storage_key.as_str())
    .bind(record.fingerprint.to_string())
    .bind(*record.created_at.as_datetime())
    .execute(pool)
    .await
    .map_err(StoreError::backend)?;

    Ok(())
}

/// Load every version record, for boot-time hydration.
pub async fn load_all(pool: &PgPool) -> Result<Vec<VersionRecord>, StoreError> {
    let rows = sqlx::query_as::<_, VersionRow>(
        "SELECT id, asset_id, storage_key, fingerprint, created_at
         FROM asset_versions ORDER BY created_at",
    )
    .fetch_all(pool)
    .await
    .map_err(StoreError::backend)?;

    rows.into_iter().map(VersionRow::into_record).collect()
}

/// Internal row type for SQLx mapping.
#[derive(sqlx::FromRow)]
struct VersionRow {
    id: Uuid,
    asset_id: Uuid,
    storage_key: String,
    fingerprint: String,
    created_at: DateTime<Utc>,
}

impl VersionRow {
    fn into_record(self) -> Result<VersionRecord, StoreError> {
        let fingerprint = ContentFingerprint::parse(&self.fingerprint).map_err(|e| {
            StoreError::Backend(format!("corrupt fingerprint for version {}: {e}", self.id))
        })?;

        Ok(VersionRecord {
            id: VersionId(self.id),
            asset_id: AssetId(self.asset_id),
            storage_key: StorageKey::from_raw(self.storage_key),
            fingerprint,
            created_at: Timestamp::from_utc(self.created_at),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn row_hydrates() {
        let fingerprint = ambry_core::fingerprint_bytes(b"v1");
        let row = VersionRow {
            id: Uuid::new_v4(),
            asset_id: Uuid::new_v4(),
            storage_key: "versions/abc".to_string(),
            fingerprint: fingerprint.to_string(),
            created_at: Utc::now(),
        };
        let record = row.into_record().unwrap();
        assert_eq!(record.fingerprint, fingerprint);
    }

    #[test]
    fn corrupt_fingerprint_fails() {
        let row = VersionRow {
            id: Uuid::new_v4(),
            asset_id: Uuid::new_v4(),
            storage_key: "versions/abc".to_string(),
            fingerprint: "garbage".to_string(),
            created_at: Utc::now(),
        };
        assert!(row.into_record().is_err());
    }
}
