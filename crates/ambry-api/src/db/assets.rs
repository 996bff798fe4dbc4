//! Asset metadata persistence.
//!
//! All functions take a `&PgPool` and operate on the `assets` table.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use ambry_core::{AssetId, AssetRecord, ContentFingerprint, StorageKey, StoreError, Timestamp};

/// Insert a freshly uploaded asset record.
pub async fn insert(pool: &PgPool, record: &AssetRecord) -> Result<(), StoreError> {
    sqlx::query(
        "INSERT INTO assets (id, storage_key, filename, media_type, size_bytes,
         fingerprint, is_private, created_at, updated_at)
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)",
    )
    .bind(record.id.as_uuid())
    .bind(record.storage_key.as_str())
    .bind(&record.filename)
    .bind(&record.media_type)
    .bind(size_for_db(record.size_bytes))
    .bind(record.fingerprint.to_string())
    .bind(record.is_private)
    .bind(*record.created_at.as_datetime())
    .bind(*record.updated_at.as_datetime())
    .execute(pool)
    .await
    .map_err(StoreError::backend)?;

    Ok(())
}

/// Persist the content-derived fields after a re-upload.
///
/// Size, fingerprint, media type, and updated-at change in one statement;
/// a reader of the row can never see a fingerprint paired with the wrong
/// size.
pub async fn update_content(pool: &PgPool, record: &AssetRecord) -> Result<bool, StoreError> {
    let result = sqlx::query(
        "UPDATE assets SET size_bytes = $2, fingerprint = $3, media_type = $4,
         updated_at = $5 WHERE id = $1",
    )
    .bind(record.id.as_uuid())
    .bind(size_for_db(record.size_bytes))
    .bind(record.fingerprint.to_string())
    .bind(&record.media_type)
    .bind(*record.updated_at.as_datetime())
    .execute(pool)
    .await
    .map_err(StoreError::backend)?;

    Ok(result.rows_affected() > 0)
}

/// Load every asset record, for boot-time hydration.
pub async fn load_all(pool: &PgPool) -> Result<Vec<AssetRecord>, StoreError> {
    let rows = sqlx::query_as::<_, AssetRow>(
        "SELECT id, storage_key, filename, media_type, size_bytes, fingerprint,
         is_private, created_at, updated_at
         FROM assets ORDER BY created_at",
    )
    .fetch_all(pool)
    .await
    .map_err(StoreError::backend)?;

    rows.into_iter().map(AssetRow::into_record).collect()
}

fn size_for_db(size: u64) -> i64 {
    i64::try_from(size).unwrap_or_else(|_| {
        tracing::error!(size_bytes = size, "asset size exceeds i64::MAX — clamping for storage");
        i64::MAX
    })
}

/// Internal row type for SQLx mapping.
#[derive(sqlx::FromRow)]
struct AssetRow {
    id: Uuid,
    storage_key: String,
    filename: String,
    media_type: String,
    size_bytes: i64,
    fingerprint: String,
    is_private: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl AssetRow {
    /// A row with an unparseable fingerprint is corruption — it must fail
    /// loudly rather than hydrate a record whose validator is wrong.
    fn into_record(self) -> Result<AssetRecord, StoreError> {
        let fingerprint = ContentFingerprint::parse(&self.fingerprint).map_err(|e| {
            StoreError::Backend(format!("corrupt fingerprint for asset {}: {e}", self.id))
        })?;
        let size_bytes = u64::try_from(self.size_bytes).map_err(|_| {
            StoreError::Backend(format!("negative size for asset {}", self.id))
        })?;

        Ok(AssetRecord {
            id: AssetId(self.id),
            storage_key: StorageKey::from_raw(self.storage_key),
            filename: self.filename,
            media_type: self.media_type,
            size_bytes,
            fingerprint,
            is_private: self.is_private,
            created_at: Timestamp::from_utc(self.created_at),
            updated_at: Timestamp::from_utc(self.updated_at),
        })
    }
}
