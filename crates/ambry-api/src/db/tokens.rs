//! Access token persistence.
//!
//! All functions take a `&PgPool` and operate on the `access_tokens`
//! table. Tokens are immutable once issued; expired rows are pruned on
//! boot rather than at validation time (validation is a pure check).

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use ambry_access::{AccessTokenRecord, TokenValue};
use ambry_core::{AssetId, StoreError, Timestamp};

/// Insert a freshly issued token record.
pub async fn insert(pool: &PgPool, record: &AccessTokenRecord) -> Result<(), StoreError> {
    sqlx::query(
        "INSERT INTO access_tokens (token, asset_id, issued_at, expires_at)
         VALUES ($1, $2, $3, $4)",
    )
    .bind(record.token.expose())
    .bind(record.asset_id.as_uuid())
    .bind(*record.issued_at.as_datetime())
    .bind(*record.expires_at.as_datetime())
    .execute(pool)
    .await
    .map_err(StoreError::backend)?;

    Ok(())
}

/// Load every token record, for boot-time hydration.
pub async fn load_all(pool: &PgPool) -> Result<Vec<AccessTokenRecord>, StoreError> {
    let rows = sqlx::query_as::<_, TokenRow>(
        "SELECT token, asset_id, issued_at, expires_at
         FROM access_tokens ORDER BY issued_at",
    )
    .fetch_all(pool)
    .await
    .map_err(StoreError::backend)?;

    Ok(rows.into_iter().map(TokenRow::into_record).collect())
}

/// Delete rows whose expiry has passed. Returns the number pruned.
pub async fn prune_expired(pool: &PgPool, now: Timestamp) -> Result<u64, StoreError> {
    let result = sqlx::query("DELETE FROM access_tokens WHERE expires_at <= $1")
        .bind(*now.as_datetime())
        .execute(pool)
        .await
        .map_err(StoreError::backend)?;

    Ok(result.rows_affected())
}

/// Internal row type for SQLx mapping.
#[derive(sqlx::FromRow)]
struct TokenRow {
    token: String,
    asset_id: Uuid,
    issued_at: DateTime<Utc>,
    expires_at: DateTime<Utc>,
}

impl TokenRow {
    fn into_record(self) -> AccessTokenRecord {
        AccessTokenRecord {
            token: TokenValue::from_raw(self.token),
            asset_id: AssetId(self.asset_id),
            issued_at: Timestamp::from_utc(self.issued_at),
            expires_at: Timestamp::from_utc(self.expires_at),
        }
    }
}
