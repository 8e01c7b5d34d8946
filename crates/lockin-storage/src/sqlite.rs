use crate::error::{StorageError, StorageResult};
use crate::store::CredentialStore;
use chrono::{DateTime, Utc};
use lockin_core::{DeviceIdentity, constants::MAX_IDENTITY_LEN};
use sqlx::SqlitePool;
use tracing::{debug, info};

/// SQLite-backed identity slot.
///
/// The identity lives in a single-row table; `save` is one upsert statement,
/// so a failed write leaves the previous token untouched.
#[derive(Debug, Clone)]
pub struct SqliteCredentialStore {
    pool: SqlitePool,
}

impl SqliteCredentialStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// When the stored identity was last written, if any.
    pub async fn paired_at(&self) -> StorageResult<Option<DateTime<Utc>>> {
        let row: Option<(DateTime<Utc>,)> =
            sqlx::query_as("SELECT paired_at FROM device_identity WHERE slot = 1")
                .fetch_optional(&self.pool)
                .await?;
        Ok(row.map(|(paired_at,)| paired_at))
    }
}

impl CredentialStore for SqliteCredentialStore {
    async fn load(&self) -> StorageResult<DeviceIdentity> {
        let row: Option<(String,)> =
            sqlx::query_as("SELECT token FROM device_identity WHERE slot = 1")
                .fetch_optional(&self.pool)
                .await?;

        let Some((token,)) = row else {
            debug!("No stored identity");
            return Ok(DeviceIdentity::unpaired());
        };

        let len = token.len();
        DeviceIdentity::new(token).map_err(|_| StorageError::IdentityTooLong {
            len,
            max: MAX_IDENTITY_LEN,
        })
    }

    async fn save(&self, identity: &DeviceIdentity) -> StorageResult<()> {
        let token = identity.as_str();
        if token.len() > MAX_IDENTITY_LEN {
            return Err(StorageError::IdentityTooLong {
                len: token.len(),
                max: MAX_IDENTITY_LEN,
            });
        }

        sqlx::query(
            "INSERT INTO device_identity (slot, token, paired_at) VALUES (1, ?, ?)
             ON CONFLICT(slot) DO UPDATE SET token = excluded.token, paired_at = excluded.paired_at",
        )
        .bind(token)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        info!(paired = identity.is_paired(), "Identity persisted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connection::Database;

    #[tokio::test]
    async fn test_empty_store_loads_unpaired() {
        let db = Database::in_memory().await.unwrap();
        let store = SqliteCredentialStore::new(db.pool().clone());

        let identity = store.load().await.unwrap();
        assert!(!identity.is_paired());
        assert_eq!(store.paired_at().await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_save_then_load() {
        let db = Database::in_memory().await.unwrap();
        let store = SqliteCredentialStore::new(db.pool().clone());
        let identity = DeviceIdentity::new("sk_live_first").unwrap();

        store.save(&identity).await.unwrap();

        assert_eq!(store.load().await.unwrap(), identity);
        assert!(store.paired_at().await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_save_overwrites_slot() {
        let db = Database::in_memory().await.unwrap();
        let store = SqliteCredentialStore::new(db.pool().clone());

        store
            .save(&DeviceIdentity::new("sk_live_first").unwrap())
            .await
            .unwrap();
        store
            .save(&DeviceIdentity::new("sk_live_second").unwrap())
            .await
            .unwrap();

        let (rows,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM device_identity")
            .fetch_one(db.pool())
            .await
            .unwrap();
        assert_eq!(rows, 1);
        assert_eq!(store.load().await.unwrap().as_str(), "sk_live_second");
    }

    #[tokio::test]
    async fn test_write_to_closed_pool_fails() {
        let db = Database::in_memory().await.unwrap();
        let store = SqliteCredentialStore::new(db.pool().clone());

        db.close().await;
        let result = store.save(&DeviceIdentity::new("sk_live_lost").unwrap()).await;

        assert!(matches!(result, Err(StorageError::Database(_))));
    }
}
