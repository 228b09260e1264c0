use async_trait::async_trait;
use chrono::Utc;
use practice_core::ProgressRecord;
use sqlx::Row;

use super::SqliteRepository;
use crate::repository::{ProgressRepository, StorageError};

fn ser<E: core::fmt::Display>(e: E) -> StorageError {
    StorageError::Serialization(e.to_string())
}

#[async_trait]
impl ProgressRepository for SqliteRepository {
    async fn load_record(&self, key: &str) -> Result<Option<ProgressRecord>, StorageError> {
        let row = sqlx::query("SELECT record FROM progress_entries WHERE key = ?1")
            .bind(key)
            .fetch_optional(self.pool())
            .await
            .map_err(|err| StorageError::Connection(err.to_string()))?;

        let Some(row) = row else {
            return Ok(None);
        };

        let text: String = row.try_get("record").map_err(ser)?;
        serde_json::from_str(&text).map(Some).map_err(ser)
    }

    async fn save_record(&self, key: &str, record: &ProgressRecord) -> Result<(), StorageError> {
        let text = serde_json::to_string(record).map_err(ser)?;

        sqlx::query(
            r"
            INSERT INTO progress_entries (key, record, updated_at)
            VALUES (?1, ?2, ?3)
            ON CONFLICT(key) DO UPDATE SET
                record = excluded.record,
                updated_at = excluded.updated_at
            ",
        )
        .bind(key)
        .bind(text)
        .bind(Utc::now())
        .execute(self.pool())
        .await
        .map_err(|err| StorageError::Connection(err.to_string()))?;

        Ok(())
    }
}
