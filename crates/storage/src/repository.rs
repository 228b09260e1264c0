use async_trait::async_trait;
use practice_core::ProgressRecord;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use thiserror::Error;

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Repository contract for durable progress records.
///
/// Records are addressed by an opaque storage key (the caller derives it from
/// a namespace, or uses a fixed key for process-wide state). The value is the
/// record's JSON text; a key holds at most one record and writes replace the
/// previous value.
#[async_trait]
pub trait ProgressRepository: Send + Sync {
    /// Fetch the record stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Serialization` if stored text is not a valid
    /// record, or `StorageError::Connection` on access failures. A missing
    /// key is `Ok(None)`, not an error.
    async fn load_record(&self, key: &str) -> Result<Option<ProgressRecord>, StorageError>;

    /// Persist `record` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the record cannot be stored.
    async fn save_record(&self, key: &str, record: &ProgressRecord) -> Result<(), StorageError>;
}

/// Simple in-memory repository implementation for testing and prototyping.
///
/// Values are held as raw JSON text, matching the durable layout, so tests
/// can seed unparseable content and exercise the tolerant-read path.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    entries: Arc<Mutex<HashMap<String, String>>>,
}

impl InMemoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Store raw text under a key, bypassing serialization.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Connection` if the backing map is poisoned.
    pub fn insert_raw(&self, key: &str, text: &str) -> Result<(), StorageError> {
        let mut guard = self
            .entries
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.insert(key.to_owned(), text.to_owned());
        Ok(())
    }
}

#[async_trait]
impl ProgressRepository for InMemoryRepository {
    async fn load_record(&self, key: &str) -> Result<Option<ProgressRecord>, StorageError> {
        let guard = self
            .entries
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        match guard.get(key) {
            Some(text) => serde_json::from_str(text)
                .map(Some)
                .map_err(|e| StorageError::Serialization(e.to_string())),
            None => Ok(None),
        }
    }

    async fn save_record(&self, key: &str, record: &ProgressRecord) -> Result<(), StorageError> {
        let text =
            serde_json::to_string(record).map_err(|e| StorageError::Serialization(e.to_string()))?;
        let mut guard = self
            .entries
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.insert(key.to_owned(), text);
        Ok(())
    }
}

/// Aggregates progress persistence behind a trait object for easy backend swapping.
#[derive(Clone)]
pub struct Storage {
    pub progress: Arc<dyn ProgressRepository>,
}

impl Storage {
    #[must_use]
    pub fn in_memory() -> Self {
        let repo: Arc<dyn ProgressRepository> = Arc::new(InMemoryRepository::new());
        Self { progress: repo }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use practice_core::ExerciseId;

    #[tokio::test]
    async fn missing_key_loads_as_none() {
        let repo = InMemoryRepository::new();
        let loaded = repo.load_record("css-practice-phase1").await.unwrap();
        assert!(loaded.is_none());
    }

    #[tokio::test]
    async fn round_trips_record() {
        let repo = InMemoryRepository::new();
        let mut record = ProgressRecord::new();
        record.set(&ExerciseId::new("ex1"), true);

        repo.save_record("css-practice-phase1", &record).await.unwrap();

        let loaded = repo
            .load_record("css-practice-phase1")
            .await
            .unwrap()
            .expect("record present");
        assert!(loaded.is_complete(&ExerciseId::new("ex1")));
    }

    #[tokio::test]
    async fn last_write_wins_per_key() {
        let repo = InMemoryRepository::new();
        let ex = ExerciseId::new("ex1");

        let mut first = ProgressRecord::new();
        first.set(&ex, true);
        repo.save_record("k", &first).await.unwrap();

        let mut second = ProgressRecord::new();
        second.set(&ex, false);
        repo.save_record("k", &second).await.unwrap();

        let loaded = repo.load_record("k").await.unwrap().expect("record present");
        assert!(!loaded.is_complete(&ex));
    }

    #[tokio::test]
    async fn corrupt_text_is_a_serialization_error() {
        let repo = InMemoryRepository::new();
        repo.insert_raw("k", "{not json").unwrap();

        let err = repo.load_record("k").await.unwrap_err();
        assert!(matches!(err, StorageError::Serialization(_)));
    }

    #[tokio::test]
    async fn non_flat_object_is_a_serialization_error() {
        let repo = InMemoryRepository::new();
        repo.insert_raw("k", r#"{"ex1":{"nested":true}}"#).unwrap();

        let err = repo.load_record("k").await.unwrap_err();
        assert!(matches!(err, StorageError::Serialization(_)));
    }
}
