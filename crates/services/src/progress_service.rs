use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use practice_core::{ExerciseId, Namespace, ProgressRecord, ProgressSummary};
use storage::repository::ProgressRepository;
use tracing::warn;

/// Prefix joined with the namespace string to form the durable storage key.
pub const NAMESPACE_KEY_PREFIX: &str = "css-practice-";

fn storage_key(namespace: &Namespace) -> String {
    format!("{NAMESPACE_KEY_PREFIX}{namespace}")
}

/// Per-namespace completion tracking over a durable repository.
///
/// Each namespace's record is read lazily on first access and then held in
/// memory for the rest of the session; every mutation is written back before
/// the call returns. Storage failures never surface to callers: reads fall
/// back to an empty record, writes are logged and dropped, and the in-memory
/// record stays the source of truth.
///
/// Concurrent writers to the same key from other processes are not
/// coordinated; the last write wins.
pub struct ProgressService {
    repo: Arc<dyn ProgressRepository>,
    records: Mutex<HashMap<Namespace, ProgressRecord>>,
}

impl ProgressService {
    #[must_use]
    pub fn new(repo: Arc<dyn ProgressRepository>) -> Self {
        Self {
            repo,
            records: Mutex::new(HashMap::new()),
        }
    }

    fn lock_records(&self) -> MutexGuard<'_, HashMap<Namespace, ProgressRecord>> {
        // A poisoned lock still holds usable state; keep serving it.
        self.records
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    /// Returns the namespace's record, reading it from durable storage on
    /// first access. Missing, unparseable, or unreadable records yield an
    /// empty record.
    pub async fn load(&self, namespace: &Namespace) -> ProgressRecord {
        if let Some(record) = self.lock_records().get(namespace) {
            return record.clone();
        }

        let loaded = match self.repo.load_record(&storage_key(namespace)).await {
            Ok(Some(record)) => record,
            Ok(None) => ProgressRecord::new(),
            Err(err) => {
                warn!(namespace = %namespace, error = %err, "failed to load progress record, starting empty");
                ProgressRecord::new()
            }
        };

        self.lock_records()
            .entry(namespace.clone())
            .or_insert(loaded)
            .clone()
    }

    /// Returns whether the exercise is marked complete. Never fails; an
    /// absent namespace or key reads as incomplete.
    pub async fn is_complete(&self, namespace: &Namespace, exercise: &ExerciseId) -> bool {
        self.load(namespace).await.is_complete(exercise)
    }

    /// Flips the exercise's completion flag and returns the new value.
    ///
    /// The updated record is persisted before returning; a failed write is
    /// logged and the in-memory record keeps the new state.
    pub async fn toggle_complete(&self, namespace: &Namespace, exercise: &ExerciseId) -> bool {
        self.load(namespace).await;

        let (snapshot, value) = {
            let mut records = self.lock_records();
            let record = records.entry(namespace.clone()).or_default();
            let value = record.toggle(exercise);
            (record.clone(), value)
        };

        self.persist(namespace, &snapshot).await;
        value
    }

    /// Aggregates the namespace's record against a caller-supplied total.
    pub async fn summary(&self, namespace: &Namespace, total: usize) -> ProgressSummary {
        self.load(namespace).await.summary(total)
    }

    async fn persist(&self, namespace: &Namespace, record: &ProgressRecord) {
        if let Err(err) = self.repo.save_record(&storage_key(namespace), record).await {
            warn!(namespace = %namespace, error = %err, "failed to save progress record, keeping in-memory state");
        }
    }
}
