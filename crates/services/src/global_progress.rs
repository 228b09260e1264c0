use std::sync::{Arc, Mutex, MutexGuard};

use practice_core::{ExerciseId, ProgressRecord};
use storage::repository::ProgressRepository;
use tracing::warn;

/// Fixed durable key for the process-wide progress record.
pub const GLOBAL_STORAGE_KEY: &str = "grid-progress";

/// Process-wide completion tracking without namespace partitioning.
///
/// One record, persisted under [`GLOBAL_STORAGE_KEY`]. Unlike the
/// per-namespace service this variant supports explicit set-to-value in
/// addition to toggle. Same durability contract: reads fall back to empty,
/// failed writes are logged and the in-memory record wins for the session.
pub struct GlobalProgressService {
    repo: Arc<dyn ProgressRepository>,
    record: Mutex<Option<ProgressRecord>>,
}

impl GlobalProgressService {
    #[must_use]
    pub fn new(repo: Arc<dyn ProgressRepository>) -> Self {
        Self {
            repo,
            record: Mutex::new(None),
        }
    }

    fn lock_record(&self) -> MutexGuard<'_, Option<ProgressRecord>> {
        self.record
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    /// Returns the global record, reading it from durable storage on first
    /// access. Missing or unreadable records yield an empty record.
    pub async fn load(&self) -> ProgressRecord {
        if let Some(record) = self.lock_record().as_ref() {
            return record.clone();
        }

        let loaded = match self.repo.load_record(GLOBAL_STORAGE_KEY).await {
            Ok(Some(record)) => record,
            Ok(None) => ProgressRecord::new(),
            Err(err) => {
                warn!(error = %err, "failed to load global progress record, starting empty");
                ProgressRecord::new()
            }
        };

        self.lock_record().get_or_insert(loaded).clone()
    }

    /// Returns whether the exercise is marked complete.
    pub async fn is_complete(&self, exercise: &ExerciseId) -> bool {
        self.load().await.is_complete(exercise)
    }

    /// Sets the exercise's completion flag to an explicit value and persists
    /// the updated record.
    pub async fn mark_complete(&self, exercise: &ExerciseId, value: bool) {
        self.load().await;

        let snapshot = {
            let mut guard = self.lock_record();
            let record = guard.get_or_insert_with(ProgressRecord::new);
            record.set(exercise, value);
            record.clone()
        };

        self.persist(&snapshot).await;
    }

    /// Flips the exercise's completion flag and returns the new value.
    pub async fn toggle(&self, exercise: &ExerciseId) -> bool {
        self.load().await;

        let (snapshot, value) = {
            let mut guard = self.lock_record();
            let record = guard.get_or_insert_with(ProgressRecord::new);
            let value = record.toggle(exercise);
            (record.clone(), value)
        };

        self.persist(&snapshot).await;
        value
    }

    async fn persist(&self, record: &ProgressRecord) {
        if let Err(err) = self.repo.save_record(GLOBAL_STORAGE_KEY, record).await {
            warn!(error = %err, "failed to save global progress record, keeping in-memory state");
        }
    }
}
