use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::model::ids::ExerciseId;

//
// ─── PROGRESS RECORD ───────────────────────────────────────────────────────────
//

/// Completion state for the exercises of one namespace.
///
/// A record maps exercise identifiers to a completed flag. Absence of a key
/// is equivalent to `false`, so an empty record means nothing is complete.
/// The persisted form is a flat JSON object of id strings to booleans.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProgressRecord {
    entries: HashMap<ExerciseId, bool>,
}

impl ProgressRecord {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns whether the exercise is marked complete.
    ///
    /// Absent keys read as incomplete.
    #[must_use]
    pub fn is_complete(&self, exercise: &ExerciseId) -> bool {
        self.entries.get(exercise).copied().unwrap_or(false)
    }

    /// Flips the completion flag for the exercise and returns the new value.
    ///
    /// An absent key is treated as `false`, so the first toggle marks the
    /// exercise complete.
    pub fn toggle(&mut self, exercise: &ExerciseId) -> bool {
        let value = !self.is_complete(exercise);
        self.entries.insert(exercise.clone(), value);
        value
    }

    /// Sets the completion flag to an explicit value.
    pub fn set(&mut self, exercise: &ExerciseId, value: bool) {
        self.entries.insert(exercise.clone(), value);
    }

    /// Number of exercises currently marked complete.
    #[must_use]
    pub fn completed_count(&self) -> usize {
        self.entries.values().filter(|done| **done).count()
    }

    /// Exercise ids currently marked complete, in unspecified order.
    #[must_use]
    pub fn completed_ids(&self) -> Vec<ExerciseId> {
        self.entries
            .iter()
            .filter(|(_, done)| **done)
            .map(|(id, _)| id.clone())
            .collect()
    }

    /// Aggregates the record against a caller-supplied exercise total.
    #[must_use]
    pub fn summary(&self, total: usize) -> ProgressSummary {
        let completed = self.completed_count();
        let percentage = if total == 0 {
            0
        } else {
            completed * 100 / total
        };
        ProgressSummary {
            completed,
            total,
            percentage,
        }
    }
}

/// Aggregated view of a namespace's progress, useful for UI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgressSummary {
    pub completed: usize,
    pub total: usize,
    pub percentage: usize,
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
