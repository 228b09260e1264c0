#![forbid(unsafe_code)]

pub mod model;

pub use model::{
    ExerciseId, LessonName, LessonNameError, Namespace, ProgressRecord, ProgressSummary,
};
