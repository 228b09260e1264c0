mod ids;
mod lesson;
mod progress;

pub use ids::{ExerciseId, Namespace};
pub use lesson::{LessonName, LessonNameError};
pub use progress::{ProgressRecord, ProgressSummary};
