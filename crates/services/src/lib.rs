#![forbid(unsafe_code)]

pub mod global_progress;
pub mod progress_service;

pub use global_progress::{GLOBAL_STORAGE_KEY, GlobalProgressService};
pub use progress_service::{NAMESPACE_KEY_PREFIX, ProgressService};
