#![forbid(unsafe_code)]

pub mod patch;
pub mod scaffolder;
pub mod templates;

pub use scaffolder::{
    RegistrationStatus, ScaffoldError, ScaffoldPaths, ScaffoldReport, Scaffolder,
};
