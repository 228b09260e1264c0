use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use practice_core::LessonName;
use thiserror::Error;

use crate::patch::{self, PatchOutcome};
use crate::templates;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ScaffoldError {
    /// A primary artifact already exists. Never overwritten; fatal for the
    /// run, though artifacts written earlier in the same run are kept.
    #[error("artifact already exists: {}", .path.display())]
    ArtifactExists { path: PathBuf },

    #[error("failed to write {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

//
// ─── PATHS ─────────────────────────────────────────────────────────────────────
//

/// Locations of the generated artifacts and the two registration files,
/// resolved from the web app's root directory.
#[derive(Debug, Clone)]
pub struct ScaffoldPaths {
    pub lessons_dir: PathBuf,
    pub styles_dir: PathBuf,
    pub index_file: PathBuf,
    pub router_file: PathBuf,
}

impl ScaffoldPaths {
    #[must_use]
    pub fn from_app_root(root: impl AsRef<Path>) -> Self {
        let root = root.as_ref();
        Self {
            lessons_dir: root.join("src").join("lessons"),
            styles_dir: root.join("src").join("styles"),
            index_file: root.join("src").join("lessons").join("index.ts"),
            router_file: root.join("src").join("components").join("MainPage.tsx"),
        }
    }
}

//
// ─── SCAFFOLDER ────────────────────────────────────────────────────────────────
//

/// How one registration step ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistrationStatus {
    /// The file was changed and written back.
    Updated,
    /// The lesson was already registered; nothing to do.
    AlreadyPresent,
    /// The step was skipped; the reason is in the report's warnings.
    Skipped,
}

/// What one scaffold run produced.
#[derive(Debug, Clone)]
pub struct ScaffoldReport {
    pub lesson_file: PathBuf,
    pub stylesheet_file: PathBuf,
    pub route_path: String,
    pub index: RegistrationStatus,
    pub import: RegistrationStatus,
    pub route: RegistrationStatus,
    pub warnings: Vec<String>,
}

/// One-shot generator for a new lesson: writes the component stub and
/// stylesheet with exclusive-create semantics, then registers the lesson in
/// the aggregator and router files.
///
/// Registration failures are downgraded to warnings; only a missing name
/// (rejected before this type is reached) or an existing artifact fails the
/// run. Nothing is rolled back.
pub struct Scaffolder {
    paths: ScaffoldPaths,
}

impl Scaffolder {
    #[must_use]
    pub fn new(paths: ScaffoldPaths) -> Self {
        Self { paths }
    }

    /// Generate the lesson artifacts and wire up the registrations.
    ///
    /// # Errors
    ///
    /// Returns `ScaffoldError::ArtifactExists` if either target file already
    /// exists (the other, if already written, stays on disk), or
    /// `ScaffoldError::Io` if a primary write fails.
    pub fn scaffold(
        &self,
        name: &LessonName,
        title: Option<&str>,
    ) -> Result<ScaffoldReport, ScaffoldError> {
        let stylesheet = templates::stylesheet_file_name(name);
        let lesson_file = self.paths.lessons_dir.join(templates::lesson_file_name(name));
        let stylesheet_file = self.paths.styles_dir.join(&stylesheet);

        let title = title.unwrap_or(name.as_str());
        write_new(
            &lesson_file,
            &templates::lesson_component(name, title, &stylesheet),
        )?;
        write_new(&stylesheet_file, &templates::stylesheet(name, &stylesheet))?;

        let mut warnings = Vec::new();
        let index = self.register_export(name, &mut warnings);
        let (import, route) = self.register_route(name, &mut warnings);

        Ok(ScaffoldReport {
            lesson_file,
            stylesheet_file,
            route_path: format!("/{}", name.route_slug()),
            index,
            import,
            route,
            warnings,
        })
    }

    /// Append the export line to the aggregator file, if absent.
    fn register_export(&self, name: &LessonName, warnings: &mut Vec<String>) -> RegistrationStatus {
        let path = &self.paths.index_file;
        let text = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(err) => {
                warnings.push(format!(
                    "could not update lessons index exports: {}: {err}",
                    path.display()
                ));
                return RegistrationStatus::Skipped;
            }
        };

        match patch::append_export(&text, name.as_str()) {
            Some(updated) => {
                if let Err(err) = fs::write(path, updated) {
                    warnings.push(format!(
                        "could not update lessons index exports: {}: {err}",
                        path.display()
                    ));
                    return RegistrationStatus::Skipped;
                }
                RegistrationStatus::Updated
            }
            None => RegistrationStatus::AlreadyPresent,
        }
    }

    /// Wire the import block and the route element in the router file.
    ///
    /// Both patches are applied to one in-memory copy of the file, which is
    /// written back only if something actually changed.
    fn register_route(
        &self,
        name: &LessonName,
        warnings: &mut Vec<String>,
    ) -> (RegistrationStatus, RegistrationStatus) {
        let path = &self.paths.router_file;
        let mut text = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(err) => {
                warnings.push(format!(
                    "could not wire routes: {}: {err}",
                    path.display()
                ));
                return (RegistrationStatus::Skipped, RegistrationStatus::Skipped);
            }
        };
        let mut changed = false;

        let import = match patch::splice_import(&text, name.as_str()) {
            PatchOutcome::Updated(updated) => {
                text = updated;
                changed = true;
                RegistrationStatus::Updated
            }
            PatchOutcome::AlreadyPresent => RegistrationStatus::AlreadyPresent,
            PatchOutcome::AnchorMissing => {
                warnings.push(format!(
                    "could not find lessons import block in {}, skipping import wiring",
                    path.display()
                ));
                RegistrationStatus::Skipped
            }
        };

        let route_path = format!("/{}", name.route_slug());
        let route = match patch::insert_route(&text, name.as_str(), &route_path) {
            PatchOutcome::Updated(updated) => {
                text = updated;
                changed = true;
                RegistrationStatus::Updated
            }
            PatchOutcome::AlreadyPresent => RegistrationStatus::AlreadyPresent,
            PatchOutcome::AnchorMissing => {
                warnings.push(format!(
                    "could not find routes closing tag in {}, skipping route wiring",
                    path.display()
                ));
                RegistrationStatus::Skipped
            }
        };

        if changed {
            if let Err(err) = fs::write(path, &text) {
                warnings.push(format!("could not wire routes: {}: {err}", path.display()));
                return (RegistrationStatus::Skipped, RegistrationStatus::Skipped);
            }
        }

        (import, route)
    }
}

fn write_new(path: &Path, content: &str) -> Result<(), ScaffoldError> {
    let mut file = OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(path)
        .map_err(|source| {
            if source.kind() == ErrorKind::AlreadyExists {
                ScaffoldError::ArtifactExists {
                    path: path.to_path_buf(),
                }
            } else {
                ScaffoldError::Io {
                    path: path.to_path_buf(),
                    source,
                }
            }
        })?;

    file.write_all(content.as_bytes())
        .map_err(|source| ScaffoldError::Io {
            path: path.to_path_buf(),
            source,
        })
}
