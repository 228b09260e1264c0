use thiserror::Error;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum LessonNameError {
    #[error("lesson name cannot be empty")]
    Empty,

    #[error("lesson name cannot contain whitespace")]
    Whitespace,

    #[error("lesson name cannot contain path separators")]
    PathSeparator,
}

//
// ─── LESSON NAME ───────────────────────────────────────────────────────────────
//

/// Identifier for a lesson, usable both as a source identifier and as a file
/// base name.
///
/// A valid name is non-empty and contains no whitespace or path separators.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LessonName(String);

impl LessonName {
    /// Creates a new `LessonName`.
    ///
    /// # Errors
    ///
    /// Returns `LessonNameError` if the name is empty, contains whitespace,
    /// or contains a path separator.
    pub fn new(name: impl Into<String>) -> Result<Self, LessonNameError> {
        let name = name.into();
        if name.is_empty() {
            return Err(LessonNameError::Empty);
        }
        if name.chars().any(char::is_whitespace) {
            return Err(LessonNameError::Whitespace);
        }
        if name.contains('/') || name.contains('\\') {
            return Err(LessonNameError::PathSeparator);
        }
        Ok(Self(name))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Derives the URL path segment for this lesson.
    ///
    /// A separator is inserted before each capital letter, any character that
    /// is not alphanumeric or a separator is folded to a separator, runs of
    /// separators collapse to one, the result is lower-cased and a leading
    /// separator is stripped.
    #[must_use]
    pub fn route_slug(&self) -> String {
        let mut folded = String::with_capacity(self.0.len() + 4);
        for ch in self.0.chars() {
            if ch.is_ascii_uppercase() {
                folded.push('-');
                folded.push(ch.to_ascii_lowercase());
            } else if ch.is_ascii_alphanumeric() || ch == '-' {
                folded.push(ch);
            } else {
                folded.push('-');
            }
        }

        let mut slug = String::with_capacity(folded.len());
        for ch in folded.chars() {
            if ch == '-' && slug.ends_with('-') {
                continue;
            }
            slug.push(ch);
        }
        if let Some(stripped) = slug.strip_prefix('-') {
            stripped.to_owned()
        } else {
            slug
        }
    }
}

impl std::fmt::Display for LessonName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
