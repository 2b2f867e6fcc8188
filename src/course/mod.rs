//! Static course catalog: units, lessons and their quiz questions.
//!
//! The catalog is loaded once (built-in or from a JSON file), validated, and then
//! shared read-only behind an `Arc`. Per-user lock state lives in [`crate::unlock`].

use std::path::Path;

use serde::{Deserialize, Serialize};

mod error;
pub use error::{ContentError, ContentResult};

mod lesson;
pub use lesson::{Lesson, Unit};

mod question;
pub use question::{Question, QuestionKind};

mod validate;

static BUILTIN_COURSE: &str = include_str!("../../content/course.json");

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Course {
    units: Vec<Unit>,
}

impl Course {
    pub fn builtin() -> ContentResult<Self> {
        Self::from_json(BUILTIN_COURSE.as_bytes())
    }

    pub fn from_json(bytes: &[u8]) -> ContentResult<Self> {
        let course: Self = serde_json::from_slice(bytes)?;
        course.validate()?;
        Ok(course)
    }

    #[tracing::instrument]
    pub fn load(path: &Path) -> ContentResult<Self> {
        tracing::debug!("loading course from {}", path.display());
        let bytes = std::fs::read(path)?;
        Self::from_json(&bytes)
    }

    pub fn units(&self) -> &[Unit] {
        &self.units
    }

    pub fn lessons(&self) -> impl Iterator<Item = &Lesson> {
        self.units.iter().flat_map(|u| u.lessons().iter())
    }

    pub fn lesson(&self, id: &str) -> Option<&Lesson> {
        self.lessons().find(|l| l.id() == id)
    }

    /// Position of a lesson as `(unit_index, lesson_index)`.
    pub fn locate(&self, id: &str) -> Option<(usize, usize)> {
        self.units.iter().enumerate().find_map(|(ui, unit)| {
            unit.lessons()
                .iter()
                .position(|l| l.id() == id)
                .map(|li| (ui, li))
        })
    }

    pub fn first_lesson(&self) -> Option<&Lesson> {
        self.units.first().and_then(|u| u.lessons().first())
    }

    pub fn lesson_count(&self) -> usize {
        self.units.iter().map(|u| u.lessons().len()).sum()
    }
}
