//! Study content loaded from a JSON file.

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use study_core::model::{ItemId, Lesson, LessonId, QuizQuestion, VocabEntry};

use crate::error::CatalogError;

/// Everything the study pages draw items from.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    #[serde(default)]
    vocabulary: Vec<VocabEntry>,
    #[serde(default)]
    questions: Vec<QuizQuestion>,
    #[serde(default)]
    lessons: Vec<Lesson>,
}

impl Catalog {
    /// Build a catalog from already-validated parts.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::DuplicateId` if ids repeat within a section.
    pub fn new(
        vocabulary: Vec<VocabEntry>,
        questions: Vec<QuizQuestion>,
        lessons: Vec<Lesson>,
    ) -> Result<Self, CatalogError> {
        let catalog = Self {
            vocabulary,
            questions,
            lessons,
        };
        catalog.validate()?;
        Ok(catalog)
    }

    /// # Errors
    ///
    /// Returns `CatalogError::Json` for malformed JSON and
    /// `CatalogError::Invalid`/`DuplicateId` for entries that fail validation.
    pub fn from_json_str(raw: &str) -> Result<Self, CatalogError> {
        let catalog: Catalog = serde_json::from_str(raw)?;
        catalog.validate()?;
        Ok(catalog)
    }

    /// # Errors
    ///
    /// Returns `CatalogError::Io` if the file cannot be read, otherwise see
    /// [`Catalog::from_json_str`].
    pub fn load(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let catalog = Self::from_json_str(&raw)?;
        info!(
            path = %path.display(),
            vocabulary = catalog.vocabulary.len(),
            questions = catalog.questions.len(),
            lessons = catalog.lessons.len(),
            "catalog loaded"
        );
        Ok(catalog)
    }

    #[must_use]
    pub fn vocabulary(&self) -> &[VocabEntry] {
        &self.vocabulary
    }

    #[must_use]
    pub fn questions(&self) -> &[QuizQuestion] {
        &self.questions
    }

    #[must_use]
    pub fn lessons(&self) -> &[Lesson] {
        &self.lessons
    }

    #[must_use]
    pub fn lesson(&self, id: LessonId) -> Option<&Lesson> {
        self.lessons.iter().find(|lesson| lesson.id() == id)
    }

    fn validate(&self) -> Result<(), CatalogError> {
        for (index, entry) in self.vocabulary.iter().enumerate() {
            entry.validate().map_err(|source| CatalogError::Invalid {
                section: "vocabulary",
                index,
                source,
            })?;
        }
        unique_ids("vocabulary", self.vocabulary.iter().map(VocabEntry::id))?;

        for (index, question) in self.questions.iter().enumerate() {
            question.validate().map_err(|source| CatalogError::Invalid {
                section: "questions",
                index,
                source,
            })?;
        }
        unique_ids("questions", self.questions.iter().map(QuizQuestion::id))?;

        for (index, lesson) in self.lessons.iter().enumerate() {
            lesson.validate().map_err(|source| CatalogError::Invalid {
                section: "lessons",
                index,
                source,
            })?;
            unique_ids(
                "lesson exercises",
                lesson.exercises().iter().map(|q| q.id()),
            )?;
        }
        let mut seen = HashSet::new();
        for lesson in &self.lessons {
            if !seen.insert(lesson.id()) {
                return Err(CatalogError::DuplicateId {
                    section: "lessons",
                    id: lesson.id().value(),
                });
            }
        }
        Ok(())
    }
}

fn unique_ids(
    section: &'static str,
    ids: impl IntoIterator<Item = ItemId>,
) -> Result<(), CatalogError> {
    let mut seen = HashSet::new();
    for id in ids {
        if !seen.insert(id) {
            return Err(CatalogError::DuplicateId {
                section,
                id: id.value(),
            });
        }
    }
    Ok(())
}
