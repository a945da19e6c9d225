use serde::{Deserialize, Serialize};

use crate::model::ids::LessonId;
use crate::model::item::{ItemError, require_text};
use crate::model::question::ExerciseQuestion;

/// A lesson with its practice exercises.
///
/// Only the exercise section drives a session; the other lesson sections are
/// presentation content and are not modeled here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lesson {
    id: LessonId,
    title: String,
    #[serde(default)]
    exercises: Vec<ExerciseQuestion>,
}

impl Lesson {
    /// # Errors
    ///
    /// Returns `ItemError` if the title is blank or an exercise is malformed.
    pub fn new(
        id: LessonId,
        title: impl Into<String>,
        exercises: Vec<ExerciseQuestion>,
    ) -> Result<Self, ItemError> {
        let lesson = Self {
            id,
            title: title.into(),
            exercises,
        };
        lesson.validate()?;
        Ok(lesson)
    }

    /// # Errors
    ///
    /// See [`Lesson::new`].
    pub fn validate(&self) -> Result<(), ItemError> {
        require_text("title", &self.title)?;
        self.exercises.iter().try_for_each(ExerciseQuestion::validate)
    }

    #[must_use]
    pub fn id(&self) -> LessonId {
        self.id
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn exercises(&self) -> &[ExerciseQuestion] {
        &self.exercises
    }

    #[must_use]
    pub fn has_exercises(&self) -> bool {
        !self.exercises.is_empty()
    }
}
