use serde::{Deserialize, Serialize};

use crate::model::ids::ItemId;
use crate::model::item::{
    HskLevel, ItemError, QuestionKind, ResponseError, StudyItem, grade_choice, require_choices,
    require_text,
};

//
// ─── QUIZ QUESTION ────────────────────────────────────────────────────────────
//

/// A multiple-choice quiz question. Options are visible immediately, so there
/// is no reveal step; the response is the index of the chosen option.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizQuestion {
    id: ItemId,
    kind: QuestionKind,
    #[serde(default)]
    level: HskLevel,
    question: String,
    options: Vec<String>,
    correct: usize,
    #[serde(default)]
    explanation: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    audio: Option<String>,
}

impl QuizQuestion {
    /// # Errors
    ///
    /// Returns `ItemError` if the question text is blank, there are fewer than
    /// two options, or `correct` does not point at an option.
    pub fn new(
        id: ItemId,
        kind: QuestionKind,
        question: impl Into<String>,
        options: Vec<String>,
        correct: usize,
    ) -> Result<Self, ItemError> {
        let q = Self {
            id,
            kind,
            level: HskLevel::default(),
            question: question.into(),
            options,
            correct,
            explanation: String::new(),
            audio: None,
        };
        q.validate()?;
        Ok(q)
    }

    #[must_use]
    pub fn with_level(mut self, level: HskLevel) -> Self {
        self.level = level;
        self
    }

    #[must_use]
    pub fn with_explanation(mut self, explanation: impl Into<String>) -> Self {
        self.explanation = explanation.into();
        self
    }

    #[must_use]
    pub fn with_audio(mut self, audio: impl Into<String>) -> Self {
        self.audio = Some(audio.into());
        self
    }

    /// # Errors
    ///
    /// See [`QuizQuestion::new`].
    pub fn validate(&self) -> Result<(), ItemError> {
        require_text("question", &self.question)?;
        require_choices(&self.options, self.correct)
    }

    #[must_use]
    pub fn id(&self) -> ItemId {
        self.id
    }

    #[must_use]
    pub fn kind(&self) -> QuestionKind {
        self.kind
    }

    #[must_use]
    pub fn level(&self) -> HskLevel {
        self.level
    }

    #[must_use]
    pub fn question(&self) -> &str {
        &self.question
    }

    #[must_use]
    pub fn options(&self) -> &[String] {
        &self.options
    }

    #[must_use]
    pub fn correct(&self) -> usize {
        self.correct
    }

    #[must_use]
    pub fn explanation(&self) -> &str {
        &self.explanation
    }

    #[must_use]
    pub fn audio(&self) -> Option<&str> {
        self.audio.as_deref()
    }
}

impl StudyItem for QuizQuestion {
    type Response = usize;

    fn item_id(&self) -> ItemId {
        self.id
    }

    fn grade(&self, selected: usize) -> Result<bool, ResponseError> {
        grade_choice(self.options.len(), self.correct, selected)
    }

    fn speech_text(&self) -> Option<&str> {
        self.audio.as_deref()
    }
}

//
// ─── EXERCISE QUESTION ────────────────────────────────────────────────────────
//

/// A question inside a lesson's practice section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExerciseQuestion {
    id: ItemId,
    question: String,
    options: Vec<String>,
    correct: usize,
    #[serde(default)]
    explanation: String,
}

impl ExerciseQuestion {
    /// # Errors
    ///
    /// Returns `ItemError` under the same rules as [`QuizQuestion::new`].
    pub fn new(
        id: ItemId,
        question: impl Into<String>,
        options: Vec<String>,
        correct: usize,
    ) -> Result<Self, ItemError> {
        let q = Self {
            id,
            question: question.into(),
            options,
            correct,
            explanation: String::new(),
        };
        q.validate()?;
        Ok(q)
    }

    #[must_use]
    pub fn with_explanation(mut self, explanation: impl Into<String>) -> Self {
        self.explanation = explanation.into();
        self
    }

    /// # Errors
    ///
    /// See [`ExerciseQuestion::new`].
    pub fn validate(&self) -> Result<(), ItemError> {
        require_text("question", &self.question)?;
        require_choices(&self.options, self.correct)
    }

    #[must_use]
    pub fn id(&self) -> ItemId {
        self.id
    }

    #[must_use]
    pub fn question(&self) -> &str {
        &self.question
    }

    #[must_use]
    pub fn options(&self) -> &[String] {
        &self.options
    }

    #[must_use]
    pub fn correct(&self) -> usize {
        self.correct
    }

    #[must_use]
    pub fn explanation(&self) -> &str {
        &self.explanation
    }
}

impl StudyItem for ExerciseQuestion {
    type Response = usize;

    fn item_id(&self) -> ItemId {
        self.id
    }

    fn grade(&self, selected: usize) -> Result<bool, ResponseError> {
        grade_choice(self.options.len(), self.correct, selected)
    }
}
