use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::item::{HskLevel, QuestionKind};

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SettingsError {
    #[error("time limit must be > 0 seconds")]
    InvalidTimeLimit,

    #[error("item limit must be > 0")]
    InvalidItemLimit,

    #[error("question count must be > 0")]
    InvalidQuestionCount,

    #[error("unknown question kind: {0}")]
    UnknownQuestionKind(String),
}

//
// ─── SESSION OPTIONS ───────────────────────────────────────────────────────────
//

/// Whether the answer side needs an explicit reveal before grading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RevealMode {
    /// Flashcards: show the front, reveal the back, then self-grade.
    Explicit,
    /// Quizzes and exercises: options are visible from the start.
    Immediate,
}

/// How the learner moves to the next item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AdvanceMode {
    /// The current item must be answered before `advance` succeeds.
    Gated,
    /// `advance` is always allowed (lesson exercises).
    Free,
}

/// Options fixed when a session starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionOptions {
    time_limit_secs: Option<u32>,
    item_limit: Option<usize>,
    reveal: RevealMode,
    advance: AdvanceMode,
}

impl SessionOptions {
    /// Flashcard review: explicit reveal, gated advance, untimed.
    #[must_use]
    pub fn flashcards() -> Self {
        Self {
            time_limit_secs: None,
            item_limit: None,
            reveal: RevealMode::Explicit,
            advance: AdvanceMode::Gated,
        }
    }

    /// Quiz: immediate options, gated advance, optionally timed.
    ///
    /// # Errors
    ///
    /// Returns `SettingsError::InvalidTimeLimit` for a zero limit.
    pub fn quiz(time_limit_secs: Option<u32>) -> Result<Self, SettingsError> {
        Self {
            time_limit_secs: None,
            item_limit: None,
            reveal: RevealMode::Immediate,
            advance: AdvanceMode::Gated,
        }
        .with_time_limit(time_limit_secs)
    }

    /// Lesson exercises: immediate options, free advance, untimed.
    #[must_use]
    pub fn lesson_exercise() -> Self {
        Self {
            time_limit_secs: None,
            item_limit: None,
            reveal: RevealMode::Immediate,
            advance: AdvanceMode::Free,
        }
    }

    /// # Errors
    ///
    /// Returns `SettingsError::InvalidTimeLimit` for `Some(0)`.
    pub fn with_time_limit(mut self, secs: Option<u32>) -> Result<Self, SettingsError> {
        if secs == Some(0) {
            return Err(SettingsError::InvalidTimeLimit);
        }
        self.time_limit_secs = secs;
        Ok(self)
    }

    /// Caps how many of the supplied items the session keeps.
    ///
    /// # Errors
    ///
    /// Returns `SettingsError::InvalidItemLimit` for `Some(0)`.
    pub fn with_item_limit(mut self, limit: Option<usize>) -> Result<Self, SettingsError> {
        if limit == Some(0) {
            return Err(SettingsError::InvalidItemLimit);
        }
        self.item_limit = limit;
        Ok(self)
    }

    #[must_use]
    pub fn with_reveal(mut self, reveal: RevealMode) -> Self {
        self.reveal = reveal;
        self
    }

    #[must_use]
    pub fn with_advance(mut self, advance: AdvanceMode) -> Self {
        self.advance = advance;
        self
    }

    #[must_use]
    pub fn time_limit_secs(&self) -> Option<u32> {
        self.time_limit_secs
    }

    #[must_use]
    pub fn item_limit(&self) -> Option<usize> {
        self.item_limit
    }

    #[must_use]
    pub fn reveal(&self) -> RevealMode {
        self.reveal
    }

    #[must_use]
    pub fn advance(&self) -> AdvanceMode {
        self.advance
    }

    #[must_use]
    pub fn is_timed(&self) -> bool {
        self.time_limit_secs.is_some()
    }
}

//
// ─── QUIZ SETTINGS ─────────────────────────────────────────────────────────────
//

/// Which question kinds a quiz draws from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuizKind {
    Mixed,
    Only(QuestionKind),
}

impl QuizKind {
    #[must_use]
    pub fn matches(self, kind: QuestionKind) -> bool {
        match self {
            QuizKind::Mixed => true,
            QuizKind::Only(only) => only == kind,
        }
    }

    /// Parses `mixed` or a question kind name.
    ///
    /// # Errors
    ///
    /// Returns `SettingsError::UnknownQuestionKind` for anything else.
    pub fn parse(raw: &str) -> Result<Self, SettingsError> {
        if raw.trim().eq_ignore_ascii_case("mixed") {
            return Ok(QuizKind::Mixed);
        }
        QuestionKind::from_str_opt(raw)
            .map(QuizKind::Only)
            .ok_or_else(|| SettingsError::UnknownQuestionKind(raw.to_string()))
    }
}

/// Setup screen choices for a quiz.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizSettings {
    level: HskLevel,
    kind: QuizKind,
    question_count: usize,
    time_limit_secs: Option<u32>,
}

impl QuizSettings {
    pub const DEFAULT_QUESTION_COUNT: usize = 10;
    pub const DEFAULT_TIME_LIMIT_SECS: u32 = 300;

    /// `None` as the time limit means an untimed quiz.
    ///
    /// # Errors
    ///
    /// Returns `SettingsError` if the question count or time limit is zero.
    pub fn new(
        level: HskLevel,
        kind: QuizKind,
        question_count: usize,
        time_limit_secs: Option<u32>,
    ) -> Result<Self, SettingsError> {
        if question_count == 0 {
            return Err(SettingsError::InvalidQuestionCount);
        }
        if time_limit_secs == Some(0) {
            return Err(SettingsError::InvalidTimeLimit);
        }
        Ok(Self {
            level,
            kind,
            question_count,
            time_limit_secs,
        })
    }

    #[must_use]
    pub fn level(&self) -> HskLevel {
        self.level
    }

    #[must_use]
    pub fn kind(&self) -> QuizKind {
        self.kind
    }

    #[must_use]
    pub fn question_count(&self) -> usize {
        self.question_count
    }

    #[must_use]
    pub fn time_limit_secs(&self) -> Option<u32> {
        self.time_limit_secs
    }

    /// Session options for a quiz built from these settings.
    #[must_use]
    pub fn session_options(&self) -> SessionOptions {
        SessionOptions {
            time_limit_secs: self.time_limit_secs,
            item_limit: Some(self.question_count),
            reveal: RevealMode::Immediate,
            advance: AdvanceMode::Gated,
        }
    }
}

impl Default for QuizSettings {
    fn default() -> Self {
        Self {
            level: HskLevel::HSK1,
            kind: QuizKind::Mixed,
            question_count: Self::DEFAULT_QUESTION_COUNT,
            time_limit_secs: Some(Self::DEFAULT_TIME_LIMIT_SECS),
        }
    }
}
