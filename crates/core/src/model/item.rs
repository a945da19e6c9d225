use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::ids::ItemId;

//
// ─── ERRORS ───────────────────────────────────────────────────────────────────
//

/// Errors raised while validating an item payload.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ItemError {
    #[error("{field} cannot be empty")]
    EmptyText { field: &'static str },

    #[error("a question needs at least two options, got {len}")]
    TooFewOptions { len: usize },

    #[error("correct option {correct} is outside 0..{options}")]
    CorrectOutOfRange { correct: usize, options: usize },

    #[error("HSK level must be between 1 and 6, got {0}")]
    InvalidLevel(u8),
}

/// Errors raised when a response does not fit the item it answers.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum ResponseError {
    #[error("selected option {selected} is outside 0..{options}")]
    OptionOutOfRange { selected: usize, options: usize },
}

//
// ─── STUDY ITEM ───────────────────────────────────────────────────────────────
//

/// One unit of study content driven through a session.
///
/// The session never looks inside an item. It only asks the item to grade a
/// response, which is where payload-specific validation lives (option ranges
/// for questions, nothing for self-assessed flashcards).
pub trait StudyItem {
    /// What the learner submits for this item.
    type Response: Copy + fmt::Debug + PartialEq;

    fn item_id(&self) -> ItemId;

    /// Validates `response` and returns whether it is correct.
    ///
    /// # Errors
    ///
    /// Returns `ResponseError` when the response cannot apply to this item.
    fn grade(&self, response: Self::Response) -> Result<bool, ResponseError>;

    /// Text handed to speech output for this item, if any.
    fn speech_text(&self) -> Option<&str> {
        None
    }
}

//
// ─── HSK LEVEL ────────────────────────────────────────────────────────────────
//

/// HSK proficiency level (1 to 6).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct HskLevel(u8);

impl HskLevel {
    pub const HSK1: HskLevel = HskLevel(1);

    /// # Errors
    ///
    /// Returns `ItemError::InvalidLevel` outside 1..=6.
    pub fn new(level: u8) -> Result<Self, ItemError> {
        if (1..=6).contains(&level) {
            Ok(Self(level))
        } else {
            Err(ItemError::InvalidLevel(level))
        }
    }

    #[must_use]
    pub fn value(self) -> u8 {
        self.0
    }
}

impl Default for HskLevel {
    fn default() -> Self {
        Self::HSK1
    }
}

impl TryFrom<u8> for HskLevel {
    type Error = ItemError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<HskLevel> for u8 {
    fn from(level: HskLevel) -> Self {
        level.0
    }
}

impl fmt::Display for HskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HSK{}", self.0)
    }
}

//
// ─── QUESTION KIND ────────────────────────────────────────────────────────────
//

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuestionKind {
    Vocabulary,
    Character,
    Grammar,
    Listening,
}

impl QuestionKind {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            QuestionKind::Vocabulary => "vocabulary",
            QuestionKind::Character => "character",
            QuestionKind::Grammar => "grammar",
            QuestionKind::Listening => "listening",
        }
    }

    #[must_use]
    pub fn from_str_opt(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "vocabulary" => Some(Self::Vocabulary),
            "character" => Some(Self::Character),
            "grammar" => Some(Self::Grammar),
            "listening" => Some(Self::Listening),
            _ => None,
        }
    }
}

pub(crate) fn require_text(field: &'static str, value: &str) -> Result<(), ItemError> {
    if value.trim().is_empty() {
        return Err(ItemError::EmptyText { field });
    }
    Ok(())
}

pub(crate) fn require_choices(options: &[String], correct: usize) -> Result<(), ItemError> {
    if options.len() < 2 {
        return Err(ItemError::TooFewOptions { len: options.len() });
    }
    if correct >= options.len() {
        return Err(ItemError::CorrectOutOfRange {
            correct,
            options: options.len(),
        });
    }
    for option in options {
        require_text("option", option)?;
    }
    Ok(())
}

pub(crate) fn grade_choice(
    options: usize,
    correct: usize,
    selected: usize,
) -> Result<bool, ResponseError> {
    if selected >= options {
        return Err(ResponseError::OptionOutOfRange { selected, options });
    }
    Ok(selected == correct)
}
