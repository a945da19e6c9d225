//! Shared error types for the services crate.

use std::path::PathBuf;

use thiserror::Error;

use study_core::model::{ItemError, ResponseError, SessionSummaryError};

/// A transition that is not allowed in the session's current phase.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum StateViolation {
    #[error("session already completed")]
    Completed,
    #[error("session is still in progress")]
    InProgress,
    #[error("item {index} is already answered")]
    AlreadyAnswered { index: usize },
    #[error("item {index} must be answered before advancing")]
    NotAnswered { index: usize },
    #[error("answer side must be revealed before grading")]
    NotRevealed,
    #[error("answer side is already revealed")]
    AlreadyRevealed,
    #[error("this session has no reveal step")]
    RevealNotSupported,
    #[error("item {requested} is not the current item ({current})")]
    NotCurrent { requested: usize, current: usize },
    #[error("session has no time limit")]
    Untimed,
}

/// Input that can never be valid, whatever the session phase.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum InputViolation {
    #[error("no items available for session")]
    Empty,
    #[error(transparent)]
    Response(#[from] ResponseError),
}

/// Broad class of a `SessionError`, for callers that only branch on kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionErrorKind {
    InvalidState,
    InvalidInput,
}

/// Errors emitted by session operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SessionError {
    #[error("invalid session state: {0}")]
    InvalidState(#[from] StateViolation),
    #[error("invalid input: {0}")]
    InvalidInput(#[from] InputViolation),
    #[error(transparent)]
    Summary(#[from] SessionSummaryError),
}

impl SessionError {
    #[must_use]
    pub fn kind(&self) -> SessionErrorKind {
        match self {
            SessionError::InvalidState(_) => SessionErrorKind::InvalidState,
            SessionError::InvalidInput(_) | SessionError::Summary(_) => {
                SessionErrorKind::InvalidInput
            }
        }
    }

    /// True when the error only means "that click did nothing", such as a
    /// repeated answer on the same item.
    #[must_use]
    pub fn is_benign_repeat(&self) -> bool {
        matches!(
            self,
            SessionError::InvalidState(
                StateViolation::AlreadyAnswered { .. } | StateViolation::AlreadyRevealed
            )
        )
    }
}

impl From<ResponseError> for SessionError {
    fn from(err: ResponseError) -> Self {
        SessionError::InvalidInput(InputViolation::Response(err))
    }
}

/// Errors emitted while loading a catalog.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CatalogError {
    #[error("failed to read catalog {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("catalog is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("{section} entry {index} is invalid: {source}")]
    Invalid {
        section: &'static str,
        index: usize,
        #[source]
        source: ItemError,
    },
    #[error("duplicate id {id} in {section}")]
    DuplicateId { section: &'static str, id: u64 },
}

/// Errors emitted while planning which items a session receives.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum PlanError {
    #[error("no items match the requested filters")]
    NoMatches,
    #[error("lesson {0} not found")]
    UnknownLesson(u64),
    #[error("lesson {0} has no exercises")]
    NoExercises(u64),
}
