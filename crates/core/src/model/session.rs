use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::score::Score;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SessionSummaryError {
    #[error("completed_at is before started_at")]
    InvalidTimeRange,

    #[error("answered count ({answered}) exceeds item count ({total})")]
    CountMismatch { answered: usize, total: usize },

    #[error("correct count ({correct}) exceeds answered count ({answered})")]
    CorrectExceedsAnswered { correct: usize, answered: usize },
}

/// Why a session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompletionReason {
    /// The learner moved past the last item.
    AllItems,
    /// The countdown reached zero first.
    TimeExpired,
}

/// Summary of a finished study session, as shown on the results screen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSummary {
    started_at: DateTime<Utc>,
    completed_at: DateTime<Utc>,
    score: Score,
    reason: CompletionReason,
}

impl SessionSummary {
    /// # Errors
    ///
    /// Returns `SessionSummaryError::InvalidTimeRange` if `completed_at` is before `started_at`.
    /// Returns `SessionSummaryError::CountMismatch` or `CorrectExceedsAnswered` if the
    /// score counts are inconsistent.
    pub fn new(
        started_at: DateTime<Utc>,
        completed_at: DateTime<Utc>,
        score: Score,
        reason: CompletionReason,
    ) -> Result<Self, SessionSummaryError> {
        if completed_at < started_at {
            return Err(SessionSummaryError::InvalidTimeRange);
        }
        if score.total_answered > score.total_items {
            return Err(SessionSummaryError::CountMismatch {
                answered: score.total_answered,
                total: score.total_items,
            });
        }
        if score.correct_count > score.total_answered {
            return Err(SessionSummaryError::CorrectExceedsAnswered {
                correct: score.correct_count,
                answered: score.total_answered,
            });
        }

        Ok(Self {
            started_at,
            completed_at,
            score,
            reason,
        })
    }

    #[must_use]
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    #[must_use]
    pub fn completed_at(&self) -> DateTime<Utc> {
        self.completed_at
    }

    #[must_use]
    pub fn score(&self) -> Score {
        self.score
    }

    #[must_use]
    pub fn reason(&self) -> CompletionReason {
        self.reason
    }

    /// Wall-clock length of the session in whole seconds.
    #[must_use]
    pub fn elapsed_secs(&self) -> i64 {
        (self.completed_at - self.started_at).num_seconds()
    }
}
