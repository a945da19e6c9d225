use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use study_core::Clock;
use study_core::model::{
    AdvanceMode, CompletionReason, ItemId, RevealMode, Score, SessionOptions, SessionSummary,
    StudyItem,
};
use tracing::{debug, info};

use super::progress::SessionProgress;
use crate::error::{InputViolation, SessionError, StateViolation};

//
// ─── OUTCOMES ──────────────────────────────────────────────────────────────────
//

/// A response recorded for one item, with the correctness the item assigned it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordedAnswer<R> {
    pub response: R,
    pub correct: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    InProgress,
    Completed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdvanceOutcome {
    Moved { index: usize },
    Completed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    Running { remaining_secs: u32 },
    Expired,
}

/// One row of the results screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemReview<R> {
    pub index: usize,
    pub item_id: ItemId,
    pub answer: Option<RecordedAnswer<R>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Completion {
    at: DateTime<Utc>,
    reason: CompletionReason,
}

//
// ─── SESSION ───────────────────────────────────────────────────────────────────
//

/// In-memory study session over a fixed, ordered list of items.
///
/// The same machine drives flashcards, quizzes and lesson exercises; the
/// differences live in [`SessionOptions`]. Items are never reordered once the
/// session starts and every answer is write-once.
pub struct StudySession<T: StudyItem> {
    items: Vec<T>,
    options: SessionOptions,
    clock: Clock,
    current: usize,
    answers: BTreeMap<usize, RecordedAnswer<T::Response>>,
    revealed: bool,
    remaining_secs: Option<u32>,
    started_at: DateTime<Utc>,
    completion: Option<Completion>,
}

impl<T: StudyItem> StudySession<T> {
    /// Start a session over `items` using the system clock.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::InvalidInput` if no items remain after applying
    /// the item limit.
    pub fn start(items: Vec<T>, options: SessionOptions) -> Result<Self, SessionError> {
        Self::start_with_clock(items, options, Clock::default())
    }

    /// Start a session whose timestamps come from `clock`.
    ///
    /// # Errors
    ///
    /// See [`StudySession::start`].
    pub fn start_with_clock(
        mut items: Vec<T>,
        options: SessionOptions,
        clock: Clock,
    ) -> Result<Self, SessionError> {
        if let Some(limit) = options.item_limit() {
            items.truncate(limit);
        }

        if items.is_empty() {
            return Err(InputViolation::Empty.into());
        }

        let session = Self {
            items,
            options,
            clock,
            current: 0,
            answers: BTreeMap::new(),
            revealed: false,
            remaining_secs: options.time_limit_secs(),
            started_at: clock.now(),
            completion: None,
        };
        info!(
            items = session.items.len(),
            time_limit_secs = ?options.time_limit_secs(),
            reveal = ?options.reveal(),
            advance = ?options.advance(),
            "study session started"
        );
        Ok(session)
    }

    //
    // ─── OBSERVERS ─────────────────────────────────────────────────────────────
    //

    #[must_use]
    pub fn options(&self) -> &SessionOptions {
        &self.options
    }

    #[must_use]
    pub fn items(&self) -> &[T] {
        &self.items
    }

    /// Total number of items in this session.
    #[must_use]
    pub fn total_items(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn current_index(&self) -> usize {
        self.current
    }

    #[must_use]
    pub fn current_item(&self) -> &T {
        &self.items[self.current]
    }

    #[must_use]
    pub fn is_last(&self) -> bool {
        self.current + 1 == self.items.len()
    }

    /// Whether the answer side of the current item is shown.
    #[must_use]
    pub fn is_revealed(&self) -> bool {
        self.revealed
    }

    #[must_use]
    pub fn answer_at(&self, index: usize) -> Option<&RecordedAnswer<T::Response>> {
        self.answers.get(&index)
    }

    #[must_use]
    pub fn current_answer(&self) -> Option<&RecordedAnswer<T::Response>> {
        self.answer_at(self.current)
    }

    /// Number of items that have already been answered.
    #[must_use]
    pub fn answered_count(&self) -> usize {
        self.answers.len()
    }

    #[must_use]
    pub fn status(&self) -> SessionStatus {
        if self.completion.is_some() {
            SessionStatus::Completed
        } else {
            SessionStatus::InProgress
        }
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.completion.is_some()
    }

    #[must_use]
    pub fn completion_reason(&self) -> Option<CompletionReason> {
        self.completion.map(|c| c.reason)
    }

    #[must_use]
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    #[must_use]
    pub fn completed_at(&self) -> Option<DateTime<Utc>> {
        self.completion.map(|c| c.at)
    }

    /// Seconds left on the countdown, `None` for untimed sessions.
    #[must_use]
    pub fn remaining_secs(&self) -> Option<u32> {
        self.remaining_secs
    }

    #[must_use]
    pub fn score(&self) -> Score {
        let correct = self.answers.values().filter(|a| a.correct).count();
        Score::new(correct, self.answers.len(), self.items.len())
    }

    /// Returns a summary of the current session progress.
    #[must_use]
    pub fn progress(&self) -> SessionProgress {
        SessionProgress {
            total: self.items.len(),
            answered: self.answers.len(),
            current: self.current,
            remaining: self.items.len() - self.answers.len(),
            remaining_secs: self.remaining_secs,
            is_complete: self.is_complete(),
        }
    }

    /// Every item in order with its recorded answer, if any.
    #[must_use]
    pub fn review(&self) -> Vec<ItemReview<T::Response>> {
        self.items
            .iter()
            .enumerate()
            .map(|(index, item)| ItemReview {
                index,
                item_id: item.item_id(),
                answer: self.answers.get(&index).copied(),
            })
            .collect()
    }

    /// Summary of a finished session.
    ///
    /// # Errors
    ///
    /// Returns `StateViolation::InProgress` before completion.
    pub fn summary(&self) -> Result<SessionSummary, SessionError> {
        let Some(completion) = self.completion else {
            return Err(StateViolation::InProgress.into());
        };
        Ok(SessionSummary::new(
            self.started_at,
            completion.at,
            self.score(),
            completion.reason,
        )?)
    }

    //
    // ─── TRANSITIONS ───────────────────────────────────────────────────────────
    //

    /// Show the answer side of the current flashcard.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::InvalidState` after completion, when the session
    /// has no reveal step, or when the card is already revealed.
    pub fn reveal(&mut self) -> Result<(), SessionError> {
        self.ensure_in_progress()?;
        if self.options.reveal() == RevealMode::Immediate {
            return Err(StateViolation::RevealNotSupported.into());
        }
        if self.revealed {
            return Err(StateViolation::AlreadyRevealed.into());
        }
        self.revealed = true;
        debug!(index = self.current, "revealed");
        Ok(())
    }

    /// Record `response` for the item at `index`, which must be the current one.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::InvalidState` after completion, for a stale index,
    /// for an item that already has an answer, or for an unrevealed flashcard.
    /// Returns `SessionError::InvalidInput` if the item rejects the response.
    pub fn answer(
        &mut self,
        index: usize,
        response: T::Response,
    ) -> Result<RecordedAnswer<T::Response>, SessionError> {
        self.ensure_in_progress()?;
        if index != self.current {
            return Err(StateViolation::NotCurrent {
                requested: index,
                current: self.current,
            }
            .into());
        }
        if self.answers.contains_key(&index) {
            return Err(StateViolation::AlreadyAnswered { index }.into());
        }
        if self.options.reveal() == RevealMode::Explicit && !self.revealed {
            return Err(StateViolation::NotRevealed.into());
        }

        let correct = self.items[index].grade(response)?;
        let recorded = RecordedAnswer { response, correct };
        self.answers.insert(index, recorded);
        self.revealed = true;
        debug!(index, correct, "answer recorded");
        Ok(recorded)
    }

    /// Record `response` for whichever item is current.
    ///
    /// # Errors
    ///
    /// See [`StudySession::answer`].
    pub fn answer_current(
        &mut self,
        response: T::Response,
    ) -> Result<RecordedAnswer<T::Response>, SessionError> {
        self.answer(self.current, response)
    }

    /// Move to the next item, or complete the session on the last one.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::InvalidState` after completion, or in gated mode
    /// when the current item has no answer yet.
    pub fn advance(&mut self) -> Result<AdvanceOutcome, SessionError> {
        self.ensure_in_progress()?;
        if self.options.advance() == AdvanceMode::Gated && !self.answers.contains_key(&self.current)
        {
            return Err(StateViolation::NotAnswered {
                index: self.current,
            }
            .into());
        }

        if self.is_last() {
            self.complete(CompletionReason::AllItems);
            return Ok(AdvanceOutcome::Completed);
        }

        self.arrive(self.current + 1);
        Ok(AdvanceOutcome::Moved {
            index: self.current,
        })
    }

    /// Browse to the previous item without grading. Returns whether it moved.
    ///
    /// # Errors
    ///
    /// Returns `StateViolation::Completed` after completion.
    pub fn go_back(&mut self) -> Result<bool, SessionError> {
        self.ensure_in_progress()?;
        if self.current == 0 {
            return Ok(false);
        }
        self.arrive(self.current - 1);
        Ok(true)
    }

    /// Browse to the next item without grading. Returns whether it moved.
    ///
    /// # Errors
    ///
    /// Returns `StateViolation::Completed` after completion.
    pub fn go_forward(&mut self) -> Result<bool, SessionError> {
        self.ensure_in_progress()?;
        if self.is_last() {
            return Ok(false);
        }
        self.arrive(self.current + 1);
        Ok(true)
    }

    /// One second of countdown. Forces completion when it reaches zero.
    ///
    /// # Errors
    ///
    /// Returns `StateViolation::Completed` after completion and
    /// `StateViolation::Untimed` for sessions without a time limit.
    pub fn tick(&mut self) -> Result<TickOutcome, SessionError> {
        self.ensure_in_progress()?;
        let Some(remaining) = self.remaining_secs.as_mut() else {
            return Err(StateViolation::Untimed.into());
        };
        *remaining = remaining.saturating_sub(1);
        let remaining = *remaining;

        if remaining == 0 {
            self.complete(CompletionReason::TimeExpired);
            return Ok(TickOutcome::Expired);
        }
        Ok(TickOutcome::Running {
            remaining_secs: remaining,
        })
    }

    /// Back to the state of a fresh start over the same items.
    pub fn reset(&mut self) {
        self.current = 0;
        self.answers.clear();
        self.revealed = false;
        self.remaining_secs = self.options.time_limit_secs();
        self.started_at = self.clock.now();
        self.completion = None;
        info!(items = self.items.len(), "study session reset");
    }

    fn ensure_in_progress(&self) -> Result<(), SessionError> {
        if self.is_complete() {
            return Err(StateViolation::Completed.into());
        }
        Ok(())
    }

    fn arrive(&mut self, index: usize) {
        self.current = index;
        // Flashcards always land face down; question items show their result once answered.
        self.revealed = self.options.reveal() == RevealMode::Immediate
            && self.answers.contains_key(&index);
        debug!(index, "moved");
    }

    fn complete(&mut self, reason: CompletionReason) {
        let score = self.score();
        // A wall clock stepping backwards must not produce an inverted summary.
        let at = self.clock.now().max(self.started_at);
        self.completion = Some(Completion { at, reason });
        info!(
            ?reason,
            correct = score.correct_count,
            answered = score.total_answered,
            total = score.total_items,
            percentage = score.percentage,
            "study session completed"
        );
    }
}

impl<T: StudyItem> fmt::Debug for StudySession<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StudySession")
            .field("items_len", &self.items.len())
            .field("current", &self.current)
            .field("answers_len", &self.answers.len())
            .field("revealed", &self.revealed)
            .field("remaining_secs", &self.remaining_secs)
            .field("started_at", &self.started_at)
            .field("completion", &self.completion)
            .finish_non_exhaustive()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
