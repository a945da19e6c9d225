mod plan;
mod progress;
mod service;
mod timer;
mod workflow;

// Public API of the session subsystem.
pub use crate::error::{InputViolation, SessionError, SessionErrorKind, StateViolation};
pub use plan::{QuizPlan, QuizPlanBuilder, VocabFilter, flashcard_deck, lesson_exercises};
pub use progress::SessionProgress;
pub use service::{
    AdvanceOutcome, ItemReview, RecordedAnswer, SessionStatus, StudySession, TickOutcome,
};
pub use timer::{CountdownTimer, TICK_PERIOD, TimerTick};
pub use workflow::TimedSession;
