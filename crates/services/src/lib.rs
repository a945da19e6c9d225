#![forbid(unsafe_code)]

pub mod catalog;
pub mod error;
pub mod sessions;
pub mod speech;

pub use study_core::Clock;
pub use sessions as session;

pub use catalog::Catalog;
pub use error::{CatalogError, PlanError, SessionError, SessionErrorKind};
pub use sessions::{
    AdvanceOutcome, QuizPlanBuilder, SessionProgress, SessionStatus, StudySession, TickOutcome,
    TimedSession, VocabFilter,
};
pub use speech::{LogSpeaker, RecordingSpeaker, SpeechRequest, Speaker, speak_item};
