mod ids;
mod item;
mod lesson;
mod question;
mod score;
mod session;
mod settings;
mod vocab;

pub use ids::{ItemId, LessonId, ParseIdError};
pub use item::{HskLevel, ItemError, QuestionKind, ResponseError, StudyItem};
pub use lesson::Lesson;
pub use question::{ExerciseQuestion, QuizQuestion};
pub use score::Score;
pub use session::{CompletionReason, SessionSummary, SessionSummaryError};
pub use settings::{AdvanceMode, QuizKind, QuizSettings, RevealMode, SessionOptions, SettingsError};
pub use vocab::VocabEntry;
