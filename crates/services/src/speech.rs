//! Fire-and-forget speech output for study items.

use std::sync::{Mutex, PoisonError};

use study_core::model::StudyItem;
use tracing::info;

/// What to say and how. Mandarin at a slightly slowed rate by default.
#[derive(Debug, Clone, PartialEq)]
pub struct SpeechRequest {
    pub text: String,
    pub lang: String,
    pub rate: f32,
}

impl SpeechRequest {
    pub const DEFAULT_LANG: &'static str = "zh-CN";
    pub const DEFAULT_RATE: f32 = 0.8;

    #[must_use]
    pub fn mandarin(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            lang: Self::DEFAULT_LANG.to_string(),
            rate: Self::DEFAULT_RATE,
        }
    }
}

/// Platform speech output. Implementations must not block the caller and
/// nothing they do feeds back into session state.
pub trait Speaker: Send + Sync {
    fn speak(&self, request: &SpeechRequest);
}

/// Speaks an item's text if it has any. Returns whether a request was sent.
pub fn speak_item<T: StudyItem>(speaker: &dyn Speaker, item: &T) -> bool {
    match item.speech_text() {
        Some(text) => {
            speaker.speak(&SpeechRequest::mandarin(text));
            true
        }
        None => false,
    }
}

/// Speaker for environments without audio: records the request in the log.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogSpeaker;

impl Speaker for LogSpeaker {
    fn speak(&self, request: &SpeechRequest) {
        info!(text = %request.text, lang = %request.lang, rate = request.rate, "speak");
    }
}

/// Keeps every request, for tests and previews.
#[derive(Debug, Default)]
pub struct RecordingSpeaker {
    spoken: Mutex<Vec<SpeechRequest>>,
}

impl RecordingSpeaker {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn spoken(&self) -> Vec<SpeechRequest> {
        self.spoken
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl Speaker for RecordingSpeaker {
    fn speak(&self, request: &SpeechRequest) {
        self.spoken
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(request.clone());
    }
}
