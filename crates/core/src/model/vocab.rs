use serde::{Deserialize, Serialize};

use crate::model::ids::ItemId;
use crate::model::item::{HskLevel, ItemError, ResponseError, StudyItem, require_text};

/// A vocabulary pair shown as a flashcard: characters on the front,
/// pinyin and translation on the back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VocabEntry {
    id: ItemId,
    chinese: String,
    pinyin: String,
    translation: String,
    #[serde(default)]
    hsk: HskLevel,
}

impl VocabEntry {
    /// # Errors
    ///
    /// Returns `ItemError::EmptyText` if any text field is blank.
    pub fn new(
        id: ItemId,
        chinese: impl Into<String>,
        pinyin: impl Into<String>,
        translation: impl Into<String>,
    ) -> Result<Self, ItemError> {
        let entry = Self {
            id,
            chinese: chinese.into(),
            pinyin: pinyin.into(),
            translation: translation.into(),
            hsk: HskLevel::default(),
        };
        entry.validate()?;
        Ok(entry)
    }

    #[must_use]
    pub fn with_level(mut self, hsk: HskLevel) -> Self {
        self.hsk = hsk;
        self
    }

    /// Checks an entry that arrived through deserialization.
    ///
    /// # Errors
    ///
    /// Returns `ItemError::EmptyText` if any text field is blank.
    pub fn validate(&self) -> Result<(), ItemError> {
        require_text("chinese", &self.chinese)?;
        require_text("pinyin", &self.pinyin)?;
        require_text("translation", &self.translation)
    }

    #[must_use]
    pub fn id(&self) -> ItemId {
        self.id
    }

    #[must_use]
    pub fn chinese(&self) -> &str {
        &self.chinese
    }

    #[must_use]
    pub fn pinyin(&self) -> &str {
        &self.pinyin
    }

    #[must_use]
    pub fn translation(&self) -> &str {
        &self.translation
    }

    #[must_use]
    pub fn hsk(&self) -> HskLevel {
        self.hsk
    }
}

/// Flashcards are self-assessed: the response is the learner's own verdict.
impl StudyItem for VocabEntry {
    type Response = bool;

    fn item_id(&self) -> ItemId {
        self.id
    }

    fn grade(&self, knew_it: bool) -> Result<bool, ResponseError> {
        Ok(knew_it)
    }

    fn speech_text(&self) -> Option<&str> {
        Some(&self.chinese)
    }
}
