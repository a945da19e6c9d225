use rand::rng;
use rand::seq::SliceRandom;

use study_core::model::{
    ExerciseQuestion, HskLevel, LessonId, QuizQuestion, QuizSettings, VocabEntry,
};

use crate::catalog::Catalog;
use crate::error::PlanError;

//
// ─── QUIZ PLAN ─────────────────────────────────────────────────────────────────
//

/// Selection result for a quiz build.
#[derive(Debug, Clone, PartialEq)]
pub struct QuizPlan {
    pub questions: Vec<QuizQuestion>,
    /// How many questions matched the filters before the count cap.
    pub matched: usize,
}

impl QuizPlan {
    #[must_use]
    pub fn total(&self) -> usize {
        self.questions.len()
    }
}

/// Picks quiz questions according to the setup screen's settings.
///
/// Shuffling, when enabled, happens here, before the session starts; the
/// session itself never reorders its items.
pub struct QuizPlanBuilder<'a> {
    settings: &'a QuizSettings,
    shuffle: bool,
}

impl<'a> QuizPlanBuilder<'a> {
    #[must_use]
    pub fn new(settings: &'a QuizSettings) -> Self {
        Self {
            settings,
            shuffle: false,
        }
    }

    /// Enable or disable shuffling among matching questions before selection.
    #[must_use]
    pub fn with_shuffle(mut self, shuffle: bool) -> Self {
        self.shuffle = shuffle;
        self
    }

    /// # Errors
    ///
    /// Returns `PlanError::NoMatches` when no question fits the level and kind.
    pub fn build<'q>(
        self,
        questions: impl IntoIterator<Item = &'q QuizQuestion>,
    ) -> Result<QuizPlan, PlanError> {
        let mut candidates: Vec<QuizQuestion> = questions
            .into_iter()
            .filter(|q| q.level() == self.settings.level())
            .filter(|q| self.settings.kind().matches(q.kind()))
            .cloned()
            .collect();

        if candidates.is_empty() {
            return Err(PlanError::NoMatches);
        }
        let matched = candidates.len();

        if self.shuffle {
            let mut rng = rng();
            candidates.as_mut_slice().shuffle(&mut rng);
        }
        candidates.truncate(self.settings.question_count());

        Ok(QuizPlan {
            questions: candidates,
            matched,
        })
    }
}

//
// ─── VOCABULARY FILTER ─────────────────────────────────────────────────────────
//

/// Search box and level selector of the vocabulary browser.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VocabFilter {
    search: Option<String>,
    level: Option<HskLevel>,
}

impl VocabFilter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Case-insensitive match against characters, pinyin and translation.
    /// A blank term clears the search.
    #[must_use]
    pub fn with_search(mut self, term: impl Into<String>) -> Self {
        let term = term.into().trim().to_lowercase();
        self.search = (!term.is_empty()).then_some(term);
        self
    }

    #[must_use]
    pub fn with_level(mut self, level: Option<HskLevel>) -> Self {
        self.level = level;
        self
    }

    #[must_use]
    pub fn matches(&self, entry: &VocabEntry) -> bool {
        if self.level.is_some_and(|level| entry.hsk() != level) {
            return false;
        }
        let Some(term) = self.search.as_deref() else {
            return true;
        };
        entry.chinese().contains(term)
            || entry.pinyin().to_lowercase().contains(term)
            || entry.translation().to_lowercase().contains(term)
    }

    /// Matching entries in catalog order.
    #[must_use]
    pub fn apply<'v>(&self, entries: &'v [VocabEntry]) -> Vec<&'v VocabEntry> {
        entries.iter().filter(|e| self.matches(e)).collect()
    }
}

//
// ─── DECKS ─────────────────────────────────────────────────────────────────────
//

/// Flashcards for every vocabulary entry the filter keeps.
///
/// # Errors
///
/// Returns `PlanError::NoMatches` when the filter keeps nothing.
pub fn flashcard_deck(catalog: &Catalog, filter: &VocabFilter) -> Result<Vec<VocabEntry>, PlanError> {
    let deck: Vec<VocabEntry> = filter
        .apply(catalog.vocabulary())
        .into_iter()
        .cloned()
        .collect();
    if deck.is_empty() {
        return Err(PlanError::NoMatches);
    }
    Ok(deck)
}

/// The practice questions of one lesson.
///
/// # Errors
///
/// Returns `PlanError::UnknownLesson` or `PlanError::NoExercises`.
pub fn lesson_exercises(
    catalog: &Catalog,
    lesson_id: LessonId,
) -> Result<Vec<ExerciseQuestion>, PlanError> {
    let lesson = catalog
        .lesson(lesson_id)
        .ok_or(PlanError::UnknownLesson(lesson_id.value()))?;
    if !lesson.has_exercises() {
        return Err(PlanError::NoExercises(lesson_id.value()));
    }
    Ok(lesson.exercises().to_vec())
}

#[cfg(test)]
mod tests {
    use super::*;
    use study_core::model::{ItemId, QuestionKind, QuizKind};

    fn question(id: u64, kind: QuestionKind, level: u8) -> QuizQuestion {
        QuizQuestion::new(
            ItemId::new(id),
            kind,
            format!("Q{id}"),
            vec!["A".into(), "B".into()],
            0,
        )
        .unwrap()
        .with_level(HskLevel::new(level).unwrap())
    }

    fn word(id: u64, chinese: &str, pinyin: &str, translation: &str, level: u8) -> VocabEntry {
        VocabEntry::new(ItemId::new(id), chinese, pinyin, translation)
            .unwrap()
            .with_level(HskLevel::new(level).unwrap())
    }

    #[test]
    fn builder_filters_by_level_and_kind_and_caps_count() {
        let bank = vec![
            question(1, QuestionKind::Vocabulary, 1),
            question(2, QuestionKind::Grammar, 1),
            question(3, QuestionKind::Vocabulary, 1),
            question(4, QuestionKind::Vocabulary, 2),
            question(5, QuestionKind::Vocabulary, 1),
        ];
        let settings = QuizSettings::new(
            HskLevel::HSK1,
            QuizKind::Only(QuestionKind::Vocabulary),
            2,
            Some(60),
        )
        .unwrap();

        let plan = QuizPlanBuilder::new(&settings).build(&bank).unwrap();
        assert_eq!(plan.matched, 3);
        let ids: Vec<_> = plan.questions.iter().map(QuizQuestion::id).collect();
        assert_eq!(ids, vec![ItemId::new(1), ItemId::new(3)]);
    }

    #[test]
    fn shuffled_plan_keeps_the_same_candidates() {
        let bank: Vec<_> = (1..=6)
            .map(|id| question(id, QuestionKind::Character, 1))
            .collect();
        let settings = QuizSettings::default();
        let plan = QuizPlanBuilder::new(&settings)
            .with_shuffle(true)
            .build(&bank)
            .unwrap();

        let mut ids: Vec<_> = plan.questions.iter().map(|q| q.id().value()).collect();
        ids.sort_unstable();
        assert_eq!(ids, vec![1, 2, 3, 4, 5, 6]);
        assert_eq!(plan.total(), 6);
    }

    #[test]
    fn builder_reports_no_matches() {
        let bank = vec![question(1, QuestionKind::Grammar, 2)];
        let err = QuizPlanBuilder::new(&QuizSettings::default())
            .build(&bank)
            .unwrap_err();
        assert_eq!(err, PlanError::NoMatches);
    }

    #[test]
    fn vocab_filter_searches_all_fields_case_insensitively() {
        let words = vec![
            word(1, "你好", "nǐ hǎo", "bonjour, salut", 1),
            word(2, "谢谢", "xiè xiè", "merci", 1),
            word(3, "电脑", "diàn nǎo", "ordinateur", 2),
        ];

        let by_translation = VocabFilter::new().with_search("MERCI");
        assert_eq!(by_translation.apply(&words).len(), 1);

        let by_chars = VocabFilter::new().with_search("你");
        assert_eq!(by_chars.apply(&words)[0].id(), ItemId::new(1));

        let by_level = VocabFilter::new().with_level(Some(HskLevel::new(2).unwrap()));
        assert_eq!(by_level.apply(&words)[0].chinese(), "电脑");

        let blank = VocabFilter::new().with_search("   ");
        assert_eq!(blank.apply(&words).len(), 3);
    }
}
