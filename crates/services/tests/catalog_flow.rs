use std::io::Write;

use services::session::{flashcard_deck, lesson_exercises};
use services::{
    AdvanceOutcome, Catalog, PlanError, QuizPlanBuilder, RecordingSpeaker, StudySession,
    VocabFilter, speak_item,
};
use study_core::model::{HskLevel, LessonId, QuestionKind, QuizKind, QuizSettings, SessionOptions};

const CATALOG: &str = r#"{
    "vocabulary": [
        {"id": 1, "chinese": "你好", "pinyin": "nǐ hǎo", "translation": "bonjour", "hsk": 1},
        {"id": 2, "chinese": "谢谢", "pinyin": "xiè xiè", "translation": "merci", "hsk": 1},
        {"id": 3, "chinese": "电脑", "pinyin": "diàn nǎo", "translation": "ordinateur", "hsk": 2}
    ],
    "questions": [
        {"id": 1, "kind": "vocabulary", "question": "Comment dit-on 'Bonjour' ?",
         "options": ["你好", "再见", "谢谢", "不客气"], "correct": 0},
        {"id": 2, "kind": "character", "question": "Combien de traits a '人' ?",
         "options": ["1", "2", "3", "4"], "correct": 1},
        {"id": 3, "kind": "vocabulary", "question": "Que signifie '水' ?",
         "options": ["Feu", "Eau", "Terre", "Air"], "correct": 1}
    ],
    "lessons": [
        {"id": 1, "title": "Salutations de base", "exercises": [
            {"id": 1, "question": "Comment dit-on 'Bonjour' ?", "options": ["你好", "再见"], "correct": 0},
            {"id": 2, "question": "Réponse à '谢谢' ?", "options": ["你好", "不客气"], "correct": 1}
        ]},
        {"id": 2, "title": "Les nombres"}
    ]
}"#;

#[test]
fn catalog_file_feeds_a_vocabulary_quiz() {
    let mut file = tempfile();
    file.1.write_all(CATALOG.as_bytes()).unwrap();
    let catalog = Catalog::load(&file.0).unwrap();
    std::fs::remove_file(&file.0).ok();

    let settings = QuizSettings::new(
        HskLevel::HSK1,
        QuizKind::Only(QuestionKind::Vocabulary),
        10,
        Some(300),
    )
    .unwrap();
    let plan = QuizPlanBuilder::new(&settings)
        .build(catalog.questions())
        .unwrap();
    assert_eq!(plan.total(), 2);

    let mut session = StudySession::start(plan.questions, settings.session_options()).unwrap();
    assert_eq!(session.remaining_secs(), Some(300));
    session.answer(0, 0).unwrap();
    session.advance().unwrap();
    session.answer(1, 0).unwrap();
    assert_eq!(session.advance().unwrap(), AdvanceOutcome::Completed);
    assert_eq!(session.score().percentage, 50);
}

#[test]
fn filtered_flashcards_are_spoken() {
    let catalog = Catalog::from_json_str(CATALOG).unwrap();
    let deck = flashcard_deck(
        &catalog,
        &VocabFilter::new().with_level(Some(HskLevel::HSK1)),
    )
    .unwrap();
    assert_eq!(deck.len(), 2);

    let session = StudySession::start(deck, SessionOptions::flashcards()).unwrap();
    let speaker = RecordingSpeaker::new();
    assert!(speak_item(&speaker, session.current_item()));
    assert_eq!(speaker.spoken()[0].text, "你好");
}

#[test]
fn lesson_exercises_allow_skipping() {
    let catalog = Catalog::from_json_str(CATALOG).unwrap();
    let exercises = lesson_exercises(&catalog, LessonId::new(1)).unwrap();
    let mut session = StudySession::start(exercises, SessionOptions::lesson_exercise()).unwrap();

    assert_eq!(session.advance().unwrap(), AdvanceOutcome::Moved { index: 1 });
    session.answer(1, 1).unwrap();
    assert_eq!(session.advance().unwrap(), AdvanceOutcome::Completed);
    assert_eq!(session.score().correct_count, 1);
    assert_eq!(session.score().total_answered, 1);

    assert_eq!(
        lesson_exercises(&catalog, LessonId::new(2)).unwrap_err(),
        PlanError::NoExercises(2)
    );
    assert_eq!(
        lesson_exercises(&catalog, LessonId::new(7)).unwrap_err(),
        PlanError::UnknownLesson(7)
    );
}

fn tempfile() -> (std::path::PathBuf, std::fs::File) {
    let path = std::env::temp_dir().join(format!(
        "study-catalog-{}-{}.json",
        std::process::id(),
        line!()
    ));
    let file = std::fs::File::create(&path).unwrap();
    (path, file)
}
