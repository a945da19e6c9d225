use services::session::{InputViolation, StateViolation};
use services::{AdvanceOutcome, SessionError, SessionStatus, StudySession, TimedSession};
use study_core::model::{
    CompletionReason, ItemId, QuestionKind, QuizQuestion, Score, SessionOptions, VocabEntry,
};
use study_core::time::fixed_clock;

fn deck(n: u64) -> Vec<VocabEntry> {
    (1..=n)
        .map(|id| VocabEntry::new(ItemId::new(id), format!("词{id}"), "cí", "mot").unwrap())
        .collect()
}

fn quiz(n: u64) -> Vec<QuizQuestion> {
    (1..=n)
        .map(|id| {
            QuizQuestion::new(
                ItemId::new(id),
                QuestionKind::Vocabulary,
                format!("Question {id}"),
                vec!["你好".into(), "再见".into(), "谢谢".into()],
                0,
            )
            .unwrap()
        })
        .collect()
}

fn review_card(session: &mut StudySession<VocabEntry>, knew_it: bool) -> AdvanceOutcome {
    session.reveal().unwrap();
    let index = session.current_index();
    session.answer(index, knew_it).unwrap();
    session.advance().unwrap()
}

#[test]
fn ten_flashcards_six_right_four_wrong() {
    let mut session =
        StudySession::start_with_clock(deck(10), SessionOptions::flashcards(), fixed_clock())
            .unwrap();

    let mut last = None;
    for i in 0..10 {
        last = Some(review_card(&mut session, i < 6));
    }

    assert_eq!(last, Some(AdvanceOutcome::Completed));
    assert_eq!(session.status(), SessionStatus::Completed);
    assert_eq!(
        session.score(),
        Score {
            correct_count: 6,
            total_answered: 10,
            total_items: 10,
            percentage: 60,
        }
    );
    assert_eq!(
        session.summary().unwrap().reason(),
        CompletionReason::AllItems
    );
}

#[test]
fn percentage_matches_rounded_ratio_for_every_k() {
    let n = 7_u64;
    for k in 0..=n {
        let mut session = StudySession::start(deck(n), SessionOptions::flashcards()).unwrap();
        for i in 0..n {
            review_card(&mut session, i < k);
        }
        let expected = ((100.0 * k as f64) / n as f64).round() as u32;
        assert_eq!(session.score().percentage, expected, "k = {k}");
    }
}

#[test]
fn advance_before_answer_is_rejected_and_position_kept() {
    let mut session = StudySession::start(quiz(3), SessionOptions::quiz(None).unwrap()).unwrap();
    let err = session.advance().unwrap_err();
    assert_eq!(
        err,
        SessionError::InvalidState(StateViolation::NotAnswered { index: 0 })
    );
    assert_eq!(session.current_index(), 0);
}

#[test]
fn out_of_range_option_is_invalid_input() {
    let mut session = StudySession::start(quiz(1), SessionOptions::quiz(None).unwrap()).unwrap();
    let err = session.answer(0, 3).unwrap_err();
    assert!(matches!(
        err,
        SessionError::InvalidInput(InputViolation::Response(_))
    ));
}

#[test]
fn reset_after_mixed_operations_restores_initial_state() {
    let mut session = StudySession::start(deck(4), SessionOptions::flashcards()).unwrap();
    review_card(&mut session, true);
    session.go_forward().unwrap();
    session.reveal().unwrap();
    session.go_back().unwrap();

    session.reset();
    assert_eq!(session.current_index(), 0);
    assert_eq!(session.answered_count(), 0);
    assert!(!session.is_revealed());
    assert_eq!(session.status(), SessionStatus::InProgress);
    assert_eq!(session.score(), Score::new(0, 0, 4));
}

#[test]
fn browsing_clamps_at_both_ends() {
    let mut session = StudySession::start(deck(3), SessionOptions::flashcards()).unwrap();
    assert!(!session.go_back().unwrap());
    assert_eq!(session.current_index(), 0);

    session.go_forward().unwrap();
    session.go_forward().unwrap();
    assert!(!session.go_forward().unwrap());
    assert_eq!(session.current_index(), 2);
    assert_eq!(session.answered_count(), 0);
}

#[tokio::test(start_paused = true)]
async fn timed_quiz_expires_after_five_ticks() {
    let mut timed = TimedSession::start(quiz(3), SessionOptions::quiz(Some(5)).unwrap()).unwrap();

    let mut ticks = 0;
    while !timed.session().is_complete() {
        timed.next_tick().await;
        ticks += 1;
    }

    assert_eq!(ticks, 5);
    assert_eq!(timed.session().status(), SessionStatus::Completed);
    assert_eq!(timed.session().score().total_answered, 0);
    assert_eq!(
        timed.session().completion_reason(),
        Some(CompletionReason::TimeExpired)
    );
}
