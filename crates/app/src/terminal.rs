//! Line-oriented front end: prints the current item, reads one command per line.

use std::io::{self, Write};

use services::session::{StudySession, TickOutcome, TimedSession};
use services::{SessionError, Speaker, speak_item};
use study_core::model::{ExerciseQuestion, QuizQuestion, StudyItem, VocabEntry};
use study_core::time::format_countdown;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::warn;

/// What a typed line asks the session to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action<R> {
    Reveal,
    Answer(R),
    /// Grade and move on in one step, as the flashcard buttons do.
    AnswerAndAdvance(R),
    Advance,
    Back,
    Forward,
    Reset,
    Speak,
    Quit,
}

/// How one kind of study item is shown and driven from the keyboard.
pub trait ItemView: StudyItem {
    fn render(&self, session: &StudySession<Self>) -> String
    where
        Self: Sized;

    fn parse(line: &str) -> Option<Action<Self::Response>>;

    fn help() -> &'static str;
}

fn common_action<R>(line: &str) -> Option<Action<R>> {
    match line {
        "<" | "back" => Some(Action::Back),
        ">" | "forward" => Some(Action::Forward),
        "reset" => Some(Action::Reset),
        "say" => Some(Action::Speak),
        "q" | "quit" => Some(Action::Quit),
        _ => None,
    }
}

fn parse_option(line: &str) -> Option<usize> {
    line.parse::<usize>().ok().and_then(|n| n.checked_sub(1))
}

fn header<T: StudyItem>(session: &StudySession<T>) -> String {
    let progress = session.progress();
    let mut line = format!(
        "[{}/{}] {}%",
        progress.current + 1,
        progress.total,
        progress.percent_through()
    );
    if let Some(secs) = progress.remaining_secs {
        line.push_str(&format!("  ⏱ {}", format_countdown(secs)));
    }
    let score = session.score();
    line.push_str(&format!(
        "  ✓ {}  ✗ {}",
        score.correct_count,
        score.incorrect_count()
    ));
    line
}

fn render_choices(
    out: &mut String,
    options: &[String],
    correct: usize,
    chosen: Option<(usize, bool)>,
) {
    for (i, option) in options.iter().enumerate() {
        let mark = match chosen {
            Some(_) if i == correct => "✓",
            Some((picked, false)) if picked == i => "✗",
            _ => " ",
        };
        out.push_str(&format!("  {mark} {}. {option}\n", i + 1));
    }
}

impl ItemView for VocabEntry {
    fn render(&self, session: &StudySession<Self>) -> String {
        let mut out = format!("{}\n\n  {}\n", header(session), self.chinese());
        if session.is_revealed() {
            out.push_str(&format!("  {}\n  {}\n", self.pinyin(), self.translation()));
        }
        if let Some(answer) = session.current_answer() {
            let verdict = if answer.correct { "known" } else { "to review" };
            out.push_str(&format!("  ({verdict})\n"));
        }
        out
    }

    fn parse(line: &str) -> Option<Action<bool>> {
        match line {
            "r" | "show" => Some(Action::Reveal),
            "y" | "yes" => Some(Action::AnswerAndAdvance(true)),
            "n" | "no" => Some(Action::AnswerAndAdvance(false)),
            _ => common_action(line),
        }
    }

    fn help() -> &'static str {
        "r=reveal  y=knew it  n=didn't  </>=browse  say  reset  q"
    }
}

impl ItemView for QuizQuestion {
    fn render(&self, session: &StudySession<Self>) -> String {
        let mut out = format!("{}\n\n  {}\n", header(session), self.question());
        let chosen = session.current_answer().map(|a| (a.response, a.correct));
        render_choices(&mut out, self.options(), self.correct(), chosen);
        if chosen.is_some() && !self.explanation().is_empty() {
            out.push_str(&format!("\n  {}\n", self.explanation()));
        }
        out
    }

    fn parse(line: &str) -> Option<Action<usize>> {
        if line == "next" {
            return Some(Action::Advance);
        }
        parse_option(line)
            .map(Action::Answer)
            .or_else(|| common_action(line))
    }

    fn help() -> &'static str {
        "1-9=choose  next  </>=browse  say  reset  q"
    }
}

impl ItemView for ExerciseQuestion {
    fn render(&self, session: &StudySession<Self>) -> String {
        let mut out = format!("{}\n\n  {}\n", header(session), self.question());
        let chosen = session.current_answer().map(|a| (a.response, a.correct));
        render_choices(&mut out, self.options(), self.correct(), chosen);
        if chosen.is_some() && !self.explanation().is_empty() {
            out.push_str(&format!("\n  {}\n", self.explanation()));
        }
        out
    }

    fn parse(line: &str) -> Option<Action<usize>> {
        if line == "next" || line == "skip" {
            return Some(Action::Advance);
        }
        parse_option(line)
            .map(Action::Answer)
            .or_else(|| common_action(line))
    }

    fn help() -> &'static str {
        "1-9=choose  next/skip  </>=browse  reset  q"
    }
}

fn apply<T: ItemView>(
    timed: &mut TimedSession<T>,
    speaker: &dyn Speaker,
    action: Action<T::Response>,
) -> Result<bool, SessionError> {
    match action {
        Action::Reveal => timed.reveal()?,
        Action::Answer(response) => {
            let index = timed.session().current_index();
            timed.answer(index, response)?;
        }
        Action::AnswerAndAdvance(response) => {
            let index = timed.session().current_index();
            timed.answer(index, response)?;
            timed.advance()?;
        }
        Action::Advance => {
            timed.advance()?;
        }
        Action::Back => {
            timed.go_back()?;
        }
        Action::Forward => {
            timed.go_forward()?;
        }
        Action::Reset => timed.reset(),
        Action::Speak => {
            speak_item(speaker, timed.session().current_item());
        }
        Action::Quit => return Ok(false),
    }
    Ok(true)
}

fn show(text: &str) -> io::Result<()> {
    let mut stdout = io::stdout().lock();
    writeln!(stdout, "{text}")?;
    stdout.flush()
}

fn render_results<T: StudyItem>(session: &StudySession<T>) -> String {
    let score = session.score();
    let mut out = format!(
        "\nSession complete: {}/{} correct ({}%), {} unanswered\n",
        score.correct_count,
        score.total_answered,
        score.percentage,
        score.unanswered()
    );
    if let Ok(summary) = session.summary() {
        out.push_str(&format!(
            "Ended by {:?} after {}s\n",
            summary.reason(),
            summary.elapsed_secs()
        ));
    }
    out
}

/// Drive `timed` from stdin until the learner quits or the session completes.
///
/// # Errors
///
/// Returns I/O errors from reading stdin or writing stdout.
pub async fn run<T: ItemView>(mut timed: TimedSession<T>, speaker: &dyn Speaker) -> io::Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    show(T::help())?;
    show(&timed.session().current_item().render(timed.session()))?;

    while !timed.session().is_complete() {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                let line = line.trim().to_lowercase();
                if line.is_empty() {
                    continue;
                }
                let Some(action) = T::parse(&line) else {
                    show(T::help())?;
                    continue;
                };
                match apply(&mut timed, speaker, action) {
                    Ok(false) => break,
                    Ok(true) => {}
                    Err(err) if err.is_benign_repeat() => {}
                    Err(err) => {
                        warn!(error = %err, "action rejected");
                        show(&format!("! {err}"))?;
                    }
                }
                if !timed.session().is_complete() {
                    show(&timed.session().current_item().render(timed.session()))?;
                }
            }
            tick = timed.next_tick() => {
                match tick {
                    TickOutcome::Expired => show("\nTime is up.")?,
                    TickOutcome::Running { remaining_secs } if remaining_secs % 60 == 0 || remaining_secs <= 10 => {
                        show(&format!("⏱ {}", format_countdown(remaining_secs)))?;
                    }
                    TickOutcome::Running { .. } => {}
                }
            }
        }
    }

    if timed.session().is_complete() {
        show(&render_results(timed.session()))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use services::session::AdvanceOutcome;
    use study_core::model::{ItemId, QuestionKind, SessionOptions};

    #[test]
    fn flashcard_commands_parse() {
        assert_eq!(VocabEntry::parse("r"), Some(Action::Reveal));
        assert_eq!(VocabEntry::parse("y"), Some(Action::AnswerAndAdvance(true)));
        assert_eq!(VocabEntry::parse("<"), Some(Action::Back));
        assert_eq!(VocabEntry::parse("3"), None);
    }

    #[test]
    fn quiz_options_are_one_based() {
        assert_eq!(QuizQuestion::parse("1"), Some(Action::Answer(0)));
        assert_eq!(QuizQuestion::parse("0"), None);
        assert_eq!(QuizQuestion::parse("next"), Some(Action::Advance));
        assert_eq!(ExerciseQuestion::parse("skip"), Some(Action::Advance));
    }

    #[test]
    fn answered_quiz_item_marks_choices() {
        let q = QuizQuestion::new(
            ItemId::new(1),
            QuestionKind::Vocabulary,
            "Que signifie '水' ?",
            vec!["Feu".into(), "Eau".into()],
            1,
        )
        .unwrap()
        .with_explanation("水 (shuǐ) signifie 'eau'.");
        let mut session = StudySession::start(vec![q], SessionOptions::quiz(None).unwrap()).unwrap();
        session.answer(0, 0).unwrap();

        let text = session.current_item().render(&session);
        assert!(text.contains("✗ 1. Feu"));
        assert!(text.contains("✓ 2. Eau"));
        assert!(text.contains("signifie 'eau'"));
    }

    #[test]
    fn flashcard_back_shows_only_after_reveal() {
        let entry = VocabEntry::new(ItemId::new(1), "家", "jiā", "famille/maison").unwrap();
        let mut session =
            StudySession::start(vec![entry], SessionOptions::flashcards()).unwrap();
        assert!(!session.current_item().render(&session).contains("jiā"));
        session.reveal().unwrap();
        assert!(session.current_item().render(&session).contains("famille/maison"));
    }

    #[tokio::test]
    async fn flashcard_grade_advances_in_one_step() {
        let deck = vec![
            VocabEntry::new(ItemId::new(1), "一", "yī", "un").unwrap(),
            VocabEntry::new(ItemId::new(2), "二", "èr", "deux").unwrap(),
        ];
        let mut timed = TimedSession::start(deck, SessionOptions::flashcards()).unwrap();
        let speaker = services::RecordingSpeaker::new();

        assert!(apply(&mut timed, &speaker, Action::Reveal).unwrap());
        assert!(apply(&mut timed, &speaker, Action::AnswerAndAdvance(true)).unwrap());
        assert_eq!(timed.session().current_index(), 1);
        assert!(apply(&mut timed, &speaker, Action::Speak).unwrap());
        assert_eq!(speaker.spoken()[0].text, "二");
        assert!(!apply(&mut timed, &speaker, Action::Quit).unwrap());
    }

    #[test]
    fn results_mention_unanswered_items() {
        let deck = vec![VocabEntry::new(ItemId::new(1), "三", "sān", "trois").unwrap()];
        let session = StudySession::start(deck, SessionOptions::flashcards()).unwrap();
        assert!(render_results(&session).contains("1 unanswered"));
    }

    #[test]
    fn advance_outcome_is_reported() {
        let deck = vec![VocabEntry::new(ItemId::new(1), "四", "sì", "quatre").unwrap()];
        let mut session = StudySession::start(deck, SessionOptions::flashcards()).unwrap();
        session.reveal().unwrap();
        session.answer_current(true).unwrap();
        assert_eq!(session.advance().unwrap(), AdvanceOutcome::Completed);
        assert!(render_results(&session).contains("AllItems"));
    }
}
