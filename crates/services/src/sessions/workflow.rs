use std::time::Duration;

use study_core::model::{SessionOptions, StudyItem};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::{debug, warn};

use super::service::{AdvanceOutcome, RecordedAnswer, StudySession, TickOutcome};
use super::timer::{CountdownTimer, TICK_PERIOD, TimerTick};
use crate::error::SessionError;

/// A study session paired with the countdown that drives its time limit.
///
/// The driver owns the timer for the lifetime of the session: it starts one
/// when a timed session starts or resets, and stops it on completion, on reset
/// and on drop (the timer handle aborts its task when dropped). Ticks arrive
/// over a channel and are applied here, so session state has a single writer.
pub struct TimedSession<T: StudyItem> {
    session: StudySession<T>,
    period: Duration,
    generation: u64,
    timer: Option<CountdownTimer>,
    ticks_tx: UnboundedSender<TimerTick>,
    ticks_rx: UnboundedReceiver<TimerTick>,
}

impl<T: StudyItem> TimedSession<T> {
    /// Start a session and, if it has a time limit, its countdown.
    ///
    /// Must be called from within a Tokio runtime when the options are timed.
    ///
    /// # Errors
    ///
    /// Returns `SessionError` if the session cannot start.
    pub fn start(items: Vec<T>, options: SessionOptions) -> Result<Self, SessionError> {
        Ok(Self::new(StudySession::start(items, options)?))
    }

    /// Wrap an existing session, ticking once per second.
    #[must_use]
    pub fn new(session: StudySession<T>) -> Self {
        Self::with_period(session, TICK_PERIOD)
    }

    /// Wrap an existing session with a custom tick period.
    #[must_use]
    pub fn with_period(session: StudySession<T>, period: Duration) -> Self {
        let (ticks_tx, ticks_rx) = mpsc::unbounded_channel();
        let mut driver = Self {
            session,
            period,
            generation: 0,
            timer: None,
            ticks_tx,
            ticks_rx,
        };
        driver.start_timer();
        driver
    }

    #[must_use]
    pub fn session(&self) -> &StudySession<T> {
        &self.session
    }

    /// Stop the countdown and hand back the bare session.
    #[must_use]
    pub fn into_session(self) -> StudySession<T> {
        let Self { session, .. } = self;
        session
    }

    #[must_use]
    pub fn is_timer_running(&self) -> bool {
        self.timer.is_some()
    }

    /// # Errors
    ///
    /// See [`StudySession::reveal`].
    pub fn reveal(&mut self) -> Result<(), SessionError> {
        self.session.reveal()
    }

    /// # Errors
    ///
    /// See [`StudySession::answer`].
    pub fn answer(
        &mut self,
        index: usize,
        response: T::Response,
    ) -> Result<RecordedAnswer<T::Response>, SessionError> {
        self.session.answer(index, response)
    }

    /// # Errors
    ///
    /// See [`StudySession::advance`].
    pub fn advance(&mut self) -> Result<AdvanceOutcome, SessionError> {
        let outcome = self.session.advance()?;
        if outcome == AdvanceOutcome::Completed {
            self.stop_timer();
        }
        Ok(outcome)
    }

    /// # Errors
    ///
    /// See [`StudySession::go_back`].
    pub fn go_back(&mut self) -> Result<bool, SessionError> {
        self.session.go_back()
    }

    /// # Errors
    ///
    /// See [`StudySession::go_forward`].
    pub fn go_forward(&mut self) -> Result<bool, SessionError> {
        self.session.go_forward()
    }

    /// Reset the session and restart its countdown from the full limit.
    pub fn reset(&mut self) {
        self.stop_timer();
        self.session.reset();
        self.start_timer();
    }

    /// Wait for the next countdown tick and apply it.
    ///
    /// Ticks from a timer that has since been stopped or replaced are
    /// discarded. Resolves only while a countdown is running, so it can sit in
    /// a `select!` next to user input without spinning.
    pub async fn next_tick(&mut self) -> TickOutcome {
        loop {
            if self.timer.is_none() {
                return std::future::pending().await;
            }
            let Some(tick) = self.ticks_rx.recv().await else {
                return std::future::pending().await;
            };
            if tick.generation != self.generation {
                debug!(
                    stale = tick.generation,
                    current = self.generation,
                    "dropped stale tick"
                );
                continue;
            }
            match self.session.tick() {
                Ok(TickOutcome::Expired) => {
                    self.stop_timer();
                    return TickOutcome::Expired;
                }
                Ok(running) => return running,
                Err(err) => {
                    warn!(error = %err, "tick rejected; stopping countdown");
                    self.stop_timer();
                }
            }
        }
    }

    fn start_timer(&mut self) {
        if !self.session.options().is_timed() || self.session.is_complete() {
            return;
        }
        self.generation += 1;
        self.timer = Some(CountdownTimer::spawn(
            self.generation,
            self.period,
            self.ticks_tx.clone(),
        ));
    }

    fn stop_timer(&mut self) {
        if let Some(timer) = self.timer.take() {
            timer.cancel();
            // Anything still queued from the old timer is now stale.
            self.generation += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sessions::service::SessionStatus;
    use study_core::model::{ItemId, QuestionKind, QuizQuestion};
    use tokio::time::timeout;

    fn build_questions(n: u64) -> Vec<QuizQuestion> {
        (1..=n)
            .map(|id| {
                QuizQuestion::new(
                    ItemId::new(id),
                    QuestionKind::Grammar,
                    format!("Q{id}"),
                    vec!["A".into(), "B".into()],
                    0,
                )
                .unwrap()
            })
            .collect()
    }

    #[tokio::test(start_paused = true)]
    async fn countdown_expires_unanswered_quiz() {
        let mut timed =
            TimedSession::start(build_questions(3), SessionOptions::quiz(Some(5)).unwrap())
                .unwrap();
        assert!(timed.is_timer_running());

        for remaining in (1..5).rev() {
            assert_eq!(
                timed.next_tick().await,
                TickOutcome::Running {
                    remaining_secs: remaining
                }
            );
        }
        assert_eq!(timed.next_tick().await, TickOutcome::Expired);

        assert_eq!(timed.session().status(), SessionStatus::Completed);
        assert_eq!(timed.session().score().total_answered, 0);
        assert!(!timed.is_timer_running());
    }

    #[tokio::test(start_paused = true)]
    async fn reset_discards_ticks_from_the_old_timer() {
        let mut timed =
            TimedSession::start(build_questions(2), SessionOptions::quiz(Some(3)).unwrap())
                .unwrap();

        // Let the first timer queue a tick that is never applied.
        tokio::time::sleep(Duration::from_millis(1_500)).await;
        timed.reset();

        assert_eq!(
            timed.next_tick().await,
            TickOutcome::Running { remaining_secs: 2 }
        );
        assert_eq!(timed.session().remaining_secs(), Some(2));
    }

    #[tokio::test(start_paused = true)]
    async fn completing_by_advance_stops_the_countdown() {
        let mut timed =
            TimedSession::start(build_questions(1), SessionOptions::quiz(Some(60)).unwrap())
                .unwrap();
        timed.answer(0, 0).unwrap();
        assert_eq!(timed.advance().unwrap(), AdvanceOutcome::Completed);
        assert!(!timed.is_timer_running());

        let waited = timeout(Duration::from_secs(120), timed.next_tick()).await;
        assert!(waited.is_err());
        assert_eq!(timed.session().remaining_secs(), Some(60));
    }

    #[tokio::test(start_paused = true)]
    async fn untimed_session_never_ticks() {
        let mut timed = TimedSession::start(
            build_questions(2),
            SessionOptions::lesson_exercise(),
        )
        .unwrap();
        assert!(!timed.is_timer_running());
        assert!(timeout(Duration::from_secs(10), timed.next_tick()).await.is_err());
        assert!(timed.advance().is_ok());
    }

    #[tokio::test(start_paused = true)]
    async fn into_session_stops_the_countdown() {
        let timed =
            TimedSession::start(build_questions(2), SessionOptions::quiz(Some(5)).unwrap())
                .unwrap();
        let session = timed.into_session();
        tokio::time::sleep(Duration::from_secs(10)).await;
        assert_eq!(session.remaining_secs(), Some(5));
        assert!(!session.is_complete());
    }
}
