use std::time::Duration;

use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior, interval_at};
use tracing::debug;

/// Countdown period used by study sessions.
pub const TICK_PERIOD: Duration = Duration::from_secs(1);

/// One tick from a countdown task, tagged with the generation of the timer
/// that produced it so ticks from a replaced timer can be dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerTick {
    pub generation: u64,
}

/// Handle to a running countdown task.
///
/// The task only emits ticks; it never touches session state. Dropping the
/// handle aborts the task, so every exit path of the owner stops the timer.
#[derive(Debug)]
pub struct CountdownTimer {
    generation: u64,
    handle: JoinHandle<()>,
}

impl CountdownTimer {
    /// Spawn a task sending a tick every `period` on `ticks`.
    ///
    /// Must be called from within a Tokio runtime.
    #[must_use]
    pub fn spawn(generation: u64, period: Duration, ticks: UnboundedSender<TimerTick>) -> Self {
        let handle = tokio::spawn(async move {
            let mut interval = interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                interval.tick().await;
                if ticks.send(TimerTick { generation }).is_err() {
                    break;
                }
            }
        });
        debug!(generation, period_ms = period.as_millis(), "countdown started");
        Self { generation, handle }
    }

    /// Stop the task now. Equivalent to dropping the handle.
    pub fn cancel(self) {
        drop(self);
    }
}

impl Drop for CountdownTimer {
    fn drop(&mut self) {
        self.handle.abort();
        debug!(generation = self.generation, "countdown stopped");
    }
}
