use serde::{Deserialize, Serialize};

/// Aggregate result of the answers recorded so far in a session.
///
/// `percentage` is taken over answered items, not over all items, and is 0
/// when nothing has been answered yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Score {
    pub correct_count: usize,
    pub total_answered: usize,
    pub total_items: usize,
    pub percentage: u32,
}

impl Score {
    #[must_use]
    pub fn new(correct_count: usize, total_answered: usize, total_items: usize) -> Self {
        Self {
            correct_count,
            total_answered,
            total_items,
            percentage: rounded_percentage(correct_count, total_answered),
        }
    }

    #[must_use]
    pub fn incorrect_count(&self) -> usize {
        self.total_answered.saturating_sub(self.correct_count)
    }

    #[must_use]
    pub fn unanswered(&self) -> usize {
        self.total_items.saturating_sub(self.total_answered)
    }
}

/// `round(part / whole * 100)` with halves rounded up, in integer arithmetic.
fn rounded_percentage(part: usize, whole: usize) -> u32 {
    if whole == 0 {
        return 0;
    }
    let part = part.min(whole) as u128;
    let whole = whole as u128;
    let pct = (part * 200 + whole) / (whole * 2);
    u32::try_from(pct).unwrap_or(100)
}
