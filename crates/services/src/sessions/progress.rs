/// Aggregated view of session progress, useful for UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionProgress {
    pub total: usize,
    pub answered: usize,
    pub current: usize,
    pub remaining: usize,
    pub remaining_secs: Option<u32>,
    pub is_complete: bool,
}

impl SessionProgress {
    /// Position of the current item as a rounded percentage, counting the
    /// current item as reached.
    #[must_use]
    pub fn percent_through(&self) -> u32 {
        if self.total == 0 {
            return 0;
        }
        let reached = (self.current + 1).min(self.total);
        let pct = (reached * 100 + self.total / 2) / self.total;
        u32::try_from(pct).unwrap_or(100)
    }
}
