/// Aggregated view of session progress, useful for UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionProgress {
    /// Zero-based index of the current question.
    pub index: usize,
    pub total: usize,
    pub answered: usize,
    pub remaining: usize,
}

impl SessionProgress {
    /// One-based position for display ("3 / 20").
    #[must_use]
    pub fn position(&self) -> usize {
        self.index + 1
    }

    /// Fraction of the session already behind the current question.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn fraction(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        self.index as f64 / self.total as f64
    }
}
