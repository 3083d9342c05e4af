use crate::metrics::QueryGap;

/// Result of a step whose failures are recoverable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepOutcome {
    Complete,
    /// Some sub-queries failed; their lines are empty or truncated.
    Partial { gaps: Vec<QueryGap> },
}

impl StepOutcome {
    #[must_use]
    pub fn from_gaps(gaps: Vec<QueryGap>) -> Self {
        if gaps.is_empty() {
            Self::Complete
        } else {
            Self::Partial { gaps }
        }
    }

    #[must_use]
    pub const fn is_complete(&self) -> bool {
        matches!(self, Self::Complete)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SendSummary {
    pub sent: usize,
    /// Lines whose metric type is unknown.
    pub skipped: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompareReport {
    /// Compared line positions (the longer of the two files).
    pub total: usize,
    pub mismatched: usize,
}

impl CompareReport {
    #[must_use]
    pub const fn is_match(&self) -> bool {
        self.mismatched == 0
    }
}
