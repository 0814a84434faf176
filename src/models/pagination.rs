use crate::constants::{DEFAULT_HISTORY_COUNT, MAX_HISTORY_COUNT};

/// Window into a sender's history, newest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HistoryPage {
    pub count: usize,
    pub skip: usize,
}

impl HistoryPage {
    /// Applies the default and the upper bound on `count`.
    pub fn new(count: Option<usize>, skip: Option<usize>) -> Self {
        Self {
            count: count.unwrap_or(DEFAULT_HISTORY_COUNT).min(MAX_HISTORY_COUNT),
            skip: skip.unwrap_or(0),
        }
    }
}

impl Default for HistoryPage {
    fn default() -> Self {
        Self::new(None, None)
    }
}
