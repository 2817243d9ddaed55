use std::collections::VecDeque;

use crate::review::types::ReviewAction;

/// Bounded, most-recent-first buffer of review actions.
///
/// Kept only for UI context ("you just denied this"); never persisted.
#[derive(Debug, Clone)]
pub struct ReviewHistory {
    capacity: usize,
    entries: VecDeque<ReviewAction>,
}

impl Default for ReviewHistory {
    fn default() -> Self {
        Self::with_capacity(Self::DEFAULT_CAPACITY)
    }
}

impl ReviewHistory {
    pub const DEFAULT_CAPACITY: usize = 10;

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            capacity,
            entries: VecDeque::with_capacity(capacity),
        }
    }

    /// Push a new action to the front, evicting the oldest entries beyond capacity
    pub fn record(&mut self, action: ReviewAction) {
        if self.capacity == 0 {
            return;
        }
        self.entries.push_front(action);
        self.entries.truncate(self.capacity);
    }

    /// Newest action recorded for a submission
    pub fn latest_for(&self, submission_id: &str) -> Option<&ReviewAction> {
        self.entries
            .iter()
            .find(|action| action.submission_id == submission_id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ReviewAction> {
        self.entries.iter()
    }

    pub fn to_vec(&self) -> Vec<ReviewAction> {
        self.entries.iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
