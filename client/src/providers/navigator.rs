//! Navigation capability.

use std::collections::VecDeque;
use std::sync::{Mutex, PoisonError};

/// Navigation capability used to force re-authentication.
pub trait Navigator: Send + Sync {
    /// Current location (path).
    fn current_location(&self) -> String;

    /// Navigate to `target`.
    fn navigate_to(&self, target: &str);
}

/// Number of recent locations kept by [`HistoryNavigator`].
pub const HISTORY_LIMIT: usize = 32;

/// In-process navigator that keeps the most recent locations.
///
/// The current location is the most recent entry. At most
/// [`HISTORY_LIMIT`] locations are kept; the navigation count is unbounded.
#[derive(Debug)]
pub struct HistoryNavigator {
    state: Mutex<History>,
}

#[derive(Debug)]
struct History {
    recent: VecDeque<String>,
    navigations: usize,
}

impl HistoryNavigator {
    /// Create a navigator positioned at `location`.
    #[must_use]
    pub fn at(location: impl Into<String>) -> Self {
        Self {
            state: Mutex::new(History {
                recent: VecDeque::from([location.into()]),
                navigations: 0,
            }),
        }
    }

    /// Recently visited locations, oldest first.
    #[must_use]
    pub fn history(&self) -> Vec<String> {
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .recent
            .iter()
            .cloned()
            .collect()
    }

    /// Number of navigations performed since construction.
    #[must_use]
    pub fn navigation_count(&self) -> usize {
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .navigations
    }
}

impl Default for HistoryNavigator {
    fn default() -> Self {
        Self::at("/")
    }
}

impl Navigator for HistoryNavigator {
    fn current_location(&self) -> String {
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .recent
            .back()
            .cloned()
            .unwrap_or_default()
    }

    fn navigate_to(&self, target: &str) {
        tracing::info!(location = %target, "Navigating");
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        state.recent.push_back(target.to_string());
        if state.recent.len() > HISTORY_LIMIT {
            state.recent.pop_front();
        }
        state.navigations += 1;
    }
}
