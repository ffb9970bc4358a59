//! Navigation sink.
//!
//! The session layer forces navigation (to the login view) when a session
//! ends; it does so through this trait rather than knowing how views are
//! shown.

use std::sync::{Mutex, PoisonError};

pub trait Navigator: Send + Sync {
    fn navigate(&self, path: &str);
}

/// In-memory navigation history.
#[derive(Debug)]
pub struct History {
    entries: Mutex<Vec<String>>,
}

impl History {
    /// History positioned at `start`.
    #[must_use]
    pub fn new(start: &str) -> Self {
        Self { entries: Mutex::new(vec![start.to_owned()]) }
    }

    /// Current location.
    #[must_use]
    pub fn current(&self) -> String {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .last()
            .cloned()
            .unwrap_or_default()
    }

    /// Every location visited, oldest first.
    #[must_use]
    pub fn entries(&self) -> Vec<String> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    /// How many times `path` was pushed.
    #[must_use]
    pub fn visits(&self, path: &str) -> usize {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .skip(1)
            .filter(|p| p.as_str() == path)
            .count()
    }
}

impl Navigator for History {
    fn navigate(&self, path: &str) {
        tracing::info!(path, "navigate");
        self.entries.lock().unwrap_or_else(PoisonError::into_inner).push(path.to_owned());
    }
}
