//! Thread-affinity assertion for single-threaded state.

use std::thread::{self, ThreadId};

/// Remembers the thread that created it and panics when used from another.
#[derive(Debug, Clone)]
pub struct ThreadChecker {
    owner: ThreadId,
}

impl ThreadChecker {
    /// Bind to the calling thread.
    pub fn new() -> Self {
        Self {
            owner: thread::current().id(),
        }
    }

    /// Whether the calling thread is the owning thread.
    pub fn is_current(&self) -> bool {
        thread::current().id() == self.owner
    }

    /// Panic unless called on the owning thread.
    #[track_caller]
    pub fn assert_current(&self, operation: &str) {
        assert!(
            self.is_current(),
            "{operation} must run on the thread that owns the tab list (owner {:?}, caller {:?})",
            self.owner,
            thread::current().id()
        );
    }
}

impl Default for ThreadChecker {
    fn default() -> Self {
        Self::new()
    }
}
