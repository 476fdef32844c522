//! Progress reporting hooks for the per-entity loops.

use crate::types::records::Warning;

/// Observer of a running stage.
pub trait Progress: Send + Sync {
    /// Called after each entity completes.
    fn advance(&self, done: usize, total: usize);

    /// Called as soon as a non-fatal warning is raised.
    fn warn(&self, _warning: &Warning) {}
}

/// Discards all progress.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoProgress;

impl Progress for NoProgress {
    fn advance(&self, _done: usize, _total: usize) {}
}
