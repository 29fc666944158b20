// Copyright 2026 Oxide Computer Company

//! Cancellation and deadline context for VCS queries.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

/// Caller-supplied context bounding a sequence of VCS queries.
///
/// Every query issued through [`RepoQuery`](crate::RepoQuery) takes a
/// `&QueryContext`. A query observes the context at two points: before it
/// spawns the external process, and while waiting for that process to exit.
/// An in-flight child is killed once the context is cancelled or past its
/// deadline, and the query fails with
/// [`QueryError::Cancelled`](crate::QueryError::Cancelled).
///
/// Clones share the same cancel flag, so a context can be handed to another
/// thread and cancelled from there:
///
/// ```
/// use git_provenance_vcs::QueryContext;
///
/// let ctx = QueryContext::unbounded();
/// let handle = ctx.clone();
/// handle.cancel();
/// assert!(ctx.is_cancelled());
/// ```
#[derive(Clone, Debug)]
pub struct QueryContext {
    deadline: Option<Instant>,
    cancelled: Arc<AtomicBool>,
}

impl QueryContext {
    /// Creates a context with no deadline.
    pub fn unbounded() -> Self {
        QueryContext { deadline: None, cancelled: Arc::new(AtomicBool::new(false)) }
    }

    /// Creates a context that expires `timeout` from now.
    pub fn with_timeout(timeout: Duration) -> Self {
        Self::with_deadline(Instant::now() + timeout)
    }

    /// Creates a context that expires at `deadline`.
    pub fn with_deadline(deadline: Instant) -> Self {
        QueryContext {
            deadline: Some(deadline),
            cancelled: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Cancels the context. All clones observe the cancellation.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }

    /// Returns whether the context has been cancelled or its deadline has
    /// passed.
    pub fn is_cancelled(&self) -> bool {
        if self.cancelled.load(Ordering::Relaxed) {
            return true;
        }
        match self.deadline {
            Some(deadline) => Instant::now() >= deadline,
            None => false,
        }
    }
}

impl Default for QueryContext {
    fn default() -> Self {
        Self::unbounded()
    }
}
