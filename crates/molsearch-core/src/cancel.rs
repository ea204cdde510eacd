//! Cancel-by-superseding for overlapping searches.
//!
//! Every search trigger takes a [`RequestTicket`] from a shared
//! [`RequestTracker`]. Issuing a new ticket makes all older tickets stale, so
//! a response that arrives after the user has already searched again can be
//! recognised and dropped instead of overwriting newer results.
//!
//! # Example
//!
//! ```
//! use molsearch::cancel::RequestTracker;
//!
//! let tracker = RequestTracker::new();
//! let first = tracker.begin();
//! let second = tracker.begin();
//!
//! assert!(!first.is_current());
//! assert!(second.is_current());
//! ```

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Issues monotonically increasing request tickets.
///
/// Clones share the same counter.
#[derive(Debug, Clone, Default)]
pub struct RequestTracker {
    latest: Arc<AtomicU64>,
}

impl RequestTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new request, superseding every ticket issued before it.
    pub fn begin(&self) -> RequestTicket {
        let id = self.latest.fetch_add(1, Ordering::SeqCst) + 1;
        RequestTicket {
            id,
            latest: self.latest.clone(),
        }
    }

    /// Supersede all outstanding tickets without starting a new request.
    pub fn invalidate(&self) {
        self.latest.fetch_add(1, Ordering::SeqCst);
    }

    /// Id of the most recently issued ticket (0 before the first request).
    pub fn latest_id(&self) -> u64 {
        self.latest.load(Ordering::SeqCst)
    }
}

/// Token held by one in-flight search.
#[derive(Debug, Clone)]
pub struct RequestTicket {
    id: u64,
    latest: Arc<AtomicU64>,
}

impl RequestTicket {
    pub fn id(&self) -> u64 {
        self.id
    }

    /// True while no newer request has been started.
    pub fn is_current(&self) -> bool {
        self.latest.load(Ordering::SeqCst) == self.id
    }

    /// Return an error if this ticket has been superseded.
    pub fn check(&self) -> Result<(), SupersededError> {
        if self.is_current() {
            Ok(())
        } else {
            Err(SupersededError { ticket: self.id })
        }
    }
}

/// Error returned when a request's ticket is no longer current.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SupersededError {
    pub ticket: u64,
}

impl std::fmt::Display for SupersededError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Request {} was superseded", self.ticket)
    }
}

impl std::error::Error for SupersededError {}

impl From<SupersededError> for crate::error::MolSearchError {
    fn from(_: SupersededError) -> Self {
        crate::error::MolSearchError::Superseded
    }
}
