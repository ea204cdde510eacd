//! Registers candidates into an engine index.

use tracing::{debug, warn};

use crate::engine::{EngineIndex, MatchingEngine};
use crate::models::{Candidate, MoleculeEntry};

/// An engine index owned by one search.
///
/// The engine resource is released exactly once: by [`SearchIndex::release`]
/// or, failing that, when the handle is dropped.
pub struct SearchIndex<E: MatchingEngine> {
    inner: Option<E::Index>,
}

impl<E: MatchingEngine> SearchIndex<E> {
    fn new(inner: E::Index) -> Self {
        Self { inner: Some(inner) }
    }

    /// Number of registered structures.
    pub fn len(&self) -> usize {
        self.inner.as_ref().map_or(0, |index| index.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub(crate) fn engine_index(&self) -> Option<&E::Index> {
        self.inner.as_ref()
    }

    /// Release the engine resource now.
    pub fn release(mut self) {
        self.release_inner();
    }

    fn release_inner(&mut self) {
        if let Some(mut index) = self.inner.take() {
            index.release();
            debug!("Released search index");
        }
    }
}

impl<E: MatchingEngine> Drop for SearchIndex<E> {
    fn drop(&mut self) {
        self.release_inner();
    }
}

impl<E: MatchingEngine> std::fmt::Debug for SearchIndex<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SearchIndex")
            .field("len", &self.len())
            .field("released", &self.inner.is_none())
            .finish()
    }
}

/// Register candidates into a fresh index.
///
/// Candidates with an empty structure are skipped. A candidate the engine
/// rejects is logged and skipped without aborting the batch. Each registered
/// entry carries the sequence number the index assigned it, so the returned
/// list is the input filtered to successes in original order.
///
/// Returns `(None, [])` when there is nothing to register or the engine
/// cannot allocate an index.
pub fn build_index<E: MatchingEngine>(
    engine: &E,
    candidates: Vec<Candidate>,
) -> (Option<SearchIndex<E>>, Vec<MoleculeEntry>) {
    if candidates.is_empty() {
        return (None, Vec::new());
    }

    let mut index = match engine.create_index() {
        Ok(index) => SearchIndex::<E>::new(index),
        Err(e) => {
            warn!("Failed to create search index: {}", e);
            return (None, Vec::new());
        }
    };

    let total = candidates.len();
    let mut entries = Vec::with_capacity(total);
    if let Some(inner) = index.inner.as_mut() {
        for candidate in candidates.into_iter().filter(Candidate::has_structure) {
            match inner.add(&candidate.structure) {
                Ok(sequence_index) => {
                    entries.push(MoleculeEntry::from_candidate(candidate, sequence_index))
                }
                Err(e) => warn!("Skipping structure {}: {}", candidate.structure, e),
            }
        }
    }

    debug!("Registered {}/{} candidates", entries.len(), total);
    (Some(index), entries)
}
