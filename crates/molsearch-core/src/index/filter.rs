//! Substructure filtering over a built index.

use std::collections::HashSet;

use tracing::{debug, error};

use super::SearchIndex;
use crate::engine::{EngineIndex, EnginePattern, MatchingEngine};
use crate::models::MoleculeEntry;

/// Releases a compiled pattern when it goes out of scope.
struct PatternGuard<P: EnginePattern>(P);

impl<P: EnginePattern> Drop for PatternGuard<P> {
    fn drop(&mut self) {
        self.0.release();
    }
}

/// Keep the entries whose structure contains `pattern`, in original order.
///
/// A blank pattern returns the entries unchanged. If the pattern does not
/// compile, or the engine fails while matching, the entries are also
/// returned unfiltered: an invalid pattern cannot narrow the candidate set,
/// so callers must not read an unchanged list as "everything matched".
///
/// The compiled pattern is released before returning on every path.
pub fn filter_by_substructure<E: MatchingEngine>(
    engine: &E,
    index: &SearchIndex<E>,
    entries: Vec<MoleculeEntry>,
    pattern: &str,
) -> Vec<MoleculeEntry> {
    if pattern.trim().is_empty() {
        return entries;
    }

    let Some(engine_index) = index.engine_index() else {
        return entries;
    };

    let compiled = match engine.compile_pattern(pattern) {
        Ok(compiled) => PatternGuard(compiled),
        Err(e) => {
            debug!("Pattern did not compile, returning candidates unfiltered: {}", e);
            return entries;
        }
    };

    let matched = match engine_index.matches(&compiled.0) {
        Ok(matched) => matched,
        Err(e) => {
            error!("Substructure query failed, returning candidates unfiltered: {}", e);
            return entries;
        }
    };
    drop(compiled);

    let registered = engine_index.len();
    let matched: HashSet<usize> = matched
        .into_iter()
        .filter(|&sequence_index| {
            let known = sequence_index < registered;
            if !known {
                error!(
                    "Engine reported unregistered sequence index {} (index holds {})",
                    sequence_index, registered
                );
            }
            known
        })
        .collect();

    let filtered: Vec<MoleculeEntry> = entries
        .into_iter()
        .filter(|entry| matched.contains(&entry.sequence_index))
        .collect();
    debug!("Pattern '{}' matched {} entries", pattern, filtered.len());
    filtered
}
