//! Structure matching engine integration.
//!
//! The search pipeline never touches molecules directly; it talks to a
//! [`MatchingEngine`] that owns structure indices and compiled query
//! patterns. Both are engine resources with an explicit `release` step,
//! which the pipeline always performs through RAII guards.
//!
//! This module provides:
//! - The engine traits the pipeline is generic over
//! - [`EngineReadiness`], the owned initialization handle injected into the orchestrator
//! - [`GraphEngine`], a built-in engine (SMILES parser + VF2 subgraph matching)

mod graph;
mod readiness;
pub mod smiles;
mod substructure;

pub use graph::{GraphEngine, GraphIndex, GraphPattern};
pub use readiness::{engine_channel, EngineLoader, EngineReadiness};
pub use substructure::has_substructure;

use crate::error::Result;

/// A structure matching engine.
///
/// Implementations are shared between searches, so the engine itself must be
/// `Send + Sync`; indices and patterns are owned by a single search.
pub trait MatchingEngine: Send + Sync + 'static {
    /// Compiled query representation.
    type Pattern: EnginePattern;
    /// Queryable collection of registered structures.
    type Index: EngineIndex<Pattern = Self::Pattern>;

    /// Allocate an empty index.
    fn create_index(&self) -> Result<Self::Index>;

    /// Compile a query pattern.
    ///
    /// Returns `MolSearchError::Pattern` when the text is not a valid pattern.
    fn compile_pattern(&self, pattern: &str) -> Result<Self::Pattern>;
}

/// Index of registered structures.
pub trait EngineIndex: Send {
    type Pattern;

    /// Register a structure, returning the index's sequence number for it.
    ///
    /// Sequence numbers start at 0 and increase by one per successful add.
    /// Malformed structures are rejected with `MolSearchError::Parse`.
    fn add(&mut self, structure: &str) -> Result<usize>;

    /// Sequence numbers of every registered structure containing `pattern`.
    fn matches(&self, pattern: &Self::Pattern) -> Result<Vec<usize>>;

    /// Number of registered structures.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Free the engine-side resources. Called exactly once per index.
    fn release(&mut self);
}

/// Compiled query pattern.
pub trait EnginePattern: Send {
    /// Free the engine-side resources. Called exactly once per pattern.
    fn release(&mut self);
}
