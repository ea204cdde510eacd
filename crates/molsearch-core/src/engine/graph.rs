//! Built-in matching engine backed by the SMILES parser and VF2 matcher.

use tracing::trace;

use super::smiles::{parse_pattern, parse_structure, Molecule};
use super::substructure::has_substructure;
use super::{EngineIndex, EnginePattern, MatchingEngine};
use crate::error::{MolSearchError, Result};

/// Pure-Rust structure matching engine.
#[derive(Debug, Clone, Default)]
pub struct GraphEngine {
    /// Largest structure (in atoms) accepted into an index; 0 means unlimited.
    max_atoms: usize,
}

impl GraphEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reject structures with more than `max_atoms` atoms at registration.
    pub fn with_max_atoms(mut self, max_atoms: usize) -> Self {
        self.max_atoms = max_atoms;
        self
    }
}

impl MatchingEngine for GraphEngine {
    type Pattern = GraphPattern;
    type Index = GraphIndex;

    fn create_index(&self) -> Result<GraphIndex> {
        Ok(GraphIndex {
            molecules: Vec::new(),
            max_atoms: self.max_atoms,
            released: false,
        })
    }

    fn compile_pattern(&self, pattern: &str) -> Result<GraphPattern> {
        let query = parse_pattern(pattern.trim()).map_err(|e| MolSearchError::Pattern {
            pattern: pattern.to_string(),
            message: e.to_string(),
        })?;
        Ok(GraphPattern { query: Some(query) })
    }
}

/// In-memory list of parsed structures; the sequence number is the position.
#[derive(Debug)]
pub struct GraphIndex {
    molecules: Vec<Molecule>,
    max_atoms: usize,
    released: bool,
}

impl EngineIndex for GraphIndex {
    type Pattern = GraphPattern;

    fn add(&mut self, structure: &str) -> Result<usize> {
        if self.released {
            return Err(MolSearchError::Engine {
                message: "index already released".into(),
            });
        }
        let molecule = parse_structure(structure).map_err(|e| MolSearchError::Parse {
            structure: structure.to_string(),
            message: e.to_string(),
        })?;
        if self.max_atoms > 0 && molecule.atom_count() > self.max_atoms {
            return Err(MolSearchError::Parse {
                structure: structure.to_string(),
                message: format!(
                    "{} atoms exceeds the limit of {}",
                    molecule.atom_count(),
                    self.max_atoms
                ),
            });
        }
        self.molecules.push(molecule);
        Ok(self.molecules.len() - 1)
    }

    fn matches(&self, pattern: &GraphPattern) -> Result<Vec<usize>> {
        let query = match (&pattern.query, self.released) {
            (Some(query), false) => query,
            _ => {
                return Err(MolSearchError::Engine {
                    message: "query on released resource".into(),
                })
            }
        };
        let hits: Vec<usize> = self
            .molecules
            .iter()
            .enumerate()
            .filter(|(_, molecule)| has_substructure(molecule, query))
            .map(|(index, _)| index)
            .collect();
        trace!("Pattern matched {}/{} structures", hits.len(), self.molecules.len());
        Ok(hits)
    }

    fn len(&self) -> usize {
        self.molecules.len()
    }

    fn release(&mut self) {
        self.molecules.clear();
        self.released = true;
    }
}

/// A parsed query pattern.
#[derive(Debug)]
pub struct GraphPattern {
    query: Option<Molecule>,
}

impl EnginePattern for GraphPattern {
    fn release(&mut self) {
        self.query = None;
    }
}
