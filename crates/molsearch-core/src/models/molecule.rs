//! Molecule entries flowing through the search pipeline.

use serde::{Deserialize, Serialize};

use super::compound::CompoundHit;

/// An entry pulled from a candidate source, before registration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    pub structure: String,
    #[serde(default)]
    pub identifier: Option<String>,
    #[serde(default)]
    pub variant: Option<String>,
}

impl Candidate {
    pub fn new(structure: impl Into<String>, identifier: Option<String>) -> Self {
        Self {
            structure: structure.into(),
            identifier,
            variant: None,
        }
    }

    pub fn has_structure(&self) -> bool {
        !self.structure.is_empty()
    }
}

impl From<CompoundHit> for Candidate {
    fn from(hit: CompoundHit) -> Self {
        Self {
            structure: hit.smiles,
            identifier: Some(hit.reg_number),
            variant: hit.variant,
        }
    }
}

/// A candidate that was successfully registered in a search index.
///
/// `sequence_index` is the position the index assigned at registration time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoleculeEntry {
    pub structure: String,
    pub identifier: Option<String>,
    pub variant: Option<String>,
    pub sequence_index: usize,
}

impl MoleculeEntry {
    pub fn from_candidate(candidate: Candidate, sequence_index: usize) -> Self {
        Self {
            structure: candidate.structure,
            identifier: candidate.identifier,
            variant: candidate.variant,
            sequence_index,
        }
    }

    /// Label shown in result cards: the identifier, or the structure when absent.
    pub fn display_name(&self) -> &str {
        self.identifier.as_deref().unwrap_or(&self.structure)
    }
}

/// The unit shown in the results grid and written to the CSV export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResult {
    pub structure: String,
    pub reg_number: String,
    pub variant: Option<String>,
    pub sequence_index: usize,
}

impl From<MoleculeEntry> for SearchResult {
    fn from(entry: MoleculeEntry) -> Self {
        Self {
            structure: entry.structure,
            reg_number: entry.identifier.unwrap_or_default(),
            variant: entry.variant,
            sequence_index: entry.sequence_index,
        }
    }
}
