//! Search requests, status and published state.

use serde::Serialize;

use super::pagination::Pagination;
use crate::models::{IdentifierQuery, SearchResult};

/// Lifecycle of the most recent search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchStatus {
    /// No search has run yet.
    #[default]
    Idle,
    Searching,
    /// Finished with at least one result.
    Success,
    /// Finished with no results.
    Empty,
    /// Failed with a user-visible error.
    Error,
}

impl SearchStatus {
    /// True once a search has run to completion, successfully or not.
    pub fn is_settled(&self) -> bool {
        matches!(self, Self::Success | Self::Empty | Self::Error)
    }
}

impl std::fmt::Display for SearchStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SearchStatus::Idle => write!(f, "idle"),
            SearchStatus::Searching => write!(f, "searching"),
            SearchStatus::Success => write!(f, "success"),
            SearchStatus::Empty => write!(f, "empty"),
            SearchStatus::Error => write!(f, "error"),
        }
    }
}

/// Which candidate source a search draws from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum SearchMode {
    Database,
    Custom,
    Identifier,
}

impl std::fmt::Display for SearchMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SearchMode::Database => write!(f, "database"),
            SearchMode::Custom => write!(f, "custom"),
            SearchMode::Identifier => write!(f, "identifier"),
        }
    }
}

/// One search trigger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchRequest {
    /// Ask the registry for candidates, then confirm each hit locally.
    DatabaseSubstructure { pattern: String },
    /// Search pasted `structure[<tab|;|space>identifier]` lines, one per line.
    CustomSubstructure { pattern: String, text: String },
    /// Look up registry entries by registration number, synonym or CAS.
    Identifier(IdentifierQuery),
}

impl SearchRequest {
    pub fn database(pattern: impl Into<String>) -> Self {
        Self::DatabaseSubstructure {
            pattern: pattern.into(),
        }
    }

    pub fn custom(pattern: impl Into<String>, text: impl Into<String>) -> Self {
        Self::CustomSubstructure {
            pattern: pattern.into(),
            text: text.into(),
        }
    }

    pub fn mode(&self) -> SearchMode {
        match self {
            SearchRequest::DatabaseSubstructure { .. } => SearchMode::Database,
            SearchRequest::CustomSubstructure { .. } => SearchMode::Custom,
            SearchRequest::Identifier(_) => SearchMode::Identifier,
        }
    }

    /// True when the request cannot produce results and is answered with an
    /// empty list without touching the engine or the network.
    pub fn is_blank(&self) -> bool {
        match self {
            SearchRequest::DatabaseSubstructure { pattern } => pattern.trim().is_empty(),
            SearchRequest::CustomSubstructure { pattern, text } => {
                pattern.trim().is_empty() || text.trim().is_empty()
            }
            SearchRequest::Identifier(query) => query.is_empty(),
        }
    }
}

/// What became of a search call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchOutcome {
    /// Results were published; carries the status they were published with.
    Completed(SearchStatus),
    /// A newer search started first; nothing was published.
    Superseded,
}

impl SearchOutcome {
    pub fn is_superseded(&self) -> bool {
        matches!(self, SearchOutcome::Superseded)
    }
}

/// Point-in-time copy of the published search state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchSnapshot {
    pub status: SearchStatus,
    pub mode: Option<SearchMode>,
    pub results: Vec<SearchResult>,
    pub pagination: Pagination,
    /// Message for the error state.
    pub error: Option<String>,
}

impl SearchSnapshot {
    /// Results on the current page.
    pub fn page_results(&self) -> &[SearchResult] {
        self.pagination.page_slice(&self.results)
    }

    pub fn has_searched(&self) -> bool {
        self.status != SearchStatus::Idle
    }
}
