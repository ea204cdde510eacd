//! Search orchestration and result paging.
//!
//! This module provides:
//! - [`SearchOrchestrator`], which sources candidates, indexes and filters them
//! - The request, status and snapshot types it publishes
//! - [`Pagination`], the fixed-size page arithmetic used for display

mod orchestrator;
mod pagination;
mod state;

pub use orchestrator::{match_candidates, SearchOrchestrator};
pub use pagination::Pagination;
pub use state::{SearchMode, SearchOutcome, SearchRequest, SearchSnapshot, SearchStatus};
