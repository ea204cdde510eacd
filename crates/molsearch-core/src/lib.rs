//! Molsearch - Headless substructure and identifier search over a compound registry.
//!
//! This crate sources candidate molecules from a remote registry or a pasted
//! list, indexes them with a structure matching engine, filters them by
//! substructure, pages the results and exports them as CSV. It has no UI or
//! HTTP server of its own.
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use molsearch::{EngineReadiness, GatewayConfig, GraphEngine, HttpGateway};
//! use molsearch::{SearchOrchestrator, SearchRequest};
//!
//! #[tokio::main]
//! async fn main() -> molsearch::Result<()> {
//!     let gateway = HttpGateway::new(&GatewayConfig::from_env()?)?;
//!     let engine = EngineReadiness::ready(GraphEngine::new());
//!     let search = SearchOrchestrator::new(engine, Arc::new(gateway));
//!
//!     search.search(SearchRequest::database("c1ccccc1")).await;
//!     for result in search.current_page_results().await {
//!         println!("{} {}", result.reg_number, result.structure);
//!     }
//!
//!     Ok(())
//! }
//! ```

pub mod cancel;
pub mod config;
pub mod engine;
pub mod error;
pub mod export;
pub mod index;
pub mod logging;
pub mod models;
pub mod network;
pub mod search;

// Re-export commonly used types
pub use cancel::{RequestTicket, RequestTracker, SupersededError};
pub use config::GatewayConfig;
pub use engine::{
    engine_channel, EngineIndex, EngineLoader, EnginePattern, EngineReadiness, GraphEngine,
    MatchingEngine,
};
pub use error::{MolSearchError, Result};
pub use export::{CsvPayload, DirectorySink, DownloadSink, MemorySink};
pub use index::{build_index, filter_by_substructure, normalize_line, normalize_text, SearchIndex};
pub use logging::{init_logging, LoggingOptions};
pub use models::{Candidate, CompoundHit, IdentifierQuery, MoleculeEntry, SearchResult};
pub use network::{CompoundGateway, DynGateway, HttpGateway};
pub use search::{
    Pagination, SearchMode, SearchOrchestrator, SearchOutcome, SearchRequest, SearchSnapshot,
    SearchStatus,
};
