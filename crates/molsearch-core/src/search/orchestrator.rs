//! Query orchestration: candidate sourcing, local indexing and filtering.

use chrono::NaiveDate;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use super::pagination::Pagination;
use super::state::{SearchMode, SearchOutcome, SearchRequest, SearchSnapshot, SearchStatus};
use crate::cancel::{RequestTicket, RequestTracker};
use crate::engine::{EngineReadiness, MatchingEngine};
use crate::error::{MolSearchError, Result};
use crate::export::{export_results, CsvPayload};
use crate::index::{build_index, filter_by_substructure, normalize_text};
use crate::models::{Candidate, SearchResult};
use crate::network::DynGateway;

/// Published state; only ever replaced by the most recent search.
#[derive(Debug, Default)]
struct SearchState {
    status: SearchStatus,
    mode: Option<SearchMode>,
    results: Vec<SearchResult>,
    page: usize,
    error: Option<String>,
}

/// Runs searches and owns the state they publish.
///
/// Each call to [`search`](Self::search) takes a fresh request ticket. A
/// search whose ticket has been overtaken by a newer one by the time its
/// candidates arrive is dropped without touching published state, so a slow
/// response can never overwrite a faster, newer one.
///
/// Engine indices and compiled patterns live only inside one search call and
/// are released before it returns.
pub struct SearchOrchestrator<E: MatchingEngine> {
    engine: EngineReadiness<E>,
    gateway: DynGateway,
    tracker: RequestTracker,
    state: RwLock<SearchState>,
}

impl<E: MatchingEngine> SearchOrchestrator<E> {
    pub fn new(engine: EngineReadiness<E>, gateway: DynGateway) -> Self {
        Self {
            engine,
            gateway,
            tracker: RequestTracker::new(),
            state: RwLock::new(SearchState {
                page: 1,
                ..SearchState::default()
            }),
        }
    }

    pub fn gateway(&self) -> &DynGateway {
        &self.gateway
    }

    pub fn engine(&self) -> &EngineReadiness<E> {
        &self.engine
    }

    /// Run a search and publish its results.
    ///
    /// Failures the user should see (network, engine availability) are
    /// published as [`SearchStatus::Error`]; they are not returned as `Err`.
    pub async fn search(&self, request: SearchRequest) -> SearchOutcome {
        let ticket = self.tracker.begin();
        let mode = request.mode();
        debug!("Search #{} ({}) started", ticket.id(), mode);

        if request.is_blank() {
            return self.publish(&ticket, mode, Ok(Vec::new())).await;
        }
        self.mark_searching(&ticket).await;

        let results = self.run(&ticket, request).await;
        self.publish(&ticket, mode, results).await
    }

    async fn run(&self, ticket: &RequestTicket, request: SearchRequest) -> Result<Vec<SearchResult>> {
        let engine = self.engine.wait().await?;

        let (candidates, pattern) = match request {
            SearchRequest::DatabaseSubstructure { pattern } => {
                let hits = self.gateway.search_substructure(&pattern).await?;
                debug!("Registry returned {} substructure hits", hits.len());
                (hits.into_iter().map(Candidate::from).collect::<Vec<_>>(), Some(pattern))
            }
            SearchRequest::CustomSubstructure { pattern, text } => {
                (normalize_text(&text), Some(pattern))
            }
            SearchRequest::Identifier(query) => {
                let hits = self.gateway.search_identifiers(&query).await?;
                debug!("Registry returned {} identifier hits", hits.len());
                (hits.into_iter().map(Candidate::from).collect::<Vec<_>>(), None)
            }
        };

        // Skip engine work for a response nobody will see.
        ticket.check()?;

        Ok(match_candidates(engine.as_ref(), candidates, pattern.as_deref()))
    }

    /// `mode` keeps naming the published results until the new ones land.
    async fn mark_searching(&self, ticket: &RequestTicket) {
        let mut state = self.state.write().await;
        if ticket.is_current() {
            state.status = SearchStatus::Searching;
        }
    }

    async fn publish(
        &self,
        ticket: &RequestTicket,
        mode: SearchMode,
        results: Result<Vec<SearchResult>>,
    ) -> SearchOutcome {
        let mut state = self.state.write().await;
        if !ticket.is_current() || matches!(results, Err(MolSearchError::Superseded)) {
            debug!("Search #{} superseded, discarding its results", ticket.id());
            return SearchOutcome::Superseded;
        }

        state.mode = Some(mode);
        state.page = 1;
        match results {
            Ok(results) => {
                state.status = if results.is_empty() {
                    SearchStatus::Empty
                } else {
                    SearchStatus::Success
                };
                info!("Search #{} ({}) found {} results", ticket.id(), mode, results.len());
                state.results = results;
                state.error = None;
            }
            Err(e) if !e.is_user_visible() => {
                debug!("Search #{} recovered from {}; publishing no results", ticket.id(), e);
                state.status = SearchStatus::Empty;
                state.results = Vec::new();
                state.error = None;
            }
            Err(e) => {
                warn!("Search #{} ({}) failed: {}", ticket.id(), mode, e);
                state.status = SearchStatus::Error;
                state.results = Vec::new();
                state.error = Some(e.to_string());
            }
        }
        SearchOutcome::Completed(state.status)
    }

    /// Move to another page of the current results; the page is clamped.
    pub async fn set_page(&self, page: usize) -> Pagination {
        let mut state = self.state.write().await;
        let pagination = Pagination::new(state.results.len(), page);
        state.page = pagination.current_page();
        pagination
    }

    pub async fn pagination(&self) -> Pagination {
        let state = self.state.read().await;
        Pagination::new(state.results.len(), state.page)
    }

    pub async fn snapshot(&self) -> SearchSnapshot {
        let state = self.state.read().await;
        SearchSnapshot {
            status: state.status,
            mode: state.mode,
            results: state.results.clone(),
            pagination: Pagination::new(state.results.len(), state.page),
            error: state.error.clone(),
        }
    }

    pub async fn current_page_results(&self) -> Vec<SearchResult> {
        let state = self.state.read().await;
        Pagination::new(state.results.len(), state.page)
            .page_slice(&state.results)
            .to_vec()
    }

    pub async fn results(&self) -> Vec<SearchResult> {
        self.state.read().await.results.clone()
    }

    pub async fn status(&self) -> SearchStatus {
        self.state.read().await.status
    }

    /// Encode the full result set, not just the current page.
    pub async fn export_csv(&self, date: NaiveDate) -> Result<CsvPayload> {
        let state = self.state.read().await;
        export_results(&state.results, date)
    }

    /// Drop any in-flight search and reset to [`SearchStatus::Idle`].
    pub async fn teardown(&self) {
        self.tracker.invalidate();
        let mut state = self.state.write().await;
        *state = SearchState {
            page: 1,
            ..SearchState::default()
        };
        debug!("Search state torn down");
    }
}

impl<E: MatchingEngine> std::fmt::Debug for SearchOrchestrator<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SearchOrchestrator")
            .field("latest_request", &self.tracker.latest_id())
            .field("engine_ready", &self.engine.try_get().is_some())
            .finish()
    }
}

/// Index `candidates` and, when a pattern is given, keep only the entries
/// containing it. The index is released before returning.
pub fn match_candidates<E: MatchingEngine>(
    engine: &E,
    candidates: Vec<Candidate>,
    pattern: Option<&str>,
) -> Vec<SearchResult> {
    let (index, entries) = build_index(engine, candidates);
    let Some(index) = index else {
        return Vec::new();
    };

    let entries = match pattern {
        Some(pattern) => filter_by_substructure(engine, &index, entries, pattern),
        None => entries,
    };
    index.release();

    entries.into_iter().map(SearchResult::from).collect()
}
