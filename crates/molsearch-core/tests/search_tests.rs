//! Integration tests for the SearchOrchestrator public interface.
//!
//! These tests drive whole searches against an in-memory gateway and an
//! engine wrapper that counts every index and pattern it hands out.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;
use tokio::sync::Notify;

use molsearch::engine::{GraphIndex, GraphPattern};
use molsearch::models::{CompoundDetail, CompoundSummary, VariantDetail};
use molsearch::{
    engine_channel, CompoundGateway, CompoundHit, EngineIndex, EnginePattern, EngineReadiness,
    GraphEngine, IdentifierQuery, MatchingEngine, MolSearchError, Result, SearchMode,
    SearchOrchestrator, SearchOutcome, SearchRequest, SearchStatus,
};

// ---------------------------------------------------------------------------
// Test gateway
// ---------------------------------------------------------------------------

#[derive(Default)]
struct FakeGateway {
    substructure: HashMap<String, Vec<CompoundHit>>,
    identifier: Vec<CompoundHit>,
    offline: bool,
    /// Pattern whose response is held until `release` is notified.
    held_pattern: Option<String>,
    entered: Notify,
    release: Notify,
    calls: AtomicUsize,
}

impl FakeGateway {
    fn with_substructure(mut self, pattern: &str, hits: Vec<CompoundHit>) -> Self {
        self.substructure.insert(pattern.to_string(), hits);
        self
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CompoundGateway for FakeGateway {
    async fn list_compounds(&self) -> Result<Vec<CompoundSummary>> {
        Ok(Vec::new())
    }

    async fn search_substructure(&self, pattern: &str) -> Result<Vec<CompoundHit>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.offline {
            return Err(MolSearchError::Network {
                message: "No response received from registry".into(),
                status: None,
            });
        }
        if self.held_pattern.as_deref() == Some(pattern) {
            self.entered.notify_one();
            self.release.notified().await;
        }
        Ok(self.substructure.get(pattern).cloned().unwrap_or_default())
    }

    async fn search_identifiers(&self, _query: &IdentifierQuery) -> Result<Vec<CompoundHit>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.identifier.clone())
    }

    async fn compound_detail(&self, reg_number: &str) -> Result<CompoundDetail> {
        Err(MolSearchError::Network {
            message: format!("Compound {} not found", reg_number),
            status: Some(404),
        })
    }

    async fn variant_detail(&self, var_number: &str) -> Result<VariantDetail> {
        Err(MolSearchError::Network {
            message: format!("Variant {} not found", var_number),
            status: Some(404),
        })
    }
}

fn hit(reg_number: &str, smiles: &str) -> CompoundHit {
    CompoundHit {
        reg_number: reg_number.into(),
        variant: None,
        smiles: smiles.into(),
    }
}

// ---------------------------------------------------------------------------
// Resource-counting engine
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
struct Counters {
    indices_created: AtomicUsize,
    indices_released: AtomicUsize,
    patterns_created: AtomicUsize,
    patterns_released: AtomicUsize,
}

impl Counters {
    fn assert_balanced(&self) {
        assert_eq!(
            self.indices_created.load(Ordering::SeqCst),
            self.indices_released.load(Ordering::SeqCst),
            "every index must be released"
        );
        assert_eq!(
            self.patterns_created.load(Ordering::SeqCst),
            self.patterns_released.load(Ordering::SeqCst),
            "every pattern must be released"
        );
    }
}

struct CountingEngine {
    inner: GraphEngine,
    counters: Arc<Counters>,
}

struct CountingIndex {
    inner: GraphIndex,
    counters: Arc<Counters>,
}

struct CountingPattern {
    inner: GraphPattern,
    counters: Arc<Counters>,
}

impl MatchingEngine for CountingEngine {
    type Pattern = CountingPattern;
    type Index = CountingIndex;

    fn create_index(&self) -> Result<CountingIndex> {
        let inner = self.inner.create_index()?;
        self.counters.indices_created.fetch_add(1, Ordering::SeqCst);
        Ok(CountingIndex {
            inner,
            counters: self.counters.clone(),
        })
    }

    fn compile_pattern(&self, pattern: &str) -> Result<CountingPattern> {
        let inner = self.inner.compile_pattern(pattern)?;
        self.counters.patterns_created.fetch_add(1, Ordering::SeqCst);
        Ok(CountingPattern {
            inner,
            counters: self.counters.clone(),
        })
    }
}

impl EngineIndex for CountingIndex {
    type Pattern = CountingPattern;

    fn add(&mut self, structure: &str) -> Result<usize> {
        self.inner.add(structure)
    }

    fn matches(&self, pattern: &CountingPattern) -> Result<Vec<usize>> {
        self.inner.matches(&pattern.inner)
    }

    fn len(&self) -> usize {
        self.inner.len()
    }

    fn release(&mut self) {
        self.inner.release();
        self.counters.indices_released.fetch_add(1, Ordering::SeqCst);
    }
}

impl EnginePattern for CountingPattern {
    fn release(&mut self) {
        self.inner.release();
        self.counters.patterns_released.fetch_add(1, Ordering::SeqCst);
    }
}

fn orchestrator(gateway: FakeGateway) -> (SearchOrchestrator<GraphEngine>, Arc<FakeGateway>) {
    let gateway = Arc::new(gateway);
    let search = SearchOrchestrator::new(EngineReadiness::ready(GraphEngine::new()), gateway.clone());
    (search, gateway)
}

const PASTED: &str = "c1ccccc1O\tR-1\nCCO;R-2\n\n  Clc1ccccc1 R-3\nnot-a-molecule\tR-4\n";

// ---------------------------------------------------------------------------
// Modes
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_database_hits_are_refiltered_locally() {
    let gateway = FakeGateway::default().with_substructure(
        "c1ccccc1",
        vec![
            hit("R-1", "c1ccccc1O"),
            hit("R-2", "CCO"),
            hit("R-3", "Clc1ccccc1"),
        ],
    );
    let (search, _) = orchestrator(gateway);

    let outcome = search.search(SearchRequest::database("c1ccccc1")).await;
    assert_eq!(outcome, SearchOutcome::Completed(SearchStatus::Success));

    let regs: Vec<String> = search.results().await.into_iter().map(|r| r.reg_number).collect();
    assert_eq!(regs, vec!["R-1", "R-3"]);
}

#[tokio::test]
async fn test_custom_list_search() {
    let (search, gateway) = orchestrator(FakeGateway::default());

    search.search(SearchRequest::custom("c1ccccc1", PASTED)).await;

    let results = search.results().await;
    let regs: Vec<&str> = results.iter().map(|r| r.reg_number.as_str()).collect();
    assert_eq!(regs, vec!["R-1", "R-3"]);
    assert_eq!(results[1].sequence_index, 2);
    assert_eq!(gateway.calls(), 0, "custom mode never touches the registry");
}

#[tokio::test]
async fn test_identifier_results_are_not_filtered() {
    let gateway = FakeGateway {
        identifier: vec![hit("R-7", "CCO"), hit("R-8", "c1ccccc1"), hit("R-9", "((")],
        ..FakeGateway::default()
    };
    let (search, _) = orchestrator(gateway);

    let outcome = search
        .search(SearchRequest::Identifier(IdentifierQuery::reg_number("R-")))
        .await;
    assert_eq!(outcome, SearchOutcome::Completed(SearchStatus::Success));

    let regs: Vec<String> = search.results().await.into_iter().map(|r| r.reg_number).collect();
    assert_eq!(regs, vec!["R-7", "R-8"]);
}

#[tokio::test]
async fn test_invalid_pattern_keeps_every_candidate() {
    let (search, _) = orchestrator(FakeGateway::default());

    search.search(SearchRequest::custom("C1((", PASTED)).await;
    assert_eq!(search.results().await.len(), 3);
}

#[tokio::test]
async fn test_blank_requests_short_circuit() {
    let (search, gateway) = orchestrator(FakeGateway::default());

    for request in [
        SearchRequest::database("   "),
        SearchRequest::custom("c1ccccc1", " \n "),
        SearchRequest::Identifier(IdentifierQuery::default()),
    ] {
        let outcome = search.search(request).await;
        assert_eq!(outcome, SearchOutcome::Completed(SearchStatus::Empty));
    }
    assert_eq!(gateway.calls(), 0);
    assert!(search.snapshot().await.has_searched());
}

// ---------------------------------------------------------------------------
// Failure states
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_network_failure_publishes_error() {
    let gateway = FakeGateway {
        offline: true,
        ..FakeGateway::default()
    };
    let (search, _) = orchestrator(gateway);

    let outcome = search.search(SearchRequest::database("CC")).await;
    assert_eq!(outcome, SearchOutcome::Completed(SearchStatus::Error));

    let snapshot = search.snapshot().await;
    assert!(snapshot.results.is_empty());
    assert!(snapshot
        .error
        .as_deref()
        .is_some_and(|message| message.contains("No response received")));

    // A later successful search clears the error.
    search.search(SearchRequest::custom("C", "CC")).await;
    let snapshot = search.snapshot().await;
    assert_eq!(snapshot.status, SearchStatus::Success);
    assert_eq!(snapshot.error, None);
}

#[tokio::test(start_paused = true)]
async fn test_engine_timeout_is_terminal() {
    let (loader, readiness) = engine_channel::<GraphEngine>();
    let readiness = readiness.with_timeout(Duration::from_secs(10));
    let search = SearchOrchestrator::new(readiness.clone(), Arc::new(FakeGateway::default()));

    let outcome = search.search(SearchRequest::custom("C", "CC")).await;
    assert_eq!(outcome, SearchOutcome::Completed(SearchStatus::Error));
    assert!(readiness.is_failed());

    // Publishing late does not revive search.
    loader.publish(GraphEngine::new());
    search.search(SearchRequest::custom("C", "CC")).await;
    let snapshot = search.snapshot().await;
    assert_eq!(snapshot.status, SearchStatus::Error);
    assert!(snapshot.error.unwrap().contains("unavailable"));
}

// ---------------------------------------------------------------------------
// Overlapping searches
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_superseded_search_never_overwrites_newer_results() {
    let gateway = FakeGateway {
        held_pattern: Some("CC".into()),
        ..FakeGateway::default()
    }
    .with_substructure("CC", vec![hit("OLD-1", "CCC")])
    .with_substructure("CO", vec![hit("NEW-1", "CCO")]);
    let gateway = Arc::new(gateway);
    let search = Arc::new(SearchOrchestrator::new(
        EngineReadiness::ready(GraphEngine::new()),
        gateway.clone(),
    ));

    let slow = tokio::spawn({
        let search = search.clone();
        async move { search.search(SearchRequest::database("CC")).await }
    });
    gateway.entered.notified().await;

    let fast = search.search(SearchRequest::database("CO")).await;
    assert_eq!(fast, SearchOutcome::Completed(SearchStatus::Success));

    gateway.release.notify_one();
    assert_eq!(slow.await.unwrap(), SearchOutcome::Superseded);

    let regs: Vec<String> = search.results().await.into_iter().map(|r| r.reg_number).collect();
    assert_eq!(regs, vec!["NEW-1"]);
}

#[tokio::test]
async fn test_mode_follows_published_results_while_searching() {
    let gateway = Arc::new(
        FakeGateway {
            held_pattern: Some("CC".into()),
            ..FakeGateway::default()
        }
        .with_substructure("CC", vec![hit("R-9", "CCC")]),
    );
    let search = Arc::new(SearchOrchestrator::new(
        EngineReadiness::ready(GraphEngine::new()),
        gateway.clone(),
    ));
    search.search(SearchRequest::custom("c1ccccc1", PASTED)).await;

    let pending = tokio::spawn({
        let search = search.clone();
        async move { search.search(SearchRequest::database("CC")).await }
    });
    gateway.entered.notified().await;

    let during = search.snapshot().await;
    assert_eq!(during.status, SearchStatus::Searching);
    assert_eq!(during.mode, Some(SearchMode::Custom));
    assert_eq!(during.results.len(), 2);

    gateway.release.notify_one();
    pending.await.unwrap();
    let after = search.snapshot().await;
    assert_eq!(after.mode, Some(SearchMode::Database));
    assert_eq!(after.results[0].reg_number, "R-9");
}

#[tokio::test]
async fn test_teardown_discards_in_flight_search() {
    let gateway = Arc::new(
        FakeGateway {
            held_pattern: Some("CC".into()),
            ..FakeGateway::default()
        }
        .with_substructure("CC", vec![hit("R-1", "CCC")]),
    );
    let search = Arc::new(SearchOrchestrator::new(
        EngineReadiness::ready(GraphEngine::new()),
        gateway.clone(),
    ));

    let pending = tokio::spawn({
        let search = search.clone();
        async move { search.search(SearchRequest::database("CC")).await }
    });
    gateway.entered.notified().await;

    search.teardown().await;
    gateway.release.notify_one();

    assert!(pending.await.unwrap().is_superseded());
    let snapshot = search.snapshot().await;
    assert_eq!(snapshot.status, SearchStatus::Idle);
    assert!(snapshot.results.is_empty());
}

// ---------------------------------------------------------------------------
// Resources
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_every_engine_resource_is_released() {
    let counters = Arc::new(Counters::default());
    let engine = CountingEngine {
        inner: GraphEngine::new(),
        counters: counters.clone(),
    };
    let gateway = FakeGateway {
        identifier: vec![hit("R-7", "CCO")],
        ..FakeGateway::default()
    }
    .with_substructure("CO", vec![hit("R-1", "CCO"), hit("R-2", "CCC")]);
    let search = SearchOrchestrator::new(EngineReadiness::ready(engine), Arc::new(gateway));

    search.search(SearchRequest::database("CO")).await;
    search.search(SearchRequest::custom("c1ccccc1", PASTED)).await;
    search.search(SearchRequest::custom("C1((", PASTED)).await;
    search.search(SearchRequest::custom("C", "no\tstructures\there")).await;
    search
        .search(SearchRequest::Identifier(IdentifierQuery::reg_number("R-7")))
        .await;

    assert!(counters.indices_created.load(Ordering::SeqCst) >= 4);
    assert_eq!(counters.patterns_created.load(Ordering::SeqCst), 3);
    counters.assert_balanced();
}

// ---------------------------------------------------------------------------
// Paging and export
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_paging_through_results() {
    let (search, _) = orchestrator(FakeGateway::default());
    let text: String = (1..=20).map(|i| format!("CC{}\tR-{}\n", "C".repeat(i % 3), i)).collect();

    search.search(SearchRequest::custom("CC", &text)).await;
    assert_eq!(search.results().await.len(), 20);

    let first = search.current_page_results().await;
    assert_eq!(first.len(), 9);
    assert_eq!(first[0].reg_number, "R-1");

    let pagination = search.set_page(3).await;
    assert_eq!(pagination.total_pages(), 3);
    let last = search.current_page_results().await;
    let regs: Vec<&str> = last.iter().map(|r| r.reg_number.as_str()).collect();
    assert_eq!(regs, vec!["R-19", "R-20"]);

    assert_eq!(search.set_page(42).await.current_page(), 3);

    // A new search starts again from the first page.
    search.search(SearchRequest::custom("CC", &text)).await;
    assert_eq!(search.pagination().await.current_page(), 1);
}

#[tokio::test]
async fn test_export_full_result_set() {
    let (search, _) = orchestrator(FakeGateway::default());
    search
        .search(SearchRequest::custom("c1ccccc1", "c1ccccc1O\tR1\nCCO\tR2"))
        .await;

    let date = NaiveDate::from_ymd_opt(2024, 1, 31).unwrap();
    let payload = search.export_csv(date).await.unwrap();
    assert_eq!(payload.file_name, "2024-01-31");

    let text = String::from_utf8(payload.bytes).unwrap();
    assert_eq!(text, "\u{feff}regNumber,variant,smiles\nR1,,c1ccccc1O");
}
