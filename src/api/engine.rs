//! The matching engine facade.
//!
//! One `MatchingEngine` wraps a validated configuration and orchestrates a
//! run: load the project through the store boundary, build stem forests and
//! indexes, run the configured strategy, persist the edges, and derive
//! trace time series on demand. All intermediate state (forests, indexes,
//! matrices) lives in a per-run working set that is dropped when the call
//! returns; two engines in one process never share mutable state.

use std::time::Instant;

use ahash::AHashMap;
use tracing::{debug, info};

use crate::analyzers::matcher::{self, StrategyKind};
use crate::analyzers::stem_index::StemIndex;
use crate::analyzers::timeseries;
use crate::core::config::EngineConfig;
use crate::core::errors::Result;
use crate::core::model::{
    ConceptId, MatchSet, MethodId, ProjectId, ScenarioId, SegmentedTimeSeries, TimeSeries,
};
use crate::core::stems::{ConceptStemKind, MethodStemKind};
use crate::io::store::ProjectStore;
use crate::stemming::forest::{concept_forest, method_forest};
use crate::stemming::TermExtractor;

/// Facade over the full matching pipeline
pub struct MatchingEngine {
    config: EngineConfig,
    strategy: StrategyKind,
    extractor: TermExtractor,
}

/// Working set of one matching run. Built from the store at the start of a
/// run, dropped at its end; nothing in here outlives the call or is shared
/// between runs, so a re-run always rebuilds its vocabulary and matrices.
struct RunCache {
    concept_ids: Vec<ConceptId>,
    method_ids: Vec<MethodId>,
    concept_index: StemIndex<ConceptStemKind>,
    method_index: StemIndex<MethodStemKind>,
}

impl RunCache {
    fn load<S: ProjectStore>(
        store: &S,
        project: ProjectId,
        extractor: &TermExtractor,
    ) -> Result<Self> {
        let started = Instant::now();

        let concepts = store.concepts(project)?;
        let methods = store.methods(project)?;
        debug!(
            %project,
            concepts = concepts.len(),
            methods = methods.len(),
            elapsed = ?started.elapsed(),
            "project loaded"
        );

        let started = Instant::now();
        let concept_index = StemIndex::build(&concept_forest(&concepts, extractor)?);
        let method_index = StemIndex::build(&method_forest(&methods, extractor)?);
        debug!(
            %project,
            concept_terms = concept_index.term_count(),
            method_terms = method_index.term_count(),
            elapsed = ?started.elapsed(),
            "stem indexes built"
        );

        Ok(Self {
            concept_ids: concepts.iter().map(|concept| concept.id).collect(),
            method_ids: methods.iter().map(|method| method.id).collect(),
            concept_index,
            method_index,
        })
    }
}

impl MatchingEngine {
    /// Create an engine, validating the configuration up front
    pub fn new(config: EngineConfig) -> Result<Self> {
        config.validate()?;
        let strategy = config.matching.strategy_kind()?;
        let extractor = TermExtractor::new(&config.matching.rejected_words);

        info!(strategy = %strategy, "matching engine initialized");
        Ok(Self {
            config,
            strategy,
            extractor,
        })
    }

    /// The engine's configuration
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Run the configured strategy over one project and persist the edges.
    ///
    /// The previous match set of the project is deleted before the new one
    /// is saved, so the store always holds exactly one run's output.
    pub fn compute_matches<S: ProjectStore>(
        &self,
        store: &mut S,
        project: ProjectId,
    ) -> Result<MatchSet> {
        let started = Instant::now();
        let run = RunCache::load(store, project, &self.extractor)?;

        let matches = matcher::compute_matches(
            self.strategy,
            project,
            &run.concept_index,
            &run.method_index,
            &run.concept_ids,
            &run.method_ids,
            self.config.matching.threshold,
        )?;

        store.delete_matches(project)?;
        let edges: Vec<_> = matches.edges().cloned().collect();
        store.save_matches(project, &edges)?;

        info!(
            %project,
            strategy = %self.strategy,
            edges = matches.len(),
            elapsed = ?started.elapsed(),
            "match run complete"
        );
        Ok(matches)
    }

    /// Build the time series of one scenario's trace from the project's
    /// persisted match edges
    pub fn build_time_series<S: ProjectStore>(
        &self,
        store: &S,
        project: ProjectId,
        scenario: ScenarioId,
    ) -> Result<TimeSeries> {
        let started = Instant::now();

        let trace = store.trace(scenario)?;
        let matches = MatchSet::from_edges(store.matches(project)?);
        let concept_names: AHashMap<ConceptId, String> = store
            .concepts(project)?
            .into_iter()
            .map(|concept| (concept.id, concept.name))
            .collect();

        let series = timeseries::build_time_series(&trace, &matches, &concept_names);
        info!(
            %project,
            %scenario,
            concepts = series.concept_count(),
            steps = series.step_count(),
            elapsed = ?started.elapsed(),
            "time series built"
        );
        Ok(series)
    }

    /// Segment a time series with the configured segment count and
    /// threshold. A nonempty `concept_subset` keeps only the listed rows.
    pub fn segment(
        &self,
        series: &TimeSeries,
        concept_subset: &[ConceptId],
    ) -> Result<SegmentedTimeSeries> {
        timeseries::segment(
            series,
            self.config.segmentation.segment_count,
            self.config.segmentation.threshold,
            concept_subset,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::model::{Concept, Method, TraceStep};
    use crate::io::store::MemoryStore;

    fn engine() -> MatchingEngine {
        MatchingEngine::new(EngineConfig::default()).unwrap()
    }

    fn store_fixture() -> MemoryStore {
        let project = ProjectId(1);
        let mut store = MemoryStore::new();
        store.add_concept(Concept::new(ConceptId(10), project, "Bank Account"));
        store.add_concept(Concept::new(ConceptId(11), project, "Customer"));
        store.add_concept(Concept::new(ConceptId(12), project, "Transfer Order"));
        store.add_method(Method::new(MethodId(1), project, "openAccount"));
        store.add_method(Method::new(MethodId(2), project, "notifyCustomer"));
        store.add_trace_step(TraceStep::entering(ScenarioId(5), MethodId(1), 0));
        store.add_trace_step(TraceStep::entering(ScenarioId(5), MethodId(2), 1));
        store.add_trace_step(TraceStep::entering(ScenarioId(5), MethodId(1), 2));
        store
    }

    #[test]
    fn test_invalid_config_rejected_at_construction() {
        let mut config = EngineConfig::default();
        config.matching.strategy = "nope".to_string();
        assert!(MatchingEngine::new(config).is_err());
    }

    #[test]
    fn test_compute_matches_persists_edges() {
        let mut store = store_fixture();
        let engine = engine();

        let matches = engine.compute_matches(&mut store, ProjectId(1)).unwrap();
        assert!(!matches.is_empty());

        let persisted = store.matches(ProjectId(1)).unwrap();
        assert_eq!(persisted.len(), matches.len());
    }

    #[test]
    fn test_rerun_replaces_previous_edges() {
        let mut store = store_fixture();
        let engine = engine();

        let first = engine.compute_matches(&mut store, ProjectId(1)).unwrap();
        let second = engine.compute_matches(&mut store, ProjectId(1)).unwrap();

        // deterministic and not doubled in the store
        assert_eq!(first.len(), second.len());
        assert_eq!(store.matches(ProjectId(1)).unwrap().len(), second.len());
    }

    #[test]
    fn test_time_series_from_persisted_matches() {
        let mut store = store_fixture();
        let engine = engine();
        engine.compute_matches(&mut store, ProjectId(1)).unwrap();

        let series = engine
            .build_time_series(&store, ProjectId(1), ScenarioId(5))
            .unwrap();
        assert_eq!(series.step_count(), 3);
        assert!(series.concept_count() >= 1);

        // "Bank Account" matched to openAccount at steps 0 and 2
        let row = series.row_of(ConceptId(10)).unwrap();
        assert!(series.matrix[[row, 0]] > 0.0);
        assert_eq!(series.matrix[[row, 1]], 0.0);
        assert!(series.matrix[[row, 2]] > 0.0);
    }

    #[test]
    fn test_unknown_scenario_yields_empty_series() {
        let mut store = store_fixture();
        let engine = engine();
        engine.compute_matches(&mut store, ProjectId(1)).unwrap();

        let series = engine
            .build_time_series(&store, ProjectId(1), ScenarioId(99))
            .unwrap();
        assert_eq!(series.step_count(), 0);
        assert_eq!(series.concept_count(), 0);
    }
}
