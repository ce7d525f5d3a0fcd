//! The project store boundary.
//!
//! Everything the engine loads or saves crosses this trait: concepts and
//! methods per project, traces per scenario, and the match edges a run
//! produces. The calls are synchronous; a host wanting async storage wraps
//! them, the algorithmic core never blocks on anything else. Match
//! persistence is delete-then-insert per project, so re-running a matcher
//! fully replaces the previous edge set.

use ahash::AHashMap;
use tracing::debug;

use crate::core::errors::Result;
use crate::core::model::{Concept, MatchEdge, Method, ProjectId, ScenarioId, TraceStep};

/// Synchronous data-access boundary for one store of projects
pub trait ProjectStore {
    /// Concepts of a project, with the names their stems derive from
    fn concepts(&self, project: ProjectId) -> Result<Vec<Concept>>;

    /// Methods of a project, with parameters and references
    fn methods(&self, project: ProjectId) -> Result<Vec<Method>>;

    /// Trace steps of a scenario, in sequence order
    fn trace(&self, scenario: ScenarioId) -> Result<Vec<TraceStep>>;

    /// Match edges previously saved for a project
    fn matches(&self, project: ProjectId) -> Result<Vec<MatchEdge>>;

    /// Delete every match edge of a project
    fn delete_matches(&mut self, project: ProjectId) -> Result<()>;

    /// Save a project's match edges (callers delete first)
    fn save_matches(&mut self, project: ProjectId, edges: &[MatchEdge]) -> Result<()>;
}

/// In-memory store, used by tests and embedders without a backing database
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    concepts: AHashMap<ProjectId, Vec<Concept>>,
    methods: AHashMap<ProjectId, Vec<Method>>,
    traces: AHashMap<ScenarioId, Vec<TraceStep>>,
    matches: AHashMap<ProjectId, Vec<MatchEdge>>,
}

impl MemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a concept to its project
    pub fn add_concept(&mut self, concept: Concept) {
        self.concepts.entry(concept.project).or_default().push(concept);
    }

    /// Add a method to its project
    pub fn add_method(&mut self, method: Method) {
        self.methods.entry(method.project).or_default().push(method);
    }

    /// Append a trace step to its scenario, keeping sequence order
    pub fn add_trace_step(&mut self, step: TraceStep) {
        let steps = self.traces.entry(step.scenario).or_default();
        steps.push(step);
        steps.sort_by_key(|step| step.sequence);
    }
}

impl ProjectStore for MemoryStore {
    fn concepts(&self, project: ProjectId) -> Result<Vec<Concept>> {
        Ok(self.concepts.get(&project).cloned().unwrap_or_default())
    }

    fn methods(&self, project: ProjectId) -> Result<Vec<Method>> {
        Ok(self.methods.get(&project).cloned().unwrap_or_default())
    }

    fn trace(&self, scenario: ScenarioId) -> Result<Vec<TraceStep>> {
        Ok(self.traces.get(&scenario).cloned().unwrap_or_default())
    }

    fn matches(&self, project: ProjectId) -> Result<Vec<MatchEdge>> {
        Ok(self.matches.get(&project).cloned().unwrap_or_default())
    }

    fn delete_matches(&mut self, project: ProjectId) -> Result<()> {
        if let Some(edges) = self.matches.remove(&project) {
            debug!(%project, deleted = edges.len(), "previous match set deleted");
        }
        Ok(())
    }

    fn save_matches(&mut self, project: ProjectId, edges: &[MatchEdge]) -> Result<()> {
        self.matches
            .entry(project)
            .or_default()
            .extend_from_slice(edges);
        Ok(())
    }
}
