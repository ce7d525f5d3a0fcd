//! Core data model: element identities, ontology and source records, match
//! edges and trace steps.
//!
//! Identity is deliberately flat. Every element is addressed by a kind
//! discriminant plus an integer id, and equality/hashing key on that pair
//! alone. There is no entity hierarchy to walk.

use std::fmt;

use indexmap::IndexMap;
use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::analyzers::matcher::StrategyKind;

macro_rules! id_type {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(
            Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize,
            Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(pub u32);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<u32> for $name {
            fn from(raw: u32) -> Self {
                Self(raw)
            }
        }
    };
}

id_type!(
    /// Identifier of a project (one ontology + one source corpus)
    ProjectId
);
id_type!(
    /// Identifier of a recorded execution scenario
    ScenarioId
);
id_type!(
    /// Identifier of an ontology concept
    ConceptId
);
id_type!(
    /// Identifier of a source-code method
    MethodId
);

/// Which side of the matching an element belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ElementKind {
    /// Ontology concept
    Concept,
    /// Source-code method
    Method,
}

/// Kind-tagged element reference, usable where either side may appear
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ElementRef {
    /// Element kind discriminant
    pub kind: ElementKind,
    /// Raw integer id within the kind
    pub id: u32,
}

impl ElementRef {
    /// Reference a concept
    pub fn concept(id: ConceptId) -> Self {
        Self {
            kind: ElementKind::Concept,
            id: id.0,
        }
    }

    /// Reference a method
    pub fn method(id: MethodId) -> Self {
        Self {
            kind: ElementKind::Method,
            id: id.0,
        }
    }

    /// The concept id, if this references a concept
    pub fn as_concept(&self) -> Option<ConceptId> {
        match self.kind {
            ElementKind::Concept => Some(ConceptId(self.id)),
            ElementKind::Method => None,
        }
    }

    /// The method id, if this references a method
    pub fn as_method(&self) -> Option<MethodId> {
        match self.kind {
            ElementKind::Method => Some(MethodId(self.id)),
            ElementKind::Concept => None,
        }
    }
}

impl fmt::Display for ElementRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            ElementKind::Concept => write!(f, "concept:{}", self.id),
            ElementKind::Method => write!(f, "method:{}", self.id),
        }
    }
}

/// An ontology concept with its attributes and bound classes
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Concept {
    /// Concept identifier
    pub id: ConceptId,
    /// Owning project
    pub project: ProjectId,
    /// Display name
    pub name: String,
    /// Concept attributes
    pub attributes: Vec<ConceptAttribute>,
    /// Source classes bound to this concept
    pub classes: Vec<ConceptClass>,
}

impl Concept {
    /// Create a concept with no attributes or classes
    pub fn new(id: ConceptId, project: ProjectId, name: impl Into<String>) -> Self {
        Self {
            id,
            project,
            name: name.into(),
            attributes: Vec::new(),
            classes: Vec::new(),
        }
    }

    /// Add an attribute
    pub fn with_attribute(mut self, attribute: ConceptAttribute) -> Self {
        self.attributes.push(attribute);
        self
    }

    /// Add a bound class
    pub fn with_class(mut self, class: ConceptClass) -> Self {
        self.classes.push(class);
        self
    }
}

/// A named attribute of a concept
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConceptAttribute {
    /// Attribute name
    pub name: String,
    /// Code-level identifier the attribute maps to, when known
    pub identifier: Option<String>,
}

impl ConceptAttribute {
    /// Create an attribute without a code identifier
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            identifier: None,
        }
    }

    /// Attach the code identifier
    pub fn with_identifier(mut self, identifier: impl Into<String>) -> Self {
        self.identifier = Some(identifier.into());
        self
    }
}

/// A source class bound to a concept
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConceptClass {
    /// Class name
    pub name: String,
    /// Code-level identifier the class maps to, when known
    pub identifier: Option<String>,
}

impl ConceptClass {
    /// Create a class binding without a code identifier
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            identifier: None,
        }
    }

    /// Attach the code identifier
    pub fn with_identifier(mut self, identifier: impl Into<String>) -> Self {
        self.identifier = Some(identifier.into());
        self
    }
}

/// A source-code method with its parameters and outgoing references
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Method {
    /// Method identifier
    pub id: MethodId,
    /// Owning project
    pub project: ProjectId,
    /// Method name (without signature decoration)
    pub name: String,
    /// Declared parameters
    pub parameters: Vec<MethodParameter>,
    /// References to fields or globals the body touches
    pub references: Vec<MethodReference>,
}

impl Method {
    /// Create a method with no parameters or references
    pub fn new(id: MethodId, project: ProjectId, name: impl Into<String>) -> Self {
        Self {
            id,
            project,
            name: name.into(),
            parameters: Vec::new(),
            references: Vec::new(),
        }
    }

    /// Add a parameter
    pub fn with_parameter(mut self, parameter: MethodParameter) -> Self {
        self.parameters.push(parameter);
        self
    }

    /// Add a reference
    pub fn with_reference(mut self, reference: MethodReference) -> Self {
        self.references.push(reference);
        self
    }
}

/// A declared method parameter
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MethodParameter {
    /// Parameter name
    pub name: String,
    /// Declared type name
    pub type_name: String,
}

impl MethodParameter {
    /// Create a parameter
    pub fn new(name: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_name: type_name.into(),
        }
    }
}

/// A field or global referenced by a method body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MethodReference {
    /// Referenced name
    pub name: String,
    /// Declared type name of the referenced element
    pub type_name: String,
}

impl MethodReference {
    /// Create a reference
    pub fn new(name: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_name: type_name.into(),
        }
    }
}

/// One entry of a recorded execution trace, ordered by `sequence`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TraceStep {
    /// Scenario the trace belongs to
    pub scenario: ScenarioId,
    /// Method executed at this step
    pub method: MethodId,
    /// Position within the trace
    pub sequence: u32,
    /// True for the entering half of an invocation, false for the exit
    pub entering: bool,
}

impl TraceStep {
    /// Create an entering trace step
    pub fn entering(scenario: ScenarioId, method: MethodId, sequence: u32) -> Self {
        Self {
            scenario,
            method,
            sequence,
            entering: true,
        }
    }
}

/// A weighted link between a method and a concept
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchEdge {
    /// Owning project
    pub project: ProjectId,
    /// Matched method
    pub method: MethodId,
    /// Matched concept
    pub concept: ConceptId,
    /// Similarity score, always strictly positive
    pub weight: f64,
    /// Strategy that produced the edge
    pub strategy: StrategyKind,
}

/// Match edges grouped by method, in deterministic order
#[derive(Debug, Clone, Default)]
pub struct MatchSet {
    by_method: IndexMap<MethodId, Vec<MatchEdge>>,
    len: usize,
}

impl MatchSet {
    /// Create an empty set
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a set from edges already in canonical order
    pub fn from_edges(edges: impl IntoIterator<Item = MatchEdge>) -> Self {
        let mut set = Self::new();
        for edge in edges {
            set.insert(edge);
        }
        set
    }

    /// Append an edge, preserving insertion order within its method
    pub fn insert(&mut self, edge: MatchEdge) {
        self.by_method.entry(edge.method).or_default().push(edge);
        self.len += 1;
    }

    /// Edges matched to one method
    pub fn for_method(&self, method: MethodId) -> &[MatchEdge] {
        self.by_method
            .get(&method)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Weight of the edge between a method and a concept; when several edges
    /// exist for the pair, the last inserted one wins
    pub fn weight_of(&self, method: MethodId, concept: ConceptId) -> Option<f64> {
        self.for_method(method)
            .iter()
            .rev()
            .find(|edge| edge.concept == concept)
            .map(|edge| edge.weight)
    }

    /// Methods with at least one edge, in insertion order
    pub fn methods(&self) -> impl Iterator<Item = MethodId> + '_ {
        self.by_method.keys().copied()
    }

    /// All edges, grouped by method in insertion order
    pub fn edges(&self) -> impl Iterator<Item = &MatchEdge> {
        self.by_method.values().flat_map(|edges| edges.iter())
    }

    /// Total number of edges
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the set contains no edges
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

/// Concept activity projected over one recorded execution trace.
///
/// Rows are the distinct matched concepts of the trace, sorted by display
/// name; columns are the trace steps in sequence order. A cell holds the
/// match weight of the concept for the method executed at that step, or
/// 0.0 when the pair is unmatched. Derived per request, never persisted.
#[derive(Debug, Clone)]
pub struct TimeSeries {
    /// Scenario the trace was recorded under
    pub scenario: ScenarioId,
    /// Concept per row, in row order
    pub concepts: Vec<ConceptId>,
    /// Display name per row, parallel to `concepts`
    pub names: Vec<String>,
    /// Weight matrix, `concepts.len()` × trace length
    pub matrix: Array2<f64>,
}

impl TimeSeries {
    /// Number of concept rows
    pub fn concept_count(&self) -> usize {
        self.concepts.len()
    }

    /// Number of trace-step columns
    pub fn step_count(&self) -> usize {
        self.matrix.ncols()
    }

    /// Row index of a concept, if it appears in the series
    pub fn row_of(&self, concept: ConceptId) -> Option<usize> {
        self.concepts.iter().position(|&c| c == concept)
    }
}

/// A time series whose trace axis has been collapsed into fixed-size
/// segments. Each cell counts the steps of its segment whose source weight
/// exceeded the segmentation threshold.
#[derive(Debug, Clone)]
pub struct SegmentedTimeSeries {
    /// Concept per row, in row order (possibly a filtered subset)
    pub concepts: Vec<ConceptId>,
    /// Display name per row, parallel to `concepts`
    pub names: Vec<String>,
    /// Count matrix, `concepts.len()` × `segment_count`
    pub matrix: Array2<f64>,
    /// Number of segment columns
    pub segment_count: usize,
}
