//! Method/concept matching strategies.
//!
//! Both sides of a project are projected into one vector space (the sorted
//! intersection of their term sets), weighted with tf-idf computed on the
//! concept corpus, and scored pairwise. Every pair whose score clears the
//! threshold becomes a match edge; nothing is deduplicated or truncated.
//!
//! Strategies are a closed registry: an enum variant per algorithm, chosen
//! by name from the configuration.

use std::fmt;

use ndarray::ArrayView1;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::analyzers::stem_index::{concept_tf_matrix, method_tf_matrix, StemIndex};
use crate::core::errors::{OntomatchError, Result};
use crate::core::matrix::{cosine, hadamard, idf_vector, TermDocumentMatrix};
use crate::core::model::{ConceptId, MatchEdge, MatchSet, MethodId, ProjectId};
use crate::core::stems::{ConceptStemKind, MethodStemKind};
use crate::core::vocabulary::Vocabulary;

/// Named matching strategies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StrategyKind {
    /// Cosine similarity between tf-idf vectors
    #[serde(rename = "tfidf-cosine")]
    TfIdfCosine,
    /// L1 mass of the concept tf-idf entries a method's terms touch,
    /// clamped to 1.0
    #[serde(rename = "term-overlap")]
    TermOverlap,
}

impl StrategyKind {
    /// Every registered strategy
    pub const ALL: [StrategyKind; 2] = [StrategyKind::TfIdfCosine, StrategyKind::TermOverlap];

    /// Configuration name of the strategy
    pub fn name(&self) -> &'static str {
        match self {
            StrategyKind::TfIdfCosine => "tfidf-cosine",
            StrategyKind::TermOverlap => "term-overlap",
        }
    }

    /// Resolve a configuration name
    pub fn parse(name: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|strategy| strategy.name() == name)
            .ok_or_else(|| {
                let known: Vec<_> = Self::ALL.iter().map(StrategyKind::name).collect();
                OntomatchError::config_field(
                    format!(
                        "unknown matching strategy '{name}', expected one of: {}",
                        known.join(", ")
                    ),
                    "matching.strategy",
                )
            })
    }
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Run one matching strategy over a project's stem indexes.
///
/// The vocabulary is the intersection of both term sets; terms outside it
/// influence nothing. Methods whose vector is zero are skipped, remaining
/// pairs are scored, and edges are kept iff `score > threshold`. Scoring is
/// parallel across methods but the edge order is canonical (method column
/// order, then concept column order), so reruns produce identical sets.
#[allow(clippy::too_many_arguments)]
pub fn compute_matches(
    strategy: StrategyKind,
    project: ProjectId,
    concept_index: &StemIndex<ConceptStemKind>,
    method_index: &StemIndex<MethodStemKind>,
    concepts: &[ConceptId],
    methods: &[MethodId],
    threshold: f64,
) -> Result<MatchSet> {
    if !(0.0..=1.0).contains(&threshold) {
        return Err(OntomatchError::validation_mismatch(
            "matching threshold out of range",
            "threshold",
            "0.0..=1.0",
            threshold.to_string(),
        ));
    }

    let vocabulary = Vocabulary::intersect(concept_index.terms(), method_index.terms());
    if vocabulary.is_empty() {
        info!(%project, "concept and method term sets are disjoint, no matches");
        return Ok(MatchSet::new());
    }
    debug!(%project, terms = vocabulary.len(), "matching vocabulary built");

    let concept_tf = concept_tf_matrix(concept_index, &vocabulary, concepts);
    let idf = idf_vector(&concept_index.document_frequencies(&vocabulary), concepts.len())?;
    let concept_weights = hadamard(&concept_tf, &idf)?;

    let method_tf = method_tf_matrix(method_index, &vocabulary, methods);

    let edges = match strategy {
        StrategyKind::TfIdfCosine => {
            let method_weights = hadamard(&method_tf, &idf)?;
            score_columns(project, strategy, &concept_weights, &method_weights, threshold, cosine)
        }
        StrategyKind::TermOverlap => score_columns(
            project,
            strategy,
            &concept_weights,
            &method_tf,
            threshold,
            overlap_mass,
        ),
    };

    let matches = MatchSet::from_edges(edges);
    info!(
        %project,
        strategy = %strategy,
        edges = matches.len(),
        "matching complete"
    );
    Ok(matches)
}

/// Score every (method, concept) column pair with one scoring function
fn score_columns<F>(
    project: ProjectId,
    strategy: StrategyKind,
    concept_weights: &TermDocumentMatrix<ConceptId>,
    method_vectors: &TermDocumentMatrix<MethodId>,
    threshold: f64,
    score: F,
) -> Vec<MatchEdge>
where
    F: Fn(ArrayView1<'_, f64>, ArrayView1<'_, f64>) -> f64 + Sync,
{
    let concept_norms: Vec<f64> = (0..concept_weights.document_count())
        .map(|column| concept_weights.column_norm(column))
        .collect();

    let per_method: Vec<Vec<MatchEdge>> = (0..method_vectors.document_count())
        .into_par_iter()
        .map(|method_column| {
            let method_id = method_vectors.documents()[method_column];
            let method_vector = method_vectors.column(method_column);

            if method_vectors.column_norm(method_column) == 0.0 {
                debug!(method = %method_id, "method vector is zero, skipped");
                return Vec::new();
            }

            let mut edges = Vec::new();
            for (concept_column, &concept_id) in concept_weights.documents().iter().enumerate() {
                if concept_norms[concept_column] == 0.0 {
                    continue;
                }

                let weight = score(method_vector, concept_weights.column(concept_column));
                if weight > threshold {
                    edges.push(MatchEdge {
                        project,
                        method: method_id,
                        concept: concept_id,
                        weight,
                        strategy,
                    });
                }
            }
            edges
        })
        .collect();

    per_method.into_iter().flatten().collect()
}

/// Overlap scoring: L1 mass of the concept weights the method's terms
/// touch, clamped to 1.0. The method vector is the binary indicator.
fn overlap_mass(method: ArrayView1<'_, f64>, concept: ArrayView1<'_, f64>) -> f64 {
    let mass: f64 = method
        .iter()
        .zip(concept.iter())
        .map(|(&m, &c)| (m * c).abs())
        .sum();
    mass.min(1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use crate::core::model::{Concept, Method};
    use crate::stemming::forest::{concept_forest, method_forest};
    use crate::stemming::TermExtractor;

    struct Fixture {
        concept_index: StemIndex<ConceptStemKind>,
        method_index: StemIndex<MethodStemKind>,
        concepts: Vec<ConceptId>,
        methods: Vec<MethodId>,
    }

    fn fixture(concepts: &[(u32, &str)], methods: &[(u32, &str)]) -> Fixture {
        let extractor = TermExtractor::default();
        let concept_records: Vec<Concept> = concepts
            .iter()
            .map(|&(id, name)| Concept::new(ConceptId(id), ProjectId(1), name))
            .collect();
        let method_records: Vec<Method> = methods
            .iter()
            .map(|&(id, name)| Method::new(MethodId(id), ProjectId(1), name))
            .collect();

        Fixture {
            concept_index: StemIndex::build(&concept_forest(&concept_records, &extractor).unwrap()),
            method_index: StemIndex::build(&method_forest(&method_records, &extractor).unwrap()),
            concepts: concept_records.iter().map(|c| c.id).collect(),
            methods: method_records.iter().map(|m| m.id).collect(),
        }
    }

    fn run(fixture: &Fixture, strategy: StrategyKind, threshold: f64) -> MatchSet {
        compute_matches(
            strategy,
            ProjectId(1),
            &fixture.concept_index,
            &fixture.method_index,
            &fixture.concepts,
            &fixture.methods,
            threshold,
        )
        .unwrap()
    }

    #[test]
    fn test_strategy_registry() {
        assert_eq!(StrategyKind::parse("tfidf-cosine").unwrap(), StrategyKind::TfIdfCosine);
        assert_eq!(StrategyKind::parse("term-overlap").unwrap(), StrategyKind::TermOverlap);

        let err = StrategyKind::parse("simhash").unwrap_err();
        assert!(err.to_string().contains("tfidf-cosine"));
    }

    #[test]
    fn test_shared_terms_produce_edges() {
        let fixture = fixture(
            &[(1, "BankAccount"), (2, "AccountOwner")],
            &[(10, "openAccount"), (11, "closeDoor")],
        );
        let matches = run(&fixture, StrategyKind::TfIdfCosine, 0.0);

        // "account" is shared with both concepts; "closeDoor" shares nothing
        let edges: Vec<_> = matches.edges().collect();
        assert_eq!(edges.len(), 2);
        assert!(edges.iter().all(|edge| edge.method == MethodId(10)));
        assert!(edges.iter().all(|edge| edge.weight > 0.0));
        assert!(matches.for_method(MethodId(11)).is_empty());
    }

    #[test]
    fn test_disjoint_vocabulary_yields_no_matches() {
        let fixture = fixture(&[(1, "BankAccount")], &[(10, "renderWidget")]);
        let matches = run(&fixture, StrategyKind::TfIdfCosine, 0.0);
        assert!(matches.is_empty());
    }

    #[test]
    fn test_cosine_weight_value() {
        // One concept, one method, one shared term: parallel one-dimensional
        // vectors, so the cosine is exactly 1.0 even though the idf is
        // negative (the term is in every concept).
        let fixture = fixture(&[(1, "Account")], &[(10, "openAccount")]);
        let matches = run(&fixture, StrategyKind::TfIdfCosine, 0.0);

        assert_eq!(matches.len(), 1);
        let weight = matches.weight_of(MethodId(10), ConceptId(1)).unwrap();
        assert_relative_eq!(weight, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_overlap_weight_value() {
        // vocabulary = {account}; df = 2 over 2 concepts, so
        // idf = log10(2/3). Each concept has one in-vocabulary occurrence,
        // tf = 1.0, and the overlap mass is |log10(2/3)| ≈ 0.1761.
        let fixture = fixture(
            &[(1, "BankAccount"), (2, "AccountOwner")],
            &[(10, "openAccount")],
        );
        let matches = run(&fixture, StrategyKind::TermOverlap, 0.0);

        assert_eq!(matches.len(), 2);
        let expected = (2.0_f64 / 3.0).log10().abs();
        let weight = matches.weight_of(MethodId(10), ConceptId(1)).unwrap();
        assert_relative_eq!(weight, expected, epsilon = 1e-12);
    }

    #[test]
    fn test_threshold_filters_edges() {
        let fixture = fixture(&[(1, "Account")], &[(10, "openAccount")]);

        let matches = run(&fixture, StrategyKind::TfIdfCosine, 0.99);
        assert_eq!(matches.len(), 1); // cosine 1.0 > 0.99

        let matches = run(&fixture, StrategyKind::TermOverlap, 0.99);
        assert!(matches.is_empty());
    }

    #[test]
    fn test_invalid_threshold_rejected() {
        let fixture = fixture(&[(1, "Account")], &[(10, "openAccount")]);
        let result = compute_matches(
            StrategyKind::TfIdfCosine,
            ProjectId(1),
            &fixture.concept_index,
            &fixture.method_index,
            &fixture.concepts,
            &fixture.methods,
            1.5,
        );
        assert!(matches!(result, Err(OntomatchError::Validation { .. })));
    }

    #[test]
    fn test_matching_is_deterministic() {
        let fixture = fixture(
            &[(1, "BankAccount"), (2, "AccountOwner"), (3, "OwnerName")],
            &[(10, "openAccount"), (11, "renameOwner"), (12, "getName")],
        );

        let first = run(&fixture, StrategyKind::TfIdfCosine, 0.0);
        let second = run(&fixture, StrategyKind::TfIdfCosine, 0.0);

        let a: Vec<_> = first.edges().cloned().collect();
        let b: Vec<_> = second.edges().cloned().collect();
        assert_eq!(a, b);
    }
}
