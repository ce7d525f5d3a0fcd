//! Inverted term indexes over stem forests, and the term-document matrices
//! derived from them.
//!
//! The index maps every term to the ordered list of stem nodes carrying it.
//! Terms iterate in lexicographic order, which is what pins down the
//! vocabulary order and, through it, every matrix in the pipeline.

use std::collections::BTreeMap;

use ahash::{AHashMap, AHashSet};
use tracing::warn;

use crate::core::matrix::TermDocumentMatrix;
use crate::core::model::{ConceptId, ElementRef, MethodId};
use crate::core::stems::{ConceptStemKind, MethodStemKind, StemForest};
use crate::core::vocabulary::Vocabulary;

/// One stem node carrying a term
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StemOccurrence<K> {
    /// Element the node belongs to
    pub owner: ElementRef,
    /// Arena index of the node within its forest
    pub node: usize,
    /// Slot the node occupies
    pub kind: K,
}

/// Term → occurrences inverted index over one stem forest
#[derive(Debug, Clone)]
pub struct StemIndex<K> {
    terms: BTreeMap<String, Vec<StemOccurrence<K>>>,
}

impl<K: Copy + Ord> StemIndex<K> {
    /// Index every node of a forest, walking owners in insertion order and
    /// each owner's tree in flatten order
    pub fn build(forest: &StemForest<K>) -> Self {
        let mut terms: BTreeMap<String, Vec<StemOccurrence<K>>> = BTreeMap::new();

        for owner in forest.owners() {
            for index in forest.flatten(owner) {
                let node = forest.node(index);
                terms.entry(node.term.clone()).or_default().push(StemOccurrence {
                    owner,
                    node: index,
                    kind: node.kind,
                });
            }
        }

        Self { terms }
    }

    /// Indexed terms in lexicographic order
    pub fn terms(&self) -> impl Iterator<Item = &str> {
        self.terms.keys().map(String::as_str)
    }

    /// Occurrences of one term, in indexing order
    pub fn occurrences(&self, term: &str) -> &[StemOccurrence<K>] {
        self.terms.get(term).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Number of distinct terms
    pub fn term_count(&self) -> usize {
        self.terms.len()
    }

    /// Whether the index holds no terms
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Per-vocabulary-term count of distinct owners containing the term
    pub fn document_frequencies(&self, vocabulary: &Vocabulary) -> Vec<usize> {
        vocabulary
            .terms()
            .iter()
            .map(|term| {
                let owners: AHashSet<ElementRef> = self
                    .occurrences(term)
                    .iter()
                    .map(|occurrence| occurrence.owner)
                    .collect();
                owners.len()
            })
            .collect()
    }
}

/// Concept-side term frequencies: occurrence counts per concept, normalized
/// by the concept's total occurrences of vocabulary terms. Concepts with no
/// vocabulary occurrences keep a zero column.
pub fn concept_tf_matrix(
    index: &StemIndex<ConceptStemKind>,
    vocabulary: &Vocabulary,
    concepts: &[ConceptId],
) -> TermDocumentMatrix<ConceptId> {
    let mut matrix = TermDocumentMatrix::zeros(vocabulary.len(), concepts.to_vec());
    let mut totals = vec![0.0; concepts.len()];
    let columns: AHashMap<ConceptId, usize> = concepts
        .iter()
        .enumerate()
        .map(|(column, &concept)| (concept, column))
        .collect();

    for (row, term) in vocabulary.terms().iter().enumerate() {
        for occurrence in index.occurrences(term) {
            let Some(concept) = occurrence.owner.as_concept() else {
                continue;
            };
            let Some(&column) = columns.get(&concept) else {
                warn!(%concept, %term, "stem occurrence refers to unknown concept, skipped");
                continue;
            };
            matrix.add(row, column, 1.0);
            totals[column] += 1.0;
        }
    }

    for (column, &total) in totals.iter().enumerate() {
        matrix.scale_column(column, total);
    }
    matrix
}

/// Method-side term frequencies: a binary indicator per term. The asymmetry
/// with the concept side is deliberate; method vectors only record which
/// vocabulary terms appear, not how often.
pub fn method_tf_matrix(
    index: &StemIndex<MethodStemKind>,
    vocabulary: &Vocabulary,
    methods: &[MethodId],
) -> TermDocumentMatrix<MethodId> {
    let mut matrix = TermDocumentMatrix::zeros(vocabulary.len(), methods.to_vec());
    let columns: AHashMap<MethodId, usize> = methods
        .iter()
        .enumerate()
        .map(|(column, &method)| (method, column))
        .collect();

    for (row, term) in vocabulary.terms().iter().enumerate() {
        for occurrence in index.occurrences(term) {
            let Some(method) = occurrence.owner.as_method() else {
                continue;
            };
            let Some(&column) = columns.get(&method) else {
                warn!(%method, %term, "stem occurrence refers to unknown method, skipped");
                continue;
            };
            matrix.set(row, column, 1.0);
        }
    }
    matrix
}
