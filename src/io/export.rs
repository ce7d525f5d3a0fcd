//! CSV export of resolved match edges.
//!
//! One row per edge with the method and concept names resolved against the
//! loaded records. Edges whose names cannot be resolved are data-quality
//! gaps: they are logged and skipped, never fatal.

use std::io::Write;

use ahash::AHashMap;
use tracing::warn;

use crate::core::errors::{OntomatchError, Result};
use crate::core::model::{Concept, MatchEdge, Method};

/// Write match edges as CSV: `method,concept,weight,strategy`.
///
/// Returns the number of rows written (header excluded). Edges referencing
/// a method or concept absent from the given records are skipped with a
/// warning.
pub fn write_matches_csv<W: Write>(
    writer: &mut W,
    edges: &[MatchEdge],
    methods: &[Method],
    concepts: &[Concept],
) -> Result<usize> {
    let method_names: AHashMap<_, _> = methods
        .iter()
        .map(|method| (method.id, method.name.as_str()))
        .collect();
    let concept_names: AHashMap<_, _> = concepts
        .iter()
        .map(|concept| (concept.id, concept.name.as_str()))
        .collect();

    writeln!(writer, "method,concept,weight,strategy")
        .map_err(|e| OntomatchError::io("Failed to write CSV header", e))?;

    let mut written = 0;
    for edge in edges {
        let Some(method) = method_names.get(&edge.method) else {
            warn!(method = %edge.method, "edge references unknown method, skipped");
            continue;
        };
        let Some(concept) = concept_names.get(&edge.concept) else {
            warn!(concept = %edge.concept, "edge references unknown concept, skipped");
            continue;
        };

        writeln!(
            writer,
            "{},{},{:.6},{}",
            escape(method),
            escape(concept),
            edge.weight,
            edge.strategy
        )
        .map_err(|e| OntomatchError::io("Failed to write CSV row", e))?;
        written += 1;
    }

    Ok(written)
}

/// Quote a field when it contains a delimiter, quote or newline
fn escape(field: &str) -> String {
    if field.contains([',', '"', '\n']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzers::matcher::StrategyKind;
    use crate::core::model::{ConceptId, MethodId, ProjectId};

    fn edge(method: u32, concept: u32, weight: f64) -> MatchEdge {
        MatchEdge {
            project: ProjectId(1),
            method: MethodId(method),
            concept: ConceptId(concept),
            weight,
            strategy: StrategyKind::TfIdfCosine,
        }
    }

    #[test]
    fn test_export_resolves_names() {
        let methods = vec![Method::new(MethodId(1), ProjectId(1), "openAccount")];
        let concepts = vec![Concept::new(ConceptId(10), ProjectId(1), "Bank Account")];

        let mut out = Vec::new();
        let written =
            write_matches_csv(&mut out, &[edge(1, 10, 0.75)], &methods, &concepts).unwrap();

        assert_eq!(written, 1);
        let text = String::from_utf8(out).unwrap();
        assert_eq!(
            text,
            "method,concept,weight,strategy\nopenAccount,Bank Account,0.750000,tfidf-cosine\n"
        );
    }

    #[test]
    fn test_export_skips_unresolved_edges() {
        let methods = vec![Method::new(MethodId(1), ProjectId(1), "openAccount")];
        let concepts = vec![Concept::new(ConceptId(10), ProjectId(1), "Account")];

        let mut out = Vec::new();
        let written = write_matches_csv(
            &mut out,
            &[edge(1, 10, 0.5), edge(2, 10, 0.5), edge(1, 99, 0.5)],
            &methods,
            &concepts,
        )
        .unwrap();

        assert_eq!(written, 1);
    }

    #[test]
    fn test_export_quotes_awkward_names() {
        let methods = vec![Method::new(MethodId(1), ProjectId(1), "a,b")];
        let concepts = vec![Concept::new(ConceptId(10), ProjectId(1), "say \"hi\"")];

        let mut out = Vec::new();
        write_matches_csv(&mut out, &[edge(1, 10, 1.0)], &methods, &concepts).unwrap();

        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("\"a,b\",\"say \"\"hi\"\"\""));
    }
}
