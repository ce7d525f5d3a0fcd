//! Trace time-series construction and segmentation.
//!
//! A time series projects a project's match edges onto one recorded
//! execution trace: every distinct method of the trace contributes its
//! matched concepts as rows, and every trace step becomes a column holding
//! the match weight of each concept for the method executed there.
//! Segmentation then collapses the step axis into a fixed number of
//! equal-size segments, counting per segment the steps whose weight cleared
//! a threshold.

use ahash::{AHashMap, AHashSet};
use ndarray::Array2;
use tracing::{debug, warn};

use crate::core::errors::{OntomatchError, Result};
use crate::core::model::{ConceptId, MatchSet, SegmentedTimeSeries, TimeSeries, TraceStep};

/// Build the time series of one trace over a project's match set.
///
/// Rows are the distinct concepts matched to any method of the trace,
/// sorted by display name (id breaks ties). Concepts whose name cannot be
/// resolved are skipped with a warning; methods without edges contribute
/// nothing. When several edges link one (method, concept) pair, the last
/// loaded edge wins.
pub fn build_time_series(
    trace: &[TraceStep],
    matches: &MatchSet,
    concept_names: &AHashMap<ConceptId, String>,
) -> TimeSeries {
    let scenario = trace.first().map(|step| step.scenario).unwrap_or_default();

    let mut trace_methods = AHashSet::new();
    for step in trace {
        trace_methods.insert(step.method);
    }

    let mut trace_concepts = AHashSet::new();
    for &method in &trace_methods {
        for edge in matches.for_method(method) {
            trace_concepts.insert(edge.concept);
        }
    }

    let mut rows: Vec<(String, ConceptId)> = trace_concepts
        .into_iter()
        .filter_map(|concept| match concept_names.get(&concept) {
            Some(name) => Some((name.clone(), concept)),
            None => {
                warn!(%concept, "matched concept has no loaded record, dropped from series");
                None
            }
        })
        .collect();
    rows.sort();

    let row_index: AHashMap<ConceptId, usize> = rows
        .iter()
        .enumerate()
        .map(|(row, &(_, concept))| (concept, row))
        .collect();

    let mut matrix = Array2::zeros((rows.len(), trace.len()));
    for (column, step) in trace.iter().enumerate() {
        for edge in matches.for_method(step.method) {
            if let Some(&row) = row_index.get(&edge.concept) {
                matrix[[row, column]] = edge.weight;
            }
        }
    }

    debug!(
        %scenario,
        concepts = rows.len(),
        steps = trace.len(),
        "time series built"
    );

    let (names, concepts) = rows.into_iter().unzip();
    TimeSeries {
        scenario,
        concepts,
        names,
        matrix,
    }
}

/// Collapse a time series into `segment_count` segments.
///
/// `segment_size = floor(steps / segment_count)`; the trailing
/// `steps mod segment_count` columns are dropped, not folded into the last
/// segment. Each output cell counts the steps of its segment whose weight
/// exceeded `threshold`. A nonempty `concept_subset` keeps only the listed
/// rows (series row order preserved, unknown ids ignored); an empty subset
/// keeps every row. More segments than steps is defined: every segment sums
/// an empty range and the output is all zeros.
pub fn segment(
    series: &TimeSeries,
    segment_count: usize,
    threshold: f64,
    concept_subset: &[ConceptId],
) -> Result<SegmentedTimeSeries> {
    if segment_count == 0 {
        return Err(OntomatchError::validation_mismatch(
            "segment count out of range",
            "segment_count",
            ">= 1",
            "0",
        ));
    }
    if !(0.0..=1.0).contains(&threshold) {
        return Err(OntomatchError::validation_mismatch(
            "segmentation threshold out of range",
            "threshold",
            "0.0..=1.0",
            threshold.to_string(),
        ));
    }

    let keep: Vec<usize> = if concept_subset.is_empty() {
        (0..series.concept_count()).collect()
    } else {
        let wanted: AHashSet<ConceptId> = concept_subset.iter().copied().collect();
        (0..series.concept_count())
            .filter(|&row| wanted.contains(&series.concepts[row]))
            .collect()
    };

    let segment_size = series.step_count() / segment_count;
    let mut matrix = Array2::zeros((keep.len(), segment_count));

    for (out_row, &row) in keep.iter().enumerate() {
        for segment in 0..segment_count {
            let start = segment * segment_size;
            let mut count = 0.0;
            for column in start..start + segment_size {
                if series.matrix[[row, column]] > threshold {
                    count += 1.0;
                }
            }
            matrix[[out_row, segment]] = count;
        }
    }

    debug!(
        scenario = %series.scenario,
        segments = segment_count,
        segment_size,
        dropped = series.step_count() - segment_count * segment_size,
        "time series segmented"
    );

    Ok(SegmentedTimeSeries {
        concepts: keep.iter().map(|&row| series.concepts[row]).collect(),
        names: keep.iter().map(|&row| series.names[row].clone()).collect(),
        matrix,
        segment_count,
    })
}
