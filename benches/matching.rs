//! Criterion benchmarks for the full matching pipeline on a synthetic
//! banking-domain corpus.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use ontomatch_rs::core::model::{
    Concept, ConceptAttribute, ConceptId, Method, MethodId, MethodParameter, ProjectId,
    ScenarioId, TraceStep,
};
use ontomatch_rs::io::store::MemoryStore;
use ontomatch_rs::{EngineConfig, MatchingEngine};

const WORDS: [&str; 16] = [
    "account", "balance", "branch", "customer", "deposit", "interest", "invoice", "ledger",
    "loan", "order", "owner", "payment", "rate", "transfer", "voucher", "withdraw",
];

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => format!("{}{}", first.to_ascii_uppercase(), chars.as_str()),
        None => String::new(),
    }
}

fn synthetic_store(concepts: usize, methods: usize, steps: usize) -> MemoryStore {
    let project = ProjectId(1);
    let mut store = MemoryStore::new();

    for i in 0..concepts {
        let a = WORDS[i % WORDS.len()];
        let b = WORDS[(i / WORDS.len() + i + 1) % WORDS.len()];
        store.add_concept(
            Concept::new(
                ConceptId(i as u32),
                project,
                format!("{} {}", capitalize(a), capitalize(b)),
            )
            .with_attribute(ConceptAttribute::new(WORDS[(i + 3) % WORDS.len()])),
        );
    }

    for i in 0..methods {
        let a = WORDS[(i + 5) % WORDS.len()];
        let b = WORDS[(i * 7 + 2) % WORDS.len()];
        store.add_method(
            Method::new(
                MethodId(i as u32),
                project,
                format!("{}{}", a, capitalize(b)),
            )
            .with_parameter(MethodParameter::new(WORDS[(i + 9) % WORDS.len()], "Id")),
        );
    }

    for sequence in 0..steps {
        store.add_trace_step(TraceStep::entering(
            ScenarioId(1),
            MethodId(((sequence * 13 + 5) % methods) as u32),
            sequence as u32,
        ));
    }

    store
}

fn bench_compute_matches(c: &mut Criterion) {
    let engine = MatchingEngine::new(EngineConfig::default()).unwrap();
    let mut group = c.benchmark_group("compute_matches");

    for &size in &[50usize, 200, 500] {
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, &size| {
            let store = synthetic_store(size, size * 2, 0);
            b.iter_batched(
                || store.clone(),
                |mut store| {
                    let matches = engine
                        .compute_matches(&mut store, ProjectId(1))
                        .expect("matching succeeds");
                    black_box(matches)
                },
                criterion::BatchSize::SmallInput,
            );
        });
    }
    group.finish();
}

fn bench_time_series(c: &mut Criterion) {
    let engine = MatchingEngine::new(EngineConfig::default()).unwrap();
    let mut store = synthetic_store(200, 400, 5_000);
    engine
        .compute_matches(&mut store, ProjectId(1))
        .expect("matching succeeds");

    c.bench_function("build_time_series_5k_steps", |b| {
        b.iter(|| {
            let series = engine
                .build_time_series(&store, ProjectId(1), ScenarioId(1))
                .expect("series builds");
            black_box(series)
        });
    });

    let series = engine
        .build_time_series(&store, ProjectId(1), ScenarioId(1))
        .expect("series builds");
    c.bench_function("segment_5k_steps", |b| {
        b.iter(|| {
            let segmented = engine.segment(&series, &[]).expect("segmentation succeeds");
            black_box(segmented)
        });
    });
}

criterion_group!(benches, bench_compute_matches, bench_time_series);
criterion_main!(benches);
