// Benchmarks for the more-like-this pipeline
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use mltx_core::{IndexReader, InMemoryIndex, MltConfig, MoreLikeThis, SearchOptions};
use rand::prelude::*;

const VOCAB: &[&str] = &[
    "rust", "index", "query", "vector", "search", "token", "memory", "cache", "thread", "async",
    "parser", "buffer", "socket", "stream", "shard", "merge", "score", "field", "store", "batch",
];

fn generate_body(rng: &mut impl Rng, len: usize) -> String {
    (0..len)
        .map(|_| *VOCAB.choose(rng).unwrap())
        .collect::<Vec<_>>()
        .join(" ")
}

fn build_index(docs: usize) -> InMemoryIndex {
    let mut rng = rand::rng();
    let index = InMemoryIndex::new();
    for i in 0..docs {
        let body = generate_body(&mut rng, 120);
        index.add_document(&format!("doc{}", i), &[("body", &body)]);
    }
    index
}

fn config() -> MltConfig {
    MltConfig {
        min_term_freq: 1,
        min_doc_freq: 1,
        ..MltConfig::with_fields(["body"])
    }
}

fn benchmark_extract_terms(c: &mut Criterion) {
    let index = build_index(1000);
    let mlt = MoreLikeThis::new(&index, config()).unwrap();
    let doc = index.resolve("doc0").unwrap();

    c.bench_function("extract_terms", |b| {
        b.iter(|| {
            let freqs = mlt.extract_terms(black_box(doc), None);
            black_box(freqs);
        });
    });
}

fn benchmark_find_similar(c: &mut Criterion) {
    let mut group = c.benchmark_group("find_similar");

    for size in [100, 1000, 10000].iter() {
        let index = build_index(*size);
        let mlt = MoreLikeThis::new(&index, config()).unwrap();

        group.bench_with_input(BenchmarkId::new("mltx", size), size, |b, _| {
            b.iter(|| {
                let hits = mlt
                    .find_similar(black_box("doc0"), None, &SearchOptions::default())
                    .unwrap();
                black_box(hits);
            });
        });
    }

    group.finish();
}

fn benchmark_indexing(c: &mut Criterion) {
    let mut group = c.benchmark_group("index");

    for size in [100, 1000].iter() {
        group.bench_with_input(BenchmarkId::new("add_document", size), size, |b, &size| {
            b.iter(|| {
                let index = build_index(size);
                black_box(index);
            });
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    benchmark_extract_terms,
    benchmark_find_similar,
    benchmark_indexing
);
criterion_main!(benches);
