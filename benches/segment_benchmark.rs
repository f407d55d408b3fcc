//! Benchmarks for readaloud text processing.
//!
//! Run with: cargo bench
//!
//! These benchmarks use synthetic multi-page documents.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use futures::executor::block_on;
use rand::rngs::StdRng;
use rand::SeedableRng;
use readaloud::pipeline::chunk_fixed_size;
use readaloud::source::memory::MemorySource;
use readaloud::{Pipeline, PipelineOptions, Segmenter, UtteranceBuilder};

/// Creates plain text with the given number of pages, separated by form feeds.
fn create_test_text(page_count: usize) -> String {
    let mut content = String::new();
    for i in 0..page_count {
        if i > 0 {
            content.push('\u{0C}');
        }
        for j in 0..20 {
            content.push_str(&format!(
                "第{}页第{}句，用于测量分句性能。Sentence {} on page {} for benchmarking. ",
                i + 1,
                j + 1,
                j + 1,
                i + 1
            ));
        }
    }
    content
}

/// Benchmark sentence segmentation against the fixed-size fallback.
fn bench_segmentation(c: &mut Criterion) {
    let text = create_test_text(10).replace('\u{0C}', "");
    let mut group = c.benchmark_group("segmentation");

    let sentences = Segmenter::from_options(&PipelineOptions::default());
    group.bench_function("sentence", |b| {
        b.iter(|| sentences.segment(black_box(&text)));
    });

    group.bench_function("fixed_size", |b| {
        b.iter(|| chunk_fixed_size(black_box(&text), 10));
    });

    group.finish();
}

/// Benchmark utterance construction.
fn bench_utterances(c: &mut Criterion) {
    let text = create_test_text(10).replace('\u{0C}', "");
    let options = PipelineOptions::default();
    let chunks = Segmenter::from_options(&options).segment(&text);
    let builder = UtteranceBuilder::from_options(&options);

    c.bench_function("build_utterances", |b| {
        let mut rng = StdRng::seed_from_u64(7);
        b.iter(|| builder.build_with_rng(black_box(&chunks), &mut rng));
    });
}

/// Benchmark the full pipeline at various sizes.
fn bench_pipeline_load(c: &mut Criterion) {
    let mut group = c.benchmark_group("pipeline_load");

    for page_count in [1, 5, 10].iter() {
        let data = create_test_text(*page_count).into_bytes();

        group.bench_function(format!("{}_pages", page_count), |b| {
            b.iter(|| {
                let mut pipeline = Pipeline::new(PipelineOptions::default()).unwrap();
                block_on(pipeline.load(&MemorySource::new(), black_box(&data))).unwrap();
                pipeline.utterances().len()
            });
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_segmentation,
    bench_utterances,
    bench_pipeline_load,
);
criterion_main!(benches);
