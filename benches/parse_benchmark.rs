//! Benchmarks for afptools parsing and extraction performance.
//!
//! Run with: cargo bench
//!
//! These benchmarks use synthetic AFP streams.

use afptools::{FieldType, Framing, PageSelection, StructuredField};
use criterion::{black_box, criterion_group, criterion_main, Criterion};

/// Creates a synthetic AFP stream with the given number of pages.
fn create_test_afp(page_count: u32, framing: Framing) -> Vec<u8> {
    let mut data = Vec::new();
    let mut push = |field_type: FieldType, payload: &[u8]| {
        data.extend(StructuredField::encode(framing, field_type, payload).unwrap());
    };

    push(FieldType::DocumentBegin, b"BENCHDOC");
    push(FieldType::ResourceGroupBegin, b"");
    push(FieldType::Opaque([0xD3, 0xA8, 0x8A]), &[0u8; 64]);
    push(FieldType::ResourceGroupEnd, b"");

    let text = [0x40u8; 256];
    for page in 0..page_count {
        push(FieldType::PageBegin, &page.to_be_bytes());
        for _ in 0..8 {
            push(FieldType::Opaque([0xD3, 0xEE, 0x9B]), &text);
        }
        push(FieldType::PageEnd, &page.to_be_bytes());
    }

    push(FieldType::DocumentEnd, b"BENCHDOC");
    data
}

/// Benchmark AFP format detection.
fn bench_format_detection(c: &mut Criterion) {
    let afp_data = create_test_afp(1, Framing::CarriageControl);
    let non_afp_data = b"Not an AFP file at all, just random text content";

    c.bench_function("detect_valid_afp", |b| {
        b.iter(|| afptools::detect_format_from_bytes(black_box(&afp_data)).unwrap());
    });

    c.bench_function("detect_non_afp", |b| {
        b.iter(|| afptools::detect_format_from_bytes(black_box(non_afp_data)).is_err());
    });
}

/// Benchmark decoding and building at various sizes.
fn bench_afp_parsing(c: &mut Criterion) {
    let mut group = c.benchmark_group("afp_parsing");

    for page_count in [1, 100, 1000].iter() {
        let data = create_test_afp(*page_count, Framing::CarriageControl);

        group.bench_function(format!("{}_pages", page_count), |b| {
            b.iter(|| afptools::parse_bytes(black_box(&data)).unwrap());
        });
    }

    group.finish();
}

/// Benchmark extraction of every other page.
fn bench_extraction(c: &mut Criterion) {
    let data = create_test_afp(1000, Framing::Bare);
    let doc = afptools::parse_bytes(&data).unwrap();
    let selection: PageSelection = (1..=1000).step_by(2).collect();

    c.bench_function("extract_500_of_1000_pages", |b| {
        b.iter(|| afptools::extract(black_box(&doc), black_box(&selection)).unwrap());
    });

    c.bench_function("resolve_selector", |b| {
        b.iter(|| afptools::resolve(black_box("1:100, 250, 400:600, 900:"), 1000).unwrap());
    });
}

/// Benchmark analysis of a mid-sized stream.
fn bench_analysis(c: &mut Criterion) {
    let data = create_test_afp(100, Framing::CarriageControl);
    let options = afptools::AnalyzeOptions::new().with_verbose(true);

    c.bench_function("analyze_100_pages", |b| {
        b.iter(|| afptools::analyze_bytes(black_box(&data), &options));
    });
}

criterion_group!(
    benches,
    bench_format_detection,
    bench_afp_parsing,
    bench_extraction,
    bench_analysis,
);
criterion_main!(benches);
