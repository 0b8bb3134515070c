use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use pagewright_core::{KeywordSpec, extract, patch, render, score};

/// Repeats the fixture body so larger inputs keep a realistic shape
fn scaled(source: &str, copies: usize) -> String {
    let mut out = String::with_capacity(source.len() * copies);
    for _ in 0..copies {
        out.push_str(source);
    }
    out
}

fn bench_extract(c: &mut Criterion) {
    let about = std::fs::read_to_string("../../tests/fixtures/About.tsx").unwrap();
    let medium = scaled(&about, 10);
    let large = scaled(&about, 100);

    let mut group = c.benchmark_group("extract");

    group.bench_with_input(BenchmarkId::new("small", "1x"), &about, |b, src| {
        b.iter(|| extract(black_box(src), "About"))
    });

    group.bench_with_input(BenchmarkId::new("medium", "10x"), &medium, |b, src| {
        b.iter(|| extract(black_box(src), "About"))
    });

    group.bench_with_input(BenchmarkId::new("large", "100x"), &large, |b, src| {
        b.iter(|| extract(black_box(src), "About"))
    });

    group.finish();
}

fn bench_scoring(c: &mut Criterion) {
    let source = scaled(&std::fs::read_to_string("../../tests/fixtures/About.tsx").unwrap(), 10);
    let tree = extract(&source, "About");
    let keywords = KeywordSpec::new(["custom framing", "shadow box", "picture framing", "museum glass"]);

    c.bench_function("score", |b| b.iter(|| score(black_box(&tree), black_box(&keywords))));
}

fn bench_reconstruct(c: &mut Criterion) {
    let original = std::fs::read_to_string("../../tests/fixtures/About.tsx").unwrap();
    let mut tree = extract(&original, "About");
    if let Some(node) = tree.nodes.values_mut().next() {
        node.text.push_str(" (edited)");
    }

    c.bench_function("render", |b| b.iter(|| render(black_box(&tree))));
    c.bench_function("patch", |b| b.iter(|| patch(black_box(&original), black_box(&tree))));
}

criterion_group!(benches, bench_extract, bench_scoring, bench_reconstruct);
criterion_main!(benches);
