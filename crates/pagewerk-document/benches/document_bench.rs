// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Criterion benchmarks for the pagewerk-document crate: plan construction and
// in-memory reordering of a synthetic labelled PDF.
//
// Needs the fixture builders, so run it with:
//
//     cargo bench -p pagewerk-document --features test-fixtures
//
// A plain `cargo bench` skips this target.

use criterion::{Criterion, black_box, criterion_group, criterion_main};

use pagewerk_document::pdf::fixture;
use pagewerk_document::{PageReorderer, PermutationPlan};

// ---------------------------------------------------------------------------
// Benchmarks
// ---------------------------------------------------------------------------

/// Plan construction for a very long document.
fn bench_plan(c: &mut Criterion) {
    c.bench_function("permutation_plan (10_000 pages)", |b| {
        b.iter(|| PermutationPlan::for_page_count(black_box(10_000)));
    });
}

/// Full parse, page-tree rewrite and serialise of a 200 page PDF.
fn bench_reorder_bytes(c: &mut Criterion) {
    let labels = fixture::labels("bench", 200);
    let label_refs: Vec<&str> = labels.iter().map(String::as_str).collect();
    let bytes = fixture::nested_sample_pdf(&label_refs, 16);
    let reorderer = PageReorderer::new();

    c.bench_function("reorder_bytes (200 pages, nested tree)", |b| {
        b.iter(|| {
            let output = reorderer
                .reorder_bytes(black_box(&bytes))
                .expect("reorder");
            black_box(output);
        });
    });
}

criterion_group!(benches, bench_plan, bench_reorder_bytes);
criterion_main!(benches);
