// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Criterion benchmarks for the pruefwerk-compare crate: token alignment on a
// page-sized sequence and SSIM on a thumbnail-sized image pair.

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use image::{DynamicImage, GrayImage, Luma};

use pruefwerk_compare::{compare_tokens, structural_similarity};

// ---------------------------------------------------------------------------
// Benchmarks
// ---------------------------------------------------------------------------

/// Align two 600-token pages that differ by a handful of edits.
fn bench_compare_tokens(c: &mut Criterion) {
    let vocabulary = ["invoice", "total", "amount", "due", "net", "tax", "item", "qty"];
    let live: Vec<String> = (0..600)
        .map(|i| vocabulary[(i * 7 + i / 13) % vocabulary.len()].to_owned())
        .collect();
    let mut benchmark = live.clone();
    for i in (0..benchmark.len()).step_by(97) {
        benchmark[i] = format!("edited{i}");
    }
    benchmark.insert(300, "inserted".to_owned());

    c.bench_function("compare_tokens (600 tokens)", |b| {
        b.iter(|| black_box(compare_tokens(black_box(&live), black_box(&benchmark)).ratio));
    });
}

/// SSIM with the default 7x7 window on a 256x256 grayscale pair.
fn bench_ssim(c: &mut Criterion) {
    let (width, height) = (256u32, 256u32);
    let left = GrayImage::from_fn(width, height, |x, y| Luma([((x * 3 + y * 5) % 256) as u8]));
    let right = GrayImage::from_fn(width, height, |x, y| Luma([((x * 3 + y * 5 + 9) % 256) as u8]));
    let (left, right) = (DynamicImage::ImageLuma8(left), DynamicImage::ImageLuma8(right));

    c.bench_function("structural_similarity (256x256, 7x7)", |b| {
        b.iter(|| black_box(structural_similarity(black_box(&left), black_box(&right), 7)));
    });
}

criterion_group!(benches, bench_compare_tokens, bench_ssim);
criterion_main!(benches);
