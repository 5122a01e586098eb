// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Property tests for the comparators.

use image::{DynamicImage, GrayImage};
use proptest::prelude::*;
use pruefwerk_compare::text::DiffOp;
use pruefwerk_compare::{compare_barcodes, compare_layout, compare_tokens, structural_similarity};
use pruefwerk_core::config::{BarcodeMatching, GeometryPolicy, LayoutAlignment};
use pruefwerk_core::types::{BBox, Barcode, Token};

// ---------------------------------------------------------------------------
// Strategies
// ---------------------------------------------------------------------------

/// Short sequences over a small vocabulary so that repeats are common.
fn words() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec("[a-e]", 0..24)
}

fn barcodes() -> impl Strategy<Value = Vec<Barcode>> {
    prop::collection::vec(
        ("[A-C]", 0u8..3).prop_map(|(value, x)| {
            Barcode::new(value, BBox::new(f64::from(x), 0.0, f64::from(x) + 10.0, 5.0))
        }),
        0..8,
    )
}

fn tokens(words: &[String]) -> Vec<Token> {
    words
        .iter()
        .enumerate()
        .map(|(i, w)| Token::new(w.clone(), BBox::new(i as f64 * 10.0, 0.0, i as f64 * 10.0 + 8.0, 5.0)))
        .collect()
}

fn replay<'a>(ops: &[DiffOp<'a>], keep_added: bool) -> Vec<&'a str> {
    ops.iter()
        .filter_map(|op| match *op {
            DiffOp::Kept(t) => Some(t),
            DiffOp::Added(t) if keep_added => Some(t),
            DiffOp::Removed(t) if !keep_added => Some(t),
            _ => None,
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Text
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn ratio_is_bounded(a in words(), b in words()) {
        let cmp = compare_tokens(&a, &b);
        prop_assert!((0.0..=1.0).contains(&cmp.ratio));
        prop_assert!(cmp.matched <= a.len().min(b.len()));
    }

    #[test]
    fn identical_sequences_have_no_changes(a in words()) {
        let cmp = compare_tokens(&a, &a);
        prop_assert_eq!(cmp.ratio, 1.0);
        prop_assert!(cmp.changes().is_empty());
    }

    #[test]
    fn ratio_is_symmetric(a in words(), b in words()) {
        prop_assert_eq!(compare_tokens(&a, &b).ratio, compare_tokens(&b, &a).ratio);
    }

    #[test]
    fn disjoint_vocabularies_score_zero(a in prop::collection::vec("[a-c]", 1..16), b in prop::collection::vec("[x-z]", 1..16)) {
        let cmp = compare_tokens(&a, &b);
        prop_assert_eq!(cmp.ratio, 0.0);
        prop_assert_eq!(cmp.changes().len(), a.len() + b.len());
    }

    #[test]
    fn diff_replays_both_sides(a in words(), b in words()) {
        let cmp = compare_tokens(&a, &b);
        let live: Vec<&str> = a.iter().map(String::as_str).collect();
        let bench: Vec<&str> = b.iter().map(String::as_str).collect();
        prop_assert_eq!(replay(&cmp.ops, false), live);
        prop_assert_eq!(replay(&cmp.ops, true), bench);
    }
}

// ---------------------------------------------------------------------------
// Layout
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn positional_layout_flags_only_the_unpaired_tail(a in words(), extra in words()) {
        let bench = tokens(&a);
        let mut live_words = a.clone();
        live_words.extend(extra.iter().cloned());
        let live = tokens(&live_words);

        let diffs = compare_layout(&live, &bench, LayoutAlignment::Positional, GeometryPolicy::Exact);
        let indices: Vec<usize> = diffs.iter().map(|d| d.token_index).collect();
        prop_assert_eq!(indices, (a.len()..live.len()).collect::<Vec<_>>());
        prop_assert!(diffs.iter().all(|d| d.benchmark_bbox.is_none()));
    }

    #[test]
    fn anchored_layout_never_reuses_a_benchmark_token(a in words(), b in words()) {
        let diffs = compare_layout(&tokens(&a), &tokens(&b), LayoutAlignment::ContentAnchored, GeometryPolicy::Exact);
        let mut used: Vec<usize> = diffs.iter().filter_map(|d| d.benchmark_index).collect();
        let before = used.len();
        used.sort_unstable();
        used.dedup();
        prop_assert_eq!(used.len(), before);
    }
}

// ---------------------------------------------------------------------------
// Barcodes
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn cross_product_compares_every_pair(live in barcodes(), bench in barcodes()) {
        let tally = compare_barcodes(&live, &bench, BarcodeMatching::CrossProduct, GeometryPolicy::Exact);
        prop_assert_eq!(tally.compared, (live.len() * bench.len()) as u64);
        prop_assert!(tally.matched <= tally.compared);
    }

    #[test]
    fn one_to_one_matches_at_most_the_shorter_side(live in barcodes(), bench in barcodes()) {
        let tally = compare_barcodes(&live, &bench, BarcodeMatching::OneToOne, GeometryPolicy::Exact);
        prop_assert_eq!(tally.compared, live.len().max(bench.len()) as u64);
        prop_assert!(tally.matched <= live.len().min(bench.len()) as u64);
        if let Some(pct) = tally.percentage() {
            prop_assert!((0.0..=100.0).contains(&pct));
        }
    }
}

// ---------------------------------------------------------------------------
// SSIM
// ---------------------------------------------------------------------------

fn gray_image() -> impl Strategy<Value = (u32, u32, Vec<u8>)> {
    (7u32..16, 7u32..16).prop_flat_map(|(w, h)| {
        prop::collection::vec(any::<u8>(), (w * h) as usize).prop_map(move |px| (w, h, px))
    })
}

fn to_image(w: u32, h: u32, px: Vec<u8>) -> DynamicImage {
    DynamicImage::ImageLuma8(GrayImage::from_raw(w, h, px).expect("buffer matches dimensions"))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn ssim_of_an_image_with_itself_is_one((w, h, px) in gray_image()) {
        let img = to_image(w, h, px);
        prop_assert_eq!(structural_similarity(&img, &img, 7).expect("ssim"), 1.0);
    }

    #[test]
    fn ssim_is_symmetric_and_bounded((w, h, px) in gray_image(), seed in any::<u8>()) {
        let other: Vec<u8> = px.iter().map(|p| p.wrapping_mul(3).wrapping_add(seed)).collect();
        let a = to_image(w, h, px);
        let b = to_image(w, h, other);
        let ab = structural_similarity(&a, &b, 7).expect("ssim");
        let ba = structural_similarity(&b, &a, 7).expect("ssim");
        prop_assert_eq!(ab, ba);
        prop_assert!((-1.0 - 1e-9..=1.0 + 1e-9).contains(&ab));
    }
}
