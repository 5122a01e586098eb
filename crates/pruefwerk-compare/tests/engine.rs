// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// End-to-end tests for the comparison engine on synthetic snapshots.

use std::collections::HashMap;
use std::io::Cursor;

use image::{DynamicImage, GrayImage, ImageFormat, Luma};
use pruefwerk_compare::ComparisonEngine;
use pruefwerk_core::config::{BarcodeMatching, CompareConfig, LayoutAlignment, PageBasis};
use pruefwerk_core::error::{ErrorKind, PruefwerkError, Side};
use pruefwerk_core::report::{ChangeKind, Verdict};
use pruefwerk_core::traits::ImageStore;
use pruefwerk_core::types::{BBox, Barcode, DocumentSnapshots, Snapshot, Token};

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

struct MapStore(HashMap<String, Vec<u8>>);

impl ImageStore for MapStore {
    fn read_image(&self, identifier: &str) -> Option<Vec<u8>> {
        self.0.get(identifier).cloned()
    }
}

fn png(offset: u8) -> Vec<u8> {
    let img = GrayImage::from_fn(24, 24, |x, y| Luma([offset.wrapping_add((x * 4 + y * 2) as u8)]));
    let mut buffer = Vec::new();
    DynamicImage::ImageLuma8(img)
        .write_to(&mut Cursor::new(&mut buffer), ImageFormat::Png)
        .expect("encode png");
    buffer
}

fn invoice_page(n: u32) -> Snapshot {
    Snapshot::new(n).with_tokens(vec![
        Token::new("Invoice", BBox::new(0.0, 0.0, 10.0, 5.0)),
        Token::new("123", BBox::new(12.0, 0.0, 20.0, 5.0)),
    ])
}

fn doc(pages: Vec<Snapshot>) -> DocumentSnapshots {
    DocumentSnapshots::from_pages(pages).expect("valid pages")
}

// ---------------------------------------------------------------------------
// Scenarios
// ---------------------------------------------------------------------------

#[test]
fn identical_invoice_page_scores_full_marks() {
    let live = doc(vec![invoice_page(1)]);
    let bench = doc(vec![invoice_page(1)]);

    let report = ComparisonEngine::without_images(CompareConfig::default())
        .compare(&live, &bench)
        .expect("compare");

    assert_eq!(report.pages.len(), 1);
    let page = &report.pages[0];
    assert_eq!(page.text_similarity_ratio, 1.0);
    assert!(page.text_diff.is_empty());
    assert!(page.layout_differences.is_empty());
    assert_eq!(report.overall_text_sameness, 100.0);
    assert_eq!(report.barcode_similarity_percentage, None);
    assert_eq!(report.verdict, Verdict::Pass);
}

#[test]
fn inserted_leading_token_misaligns_every_index() {
    let bench = doc(vec![invoice_page(1)]);
    let mut live_page = invoice_page(1);
    live_page
        .tokens
        .insert(0, Token::new("Total", BBox::new(0.0, 0.0, 5.0, 5.0)));
    let live = doc(vec![live_page]);

    let report = ComparisonEngine::without_images(CompareConfig::default())
        .compare(&live, &bench)
        .expect("compare");
    let page = &report.pages[0];

    let indices: Vec<usize> = page.layout_differences.iter().map(|d| d.token_index).collect();
    assert_eq!(indices, vec![0, 1, 2]);
    assert_eq!(page.layout_differences[2].benchmark_bbox, None);

    // Text still aligns: one removal, M = 2, T = 5.
    assert!((page.text_similarity_ratio - 0.8).abs() < 1e-12);
    assert_eq!(page.text_diff.len(), 1);
    assert_eq!(page.text_diff[0].kind, ChangeKind::Removed);
    assert_eq!(page.text_diff[0].token, "Total");

    let anchored = CompareConfig {
        layout_alignment: LayoutAlignment::ContentAnchored,
        ..CompareConfig::default()
    };
    let report = ComparisonEngine::without_images(anchored)
        .compare(&live, &bench)
        .expect("compare");
    assert_eq!(report.pages[0].layout_differences.len(), 1);
}

#[test]
fn no_barcodes_means_no_percentage() {
    let live = doc(vec![invoice_page(1), invoice_page(2)]);
    let bench = doc(vec![invoice_page(1), invoice_page(2)]);
    let report = ComparisonEngine::without_images(CompareConfig::default())
        .compare(&live, &bench)
        .expect("compare");
    assert_eq!(report.barcode_similarity_percentage, None);
    assert!(report.pages.iter().all(|p| p.barcode_compare_count == 0));
}

#[test]
fn barcode_percentage_spans_the_document() {
    let code = |v: &str| Barcode::new(v, BBox::new(0.0, 0.0, 40.0, 10.0));
    let live = doc(vec![
        invoice_page(1).with_barcodes(vec![code("A"), code("B")]),
        invoice_page(2).with_barcodes(vec![code("C")]),
    ]);
    let bench = doc(vec![
        invoice_page(1).with_barcodes(vec![code("A")]),
        invoice_page(2).with_barcodes(vec![code("X")]),
    ]);

    let report = ComparisonEngine::without_images(CompareConfig::default())
        .compare(&live, &bench)
        .expect("compare");
    // Page 1: 2 pairs, 1 match. Page 2: 1 pair, 0 matches.
    assert_eq!(report.pages[0].barcode_compare_count, 2);
    assert_eq!(report.pages[0].barcode_match_count, 1);
    let pct = report.barcode_similarity_percentage.expect("barcodes compared");
    assert!((pct - 100.0 / 3.0).abs() < 1e-9);
    assert_eq!(report.verdict, Verdict::Fail);

    let one_to_one = CompareConfig {
        barcode_matching: BarcodeMatching::OneToOne,
        ..CompareConfig::default()
    };
    let report = ComparisonEngine::without_images(one_to_one)
        .compare(&live, &bench)
        .expect("compare");
    assert_eq!(report.pages[0].barcode_compare_count, 2);
}

// ---------------------------------------------------------------------------
// Page-count asymmetry
// ---------------------------------------------------------------------------

#[test]
fn live_page_missing_from_benchmark_aborts() {
    let live = doc(vec![invoice_page(1), invoice_page(2), invoice_page(3)]);
    let bench = doc(vec![invoice_page(1), invoice_page(2)]);

    let err = ComparisonEngine::without_images(CompareConfig::default())
        .compare(&live, &bench)
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Lookup);
    match err {
        PruefwerkError::PageLookup { page, side } => {
            assert_eq!(page, 3);
            assert_eq!(side, Side::Benchmark);
        }
        other => panic!("unexpected error {other}"),
    }
}

#[test]
fn extra_benchmark_pages_are_ignored_under_live_basis() {
    let live = doc(vec![invoice_page(1)]);
    let bench = doc(vec![invoice_page(1), invoice_page(2), invoice_page(3)]);

    let report = ComparisonEngine::without_images(CompareConfig::default())
        .compare(&live, &bench)
        .expect("compare");
    assert_eq!(report.pages.len(), 1);
    assert_eq!(report.ignored_pages, vec![2, 3]);
    assert_eq!(report.page_basis, PageBasis::Live);
}

#[test]
fn benchmark_basis_flips_the_asymmetry() {
    let live = doc(vec![invoice_page(1)]);
    let bench = doc(vec![invoice_page(1), invoice_page(2)]);
    let config = CompareConfig {
        page_basis: PageBasis::Benchmark,
        ..CompareConfig::default()
    };

    let err = ComparisonEngine::without_images(config.clone())
        .compare(&live, &bench)
        .unwrap_err();
    assert!(matches!(
        err,
        PruefwerkError::PageLookup {
            page: 2,
            side: Side::Live
        }
    ));

    let report = ComparisonEngine::without_images(config)
        .compare(&bench, &live)
        .expect("compare");
    assert_eq!(report.ignored_pages, vec![2]);
}

#[test]
fn overall_sameness_is_mean_over_live_pages() {
    let live = doc(vec![
        invoice_page(1),
        Snapshot::new(2).with_tokens(vec![Token::new("other", BBox::default())]),
    ]);
    let bench = doc(vec![invoice_page(1), invoice_page(2)]);

    let report = ComparisonEngine::without_images(CompareConfig::default())
        .compare(&live, &bench)
        .expect("compare");
    assert_eq!(report.pages[1].text_similarity_ratio, 0.0);
    assert!((report.overall_text_sameness - 50.0).abs() < 1e-12);
    assert!(!report.passed());
}

#[test]
fn empty_documents_compare_as_identical() {
    let empty = DocumentSnapshots::default();
    let report = ComparisonEngine::without_images(CompareConfig::default())
        .compare(&empty, &empty)
        .expect("compare");
    assert!(report.pages.is_empty());
    assert_eq!(report.overall_text_sameness, 100.0);
}

// ---------------------------------------------------------------------------
// Images
// ---------------------------------------------------------------------------

#[test]
fn images_are_scored_and_missing_ones_skipped() {
    let live_store = MapStore(HashMap::from([
        ("image_1_0.png".to_owned(), png(0)),
        ("image_1_1.png".to_owned(), png(100)),
        ("image_1_2.png".to_owned(), png(0)),
    ]));
    let bench_store = MapStore(HashMap::from([
        ("image_1_0.png".to_owned(), png(0)),
        ("image_1_1.png".to_owned(), png(0)),
    ]));
    let names = |n: usize| (0..n).map(|i| format!("image_1_{i}.png")).collect::<Vec<_>>();

    let live = doc(vec![invoice_page(1).with_images(names(3))]);
    let bench = doc(vec![invoice_page(1).with_images(names(2))]);

    let engine = ComparisonEngine::new(CompareConfig::default(), &live_store, &bench_store);
    let report = engine.compare(&live, &bench).expect("compare");
    let page = &report.pages[0];

    assert_eq!(page.image_results.len(), 2);
    assert!(page.image_results[0].is_similar);
    assert_eq!(page.image_results[0].ssim_score, 1.0);
    assert!(!page.image_results[1].is_similar);
    assert_eq!(page.skipped_images.len(), 1);
    assert_eq!(page.skipped_images[0].image_index, 2);

    // Text identical, but one dissimilar image fails the run.
    assert_eq!(report.overall_text_sameness, 100.0);
    assert_eq!(report.dissimilar_images().count(), 1);
    assert_eq!(report.verdict, Verdict::Fail);
}

#[test]
fn report_serialises_to_json() {
    let live = doc(vec![invoice_page(1)]);
    let report = ComparisonEngine::without_images(CompareConfig::default())
        .compare(&live, &live)
        .expect("compare");
    let json = serde_json::to_value(&report).expect("serialise");
    assert_eq!(json["overall_text_sameness"], 100.0);
    assert!(json["barcode_similarity_percentage"].is_null());
    assert_eq!(json["page_basis"], "live");
    assert_eq!(json["verdict"], "Pass");
}
