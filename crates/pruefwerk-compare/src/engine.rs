// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Comparison engine: runs the text, layout, image, and barcode comparators
// over every page and aggregates the per-page results into a document-level
// report with a pass/fail verdict.

use pruefwerk_core::config::{CompareConfig, PageBasis};
use pruefwerk_core::error::{PruefwerkError, Result, Side};
use pruefwerk_core::report::{AggregateReport, PageReport, Verdict};
use pruefwerk_core::traits::{ImageStore, NoImages};
use pruefwerk_core::types::{DocumentSnapshots, Snapshot};
use tracing::{debug, info, instrument};

use crate::barcode::{BarcodeTally, compare_barcodes};
use crate::image::comparator::ImageComparator;
use crate::layout::compare_layout;
use crate::text::compare_tokens;

static NO_IMAGES: NoImages = NoImages;

/// Compares live document snapshots against a benchmark.
///
/// Holds only borrowed, read-only collaborators; every call to
/// [`compare`](Self::compare) is independent.
pub struct ComparisonEngine<'a> {
    config: CompareConfig,
    live_images: &'a dyn ImageStore,
    benchmark_images: &'a dyn ImageStore,
}

impl<'a> ComparisonEngine<'a> {
    pub fn new(
        config: CompareConfig,
        live_images: &'a dyn ImageStore,
        benchmark_images: &'a dyn ImageStore,
    ) -> Self {
        Self {
            config,
            live_images,
            benchmark_images,
        }
    }

    pub fn config(&self) -> &CompareConfig {
        &self.config
    }

    /// Compare the whole document.
    ///
    /// Iterates the pages of the side named by `config.page_basis`. A page
    /// the other side lacks aborts the run with `PageLookup`; pages only the
    /// other side has are listed in `ignored_pages`.
    #[instrument(skip_all, fields(live_pages = live.page_count(), benchmark_pages = benchmark.page_count(), basis = ?self.config.page_basis))]
    pub fn compare(
        &self,
        live: &DocumentSnapshots,
        benchmark: &DocumentSnapshots,
    ) -> Result<AggregateReport> {
        let (driver, other, missing_side) = match self.config.page_basis {
            PageBasis::Live => (live, benchmark, Side::Benchmark),
            PageBasis::Benchmark => (benchmark, live, Side::Live),
        };

        let mut pages = Vec::with_capacity(driver.page_count());
        for page in driver.page_indices() {
            let missing = || PruefwerkError::PageLookup {
                page,
                side: missing_side,
            };
            let live_page = live.page(page).ok_or_else(missing)?;
            let bench_page = benchmark.page(page).ok_or_else(missing)?;
            pages.push(self.compare_page(live_page, bench_page));
        }

        let ignored_pages: Vec<u32> = other
            .page_indices()
            .filter(|p| driver.page(*p).is_none())
            .collect();

        let report = aggregate(pages, ignored_pages, &self.config);
        info!(
            pages = report.pages.len(),
            sameness = report.overall_text_sameness,
            barcodes = ?report.barcode_similarity_percentage,
            verdict = ?report.verdict,
            "Comparison complete"
        );
        Ok(report)
    }

    /// Run all four comparators on one pair of pages.
    #[instrument(skip_all, fields(page = live.page_index))]
    pub fn compare_page(&self, live: &Snapshot, benchmark: &Snapshot) -> PageReport {
        let live_texts = live.token_texts();
        let bench_texts = benchmark.token_texts();
        let text = compare_tokens(&live_texts, &bench_texts);

        let layout_differences = compare_layout(
            &live.tokens,
            &benchmark.tokens,
            self.config.layout_alignment,
            self.config.geometry,
        );

        let images = ImageComparator::new(
            self.live_images,
            self.benchmark_images,
            self.config.ssim_threshold,
            self.config.ssim_window,
        )
        .compare_page(&live.images, &benchmark.images);

        let barcodes = compare_barcodes(
            &live.barcodes,
            &benchmark.barcodes,
            self.config.barcode_matching,
            self.config.geometry,
        );

        debug!(
            ratio = text.ratio,
            layout = layout_differences.len(),
            images = images.results.len(),
            skipped_images = images.skipped.len(),
            barcodes_matched = barcodes.matched,
            "Page compared"
        );

        PageReport {
            page_index: live.page_index,
            text_similarity_ratio: text.ratio,
            text_diff: text.changes(),
            layout_differences,
            image_results: images.results,
            skipped_images: images.skipped,
            barcode_match_count: barcodes.matched,
            barcode_compare_count: barcodes.compared,
        }
    }
}

impl ComparisonEngine<'static> {
    /// Engine without image stores; every image pair is skipped.
    pub fn without_images(config: CompareConfig) -> Self {
        Self::new(config, &NO_IMAGES, &NO_IMAGES)
    }
}

/// Fold per-page reports into the document-level report.
pub fn aggregate(pages: Vec<PageReport>, ignored_pages: Vec<u32>, config: &CompareConfig) -> AggregateReport {
    let overall_text_sameness = if pages.is_empty() {
        100.0
    } else {
        pages.iter().map(|p| p.text_similarity_ratio).sum::<f64>() / pages.len() as f64 * 100.0
    };

    let mut barcodes = BarcodeTally::default();
    for page in &pages {
        barcodes += BarcodeTally {
            matched: page.barcode_match_count,
            compared: page.barcode_compare_count,
        };
    }
    let barcode_similarity_percentage = barcodes.percentage();

    let images_ok = pages
        .iter()
        .flat_map(|p| &p.image_results)
        .all(|r| r.is_similar);
    let barcodes_ok = barcode_similarity_percentage.is_none_or(|pct| pct >= config.pass_threshold);
    let verdict = if overall_text_sameness >= config.pass_threshold && images_ok && barcodes_ok {
        Verdict::Pass
    } else {
        Verdict::Fail
    };

    AggregateReport {
        overall_text_sameness,
        barcode_similarity_percentage,
        page_basis: config.page_basis,
        ignored_pages,
        pages,
        verdict,
    }
}
