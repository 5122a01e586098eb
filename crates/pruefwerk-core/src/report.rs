// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Comparison reports: the structured result of comparing a live document
// against its benchmark. Built once per run and never mutated afterwards.

use serde::{Deserialize, Serialize};

use crate::config::PageBasis;
use crate::types::BBox;

/// Direction of a token-level text change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChangeKind {
    /// Present only in the benchmark page.
    Added,
    /// Present only in the live page.
    Removed,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextChange {
    pub kind: ChangeKind,
    pub token: String,
}

/// A live token whose location differs from (or has no counterpart in) the
/// benchmark.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutDifference {
    /// Index into the live page's tokens.
    pub token_index: usize,
    /// Index of the paired benchmark token, if any.
    pub benchmark_index: Option<usize>,
    pub text: String,
    pub live_bbox: BBox,
    pub benchmark_bbox: Option<BBox>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageResult {
    pub image_index: usize,
    pub identifier: String,
    pub ssim_score: f64,
    pub is_similar: bool,
}

/// Why an image pair was left out of the results.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "reason", content = "detail")]
pub enum SkipReason {
    /// The benchmark page has no image at this index.
    MissingCounterpart,
    /// One of the two identifiers did not resolve to any bytes.
    Unresolvable,
    /// Decoding or scoring failed.
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedImage {
    pub image_index: usize,
    pub identifier: String,
    pub reason: SkipReason,
}

/// Per-page comparison result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageReport {
    pub page_index: u32,
    /// Alignment-based sameness of the token texts, in `[0, 1]`.
    pub text_similarity_ratio: f64,
    pub text_diff: Vec<TextChange>,
    pub layout_differences: Vec<LayoutDifference>,
    pub image_results: Vec<ImageResult>,
    pub skipped_images: Vec<SkippedImage>,
    pub barcode_match_count: u64,
    pub barcode_compare_count: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Verdict {
    Pass,
    Fail,
}

/// Document-level comparison result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregateReport {
    /// Mean per-page text ratio as a percentage (0-100).
    pub overall_text_sameness: f64,
    /// `None` when no barcode pairs were compared.
    pub barcode_similarity_percentage: Option<f64>,
    pub page_basis: PageBasis,
    /// Pages present only in the document that did not drive iteration.
    pub ignored_pages: Vec<u32>,
    pub pages: Vec<PageReport>,
    pub verdict: Verdict,
}

impl AggregateReport {
    pub fn passed(&self) -> bool {
        self.verdict == Verdict::Pass
    }

    pub fn total_text_changes(&self) -> usize {
        self.pages.iter().map(|p| p.text_diff.len()).sum()
    }

    pub fn total_layout_differences(&self) -> usize {
        self.pages.iter().map(|p| p.layout_differences.len()).sum()
    }

    /// Compared image pairs that fell below the similarity threshold.
    pub fn dissimilar_images(&self) -> impl Iterator<Item = (u32, &ImageResult)> {
        self.pages.iter().flat_map(|page| {
            page.image_results
                .iter()
                .filter(|r| !r.is_similar)
                .map(move |r| (page.page_index, r))
        })
    }
}
