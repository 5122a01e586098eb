// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// pruefwerk-compare: Comparison engine for Pruefwerk.
//
// Compares a live document's page snapshots against a stored benchmark:
// token-sequence similarity and diff (text), bounding-box drift (layout),
// windowed structural similarity (image), and decoded-value matching
// (barcode). The engine drives all four per page and aggregates the results.

pub mod barcode;
pub mod engine;
pub mod image;
pub mod layout;
pub mod text;

// Re-export the primary entry points so callers can use `pruefwerk_compare::ComparisonEngine` etc.
pub use barcode::{BarcodeTally, compare_barcodes};
pub use engine::ComparisonEngine;
pub use image::comparator::ImageComparator;
pub use image::ssim::structural_similarity;
pub use layout::compare_layout;
pub use text::{DiffOp, SequenceMatcher, TextComparison, compare_tokens};
