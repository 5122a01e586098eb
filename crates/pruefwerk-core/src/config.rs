// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Comparison configuration.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{PruefwerkError, Result};
use crate::types::BBox;

/// How live tokens are paired with benchmark tokens before their bounding
/// boxes are compared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LayoutAlignment {
    /// Index `i` against index `i`. One inserted token shifts every later
    /// index on the page.
    #[default]
    Positional,
    /// Pair each live token with the nearest unused benchmark token carrying
    /// the same text, then compare geometry.
    ContentAnchored,
}

/// When two bounding boxes count as "the same location".
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "mode")]
pub enum GeometryPolicy {
    /// Elementwise exact equality.
    #[default]
    Exact,
    /// Every coordinate within `epsilon`.
    Tolerance { epsilon: f64 },
}

impl GeometryPolicy {
    pub fn same_location(&self, a: &BBox, b: &BBox) -> bool {
        match self {
            Self::Exact => a == b,
            Self::Tolerance { epsilon } => a.max_drift(b) <= *epsilon,
        }
    }
}

/// How barcodes on a page are matched against the benchmark page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BarcodeMatching {
    /// Every live barcode against every benchmark barcode.
    #[default]
    CrossProduct,
    /// Each benchmark barcode may satisfy at most one live barcode.
    OneToOne,
}

/// Which document's pages drive the comparison loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PageBasis {
    /// Iterate the live document's pages; a page the benchmark lacks is a
    /// lookup failure, extra benchmark pages are ignored.
    #[default]
    Live,
    /// Iterate the benchmark's pages; the mirror image of `Live`.
    Benchmark,
}

/// Settings for one comparison run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompareConfig {
    /// Minimum SSIM score for an image pair to count as similar.
    pub ssim_threshold: f64,
    /// Side length of the square SSIM window (odd, at least 3).
    pub ssim_window: u32,
    pub layout_alignment: LayoutAlignment,
    /// Geometry equality for both layout and barcode comparison.
    pub geometry: GeometryPolicy,
    pub barcode_matching: BarcodeMatching,
    pub page_basis: PageBasis,
    /// Percentage (0-100) the text sameness and barcode similarity must reach
    /// for the run to pass.
    pub pass_threshold: f64,
}

impl Default for CompareConfig {
    fn default() -> Self {
        Self {
            ssim_threshold: 0.95,
            ssim_window: 7,
            layout_alignment: LayoutAlignment::Positional,
            geometry: GeometryPolicy::Exact,
            barcode_matching: BarcodeMatching::CrossProduct,
            page_basis: PageBasis::Live,
            pass_threshold: 95.0,
        }
    }
}

impl CompareConfig {
    /// Load a JSON config file. Missing fields take their defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let data = std::fs::read_to_string(path.as_ref())?;
        let config: Self = serde_json::from_str(&data)?;
        config.validate()?;
        Ok(config)
    }

    /// Check value ranges.
    pub fn validate(&self) -> Result<()> {
        if !(-1.0..=1.0).contains(&self.ssim_threshold) {
            return Err(PruefwerkError::Config(format!(
                "ssim_threshold must lie in [-1, 1], got {}",
                self.ssim_threshold
            )));
        }
        if self.ssim_window < 3 || self.ssim_window % 2 == 0 {
            return Err(PruefwerkError::Config(format!(
                "ssim_window must be odd and at least 3, got {}",
                self.ssim_window
            )));
        }
        if !(0.0..=100.0).contains(&self.pass_threshold) {
            return Err(PruefwerkError::Config(format!(
                "pass_threshold must lie in [0, 100], got {}",
                self.pass_threshold
            )));
        }
        if let GeometryPolicy::Tolerance { epsilon } = self.geometry {
            if epsilon.is_nan() || epsilon < 0.0 {
                return Err(PruefwerkError::Config(format!(
                    "geometry epsilon must be non-negative, got {epsilon}"
                )));
            }
        }
        Ok(())
    }
}
