// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Image module: windowed structural similarity and positional pairing of a
// page's images against the benchmark.

pub mod comparator;
pub mod ssim;

pub use comparator::ImageComparator;
pub use ssim::{SsimError, structural_similarity};
