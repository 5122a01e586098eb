// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Structural similarity (SSIM): mean of the local SSIM index over every
// square window fully inside the image, using uniform window weights and
// sample covariance. Window sums come from integer summed-area tables, so
// identical inputs score exactly 1.0.

use image::DynamicImage;
use thiserror::Error;
use tracing::{debug, instrument};

/// Stabiliser constants for the luminance and contrast terms.
const K1: f64 = 0.01;
const K2: f64 = 0.03;
/// Dynamic range of 8-bit samples.
const DATA_RANGE: f64 = 255.0;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SsimError {
    #[error("dimension mismatch: {left_w}x{left_h} vs {right_w}x{right_h}")]
    DimensionMismatch {
        left_w: u32,
        left_h: u32,
        right_w: u32,
        right_h: u32,
    },

    #[error("image {width}x{height} is smaller than the {window}x{window} window")]
    WindowTooLarge { width: u32, height: u32, window: u32 },

    #[error("window size must be odd and at least 3, got {0}")]
    InvalidWindow(u32),
}

/// SSIM between two images of equal size.
///
/// Grayscale pairs are compared on luma; if either image carries colour both
/// are compared per RGB channel and the channel scores averaged. Alpha is
/// ignored. The result lies in `[-1, 1]` and is exactly `1.0` for identical
/// inputs.
#[instrument(skip_all, fields(width = left.width(), height = left.height(), window))]
pub fn structural_similarity(
    left: &DynamicImage,
    right: &DynamicImage,
    window: u32,
) -> Result<f64, SsimError> {
    if window < 3 || window % 2 == 0 {
        return Err(SsimError::InvalidWindow(window));
    }
    let (width, height) = (left.width(), left.height());
    if (width, height) != (right.width(), right.height()) {
        return Err(SsimError::DimensionMismatch {
            left_w: width,
            left_h: height,
            right_w: right.width(),
            right_h: right.height(),
        });
    }
    if width < window || height < window {
        return Err(SsimError::WindowTooLarge {
            width,
            height,
            window,
        });
    }

    let colour = left.color().has_color() || right.color().has_color();
    let score = if colour {
        let (l, r) = (left.to_rgb8(), right.to_rgb8());
        let total: f64 = (0..3)
            .map(|c| {
                channel_ssim(
                    &plane(l.as_raw(), c, 3),
                    &plane(r.as_raw(), c, 3),
                    width,
                    height,
                    window,
                )
            })
            .sum();
        total / 3.0
    } else {
        let (l, r) = (left.to_luma8(), right.to_luma8());
        channel_ssim(l.as_raw(), r.as_raw(), width, height, window)
    };

    debug!(score, colour, "SSIM computed");
    Ok(score)
}

/// One channel of an interleaved sample buffer.
fn plane(raw: &[u8], channel: usize, channels: usize) -> Vec<u8> {
    raw.iter().skip(channel).step_by(channels).copied().collect()
}

/// Summed-area table with a zero first row and column.
struct SummedArea {
    stride: usize,
    table: Vec<u64>,
}

impl SummedArea {
    fn build(width: u32, height: u32, value: impl Fn(usize) -> u64) -> Self {
        let (w, h) = (width as usize, height as usize);
        let stride = w + 1;
        let mut table = vec![0u64; stride * (h + 1)];
        for y in 0..h {
            let mut row_sum = 0u64;
            for x in 0..w {
                row_sum += value(y * w + x);
                table[(y + 1) * stride + x + 1] = row_sum + table[y * stride + x + 1];
            }
        }
        Self { stride, table }
    }

    /// Sum over the `size` x `size` square whose top-left corner is `(x, y)`.
    fn window_sum(&self, x: usize, y: usize, size: usize) -> u64 {
        let (x2, y2) = (x + size, y + size);
        self.table[y2 * self.stride + x2] + self.table[y * self.stride + x]
            - self.table[y * self.stride + x2]
            - self.table[y2 * self.stride + x]
    }
}

fn channel_ssim(a: &[u8], b: &[u8], width: u32, height: u32, window: u32) -> f64 {
    let px = |buf: &[u8], i: usize| buf[i] as u64;
    let sum_a = SummedArea::build(width, height, |i| px(a, i));
    let sum_b = SummedArea::build(width, height, |i| px(b, i));
    let sum_aa = SummedArea::build(width, height, |i| px(a, i) * px(a, i));
    let sum_bb = SummedArea::build(width, height, |i| px(b, i) * px(b, i));
    let sum_ab = SummedArea::build(width, height, |i| px(a, i) * px(b, i));

    let size = window as usize;
    let n = (size * size) as f64;
    let cov_norm = n / (n - 1.0);
    let c1 = (K1 * DATA_RANGE).powi(2);
    let c2 = (K2 * DATA_RANGE).powi(2);

    let cols = width as usize - size + 1;
    let rows = height as usize - size + 1;
    let mut total = 0.0;

    for y in 0..rows {
        for x in 0..cols {
            let mean = |t: &SummedArea| t.window_sum(x, y, size) as f64 / n;
            let (ua, ub) = (mean(&sum_a), mean(&sum_b));
            let va = cov_norm * (mean(&sum_aa) - ua * ua);
            let vb = cov_norm * (mean(&sum_bb) - ub * ub);
            let vab = cov_norm * (mean(&sum_ab) - ua * ub);

            let numerator = (2.0 * ua * ub + c1) * (2.0 * vab + c2);
            let denominator = (ua * ua + ub * ub + c1) * (va + vb + c2);
            total += numerator / denominator;
        }
    }

    total / (rows * cols) as f64
}
