// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Image comparator: pairs a page's images with the benchmark page's images
// by position, resolves both through their image stores, and scores each
// pair with SSIM. Any per-pair failure is logged and the pair skipped; it
// never aborts the page.

use image::DynamicImage;
use pruefwerk_core::error::PruefwerkError;
use pruefwerk_core::report::{ImageResult, SkipReason, SkippedImage};
use pruefwerk_core::traits::ImageStore;
use tracing::{debug, instrument, warn};

use crate::image::ssim::structural_similarity;

/// Outcome of comparing every image on one page.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PageImages {
    pub results: Vec<ImageResult>,
    pub skipped: Vec<SkippedImage>,
}

/// Scores live images against benchmark images.
pub struct ImageComparator<'a> {
    live: &'a dyn ImageStore,
    benchmark: &'a dyn ImageStore,
    threshold: f64,
    window: u32,
}

impl<'a> ImageComparator<'a> {
    pub fn new(
        live: &'a dyn ImageStore,
        benchmark: &'a dyn ImageStore,
        threshold: f64,
        window: u32,
    ) -> Self {
        Self {
            live,
            benchmark,
            threshold,
            window,
        }
    }

    /// Compare `live_ids[i]` against `benchmark_ids[i]` for every live image.
    #[instrument(skip_all, fields(live = live_ids.len(), benchmark = benchmark_ids.len()))]
    pub fn compare_page(&self, live_ids: &[String], benchmark_ids: &[String]) -> PageImages {
        let mut page = PageImages::default();

        for (image_index, live_id) in live_ids.iter().enumerate() {
            let skip = |reason: SkipReason| SkippedImage {
                image_index,
                identifier: live_id.clone(),
                reason,
            };

            let Some(bench_id) = benchmark_ids.get(image_index) else {
                warn!(image_index, identifier = %live_id, "no benchmark counterpart, skipping");
                page.skipped.push(skip(SkipReason::MissingCounterpart));
                continue;
            };

            let (Some(live_bytes), Some(bench_bytes)) = (
                self.live.read_image(live_id),
                self.benchmark.read_image(bench_id),
            ) else {
                warn!(image_index, identifier = %live_id, "image not resolvable, skipping");
                page.skipped.push(skip(SkipReason::Unresolvable));
                continue;
            };

            match self.score(live_id, &live_bytes, &bench_bytes) {
                Ok(ssim_score) => {
                    let is_similar = ssim_score >= self.threshold;
                    debug!(image_index, ssim_score, is_similar, "image compared");
                    page.results.push(ImageResult {
                        image_index,
                        identifier: live_id.clone(),
                        ssim_score,
                        is_similar,
                    });
                }
                Err(err) => {
                    warn!(image_index, error = %err, "image comparison failed, skipping pair");
                    let reason = match err {
                        PruefwerkError::ImageComparison { reason, .. } => reason,
                        other => other.to_string(),
                    };
                    page.skipped.push(skip(SkipReason::Failed(reason)));
                }
            }
        }

        page
    }

    /// Decode both rasters and compute their SSIM.
    fn score(&self, identifier: &str, live: &[u8], benchmark: &[u8]) -> Result<f64, PruefwerkError> {
        let live_img = decode(identifier, live, "live")?;
        let bench_img = decode(identifier, benchmark, "benchmark")?;
        structural_similarity(&live_img, &bench_img, self.window).map_err(|err| {
            PruefwerkError::ImageComparison {
                identifier: identifier.to_owned(),
                reason: err.to_string(),
            }
        })
    }
}

fn decode(identifier: &str, data: &[u8], side: &str) -> Result<DynamicImage, PruefwerkError> {
    image::load_from_memory(data).map_err(|err| PruefwerkError::ImageComparison {
        identifier: identifier.to_owned(),
        reason: format!("failed to decode {side} image: {err}"),
    })
}
