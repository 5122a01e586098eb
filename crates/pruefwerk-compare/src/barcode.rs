// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Barcode comparator: counts how many live barcodes reappear in the
// benchmark with the same decoded value and bounding box.

use pruefwerk_core::config::{BarcodeMatching, GeometryPolicy};
use pruefwerk_core::types::Barcode;

/// Match and comparison counts for one page, or summed over a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BarcodeTally {
    pub matched: u64,
    pub compared: u64,
}

impl BarcodeTally {
    /// `matched / compared * 100`, or `None` when nothing was compared.
    pub fn percentage(&self) -> Option<f64> {
        (self.compared > 0).then(|| self.matched as f64 / self.compared as f64 * 100.0)
    }
}

impl std::ops::AddAssign for BarcodeTally {
    fn add_assign(&mut self, rhs: Self) {
        self.matched += rhs.matched;
        self.compared += rhs.compared;
    }
}

fn same_barcode(a: &Barcode, b: &Barcode, geometry: GeometryPolicy) -> bool {
    a.value == b.value && geometry.same_location(&a.bbox, &b.bbox)
}

/// Compare the barcodes of one live page against its benchmark page.
///
/// [`BarcodeMatching::CrossProduct`] counts every live x benchmark pair, so
/// `compared == live.len() * benchmark.len()` and duplicated barcodes can
/// match more than once. [`BarcodeMatching::OneToOne`] lets each benchmark
/// barcode satisfy a single live barcode and compares
/// `max(live.len(), benchmark.len())` slots.
pub fn compare_barcodes(
    live: &[Barcode],
    benchmark: &[Barcode],
    matching: BarcodeMatching,
    geometry: GeometryPolicy,
) -> BarcodeTally {
    match matching {
        BarcodeMatching::CrossProduct => {
            let mut tally = BarcodeTally::default();
            for l in live {
                for b in benchmark {
                    tally.compared += 1;
                    if same_barcode(l, b, geometry) {
                        tally.matched += 1;
                    }
                }
            }
            tally
        }
        BarcodeMatching::OneToOne => {
            let mut used = vec![false; benchmark.len()];
            let mut matched = 0u64;
            for l in live {
                let hit = benchmark
                    .iter()
                    .enumerate()
                    .find(|(j, b)| !used[*j] && same_barcode(l, b, geometry))
                    .map(|(j, _)| j);
                if let Some(j) = hit {
                    used[j] = true;
                    matched += 1;
                }
            }
            BarcodeTally {
                matched,
                compared: live.len().max(benchmark.len()) as u64,
            }
        }
    }
}
