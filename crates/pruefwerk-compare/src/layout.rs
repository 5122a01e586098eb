// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Layout comparator: detects live tokens whose bounding box moved relative
// to the benchmark, or that have no benchmark counterpart at all.

use std::collections::HashMap;

use pruefwerk_core::config::{GeometryPolicy, LayoutAlignment};
use pruefwerk_core::report::LayoutDifference;
use pruefwerk_core::types::Token;

/// Compare the token geometry of a live page against its benchmark page.
///
/// With [`LayoutAlignment::Positional`] token `i` is checked against
/// benchmark token `i`, so a single inserted token misaligns every later
/// index on the page. [`LayoutAlignment::ContentAnchored`] pairs tokens by
/// text first. Results follow live token order.
pub fn compare_layout(
    live: &[Token],
    benchmark: &[Token],
    alignment: LayoutAlignment,
    geometry: GeometryPolicy,
) -> Vec<LayoutDifference> {
    let pairing = match alignment {
        LayoutAlignment::Positional => positional_pairs(live.len(), benchmark.len()),
        LayoutAlignment::ContentAnchored => anchored_pairs(live, benchmark),
    };

    live.iter()
        .zip(pairing)
        .enumerate()
        .filter_map(|(token_index, (token, paired))| {
            let counterpart = paired.map(|j| (j, &benchmark[j]));
            match counterpart {
                Some((_, bench)) if geometry.same_location(&token.bbox, &bench.bbox) => None,
                _ => Some(LayoutDifference {
                    token_index,
                    benchmark_index: paired,
                    text: token.text.clone(),
                    live_bbox: token.bbox,
                    benchmark_bbox: counterpart.map(|(_, bench)| bench.bbox),
                }),
            }
        })
        .collect()
}

fn positional_pairs(live_len: usize, benchmark_len: usize) -> Vec<Option<usize>> {
    (0..live_len).map(|i| (i < benchmark_len).then_some(i)).collect()
}

/// For each live token, the unused benchmark token with the same text whose
/// index is closest (lower index on ties).
fn anchored_pairs(live: &[Token], benchmark: &[Token]) -> Vec<Option<usize>> {
    let mut by_text: HashMap<&str, Vec<usize>> = HashMap::new();
    for (j, token) in benchmark.iter().enumerate() {
        by_text.entry(token.text.as_str()).or_default().push(j);
    }
    let mut used = vec![false; benchmark.len()];

    live.iter()
        .enumerate()
        .map(|(i, token)| {
            let candidates = by_text.get(token.text.as_str())?;
            let best = candidates
                .iter()
                .copied()
                .filter(|j| !used[*j])
                .min_by_key(|j| (j.abs_diff(i), *j))?;
            used[best] = true;
            Some(best)
        })
        .collect()
}
