// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Text comparator: longest-matching-block alignment of two token sequences,
// the 2·M/T sameness ratio, and a token-level diff derived from the same
// alignment.

use std::collections::HashMap;
use std::hash::Hash;

use pruefwerk_core::report::{ChangeKind, TextChange};

/// A run of `len` equal elements starting at `a[a_start]` and `b[b_start]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchingBlock {
    pub a_start: usize,
    pub b_start: usize,
    pub len: usize,
}

/// Edit step turning `a[a_range]` into `b[b_range]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Opcode {
    Equal { a: (usize, usize), b: (usize, usize) },
    Replace { a: (usize, usize), b: (usize, usize) },
    Delete { a: (usize, usize), b: (usize, usize) },
    Insert { a: (usize, usize), b: (usize, usize) },
}

/// Longest-matching-block aligner over two borrowed sequences.
///
/// Finds the longest common contiguous run, then recurses into the parts on
/// either side of it. Ties go to the run that starts earliest in `a`, then
/// earliest in `b`.
pub struct SequenceMatcher<'a, T> {
    a: &'a [T],
    b: &'a [T],
    /// Positions of every element of `b`, ascending.
    b2j: HashMap<&'a T, Vec<usize>>,
}

impl<'a, T: Eq + Hash> SequenceMatcher<'a, T> {
    pub fn new(a: &'a [T], b: &'a [T]) -> Self {
        let mut b2j: HashMap<&'a T, Vec<usize>> = HashMap::new();
        for (j, item) in b.iter().enumerate() {
            b2j.entry(item).or_default().push(j);
        }
        Self { a, b, b2j }
    }

    /// Longest block within `a[alo..ahi]` x `b[blo..bhi]`.
    fn find_longest_match(&self, alo: usize, ahi: usize, blo: usize, bhi: usize) -> MatchingBlock {
        let mut best = MatchingBlock {
            a_start: alo,
            b_start: blo,
            len: 0,
        };
        // j2len[j] = length of the match ending at a[i-1], b[j].
        let mut j2len: HashMap<usize, usize> = HashMap::new();

        for i in alo..ahi {
            let mut next: HashMap<usize, usize> = HashMap::new();
            if let Some(positions) = self.b2j.get(&self.a[i]) {
                for &j in positions {
                    if j < blo {
                        continue;
                    }
                    if j >= bhi {
                        break;
                    }
                    let k = j
                        .checked_sub(1)
                        .and_then(|prev| j2len.get(&prev))
                        .copied()
                        .unwrap_or(0)
                        + 1;
                    next.insert(j, k);
                    if k > best.len {
                        best = MatchingBlock {
                            a_start: i + 1 - k,
                            b_start: j + 1 - k,
                            len: k,
                        };
                    }
                }
            }
            j2len = next;
        }
        best
    }

    /// All matching blocks in ascending order, adjacent blocks merged.
    pub fn matching_blocks(&self) -> Vec<MatchingBlock> {
        let mut pending = vec![(0, self.a.len(), 0, self.b.len())];
        let mut found = Vec::new();

        while let Some((alo, ahi, blo, bhi)) = pending.pop() {
            let block = self.find_longest_match(alo, ahi, blo, bhi);
            if block.len == 0 {
                continue;
            }
            let (i, j, k) = (block.a_start, block.b_start, block.len);
            if alo < i && blo < j {
                pending.push((alo, i, blo, j));
            }
            if i + k < ahi && j + k < bhi {
                pending.push((i + k, ahi, j + k, bhi));
            }
            found.push(block);
        }

        found.sort_by_key(|b| (b.a_start, b.b_start));
        merge_adjacent(found)
    }
}

fn merge_adjacent(blocks: Vec<MatchingBlock>) -> Vec<MatchingBlock> {
    let mut merged: Vec<MatchingBlock> = Vec::with_capacity(blocks.len());
    for block in blocks {
        match merged.last_mut() {
            Some(last)
                if last.a_start + last.len == block.a_start
                    && last.b_start + last.len == block.b_start =>
            {
                last.len += block.len;
            }
            _ => merged.push(block),
        }
    }
    merged
}

/// Edit script between sequences of length `a_len` and `b_len` given their
/// matching blocks.
pub fn opcodes(blocks: &[MatchingBlock], a_len: usize, b_len: usize) -> Vec<Opcode> {
    let mut ops = Vec::new();
    let (mut i, mut j) = (0, 0);
    let sentinel = MatchingBlock {
        a_start: a_len,
        b_start: b_len,
        len: 0,
    };

    for block in blocks.iter().chain(std::iter::once(&sentinel)) {
        let a = (i, block.a_start);
        let b = (j, block.b_start);
        match (i < block.a_start, j < block.b_start) {
            (true, true) => ops.push(Opcode::Replace { a, b }),
            (true, false) => ops.push(Opcode::Delete { a, b }),
            (false, true) => ops.push(Opcode::Insert { a, b }),
            (false, false) => {}
        }
        i = block.a_start + block.len;
        j = block.b_start + block.len;
        if block.len > 0 {
            ops.push(Opcode::Equal {
                a: (block.a_start, i),
                b: (block.b_start, j),
            });
        }
    }
    ops
}

/// One step of the token diff.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiffOp<'a> {
    Kept(&'a str),
    /// Only in the second (benchmark) sequence.
    Added(&'a str),
    /// Only in the first (live) sequence.
    Removed(&'a str),
}

/// Result of comparing two token sequences.
#[derive(Debug, Clone, PartialEq)]
pub struct TextComparison<'a> {
    /// `2·M / T`, in `[0, 1]`.
    pub ratio: f64,
    /// Number of aligned (kept) tokens.
    pub matched: usize,
    pub ops: Vec<DiffOp<'a>>,
}

impl TextComparison<'_> {
    /// Only the added/removed steps, in traversal order.
    pub fn changes(&self) -> Vec<TextChange> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                DiffOp::Kept(_) => None,
                DiffOp::Added(t) => Some(TextChange {
                    kind: ChangeKind::Added,
                    token: (*t).to_owned(),
                }),
                DiffOp::Removed(t) => Some(TextChange {
                    kind: ChangeKind::Removed,
                    token: (*t).to_owned(),
                }),
            })
            .collect()
    }
}

/// Compare two token-text sequences.
///
/// The block search runs in both directions and keeps whichever alignment
/// matches more tokens (forward on ties), so `ratio(a, b) == ratio(b, a)`.
/// The diff is generated from that same alignment.
pub fn compare_tokens<'a, S: AsRef<str>>(live: &'a [S], benchmark: &'a [S]) -> TextComparison<'a> {
    let a: Vec<&'a str> = live.iter().map(AsRef::as_ref).collect();
    let b: Vec<&'a str> = benchmark.iter().map(AsRef::as_ref).collect();

    let total = a.len() + b.len();
    if total == 0 {
        return TextComparison {
            ratio: 1.0,
            matched: 0,
            ops: Vec::new(),
        };
    }

    let forward = SequenceMatcher::new(&a, &b).matching_blocks();
    let reverse: Vec<MatchingBlock> = SequenceMatcher::new(&b, &a)
        .matching_blocks()
        .into_iter()
        .map(|m| MatchingBlock {
            a_start: m.b_start,
            b_start: m.a_start,
            len: m.len,
        })
        .collect();

    let matched_in = |blocks: &[MatchingBlock]| blocks.iter().map(|m| m.len).sum::<usize>();
    let blocks = if matched_in(&reverse) > matched_in(&forward) {
        reverse
    } else {
        forward
    };
    let matched = matched_in(&blocks);

    let mut ops = Vec::with_capacity(total - matched);
    for op in opcodes(&blocks, a.len(), b.len()) {
        match op {
            Opcode::Equal { a: (lo, hi), .. } => {
                ops.extend(a[lo..hi].iter().map(|t| DiffOp::Kept(*t)))
            }
            Opcode::Delete { a: (lo, hi), .. } => {
                ops.extend(a[lo..hi].iter().map(|t| DiffOp::Removed(*t)))
            }
            Opcode::Insert { b: (lo, hi), .. } => {
                ops.extend(b[lo..hi].iter().map(|t| DiffOp::Added(*t)))
            }
            Opcode::Replace { a: (alo, ahi), b: (blo, bhi) } => {
                ops.extend(a[alo..ahi].iter().map(|t| DiffOp::Removed(*t)));
                ops.extend(b[blo..bhi].iter().map(|t| DiffOp::Added(*t)));
            }
        }
    }

    TextComparison {
        ratio: 2.0 * matched as f64 / total as f64,
        matched,
        ops,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words(s: &str) -> Vec<&str> {
        s.split_whitespace().collect()
    }

    #[test]
    fn both_empty_is_identical() {
        let empty: Vec<&str> = Vec::new();
        let cmp = compare_tokens(&empty, &empty);
        assert_eq!(cmp.ratio, 1.0);
        assert!(cmp.ops.is_empty());
    }

    #[test]
    fn one_side_empty_scores_zero() {
        let empty: Vec<&str> = Vec::new();
        let live = words("a b");
        let cmp = compare_tokens(&live, &empty);
        assert_eq!(cmp.ratio, 0.0);
        assert_eq!(cmp.ops, vec![DiffOp::Removed("a"), DiffOp::Removed("b")]);
    }

    #[test]
    fn ratio_counts_matched_tokens() {
        // "a b c d" vs "a b x d": M = 3, T = 8.
        let live = words("a b c d");
        let bench = words("a b x d");
        let cmp = compare_tokens(&live, &bench);
        assert!((cmp.ratio - 0.75).abs() < 1e-12);
        assert_eq!(
            cmp.changes(),
            vec![
                TextChange {
                    kind: ChangeKind::Removed,
                    token: "c".into()
                },
                TextChange {
                    kind: ChangeKind::Added,
                    token: "x".into()
                },
            ]
        );
    }

    #[test]
    fn order_matters() {
        let live = words("one two three");
        let bench = words("three two one");
        let cmp = compare_tokens(&live, &bench);
        assert!(cmp.ratio < 1.0);
        assert!(cmp.ratio > 0.0);
    }

    #[test]
    fn matching_blocks_pick_longest_run_first() {
        let a = words("x a b c y");
        let b = words("a b c x y");
        let blocks = SequenceMatcher::new(&a, &b).matching_blocks();
        assert_eq!(
            blocks,
            vec![
                MatchingBlock {
                    a_start: 1,
                    b_start: 0,
                    len: 3
                },
                MatchingBlock {
                    a_start: 4,
                    b_start: 4,
                    len: 1
                },
            ]
        );
    }

    #[test]
    fn adjacent_blocks_are_merged() {
        let a = words("a b c");
        let blocks = SequenceMatcher::new(&a, &a).matching_blocks();
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].len, 3);
    }

    #[test]
    fn asymmetric_block_search_still_gives_symmetric_ratio() {
        // Character-level classic: the one-directional search finds one
        // match for ("tide", "diet") but two for ("diet", "tide").
        let tide: Vec<char> = "tide".chars().collect();
        let diet: Vec<char> = "diet".chars().collect();
        let fwd: usize = SequenceMatcher::new(&tide, &diet)
            .matching_blocks()
            .iter()
            .map(|m| m.len)
            .sum();
        let rev: usize = SequenceMatcher::new(&diet, &tide)
            .matching_blocks()
            .iter()
            .map(|m| m.len)
            .sum();
        assert_ne!(fwd, rev);

        let a: Vec<String> = tide.iter().map(|c| c.to_string()).collect();
        let b: Vec<String> = diet.iter().map(|c| c.to_string()).collect();
        assert_eq!(compare_tokens(&a, &b).ratio, compare_tokens(&b, &a).ratio);
        assert_eq!(compare_tokens(&a, &b).ratio, 0.5);
    }

    #[test]
    fn diff_replays_into_both_sequences() {
        let live = words("the quick brown fox jumps");
        let bench = words("the slow brown dog jumps high");
        let cmp = compare_tokens(&live, &bench);

        let first: Vec<&str> = cmp
            .ops
            .iter()
            .filter_map(|op| match op {
                DiffOp::Kept(t) | DiffOp::Removed(t) => Some(*t),
                DiffOp::Added(_) => None,
            })
            .collect();
        let second: Vec<&str> = cmp
            .ops
            .iter()
            .filter_map(|op| match op {
                DiffOp::Kept(t) | DiffOp::Added(t) => Some(*t),
                DiffOp::Removed(_) => None,
            })
            .collect();
        assert_eq!(first, live);
        assert_eq!(second, bench);
    }
}
