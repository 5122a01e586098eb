// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Report rendering for the terminal and for machine consumers.

use std::io::Write;

use clap::ValueEnum;
use pruefwerk_core::error::Result;
use pruefwerk_core::report::{AggregateReport, ChangeKind, SkipReason, Verdict};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable summary
    Console,
    /// The full report as pretty-printed JSON
    Json,
}

pub fn render(report: &AggregateReport, format: OutputFormat, out: &mut impl Write) -> Result<()> {
    match format {
        OutputFormat::Console => render_console(report, out),
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut *out, report)?;
            writeln!(out)?;
            Ok(())
        }
    }
}

fn render_console(report: &AggregateReport, out: &mut impl Write) -> Result<()> {
    for page in &report.pages {
        for result in &page.image_results {
            let verdict = if result.is_similar { "similar" } else { "different" };
            writeln!(
                out,
                "Page {}: Image {} is {verdict} (SSIM: {:.4}).",
                page.page_index,
                result.image_index + 1,
                result.ssim_score
            )?;
        }
        for skipped in &page.skipped_images {
            let why = match &skipped.reason {
                SkipReason::MissingCounterpart => "no benchmark counterpart".to_owned(),
                SkipReason::Unresolvable => "image file not found".to_owned(),
                SkipReason::Failed(detail) => detail.clone(),
            };
            writeln!(
                out,
                "Page {}: Image {} skipped ({why}).",
                page.page_index,
                skipped.image_index + 1
            )?;
        }
    }

    for page in &report.pages {
        if page.text_diff.is_empty() && page.layout_differences.is_empty() {
            continue;
        }
        writeln!(out, "Page {}:", page.page_index)?;
        for change in &page.text_diff {
            let sign = match change.kind {
                ChangeKind::Added => '+',
                ChangeKind::Removed => '-',
            };
            writeln!(out, "  {sign} {}", change.token)?;
        }
        for diff in &page.layout_differences {
            match diff.benchmark_bbox {
                Some(expected) => writeln!(
                    out,
                    "  moved \"{}\": {} (benchmark {expected})",
                    diff.text, diff.live_bbox
                )?,
                None => writeln!(
                    out,
                    "  unmatched \"{}\" at {}",
                    diff.text, diff.live_bbox
                )?,
            }
        }
    }

    if !report.ignored_pages.is_empty() {
        let pages: Vec<String> = report.ignored_pages.iter().map(u32::to_string).collect();
        writeln!(out, "Ignored pages: {}", pages.join(", "))?;
    }

    writeln!(out, "Overall Text Sameness: {:.2}%", report.overall_text_sameness)?;
    match report.barcode_similarity_percentage {
        Some(pct) => writeln!(out, "Barcode Similarity: {pct:.2}%")?,
        None => writeln!(out, "No barcodes found for comparison.")?,
    }
    let verdict = match report.verdict {
        Verdict::Pass => "PASS",
        Verdict::Fail => "FAIL",
    };
    writeln!(out, "Verdict: {verdict}")?;
    Ok(())
}
