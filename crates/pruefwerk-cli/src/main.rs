// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Pruefwerk: document benchmark capture and comparison.
//
// Entry point. Initialises logging, builds the benchmark from the main file,
// and, when a comparison file is given, compares it against the stored
// benchmark and renders the report.

mod render;

use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use pruefwerk_compare::ComparisonEngine;
use pruefwerk_core::config::CompareConfig;
use pruefwerk_core::error::{Result, Side};
use pruefwerk_core::human_errors::{Severity, humanize_error};
use pruefwerk_core::report::AggregateReport;
use pruefwerk_core::traits::SnapshotExtractor;
use pruefwerk_document::store::benchmark::DEFAULT_BENCHMARK_FILE;
use pruefwerk_document::{BenchmarkStore, DirImageStore, PdfExtractor};
use tracing::info;

use render::OutputFormat;

/// Exit status when the comparison ran but the verdict is Fail.
const EXIT_VERDICT_FAIL: u8 = 2;

/// Build a benchmark from a document and compare another document against it.
#[derive(Parser, Debug)]
#[command(name = "pruefwerk")]
#[command(version, about, long_about = None)]
struct Args {
    /// Reference document the benchmark is built from
    main_file: PathBuf,

    /// Document to compare against the benchmark
    comparison_file: Option<PathBuf>,

    /// Where the benchmark snapshot is written and read back
    #[arg(long, default_value = DEFAULT_BENCHMARK_FILE)]
    benchmark: PathBuf,

    /// JSON comparison settings; missing fields take their defaults
    #[arg(long)]
    config: Option<PathBuf>,

    /// Parent directory for exported page images
    #[arg(long)]
    image_root: Option<PathBuf>,

    /// Report format
    #[arg(long, value_enum, default_value_t = OutputFormat::Console)]
    format: OutputFormat,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();
    info!("Pruefwerk starting");

    match run(&args) {
        Ok(Some(report)) if !report.passed() => ExitCode::from(EXIT_VERDICT_FAIL),
        Ok(_) => ExitCode::SUCCESS,
        Err(err) => {
            let human = humanize_error(&err);
            let label = match human.severity {
                Severity::Fatal => "Error",
                Severity::Recoverable => "Warning",
            };
            eprintln!("{label}: {}", human.message);
            eprintln!("  {}", human.suggestion);
            tracing::debug!(error = %err, "Run aborted");
            ExitCode::FAILURE
        }
    }
}

/// Both phases. Returns the report when a comparison ran.
fn run(args: &Args) -> Result<Option<AggregateReport>> {
    let config = match &args.config {
        Some(path) => CompareConfig::load(path)?,
        None => CompareConfig::default(),
    };

    let benchmark_extractor = extractor_for(args, Side::Benchmark);
    let store = BenchmarkStore::new(&args.benchmark);
    let stdout = io::stdout();

    // -- Phase 1: benchmark ---------------------------------------------------

    let benchmark = benchmark_extractor.extract(&args.main_file)?;
    store.save(&benchmark)?;
    if args.format == OutputFormat::Console {
        writeln!(
            stdout.lock(),
            "Benchmark library created: {} ({} pages)",
            store.path().display(),
            benchmark.page_count()
        )?;
    }

    // -- Phase 2: comparison --------------------------------------------------

    let Some(comparison_file) = args
        .comparison_file
        .as_deref()
        .filter(|p| !p.as_os_str().is_empty())
    else {
        return Ok(None);
    };

    let live_extractor = extractor_for(args, Side::Live);
    let report = compare(
        &benchmark_extractor,
        &live_extractor,
        &store,
        &args.main_file,
        comparison_file,
        config,
    )?;
    render::render(&report, args.format, &mut stdout.lock())?;
    Ok(Some(report))
}

/// Extractor for one side of the comparison. Under `--image-root` each side
/// exports into its own subdirectory, so same-named documents never share
/// image files.
fn extractor_for(args: &Args, side: Side) -> PdfExtractor {
    match &args.image_root {
        Some(root) => PdfExtractor::new().with_image_root(root.join(side.to_string())),
        None => PdfExtractor::new(),
    }
}

fn compare(
    benchmark_extractor: &PdfExtractor,
    live_extractor: &PdfExtractor,
    store: &BenchmarkStore,
    main_file: &Path,
    comparison_file: &Path,
    config: CompareConfig,
) -> Result<AggregateReport> {
    let benchmark = store.load()?;
    let live = live_extractor.extract(comparison_file)?;

    let live_images = DirImageStore::new(live_extractor.image_dir_for(comparison_file));
    let benchmark_images = DirImageStore::new(benchmark_extractor.image_dir_for(main_file));

    ComparisonEngine::new(config, &live_images, &benchmark_images).compare(&live, &benchmark)
}
