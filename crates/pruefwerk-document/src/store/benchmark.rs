// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Benchmark store: a document's snapshots persisted as one JSON object keyed
// by `page_<n>`.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use pruefwerk_core::error::Result;
use pruefwerk_core::types::{DocumentSnapshots, Snapshot};
use tracing::{info, instrument};

/// File name used when no benchmark path is given.
pub const DEFAULT_BENCHMARK_FILE: &str = "benchmark_library.json";

/// JSON file holding a benchmark snapshot collection.
#[derive(Debug, Clone)]
pub struct BenchmarkStore {
    path: PathBuf,
}

impl Default for BenchmarkStore {
    fn default() -> Self {
        Self::new(DEFAULT_BENCHMARK_FILE)
    }
}

impl BenchmarkStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    /// Write `snapshots` as pretty-printed JSON, replacing any previous
    /// benchmark at this path.
    #[instrument(skip_all, fields(path = %self.path.display()))]
    pub fn save(&self, snapshots: &DocumentSnapshots) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(snapshots)?;
        fs::write(&self.path, json)?;
        info!(pages = snapshots.page_count(), "Benchmark saved");
        Ok(())
    }

    /// Read the benchmark back. Malformed JSON is a serialization error;
    /// bad page keys or a gapped page range are `InvalidSnapshot`.
    #[instrument(skip_all, fields(path = %self.path.display()))]
    pub fn load(&self) -> Result<DocumentSnapshots> {
        let data = fs::read_to_string(&self.path)?;
        let raw: BTreeMap<String, Snapshot> = serde_json::from_str(&data)?;
        let snapshots = DocumentSnapshots::from_keyed(raw)?;
        info!(pages = snapshots.page_count(), "Benchmark loaded");
        Ok(snapshots)
    }
}
