// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for Pruefwerk.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Which of the two documents in a comparison an error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    /// The document being checked.
    Live,
    /// The stored reference snapshot.
    Benchmark,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Live => f.write_str("live"),
            Self::Benchmark => f.write_str("benchmark"),
        }
    }
}

/// Top-level error type for all Pruefwerk operations.
#[derive(Debug, Error)]
pub enum PruefwerkError {
    // -- Extraction --
    #[error("snapshot extraction failed: {0}")]
    Extraction(String),

    // -- Lookup --
    #[error("lookup failed: page {page} is missing from the {side} document")]
    PageLookup { page: u32, side: Side },

    // -- Per-image comparison (recovered locally by the image comparator) --
    #[error("image comparison failed for {identifier}: {reason}")]
    ImageComparison { identifier: String, reason: String },

    // -- Input validation --
    #[error("invalid snapshot collection: {0}")]
    InvalidSnapshot(String),

    #[error("invalid configuration: {0}")]
    Config(String),

    // -- Storage / persistence --
    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Coarse classification of [`PruefwerkError`] so callers can branch on the
/// failure family without matching every variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Document unreadable, missing, or format-invalid.
    Extraction,
    /// A required page or key is absent.
    Lookup,
    /// A single image pair could not be loaded or compared.
    ComparisonIo,
    /// Malformed snapshots or configuration.
    InvalidInput,
    /// Filesystem or serialization failure.
    Io,
}

impl PruefwerkError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Extraction(_) => ErrorKind::Extraction,
            Self::PageLookup { .. } => ErrorKind::Lookup,
            Self::ImageComparison { .. } => ErrorKind::ComparisonIo,
            Self::InvalidSnapshot(_) | Self::Config(_) => ErrorKind::InvalidInput,
            Self::Io(_) | Self::Serialization(_) => ErrorKind::Io,
        }
    }

    /// Whether the run can continue after this error. Only per-image
    /// failures are recoverable.
    pub fn is_recoverable(&self) -> bool {
        self.kind() == ErrorKind::ComparisonIo
    }
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, PruefwerkError>;
