// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Human-readable error messages for the command-line front end.
//
// Every technical error is mapped to plain English with a concrete next step.

use crate::error::{PruefwerkError, Side};

/// Whether the run could carry on after the error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// The affected item was skipped; the rest of the report is valid.
    Recoverable,
    /// No report was produced.
    Fatal,
}

/// A human-readable error with plain English message and actionable suggestion.
#[derive(Debug, Clone)]
pub struct HumanError {
    /// One-line summary.
    pub message: String,
    /// What the user should try next.
    pub suggestion: String,
    pub severity: Severity,
}

/// Convert a `PruefwerkError` into a `HumanError`.
pub fn humanize_error(err: &PruefwerkError) -> HumanError {
    match err {
        PruefwerkError::Extraction(detail) => HumanError {
            message: "The document could not be read.".into(),
            suggestion: format!(
                "Check that the path is correct and that the file opens in a PDF viewer. ({detail})"
            ),
            severity: Severity::Fatal,
        },

        PruefwerkError::PageLookup { page, side } => match side {
            Side::Benchmark => HumanError {
                message: format!("The benchmark has no page {page}."),
                suggestion: "The document has more pages than the benchmark. Rebuild the benchmark from the current reference document, or compare with the benchmark as the page basis.".into(),
                severity: Severity::Fatal,
            },
            Side::Live => HumanError {
                message: format!("The document has no page {page}."),
                suggestion: "The benchmark has more pages than the document being checked. Compare with the live document as the page basis.".into(),
                severity: Severity::Fatal,
            },
        },

        PruefwerkError::ImageComparison { identifier, reason } => HumanError {
            message: format!("Image {identifier} was skipped."),
            suggestion: format!(
                "Make sure both copies of the image exist and have the same size. ({reason})"
            ),
            severity: Severity::Recoverable,
        },

        PruefwerkError::InvalidSnapshot(detail) => HumanError {
            message: "The benchmark data is inconsistent.".into(),
            suggestion: format!("Rebuild the benchmark from the reference document. ({detail})"),
            severity: Severity::Fatal,
        },

        PruefwerkError::Config(detail) => HumanError {
            message: "The configuration file has an invalid value.".into(),
            suggestion: format!("Fix the value or remove it to use the default. ({detail})"),
            severity: Severity::Fatal,
        },

        PruefwerkError::Io(io_err) => {
            if io_err.kind() == std::io::ErrorKind::NotFound {
                HumanError {
                    message: "A required file couldn't be found.".into(),
                    suggestion: "Check the benchmark and config paths, or build the benchmark first.".into(),
                    severity: Severity::Fatal,
                }
            } else {
                HumanError {
                    message: "A file couldn't be read or written.".into(),
                    suggestion: format!("Check permissions and free disk space. ({io_err})"),
                    severity: Severity::Fatal,
                }
            }
        }

        PruefwerkError::Serialization(detail) => HumanError {
            message: "The benchmark or config file is not valid JSON.".into(),
            suggestion: format!("Rebuild the benchmark or fix the file by hand. ({detail})"),
            severity: Severity::Fatal,
        },
    }
}
