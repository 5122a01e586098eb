// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Pruefwerk: Core snapshot types, comparison reports, configuration, and
// error definitions shared across all crates.

pub mod config;
pub mod error;
pub mod human_errors;
pub mod report;
pub mod traits;
pub mod types;

pub use config::CompareConfig;
pub use error::PruefwerkError;
pub use report::*;
pub use types::*;
