// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Storage: benchmark persistence and image lookup.

pub mod benchmark;
pub mod images;

pub use benchmark::BenchmarkStore;
pub use images::{DirImageStore, MemoryImageStore};
