// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// pruefwerk-document: Document-side adapters for Pruefwerk.
//
// Extracts page snapshots from PDF files, resolves exported images for the
// image comparator, and persists benchmark snapshot collections as JSON.

pub mod pdf;
pub mod store;

pub use pdf::PdfExtractor;
pub use store::{BenchmarkStore, DirImageStore, MemoryImageStore};
