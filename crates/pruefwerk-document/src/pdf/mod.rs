// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// PDF module: snapshot extraction from PDF documents.

pub mod extractor;
mod text;

pub use extractor::PdfExtractor;
