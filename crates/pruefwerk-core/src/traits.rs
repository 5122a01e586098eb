// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Capability traits for the collaborators the comparison engine depends on
// but does not implement: snapshot extraction, image lookup, and barcode
// decoding. The engine only sees these traits, so it runs unchanged against
// real adapters or synthetic test doubles.

use std::path::Path;

use crate::error::Result;
use crate::types::{Barcode, DocumentSnapshots};

/// Turn a document on disk into one snapshot per page.
pub trait SnapshotExtractor {
    /// Extract every page of the document at `path`.
    ///
    /// Fails with `PruefwerkError::Extraction` when the document is missing
    /// or malformed; no partial collection is ever returned.
    fn extract(&self, path: &Path) -> Result<DocumentSnapshots>;
}

/// Resolve an image identifier from a snapshot to encoded raster bytes.
pub trait ImageStore {
    /// Returns `None` when the identifier is unknown. Absence is never an
    /// error; the image comparator treats it as "skip".
    fn read_image(&self, identifier: &str) -> Option<Vec<u8>>;
}

/// Decode the barcodes visible in an encoded raster image.
pub trait BarcodeDecoder {
    fn decode_barcodes(&self, raster: &[u8]) -> Result<Vec<Barcode>>;
}

/// Image store that knows no images. Every pair is skipped.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoImages;

impl ImageStore for NoImages {
    fn read_image(&self, _identifier: &str) -> Option<Vec<u8>> {
        None
    }
}

/// Decoder that never finds a barcode.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoBarcodes;

impl BarcodeDecoder for NoBarcodes {
    fn decode_barcodes(&self, _raster: &[u8]) -> Result<Vec<Barcode>> {
        Ok(Vec::new())
    }
}
