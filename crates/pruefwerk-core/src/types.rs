// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Core domain types: per-page snapshots and the page-indexed collection that
// forms a benchmark.

use std::collections::BTreeMap;
use std::fmt;

use serde::de::{self, Deserializer};
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};

use crate::error::{PruefwerkError, Result};

/// Axis-aligned bounding box `(x0, y0, x1, y1)` in page units.
///
/// Serialised as a plain four-element array.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "[f64; 4]", into = "[f64; 4]")]
pub struct BBox {
    pub x0: f64,
    pub y0: f64,
    pub x1: f64,
    pub y1: f64,
}

impl BBox {
    pub const fn new(x0: f64, y0: f64, x1: f64, y1: f64) -> Self {
        Self { x0, y0, x1, y1 }
    }

    pub fn width(&self) -> f64 {
        self.x1 - self.x0
    }

    pub fn height(&self) -> f64 {
        self.y1 - self.y0
    }

    /// Largest absolute per-coordinate difference to `other`.
    pub fn max_drift(&self, other: &BBox) -> f64 {
        (self.x0 - other.x0)
            .abs()
            .max((self.y0 - other.y0).abs())
            .max((self.x1 - other.x1).abs())
            .max((self.y1 - other.y1).abs())
    }
}

impl From<[f64; 4]> for BBox {
    fn from([x0, y0, x1, y1]: [f64; 4]) -> Self {
        Self { x0, y0, x1, y1 }
    }
}

impl From<BBox> for [f64; 4] {
    fn from(b: BBox) -> Self {
        [b.x0, b.y0, b.x1, b.y1]
    }
}

impl fmt::Display for BBox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "({:.2}, {:.2}, {:.2}, {:.2})",
            self.x0, self.y0, self.x1, self.y1
        )
    }
}

/// A positioned word as produced by the extractor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Token {
    pub text: String,
    pub bbox: BBox,
}

impl Token {
    pub fn new(text: impl Into<String>, bbox: BBox) -> Self {
        Self {
            text: text.into(),
            bbox,
        }
    }
}

/// A decoded barcode and where it sits on the page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Barcode {
    pub value: String,
    pub bbox: BBox,
}

impl Barcode {
    pub fn new(value: impl Into<String>, bbox: BBox) -> Self {
        Self {
            value: value.into(),
            bbox,
        }
    }
}

/// Document metadata value (author, title, page count, ...). Passed through
/// untouched by the comparators.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MetadataValue {
    Text(String),
    Number(f64),
}

impl From<&str> for MetadataValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

impl From<f64> for MetadataValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

/// Structured representation of a single page.
///
/// `tokens`, `images`, and `barcodes` keep extractor order; comparators only
/// ever index into them.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Snapshot {
    /// 1-based page number. Carried by the collection key on disk.
    #[serde(skip)]
    pub page_index: u32,
    #[serde(rename = "text")]
    pub tokens: Vec<Token>,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub metadata: BTreeMap<String, MetadataValue>,
    /// Opaque extracted tables; never interpreted by the engine.
    #[serde(default)]
    pub tables: Vec<serde_json::Value>,
    #[serde(default)]
    pub barcodes: Vec<Barcode>,
}

impl Snapshot {
    pub fn new(page_index: u32) -> Self {
        Self {
            page_index,
            ..Self::default()
        }
    }

    pub fn with_tokens(mut self, tokens: Vec<Token>) -> Self {
        self.tokens = tokens;
        self
    }

    pub fn with_images(mut self, images: Vec<String>) -> Self {
        self.images = images;
        self
    }

    pub fn with_barcodes(mut self, barcodes: Vec<Barcode>) -> Self {
        self.barcodes = barcodes;
        self
    }

    pub fn with_metadata(mut self, metadata: BTreeMap<String, MetadataValue>) -> Self {
        self.metadata = metadata;
        self
    }

    /// Token texts in reading order.
    pub fn token_texts(&self) -> Vec<&str> {
        self.tokens.iter().map(|t| t.text.as_str()).collect()
    }
}

/// Persisted key for a page: `page_<n>`.
pub fn page_key(page_index: u32) -> String {
    format!("page_{page_index}")
}

/// Parse a `page_<n>` key back into its page number.
pub fn parse_page_key(key: &str) -> Option<u32> {
    key.strip_prefix("page_")?.parse().ok().filter(|n| *n > 0)
}

/// All page snapshots of one document, keyed by page number.
///
/// Keys are unique and contiguous from 1 to the page count; construction
/// rejects anything else.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DocumentSnapshots {
    pages: BTreeMap<u32, Snapshot>,
}

impl DocumentSnapshots {
    /// Build a collection, validating that page numbers run 1..=N without
    /// gaps or duplicates.
    pub fn from_pages(pages: impl IntoIterator<Item = Snapshot>) -> Result<Self> {
        let mut map = BTreeMap::new();
        for snapshot in pages {
            let index = snapshot.page_index;
            if index == 0 {
                return Err(PruefwerkError::InvalidSnapshot(
                    "page numbers are 1-based, got page 0".into(),
                ));
            }
            if map.insert(index, snapshot).is_some() {
                return Err(PruefwerkError::InvalidSnapshot(format!(
                    "duplicate page {index}"
                )));
            }
        }

        for (expected, actual) in (1u32..).zip(map.keys()) {
            if expected != *actual {
                return Err(PruefwerkError::InvalidSnapshot(format!(
                    "pages are not contiguous: expected page {expected}, found page {actual}"
                )));
            }
        }

        Ok(Self { pages: map })
    }

    /// Build a collection from persisted `page_<n>` keys.
    pub fn from_keyed(raw: BTreeMap<String, Snapshot>) -> Result<Self> {
        let mut pages = Vec::with_capacity(raw.len());
        for (key, mut snapshot) in raw {
            snapshot.page_index = parse_page_key(&key).ok_or_else(|| {
                PruefwerkError::InvalidSnapshot(format!("invalid page key {key:?}"))
            })?;
            pages.push(snapshot);
        }
        Self::from_pages(pages)
    }

    pub fn page(&self, page_index: u32) -> Option<&Snapshot> {
        self.pages.get(&page_index)
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    /// Page numbers in ascending order.
    pub fn page_indices(&self) -> impl Iterator<Item = u32> + '_ {
        self.pages.keys().copied()
    }

    /// Snapshots in ascending page order.
    pub fn iter(&self) -> impl Iterator<Item = &Snapshot> {
        self.pages.values()
    }
}

impl Serialize for DocumentSnapshots {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        // Numeric order, not lexicographic: page_2 precedes page_10.
        let mut map = serializer.serialize_map(Some(self.pages.len()))?;
        for (index, snapshot) in &self.pages {
            map.serialize_entry(&page_key(*index), snapshot)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for DocumentSnapshots {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = BTreeMap::<String, Snapshot>::deserialize(deserializer)?;
        Self::from_keyed(raw).map_err(de::Error::custom)
    }
}
