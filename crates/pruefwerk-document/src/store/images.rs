// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Image stores resolving snapshot image identifiers to encoded bytes.

use std::collections::HashMap;
use std::path::{Component, Path, PathBuf};

use pruefwerk_core::traits::ImageStore;
use tracing::{debug, warn};

/// Resolves identifiers as file names under a root directory.
///
/// Identifiers must be relative and stay inside the root; anything else
/// resolves to nothing.
#[derive(Debug, Clone)]
pub struct DirImageStore {
    root: PathBuf,
}

impl DirImageStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn resolve(&self, identifier: &str) -> Option<PathBuf> {
        let relative = Path::new(identifier);
        let contained = !identifier.is_empty()
            && relative
                .components()
                .all(|c| matches!(c, Component::Normal(_) | Component::CurDir));
        if !contained {
            warn!(identifier, "Image identifier escapes the image directory");
            return None;
        }
        Some(self.root.join(relative))
    }
}

impl ImageStore for DirImageStore {
    fn read_image(&self, identifier: &str) -> Option<Vec<u8>> {
        let path = self.resolve(identifier)?;
        match std::fs::read(&path) {
            Ok(bytes) => Some(bytes),
            Err(err) => {
                debug!(path = %path.display(), %err, "Image not readable");
                None
            }
        }
    }
}

/// Images held in memory, keyed by identifier.
#[derive(Debug, Clone, Default)]
pub struct MemoryImageStore {
    images: HashMap<String, Vec<u8>>,
}

impl MemoryImageStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, identifier: impl Into<String>, bytes: Vec<u8>) {
        self.images.insert(identifier.into(), bytes);
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }
}

impl<K: Into<String>> FromIterator<(K, Vec<u8>)> for MemoryImageStore {
    fn from_iter<I: IntoIterator<Item = (K, Vec<u8>)>>(iter: I) -> Self {
        Self {
            images: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}

impl ImageStore for MemoryImageStore {
    fn read_image(&self, identifier: &str) -> Option<Vec<u8>> {
        self.images.get(identifier).cloned()
    }
}
