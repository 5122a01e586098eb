// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// PDF snapshot extractor: opens a document with `lopdf` and builds one
// Snapshot per page (word tokens, exported images, document metadata, and
// optionally decoded barcodes).

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use image::{DynamicImage, GrayImage, ImageFormat, RgbImage};
use lopdf::content::{Content, Operation};
use lopdf::{Dictionary, Document, Object, ObjectId, Stream};
use pruefwerk_core::error::{PruefwerkError, Result};
use pruefwerk_core::traits::{BarcodeDecoder, SnapshotExtractor};
use pruefwerk_core::types::{DocumentSnapshots, MetadataValue, Snapshot};
use tracing::{debug, info, instrument, warn};

use super::text::{TextExtractor, decode_text, number};

/// US Letter, used when a page carries no MediaBox anywhere in its tree.
const DEFAULT_PAGE_HEIGHT: f64 = 792.0;

/// Bounds the walk up the page tree when resolving inherited attributes.
const MAX_TREE_DEPTH: usize = 32;

/// How many levels of nested Form XObjects are searched for images.
const MAX_FORM_DEPTH: usize = 4;

/// Extracts page snapshots from PDF files.
///
/// Images are written to an image directory per document; the identifiers
/// stored in each snapshot are file names relative to that directory (see
/// [`PdfExtractor::image_dir_for`]).
#[derive(Default)]
pub struct PdfExtractor {
    /// Parent of the per-document image directories. Defaults to an
    /// `images` directory next to each document.
    image_root: Option<PathBuf>,
    barcode_decoder: Option<Box<dyn BarcodeDecoder>>,
}

impl PdfExtractor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Export images under `root/<document stem>/` instead of next to the
    /// document.
    pub fn with_image_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.image_root = Some(root.into());
        self
    }

    /// Run `decoder` over every exported image and record its barcodes on
    /// the page.
    pub fn with_barcode_decoder(mut self, decoder: Box<dyn BarcodeDecoder>) -> Self {
        self.barcode_decoder = Some(decoder);
        self
    }

    /// Directory the images of the document at `path` are exported to.
    ///
    /// Under an image root only the file stem is kept, so two documents with
    /// the same stem share a directory. Callers extracting both sides of a
    /// comparison give each side its own root.
    pub fn image_dir_for(&self, path: &Path) -> PathBuf {
        let stem = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "document".to_owned());
        match &self.image_root {
            Some(root) => root.join(stem),
            None => path
                .parent()
                .unwrap_or_else(|| Path::new("."))
                .join("images")
                .join(stem),
        }
    }

    // -- Per-page extraction --------------------------------------------------

    fn extract_page(
        &self,
        doc: &Document,
        page_number: u32,
        page_id: ObjectId,
        image_dir: &Path,
        metadata: &BTreeMap<String, MetadataValue>,
        written: &mut Vec<PathBuf>,
    ) -> Result<Snapshot> {
        let page = doc.get_dictionary(page_id).map_err(|err| {
            PruefwerkError::Extraction(format!("page {page_number} is not a dictionary: {err}"))
        })?;

        let operations = if page.has(b"Contents") {
            let raw = doc.get_page_content(page_id).map_err(|err| {
                PruefwerkError::Extraction(format!("page {page_number} content unreadable: {err}"))
            })?;
            Content::decode(&raw)
                .map_err(|err| {
                    PruefwerkError::Extraction(format!(
                        "page {page_number} content stream is malformed: {err}"
                    ))
                })?
                .operations
        } else {
            Vec::new()
        };

        let tokens = TextExtractor::new(page_height(doc, page)).run(&operations);

        let mut snapshot = Snapshot::new(page_number)
            .with_tokens(tokens)
            .with_metadata(metadata.clone());

        let resources = inherited(doc, page, b"Resources").and_then(|r| resolve(doc, r).as_dict().ok());
        let mut drawn = Vec::new();
        drawn_images(doc, resources, &operations, 0, page_number, &mut drawn);

        for stream in drawn {
            let index = snapshot.images.len();
            let Some((ext, bytes)) = encode_image(stream) else {
                warn!(page = page_number, index, "Unsupported image encoding, skipped");
                continue;
            };

            let identifier = format!("image_{page_number}_{index}.{ext}");
            let target = image_dir.join(&identifier);
            fs::create_dir_all(image_dir)
                .and_then(|()| fs::write(&target, &bytes))
                .map_err(|err| {
                    PruefwerkError::Extraction(format!(
                        "cannot export image to {}: {err}",
                        target.display()
                    ))
                })?;
            written.push(target);

            if let Some(decoder) = &self.barcode_decoder {
                match decoder.decode_barcodes(&bytes) {
                    Ok(found) => snapshot.barcodes.extend(found),
                    Err(err) => warn!(%identifier, %err, "Barcode decoding failed"),
                }
            }
            snapshot.images.push(identifier);
        }

        debug!(
            page = page_number,
            tokens = snapshot.tokens.len(),
            images = snapshot.images.len(),
            barcodes = snapshot.barcodes.len(),
            "Page extracted"
        );
        Ok(snapshot)
    }
}

impl SnapshotExtractor for PdfExtractor {
    #[instrument(skip_all, fields(path = %path.display()))]
    fn extract(&self, path: &Path) -> Result<DocumentSnapshots> {
        if !path.is_file() {
            return Err(PruefwerkError::Extraction(format!(
                "{} does not exist or is not a file",
                path.display()
            )));
        }
        let doc = Document::load(path).map_err(|err| {
            PruefwerkError::Extraction(format!("failed to open {}: {err}", path.display()))
        })?;

        let metadata = document_metadata(&doc);
        let image_dir = self.image_dir_for(path);

        let mut written = Vec::new();
        let extracted = doc
            .get_pages()
            .into_iter()
            .map(|(page_number, page_id)| {
                self.extract_page(&doc, page_number, page_id, &image_dir, &metadata, &mut written)
            })
            .collect::<Result<Vec<_>>>()
            .and_then(|pages| DocumentSnapshots::from_pages(pages));

        match extracted {
            Ok(snapshots) => {
                info!(pages = snapshots.page_count(), "Document extracted");
                Ok(snapshots)
            }
            Err(err) => {
                discard(&written);
                Err(err)
            }
        }
    }
}

// -- Helpers ------------------------------------------------------------------

/// Remove images exported by a run that then failed.
fn discard(written: &[PathBuf]) {
    for path in written {
        if let Err(err) = fs::remove_file(path) {
            warn!(path = %path.display(), %err, "Could not remove partially exported image");
        }
    }
}

/// Image XObjects painted by `operations`, in first-paint order. Form
/// XObjects are entered up to `MAX_FORM_DEPTH` levels deep, using their own
/// resources when they carry any.
fn drawn_images<'a>(
    doc: &'a Document,
    resources: Option<&'a Dictionary>,
    operations: &[Operation],
    depth: usize,
    page_number: u32,
    found: &mut Vec<&'a Stream>,
) {
    let xobjects = resources
        .and_then(|r| r.get(b"XObject").ok())
        .and_then(|x| resolve(doc, x).as_dict().ok());
    let mut inline = 0usize;

    for op in operations {
        match op.operator.as_str() {
            "BI" => inline += 1,
            "Do" => {
                let Some(Object::Name(name)) = op.operands.first() else {
                    continue;
                };
                let Some(stream) = xobjects
                    .and_then(|x| x.get(name).ok())
                    .and_then(|obj| resolve(doc, obj).as_stream().ok())
                else {
                    continue;
                };

                if is_image(stream) {
                    if !found.iter().any(|seen| std::ptr::eq(*seen, stream)) {
                        found.push(stream);
                    }
                } else if is_form(stream) {
                    if depth >= MAX_FORM_DEPTH {
                        warn!(page = page_number, depth, "Form XObjects nested too deeply, images skipped");
                        continue;
                    }
                    let Some(form_ops) = stream_operations(stream) else {
                        warn!(page = page_number, "Form XObject content unreadable, images skipped");
                        continue;
                    };
                    let form_resources = stream
                        .dict
                        .get(b"Resources")
                        .ok()
                        .and_then(|r| resolve(doc, r).as_dict().ok())
                        .or(resources);
                    drawn_images(doc, form_resources, &form_ops, depth + 1, page_number, found);
                }
            }
            _ => {}
        }
    }

    if inline > 0 {
        warn!(page = page_number, inline, "Inline images are not exported");
    }
}

/// Decoded operations of a content stream such as a Form XObject.
fn stream_operations(stream: &Stream) -> Option<Vec<Operation>> {
    let raw = if filters(stream).is_empty() {
        stream.content.clone()
    } else {
        stream.decompressed_content().ok()?
    };
    Content::decode(&raw).ok().map(|content| content.operations)
}

/// Follow a reference to its target; anything else is returned as-is.
fn resolve<'a>(doc: &'a Document, object: &'a Object) -> &'a Object {
    match object {
        Object::Reference(id) => doc.get_object(*id).unwrap_or(object),
        other => other,
    }
}

/// Look `key` up on the page, then on its ancestors in the page tree.
fn inherited<'a>(doc: &'a Document, page: &'a Dictionary, key: &[u8]) -> Option<&'a Object> {
    let mut node = page;
    for _ in 0..MAX_TREE_DEPTH {
        if let Ok(value) = node.get(key) {
            return Some(value);
        }
        node = node
            .get(b"Parent")
            .ok()
            .and_then(|parent| resolve(doc, parent).as_dict().ok())?;
    }
    None
}

fn page_height(doc: &Document, page: &Dictionary) -> f64 {
    let media_box = inherited(doc, page, b"MediaBox")
        .and_then(|mb| resolve(doc, mb).as_array().ok())
        .map(|values| values.iter().filter_map(|v| number(resolve(doc, v))).collect::<Vec<_>>());
    match media_box.as_deref() {
        Some([_, y0, _, y1]) => (y1 - y0).abs(),
        _ => DEFAULT_PAGE_HEIGHT,
    }
}

/// The trailer's `/Info` dictionary as metadata. Strings, names and numbers
/// are kept; other entries are dropped.
fn document_metadata(doc: &Document) -> BTreeMap<String, MetadataValue> {
    let Some(info) = doc
        .trailer
        .get(b"Info")
        .ok()
        .and_then(|info| resolve(doc, info).as_dict().ok())
    else {
        return BTreeMap::new();
    };

    info.iter()
        .filter_map(|(key, value)| {
            let value = match resolve(doc, value) {
                Object::String(bytes, _) => MetadataValue::Text(decode_text(bytes)),
                Object::Name(name) => MetadataValue::Text(String::from_utf8_lossy(name).into_owned()),
                other => MetadataValue::Number(number(other)?),
            };
            Some((String::from_utf8_lossy(key).into_owned(), value))
        })
        .collect()
}

fn is_image(stream: &Stream) -> bool {
    matches!(stream.dict.get(b"Subtype"), Ok(Object::Name(name)) if name == b"Image")
}

fn is_form(stream: &Stream) -> bool {
    matches!(stream.dict.get(b"Subtype"), Ok(Object::Name(name)) if name == b"Form")
}

/// Names of the stream's filters, in application order.
fn filters(stream: &Stream) -> Vec<Vec<u8>> {
    match stream.dict.get(b"Filter") {
        Ok(Object::Name(name)) => vec![name.clone()],
        Ok(Object::Array(items)) => items
            .iter()
            .filter_map(|item| match item {
                Object::Name(name) => Some(name.clone()),
                _ => None,
            })
            .collect(),
        _ => Vec::new(),
    }
}

fn dict_u32(dict: &Dictionary, key: &[u8]) -> Option<u32> {
    match dict.get(key) {
        Ok(Object::Integer(v)) => u32::try_from(*v).ok(),
        _ => None,
    }
}

/// Encode an image XObject as a standalone file: JPEG passes through, 8-bit
/// gray and RGB samples are re-encoded as PNG. Returns the extension and the
/// file bytes, or `None` for anything else.
fn encode_image(stream: &Stream) -> Option<(&'static str, Vec<u8>)> {
    let filters = filters(stream);
    if filters.last().is_some_and(|f| f == b"DCTDecode") {
        if filters.len() == 1 {
            return Some(("jpg", stream.content.clone()));
        }
        return None;
    }

    let width = dict_u32(&stream.dict, b"Width")?;
    let height = dict_u32(&stream.dict, b"Height")?;
    if dict_u32(&stream.dict, b"BitsPerComponent")? != 8 {
        return None;
    }
    let samples = if filters.is_empty() {
        stream.content.clone()
    } else {
        stream.decompressed_content().ok()?
    };

    let image = match stream.dict.get(b"ColorSpace") {
        Ok(Object::Name(cs)) if cs == b"DeviceGray" => {
            DynamicImage::ImageLuma8(GrayImage::from_raw(width, height, samples)?)
        }
        Ok(Object::Name(cs)) if cs == b"DeviceRGB" => {
            DynamicImage::ImageRgb8(RgbImage::from_raw(width, height, samples)?)
        }
        _ => return None,
    };

    let mut png = Vec::new();
    image
        .write_to(&mut std::io::Cursor::new(&mut png), ImageFormat::Png)
        .ok()?;
    Some(("png", png))
}
