// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// PDF reader — open an exported PDF and inspect its pages using the `lopdf`
// crate.

use std::path::Path;

use folio_core::error::FolioError;
use lopdf::{Dictionary, Document, Object, ObjectId};
use tracing::{debug, info, instrument};

/// Read-only view of an existing PDF.
pub struct PdfReader {
    /// The underlying lopdf document.
    document: Document,
}

impl PdfReader {
    // -- Construction ---------------------------------------------------------

    /// Open a PDF from the filesystem.
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn open(path: impl AsRef<Path>) -> Result<Self, FolioError> {
        let path_ref = path.as_ref();
        info!("Opening PDF: {}", path_ref.display());

        let document = Document::load(path_ref).map_err(|err| {
            FolioError::PdfError(format!("failed to open {}: {}", path_ref.display(), err))
        })?;

        debug!(pages = document.get_pages().len(), "PDF loaded");

        Ok(Self { document })
    }

    /// Create a reader from raw PDF bytes already in memory.
    #[instrument(skip_all, fields(bytes_len = data.len()))]
    pub fn from_bytes(data: &[u8]) -> Result<Self, FolioError> {
        let document = Document::load_mem(data).map_err(|err| {
            FolioError::PdfError(format!("failed to load PDF from memory: {}", err))
        })?;

        debug!(pages = document.get_pages().len(), "PDF loaded from bytes");

        Ok(Self { document })
    }

    // -- Inspection -----------------------------------------------------------

    /// Number of pages in the document.
    pub fn page_count(&self) -> usize {
        self.document.get_pages().len()
    }

    /// Width and height of every page in points, in page order, taken from
    /// each page's (possibly inherited) MediaBox.
    pub fn page_sizes(&self) -> Result<Vec<(f32, f32)>, FolioError> {
        self.document
            .get_pages()
            .into_iter()
            .map(|(number, id)| {
                let media_box = self.media_box(id).ok_or_else(|| {
                    FolioError::PdfError(format!("page {number} has no MediaBox"))
                })?;
                Ok((media_box[2] - media_box[0], media_box[3] - media_box[1]))
            })
            .collect()
    }

    /// Pixel dimensions of every embedded image XObject, smallest first.
    ///
    /// The XObject dictionary is shared by all pages, so images are reported
    /// for the whole document rather than per page.
    pub fn image_sizes(&self) -> Result<Vec<(u32, u32)>, FolioError> {
        let mut sizes = Vec::new();
        for (id, object) in &self.document.objects {
            let Object::Stream(stream) = object else {
                continue;
            };
            let is_image = matches!(stream.dict.get(b"Subtype"), Ok(Object::Name(name)) if name == b"Image");
            if !is_image {
                continue;
            }
            let width = self.dimension(&stream.dict, b"Width");
            let height = self.dimension(&stream.dict, b"Height");
            match (width, height) {
                (Some(w), Some(h)) => sizes.push((w, h)),
                _ => {
                    return Err(FolioError::PdfError(format!(
                        "image object {} {} has no usable size",
                        id.0, id.1
                    )));
                }
            }
        }
        sizes.sort_unstable();
        Ok(sizes)
    }

    fn dimension(&self, dict: &Dictionary, key: &[u8]) -> Option<u32> {
        let value = self.resolve(dict.get(key).ok()?)?;
        match value {
            Object::Integer(i) => u32::try_from(*i).ok(),
            _ => None,
        }
    }

    /// Walk from the page up through its `Parent` chain until a MediaBox is
    /// found.
    fn media_box(&self, page_id: ObjectId) -> Option<[f32; 4]> {
        let mut current: &Dictionary = self.document.get_dictionary(page_id).ok()?;
        loop {
            if let Ok(Object::Array(values)) = current.get(b"MediaBox") {
                if values.len() != 4 {
                    return None;
                }
                let mut out = [0.0f32; 4];
                for (slot, value) in out.iter_mut().zip(values) {
                    *slot = number(self.resolve(value)?)?;
                }
                return Some(out);
            }
            let parent = current.get(b"Parent").ok()?.as_reference().ok()?;
            current = self.document.get_dictionary(parent).ok()?;
        }
    }

    fn resolve<'a>(&'a self, object: &'a Object) -> Option<&'a Object> {
        match object {
            Object::Reference(id) => self.document.get_object(*id).ok(),
            other => Some(other),
        }
    }
}

fn number(object: &Object) -> Option<f32> {
    match object {
        Object::Integer(i) => Some(*i as f32),
        Object::Real(r) => Some(*r),
        _ => None,
    }
}
