// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Service traits the assembler calls through. The decode side reads source
// images; the document side writes finished pages. Tests substitute their own
// implementations to observe or fail individual calls.

use std::path::Path;

use folio_core::error::Result;
use image::DynamicImage;

use crate::assemble::RenderedPage;
use crate::image::ImageProcessor;

/// Turns a source reference into a decoded bitmap.
pub trait ImageDecoder {
    /// Decode the image at `source`. Failures are `FolioError::Decode`
    /// naming `source`.
    fn decode(&self, source: &Path) -> Result<DynamicImage>;
}

/// Writes rendered pages as one multi-page document.
pub trait DocumentWriter {
    /// Write `pages` to `path`, page 1 being `pages[0]`. Either the whole
    /// document is written or nothing is.
    fn write_document(&self, path: &Path, pages: &[RenderedPage]) -> Result<()>;
}

/// Decodes images from the local filesystem with the `image` crate.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsImageDecoder;

impl ImageDecoder for FsImageDecoder {
    fn decode(&self, source: &Path) -> Result<DynamicImage> {
        ImageProcessor::open(source).map(ImageProcessor::into_dynamic)
    }
}
