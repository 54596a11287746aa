// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// folio-document — Image-to-document assembly for Folio.
//
// Provides image processing (decode, rotate with canvas expansion, Lanczos
// resize, RGB flattening), the page assembler that turns a roster into pages,
// and PDF output (atomic write) plus a small reader for inspecting results.

pub mod assemble;
pub mod image;
pub mod pdf;
pub mod service;

// Re-export the primary items so callers can use `folio_document::PdfWriter` etc.
pub use crate::assemble::{
    Placement, RenderedPage, assemble_document, export, fit_geometry, render_entry, render_preview,
};
pub use crate::image::processor::ImageProcessor;
pub use crate::pdf::reader::PdfReader;
pub use crate::pdf::writer::PdfWriter;
pub use crate::service::{DocumentWriter, FsImageDecoder, ImageDecoder};
