// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// PDF writer — serialise rendered pages into a multi-page PDF using
// `printpdf` 0.8, and commit it to disk atomically.
//
// printpdf 0.8 uses a data-oriented API: documents are built by constructing
// `PdfPage` structs containing `Vec<Op>` operation lists, then serialised via
// `PdfDocument::save()`.

use std::io::Write;
use std::path::Path;

use folio_core::error::{FolioError, Result};
use printpdf::{
    ImageCompression, ImageOptimizationOptions, Mm, Op, PdfDocument, PdfPage, PdfSaveOptions,
    PdfWarnMsg, Pt, RawImage, RawImageData, RawImageFormat, XObjectTransform,
};
use tempfile::NamedTempFile;
use tracing::{debug, info, instrument, warn};

use crate::assemble::RenderedPage;
use crate::service::DocumentWriter;

/// Pages are embedded at one pixel per point.
const PAGE_DPI: f32 = 72.0;

/// Writes rendered pages as a PDF, one image per page.
///
/// Each page is exactly as large as its bitmap at 72 dpi, so a 595×842 pixel
/// page becomes an A4 page.
#[derive(Debug, Clone, Default)]
pub struct PdfWriter {
    /// Title metadata embedded in the PDF /Info dictionary.
    title: Option<String>,
}

impl PdfWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the title for the PDF metadata.
    pub fn with_title(mut self, title: Option<String>) -> Self {
        self.title = title;
        self
    }

    /// Serialise `pages` into PDF bytes, page 1 being `pages[0]`.
    #[instrument(skip_all, fields(pages = pages.len()))]
    pub fn render(&self, pages: &[RenderedPage]) -> Result<Vec<u8>> {
        if pages.is_empty() {
            return Err(FolioError::EmptyInput);
        }

        let title = self.title.as_deref().unwrap_or("Folio Document");
        let mut doc = PdfDocument::new(title);
        let mut pdf_pages: Vec<PdfPage> = Vec::with_capacity(pages.len());

        for (number, page) in pages.iter().enumerate() {
            let (width, height) = (page.width(), page.height());
            let raw = RawImage {
                pixels: RawImageData::U8(page.as_rgb().as_raw().clone()),
                width: width as usize,
                height: height as usize,
                data_format: RawImageFormat::RGB8,
                tag: Vec::new(),
            };
            let xobject_id = doc.add_image(&raw);

            let ops = vec![Op::UseXobject {
                id: xobject_id,
                transform: XObjectTransform {
                    translate_x: Some(Pt(0.0)),
                    translate_y: Some(Pt(0.0)),
                    scale_x: Some(1.0),
                    scale_y: Some(1.0),
                    dpi: Some(PAGE_DPI),
                    rotate: None,
                },
            }];

            debug!(page = number + 1, width, height, "Page placed");
            pdf_pages.push(PdfPage::new(pt_to_mm(width), pt_to_mm(height), ops));
        }

        doc.with_pages(pdf_pages);

        let mut warnings: Vec<PdfWarnMsg> = Vec::new();
        let output = doc.save(&save_options(), &mut warnings);
        if !warnings.is_empty() {
            warn!(count = warnings.len(), "printpdf reported warnings while saving");
        }

        Ok(output)
    }

    /// Serialise `pages` and write them to `path`.
    ///
    /// The bytes go to a temporary file beside `path` that is renamed over
    /// `path` only once fully written; on any failure `path` is untouched and
    /// the temporary file is removed.
    pub fn write_to_file(&self, pages: &[RenderedPage], path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let bytes = self.render(pages)?;
        let write_err = |reason: String| FolioError::Write {
            path: path.to_path_buf(),
            reason,
        };

        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };

        let mut tmp = NamedTempFile::new_in(dir).map_err(|e| write_err(e.to_string()))?;
        tmp.write_all(&bytes).map_err(|e| write_err(e.to_string()))?;
        tmp.as_file()
            .sync_all()
            .map_err(|e| write_err(e.to_string()))?;
        tmp.persist(path).map_err(|e| write_err(e.error.to_string()))?;

        info!(
            pages = pages.len(),
            bytes = bytes.len(),
            "Wrote PDF to {}",
            path.display()
        );
        Ok(())
    }
}

impl DocumentWriter for PdfWriter {
    fn write_document(&self, path: &Path, pages: &[RenderedPage]) -> Result<()> {
        self.write_to_file(pages, path)
    }
}

/// Embed every page bitmap at full resolution with lossless Flate.
///
/// printpdf's default image optimisation resamples anything above 2 MB and
/// may re-encode it as JPEG or greyscale.
fn save_options() -> PdfSaveOptions {
    PdfSaveOptions {
        image_optimization: Some(ImageOptimizationOptions {
            quality: None,
            max_image_size: None,
            dither_greyscale: Some(false),
            convert_to_greyscale: Some(false),
            auto_optimize: Some(false),
            format: Some(ImageCompression::Flate),
        }),
        ..PdfSaveOptions::default()
    }
}

/// Convert a length in points to printpdf's millimetres.
fn pt_to_mm(points: u32) -> Mm {
    Mm(points as f32 * 25.4 / 72.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pdf::reader::PdfReader;
    use image::RgbImage;

    fn page(width: u32, height: u32) -> RenderedPage {
        RenderedPage::new(RgbImage::from_pixel(width, height, image::Rgb([40, 80, 120])))
    }

    #[test]
    fn render_produces_one_pdf_page_per_rendered_page() {
        let bytes = PdfWriter::new()
            .render(&[page(595, 842), page(300, 200), page(10, 10)])
            .unwrap();
        assert!(bytes.starts_with(b"%PDF"));

        let reader = PdfReader::from_bytes(&bytes).unwrap();
        assert_eq!(reader.page_count(), 3);

        let sizes = reader.page_sizes().unwrap();
        let expected = [(595.0, 842.0), (300.0, 200.0), (10.0, 10.0)];
        for ((w, h), (ew, eh)) in sizes.iter().zip(expected) {
            assert!((w - ew).abs() < 0.5, "width {w} vs {ew}");
            assert!((h - eh).abs() < 0.5, "height {h} vs {eh}");
        }
    }

    #[test]
    fn large_pages_are_embedded_at_full_resolution() {
        let bytes = PdfWriter::new()
            .render(&[page(3000, 2000), page(1200, 1800)])
            .unwrap();

        let reader = PdfReader::from_bytes(&bytes).unwrap();
        assert_eq!(reader.image_sizes().unwrap(), vec![(1200, 1800), (3000, 2000)]);
    }

    #[test]
    fn embedded_images_are_lossless_rgb() {
        let bytes = PdfWriter::new().render(&[page(2500, 2500)]).unwrap();
        let document = lopdf::Document::load_mem(&bytes).unwrap();

        let image = document
            .objects
            .values()
            .filter_map(|object| object.as_stream().ok())
            .find(|stream| matches!(stream.dict.get(b"Subtype"), Ok(lopdf::Object::Name(n)) if n == b"Image"))
            .expect("an image XObject");

        assert_eq!(image.dict.get(b"ColorSpace").unwrap().as_name().unwrap(), b"DeviceRGB");
        assert_eq!(image.dict.get(b"Filter").unwrap().as_name().unwrap(), b"FlateDecode");
    }

    #[test]
    fn render_rejects_empty_page_list() {
        assert!(matches!(
            PdfWriter::new().render(&[]),
            Err(FolioError::EmptyInput)
        ));
    }

    #[test]
    fn write_to_file_commits_the_document() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.pdf");

        PdfWriter::new()
            .with_title(Some("Receipts".into()))
            .write_document(&path, &[page(100, 100), page(200, 100)])
            .unwrap();

        let reader = PdfReader::open(&path).unwrap();
        assert_eq!(reader.page_count(), 2);
        // Only the committed file remains.
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn write_into_missing_directory_fails_cleanly() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("out.pdf");

        let err = PdfWriter::new()
            .write_document(&path, &[page(10, 10)])
            .unwrap_err();

        assert!(matches!(err, FolioError::Write { .. }));
        assert!(!path.exists());
    }

    #[test]
    fn failed_write_leaves_existing_file_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.pdf");
        std::fs::write(&path, b"previous").unwrap();

        assert!(PdfWriter::new().write_document(&path, &[]).is_err());
        assert_eq!(std::fs::read(&path).unwrap(), b"previous");
    }
}
