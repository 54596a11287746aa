// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Page assembler — turns roster entries into rendered pages.
//
// Per entry: decode → rotate (counter-clockwise, canvas expands) → flatten to
// RGB → either keep the natural size or fit and centre onto a fixed page.
// Whole roster: refuse an empty roster up front, then render every entry in
// order and stop at the first failure so no partial document is produced.

use std::path::Path;

use folio_core::error::{FolioError, Result};
use folio_core::{ImageEntry, MAX_PAGE_PT, PageLayoutMode, PageSpec, Rgb, Roster};
use image::RgbImage;
use tracing::{debug, info, instrument};

use crate::image::ImageProcessor;
use crate::service::{DocumentWriter, ImageDecoder};

/// A fully rendered page: opaque RGB8, ready for the document writer.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedPage {
    image: RgbImage,
}

impl RenderedPage {
    pub fn new(image: RgbImage) -> Self {
        Self { image }
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn as_rgb(&self) -> &RgbImage {
        &self.image
    }

    pub fn into_rgb(self) -> RgbImage {
        self.image
    }
}

/// Size and position of a scaled image on a fixed page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    pub width: u32,
    pub height: u32,
    pub x: u32,
    pub y: u32,
}

/// Scale a `src_width` x `src_height` image to touch the page edges on one
/// axis without overflowing the other, then centre it.
///
/// Wider-than-page images take the full page width; all others take the full
/// page height. The free dimension is rounded to the nearest pixel and the
/// offsets are floored, so placement is reproducible.
pub fn fit_geometry(src_width: u32, src_height: u32, page_width: u32, page_height: u32) -> Placement {
    let img_ratio = f64::from(src_width) / f64::from(src_height);
    let page_ratio = f64::from(page_width) / f64::from(page_height);

    let (width, height) = if img_ratio > page_ratio {
        let h = (f64::from(page_width) / img_ratio).round() as u32;
        (page_width, h.clamp(1, page_height))
    } else {
        let w = (f64::from(page_height) * img_ratio).round() as u32;
        (w.clamp(1, page_width), page_height)
    };

    Placement {
        width,
        height,
        x: (page_width - width) / 2,
        y: (page_height - height) / 2,
    }
}

/// Render one entry as a page.
///
/// The entry is only read; its rotation is applied to the decoded bitmap
/// every time and never written back.
#[instrument(skip_all, fields(source = %entry.source().display(), rotation = entry.rotation()))]
pub fn render_entry<D>(decoder: &D, entry: &ImageEntry, mode: &PageLayoutMode) -> Result<RenderedPage>
where
    D: ImageDecoder + ?Sized,
{
    if let PageLayoutMode::FitToPage(page) = mode {
        check_page(page)?;
    }
    let decoded = decoder.decode(entry.source())?;
    let rgb = ImageProcessor::from_dynamic(decoded)
        .rotate_ccw(entry.effective_rotation())
        .into_rgb(Rgb::WHITE);

    match mode {
        PageLayoutMode::Natural => {
            debug!(width = rgb.width(), height = rgb.height(), "Natural page");
            Ok(RenderedPage::new(rgb))
        }
        PageLayoutMode::FitToPage(page) => fit_to_page(rgb, page).map(RenderedPage::new),
    }
}

/// Page sides must be between 1 and `MAX_PAGE_PT` points.
fn check_page(page: &PageSpec) -> Result<()> {
    let valid = 1..=MAX_PAGE_PT;
    if valid.contains(&page.width) && valid.contains(&page.height) {
        Ok(())
    } else {
        Err(FolioError::InvalidArgument(format!(
            "page size {}x{} pt is outside 1..={MAX_PAGE_PT} pt",
            page.width, page.height
        )))
    }
}

/// Scale `bitmap` onto a `page`-sized canvas filled with the page background.
fn fit_to_page(bitmap: RgbImage, page: &PageSpec) -> Result<RgbImage> {
    if bitmap.width() == 0 || bitmap.height() == 0 {
        return Err(FolioError::ImageError("image has no pixels".into()));
    }

    let placement = fit_geometry(bitmap.width(), bitmap.height(), page.width, page.height);
    debug!(
        from_w = bitmap.width(),
        from_h = bitmap.height(),
        to_w = placement.width,
        to_h = placement.height,
        x = placement.x,
        y = placement.y,
        "Fitting image to page"
    );

    let scaled = if (placement.width, placement.height) == bitmap.dimensions() {
        bitmap
    } else {
        ImageProcessor::from_dynamic(image::DynamicImage::ImageRgb8(bitmap))
            .resize_exact(placement.width, placement.height)
            .into_rgb(page.background)
    };

    let mut canvas = RgbImage::from_pixel(page.width, page.height, image::Rgb(page.background.0));
    image::imageops::replace(
        &mut canvas,
        &scaled,
        i64::from(placement.x),
        i64::from(placement.y),
    );
    Ok(canvas)
}

/// Render every roster entry, in order, into pages.
///
/// Fails with [`FolioError::EmptyInput`] before touching the decoder when the
/// roster is empty, and with the first entry's error (tagged with its
/// position) if any entry cannot be rendered.
#[instrument(skip_all, fields(entries = roster.len()))]
pub fn assemble_document<D>(decoder: &D, roster: &Roster, mode: &PageLayoutMode) -> Result<Vec<RenderedPage>>
where
    D: ImageDecoder + ?Sized,
{
    if roster.is_empty() {
        return Err(FolioError::EmptyInput);
    }

    let pages = roster
        .iter()
        .enumerate()
        .map(|(position, entry)| {
            render_entry(decoder, entry, mode).map_err(|err| err.at_entry(position))
        })
        .collect::<Result<Vec<_>>>()?;

    info!(pages = pages.len(), "Document assembled");
    Ok(pages)
}

/// Assemble the roster and hand the pages to `writer`.
///
/// The writer is only called once every page has rendered. Returns the
/// number of pages written.
#[instrument(skip_all, fields(path = %path.display()))]
pub fn export<D, W>(
    decoder: &D,
    writer: &W,
    roster: &Roster,
    mode: &PageLayoutMode,
    path: &Path,
) -> Result<usize>
where
    D: ImageDecoder + ?Sized,
    W: DocumentWriter + ?Sized,
{
    let pages = assemble_document(decoder, roster, mode)?;
    writer.write_document(path, &pages)?;
    info!(pages = pages.len(), "Export complete");
    Ok(pages.len())
}

/// Render `entry` at natural size and shrink it to fit a preview box.
/// Display scaling only; the entry is untouched.
pub fn render_preview<D>(decoder: &D, entry: &ImageEntry, max_width: u32, max_height: u32) -> Result<RgbImage>
where
    D: ImageDecoder + ?Sized,
{
    let page = render_entry(decoder, entry, &PageLayoutMode::Natural)?;
    Ok(ImageProcessor::from_dynamic(image::DynamicImage::ImageRgb8(page.into_rgb()))
        .fit_within(max_width, max_height)
        .into_rgb(Rgb::WHITE))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::{Cell, RefCell};
    use std::collections::HashMap;
    use std::path::PathBuf;

    use image::{DynamicImage, Rgba, RgbaImage};

    /// Decoder backed by a map, counting every call.
    #[derive(Default)]
    struct MemoryDecoder {
        images: HashMap<PathBuf, DynamicImage>,
        calls: Cell<usize>,
    }

    impl MemoryDecoder {
        fn with(mut self, name: &str, image: DynamicImage) -> Self {
            self.images.insert(PathBuf::from(name), image);
            self
        }
    }

    impl ImageDecoder for MemoryDecoder {
        fn decode(&self, source: &Path) -> Result<DynamicImage> {
            self.calls.set(self.calls.get() + 1);
            self.images
                .get(source)
                .cloned()
                .ok_or_else(|| FolioError::Decode {
                    index: None,
                    source_path: source.to_path_buf(),
                    reason: "not an image".into(),
                })
        }
    }

    /// Size and top-left colour of one written page.
    type PageSummary = (u32, u32, [u8; 3]);

    /// Writer that records what it was asked to write.
    #[derive(Default)]
    struct RecordingWriter {
        written: RefCell<Vec<(PathBuf, Vec<PageSummary>)>>,
    }

    impl DocumentWriter for RecordingWriter {
        fn write_document(&self, path: &Path, pages: &[RenderedPage]) -> Result<()> {
            let summary = pages
                .iter()
                .map(|page| (page.width(), page.height(), page.as_rgb().get_pixel(0, 0).0))
                .collect();
            self.written.borrow_mut().push((path.to_path_buf(), summary));
            Ok(())
        }
    }

    fn solid(width: u32, height: u32, rgb: [u8; 3]) -> DynamicImage {
        DynamicImage::ImageRgb8(RgbImage::from_pixel(width, height, image::Rgb(rgb)))
    }

    fn a4() -> PageLayoutMode {
        PageLayoutMode::FitToPage(PageSpec::default())
    }

    #[test]
    fn geometry_for_wide_image() {
        // 2:1 is wider than A4, so it takes the full width.
        let p = fit_geometry(1000, 500, 595, 842);
        assert_eq!((p.width, p.height), (595, 298));
        assert_eq!((p.x, p.y), (0, (842 - 298) / 2));
        assert_eq!(p.y, 272);
    }

    #[test]
    fn geometry_for_tall_image() {
        // 1:3 is taller than A4, so it takes the full height.
        let p = fit_geometry(100, 300, 595, 842);
        assert_eq!((p.width, p.height), (281, 842));
        assert_eq!((p.x, p.y), (157, 0));
    }

    #[test]
    fn geometry_for_matching_ratio_fills_page() {
        let p = fit_geometry(1190, 1684, 595, 842);
        assert_eq!(p, Placement { width: 595, height: 842, x: 0, y: 0 });
    }

    #[test]
    fn geometry_never_collapses_extreme_strips() {
        let p = fit_geometry(100_000, 1, 595, 842);
        assert_eq!((p.width, p.height), (595, 1));
        assert_eq!(p.y, 420);
    }

    #[test]
    fn fit_to_page_is_always_page_sized() {
        let decoder = MemoryDecoder::default()
            .with("wide.png", solid(1000, 500, [0, 0, 0]))
            .with("tall.png", solid(100, 300, [0, 0, 0]))
            .with("tiny.png", solid(3, 2, [0, 0, 0]))
            .with("square.png", solid(842, 842, [0, 0, 0]));

        for name in ["wide.png", "tall.png", "tiny.png", "square.png"] {
            let page = render_entry(&decoder, &ImageEntry::new(name), &a4()).unwrap();
            assert_eq!((page.width(), page.height()), (595, 842), "{name}");
        }
    }

    #[test]
    fn wide_image_is_centred_vertically() {
        let decoder = MemoryDecoder::default().with("wide.png", solid(1000, 500, [0, 0, 0]));
        let page = render_entry(&decoder, &ImageEntry::new("wide.png"), &a4()).unwrap();
        let rgb = page.as_rgb();

        // Content spans rows 272..570; padding above and below stays white.
        assert_eq!(*rgb.get_pixel(297, 271), image::Rgb([255, 255, 255]));
        assert_eq!(*rgb.get_pixel(297, 300), image::Rgb([0, 0, 0]));
        assert_eq!(*rgb.get_pixel(297, 570), image::Rgb([255, 255, 255]));
    }

    #[test]
    fn tall_image_is_centred_horizontally() {
        let decoder = MemoryDecoder::default().with("tall.png", solid(100, 300, [0, 0, 0]));
        let page = render_entry(&decoder, &ImageEntry::new("tall.png"), &a4()).unwrap();
        let rgb = page.as_rgb();

        // Content spans columns 157..438.
        assert_eq!(*rgb.get_pixel(156, 421), image::Rgb([255, 255, 255]));
        assert_eq!(*rgb.get_pixel(200, 421), image::Rgb([0, 0, 0]));
        assert_eq!(*rgb.get_pixel(438, 421), image::Rgb([255, 255, 255]));
    }

    #[test]
    fn background_colour_is_used_for_padding() {
        let decoder = MemoryDecoder::default().with("wide.png", solid(200, 100, [0, 0, 0]));
        let mode = PageLayoutMode::FitToPage(PageSpec {
            width: 100,
            height: 100,
            background: Rgb([200, 10, 10]),
        });
        let page = render_entry(&decoder, &ImageEntry::new("wide.png"), &mode).unwrap();
        assert_eq!(*page.as_rgb().get_pixel(50, 0), image::Rgb([200, 10, 10]));
        assert_eq!(*page.as_rgb().get_pixel(50, 50), image::Rgb([0, 0, 0]));
    }

    #[test]
    fn rotation_is_applied_before_fitting() {
        // A wide image turned a quarter becomes tall, so it fills the height.
        let decoder = MemoryDecoder::default().with("wide.png", solid(1000, 500, [0, 0, 0]));
        let mut roster = Roster::new();
        roster.add(["wide.png"]);
        roster.rotate(0, 90).unwrap();

        let page = render_entry(&decoder, roster.get(0).unwrap(), &a4()).unwrap();
        let rgb = page.as_rgb();
        assert_eq!(*rgb.get_pixel(297, 0), image::Rgb([0, 0, 0]));
        assert_eq!(*rgb.get_pixel(0, 421), image::Rgb([255, 255, 255]));
    }

    #[test]
    fn transparent_areas_render_white() {
        let rgba = RgbaImage::from_pixel(4, 4, Rgba([0, 0, 0, 0]));
        let decoder = MemoryDecoder::default().with("clear.png", DynamicImage::ImageRgba8(rgba));
        let page = render_entry(&decoder, &ImageEntry::new("clear.png"), &PageLayoutMode::Natural).unwrap();
        assert!(page.as_rgb().pixels().all(|p| *p == image::Rgb([255, 255, 255])));
    }

    #[test]
    fn natural_pages_match_rotated_source_dimensions() {
        let decoder = MemoryDecoder::default()
            .with("a.png", solid(30, 20, [1, 2, 3]))
            .with("b.png", solid(50, 10, [4, 5, 6]))
            .with("c.png", solid(7, 9, [7, 8, 9]));
        let mut roster = Roster::new();
        roster.add(["a.png", "b.png", "c.png"]);
        roster.rotate(1, 90).unwrap();
        roster.rotate(2, -180).unwrap();

        let pages = assemble_document(&decoder, &roster, &PageLayoutMode::Natural).unwrap();

        let dims: Vec<_> = pages.iter().map(|p| (p.width(), p.height())).collect();
        assert_eq!(dims, vec![(30, 20), (10, 50), (7, 9)]);
        assert_eq!(*pages[0].as_rgb().get_pixel(0, 0), image::Rgb([1, 2, 3]));
        assert_eq!(*pages[2].as_rgb().get_pixel(0, 0), image::Rgb([7, 8, 9]));
    }

    #[test]
    fn rendering_does_not_touch_the_roster() {
        let decoder = MemoryDecoder::default().with("a.png", solid(30, 20, [0, 0, 0]));
        let mut roster = Roster::new();
        roster.add(["a.png"]);
        roster.rotate(0, 450).unwrap();
        let before = roster.clone();

        assemble_document(&decoder, &roster, &a4()).unwrap();
        assemble_document(&decoder, &roster, &a4()).unwrap();
        assert_eq!(roster, before);
    }

    #[test]
    fn empty_roster_fails_before_decoding() {
        let decoder = MemoryDecoder::default();
        let err = assemble_document(&decoder, &Roster::new(), &a4()).unwrap_err();

        assert!(matches!(err, FolioError::EmptyInput));
        assert_eq!(decoder.calls.get(), 0);
    }

    #[test]
    fn one_bad_entry_fails_the_whole_export() {
        let decoder = MemoryDecoder::default()
            .with("a.png", solid(10, 10, [0, 0, 0]))
            .with("b.png", solid(10, 10, [0, 0, 0]))
            .with("d.png", solid(10, 10, [0, 0, 0]));
        let writer = RecordingWriter::default();
        let mut roster = Roster::new();
        roster.add(["a.png", "b.png", "corrupt.png", "d.png"]);

        let err = export(&decoder, &writer, &roster, &a4(), Path::new("out.pdf")).unwrap_err();

        match err {
            FolioError::Decode {
                index, source_path, ..
            } => {
                assert_eq!(index, Some(2));
                assert_eq!(source_path, PathBuf::from("corrupt.png"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(writer.written.borrow().is_empty());
        // Rendering stops at the failing entry.
        assert_eq!(decoder.calls.get(), 3);
    }

    #[test]
    fn export_writes_pages_in_roster_order() {
        let decoder = MemoryDecoder::default()
            .with("a.png", solid(10, 20, [255, 0, 0]))
            .with("b.png", solid(30, 15, [0, 0, 255]))
            .with("c.png", solid(8, 8, [0, 255, 0]));
        let writer = RecordingWriter::default();
        let mut roster = Roster::new();
        roster.add(["a.png", "b.png", "c.png"]);
        roster.move_up(2).unwrap();
        roster.rotate(0, 90).unwrap();

        let written = export(&decoder, &writer, &roster, &PageLayoutMode::Natural, Path::new("out.pdf")).unwrap();

        assert_eq!(written, 3);
        assert_eq!(
            *writer.written.borrow(),
            vec![(
                PathBuf::from("out.pdf"),
                vec![(20, 10, [255, 0, 0]), (8, 8, [0, 255, 0]), (30, 15, [0, 0, 255])],
            )]
        );
    }

    #[test]
    fn preview_is_bounded_and_keeps_entry() {
        let decoder = MemoryDecoder::default().with("big.png", solid(1200, 600, [0, 0, 0]));
        let mut roster = Roster::new();
        roster.add(["big.png"]);
        roster.rotate(0, 90).unwrap();
        let entry = roster.get(0).unwrap().clone();

        let preview = render_preview(&decoder, &entry, 300, 300).unwrap();
        assert_eq!(preview.dimensions(), (150, 300));
        assert_eq!(roster.get(0).unwrap().rotation(), 90);
    }

    #[test]
    fn zero_sized_page_is_rejected() {
        let decoder = MemoryDecoder::default().with("a.png", solid(10, 10, [0, 0, 0]));
        let mode = PageLayoutMode::FitToPage(PageSpec {
            width: 0,
            height: 842,
            background: Rgb::WHITE,
        });
        assert!(matches!(
            render_entry(&decoder, &ImageEntry::new("a.png"), &mode),
            Err(FolioError::InvalidArgument(_))
        ));
    }

    #[test]
    fn oversized_page_is_rejected_before_decoding() {
        let decoder = MemoryDecoder::default().with("a.png", solid(10, 10, [0, 0, 0]));
        let mode = PageLayoutMode::FitToPage(PageSpec {
            width: 100_000,
            height: 100_000,
            background: Rgb::WHITE,
        });
        let mut roster = Roster::new();
        roster.add(["a.png"]);

        assert!(matches!(
            assemble_document(&decoder, &roster, &mode),
            Err(FolioError::InvalidArgument(_))
        ));
        assert_eq!(decoder.calls.get(), 0);
    }
}
