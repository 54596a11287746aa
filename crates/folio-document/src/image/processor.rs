// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Image processor — decode, rotate with canvas expansion, resize, and flatten
// to opaque RGB. Operates on in-memory images using the `image` and
// `imageproc` crates.

use std::path::Path;

use folio_core::Rgb;
use folio_core::error::FolioError;
use image::imageops::FilterType;
use image::{DynamicImage, Rgba, RgbaImage, RgbImage};
use imageproc::geometric_transformations::{self, Interpolation};
use tracing::{debug, info, instrument};

/// Image processing pipeline operating on a single in-memory image.
///
/// Each transformation consumes `self` and returns a new `ImageProcessor`,
/// so steps chain:
///
/// ```ignore
/// let page = ImageProcessor::open("scan.jpg")?
///     .rotate_ccw(90)
///     .resize_exact(595, 842)
///     .into_rgb(Rgb::WHITE);
/// ```
pub struct ImageProcessor {
    /// The current working image.
    image: DynamicImage,
}

impl ImageProcessor {
    // -- Construction ---------------------------------------------------------

    /// Load an image from a file path.
    ///
    /// Any failure (missing file, unreadable, unsupported format) is reported
    /// as [`FolioError::Decode`] naming the path.
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn open(path: impl AsRef<Path>) -> Result<Self, FolioError> {
        let path = path.as_ref();
        let img = image::open(path).map_err(|err| FolioError::Decode {
            index: None,
            source_path: path.to_path_buf(),
            reason: err.to_string(),
        })?;
        info!(width = img.width(), height = img.height(), "Image loaded");
        Ok(Self { image: img })
    }

    /// Wrap an already-decoded `DynamicImage`.
    pub fn from_dynamic(image: DynamicImage) -> Self {
        Self { image }
    }

    // -- Accessors ------------------------------------------------------------

    /// Current image width in pixels.
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    /// Current image height in pixels.
    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// Consume the processor and return the underlying `DynamicImage`.
    pub fn into_dynamic(self) -> DynamicImage {
        self.image
    }

    // -- Transformations (consume self, return new Self) -----------------------

    /// Rotate counter-clockwise by `degrees`, expanding the canvas so no
    /// content is cropped.
    ///
    /// Multiples of 90 use lossless pixel rotation. Other angles draw the
    /// image onto a transparent canvas sized to the rotated bounding box and
    /// rotate it with bilinear interpolation; the uncovered corners stay
    /// transparent until [`ImageProcessor::into_rgb`] flattens them.
    #[instrument(skip(self), fields(degrees))]
    pub fn rotate_ccw(self, degrees: u16) -> Self {
        let normalised = degrees % 360;
        match normalised {
            0 => return self,
            // `image` rotates clockwise.
            90 => {
                return Self {
                    image: self.image.rotate270(),
                };
            }
            180 => {
                return Self {
                    image: self.image.rotate180(),
                };
            }
            270 => {
                return Self {
                    image: self.image.rotate90(),
                };
            }
            _ => {}
        }

        info!(degrees = normalised, "Rotating image by arbitrary angle");

        let (src_w, src_h) = (self.image.width(), self.image.height());
        let (out_w, out_h) = rotated_bounds(src_w, src_h, normalised);

        // The working canvas must hold both the source and the rotated
        // bounding box; it is cropped back to the bounding box afterwards.
        let (work_w, work_h) = (out_w.max(src_w), out_h.max(src_h));
        let mut canvas = RgbaImage::from_pixel(work_w, work_h, Rgba([255, 255, 255, 0]));
        image::imageops::overlay(
            &mut canvas,
            &self.image.to_rgba8(),
            i64::from((work_w - src_w) / 2),
            i64::from((work_h - src_h) / 2),
        );

        // imageproc rotates clockwise, so negate for counter-clockwise.
        let radians = -f32::from(normalised).to_radians();
        let rotated = geometric_transformations::rotate_about_center(
            &canvas,
            radians,
            Interpolation::Bilinear,
            Rgba([255, 255, 255, 0]),
        );

        let cropped = image::imageops::crop_imm(
            &rotated,
            (work_w - out_w) / 2,
            (work_h - out_h) / 2,
            out_w,
            out_h,
        )
        .to_image();

        debug!(out_w, out_h, "General rotation applied");
        Self {
            image: DynamicImage::ImageRgba8(cropped),
        }
    }

    /// Resize the image to exactly `width` x `height`, ignoring aspect ratio.
    /// Uses Lanczos3 filtering so downscaled photographs stay legible.
    #[instrument(skip(self), fields(width, height))]
    pub fn resize_exact(self, width: u32, height: u32) -> Self {
        debug!(
            from_w = self.image.width(),
            from_h = self.image.height(),
            "Resizing image"
        );
        let resized = self.image.resize_exact(width, height, FilterType::Lanczos3);
        Self { image: resized }
    }

    /// Shrink the image to fit within `max_width` x `max_height`, preserving
    /// aspect ratio. Images already inside the box are left untouched.
    pub fn fit_within(self, max_width: u32, max_height: u32) -> Self {
        if self.image.width() <= max_width && self.image.height() <= max_height {
            return self;
        }
        let resized = self
            .image
            .resize(max_width, max_height, FilterType::Lanczos3);
        Self { image: resized }
    }

    // -- Output ---------------------------------------------------------------

    /// Flatten to opaque 8-bit RGB.
    ///
    /// Images with an alpha channel are composited onto `background`; all
    /// other colour types are channel-mapped by `image`.
    pub fn into_rgb(self, background: Rgb) -> RgbImage {
        if !self.image.color().has_alpha() {
            return self.image.to_rgb8();
        }

        let rgba = self.image.to_rgba8();
        let Rgb(bg) = background;
        RgbImage::from_fn(rgba.width(), rgba.height(), |x, y| {
            let Rgba([r, g, b, a]) = *rgba.get_pixel(x, y);
            let blend = |channel: u8, under: u8| -> u8 {
                let a = u32::from(a);
                ((u32::from(channel) * a + u32::from(under) * (255 - a) + 127) / 255) as u8
            };
            image::Rgb([blend(r, bg[0]), blend(g, bg[1]), blend(b, bg[2])])
        })
    }

    /// Write the image to a file. The format is inferred from the file extension.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), FolioError> {
        self.image.save(path.as_ref()).map_err(|err| FolioError::Write {
            path: path.as_ref().to_path_buf(),
            reason: err.to_string(),
        })
    }
}

/// Bounding box of a `width` x `height` image rotated by `degrees`.
pub fn rotated_bounds(width: u32, height: u32, degrees: u16) -> (u32, u32) {
    let radians = f64::from(degrees % 360).to_radians();
    let (sin, cos) = (radians.sin().abs(), radians.cos().abs());
    let (w, h) = (f64::from(width), f64::from(height));

    // Shave float noise so exact fits don't round up a whole pixel.
    let span = |v: f64| ((v - 1e-6).ceil().max(1.0)) as u32;
    (span(w * cos + h * sin), span(w * sin + h * cos))
}
