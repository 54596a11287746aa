// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Core domain types for Folio.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// One image in the roster: where to load it from and how far it has been
/// turned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageEntry {
    source: PathBuf,
    /// Accumulated rotation in degrees, counter-clockwise positive. Never
    /// normalised on write.
    rotation: i64,
}

impl ImageEntry {
    pub fn new(source: impl Into<PathBuf>) -> Self {
        Self {
            source: source.into(),
            rotation: 0,
        }
    }

    pub fn source(&self) -> &Path {
        &self.source
    }

    /// Raw accumulated rotation as stored.
    pub fn rotation(&self) -> i64 {
        self.rotation
    }

    /// Rotation reduced into `[0, 360)`.
    pub fn effective_rotation(&self) -> u16 {
        self.rotation.rem_euclid(360) as u16
    }

    /// Add `delta` degrees. On overflow the stored value is first reduced
    /// mod 360, which keeps the effective angle intact.
    pub(crate) fn accumulate_rotation(&mut self, delta: i64) {
        self.rotation = match self.rotation.checked_add(delta) {
            Some(sum) => sum,
            None => self.rotation.rem_euclid(360) + delta.rem_euclid(360),
        };
    }

    /// File name for list displays, falling back to the full path.
    pub fn display_name(&self) -> String {
        self.source
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| self.source.display().to_string())
    }
}

/// An opaque 8-bit RGB colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgb(pub [u8; 3]);

impl Rgb {
    pub const WHITE: Rgb = Rgb([255, 255, 255]);
}

impl Default for Rgb {
    fn default() -> Self {
        Self::WHITE
    }
}

/// Largest page side a PDF viewer must support (200 inches), in points.
pub const MAX_PAGE_PT: u32 = 14_400;

/// Standard paper sizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaperSize {
    A4,
    A3,
    A5,
    Letter,
    Legal,
    Tabloid,
    Custom { width_pt: u32, height_pt: u32 },
}

impl PaperSize {
    /// Dimensions in PostScript points (width, height). Pages are rendered
    /// at one pixel per point.
    pub fn dimensions_pt(&self) -> (u32, u32) {
        match self {
            Self::A4 => (595, 842),
            Self::A3 => (842, 1191),
            Self::A5 => (420, 595),
            Self::Letter => (612, 792),
            Self::Legal => (612, 1008),
            Self::Tabloid => (792, 1224),
            Self::Custom {
                width_pt,
                height_pt,
            } => (*width_pt, *height_pt),
        }
    }

    /// Parse a paper keyword (`a4`, `letter`, ...) or `WIDTHxHEIGHT` in points.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "a4" => Some(Self::A4),
            "a3" => Some(Self::A3),
            "a5" => Some(Self::A5),
            "letter" => Some(Self::Letter),
            "legal" => Some(Self::Legal),
            "tabloid" | "ledger" => Some(Self::Tabloid),
            other => {
                let (w, h) = other.split_once('x')?;
                let width_pt: u32 = w.trim().parse().ok()?;
                let height_pt: u32 = h.trim().parse().ok()?;
                if !(1..=MAX_PAGE_PT).contains(&width_pt) || !(1..=MAX_PAGE_PT).contains(&height_pt) {
                    return None;
                }
                Some(Self::Custom {
                    width_pt,
                    height_pt,
                })
            }
        }
    }
}

/// Target page for fit-to-page layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageSpec {
    pub width: u32,
    pub height: u32,
    /// Fill for the area not covered by the image.
    pub background: Rgb,
}

impl PageSpec {
    pub fn from_paper(paper: PaperSize, background: Rgb) -> Self {
        let (width, height) = paper.dimensions_pt();
        Self {
            width,
            height,
            background,
        }
    }
}

impl Default for PageSpec {
    fn default() -> Self {
        Self::from_paper(PaperSize::A4, Rgb::WHITE)
    }
}

/// How each image becomes a page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PageLayoutMode {
    /// Page dimensions equal the rotated image's own dimensions.
    #[default]
    Natural,
    /// Scale and centre onto a fixed page, padding with the background.
    FitToPage(PageSpec),
}
