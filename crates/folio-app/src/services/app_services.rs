// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// AppServices — the backend handle the shell and CLI talk to.
//
// Owns the decode service and the settings location. Export, preview and
// inspection go through here so the front ends never touch the document crate
// directly.

use std::path::{Path, PathBuf};

use folio_core::ExportSettings;
use folio_core::error::Result;
use folio_document::{FsImageDecoder, ImageProcessor, PdfReader, PdfWriter};
use tracing::{debug, info, warn};

use crate::services::data_dir;
use crate::state::AppState;

/// Longest side of a preview image, in pixels.
pub const PREVIEW_SIZE: u32 = 300;

const SETTINGS_FILE: &str = "settings.json";

/// Summary of an exported PDF.
#[derive(Debug, Clone, PartialEq)]
pub struct PdfSummary {
    pub pages: usize,
    /// Page sizes in points.
    pub sizes: Vec<(f32, f32)>,
    /// Pixel dimensions of the embedded page images, smallest first.
    pub images: Vec<(u32, u32)>,
}

#[derive(Debug, Clone)]
pub struct AppServices {
    config_dir: PathBuf,
    decoder: FsImageDecoder,
}

impl AppServices {
    /// Services rooted at the user's config directory.
    pub fn init() -> Self {
        Self::with_config_dir(data_dir::config_dir())
    }

    pub fn with_config_dir(config_dir: impl Into<PathBuf>) -> Self {
        Self {
            config_dir: config_dir.into(),
            decoder: FsImageDecoder,
        }
    }

    // -- Settings persistence -------------------------------------------------

    /// Settings saved by a previous `save`, or defaults. A broken file is
    /// reported and ignored.
    pub fn settings(&self) -> ExportSettings {
        let path = self.settings_path();
        if !path.exists() {
            return ExportSettings::default();
        }
        match load_settings_from(&path) {
            Ok(settings) => settings,
            Err(e) => {
                warn!(error = %e, path = %path.display(), "ignoring unreadable settings file");
                ExportSettings::default()
            }
        }
    }

    /// Persist `settings` for later sessions. Returns where they were written.
    pub fn save_settings(&self, settings: &ExportSettings) -> Result<PathBuf> {
        std::fs::create_dir_all(&self.config_dir)?;
        let path = self.settings_path();
        let json = serde_json::to_string_pretty(settings)?;
        std::fs::write(&path, json)?;
        debug!(path = %path.display(), "settings saved");
        Ok(path)
    }

    pub fn settings_path(&self) -> PathBuf {
        self.config_dir.join(SETTINGS_FILE)
    }

    // -- Document operations --------------------------------------------------

    /// Assemble the session's roster with its settings and write the PDF.
    /// Returns the number of pages written.
    pub fn export(&self, state: &AppState, output: &Path) -> Result<usize> {
        let writer = PdfWriter::new().with_title(state.settings.title.clone());
        let mode = state.settings.layout_mode();
        let pages = folio_document::export(&self.decoder, &writer, &state.roster, &mode, output)?;
        info!(pages, output = %output.display(), "PDF exported");
        Ok(pages)
    }

    /// Render the selected entry at preview size and save it as an image.
    /// Returns the preview's dimensions.
    pub fn preview(&self, state: &AppState, output: &Path) -> Result<(u32, u32)> {
        let entry = state.selected_entry().ok_or_else(|| {
            folio_core::FolioError::InvalidArgument("no image selected".into())
        })?;
        let preview = folio_document::render_preview(&self.decoder, entry, PREVIEW_SIZE, PREVIEW_SIZE)?;
        let dimensions = preview.dimensions();
        ImageProcessor::from_dynamic(image::DynamicImage::ImageRgb8(preview)).save(output)?;
        Ok(dimensions)
    }

    /// Page count and sizes of an existing PDF.
    pub fn inspect(&self, pdf: &Path) -> Result<PdfSummary> {
        let reader = PdfReader::open(pdf)?;
        Ok(PdfSummary {
            pages: reader.page_count(),
            sizes: reader.page_sizes()?,
            images: reader.image_sizes()?,
        })
    }
}

/// Read settings from an explicit JSON file.
pub fn load_settings_from(path: &Path) -> Result<ExportSettings> {
    let data = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&data)?)
}
