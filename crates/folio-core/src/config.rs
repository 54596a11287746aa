// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Export settings.

use serde::{Deserialize, Serialize};

use crate::types::{PageLayoutMode, PageSpec, PaperSize, Rgb};

/// Which layout the exporter uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LayoutChoice {
    #[default]
    Natural,
    FitToPage,
}

/// Settings the shell passes to the assembler on export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportSettings {
    /// Natural size or fit-to-page.
    pub layout: LayoutChoice,
    /// Page size used when `layout` is `FitToPage`.
    pub paper_size: PaperSize,
    /// Padding colour used when `layout` is `FitToPage`.
    pub background: [u8; 3],
    /// Title metadata embedded in the PDF /Info dictionary.
    pub title: Option<String>,
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self {
            layout: LayoutChoice::Natural,
            paper_size: PaperSize::A4,
            background: Rgb::WHITE.0,
            title: None,
        }
    }
}

impl ExportSettings {
    /// The layout mode these settings select.
    pub fn layout_mode(&self) -> PageLayoutMode {
        match self.layout {
            LayoutChoice::Natural => PageLayoutMode::Natural,
            LayoutChoice::FitToPage => {
                PageLayoutMode::FitToPage(PageSpec::from_paper(self.paper_size, Rgb(self.background)))
            }
        }
    }

    pub fn set_fit_to_page(&mut self, enabled: bool) {
        self.layout = if enabled {
            LayoutChoice::FitToPage
        } else {
            LayoutChoice::Natural
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_natural() {
        let settings = ExportSettings::default();
        assert_eq!(settings.layout_mode(), PageLayoutMode::Natural);
        assert_eq!(settings.layout, LayoutChoice::Natural);
    }

    #[test]
    fn fit_to_page_uses_paper_and_background() {
        let mut settings = ExportSettings {
            paper_size: PaperSize::Letter,
            background: [10, 20, 30],
            ..ExportSettings::default()
        };
        settings.set_fit_to_page(true);

        match settings.layout_mode() {
            PageLayoutMode::FitToPage(page) => {
                assert_eq!((page.width, page.height), (612, 792));
                assert_eq!(page.background, Rgb([10, 20, 30]));
            }
            other => panic!("expected fit-to-page, got {other:?}"),
        }
    }

    #[test]
    fn json_round_trip_and_partial_files() {
        let mut settings = ExportSettings::default();
        settings.set_fit_to_page(true);
        settings.title = Some("Receipts".into());

        let json = serde_json::to_string_pretty(&settings).unwrap();
        let back: ExportSettings = serde_json::from_str(&json).unwrap();
        assert_eq!(back, settings);

        let partial: ExportSettings = serde_json::from_str(r#"{"layout":"fit_to_page"}"#).unwrap();
        assert_eq!(partial.layout, LayoutChoice::FitToPage);
        assert_eq!(partial.paper_size, PaperSize::A4);
    }
}
