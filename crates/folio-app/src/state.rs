// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Session state — the roster being composed, the selected position, and the
// export settings. The roster is the only source of truth; the selection is a
// plain index that is re-derived after every structural change.

use std::path::PathBuf;

use folio_core::error::{FolioError, Result};
use folio_core::roster::selection_after_remove;
use folio_core::{ExportSettings, ImageEntry, Roster};

/// State owned by one interactive session.
#[derive(Debug, Clone, Default)]
pub struct AppState {
    /// Images in page order.
    pub roster: Roster,
    /// Currently selected roster position.
    pub selected: Option<usize>,
    /// Layout and output settings used on export.
    pub settings: ExportSettings,
}

impl AppState {
    pub fn new(settings: ExportSettings) -> Self {
        Self {
            roster: Roster::new(),
            selected: None,
            settings,
        }
    }

    /// Append images. Selects the first new image when nothing was selected.
    pub fn add_images(&mut self, paths: Vec<PathBuf>) -> usize {
        let first_new = self.roster.len();
        let added = self.roster.add(paths);
        if added > 0 && self.selected.is_none() {
            self.selected = Some(first_new);
        }
        added
    }

    pub fn select(&mut self, index: usize) -> Result<&ImageEntry> {
        let entry = self.roster.get(index).ok_or(FolioError::IndexOutOfRange {
            index,
            len: self.roster.len(),
        })?;
        self.selected = Some(index);
        Ok(entry)
    }

    /// Remove `target` (or the selection) and keep the selection on the same
    /// slot, clamped to the new end of the list.
    pub fn remove(&mut self, target: Option<usize>) -> Result<ImageEntry> {
        let index = self.target(target)?;
        let removed = self.roster.remove_at(index)?;
        self.selected = match self.selected {
            Some(sel) if sel > index => Some(sel - 1),
            Some(sel) if sel == index => selection_after_remove(index, self.roster.len()),
            other => other,
        };
        Ok(removed)
    }

    /// Move `target` (or the selection) one place up; the selection follows
    /// the moved entry.
    pub fn move_up(&mut self, target: Option<usize>) -> Result<usize> {
        let index = self.target(target)?;
        let new_index = self.roster.move_up(index)?;
        self.follow_swap(index, new_index);
        Ok(new_index)
    }

    /// Move `target` (or the selection) one place down; the selection
    /// follows the moved entry.
    pub fn move_down(&mut self, target: Option<usize>) -> Result<usize> {
        let index = self.target(target)?;
        let new_index = self.roster.move_down(index)?;
        self.follow_swap(index, new_index);
        Ok(new_index)
    }

    pub fn rotate(&mut self, target: Option<usize>, delta_degrees: i64) -> Result<&ImageEntry> {
        let index = self.target(target)?;
        self.roster.rotate(index, delta_degrees)
    }

    pub fn selected_entry(&self) -> Option<&ImageEntry> {
        self.selected.and_then(|i| self.roster.get(i))
    }

    /// Resolve an explicit position or fall back to the selection.
    fn target(&self, explicit: Option<usize>) -> Result<usize> {
        explicit
            .or(self.selected)
            .ok_or_else(|| FolioError::InvalidArgument("no image selected".into()))
    }

    fn follow_swap(&mut self, from: usize, to: usize) {
        if from == to {
            return;
        }
        self.selected = match self.selected {
            Some(sel) if sel == from => Some(to),
            Some(sel) if sel == to => Some(from),
            other => other,
        };
    }
}
