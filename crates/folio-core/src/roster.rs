// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Ordered image roster — the working set of images that becomes the pages of
// the exported document, in order. Pure in-memory state; no I/O.

use std::path::PathBuf;

use crate::error::{FolioError, Result};
use crate::types::ImageEntry;

/// Ordered collection of [`ImageEntry`] values addressed by position.
///
/// Positions shift on removal and reordering, so callers should hold an
/// index rather than a reference and update it from the return values of
/// [`Roster::remove_at`], [`Roster::move_up`] and [`Roster::move_down`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Roster {
    entries: Vec<ImageEntry>,
}

impl Roster {
    pub fn new() -> Self {
        Self::default()
    }

    // -- Mutation -------------------------------------------------------------

    /// Append one entry per path, in input order, each starting unrotated.
    /// Paths are not checked here; unreadable files fail at render time.
    pub fn add<I, P>(&mut self, paths: I) -> usize
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        let before = self.entries.len();
        self.entries.extend(paths.into_iter().map(ImageEntry::new));
        self.entries.len() - before
    }

    /// Remove the entry at `index`, shifting later entries left by one.
    pub fn remove_at(&mut self, index: usize) -> Result<ImageEntry> {
        self.check(index)?;
        Ok(self.entries.remove(index))
    }

    /// Swap the entry with its predecessor. Returns the entry's new index,
    /// which equals `index` when it is already first.
    pub fn move_up(&mut self, index: usize) -> Result<usize> {
        self.check(index)?;
        if index == 0 {
            return Ok(index);
        }
        self.entries.swap(index, index - 1);
        Ok(index - 1)
    }

    /// Swap the entry with its successor. Returns the entry's new index,
    /// which equals `index` when it is already last.
    pub fn move_down(&mut self, index: usize) -> Result<usize> {
        self.check(index)?;
        if index + 1 == self.entries.len() {
            return Ok(index);
        }
        self.entries.swap(index, index + 1);
        Ok(index + 1)
    }

    /// Add `delta_degrees` (counter-clockwise positive) to the entry's
    /// stored rotation.
    pub fn rotate(&mut self, index: usize, delta_degrees: i64) -> Result<&ImageEntry> {
        self.check(index)?;
        let entry = &mut self.entries[index];
        entry.accumulate_rotation(delta_degrees);
        Ok(entry)
    }

    // -- Inspection -----------------------------------------------------------

    pub fn get(&self, index: usize) -> Option<&ImageEntry> {
        self.entries.get(index)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ImageEntry> {
        self.entries.iter()
    }

    fn check(&self, index: usize) -> Result<()> {
        if index < self.entries.len() {
            Ok(())
        } else {
            Err(FolioError::IndexOutOfRange {
                index,
                len: self.entries.len(),
            })
        }
    }
}

impl<'a> IntoIterator for &'a Roster {
    type Item = &'a ImageEntry;
    type IntoIter = std::slice::Iter<'a, ImageEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// Index to select after removing position `removed`, given the roster's
/// length after removal: the same slot, clamped to the new last entry.
pub fn selection_after_remove(removed: usize, len_after: usize) -> Option<usize> {
    if len_after == 0 {
        None
    } else {
        Some(removed.min(len_after - 1))
    }
}
