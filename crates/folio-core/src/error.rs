// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for Folio.

use std::path::PathBuf;

use thiserror::Error;

/// Top-level error type for all Folio operations.
#[derive(Debug, Error)]
pub enum FolioError {
    // -- Roster errors --
    #[error("index {index} is out of range (roster has {len} entries)")]
    IndexOutOfRange { index: usize, len: usize },

    // -- Assembly errors --
    /// A source image could not be read or decoded. `index` is the roster
    /// position when the failure happened during assembly.
    #[error("{} could not be decoded{}: {reason}", .source_path.display(), entry_suffix(.index))]
    Decode {
        index: Option<usize>,
        source_path: PathBuf,
        reason: String,
    },

    #[error("no images to export")]
    EmptyInput,

    #[error("failed to write {}: {reason}", .path.display())]
    Write { path: PathBuf, reason: String },

    // -- Processing errors --
    #[error("image processing failed: {0}")]
    ImageError(String),

    #[error("PDF operation failed: {0}")]
    PdfError(String),

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    // -- Storage --
    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl FolioError {
    /// Attach a roster position to a decode failure. Other variants are
    /// returned unchanged.
    pub fn at_entry(self, position: usize) -> Self {
        match self {
            Self::Decode {
                source_path,
                reason,
                ..
            } => Self::Decode {
                index: Some(position),
                source_path,
                reason,
            },
            other => other,
        }
    }
}

fn entry_suffix(index: &Option<usize>) -> String {
    match index {
        Some(i) => format!(" (entry {})", i + 1),
        None => String::new(),
    }
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, FolioError>;
