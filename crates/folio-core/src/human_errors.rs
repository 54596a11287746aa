// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Human-readable error messages for the interactive shell.
//
// Every technical error is mapped to plain English with a clear suggestion.
// The severity level drives how the shell presents it.

use crate::error::FolioError;

/// Severity of an error from the user's perspective.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// The command was ignored; nothing changed.
    Notice,
    /// User must do something (pick another file, choose another folder).
    ActionRequired,
    /// Cannot be fixed by the user — internal problem.
    Permanent,
}

/// A human-readable error with plain English message and actionable suggestion.
#[derive(Debug, Clone)]
pub struct HumanError {
    /// Plain English summary.
    pub message: String,
    /// What the user should try.
    pub suggestion: String,
    /// Severity level.
    pub severity: Severity,
}

/// Convert a `FolioError` into a `HumanError`.
pub fn humanize_error(err: &FolioError) -> HumanError {
    match err {
        FolioError::IndexOutOfRange { index, len } => HumanError {
            message: format!("There is no image number {}.", index + 1),
            suggestion: if *len == 0 {
                "The list is empty. Add some images first.".into()
            } else {
                format!("Pick a number between 1 and {len}.")
            },
            severity: Severity::Notice,
        },

        FolioError::Decode {
            index, source_path, ..
        } => HumanError {
            message: match index {
                Some(i) => format!(
                    "Image {} ({}) couldn't be opened.",
                    i + 1,
                    source_path.display()
                ),
                None => format!("{} couldn't be opened.", source_path.display()),
            },
            suggestion: "The file may be missing, damaged, or not an image. Remove it from the list or replace it, then export again.".into(),
            severity: Severity::ActionRequired,
        },

        FolioError::EmptyInput => HumanError {
            message: "There are no images to put in the PDF.".into(),
            suggestion: "Add at least one image, then export again.".into(),
            severity: Severity::ActionRequired,
        },

        FolioError::Write { path, reason } => HumanError {
            message: format!("The PDF couldn't be saved to {}.", path.display()),
            suggestion: format!(
                "Check that the folder exists, that you can write to it, and that the disk isn't full. ({reason})"
            ),
            severity: Severity::ActionRequired,
        },

        FolioError::ImageError(_) => HumanError {
            message: "There's a problem with this image.".into(),
            suggestion: "The image may be damaged or in an unusual format. Try saving it as a JPEG or PNG first.".into(),
            severity: Severity::Permanent,
        },

        FolioError::PdfError(_) => HumanError {
            message: "There's a problem with this PDF file.".into(),
            suggestion: "The file may be damaged or not a PDF. Try opening it in a PDF viewer to check.".into(),
            severity: Severity::Permanent,
        },

        FolioError::InvalidArgument(detail) => HumanError {
            message: "That command wasn't understood.".into(),
            suggestion: format!("Type `help` to see the available commands. ({detail})"),
            severity: Severity::Notice,
        },

        FolioError::Io(io_err) => {
            if io_err.kind() == std::io::ErrorKind::NotFound {
                HumanError {
                    message: "The file couldn't be found.".into(),
                    suggestion: "It may have been moved or deleted. Check the path and try again.".into(),
                    severity: Severity::ActionRequired,
                }
            } else if io_err.kind() == std::io::ErrorKind::PermissionDenied {
                HumanError {
                    message: "Folio doesn't have permission to use that file.".into(),
                    suggestion: "Check the file permissions, or try a different location.".into(),
                    severity: Severity::ActionRequired,
                }
            } else {
                HumanError {
                    message: "There was a problem reading or writing a file.".into(),
                    suggestion: "Try again. If this keeps happening, your disk may be full.".into(),
                    severity: Severity::ActionRequired,
                }
            }
        }

        FolioError::Serialization(_) => HumanError {
            message: "The settings file couldn't be read.".into(),
            suggestion: "Check that it is valid JSON, or delete it to go back to the defaults.".into(),
            severity: Severity::ActionRequired,
        },
    }
}
