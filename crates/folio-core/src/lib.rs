// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Folio — Core types, the image roster, and error definitions shared across
// all crates.

pub mod config;
pub mod error;
pub mod human_errors;
pub mod roster;
pub mod types;

pub use config::ExportSettings;
pub use error::FolioError;
pub use roster::Roster;
pub use types::*;
