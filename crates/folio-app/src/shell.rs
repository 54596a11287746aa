// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Interactive shell — reads commands line by line, applies them to the
// session, and reports results. Every error is shown as a human-readable
// message and the session carries on.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use folio_core::error::Result;
use folio_core::human_errors::{Severity, humanize_error};
use folio_core::{FolioError, PageLayoutMode};

use crate::commands::{self, Command, HELP};
use crate::services::app_services::AppServices;
use crate::state::AppState;

const DEFAULT_PREVIEW: &str = "preview.png";

/// Whether the loop should keep reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Quit,
}

/// Run the shell until `quit` or end of input.
pub fn run<R: BufRead, W: Write>(
    svc: &AppServices,
    state: &mut AppState,
    input: R,
    out: &mut W,
    interactive: bool,
) -> io::Result<()> {
    if interactive {
        writeln!(out, "Folio — type `help` for commands.")?;
    }

    let mut lines = input.lines();
    loop {
        if interactive {
            write!(out, "folio> ")?;
            out.flush()?;
        }
        let Some(line) = lines.next() else {
            break;
        };
        let line = line?;

        let result = commands::parse(&line).and_then(|parsed| match parsed {
            Some(command) => execute(svc, state, command, out),
            None => Ok(Flow::Continue),
        });

        match result {
            Ok(Flow::Quit) => break,
            Ok(Flow::Continue) => {}
            Err(err) => report(&err, out)?,
        }
    }
    Ok(())
}

fn execute<W: Write>(svc: &AppServices, state: &mut AppState, command: Command, out: &mut W) -> Result<Flow> {
    tracing::debug!(?command, "shell command");
    match command {
        Command::Add(paths) => {
            let added = state.add_images(paths);
            say(out, format!("Added {added} image(s); {} in total.", state.roster.len()))?;
        }
        Command::List => list(state, out)?,
        Command::Select(index) => {
            let name = state.select(index)?.display_name();
            say(out, format!("Selected {}: {name}", index + 1))?;
        }
        Command::Remove(target) => {
            let removed = state.remove(target)?;
            say(out, format!("Removed {}.", removed.display_name()))?;
        }
        Command::MoveUp(target) => {
            let new_index = state.move_up(target)?;
            say(out, format!("Now at position {}.", new_index + 1))?;
        }
        Command::MoveDown(target) => {
            let new_index = state.move_down(target)?;
            say(out, format!("Now at position {}.", new_index + 1))?;
        }
        Command::Rotate { target, degrees } => {
            let entry = state.rotate(target, degrees)?;
            say(
                out,
                format!("{} is now turned {}°.", entry.display_name(), entry.effective_rotation()),
            )?;
        }
        Command::Fit(enabled) => {
            state.settings.set_fit_to_page(enabled);
            say(out, describe_layout(&state.settings.layout_mode()))?;
        }
        Command::Paper(paper) => {
            state.settings.paper_size = paper;
            let (w, h) = paper.dimensions_pt();
            say(out, format!("Paper set to {w}×{h} pt."))?;
        }
        Command::Title(title) => {
            state.settings.title = title;
        }
        Command::Preview(path) => {
            let path = path.unwrap_or_else(|| PathBuf::from(DEFAULT_PREVIEW));
            let (w, h) = svc.preview(state, &path)?;
            say(out, format!("Preview ({w}×{h}) written to {}.", path.display()))?;
        }
        Command::Export(path) => {
            let pages = svc.export(state, &path)?;
            say(out, format!("PDF with {pages} page(s) saved to {}.", path.display()))?;
        }
        Command::SaveSettings => {
            let path = svc.save_settings(&state.settings)?;
            say(out, format!("Settings saved to {}.", path.display()))?;
        }
        Command::Help => say(out, HELP)?,
        Command::Quit => return Ok(Flow::Quit),
    }
    Ok(Flow::Continue)
}

fn list<W: Write>(state: &AppState, out: &mut W) -> Result<()> {
    if state.roster.is_empty() {
        return say(out, "No images yet. Use `add PATH...`.");
    }
    for (i, entry) in state.roster.iter().enumerate() {
        let marker = if state.selected == Some(i) { '>' } else { ' ' };
        let turn = match entry.effective_rotation() {
            0 => String::new(),
            deg => format!("  ({deg}°)"),
        };
        writeln!(out, "{marker} {:>3}. {}{turn}", i + 1, entry.display_name())?;
    }
    say(out, describe_layout(&state.settings.layout_mode()))
}

fn describe_layout(mode: &PageLayoutMode) -> String {
    match mode {
        PageLayoutMode::Natural => "Pages keep each image's own size.".into(),
        PageLayoutMode::FitToPage(page) => {
            format!("Pages are fitted to {}×{} pt.", page.width, page.height)
        }
    }
}

fn say<W: Write>(out: &mut W, text: impl AsRef<str>) -> Result<()> {
    writeln!(out, "{}", text.as_ref()).map_err(FolioError::Io)
}

fn report<W: Write>(err: &FolioError, out: &mut W) -> io::Result<()> {
    let human = humanize_error(err);
    match human.severity {
        Severity::Notice => tracing::debug!(error = %err, "command rejected"),
        _ => tracing::warn!(error = %err, "command failed"),
    }
    writeln!(out, "{}", human.message)?;
    writeln!(out, "  {}", human.suggestion)
}

/// Run the shell on stdin/stdout.
pub fn run_stdio(svc: &AppServices, state: &mut AppState) -> io::Result<()> {
    use std::io::IsTerminal;

    let stdin = io::stdin();
    let interactive = stdin.is_terminal();
    let mut stdout = io::stdout();
    run(svc, state, stdin.lock(), &mut stdout, interactive)
}
