// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Interactive shell commands — parsing one input line into a `Command`.
//
// Image numbers are 1-based on the command line and converted to 0-based
// roster positions here. Omitting a number means "the selected image".

use std::path::PathBuf;

use folio_core::PaperSize;
use folio_core::error::{FolioError, Result};

/// Degrees turned by one `left`/`right` command.
pub const QUARTER_TURN: i64 = 90;

/// One shell command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Add(Vec<PathBuf>),
    List,
    Select(usize),
    Remove(Option<usize>),
    MoveUp(Option<usize>),
    MoveDown(Option<usize>),
    Rotate {
        target: Option<usize>,
        degrees: i64,
    },
    Fit(bool),
    Paper(PaperSize),
    Title(Option<String>),
    Preview(Option<PathBuf>),
    Export(PathBuf),
    SaveSettings,
    Help,
    Quit,
}

pub const HELP: &str = "\
Commands (N is an image number from `list`; omit it to use the selection):
  add PATH...          add images to the end of the list
  list                 show the list
  select N             select an image
  remove [N]           remove an image
  up [N] / down [N]    move an image one place
  left [N] / right [N] rotate a quarter turn counter-clockwise / clockwise
  rotate DEG [N]       rotate by DEG degrees (counter-clockwise positive)
  fit on|off           fit pages to the paper size, or keep natural size
  paper NAME           a4, a3, a5, letter, legal, tabloid, or WxH in points
  title [TEXT]         set or clear the PDF title
  preview [FILE]       write a preview of the selection (default preview.png)
  export FILE          write the PDF
  save                 remember the current settings
  help                 show this text
  quit                 leave";

/// Parse one line. Returns `Ok(None)` for blank lines.
pub fn parse(line: &str) -> Result<Option<Command>> {
    let words = split_words(line)?;
    let Some((head, args)) = words.split_first() else {
        return Ok(None);
    };

    let command = match head.to_ascii_lowercase().as_str() {
        "add" => {
            if args.is_empty() {
                return Err(invalid("add needs at least one path"));
            }
            Command::Add(args.iter().map(PathBuf::from).collect())
        }
        "list" | "ls" => Command::List,
        "select" | "sel" => Command::Select(required_number(args.first())?),
        "remove" | "rm" => Command::Remove(optional_number(args.first())?),
        "up" => Command::MoveUp(optional_number(args.first())?),
        "down" => Command::MoveDown(optional_number(args.first())?),
        "left" => Command::Rotate {
            target: optional_number(args.first())?,
            degrees: QUARTER_TURN,
        },
        "right" => Command::Rotate {
            target: optional_number(args.first())?,
            degrees: -QUARTER_TURN,
        },
        "rotate" => {
            let degrees = args
                .first()
                .ok_or_else(|| invalid("rotate needs an angle"))?
                .parse::<i64>()
                .map_err(|_| invalid("angle must be a whole number of degrees"))?;
            Command::Rotate {
                target: optional_number(args.get(1))?,
                degrees,
            }
        }
        "fit" => match args.first().map(|a| a.to_ascii_lowercase()).as_deref() {
            Some("on") | Some("yes") | Some("a4") => Command::Fit(true),
            Some("off") | Some("no") => Command::Fit(false),
            _ => return Err(invalid("use `fit on` or `fit off`")),
        },
        "paper" => {
            let name = args.first().ok_or_else(|| invalid("paper needs a size"))?;
            Command::Paper(
                PaperSize::from_name(name).ok_or_else(|| invalid(&format!("unknown paper size `{name}`")))?,
            )
        }
        "title" => Command::Title(if args.is_empty() {
            None
        } else {
            Some(args.join(" "))
        }),
        "preview" => Command::Preview(args.first().map(PathBuf::from)),
        "export" => Command::Export(PathBuf::from(
            args.first().ok_or_else(|| invalid("export needs an output file"))?,
        )),
        "save" => Command::SaveSettings,
        "help" | "?" => Command::Help,
        "quit" | "exit" | "q" => Command::Quit,
        other => return Err(invalid(&format!("unknown command `{other}`"))),
    };
    Ok(Some(command))
}

fn invalid(detail: &str) -> FolioError {
    FolioError::InvalidArgument(detail.to_string())
}

fn required_number(arg: Option<&String>) -> Result<usize> {
    optional_number(arg)?.ok_or_else(|| invalid("an image number is required"))
}

/// Convert a 1-based image number to a roster position.
fn optional_number(arg: Option<&String>) -> Result<Option<usize>> {
    match arg {
        None => Ok(None),
        Some(text) => match text.parse::<usize>() {
            Ok(n) if n >= 1 => Ok(Some(n - 1)),
            _ => Err(invalid(&format!("`{text}` is not an image number"))),
        },
    }
}

/// Split on whitespace, keeping double-quoted runs together so paths with
/// spaces survive.
fn split_words(line: &str) -> Result<Vec<String>> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut has_word = false;

    for ch in line.chars() {
        match ch {
            '"' => {
                in_quotes = !in_quotes;
                has_word = true;
            }
            c if c.is_whitespace() && !in_quotes => {
                if has_word {
                    words.push(std::mem::take(&mut current));
                    has_word = false;
                }
            }
            c => {
                current.push(c);
                has_word = true;
            }
        }
    }

    if in_quotes {
        return Err(invalid("unterminated quote"));
    }
    if has_word {
        words.push(current);
    }
    Ok(words)
}
