// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Folio — assemble, reorder, and rotate raster images into a single PDF
//
// Entry point. Initialises logging, parses the command line, and either builds
// a PDF in one shot, opens the interactive shell, or inspects an existing PDF.

mod commands;
mod services;
mod shell;
mod state;

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use folio_core::human_errors::humanize_error;
use folio_core::{ExportSettings, FolioError, PaperSize};

use services::app_services::{AppServices, load_settings_from};
use state::AppState;

const MM_PER_PT: f32 = 25.4 / 72.0;

#[derive(Parser, Debug)]
#[command(
    name = "folio",
    version,
    about = "Assemble, reorder, and rotate images into a single multi-page PDF",
    arg_required_else_help = true
)]
struct Cli {
    /// Log debug detail to stderr.
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Read export settings from this JSON file instead of the saved ones.
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Build a PDF from images, one page per image, in the order given.
    Build(BuildArgs),
    /// Compose a document interactively.
    Shell,
    /// Show the page count and page sizes of a PDF.
    Info {
        /// PDF to inspect.
        pdf: PathBuf,
    },
}

#[derive(Args, Debug)]
struct BuildArgs {
    /// Images to place, first page first.
    #[arg(required = true, value_name = "IMAGE")]
    images: Vec<PathBuf>,

    /// Where to write the PDF.
    #[arg(short, long, value_name = "FILE")]
    output: PathBuf,

    /// Scale every image onto a fixed paper size instead of keeping its own size.
    #[arg(long)]
    fit: bool,

    /// Paper size for --fit: a4, a3, a5, letter, legal, tabloid, or WxH in points.
    #[arg(long, value_parser = parse_paper)]
    paper: Option<PaperSize>,

    /// Rotate image N by DEG degrees counter-clockwise (repeatable).
    #[arg(long = "rotate", value_name = "N:DEG", value_parser = parse_rotation)]
    rotations: Vec<(usize, i64)>,

    /// Document title stored in the PDF metadata.
    #[arg(long)]
    title: Option<String>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)))
        .with_writer(std::io::stderr)
        .init();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            match err.downcast_ref::<FolioError>() {
                Some(folio_err) => {
                    let human = humanize_error(folio_err);
                    eprintln!("{}", human.message);
                    eprintln!("  {}", human.suggestion);
                    tracing::debug!(error = %folio_err, "command failed");
                }
                None => eprintln!("error: {err:#}"),
            }
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let svc = AppServices::init();
    let settings = match &cli.config {
        Some(path) => load_settings_from(path)
            .with_context(|| format!("failed to read settings from {}", path.display()))?,
        None => svc.settings(),
    };

    match cli.command {
        Commands::Build(args) => build(&svc, settings, args),
        Commands::Shell => {
            let mut state = AppState::new(settings);
            shell::run_stdio(&svc, &mut state).context("shell input/output failed")
        }
        Commands::Info { pdf } => info(&svc, &pdf),
    }
}

fn build(svc: &AppServices, settings: ExportSettings, args: BuildArgs) -> Result<()> {
    let state = prepare_build(settings, &args)?;
    let pages = svc.export(&state, &args.output)?;
    println!("Wrote {pages} page(s) to {}", args.output.display());
    Ok(())
}

/// Session equivalent to the build flags, ready for export.
fn prepare_build(mut settings: ExportSettings, args: &BuildArgs) -> Result<AppState> {
    if args.fit {
        settings.set_fit_to_page(true);
    }
    if let Some(paper) = args.paper {
        settings.paper_size = paper;
    }
    if args.title.is_some() {
        settings.title = args.title.clone();
    }

    let mut state = AppState::new(settings);
    state.add_images(args.images.clone());
    for &(index, degrees) in &args.rotations {
        state.rotate(Some(index), degrees)?;
    }
    Ok(state)
}

fn info(svc: &AppServices, pdf: &Path) -> Result<()> {
    let summary = svc.inspect(pdf)?;
    println!("{}: {} page(s)", pdf.display(), summary.pages);
    for (i, (w, h)) in summary.sizes.iter().enumerate() {
        println!(
            "  {:>3}. {w:.0} x {h:.0} pt ({:.0} x {:.0} mm)",
            i + 1,
            w * MM_PER_PT,
            h * MM_PER_PT
        );
    }
    let images: Vec<String> = summary.images.iter().map(|(w, h)| format!("{w}x{h}")).collect();
    println!("Embedded images (px): {}", images.join(", "));
    Ok(())
}

fn parse_paper(value: &str) -> Result<PaperSize> {
    match PaperSize::from_name(value) {
        Some(paper) => Ok(paper),
        None => bail!("unknown paper size `{value}`"),
    }
}

/// Parse `N:DEG` with a 1-based image number.
fn parse_rotation(value: &str) -> Result<(usize, i64)> {
    let Some((number, degrees)) = value.split_once(':') else {
        bail!("expected N:DEG, e.g. 2:90");
    };
    let number: usize = number.trim().parse().context("image number must be a positive integer")?;
    if number == 0 {
        bail!("image numbers start at 1");
    }
    let degrees: i64 = degrees.trim().parse().context("angle must be a whole number of degrees")?;
    Ok((number - 1, degrees))
}
