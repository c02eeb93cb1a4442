// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Scanwash — scanned PDF watermark remover.
//
// Entry point. Parses arguments, initialises logging, runs the cleaning
// pipeline, exports the result, and prints the summary.

mod report;

use std::path::PathBuf;
use std::process::ExitCode;
use std::str::FromStr;

use clap::Parser;
use scanwash_core::error::ScanwashError;
use scanwash_core::human_errors::humanize_error;
use scanwash_core::{Dpi, ExportFormat, ExportSummary, RunConfig, WatermarkProfile};
use scanwash_document::export::{check_output_target, derive_output_path};
use scanwash_document::{Exporter, PageRasterizer, PdfiumRasterizer, Pipeline, ScanDocument};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::LevelFilter;

/// Exit status for invalid options, matching clap's own usage errors.
const EXIT_CONFIG: u8 = 2;

#[derive(Parser, Debug)]
#[command(name = "scanwash")]
#[command(version)]
#[command(about = "Remove CamScanner watermarks from scanned PDFs", long_about = None)]
struct Cli {
    /// Input PDF file
    #[arg(value_name = "FILE")]
    input: PathBuf,

    /// Output format: pdf, png (one file per page), or tif (multi-page)
    #[arg(long, default_value_t = ExportFormat::Pdf, value_parser = ExportFormat::from_str)]
    format: ExportFormat,

    /// Resolution for png/tif output (72-1200)
    #[arg(long, default_value_t = Dpi::default(), value_parser = Dpi::from_str)]
    dpi: Dpi,

    /// Output path (PNG: base name for the page files)
    #[arg(short, long, value_name = "PATH")]
    output: Option<PathBuf>,

    /// Show debug logging (applied on top of RUST_LOG)
    #[arg(long)]
    debug: bool,

    /// JSON watermark profile overriding the built-in signatures
    #[arg(long, value_name = "FILE")]
    profile: Option<PathBuf>,
}

impl Cli {
    fn into_config(self) -> Result<RunConfig, ScanwashError> {
        let profile = match &self.profile {
            Some(path) => WatermarkProfile::load_json(path)?,
            None => WatermarkProfile::default(),
        };
        Ok(RunConfig {
            input: self.input,
            format: self.format,
            dpi: self.dpi,
            output: self.output,
            debug: self.debug,
            profile,
        })
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.debug);

    match cli.into_config().and_then(|config| run(&config)) {
        Ok(summary) if summary.is_success() => ExitCode::SUCCESS,
        Ok(summary) => {
            error!(pages = ?summary.failed_pages(), "Some pages could not be exported");
            ExitCode::FAILURE
        }
        Err(err) => {
            error!(error = %err, "Scanwash failed");
            let human = humanize_error(&err);
            eprintln!("\n{}\n{}", human.message, human.suggestion);
            if err.is_config() {
                ExitCode::from(EXIT_CONFIG)
            } else {
                ExitCode::FAILURE
            }
        }
    }
}

fn init_tracing(debug: bool) {
    let env = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    tracing_subscriber::fmt()
        .with_env_filter(log_filter(env.as_deref(), debug))
        .init();
}

/// `RUST_LOG` directives, or `info` when unset or invalid. `--debug` sets
/// the global level to debug whatever `RUST_LOG` says.
fn log_filter(env: Option<&str>, debug: bool) -> EnvFilter {
    let filter = env
        .and_then(|directives| EnvFilter::try_new(directives).ok())
        .unwrap_or_else(|| EnvFilter::new("info"));
    if debug {
        filter.add_directive(LevelFilter::DEBUG.into())
    } else {
        filter
    }
}

/// Clean one document and export it.
fn run(config: &RunConfig) -> Result<ExportSummary, ScanwashError> {
    let target = output_target(config);
    check_output_target(&target)?;
    let pipeline = Pipeline::new(&config.profile)?;

    println!("{}", report::banner());
    info!("Input:  {}", config.input.display());
    info!("Output: {}", target.display());

    let mut document = ScanDocument::open(&config.input)?;
    info!("Loaded {} pages", document.page_count());

    let stats = pipeline.run(&mut document);

    let rasterizer = if config.format.is_raster() {
        Some(PdfiumRasterizer::bind()?)
    } else {
        None
    };
    let exporter = Exporter::new(config.format, config.dpi);
    let summary = exporter.export(
        &mut document,
        &target,
        rasterizer.as_ref().map(|r| r as &dyn PageRasterizer),
    )?;

    println!("{}", report::summary(&stats, &summary, config.dpi));
    Ok(summary)
}

/// `--output` if given, otherwise a name derived from the input.
fn output_target(config: &RunConfig) -> PathBuf {
    config
        .output
        .clone()
        .unwrap_or_else(|| derive_output_path(&config.input, config.format))
}
