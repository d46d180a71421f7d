// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Pagesnap — capture a paginated on-screen document viewer into an offline PDF.
//
// Entry point. Initialises logging, collects the run parameters, then drives
// the session controller through one or more acquisition batches, saving the
// assembled PDF after each.

mod setup;

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

use pagesnap_capture::{CaptureSession, EngineConfig, EnigoPointer, PageAcquisitionEngine, XcapCapture};
use pagesnap_core::RunConfig;
use pagesnap_core::error::Result;
use pagesnap_document::PdfAssembler;

/// Capture a paginated on-screen document viewer into a single offline PDF.
///
/// Parameters not given as flags are collected interactively; the capture
/// region and the next-page click point are always picked with the mouse.
#[derive(Debug, Parser)]
#[command(name = "pagesnap", version, about)]
struct Cli {
    /// Number of pages to capture in the first batch.
    #[arg(long)]
    pages: Option<u32>,

    /// Settle time in seconds between a page change and the capture.
    #[arg(long)]
    delay: Option<f64>,

    /// Output PDF path (default: capture_<timestamp>.pdf in the working
    /// directory).
    #[arg(long)]
    output: Option<PathBuf>,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    if let Err(err) = run(Cli::parse()) {
        tracing::error!(error = %err, "pagesnap failed");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    println!("==============================================");
    println!("  PAGESNAP — on-screen document -> offline PDF");
    println!("==============================================\n");
    println!("Before starting:");
    println!("- Open the document in its viewer.");
    println!("- Bring the first page fully into the area you will capture.");
    println!("- Close any popups or overlays that could cover the pages.\n");

    let num_pages = match cli.pages.filter(|&n| n >= 1) {
        Some(n) => n,
        None => setup::ask_count("How many pages do you want to capture?", 1)?,
    };
    let min_delay_secs = match cli.delay.filter(|d| d.is_finite() && *d >= 0.0) {
        Some(d) => d,
        None => setup::ask_delay("Settle time between page change and capture (seconds)?")?,
    };

    let pointer = EnigoPointer::new()?;
    let region = setup::choose_capture_region(&pointer)?;
    let advance = setup::choose_advance_point(&pointer)?;
    let output_path = setup::resolve_output_path(cli.output)?;

    let config = RunConfig {
        num_pages,
        min_delay_secs,
        region,
        advance,
        output_path,
    };
    config.validate()?;

    println!("\nThe final PDF will be saved to:\n  {}\n", config.output_path.display());
    setup::pause("When ready, bring up the FIRST page and press Enter to start...")?;

    let engine = PageAcquisitionEngine::new(
        XcapCapture::new(),
        pointer,
        EngineConfig::new(
            config.region,
            config.advance,
            Duration::from_secs_f64(config.min_delay_secs),
        ),
    );
    let mut session = CaptureSession::new(engine);
    let assembler = PdfAssembler::new().with_title("Pagesnap Capture");

    session.run_batch(config.num_pages);

    // Save, report, and keep offering to resume until the user declines.
    loop {
        match assembler.save(session.pages(), &config.output_path) {
            Ok(pages) => {
                println!("\nPDF written: {} ({pages} pages)", config.output_path.display());
            }
            Err(err) => {
                tracing::error!(error = %err, "saving the PDF failed");
            }
        }

        if !session.skipped().is_empty() {
            println!("\nSkipped pages (failed validation): {:?}", session.skipped());
        }

        println!("\n--- CONTINUE? ---");
        if !setup::confirm("Capture more pages?")? {
            println!("Done.");
            break;
        }

        let extra = setup::ask_count("How many additional pages?", 1)?;
        session.run_additional(extra);
    }

    Ok(())
}
