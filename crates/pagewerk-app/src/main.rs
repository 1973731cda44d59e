// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Pagewerk — reorder PDF pages for booklet printing.
//
// Entry point. Loads settings, initialises logging, collects input paths from
// arguments and drag-and-drop payloads, runs the batch, and prints a report.

mod paths;
mod report;
mod services;

use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;
use pagewerk_batch::BatchRunner;
use pagewerk_core::AppConfig;
use pagewerk_core::human_errors::humanize_error;
use pagewerk_core::types::BatchReport;
use pagewerk_document::PageReorderer;
use tracing::{debug, error, info, warn};

use services::config_store;

#[derive(Parser, Debug)]
#[command(name = "pagewerk")]
#[command(version)]
#[command(
    about = "Reorder PDF pages (swap each pair, then reverse) and save <name>_Reordered.pdf next to each input",
    long_about = None
)]
struct Cli {
    /// Input PDF files
    #[arg(value_name = "FILE")]
    files: Vec<PathBuf>,

    /// Raw drag-and-drop payload, e.g. "{/path/with space.pdf} /other.pdf"
    #[arg(long = "drop", value_name = "PAYLOAD")]
    drops: Vec<String>,

    /// Maximum number of documents processed at once (default: all at once)
    #[arg(short, long, value_name = "N", env = "PAGEWERK_JOBS")]
    jobs: Option<usize>,

    /// Stop waiting for unfinished documents after this many seconds
    #[arg(long, value_name = "SECS")]
    deadline: Option<u64>,

    /// Only accept files with a .pdf extension
    #[arg(long)]
    pdf_only: bool,

    /// Print the report as JSON
    #[arg(long)]
    json: bool,

    /// Settings file (default: <config dir>/pagewerk/config.json)
    #[arg(long, value_name = "FILE", env = "PAGEWERK_CONFIG")]
    config: Option<PathBuf>,

    /// Write the effective settings back to the settings file
    #[arg(long)]
    save_config: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let config_path = cli
        .config
        .clone()
        .unwrap_or_else(config_store::default_config_path);
    let loaded = config_store::load_config(&config_path);

    let log_filter = match &loaded {
        Ok(Some(config)) => config.log_filter.clone(),
        _ => AppConfig::default().log_filter,
    };
    init_tracing(&log_filter);

    let config = match loaded {
        Ok(Some(config)) => {
            debug!(path = %config_path.display(), "Settings loaded");
            config
        }
        Ok(None) => AppConfig::default(),
        Err(err) => {
            warn!(path = %config_path.display(), error = %err, "Ignoring unreadable settings file");
            AppConfig::default()
        }
    };

    let status = run(&cli, config, &config_path, &mut std::io::stdout().lock());
    ExitCode::from(status)
}

fn init_tracing(default_filter: &str) {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_filter)),
        )
        .with_writer(std::io::stderr)
        .init();
}

/// Run one batch and write the report to `out`. Returns the exit status.
fn run(cli: &Cli, mut config: AppConfig, config_path: &Path, out: &mut impl Write) -> u8 {
    if let Some(jobs) = cli.jobs {
        config.max_concurrency = Some(jobs.max(1));
    }
    if cli.pdf_only {
        config.require_pdf_extension = true;
    }
    if cli.save_config {
        match config_store::persist_config(config_path, &config) {
            Ok(()) => info!(path = %config_path.display(), "Settings saved"),
            Err(err) => warn!(path = %config_path.display(), error = %err, "Could not save settings"),
        }
    }

    let mut candidates = cli.files.clone();
    for payload in &cli.drops {
        candidates.extend(paths::parse_drop_payload(payload));
    }

    let selection = paths::select_inputs(candidates, config.require_pdf_extension);
    for (path, reason) in &selection.rejected {
        warn!(path = %path.display(), %reason, "Skipping input");
    }
    if selection.accepted.is_empty() {
        let _ = writeln!(out, "No valid PDF files were provided.");
        return report::EXIT_NO_INPUT;
    }

    let inputs = selection.accepted;
    info!(documents = inputs.len(), "Reordering documents");

    let runner = BatchRunner::from_config(PageReorderer::new(), &config);
    let result = match cli.deadline {
        Some(secs) => runner
            .run_blocking_until(inputs.clone(), Duration::from_secs(secs))
            .map(|slots| BatchReport::from_slots(&inputs, slots)),
        None => runner.run_blocking(inputs).map(BatchReport::from_outcomes),
    };
    let report = match result {
        Ok(report) => report,
        Err(err) => {
            error!(error = %err, "Batch could not be started");
            let human = humanize_error(&err);
            let _ = writeln!(out, "{} {}", human.message, human.suggestion);
            return report::EXIT_NO_INPUT;
        }
    };

    let rendered = if cli.json {
        match report::render_json(&report) {
            Ok(json) => format!("{json}\n"),
            Err(err) => {
                error!(error = %err, "Could not render JSON report");
                report::render_text(&report)
            }
        }
    } else {
        report::render_text(&report)
    };
    if let Err(err) = out.write_all(rendered.as_bytes()) {
        error!(error = %err, "Could not write report");
    }

    report::exit_status(&report)
}
