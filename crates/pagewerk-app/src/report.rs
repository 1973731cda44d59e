// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Console presentation of batch results.

use std::fmt::Write as _;

use pagewerk_core::error::Result;
use pagewerk_core::human_errors::humanize_outcome;
use pagewerk_core::types::{BatchOutcome, BatchReport};

/// Every document was reordered.
pub const EXIT_SUCCESS: u8 = 0;
/// Nothing could be attempted (no usable inputs, runtime failure).
pub const EXIT_NO_INPUT: u8 = 1;
/// At least one document failed or was abandoned.
pub const EXIT_PARTIAL_FAILURE: u8 = 2;

/// Process exit status for a finished batch.
pub fn exit_status(report: &BatchReport) -> u8 {
    if report.has_failures() {
        EXIT_PARTIAL_FAILURE
    } else {
        EXIT_SUCCESS
    }
}

/// Human-readable report: processed outputs first, then failures with hints.
pub fn render_text(report: &BatchReport) -> String {
    let mut out = String::new();

    if !report.succeeded.is_empty() {
        out.push_str("Processed files:\n");
        for output in report.outputs() {
            let _ = writeln!(out, "  {}", output.display());
        }
    }

    if !report.failed.is_empty() {
        out.push_str("Failed to process the following files:\n");
        for outcome in &report.failed {
            if let BatchOutcome::Failure { message, .. } = outcome {
                let _ = writeln!(out, "  {message}");
            }
            if let Some(human) = humanize_outcome(outcome) {
                let _ = writeln!(out, "    {} {}", human.message, human.suggestion);
            }
        }
    }

    if !report.abandoned.is_empty() {
        out.push_str("Still running when the deadline passed:\n");
        for path in &report.abandoned {
            let _ = writeln!(out, "  {}", path.display());
        }
    }

    let _ = writeln!(
        out,
        "{} processed, {} failed, {} abandoned",
        report.succeeded.len(),
        report.failed.len(),
        report.abandoned.len()
    );
    out
}

/// Machine-readable report.
pub fn render_json(report: &BatchReport) -> Result<String> {
    Ok(serde_json::to_string_pretty(report)?)
}
