// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Human-readable error messages for batch reports.
//
// Every failed document is mapped to plain English with a clear suggestion.
// Front ends print these next to the technical message.

use crate::error::PagewerkError;
use crate::types::{BatchOutcome, FailureKind};

/// Severity of an error from the user's perspective.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Running the batch again may well succeed.
    Transient,
    /// User must do something (fix permissions, free disk space, move the file).
    ActionRequired,
    /// Retrying the same file will not help.
    Permanent,
}

/// A human-readable error with plain English message and actionable suggestion.
#[derive(Debug, Clone)]
pub struct HumanError {
    /// Plain English summary.
    pub message: String,
    /// What the user should try.
    pub suggestion: String,
    /// Whether running the same input again could succeed.
    pub retriable: bool,
    pub severity: Severity,
}

/// Convert a `PagewerkError` into a `HumanError`.
pub fn humanize_error(err: &PagewerkError) -> HumanError {
    match err {
        PagewerkError::Io { source, .. } => match source.kind() {
            std::io::ErrorKind::NotFound => not_found(),
            std::io::ErrorKind::PermissionDenied => permission_denied(),
            _ => generic_io(),
        },
        PagewerkError::Format { detail, .. } => humanize_format_detail(detail),
        PagewerkError::PdfError(detail) => humanize_format_detail(detail),
        PagewerkError::TaskAborted(_) => aborted(),
        PagewerkError::Runtime(_) => HumanError {
            message: "Pagewerk couldn't start its worker threads.".into(),
            suggestion: "Close some other programs and try again.".into(),
            retriable: true,
            severity: Severity::Transient,
        },
        PagewerkError::Config(detail) => HumanError {
            message: "The settings file has an invalid value.".into(),
            suggestion: format!("Fix or delete the settings file and try again. ({detail})"),
            retriable: false,
            severity: Severity::ActionRequired,
        },
        PagewerkError::Serialization(_) => HumanError {
            message: "The settings file couldn't be read.".into(),
            suggestion: "Make sure the settings file is valid JSON, or delete it to use the defaults.".into(),
            retriable: false,
            severity: Severity::ActionRequired,
        },
    }
}

/// Humanize a failed batch outcome. Returns `None` for successes.
///
/// Outcomes only carry the error's rendered message, so I/O failures are
/// narrowed down by looking at the message text.
pub fn humanize_outcome(outcome: &BatchOutcome) -> Option<HumanError> {
    match outcome {
        BatchOutcome::Success { .. } => None,
        BatchOutcome::Failure { kind, message, .. } => Some(humanize_failure(*kind, message)),
    }
}

/// Humanize a failure given its kind and technical message.
pub fn humanize_failure(kind: FailureKind, message: &str) -> HumanError {
    match kind {
        FailureKind::Io => humanize_io_detail(message),
        FailureKind::Format => humanize_format_detail(message),
        FailureKind::Aborted => aborted(),
    }
}

fn humanize_io_detail(detail: &str) -> HumanError {
    let lower = detail.to_ascii_lowercase();

    if lower.contains("no such file") || lower.contains("not found") {
        not_found()
    } else if lower.contains("permission denied") || lower.contains("access is denied") {
        permission_denied()
    } else if lower.contains("no space") || lower.contains("disk full") {
        HumanError {
            message: "The disk is full.".into(),
            suggestion: "Free up some space next to the original file, then try again.".into(),
            retriable: false,
            severity: Severity::ActionRequired,
        }
    } else {
        generic_io()
    }
}

fn humanize_format_detail(detail: &str) -> HumanError {
    let lower = detail.to_ascii_lowercase();

    if lower.contains("encrypt") {
        HumanError {
            message: "This PDF is password protected.".into(),
            suggestion: "Remove the password in your PDF viewer, save a copy, and reorder the copy.".into(),
            retriable: false,
            severity: Severity::ActionRequired,
        }
    } else {
        HumanError {
            message: "There's a problem with this PDF file.".into(),
            suggestion: "The file may be damaged or not a PDF at all. Try opening it in a PDF viewer first.".into(),
            retriable: false,
            severity: Severity::Permanent,
        }
    }
}

fn not_found() -> HumanError {
    HumanError {
        message: "The file couldn't be found.".into(),
        suggestion: "It may have been moved or deleted. Try choosing the file again.".into(),
        retriable: false,
        severity: Severity::ActionRequired,
    }
}

fn permission_denied() -> HumanError {
    HumanError {
        message: "Pagewerk doesn't have permission to read or write there.".into(),
        suggestion: "Check the permissions of the file and its folder, or copy the file somewhere you can write to.".into(),
        retriable: false,
        severity: Severity::ActionRequired,
    }
}

fn generic_io() -> HumanError {
    HumanError {
        message: "There was a problem reading or writing a file.".into(),
        suggestion: "Try again. If this keeps happening, check the disk the file is on.".into(),
        retriable: true,
        severity: Severity::Transient,
    }
}

fn aborted() -> HumanError {
    HumanError {
        message: "Processing of this file stopped unexpectedly.".into(),
        suggestion: "Try this file again on its own. If it keeps happening, please report it.".into(),
        retriable: true,
        severity: Severity::Transient,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_is_action_required() {
        let err = PagewerkError::io(
            "gone.pdf",
            std::io::Error::new(std::io::ErrorKind::NotFound, "No such file or directory"),
        );
        let human = humanize_error(&err);
        assert_eq!(human.severity, Severity::ActionRequired);
        assert!(!human.retriable);
    }

    #[test]
    fn missing_file_outcome_matches_error_mapping() {
        let err = PagewerkError::io(
            "gone.pdf",
            std::io::Error::new(std::io::ErrorKind::NotFound, "No such file or directory"),
        );
        let outcome = BatchOutcome::from_error(0, "gone.pdf", &err);
        let human = humanize_outcome(&outcome).expect("failure");
        assert_eq!(human.message, humanize_error(&err).message);
    }

    #[test]
    fn corrupt_pdf_is_permanent() {
        let human = humanize_failure(FailureKind::Format, "x.pdf is not a readable PDF: invalid file header");
        assert_eq!(human.severity, Severity::Permanent);
    }

    #[test]
    fn encrypted_pdf_is_action_required() {
        let err = PagewerkError::format("secret.pdf", "encrypted documents are not supported");
        let human = humanize_error(&err);
        assert_eq!(human.severity, Severity::ActionRequired);
        assert!(human.message.contains("password"));
    }

    #[test]
    fn aborted_task_is_retriable() {
        let human = humanize_failure(FailureKind::Aborted, "worker panicked");
        assert!(human.retriable);
        assert_eq!(human.severity, Severity::Transient);
    }

    #[test]
    fn success_has_no_human_error() {
        let outcome = BatchOutcome::success(0, "a.pdf", "a_Reordered.pdf");
        assert!(humanize_outcome(&outcome).is_none());
    }
}
