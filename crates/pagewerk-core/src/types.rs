// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Core domain types for batch page reordering.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::PagewerkError;

/// Suffix appended to the file stem of every reordered document.
pub const REORDERED_SUFFIX: &str = "_Reordered";

/// Broad category of a per-document failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// Source unreadable, destination unwritable, permission denied, disk full.
    Io,
    /// Source bytes do not parse as a usable PDF.
    Format,
    /// The worker task panicked or was cancelled before producing a result.
    Aborted,
}

impl std::fmt::Display for FailureKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Self::Io => "I/O error",
            Self::Format => "format error",
            Self::Aborted => "aborted",
        };
        f.write_str(label)
    }
}

/// Result of transforming one submitted document.
///
/// `index` is the position of `source` in the submitted path list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum BatchOutcome {
    Success {
        index: usize,
        source: PathBuf,
        output: PathBuf,
    },
    Failure {
        index: usize,
        source: PathBuf,
        kind: FailureKind,
        message: String,
    },
}

impl BatchOutcome {
    pub fn success(index: usize, source: impl Into<PathBuf>, output: impl Into<PathBuf>) -> Self {
        Self::Success {
            index,
            source: source.into(),
            output: output.into(),
        }
    }

    pub fn failure(
        index: usize,
        source: impl Into<PathBuf>,
        kind: FailureKind,
        message: impl Into<String>,
    ) -> Self {
        Self::Failure {
            index,
            source: source.into(),
            kind,
            message: message.into(),
        }
    }

    /// Convert a transformation error into a failure outcome.
    pub fn from_error(index: usize, source: impl Into<PathBuf>, err: &PagewerkError) -> Self {
        Self::failure(index, source, err.failure_kind(), err.to_string())
    }

    pub fn index(&self) -> usize {
        match self {
            Self::Success { index, .. } | Self::Failure { index, .. } => *index,
        }
    }

    pub fn source(&self) -> &Path {
        match self {
            Self::Success { source, .. } | Self::Failure { source, .. } => source,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    /// Output path for successful outcomes.
    pub fn output(&self) -> Option<&Path> {
        match self {
            Self::Success { output, .. } => Some(output),
            Self::Failure { .. } => None,
        }
    }
}

/// Outcomes of a batch split into successes and failures.
///
/// Both lists keep submission order. `abandoned` lists inputs whose task was
/// still running when a join deadline expired.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchReport {
    pub succeeded: Vec<BatchOutcome>,
    pub failed: Vec<BatchOutcome>,
    pub abandoned: Vec<PathBuf>,
}

impl BatchReport {
    /// Partition a complete outcome list.
    pub fn from_outcomes(outcomes: impl IntoIterator<Item = BatchOutcome>) -> Self {
        let (succeeded, failed) = outcomes.into_iter().partition(BatchOutcome::is_success);
        Self {
            succeeded,
            failed,
            abandoned: Vec::new(),
        }
    }

    /// Partition a deadline-bounded outcome list. Empty slots are matched to
    /// `paths` by position and reported as abandoned.
    pub fn from_slots(paths: &[PathBuf], slots: Vec<Option<BatchOutcome>>) -> Self {
        let mut report = Self::default();
        for (path, slot) in paths.iter().zip(slots) {
            match slot {
                Some(outcome) if outcome.is_success() => report.succeeded.push(outcome),
                Some(outcome) => report.failed.push(outcome),
                None => report.abandoned.push(path.clone()),
            }
        }
        report
    }

    pub fn total(&self) -> usize {
        self.succeeded.len() + self.failed.len() + self.abandoned.len()
    }

    /// True when at least one document failed or was abandoned.
    pub fn has_failures(&self) -> bool {
        !self.failed.is_empty() || !self.abandoned.is_empty()
    }

    /// Output paths of every successful document, in submission order.
    pub fn outputs(&self) -> impl Iterator<Item = &Path> {
        self.succeeded.iter().filter_map(BatchOutcome::output)
    }
}
