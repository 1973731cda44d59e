// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for Pagewerk.

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::types::FailureKind;

/// Top-level error type for all Pagewerk operations.
#[derive(Debug, Error)]
pub enum PagewerkError {
    // -- Document errors --
    #[error("cannot access {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{} is not a readable PDF: {detail}", .path.display())]
    Format { path: PathBuf, detail: String },

    #[error("PDF operation failed: {0}")]
    PdfError(String),

    // -- Batch errors --
    #[error("batch task aborted: {0}")]
    TaskAborted(String),

    #[error("async runtime unavailable: {0}")]
    Runtime(String),

    // -- Configuration --
    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl PagewerkError {
    /// Wrap an I/O error together with the path it occurred on.
    pub fn io(path: impl AsRef<Path>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    /// Build a format error for a document that could not be parsed.
    pub fn format(path: impl AsRef<Path>, detail: impl Into<String>) -> Self {
        Self::Format {
            path: path.as_ref().to_path_buf(),
            detail: detail.into(),
        }
    }

    /// Classify this error for batch reporting.
    pub fn failure_kind(&self) -> FailureKind {
        match self {
            Self::Io { .. } | Self::Runtime(_) => FailureKind::Io,
            Self::Format { .. } | Self::PdfError(_) => FailureKind::Format,
            Self::TaskAborted(_) => FailureKind::Aborted,
            Self::Config(_) | Self::Serialization(_) => FailureKind::Io,
        }
    }
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, PagewerkError>;
