// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Per-document transformation seam used by the batch runner.

use std::path::{Path, PathBuf};

use pagewerk_core::error::Result;
use pagewerk_document::PageReorderer;

/// A synchronous, per-document transformation.
///
/// Implementations read `input`, write exactly one output file and return its
/// path. They are called from blocking worker threads, possibly many at once,
/// so they must not share mutable state between calls.
pub trait PageTransform: Send + Sync + 'static {
    fn transform(&self, input: &Path) -> Result<PathBuf>;
}

impl PageTransform for PageReorderer {
    fn transform(&self, input: &Path) -> Result<PathBuf> {
        PageReorderer::transform(self, input)
    }
}
