// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// PDF writer — serialise lopdf documents and publish them atomically.
//
// The document is written to a temporary file in the destination directory
// and renamed over the destination only once every byte is flushed and
// synced, so a crash mid-write never leaves a truncated PDF under the final
// name.

use std::fs::Permissions;
use std::io::{BufWriter, Write};
use std::path::Path;

use lopdf::Document;
use pagewerk_core::error::{PagewerkError, Result};
use tracing::{debug, instrument};

/// Prefix of staged files; they are hidden on Unix while being written.
const STAGING_PREFIX: &str = ".pagewerk-";
const STAGING_SUFFIX: &str = ".part";

/// Serialise `document` into memory.
pub fn serialise(document: &mut Document) -> Result<Vec<u8>> {
    let mut output = Vec::new();
    document
        .save_to(&mut output)
        .map_err(|err| PagewerkError::PdfError(format!("failed to serialise PDF: {err}")))?;
    Ok(output)
}

/// Write `document` to `destination`, replacing any existing file atomically.
///
/// `permissions`, when given, are applied to the staged file before it is
/// renamed into place.
#[instrument(skip_all, fields(destination = %destination.display()))]
pub fn publish_atomically(
    document: &mut Document,
    destination: &Path,
    permissions: Option<Permissions>,
) -> Result<()> {
    let directory = match destination.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut staged = tempfile::Builder::new()
        .prefix(STAGING_PREFIX)
        .suffix(STAGING_SUFFIX)
        .tempfile_in(directory)
        .map_err(|err| PagewerkError::io(directory, err))?;

    {
        let mut writer = BufWriter::new(staged.as_file_mut());
        document.save_to(&mut writer).map_err(|err| {
            PagewerkError::io(destination, std::io::Error::other(err.to_string()))
        })?;
        writer
            .flush()
            .map_err(|err| PagewerkError::io(destination, err))?;
    }

    let file = staged.as_file();
    if let Some(permissions) = permissions {
        file.set_permissions(permissions)
            .map_err(|err| PagewerkError::io(destination, err))?;
    }
    file.sync_all()
        .map_err(|err| PagewerkError::io(destination, err))?;

    debug!(staged = %staged.path().display(), "Publishing staged PDF");

    // On failure the staged file is dropped (and deleted) with the error.
    staged
        .persist(destination)
        .map_err(|err| PagewerkError::io(destination, err.error))?;

    Ok(())
}
