// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// PDF reader — open existing PDF documents and enumerate their pages using
// the `lopdf` crate.

use std::path::{Path, PathBuf};

use lopdf::{Document, ObjectId};
use pagewerk_core::error::{PagewerkError, Result};
use tracing::{debug, info, instrument};

/// Reads an existing PDF file.
///
/// Wraps `lopdf::Document`. Reading is split from parsing so that an
/// unreadable file reports an I/O error and unparsable bytes a format error.
pub struct PdfReader {
    /// The underlying lopdf document.
    document: Document,
    /// Source path, if opened from a file (useful for diagnostics).
    source_path: Option<PathBuf>,
}

impl PdfReader {
    // -- Construction ---------------------------------------------------------

    /// Open a PDF from the filesystem.
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path_ref = path.as_ref();
        info!("Opening PDF: {}", path_ref.display());

        let data = std::fs::read(path_ref).map_err(|err| PagewerkError::io(path_ref, err))?;
        let document = parse(&data).map_err(|detail| PagewerkError::format(path_ref, detail))?;

        debug!(pages = document.get_pages().len(), "PDF loaded");

        Ok(Self {
            document,
            source_path: Some(path_ref.to_path_buf()),
        })
    }

    /// Create a reader from raw PDF bytes already in memory.
    #[instrument(skip_all, fields(bytes_len = data.len()))]
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        let document = parse(data).map_err(|detail| {
            PagewerkError::PdfError(format!("failed to load PDF from memory: {detail}"))
        })?;

        debug!(pages = document.get_pages().len(), "PDF loaded from bytes");

        Ok(Self {
            document,
            source_path: None,
        })
    }

    // -- Inspection -----------------------------------------------------------

    /// Number of pages in the document.
    pub fn page_count(&self) -> usize {
        self.document.get_pages().len()
    }

    /// Page object IDs in document order.
    pub fn page_ids(&self) -> Vec<ObjectId> {
        // lopdf keys pages by 1-indexed page number, so the map is already ordered.
        self.document.get_pages().into_values().collect()
    }

    /// Return the source path if the reader was created via [`PdfReader::open`].
    pub fn source_path(&self) -> Option<&Path> {
        self.source_path.as_deref()
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    /// Consume the reader, handing over the parsed document for editing.
    pub fn into_document(self) -> Document {
        self.document
    }
}

fn parse(data: &[u8]) -> std::result::Result<Document, String> {
    let document = Document::load_mem(data).map_err(|err| err.to_string())?;
    if document.is_encrypted() {
        return Err("encrypted documents are not supported".to_string());
    }
    Ok(document)
}
