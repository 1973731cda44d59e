// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// pagewerk-document — PDF page reordering for Pagewerk.
//
// Provides PDF loading, the fixed page permutation (pairwise swap followed by
// full reversal), page-tree rewriting, and atomic publishing of the result
// next to the source document.

pub mod pdf;

// Re-export the primary items so callers can use `pagewerk_document::PageReorderer` etc.
pub use pdf::plan::PermutationPlan;
pub use pdf::reader::PdfReader;
pub use pdf::reorder::{PageReorderer, output_path_for};
pub use pdf::writer::publish_atomically;
