// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// PDF module — reading, page permutation, reordering, and publishing.

pub mod plan;
pub mod reader;
pub mod reorder;
pub mod writer;

#[cfg(any(test, feature = "test-fixtures"))]
pub mod fixture;

pub use plan::PermutationPlan;
pub use reader::PdfReader;
pub use reorder::PageReorderer;
