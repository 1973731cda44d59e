// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// pagewerk-batch — concurrent fan-out/fan-in harness that reorders many
// documents at once and reports one outcome per input, in input order.

pub mod runner;
pub mod transform;

pub use runner::BatchRunner;
pub use transform::PageTransform;
