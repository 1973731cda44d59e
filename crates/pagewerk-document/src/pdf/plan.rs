// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Page permutation plan — maps output positions to source page indices.
//
// The plan is built in two steps:
//   1. pairing: (0,1), (2,3), ... are swapped to (1,0), (3,2), ...; a trailing
//      unpaired page on odd counts stays where it is,
//   2. reversal: the paired sequence is reversed as a whole.
//
// For 8 pages this yields [6,7,4,5,2,3,0,1]; for 5 pages [4,2,3,0,1].

/// Index mapping from output page position to source page index (0-based).
///
/// Output page `k` is source page `plan.source_for(k)`. Always a bijection on
/// `0..len`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PermutationPlan {
    sources: Vec<usize>,
}

impl PermutationPlan {
    /// Build the plan for a document with `page_count` pages.
    pub fn for_page_count(page_count: usize) -> Self {
        let mut sources = Self::pairing_sequence(page_count);
        sources.reverse();
        Self { sources }
    }

    /// The intermediate sequence produced by the pairing step alone.
    pub fn pairing_sequence(page_count: usize) -> Vec<usize> {
        let mut paired = Vec::with_capacity(page_count);
        for index in (0..page_count).step_by(2) {
            if index + 1 < page_count {
                paired.push(index + 1);
            }
            paired.push(index);
        }
        paired
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    /// Source index for output position `position`, if in range.
    pub fn source_for(&self, position: usize) -> Option<usize> {
        self.sources.get(position).copied()
    }

    pub fn as_slice(&self) -> &[usize] {
        &self.sources
    }

    /// Arrange `items` in output order.
    ///
    /// Returns `None` when `items` does not have exactly `len()` entries.
    pub fn apply<T: Clone>(&self, items: &[T]) -> Option<Vec<T>> {
        if items.len() != self.sources.len() {
            return None;
        }
        Some(self.sources.iter().map(|&source| items[source].clone()).collect())
    }

    /// Every index in `0..len` appears exactly once.
    pub fn is_bijection(&self) -> bool {
        let mut seen = vec![false; self.sources.len()];
        for &source in &self.sources {
            match seen.get_mut(source) {
                Some(slot) if !*slot => *slot = true,
                _ => return false,
            }
        }
        true
    }
}
