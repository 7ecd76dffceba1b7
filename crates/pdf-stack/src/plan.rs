//! Pairing plan calculation
//!
//! Source pages are taken in blocks of four. Each block yields up to two
//! output pages, each stacking two source pages vertically:
//!
//! ```text
//! block:   1  2  3  4 | 5  6  7  8 | 9 ...
//! pairs:  (1,3) (2,4) | (5,7) (6,8) | ...
//! ```
//!
//! The first page of a pair goes on top, the second on the bottom. A pair is
//! only emitted when both of its pages exist, so trailing pages that cannot
//! be matched are left out.

use crate::constants::BLOCK_SIZE;
use crate::types::{Result, StackError};

/// Two source pages stacked onto one output page (0-based indices)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PagePair {
    /// Page drawn into the upper half
    pub top: usize,
    /// Page drawn into the lower half
    pub bottom: usize,
}

impl PagePair {
    pub fn new(top: usize, bottom: usize) -> Self {
        Self { top, bottom }
    }
}

impl From<(usize, usize)> for PagePair {
    fn from((top, bottom): (usize, usize)) -> Self {
        Self { top, bottom }
    }
}

/// Ordered list of pairs, one per output page
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PairingPlan {
    pairs: Vec<PagePair>,
}

impl PairingPlan {
    /// Plan the pairs for a document with `num_pages` pages.
    ///
    /// Never fails: documents with fewer than three pages get an empty plan.
    pub fn for_page_count(num_pages: usize) -> Self {
        let mut pairs = Vec::with_capacity(pair_count(num_pages));

        for block_start in (0..num_pages).step_by(BLOCK_SIZE) {
            // saturating_add keeps the bound check total near usize::MAX
            if block_start.saturating_add(2) < num_pages {
                pairs.push(PagePair::new(block_start, block_start + 2));
            }
            if block_start.saturating_add(3) < num_pages {
                pairs.push(PagePair::new(block_start + 1, block_start + 3));
            }
        }

        Self { pairs }
    }

    /// Build a plan from caller-supplied pairs.
    ///
    /// No checks happen here; the compositor validates the plan against the
    /// source before composing.
    pub fn from_pairs(pairs: impl IntoIterator<Item = (usize, usize)>) -> Self {
        Self {
            pairs: pairs.into_iter().map(PagePair::from).collect(),
        }
    }

    pub fn pairs(&self) -> &[PagePair] {
        &self.pairs
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PagePair> {
        self.pairs.iter()
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Check every index against the source page count
    pub fn validate(&self, page_count: usize) -> Result<()> {
        for pair in &self.pairs {
            for index in [pair.top, pair.bottom] {
                if index >= page_count {
                    return Err(StackError::PlanIndexOutOfRange { index, page_count });
                }
            }
        }
        Ok(())
    }
}

impl<'a> IntoIterator for &'a PairingPlan {
    type Item = &'a PagePair;
    type IntoIter = std::slice::Iter<'a, PagePair>;

    fn into_iter(self) -> Self::IntoIter {
        self.pairs.iter()
    }
}

/// Number of pairs `PairingPlan::for_page_count` produces, without allocating.
///
/// Every full block gives two pairs; a trailing partial block of three pages
/// gives one.
pub fn pair_count(num_pages: usize) -> usize {
    let full_blocks = num_pages / BLOCK_SIZE;
    let trailing = usize::from(num_pages % BLOCK_SIZE == 3);
    full_blocks * 2 + trailing
}

#[cfg(test)]
mod tests {
    use super::*;

    fn as_tuples(plan: &PairingPlan) -> Vec<(usize, usize)> {
        plan.iter().map(|p| (p.top, p.bottom)).collect()
    }

    #[test]
    fn test_ten_pages() {
        let plan = PairingPlan::for_page_count(10);
        assert_eq!(as_tuples(&plan), vec![(0, 2), (1, 3), (4, 6), (5, 7)]);
    }

    #[test]
    fn test_fewer_than_three_pages_is_empty() {
        for n in 0..3 {
            assert!(PairingPlan::for_page_count(n).is_empty(), "n = {}", n);
        }
    }

    #[test]
    fn test_three_pages_single_pair() {
        let plan = PairingPlan::for_page_count(3);
        assert_eq!(as_tuples(&plan), vec![(0, 2)]);
    }

    #[test]
    fn test_four_pages_full_block() {
        let plan = PairingPlan::for_page_count(4);
        assert_eq!(as_tuples(&plan), vec![(0, 2), (1, 3)]);
    }

    #[test]
    fn test_seven_pages() {
        // Second block has pages 4, 5, 6: only (4, 6) fits
        let plan = PairingPlan::for_page_count(7);
        assert_eq!(as_tuples(&plan), vec![(0, 2), (1, 3), (4, 6)]);
    }

    #[test]
    fn test_no_block_cap() {
        // Well beyond 80 blocks
        let plan = PairingPlan::for_page_count(400);
        assert_eq!(plan.len(), 200);
        assert_eq!(plan.pairs().last(), Some(&PagePair::new(397, 399)));
    }

    #[test]
    fn test_pairs_are_ordered_and_in_range() {
        for n in 0..64 {
            let plan = PairingPlan::for_page_count(n);
            let mut previous: Option<PagePair> = None;
            for pair in &plan {
                assert!(pair.top < pair.bottom);
                assert!(pair.bottom < n);
                if let Some(prev) = previous {
                    assert!(pair.top > prev.top);
                }
                previous = Some(*pair);
            }
            assert!(plan.validate(n).is_ok());
        }
    }

    #[test]
    fn test_pair_count_matches_plan() {
        for n in 0..100 {
            assert_eq!(pair_count(n), PairingPlan::for_page_count(n).len(), "n = {}", n);
        }
    }

    #[test]
    fn test_huge_page_count_does_not_overflow() {
        assert_eq!(pair_count(usize::MAX), (usize::MAX / 4) * 2 + 1);
    }

    #[test]
    fn test_validate_rejects_out_of_range() {
        let plan = PairingPlan::from_pairs([(0, 2), (1, 5)]);
        match plan.validate(4) {
            Err(StackError::PlanIndexOutOfRange { index, page_count }) => {
                assert_eq!(index, 5);
                assert_eq!(page_count, 4);
            }
            other => panic!("Expected PlanIndexOutOfRange, got {:?}", other),
        }
    }
}
