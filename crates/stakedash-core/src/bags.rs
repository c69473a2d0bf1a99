//! Bags-list placement.
//!
//! The voter list groups nominators into bags keyed by an upper stake
//! threshold. An account sits in the bag whose threshold is the smallest one
//! not below its stake; thresholds here are kept in descending order.

use crate::types::{BagListInfo, Balance};

/// Bag the given active stake maps to.
///
/// Scans `thresholds` (descending) and returns the first one the stake meets
/// or exceeds, falling back to the lowest threshold. `None` for an empty list.
pub fn correct_bag(thresholds: &[Balance], active: Balance) -> Option<Balance> {
    thresholds
        .iter()
        .copied()
        .find(|threshold| active >= *threshold)
        .or_else(|| thresholds.last().copied())
}

/// Sort thresholds descending, as read from chain they are ascending.
pub fn descending_thresholds(mut thresholds: Vec<Balance>) -> Vec<Balance> {
    thresholds.sort_unstable_by(|a, b| b.cmp(a));
    thresholds.dedup();
    thresholds
}

impl BagListInfo {
    /// Derive placement for an account with a staking ledger.
    pub fn derive(
        bag_thresholds: Vec<Balance>,
        active: Balance,
        current_bag: Option<Balance>,
    ) -> Self {
        let correct = correct_bag(&bag_thresholds, active);
        Self {
            current_bag,
            correct_bag: correct,
            is_misplaced: Some(current_bag != correct),
            active: Some(active),
            bag_thresholds,
            error: false,
        }
    }
}
