//! Nominator status derivation.

use std::collections::HashSet;

use crate::types::{Balance, NominatorStatus};

impl NominatorStatus {
    /// Derive status from the account's ledger and nomination records.
    ///
    /// Without a ledger the account is not nominating and every other field
    /// stays empty. `is_nominating` follows the presence of the nominations
    /// record; `is_earning_rewards` is set when any target is in
    /// `active_validators`.
    pub fn derive(
        ledger_active: Option<Balance>,
        targets: Option<Vec<String>>,
        active_validators: &HashSet<String>,
    ) -> Self {
        let Some(bonded) = ledger_active else {
            return Self::not_nominating();
        };

        let is_earning = targets
            .as_ref()
            .is_some_and(|t| t.iter().any(|addr| active_validators.contains(addr)));

        Self {
            is_nominating: targets.is_some(),
            bonded_amount: Some(bonded),
            nominations: targets,
            is_earning_rewards: Some(is_earning),
            error: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn active(addrs: &[&str]) -> HashSet<String> {
        addrs.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_no_ledger_yields_only_not_nominating() {
        let status = NominatorStatus::derive(None, Some(vec!["a".into()]), &active(&["a"]));
        assert_eq!(status, NominatorStatus::not_nominating());
    }

    #[test]
    fn test_earning_when_target_active() {
        let status = NominatorStatus::derive(
            Some(500),
            Some(vec!["x".into(), "b".into()]),
            &active(&["a", "b"]),
        );
        assert!(status.is_nominating);
        assert_eq!(status.bonded_amount, Some(500));
        assert_eq!(status.is_earning_rewards, Some(true));
        assert_eq!(status.nominations.map(|n| n.len()), Some(2));
    }

    #[test]
    fn test_not_earning_when_no_target_active() {
        let status =
            NominatorStatus::derive(Some(500), Some(vec!["x".into()]), &active(&["a", "b"]));
        assert!(status.is_nominating);
        assert_eq!(status.is_earning_rewards, Some(false));
    }

    #[test]
    fn test_bonded_without_nominations() {
        let status = NominatorStatus::derive(Some(500), None, &active(&["a"]));
        assert!(!status.is_nominating);
        assert_eq!(status.bonded_amount, Some(500));
        assert_eq!(status.nominations, None);
        assert_eq!(status.is_earning_rewards, Some(false));
        assert!(!status.error);
    }
}
