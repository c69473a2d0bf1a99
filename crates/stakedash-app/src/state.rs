//! Store state as seen by readers.

use chrono::{DateTime, Utc};
use stakedash_core::{
    BagListInfo, Balance, EraIndex, NominatorStatus, SelectionSet, SortState, Validator,
};

/// Collapsible dashboard sections.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Nominator,
    MinStake,
    Validators,
}

/// Expansion flag per section, all expanded by default.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SectionFlags {
    pub nominator: bool,
    pub min_stake: bool,
    pub validators: bool,
}

impl Default for SectionFlags {
    fn default() -> Self {
        Self {
            nominator: true,
            min_stake: true,
            validators: true,
        }
    }
}

impl SectionFlags {
    pub fn toggle(&mut self, section: Section) {
        let flag = match section {
            Section::Nominator => &mut self.nominator,
            Section::MinStake => &mut self.min_stake,
            Section::Validators => &mut self.validators,
        };
        *flag = !*flag;
    }

    pub fn is_expanded(&self, section: Section) -> bool {
        match section {
            Section::Nominator => self.nominator,
            Section::MinStake => self.min_stake,
            Section::Validators => self.validators,
        }
    }
}

/// Snapshot of everything the store owns.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StakingState {
    /// Visible validator list for `selected_era`.
    pub validators: Vec<Validator>,
    pub selected_validators: SelectionSet,
    pub current_era: Option<EraIndex>,
    pub selected_era: Option<EraIndex>,
    pub historical_eras: Vec<EraIndex>,
    pub nominator_status: Option<NominatorStatus>,
    pub bag_list_info: Option<BagListInfo>,
    /// Minimum nominator bond.
    pub min_stake: Option<Balance>,
    pub can_nominate: Option<bool>,
    pub sort: SortState,
    pub expanded: SectionFlags,
    pub terminal_ready: bool,
    pub loading: bool,
    pub error: Option<String>,
    pub last_updated: Option<DateTime<Utc>>,
    /// Eras present in the validator cache, ascending.
    pub cached_eras: Vec<EraIndex>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sections_default_expanded() {
        let flags = SectionFlags::default();
        assert!(flags.is_expanded(Section::Nominator));
        assert!(flags.is_expanded(Section::MinStake));
        assert!(flags.is_expanded(Section::Validators));
    }

    #[test]
    fn test_toggle_flips_only_addressed_flag() {
        let mut flags = SectionFlags::default();
        flags.toggle(Section::MinStake);
        assert_eq!(
            flags,
            SectionFlags {
                nominator: true,
                min_stake: false,
                validators: true,
            }
        );
        flags.toggle(Section::MinStake);
        assert_eq!(flags, SectionFlags::default());
    }
}
