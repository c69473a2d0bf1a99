//! Sorting of the visible validator list.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::validator::Validator;

/// Sort field for validators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SortField {
    #[default]
    Reward,
    Commission,
    RewardPoints,
}

impl SortField {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Reward => "Reward",
            Self::Commission => "Commission",
            Self::RewardPoints => "Reward Points",
        }
    }

    fn key(&self, validator: &Validator) -> f64 {
        match self {
            Self::Reward => validator.reward,
            Self::Commission => validator.commission,
            Self::RewardPoints => validator.reward_points as f64,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SortDirection {
    Asc,
    #[default]
    Desc,
}

impl SortDirection {
    pub fn flipped(self) -> Self {
        match self {
            Self::Asc => Self::Desc,
            Self::Desc => Self::Asc,
        }
    }
}

/// Current sort field and direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SortState {
    pub field: SortField,
    pub direction: SortDirection,
}

impl SortState {
    /// Apply a click on a column header.
    ///
    /// The same field flips the direction; another field resets to descending.
    pub fn select(&mut self, field: SortField) {
        if self.field == field {
            self.direction = self.direction.flipped();
        } else {
            self.field = field;
            self.direction = SortDirection::Desc;
        }
    }
}

/// Sort validators in place.
///
/// Stable: ties keep their prior (fetch) order.
pub fn sort_validators(validators: &mut [Validator], sort: SortState) {
    validators.sort_by(|a, b| {
        let cmp = sort
            .field
            .key(a)
            .partial_cmp(&sort.field.key(b))
            .unwrap_or(Ordering::Equal);
        match sort.direction {
            SortDirection::Asc => cmp,
            SortDirection::Desc => cmp.reverse(),
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn validator(address: &str, points: u32, perbill: u32) -> Validator {
        Validator::from_chain(address.to_string(), 1, points, perbill, false, None)
    }

    fn sample() -> Vec<Validator> {
        vec![
            validator("a", 1000, 50_000_000),  // 5%, reward 950
            validator("b", 3000, 200_000_000), // 20%, reward 2400
            validator("c", 2000, 0),           // 0%, reward 2000
        ]
    }

    fn addresses(validators: &[Validator]) -> Vec<&str> {
        validators.iter().map(|v| v.address.as_str()).collect()
    }

    #[test]
    fn test_default_sort_is_reward_desc() {
        let state = SortState::default();
        assert_eq!(state.field, SortField::Reward);
        assert_eq!(state.direction, SortDirection::Desc);
    }

    #[test]
    fn test_field_labels() {
        assert_eq!(SortField::Reward.label(), "Reward");
        assert_eq!(SortField::RewardPoints.label(), "Reward Points");
    }

    #[test]
    fn test_select_same_field_flips() {
        let mut state = SortState {
            field: SortField::Commission,
            direction: SortDirection::Asc,
        };
        state.select(SortField::Commission);
        assert_eq!(state.field, SortField::Commission);
        assert_eq!(state.direction, SortDirection::Desc);
        state.select(SortField::Commission);
        assert_eq!(state.direction, SortDirection::Asc);
    }

    #[test]
    fn test_select_other_field_resets_to_desc() {
        let mut state = SortState {
            field: SortField::Commission,
            direction: SortDirection::Asc,
        };
        state.select(SortField::RewardPoints);
        assert_eq!(state.field, SortField::RewardPoints);
        assert_eq!(state.direction, SortDirection::Desc);
    }

    #[test]
    fn test_sort_by_reward_desc() {
        let mut validators = sample();
        sort_validators(&mut validators, SortState::default());
        assert_eq!(addresses(&validators), vec!["b", "c", "a"]);
    }

    #[test]
    fn test_sort_by_commission_asc_then_desc() {
        let mut validators = sample();
        let mut state = SortState {
            field: SortField::Commission,
            direction: SortDirection::Asc,
        };
        sort_validators(&mut validators, state);
        assert_eq!(addresses(&validators), vec!["c", "a", "b"]);

        state.select(SortField::Commission);
        sort_validators(&mut validators, state);
        assert_eq!(addresses(&validators), vec!["b", "a", "c"]);
    }

    #[test]
    fn test_sort_by_points() {
        let mut validators = sample();
        let state = SortState {
            field: SortField::RewardPoints,
            direction: SortDirection::Asc,
        };
        sort_validators(&mut validators, state);
        assert_eq!(addresses(&validators), vec!["a", "c", "b"]);
    }

    #[test]
    fn test_sort_is_stable_on_ties() {
        let mut validators = vec![
            validator("x", 10, 0),
            validator("y", 10, 0),
            validator("z", 10, 0),
        ];
        sort_validators(&mut validators, SortState::default());
        assert_eq!(addresses(&validators), vec!["x", "y", "z"]);
    }

    fn arb_field() -> impl Strategy<Value = SortField> {
        prop_oneof![
            Just(SortField::Reward),
            Just(SortField::Commission),
            Just(SortField::RewardPoints),
        ]
    }

    proptest! {
        #[test]
        fn test_sort_preserves_length_and_orders(
            points in prop::collection::vec((any::<u32>(), 0u32..=1_000_000_000), 0..50),
            field in arb_field(),
            asc in any::<bool>(),
        ) {
            let mut validators: Vec<Validator> = points
                .iter()
                .enumerate()
                .map(|(i, (p, c))| validator(&i.to_string(), *p, *c))
                .collect();
            let state = SortState {
                field,
                direction: if asc { SortDirection::Asc } else { SortDirection::Desc },
            };
            sort_validators(&mut validators, state);
            prop_assert_eq!(validators.len(), points.len());
            for pair in validators.windows(2) {
                let (a, b) = (field.key(&pair[0]), field.key(&pair[1]));
                if asc {
                    prop_assert!(a <= b);
                } else {
                    prop_assert!(a >= b);
                }
            }
        }
    }
}
