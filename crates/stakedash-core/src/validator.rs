//! Validator records as shown in the era list.

use serde::{Deserialize, Serialize};

use crate::types::EraIndex;

/// Perbill denominator (1_000_000_000 = 100%).
pub const PERBILL_DENOMINATOR: f64 = 1_000_000_000.0;

/// One validator's standing in a specific era.
///
/// `address` + `era` identify a record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Validator {
    /// SS58-encoded address.
    pub address: String,
    /// Identity display name, or a truncated address.
    pub display_name: String,
    /// Commission as a percentage (0 to 100).
    pub commission: f64,
    /// Raw era reward points.
    pub reward_points: u32,
    /// `reward_points * (1 - commission / 100)`.
    pub reward: f64,
    pub era: EraIndex,
    pub blocked: bool,
    /// Whether an on-chain identity was found.
    pub identity: bool,
    /// Placeholder shown while the era is being enriched.
    #[serde(default)]
    pub loading: bool,
}

impl Validator {
    /// Placeholder record seeded before per-validator data arrives.
    pub fn placeholder(address: String, era: EraIndex) -> Self {
        Self {
            loading: true,
            ..Self::zeroed(address, era)
        }
    }

    /// Zero-valued record used when a validator's enrichment fails.
    pub fn zeroed(address: String, era: EraIndex) -> Self {
        Self {
            display_name: short_address(&address),
            address,
            commission: 0.0,
            reward_points: 0,
            reward: 0.0,
            era,
            blocked: false,
            identity: false,
            loading: false,
        }
    }

    /// Build an enriched record from chain data.
    ///
    /// `identity` is `Some` when an identity record exists; its inner value is
    /// the display text, if any.
    pub fn from_chain(
        address: String,
        era: EraIndex,
        reward_points: u32,
        commission_perbill: u32,
        blocked: bool,
        identity: Option<Option<String>>,
    ) -> Self {
        let commission = commission_from_perbill(commission_perbill);
        let has_identity = identity.is_some();
        let display_name = identity
            .flatten()
            .filter(|name| !name.trim().is_empty())
            .unwrap_or_else(|| short_address(&address));

        Self {
            address,
            display_name,
            commission,
            reward_points,
            reward: compute_reward(reward_points, commission),
            era,
            blocked,
            identity: has_identity,
            loading: false,
        }
    }
}

/// Convert an on-chain Perbill commission to a percentage in `[0, 100]`.
pub fn commission_from_perbill(perbill: u32) -> f64 {
    (perbill as f64 / PERBILL_DENOMINATOR * 100.0).clamp(0.0, 100.0)
}

/// Reward after commission.
pub fn compute_reward(reward_points: u32, commission: f64) -> f64 {
    reward_points as f64 * (1.0 - commission / 100.0)
}

/// Truncate an address to `first6...last6`.
pub fn short_address(address: &str) -> String {
    let chars: Vec<char> = address.chars().collect();
    if chars.len() <= 12 {
        return address.to_string();
    }
    let head: String = chars[..6].iter().collect();
    let tail: String = chars[chars.len() - 6..].iter().collect();
    format!("{}...{}", head, tail)
}
