//! Core domain types for the staking dashboard.

use serde::{Deserialize, Serialize};

pub type Balance = u128;
pub type EraIndex = u32;

/// Supported networks - exhaustive match required (no default case).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Network {
    Polkadot,
    Kusama,
    Westend,
    Paseo,
}

impl Network {
    pub fn token_symbol(&self) -> &'static str {
        match self {
            Network::Polkadot => "DOT",
            Network::Kusama => "KSM",
            Network::Westend => "WND",
            Network::Paseo => "PAS",
        }
    }

    pub fn ss58_format(&self) -> u16 {
        match self {
            Network::Polkadot => 0,
            Network::Kusama => 2,
            Network::Westend => 42,
            Network::Paseo => 0,
        }
    }

    /// Returns all known networks.
    pub fn all() -> &'static [Network] {
        &[
            Network::Polkadot,
            Network::Kusama,
            Network::Westend,
            Network::Paseo,
        ]
    }
}

impl std::fmt::Display for Network {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Network::Polkadot => write!(f, "Polkadot"),
            Network::Kusama => write!(f, "Kusama"),
            Network::Westend => write!(f, "Westend"),
            Network::Paseo => write!(f, "Paseo"),
        }
    }
}

impl std::str::FromStr for Network {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "polkadot" | "dot" => Ok(Network::Polkadot),
            "kusama" | "ksm" => Ok(Network::Kusama),
            "westend" | "wnd" => Ok(Network::Westend),
            "paseo" | "pas" => Ok(Network::Paseo),
            _ => Err(format!(
                "Unknown network '{}'. Valid options: polkadot, kusama, westend, paseo",
                s
            )),
        }
    }
}

/// Derived view of one account's staking participation.
///
/// `error` set means the status is unknown because a read failed, which is
/// different from a known "not nominating".
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct NominatorStatus {
    pub is_nominating: bool,
    pub bonded_amount: Option<Balance>,
    pub nominations: Option<Vec<String>>,
    pub is_earning_rewards: Option<bool>,
    pub error: bool,
}

impl NominatorStatus {
    /// Status for an account without a staking ledger.
    pub fn not_nominating() -> Self {
        Self::default()
    }

    /// Status for an account whose reads failed.
    pub fn unknown() -> Self {
        Self {
            error: true,
            ..Self::default()
        }
    }
}

/// Placement of an account within the bags list.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BagListInfo {
    /// Upper threshold of the bag the account is recorded in.
    pub current_bag: Option<Balance>,
    /// Upper threshold the account's active stake maps to.
    pub correct_bag: Option<Balance>,
    /// `None` until a placement has been derived.
    pub is_misplaced: Option<bool>,
    pub active: Option<Balance>,
    /// Bag thresholds, descending.
    pub bag_thresholds: Vec<Balance>,
    pub error: bool,
}

impl BagListInfo {
    /// Neutral status for an account without a staking ledger.
    pub fn cleared(bag_thresholds: Vec<Balance>) -> Self {
        Self {
            active: Some(0),
            bag_thresholds,
            ..Self::default()
        }
    }

    /// Status for an account whose reads failed.
    pub fn unknown() -> Self {
        Self {
            error: true,
            ..Self::default()
        }
    }
}

/// Mutating staking operations driven by the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TransactionType {
    /// Bond extra tokens to existing stake.
    BondExtra,
    /// Unbond tokens from stake.
    Unbond,
    /// Nominate validators.
    Nominate,
    /// Move the account to the bag matching its stake.
    Rebag,
}

impl TransactionType {
    /// Get display label for the transaction type.
    pub fn label(&self) -> &'static str {
        match self {
            TransactionType::BondExtra => "Bond Extra",
            TransactionType::Unbond => "Unbond",
            TransactionType::Nominate => "Nominate",
            TransactionType::Rebag => "Rebag",
        }
    }

    /// Get description for the transaction type.
    pub fn description(&self) -> &'static str {
        match self {
            TransactionType::BondExtra => "Add more tokens to existing stake",
            TransactionType::Unbond => "Start unbonding tokens (28 day wait)",
            TransactionType::Nominate => "Select validators to nominate",
            TransactionType::Rebag => "Move to the bag matching your stake",
        }
    }

    /// Message shown once the transaction is finalized.
    pub fn success_message(&self) -> &'static str {
        match self {
            TransactionType::BondExtra => "Successfully bonded more tokens!",
            TransactionType::Unbond => {
                "Successfully unbonded tokens! They will be available after the unbonding period (28 days)."
            }
            TransactionType::Nominate => "Nomination successful!",
            TransactionType::Rebag => "Successfully updated bag position!",
        }
    }

    /// Message shown when submission fails or is rejected.
    pub fn failure_message(&self) -> &'static str {
        match self {
            TransactionType::BondExtra => "Failed to bond tokens. Please try again.",
            TransactionType::Unbond => "Failed to unbond tokens. Please try again.",
            TransactionType::Nominate => "Nomination failed. Please try again.",
            TransactionType::Rebag => "Failed to update bag position. Please try again.",
        }
    }
}

/// Transaction status in the submission lifecycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransactionStatus {
    /// Transaction submitted, waiting for inclusion.
    Submitted,
    /// Transaction included in a best block.
    InBlock(String),
    /// Transaction finalized.
    Finalized(String),
    /// Transaction failed.
    Failed(String),
}

impl TransactionStatus {
    /// Check if transaction is pending (not yet finalized or failed).
    pub fn is_pending(&self) -> bool {
        !matches!(
            self,
            TransactionStatus::Finalized(_) | TransactionStatus::Failed(_)
        )
    }

    /// Get display label.
    pub fn label(&self) -> &'static str {
        match self {
            TransactionStatus::Submitted => "Submitted",
            TransactionStatus::InBlock(_) => "In Block",
            TransactionStatus::Finalized(_) => "Finalized",
            TransactionStatus::Failed(_) => "Failed",
        }
    }
}
