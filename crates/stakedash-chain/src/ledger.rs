//! Read and write capabilities the staking store is built on.
//!
//! Addresses cross this boundary as SS58 strings. Every read is fallible;
//! `Ok(None)` means the record does not exist, which is not an error.

use async_trait::async_trait;
use stakedash_core::{Balance, EraIndex, TransactionStatus, TransactionType};
use tokio::sync::mpsc;

use crate::error::ChainError;

/// Reward points earned in one era.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EraRewardPoints {
    pub total: u32,
    pub individual: Vec<(String, u32)>,
}

impl EraRewardPoints {
    pub fn points_of(&self, address: &str) -> u32 {
        self.individual
            .iter()
            .find(|(addr, _)| addr == address)
            .map(|(_, points)| *points)
            .unwrap_or(0)
    }
}

/// A validator's preferences for one era.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ValidatorPrefs {
    /// Perbill (1_000_000_000 = 100%).
    pub commission_perbill: u32,
    pub blocked: bool,
}

/// On-chain identity record.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Identity {
    pub display_name: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StakingLedger {
    pub total: Balance,
    pub active: Balance,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Nominations {
    pub targets: Vec<String>,
    pub submitted_in: EraIndex,
}

/// An account's entry in the voter bags list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListNode {
    pub bag_upper: Balance,
}

/// Staking reads.
#[async_trait]
pub trait StakingReader: Send + Sync {
    async fn active_era(&self) -> Result<EraIndex, ChainError>;

    async fn min_nominator_bond(&self) -> Result<Balance, ChainError>;

    /// Addresses of the currently active validator set.
    async fn active_validators(&self) -> Result<Vec<String>, ChainError>;

    async fn era_reward_points(&self, era: EraIndex) -> Result<EraRewardPoints, ChainError>;

    /// Preferences in force for `era`. Missing records read as defaults.
    async fn validator_prefs(
        &self,
        era: EraIndex,
        address: &str,
    ) -> Result<ValidatorPrefs, ChainError>;

    /// Whether identity lookups are available at all.
    fn supports_identity(&self) -> bool {
        true
    }

    async fn identity_of(&self, address: &str) -> Result<Option<Identity>, ChainError>;

    async fn free_balance(&self, address: &str) -> Result<Balance, ChainError>;

    async fn staking_ledger(&self, address: &str) -> Result<Option<StakingLedger>, ChainError>;

    async fn nominations(&self, address: &str) -> Result<Option<Nominations>, ChainError>;

    /// Bag upper thresholds, descending.
    async fn bag_thresholds(&self) -> Result<Vec<Balance>, ChainError>;

    async fn list_node(&self, address: &str) -> Result<Option<ListNode>, ChainError>;
}

/// An opaque credential able to sign for one account.
pub trait AccountSigner: Send + Sync {
    fn address(&self) -> String;
}

/// A staking extrinsic. Amounts are in planck.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StakingCall {
    BondExtra(Balance),
    Unbond(Balance),
    Nominate(Vec<String>),
    Rebag { dislocated: String },
}

impl StakingCall {
    pub fn transaction_type(&self) -> TransactionType {
        match self {
            StakingCall::BondExtra(_) => TransactionType::BondExtra,
            StakingCall::Unbond(_) => TransactionType::Unbond,
            StakingCall::Nominate(_) => TransactionType::Nominate,
            StakingCall::Rebag { .. } => TransactionType::Rebag,
        }
    }
}

/// Staking writes.
#[async_trait]
pub trait StakingWriter: Send + Sync {
    type Signer: AccountSigner;

    /// Sign, submit and watch `call` until it is finalized or rejected.
    ///
    /// Intermediate `Submitted` and `InBlock` statuses go to `progress`.
    /// Returns the finalized block hash.
    async fn submit(
        &self,
        call: StakingCall,
        signer: &Self::Signer,
        progress: mpsc::UnboundedSender<TransactionStatus>,
    ) -> Result<String, ChainError>;
}
