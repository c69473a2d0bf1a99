//! Scripted in-memory ledger for store and facade tests.

#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use stakedash_chain::{
    AccountSigner, ChainError, EraRewardPoints, Identity, ListNode, Nominations, StakingCall,
    StakingLedger, StakingReader, StakingWriter, ValidatorPrefs,
};
use stakedash_core::{Balance, EraIndex, TransactionStatus, correct_bag};
use tokio::sync::mpsc;

pub const ACCOUNT: &str = "nominator";

/// Validator addresses `v00`, `v01`, ...
pub fn validator_addresses(count: usize) -> Vec<String> {
    (0..count).map(|i| format!("v{:02}", i)).collect()
}

pub struct MockSigner(pub String);

impl MockSigner {
    pub fn account() -> Self {
        MockSigner(ACCOUNT.to_string())
    }
}

impl AccountSigner for MockSigner {
    fn address(&self) -> String {
        self.0.clone()
    }
}

#[derive(Default)]
pub struct MockLedger {
    pub active_era: EraIndex,
    pub min_bond: Balance,
    pub validators: Vec<String>,
    pub points: HashMap<EraIndex, EraRewardPoints>,
    pub prefs: HashMap<String, ValidatorPrefs>,
    pub identities: HashMap<String, Identity>,
    pub thresholds: Vec<Balance>,
    pub free_balances: HashMap<String, Balance>,
    pub ledgers: Mutex<HashMap<String, StakingLedger>>,
    pub nominations: Mutex<HashMap<String, Nominations>>,
    pub list_nodes: Mutex<HashMap<String, ListNode>>,

    /// Addresses whose prefs read fails.
    pub failing_prefs: HashSet<String>,
    /// Delay before an era's reward points are returned.
    pub points_delay: HashMap<EraIndex, Duration>,
    /// Eras whose reward points read fails, after any delay.
    pub failing_points: HashSet<EraIndex>,
    pub identity_delay: Option<Duration>,
    pub identity_available: bool,

    pub fail_reads: AtomicBool,
    pub fail_submit: bool,

    pub reads: AtomicUsize,
    pub submitted: Mutex<Vec<StakingCall>>,
}

impl MockLedger {
    /// Ledger at `active_era` with `count` validators earning points in every
    /// era up to the active one. Validator `i` has `10 * (i + 1)` points and
    /// `i`% commission.
    pub fn new(active_era: EraIndex, count: usize) -> Self {
        let validators = validator_addresses(count);
        let individual: Vec<(String, u32)> = validators
            .iter()
            .enumerate()
            .map(|(i, address)| (address.clone(), 10 * (i as u32 + 1)))
            .collect();
        let total = individual.iter().map(|(_, p)| p).sum();
        let points = (active_era.saturating_sub(10)..=active_era)
            .map(|era| {
                (
                    era,
                    EraRewardPoints {
                        total,
                        individual: individual.clone(),
                    },
                )
            })
            .collect();
        let prefs = validators
            .iter()
            .enumerate()
            .map(|(i, address)| {
                (
                    address.clone(),
                    ValidatorPrefs {
                        commission_perbill: i as u32 * 10_000_000,
                        blocked: false,
                    },
                )
            })
            .collect();

        Self {
            active_era,
            min_bond: 250,
            validators,
            points,
            prefs,
            thresholds: vec![3000, 2000, 1000],
            identity_available: true,
            ..Self::default()
        }
    }

    pub fn with_ledger(self, address: &str, active: Balance) -> Self {
        self.ledgers.lock().unwrap().insert(
            address.to_string(),
            StakingLedger {
                total: active,
                active,
            },
        );
        self
    }

    pub fn with_nominations(self, address: &str, targets: &[&str]) -> Self {
        self.nominations.lock().unwrap().insert(
            address.to_string(),
            Nominations {
                targets: targets.iter().map(|t| t.to_string()).collect(),
                submitted_in: self.active_era,
            },
        );
        self
    }

    pub fn with_list_node(self, address: &str, bag_upper: Balance) -> Self {
        self.list_nodes
            .lock()
            .unwrap()
            .insert(address.to_string(), ListNode { bag_upper });
        self
    }

    pub fn with_free_balance(mut self, address: &str, free: Balance) -> Self {
        self.free_balances.insert(address.to_string(), free);
        self
    }

    pub fn read_count(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }

    pub fn set_failing(&self, failing: bool) {
        self.fail_reads.store(failing, Ordering::SeqCst);
    }

    pub fn submitted(&self) -> Vec<StakingCall> {
        self.submitted.lock().unwrap().clone()
    }

    fn read(&self) -> Result<(), ChainError> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(ChainError::Connection("scripted failure".into()));
        }
        Ok(())
    }

    fn apply(&self, call: &StakingCall, who: &str) {
        match call {
            StakingCall::BondExtra(amount) => {
                let mut ledgers = self.ledgers.lock().unwrap();
                let ledger = ledgers.entry(who.to_string()).or_default();
                ledger.active += amount;
                ledger.total += amount;
            }
            StakingCall::Unbond(amount) => {
                let mut ledgers = self.ledgers.lock().unwrap();
                if let Some(ledger) = ledgers.get_mut(who) {
                    ledger.active = ledger.active.saturating_sub(*amount);
                }
            }
            StakingCall::Nominate(targets) => {
                self.nominations.lock().unwrap().insert(
                    who.to_string(),
                    Nominations {
                        targets: targets.clone(),
                        submitted_in: self.active_era,
                    },
                );
            }
            StakingCall::Rebag { dislocated } => {
                let active = self
                    .ledgers
                    .lock()
                    .unwrap()
                    .get(dislocated)
                    .map(|l| l.active)
                    .unwrap_or(0);
                if let Some(bag_upper) = correct_bag(&self.thresholds, active) {
                    self.list_nodes
                        .lock()
                        .unwrap()
                        .insert(dislocated.clone(), ListNode { bag_upper });
                }
            }
        }
    }
}

#[async_trait]
impl StakingReader for MockLedger {
    async fn active_era(&self) -> Result<EraIndex, ChainError> {
        self.read()?;
        Ok(self.active_era)
    }

    async fn min_nominator_bond(&self) -> Result<Balance, ChainError> {
        self.read()?;
        Ok(self.min_bond)
    }

    async fn active_validators(&self) -> Result<Vec<String>, ChainError> {
        self.read()?;
        Ok(self.validators.clone())
    }

    async fn era_reward_points(&self, era: EraIndex) -> Result<EraRewardPoints, ChainError> {
        self.read()?;
        if let Some(delay) = self.points_delay.get(&era) {
            tokio::time::sleep(*delay).await;
        }
        if self.failing_points.contains(&era) {
            return Err(ChainError::Storage(format!("reward points for era {}", era)));
        }
        Ok(self.points.get(&era).cloned().unwrap_or_default())
    }

    async fn validator_prefs(
        &self,
        _era: EraIndex,
        address: &str,
    ) -> Result<ValidatorPrefs, ChainError> {
        self.read()?;
        if self.failing_prefs.contains(address) {
            return Err(ChainError::Storage(format!("prefs for {}", address)));
        }
        Ok(self.prefs.get(address).copied().unwrap_or_default())
    }

    fn supports_identity(&self) -> bool {
        self.identity_available
    }

    async fn identity_of(&self, address: &str) -> Result<Option<Identity>, ChainError> {
        self.read()?;
        if let Some(delay) = self.identity_delay {
            tokio::time::sleep(delay).await;
        }
        Ok(self.identities.get(address).cloned())
    }

    async fn free_balance(&self, address: &str) -> Result<Balance, ChainError> {
        self.read()?;
        Ok(self.free_balances.get(address).copied().unwrap_or(0))
    }

    async fn staking_ledger(&self, address: &str) -> Result<Option<StakingLedger>, ChainError> {
        self.read()?;
        Ok(self.ledgers.lock().unwrap().get(address).copied())
    }

    async fn nominations(&self, address: &str) -> Result<Option<Nominations>, ChainError> {
        self.read()?;
        Ok(self.nominations.lock().unwrap().get(address).cloned())
    }

    async fn bag_thresholds(&self) -> Result<Vec<Balance>, ChainError> {
        self.read()?;
        Ok(self.thresholds.clone())
    }

    async fn list_node(&self, address: &str) -> Result<Option<ListNode>, ChainError> {
        self.read()?;
        Ok(self.list_nodes.lock().unwrap().get(address).copied())
    }
}

#[async_trait]
impl StakingWriter for MockLedger {
    type Signer = MockSigner;

    async fn submit(
        &self,
        call: StakingCall,
        signer: &MockSigner,
        progress: mpsc::UnboundedSender<TransactionStatus>,
    ) -> Result<String, ChainError> {
        self.submitted.lock().unwrap().push(call.clone());
        let _ = progress.send(TransactionStatus::Submitted);
        let _ = progress.send(TransactionStatus::InBlock("0xbest".into()));
        if self.fail_submit {
            return Err(ChainError::Transaction("scripted rejection".into()));
        }
        self.apply(&call, &signer.address());
        Ok("0xfinal".into())
    }
}
