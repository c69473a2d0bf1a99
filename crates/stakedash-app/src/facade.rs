//! High-level staking operations for the presentation layer.
//!
//! The facade sequences store calls and, after every write, schedules the
//! re-reads that bring account state back in line with the chain.

use std::sync::Arc;
use std::time::Duration;

use stakedash_chain::{AccountSigner, StakingReader, StakingWriter};
use stakedash_core::{AppConfig, BagListInfo, Balance, EraIndex, NominatorStatus, TransactionStatus, Validator};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::debug;

use crate::events::StoreEvent;
use crate::store::{Rebag, StakingError, StakingStore, StoreConfig};

/// When account state is re-read after a write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReconcilePolicy {
    /// Re-read as soon as the transaction reaches a terminal status.
    #[default]
    OnFinalized,
    /// Wait a fixed delay after the terminal status, then re-read.
    FixedDelay(Duration),
}

impl ReconcilePolicy {
    pub fn from_config(config: &AppConfig) -> Self {
        match config.reconcile_delay() {
            Some(delay) => ReconcilePolicy::FixedDelay(delay),
            None => ReconcilePolicy::OnFinalized,
        }
    }
}

/// Account-scoped state loaded together.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountSnapshot {
    pub nominator_status: NominatorStatus,
    pub can_nominate: bool,
    pub bag_list_info: BagListInfo,
}

/// Result of a write operation.
#[derive(Debug)]
pub enum TxOutcome {
    /// Nothing was submitted.
    Skipped { reason: String },
    Completed {
        status: TransactionStatus,
        /// Pending reconciliation of the affected account state.
        refresh: JoinHandle<()>,
    },
}

impl TxOutcome {
    pub fn status(&self) -> Option<&TransactionStatus> {
        match self {
            TxOutcome::Skipped { .. } => None,
            TxOutcome::Completed { status, .. } => Some(status),
        }
    }

    /// Wait for any scheduled reconciliation to finish.
    pub async fn reconciled(self) {
        if let TxOutcome::Completed { refresh, .. } = self {
            if let Err(e) = refresh.await {
                tracing::warn!("Reconciliation task failed: {}", e);
            }
        }
    }
}

/// Which account reads to repeat after a write.
#[derive(Debug, Clone, Copy)]
struct Reconcile {
    nominator: bool,
    bags: bool,
}

pub struct StakingFacade<C> {
    store: StakingStore<C>,
    policy: ReconcilePolicy,
}

impl<C> StakingFacade<C>
where
    C: StakingReader + StakingWriter + 'static,
{
    pub fn new(
        client: Arc<C>,
        config: StoreConfig,
        policy: ReconcilePolicy,
    ) -> (Self, mpsc::UnboundedReceiver<StoreEvent>) {
        let (store, events) = StakingStore::new(client, config);
        (Self { store, policy }, events)
    }

    pub fn store(&self) -> &StakingStore<C> {
        &self.store
    }

    pub fn policy(&self) -> ReconcilePolicy {
        self.policy
    }

    /// Load era data and, when an account is given, its staking state.
    pub async fn initialize(&self, account: Option<&str>) -> Result<(), StakingError> {
        self.store.fetch_initial_data().await?;
        if let Some(address) = account {
            self.load_account_data(address).await;
        }
        Ok(())
    }

    pub async fn load_account_data(&self, address: &str) -> AccountSnapshot {
        let (nominator_status, can_nominate, bag_list_info) = tokio::join!(
            self.store.check_nominator_status(address),
            self.store.check_can_nominate(address),
            self.store.check_bag_list_position(address)
        );
        AccountSnapshot {
            nominator_status,
            can_nominate,
            bag_list_info,
        }
    }

    pub async fn refresh_account(&self, address: &str) -> AccountSnapshot {
        self.load_account_data(address).await
    }

    pub async fn load_validators_for_era(
        &self,
        era: EraIndex,
    ) -> Result<Vec<Validator>, StakingError> {
        self.store.handle_era_change(era).await
    }

    /// Reload `era` from the chain, bypassing the cache.
    pub async fn refresh_era(&self, era: EraIndex) -> Result<Vec<Validator>, StakingError> {
        self.store.invalidate_era(era);
        self.store.fetch_validators_for_era(era).await
    }

    pub async fn check_bag_position(&self, address: &str) -> BagListInfo {
        self.store.check_bag_list_position(address).await
    }

    pub async fn bond_more(
        &self,
        signer: Option<&C::Signer>,
        amount: Balance,
    ) -> Result<TxOutcome, StakingError> {
        let status = self.store.bond_more_tokens(signer, amount).await?;
        Ok(self.completed(status, signer, Reconcile { nominator: true, bags: true }))
    }

    pub async fn unbond(
        &self,
        signer: Option<&C::Signer>,
        amount: Balance,
    ) -> Result<TxOutcome, StakingError> {
        let status = self.store.unbond_tokens(signer, amount).await?;
        Ok(self.completed(status, signer, Reconcile { nominator: true, bags: true }))
    }

    /// Nominate the store's current selection.
    pub async fn nominate(&self, signer: Option<&C::Signer>) -> Result<TxOutcome, StakingError> {
        let status = self.store.submit_nominations(signer).await?;
        Ok(self.completed(status, signer, Reconcile { nominator: true, bags: false }))
    }

    pub async fn rebag(&self, signer: Option<&C::Signer>) -> Result<TxOutcome, StakingError> {
        match self.store.rebag_nominator(signer).await? {
            Rebag::Submitted(status) => {
                Ok(self.completed(status, signer, Reconcile { nominator: false, bags: true }))
            }
            Rebag::Skipped(reason) => Ok(TxOutcome::Skipped {
                reason: reason.to_string(),
            }),
        }
    }

    fn completed(
        &self,
        status: TransactionStatus,
        signer: Option<&C::Signer>,
        reconcile: Reconcile,
    ) -> TxOutcome {
        // Write operations reject a missing signer before reaching here.
        let address = signer.map(|s| s.address()).unwrap_or_default();
        TxOutcome::Completed {
            status,
            refresh: self.schedule_reconcile(address, reconcile),
        }
    }

    fn schedule_reconcile(&self, address: String, reconcile: Reconcile) -> JoinHandle<()> {
        let store = self.store.clone();
        let policy = self.policy;
        tokio::spawn(async move {
            if let ReconcilePolicy::FixedDelay(delay) = policy {
                tokio::time::sleep(delay).await;
            }
            debug!("Reconciling account state for {}", address);
            match (reconcile.nominator, reconcile.bags) {
                (true, true) => {
                    let _ = tokio::join!(
                        store.check_nominator_status(&address),
                        store.check_bag_list_position(&address)
                    );
                }
                (true, false) => {
                    store.check_nominator_status(&address).await;
                }
                (false, true) => {
                    store.check_bag_list_position(&address).await;
                }
                (false, false) => {}
            }
        })
    }
}
