//! `StakingReader` and `StakingWriter` over a live `ChainClient`.

use async_trait::async_trait;
use stakedash_core::{Balance, EraIndex, TransactionStatus};
use tokio::sync::mpsc;

use crate::ChainClient;
use crate::error::ChainError;
use crate::ledger::{
    EraRewardPoints, Identity, ListNode, Nominations, StakingCall, StakingLedger, StakingReader,
    StakingWriter, ValidatorPrefs,
};
use crate::ss58::parse_account;
use crate::transactions::KeypairSigner;

#[async_trait]
impl StakingReader for ChainClient {
    async fn active_era(&self) -> Result<EraIndex, ChainError> {
        self.get_active_era().await
    }

    async fn min_nominator_bond(&self) -> Result<Balance, ChainError> {
        self.get_min_nominator_bond().await
    }

    async fn active_validators(&self) -> Result<Vec<String>, ChainError> {
        self.get_active_validators().await
    }

    async fn era_reward_points(&self, era: EraIndex) -> Result<EraRewardPoints, ChainError> {
        self.get_era_reward_points(era).await
    }

    async fn validator_prefs(
        &self,
        era: EraIndex,
        address: &str,
    ) -> Result<ValidatorPrefs, ChainError> {
        self.get_era_validator_prefs(era, address).await
    }

    fn supports_identity(&self) -> bool {
        self.people().is_some()
    }

    async fn identity_of(&self, address: &str) -> Result<Option<Identity>, ChainError> {
        let Some(people) = self.people() else {
            return Ok(None);
        };
        let account = parse_account(address)?;
        let identity = people.get_identity(&account).await?;
        Ok(identity.map(|info| Identity {
            display_name: info.display_name,
        }))
    }

    async fn free_balance(&self, address: &str) -> Result<Balance, ChainError> {
        self.get_free_balance(address).await
    }

    async fn staking_ledger(&self, address: &str) -> Result<Option<StakingLedger>, ChainError> {
        self.get_staking_ledger(address).await
    }

    async fn nominations(&self, address: &str) -> Result<Option<Nominations>, ChainError> {
        self.get_nominations(address).await
    }

    async fn bag_thresholds(&self) -> Result<Vec<Balance>, ChainError> {
        self.get_bag_thresholds()
    }

    async fn list_node(&self, address: &str) -> Result<Option<ListNode>, ChainError> {
        self.get_list_node(address).await
    }
}

#[async_trait]
impl StakingWriter for ChainClient {
    type Signer = KeypairSigner;

    async fn submit(
        &self,
        call: StakingCall,
        signer: &KeypairSigner,
        progress: mpsc::UnboundedSender<TransactionStatus>,
    ) -> Result<String, ChainError> {
        self.submit_staking_call(call, signer, progress).await
    }
}
