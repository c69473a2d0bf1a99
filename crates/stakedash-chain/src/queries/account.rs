//! Account-related chain queries.

use crate::ChainClient;
use crate::error::ChainError;
use crate::ledger::{ListNode, Nominations, StakingLedger};
use crate::queries::{extract_account_id, sequence, u128_field};
use crate::ss58::{parse_account, to_address};
use stakedash_core::Balance;
use subxt::dynamic::{At, DecodedValueThunk, Value};

impl ChainClient {
    /// Free balance of an account (zero if the account does not exist).
    pub async fn get_free_balance(&self, address: &str) -> Result<Balance, ChainError> {
        let account = parse_account(address)?;
        let storage_query =
            subxt::dynamic::storage("System", "Account", vec![Value::from_bytes(account)]);

        let result: Option<DecodedValueThunk> = self
            .client()
            .storage()
            .at_latest()
            .await?
            .fetch(&storage_query)
            .await?;

        let Some(value) = result else {
            return Ok(0);
        };

        // AccountInfo = { nonce, consumers, providers, sufficients, data: AccountData }
        let decoded = value.to_value()?;
        Ok(decoded
            .at("data")
            .and_then(|data| u128_field(data, "free"))
            .unwrap_or(0))
    }

    /// Staking ledger keyed by stash.
    pub async fn get_staking_ledger(
        &self,
        address: &str,
    ) -> Result<Option<StakingLedger>, ChainError> {
        let account = parse_account(address)?;
        let storage_query =
            subxt::dynamic::storage("Staking", "Ledger", vec![Value::from_bytes(account)]);

        let result: Option<DecodedValueThunk> = self
            .client()
            .storage()
            .at_latest()
            .await?
            .fetch(&storage_query)
            .await?;

        let Some(value) = result else {
            return Ok(None);
        };

        let decoded = value.to_value()?;
        Ok(Some(StakingLedger {
            total: u128_field(&decoded, "total").unwrap_or(0),
            active: u128_field(&decoded, "active").unwrap_or(0),
        }))
    }

    /// Nomination targets of a stash.
    pub async fn get_nominations(&self, address: &str) -> Result<Option<Nominations>, ChainError> {
        let account = parse_account(address)?;
        let storage_query =
            subxt::dynamic::storage("Staking", "Nominators", vec![Value::from_bytes(account)]);

        let result: Option<DecodedValueThunk> = self
            .client()
            .storage()
            .at_latest()
            .await?
            .fetch(&storage_query)
            .await?;

        let Some(value) = result else {
            return Ok(None);
        };

        // Nominations = { targets, submitted_in, suppressed }
        let decoded = value.to_value()?;
        let targets = decoded
            .at("targets")
            .map(|targets| {
                sequence(targets)
                    .filter_map(extract_account_id)
                    .map(|account| to_address(&account, self.network()))
                    .collect()
            })
            .unwrap_or_default();
        let submitted_in = u128_field(&decoded, "submitted_in").unwrap_or(0) as u32;

        Ok(Some(Nominations {
            targets,
            submitted_in,
        }))
    }

    /// The account's node in the voter bags list.
    pub async fn get_list_node(&self, address: &str) -> Result<Option<ListNode>, ChainError> {
        let account = parse_account(address)?;
        let storage_query =
            subxt::dynamic::storage("VoterList", "ListNodes", vec![Value::from_bytes(account)]);

        let result: Option<DecodedValueThunk> = self
            .client()
            .storage()
            .at_latest()
            .await?
            .fetch(&storage_query)
            .await?;

        let Some(value) = result else {
            return Ok(None);
        };

        // Node = { id, prev, next, bag_upper, score }
        let decoded = value.to_value()?;
        let bag_upper = u128_field(&decoded, "bag_upper")
            .ok_or_else(|| ChainError::InvalidData("ListNode without bag_upper".into()))?;
        Ok(Some(ListNode { bag_upper }))
    }
}
