//! Validator-related chain queries.

use crate::ChainClient;
use crate::error::ChainError;
use crate::ledger::{EraRewardPoints, ValidatorPrefs};
use crate::queries::{account_from_key, extract_account_id, sequence, u128_field};
use crate::ss58::{parse_account, to_address};
use stakedash_core::EraIndex;
use subxt::dynamic::{At, DecodedValueThunk, Value};

impl ChainClient {
    /// Active validator set.
    ///
    /// Read from the relay chain session when connected, otherwise from the
    /// active era's exposures on Asset Hub.
    pub async fn get_active_validators(&self) -> Result<Vec<String>, ChainError> {
        if let Some(relay) = self.relay_client() {
            let storage_query = subxt::dynamic::storage("Session", "Validators", ());
            let result: Option<DecodedValueThunk> = relay
                .storage()
                .at_latest()
                .await?
                .fetch(&storage_query)
                .await?;

            if let Some(value) = result {
                let decoded = value.to_value()?;
                let validators: Vec<String> = sequence(&decoded)
                    .filter_map(extract_account_id)
                    .map(|account| to_address(&account, self.network()))
                    .collect();
                if !validators.is_empty() {
                    tracing::debug!("Session reports {} validators", validators.len());
                    return Ok(validators);
                }
            }
            tracing::debug!("Session.Validators empty, falling back to exposures");
        }

        let era = self.get_active_era().await?;
        self.get_era_exposed_validators(era).await
    }

    /// Validators with an exposure in `era`.
    pub async fn get_era_exposed_validators(
        &self,
        era: EraIndex,
    ) -> Result<Vec<String>, ChainError> {
        let storage_query = subxt::dynamic::storage(
            "Staking",
            "ErasStakersOverview",
            vec![Value::u128(era as u128)],
        );

        let mut validators = Vec::new();
        let mut iter = self
            .client()
            .storage()
            .at_latest()
            .await?
            .iter(storage_query)
            .await?;

        while let Some(result) = iter.next().await {
            let kv = result?;
            if let Some(account) = account_from_key(&kv.key_bytes) {
                validators.push(to_address(&account, self.network()));
            }
        }

        tracing::debug!("Era {} has {} exposed validators", era, validators.len());
        Ok(validators)
    }

    /// Reward points for all validators in `era`.
    pub async fn get_era_reward_points(
        &self,
        era: EraIndex,
    ) -> Result<EraRewardPoints, ChainError> {
        let storage_query = subxt::dynamic::storage(
            "Staking",
            "ErasRewardPoints",
            vec![Value::u128(era as u128)],
        );

        let result: Option<DecodedValueThunk> = self
            .client()
            .storage()
            .at_latest()
            .await?
            .fetch(&storage_query)
            .await?;

        let Some(value) = result else {
            return Ok(EraRewardPoints::default());
        };

        // EraRewardPoints = { total: u32, individual: BTreeMap<AccountId, u32> }
        let decoded = value.to_value()?;
        let total = u128_field(&decoded, "total").unwrap_or(0) as u32;

        let individual = decoded
            .at("individual")
            .map(|map| {
                sequence(map)
                    .filter_map(|entry| {
                        let account = entry.at(0usize).and_then(extract_account_id)?;
                        let points = entry.at(1usize).and_then(|v| v.as_u128()).unwrap_or(0);
                        Some((to_address(&account, self.network()), points as u32))
                    })
                    .collect()
            })
            .unwrap_or_default();

        Ok(EraRewardPoints { total, individual })
    }

    /// A validator's commission and blocked flag for `era`.
    pub async fn get_era_validator_prefs(
        &self,
        era: EraIndex,
        address: &str,
    ) -> Result<ValidatorPrefs, ChainError> {
        let account = parse_account(address)?;
        let storage_query = subxt::dynamic::storage(
            "Staking",
            "ErasValidatorPrefs",
            vec![Value::u128(era as u128), Value::from_bytes(account)],
        );

        let result: Option<DecodedValueThunk> = self
            .client()
            .storage()
            .at_latest()
            .await?
            .fetch(&storage_query)
            .await?;

        let Some(value) = result else {
            return Ok(ValidatorPrefs::default());
        };

        // ValidatorPrefs = { commission: Perbill, blocked: bool }
        let decoded = value.to_value()?;
        let commission_perbill = decoded
            .at("commission")
            .and_then(|c| c.as_u128().or_else(|| c.at(0usize).and_then(|v| v.as_u128())))
            .unwrap_or(0)
            .min(u32::MAX as u128) as u32;
        let blocked = decoded
            .at("blocked")
            .and_then(|v: &Value<u32>| v.as_bool())
            .unwrap_or(false);

        Ok(ValidatorPrefs {
            commission_perbill,
            blocked,
        })
    }
}
