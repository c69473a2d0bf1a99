//! Era and staking-parameter queries.

use crate::ChainClient;
use crate::error::ChainError;
use crate::queries::{sequence, u128_field};
use stakedash_core::{Balance, EraIndex, descending_thresholds};
use subxt::dynamic::{DecodedValueThunk, Value};

impl ChainClient {
    /// Index of the active era.
    pub async fn get_active_era(&self) -> Result<EraIndex, ChainError> {
        let storage_query = subxt::dynamic::storage("Staking", "ActiveEra", ());

        let result: Option<DecodedValueThunk> = self
            .client()
            .storage()
            .at_latest()
            .await?
            .fetch(&storage_query)
            .await?;

        let Some(value) = result else {
            return Err(ChainError::Storage("ActiveEra is not set".into()));
        };

        // ActiveEraInfo = { index: u32, start: Option<u64> }
        let decoded = value.to_value()?;
        u128_field(&decoded, "index")
            .map(|index| index as EraIndex)
            .ok_or_else(|| ChainError::InvalidData("Missing era index".into()))
    }

    /// Minimum active bond required to nominate.
    pub async fn get_min_nominator_bond(&self) -> Result<Balance, ChainError> {
        let storage_query = subxt::dynamic::storage("Staking", "MinNominatorBond", ());

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
        value
            .to_value()?
            .as_u128()
            .ok_or_else(|| ChainError::InvalidData("Invalid MinNominatorBond".into()))
    }

    /// Voter list bag thresholds, descending.
    pub fn get_bag_thresholds(&self) -> Result<Vec<Balance>, ChainError> {
        let constant = subxt::dynamic::constant("VoterList", "BagThresholds");
        let value = self.client().constants().at(&constant)?;
        let decoded: Value<u32> = value.to_value()?;

        let thresholds = sequence(&decoded)
            .map(|v| v.as_u128())
            .collect::<Option<Vec<Balance>>>()
            .ok_or_else(|| ChainError::InvalidData("Invalid BagThresholds".into()))?;

        tracing::debug!("Read {} bag thresholds", thresholds.len());
        Ok(descending_thresholds(thresholds))
    }
}
