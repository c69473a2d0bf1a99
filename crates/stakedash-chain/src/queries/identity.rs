//! Identity queries from the People chain.

use crate::error::ChainError;
use crate::queries::{extract_account_id, sequence};
use subxt::dynamic::{At, DecodedValueThunk, Value};
use subxt::ext::scale_value::ValueDef;
use subxt::utils::AccountId32;
use subxt::{OnlineClient, PolkadotConfig};

/// Identity as resolved on the People chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentityInfo {
    /// Display text, `parent/sub` for sub-accounts.
    pub display_name: Option<String>,
}

pub struct PeopleChainClient {
    client: OnlineClient<PolkadotConfig>,
}

impl PeopleChainClient {
    pub fn new(client: OnlineClient<PolkadotConfig>) -> Self {
        Self { client }
    }

    /// Identity of an account, following one level of sub-identity.
    pub async fn get_identity(
        &self,
        account: &AccountId32,
    ) -> Result<Option<IdentityInfo>, ChainError> {
        if let Some(identity) = self.get_direct_identity(account).await? {
            return Ok(Some(identity));
        }
        self.get_sub_identity(account).await
    }

    async fn get_direct_identity(
        &self,
        account: &AccountId32,
    ) -> Result<Option<IdentityInfo>, ChainError> {
        let storage_query = subxt::dynamic::storage(
            "Identity",
            "IdentityOf",
            vec![Value::from_bytes(account.clone())],
        );

        let result: Option<DecodedValueThunk> = self
            .client
            .storage()
            .at_latest()
            .await?
            .fetch(&storage_query)
            .await?;

        let Some(value) = result else {
            return Ok(None);
        };

        // (Registration { judgements, deposit, info }, Option<Username>) or a bare Registration
        let decoded = value.to_value()?;
        let registration = match decoded.at("info") {
            Some(_) => &decoded,
            None => decoded.at(0usize).unwrap_or(&decoded),
        };

        let display_name = registration
            .at("info")
            .and_then(|info| info.at("display"))
            .and_then(extract_data_field);
        Ok(Some(IdentityInfo { display_name }))
    }

    async fn get_sub_identity(
        &self,
        account: &AccountId32,
    ) -> Result<Option<IdentityInfo>, ChainError> {
        let storage_query = subxt::dynamic::storage(
            "Identity",
            "SuperOf",
            vec![Value::from_bytes(account.clone())],
        );

        let result: Option<DecodedValueThunk> = self
            .client
            .storage()
            .at_latest()
            .await?
            .fetch(&storage_query)
            .await?;

        let Some(value) = result else {
            return Ok(None);
        };

        // SuperOf = (parent, sub_name)
        let decoded = value.to_value()?;
        let Some(parent) = decoded.at(0usize).and_then(extract_account_id) else {
            return Ok(None);
        };
        let sub_name = decoded.at(1usize).and_then(extract_data_field);

        let Some(parent_identity) = self.get_direct_identity(&parent).await? else {
            return Ok(None);
        };

        let display_name = match (parent_identity.display_name, sub_name) {
            (Some(parent), Some(sub)) => Some(format!("{}/{}", parent, sub)),
            (parent, sub) => parent.or(sub),
        };

        Ok(Some(IdentityInfo { display_name }))
    }
}

/// Name of an enum value, if it is one.
fn variant_name(value: &Value<u32>) -> Option<&str> {
    match &value.value {
        ValueDef::Variant(variant) => Some(variant.name.as_str()),
        _ => None,
    }
}

/// Text of an identity `Data` field (`Raw0`..`Raw32`).
fn extract_data_field(value: &Value<u32>) -> Option<String> {
    let inner = match variant_name(value) {
        Some(name) if name.starts_with("Raw") => value.at(0usize)?,
        Some(_) => return None,
        None => value,
    };

    let bytes: Vec<u8> = sequence(inner)
        .filter_map(|b| b.as_u128())
        .map(|b| b as u8)
        .filter(|b| *b != 0)
        .collect();

    if bytes.is_empty() {
        return None;
    }
    Some(String::from_utf8_lossy(&bytes).into_owned())
}
