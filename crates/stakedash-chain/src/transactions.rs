//! Staking extrinsic construction and submission.

use std::str::FromStr;

use crate::ChainClient;
use crate::error::ChainError;
use crate::ledger::{AccountSigner, StakingCall};
use crate::ss58::{parse_account, to_address};
use stakedash_core::{Network, TransactionStatus};
use subxt::dynamic::Value;
use subxt::tx::TxStatus;
use subxt::utils::AccountId32;
use subxt_signer::SecretUri;
use subxt_signer::sr25519::Keypair;
use tokio::sync::mpsc;

/// sr25519 keypair used to sign staking extrinsics.
pub struct KeypairSigner {
    keypair: Keypair,
    address: String,
}

impl KeypairSigner {
    /// Derive a keypair from a secret URI (mnemonic, `//Alice`, hex seed).
    pub fn from_suri(suri: &str, network: Network) -> Result<Self, ChainError> {
        let uri = SecretUri::from_str(suri).map_err(|e| ChainError::Signer(e.to_string()))?;
        let keypair = Keypair::from_uri(&uri).map_err(|e| ChainError::Signer(e.to_string()))?;
        let account = AccountId32::from(keypair.public_key().0);
        Ok(Self {
            address: to_address(&account, network),
            keypair,
        })
    }

    pub fn keypair(&self) -> &Keypair {
        &self.keypair
    }
}

impl AccountSigner for KeypairSigner {
    fn address(&self) -> String {
        self.address.clone()
    }
}

impl std::fmt::Debug for KeypairSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeypairSigner")
            .field("address", &self.address)
            .finish_non_exhaustive()
    }
}

/// Build the dynamic call for a staking operation.
pub fn build_call(call: &StakingCall) -> Result<subxt::tx::DynamicPayload, ChainError> {
    let payload = match call {
        StakingCall::BondExtra(amount) => {
            subxt::dynamic::tx("Staking", "bond_extra", vec![Value::u128(*amount)])
        }
        StakingCall::Unbond(amount) => {
            subxt::dynamic::tx("Staking", "unbond", vec![Value::u128(*amount)])
        }
        StakingCall::Nominate(targets) => {
            // Vec<MultiAddress>, each as MultiAddress::Id
            let targets = targets
                .iter()
                .map(|t| {
                    parse_account(t)
                        .map(|account| Value::unnamed_variant("Id", [Value::from_bytes(account)]))
                })
                .collect::<Result<Vec<_>, _>>()?;
            subxt::dynamic::tx(
                "Staking",
                "nominate",
                vec![Value::unnamed_composite(targets)],
            )
        }
        StakingCall::Rebag { dislocated } => {
            let account = parse_account(dislocated)?;
            subxt::dynamic::tx(
                "VoterList",
                "rebag",
                vec![Value::unnamed_variant(
                    "Id",
                    [Value::from_bytes(account)],
                )],
            )
        }
    };
    Ok(payload)
}

impl ChainClient {
    /// Sign and submit a staking call, reporting progress until finalization.
    pub async fn submit_staking_call(
        &self,
        call: StakingCall,
        signer: &KeypairSigner,
        progress: mpsc::UnboundedSender<TransactionStatus>,
    ) -> Result<String, ChainError> {
        let tx_type = call.transaction_type();
        let payload = build_call(&call)?;

        tracing::info!("Submitting {} for {}", tx_type.label(), signer.address());
        let mut watch = self
            .client()
            .tx()
            .sign_and_submit_then_watch_default(&payload, signer.keypair())
            .await?;
        let _ = progress.send(TransactionStatus::Submitted);

        while let Some(status) = watch.next().await {
            match status? {
                TxStatus::InBestBlock(in_block) => {
                    let hash = format!("0x{}", hex::encode(in_block.block_hash().0));
                    tracing::info!("{} included in block {}", tx_type.label(), hash);
                    let _ = progress.send(TransactionStatus::InBlock(hash));
                }
                TxStatus::InFinalizedBlock(in_block) => {
                    let hash = format!("0x{}", hex::encode(in_block.block_hash().0));
                    in_block.wait_for_success().await?;
                    tracing::info!("{} finalized in block {}", tx_type.label(), hash);
                    return Ok(hash);
                }
                TxStatus::Error { message }
                | TxStatus::Invalid { message }
                | TxStatus::Dropped { message } => {
                    tracing::error!("{} rejected: {}", tx_type.label(), message);
                    return Err(ChainError::Transaction(message));
                }
                _ => {}
            }
        }

        Err(ChainError::Transaction(
            "Transaction status stream ended before finalization".into(),
        ))
    }
}
