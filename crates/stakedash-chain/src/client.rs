//! Chain client using subxt over WebSocket RPC.

use crate::config::{ChainKind, default_endpoints};
use crate::error::ChainError;
use crate::queries::identity::PeopleChainClient;
use stakedash_core::Network;

use subxt::backend::rpc::RpcClient;
use subxt::{OnlineClient, PolkadotConfig};

/// Endpoint overrides. `None` uses the network's public endpoints.
#[derive(Debug, Clone, Default)]
pub struct RpcEndpoints {
    pub asset_hub: Option<String>,
    pub relay: Option<String>,
    pub people: Option<String>,
}

impl RpcEndpoints {
    fn get(&self, kind: ChainKind) -> Option<&str> {
        match kind {
            ChainKind::AssetHub => self.asset_hub.as_deref(),
            ChainKind::Relay => self.relay.as_deref(),
            ChainKind::People => self.people.as_deref(),
        }
    }
}

/// Connection to a network's staking chains.
///
/// Asset Hub is required. The relay and People chains are optional: without
/// the relay chain the active set is derived from era exposures, without the
/// People chain identity lookups are skipped.
pub struct ChainClient {
    network: Network,
    client: OnlineClient<PolkadotConfig>,
    relay_client: Option<OnlineClient<PolkadotConfig>>,
    people: Option<PeopleChainClient>,
}

impl ChainClient {
    pub async fn connect(network: Network, endpoints: &RpcEndpoints) -> Result<Self, ChainError> {
        let client = connect_chain(network, ChainKind::AssetHub, endpoints).await?;

        let relay_client = match connect_chain(network, ChainKind::Relay, endpoints).await {
            Ok(client) => Some(client),
            Err(e) => {
                tracing::warn!("Relay chain unavailable, using era exposures: {}", e);
                None
            }
        };

        let people = match connect_chain(network, ChainKind::People, endpoints).await {
            Ok(client) => Some(PeopleChainClient::new(client)),
            Err(e) => {
                tracing::warn!("People chain unavailable, identities disabled: {}", e);
                None
            }
        };

        Ok(Self {
            network,
            client,
            relay_client,
            people,
        })
    }

    pub fn network(&self) -> Network {
        self.network
    }

    /// Asset Hub client.
    pub fn client(&self) -> &OnlineClient<PolkadotConfig> {
        &self.client
    }

    pub fn relay_client(&self) -> Option<&OnlineClient<PolkadotConfig>> {
        self.relay_client.as_ref()
    }

    pub fn people(&self) -> Option<&PeopleChainClient> {
        self.people.as_ref()
    }
}

/// Connect to one chain, trying endpoints in order.
async fn connect_chain(
    network: Network,
    kind: ChainKind,
    endpoints: &RpcEndpoints,
) -> Result<OnlineClient<PolkadotConfig>, ChainError> {
    let candidates: Vec<&str> = match endpoints.get(kind) {
        Some(endpoint) => vec![endpoint],
        None => default_endpoints(network, kind).to_vec(),
    };

    let mut last_error = None;
    for endpoint in candidates {
        tracing::info!("Trying {} {} via {}", network, kind, endpoint);

        match RpcClient::from_url(endpoint).await {
            Ok(rpc_client) => {
                match OnlineClient::<PolkadotConfig>::from_rpc_client(rpc_client).await {
                    Ok(client) => {
                        tracing::info!("Connected to {} {} via {}", network, kind, endpoint);
                        return Ok(client);
                    }
                    Err(e) => {
                        tracing::warn!("Failed to create client from {}: {}", endpoint, e);
                        last_error = Some(e.to_string());
                    }
                }
            }
            Err(e) => {
                tracing::warn!("Failed to connect to {}: {}", endpoint, e);
                last_error = Some(e.to_string());
            }
        }
    }

    Err(ChainError::Connection(last_error.unwrap_or_else(|| {
        format!("All {} {} endpoints failed", network, kind)
    })))
}
