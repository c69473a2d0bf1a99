//! Default RPC endpoints per network.
//!
//! Staking pallets run on Asset Hub. The relay chain is only used for the
//! current session's validator set and the People chain for identities.

use stakedash_core::Network;

/// Which chain of a network an endpoint serves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChainKind {
    AssetHub,
    Relay,
    People,
}

impl std::fmt::Display for ChainKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ChainKind::AssetHub => write!(f, "Asset Hub"),
            ChainKind::Relay => write!(f, "relay chain"),
            ChainKind::People => write!(f, "People chain"),
        }
    }
}

/// Public endpoints to try, in order of preference.
pub fn default_endpoints(network: Network, kind: ChainKind) -> &'static [&'static str] {
    match kind {
        ChainKind::AssetHub => asset_hub_endpoints(network),
        ChainKind::Relay => relay_endpoints(network),
        ChainKind::People => people_endpoints(network),
    }
}

fn asset_hub_endpoints(network: Network) -> &'static [&'static str] {
    match network {
        Network::Polkadot => &[
            "wss://polkadot-asset-hub-rpc.polkadot.io",
            "wss://rpc-asset-hub-polkadot.luckyfriday.io",
            "wss://sys.ibp.network/asset-hub-polkadot",
            "wss://asset-hub-polkadot-rpc.dwellir.com",
        ],
        Network::Kusama => &[
            "wss://kusama-asset-hub-rpc.polkadot.io",
            "wss://rpc-asset-hub-kusama.luckyfriday.io",
            "wss://sys.ibp.network/asset-hub-kusama",
        ],
        Network::Westend => &[
            "wss://westend-asset-hub-rpc.polkadot.io",
            "wss://sys.ibp.network/asset-hub-westend",
        ],
        Network::Paseo => &[
            "wss://sys.ibp.network/asset-hub-paseo",
            "wss://asset-hub-paseo-rpc.dwellir.com",
        ],
    }
}

fn relay_endpoints(network: Network) -> &'static [&'static str] {
    match network {
        Network::Polkadot => &[
            "wss://rpc.ibp.network/polkadot",
            "wss://polkadot.dotters.network",
            "wss://rpc-polkadot.luckyfriday.io",
        ],
        Network::Kusama => &[
            "wss://rpc.ibp.network/kusama",
            "wss://kusama.dotters.network",
        ],
        Network::Westend => &[
            "wss://westend-rpc.polkadot.io",
            "wss://rpc.ibp.network/westend",
        ],
        Network::Paseo => &["wss://rpc.ibp.network/paseo", "wss://paseo.dotters.network"],
    }
}

fn people_endpoints(network: Network) -> &'static [&'static str] {
    match network {
        Network::Polkadot => &[
            "wss://polkadot-people-rpc.polkadot.io",
            "wss://sys.ibp.network/people-polkadot",
        ],
        Network::Kusama => &[
            "wss://kusama-people-rpc.polkadot.io",
            "wss://sys.ibp.network/people-kusama",
        ],
        Network::Westend => &["wss://westend-people-rpc.polkadot.io"],
        Network::Paseo => &["wss://sys.ibp.network/people-paseo"],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_network_has_endpoints() {
        for network in Network::all() {
            for kind in [ChainKind::AssetHub, ChainKind::Relay, ChainKind::People] {
                let endpoints = default_endpoints(*network, kind);
                assert!(!endpoints.is_empty(), "{network} {kind}");
                assert!(endpoints.iter().all(|e| e.starts_with("wss://")));
            }
        }
    }
}
