//! Chain access for the staking dashboard.
//!
//! `ledger` defines the read and write capabilities the domain store depends
//! on. `ChainClient` implements them over subxt against a network's Asset Hub
//! (staking pallets), relay chain (session validators) and People chain
//! (identities).

pub mod backend;
pub mod client;
pub mod config;
pub mod error;
pub mod ledger;
pub mod queries;
pub mod ss58;
pub mod transactions;

pub use client::*;
pub use config::*;
pub use error::*;
pub use ledger::*;
pub use queries::identity::{IdentityInfo, PeopleChainClient};
pub use transactions::KeypairSigner;
