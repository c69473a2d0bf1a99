//! SS58 address handling.

use std::str::FromStr;

use stakedash_core::Network;
use subxt::utils::AccountId32;

use crate::error::ChainError;

const SS58_PREFIX: &[u8] = b"SS58PRE";

/// Encode an account with a specific SS58 prefix.
pub fn encode_ss58(account: &AccountId32, prefix: u16) -> String {
    let mut payload = Vec::with_capacity(36);

    if prefix < 64 {
        payload.push(prefix as u8);
    } else if prefix < 16384 {
        let first = ((prefix & 0x00FC) >> 2) as u8 | 0x40;
        let second = ((prefix >> 8) as u8) | ((prefix & 0x03) << 6) as u8;
        payload.push(first);
        payload.push(second);
    } else {
        payload.push(42);
    }
    payload.extend_from_slice(account.as_ref());

    let mut checksum_input = Vec::with_capacity(SS58_PREFIX.len() + payload.len());
    checksum_input.extend_from_slice(SS58_PREFIX);
    checksum_input.extend_from_slice(&payload);
    let hash = sp_crypto_hashing::blake2_512(&checksum_input);
    payload.extend_from_slice(&hash[..2]);

    bs58::encode(payload).into_string()
}

/// Render an account in the network's address format.
pub fn to_address(account: &AccountId32, network: Network) -> String {
    encode_ss58(account, network.ss58_format())
}

/// Parse an SS58 address of any prefix.
pub fn parse_account(address: &str) -> Result<AccountId32, ChainError> {
    AccountId32::from_str(address.trim())
        .map_err(|_| ChainError::InvalidAddress(address.to_string()))
}
