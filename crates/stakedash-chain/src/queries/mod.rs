//! Chain query implementations.

pub mod account;
pub mod era;
pub mod identity;
pub mod validators;

use subxt::dynamic::{At, Value};
use subxt::utils::AccountId32;

/// Items of a decoded sequence or tuple, in order.
pub(crate) fn sequence<'a>(value: &'a Value<u32>) -> impl Iterator<Item = &'a Value<u32>> + 'a {
    (0usize..).map_while(move |i| value.at(i))
}

/// Unsigned integer field of a decoded composite.
pub(crate) fn u128_field(value: &Value<u32>, field: &str) -> Option<u128> {
    value.at(field).and_then(|v: &Value<u32>| v.as_u128())
}

/// Decode an account id, either as raw bytes or wrapped in a newtype.
pub(crate) fn extract_account_id(value: &Value<u32>) -> Option<AccountId32> {
    account_bytes(value)
        .or_else(|| value.at(0usize).and_then(account_bytes))
        .map(AccountId32::from)
}

fn account_bytes(value: &Value<u32>) -> Option<[u8; 32]> {
    let bytes = sequence(value)
        .map(|b| b.as_u128().map(|b| b as u8))
        .collect::<Option<Vec<u8>>>()?;
    bytes.try_into().ok()
}

/// Account id at the tail of a storage key (Twox64Concat / Blake2_128Concat).
pub(crate) fn account_from_key(key_bytes: &[u8]) -> Option<AccountId32> {
    let start = key_bytes.len().checked_sub(32)?;
    let bytes: [u8; 32] = key_bytes[start..].try_into().ok()?;
    Some(AccountId32::from(bytes))
}
