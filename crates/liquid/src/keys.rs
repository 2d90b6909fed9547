//! Store layout of the liquid module
//!
//! One-byte prefixes partition the store. Addresses are length-prefixed, record
//! ids are big-endian so iteration follows id order, and queue timestamps use
//! the sortable time encoding so the sweep can range-scan up to "now".

use chrono::{DateTime, Utc};
use lsm_core::{AccAddress, ValAddress};
use lsm_store::{encode_time, length_prefixed};

pub const TOKENIZE_SHARE_RECORD_PREFIX: u8 = 0x01;
pub const TOKENIZE_SHARE_RECORD_ID_BY_OWNER_PREFIX: u8 = 0x02;
pub const TOKENIZE_SHARE_RECORD_ID_BY_DENOM_PREFIX: u8 = 0x03;
pub const LAST_TOKENIZE_SHARE_RECORD_ID_KEY: u8 = 0x04;
pub const TOTAL_LIQUID_STAKED_TOKENS_KEY: u8 = 0x05;
pub const TOKENIZE_SHARES_LOCK_PREFIX: u8 = 0x06;
pub const TOKENIZE_SHARES_UNLOCK_QUEUE_PREFIX: u8 = 0x07;
pub const LIQUID_VALIDATOR_PREFIX: u8 = 0x08;
pub const PARAMS_KEY: u8 = 0x51;

pub fn params_key() -> Vec<u8> {
    vec![PARAMS_KEY]
}

pub fn last_tokenize_share_record_id_key() -> Vec<u8> {
    vec![LAST_TOKENIZE_SHARE_RECORD_ID_KEY]
}

pub fn total_liquid_staked_tokens_key() -> Vec<u8> {
    vec![TOTAL_LIQUID_STAKED_TOKENS_KEY]
}

pub fn liquid_validator_key(validator: &ValAddress) -> Vec<u8> {
    let mut key = vec![LIQUID_VALIDATOR_PREFIX];
    key.extend(length_prefixed(validator.as_bytes()));
    key
}

pub fn tokenize_share_record_key(id: u64) -> Vec<u8> {
    let mut key = vec![TOKENIZE_SHARE_RECORD_PREFIX];
    key.extend_from_slice(&id.to_be_bytes());
    key
}

pub fn tokenize_share_record_ids_by_owner_prefix(owner: &AccAddress) -> Vec<u8> {
    let mut key = vec![TOKENIZE_SHARE_RECORD_ID_BY_OWNER_PREFIX];
    key.extend(length_prefixed(owner.as_bytes()));
    key
}

pub fn tokenize_share_record_id_by_owner_key(owner: &AccAddress, id: u64) -> Vec<u8> {
    let mut key = tokenize_share_record_ids_by_owner_prefix(owner);
    key.extend_from_slice(&id.to_be_bytes());
    key
}

pub fn tokenize_share_record_id_by_denom_key(denom: &str) -> Vec<u8> {
    let mut key = vec![TOKENIZE_SHARE_RECORD_ID_BY_DENOM_PREFIX];
    key.extend_from_slice(denom.as_bytes());
    key
}

pub fn tokenize_shares_lock_key(owner: &AccAddress) -> Vec<u8> {
    let mut key = vec![TOKENIZE_SHARES_LOCK_PREFIX];
    key.extend(length_prefixed(owner.as_bytes()));
    key
}

pub fn tokenize_share_authorization_time_key(time: &DateTime<Utc>) -> Vec<u8> {
    let mut key = vec![TOKENIZE_SHARES_UNLOCK_QUEUE_PREFIX];
    key.extend(encode_time(time));
    key
}

/// Decode the id suffix of a by-owner index key
pub fn id_from_owner_index_key(key: &[u8]) -> Option<u64> {
    let suffix: [u8; 8] = key.get(key.len().checked_sub(8)?..)?.try_into().ok()?;
    Some(u64::from_be_bytes(suffix))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    #[test]
    fn test_record_keys_sort_by_id() {
        assert!(tokenize_share_record_key(2) < tokenize_share_record_key(10));
        assert!(tokenize_share_record_key(255) < tokenize_share_record_key(256));
    }

    #[test]
    fn test_owner_index_roundtrip() {
        let owner = AccAddress::new("alice").unwrap();
        let key = tokenize_share_record_id_by_owner_key(&owner, 42);
        assert!(key.starts_with(&tokenize_share_record_ids_by_owner_prefix(&owner)));
        assert_eq!(id_from_owner_index_key(&key), Some(42));
    }

    #[test]
    fn test_owner_prefix_is_unambiguous() {
        // "al" must not be a prefix match for "alice"
        let al = tokenize_share_record_ids_by_owner_prefix(&AccAddress::new("al").unwrap());
        let alice = tokenize_share_record_id_by_owner_key(&AccAddress::new("alice").unwrap(), 1);
        assert!(!alice.starts_with(&al));
    }

    #[test]
    fn test_queue_keys_sort_by_time() {
        let t = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let a = tokenize_share_authorization_time_key(&t);
        let b = tokenize_share_authorization_time_key(&(t + Duration::seconds(1)));
        assert!(a < b);
        assert_eq!(a[0], TOKENIZE_SHARES_UNLOCK_QUEUE_PREFIX);
    }
}
