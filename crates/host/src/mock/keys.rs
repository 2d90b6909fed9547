//! Store layout of the simulated ledger
//!
//! Prefixes 0xA0-0xAF are reserved for the mock host so its state can share a
//! store with the liquid module (which uses 0x01-0x51).

use lsm_core::{AccAddress, ValAddress};
use lsm_store::length_prefixed;

pub const VALIDATOR_PREFIX: u8 = 0xA1;
pub const DELEGATION_PREFIX: u8 = 0xA2;
pub const REDELEGATION_PREFIX: u8 = 0xA3;
pub const BALANCE_PREFIX: u8 = 0xA4;
pub const SUPPLY_PREFIX: u8 = 0xA5;
pub const REWARDS_PREFIX: u8 = 0xA6;
pub const VESTING_PREFIX: u8 = 0xA7;
pub const LIQUID_PROVIDER_PREFIX: u8 = 0xA8;
pub const BLOCKED_PREFIX: u8 = 0xA9;

fn key(prefix: u8, parts: &[&[u8]]) -> Vec<u8> {
    let mut out = vec![prefix];
    for part in parts {
        out.extend(length_prefixed(part));
    }
    out
}

pub fn validator_key(validator: &ValAddress) -> Vec<u8> {
    key(VALIDATOR_PREFIX, &[validator.as_bytes()])
}

pub fn delegation_key(delegator: &AccAddress, validator: &ValAddress) -> Vec<u8> {
    key(DELEGATION_PREFIX, &[delegator.as_bytes(), validator.as_bytes()])
}

/// All redelegations of `delegator` into `dst`
pub fn redelegations_to_prefix(delegator: &AccAddress, dst: &ValAddress) -> Vec<u8> {
    key(REDELEGATION_PREFIX, &[delegator.as_bytes(), dst.as_bytes()])
}

pub fn redelegation_key(delegator: &AccAddress, dst: &ValAddress, src: &ValAddress) -> Vec<u8> {
    key(REDELEGATION_PREFIX, &[delegator.as_bytes(), dst.as_bytes(), src.as_bytes()])
}

pub fn balances_prefix(address: &AccAddress) -> Vec<u8> {
    key(BALANCE_PREFIX, &[address.as_bytes()])
}

/// Denomination is stored unprefixed at the end so it can be read back
pub fn balance_key(address: &AccAddress, denom: &str) -> Vec<u8> {
    let mut out = balances_prefix(address);
    out.extend_from_slice(denom.as_bytes());
    out
}

pub fn supply_key(denom: &str) -> Vec<u8> {
    let mut out = vec![SUPPLY_PREFIX];
    out.extend_from_slice(denom.as_bytes());
    out
}

pub fn rewards_key(delegator: &AccAddress, validator: &ValAddress) -> Vec<u8> {
    key(REWARDS_PREFIX, &[delegator.as_bytes(), validator.as_bytes()])
}

pub fn vesting_key(address: &AccAddress) -> Vec<u8> {
    key(VESTING_PREFIX, &[address.as_bytes()])
}

pub fn liquid_provider_key(address: &AccAddress) -> Vec<u8> {
    key(LIQUID_PROVIDER_PREFIX, &[address.as_bytes()])
}

pub fn blocked_key(address: &AccAddress) -> Vec<u8> {
    key(BLOCKED_PREFIX, &[address.as_bytes()])
}
