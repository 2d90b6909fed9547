//! Addresses - Account and validator identifiers
//!
//! Addresses are opaque, validated strings. Module accounts (pools and the
//! per-record custodial accounts) are derived deterministically from a name.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Maximum address length; keys length-prefix addresses with a single byte.
pub const MAX_ADDRESS_LEN: usize = 255;

/// Prefix of every derived module account address
pub const MODULE_ADDRESS_PREFIX: &str = "mod1";

/// Errors that can occur when parsing addresses
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AddressError {
    #[error("Empty address")]
    Empty,

    #[error("Address too long (max {MAX_ADDRESS_LEN} chars): {0}")]
    TooLong(String),

    #[error("Invalid address format: {0}")]
    InvalidFormat(String),
}

fn validate(value: &str, leading_alpha: bool) -> Result<(), AddressError> {
    if value.is_empty() {
        return Err(AddressError::Empty);
    }
    if value.len() > MAX_ADDRESS_LEN {
        return Err(AddressError::TooLong(value.to_string()));
    }
    if leading_alpha && !value.starts_with(|c: char| c.is_ascii_alphabetic()) {
        return Err(AddressError::InvalidFormat(value.to_string()));
    }
    let valid = value
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'));
    if !valid {
        return Err(AddressError::InvalidFormat(value.to_string()));
    }
    Ok(())
}

/// Account address (end users, liquid staking providers and module accounts)
///
/// # Example
/// ```
/// use lsm_core::AccAddress;
///
/// let alice: AccAddress = "alice".parse().unwrap();
/// assert_eq!(alice.as_str(), "alice");
///
/// // Custodial accounts are derived from a module name
/// let custody = AccAddress::module("tokenizeshare_1");
/// assert_eq!(custody, AccAddress::module("tokenizeshare_1"));
/// assert_ne!(custody, AccAddress::module("tokenizeshare_2"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct AccAddress(String);

impl AccAddress {
    /// Create a new account address, validating its format
    pub fn new(value: impl Into<String>) -> Result<Self, AddressError> {
        let value = value.into();
        validate(&value, false)?;
        Ok(Self(value))
    }

    /// Derive the address of a module-owned account from its name
    ///
    /// The derivation is `mod1` + the first 20 bytes of `sha256(name)` in hex,
    /// so the same name always yields the same address.
    pub fn module(name: &str) -> Self {
        let digest = Sha256::digest(name.as_bytes());
        Self(format!("{}{}", MODULE_ADDRESS_PREFIX, hex::encode(&digest[..20])))
    }

    /// Returns the address as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Raw bytes used for store keys
    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }
}

impl fmt::Display for AccAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for AccAddress {
    type Err = AddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for AccAddress {
    type Error = AddressError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<AccAddress> for String {
    fn from(addr: AccAddress) -> Self {
        addr.0
    }
}

/// Validator operator address
///
/// Must start with a letter: share-token denominations are built as
/// `{validator}/{record_id}` and denominations must begin alphabetically.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ValAddress(String);

impl ValAddress {
    /// Create a new validator address, validating its format
    pub fn new(value: impl Into<String>) -> Result<Self, AddressError> {
        let value = value.into();
        validate(&value, true)?;
        Ok(Self(value))
    }

    /// Returns the address as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Raw bytes used for store keys
    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }
}

impl fmt::Display for ValAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for ValAddress {
    type Err = AddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for ValAddress {
    type Error = AddressError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ValAddress> for String {
    fn from(addr: ValAddress) -> Self {
        addr.0
    }
}
