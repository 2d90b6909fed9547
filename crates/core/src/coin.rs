//! Coins - Denominated balances
//!
//! `Coin` is a single integer amount of one denomination, `Coins` a normalized
//! multi-denomination set (sorted, no zero entries) and `DecCoins` its decimal
//! counterpart used for reward estimates.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;

/// Errors that can occur in coin arithmetic and validation
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoinError {
    #[error("Invalid denomination: {0}")]
    InvalidDenom(String),

    #[error("Insufficient funds: have {have}, need {need}")]
    Insufficient { have: String, need: String },

    #[error("Coin amount overflow for {0}")]
    Overflow(String),
}

/// Validate a denomination: 3-128 chars, leading letter, then `[a-zA-Z0-9/:._-]`
pub fn validate_denom(denom: &str) -> Result<(), CoinError> {
    let len = denom.len();
    let leading = denom.starts_with(|c: char| c.is_ascii_alphabetic());
    let body = denom
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '/' | ':' | '.' | '_' | '-'));
    if !(3..=128).contains(&len) || !leading || !body {
        return Err(CoinError::InvalidDenom(denom.to_string()));
    }
    Ok(())
}

/// A single denominated integer amount
///
/// # Example
/// ```
/// use lsm_core::Coin;
///
/// let coin = Coin::new("stake", 20).unwrap();
/// assert_eq!(coin.to_string(), "20stake");
/// assert!(Coin::new("x", 1).is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Coin {
    pub denom: String,
    pub amount: u128,
}

impl Coin {
    /// Create a coin, validating the denomination
    pub fn new(denom: impl Into<String>, amount: u128) -> Result<Self, CoinError> {
        let denom = denom.into();
        validate_denom(&denom)?;
        Ok(Self { denom, amount })
    }

    pub fn is_zero(&self) -> bool {
        self.amount == 0
    }

    pub fn is_positive(&self) -> bool {
        self.amount > 0
    }

    /// A coin is valid when its denomination parses
    pub fn is_valid(&self) -> bool {
        validate_denom(&self.denom).is_ok()
    }
}

impl fmt::Display for Coin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.amount, self.denom)
    }
}

/// Normalized set of coins keyed by denomination
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Coins(BTreeMap<String, u128>);

impl Coins {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from a list of coins, merging duplicates
    pub fn from_coins(coins: impl IntoIterator<Item = Coin>) -> Result<Self, CoinError> {
        let mut set = Self::new();
        for coin in coins {
            set.add_coin(&coin)?;
        }
        Ok(set)
    }

    pub fn amount_of(&self, denom: &str) -> u128 {
        self.0.get(denom).copied().unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Add a single coin in place; zero amounts are ignored
    pub fn add_coin(&mut self, coin: &Coin) -> Result<(), CoinError> {
        if coin.is_zero() {
            return Ok(());
        }
        let entry = self.0.entry(coin.denom.clone()).or_insert(0);
        *entry = entry
            .checked_add(coin.amount)
            .ok_or_else(|| CoinError::Overflow(coin.denom.clone()))?;
        Ok(())
    }

    /// Add every coin of `other` in place
    pub fn add(&mut self, other: &Coins) -> Result<(), CoinError> {
        for coin in other.iter() {
            self.add_coin(&coin)?;
        }
        Ok(())
    }

    /// Subtract `other`, failing if any denomination would go negative
    pub fn checked_sub(&self, other: &Coins) -> Result<Coins, CoinError> {
        let mut result = self.clone();
        for (denom, amount) in &other.0 {
            let have = result.amount_of(denom);
            if have < *amount {
                return Err(CoinError::Insufficient {
                    have: format!("{have}{denom}"),
                    need: format!("{amount}{denom}"),
                });
            }
            let left = have - amount;
            if left == 0 {
                result.0.remove(denom);
            } else {
                result.0.insert(denom.clone(), left);
            }
        }
        Ok(result)
    }

    /// True if every denomination in `other` is covered
    pub fn is_all_gte(&self, other: &Coins) -> bool {
        other.0.iter().all(|(denom, amount)| self.amount_of(denom) >= *amount)
    }

    pub fn iter(&self) -> impl Iterator<Item = Coin> + '_ {
        self.0.iter().map(|(denom, amount)| Coin {
            denom: denom.clone(),
            amount: *amount,
        })
    }

    pub fn to_vec(&self) -> Vec<Coin> {
        self.iter().collect()
    }
}

impl From<Coin> for Coins {
    fn from(coin: Coin) -> Self {
        let mut set = Coins::new();
        if coin.amount > 0 {
            set.0.insert(coin.denom, coin.amount);
        }
        set
    }
}

impl fmt::Display for Coins {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.iter().map(|c| c.to_string()).collect();
        f.write_str(&parts.join(","))
    }
}

/// Decimal coins, used for reward estimates that have not been truncated yet
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DecCoins(BTreeMap<String, Decimal>);

impl DecCoins {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn amount_of(&self, denom: &str) -> Decimal {
        self.0.get(denom).copied().unwrap_or(Decimal::ZERO)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Add a decimal amount; non-positive amounts are ignored
    pub fn add_amount(&mut self, denom: &str, amount: Decimal) {
        if amount <= Decimal::ZERO {
            return;
        }
        *self.0.entry(denom.to_string()).or_insert(Decimal::ZERO) += amount;
    }

    pub fn add(&mut self, other: &DecCoins) {
        for (denom, amount) in &other.0 {
            self.add_amount(denom, *amount);
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Decimal)> {
        self.0.iter()
    }
}

impl From<&Coins> for DecCoins {
    fn from(coins: &Coins) -> Self {
        let mut set = DecCoins::new();
        for coin in coins.iter() {
            set.add_amount(&coin.denom, dec_from_u128(coin.amount));
        }
        set
    }
}

// Saturates at Decimal::MAX for amounts beyond 96 bits
fn dec_from_u128(v: u128) -> Decimal {
    Decimal::from_i128_with_scale(v.min(Decimal::MAX.mantissa() as u128) as i128, 0)
}

impl fmt::Display for DecCoins {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.0.iter().map(|(d, a)| format!("{a}{d}")).collect();
        f.write_str(&parts.join(","))
    }
}
