//! Staking ledger value types

use chrono::{DateTime, Utc};
use lsm_core::{AccAddress, Dec, ValAddress};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::error::{HostError, HostResult};

/// Validator bonding status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum BondStatus {
    Unbonded,
    Unbonding,
    Bonded,
}

/// Host-provided classification of an account
///
/// Liquid staking providers (e.g. interchain accounts run by liquid staking
/// protocols) hold stake that is liquid even when it is a native delegation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Display, EnumString)]
#[strum(serialize_all = "snake_case")]
pub enum AccountKind {
    #[default]
    Ordinary,
    LiquidStakingProvider,
}

/// A validator and its share/token exchange rate
///
/// `tokens / delegator_shares` is the value of one share; slashing lowers
/// `tokens` while shares stay put.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Validator {
    pub operator_address: ValAddress,
    pub status: BondStatus,
    pub tokens: u128,
    pub delegator_shares: Dec,
}

impl Validator {
    pub fn new(operator_address: ValAddress, status: BondStatus) -> Self {
        Self {
            operator_address,
            status,
            tokens: 0,
            delegator_shares: Dec::zero(),
        }
    }

    pub fn is_bonded(&self) -> bool {
        self.status == BondStatus::Bonded
    }

    /// Token value of `shares`, rounded at 18 places but not to an integer
    pub fn tokens_from_shares(&self, shares: &Dec) -> HostResult<Dec> {
        Ok(shares.mul_quo(&Dec::from_int(self.tokens), &self.delegator_shares)?)
    }

    /// Shares worth `amount` tokens, truncated at 18 places
    pub fn shares_from_tokens(&self, amount: u128) -> HostResult<Dec> {
        if self.tokens == 0 {
            return Err(HostError::NoValidatorTokens(self.operator_address.to_string()));
        }
        Ok(self
            .delegator_shares
            .mul_quo_truncate(&Dec::from_int(amount), &Dec::from_int(self.tokens))?)
    }

    /// Shares a new delegation of `amount` tokens would be issued
    ///
    /// An empty validator issues one share per token.
    pub fn shares_to_issue(&self, amount: u128) -> HostResult<Dec> {
        if self.delegator_shares.is_zero() {
            Ok(Dec::from_int(amount))
        } else {
            self.shares_from_tokens(amount)
        }
    }

    /// Add delegated tokens, returning the shares issued for them
    pub fn add_tokens_from_del(&mut self, amount: u128) -> HostResult<Dec> {
        let issued = self.shares_to_issue(amount)?;
        self.tokens = self
            .tokens
            .checked_add(amount)
            .ok_or(lsm_core::MathError::Overflow)?;
        self.delegator_shares += &issued;
        Ok(issued)
    }

    /// Remove delegator shares, returning the tokens they were worth
    ///
    /// The last shares out take every remaining token so nothing is stranded.
    pub fn remove_del_shares(&mut self, shares: &Dec) -> HostResult<u128> {
        if shares > &self.delegator_shares {
            return Err(HostError::InsufficientShares {
                have: self.delegator_shares.to_string(),
                need: shares.to_string(),
            });
        }
        let remaining = &self.delegator_shares - shares;
        let issued = if remaining.is_zero() {
            self.tokens
        } else {
            self.tokens_from_shares(shares)?.truncate_int()?.min(self.tokens)
        };
        self.tokens -= issued;
        self.delegator_shares = remaining;
        Ok(issued)
    }

    /// Remove tokens without touching shares (slashing)
    pub fn remove_tokens(&mut self, tokens: u128) -> u128 {
        let removed = tokens.min(self.tokens);
        self.tokens -= removed;
        removed
    }
}

/// Shares owned by a delegator on a validator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Delegation {
    pub delegator_address: AccAddress,
    pub validator_address: ValAddress,
    pub shares: Dec,
}

impl Delegation {
    pub fn new(delegator_address: AccAddress, validator_address: ValAddress) -> Self {
        Self {
            delegator_address,
            validator_address,
            shares: Dec::zero(),
        }
    }
}

/// An in-flight move of stake between validators
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Redelegation {
    pub delegator_address: AccAddress,
    pub src_validator_address: ValAddress,
    pub dst_validator_address: ValAddress,
    pub shares_dst: Dec,
    pub completion_time: DateTime<Utc>,
}
