//! Host ledger errors

use lsm_core::{AddressError, CoinError, MathError};
use lsm_store::StoreError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum HostError {
    // === Staking ===
    #[error("Validator not found: {0}")]
    NoValidatorFound(String),

    #[error("Validator already exists: {0}")]
    ValidatorExists(String),

    #[error("No delegation for ({delegator}, {validator})")]
    NoDelegation { delegator: String, validator: String },

    #[error("Invalid shares amount: {0}")]
    BadSharesAmount(String),

    #[error("Insufficient delegation shares: have {have}, need {need}")]
    InsufficientShares { have: String, need: String },

    #[error("Validator has no tokens: {0}")]
    NoValidatorTokens(String),

    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    // === Bank ===
    #[error("Insufficient funds for {address}: {source}")]
    InsufficientFunds {
        address: String,
        #[source]
        source: CoinError,
    },

    #[error("{0} is not allowed to receive funds")]
    BlockedAddress(String),

    // === Wrapped ===
    #[error("Coin error: {0}")]
    Coin(#[from] CoinError),

    #[error("Math error: {0}")]
    Math(#[from] MathError),

    #[error("Address error: {0}")]
    Address(#[from] AddressError),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error(transparent)]
    Hook(#[from] anyhow::Error),
}

impl HostError {
    pub fn no_delegation(delegator: impl ToString, validator: impl ToString) -> Self {
        Self::NoDelegation {
            delegator: delegator.to_string(),
            validator: validator.to_string(),
        }
    }
}

pub type HostResult<T> = Result<T, HostError>;
