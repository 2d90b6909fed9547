//! Liquid staking errors

use chrono::{DateTime, Utc};
use lsm_core::{AddressError, CoinError, MathError};
use lsm_host::HostError;
use lsm_store::StoreError;
use thiserror::Error;

/// Coarse classification of a [`LiquidError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Bad input or state that forbids the request; never retried
    Precondition,
    /// A liquid staking cap would be exceeded; a smaller amount may pass
    CapExceeded,
    /// Counter underflow, i.e. corrupted accounting
    Invariant,
    /// Storage, encoding or host failure
    Internal,
}

fn at_time(time: &Option<DateTime<Utc>>, label: &str) -> String {
    match time {
        Some(time) => format!(" ({label} {time})"),
        None => String::new(),
    }
}

/// Errors returned by liquid staking operations
#[derive(Error, Debug)]
pub enum LiquidError {
    // === Request validation ===
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Only the bond denomination {expected} can be tokenized, got {got}")]
    OnlyBondDenomAllowedForTokenize { expected: String, got: String },

    #[error("Liquid validator not found: {0}")]
    NoValidatorFound(String),

    #[error("Insufficient shares: {0}")]
    InsufficientShares(String),

    #[error("Delegator is not allowed to tokenize shares from a validator with an in-progress redelegation")]
    RedelegationInProgress,

    #[error("Trying to tokenize more than the delegated free (vested) tokens")]
    ExceedingFreeVestingDelegations,

    #[error("Tokenize share record not found: {0}")]
    TokenizeShareRecordNotExists(String),

    #[error("Tokenize share record already exists: {0}")]
    TokenizeShareRecordAlreadyExists(u64),

    #[error("{owner} is not the owner of tokenize share record {record_id}")]
    NotTokenizeShareRecordOwner { owner: String, record_id: u64 },

    #[error("Insufficient share token balance: have {have}, need {need}")]
    NotEnoughBalance { have: u128, need: u128 },

    #[error("Too few tokens to redeem (truncates to zero tokens)")]
    TinyRedemptionAmount,

    // === Locks ===
    #[error("Tokenize shares currently disabled for account{}", at_time(.unlock_time, "allowed at"))]
    TokenizeSharesDisabledForAccount { unlock_time: Option<DateTime<Utc>> },

    #[error("Tokenize shares is already enabled for this account{}", at_time(.completion_time, "re-enablement ends at"))]
    TokenizeSharesAlreadyEnabledForAccount { completion_time: Option<DateTime<Utc>> },

    #[error("Tokenize shares is already disabled for this account")]
    TokenizeSharesAlreadyDisabledForAccount,

    // === Authorization ===
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Invalid authority: expected {expected}, got {got}")]
    InvalidAuthority { expected: String, got: String },

    // === Configuration ===
    #[error("Invalid params: {0}")]
    InvalidParams(String),

    #[error("Invalid genesis: {0}")]
    InvalidGenesis(String),

    // === Caps ===
    #[error("Delegation or tokenization exceeds the global cap")]
    GlobalLiquidStakingCapExceeded,

    #[error("Delegation or tokenization exceeds the validator cap")]
    ValidatorLiquidStakingCapExceeded,

    // === Accounting invariants ===
    #[error("Validator liquid shares underflow")]
    ValidatorLiquidSharesUnderflow,

    #[error("Total liquid staked tokens underflow")]
    TotalLiquidStakedUnderflow,

    // === Wrapped ===
    #[error("Host error: {0}")]
    Host(#[from] HostError),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Math error: {0}")]
    Math(#[from] MathError),

    #[error("Coin error: {0}")]
    Coin(#[from] CoinError),

    #[error("Address error: {0}")]
    Address(#[from] AddressError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl LiquidError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::GlobalLiquidStakingCapExceeded | Self::ValidatorLiquidStakingCapExceeded => {
                ErrorKind::CapExceeded
            }
            Self::ValidatorLiquidSharesUnderflow | Self::TotalLiquidStakedUnderflow => {
                ErrorKind::Invariant
            }
            Self::Host(host) => match host {
                HostError::NoValidatorFound(_)
                | HostError::NoDelegation { .. }
                | HostError::BadSharesAmount(_)
                | HostError::InsufficientShares { .. }
                | HostError::InsufficientFunds { .. }
                | HostError::InvalidAmount(_)
                | HostError::BlockedAddress(_) => ErrorKind::Precondition,
                _ => ErrorKind::Internal,
            },
            Self::Store(_) | Self::Math(_) | Self::Io(_) | Self::Json(_) => ErrorKind::Internal,
            _ => ErrorKind::Precondition,
        }
    }

    /// True if the host reported a missing validator
    pub fn is_no_validator(&self) -> bool {
        matches!(self, Self::Host(HostError::NoValidatorFound(_)))
    }

    /// True if the host reported a missing delegation
    pub fn is_no_delegation(&self) -> bool {
        matches!(self, Self::Host(HostError::NoDelegation { .. }))
    }
}

pub type LiquidResult<T> = Result<T, LiquidError>;

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_error_kinds() {
        assert_eq!(LiquidError::GlobalLiquidStakingCapExceeded.kind(), ErrorKind::CapExceeded);
        assert_eq!(LiquidError::TotalLiquidStakedUnderflow.kind(), ErrorKind::Invariant);
        assert_eq!(LiquidError::RedelegationInProgress.kind(), ErrorKind::Precondition);
        assert_eq!(
            LiquidError::Host(HostError::NoValidatorFound("v".into())).kind(),
            ErrorKind::Precondition
        );
        assert_eq!(LiquidError::Math(MathError::Overflow).kind(), ErrorKind::Internal);
    }

    #[test]
    fn test_disabled_message_includes_unlock_time() {
        let at = Utc.with_ymd_and_hms(2024, 1, 22, 0, 0, 0).unwrap();
        let err = LiquidError::TokenizeSharesDisabledForAccount { unlock_time: Some(at) };
        assert!(err.to_string().contains("2024-01-22"));

        let locked = LiquidError::TokenizeSharesDisabledForAccount { unlock_time: None };
        assert_eq!(locked.to_string(), "Tokenize shares currently disabled for account");
    }
}
