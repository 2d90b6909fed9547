//! Tokenize share lock types
//!
//! An account is UNLOCKED by default. Disabling tokenization sets LOCKED;
//! re-enabling moves it to LOCK_EXPIRING until one unbonding period has
//! passed, after which the begin-block sweep clears the lock.

use chrono::{DateTime, Utc};
use lsm_core::AccAddress;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
pub enum TokenizeShareLockStatus {
    #[strum(serialize = "TOKENIZE_SHARE_LOCK_STATUS_UNLOCKED")]
    #[serde(rename = "TOKENIZE_SHARE_LOCK_STATUS_UNLOCKED")]
    Unlocked,
    #[strum(serialize = "TOKENIZE_SHARE_LOCK_STATUS_LOCKED")]
    #[serde(rename = "TOKENIZE_SHARE_LOCK_STATUS_LOCKED")]
    Locked,
    #[strum(serialize = "TOKENIZE_SHARE_LOCK_STATUS_LOCK_EXPIRING")]
    #[serde(rename = "TOKENIZE_SHARE_LOCK_STATUS_LOCK_EXPIRING")]
    LockExpiring,
}

/// Stored lock value: no time while LOCKED, the unlock time while expiring
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct StoredLock {
    pub completion_time: Option<DateTime<Utc>>,
}

/// Exported view of an account's lock
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenizeShareLock {
    pub address: AccAddress,
    pub status: TokenizeShareLockStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completion_time: Option<DateTime<Utc>>,
}

/// Accounts whose lock expires at the same time
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingTokenizeShareAuthorizations {
    pub addresses: Vec<AccAddress>,
}
