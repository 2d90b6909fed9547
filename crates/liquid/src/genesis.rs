//! Genesis state of the liquid module

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{LiquidError, LiquidResult};
use crate::lock::{TokenizeShareLock, TokenizeShareLockStatus};
use crate::params::Params;
use crate::record::TokenizeShareRecord;
use crate::validator::LiquidValidator;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenesisState {
    #[serde(default)]
    pub params: Params,
    #[serde(default)]
    pub tokenize_share_records: Vec<TokenizeShareRecord>,
    #[serde(default)]
    pub last_tokenize_share_record_id: u64,
    #[serde(default)]
    pub total_liquid_staked_tokens: u128,
    #[serde(default)]
    pub tokenize_share_locks: Vec<TokenizeShareLock>,
    #[serde(default)]
    pub liquid_validators: Vec<LiquidValidator>,
}

impl GenesisState {
    /// Load genesis from JSON file
    pub fn from_json_file(path: &Path) -> LiquidResult<Self> {
        let content = std::fs::read_to_string(path)?;
        let genesis: Self = serde_json::from_str(&content)?;
        genesis.validate()?;
        Ok(genesis)
    }

    pub fn validate(&self) -> LiquidResult<()> {
        self.params.validate()?;

        let mut ids = HashSet::new();
        let mut denoms = HashSet::new();
        for record in &self.tokenize_share_records {
            if record.id > self.last_tokenize_share_record_id {
                return Err(LiquidError::InvalidGenesis(format!(
                    "record id {} is above last record id {}",
                    record.id, self.last_tokenize_share_record_id
                )));
            }
            if !ids.insert(record.id) {
                return Err(LiquidError::InvalidGenesis(format!("duplicate record id {}", record.id)));
            }
            if !denoms.insert(record.share_token_denom()) {
                return Err(LiquidError::InvalidGenesis(format!(
                    "duplicate share token denom {}",
                    record.share_token_denom()
                )));
            }
        }

        for lock in &self.tokenize_share_locks {
            match (lock.status, lock.completion_time) {
                (TokenizeShareLockStatus::Locked, _) | (TokenizeShareLockStatus::LockExpiring, Some(_)) => {}
                (status, _) => {
                    return Err(LiquidError::InvalidGenesis(format!(
                        "unsupported tokenize share lock status {status} for {}",
                        lock.address
                    )));
                }
            }
        }

        let mut validators = HashSet::new();
        for validator in &self.liquid_validators {
            if !validators.insert(&validator.operator_address) {
                return Err(LiquidError::InvalidGenesis(format!(
                    "duplicate liquid validator {}",
                    validator.operator_address
                )));
            }
        }
        Ok(())
    }
}
