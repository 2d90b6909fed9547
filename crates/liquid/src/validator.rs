//! Per-validator liquid share accounting

use lsm_core::{Dec, ValAddress};
use serde::{Deserialize, Serialize};

/// Liquid shares held against one validator
///
/// Created when the host creates the validator, removed with it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LiquidValidator {
    pub operator_address: ValAddress,
    pub liquid_shares: Dec,
}

impl LiquidValidator {
    pub fn new(operator_address: ValAddress) -> Self {
        Self {
            operator_address,
            liquid_shares: Dec::zero(),
        }
    }
}
