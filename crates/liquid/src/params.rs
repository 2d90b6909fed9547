//! Governance-controlled module parameters

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{LiquidError, LiquidResult};

/// Liquid staking caps, each a fraction in `[0, 1]`
///
/// A cap of 1 (100%) disables the check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Params {
    /// Max share of all bonded stake that may be liquid
    #[serde(default = "default_cap")]
    pub global_liquid_staking_cap: Decimal,

    /// Max share of one validator's delegator shares that may be liquid
    #[serde(default = "default_cap")]
    pub validator_liquid_staking_cap: Decimal,
}

fn default_cap() -> Decimal {
    Decimal::ONE
}

impl Default for Params {
    fn default() -> Self {
        Self {
            global_liquid_staking_cap: default_cap(),
            validator_liquid_staking_cap: default_cap(),
        }
    }
}

impl Params {
    pub fn new(global_liquid_staking_cap: Decimal, validator_liquid_staking_cap: Decimal) -> Self {
        Self {
            global_liquid_staking_cap,
            validator_liquid_staking_cap,
        }
    }

    pub fn validate(&self) -> LiquidResult<()> {
        validate_cap("global liquid staking cap", self.global_liquid_staking_cap)?;
        validate_cap("validator liquid staking cap", self.validator_liquid_staking_cap)
    }
}

fn validate_cap(name: &str, cap: Decimal) -> LiquidResult<()> {
    if cap.is_sign_negative() && !cap.is_zero() {
        return Err(LiquidError::InvalidParams(format!("{name} cannot be negative: {cap}")));
    }
    if cap > Decimal::ONE {
        return Err(LiquidError::InvalidParams(format!(
            "{name} cannot be greater than 100%: {cap}"
        )));
    }
    Ok(())
}
