//! Staking hooks keeping liquid validators and the liquid total in step with
//! the host's validator lifecycle

use lsm_core::{AccAddress, Dec, ValAddress};
use lsm_host::StakingHooks;
use lsm_store::Context;
use rust_decimal::Decimal;

use super::Keeper;
use crate::error::{LiquidError, LiquidResult};
use crate::validator::LiquidValidator;

impl Keeper {
    /// Tokens removed from the liquid total when `validator` is slashed by
    /// `fraction`
    fn slashed_liquid_tokens(&self, ctx: &Context<'_>, validator: &ValAddress, fraction: Decimal) -> LiquidResult<u128> {
        let staking_validator = self.staking.validator(ctx, validator)?;
        let liquid_validator = self.liquid_validator(ctx, validator)?;
        if liquid_validator.liquid_shares.is_zero() {
            return Ok(0);
        }

        let initial_liquid_tokens = staking_validator.tokens_from_shares(&liquid_validator.liquid_shares)?;
        Ok((&Dec::from_decimal(fraction) * &initial_liquid_tokens).truncate_int()?)
    }
}

impl StakingHooks for Keeper {
    fn name(&self) -> &str {
        "liquid"
    }

    fn after_validator_created(&self, ctx: &mut Context<'_>, validator: &ValAddress) -> anyhow::Result<()> {
        self.staking.validator(ctx, validator)?;
        self.set_liquid_validator(ctx, &LiquidValidator::new(validator.clone()))?;
        Ok(())
    }

    fn after_validator_removed(&self, ctx: &mut Context<'_>, validator: &ValAddress) -> anyhow::Result<()> {
        self.remove_liquid_validator(ctx, validator);
        Ok(())
    }

    fn after_validator_bonded(&self, _ctx: &mut Context<'_>, _validator: &ValAddress) -> anyhow::Result<()> {
        Ok(())
    }

    fn after_validator_begin_unbonding(
        &self,
        _ctx: &mut Context<'_>,
        _validator: &ValAddress,
    ) -> anyhow::Result<()> {
        Ok(())
    }

    /// Shrink the liquid total by the slashed part of the validator's liquid
    /// tokens
    ///
    /// # Panics
    /// If the decrease underflows the total, which means the accounting is
    /// already corrupt.
    fn before_validator_slashed(
        &self,
        ctx: &mut Context<'_>,
        validator: &ValAddress,
        fraction: Decimal,
    ) -> anyhow::Result<()> {
        let slashed = self.slashed_liquid_tokens(ctx, validator, fraction)?;
        if slashed == 0 {
            return Ok(());
        }

        match self.decrease_total_liquid_staked_tokens(ctx, slashed) {
            Ok(()) => {}
            Err(LiquidError::TotalLiquidStakedUnderflow) => {
                panic!("slashing {slashed} liquid tokens of {validator} underflows the total liquid staked tokens");
            }
            Err(err) => return Err(err.into()),
        }

        tracing::info!(validator = %validator, %fraction, slashed, "Reduced liquid staked tokens for slash");
        Ok(())
    }

    fn before_delegation_created(
        &self,
        _ctx: &mut Context<'_>,
        _delegator: &AccAddress,
        _validator: &ValAddress,
    ) -> anyhow::Result<()> {
        Ok(())
    }

    fn before_delegation_shares_modified(
        &self,
        _ctx: &mut Context<'_>,
        _delegator: &AccAddress,
        _validator: &ValAddress,
    ) -> anyhow::Result<()> {
        Ok(())
    }

    fn before_delegation_removed(
        &self,
        _ctx: &mut Context<'_>,
        _delegator: &AccAddress,
        _validator: &ValAddress,
    ) -> anyhow::Result<()> {
        Ok(())
    }

    fn after_delegation_modified(
        &self,
        _ctx: &mut Context<'_>,
        _delegator: &AccAddress,
        _validator: &ValAddress,
    ) -> anyhow::Result<()> {
        Ok(())
    }
}
