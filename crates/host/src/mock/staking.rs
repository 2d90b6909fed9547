use chrono::Duration;
use lsm_core::{AccAddress, Dec, ValAddress};
use lsm_store::{Context, KvStoreExt};

use super::{keys, MockHost};
use crate::error::{HostError, HostResult};
use crate::pools::{module_address, BONDED_POOL_NAME};
use crate::traits::{AccountKeeper, BankKeeper, StakingKeeper};
use crate::types::{Delegation, Redelegation, Validator};

impl StakingKeeper for MockHost {
    fn bond_denom(&self, _ctx: &Context<'_>) -> HostResult<String> {
        Ok(self.bond_denom.clone())
    }

    fn unbonding_time(&self, _ctx: &Context<'_>) -> HostResult<Duration> {
        Ok(self.unbonding_time)
    }

    fn total_bonded_tokens(&self, ctx: &Context<'_>) -> HostResult<u128> {
        self.read_balance(ctx, &module_address(BONDED_POOL_NAME), &self.bond_denom)
    }

    fn validator(&self, ctx: &Context<'_>, validator: &ValAddress) -> HostResult<Validator> {
        ctx.store()
            .get_json::<Validator>(&keys::validator_key(validator))?
            .ok_or_else(|| HostError::NoValidatorFound(validator.to_string()))
    }

    fn delegation(
        &self,
        ctx: &Context<'_>,
        delegator: &AccAddress,
        validator: &ValAddress,
    ) -> HostResult<Delegation> {
        ctx.store()
            .get_json::<Delegation>(&keys::delegation_key(delegator, validator))?
            .ok_or_else(|| HostError::no_delegation(delegator, validator))
    }

    fn validate_unbond_amount(
        &self,
        ctx: &Context<'_>,
        delegator: &AccAddress,
        validator: &ValAddress,
        amount: u128,
    ) -> HostResult<Dec> {
        let val = self.validator(ctx, validator)?;
        let delegation = self.delegation(ctx, delegator, validator)?;

        let shares = val.shares_from_tokens(amount)?;
        if shares > delegation.shares {
            return Err(HostError::BadSharesAmount(format!(
                "{shares} shares requested, delegation holds {}",
                delegation.shares
            )));
        }
        Ok(shares)
    }

    fn has_receiving_redelegation(
        &self,
        ctx: &Context<'_>,
        delegator: &AccAddress,
        validator: &ValAddress,
    ) -> HostResult<bool> {
        let now = ctx.block_time();
        for (_, value) in ctx.store().scan_prefix(&keys::redelegations_to_prefix(delegator, validator)) {
            let redelegation: Redelegation =
                serde_json::from_slice(&value).map_err(lsm_store::StoreError::from)?;
            if redelegation.completion_time > now {
                return Ok(true);
            }
        }
        Ok(false)
    }

    fn unbond(
        &self,
        ctx: &mut Context<'_>,
        delegator: &AccAddress,
        validator: &ValAddress,
        shares: &Dec,
    ) -> HostResult<u128> {
        let mut delegation = self.delegation(ctx, delegator, validator)?;
        if !shares.is_positive() {
            return Err(HostError::BadSharesAmount(shares.to_string()));
        }
        if &delegation.shares < shares {
            return Err(HostError::InsufficientShares {
                have: delegation.shares.to_string(),
                need: shares.to_string(),
            });
        }
        self.settle_rewards(ctx, delegator, validator)?;

        let mut val = self.validator(ctx, validator)?;
        delegation.shares -= shares;
        if delegation.shares.is_zero() {
            ctx.store_mut().delete(&keys::delegation_key(delegator, validator));
        } else {
            self.set_delegation(ctx, &delegation)?;
        }

        let amount = val.remove_del_shares(shares)?;
        self.set_validator(ctx, &val)?;

        tracing::trace!(delegator = %delegator, validator = %validator, %shares, amount, "Unbonded");
        Ok(amount)
    }

    fn delegate(
        &self,
        ctx: &mut Context<'_>,
        delegator: &AccAddress,
        amount: u128,
        validator: &ValAddress,
    ) -> HostResult<Dec> {
        let val = self.validator(ctx, validator)?;
        if amount == 0 {
            return Err(HostError::InvalidAmount("cannot delegate zero tokens".into()));
        }

        // Delegating may use vesting coins, so check the full balance
        let coins = self.bond_coins(amount)?;
        let balance = self.all_balances(ctx, delegator)?;
        if let Err(source) = balance.checked_sub(&coins) {
            return Err(HostError::InsufficientFunds {
                address: delegator.to_string(),
                source,
            });
        }
        if let Some(mut account) = self.vesting_account(ctx, delegator)? {
            account.track_delegation(ctx.block_time(), &coins)?;
            self.set_vesting_account(ctx, &account)?;
        }
        self.move_coins(ctx, delegator, &module_address(Self::pool_for(val.status)), &coins)?;

        let issued = self.add_delegation_tokens(ctx, delegator, validator, amount)?;
        tracing::trace!(delegator = %delegator, validator = %validator, amount, %issued, "Delegated");
        Ok(issued)
    }
}
