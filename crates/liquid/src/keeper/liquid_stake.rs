//! Liquid accounting: the global liquid token counter, per-validator liquid
//! shares and the cap checks guarding both.

use chrono::{DateTime, Utc};
use lsm_core::{AccAddress, Coin, Dec, ValAddress};
use lsm_host::{AccountKind, VestingAccount};
use lsm_store::{Context, KvStoreExt};
use rust_decimal::Decimal;

use super::Keeper;
use crate::error::{LiquidError, LiquidResult};
use crate::keys;
use crate::validator::LiquidValidator;

/// `numerator / denominator > cap`, with an empty denominator counting as
/// exceeded only if something would become liquid under a cap below 100%
fn exceeds_cap(numerator: &Dec, denominator: &Dec, cap: Decimal) -> LiquidResult<bool> {
    let cap = Dec::from_decimal(cap);
    if denominator.is_zero() {
        return Ok(numerator.is_positive() && cap < Dec::one());
    }
    Ok(numerator.quo(denominator)? > cap)
}

impl Keeper {
    pub fn total_liquid_staked_tokens(&self, ctx: &Context<'_>) -> LiquidResult<u128> {
        Ok(ctx
            .store()
            .get_json::<u128>(&keys::total_liquid_staked_tokens_key())?
            .unwrap_or(0))
    }

    pub(crate) fn set_total_liquid_staked_tokens(&self, ctx: &mut Context<'_>, tokens: u128) -> LiquidResult<()> {
        ctx.store_mut()
            .set_json(&keys::total_liquid_staked_tokens_key(), &tokens)?;
        Ok(())
    }

    /// Liquid staking providers hold stake that stays liquid after redemption
    pub fn delegator_is_liquid_staker(&self, ctx: &Context<'_>, delegator: &AccAddress) -> LiquidResult<bool> {
        Ok(self.accounts.account_kind(ctx, delegator)? == AccountKind::LiquidStakingProvider)
    }

    /// Would adding `tokens` of liquid stake push the liquid fraction of all
    /// bonded stake over the global cap?
    ///
    /// `shares_already_bonded` is true when the tokens are already counted in
    /// the bonded pool (tokenizing an existing delegation).
    pub fn check_exceeds_global_liquid_staking_cap(
        &self,
        ctx: &Context<'_>,
        tokens: u128,
        shares_already_bonded: bool,
    ) -> LiquidResult<bool> {
        let cap = self.global_liquid_staking_cap(ctx)?;
        let liquid = self.total_liquid_staked_tokens(ctx)?;

        let mut total_staked = self.staking.total_bonded_tokens(ctx)?;
        if !shares_already_bonded {
            total_staked = total_staked
                .checked_add(tokens)
                .ok_or(lsm_core::MathError::Overflow)?;
        }
        let updated_liquid = liquid
            .checked_add(tokens)
            .ok_or(lsm_core::MathError::Overflow)?;

        exceeds_cap(&Dec::from_int(updated_liquid), &Dec::from_int(total_staked), cap)
    }

    /// Would adding `shares` push the validator's liquid fraction over the
    /// validator cap?
    pub fn check_exceeds_validator_liquid_staking_cap(
        &self,
        ctx: &Context<'_>,
        validator: &LiquidValidator,
        shares: &Dec,
        shares_already_bonded: bool,
    ) -> LiquidResult<bool> {
        let updated_liquid = &validator.liquid_shares + shares;
        let staking_validator = self.staking.validator(ctx, &validator.operator_address)?;

        let mut total_shares = staking_validator.delegator_shares;
        if !shares_already_bonded {
            total_shares += shares;
        }

        let cap = self.validator_liquid_staking_cap(ctx)?;
        exceeds_cap(&updated_liquid, &total_shares, cap)
    }

    pub fn safely_increase_total_liquid_staked_tokens(
        &self,
        ctx: &mut Context<'_>,
        amount: u128,
        shares_already_bonded: bool,
    ) -> LiquidResult<()> {
        if self.check_exceeds_global_liquid_staking_cap(ctx, amount, shares_already_bonded)? {
            return Err(LiquidError::GlobalLiquidStakingCapExceeded);
        }
        let total = self.total_liquid_staked_tokens(ctx)?;
        let updated = total.checked_add(amount).ok_or(lsm_core::MathError::Overflow)?;
        self.set_total_liquid_staked_tokens(ctx, updated)?;

        tracing::debug!(amount, total = updated, "Increased total liquid staked tokens");
        Ok(())
    }

    pub fn decrease_total_liquid_staked_tokens(&self, ctx: &mut Context<'_>, amount: u128) -> LiquidResult<()> {
        let total = self.total_liquid_staked_tokens(ctx)?;
        if amount > total {
            return Err(LiquidError::TotalLiquidStakedUnderflow);
        }
        self.set_total_liquid_staked_tokens(ctx, total - amount)?;

        tracing::debug!(amount, total = total - amount, "Decreased total liquid staked tokens");
        Ok(())
    }

    pub fn safely_increase_validator_liquid_shares(
        &self,
        ctx: &mut Context<'_>,
        validator: &ValAddress,
        shares: &Dec,
        shares_already_bonded: bool,
    ) -> LiquidResult<LiquidValidator> {
        let mut liquid_validator = self.liquid_validator(ctx, validator)?;
        if self.check_exceeds_validator_liquid_staking_cap(ctx, &liquid_validator, shares, shares_already_bonded)? {
            return Err(LiquidError::ValidatorLiquidStakingCapExceeded);
        }

        liquid_validator.liquid_shares += shares;
        self.set_liquid_validator(ctx, &liquid_validator)?;

        tracing::debug!(validator = %validator, %shares, liquid_shares = %liquid_validator.liquid_shares, "Increased validator liquid shares");
        Ok(liquid_validator)
    }

    pub fn decrease_validator_liquid_shares(
        &self,
        ctx: &mut Context<'_>,
        validator: &ValAddress,
        shares: &Dec,
    ) -> LiquidResult<LiquidValidator> {
        let mut liquid_validator = self.liquid_validator(ctx, validator)?;
        if *shares > liquid_validator.liquid_shares {
            return Err(LiquidError::ValidatorLiquidSharesUnderflow);
        }

        liquid_validator.liquid_shares -= shares;
        self.set_liquid_validator(ctx, &liquid_validator)?;

        tracing::debug!(validator = %validator, %shares, liquid_shares = %liquid_validator.liquid_shares, "Decreased validator liquid shares");
        Ok(liquid_validator)
    }

    // === Liquid validators ===

    pub fn liquid_validator(&self, ctx: &Context<'_>, validator: &ValAddress) -> LiquidResult<LiquidValidator> {
        ctx.store()
            .get_json::<LiquidValidator>(&keys::liquid_validator_key(validator))?
            .ok_or_else(|| LiquidError::NoValidatorFound(validator.to_string()))
    }

    pub(crate) fn set_liquid_validator(&self, ctx: &mut Context<'_>, validator: &LiquidValidator) -> LiquidResult<()> {
        ctx.store_mut()
            .set_json(&keys::liquid_validator_key(&validator.operator_address), validator)?;
        Ok(())
    }

    pub(crate) fn remove_liquid_validator(&self, ctx: &mut Context<'_>, validator: &ValAddress) {
        ctx.store_mut().delete(&keys::liquid_validator_key(validator));
    }

    pub fn all_liquid_validators(&self, ctx: &Context<'_>) -> LiquidResult<Vec<LiquidValidator>> {
        ctx.store()
            .scan_prefix(&[keys::LIQUID_VALIDATOR_PREFIX])
            .into_iter()
            .map(|(_, value)| Ok(serde_json::from_slice(&value)?))
            .collect()
    }
}

/// Does the vesting account hold at least `coin` of vested, delegated coins?
///
/// `delegated_free` and `delegated_vesting` were computed at the last
/// (un)delegation, so coins that vested since then while delegated are
/// counted as free here.
pub fn check_vested_delegation_in_vesting_account(
    account: &VestingAccount,
    block_time: DateTime<Utc>,
    coin: &Coin,
) -> LiquidResult<bool> {
    let vesting = account.vesting_coins(block_time)?.amount_of(&coin.denom);
    let delegated_vesting = account.delegated_vesting.amount_of(&coin.denom);
    let newly_vested = delegated_vesting.saturating_sub(vesting);

    let delegated_vested = account
        .delegated_free
        .amount_of(&coin.denom)
        .checked_add(newly_vested)
        .ok_or(lsm_core::MathError::Overflow)?;
    Ok(delegated_vested >= coin.amount)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use lsm_core::Coins;
    use lsm_host::VestingSchedule;
    use rust_decimal_macros::dec;

    #[test]
    fn test_exceeds_cap_ratio() {
        // 6 / 96 = 6.25%
        assert!(!exceeds_cap(&Dec::from_int(6), &Dec::from_int(96), dec!(0.1)).unwrap());
        // 11 / 101 = 10.9%
        assert!(exceeds_cap(&Dec::from_int(11), &Dec::from_int(101), dec!(0.1)).unwrap());
        // exactly at the cap is allowed
        assert!(!exceeds_cap(&Dec::from_int(10), &Dec::from_int(100), dec!(0.1)).unwrap());
    }

    #[test]
    fn test_exceeds_cap_fractional_shares() {
        let liquid: Dec = "10.000000000000000100".parse().unwrap();
        assert!(exceeds_cap(&liquid, &Dec::from_int(100), dec!(0.1)).unwrap());
    }

    #[test]
    fn test_exceeds_cap_empty_denominator() {
        assert!(exceeds_cap(&Dec::one(), &Dec::zero(), dec!(0.5)).unwrap());
        assert!(!exceeds_cap(&Dec::one(), &Dec::zero(), Decimal::ONE).unwrap());
        assert!(!exceeds_cap(&Dec::zero(), &Dec::zero(), dec!(0.5)).unwrap());
    }

    fn vesting_account(delegated_vesting: u128, delegated_free: u128) -> VestingAccount {
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let mut account = VestingAccount::new(
            AccAddress::new("vester").unwrap(),
            VestingSchedule::Continuous,
            Coin::new("stake", 100).unwrap().into(),
            start,
            start + Duration::seconds(100),
        );
        account.delegated_vesting = Coin::new("stake", delegated_vesting).unwrap().into();
        account.delegated_free = if delegated_free > 0 {
            Coin::new("stake", delegated_free).unwrap().into()
        } else {
            Coins::new()
        };
        account
    }

    #[test]
    fn test_vested_delegation_counts_newly_vested() {
        let account = vesting_account(100, 0);
        let start = account.start_time;
        let half = start + Duration::seconds(50);

        let coin = |amount| Coin::new("stake", amount).unwrap();
        assert!(!check_vested_delegation_in_vesting_account(&account, start, &coin(1)).unwrap());
        assert!(check_vested_delegation_in_vesting_account(&account, half, &coin(50)).unwrap());
        assert!(!check_vested_delegation_in_vesting_account(&account, half, &coin(51)).unwrap());
    }

    #[test]
    fn test_vested_delegation_with_free_delegations() {
        let account = vesting_account(20, 10);
        // nothing vested yet, only the 10 free delegated coins count
        let coin = Coin::new("stake", 10).unwrap();
        assert!(check_vested_delegation_in_vesting_account(&account, account.start_time, &coin).unwrap());
    }
}
