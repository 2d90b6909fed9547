//! Mock host ledger for testing
//!
//! `MockHost` keeps all of its state (validators, delegations, balances,
//! rewards, vesting accounts) in the context's store, so it is rolled back
//! together with the liquid module when a branch fails. Administrative
//! helpers drive the lifecycle events a real chain would produce.

mod bank;
mod distribution;
pub mod keys;
mod staking;

use chrono::Duration;
use lsm_core::{AccAddress, Coin, CoinError, Coins, Dec, ValAddress};
use lsm_store::{Context, KvStoreExt};
use rust_decimal::Decimal;

use crate::error::{HostError, HostResult};
use crate::pools::{module_address, BONDED_POOL_NAME, DISTRIBUTION_MODULE_NAME, MINT_MODULE_NAME, NOT_BONDED_POOL_NAME};
use crate::traits::{StakingHooks, StakingKeeper};
use crate::types::{BondStatus, Delegation, Redelegation, Validator};
use crate::vesting::VestingAccount;

pub const DEFAULT_BOND_DENOM: &str = "stake";
pub const DEFAULT_UNBONDING_DAYS: i64 = 21;

/// Store-backed staking, bank, distribution and account ledger
#[derive(Debug, Clone)]
pub struct MockHost {
    bond_denom: String,
    unbonding_time: Duration,
}

impl MockHost {
    pub fn new(bond_denom: impl Into<String>, unbonding_time: Duration) -> Self {
        Self {
            bond_denom: bond_denom.into(),
            unbonding_time,
        }
    }

    /// `stake` bond denomination, 21 day unbonding period
    pub fn with_defaults() -> Self {
        Self::new(DEFAULT_BOND_DENOM, Duration::days(DEFAULT_UNBONDING_DAYS))
    }

    /// Bond-denom coins
    pub fn bond_coins(&self, amount: u128) -> HostResult<Coins> {
        Ok(Coin::new(self.bond_denom.clone(), amount)?.into())
    }

    fn pool_for(status: BondStatus) -> &'static str {
        match status {
            BondStatus::Bonded => BONDED_POOL_NAME,
            BondStatus::Unbonded | BondStatus::Unbonding => NOT_BONDED_POOL_NAME,
        }
    }

    // === Validators ===

    /// Register a validator with no stake
    pub fn create_validator(
        &self,
        ctx: &mut Context<'_>,
        hooks: &dyn StakingHooks,
        address: &ValAddress,
        status: BondStatus,
    ) -> HostResult<Validator> {
        if ctx.store().has(&keys::validator_key(address)) {
            return Err(HostError::ValidatorExists(address.to_string()));
        }
        let validator = Validator::new(address.clone(), status);
        self.set_validator(ctx, &validator)?;
        hooks.after_validator_created(ctx, address)?;

        tracing::debug!(validator = %address, status = %status, hook = hooks.name(), "Validator created");
        Ok(validator)
    }

    pub fn remove_validator(
        &self,
        ctx: &mut Context<'_>,
        hooks: &dyn StakingHooks,
        address: &ValAddress,
    ) -> HostResult<()> {
        self.validator(ctx, address)?;
        ctx.store_mut().delete(&keys::validator_key(address));
        hooks.after_validator_removed(ctx, address)?;

        tracing::debug!(validator = %address, "Validator removed");
        Ok(())
    }

    /// Change status, moving the validator's tokens between pools
    pub fn set_validator_status(
        &self,
        ctx: &mut Context<'_>,
        hooks: &dyn StakingHooks,
        address: &ValAddress,
        status: BondStatus,
    ) -> HostResult<()> {
        let mut validator = self.validator(ctx, address)?;
        let from_pool = Self::pool_for(validator.status);
        let to_pool = Self::pool_for(status);
        if from_pool != to_pool && validator.tokens > 0 {
            self.move_coins(ctx, &module_address(from_pool), &module_address(to_pool), &self.bond_coins(validator.tokens)?)?;
        }

        let previous = validator.status;
        validator.status = status;
        self.set_validator(ctx, &validator)?;

        match (previous, status) {
            (BondStatus::Bonded, BondStatus::Bonded) => {}
            (_, BondStatus::Bonded) => hooks.after_validator_bonded(ctx, address)?,
            (BondStatus::Bonded, _) => hooks.after_validator_begin_unbonding(ctx, address)?,
            _ => {}
        }
        Ok(())
    }

    /// Slash a validator's tokens by `fraction`, returning the tokens burned
    ///
    /// Hooks observe the validator before its tokens are reduced.
    pub fn slash(
        &self,
        ctx: &mut Context<'_>,
        hooks: &dyn StakingHooks,
        address: &ValAddress,
        fraction: Decimal,
    ) -> HostResult<u128> {
        if fraction.is_sign_negative() || fraction > Decimal::ONE {
            return Err(HostError::InvalidAmount(format!("slash fraction {fraction}")));
        }
        let mut validator = self.validator(ctx, address)?;
        hooks.before_validator_slashed(ctx, address, fraction)?;

        let to_burn = (&Dec::from_int(validator.tokens) * &Dec::from_decimal(fraction)).truncate_int()?;
        let burned = validator.remove_tokens(to_burn);
        self.set_validator(ctx, &validator)?;
        if burned > 0 {
            self.burn_coins_internal(ctx, Self::pool_for(validator.status), &self.bond_coins(burned)?)?;
        }

        tracing::debug!(validator = %address, %fraction, burned, "Validator slashed");
        Ok(burned)
    }

    /// Move `shares` of a delegation from `src` to `dst`
    ///
    /// The redelegation stays "receiving" on `dst` for one unbonding period.
    pub fn redelegate(
        &self,
        ctx: &mut Context<'_>,
        delegator: &AccAddress,
        src: &ValAddress,
        dst: &ValAddress,
        shares: &Dec,
    ) -> HostResult<Redelegation> {
        let src_validator = self.validator(ctx, src)?;
        let dst_validator = self.validator(ctx, dst)?;

        let amount = self.unbond(ctx, delegator, src, shares)?;
        if amount == 0 {
            return Err(HostError::InvalidAmount("redelegation of zero tokens".into()));
        }
        let from_pool = Self::pool_for(src_validator.status);
        let to_pool = Self::pool_for(dst_validator.status);
        if from_pool != to_pool {
            self.move_coins(ctx, &module_address(from_pool), &module_address(to_pool), &self.bond_coins(amount)?)?;
        }
        let shares_dst = self.add_delegation_tokens(ctx, delegator, dst, amount)?;

        let key = keys::redelegation_key(delegator, dst, src);
        let mut redelegation = ctx
            .store()
            .get_json::<Redelegation>(&key)?
            .unwrap_or(Redelegation {
                delegator_address: delegator.clone(),
                src_validator_address: src.clone(),
                dst_validator_address: dst.clone(),
                shares_dst: Dec::zero(),
                completion_time: ctx.block_time(),
            });
        redelegation.shares_dst += &shares_dst;
        redelegation.completion_time = ctx.block_time() + self.unbonding_time;
        ctx.store_mut().set_json(&key, &redelegation)?;

        tracing::debug!(delegator = %delegator, src = %src, dst = %dst, amount, "Redelegated");
        Ok(redelegation)
    }

    // === Accounts ===

    /// Mint coins straight into an account
    pub fn fund_account(&self, ctx: &mut Context<'_>, address: &AccAddress, amount: &Coins) -> HostResult<()> {
        self.mint_coins_internal(ctx, MINT_MODULE_NAME, amount)?;
        self.move_coins(ctx, &module_address(MINT_MODULE_NAME), address, amount)
    }

    pub fn set_vesting_account(&self, ctx: &mut Context<'_>, account: &VestingAccount) -> HostResult<()> {
        ctx.store_mut().set_json(&keys::vesting_key(&account.address), account)?;
        Ok(())
    }

    pub fn register_liquid_staking_provider(&self, ctx: &mut Context<'_>, address: &AccAddress) {
        ctx.store_mut().set(&keys::liquid_provider_key(address), vec![1]);
    }

    pub fn block_address(&self, ctx: &mut Context<'_>, address: &AccAddress) {
        ctx.store_mut().set(&keys::blocked_key(address), vec![1]);
    }

    /// Accrue `amount` of rewards to an existing delegation
    pub fn allocate_rewards(
        &self,
        ctx: &mut Context<'_>,
        delegator: &AccAddress,
        validator: &ValAddress,
        amount: &Coins,
    ) -> HostResult<()> {
        self.delegation(ctx, delegator, validator)?;
        self.mint_coins_internal(ctx, DISTRIBUTION_MODULE_NAME, amount)?;

        let key = keys::rewards_key(delegator, validator);
        let mut accrued = ctx.store().get_json::<Coins>(&key)?.unwrap_or_default();
        accrued.add(amount)?;
        ctx.store_mut().set_json(&key, &accrued)?;
        Ok(())
    }

    pub fn supply_of(&self, ctx: &Context<'_>, denom: &str) -> HostResult<u128> {
        Ok(ctx.store().get_json::<u128>(&keys::supply_key(denom))?.unwrap_or(0))
    }

    // === Internal state helpers ===

    fn set_validator(&self, ctx: &mut Context<'_>, validator: &Validator) -> HostResult<()> {
        ctx.store_mut()
            .set_json(&keys::validator_key(&validator.operator_address), validator)?;
        Ok(())
    }

    fn set_delegation(&self, ctx: &mut Context<'_>, delegation: &Delegation) -> HostResult<()> {
        let key = keys::delegation_key(&delegation.delegator_address, &delegation.validator_address);
        ctx.store_mut().set_json(&key, delegation)?;
        Ok(())
    }

    /// Bond `amount` tokens (already in the right pool) to a delegation
    fn add_delegation_tokens(
        &self,
        ctx: &mut Context<'_>,
        delegator: &AccAddress,
        address: &ValAddress,
        amount: u128,
    ) -> HostResult<Dec> {
        self.settle_rewards(ctx, delegator, address)?;

        let mut validator = self.validator(ctx, address)?;
        let issued = validator.add_tokens_from_del(amount)?;
        self.set_validator(ctx, &validator)?;

        let mut delegation = match self.delegation(ctx, delegator, address) {
            Ok(delegation) => delegation,
            Err(HostError::NoDelegation { .. }) => Delegation::new(delegator.clone(), address.clone()),
            Err(e) => return Err(e),
        };
        delegation.shares += &issued;
        self.set_delegation(ctx, &delegation)?;
        Ok(issued)
    }

    /// Pay out accrued rewards before a delegation's shares change
    fn settle_rewards(
        &self,
        ctx: &mut Context<'_>,
        delegator: &AccAddress,
        validator: &ValAddress,
    ) -> HostResult<Coins> {
        let key = keys::rewards_key(delegator, validator);
        let accrued = ctx.store().get_json::<Coins>(&key)?.unwrap_or_default();
        if !accrued.is_empty() {
            self.move_coins(ctx, &module_address(DISTRIBUTION_MODULE_NAME), delegator, &accrued)?;
            ctx.store_mut().delete(&key);
        }
        Ok(accrued)
    }

    fn read_balance(&self, ctx: &Context<'_>, address: &AccAddress, denom: &str) -> HostResult<u128> {
        Ok(ctx
            .store()
            .get_json::<u128>(&keys::balance_key(address, denom))?
            .unwrap_or(0))
    }

    fn write_balance(&self, ctx: &mut Context<'_>, address: &AccAddress, denom: &str, amount: u128) -> HostResult<()> {
        let key = keys::balance_key(address, denom);
        if amount == 0 {
            ctx.store_mut().delete(&key);
        } else {
            ctx.store_mut().set_json(&key, &amount)?;
        }
        Ok(())
    }

    fn read_all_balances(&self, ctx: &Context<'_>, address: &AccAddress) -> HostResult<Coins> {
        let prefix = keys::balances_prefix(address);
        let mut coins = Coins::new();
        for (key, value) in ctx.store().scan_prefix(&prefix) {
            let denom = String::from_utf8_lossy(&key[prefix.len()..]).into_owned();
            let amount: u128 = serde_json::from_slice(&value).map_err(lsm_store::StoreError::from)?;
            coins.add_coin(&Coin::new(denom, amount)?)?;
        }
        Ok(coins)
    }

    fn add_coins(&self, ctx: &mut Context<'_>, address: &AccAddress, amount: &Coins) -> HostResult<()> {
        for coin in amount.iter() {
            let current = self.read_balance(ctx, address, &coin.denom)?;
            let updated = current
                .checked_add(coin.amount)
                .ok_or_else(|| CoinError::Overflow(coin.denom.clone()))?;
            self.write_balance(ctx, address, &coin.denom, updated)?;
        }
        Ok(())
    }

    fn sub_coins(&self, ctx: &mut Context<'_>, address: &AccAddress, amount: &Coins) -> HostResult<()> {
        let balances = self.read_all_balances(ctx, address)?;
        let remaining = balances
            .checked_sub(amount)
            .map_err(|source| HostError::InsufficientFunds {
                address: address.to_string(),
                source,
            })?;
        for coin in amount.iter() {
            self.write_balance(ctx, address, &coin.denom, remaining.amount_of(&coin.denom))?;
        }
        Ok(())
    }

    /// Unchecked transfer: no spendable or blocked-address checks
    fn move_coins(&self, ctx: &mut Context<'_>, from: &AccAddress, to: &AccAddress, amount: &Coins) -> HostResult<()> {
        self.sub_coins(ctx, from, amount)?;
        self.add_coins(ctx, to, amount)
    }

    fn mint_coins_internal(&self, ctx: &mut Context<'_>, module: &str, amount: &Coins) -> HostResult<()> {
        self.add_coins(ctx, &module_address(module), amount)?;
        for coin in amount.iter() {
            let supply = self.supply_of(ctx, &coin.denom)?;
            let updated = supply
                .checked_add(coin.amount)
                .ok_or_else(|| CoinError::Overflow(coin.denom.clone()))?;
            ctx.store_mut().set_json(&keys::supply_key(&coin.denom), &updated)?;
        }
        Ok(())
    }

    fn burn_coins_internal(&self, ctx: &mut Context<'_>, module: &str, amount: &Coins) -> HostResult<()> {
        self.sub_coins(ctx, &module_address(module), amount)?;
        for coin in amount.iter() {
            let supply = self.supply_of(ctx, &coin.denom)?;
            let key = keys::supply_key(&coin.denom);
            match supply.saturating_sub(coin.amount) {
                0 => ctx.store_mut().delete(&key),
                left => ctx.store_mut().set_json(&key, &left)?,
            }
        }
        Ok(())
    }
}

impl Default for MockHost {
    fn default() -> Self {
        Self::with_defaults()
    }
}
