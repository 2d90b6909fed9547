//! Keeper interfaces consumed by the liquid staking module
//!
//! Read methods take `&Context`, state-changing methods `&mut Context`, so a
//! host's writes land in whatever branch the caller is executing in.

use chrono::Duration;
use lsm_core::{AccAddress, Coin, Coins, Dec, DecCoins, ValAddress};
use lsm_store::Context;
use rust_decimal::Decimal;

use crate::error::HostResult;
use crate::types::{AccountKind, Delegation, Validator};
use crate::vesting::VestingAccount;

/// Delegation ledger
pub trait StakingKeeper: Send + Sync {
    fn bond_denom(&self, ctx: &Context<'_>) -> HostResult<String>;

    fn unbonding_time(&self, ctx: &Context<'_>) -> HostResult<Duration>;

    /// Tokens held by the bonded pool
    fn total_bonded_tokens(&self, ctx: &Context<'_>) -> HostResult<u128>;

    /// Fails with `NoValidatorFound` if absent
    fn validator(&self, ctx: &Context<'_>, validator: &ValAddress) -> HostResult<Validator>;

    /// Fails with `NoDelegation` if absent
    fn delegation(
        &self,
        ctx: &Context<'_>,
        delegator: &AccAddress,
        validator: &ValAddress,
    ) -> HostResult<Delegation>;

    /// Convert a token amount to the shares that would be unbonded for it,
    /// failing with `BadSharesAmount` past the delegation's shares
    fn validate_unbond_amount(
        &self,
        ctx: &Context<'_>,
        delegator: &AccAddress,
        validator: &ValAddress,
        amount: u128,
    ) -> HostResult<Dec>;

    /// True if `delegator` has an unfinished redelegation into `validator`
    fn has_receiving_redelegation(
        &self,
        ctx: &Context<'_>,
        delegator: &AccAddress,
        validator: &ValAddress,
    ) -> HostResult<bool>;

    /// Remove `shares` from a delegation, returning their token value
    ///
    /// Tokens stay in the validator's pool; moving them is the caller's job.
    fn unbond(
        &self,
        ctx: &mut Context<'_>,
        delegator: &AccAddress,
        validator: &ValAddress,
        shares: &Dec,
    ) -> HostResult<u128>;

    /// Delegate `amount` bond-denom tokens from the delegator's balance,
    /// returning the shares issued
    fn delegate(
        &self,
        ctx: &mut Context<'_>,
        delegator: &AccAddress,
        amount: u128,
        validator: &ValAddress,
    ) -> HostResult<Dec>;
}

/// Fungible token ledger
pub trait BankKeeper: Send + Sync {
    fn balance(&self, ctx: &Context<'_>, address: &AccAddress, denom: &str) -> HostResult<Coin>;

    fn all_balances(&self, ctx: &Context<'_>, address: &AccAddress) -> HostResult<Coins>;

    /// Balance minus coins locked by a vesting schedule
    fn spendable_coins(&self, ctx: &Context<'_>, address: &AccAddress) -> HostResult<Coins>;

    fn send_coins(
        &self,
        ctx: &mut Context<'_>,
        from: &AccAddress,
        to: &AccAddress,
        amount: &Coins,
    ) -> HostResult<()>;

    fn send_coins_from_module_to_module(
        &self,
        ctx: &mut Context<'_>,
        from_module: &str,
        to_module: &str,
        amount: &Coins,
    ) -> HostResult<()>;

    fn send_coins_from_module_to_account(
        &self,
        ctx: &mut Context<'_>,
        from_module: &str,
        to: &AccAddress,
        amount: &Coins,
    ) -> HostResult<()>;

    fn send_coins_from_account_to_module(
        &self,
        ctx: &mut Context<'_>,
        from: &AccAddress,
        to_module: &str,
        amount: &Coins,
    ) -> HostResult<()>;

    /// Return undelegated coins to an account, updating vesting tracking
    fn undelegate_coins_from_module_to_account(
        &self,
        ctx: &mut Context<'_>,
        from_module: &str,
        to: &AccAddress,
        amount: &Coins,
    ) -> HostResult<()>;

    fn mint_coins(&self, ctx: &mut Context<'_>, module: &str, amount: &Coins) -> HostResult<()>;

    fn burn_coins(&self, ctx: &mut Context<'_>, module: &str, amount: &Coins) -> HostResult<()>;

    /// True if `address` may not receive funds
    fn blocked_addr(&self, ctx: &Context<'_>, address: &AccAddress) -> HostResult<bool>;
}

/// Rewards engine
pub trait DistributionKeeper: Send + Sync {
    /// Pay accrued rewards of a delegation to the delegator
    fn withdraw_delegation_rewards(
        &self,
        ctx: &mut Context<'_>,
        delegator: &AccAddress,
        validator: &ValAddress,
    ) -> HostResult<Coins>;

    /// Rewards that a withdrawal would pay right now
    fn delegation_rewards(
        &self,
        ctx: &Context<'_>,
        delegator: &AccAddress,
        validator: &ValAddress,
    ) -> HostResult<DecCoins>;
}

/// Account metadata
pub trait AccountKeeper: Send + Sync {
    fn vesting_account(
        &self,
        ctx: &Context<'_>,
        address: &AccAddress,
    ) -> HostResult<Option<VestingAccount>>;

    fn account_kind(&self, ctx: &Context<'_>, address: &AccAddress) -> HostResult<AccountKind>;
}

/// Staking lifecycle callbacks
///
/// Invoked by the host's staking ledger; the host has no typed knowledge of
/// the implementor's errors, hence `anyhow`.
pub trait StakingHooks: Send + Sync {
    /// Hook name for logging
    fn name(&self) -> &str;

    fn after_validator_created(&self, ctx: &mut Context<'_>, validator: &ValAddress) -> anyhow::Result<()>;

    fn after_validator_removed(&self, ctx: &mut Context<'_>, validator: &ValAddress) -> anyhow::Result<()>;

    fn after_validator_bonded(&self, ctx: &mut Context<'_>, validator: &ValAddress) -> anyhow::Result<()>;

    fn after_validator_begin_unbonding(
        &self,
        ctx: &mut Context<'_>,
        validator: &ValAddress,
    ) -> anyhow::Result<()>;

    /// Called before the validator's tokens are reduced by `fraction`
    fn before_validator_slashed(
        &self,
        ctx: &mut Context<'_>,
        validator: &ValAddress,
        fraction: Decimal,
    ) -> anyhow::Result<()>;

    fn before_delegation_created(
        &self,
        ctx: &mut Context<'_>,
        delegator: &AccAddress,
        validator: &ValAddress,
    ) -> anyhow::Result<()>;

    fn before_delegation_shares_modified(
        &self,
        ctx: &mut Context<'_>,
        delegator: &AccAddress,
        validator: &ValAddress,
    ) -> anyhow::Result<()>;

    fn before_delegation_removed(
        &self,
        ctx: &mut Context<'_>,
        delegator: &AccAddress,
        validator: &ValAddress,
    ) -> anyhow::Result<()>;

    fn after_delegation_modified(
        &self,
        ctx: &mut Context<'_>,
        delegator: &AccAddress,
        validator: &ValAddress,
    ) -> anyhow::Result<()>;
}
