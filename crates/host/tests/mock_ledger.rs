//! Integration tests for the simulated host ledger

use chrono::{Duration, TimeZone, Utc};
use lsm_core::{AccAddress, Coin, Coins, Dec, ValAddress};
use lsm_host::pools::{module_address, BONDED_POOL_NAME, NOT_BONDED_POOL_NAME};
use lsm_host::{
    AccountKeeper, AccountKind, BankKeeper, BondStatus, DistributionKeeper, HostError, MockHost,
    StakingHooks, StakingKeeper, VestingAccount, VestingSchedule,
};
use lsm_store::{BlockHeader, Context, MemStore};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Hooks that do nothing
struct NoopHooks;

impl StakingHooks for NoopHooks {
    fn name(&self) -> &str {
        "noop"
    }
    fn after_validator_created(&self, _: &mut Context<'_>, _: &ValAddress) -> anyhow::Result<()> {
        Ok(())
    }
    fn after_validator_removed(&self, _: &mut Context<'_>, _: &ValAddress) -> anyhow::Result<()> {
        Ok(())
    }
    fn after_validator_bonded(&self, _: &mut Context<'_>, _: &ValAddress) -> anyhow::Result<()> {
        Ok(())
    }
    fn after_validator_begin_unbonding(&self, _: &mut Context<'_>, _: &ValAddress) -> anyhow::Result<()> {
        Ok(())
    }
    fn before_validator_slashed(&self, _: &mut Context<'_>, _: &ValAddress, _: Decimal) -> anyhow::Result<()> {
        Ok(())
    }
    fn before_delegation_created(&self, _: &mut Context<'_>, _: &AccAddress, _: &ValAddress) -> anyhow::Result<()> {
        Ok(())
    }
    fn before_delegation_shares_modified(&self, _: &mut Context<'_>, _: &AccAddress, _: &ValAddress) -> anyhow::Result<()> {
        Ok(())
    }
    fn before_delegation_removed(&self, _: &mut Context<'_>, _: &AccAddress, _: &ValAddress) -> anyhow::Result<()> {
        Ok(())
    }
    fn after_delegation_modified(&self, _: &mut Context<'_>, _: &AccAddress, _: &ValAddress) -> anyhow::Result<()> {
        Ok(())
    }
}

fn header() -> BlockHeader {
    BlockHeader::new(1, Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap())
}

fn acc(s: &str) -> AccAddress {
    AccAddress::new(s).unwrap()
}

fn val(s: &str) -> ValAddress {
    ValAddress::new(s).unwrap()
}

fn stake(amount: u128) -> Coins {
    Coin::new("stake", amount).unwrap().into()
}

#[test]
fn test_delegate_moves_tokens_to_bonded_pool() {
    let host = MockHost::default();
    let mut store = MemStore::new();
    let mut ctx = Context::new(&mut store, header());
    let (alice, v) = (acc("alice"), val("valoper1"));

    host.create_validator(&mut ctx, &NoopHooks, &v, BondStatus::Bonded).unwrap();
    host.fund_account(&mut ctx, &alice, &stake(100)).unwrap();

    let shares = host.delegate(&mut ctx, &alice, 40, &v).unwrap();
    assert_eq!(shares, Dec::from_int(40));
    assert_eq!(host.balance(&ctx, &alice, "stake").unwrap().amount, 60);
    assert_eq!(host.total_bonded_tokens(&ctx).unwrap(), 40);
    assert_eq!(host.delegation(&ctx, &alice, &v).unwrap().shares, Dec::from_int(40));
}

#[test]
fn test_unbond_removes_delegation_when_empty() {
    let host = MockHost::default();
    let mut store = MemStore::new();
    let mut ctx = Context::new(&mut store, header());
    let (alice, v) = (acc("alice"), val("valoper1"));

    host.create_validator(&mut ctx, &NoopHooks, &v, BondStatus::Bonded).unwrap();
    host.fund_account(&mut ctx, &alice, &stake(10)).unwrap();
    host.delegate(&mut ctx, &alice, 10, &v).unwrap();

    let tokens = host.unbond(&mut ctx, &alice, &v, &Dec::from_int(10)).unwrap();
    assert_eq!(tokens, 10);
    assert!(matches!(
        host.delegation(&ctx, &alice, &v),
        Err(HostError::NoDelegation { .. })
    ));
    // unbond leaves tokens in the pool for the caller to move
    assert_eq!(host.total_bonded_tokens(&ctx).unwrap(), 10);
}

#[test]
fn test_validate_unbond_amount_rejects_excess() {
    let host = MockHost::default();
    let mut store = MemStore::new();
    let mut ctx = Context::new(&mut store, header());
    let (alice, v) = (acc("alice"), val("valoper1"));

    host.create_validator(&mut ctx, &NoopHooks, &v, BondStatus::Bonded).unwrap();
    host.fund_account(&mut ctx, &alice, &stake(10)).unwrap();
    host.delegate(&mut ctx, &alice, 10, &v).unwrap();

    assert_eq!(host.validate_unbond_amount(&ctx, &alice, &v, 10).unwrap(), Dec::from_int(10));
    assert!(matches!(
        host.validate_unbond_amount(&ctx, &alice, &v, 11),
        Err(HostError::BadSharesAmount(_))
    ));
}

#[test]
fn test_slash_burns_pool_tokens() {
    let host = MockHost::default();
    let mut store = MemStore::new();
    let mut ctx = Context::new(&mut store, header());
    let (alice, v) = (acc("alice"), val("valoper1"));

    host.create_validator(&mut ctx, &NoopHooks, &v, BondStatus::Bonded).unwrap();
    host.fund_account(&mut ctx, &alice, &stake(100)).unwrap();
    host.delegate(&mut ctx, &alice, 100, &v).unwrap();

    let burned = host.slash(&mut ctx, &NoopHooks, &v, dec!(0.1)).unwrap();
    assert_eq!(burned, 10);
    assert_eq!(host.validator(&ctx, &v).unwrap().tokens, 90);
    assert_eq!(host.total_bonded_tokens(&ctx).unwrap(), 90);
    assert_eq!(host.supply_of(&ctx, "stake").unwrap(), 90);
}

#[test]
fn test_status_change_moves_pools() {
    let host = MockHost::default();
    let mut store = MemStore::new();
    let mut ctx = Context::new(&mut store, header());
    let (alice, v) = (acc("alice"), val("valoper1"));

    host.create_validator(&mut ctx, &NoopHooks, &v, BondStatus::Bonded).unwrap();
    host.fund_account(&mut ctx, &alice, &stake(30)).unwrap();
    host.delegate(&mut ctx, &alice, 30, &v).unwrap();

    host.set_validator_status(&mut ctx, &NoopHooks, &v, BondStatus::Unbonding).unwrap();
    assert_eq!(host.total_bonded_tokens(&ctx).unwrap(), 0);
    let not_bonded = host.balance(&ctx, &module_address(NOT_BONDED_POOL_NAME), "stake").unwrap();
    assert_eq!(not_bonded.amount, 30);
    let bonded = host.balance(&ctx, &module_address(BONDED_POOL_NAME), "stake").unwrap();
    assert!(bonded.is_zero());
}

#[test]
fn test_vesting_spendable_and_tracking() {
    let host = MockHost::default();
    let mut store = MemStore::new();
    let mut ctx = Context::new(&mut store, header());
    let (vester, v) = (acc("vester"), val("valoper1"));
    let start = ctx.block_time();

    host.create_validator(&mut ctx, &NoopHooks, &v, BondStatus::Bonded).unwrap();
    host.fund_account(&mut ctx, &vester, &stake(100)).unwrap();
    let account = VestingAccount::new(
        vester.clone(),
        VestingSchedule::Continuous,
        stake(100),
        start,
        start + Duration::seconds(100),
    );
    host.set_vesting_account(&mut ctx, &account).unwrap();

    assert!(host.spendable_coins(&ctx, &vester).unwrap().is_empty());
    assert!(host
        .send_coins(&mut ctx, &vester, &acc("bob"), &stake(1))
        .is_err());

    // delegating vesting coins is allowed
    host.delegate(&mut ctx, &vester, 100, &v).unwrap();
    let tracked = host.vesting_account(&ctx, &vester).unwrap().unwrap();
    assert_eq!(tracked.delegated_vesting.amount_of("stake"), 100);
    assert!(tracked.delegated_free.is_empty());
}

#[test]
fn test_rewards_settle_on_unbond() {
    let host = MockHost::default();
    let mut store = MemStore::new();
    let mut ctx = Context::new(&mut store, header());
    let (alice, v) = (acc("alice"), val("valoper1"));

    host.create_validator(&mut ctx, &NoopHooks, &v, BondStatus::Bonded).unwrap();
    host.fund_account(&mut ctx, &alice, &stake(10)).unwrap();
    host.delegate(&mut ctx, &alice, 10, &v).unwrap();
    host.allocate_rewards(&mut ctx, &alice, &v, &stake(3)).unwrap();

    let estimate = host.delegation_rewards(&ctx, &alice, &v).unwrap();
    assert_eq!(estimate.amount_of("stake"), dec!(3));

    host.unbond(&mut ctx, &alice, &v, &Dec::from_int(4)).unwrap();
    assert_eq!(host.balance(&ctx, &alice, "stake").unwrap().amount, 3);
    assert!(host
        .withdraw_delegation_rewards(&mut ctx, &alice, &v)
        .unwrap()
        .is_empty());
}

#[test]
fn test_receiving_redelegation_expires() {
    let host = MockHost::default();
    let mut store = MemStore::new();
    let mut ctx = Context::new(&mut store, header());
    let (alice, src, dst) = (acc("alice"), val("valsrc"), val("valdst"));

    host.create_validator(&mut ctx, &NoopHooks, &src, BondStatus::Bonded).unwrap();
    host.create_validator(&mut ctx, &NoopHooks, &dst, BondStatus::Bonded).unwrap();
    host.fund_account(&mut ctx, &alice, &stake(10)).unwrap();
    host.delegate(&mut ctx, &alice, 10, &src).unwrap();

    host.redelegate(&mut ctx, &alice, &src, &dst, &Dec::from_int(5)).unwrap();
    assert!(host.has_receiving_redelegation(&ctx, &alice, &dst).unwrap());
    assert!(!host.has_receiving_redelegation(&ctx, &alice, &src).unwrap());
    assert_eq!(host.delegation(&ctx, &alice, &dst).unwrap().shares, Dec::from_int(5));

    ctx.next_block(Duration::days(21));
    assert!(!host.has_receiving_redelegation(&ctx, &alice, &dst).unwrap());
}

#[test]
fn test_blocked_and_provider_accounts() {
    let host = MockHost::default();
    let mut store = MemStore::new();
    let mut ctx = Context::new(&mut store, header());
    let (ica, blocked) = (acc("ica"), acc("blocked"));

    host.register_liquid_staking_provider(&mut ctx, &ica);
    host.block_address(&mut ctx, &blocked);

    assert_eq!(host.account_kind(&ctx, &ica).unwrap(), AccountKind::LiquidStakingProvider);
    assert_eq!(host.account_kind(&ctx, &blocked).unwrap(), AccountKind::Ordinary);
    assert!(host.blocked_addr(&ctx, &blocked).unwrap());

    host.mint_coins(&mut ctx, "mint", &stake(5)).unwrap();
    assert!(matches!(
        host.send_coins_from_module_to_account(&mut ctx, "mint", &blocked, &stake(5)),
        Err(HostError::BlockedAddress(_))
    ));
}
