//! Shared harness: a store-backed mock host wired to a liquid keeper that
//! also serves as the host's staking hooks

#![allow(dead_code)]

use std::sync::Arc;

use chrono::{DateTime, TimeZone, Utc};
use lsm_core::{AccAddress, Coin, Coins, Dec, ValAddress};
use lsm_host::{BondStatus, MockHost, StakingKeeper};
use lsm_liquid::msgs::{MsgRedeemTokensForShares, MsgTokenizeShares};
use lsm_liquid::{Keeper, LiquidConfig, LiquidResult, Params};
use lsm_store::{BlockHeader, Context};
use rust_decimal::Decimal;

pub struct Harness {
    pub host: Arc<MockHost>,
    pub keeper: Keeper,
}

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

pub fn genesis_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
}

pub fn header() -> BlockHeader {
    BlockHeader::new(1, genesis_time())
}

pub fn acc(s: &str) -> AccAddress {
    AccAddress::new(s).unwrap()
}

pub fn val(s: &str) -> ValAddress {
    ValAddress::new(s).unwrap()
}

pub fn stake(amount: u128) -> Coin {
    Coin::new("stake", amount).unwrap()
}

pub fn stake_coins(amount: u128) -> Coins {
    stake(amount).into()
}

impl Harness {
    pub fn new() -> Self {
        Self::with_config(LiquidConfig::default())
    }

    pub fn with_config(config: LiquidConfig) -> Self {
        init_tracing();
        let host = Arc::new(MockHost::with_defaults());
        let keeper = Keeper::new(host.clone(), host.clone(), host.clone(), host.clone(), config);
        Self { host, keeper }
    }

    pub fn create_validator(&self, ctx: &mut Context<'_>, name: &str, status: BondStatus) -> ValAddress {
        let address = val(name);
        self.host
            .create_validator(ctx, &self.keeper, &address, status)
            .unwrap();
        address
    }

    /// Fund `delegator` and delegate `amount` to `validator`
    pub fn delegate(&self, ctx: &mut Context<'_>, delegator: &AccAddress, validator: &ValAddress, amount: u128) {
        self.host.fund_account(ctx, delegator, &stake_coins(amount)).unwrap();
        self.host.delegate(ctx, delegator, amount, validator).unwrap();
    }

    pub fn set_caps(&self, ctx: &mut Context<'_>, global: Decimal, validator: Decimal) {
        self.keeper
            .set_params(ctx, &Params::new(global, validator))
            .unwrap();
    }

    pub fn tokenize(
        &self,
        ctx: &mut Context<'_>,
        delegator: &AccAddress,
        validator: &ValAddress,
        amount: u128,
        owner: &AccAddress,
    ) -> LiquidResult<Coin> {
        self.keeper.tokenize_shares(
            ctx,
            &MsgTokenizeShares {
                delegator_address: delegator.clone(),
                validator_address: validator.clone(),
                amount: stake(amount),
                tokenized_share_owner: owner.clone(),
            },
        )
    }

    pub fn redeem(&self, ctx: &mut Context<'_>, delegator: &AccAddress, amount: Coin) -> LiquidResult<Coin> {
        self.keeper.redeem_tokens_for_shares(
            ctx,
            &MsgRedeemTokensForShares {
                delegator_address: delegator.clone(),
                amount,
            },
        )
    }

    pub fn delegation_shares(&self, ctx: &Context<'_>, delegator: &AccAddress, validator: &ValAddress) -> Dec {
        self.host
            .delegation(ctx, delegator, validator)
            .map(|d| d.shares)
            .unwrap_or_default()
    }
}
