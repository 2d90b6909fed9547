//! Keeper - liquid staking state and operations
//!
//! The keeper owns every key under the module's prefixes and reaches the rest
//! of the ledger only through the host keeper traits.

mod abci;
mod distribution;
mod genesis;
mod handler;
mod hooks;
mod liquid_stake;
mod lock;
mod msg_server;
pub mod query;
mod records;

use lsm_core::AccAddress;
use lsm_host::{AccountKeeper, BankKeeper, DistributionKeeper, StakingKeeper};
use lsm_store::{Context, KvStoreExt};
use rust_decimal::Decimal;
use std::sync::Arc;

use crate::config::LiquidConfig;
use crate::error::LiquidResult;
use crate::keys;
use crate::params::Params;

pub use liquid_stake::check_vested_delegation_in_vesting_account;

/// Liquid staking keeper
///
/// Cheap to clone; collaborators are shared behind `Arc`.
#[derive(Clone)]
pub struct Keeper {
    staking: Arc<dyn StakingKeeper>,
    bank: Arc<dyn BankKeeper>,
    distribution: Arc<dyn DistributionKeeper>,
    accounts: Arc<dyn AccountKeeper>,
    config: LiquidConfig,
}

impl Keeper {
    pub fn new(
        staking: Arc<dyn StakingKeeper>,
        bank: Arc<dyn BankKeeper>,
        distribution: Arc<dyn DistributionKeeper>,
        accounts: Arc<dyn AccountKeeper>,
        config: LiquidConfig,
    ) -> Self {
        Self {
            staking,
            bank,
            distribution,
            accounts,
            config,
        }
    }

    pub fn config(&self) -> &LiquidConfig {
        &self.config
    }

    /// Address allowed to update params
    pub fn authority(&self) -> &AccAddress {
        &self.config.authority
    }

    /// Current params, defaults if never set
    pub fn params(&self, ctx: &Context<'_>) -> LiquidResult<Params> {
        Ok(ctx
            .store()
            .get_json::<Params>(&keys::params_key())?
            .unwrap_or_default())
    }

    pub fn set_params(&self, ctx: &mut Context<'_>, params: &Params) -> LiquidResult<()> {
        params.validate()?;
        ctx.store_mut().set_json(&keys::params_key(), params)?;
        Ok(())
    }

    pub fn global_liquid_staking_cap(&self, ctx: &Context<'_>) -> LiquidResult<Decimal> {
        Ok(self.params(ctx)?.global_liquid_staking_cap)
    }

    pub fn validator_liquid_staking_cap(&self, ctx: &Context<'_>) -> LiquidResult<Decimal> {
        Ok(self.params(ctx)?.validator_liquid_staking_cap)
    }
}
