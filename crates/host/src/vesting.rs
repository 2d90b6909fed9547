//! Vesting accounts
//!
//! A vesting account tracks how much of its delegated stake came from still
//! vesting coins (`delegated_vesting`) versus free coins (`delegated_free`).
//! Both are updated only on delegate/undelegate, so they may lag behind the
//! vesting schedule.

use chrono::{DateTime, Utc};
use lsm_core::{AccAddress, Coin, Coins};
use serde::{Deserialize, Serialize};
use strum::Display;

use crate::error::HostResult;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
pub enum VestingSchedule {
    /// Vests linearly between start and end
    Continuous,
    /// Vests entirely at end
    Delayed,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VestingAccount {
    pub address: AccAddress,
    pub schedule: VestingSchedule,
    pub original_vesting: Coins,
    pub delegated_free: Coins,
    pub delegated_vesting: Coins,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
}

impl VestingAccount {
    pub fn new(
        address: AccAddress,
        schedule: VestingSchedule,
        original_vesting: Coins,
        start_time: DateTime<Utc>,
        end_time: DateTime<Utc>,
    ) -> Self {
        Self {
            address,
            schedule,
            original_vesting,
            delegated_free: Coins::new(),
            delegated_vesting: Coins::new(),
            start_time,
            end_time,
        }
    }

    /// Coins vested by `time`
    pub fn vested_coins(&self, time: DateTime<Utc>) -> HostResult<Coins> {
        if time >= self.end_time {
            return Ok(self.original_vesting.clone());
        }
        match self.schedule {
            VestingSchedule::Delayed => Ok(Coins::new()),
            VestingSchedule::Continuous => {
                if time <= self.start_time {
                    return Ok(Coins::new());
                }
                let elapsed = (time - self.start_time).num_nanoseconds().unwrap_or(i64::MAX) as u128;
                let total = (self.end_time - self.start_time).num_nanoseconds().unwrap_or(i64::MAX) as u128;
                let mut vested = Coins::new();
                for coin in self.original_vesting.iter() {
                    let amount = coin.amount.saturating_mul(elapsed) / total.max(1);
                    vested.add_coin(&Coin::new(coin.denom, amount)?)?;
                }
                Ok(vested)
            }
        }
    }

    /// Coins still vesting at `time`
    pub fn vesting_coins(&self, time: DateTime<Utc>) -> HostResult<Coins> {
        let vested = self.vested_coins(time)?;
        Ok(self.original_vesting.checked_sub(&vested)?)
    }

    /// Coins that cannot be spent at `time`: vesting coins not covered by
    /// vesting delegations
    pub fn locked_coins(&self, time: DateTime<Utc>) -> HostResult<Coins> {
        let vesting = self.vesting_coins(time)?;
        let mut locked = Coins::new();
        for coin in vesting.iter() {
            let left = coin
                .amount
                .saturating_sub(self.delegated_vesting.amount_of(&coin.denom));
            locked.add_coin(&Coin::new(coin.denom, left)?)?;
        }
        Ok(locked)
    }

    /// Record a delegation of `amount`, vesting coins first
    pub fn track_delegation(&mut self, time: DateTime<Utc>, amount: &Coins) -> HostResult<()> {
        let vesting = self.vesting_coins(time)?;
        for coin in amount.iter() {
            let undelegated_vesting = vesting
                .amount_of(&coin.denom)
                .saturating_sub(self.delegated_vesting.amount_of(&coin.denom));
            let x = undelegated_vesting.min(coin.amount);
            let y = coin.amount - x;
            self.delegated_vesting.add_coin(&Coin::new(coin.denom.clone(), x)?)?;
            self.delegated_free.add_coin(&Coin::new(coin.denom, y)?)?;
        }
        Ok(())
    }

    /// Record an undelegation of `amount`, free coins first
    pub fn track_undelegation(&mut self, amount: &Coins) -> HostResult<()> {
        for coin in amount.iter() {
            let x = self.delegated_free.amount_of(&coin.denom).min(coin.amount);
            let y = self
                .delegated_vesting
                .amount_of(&coin.denom)
                .min(coin.amount - x);
            self.delegated_free = self
                .delegated_free
                .checked_sub(&Coin::new(coin.denom.clone(), x)?.into())?;
            self.delegated_vesting = self
                .delegated_vesting
                .checked_sub(&Coin::new(coin.denom, y)?.into())?;
        }
        Ok(())
    }
}
