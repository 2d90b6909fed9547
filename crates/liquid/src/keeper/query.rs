//! Read-only views over module state
//!
//! Plain getters (params, records by id/denom/owner, liquid validators, the
//! liquid total) live on [`Keeper`] directly; this module adds the views that
//! aggregate or paginate.

use chrono::{DateTime, Utc};
use lsm_core::{AccAddress, Coin, DecCoins};
use lsm_store::Context;
use serde::{Deserialize, Serialize};

use super::Keeper;
use crate::error::LiquidResult;
use crate::lock::TokenizeShareLockStatus;
use crate::record::TokenizeShareRecord;

/// Offset/limit window over an ordered listing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    pub offset: usize,
    pub limit: usize,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self { offset: 0, limit: 100 }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// Items across all pages
    pub total: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LockInfo {
    pub status: TokenizeShareLockStatus,
    /// Set while the lock is expiring
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiration_time: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenizeShareRecordReward {
    pub record_id: u64,
    pub reward: DecCoins,
}

/// Pending rewards of every record held by one owner
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TotalRewards {
    pub rewards: Vec<TokenizeShareRecordReward>,
    pub total: DecCoins,
}

impl Keeper {
    pub fn query_all_tokenize_share_records(
        &self,
        ctx: &Context<'_>,
        page: PageRequest,
    ) -> LiquidResult<Page<TokenizeShareRecord>> {
        let records = self.all_tokenize_share_records(ctx)?;
        let total = records.len();
        let items = records.into_iter().skip(page.offset).take(page.limit).collect();
        Ok(Page { items, total })
    }

    /// Bond-denom value of every custodial delegation
    pub fn query_total_tokenize_shared_assets(&self, ctx: &Context<'_>) -> LiquidResult<Coin> {
        let mut total: u128 = 0;
        for record in self.all_tokenize_share_records(ctx)? {
            let delegation = self.staking.delegation(ctx, &record.module_address(), &record.validator)?;
            let validator = self.staking.validator(ctx, &record.validator)?;
            let tokens = validator.tokens_from_shares(&delegation.shares)?.round_int()?;
            total = total.checked_add(tokens).ok_or(lsm_core::MathError::Overflow)?;
        }
        Ok(Coin::new(self.staking.bond_denom(ctx)?, total)?)
    }

    pub fn query_tokenize_share_lock_info(&self, ctx: &Context<'_>, address: &AccAddress) -> LiquidResult<LockInfo> {
        let (status, expiration_time) = self.tokenize_shares_lock(ctx, address)?;
        Ok(LockInfo { status, expiration_time })
    }

    /// Rewards a withdrawal would pay right now, per record and in total
    ///
    /// Includes whatever the custodial accounts already hold. Records whose
    /// delegation is gone contribute only that balance.
    pub fn query_tokenize_share_record_reward(&self, ctx: &Context<'_>, owner: &AccAddress) -> LiquidResult<TotalRewards> {
        let mut rewards = TotalRewards::default();

        for record in self.tokenize_share_records_by_owner(ctx, owner)? {
            let custodian = record.module_address();
            let balance = DecCoins::from(&self.bank.all_balances(ctx, &custodian)?);

            let mut reward = if self.record_delegation_exists(ctx, &record)? {
                self.distribution.delegation_rewards(ctx, &custodian, &record.validator)?
            } else if balance.is_empty() {
                continue;
            } else {
                DecCoins::new()
            };
            reward.add(&balance);

            rewards.total.add(&reward);
            rewards.rewards.push(TokenizeShareRecordReward {
                record_id: record.id,
                reward,
            });
        }
        Ok(rewards)
    }
}
