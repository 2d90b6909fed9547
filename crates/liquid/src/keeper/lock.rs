//! Tokenize share locks and the unlock queue
//!
//! Lock entries live under one prefix keyed by address; accounts waiting for
//! their lock to expire are bucketed in the queue by completion time.

use chrono::{DateTime, Utc};
use lsm_core::AccAddress;
use lsm_store::{inclusive_end, Context, KvStoreExt, StoreError};

use super::Keeper;
use crate::error::{LiquidError, LiquidResult};
use crate::keys;
use crate::lock::{PendingTokenizeShareAuthorizations, StoredLock, TokenizeShareLock, TokenizeShareLockStatus};

/// Recover the address from a `[prefix, len, address..]` lock key
fn address_from_lock_key(key: &[u8]) -> LiquidResult<AccAddress> {
    let malformed = || StoreError::MalformedKey(hex::encode(key));
    let len = *key.get(1).ok_or_else(malformed)? as usize;
    let bytes = key.get(2..2 + len).ok_or_else(malformed)?;
    let address = String::from_utf8(bytes.to_vec()).map_err(|_| malformed())?;
    Ok(AccAddress::new(address)?)
}

impl Keeper {
    /// Mark the account LOCKED
    pub fn add_tokenize_shares_lock(&self, ctx: &mut Context<'_>, address: &AccAddress) -> LiquidResult<()> {
        ctx.store_mut().set_json(
            &keys::tokenize_shares_lock_key(address),
            &StoredLock { completion_time: None },
        )?;
        Ok(())
    }

    pub fn remove_tokenize_shares_lock(&self, ctx: &mut Context<'_>, address: &AccAddress) {
        ctx.store_mut().delete(&keys::tokenize_shares_lock_key(address));
    }

    /// Mark the account LOCK_EXPIRING until `time`
    pub fn set_tokenize_shares_unlock_time(
        &self,
        ctx: &mut Context<'_>,
        address: &AccAddress,
        time: DateTime<Utc>,
    ) -> LiquidResult<()> {
        ctx.store_mut().set_json(
            &keys::tokenize_shares_lock_key(address),
            &StoredLock { completion_time: Some(time) },
        )?;
        Ok(())
    }

    /// Lock status of an account and, while expiring, its unlock time
    pub fn tokenize_shares_lock(
        &self,
        ctx: &Context<'_>,
        address: &AccAddress,
    ) -> LiquidResult<(TokenizeShareLockStatus, Option<DateTime<Utc>>)> {
        let stored = ctx
            .store()
            .get_json::<StoredLock>(&keys::tokenize_shares_lock_key(address))?;
        Ok(match stored {
            None => (TokenizeShareLockStatus::Unlocked, None),
            Some(StoredLock { completion_time: None }) => (TokenizeShareLockStatus::Locked, None),
            Some(StoredLock { completion_time: Some(time) }) => {
                (TokenizeShareLockStatus::LockExpiring, Some(time))
            }
        })
    }

    /// Every LOCKED or LOCK_EXPIRING account
    pub fn all_tokenize_shares_locks(&self, ctx: &Context<'_>) -> LiquidResult<Vec<TokenizeShareLock>> {
        ctx.store()
            .scan_prefix(&[keys::TOKENIZE_SHARES_LOCK_PREFIX])
            .into_iter()
            .map(|(key, value)| {
                let stored: StoredLock = serde_json::from_slice(&value)?;
                let status = match stored.completion_time {
                    Some(_) => TokenizeShareLockStatus::LockExpiring,
                    None => TokenizeShareLockStatus::Locked,
                };
                Ok(TokenizeShareLock {
                    address: address_from_lock_key(&key)?,
                    status,
                    completion_time: stored.completion_time,
                })
            })
            .collect()
    }

    /// Restore locks, re-queueing the expiring ones
    pub(crate) fn set_tokenize_share_locks(
        &self,
        ctx: &mut Context<'_>,
        locks: &[TokenizeShareLock],
    ) -> LiquidResult<()> {
        for lock in locks {
            match (lock.status, lock.completion_time) {
                (TokenizeShareLockStatus::Locked, _) => self.add_tokenize_shares_lock(ctx, &lock.address)?,
                (TokenizeShareLockStatus::LockExpiring, Some(time)) => {
                    self.set_tokenize_shares_unlock_time(ctx, &lock.address, time)?;
                    self.push_pending_authorization(ctx, &lock.address, time)?;
                }
                (status, _) => {
                    return Err(LiquidError::InvalidGenesis(format!(
                        "unsupported tokenize share lock status {status} for {}",
                        lock.address
                    )));
                }
            }
        }
        Ok(())
    }

    // === Unlock queue ===

    /// Accounts whose lock expires at exactly `time`
    pub fn pending_tokenize_share_authorizations(
        &self,
        ctx: &Context<'_>,
        time: DateTime<Utc>,
    ) -> LiquidResult<PendingTokenizeShareAuthorizations> {
        Ok(ctx
            .store()
            .get_json(&keys::tokenize_share_authorization_time_key(&time))?
            .unwrap_or_default())
    }

    /// Overwrite the bucket at `time`; an empty bucket is deleted
    pub(crate) fn set_pending_tokenize_share_authorizations(
        &self,
        ctx: &mut Context<'_>,
        time: DateTime<Utc>,
        authorizations: &PendingTokenizeShareAuthorizations,
    ) -> LiquidResult<()> {
        let key = keys::tokenize_share_authorization_time_key(&time);
        if authorizations.addresses.is_empty() {
            ctx.store_mut().delete(&key);
        } else {
            ctx.store_mut().set_json(&key, authorizations)?;
        }
        Ok(())
    }

    fn push_pending_authorization(
        &self,
        ctx: &mut Context<'_>,
        address: &AccAddress,
        time: DateTime<Utc>,
    ) -> LiquidResult<()> {
        let mut pending = self.pending_tokenize_share_authorizations(ctx, time)?;
        pending.addresses.push(address.clone());
        self.set_pending_tokenize_share_authorizations(ctx, time, &pending)
    }

    /// Start the countdown to unlock `address`, returning when it completes
    pub fn queue_tokenize_shares_authorization(
        &self,
        ctx: &mut Context<'_>,
        address: &AccAddress,
    ) -> LiquidResult<DateTime<Utc>> {
        let unbonding_time = self.staking.unbonding_time(ctx)?;
        let completion_time = ctx.block_time() + unbonding_time;

        self.push_pending_authorization(ctx, address, completion_time)?;
        self.set_tokenize_shares_unlock_time(ctx, address, completion_time)?;
        Ok(completion_time)
    }

    /// Drop `address` from the bucket at `completion_time`
    pub fn cancel_tokenize_share_lock_expiration(
        &self,
        ctx: &mut Context<'_>,
        address: &AccAddress,
        completion_time: DateTime<Utc>,
    ) -> LiquidResult<()> {
        let mut pending = self.pending_tokenize_share_authorizations(ctx, completion_time)?;
        pending.addresses.retain(|queued| queued != address);
        self.set_pending_tokenize_share_authorizations(ctx, completion_time, &pending)
    }

    /// Unlock every account whose completion time is at or before
    /// `block_time`, returning the unlocked addresses
    pub fn remove_expired_tokenize_share_locks(
        &self,
        ctx: &mut Context<'_>,
        block_time: DateTime<Utc>,
    ) -> LiquidResult<Vec<AccAddress>> {
        let start = [keys::TOKENIZE_SHARES_UNLOCK_QUEUE_PREFIX];
        let end = inclusive_end(&keys::tokenize_share_authorization_time_key(&block_time));
        let buckets = ctx.store().range(&start, Some(&end));

        let mut unlocked = Vec::new();
        for (key, value) in buckets {
            let pending: PendingTokenizeShareAuthorizations = serde_json::from_slice(&value)?;
            unlocked.extend(pending.addresses);
            ctx.store_mut().delete(&key);
        }
        for address in &unlocked {
            self.remove_tokenize_shares_lock(ctx, address);
        }
        Ok(unlocked)
    }
}
