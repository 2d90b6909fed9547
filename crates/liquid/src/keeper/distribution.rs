//! Reward withdrawal for tokenize share record owners
//!
//! Rewards accrue to each record's custodial account; withdrawing pays the
//! custodian and forwards its whole balance to the record owner.

use lsm_core::{AccAddress, Coins};
use lsm_store::{Context, Event};

use super::Keeper;
use crate::error::{LiquidError, LiquidResult};
use crate::events::*;
use crate::record::TokenizeShareRecord;

impl Keeper {
    fn ensure_can_receive(&self, ctx: &Context<'_>, owner: &AccAddress) -> LiquidResult<()> {
        if self.bank.blocked_addr(ctx, owner)? {
            return Err(LiquidError::Unauthorized(format!(
                "{owner} is not allowed to receive external funds"
            )));
        }
        Ok(())
    }

    /// True if the record's validator and custodial delegation both still
    /// exist; other host failures are returned
    pub(super) fn record_delegation_exists(&self, ctx: &Context<'_>, record: &TokenizeShareRecord) -> LiquidResult<bool> {
        if let Err(err) = self.staking.validator(ctx, &record.validator) {
            let err = LiquidError::from(err);
            return if err.is_no_validator() { Ok(false) } else { Err(err) };
        }
        if let Err(err) = self.staking.delegation(ctx, &record.module_address(), &record.validator) {
            let err = LiquidError::from(err);
            return if err.is_no_delegation() { Ok(false) } else { Err(err) };
        }
        Ok(true)
    }

    /// Forward the custodian's whole balance to the owner
    fn sweep_custodian(
        &self,
        ctx: &mut Context<'_>,
        record: &TokenizeShareRecord,
        owner: &AccAddress,
    ) -> LiquidResult<Coins> {
        let custodian = record.module_address();
        let balances = self.bank.all_balances(ctx, &custodian)?;
        if !balances.is_empty() {
            self.bank.send_coins(ctx, &custodian, owner, &balances)?;
        }
        Ok(balances)
    }

    /// Withdraw a record's rewards to its owner ahead of deleting it
    ///
    /// Skips the withdrawal if the delegation is already gone; any balance
    /// left on the custodian is still forwarded.
    pub fn withdraw_single_share_record_reward(&self, ctx: &mut Context<'_>, record_id: u64) -> LiquidResult<()> {
        let record = self.tokenize_share_record(ctx, record_id)?;
        let owner = record.owner.clone();
        self.ensure_can_receive(ctx, &owner)?;

        if self.record_delegation_exists(ctx, &record)? {
            self.distribution
                .withdraw_delegation_rewards(ctx, &record.module_address(), &record.validator)?;
        }

        let balances = self.sweep_custodian(ctx, &record, &owner)?;
        if !balances.is_empty() {
            ctx.emit(
                Event::new(EVENT_TYPE_WITHDRAW_TOKENIZE_SHARE_REWARD)
                    .with_attribute(ATTRIBUTE_KEY_WITHDRAW_ADDRESS, &owner)
                    .with_attribute(ATTRIBUTE_KEY_AMOUNT, &balances),
            );
            tracing::info!(record_id, owner = %owner, amount = %balances, "Withdrew final record rewards");
        }
        Ok(())
    }

    /// Withdraw one record's rewards; only its owner may ask
    pub fn withdraw_tokenize_share_record_reward(
        &self,
        ctx: &mut Context<'_>,
        owner: &AccAddress,
        record_id: u64,
    ) -> LiquidResult<Coins> {
        let record = self.tokenize_share_record(ctx, record_id)?;
        self.ensure_can_receive(ctx, owner)?;
        if &record.owner != owner {
            return Err(LiquidError::NotTokenizeShareRecordOwner {
                owner: owner.to_string(),
                record_id,
            });
        }

        let custodian = record.module_address();
        self.staking.validator(ctx, &record.validator)?;
        self.staking.delegation(ctx, &custodian, &record.validator)?;
        self.distribution
            .withdraw_delegation_rewards(ctx, &custodian, &record.validator)?;

        let balances = self.sweep_custodian(ctx, &record, owner)?;

        ctx.emit(
            Event::new(EVENT_TYPE_WITHDRAW_TOKENIZE_SHARE_REWARD)
                .with_attribute(ATTRIBUTE_KEY_WITHDRAW_ADDRESS, owner)
                .with_attribute(ATTRIBUTE_KEY_AMOUNT, &balances),
        );

        tracing::info!(record_id, owner = %owner, amount = %balances, "Withdrew tokenize share record rewards");
        Ok(balances)
    }

    /// Withdraw rewards of every record `owner` holds
    ///
    /// Each record is withdrawn in its own branch; a record that fails is
    /// logged and skipped without undoing the others.
    pub fn withdraw_all_tokenize_share_record_reward(
        &self,
        ctx: &mut Context<'_>,
        owner: &AccAddress,
    ) -> LiquidResult<Coins> {
        self.ensure_can_receive(ctx, owner)?;

        let mut total = Coins::new();
        for record in self.tokenize_share_records_by_owner(ctx, owner)? {
            let outcome = ctx.branch(|branch| -> LiquidResult<Option<Coins>> {
                if !self.record_delegation_exists(branch, &record)? {
                    return Ok(None);
                }
                self.distribution.withdraw_delegation_rewards(
                    branch,
                    &record.module_address(),
                    &record.validator,
                )?;
                self.sweep_custodian(branch, &record, owner).map(Some)
            });

            match outcome {
                Ok(Some(balances)) => total.add(&balances)?,
                Ok(None) => {
                    tracing::warn!(record_id = record.id, validator = %record.validator, "Skipping record without delegation");
                }
                Err(err) => {
                    tracing::error!(record_id = record.id, error = %err, "Failed to withdraw record rewards");
                }
            }
        }

        ctx.emit(
            Event::new(EVENT_TYPE_WITHDRAW_TOKENIZE_SHARE_REWARD)
                .with_attribute(ATTRIBUTE_KEY_WITHDRAW_ADDRESS, owner)
                .with_attribute(ATTRIBUTE_KEY_AMOUNT, &total),
        );

        tracing::info!(owner = %owner, amount = %total, "Withdrew all tokenize share record rewards");
        Ok(total)
    }
}
