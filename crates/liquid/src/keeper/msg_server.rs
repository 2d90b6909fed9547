//! Message handlers: tokenize, redeem, record transfer, lock toggling and
//! param updates

use chrono::{DateTime, Utc};
use lsm_core::{Coin, Coins, Dec};
use lsm_host::pools::{BONDED_POOL_NAME, MINT_MODULE_NAME, NOT_BONDED_POOL_NAME};
use lsm_store::{Context, Event};

use super::Keeper;
use crate::error::{LiquidError, LiquidResult};
use crate::events::*;
use crate::lock::TokenizeShareLockStatus;
use crate::msgs::{
    MsgDisableTokenizeShares, MsgEnableTokenizeShares, MsgRedeemTokensForShares, MsgTokenizeShares,
    MsgTransferTokenizeShareRecord, MsgUpdateParams,
};
use crate::record::TokenizeShareRecord;

use super::check_vested_delegation_in_vesting_account;

impl Keeper {
    /// Convert part of a delegation into freshly minted share tokens
    ///
    /// The tokens are undelegated from the delegator, re-delegated from a new
    /// custodial account, and the share tokens go to the delegator. The
    /// record's reward rights go to `tokenized_share_owner`.
    pub fn tokenize_shares(&self, ctx: &mut Context<'_>, msg: &MsgTokenizeShares) -> LiquidResult<Coin> {
        msg.validate_basic()?;
        let delegator = &msg.delegator_address;
        let validator_address = &msg.validator_address;

        let validator = self.staking.validator(ctx, validator_address)?;

        let (status, unlock_time) = self.tokenize_shares_lock(ctx, delegator)?;
        if status != TokenizeShareLockStatus::Unlocked {
            return Err(LiquidError::TokenizeSharesDisabledForAccount { unlock_time });
        }

        let bond_denom = self.staking.bond_denom(ctx)?;
        if msg.amount.denom != bond_denom {
            return Err(LiquidError::OnlyBondDenomAllowedForTokenize {
                expected: bond_denom,
                got: msg.amount.denom.clone(),
            });
        }

        if let Some(account) = self.accounts.vesting_account(ctx, delegator)? {
            if !check_vested_delegation_in_vesting_account(&account, ctx.block_time(), &msg.amount)? {
                return Err(LiquidError::ExceedingFreeVestingDelegations);
            }
        }

        let shares = self
            .staking
            .validate_unbond_amount(ctx, delegator, validator_address, msg.amount.amount)?;
        if shares.is_zero() {
            return Err(LiquidError::InsufficientShares(format!(
                "{} converts to zero shares",
                msg.amount
            )));
        }

        if self.staking.has_receiving_redelegation(ctx, delegator, validator_address)? {
            return Err(LiquidError::RedelegationInProgress);
        }

        // the tokens are already bonded, so only the liquid side grows
        let liquid_validator = self.liquid_validator(ctx, validator_address)?;
        if self.check_exceeds_validator_liquid_staking_cap(ctx, &liquid_validator, &shares, true)? {
            return Err(LiquidError::ValidatorLiquidStakingCapExceeded);
        }
        self.safely_increase_total_liquid_staked_tokens(ctx, msg.amount.amount, true)?;

        let record_id = self.last_tokenize_share_record_id(ctx)? + 1;
        self.set_last_tokenize_share_record_id(ctx, record_id)?;
        let record = TokenizeShareRecord::new(
            record_id,
            msg.tokenized_share_owner.clone(),
            validator_address.clone(),
            &self.config.module_account_prefix,
        );
        let custodian = record.module_address();

        let return_amount = self.staking.unbond(ctx, delegator, validator_address, &shares)?;
        let return_coins: Coins = Coin::new(bond_denom, return_amount)?.into();
        if validator.is_bonded() {
            self.bank
                .send_coins_from_module_to_module(ctx, BONDED_POOL_NAME, NOT_BONDED_POOL_NAME, &return_coins)?;
        }
        self.bank
            .undelegate_coins_from_module_to_account(ctx, NOT_BONDED_POOL_NAME, delegator, &return_coins)?;

        self.bank.send_coins(ctx, delegator, &custodian, &return_coins)?;
        let custodial_shares = self.staking.delegate(ctx, &custodian, return_amount, validator_address)?;

        // liquid shares follow the custodial delegation, one share token per whole share
        self.safely_increase_validator_liquid_shares(ctx, validator_address, &custodial_shares, true)?;
        let share_token = Coin::new(record.share_token_denom(), custodial_shares.truncate_int()?)?;
        let share_coins: Coins = share_token.clone().into();
        self.bank.mint_coins(ctx, MINT_MODULE_NAME, &share_coins)?;
        self.bank
            .send_coins_from_module_to_account(ctx, MINT_MODULE_NAME, delegator, &share_coins)?;

        self.add_tokenize_share_record(ctx, &record)?;

        ctx.emit(
            Event::new(EVENT_TYPE_TOKENIZE_SHARES)
                .with_attribute(ATTRIBUTE_KEY_DELEGATOR, delegator)
                .with_attribute(ATTRIBUTE_KEY_VALIDATOR, validator_address)
                .with_attribute(ATTRIBUTE_KEY_SHARE_OWNER, &msg.tokenized_share_owner)
                .with_attribute(ATTRIBUTE_KEY_SHARE_RECORD_ID, record_id)
                .with_attribute(ATTRIBUTE_KEY_AMOUNT, &msg.amount)
                .with_attribute(ATTRIBUTE_KEY_TOKENIZED_SHARES, &share_token),
        );

        tracing::info!(
            delegator = %delegator,
            validator = %validator_address,
            record_id,
            amount = %msg.amount,
            share_token = %share_token,
            "Tokenized shares"
        );
        Ok(share_token)
    }

    /// Burn share tokens and delegate their underlying tokens back to the
    /// holder
    pub fn redeem_tokens_for_shares(
        &self,
        ctx: &mut Context<'_>,
        msg: &MsgRedeemTokensForShares,
    ) -> LiquidResult<Coin> {
        msg.validate_basic()?;
        let delegator = &msg.delegator_address;
        let share_token = &msg.amount;

        let balance = self.bank.balance(ctx, delegator, &share_token.denom)?;
        if balance.amount < share_token.amount {
            return Err(LiquidError::NotEnoughBalance {
                have: balance.amount,
                need: share_token.amount,
            });
        }

        let record = self.tokenize_share_record_by_denom(ctx, &share_token.denom)?;
        let validator_address = &record.validator;
        let custodian = record.module_address();

        let validator = self.staking.validator(ctx, validator_address)?;
        let delegation = self.staking.delegation(ctx, &custodian, validator_address)?;

        // redeeming the whole (truncated) delegation takes its dust too
        let shares = if share_token.amount == delegation.shares.truncate_int()? {
            delegation.shares
        } else {
            Dec::from_int(share_token.amount)
        };

        let tokens = validator.tokens_from_shares(&shares)?.truncate_int()?;
        if tokens == 0 {
            return Err(LiquidError::TinyRedemptionAmount);
        }

        // provider-held stake stays liquid after redemption
        if !self.delegator_is_liquid_staker(ctx, delegator)? {
            self.decrease_total_liquid_staked_tokens(ctx, tokens)?;
            self.decrease_validator_liquid_shares(ctx, validator_address, &shares)?;
        }

        let return_amount = self.staking.unbond(ctx, &custodian, validator_address, &shares)?;
        let bond_denom = self.staking.bond_denom(ctx)?;
        let return_coin = Coin::new(bond_denom, return_amount)?;
        let return_coins: Coins = return_coin.clone().into();
        if validator.is_bonded() {
            self.bank
                .send_coins_from_module_to_module(ctx, BONDED_POOL_NAME, NOT_BONDED_POOL_NAME, &return_coins)?;
        }

        // last redemption: pay out what the custodian still holds, drop the record
        if let Err(err) = self.staking.delegation(ctx, &custodian, validator_address) {
            let err = LiquidError::from(err);
            if !err.is_no_delegation() {
                return Err(err);
            }
            self.withdraw_single_share_record_reward(ctx, record.id)?;
            self.delete_tokenize_share_record(ctx, record.id)?;
            tracing::debug!(record_id = record.id, "Tokenize share record fully redeemed");
        }

        let share_coins: Coins = share_token.clone().into();
        self.bank
            .send_coins_from_account_to_module(ctx, delegator, NOT_BONDED_POOL_NAME, &share_coins)?;
        self.bank.burn_coins(ctx, NOT_BONDED_POOL_NAME, &share_coins)?;

        self.bank
            .send_coins_from_module_to_account(ctx, NOT_BONDED_POOL_NAME, delegator, &return_coins)?;
        self.staking.delegate(ctx, delegator, return_amount, validator_address)?;

        ctx.emit(
            Event::new(EVENT_TYPE_REDEEM_SHARES)
                .with_attribute(ATTRIBUTE_KEY_DELEGATOR, delegator)
                .with_attribute(ATTRIBUTE_KEY_VALIDATOR, validator_address)
                .with_attribute(ATTRIBUTE_KEY_AMOUNT, share_token),
        );

        tracing::info!(
            delegator = %delegator,
            validator = %validator_address,
            shares = %share_token,
            returned = %return_coin,
            "Redeemed tokens for shares"
        );
        Ok(return_coin)
    }

    /// Hand the record's reward rights to a new owner
    pub fn transfer_tokenize_share_record(
        &self,
        ctx: &mut Context<'_>,
        msg: &MsgTransferTokenizeShareRecord,
    ) -> LiquidResult<()> {
        msg.validate_basic()?;
        let mut record = self.tokenize_share_record(ctx, msg.tokenize_share_record_id)?;
        if record.owner != msg.sender {
            return Err(LiquidError::NotTokenizeShareRecordOwner {
                owner: msg.sender.to_string(),
                record_id: record.id,
            });
        }

        self.delete_tokenize_share_record_with_owner(ctx, &record.owner, record.id);
        record.owner = msg.new_owner.clone();
        self.set_tokenize_share_record(ctx, &record)?;
        self.set_tokenize_share_record_with_owner(ctx, &record.owner, record.id);

        ctx.emit(
            Event::new(EVENT_TYPE_TRANSFER_TOKENIZE_SHARE_RECORD)
                .with_attribute(ATTRIBUTE_KEY_SHARE_RECORD_ID, record.id)
                .with_attribute(ATTRIBUTE_KEY_SENDER, &msg.sender)
                .with_attribute(ATTRIBUTE_KEY_SHARE_OWNER, &msg.new_owner),
        );

        tracing::info!(record_id = record.id, from = %msg.sender, to = %msg.new_owner, "Transferred tokenize share record");
        Ok(())
    }

    /// Lock the account against tokenizing; cancels a pending unlock
    pub fn disable_tokenize_shares(&self, ctx: &mut Context<'_>, msg: &MsgDisableTokenizeShares) -> LiquidResult<()> {
        let delegator = &msg.delegator_address;

        let (status, completion_time) = self.tokenize_shares_lock(ctx, delegator)?;
        match (status, completion_time) {
            (TokenizeShareLockStatus::Locked, _) => {
                return Err(LiquidError::TokenizeSharesAlreadyDisabledForAccount);
            }
            (TokenizeShareLockStatus::LockExpiring, Some(time)) => {
                self.cancel_tokenize_share_lock_expiration(ctx, delegator, time)?;
            }
            _ => {}
        }

        self.add_tokenize_shares_lock(ctx, delegator)?;

        tracing::info!(delegator = %delegator, "Tokenize shares disabled");
        Ok(())
    }

    /// Schedule the account's unlock one unbonding period from now
    pub fn enable_tokenize_shares(
        &self,
        ctx: &mut Context<'_>,
        msg: &MsgEnableTokenizeShares,
    ) -> LiquidResult<DateTime<Utc>> {
        let delegator = &msg.delegator_address;

        let (status, unlock_time) = self.tokenize_shares_lock(ctx, delegator)?;
        match status {
            TokenizeShareLockStatus::Unlocked => {
                return Err(LiquidError::TokenizeSharesAlreadyEnabledForAccount { completion_time: None });
            }
            TokenizeShareLockStatus::LockExpiring => {
                return Err(LiquidError::TokenizeSharesAlreadyEnabledForAccount {
                    completion_time: unlock_time,
                });
            }
            TokenizeShareLockStatus::Locked => {}
        }

        let completion_time = self.queue_tokenize_shares_authorization(ctx, delegator)?;

        tracing::info!(delegator = %delegator, %completion_time, "Tokenize shares re-enablement queued");
        Ok(completion_time)
    }

    pub fn update_params(&self, ctx: &mut Context<'_>, msg: &MsgUpdateParams) -> LiquidResult<()> {
        if &msg.authority != self.authority() {
            return Err(LiquidError::InvalidAuthority {
                expected: self.authority().to_string(),
                got: msg.authority.to_string(),
            });
        }
        self.set_params(ctx, &msg.params)?;

        tracing::info!(
            global_cap = %msg.params.global_liquid_staking_cap,
            validator_cap = %msg.params.validator_liquid_staking_cap,
            "Liquid staking params updated"
        );
        Ok(())
    }
}
