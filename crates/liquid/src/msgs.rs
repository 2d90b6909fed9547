//! Request messages and responses
//!
//! Each message has a stateless `validate_basic` that runs before any state is
//! read. [`LiquidMsg`] wraps them all for `Keeper::deliver`.

use chrono::{DateTime, Utc};
use lsm_core::{AccAddress, Coin, Coins, ValAddress};
use serde::{Deserialize, Serialize};

use crate::error::{LiquidError, LiquidResult};
use crate::params::Params;

fn validate_amount(amount: &Coin) -> LiquidResult<()> {
    if !amount.is_valid() || !amount.is_positive() {
        return Err(LiquidError::InvalidRequest(format!(
            "invalid shares amount: {amount}"
        )));
    }
    Ok(())
}

/// Convert `amount` of a native delegation into share tokens
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MsgTokenizeShares {
    pub delegator_address: AccAddress,
    pub validator_address: ValAddress,
    pub amount: Coin,
    pub tokenized_share_owner: AccAddress,
}

impl MsgTokenizeShares {
    pub fn validate_basic(&self) -> LiquidResult<()> {
        validate_amount(&self.amount)
    }
}

/// Burn share tokens and restore the native delegation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MsgRedeemTokensForShares {
    pub delegator_address: AccAddress,
    pub amount: Coin,
}

impl MsgRedeemTokensForShares {
    pub fn validate_basic(&self) -> LiquidResult<()> {
        validate_amount(&self.amount)
    }
}

/// Hand a record's reward ownership to another account
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MsgTransferTokenizeShareRecord {
    pub tokenize_share_record_id: u64,
    pub sender: AccAddress,
    pub new_owner: AccAddress,
}

impl MsgTransferTokenizeShareRecord {
    pub fn validate_basic(&self) -> LiquidResult<()> {
        if self.tokenize_share_record_id == 0 {
            return Err(LiquidError::InvalidRequest("record id cannot be zero".into()));
        }
        if self.sender == self.new_owner {
            return Err(LiquidError::InvalidRequest(
                "new owner must differ from sender".into(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MsgDisableTokenizeShares {
    pub delegator_address: AccAddress,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MsgEnableTokenizeShares {
    pub delegator_address: AccAddress,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MsgWithdrawTokenizeShareRecordReward {
    pub owner_address: AccAddress,
    pub record_id: u64,
}

impl MsgWithdrawTokenizeShareRecordReward {
    pub fn validate_basic(&self) -> LiquidResult<()> {
        if self.record_id == 0 {
            return Err(LiquidError::InvalidRequest("record id cannot be zero".into()));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MsgWithdrawAllTokenizeShareRecordReward {
    pub owner_address: AccAddress,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MsgUpdateParams {
    pub authority: AccAddress,
    pub params: Params,
}

impl MsgUpdateParams {
    pub fn validate_basic(&self) -> LiquidResult<()> {
        self.params.validate()
    }
}

/// Every request the module accepts
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LiquidMsg {
    TokenizeShares(MsgTokenizeShares),
    RedeemTokensForShares(MsgRedeemTokensForShares),
    TransferTokenizeShareRecord(MsgTransferTokenizeShareRecord),
    DisableTokenizeShares(MsgDisableTokenizeShares),
    EnableTokenizeShares(MsgEnableTokenizeShares),
    WithdrawTokenizeShareRecordReward(MsgWithdrawTokenizeShareRecordReward),
    WithdrawAllTokenizeShareRecordReward(MsgWithdrawAllTokenizeShareRecordReward),
    UpdateParams(MsgUpdateParams),
}

impl LiquidMsg {
    pub fn validate_basic(&self) -> LiquidResult<()> {
        match self {
            Self::TokenizeShares(msg) => msg.validate_basic(),
            Self::RedeemTokensForShares(msg) => msg.validate_basic(),
            Self::TransferTokenizeShareRecord(msg) => msg.validate_basic(),
            Self::WithdrawTokenizeShareRecordReward(msg) => msg.validate_basic(),
            Self::UpdateParams(msg) => msg.validate_basic(),
            Self::DisableTokenizeShares(_)
            | Self::EnableTokenizeShares(_)
            | Self::WithdrawAllTokenizeShareRecordReward(_) => Ok(()),
        }
    }

    /// Account that signed the message
    pub fn signer(&self) -> &AccAddress {
        match self {
            Self::TokenizeShares(msg) => &msg.delegator_address,
            Self::RedeemTokensForShares(msg) => &msg.delegator_address,
            Self::TransferTokenizeShareRecord(msg) => &msg.sender,
            Self::DisableTokenizeShares(msg) => &msg.delegator_address,
            Self::EnableTokenizeShares(msg) => &msg.delegator_address,
            Self::WithdrawTokenizeShareRecordReward(msg) => &msg.owner_address,
            Self::WithdrawAllTokenizeShareRecordReward(msg) => &msg.owner_address,
            Self::UpdateParams(msg) => &msg.authority,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::TokenizeShares(_) => "tokenize_shares",
            Self::RedeemTokensForShares(_) => "redeem_tokens_for_shares",
            Self::TransferTokenizeShareRecord(_) => "transfer_tokenize_share_record",
            Self::DisableTokenizeShares(_) => "disable_tokenize_shares",
            Self::EnableTokenizeShares(_) => "enable_tokenize_shares",
            Self::WithdrawTokenizeShareRecordReward(_) => "withdraw_tokenize_share_record_reward",
            Self::WithdrawAllTokenizeShareRecordReward(_) => "withdraw_all_tokenize_share_record_reward",
            Self::UpdateParams(_) => "update_params",
        }
    }
}

/// Typed success payloads, one per [`LiquidMsg`] variant
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LiquidResponse {
    /// Share tokens minted
    TokenizeShares { amount: Coin },
    /// Bond-denom tokens re-delegated
    RedeemTokensForShares { amount: Coin },
    TransferTokenizeShareRecord,
    DisableTokenizeShares,
    EnableTokenizeShares { completion_time: DateTime<Utc> },
    WithdrawTokenizeShareRecordReward { amount: Coins },
    WithdrawAllTokenizeShareRecordReward { amount: Coins },
    UpdateParams,
}
