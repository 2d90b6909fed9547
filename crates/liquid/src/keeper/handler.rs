//! Message routing with per-message atomic commit

use lsm_store::Context;

use super::Keeper;
use crate::error::LiquidResult;
use crate::msgs::{LiquidMsg, LiquidResponse};

impl Keeper {
    /// Validate and execute one message
    ///
    /// The handler runs in a branch of `ctx`: either all of its writes and
    /// events are applied, or none are.
    pub fn deliver(&self, ctx: &mut Context<'_>, msg: &LiquidMsg) -> LiquidResult<LiquidResponse> {
        msg.validate_basic()?;

        let result = ctx.branch(|branch| self.handle(branch, msg));
        match &result {
            Ok(_) => tracing::debug!(msg = msg.name(), signer = %msg.signer(), "Message delivered"),
            Err(err) => tracing::warn!(
                msg = msg.name(),
                signer = %msg.signer(),
                kind = ?err.kind(),
                error = %err,
                "Message failed"
            ),
        }
        result
    }

    fn handle(&self, ctx: &mut Context<'_>, msg: &LiquidMsg) -> LiquidResult<LiquidResponse> {
        Ok(match msg {
            LiquidMsg::TokenizeShares(msg) => LiquidResponse::TokenizeShares {
                amount: self.tokenize_shares(ctx, msg)?,
            },
            LiquidMsg::RedeemTokensForShares(msg) => LiquidResponse::RedeemTokensForShares {
                amount: self.redeem_tokens_for_shares(ctx, msg)?,
            },
            LiquidMsg::TransferTokenizeShareRecord(msg) => {
                self.transfer_tokenize_share_record(ctx, msg)?;
                LiquidResponse::TransferTokenizeShareRecord
            }
            LiquidMsg::DisableTokenizeShares(msg) => {
                self.disable_tokenize_shares(ctx, msg)?;
                LiquidResponse::DisableTokenizeShares
            }
            LiquidMsg::EnableTokenizeShares(msg) => LiquidResponse::EnableTokenizeShares {
                completion_time: self.enable_tokenize_shares(ctx, msg)?,
            },
            LiquidMsg::WithdrawTokenizeShareRecordReward(msg) => {
                LiquidResponse::WithdrawTokenizeShareRecordReward {
                    amount: self.withdraw_tokenize_share_record_reward(ctx, &msg.owner_address, msg.record_id)?,
                }
            }
            LiquidMsg::WithdrawAllTokenizeShareRecordReward(msg) => {
                LiquidResponse::WithdrawAllTokenizeShareRecordReward {
                    amount: self.withdraw_all_tokenize_share_record_reward(ctx, &msg.owner_address)?,
                }
            }
            LiquidMsg::UpdateParams(msg) => {
                self.update_params(ctx, msg)?;
                LiquidResponse::UpdateParams
            }
        })
    }
}
