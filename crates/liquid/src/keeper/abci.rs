//! Per-block processing

use lsm_core::AccAddress;
use lsm_store::Context;

use super::Keeper;
use crate::error::LiquidResult;

impl Keeper {
    /// Clear tokenize share locks whose unlock time has been reached
    pub fn begin_blocker(&self, ctx: &mut Context<'_>) -> LiquidResult<Vec<AccAddress>> {
        let block_time = ctx.block_time();
        let unlocked = self.remove_expired_tokenize_share_locks(ctx, block_time)?;
        if !unlocked.is_empty() {
            tracing::debug!(height = ctx.block_height(), count = unlocked.len(), "Expired tokenize share locks removed");
        }
        Ok(unlocked)
    }
}
