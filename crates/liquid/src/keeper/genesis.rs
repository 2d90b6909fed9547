//! Genesis import and export

use lsm_store::Context;

use super::Keeper;
use crate::error::LiquidResult;
use crate::genesis::GenesisState;

impl Keeper {
    pub fn init_genesis(&self, ctx: &mut Context<'_>, genesis: &GenesisState) -> LiquidResult<()> {
        genesis.validate()?;

        self.set_params(ctx, &genesis.params)?;
        for record in &genesis.tokenize_share_records {
            self.add_tokenize_share_record(ctx, record)?;
        }
        self.set_last_tokenize_share_record_id(ctx, genesis.last_tokenize_share_record_id)?;
        self.set_total_liquid_staked_tokens(ctx, genesis.total_liquid_staked_tokens)?;
        self.set_tokenize_share_locks(ctx, &genesis.tokenize_share_locks)?;
        for validator in &genesis.liquid_validators {
            self.set_liquid_validator(ctx, validator)?;
        }

        tracing::info!(
            records = genesis.tokenize_share_records.len(),
            locks = genesis.tokenize_share_locks.len(),
            validators = genesis.liquid_validators.len(),
            "Liquid genesis imported"
        );
        Ok(())
    }

    pub fn export_genesis(&self, ctx: &Context<'_>) -> LiquidResult<GenesisState> {
        Ok(GenesisState {
            params: self.params(ctx)?,
            tokenize_share_records: self.all_tokenize_share_records(ctx)?,
            last_tokenize_share_record_id: self.last_tokenize_share_record_id(ctx)?,
            total_liquid_staked_tokens: self.total_liquid_staked_tokens(ctx)?,
            tokenize_share_locks: self.all_tokenize_shares_locks(ctx)?,
            liquid_validators: self.all_liquid_validators(ctx)?,
        })
    }
}
