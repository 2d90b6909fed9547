//! Tokenize share record storage with owner and denom indexes

use lsm_core::AccAddress;
use lsm_store::{Context, KvStoreExt};

use super::Keeper;
use crate::error::{LiquidError, LiquidResult};
use crate::keys;
use crate::record::TokenizeShareRecord;

impl Keeper {
    pub fn last_tokenize_share_record_id(&self, ctx: &Context<'_>) -> LiquidResult<u64> {
        Ok(ctx
            .store()
            .get_json::<u64>(&keys::last_tokenize_share_record_id_key())?
            .unwrap_or(0))
    }

    pub(crate) fn set_last_tokenize_share_record_id(&self, ctx: &mut Context<'_>, id: u64) -> LiquidResult<()> {
        ctx.store_mut()
            .set_json(&keys::last_tokenize_share_record_id_key(), &id)?;
        Ok(())
    }

    pub fn tokenize_share_record(&self, ctx: &Context<'_>, id: u64) -> LiquidResult<TokenizeShareRecord> {
        ctx.store()
            .get_json(&keys::tokenize_share_record_key(id))?
            .ok_or_else(|| LiquidError::TokenizeShareRecordNotExists(format!("record id {id}")))
    }

    pub fn has_tokenize_share_record(&self, ctx: &Context<'_>, id: u64) -> bool {
        ctx.store().has(&keys::tokenize_share_record_key(id))
    }

    /// Records owned by `owner`, in id order
    pub fn tokenize_share_records_by_owner(
        &self,
        ctx: &Context<'_>,
        owner: &AccAddress,
    ) -> LiquidResult<Vec<TokenizeShareRecord>> {
        let ids: Vec<u64> = ctx
            .store()
            .scan_prefix(&keys::tokenize_share_record_ids_by_owner_prefix(owner))
            .into_iter()
            .filter_map(|(key, _)| keys::id_from_owner_index_key(&key))
            .collect();

        ids.into_iter()
            .map(|id| self.tokenize_share_record(ctx, id))
            .collect()
    }

    pub fn tokenize_share_record_by_denom(
        &self,
        ctx: &Context<'_>,
        denom: &str,
    ) -> LiquidResult<TokenizeShareRecord> {
        let id = ctx
            .store()
            .get_json::<u64>(&keys::tokenize_share_record_id_by_denom_key(denom))?
            .ok_or_else(|| LiquidError::TokenizeShareRecordNotExists(format!("denom {denom}")))?;
        self.tokenize_share_record(ctx, id)
    }

    pub fn all_tokenize_share_records(&self, ctx: &Context<'_>) -> LiquidResult<Vec<TokenizeShareRecord>> {
        ctx.store()
            .scan_prefix(&[keys::TOKENIZE_SHARE_RECORD_PREFIX])
            .into_iter()
            .map(|(_, value)| Ok(serde_json::from_slice(&value)?))
            .collect()
    }

    /// Store a new record and both of its indexes
    pub(crate) fn add_tokenize_share_record(
        &self,
        ctx: &mut Context<'_>,
        record: &TokenizeShareRecord,
    ) -> LiquidResult<()> {
        if self.has_tokenize_share_record(ctx, record.id) {
            return Err(LiquidError::TokenizeShareRecordAlreadyExists(record.id));
        }

        self.set_tokenize_share_record(ctx, record)?;
        self.set_tokenize_share_record_with_owner(ctx, &record.owner, record.id);
        ctx.store_mut().set_json(
            &keys::tokenize_share_record_id_by_denom_key(&record.share_token_denom()),
            &record.id,
        )?;
        Ok(())
    }

    pub(crate) fn delete_tokenize_share_record(&self, ctx: &mut Context<'_>, id: u64) -> LiquidResult<()> {
        let record = self.tokenize_share_record(ctx, id)?;
        let store = ctx.store_mut();
        store.delete(&keys::tokenize_share_record_key(id));
        store.delete(&keys::tokenize_share_record_id_by_owner_key(&record.owner, id));
        store.delete(&keys::tokenize_share_record_id_by_denom_key(&record.share_token_denom()));
        Ok(())
    }

    pub(crate) fn set_tokenize_share_record(
        &self,
        ctx: &mut Context<'_>,
        record: &TokenizeShareRecord,
    ) -> LiquidResult<()> {
        ctx.store_mut()
            .set_json(&keys::tokenize_share_record_key(record.id), record)?;
        Ok(())
    }

    pub(crate) fn set_tokenize_share_record_with_owner(&self, ctx: &mut Context<'_>, owner: &AccAddress, id: u64) {
        ctx.store_mut()
            .set(&keys::tokenize_share_record_id_by_owner_key(owner, id), vec![1]);
    }

    pub(crate) fn delete_tokenize_share_record_with_owner(&self, ctx: &mut Context<'_>, owner: &AccAddress, id: u64) {
        ctx.store_mut()
            .delete(&keys::tokenize_share_record_id_by_owner_key(owner, id));
    }
}
