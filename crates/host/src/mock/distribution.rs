use lsm_core::{AccAddress, Coins, DecCoins, ValAddress};
use lsm_store::{Context, KvStoreExt};

use super::{keys, MockHost};
use crate::error::HostResult;
use crate::traits::{AccountKeeper, DistributionKeeper, StakingKeeper};
use crate::types::AccountKind;
use crate::vesting::VestingAccount;

impl DistributionKeeper for MockHost {
    fn withdraw_delegation_rewards(
        &self,
        ctx: &mut Context<'_>,
        delegator: &AccAddress,
        validator: &ValAddress,
    ) -> HostResult<Coins> {
        self.validator(ctx, validator)?;
        self.delegation(ctx, delegator, validator)?;
        self.settle_rewards(ctx, delegator, validator)
    }

    fn delegation_rewards(
        &self,
        ctx: &Context<'_>,
        delegator: &AccAddress,
        validator: &ValAddress,
    ) -> HostResult<DecCoins> {
        self.validator(ctx, validator)?;
        self.delegation(ctx, delegator, validator)?;
        let accrued = ctx
            .store()
            .get_json::<Coins>(&keys::rewards_key(delegator, validator))?
            .unwrap_or_default();
        Ok(DecCoins::from(&accrued))
    }
}

impl AccountKeeper for MockHost {
    fn vesting_account(
        &self,
        ctx: &Context<'_>,
        address: &AccAddress,
    ) -> HostResult<Option<VestingAccount>> {
        Ok(ctx.store().get_json::<VestingAccount>(&keys::vesting_key(address))?)
    }

    fn account_kind(&self, ctx: &Context<'_>, address: &AccAddress) -> HostResult<AccountKind> {
        if ctx.store().has(&keys::liquid_provider_key(address)) {
            Ok(AccountKind::LiquidStakingProvider)
        } else {
            Ok(AccountKind::Ordinary)
        }
    }
}
