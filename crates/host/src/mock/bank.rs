use lsm_core::{AccAddress, Coin, Coins};
use lsm_store::Context;

use super::{keys, MockHost};
use crate::error::{HostError, HostResult};
use crate::pools::module_address;
use crate::traits::{AccountKeeper, BankKeeper};

impl MockHost {
    fn ensure_spendable(&self, ctx: &Context<'_>, address: &AccAddress, amount: &Coins) -> HostResult<()> {
        let spendable = self.spendable_coins(ctx, address)?;
        spendable
            .checked_sub(amount)
            .map(|_| ())
            .map_err(|source| HostError::InsufficientFunds {
                address: address.to_string(),
                source,
            })
    }

    fn ensure_not_blocked(&self, ctx: &Context<'_>, address: &AccAddress) -> HostResult<()> {
        if self.blocked_addr(ctx, address)? {
            return Err(HostError::BlockedAddress(address.to_string()));
        }
        Ok(())
    }
}

impl BankKeeper for MockHost {
    fn balance(&self, ctx: &Context<'_>, address: &AccAddress, denom: &str) -> HostResult<Coin> {
        let amount = self.read_balance(ctx, address, denom)?;
        Ok(Coin::new(denom, amount)?)
    }

    fn all_balances(&self, ctx: &Context<'_>, address: &AccAddress) -> HostResult<Coins> {
        self.read_all_balances(ctx, address)
    }

    fn spendable_coins(&self, ctx: &Context<'_>, address: &AccAddress) -> HostResult<Coins> {
        let balances = self.read_all_balances(ctx, address)?;
        let Some(account) = self.vesting_account(ctx, address)? else {
            return Ok(balances);
        };

        let locked = account.locked_coins(ctx.block_time())?;
        let mut spendable = Coins::new();
        for coin in balances.iter() {
            let free = coin.amount.saturating_sub(locked.amount_of(&coin.denom));
            spendable.add_coin(&Coin::new(coin.denom, free)?)?;
        }
        Ok(spendable)
    }

    fn send_coins(
        &self,
        ctx: &mut Context<'_>,
        from: &AccAddress,
        to: &AccAddress,
        amount: &Coins,
    ) -> HostResult<()> {
        self.ensure_spendable(ctx, from, amount)?;
        self.move_coins(ctx, from, to, amount)
    }

    fn send_coins_from_module_to_module(
        &self,
        ctx: &mut Context<'_>,
        from_module: &str,
        to_module: &str,
        amount: &Coins,
    ) -> HostResult<()> {
        self.move_coins(ctx, &module_address(from_module), &module_address(to_module), amount)
    }

    fn send_coins_from_module_to_account(
        &self,
        ctx: &mut Context<'_>,
        from_module: &str,
        to: &AccAddress,
        amount: &Coins,
    ) -> HostResult<()> {
        self.ensure_not_blocked(ctx, to)?;
        self.move_coins(ctx, &module_address(from_module), to, amount)
    }

    fn send_coins_from_account_to_module(
        &self,
        ctx: &mut Context<'_>,
        from: &AccAddress,
        to_module: &str,
        amount: &Coins,
    ) -> HostResult<()> {
        self.ensure_spendable(ctx, from, amount)?;
        self.move_coins(ctx, from, &module_address(to_module), amount)
    }

    fn undelegate_coins_from_module_to_account(
        &self,
        ctx: &mut Context<'_>,
        from_module: &str,
        to: &AccAddress,
        amount: &Coins,
    ) -> HostResult<()> {
        self.move_coins(ctx, &module_address(from_module), to, amount)?;
        if let Some(mut account) = self.vesting_account(ctx, to)? {
            account.track_undelegation(amount)?;
            self.set_vesting_account(ctx, &account)?;
        }
        Ok(())
    }

    fn mint_coins(&self, ctx: &mut Context<'_>, module: &str, amount: &Coins) -> HostResult<()> {
        self.mint_coins_internal(ctx, module, amount)
    }

    fn burn_coins(&self, ctx: &mut Context<'_>, module: &str, amount: &Coins) -> HostResult<()> {
        self.burn_coins_internal(ctx, module, amount)
    }

    fn blocked_addr(&self, ctx: &Context<'_>, address: &AccAddress) -> HostResult<bool> {
        Ok(ctx.store().has(&keys::blocked_key(address)))
    }
}
