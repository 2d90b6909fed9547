//! Well-known module accounts

use lsm_core::AccAddress;

pub const BONDED_POOL_NAME: &str = "bonded_tokens_pool";
pub const NOT_BONDED_POOL_NAME: &str = "not_bonded_tokens_pool";
pub const MINT_MODULE_NAME: &str = "mint";
pub const DISTRIBUTION_MODULE_NAME: &str = "distribution";
pub const GOV_MODULE_NAME: &str = "gov";

/// Address of a module account by name
pub fn module_address(name: &str) -> AccAddress {
    AccAddress::module(name)
}
