//! Tokenize share records

use lsm_core::{AccAddress, ValAddress};
use serde::{Deserialize, Serialize};

/// Custody record behind one share-token denomination
///
/// The delegation backing the share tokens is owned by a module account
/// derived from `module_account`; `owner` receives its rewards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenizeShareRecord {
    pub id: u64,
    pub owner: AccAddress,
    pub module_account: String,
    pub validator: ValAddress,
}

impl TokenizeShareRecord {
    /// Build a record whose custodial account is `{prefix}{id}`
    pub fn new(id: u64, owner: AccAddress, validator: ValAddress, module_account_prefix: &str) -> Self {
        Self {
            id,
            owner,
            module_account: format!("{module_account_prefix}{id}"),
            validator,
        }
    }

    /// Address of the custodial account holding the delegation
    pub fn module_address(&self) -> AccAddress {
        AccAddress::module(&self.module_account)
    }

    /// `{validator}/{id}`
    pub fn share_token_denom(&self) -> String {
        format!("{}/{}", self.validator, self.id)
    }
}
