//! LSM Liquid - Liquid staking module
//!
//! Converts native delegations into transferable share tokens and back while
//! keeping the global and per-validator liquid staking caps.
//!
//! Key types:
//! - `Keeper`: module state and every operation (tokenize, redeem, locks,
//!   rewards, hooks, queries, genesis)
//! - `LiquidMsg`: request router with per-message atomic commit
//! - `TokenizeShareRecord`: custody record behind one share-token denom
//! - `Params`: governance-controlled liquid staking caps
//! - `LiquidConfig`: authority and module account naming

pub mod config;
pub mod error;
pub mod events;
pub mod genesis;
pub mod keeper;
pub mod keys;
pub mod lock;
pub mod msgs;
pub mod params;
pub mod record;
pub mod validator;

pub use config::LiquidConfig;
pub use error::{ErrorKind, LiquidError, LiquidResult};
pub use genesis::GenesisState;
pub use keeper::query::{LockInfo, Page, PageRequest, TokenizeShareRecordReward, TotalRewards};
pub use keeper::{check_vested_delegation_in_vesting_account, Keeper};
pub use lock::{PendingTokenizeShareAuthorizations, TokenizeShareLock, TokenizeShareLockStatus};
pub use msgs::{LiquidMsg, LiquidResponse};
pub use params::Params;
pub use record::TokenizeShareRecord;
pub use validator::LiquidValidator;
