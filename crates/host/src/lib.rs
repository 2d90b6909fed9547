//! LSM Host - Ledger collaborator interfaces
//!
//! The liquid staking module never touches validators, delegations or balances
//! directly. It goes through the keeper traits defined here, which a host
//! ledger implements:
//! - `StakingKeeper`: validators, delegations, bond/unbond
//! - `BankKeeper`: balances, module accounts, mint/burn
//! - `DistributionKeeper`: delegation rewards
//! - `AccountKeeper`: vesting state and account classification
//! - `StakingHooks`: lifecycle callbacks the module implements
//!
//! `mock::MockHost` is a complete store-backed implementation used in tests.

pub mod error;
pub mod mock;
pub mod pools;
pub mod traits;
pub mod types;
pub mod vesting;

pub use error::{HostError, HostResult};
pub use mock::MockHost;
pub use traits::{AccountKeeper, BankKeeper, DistributionKeeper, StakingHooks, StakingKeeper};
pub use types::{AccountKind, BondStatus, Delegation, Redelegation, Validator};
pub use vesting::{VestingAccount, VestingSchedule};
