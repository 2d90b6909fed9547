//! LSM Core - Domain types
//!
//! This crate contains the fundamental types used across the liquid staking crates:
//! - `AccAddress` / `ValAddress`: Validated account and validator identifiers
//! - `Coin` / `Coins` / `DecCoins`: Denominated integer and decimal balances
//! - `Dec`: 18-place fixed-point shares and share ↔ token conversion

pub mod address;
pub mod coin;
pub mod dec;

pub use address::{AccAddress, AddressError, ValAddress};
pub use coin::{Coin, CoinError, Coins, DecCoins};
pub use dec::{Dec, MathError};
