//! LSM Store - Transactional key-value state
//!
//! Module state lives in an ordered byte-keyed store. Every state transition
//! runs against a [`Context`], which can be branched into a write-back cache:
//! the branch is committed to its parent only if the closure succeeds.
//!
//! Key types:
//! - `KvStore`: ordered key-value trait with range iteration
//! - `MemStore`: in-memory `BTreeMap` store
//! - `CacheStore`: write overlay committed with `write()`, discarded on drop
//! - `Context`: block header + event manager + store

pub mod cache;
pub mod codec;
pub mod context;
pub mod error;
pub mod event;
pub mod kv;
pub mod memory;

pub use cache::CacheStore;
pub use codec::{decode_time, encode_time, length_prefixed, KvStoreExt, TIME_KEY_FORMAT};
pub use context::{BlockHeader, Context};
pub use error::{StoreError, StoreResult};
pub use event::{Event, EventManager};
pub use kv::{inclusive_end, prefix_end, BatchOp, KvPair, KvStore};
pub use memory::MemStore;
