//! Value and key encoding helpers

use crate::error::{StoreError, StoreResult};
use crate::kv::KvStore;
use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Fixed-width, lexicographically sortable UTC timestamp layout for keys
pub const TIME_KEY_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.9f";

/// JSON value access on top of any [`KvStore`]
pub trait KvStoreExt: KvStore {
    fn get_json<T: DeserializeOwned>(&self, key: &[u8]) -> StoreResult<Option<T>> {
        match self.get(key) {
            Some(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            None => Ok(None),
        }
    }

    fn set_json<T: Serialize>(&mut self, key: &[u8], value: &T) -> StoreResult<()> {
        let bytes = serde_json::to_vec(value)?;
        self.set(key, bytes);
        Ok(())
    }
}

impl<S: KvStore + ?Sized> KvStoreExt for S {}

/// Encode a timestamp so byte order equals time order
pub fn encode_time(time: &DateTime<Utc>) -> Vec<u8> {
    time.format(TIME_KEY_FORMAT).to_string().into_bytes()
}

/// Inverse of [`encode_time`]
pub fn decode_time(bytes: &[u8]) -> StoreResult<DateTime<Utc>> {
    let text = std::str::from_utf8(bytes)
        .map_err(|_| StoreError::InvalidTimeKey(format!("{bytes:?}")))?;
    let naive = NaiveDateTime::parse_from_str(text, TIME_KEY_FORMAT)
        .map_err(|e| StoreError::InvalidTimeKey(format!("{text}: {e}")))?;
    Ok(Utc.from_utc_datetime(&naive))
}

/// Single-byte length prefix followed by the bytes themselves
///
/// Inputs longer than 255 bytes are truncated in the prefix; addresses are
/// validated to fit before they reach here.
pub fn length_prefixed(bytes: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(bytes.len() + 1);
    out.push(bytes.len().min(u8::MAX as usize) as u8);
    out.extend_from_slice(bytes);
    out
}
