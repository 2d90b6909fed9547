//! Store errors

use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid time key: {0}")]
    InvalidTimeKey(String),

    #[error("Malformed key: {0}")]
    MalformedKey(String),
}

pub type StoreResult<T> = Result<T, StoreError>;
