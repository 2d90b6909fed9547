//! Event types and attribute keys

pub const EVENT_TYPE_TOKENIZE_SHARES: &str = "tokenize_shares";
pub const EVENT_TYPE_REDEEM_SHARES: &str = "redeem_shares";
pub const EVENT_TYPE_TRANSFER_TOKENIZE_SHARE_RECORD: &str = "transfer_tokenize_share_record";
pub const EVENT_TYPE_WITHDRAW_TOKENIZE_SHARE_REWARD: &str = "withdraw_tokenize_share_reward";

pub const ATTRIBUTE_KEY_DELEGATOR: &str = "delegator";
pub const ATTRIBUTE_KEY_VALIDATOR: &str = "validator";
pub const ATTRIBUTE_KEY_SHARE_OWNER: &str = "share_owner";
pub const ATTRIBUTE_KEY_SHARE_RECORD_ID: &str = "share_record_id";
pub const ATTRIBUTE_KEY_AMOUNT: &str = "amount";
pub const ATTRIBUTE_KEY_TOKENIZED_SHARES: &str = "tokenized_shares";
pub const ATTRIBUTE_KEY_WITHDRAW_ADDRESS: &str = "withdraw_address";
pub const ATTRIBUTE_KEY_SENDER: &str = "sender";
