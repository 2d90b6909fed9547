//! Ordered key-value store abstraction

/// A raw key/value pair returned by range iteration
pub type KvPair = (Vec<u8>, Vec<u8>);

/// Batch operations applied in order
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BatchOp {
    /// Insert or overwrite a key-value pair.
    Set { key: Vec<u8>, value: Vec<u8> },
    /// Remove a key.
    Delete { key: Vec<u8> },
}

/// Ordered byte-keyed store
///
/// Iteration is always in ascending lexicographic key order.
pub trait KvStore {
    /// Retrieve a value by key.
    fn get(&self, key: &[u8]) -> Option<Vec<u8>>;

    /// Store a key-value pair.
    fn set(&mut self, key: &[u8], value: Vec<u8>);

    /// Delete a key. Deleting a missing key is a no-op.
    fn delete(&mut self, key: &[u8]);

    /// All pairs with `start <= key < end`; `end = None` is unbounded.
    fn range(&self, start: &[u8], end: Option<&[u8]>) -> Vec<KvPair>;

    /// Check if key exists.
    fn has(&self, key: &[u8]) -> bool {
        self.get(key).is_some()
    }

    /// Iterate over keys with prefix.
    fn scan_prefix(&self, prefix: &[u8]) -> Vec<KvPair> {
        let end = prefix_end(prefix);
        self.range(prefix, end.as_deref())
    }

    /// Apply a batch of writes in order.
    fn write_batch(&mut self, ops: Vec<BatchOp>) {
        for op in ops {
            match op {
                BatchOp::Set { key, value } => self.set(&key, value),
                BatchOp::Delete { key } => self.delete(&key),
            }
        }
    }
}

/// Smallest key greater than every key starting with `prefix`
///
/// Returns `None` when no such key exists (empty or all-`0xFF` prefix).
pub fn prefix_end(prefix: &[u8]) -> Option<Vec<u8>> {
    let mut end = prefix.to_vec();
    while let Some(last) = end.pop() {
        if last < u8::MAX {
            end.push(last + 1);
            return Some(end);
        }
    }
    None
}

/// Exclusive range end that still includes `key` itself
pub fn inclusive_end(key: &[u8]) -> Vec<u8> {
    let mut end = key.to_vec();
    end.push(0x00);
    end
}
