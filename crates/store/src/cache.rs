//! Write-back cache over a parent store
//!
//! Reads fall through to the parent unless the key was written in the cache.
//! Nothing reaches the parent until [`CacheStore::write`] is called; dropping
//! the cache discards its writes.

use crate::kv::{BatchOp, KvPair, KvStore};
use std::collections::BTreeMap;
use std::ops::Bound;

pub struct CacheStore<'a> {
    parent: &'a mut dyn KvStore,
    // None marks a deletion
    writes: BTreeMap<Vec<u8>, Option<Vec<u8>>>,
}

impl<'a> CacheStore<'a> {
    pub fn new(parent: &'a mut dyn KvStore) -> Self {
        Self {
            parent,
            writes: BTreeMap::new(),
        }
    }

    /// Number of pending writes (sets and deletes)
    pub fn pending(&self) -> usize {
        self.writes.len()
    }

    /// Flush pending writes to the parent in key order
    pub fn write(self) {
        let ops: Vec<BatchOp> = self
            .writes
            .into_iter()
            .map(|(key, value)| match value {
                Some(value) => BatchOp::Set { key, value },
                None => BatchOp::Delete { key },
            })
            .collect();
        tracing::trace!(ops = ops.len(), "Committing cache writes");
        self.parent.write_batch(ops);
    }
}

impl KvStore for CacheStore<'_> {
    fn get(&self, key: &[u8]) -> Option<Vec<u8>> {
        match self.writes.get(key) {
            Some(cached) => cached.clone(),
            None => self.parent.get(key),
        }
    }

    fn set(&mut self, key: &[u8], value: Vec<u8>) {
        self.writes.insert(key.to_vec(), Some(value));
    }

    fn delete(&mut self, key: &[u8]) {
        self.writes.insert(key.to_vec(), None);
    }

    fn range(&self, start: &[u8], end: Option<&[u8]>) -> Vec<KvPair> {
        if matches!(end, Some(end) if end <= start) {
            return Vec::new();
        }

        let mut merged: BTreeMap<Vec<u8>, Vec<u8>> =
            self.parent.range(start, end).into_iter().collect();

        let upper = match end {
            Some(end) => Bound::Excluded(end.to_vec()),
            None => Bound::Unbounded,
        };
        for (key, value) in self.writes.range((Bound::Included(start.to_vec()), upper)) {
            match value {
                Some(value) => {
                    merged.insert(key.clone(), value.clone());
                }
                None => {
                    merged.remove(key);
                }
            }
        }

        merged.into_iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemStore;

    #[test]
    fn test_reads_fall_through() {
        let mut parent = MemStore::new();
        parent.set(b"a", b"1".to_vec());

        let cache = CacheStore::new(&mut parent);
        assert_eq!(cache.get(b"a"), Some(b"1".to_vec()));
    }

    #[test]
    fn test_write_commits() {
        let mut parent = MemStore::new();
        parent.set(b"gone", b"x".to_vec());

        let mut cache = CacheStore::new(&mut parent);
        cache.set(b"new", b"2".to_vec());
        cache.delete(b"gone");
        assert!(cache.get(b"gone").is_none());
        cache.write();

        assert_eq!(parent.get(b"new"), Some(b"2".to_vec()));
        assert!(parent.get(b"gone").is_none());
    }

    #[test]
    fn test_drop_discards() {
        let mut parent = MemStore::new();
        {
            let mut cache = CacheStore::new(&mut parent);
            cache.set(b"k", b"v".to_vec());
            assert_eq!(cache.pending(), 1);
        }
        assert!(parent.is_empty());
    }

    #[test]
    fn test_range_merges_overlay() {
        let mut parent = MemStore::new();
        parent.set(&[1, 1], b"a".to_vec());
        parent.set(&[1, 2], b"b".to_vec());
        parent.set(&[1, 3], b"c".to_vec());

        let mut cache = CacheStore::new(&mut parent);
        cache.delete(&[1, 2]);
        cache.set(&[1, 4], b"d".to_vec());
        cache.set(&[1, 1], b"A".to_vec());

        let values: Vec<_> = cache.scan_prefix(&[1]).into_iter().map(|(_, v)| v).collect();
        assert_eq!(values, vec![b"A".to_vec(), b"c".to_vec(), b"d".to_vec()]);
    }

    #[test]
    fn test_nested_cache() {
        let mut parent = MemStore::new();
        {
            let mut outer = CacheStore::new(&mut parent);
            {
                let mut inner = CacheStore::new(&mut outer);
                inner.set(b"k", b"inner".to_vec());
                inner.write();
            }
            assert_eq!(outer.get(b"k"), Some(b"inner".to_vec()));
        }
        // outer dropped without write
        assert!(parent.get(b"k").is_none());
    }
}
