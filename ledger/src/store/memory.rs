//! In-memory state store.
//!
//! A `BTreeMap` behind a `parking_lot::RwLock`, giving the same ordered
//! keyspace semantics as the sled backend with zero filesystem footprint.
//! Used throughout the test suites, where [`MemoryStore::snapshot`] makes
//! whole-world before/after comparisons a one-liner.

use std::collections::BTreeMap;

use parking_lot::RwLock;

use super::{KvPair, StateStore, WriteBatch, WriteOp};
use crate::error::Result;

/// Volatile, ordered key-value store.
#[derive(Debug, Default)]
pub struct MemoryStore {
    data: RwLock<BTreeMap<Vec<u8>, Vec<u8>>>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of the entire world state, for before/after assertions.
    pub fn snapshot(&self) -> BTreeMap<Vec<u8>, Vec<u8>> {
        self.data.read().clone()
    }

    /// Number of entries currently stored.
    pub fn len(&self) -> usize {
        self.data.read().len()
    }

    /// `true` if the store holds no entries.
    pub fn is_empty(&self) -> bool {
        self.data.read().is_empty()
    }
}

impl StateStore for MemoryStore {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>> {
        Ok(self.data.read().get(key).cloned())
    }

    fn put(&self, key: &[u8], value: &[u8]) -> Result<()> {
        self.data.write().insert(key.to_vec(), value.to_vec());
        Ok(())
    }

    fn delete(&self, key: &[u8]) -> Result<()> {
        self.data.write().remove(key);
        Ok(())
    }

    fn scan_prefix<'a>(
        &'a self,
        prefix: &[u8],
    ) -> Box<dyn Iterator<Item = Result<KvPair>> + 'a> {
        // Materialize the matching range under the read lock; the returned
        // iterator is then independent of later writes, which keeps scans
        // restartable and lock-free for the caller.
        let matches: Vec<KvPair> = self
            .data
            .read()
            .range(prefix.to_vec()..)
            .take_while(|(k, _)| k.starts_with(prefix))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();

        Box::new(matches.into_iter().map(Ok))
    }

    fn apply(&self, batch: WriteBatch) -> Result<()> {
        // One write lock for the whole batch: readers observe either the
        // pre-batch or post-batch world, never an intermediate one.
        let mut data = self.data.write();
        for op in batch.into_ops() {
            match op {
                WriteOp::Put { key, value } => {
                    data.insert(key, value);
                }
                WriteOp::Delete { key } => {
                    data.remove(&key);
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn get_put_delete_roundtrip() {
        let store = MemoryStore::new();
        assert!(store.get(b"k").unwrap().is_none());

        store.put(b"k", b"v").unwrap();
        assert_eq!(store.get(b"k").unwrap(), Some(b"v".to_vec()));

        store.delete(b"k").unwrap();
        assert!(store.get(b"k").unwrap().is_none());
    }

    #[test]
    fn delete_absent_key_is_noop() {
        let store = MemoryStore::new();
        store.delete(b"missing").unwrap();
        assert!(store.is_empty());
    }

    #[test]
    fn scan_prefix_is_ordered_and_exact() {
        let store = MemoryStore::new();
        store.put(b"a:2", b"2").unwrap();
        store.put(b"a:1", b"1").unwrap();
        store.put(b"ab:9", b"x").unwrap();
        store.put(b"b:1", b"y").unwrap();

        let keys: Vec<Vec<u8>> = store
            .scan_prefix(b"a:")
            .map(|r| r.unwrap().0)
            .collect();
        assert_eq!(keys, vec![b"a:1".to_vec(), b"a:2".to_vec()]);
    }

    #[test]
    fn scan_is_restartable() {
        let store = MemoryStore::new();
        store.put(b"p:1", b"1").unwrap();

        let first: Vec<_> = store.scan_prefix(b"p:").collect();
        let second: Vec<_> = store.scan_prefix(b"p:").collect();
        assert_eq!(first.len(), second.len());
    }

    #[test]
    fn apply_batch_all_or_nothing_ordering() {
        let store = MemoryStore::new();
        store.put(b"k", b"old").unwrap();

        let mut batch = WriteBatch::new();
        batch.delete(b"k");
        batch.put(b"k", b"new");
        batch.put(b"other", b"1");
        store.apply(batch).unwrap();

        assert_eq!(store.get(b"k").unwrap(), Some(b"new".to_vec()));
        assert_eq!(store.get(b"other").unwrap(), Some(b"1".to_vec()));
    }

    #[test]
    fn snapshot_captures_full_world() {
        let store = MemoryStore::new();
        store.put(b"a", b"1").unwrap();
        let before = store.snapshot();

        store.put(b"b", b"2").unwrap();
        let after = store.snapshot();

        assert_eq!(before.len(), 1);
        assert_eq!(after.len(), 2);
    }
}
