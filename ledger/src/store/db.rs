//! Sled-backed state store.
//!
//! One named sled tree (`world`) holds the entire world state: primary
//! records, index entries, everything. sled already gives us the ordered
//! keyspace, lazy prefix scans, and an atomic `Batch` primitive, so this
//! type is a thin adapter from the [`StateStore`] contract onto those.
//!
//! # Thread Safety
//!
//! sled trees support lock-free concurrent reads and serialized writes, so
//! `SledStore` can be shared across threads via `Arc` without external
//! synchronization.

use std::path::Path;

use sled::{Batch, Db, Tree};

use super::{KvPair, StateStore, WriteBatch, WriteOp};
use crate::error::Result;

/// Name of the single tree holding the world state.
const WORLD_TREE: &str = "world";

/// Durable, ordered key-value store.
#[derive(Debug, Clone)]
pub struct SledStore {
    /// The underlying sled database handle.
    db: Db,
    /// The world-state tree.
    world: Tree,
}

impl SledStore {
    /// Open or create a database at the given filesystem path.
    ///
    /// If the directory doesn't exist, sled creates it. If the database
    /// already exists, all existing data is available immediately.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let db = sled::open(path)?;
        Self::from_db(db)
    }

    /// Create a temporary database that is cleaned up automatically when
    /// the store is dropped.
    ///
    /// Ideal for tests — no filesystem side effects, no cleanup needed.
    pub fn open_temporary() -> Result<Self> {
        let config = sled::Config::new().temporary(true);
        let db = config.open()?;
        Self::from_db(db)
    }

    fn from_db(db: Db) -> Result<Self> {
        let world = db.open_tree(WORLD_TREE)?;
        Ok(Self { db, world })
    }

    /// Block until all pending writes are durable on disk.
    pub fn flush(&self) -> Result<()> {
        self.db.flush()?;
        Ok(())
    }

    /// Number of entries in the world state.
    pub fn len(&self) -> usize {
        self.world.len()
    }

    /// `true` if the world state holds no entries.
    pub fn is_empty(&self) -> bool {
        self.world.is_empty()
    }
}

impl StateStore for SledStore {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>> {
        Ok(self.world.get(key)?.map(|ivec| ivec.to_vec()))
    }

    fn put(&self, key: &[u8], value: &[u8]) -> Result<()> {
        self.world.insert(key, value)?;
        Ok(())
    }

    fn delete(&self, key: &[u8]) -> Result<()> {
        self.world.remove(key)?;
        Ok(())
    }

    fn scan_prefix<'a>(
        &'a self,
        prefix: &[u8],
    ) -> Box<dyn Iterator<Item = Result<KvPair>> + 'a> {
        Box::new(self.world.scan_prefix(prefix).map(|entry| {
            let (key, value) = entry?;
            Ok((key.to_vec(), value.to_vec()))
        }))
    }

    fn apply(&self, batch: WriteBatch) -> Result<()> {
        let mut sled_batch = Batch::default();
        for op in batch.into_ops() {
            match op {
                WriteOp::Put { key, value } => sled_batch.insert(key, value),
                WriteOp::Delete { key } => sled_batch.remove(key),
            }
        }
        self.world.apply_batch(sled_batch)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn open_temporary_store() {
        let store = SledStore::open_temporary().expect("should create temp store");
        assert!(store.is_empty());
    }

    #[test]
    fn open_persistent_store_survives_reopen() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = SledStore::open(dir.path()).expect("should open store");
        store.put(b"k", b"v").unwrap();
        store.flush().unwrap();
        drop(store);

        let reopened = SledStore::open(dir.path()).expect("should reopen store");
        assert_eq!(reopened.get(b"k").unwrap(), Some(b"v".to_vec()));
    }

    #[test]
    fn get_put_delete_roundtrip() {
        let store = SledStore::open_temporary().unwrap();
        assert!(store.get(b"k").unwrap().is_none());

        store.put(b"k", b"v").unwrap();
        assert_eq!(store.get(b"k").unwrap(), Some(b"v".to_vec()));

        store.delete(b"k").unwrap();
        assert!(store.get(b"k").unwrap().is_none());
    }

    #[test]
    fn scan_prefix_matches_memory_semantics() {
        let store = SledStore::open_temporary().unwrap();
        store.put(b"a:2", b"2").unwrap();
        store.put(b"a:1", b"1").unwrap();
        store.put(b"ab:9", b"x").unwrap();

        let keys: Vec<Vec<u8>> = store
            .scan_prefix(b"a:")
            .map(|r| r.unwrap().0)
            .collect();
        assert_eq!(keys, vec![b"a:1".to_vec(), b"a:2".to_vec()]);
    }

    #[test]
    fn apply_batch_lands_atomically() {
        let store = SledStore::open_temporary().unwrap();
        store.put(b"k", b"old").unwrap();

        let mut batch = WriteBatch::new();
        batch.delete(b"k");
        batch.put(b"k", b"new");
        batch.put(b"j", b"1");
        store.apply(batch).unwrap();

        assert_eq!(store.get(b"k").unwrap(), Some(b"new".to_vec()));
        assert_eq!(store.get(b"j").unwrap(), Some(b"1".to_vec()));
        assert_eq!(store.len(), 2);
    }
}
