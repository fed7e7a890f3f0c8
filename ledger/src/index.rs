//! # Composite Index Manager
//!
//! A composite index is a derived set of world-state entries whose keys
//! encode a tuple of record fields and whose values are a single sentinel
//! byte — existence is membership, the value carries nothing. Because the
//! keys are ordered, "every entry with these leading fields" is one prefix
//! scan, answered without loading a single primary record.
//!
//! The index is denormalized: primary records stay authoritative, and any
//! mutation that changes an indexed field must remove the stale entry and
//! insert the fresh one inside the same applied batch. The staged variants
//! ([`CompositeIndex::stage_insert`] / [`CompositeIndex::stage_remove`])
//! exist precisely so that swap rides in the record's own [`WriteBatch`].

use crate::error::{LedgerError, Result};
use crate::key;
use crate::store::{StateStore, WriteBatch};

/// Sentinel value stored under every index key.
pub const SENTINEL: [u8; 1] = [0x00];

/// Manager for one composite index: an object type plus a fixed field count.
#[derive(Debug, Clone)]
pub struct CompositeIndex {
    object_type: String,
    arity: usize,
}

impl CompositeIndex {
    /// Define an index with the given object type and number of fields.
    pub fn new(object_type: impl Into<String>, arity: usize) -> Self {
        Self {
            object_type: object_type.into(),
            arity,
        }
    }

    /// The object type naming this index in the keyspace.
    pub fn object_type(&self) -> &str {
        &self.object_type
    }

    /// Number of fields each entry of this index carries.
    pub fn arity(&self) -> usize {
        self.arity
    }

    /// Insert an entry directly. Re-inserting an existing entry rewrites
    /// the same key with the same sentinel — a no-op in effect.
    pub fn insert<S: StateStore>(&self, store: &S, fields: &[&str]) -> Result<()> {
        store.put(&self.entry_key(fields)?, &SENTINEL)
    }

    /// Remove an entry directly. Removing an absent entry is a no-op.
    pub fn remove<S: StateStore>(&self, store: &S, fields: &[&str]) -> Result<()> {
        store.delete(&self.entry_key(fields)?)
    }

    /// Stage an insert into `batch` instead of writing immediately.
    pub fn stage_insert(&self, batch: &mut WriteBatch, fields: &[&str]) -> Result<()> {
        batch.put(self.entry_key(fields)?, SENTINEL.to_vec());
        Ok(())
    }

    /// Stage a removal into `batch` instead of deleting immediately.
    pub fn stage_remove(&self, batch: &mut WriteBatch, fields: &[&str]) -> Result<()> {
        batch.delete(self.entry_key(fields)?);
        Ok(())
    }

    /// Scan entries whose leading fields equal `partial`, in key order.
    ///
    /// Yields the full field tuple of each matching entry. An empty
    /// `partial` scans the whole index.
    ///
    /// # Errors
    ///
    /// Fails up front when `partial` has more fields than the index, and
    /// per entry with [`LedgerError::MalformedKey`] when a stored key does
    /// not decode to this index's shape.
    pub fn scan<'s, S: StateStore>(
        &self,
        store: &'s S,
        partial: &[&str],
    ) -> Result<impl Iterator<Item = Result<Vec<String>>> + 's> {
        if partial.len() > self.arity {
            return Err(LedgerError::MalformedKey(format!(
                "scan prefix has {} fields but index {} has only {}",
                partial.len(),
                self.object_type,
                self.arity,
            )));
        }

        let prefix = key::encode_prefix(&self.object_type, partial)?;
        let expected_type = self.object_type.clone();
        let arity = self.arity;

        Ok(store.scan_prefix(&prefix).map(move |entry| {
            let (raw_key, _) = entry?;
            let (object_type, fields) = key::decode(&raw_key)?;
            if object_type != expected_type || fields.len() != arity {
                return Err(LedgerError::MalformedKey(format!(
                    "index entry decodes to {object_type} with {} fields, expected \
                     {expected_type} with {arity}",
                    fields.len(),
                )));
            }
            Ok(fields)
        }))
    }

    fn entry_key(&self, fields: &[&str]) -> Result<Vec<u8>> {
        if fields.len() != self.arity {
            return Err(LedgerError::MalformedKey(format!(
                "index {} expects {} fields, got {}",
                self.object_type,
                self.arity,
                fields.len(),
            )));
        }
        key::encode(&self.object_type, fields)
    }
}
