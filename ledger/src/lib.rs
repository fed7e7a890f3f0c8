// Copyright (c) 2026 ALAS Technology. MIT License.
// See LICENSE for details.

//! # AXLE — Core Ledger Library
//!
//! The storage foundation of AXLE, an asset-ledger engine built on an
//! ordered key-value world state. This crate knows nothing about cars,
//! owners, or money — it provides the three layers everything else in the
//! workspace stands on:
//!
//! ```text
//! index.rs — composite index manager (existence = membership)
//!     │
//! key.rs   — composite key codec (delimiter-safe, prefix-scannable)
//!     │
//! store/   — StateStore trait + sled and in-memory backends
//! ```
//!
//! ## World State Model
//!
//! The world state is a single ordered mapping from byte-string keys to
//! byte-string values. Records, secondary-index entries, and anything else
//! a ledger persists all share that one keyspace; byte-lexicographic key
//! order is the only order the store knows.
//!
//! ## Invocation Atomicity
//!
//! Every mutation workflow stages its writes into a [`store::WriteBatch`]
//! and applies them through [`store::StateStore::apply`] exactly once. A
//! batch lands in full or not at all, so a primary record and its index
//! entries can never diverge under a partial write.

pub mod error;
pub mod index;
pub mod key;
pub mod store;

pub use error::{LedgerError, Result};
pub use index::CompositeIndex;
pub use store::{MemoryStore, SledStore, StateStore, WriteBatch};
