// Copyright (c) 2026 ALAS Technology. MIT License.
// See LICENSE for details.

//! # AXLE Vehicle Registry
//!
//! The domain layer of AXLE: vehicle and owner records in the key-value
//! world state, plus the transaction workflows that move money and metal
//! around — malfunction accounting, repair settlement, and ownership
//! transfer. Everything here runs against the `axle-ledger` core:
//!
//! - **records** — Car, Owner, and Malfunction types with their key scheme
//!   and self-describing JSON encoding.
//! - **ledger** — the [`AssetLedger`] service: every query and mutation the
//!   registry exposes, each mutation committing all of its writes (record,
//!   index entries, balances) as one atomic batch.
//! - **seed** — a demo fleet for bootstrapping fresh stores.
//!
//! ## Design Principles
//!
//! 1. All monetary operations check for overflow — `checked_add` and
//!    `checked_sub` everywhere, because wrapping arithmetic and money do
//!    not mix.
//! 2. The `color~owner~id` index is derived state: the car record is
//!    authoritative, and every mutation that touches an indexed field swaps
//!    the index entry inside the record's own write batch.
//! 3. Owner references are weak: a car stores the owner's id, never a copy
//!    of the owner.

pub mod ledger;
pub mod records;
pub mod seed;

pub use ledger::{AssetLedger, MalfunctionOutcome, RepairOutcome, CAR_INDEX};
pub use records::{Car, Malfunction, Owner};
