//! # Registry Records
//!
//! The persisted record types and their key scheme. Cars live directly
//! under the decimal string of their id; owners live under
//! `OWNER<decimal id>`. Both encode as JSON — a self-describing map of
//! field name to value, so decoding is driven by field presence rather
//! than position and old records survive schema additions.

use serde::{Deserialize, Serialize};

use axle_ledger::{LedgerError, Result};

/// Key prefix for owner records.
pub const OWNER_KEY_PREFIX: &str = "OWNER";

// ---------------------------------------------------------------------------
// Key scheme
// ---------------------------------------------------------------------------

/// World-state key of the car with the given id.
pub fn car_key(id: u64) -> String {
    id.to_string()
}

/// World-state key of the owner with the given id.
pub fn owner_key(id: u64) -> String {
    format!("{OWNER_KEY_PREFIX}{id}")
}

/// World-state key of the owner a car references by decimal-string id.
pub fn owner_key_for(owner_ref: &str) -> String {
    format!("{OWNER_KEY_PREFIX}{owner_ref}")
}

/// `true` if a raw world-state key lies in the car keyspace — a non-empty
/// run of ASCII digits. Owner keys and composite index entries never match.
pub fn is_car_key(key: &[u8]) -> bool {
    !key.is_empty() && key.iter().all(u8::is_ascii_digit)
}

// ---------------------------------------------------------------------------
// Records
// ---------------------------------------------------------------------------

/// A registered vehicle owner.
///
/// Never deleted; the balance moves only through repair settlement and
/// ownership transfer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Owner {
    /// Owner identity.
    pub id: u64,
    /// Given name.
    pub name: String,
    /// Family name.
    pub surname: String,
    /// Contact address (opaque to the registry).
    pub email: String,
    /// Balance in whole currency units.
    pub money: u64,
}

impl Owner {
    /// This owner's world-state key.
    pub fn key(&self) -> String {
        owner_key(self.id)
    }

    /// Add to the balance.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::AmountOverflow`] if the credit would exceed
    /// the `u64` range.
    pub fn credit(&mut self, amount: u64) -> Result<()> {
        self.money = self.money.checked_add(amount).ok_or_else(|| {
            LedgerError::AmountOverflow(format!(
                "crediting {amount} to owner {} (balance {})",
                self.id, self.money,
            ))
        })?;
        Ok(())
    }

    /// Take from the balance.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::InsufficientFunds`] if the balance cannot
    /// cover `amount`.
    pub fn debit(&mut self, amount: u64) -> Result<()> {
        self.money =
            self.money
                .checked_sub(amount)
                .ok_or(LedgerError::InsufficientFunds {
                    available: self.money,
                    required: amount,
                })?;
        Ok(())
    }

    /// Serialize for storage.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        serde_json::to_vec(self).map_err(|e| LedgerError::Serialization(e.to_string()))
    }

    /// Decode the bytes stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::Corrupt`] when the bytes do not decode.
    pub fn from_bytes(key: &str, bytes: &[u8]) -> Result<Self> {
        serde_json::from_slice(bytes).map_err(|e| LedgerError::Corrupt {
            key: key.to_string(),
            detail: e.to_string(),
        })
    }
}

/// A defect recorded against a car. Lives only inside [`Car::malfunctions`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Malfunction {
    /// What is broken.
    pub description: String,
    /// Repair cost in whole currency units.
    pub price: u64,
}

/// A registered vehicle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Car {
    /// Car identity.
    pub id: u64,
    /// Manufacturer.
    pub make: String,
    /// Model name.
    pub model: String,
    /// Paint color — first field of the composite index.
    pub color: String,
    /// Decimal-string id of the owning [`Owner`]. A weak reference: the
    /// relation plus a lookup, never an embedded owner record.
    pub owner: String,
    /// Outstanding defects, in recording order.
    #[serde(default)]
    pub malfunctions: Vec<Malfunction>,
    /// Full undamaged value in whole currency units.
    #[serde(default)]
    pub price: u64,
}

impl Car {
    /// This car's world-state key.
    pub fn key(&self) -> String {
        car_key(self.id)
    }

    /// The `(color, owner, id)` tuple this car must be indexed under.
    pub fn index_fields(&self) -> [String; 3] {
        [self.color.clone(), self.owner.clone(), self.id.to_string()]
    }

    /// Sum of all outstanding malfunction prices.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::AmountOverflow`] if the sum leaves `u64`.
    pub fn malfunction_total(&self) -> Result<u64> {
        self.malfunctions
            .iter()
            .try_fold(0u64, |total, m| total.checked_add(m.price))
            .ok_or_else(|| {
                LedgerError::AmountOverflow(format!(
                    "summing malfunction prices for car {}",
                    self.id,
                ))
            })
    }

    /// Serialize for storage.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        serde_json::to_vec(self).map_err(|e| LedgerError::Serialization(e.to_string()))
    }

    /// Decode the bytes stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::Corrupt`] when the bytes do not decode.
    pub fn from_bytes(key: &str, bytes: &[u8]) -> Result<Self> {
        serde_json::from_slice(bytes).map_err(|e| LedgerError::Corrupt {
            key: key.to_string(),
            detail: e.to_string(),
        })
    }
}
