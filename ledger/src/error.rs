//! # Error Types
//!
//! The single error enum shared by every AXLE operation. Callers always see
//! either a successful result value or one `LedgerError` — there are no
//! side-channel failure states.

use thiserror::Error;

/// Result type alias used across the AXLE workspace.
pub type Result<T> = std::result::Result<T, LedgerError>;

/// Errors that can occur during ledger operations.
#[derive(Debug, Error)]
pub enum LedgerError {
    /// A required record is absent, or a reference points at nothing.
    #[error("record not found: {key}")]
    NotFound {
        /// The world-state key that was looked up.
        key: String,
    },

    /// A creation operation targeted a key that is already populated.
    #[error("record already exists: {key}")]
    AlreadyExists {
        /// The world-state key that was already taken.
        key: String,
    },

    /// Bytes were present under the key but failed to decode.
    #[error("corrupt record at {key}: {detail}")]
    Corrupt {
        /// The world-state key holding the undecodable bytes.
        key: String,
        /// Decoder diagnostic.
        detail: String,
    },

    /// A composite index key could not be decoded into the expected shape.
    #[error("malformed composite key: {0}")]
    MalformedKey(String),

    /// A balance cannot cover the amount an operation requires.
    #[error("insufficient funds: available {available}, required {required}")]
    InsufficientFunds {
        /// The balance currently held.
        available: u64,
        /// The amount the operation needed.
        required: u64,
    },

    /// A transfer was offered a car with malfunctions the buyer refused.
    #[error("car has malfunctions and the new owner does not accept them")]
    MalfunctionsRejected,

    /// Balance or price arithmetic would leave the `u64` range.
    #[error("amount overflow: {0}")]
    AmountOverflow(String),

    /// A record could not be serialized for storage.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// The sled backend reported a failure.
    #[error("sled error: {0}")]
    Sled(#[from] sled::Error),
}
