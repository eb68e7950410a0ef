//! Error types for the supply-chain ledger
//!
//! Every operation returns a typed failure so callers can tell a failed
//! precondition (exists / not found) from corrupt state or a platform fault.
//! We use `thiserror` for automatic `Display` and `Error` trait implementations.

use std::io;
use thiserror::Error;

/// Result type alias for ledger operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for the supply-chain ledger
#[derive(Debug, Error)]
pub enum Error {
    /// Create (or InitLedger) targeted a key that is already present
    #[error("the product {0} already exists")]
    AlreadyExists(String),

    /// Update, TransferOwnership or Query targeted an absent key
    #[error("the product {0} does not exist")]
    NotFound(String),

    /// Stored bytes under a key are not a valid product encoding
    #[error("failed to decode value under key {key}: {reason}")]
    Decode {
        /// Key whose value failed to decode
        key: String,
        /// Decoder message
        reason: String,
    },

    /// An in-memory record could not be serialized
    #[error("failed to encode product {key}: {reason}")]
    Encode {
        /// Key of the record being encoded
        key: String,
        /// Encoder message
        reason: String,
    },

    /// The world-state store rejected a get/put/scan
    #[error("failed to access world state: {0}")]
    Store(String),

    /// Commit-time validation found the read set stale
    #[error("transaction {tx_id} aborted: {reason}")]
    Conflict {
        /// Transaction that lost the race
        tx_id: String,
        /// Which key or range changed underneath it
        reason: String,
    },

    /// Caller supplied an unusable argument
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// I/O error while loading or saving world state
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl Error {
    /// Create a NotFound error
    pub fn not_found(id: impl Into<String>) -> Self {
        Error::NotFound(id.into())
    }

    /// Create an AlreadyExists error
    pub fn already_exists(id: impl Into<String>) -> Self {
        Error::AlreadyExists(id.into())
    }

    /// Create a Store error
    pub fn store(message: impl Into<String>) -> Self {
        Error::Store(message.into())
    }

    /// Create an InvalidArgument error
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Error::InvalidArgument(message.into())
    }

    /// Check if this is a not-found error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NotFound(_))
    }

    /// Check if this is an already-exists error
    pub fn is_already_exists(&self) -> bool {
        matches!(self, Error::AlreadyExists(_))
    }

    /// Check if this is a commit conflict (safe to resubmit)
    pub fn is_conflict(&self) -> bool {
        matches!(self, Error::Conflict { .. })
    }

    /// Check if this error indicates corrupt or foreign stored data
    pub fn is_decode(&self) -> bool {
        matches!(self, Error::Decode { .. })
    }
}
