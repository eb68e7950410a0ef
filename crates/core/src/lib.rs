//! Core types and traits for the supply-chain ledger
//!
//! This crate defines the foundational types shared by every layer:
//! - Error: Error type hierarchy
//! - Timestamp: Transaction timestamp with RFC 3339 wire format
//! - Traits: The per-transaction world-state capability (TransactionContext)

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod timestamp;
pub mod traits;

pub use error::{Error, Result};
pub use timestamp::Timestamp;
pub use traits::{KeyValue, TransactionContext};
