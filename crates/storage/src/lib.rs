//! In-memory ledger for the supply-chain contract
//!
//! This crate stands in for the ledger platform the contract runs on:
//! - WorldState: ordered, copy-on-write committed state with commit versions
//! - LedgerTransaction: snapshot reads, read/range sets, buffered writes
//! - Validation: first-committer-wins on the read set, phantom detection
//! - Ledger: submit/evaluate closure API over the above
//! - Persistence: JSON export/import of the world state, file locking

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod ledger;
pub mod persist;
pub mod scan;
pub mod snapshot;
pub mod stored_value;
pub mod transaction;
pub mod validation;
pub mod world_state;

pub use ledger::{CommitInfo, Ledger};
pub use persist::{load_world_state, save_world_state, StateLock};
pub use scan::RangeScan;
pub use snapshot::StateSnapshot;
pub use stored_value::StoredValue;
pub use transaction::LedgerTransaction;
pub use validation::{ConflictType, RangeRead, ValidationResult};
pub use world_state::WorldState;
