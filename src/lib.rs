//! Supplychain - product tracking on a transactional ledger
//!
//! Products move through a supply chain as single JSON records keyed by id.
//! The contract creates, updates, transfers, queries and enumerates them;
//! the ledger gives each invocation a snapshot, validates its reads at commit
//! and applies its writes atomically.
//!
//! # Quick Start
//!
//! ```
//! use supplychain::{Command, Executor, Ledger, Output};
//!
//! let executor = Executor::new(Ledger::new());
//! executor.execute(Command::InitLedger).unwrap();
//!
//! match executor.execute(Command::QueryProduct { id: "p1".into() }).unwrap() {
//!     Output::Product(p) => assert_eq!(p.owner, "CompanyA"),
//!     other => panic!("unexpected {:?}", other),
//! }
//! ```
//!
//! # Architecture
//!
//! - [`Executor`]: command-based entry point used by the CLI and SDKs
//! - [`SupplyChainContract`]: the product operations, generic over
//!   [`TransactionContext`]
//! - [`Ledger`]: in-process world state with optimistic commit validation

pub use supplychain_contract::{
    get_codec, CodecError, JsonCodec, Product, ProductCodec, ProductIter, SupplyChainContract,
    INITIAL_STATUS, SEED_PRODUCTS,
};
pub use supplychain_core::{Error, KeyValue, Result, Timestamp, TransactionContext};
pub use supplychain_executor::{Command, Executor, Output};
pub use supplychain_storage::{
    load_world_state, save_world_state, CommitInfo, Ledger, LedgerTransaction, StateLock,
    WorldState,
};
