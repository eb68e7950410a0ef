//! # Supply-chain Executor
//!
//! Command interface to the product contract. It provides:
//! - [`Command`]/[`Output`] - serializable operations and results (for SDKs)
//! - [`Executor`] - runs commands against a [`Ledger`](supplychain_storage::Ledger)
//!
//! ## Quick Start
//!
//! ```
//! use supplychain_executor::{Command, Executor, Output};
//! use supplychain_storage::Ledger;
//!
//! let executor = Executor::new(Ledger::new());
//! let cmd = Command::from_invocation(
//!     "CreateProduct",
//!     &["p2", "Phone", "CompanyA", "Flagship", "Electronics"],
//! )
//! .unwrap();
//! assert_eq!(executor.execute(cmd).unwrap(), Output::Unit);
//! ```

#![warn(missing_docs)]

mod command;
mod executor;
mod output;

pub use command::Command;
pub use executor::Executor;
pub use output::Output;

// Re-export the error type so callers don't need supplychain-core directly
pub use supplychain_core::{Error, Result};
