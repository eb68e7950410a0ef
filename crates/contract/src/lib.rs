//! Supply-chain product contract
//!
//! Tracks products on a shared ledger. Each product lives under its id as a
//! single JSON record; the contract creates, updates, transfers, queries and
//! enumerates them through a [`TransactionContext`](supplychain_core::TransactionContext).
//!
//! # Example
//!
//! ```
//! use supplychain_contract::SupplyChainContract;
//! use supplychain_storage::Ledger;
//!
//! let ledger = Ledger::new();
//! let contract = SupplyChainContract::new();
//!
//! ledger
//!     .submit(|ctx| contract.create_product(ctx, "p2", "Phone", "CompanyA", "", "Electronics"))
//!     .unwrap();
//! let phone = ledger.evaluate(|ctx| contract.query_product(ctx, "p2")).unwrap();
//! assert_eq!(phone.status, "Created");
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod codec;
pub mod contract;
pub mod product;

pub use codec::{get_codec, CodecError, JsonCodec, ProductCodec};
pub use contract::{ProductIter, SupplyChainContract, INITIAL_STATUS, SEED_PRODUCTS};
pub use product::Product;
