//! Output enum for command execution results.
//!
//! Every command produces exactly one output variant. The mapping is fixed:
//! the same command always produces the same variant, though the values
//! depend on the world state.

use serde::{Deserialize, Serialize};
use supplychain_contract::Product;

/// Successful command execution results.
///
/// Each [`Command`](crate::Command) variant maps to exactly one `Output`
/// variant, as documented on the command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Output {
    /// No return value (all writes)
    Unit,

    /// Boolean result (existence checks)
    Bool(bool),

    /// A single product
    Product(Product),

    /// Every product, in key order
    Products(Vec<Product>),
}

impl Output {
    /// Variant name, for logging
    pub fn kind(&self) -> &'static str {
        match self {
            Output::Unit => "Unit",
            Output::Bool(_) => "Bool",
            Output::Product(_) => "Product",
            Output::Products(_) => "Products",
        }
    }
}
