//! Command enum defining every contract operation.
//!
//! Commands are the instruction set of the ledger front end. Each variant
//! carries everything needed to run one contract operation and nothing else:
//! no closures, no ledger handles.
//!
//! Commands come from two places:
//! - **Structured**: deserialized from JSON (SDKs, scripts)
//! - **Invocation**: a function name plus positional string arguments, the
//!   calling convention of ledger clients (see [`Command::from_invocation`])

use serde::{Deserialize, Serialize};
use supplychain_core::{Error, Result};

/// A command is a self-contained, serializable contract operation.
///
/// # Command Categories
///
/// | Category | Count | Description |
/// |----------|-------|-------------|
/// | Write | 4 | Seed, create, update, transfer |
/// | Read | 3 | Query, existence check, enumeration |
///
/// # Example
///
/// ```
/// use supplychain_executor::Command;
///
/// let cmd = Command::from_invocation("TransferOwnership", &["p1", "CompanyB"]).unwrap();
/// assert_eq!(
///     cmd,
///     Command::TransferOwnership {
///         id: "p1".into(),
///         new_owner: "CompanyB".into(),
///     }
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub enum Command {
    // ==================== Write (4) ====================
    /// Seed the ledger with the bootstrap products.
    /// Returns: `Output::Unit`
    InitLedger,

    /// Create a product with the initial status.
    /// Returns: `Output::Unit`
    CreateProduct {
        id: String,
        name: String,
        owner: String,
        description: String,
        category: String,
    },

    /// Replace status, owner, description and category.
    /// Returns: `Output::Unit`
    UpdateProduct {
        id: String,
        status: String,
        owner: String,
        description: String,
        category: String,
    },

    /// Change the owner only.
    /// Returns: `Output::Unit`
    TransferOwnership { id: String, new_owner: String },

    // ==================== Read (3) ====================
    /// Read one product.
    /// Returns: `Output::Product`
    QueryProduct { id: String },

    /// Presence check.
    /// Returns: `Output::Bool`
    ProductExists { id: String },

    /// Every product in key order.
    /// Returns: `Output::Products`
    GetAllProducts,
}

impl Command {
    /// Every invocation name accepted by [`Command::from_invocation`]
    pub const FUNCTIONS: &'static [&'static str] = &[
        "InitLedger",
        "CreateProduct",
        "UpdateProduct",
        "TransferOwnership",
        "QueryProduct",
        "ProductExists",
        "GetAllProducts",
    ];

    /// Parse a ledger-style invocation: function name plus string arguments.
    ///
    /// Argument order follows the contract signatures:
    ///
    /// | Function | Arguments |
    /// |----------|-----------|
    /// | `InitLedger` | none |
    /// | `CreateProduct` | id, name, owner, description, category |
    /// | `UpdateProduct` | id, status, owner, description, category |
    /// | `TransferOwnership` | id, new owner |
    /// | `QueryProduct` | id |
    /// | `ProductExists` | id |
    /// | `GetAllProducts` | none |
    ///
    /// # Errors
    ///
    /// `InvalidArgument` for an unknown function name or the wrong number of
    /// arguments.
    pub fn from_invocation<S: AsRef<str>>(function: &str, args: &[S]) -> Result<Self> {
        let args: Vec<String> = args.iter().map(|a| a.as_ref().to_string()).collect();
        let cmd = match function {
            "InitLedger" => {
                expect_arity(function, &args, 0)?;
                Command::InitLedger
            }
            "CreateProduct" => {
                let [id, name, owner, description, category] = take_args(function, args)?;
                Command::CreateProduct {
                    id,
                    name,
                    owner,
                    description,
                    category,
                }
            }
            "UpdateProduct" => {
                let [id, status, owner, description, category] = take_args(function, args)?;
                Command::UpdateProduct {
                    id,
                    status,
                    owner,
                    description,
                    category,
                }
            }
            "TransferOwnership" => {
                let [id, new_owner] = take_args(function, args)?;
                Command::TransferOwnership { id, new_owner }
            }
            "QueryProduct" => {
                let [id] = take_args(function, args)?;
                Command::QueryProduct { id }
            }
            "ProductExists" => {
                let [id] = take_args(function, args)?;
                Command::ProductExists { id }
            }
            "GetAllProducts" => {
                expect_arity(function, &args, 0)?;
                Command::GetAllProducts
            }
            other => {
                return Err(Error::invalid_argument(format!(
                    "unknown function {}",
                    other
                )))
            }
        };
        Ok(cmd)
    }

    /// Returns `true` if this command writes to the world state.
    ///
    /// Writes are submitted for commit; reads are evaluated and discarded.
    pub fn is_write(&self) -> bool {
        matches!(
            self,
            Command::InitLedger
                | Command::CreateProduct { .. }
                | Command::UpdateProduct { .. }
                | Command::TransferOwnership { .. }
        )
    }

    /// Invocation name of this command.
    pub fn name(&self) -> &'static str {
        match self {
            Command::InitLedger => "InitLedger",
            Command::CreateProduct { .. } => "CreateProduct",
            Command::UpdateProduct { .. } => "UpdateProduct",
            Command::TransferOwnership { .. } => "TransferOwnership",
            Command::QueryProduct { .. } => "QueryProduct",
            Command::ProductExists { .. } => "ProductExists",
            Command::GetAllProducts => "GetAllProducts",
        }
    }
}

fn expect_arity(function: &str, args: &[String], expected: usize) -> Result<()> {
    if args.len() != expected {
        return Err(Error::invalid_argument(format!(
            "{} takes {} argument(s), got {}",
            function,
            expected,
            args.len()
        )));
    }
    Ok(())
}

fn take_args<const N: usize>(function: &str, args: Vec<String>) -> Result<[String; N]> {
    expect_arity(function, &args, N)?;
    <[String; N]>::try_from(args)
        .map_err(|_| Error::invalid_argument(format!("{} takes {} argument(s)", function, N)))
}
