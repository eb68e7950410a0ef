//! The Product record tracked by the contract

use serde::{Deserialize, Serialize};
use supplychain_core::Timestamp;

/// A product on the ledger
///
/// `id` doubles as the world-state key. `name` and `created_at` never change
/// after creation; `updated_at` moves with every successful mutation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Product {
    /// Unique identifier and store key
    pub id: String,
    /// Display name, fixed at creation
    pub name: String,
    /// Free-form lifecycle label ("Created", "Shipped", ...)
    pub status: String,
    /// Current custodian
    pub owner: String,
    /// Free-form description
    pub description: String,
    /// Product category
    pub category: String,
    /// Timestamp of the creating transaction
    pub created_at: Timestamp,
    /// Timestamp of the latest mutating transaction
    pub updated_at: Timestamp,
}

impl Product {
    /// Build a product whose `created_at` and `updated_at` are both `at`
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        status: impl Into<String>,
        owner: impl Into<String>,
        description: impl Into<String>,
        category: impl Into<String>,
        at: Timestamp,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            status: status.into(),
            owner: owner.into(),
            description: description.into(),
            category: category.into(),
            created_at: at,
            updated_at: at,
        }
    }
}
