//! Ledger capability traits
//!
//! Contract code never touches the world state directly. Every operation is
//! handed a [`TransactionContext`] for the duration of one transaction, which
//! lets the same contract run against the in-memory ledger in
//! `supplychain-storage` or any other platform binding.

use crate::error::Result;
use crate::timestamp::Timestamp;

/// One entry yielded by a range scan
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyValue {
    /// Store key
    pub key: String,
    /// Raw stored bytes
    pub value: Vec<u8>,
}

/// Per-transaction access to the world state
///
/// Reads observe the state as of transaction start. Writes are buffered by the
/// platform and become visible only if the transaction commits; a contract
/// never needs to undo anything on failure.
///
/// The timestamp is fixed for the whole transaction so every node executing
/// it derives identical `created_at` / `updated_at` values.
pub trait TransactionContext {
    /// Iterator returned by [`range_scan`](Self::range_scan)
    ///
    /// Dropping the iterator releases the platform-side scan handle.
    type Scan: Iterator<Item = Result<KeyValue>>;

    /// Identifier of the running transaction
    fn tx_id(&self) -> &str;

    /// Read the committed value under `key`, `None` if absent
    fn get_state(&mut self, key: &str) -> Result<Option<Vec<u8>>>;

    /// Buffer a write of `value` under `key`
    fn put_state(&mut self, key: &str, value: Vec<u8>) -> Result<()>;

    /// Scan keys in `[start, end)` in ascending key order
    ///
    /// An empty `start` means "from the first key", an empty `end` means
    /// "through the last key".
    fn range_scan(&mut self, start: &str, end: &str) -> Result<Self::Scan>;

    /// Timestamp assigned to the running transaction
    fn current_timestamp(&self) -> Result<Timestamp>;
}

#[cfg(test)]
mod tests {
    use super::*;

    // TransactionContext is used through generics only; KeyValue must stay
    // cheap to compare in tests
    #[test]
    fn test_key_value_equality() {
        let a = KeyValue {
            key: "p1".to_string(),
            value: b"{}".to_vec(),
        };
        assert_eq!(a.clone(), a);
    }
}
