//! Point-in-time views of the world state
//!
//! A [`StateSnapshot`] pins the ordered map as it was when a transaction
//! began. The world state is copy-on-write, so taking a snapshot is an `Arc`
//! clone and later commits never disturb it.

use std::collections::BTreeMap;
use std::ops::Bound;
use std::sync::Arc;

use crate::stored_value::StoredValue;

/// Ordered committed state: key to latest stored value
pub type StateMap = BTreeMap<String, StoredValue>;

/// Immutable view of the world state at one commit version
#[derive(Debug, Clone)]
pub struct StateSnapshot {
    version: u64,
    data: Arc<StateMap>,
}

impl StateSnapshot {
    pub(crate) fn new(version: u64, data: Arc<StateMap>) -> Self {
        Self { version, data }
    }

    /// Commit version this snapshot reflects
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Look up a key
    pub fn get(&self, key: &str) -> Option<&StoredValue> {
        self.data.get(key)
    }

    /// Number of keys visible in the snapshot
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether the snapshot holds no keys
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub(crate) fn data(&self) -> &Arc<StateMap> {
        &self.data
    }
}

/// Translate ledger-style range arguments into map bounds
///
/// Empty `start` is unbounded below, empty `end` unbounded above; otherwise the
/// range is `[start, end)`.
pub(crate) fn range_bounds<'a>(start: &'a str, end: &'a str) -> (Bound<&'a str>, Bound<&'a str>) {
    let lower = if start.is_empty() {
        Bound::Unbounded
    } else {
        Bound::Included(start)
    };
    let upper = if end.is_empty() {
        Bound::Unbounded
    } else {
        Bound::Excluded(end)
    };
    (lower, upper)
}

/// Keys and versions currently inside `[start, end)`
///
/// Used both when a scan is opened and when it is re-checked at commit.
pub(crate) fn range_listing(data: &StateMap, start: &str, end: &str) -> Vec<(String, u64)> {
    data.range::<str, _>(range_bounds(start, end))
        .map(|(k, v)| (k.clone(), v.version()))
        .collect()
}
