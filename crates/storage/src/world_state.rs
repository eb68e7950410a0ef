//! WorldState: the committed key/value state of the ledger
//!
//! This module holds the state every transaction reads from:
//! - `BTreeMap<String, StoredValue>` for ordered key storage
//! - `parking_lot::RwLock` for thread-safe access
//! - `AtomicU64` for monotonically increasing commit versions
//! - `AtomicU64` for the transaction clock, so timestamps survive a reload
//!
//! # Design Notes
//!
//! - **Copy-on-write**: the map lives behind an `Arc`; commits clone it only
//!   when a snapshot still references the old one
//! - **One version per commit**: all keys written by a transaction share the
//!   commit version
//! - **Validate under the write lock**: conflict checks and the apply happen in
//!   one critical section, so no commit can slip between them

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::RwLock;
use supplychain_core::Timestamp;

use crate::snapshot::{StateMap, StateSnapshot};
use crate::stored_value::StoredValue;
use crate::validation::ValidationResult;

/// Committed world state shared by every transaction of a ledger
#[derive(Debug, Default)]
pub struct WorldState {
    /// Ordered map from key to its latest committed value
    data: RwLock<Arc<StateMap>>,
    /// Highest commit version applied so far
    version: AtomicU64,
    /// Highest transaction timestamp handed out, in microseconds
    clock: AtomicU64,
}

impl WorldState {
    /// Create an empty world state at version 0
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a world state from previously exported entries
    ///
    /// `version` is raised to the highest entry version if it is lower, so new
    /// commits never reuse a version already present in the data.
    pub fn from_entries(entries: impl IntoIterator<Item = (String, StoredValue)>, version: u64) -> Self {
        let data: StateMap = entries.into_iter().collect();
        let max_entry = data.values().map(StoredValue::version).max().unwrap_or(0);
        Self {
            data: RwLock::new(Arc::new(data)),
            version: AtomicU64::new(version.max(max_entry)),
            clock: AtomicU64::new(0),
        }
    }

    /// Resume the transaction clock from a saved value
    pub fn with_clock(self, clock: Timestamp) -> Self {
        self.clock.fetch_max(clock.as_micros(), Ordering::SeqCst);
        self
    }

    /// Highest transaction timestamp handed out so far
    pub fn clock(&self) -> Timestamp {
        Timestamp::from_micros(self.clock.load(Ordering::SeqCst))
    }

    /// Raise the clock to at least `timestamp` and return the previous value
    pub(crate) fn advance_clock(&self, timestamp: Timestamp) -> Timestamp {
        Timestamp::from_micros(self.clock.fetch_max(timestamp.as_micros(), Ordering::SeqCst))
    }

    /// Take a point-in-time snapshot
    pub fn snapshot(&self) -> StateSnapshot {
        // Read the version under the lock so it matches the cloned map
        let data = self.data.read();
        StateSnapshot::new(self.current_version(), Arc::clone(&*data))
    }

    /// Latest committed value under `key`
    pub fn get(&self, key: &str) -> Option<StoredValue> {
        self.data.read().get(key).cloned()
    }

    /// Highest commit version applied so far
    pub fn current_version(&self) -> u64 {
        self.version.load(Ordering::SeqCst)
    }

    /// Number of keys in the committed state
    pub fn len(&self) -> usize {
        self.data.read().len()
    }

    /// Whether no key has ever been committed
    pub fn is_empty(&self) -> bool {
        self.data.read().is_empty()
    }

    /// Copy out every entry in key order
    pub fn entries(&self) -> Vec<(String, StoredValue)> {
        self.data
            .read()
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }

    /// Validate and apply a write set atomically
    ///
    /// `validate` runs against the current committed map while the write lock
    /// is held. If it reports conflicts nothing is applied and the result is
    /// returned as the error. An empty write set is validated but does not
    /// consume a version; `Ok(None)` is returned in that case.
    pub(crate) fn apply_batch<F>(
        &self,
        writes: BTreeMap<String, Vec<u8>>,
        validate: F,
    ) -> std::result::Result<Option<u64>, ValidationResult>
    where
        F: FnOnce(&StateMap) -> ValidationResult,
    {
        let mut data = self.data.write();

        let result = validate(&**data);
        if !result.is_valid() {
            return Err(result);
        }
        if writes.is_empty() {
            return Ok(None);
        }

        let commit_version = self.version.load(Ordering::SeqCst) + 1;
        let map = Arc::make_mut(&mut *data);
        for (key, value) in writes {
            map.insert(key, StoredValue::new(value, commit_version));
        }
        self.version.store(commit_version, Ordering::SeqCst);

        Ok(Some(commit_version))
    }
}
