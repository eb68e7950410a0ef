//! Transaction context for the in-memory ledger
//!
//! `LedgerTransaction` is the [`TransactionContext`] handed to contract code.
//! It tracks everything needed to validate the transaction at commit:
//!
//! - Reads go to the snapshot pinned at `begin`; a transaction does NOT see
//!   its own buffered writes, matching how endorsing peers simulate
//!   transactions
//! - Every read key is recorded with the version it had (0 = absent)
//! - Every range scan is recorded with the keys/versions it covered
//! - Writes are buffered and only applied by `Ledger::commit`

use std::collections::BTreeMap;
use std::sync::atomic::AtomicUsize;
use std::sync::Arc;

use supplychain_core::{Error, Result, Timestamp, TransactionContext};
use uuid::Uuid;

use crate::scan::{RangeScan, ScanHandle};
use crate::snapshot::{range_listing, StateSnapshot};
use crate::validation::RangeRead;

/// Prefix reserved for composite keys; simple keys may not start with it
const COMPOSITE_KEY_NAMESPACE: char = '\u{0}';

/// Read/write set tracking for one ledger transaction
#[derive(Debug)]
pub struct LedgerTransaction {
    tx_id: String,
    timestamp: Timestamp,
    snapshot: StateSnapshot,
    read_set: BTreeMap<String, u64>,
    range_set: Vec<RangeRead>,
    write_set: BTreeMap<String, Vec<u8>>,
    open_scans: Arc<AtomicUsize>,
}

/// Owned pieces of a finished transaction, consumed by commit
pub(crate) struct TransactionParts {
    pub tx_id: String,
    pub read_set: BTreeMap<String, u64>,
    pub range_set: Vec<RangeRead>,
    pub write_set: BTreeMap<String, Vec<u8>>,
}

impl LedgerTransaction {
    pub(crate) fn new(
        snapshot: StateSnapshot,
        timestamp: Timestamp,
        open_scans: Arc<AtomicUsize>,
    ) -> Self {
        Self {
            tx_id: Uuid::new_v4().to_string(),
            timestamp,
            snapshot,
            read_set: BTreeMap::new(),
            range_set: Vec::new(),
            write_set: BTreeMap::new(),
            open_scans,
        }
    }

    /// Commit version of the snapshot this transaction reads from
    pub fn snapshot_version(&self) -> u64 {
        self.snapshot.version()
    }

    /// Keys read so far with the version observed
    pub fn read_set(&self) -> &BTreeMap<String, u64> {
        &self.read_set
    }

    /// Range scans opened so far
    pub fn range_set(&self) -> &[RangeRead] {
        &self.range_set
    }

    /// Buffered writes
    pub fn write_set(&self) -> &BTreeMap<String, Vec<u8>> {
        &self.write_set
    }

    pub(crate) fn into_parts(self) -> TransactionParts {
        TransactionParts {
            tx_id: self.tx_id,
            read_set: self.read_set,
            range_set: self.range_set,
            write_set: self.write_set,
        }
    }
}

fn check_key(key: &str) -> Result<()> {
    if key.is_empty() {
        return Err(Error::store("key must not be an empty string"));
    }
    if key.starts_with(COMPOSITE_KEY_NAMESPACE) {
        return Err(Error::store(format!(
            "key {:?} starts with the reserved composite-key namespace",
            key
        )));
    }
    Ok(())
}

impl TransactionContext for LedgerTransaction {
    type Scan = RangeScan;

    fn tx_id(&self) -> &str {
        &self.tx_id
    }

    fn get_state(&mut self, key: &str) -> Result<Option<Vec<u8>>> {
        check_key(key)?;
        let stored = self.snapshot.get(key);
        let version = stored.map(|sv| sv.version()).unwrap_or(0);
        self.read_set.entry(key.to_string()).or_insert(version);
        Ok(stored.map(|sv| sv.value().to_vec()))
    }

    fn put_state(&mut self, key: &str, value: Vec<u8>) -> Result<()> {
        check_key(key)?;
        self.write_set.insert(key.to_string(), value);
        Ok(())
    }

    fn range_scan(&mut self, start: &str, end: &str) -> Result<RangeScan> {
        if !start.is_empty() && !end.is_empty() && start > end {
            return Err(Error::store(format!(
                "invalid range: start {:?} is after end {:?}",
                start, end
            )));
        }

        let data = self.snapshot.data().clone();
        self.range_set.push(RangeRead {
            start: start.to_string(),
            end: end.to_string(),
            observed: range_listing(&data, start, end),
        });

        Ok(RangeScan::new(
            data,
            start,
            end,
            ScanHandle::acquire(&self.open_scans),
        ))
    }

    fn current_timestamp(&self) -> Result<Timestamp> {
        Ok(self.timestamp)
    }
}
