//! Lazy range scans over a snapshot
//!
//! A [`RangeScan`] walks the pinned snapshot one key at a time. It owns a
//! scan handle registered with its ledger; the handle is released when the
//! scan is dropped, whether it was exhausted, abandoned early, or dropped
//! while unwinding an error.

use std::ops::Bound;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use supplychain_core::{KeyValue, Result};

use crate::snapshot::StateMap;

/// Registration of one open scan with the ledger
#[derive(Debug)]
pub(crate) struct ScanHandle {
    open: Arc<AtomicUsize>,
}

impl ScanHandle {
    pub(crate) fn acquire(open: &Arc<AtomicUsize>) -> Self {
        open.fetch_add(1, Ordering::SeqCst);
        Self { open: open.clone() }
    }
}

impl Drop for ScanHandle {
    fn drop(&mut self) {
        self.open.fetch_sub(1, Ordering::SeqCst);
    }
}

/// Iterator over `[start, end)` of a snapshot in ascending key order
#[derive(Debug)]
pub struct RangeScan {
    data: Arc<StateMap>,
    /// Lower bound for the next lookup; advances past each yielded key
    lower: Bound<String>,
    /// Exclusive upper bound, empty = unbounded
    end: String,
    exhausted: bool,
    _handle: ScanHandle,
}

impl RangeScan {
    /// Caller guarantees `start <= end` when both are non-empty.
    pub(crate) fn new(data: Arc<StateMap>, start: &str, end: &str, handle: ScanHandle) -> Self {
        let lower = if start.is_empty() {
            Bound::Unbounded
        } else {
            Bound::Included(start.to_string())
        };
        Self {
            data,
            lower,
            end: end.to_string(),
            exhausted: false,
            _handle: handle,
        }
    }
}

impl Iterator for RangeScan {
    type Item = Result<KeyValue>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.exhausted {
            return None;
        }

        let lower = match &self.lower {
            Bound::Included(k) => Bound::Included(k.as_str()),
            Bound::Excluded(k) => Bound::Excluded(k.as_str()),
            Bound::Unbounded => Bound::Unbounded,
        };
        let upper = if self.end.is_empty() {
            Bound::Unbounded
        } else {
            Bound::Excluded(self.end.as_str())
        };

        let found = self
            .data
            .range::<str, _>((lower, upper))
            .next()
            .map(|(k, v)| (k.clone(), v.value().to_vec()));

        match found {
            Some((key, value)) => {
                self.lower = Bound::Excluded(key.clone());
                Some(Ok(KeyValue { key, value }))
            }
            None => {
                self.exhausted = true;
                None
            }
        }
    }
}
