//! In-memory ledger: transaction lifecycle over a shared world state
//!
//! `Ledger` plays the part of the ledger platform for contract code:
//! it hands out [`LedgerTransaction`]s, validates them at commit
//! (first committer wins on the read set) and applies their write sets
//! atomically.
//!
//! # Usage
//!
//! ```
//! use supplychain_core::TransactionContext;
//! use supplychain_storage::Ledger;
//!
//! let ledger = Ledger::new();
//! ledger.submit(|ctx| ctx.put_state("p1", b"{}".to_vec()))?;
//!
//! let value = ledger.evaluate(|ctx| ctx.get_state("p1"))?;
//! assert_eq!(value, Some(b"{}".to_vec()));
//! # Ok::<(), supplychain_core::Error>(())
//! ```

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use supplychain_core::{Error, Result, Timestamp, TransactionContext};
use tracing::{debug, warn};

use crate::transaction::LedgerTransaction;
use crate::validation::validate_transaction;
use crate::world_state::WorldState;

/// Outcome of a successful commit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitInfo {
    /// Identifier of the committed transaction
    pub tx_id: String,
    /// Commit version assigned to the writes, `None` for read-only commits
    pub version: Option<u64>,
    /// Number of keys written
    pub writes: usize,
}

/// Shared ledger handle
///
/// Cloning is cheap; clones share the same world state.
#[derive(Debug, Clone, Default)]
pub struct Ledger {
    state: Arc<WorldState>,
    /// Number of range scans not yet dropped
    open_scans: Arc<AtomicUsize>,
}

impl Ledger {
    /// Create a ledger with an empty world state
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a ledger over an existing world state
    ///
    /// The transaction clock resumes from the state's saved clock.
    pub fn with_state(state: WorldState) -> Self {
        Self {
            state: Arc::new(state),
            ..Self::default()
        }
    }

    /// Committed world state
    pub fn state(&self) -> &WorldState {
        &self.state
    }

    /// Number of range scans currently open against this ledger
    pub fn open_scans(&self) -> usize {
        self.open_scans.load(Ordering::SeqCst)
    }

    /// Begin a transaction stamped with the current time
    ///
    /// Timestamps handed out over one world state never go backwards, even
    /// if the system clock does.
    pub fn begin(&self) -> LedgerTransaction {
        let now = Timestamp::now();
        let previous = self.state.advance_clock(now);
        self.start(previous.max(now))
    }

    /// Begin a transaction with an explicit timestamp
    ///
    /// The timestamp is used as given. Later `begin` calls stamp no earlier
    /// than it.
    pub fn begin_at(&self, timestamp: Timestamp) -> LedgerTransaction {
        self.state.advance_clock(timestamp);
        self.start(timestamp)
    }

    fn start(&self, timestamp: Timestamp) -> LedgerTransaction {
        LedgerTransaction::new(self.state.snapshot(), timestamp, self.open_scans.clone())
    }

    /// Validate and apply a transaction
    ///
    /// # Errors
    ///
    /// `Error::Conflict` if any key or range the transaction read has changed
    /// since it began; nothing is applied in that case.
    pub fn commit(&self, txn: LedgerTransaction) -> Result<CommitInfo> {
        let parts = txn.into_parts();
        let writes = parts.write_set.len();
        let (read_set, range_set) = (parts.read_set, parts.range_set);

        match self
            .state
            .apply_batch(parts.write_set, |data| validate_transaction(&read_set, &range_set, data))
        {
            Ok(version) => {
                debug!(tx_id = %parts.tx_id, ?version, writes, "transaction committed");
                Ok(CommitInfo {
                    tx_id: parts.tx_id,
                    version,
                    writes,
                })
            }
            Err(result) => {
                warn!(
                    tx_id = %parts.tx_id,
                    conflicts = result.conflict_count(),
                    "transaction aborted by read-set validation"
                );
                Err(Error::Conflict {
                    tx_id: parts.tx_id,
                    reason: result.summary(),
                })
            }
        }
    }

    /// Run `f` in a new transaction and commit it
    ///
    /// If `f` fails its buffered writes are discarded and its error returned.
    pub fn submit<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&mut LedgerTransaction) -> Result<T>,
    {
        self.run_and_commit(self.begin(), f)
    }

    /// Like [`submit`](Self::submit) with an explicit transaction timestamp
    pub fn submit_at<F, T>(&self, timestamp: Timestamp, f: F) -> Result<T>
    where
        F: FnOnce(&mut LedgerTransaction) -> Result<T>,
    {
        self.run_and_commit(self.begin_at(timestamp), f)
    }

    /// Run `f` in a transaction that is never committed
    ///
    /// For queries: any writes `f` buffers are dropped.
    pub fn evaluate<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&mut LedgerTransaction) -> Result<T>,
    {
        let mut txn = self.begin();
        f(&mut txn)
    }

    /// Like [`evaluate`](Self::evaluate) with an explicit transaction timestamp
    pub fn evaluate_at<F, T>(&self, timestamp: Timestamp, f: F) -> Result<T>
    where
        F: FnOnce(&mut LedgerTransaction) -> Result<T>,
    {
        let mut txn = self.begin_at(timestamp);
        f(&mut txn)
    }

    fn run_and_commit<F, T>(&self, mut txn: LedgerTransaction, f: F) -> Result<T>
    where
        F: FnOnce(&mut LedgerTransaction) -> Result<T>,
    {
        match f(&mut txn) {
            Ok(value) => {
                self.commit(txn)?;
                Ok(value)
            }
            Err(e) => {
                debug!(
                    tx_id = %txn.tx_id(),
                    discarded = txn.write_set().len(),
                    error = %e,
                    "transaction failed, buffered writes discarded"
                );
                Err(e)
            }
        }
    }
}
