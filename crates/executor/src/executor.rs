//! The Executor - single entry point to the contract.
//!
//! The Executor is a stateless dispatcher: it routes each command to the
//! matching contract operation inside a ledger transaction and converts the
//! result to an [`Output`].

use supplychain_contract::SupplyChainContract;
use supplychain_core::{Result, Timestamp};
use supplychain_storage::{Ledger, LedgerTransaction};
use tracing::debug;

use crate::{Command, Output};

/// The command executor.
///
/// Write commands go through [`Ledger::submit`] and are committed on
/// success; read commands go through [`Ledger::evaluate`] and never change
/// the world state.
///
/// # Thread Safety
///
/// Executor is `Send + Sync` and can be shared across threads. Concurrent
/// writers conflicting on the same product are resolved by the ledger at
/// commit.
///
/// # Example
///
/// ```
/// use supplychain_executor::{Command, Executor, Output};
/// use supplychain_storage::Ledger;
///
/// let executor = Executor::new(Ledger::new());
/// executor.execute(Command::InitLedger).unwrap();
///
/// let out = executor
///     .execute(Command::ProductExists { id: "p1".into() })
///     .unwrap();
/// assert_eq!(out, Output::Bool(true));
/// ```
#[derive(Debug, Clone)]
pub struct Executor {
    ledger: Ledger,
    contract: std::sync::Arc<SupplyChainContract>,
}

impl Executor {
    /// Create an executor over a ledger using the default contract.
    pub fn new(ledger: Ledger) -> Self {
        Self::with_contract(ledger, SupplyChainContract::new())
    }

    /// Create an executor with an explicitly configured contract.
    pub fn with_contract(ledger: Ledger, contract: SupplyChainContract) -> Self {
        Self {
            ledger,
            contract: std::sync::Arc::new(contract),
        }
    }

    /// The ledger commands run against.
    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    /// Execute a single command at the current time.
    ///
    /// The transaction is stamped by the ledger clock, so it is never earlier
    /// than any timestamp the ledger has already handed out.
    pub fn execute(&self, cmd: Command) -> Result<Output> {
        self.run(None, cmd)
    }

    /// Execute a single command with an explicit transaction timestamp.
    pub fn execute_at(&self, timestamp: Timestamp, cmd: Command) -> Result<Output> {
        self.run(Some(timestamp), cmd)
    }

    fn run(&self, timestamp: Option<Timestamp>, cmd: Command) -> Result<Output> {
        let name = cmd.name();
        debug!(command = name, write = cmd.is_write(), ?timestamp, "executing");

        let ledger = &self.ledger;
        let output = match (cmd.is_write(), timestamp) {
            (true, None) => ledger.submit(|txn| self.dispatch(txn, cmd))?,
            (true, Some(ts)) => ledger.submit_at(ts, |txn| self.dispatch(txn, cmd))?,
            (false, None) => ledger.evaluate(|txn| self.dispatch(txn, cmd))?,
            (false, Some(ts)) => ledger.evaluate_at(ts, |txn| self.dispatch(txn, cmd))?,
        };

        debug!(command = name, output = output.kind(), "executed");
        Ok(output)
    }

    /// Execute commands in order, each in its own transaction.
    ///
    /// A failing command does not stop the ones after it.
    pub fn execute_many(&self, cmds: Vec<Command>) -> Vec<Result<Output>> {
        cmds.into_iter().map(|cmd| self.execute(cmd)).collect()
    }

    fn dispatch(&self, txn: &mut LedgerTransaction, cmd: Command) -> Result<Output> {
        let contract = &self.contract;
        match cmd {
            Command::InitLedger => contract.init_ledger(txn).map(|()| Output::Unit),
            Command::CreateProduct {
                id,
                name,
                owner,
                description,
                category,
            } => contract
                .create_product(txn, &id, &name, &owner, &description, &category)
                .map(|()| Output::Unit),
            Command::UpdateProduct {
                id,
                status,
                owner,
                description,
                category,
            } => contract
                .update_product(txn, &id, &status, &owner, &description, &category)
                .map(|()| Output::Unit),
            Command::TransferOwnership { id, new_owner } => contract
                .transfer_ownership(txn, &id, &new_owner)
                .map(|()| Output::Unit),
            Command::QueryProduct { id } => contract.query_product(txn, &id).map(Output::Product),
            Command::ProductExists { id } => contract.product_exists(txn, &id).map(Output::Bool),
            Command::GetAllProducts => contract.list_all(txn).map(Output::Products),
        }
    }
}
