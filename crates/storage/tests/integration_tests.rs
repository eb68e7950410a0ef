//! Integration tests for the in-memory ledger
//!
//! These drive the ledger only through its public surface: closures over a
//! `TransactionContext`, explicit `begin`/`commit`, and the persistence pair.

use supplychain_core::{KeyValue, Result, Timestamp, TransactionContext};
use supplychain_storage::{load_world_state, save_world_state, Ledger};
use tempfile::TempDir;

// ============================================================================
// Helper Functions
// ============================================================================

fn put(ledger: &Ledger, key: &str, value: &str) {
    ledger
        .submit(|ctx| ctx.put_state(key, value.as_bytes().to_vec()))
        .unwrap();
}

fn scan_keys(ledger: &Ledger, start: &str, end: &str) -> Vec<String> {
    ledger
        .evaluate(|ctx| {
            ctx.range_scan(start, end)?
                .map(|kv| kv.map(|KeyValue { key, .. }| key))
                .collect::<Result<Vec<_>>>()
        })
        .unwrap()
}

// ============================================================================
// Range Scans
// ============================================================================

#[test]
fn test_full_range_scan_is_sorted() {
    let ledger = Ledger::new();
    for key in ["p10", "p2", "a", "p1", "z"] {
        put(&ledger, key, "v");
    }

    assert_eq!(scan_keys(&ledger, "", ""), vec!["a", "p1", "p10", "p2", "z"]);
    assert_eq!(ledger.open_scans(), 0);
}

#[test]
fn test_bounded_scan_is_half_open() {
    let ledger = Ledger::new();
    for key in ["a", "b", "c", "d"] {
        put(&ledger, key, "v");
    }

    assert_eq!(scan_keys(&ledger, "b", "d"), vec!["b", "c"]);
    assert_eq!(scan_keys(&ledger, "b", ""), vec!["b", "c", "d"]);
    assert_eq!(scan_keys(&ledger, "", "b"), vec!["a"]);
    assert!(scan_keys(&ledger, "c", "c").is_empty());
}

#[test]
fn test_inverted_range_rejected() {
    let ledger = Ledger::new();
    let err = ledger
        .evaluate(|ctx| ctx.range_scan("z", "a").map(|_| ()))
        .unwrap_err();
    assert!(err.to_string().contains("invalid range"));
    assert_eq!(ledger.open_scans(), 0);
}

#[test]
fn test_reserved_keys_rejected() {
    let ledger = Ledger::new();
    assert!(ledger.submit(|ctx| ctx.put_state("", b"v".to_vec())).is_err());
    assert!(ledger
        .submit(|ctx| ctx.put_state("\u{0}composite", b"v".to_vec()))
        .is_err());
    assert!(ledger.state().is_empty());
}

// ============================================================================
// Transactions
// ============================================================================

#[test]
fn test_writes_invisible_until_commit() {
    let ledger = Ledger::new();
    let mut txn = ledger.begin();
    txn.put_state("k", b"v".to_vec()).unwrap();

    assert!(ledger.state().get("k").is_none());
    // No read-your-writes inside the transaction either
    assert_eq!(txn.get_state("k").unwrap(), None);

    ledger.commit(txn).unwrap();
    assert_eq!(ledger.state().get("k").unwrap().value(), b"v");
}

#[test]
fn test_one_version_per_commit() {
    let ledger = Ledger::new();
    let mut txn = ledger.begin_at(Timestamp::from_secs(1));
    txn.put_state("a", b"1".to_vec()).unwrap();
    txn.put_state("b", b"2".to_vec()).unwrap();

    let info = ledger.commit(txn).unwrap();
    assert_eq!(info.version, Some(1));
    assert_eq!(info.writes, 2);

    let a = ledger.state().get("a").unwrap();
    let b = ledger.state().get("b").unwrap();
    assert_eq!(a.version(), b.version());
    assert_eq!(ledger.state().current_version(), 1);
}

#[test]
fn test_stale_read_aborts_whole_write_set() {
    let ledger = Ledger::new();
    put(&ledger, "a", "1");

    let mut txn = ledger.begin();
    txn.get_state("a").unwrap();
    txn.put_state("a", b"2".to_vec()).unwrap();
    txn.put_state("b", b"2".to_vec()).unwrap();

    put(&ledger, "a", "changed");

    assert!(ledger.commit(txn).unwrap_err().is_conflict());
    assert!(ledger.state().get("b").is_none());
    assert_eq!(ledger.state().get("a").unwrap().value(), b"changed");
}

// ============================================================================
// Persistence
// ============================================================================

#[test]
fn test_save_load_preserves_versions_and_bytes() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("world_state.json");

    let ledger = Ledger::new();
    put(&ledger, "a", "1");
    put(&ledger, "b", "2");
    put(&ledger, "a", "3");
    ledger
        .submit(|ctx| ctx.put_state("bin", vec![0, 159, 255]))
        .unwrap();
    save_world_state(ledger.state(), &path).unwrap();

    let reloaded = Ledger::with_state(load_world_state(&path).unwrap());
    assert_eq!(reloaded.state().entries(), ledger.state().entries());
    assert_eq!(
        reloaded.state().current_version(),
        ledger.state().current_version()
    );
}

#[test]
fn test_leftover_temp_file_is_ignored() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("world_state.json");

    let ledger = Ledger::new();
    put(&ledger, "a", "1");
    save_world_state(ledger.state(), &path).unwrap();

    // A crash between write and rename leaves a partial temp file behind
    std::fs::write(path.with_extension("tmp"), b"{\"format_ver").unwrap();

    let reloaded = load_world_state(&path).unwrap();
    assert_eq!(reloaded.get("a").unwrap().value(), b"1");
}

#[test]
fn test_corrupt_state_file_is_store_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("world_state.json");
    std::fs::write(&path, b"not json").unwrap();

    let err = load_world_state(&path).unwrap_err();
    assert!(matches!(err, supplychain_core::Error::Store(_)));
}
