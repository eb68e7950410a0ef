//! World state survives a save/load cycle between executor runs.

use std::time::Duration;

use supplychain::{
    load_world_state, save_world_state, Command, Error, Executor, Ledger, Output, StateLock,
    Timestamp,
};
use tempfile::TempDir;

/// One CLI-style cycle: lock, load, execute, save on write
fn cycle(
    path: &std::path::Path,
    at: Option<Timestamp>,
    cmd: Command,
) -> supplychain::Result<Output> {
    let _lock = StateLock::acquire(path)?;
    let executor = Executor::new(Ledger::with_state(load_world_state(path)?));
    let is_write = cmd.is_write();
    let output = match at {
        Some(ts) => executor.execute_at(ts, cmd)?,
        None => executor.execute(cmd)?,
    };
    if is_write {
        save_world_state(executor.ledger().state(), path)?;
    }
    Ok(output)
}

fn run(path: &std::path::Path, at: Timestamp, cmd: Command) -> supplychain::Result<Output> {
    cycle(path, Some(at), cmd)
}

fn query_p1(path: &std::path::Path) -> supplychain::Product {
    match cycle(path, None, Command::QueryProduct { id: "p1".into() }).unwrap() {
        Output::Product(p) => p,
        other => panic!("expected Product, got {:?}", other),
    }
}

#[test]
fn products_survive_reload() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("state").join("world_state.json");

    run(&path, Timestamp::from_secs(1), Command::InitLedger).unwrap();
    run(
        &path,
        Timestamp::from_secs(2),
        Command::from_invocation("TransferOwnership", &["p1", "CompanyB"]).unwrap(),
    )
    .unwrap();

    let out = run(
        &path,
        Timestamp::from_secs(3),
        Command::QueryProduct { id: "p1".into() },
    )
    .unwrap();
    match out {
        Output::Product(p) => {
            assert_eq!(p.owner, "CompanyB");
            assert_eq!(p.created_at, Timestamp::from_secs(1));
            assert_eq!(p.updated_at, Timestamp::from_secs(2));
        }
        other => panic!("expected Product, got {:?}", other),
    }
}

#[test]
fn failed_write_does_not_touch_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("world_state.json");

    run(&path, Timestamp::from_secs(1), Command::InitLedger).unwrap();
    let before = std::fs::read(&path).unwrap();

    let err = run(&path, Timestamp::from_secs(2), Command::InitLedger).unwrap_err();
    assert!(err.is_already_exists());
    assert_eq!(std::fs::read(&path).unwrap(), before);
}

#[test]
fn reloaded_versions_keep_conflict_detection() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("world_state.json");
    run(&path, Timestamp::from_secs(1), Command::InitLedger).unwrap();

    let state = load_world_state(&path).unwrap();
    assert!(state.current_version() >= 1);
    assert_eq!(state.get("p1").unwrap().version(), state.current_version());
}

#[test]
fn clock_survives_reload() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("world_state.json");
    let future = Timestamp::now().saturating_add(Duration::from_secs(3_600));

    run(&path, future, Command::InitLedger).unwrap();
    assert_eq!(load_world_state(&path).unwrap().clock(), future);

    cycle(
        &path,
        None,
        Command::from_invocation("TransferOwnership", &["p1", "CompanyB"]).unwrap(),
    )
    .unwrap();

    let p = query_p1(&path);
    assert_eq!(p.owner, "CompanyB");
    assert_eq!(p.created_at, future);
    assert!(p.updated_at >= p.created_at);
}

#[test]
fn held_lock_rejects_concurrent_cycle() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("world_state.json");
    run(&path, Timestamp::from_secs(1), Command::InitLedger).unwrap();
    let before = std::fs::read(&path).unwrap();

    let held = StateLock::acquire(&path).unwrap();
    let err = run(
        &path,
        Timestamp::from_secs(2),
        Command::from_invocation("TransferOwnership", &["p1", "CompanyB"]).unwrap(),
    )
    .unwrap_err();
    assert!(matches!(err, Error::Store(_)));
    assert_eq!(std::fs::read(&path).unwrap(), before);

    drop(held);
    assert_eq!(query_p1(&path).owner, "CompanyA");
}
