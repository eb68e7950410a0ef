//! Interleaved and threaded invocations against one ledger.

use std::sync::Arc;
use std::thread;

use parking_lot::Mutex;
use supplychain::{Error, Ledger, SupplyChainContract, Timestamp};

fn t(secs: u64) -> Timestamp {
    Timestamp::from_secs(secs)
}

#[test]
fn concurrent_create_of_same_id_commits_once() {
    let ledger = Ledger::new();
    let contract = SupplyChainContract::new();

    let mut first = ledger.begin_at(t(1));
    let mut second = ledger.begin_at(t(1));

    contract
        .create_product(&mut first, "p1", "Laptop", "CompanyA", "", "")
        .unwrap();
    contract
        .create_product(&mut second, "p1", "Laptop", "CompanyZ", "", "")
        .unwrap();

    ledger.commit(first).unwrap();
    let err = ledger.commit(second).unwrap_err();
    assert!(err.is_conflict());

    let p = ledger
        .evaluate(|ctx| contract.query_product(ctx, "p1"))
        .unwrap();
    assert_eq!(p.owner, "CompanyA");
}

#[test]
fn concurrent_transfers_lose_no_update() {
    let ledger = Ledger::new();
    let contract = SupplyChainContract::new();
    ledger
        .submit_at(t(1), |ctx| contract.create_product(ctx, "p1", "Laptop", "A", "", ""))
        .unwrap();

    let mut to_b = ledger.begin_at(t(2));
    let mut to_c = ledger.begin_at(t(2));
    contract.transfer_ownership(&mut to_b, "p1", "B").unwrap();
    contract.transfer_ownership(&mut to_c, "p1", "C").unwrap();

    ledger.commit(to_c).unwrap();
    assert!(matches!(ledger.commit(to_b), Err(Error::Conflict { .. })));

    let p = ledger
        .evaluate(|ctx| contract.query_product(ctx, "p1"))
        .unwrap();
    assert_eq!(p.owner, "C");
}

#[test]
fn listing_conflicts_with_concurrent_create() {
    let ledger = Ledger::new();
    let contract = SupplyChainContract::new();
    ledger
        .submit(|ctx| contract.create_product(ctx, "p1", "Laptop", "A", "", ""))
        .unwrap();

    let mut lister = ledger.begin();
    assert_eq!(contract.list_all(&mut lister).unwrap().len(), 1);
    // Give the listing a write so its commit is meaningful
    contract
        .transfer_ownership(&mut lister, "p1", "Auditor")
        .unwrap();

    ledger
        .submit(|ctx| contract.create_product(ctx, "p2", "Phone", "A", "", ""))
        .unwrap();

    assert!(ledger.commit(lister).unwrap_err().is_conflict());
}

#[test]
fn reads_see_start_of_transaction_snapshot() {
    let ledger = Ledger::new();
    let contract = SupplyChainContract::new();

    let mut reader = ledger.begin();
    ledger
        .submit(|ctx| contract.create_product(ctx, "p1", "Laptop", "A", "", ""))
        .unwrap();

    assert!(!contract.product_exists(&mut reader, "p1").unwrap());
    assert!(contract.list_all(&mut reader).unwrap().is_empty());
}

#[test]
fn threads_creating_distinct_ids_all_commit() {
    let ledger = Ledger::new();
    let contract = Arc::new(SupplyChainContract::new());

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let ledger = ledger.clone();
            let contract = Arc::clone(&contract);
            thread::spawn(move || {
                for j in 0..25 {
                    let id = format!("t{}-{:02}", i, j);
                    ledger
                        .submit(|ctx| contract.create_product(ctx, &id, "Widget", "A", "", ""))
                        .unwrap();
                }
            })
        })
        .collect();
    for h in handles {
        h.join().unwrap();
    }

    let all = ledger.evaluate(|ctx| contract.list_all(ctx)).unwrap();
    assert_eq!(all.len(), 200);
    assert_eq!(ledger.open_scans(), 0);
}

#[test]
fn threads_racing_on_one_id_have_exactly_one_winner() {
    let ledger = Ledger::new();
    let contract = Arc::new(SupplyChainContract::new());
    let outcomes = Arc::new(Mutex::new(Vec::new()));

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let ledger = ledger.clone();
            let contract = Arc::clone(&contract);
            let outcomes = Arc::clone(&outcomes);
            thread::spawn(move || {
                let owner = format!("Company{}", i);
                let result =
                    ledger.submit(|ctx| contract.create_product(ctx, "hot", "Gpu", &owner, "", ""));
                outcomes.lock().push(result);
            })
        })
        .collect();
    for h in handles {
        h.join().unwrap();
    }

    let outcomes = outcomes.lock();
    let winners = outcomes.iter().filter(|r| r.is_ok()).count();
    assert_eq!(winners, 1);
    for loser in outcomes.iter().filter_map(|r| r.as_ref().err()) {
        assert!(loser.is_conflict() || loser.is_already_exists());
    }
}
