//! Integration tests for ownership transfer.
//!
//! Covers the full pricing/eligibility matrix, verifies that every
//! rejection path leaves the world state byte-identical (full snapshot
//! comparison), and runs the settlement flow against the durable sled
//! backend to confirm both stores share one behavior.

use axle_ledger::{CompositeIndex, LedgerError, MemoryStore, SledStore};
use axle_registry::{AssetLedger, Car, Malfunction, Owner, CAR_INDEX};

fn owner(id: u64, money: u64) -> Owner {
    Owner {
        id,
        name: format!("name{id}"),
        surname: format!("surname{id}"),
        email: format!("owner{id}@example.com"),
        money,
    }
}

/// Helper: car 1 worth 5000 owned by owner 1, with an optional malfunction.
fn listed_car(malfunction_price: Option<u64>) -> Car {
    Car {
        id: 1,
        make: "Volvo".into(),
        model: "V60".into(),
        color: "blue".into(),
        owner: "1".into(),
        malfunctions: malfunction_price
            .map(|price| {
                vec![Malfunction {
                    description: "hail damage".into(),
                    price,
                }]
            })
            .unwrap_or_default(),
        price: 5000,
    }
}

fn seeded(car: Car, seller_money: u64, buyer_money: u64) -> MemoryStore {
    let store = MemoryStore::new();
    AssetLedger::new(&store)
        .init_ledger(&[car], &[owner(1, seller_money), owner(2, buyer_money)])
        .unwrap();
    store
}

// ---------------------------------------------------------------------------
// Pricing Matrix
// ---------------------------------------------------------------------------

#[test]
fn clean_car_sells_at_full_price() {
    let store = seeded(listed_car(None), 100, 5000);
    let ledger = AssetLedger::new(&store);

    let sold = ledger.transfer_ownership(1, 2, false).unwrap();
    assert_eq!(sold.owner, "2");

    assert_eq!(ledger.get_owner(2).unwrap().money, 0);
    assert_eq!(ledger.get_owner(1).unwrap().money, 5100);
}

#[test]
fn clean_car_underfunded_buyer_rejected() {
    let store = seeded(listed_car(None), 100, 4999);
    let ledger = AssetLedger::new(&store);
    let before = store.snapshot();

    let err = ledger.transfer_ownership(1, 2, true).unwrap_err();
    assert!(matches!(
        err,
        LedgerError::InsufficientFunds {
            available: 4999,
            required: 5000
        }
    ));
    assert_eq!(store.snapshot(), before);
}

#[test]
fn damaged_car_sells_at_discount_when_accepted() {
    // Value 5000, damage 1000, buyer holds exactly the net 4000.
    let store = seeded(listed_car(Some(1000)), 0, 4000);
    let ledger = AssetLedger::new(&store);

    let sold = ledger.transfer_ownership(1, 2, true).unwrap();
    assert_eq!(sold.owner, "2");
    assert_eq!(sold.malfunctions.len(), 1, "defects travel with the car");

    assert_eq!(ledger.get_owner(2).unwrap().money, 0);
    assert_eq!(ledger.get_owner(1).unwrap().money, 4000);

    // Ownership change must be visible through the index.
    let theirs = ledger.get_cars_by_color_and_owner("blue", 2).unwrap();
    assert_eq!(theirs.len(), 1);
    assert!(ledger
        .get_cars_by_color_and_owner("blue", 1)
        .unwrap()
        .is_empty());
}

#[test]
fn damaged_car_underfunded_buyer_rejected() {
    let store = seeded(listed_car(Some(1000)), 0, 3999);
    let ledger = AssetLedger::new(&store);
    let before = store.snapshot();

    let err = ledger.transfer_ownership(1, 2, true).unwrap_err();
    assert!(matches!(err, LedgerError::InsufficientFunds { .. }));
    assert_eq!(store.snapshot(), before);
}

#[test]
fn damaged_car_refused_when_not_accepted() {
    let store = seeded(listed_car(Some(1000)), 0, 10_000);
    let ledger = AssetLedger::new(&store);
    let before = store.snapshot();

    let err = ledger.transfer_ownership(1, 2, false).unwrap_err();
    assert!(matches!(err, LedgerError::MalfunctionsRejected));
    assert_eq!(
        store.snapshot(),
        before,
        "a refused transfer must change nothing at all"
    );
}

#[test]
fn missing_car_or_buyer_surface_not_found_before_mutation() {
    let store = seeded(listed_car(None), 0, 5000);
    let ledger = AssetLedger::new(&store);
    let before = store.snapshot();

    assert!(matches!(
        ledger.transfer_ownership(99, 2, false).unwrap_err(),
        LedgerError::NotFound { .. }
    ));
    assert!(matches!(
        ledger.transfer_ownership(1, 99, false).unwrap_err(),
        LedgerError::NotFound { .. }
    ));
    assert_eq!(store.snapshot(), before);
}

// ---------------------------------------------------------------------------
// Index Consistency
// ---------------------------------------------------------------------------

#[test]
fn transfer_swaps_exactly_one_index_entry() {
    let store = seeded(listed_car(None), 0, 5000);
    let ledger = AssetLedger::new(&store);

    ledger.transfer_ownership(1, 2, false).unwrap();

    let index = CompositeIndex::new(CAR_INDEX, 3);
    let triples: Vec<Vec<String>> = index
        .scan(&store, &[])
        .unwrap()
        .map(|entry| entry.unwrap())
        .collect();

    assert_eq!(
        triples,
        vec![vec!["blue".to_string(), "2".to_string(), "1".to_string()]]
    );
}

// ---------------------------------------------------------------------------
// Durable Backend
// ---------------------------------------------------------------------------

#[test]
fn settlement_persists_across_reopen_on_sled() {
    let dir = tempfile::tempdir().expect("tempdir");

    {
        let store = SledStore::open(dir.path()).unwrap();
        let ledger = AssetLedger::new(&store);
        ledger
            .init_ledger(
                &[listed_car(None)],
                &[owner(1, 0), owner(2, 5000)],
            )
            .unwrap();
        ledger.transfer_ownership(1, 2, false).unwrap();
        store.flush().unwrap();
    }

    let store = SledStore::open(dir.path()).unwrap();
    let ledger = AssetLedger::new(&store);

    assert_eq!(ledger.get_car(1).unwrap().owner, "2");
    assert_eq!(ledger.get_owner(1).unwrap().money, 5000);
    assert_eq!(ledger.get_owner(2).unwrap().money, 0);
    assert_eq!(ledger.get_cars_by_color_and_owner("blue", 2).unwrap().len(), 1);
}
