// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use fintrack::commands::transactions;
use fintrack::error::{StoreError, ValidationError};
use fintrack::models::{TransactionType, UserId};
use fintrack::store::{SqliteStore, TransactionStore};
use fintrack::cli;
use rust_decimal_macros::dec;

fn owner() -> UserId {
    UserId::new("u1")
}

fn run(store: &mut SqliteStore, args: &[&str]) -> anyhow::Result<()> {
    let mut argv = vec!["fintrack"];
    argv.extend_from_slice(args);
    let matches = cli::build_cli().get_matches_from(argv);
    if let Some(("tx", tx_m)) = matches.subcommand() {
        transactions::handle(store, &owner(), tx_m)
    } else {
        panic!("no tx subcommand");
    }
}

fn setup() -> SqliteStore {
    let mut store = SqliteStore::open_in_memory().unwrap();
    for args in [
        ["tx", "add", "--amount", "12", "--category", "Food", "--date", "2024-02-01", "--note", "groceries"],
        ["tx", "add", "--amount", "3000", "--category", "Salary", "--date", "2024-01-31", "--type", "income"],
        ["tx", "add", "--amount", "45", "--category", "Shopping", "--date", "2024-02-03", "--note", "bought food"],
        ["tx", "add", "--amount", "45", "--category", "Transport", "--date", "2024-01-15", "--note", "train"],
    ] {
        run(&mut store, &args).unwrap();
    }
    store
}

#[test]
fn add_normalises_category_and_defaults() {
    let mut store = SqliteStore::open_in_memory().unwrap();
    run(&mut store, &["tx", "add", "--amount", "9.99", "--category", "healthcare"]).unwrap();
    run(&mut store, &["tx", "add", "-a", "1"]).unwrap();

    let snap = store.snapshot(&owner()).unwrap();
    assert_eq!(snap.len(), 2);
    assert_eq!(snap[0].category, "Healthcare");
    assert_eq!(snap[0].amount, dec!(9.99));
    assert_eq!(snap[1].category, "Food");
    assert_eq!(snap[1].kind, TransactionType::Expense);
    assert_eq!(snap[1].date, fintrack::utils::today());
}

#[test]
fn write_path_rejects_unknown_category() {
    let res = cli::build_cli().try_get_matches_from([
        "fintrack", "tx", "add", "--amount", "5", "--category", "Pets",
    ]);
    assert!(res.is_err());
}

#[test]
fn invalid_amount_never_reaches_store() {
    let mut store = SqliteStore::open_in_memory().unwrap();
    let err = run(&mut store, &["tx", "add", "--amount", "0", "--date", "2024-01-01"]).unwrap_err();
    assert_eq!(
        err.downcast_ref::<ValidationError>(),
        Some(&ValidationError::InvalidAmount("0".into()))
    );
    let err = run(&mut store, &["tx", "add", "--amount", "10", "--date", "01/02/2024"]).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<ValidationError>(),
        Some(ValidationError::InvalidDate(_))
    ));
    assert!(store.snapshot(&owner()).unwrap().is_empty());
}

#[test]
fn list_filters_searches_and_sorts() {
    let mut store = setup();
    let matches = cli::build_cli().get_matches_from([
        "fintrack", "tx", "list", "--type", "expense", "--search", "FOOD", "--sort", "amount",
    ]);
    if let Some(("tx", tx_m)) = matches.subcommand() {
        if let Some(("list", list_m)) = tx_m.subcommand() {
            let view = transactions::query_view(&mut store, &owner(), list_m).unwrap();
            let cats: Vec<&str> = view.rows.iter().map(|r| r.category.as_str()).collect();
            assert_eq!(cats, vec!["Shopping", "Food"]);
            assert_eq!(view.summary.count, 2);
            assert_eq!(view.summary.expense, dec!(57));
        } else {
            panic!("no list subcommand");
        }
    } else {
        panic!("no tx subcommand");
    }
}

#[test]
fn list_defaults_to_everything_newest_first() {
    let mut store = setup();
    let matches = cli::build_cli().get_matches_from(["fintrack", "tx", "list"]);
    let (_, tx_m) = matches.subcommand().unwrap();
    let (_, list_m) = tx_m.subcommand().unwrap();
    let view = transactions::query_view(&mut store, &owner(), list_m).unwrap();
    let dates: Vec<String> = view.rows.iter().map(|r| r.date.to_string()).collect();
    assert_eq!(dates, vec!["2024-02-03", "2024-02-01", "2024-01-31", "2024-01-15"]);
    assert_eq!(view.summary.income, dec!(3000));
    assert_eq!(view.summary.expense, dec!(102));
}

#[test]
fn edit_and_remove_by_id() {
    let mut store = setup();
    let id = store.snapshot(&owner()).unwrap()[0].id.to_string();

    run(&mut store, &["tx", "edit", &id, "--amount", "15", "--note", "weekly shop"]).unwrap();
    let rec = store.snapshot(&owner()).unwrap().remove(0);
    assert_eq!(rec.amount, dec!(15));
    assert_eq!(rec.notes, "weekly shop");
    assert_eq!(rec.category, "Food");

    assert!(run(&mut store, &["tx", "edit", &id]).is_err());

    run(&mut store, &["tx", "rm", &id]).unwrap();
    assert_eq!(store.snapshot(&owner()).unwrap().len(), 3);

    let err = run(&mut store, &["tx", "rm", &id]).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<StoreError>(),
        Some(StoreError::RecordNotFound(_))
    ));
}

#[test]
fn empty_listing_tells_no_data_from_no_match() {
    assert_eq!(transactions::empty_list_message(0), "No transactions yet");
    assert_eq!(transactions::empty_list_message(4), "No transactions match your filters");

    let mut empty = SqliteStore::open_in_memory().unwrap();
    run(&mut empty, &["tx", "list"]).unwrap();

    let mut store = setup();
    run(&mut store, &["tx", "list", "--search", "no such note"]).unwrap();
    let matches = cli::build_cli().get_matches_from(["fintrack", "tx", "list", "--search", "no such note"]);
    let (_, tx_m) = matches.subcommand().unwrap();
    let (_, list_m) = tx_m.subcommand().unwrap();
    assert!(transactions::query_view(&mut store, &owner(), list_m).unwrap().rows.is_empty());
}

#[test]
fn oversized_amount_is_rejected_before_storage() {
    let mut store = SqliteStore::open_in_memory().unwrap();
    let err = run(&mut store, &["tx", "add", "--amount", "50000000000000000000000000000"]).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<ValidationError>(),
        Some(ValidationError::InvalidAmount(_))
    ));
    assert!(store.snapshot(&owner()).unwrap().is_empty());
}
