// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use rasid::migration::{
    FileLegacyStore, LEGACY_BUDGETS, LEGACY_LANGUAGE, LEGACY_THEME, LEGACY_TRANSACTIONS,
    LegacyStore, MemoryLegacyStore, migrate_legacy,
};
use rasid::models::{Language, Theme};
use rasid::{Collection, Finance, Store};
use rust_decimal_macros::dec;
use std::collections::BTreeMap;
use serde_json::json;
use tempfile::tempdir;

const TXNS: &str = r#"[
    {"id":"1","type":"income","amount":1000,"category":"Salary","date":"2024-05-01T08:00:00.000Z"},
    {"id":"2","type":"expense","amount":42.5,"category":"Food","date":"2024-05-03T12:30:00.000Z","description":"groceries"}
]"#;
const BUDGETS: &str = r#"[{"id":"b1","category":"Food","limit":300}]"#;

fn legacy_fixture() -> MemoryLegacyStore {
    let mut legacy = MemoryLegacyStore::new();
    legacy.set_item(LEGACY_TRANSACTIONS, TXNS);
    legacy.set_item(LEGACY_BUDGETS, BUDGETS);
    legacy.set_item(LEGACY_LANGUAGE, "ar");
    legacy.set_item(LEGACY_THEME, "dark");
    legacy
}

#[tokio::test]
async fn everything_moves_and_legacy_is_emptied() {
    let store = Store::open_in_memory().await.unwrap();
    let mut legacy = legacy_fixture();
    let report = migrate_legacy(&store, &mut legacy).await.unwrap();

    assert_eq!(report.transactions, 2);
    assert_eq!(report.budgets, 1);
    assert!(report.language && report.theme);
    assert!(legacy.is_empty());

    let finance = Finance::load(store).await.unwrap();
    assert_eq!(finance.summary().balance, dec!(957.5));
    assert_eq!(finance.budgets()[0].limit, dec!(300));
    assert_eq!(finance.settings().language(), Language::Ar);
    assert_eq!(finance.settings().theme(), Theme::Dark);
}

#[tokio::test]
async fn second_run_is_a_noop() {
    let store = Store::open_in_memory().await.unwrap();
    let mut legacy = legacy_fixture();
    migrate_legacy(&store, &mut legacy).await.unwrap();

    let mut again = legacy_fixture();
    let report = migrate_legacy(&store, &mut again).await.unwrap();
    assert!(report.is_noop());
    assert_eq!(store.count(Collection::Transactions).await.unwrap(), 2);
    // values that were not migrated stay where they were
    assert!(again.get_item(LEGACY_TRANSACTIONS).unwrap().is_some());
}

#[tokio::test]
async fn populated_domain_is_left_alone() {
    let store = Store::open_in_memory().await.unwrap();
    store
        .add(
            Collection::Transactions,
            json!({"id":"x","type":"expense","amount":1,"category":"Misc","date":"2024-01-01"}),
        )
        .await
        .unwrap();
    let mut legacy = legacy_fixture();
    let report = migrate_legacy(&store, &mut legacy).await.unwrap();
    assert_eq!(report.transactions, 0);
    assert_eq!(report.budgets, 1);
    assert_eq!(store.count(Collection::Transactions).await.unwrap(), 1);
    assert!(legacy.get_item(LEGACY_TRANSACTIONS).unwrap().is_some());
    assert!(legacy.get_item(LEGACY_BUDGETS).unwrap().is_none());
}

#[tokio::test]
async fn malformed_value_is_skipped_and_kept() {
    let store = Store::open_in_memory().await.unwrap();
    let mut legacy = MemoryLegacyStore::new();
    legacy.set_item(LEGACY_TRANSACTIONS, "{ broken");
    legacy.set_item(LEGACY_BUDGETS, BUDGETS);
    let report = migrate_legacy(&store, &mut legacy).await.unwrap();
    assert_eq!(report.transactions, 0);
    assert_eq!(report.budgets, 1);
    assert_eq!(
        legacy.get_item(LEGACY_TRANSACTIONS).unwrap().as_deref(),
        Some("{ broken")
    );
}

#[tokio::test]
async fn existing_setting_wins_over_legacy() {
    let store = Store::open_in_memory().await.unwrap();
    store
        .update(Collection::Settings, json!({ "key": "theme", "value": "light" }))
        .await
        .unwrap();
    let mut legacy = MemoryLegacyStore::new();
    legacy.set_item(LEGACY_THEME, "dark");
    let report = migrate_legacy(&store, &mut legacy).await.unwrap();
    assert!(!report.theme);
    let theme = store.get(Collection::Settings, "theme").await.unwrap().unwrap();
    assert_eq!(theme["value"], "light");
}

#[tokio::test]
async fn file_backed_legacy_store_is_removed_once_drained() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("legacy-storage.json");
    std::fs::write(
        &path,
        serde_json::to_string(&BTreeMap::from([
            (LEGACY_BUDGETS, BUDGETS),
            (LEGACY_LANGUAGE, "ar"),
        ]))
        .unwrap(),
    )
    .unwrap();

    let store = Store::open_in_memory().await.unwrap();
    let mut legacy = FileLegacyStore::load(&path).unwrap();
    let (finance, report) = Finance::start(store, &mut legacy).await.unwrap();
    assert_eq!(report.budgets, 1);
    assert!(report.language);
    assert_eq!(finance.budgets().len(), 1);
    assert!(!path.exists());

    let missing = FileLegacyStore::load(dir.path().join("absent.json")).unwrap();
    assert!(missing.get_item(LEGACY_THEME).unwrap().is_none());
}
