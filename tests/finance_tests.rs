// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::collections::HashMap;
use std::path::PathBuf;

use rasid::config::{Config, ENV_DATA_DIR, ENV_LOG, ENV_LOG_JSON};
use rasid::models::{GoalPatch, Language, NewGoal, NewTransaction, Theme, TransactionType};
use rasid::{Collection, Finance, Store, StoreError, cli, commands::settings};
use rust_decimal_macros::dec;
use serde_json::json;
use tempfile::tempdir;

fn goal(name: &str, target: rust_decimal::Decimal) -> NewGoal {
    NewGoal {
        name: name.to_string(),
        target_amount: target,
        target_date: None,
    }
}

#[tokio::test]
async fn goal_deposits_and_withdrawals() {
    let store = Store::open_in_memory().await.unwrap();
    let mut finance = Finance::load(store.clone()).await.unwrap();
    let g = finance.add_goal(goal("Laptop", dec!(1500))).await.unwrap();
    assert_eq!(g.current_amount, dec!(0));

    let g = finance.deposit_to_goal(&g.id, dec!(400)).await.unwrap();
    assert_eq!(g.current_amount, dec!(400));
    let g = finance.withdraw_from_goal(&g.id, dec!(600)).await.unwrap();
    assert_eq!(g.current_amount, dec!(0));

    let zero = finance.deposit_to_goal(&g.id, dec!(0)).await.unwrap_err();
    assert!(matches!(zero, StoreError::Validation { field: "amount", .. }));
    let missing = finance.deposit_to_goal("nope", dec!(5)).await.unwrap_err();
    assert!(matches!(missing, StoreError::NotFound { collection: Collection::Goals, .. }));

    let stored = store.get(Collection::Goals, &g.id).await.unwrap().unwrap();
    assert_eq!(stored["currentAmount"], json!(0.0));
}

#[tokio::test]
async fn goal_update_and_progress() {
    let store = Store::open_in_memory().await.unwrap();
    let mut finance = Finance::load(store).await.unwrap();
    let car = finance.add_goal(goal("Car", dec!(5000))).await.unwrap();
    finance.add_goal(goal("bike", dec!(800))).await.unwrap();

    let car = finance
        .update_goal(
            &car.id,
            GoalPatch {
                target_date: Some(Some("2026-06-01".to_string())),
                current_amount: Some(dec!(1250)),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(car.target_date.as_deref(), Some("2026-06-01"));

    let negative = finance
        .update_goal(
            &car.id,
            GoalPatch {
                current_amount: Some(dec!(-1)),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(negative, StoreError::Validation { .. }));

    let names: Vec<_> = finance.goals().iter().map(|g| g.name.as_str()).collect();
    assert_eq!(names, vec!["bike", "Car"]);
    let progress = finance.goal_progress();
    assert_eq!(progress[1].1.percentage, dec!(25));

    assert!(finance.delete_goal(&car.id).await.unwrap());
    assert_eq!(finance.goals().len(), 1);
}

#[tokio::test]
async fn goal_needs_name_and_target() {
    let store = Store::open_in_memory().await.unwrap();
    let mut finance = Finance::load(store).await.unwrap();
    let err = finance.add_goal(goal(" ", dec!(10))).await.unwrap_err();
    assert!(matches!(err, StoreError::Validation { field: "name", .. }));
    let err = finance.add_goal(goal("Trip", dec!(0))).await.unwrap_err();
    assert!(matches!(err, StoreError::Validation { .. }));
}

#[tokio::test]
async fn settings_default_and_toggle() {
    let store = Store::open_in_memory().await.unwrap();
    let mut finance = Finance::load(store.clone()).await.unwrap();
    assert_eq!(finance.settings().language(), Language::En);
    assert_eq!(finance.settings().theme(), Theme::Light);

    assert_eq!(finance.settings_mut().toggle_language().await.unwrap(), Language::Ar);
    assert_eq!(finance.settings_mut().toggle_theme().await.unwrap(), Theme::Dark);
    assert!(finance.settings().language().is_rtl());

    finance
        .settings_mut()
        .set("currency", json!("SAR"))
        .await
        .unwrap();
    let reloaded = Finance::load(store).await.unwrap();
    assert_eq!(reloaded.settings().language(), Language::Ar);
    assert_eq!(reloaded.settings().theme(), Theme::Dark);
    assert_eq!(reloaded.settings().get("currency"), Some(&json!("SAR")));
    assert_eq!(reloaded.settings().all().count(), 3);
}

#[tokio::test]
async fn settings_reset_restores_defaults() {
    let store = Store::open_in_memory().await.unwrap();
    let mut finance = Finance::load(store.clone()).await.unwrap();
    finance.settings_mut().toggle_language().await.unwrap();
    finance.settings_mut().toggle_theme().await.unwrap();
    finance
        .settings_mut()
        .set("currency", json!("SAR"))
        .await
        .unwrap();

    let matches = cli::build_cli().get_matches_from(["rasid", "settings", "reset"]);
    let (_, settings_m) = matches.subcommand().unwrap();
    settings::handle(&mut finance, settings_m).await.unwrap();
    assert_eq!(finance.settings().language(), Language::En);
    assert_eq!(finance.settings().theme(), Theme::Light);

    let matches = cli::build_cli().get_matches_from(["rasid", "settings", "unset", "currency"]);
    let (_, settings_m) = matches.subcommand().unwrap();
    settings::handle(&mut finance, settings_m).await.unwrap();
    assert_eq!(finance.settings().get("currency"), None);
    assert_eq!(store.count(Collection::Settings).await.unwrap(), 0);

    let reloaded = Finance::load(store).await.unwrap();
    assert_eq!(reloaded.settings().language(), Language::En);
    assert_eq!(reloaded.settings().all().count(), 0);
}

#[tokio::test]
async fn unknown_setting_value_falls_back() {
    let store = Store::open_in_memory().await.unwrap();
    store
        .update(Collection::Settings, json!({ "key": "language", "value": "fr" }))
        .await
        .unwrap();
    let finance = Finance::load(store).await.unwrap();
    assert_eq!(finance.settings().language(), Language::En);
}

#[tokio::test]
async fn clear_all_data_keeps_settings() {
    let store = Store::open_in_memory().await.unwrap();
    let mut finance = Finance::load(store.clone()).await.unwrap();
    finance
        .add_transaction(NewTransaction::new(TransactionType::Income, dec!(10), "Gift"))
        .await
        .unwrap();
    finance.add_budget("Food", dec!(100)).await.unwrap();
    finance.add_goal(goal("Trip", dec!(900))).await.unwrap();
    finance.settings_mut().toggle_theme().await.unwrap();

    finance.clear_all_data().await.unwrap();
    assert!(finance.transactions().is_empty());
    assert!(finance.budgets().is_empty());
    assert!(finance.goals().is_empty());
    for c in [Collection::Transactions, Collection::Budgets, Collection::Goals] {
        assert_eq!(store.count(c).await.unwrap(), 0);
    }
    assert_eq!(finance.settings().theme(), Theme::Dark);
    assert_eq!(store.count(Collection::Settings).await.unwrap(), 1);
}

#[tokio::test]
async fn corrupt_record_fails_loading() {
    let store = Store::open_in_memory().await.unwrap();
    store
        .add(
            Collection::Transactions,
            json!({ "id": "bad", "type": "expense", "amount": "lots", "category": "x", "date": "2025-01-01" }),
        )
        .await
        .unwrap();
    let err = Finance::load(store).await.err().unwrap();
    assert!(matches!(err, StoreError::Corrupt { collection: Collection::Transactions, .. }));
}

#[test]
fn config_reads_lookup() {
    let dir = tempdir().unwrap();
    let env: HashMap<&str, String> = HashMap::from([
        (ENV_DATA_DIR, dir.path().join("data").display().to_string()),
        (ENV_LOG, "rasid=debug".to_string()),
        (ENV_LOG_JSON, "true".to_string()),
    ]);
    let config = Config::from_lookup(|k| env.get(k).cloned()).unwrap();
    assert_eq!(config.data_dir, dir.path().join("data"));
    assert_eq!(config.log_filter, "rasid=debug");
    assert!(config.log_json);

    let db = config.db_path().unwrap();
    assert_eq!(db, dir.path().join("data").join("rasid.sqlite"));
    assert!(dir.path().join("data").is_dir());
    assert_eq!(
        config.legacy_path(),
        dir.path().join("data").join("legacy-storage.json")
    );
}

#[test]
fn config_defaults() {
    let config = Config::from_lookup(|k| {
        (k == ENV_DATA_DIR).then(|| "/tmp/rasid-test".to_string())
    })
    .unwrap();
    assert_eq!(config.data_dir, PathBuf::from("/tmp/rasid-test"));
    assert_eq!(config.log_filter, "info");
    assert!(!config.log_json);
}
