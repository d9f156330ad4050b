// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use rasid::backup::{
    EXPORT_VERSION, backup_file_name, database_stats, export_data, export_transactions_csv,
    import_data, read_backup, write_backup,
};
use rasid::models::{NewGoal, NewTransaction, TransactionType};
use rasid::{Collection, Finance, Store, cli, commands::exporter};
use rust_decimal_macros::dec;
use serde_json::json;
use tempfile::tempdir;

async fn populated() -> Finance {
    let store = Store::open_in_memory().await.unwrap();
    let mut finance = Finance::load(store).await.unwrap();
    finance
        .add_transaction(
            NewTransaction::new(TransactionType::Income, dec!(1000), "Salary")
                .on("2025-01-05")
                .with_id("t1"),
        )
        .await
        .unwrap();
    finance
        .add_transaction(
            NewTransaction::new(TransactionType::Expense, dec!(12.5), "Food")
                .on("2025-01-02")
                .with_id("t2")
                .with_description("Bread, milk"),
        )
        .await
        .unwrap();
    finance.add_budget("Food", dec!(200)).await.unwrap();
    finance
        .add_goal(NewGoal {
            name: "Laptop".to_string(),
            target_amount: dec!(1500),
            target_date: Some("2025-12-01".to_string()),
        })
        .await
        .unwrap();
    finance.settings_mut().toggle_theme().await.unwrap();
    finance
}

#[test]
fn backup_file_is_named_after_the_day() {
    let day = NaiveDate::from_ymd_opt(2025, 3, 7).unwrap();
    assert_eq!(backup_file_name(day), "rasid-backup-2025-03-07.json");
}

#[tokio::test]
async fn export_carries_every_collection() {
    let finance = populated().await;
    let doc = export_data(finance.store()).await.unwrap();
    assert_eq!(doc.version, EXPORT_VERSION);
    assert!(!doc.export_date.is_empty());
    assert_eq!(doc.data.transactions.len(), 2);
    assert_eq!(doc.data.budgets.len(), 1);
    assert_eq!(doc.data.goals.len(), 1);
    assert_eq!(doc.data.settings, vec![json!({ "key": "theme", "value": "dark" })]);

    let value = serde_json::to_value(&doc).unwrap();
    assert!(value.get("exportDate").is_some());
    assert_eq!(value["data"]["goals"][0]["targetAmount"], json!(1500.0));
}

#[tokio::test]
async fn export_then_import_reproduces_the_store() {
    let finance = populated().await;
    let doc = serde_json::to_value(export_data(finance.store()).await.unwrap()).unwrap();

    let fresh = Store::open_in_memory().await.unwrap();
    let summary = import_data(&fresh, &doc, false).await.unwrap();
    assert_eq!(summary.transactions, 2);
    assert_eq!(summary.total(), 5);

    for c in Collection::ALL {
        assert_eq!(
            fresh.get_all(c).await.unwrap(),
            finance.store().get_all(c).await.unwrap(),
            "{} differs",
            c
        );
    }
}

#[tokio::test]
async fn backup_file_round_trip() {
    let finance = populated().await;
    let dir = tempdir().unwrap();
    let path = write_backup(finance.store(), dir.path()).await.unwrap();
    let name = path.file_name().unwrap().to_str().unwrap();
    assert!(name.starts_with("rasid-backup-") && name.ends_with(".json"));

    let doc = read_backup(&path).await.unwrap();
    assert_eq!(doc["version"], "1.0");
    assert_eq!(doc["data"]["transactions"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn export_json_command_writes_into_dir() {
    let finance = populated().await;
    let dir = tempdir().unwrap();
    let target = dir.path().join("backups");
    let matches = cli::build_cli().get_matches_from([
        "rasid",
        "export",
        "json",
        "--dir",
        target.to_str().unwrap(),
    ]);
    let (_, export_m) = matches.subcommand().unwrap();
    exporter::handle(&finance, export_m).await.unwrap();
    let written: Vec<_> = std::fs::read_dir(&target).unwrap().collect();
    assert_eq!(written.len(), 1);
}

#[tokio::test]
async fn csv_is_oldest_first_with_fixed_columns() {
    let finance = populated().await;
    let dir = tempdir().unwrap();
    let out = dir.path().join("tx.csv");
    let n = export_transactions_csv(finance.transactions(), &out).unwrap();
    assert_eq!(n, 2);

    let mut rdr = csv::Reader::from_path(&out).unwrap();
    let headers: Vec<String> = rdr.headers().unwrap().iter().map(String::from).collect();
    assert_eq!(
        headers,
        vec!["date", "type", "category", "amount", "description", "id"]
    );
    let rows: Vec<csv::StringRecord> = rdr.records().map(|r| r.unwrap()).collect();
    assert_eq!(&rows[0][0], "2025-01-02");
    assert_eq!(&rows[0][3], "12.50");
    assert_eq!(&rows[0][4], "Bread, milk");
    assert_eq!(&rows[1][5], "t1");
}

#[tokio::test]
async fn stats_reflect_store_contents() {
    let finance = populated().await;
    let stats = database_stats(finance.store()).await.unwrap();
    assert_eq!(stats.transaction_count, 2);
    assert_eq!(stats.budget_count, 1);
    assert_eq!(stats.goal_count, 1);
    assert_eq!(stats.balance, dec!(987.5));
    assert_eq!(stats.oldest_transaction.as_deref(), Some("2025-01-02"));
    assert_eq!(stats.newest_transaction.as_deref(), Some("2025-01-05"));

    let empty = database_stats(&Store::open_in_memory().await.unwrap())
        .await
        .unwrap();
    assert_eq!(empty.transaction_count, 0);
    assert!(empty.oldest_transaction.is_none());
}
