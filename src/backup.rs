// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::path::{Path, PathBuf};

use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::info;

use crate::aggregate::{date_range, sorted, summary, SortOrder};
use crate::db::{Batch, Store};
use crate::error::StoreError;
use crate::models::{Budget, Goal, Setting, Transaction};
use crate::repos::decode_all;
use crate::schema::Collection;
use crate::utils::{fmt_money, now_iso, require_date};

pub const EXPORT_VERSION: &str = "1.0";

/// Collections carried by a backup, in the order they are written.
const BACKED_UP: [Collection; 4] = [
    Collection::Transactions,
    Collection::Budgets,
    Collection::Settings,
    Collection::Goals,
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportDocument {
    pub version: String,
    pub export_date: String,
    pub data: ExportData,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExportData {
    #[serde(default)]
    pub transactions: Vec<Value>,
    #[serde(default)]
    pub budgets: Vec<Value>,
    #[serde(default)]
    pub settings: Vec<Value>,
    #[serde(default)]
    pub goals: Vec<Value>,
}

impl ExportData {
    fn records_mut(&mut self, collection: Collection) -> &mut Vec<Value> {
        match collection {
            Collection::Transactions => &mut self.transactions,
            Collection::Budgets => &mut self.budgets,
            Collection::Settings => &mut self.settings,
            Collection::Goals => &mut self.goals,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ImportSummary {
    pub transactions: usize,
    pub budgets: usize,
    pub settings: usize,
    pub goals: usize,
}

impl ImportSummary {
    fn bump(&mut self, collection: Collection) {
        match collection {
            Collection::Transactions => self.transactions += 1,
            Collection::Budgets => self.budgets += 1,
            Collection::Settings => self.settings += 1,
            Collection::Goals => self.goals += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.transactions + self.budgets + self.settings + self.goals
    }
}

/// Snapshot of every backed-up collection, records untouched.
pub async fn export_data(store: &Store) -> Result<ExportDocument, StoreError> {
    let mut data = ExportData::default();
    for collection in BACKED_UP {
        *data.records_mut(collection) = store.get_all(collection).await?;
    }
    info!(
        transactions = data.transactions.len(),
        budgets = data.budgets.len(),
        settings = data.settings.len(),
        goals = data.goals.len(),
        "data exported"
    );
    Ok(ExportDocument {
        version: EXPORT_VERSION.to_string(),
        export_date: now_iso(),
        data,
    })
}

/// Rejects records the repositories would fail to load back.
fn check_records(collection: Collection, records: &[Value]) -> Result<(), StoreError> {
    let rows = records.to_vec();
    match collection {
        Collection::Transactions => {
            for t in decode_all::<Transaction>(collection, rows)? {
                require_date("date", &t.date)?;
            }
        }
        Collection::Budgets => {
            decode_all::<Budget>(collection, rows)?;
        }
        Collection::Settings => {
            decode_all::<Setting>(collection, rows)?;
        }
        Collection::Goals => {
            decode_all::<Goal>(collection, rows)?;
        }
    }
    Ok(())
}

/// Loads a backup document. A missing or non-array section counts as empty.
/// Every record must read back as its typed model before anything is
/// written, and the writes happen in one transaction, so a rejected import
/// leaves the store exactly as it was.
pub async fn import_data(
    store: &Store,
    doc: &Value,
    clear_existing: bool,
) -> Result<ImportSummary, StoreError> {
    let Some(data) = doc.get("data").filter(|d| d.is_object()) else {
        return Err(StoreError::InvalidImportFormat(
            "document has no 'data' section".to_string(),
        ));
    };

    let mut batch = Batch::new();
    let mut summary = ImportSummary::default();
    for collection in BACKED_UP {
        if clear_existing {
            batch.clear(collection);
        }
        let records = data
            .get(collection.name())
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or_default();
        check_records(collection, records)?;
        for record in records {
            batch.add(collection, record.clone());
            summary.bump(collection);
        }
    }

    store.commit(batch).await?;
    info!(records = summary.total(), clear_existing, "data imported");
    Ok(summary)
}

pub fn backup_file_name(date: NaiveDate) -> String {
    format!("rasid-backup-{}.json", date.format("%Y-%m-%d"))
}

/// Writes a pretty-printed backup named after today's date into `dir`.
pub async fn write_backup(store: &Store, dir: &Path) -> Result<PathBuf, StoreError> {
    let doc = export_data(store).await?;
    let json = serde_json::to_string_pretty(&doc)
        .map_err(|e| StoreError::failed("export", Collection::Transactions, e))?;
    tokio::fs::create_dir_all(dir).await?;
    let path = dir.join(backup_file_name(Utc::now().date_naive()));
    tokio::fs::write(&path, json).await?;
    info!(path = %path.display(), "backup written");
    Ok(path)
}

pub async fn read_backup(path: &Path) -> Result<Value, StoreError> {
    let content = tokio::fs::read_to_string(path).await?;
    serde_json::from_str(&content)
        .map_err(|e| StoreError::InvalidImportFormat(format!("{}: {}", path.display(), e)))
}

pub async fn import_from_file(
    store: &Store,
    path: &Path,
    clear_existing: bool,
) -> Result<ImportSummary, StoreError> {
    let doc = read_backup(path).await?;
    import_data(store, &doc, clear_existing).await
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DatabaseStats {
    pub transaction_count: usize,
    pub budget_count: usize,
    pub goal_count: usize,
    pub total_income: Decimal,
    pub total_expenses: Decimal,
    pub balance: Decimal,
    pub oldest_transaction: Option<String>,
    pub newest_transaction: Option<String>,
}

/// Counts and totals read straight from the store.
pub async fn database_stats(store: &Store) -> Result<DatabaseStats, StoreError> {
    let txns: Vec<Transaction> = decode_all(
        Collection::Transactions,
        store.get_all(Collection::Transactions).await?,
    )?;
    let totals = summary(&txns);
    let range = date_range(&txns);
    Ok(DatabaseStats {
        transaction_count: txns.len(),
        budget_count: store.count(Collection::Budgets).await?,
        goal_count: store.count(Collection::Goals).await?,
        total_income: totals.income,
        total_expenses: totals.expenses,
        balance: totals.balance,
        oldest_transaction: range.as_ref().map(|(oldest, _)| oldest.clone()),
        newest_transaction: range.map(|(_, newest)| newest),
    })
}

/// Writes transactions as CSV, oldest first. Returns the number of rows.
pub fn export_transactions_csv(txns: &[Transaction], out: &Path) -> Result<usize, StoreError> {
    let fail = |e: csv::Error| StoreError::failed("export", Collection::Transactions, e);
    let mut wtr = csv::Writer::from_path(out).map_err(fail)?;
    wtr.write_record(["date", "type", "category", "amount", "description", "id"])
        .map_err(fail)?;
    let rows = sorted(txns, SortOrder::DateAsc);
    for t in &rows {
        wtr.write_record([
            t.date.as_str(),
            t.r#type.as_str(),
            t.category.as_str(),
            fmt_money(&t.amount).as_str(),
            t.description.as_deref().unwrap_or_default(),
            t.id.as_str(),
        ])
        .map_err(fail)?;
    }
    wtr.flush()?;
    Ok(rows.len())
}
