// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! One-time import of the flat key/value state written before the record
//! store existed.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Value, json};
use tracing::{info, warn};

use crate::db::Store;
use crate::error::StoreError;
use crate::models::{Budget, Transaction};
use crate::schema::Collection;

pub const LEGACY_TRANSACTIONS: &str = "finance_transactions";
pub const LEGACY_BUDGETS: &str = "finance_budgets";
pub const LEGACY_LANGUAGE: &str = "finance_language";
pub const LEGACY_THEME: &str = "theme";

pub const SETTING_LANGUAGE: &str = "language";
pub const SETTING_THEME: &str = "theme";

/// Flat string key/value storage from the pre-database releases.
pub trait LegacyStore {
    fn get_item(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn remove_item(&mut self, key: &str) -> Result<(), StoreError>;
}

#[derive(Debug, Default, Clone)]
pub struct MemoryLegacyStore {
    items: BTreeMap<String, String>,
}

impl MemoryLegacyStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_item(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.items.insert(key.into(), value.into());
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl LegacyStore for MemoryLegacyStore {
    fn get_item(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.items.get(key).cloned())
    }

    fn remove_item(&mut self, key: &str) -> Result<(), StoreError> {
        self.items.remove(key);
        Ok(())
    }
}

/// Legacy storage kept as a JSON object of string values in a single file.
/// A missing file is an empty store.
pub struct FileLegacyStore {
    path: PathBuf,
    items: BTreeMap<String, String>,
}

impl FileLegacyStore {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();
        if !path.exists() {
            return Ok(Self {
                path,
                items: BTreeMap::new(),
            });
        }
        let content = fs::read_to_string(&path)?;
        let items = serde_json::from_str(&content)
            .map_err(|e| StoreError::Legacy(format!("parsing {}: {}", path.display(), e)))?;
        Ok(Self { path, items })
    }

    fn save(&self) -> Result<(), StoreError> {
        if self.items.is_empty() {
            if self.path.exists() {
                fs::remove_file(&self.path)?;
            }
            return Ok(());
        }
        let json = serde_json::to_string_pretty(&self.items)
            .map_err(|e| StoreError::Legacy(e.to_string()))?;
        fs::write(&self.path, json)?;
        Ok(())
    }
}

impl LegacyStore for FileLegacyStore {
    fn get_item(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.items.get(key).cloned())
    }

    fn remove_item(&mut self, key: &str) -> Result<(), StoreError> {
        if self.items.remove(key).is_some() {
            self.save()?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MigrationReport {
    pub transactions: usize,
    pub budgets: usize,
    pub language: bool,
    pub theme: bool,
}

impl MigrationReport {
    pub fn is_noop(&self) -> bool {
        *self == MigrationReport::default()
    }
}

/// Moves legacy values into the store, one domain at a time. A domain is
/// only considered while its part of the store is empty, so running this
/// again after a successful pass changes nothing. Values that fail to parse
/// are left in legacy storage and skipped.
pub async fn migrate_legacy(
    store: &Store,
    legacy: &mut dyn LegacyStore,
) -> Result<MigrationReport, StoreError> {
    let mut report = MigrationReport::default();

    if store.count(Collection::Transactions).await? == 0 {
        report.transactions =
            migrate_list::<Transaction>(store, legacy, Collection::Transactions, LEGACY_TRANSACTIONS)
                .await?;
    }
    if store.count(Collection::Budgets).await? == 0 {
        report.budgets =
            migrate_list::<Budget>(store, legacy, Collection::Budgets, LEGACY_BUDGETS).await?;
    }
    report.language = migrate_setting(store, legacy, SETTING_LANGUAGE, LEGACY_LANGUAGE).await?;
    report.theme = migrate_setting(store, legacy, SETTING_THEME, LEGACY_THEME).await?;

    if !report.is_noop() {
        info!(
            transactions = report.transactions,
            budgets = report.budgets,
            language = report.language,
            theme = report.theme,
            "legacy data migrated"
        );
    }
    Ok(report)
}

async fn migrate_list<T>(
    store: &Store,
    legacy: &mut dyn LegacyStore,
    collection: Collection,
    legacy_key: &str,
) -> Result<usize, StoreError>
where
    T: DeserializeOwned + Serialize,
{
    let Some(raw) = legacy.get_item(legacy_key)? else {
        return Ok(0);
    };
    let records: Vec<T> = match serde_json::from_str(&raw) {
        Ok(records) => records,
        Err(e) => {
            warn!(key = legacy_key, error = %e, "skipping unreadable legacy value");
            return Ok(0);
        }
    };

    let mut written = 0;
    for record in &records {
        let value = serde_json::to_value(record)
            .map_err(|e| StoreError::failed("migrate", collection, e))?;
        store.update(collection, value).await?;
        written += 1;
    }
    legacy.remove_item(legacy_key)?;
    Ok(written)
}

async fn migrate_setting(
    store: &Store,
    legacy: &mut dyn LegacyStore,
    setting_key: &str,
    legacy_key: &str,
) -> Result<bool, StoreError> {
    if store.get(Collection::Settings, setting_key).await?.is_some() {
        return Ok(false);
    }
    let Some(raw) = legacy.get_item(legacy_key)? else {
        return Ok(false);
    };
    let value = raw.trim();
    if value.is_empty() {
        warn!(key = legacy_key, "skipping empty legacy value");
        return Ok(false);
    }
    store
        .update(
            Collection::Settings,
            json!({ "key": setting_key, "value": Value::String(value.to_string()) }),
        )
        .await?;
    legacy.remove_item(legacy_key)?;
    Ok(true)
}
