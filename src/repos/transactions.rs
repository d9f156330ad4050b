// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use serde_json::Value;
use tracing::debug;

use super::{decode_all, to_record};
use crate::aggregate::by_date;
use crate::db::Store;
use crate::error::StoreError;
use crate::models::{NewTransaction, Transaction, TransactionType};
use crate::schema::Collection;
use crate::utils::{new_id, now_iso, require_date, require_positive, require_text};

const COLLECTION: Collection = Collection::Transactions;

/// Transactions cached newest first. Edits are modelled as delete + add.
pub struct TransactionRepository {
    store: Store,
    cache: Vec<Transaction>,
}

fn newest_first(txns: &mut [Transaction]) {
    txns.sort_by(|a, b| by_date(b, a));
}

impl TransactionRepository {
    pub async fn load(store: Store) -> Result<Self, StoreError> {
        let mut cache: Vec<Transaction> = decode_all(COLLECTION, store.get_all(COLLECTION).await?)?;
        newest_first(&mut cache);
        Ok(Self { store, cache })
    }

    pub async fn reload(&mut self) -> Result<(), StoreError> {
        let mut cache: Vec<Transaction> =
            decode_all(COLLECTION, self.store.get_all(COLLECTION).await?)?;
        newest_first(&mut cache);
        self.cache = cache;
        Ok(())
    }

    pub fn all(&self) -> &[Transaction] {
        &self.cache
    }

    pub fn get(&self, id: &str) -> Option<&Transaction> {
        self.cache.iter().find(|t| t.id == id)
    }

    pub async fn add(&mut self, input: NewTransaction) -> Result<Transaction, StoreError> {
        let id = match input.id {
            Some(id) => require_text("id", &id)?,
            None => new_id(),
        };
        let date = match input.date {
            Some(d) => require_date("date", &d)?,
            None => now_iso(),
        };
        let txn = Transaction {
            id,
            r#type: input.r#type,
            amount: require_positive("amount", input.amount)?,
            category: require_text("category", &input.category)?,
            date,
            description: input
                .description
                .map(|d| d.trim().to_string())
                .filter(|d| !d.is_empty()),
        };

        self.store.add(COLLECTION, to_record(COLLECTION, &txn)?).await?;

        let at = self
            .cache
            .iter()
            .position(|t| by_date(&txn, t).is_ge())
            .unwrap_or(self.cache.len());
        self.cache.insert(at, txn.clone());
        debug!(id = %txn.id, kind = %txn.r#type, amount = %txn.amount, "transaction added");
        Ok(txn)
    }

    /// Returns whether a cached transaction was removed.
    pub async fn delete(&mut self, id: &str) -> Result<bool, StoreError> {
        self.store.delete(COLLECTION, id).await?;
        let before = self.cache.len();
        self.cache.retain(|t| t.id != id);
        Ok(self.cache.len() != before)
    }

    /// Exact-match lookup through the store's `category` index.
    pub async fn query_category(&self, category: &str) -> Result<Vec<Transaction>, StoreError> {
        let rows = self
            .store
            .get_by_index(COLLECTION, "category", &Value::String(category.to_string()))
            .await?;
        let mut txns: Vec<Transaction> = decode_all(COLLECTION, rows)?;
        newest_first(&mut txns);
        Ok(txns)
    }

    pub async fn query_type(&self, kind: TransactionType) -> Result<Vec<Transaction>, StoreError> {
        let rows = self
            .store
            .get_by_index(COLLECTION, "type", &Value::String(kind.as_str().to_string()))
            .await?;
        let mut txns: Vec<Transaction> = decode_all(COLLECTION, rows)?;
        newest_first(&mut txns);
        Ok(txns)
    }

    pub(crate) fn forget_all(&mut self) {
        self.cache.clear();
    }
}
