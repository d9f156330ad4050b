// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use rust_decimal::Decimal;
use serde_json::Value;
use tracing::debug;

use super::{decode_all, to_record};
use crate::db::Store;
use crate::error::StoreError;
use crate::models::{Budget, BudgetPatch};
use crate::schema::Collection;
use crate::utils::{new_id, require_positive, require_text};

const COLLECTION: Collection = Collection::Budgets;

/// Budgets cached in category order. At most one budget per category
/// (ignoring case) can be created through this repository.
pub struct BudgetRepository {
    store: Store,
    cache: Vec<Budget>,
}

fn by_category(budgets: &mut [Budget]) {
    budgets.sort_by(|a, b| {
        a.category
            .to_lowercase()
            .cmp(&b.category.to_lowercase())
            .then_with(|| a.id.cmp(&b.id))
    });
}

impl BudgetRepository {
    pub async fn load(store: Store) -> Result<Self, StoreError> {
        let mut cache: Vec<Budget> = decode_all(COLLECTION, store.get_all(COLLECTION).await?)?;
        by_category(&mut cache);
        Ok(Self { store, cache })
    }

    pub async fn reload(&mut self) -> Result<(), StoreError> {
        let mut cache: Vec<Budget> =
            decode_all(COLLECTION, self.store.get_all(COLLECTION).await?)?;
        by_category(&mut cache);
        self.cache = cache;
        Ok(())
    }

    pub fn all(&self) -> &[Budget] {
        &self.cache
    }

    pub fn get(&self, id: &str) -> Option<&Budget> {
        self.cache.iter().find(|b| b.id == id)
    }

    /// The budget governing `category`, compared case-insensitively.
    pub fn for_category(&self, category: &str) -> Option<&Budget> {
        let wanted = category.to_lowercase();
        self.cache
            .iter()
            .find(|b| b.category.to_lowercase() == wanted)
    }

    fn ensure_category_free(&self, category: &str, except: Option<&str>) -> Result<(), StoreError> {
        let wanted = category.to_lowercase();
        let taken = self
            .cache
            .iter()
            .any(|b| b.category.to_lowercase() == wanted && Some(b.id.as_str()) != except);
        if taken {
            return Err(StoreError::DuplicateBudget(category.to_string()));
        }
        Ok(())
    }

    pub async fn add(&mut self, category: &str, limit: Decimal) -> Result<Budget, StoreError> {
        let budget = Budget {
            id: new_id(),
            category: require_text("category", category)?,
            limit: require_positive("limit", limit)?,
        };
        self.ensure_category_free(&budget.category, None)?;

        self.store.add(COLLECTION, to_record(COLLECTION, &budget)?).await?;

        self.cache.push(budget.clone());
        by_category(&mut self.cache);
        debug!(id = %budget.id, category = %budget.category, "budget added");
        Ok(budget)
    }

    /// Merges `patch` into the budget with `id`.
    pub async fn update(&mut self, id: &str, patch: BudgetPatch) -> Result<Budget, StoreError> {
        let current = self.get(id).ok_or_else(|| StoreError::NotFound {
            collection: COLLECTION,
            key: id.to_string(),
        })?;
        let mut next = current.clone();
        if let Some(category) = patch.category {
            next.category = require_text("category", &category)?;
            self.ensure_category_free(&next.category, Some(id))?;
        }
        if let Some(limit) = patch.limit {
            next.limit = require_positive("limit", limit)?;
        }

        self.store.update(COLLECTION, to_record(COLLECTION, &next)?).await?;

        if let Some(slot) = self.cache.iter_mut().find(|b| b.id == id) {
            *slot = next.clone();
        }
        by_category(&mut self.cache);
        Ok(next)
    }

    /// Stops tracking a category. Transactions are left alone.
    pub async fn delete(&mut self, id: &str) -> Result<bool, StoreError> {
        self.store.delete(COLLECTION, id).await?;
        let before = self.cache.len();
        self.cache.retain(|b| b.id != id);
        Ok(self.cache.len() != before)
    }

    /// Exact-match lookup through the store's `category` index.
    pub async fn query_category(&self, category: &str) -> Result<Vec<Budget>, StoreError> {
        let rows = self
            .store
            .get_by_index(COLLECTION, "category", &Value::String(category.to_string()))
            .await?;
        decode_all(COLLECTION, rows)
    }

    pub(crate) fn forget_all(&mut self) {
        self.cache.clear();
    }
}
