// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use rust_decimal::Decimal;
use tracing::debug;

use super::{decode_all, to_record};
use crate::db::Store;
use crate::error::StoreError;
use crate::models::{Goal, GoalPatch, NewGoal};
use crate::schema::Collection;
use crate::utils::{new_id, require_date, require_positive, require_text};

const COLLECTION: Collection = Collection::Goals;

pub struct GoalRepository {
    store: Store,
    cache: Vec<Goal>,
}

fn by_name(goals: &mut [Goal]) {
    goals.sort_by(|a, b| {
        a.name
            .to_lowercase()
            .cmp(&b.name.to_lowercase())
            .then_with(|| a.id.cmp(&b.id))
    });
}

fn optional_date(date: Option<String>) -> Result<Option<String>, StoreError> {
    match date {
        Some(d) if !d.trim().is_empty() => Ok(Some(require_date("targetDate", &d)?)),
        _ => Ok(None),
    }
}

impl GoalRepository {
    pub async fn load(store: Store) -> Result<Self, StoreError> {
        let mut cache: Vec<Goal> = decode_all(COLLECTION, store.get_all(COLLECTION).await?)?;
        by_name(&mut cache);
        Ok(Self { store, cache })
    }

    pub async fn reload(&mut self) -> Result<(), StoreError> {
        let mut cache: Vec<Goal> = decode_all(COLLECTION, self.store.get_all(COLLECTION).await?)?;
        by_name(&mut cache);
        self.cache = cache;
        Ok(())
    }

    pub fn all(&self) -> &[Goal] {
        &self.cache
    }

    pub fn get(&self, id: &str) -> Option<&Goal> {
        self.cache.iter().find(|g| g.id == id)
    }

    fn existing(&self, id: &str) -> Result<&Goal, StoreError> {
        self.get(id).ok_or_else(|| StoreError::NotFound {
            collection: COLLECTION,
            key: id.to_string(),
        })
    }

    pub async fn add(&mut self, input: NewGoal) -> Result<Goal, StoreError> {
        let goal = Goal {
            id: new_id(),
            name: require_text("name", &input.name)?,
            target_amount: require_positive("targetAmount", input.target_amount)?,
            target_date: optional_date(input.target_date)?,
            current_amount: Decimal::ZERO,
        };

        self.store.add(COLLECTION, to_record(COLLECTION, &goal)?).await?;

        self.cache.push(goal.clone());
        by_name(&mut self.cache);
        debug!(id = %goal.id, name = %goal.name, "goal added");
        Ok(goal)
    }

    pub async fn update(&mut self, id: &str, patch: GoalPatch) -> Result<Goal, StoreError> {
        let mut next = self.existing(id)?.clone();
        if let Some(name) = patch.name {
            next.name = require_text("name", &name)?;
        }
        if let Some(target) = patch.target_amount {
            next.target_amount = require_positive("targetAmount", target)?;
        }
        if let Some(date) = patch.target_date {
            next.target_date = optional_date(date)?;
        }
        if let Some(current) = patch.current_amount {
            if current < Decimal::ZERO {
                return Err(StoreError::invalid("currentAmount", "must not be negative"));
            }
            next.current_amount = current;
        }
        self.persist(next).await
    }

    pub async fn deposit(&mut self, id: &str, amount: Decimal) -> Result<Goal, StoreError> {
        let amount = require_positive("amount", amount)?;
        let next = self
            .existing(id)?
            .deposited(amount)
            .ok_or_else(|| StoreError::invalid("amount", "deposit would overflow the goal balance"))?;
        self.persist(next).await
    }

    /// Takes `amount` out of the goal; the balance stops at zero.
    pub async fn withdraw(&mut self, id: &str, amount: Decimal) -> Result<Goal, StoreError> {
        let amount = require_positive("amount", amount)?;
        let next = self.existing(id)?.withdrawn(amount);
        self.persist(next).await
    }

    async fn persist(&mut self, next: Goal) -> Result<Goal, StoreError> {
        self.store.update(COLLECTION, to_record(COLLECTION, &next)?).await?;
        if let Some(slot) = self.cache.iter_mut().find(|g| g.id == next.id) {
            *slot = next.clone();
        }
        by_name(&mut self.cache);
        Ok(next)
    }

    pub async fn delete(&mut self, id: &str) -> Result<bool, StoreError> {
        self.store.delete(COLLECTION, id).await?;
        let before = self.cache.len();
        self.cache.retain(|g| g.id != id);
        Ok(self.cache.len() != before)
    }

    pub(crate) fn forget_all(&mut self) {
        self.cache.clear();
    }
}
