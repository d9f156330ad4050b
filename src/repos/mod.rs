// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

pub mod budgets;
pub mod goals;
pub mod settings;
pub mod transactions;

pub use budgets::BudgetRepository;
pub use goals::GoalRepository;
pub use settings::SettingsRepository;
pub use transactions::TransactionRepository;

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::StoreError;
use crate::schema::Collection;

pub(crate) fn decode_all<T: DeserializeOwned>(
    collection: Collection,
    rows: Vec<Value>,
) -> Result<Vec<T>, StoreError> {
    rows.into_iter()
        .map(|row| {
            serde_json::from_value(row).map_err(|e| StoreError::Corrupt {
                collection,
                reason: e.to_string(),
            })
        })
        .collect()
}

pub(crate) fn to_record<T: Serialize>(collection: Collection, v: &T) -> Result<Value, StoreError> {
    serde_json::to_value(v).map_err(|e| StoreError::failed("encode", collection, e))
}
