// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use thiserror::Error;

use crate::schema::Collection;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage unavailable: {0}")]
    StorageUnavailable(String),
    #[error("record '{key}' already exists in {collection}")]
    DuplicateKey { collection: Collection, key: String },
    #[error("record in {collection} has no usable '{key_path}' key")]
    MissingKey {
        collection: Collection,
        key_path: &'static str,
    },
    #[error("{collection} has no index named '{index}'")]
    UnknownIndex { collection: Collection, index: String },
    #[error("{collection} record '{key}' not found")]
    NotFound { collection: Collection, key: String },
    #[error("a budget for category '{0}' already exists")]
    DuplicateBudget(String),
    #[error("invalid {field}: {reason}")]
    Validation { field: &'static str, reason: String },
    #[error("corrupt record in {collection}: {reason}")]
    Corrupt {
        collection: Collection,
        reason: String,
    },
    #[error("invalid import format: {0}")]
    InvalidImportFormat(String),
    #[error("{op} failed on {collection}: {reason}")]
    OperationFailed {
        op: &'static str,
        collection: Collection,
        reason: String,
    },
    #[error("legacy storage error: {0}")]
    Legacy(String),
    #[error("IO error: {0}")]
    IOError(#[from] std::io::Error),
}

impl StoreError {
    pub(crate) fn failed(op: &'static str, collection: Collection, e: impl ToString) -> Self {
        StoreError::OperationFailed {
            op,
            collection,
            reason: e.to_string(),
        }
    }

    pub(crate) fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        StoreError::Validation {
            field,
            reason: reason.into(),
        }
    }
}
