// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::fmt;

use rusqlite::Connection;
use tracing::info;

use crate::error::StoreError;

pub const DB_FILE: &str = "rasid.sqlite";

pub(crate) const COLLECTION_COUNT: usize = 4;

/// Version written to `PRAGMA user_version` once every upgrade step has run.
pub const SCHEMA_VERSION: i64 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Transactions,
    Budgets,
    Settings,
    Goals,
}

impl Collection {
    pub const ALL: [Collection; COLLECTION_COUNT] = [
        Collection::Transactions,
        Collection::Budgets,
        Collection::Settings,
        Collection::Goals,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Collection::Transactions => "transactions",
            Collection::Budgets => "budgets",
            Collection::Settings => "settings",
            Collection::Goals => "goals",
        }
    }

    /// Record field holding the primary key.
    pub fn key_path(self) -> &'static str {
        match self {
            Collection::Settings => "key",
            _ => "id",
        }
    }

    /// Non-unique secondary indexes, named after the field they cover.
    pub fn indexes(self) -> &'static [&'static str] {
        match self {
            Collection::Transactions => &["date", "type", "category"],
            Collection::Budgets => &["category"],
            Collection::Settings | Collection::Goals => &[],
        }
    }

    pub fn has_index(self, index: &str) -> bool {
        self.indexes().contains(&index)
    }

    pub(crate) fn slot(self) -> usize {
        match self {
            Collection::Transactions => 0,
            Collection::Budgets => 1,
            Collection::Settings => 2,
            Collection::Goals => 3,
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

struct UpgradeStep {
    version: i64,
    creates: &'static [Collection],
}

const UPGRADES: &[UpgradeStep] = &[
    UpgradeStep {
        version: 1,
        creates: &[Collection::Transactions, Collection::Budgets],
    },
    UpgradeStep {
        version: 2,
        creates: &[Collection::Settings],
    },
    UpgradeStep {
        version: 3,
        creates: &[Collection::Goals],
    },
];

fn create_collection_sql(collection: Collection) -> String {
    let name = collection.name();
    let mut sql = format!(
        "CREATE TABLE IF NOT EXISTS {name}(
            pk TEXT PRIMARY KEY,
            record TEXT NOT NULL
        );\n"
    );
    for index in collection.indexes() {
        sql.push_str(&format!(
            "CREATE INDEX IF NOT EXISTS idx_{name}_{index} ON {name}(json_extract(record, '$.{index}'));\n"
        ));
    }
    sql
}

pub(crate) fn stored_version(conn: &Connection) -> rusqlite::Result<i64> {
    conn.query_row("PRAGMA user_version", [], |r| r.get(0))
}

/// Brings the store up to [`SCHEMA_VERSION`], creating whatever collections
/// and indexes the stored version is missing. Returns the version found on disk.
pub(crate) fn upgrade(conn: &mut Connection) -> Result<i64, StoreError> {
    let unavailable = |e: rusqlite::Error| StoreError::StorageUnavailable(e.to_string());

    let current = stored_version(conn).map_err(unavailable)?;
    if current > SCHEMA_VERSION {
        return Err(StoreError::StorageUnavailable(format!(
            "store is at schema version {} but this build supports up to {}",
            current, SCHEMA_VERSION
        )));
    }
    if current == SCHEMA_VERSION {
        return Ok(current);
    }

    let tx = conn.transaction().map_err(unavailable)?;
    for step in UPGRADES.iter().filter(|s| s.version > current) {
        for collection in step.creates {
            tx.execute_batch(&create_collection_sql(*collection))
                .map_err(unavailable)?;
        }
    }
    tx.pragma_update(None, "user_version", SCHEMA_VERSION)
        .map_err(unavailable)?;
    tx.commit().map_err(unavailable)?;

    info!(from = current, to = SCHEMA_VERSION, "store schema upgraded");
    Ok(current)
}
