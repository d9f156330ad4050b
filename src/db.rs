// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::path::Path;
use std::sync::{Arc, Mutex};

use rusqlite::types::Value as SqlValue;
use rusqlite::{Connection, OptionalExtension, params, params_from_iter};
use serde_json::Value;
use tokio::sync::{Mutex as WriteLock, MutexGuard};
use tracing::{debug, info};

use crate::error::StoreError;
use crate::schema::{self, COLLECTION_COUNT, Collection};

/// Handle to the local record store.
///
/// Records are JSON documents keyed by their collection's key path. Every
/// call suspends until SQLite has finished; the blocking work runs on the
/// tokio blocking pool. Writes to one collection are serialized through a
/// per-collection lock so concurrent writers never interleave.
#[derive(Clone)]
pub struct Store {
    inner: Arc<Inner>,
}

struct Inner {
    conn: Mutex<Connection>,
    write_locks: [WriteLock<()>; COLLECTION_COUNT],
}

/// A set of writes applied in a single SQLite transaction.
#[derive(Debug, Default)]
pub struct Batch {
    clear: Vec<Collection>,
    adds: Vec<(Collection, Value)>,
}

impl Batch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Empties `collection` before any record of the batch is added.
    pub fn clear(&mut self, collection: Collection) -> &mut Self {
        if !self.clear.contains(&collection) {
            self.clear.push(collection);
        }
        self
    }

    /// Queues an insert with `add` semantics (duplicate keys fail the batch).
    pub fn add(&mut self, collection: Collection, record: Value) -> &mut Self {
        self.adds.push((collection, record));
        self
    }

    pub fn len(&self) -> usize {
        self.adds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.adds.is_empty() && self.clear.is_empty()
    }
}

impl Store {
    /// Opens (creating if needed) the store file at `path` and upgrades its
    /// schema. Opening the same path twice is harmless.
    pub async fn open(path: impl AsRef<Path>) -> Result<Store, StoreError> {
        let path = path.as_ref().to_path_buf();
        let conn = tokio::task::spawn_blocking(move || {
            let mut conn = Connection::open(&path).map_err(|e| {
                StoreError::StorageUnavailable(format!("open {}: {}", path.display(), e))
            })?;
            conn.execute_batch("PRAGMA journal_mode=WAL;")
                .map_err(|e| StoreError::StorageUnavailable(e.to_string()))?;
            schema::upgrade(&mut conn)?;
            info!(path = %path.display(), "store opened");
            Ok::<_, StoreError>(conn)
        })
        .await
        .map_err(|e| StoreError::StorageUnavailable(e.to_string()))??;
        Ok(Self::from_connection(conn))
    }

    pub async fn open_in_memory() -> Result<Store, StoreError> {
        let mut conn = Connection::open_in_memory()
            .map_err(|e| StoreError::StorageUnavailable(e.to_string()))?;
        schema::upgrade(&mut conn)?;
        Ok(Self::from_connection(conn))
    }

    fn from_connection(conn: Connection) -> Store {
        Store {
            inner: Arc::new(Inner {
                conn: Mutex::new(conn),
                write_locks: std::array::from_fn(|_| WriteLock::new(())),
            }),
        }
    }

    async fn write_lock(&self, collection: Collection) -> MutexGuard<'_, ()> {
        self.inner.write_locks[collection.slot()].lock().await
    }

    async fn blocking<T, F>(&self, f: F) -> Result<T, StoreError>
    where
        F: FnOnce(&mut Connection) -> Result<T, StoreError> + Send + 'static,
        T: Send + 'static,
    {
        let inner = Arc::clone(&self.inner);
        tokio::task::spawn_blocking(move || {
            let mut conn = inner.conn.lock().map_err(|_| {
                StoreError::StorageUnavailable("store connection poisoned".to_string())
            })?;
            f(&mut *conn)
        })
        .await
        .map_err(|e| StoreError::StorageUnavailable(e.to_string()))?
    }

    /// Schema version recorded in the store.
    pub async fn version(&self) -> Result<i64, StoreError> {
        self.blocking(|conn| {
            schema::stored_version(conn).map_err(|e| StoreError::StorageUnavailable(e.to_string()))
        })
        .await
    }

    /// Names of the collections present in the store, sorted.
    pub async fn collection_names(&self) -> Result<Vec<String>, StoreError> {
        self.blocking(|conn| {
            let unavailable = |e: rusqlite::Error| StoreError::StorageUnavailable(e.to_string());
            let mut stmt = conn
                .prepare("SELECT name FROM sqlite_master WHERE type='table' ORDER BY name")
                .map_err(unavailable)?;
            let rows = stmt
                .query_map([], |r| r.get::<_, String>(0))
                .map_err(unavailable)?;
            let mut names = Vec::new();
            for row in rows {
                let name = row.map_err(unavailable)?;
                if Collection::ALL.iter().any(|c| c.name() == name) {
                    names.push(name);
                }
            }
            Ok(names)
        })
        .await
    }

    /// Inserts a new record and returns its primary key.
    pub async fn add(&self, collection: Collection, record: Value) -> Result<String, StoreError> {
        let key = primary_key(collection, &record)?;
        let body = encode(collection, "add", &record)?;
        let _guard = self.write_lock(collection).await;
        let k = key.clone();
        self.blocking(move |conn| insert(conn, collection, &k, &body))
            .await?;
        debug!(collection = %collection, key = %key, "record added");
        Ok(key)
    }

    /// Inserts or replaces the record with the same primary key.
    pub async fn update(&self, collection: Collection, record: Value) -> Result<(), StoreError> {
        let key = primary_key(collection, &record)?;
        let body = encode(collection, "update", &record)?;
        let _guard = self.write_lock(collection).await;
        let k = key.clone();
        self.blocking(move |conn| {
            conn.execute(
                &format!(
                    "INSERT INTO {}(pk, record) VALUES (?1, ?2)
                     ON CONFLICT(pk) DO UPDATE SET record=excluded.record",
                    collection.name()
                ),
                params![k, body],
            )
            .map_err(|e| StoreError::failed("update", collection, e))?;
            Ok(())
        })
        .await?;
        debug!(collection = %collection, key = %key, "record updated");
        Ok(())
    }

    /// Removes the record with `key`; absent keys are not an error.
    pub async fn delete(&self, collection: Collection, key: &str) -> Result<(), StoreError> {
        let _guard = self.write_lock(collection).await;
        let k = key.to_string();
        let removed = self
            .blocking(move |conn| {
                conn.execute(
                    &format!("DELETE FROM {} WHERE pk=?1", collection.name()),
                    params![k],
                )
                .map_err(|e| StoreError::failed("delete", collection, e))
            })
            .await?;
        debug!(collection = %collection, key = %key, removed, "record deleted");
        Ok(())
    }

    pub async fn get(&self, collection: Collection, key: &str) -> Result<Option<Value>, StoreError> {
        let k = key.to_string();
        self.blocking(move |conn| {
            let body: Option<String> = conn
                .query_row(
                    &format!("SELECT record FROM {} WHERE pk=?1", collection.name()),
                    params![k],
                    |r| r.get(0),
                )
                .optional()
                .map_err(|e| StoreError::failed("get", collection, e))?;
            body.map(|b| decode(collection, &b)).transpose()
        })
        .await
    }

    /// Every record of `collection`, in primary-key order.
    pub async fn get_all(&self, collection: Collection) -> Result<Vec<Value>, StoreError> {
        self.blocking(move |conn| {
            select_records(
                conn,
                collection,
                "getAll",
                &format!("SELECT record FROM {} ORDER BY pk", collection.name()),
                Vec::new(),
            )
        })
        .await
    }

    /// Records whose indexed field equals `value`, in primary-key order.
    pub async fn get_by_index(
        &self,
        collection: Collection,
        index: &str,
        value: &Value,
    ) -> Result<Vec<Value>, StoreError> {
        if !collection.has_index(index) {
            return Err(StoreError::UnknownIndex {
                collection,
                index: index.to_string(),
            });
        }
        let bound = match value {
            Value::String(s) => SqlValue::Text(s.clone()),
            Value::Bool(b) => SqlValue::Integer(i64::from(*b)),
            Value::Number(n) => match n.as_i64() {
                Some(i) => SqlValue::Integer(i),
                None => SqlValue::Real(n.as_f64().unwrap_or(f64::NAN)),
            },
            Value::Null => SqlValue::Null,
            other => {
                return Err(StoreError::failed(
                    "getByIndex",
                    collection,
                    format!("cannot look up '{}' by {}", index, other),
                ));
            }
        };
        let sql = format!(
            "SELECT record FROM {name} WHERE json_extract(record, '$.{index}') = ?1 ORDER BY pk",
            name = collection.name(),
        );
        self.blocking(move |conn| select_records(conn, collection, "getByIndex", &sql, vec![bound]))
            .await
    }

    pub async fn count(&self, collection: Collection) -> Result<usize, StoreError> {
        self.blocking(move |conn| {
            let n: i64 = conn
                .query_row(
                    &format!("SELECT COUNT(*) FROM {}", collection.name()),
                    [],
                    |r| r.get(0),
                )
                .map_err(|e| StoreError::failed("count", collection, e))?;
            Ok(n as usize)
        })
        .await
    }

    pub async fn clear(&self, collection: Collection) -> Result<(), StoreError> {
        let _guard = self.write_lock(collection).await;
        self.blocking(move |conn| {
            conn.execute(&format!("DELETE FROM {}", collection.name()), [])
                .map_err(|e| StoreError::failed("clear", collection, e))?;
            Ok(())
        })
        .await?;
        info!(collection = %collection, "collection cleared");
        Ok(())
    }

    /// Applies `batch` all-or-nothing. Returns the number of records added.
    pub async fn commit(&self, batch: Batch) -> Result<usize, StoreError> {
        let mut rows = Vec::with_capacity(batch.adds.len());
        for (collection, record) in &batch.adds {
            let key = primary_key(*collection, record)?;
            let body = encode(*collection, "add", record)?;
            rows.push((*collection, key, body));
        }

        // Locks are taken in slot order so two batches cannot deadlock.
        let mut guards = Vec::with_capacity(COLLECTION_COUNT);
        for collection in Collection::ALL {
            guards.push(self.write_lock(collection).await);
        }

        let clear = batch.clear;
        let added = self
            .blocking(move |conn| {
                let tx = conn
                    .transaction()
                    .map_err(|e| StoreError::failed("batch", Collection::Transactions, e))?;
                for collection in &clear {
                    tx.execute(&format!("DELETE FROM {}", collection.name()), [])
                        .map_err(|e| StoreError::failed("clear", *collection, e))?;
                }
                for (collection, key, body) in &rows {
                    insert(&tx, *collection, key, body)?;
                }
                tx.commit()
                    .map_err(|e| StoreError::failed("batch", Collection::Transactions, e))?;
                Ok(rows.len())
            })
            .await?;
        drop(guards);
        debug!(added, "batch committed");
        Ok(added)
    }
}

fn primary_key(collection: Collection, record: &Value) -> Result<String, StoreError> {
    match record.get(collection.key_path()) {
        Some(Value::String(s)) if !s.is_empty() => Ok(s.clone()),
        Some(Value::Number(n)) => Ok(n.to_string()),
        _ => Err(StoreError::MissingKey {
            collection,
            key_path: collection.key_path(),
        }),
    }
}

fn encode(collection: Collection, op: &'static str, record: &Value) -> Result<String, StoreError> {
    if !record.is_object() {
        return Err(StoreError::failed(op, collection, "record is not a JSON object"));
    }
    serde_json::to_string(record).map_err(|e| StoreError::failed(op, collection, e))
}

fn decode(collection: Collection, body: &str) -> Result<Value, StoreError> {
    serde_json::from_str(body).map_err(|e| StoreError::Corrupt {
        collection,
        reason: e.to_string(),
    })
}

fn insert(conn: &Connection, collection: Collection, key: &str, body: &str) -> Result<(), StoreError> {
    let changed = conn
        .execute(
            &format!(
                "INSERT OR IGNORE INTO {}(pk, record) VALUES (?1, ?2)",
                collection.name()
            ),
            params![key, body],
        )
        .map_err(|e| StoreError::failed("add", collection, e))?;
    if changed == 0 {
        return Err(StoreError::DuplicateKey {
            collection,
            key: key.to_string(),
        });
    }
    Ok(())
}

fn select_records(
    conn: &Connection,
    collection: Collection,
    op: &'static str,
    sql: &str,
    bound: Vec<SqlValue>,
) -> Result<Vec<Value>, StoreError> {
    let mut stmt = conn
        .prepare(sql)
        .map_err(|e| StoreError::failed(op, collection, e))?;
    let rows = stmt
        .query_map(params_from_iter(bound), |r| r.get::<_, String>(0))
        .map_err(|e| StoreError::failed(op, collection, e))?;
    let mut out = Vec::new();
    for row in rows {
        let body = row.map_err(|e| StoreError::failed(op, collection, e))?;
        out.push(decode(collection, &body)?);
    }
    Ok(out)
}
