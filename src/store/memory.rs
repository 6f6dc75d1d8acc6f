//! In-process record store.
//!
//! Serves development runs without a remote store (optionally seeded from a
//! JSON fixture) and backs the test suites. It can be switched offline to
//! simulate a backend outage.

use std::collections::HashMap;
use std::path::Path;
use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::RwLock;

use super::{
    BatchResponse, FetchQuery, FetchResponse, Record, RecordResponse, RecordResult, RecordStore,
    ID_FIELD,
};
use crate::errors::AppError;

pub struct MemoryRecordStore {
    tables: RwLock<HashMap<String, Vec<Record>>>,
    next_id: AtomicI64,
    offline: AtomicBool,
}

impl Default for MemoryRecordStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryRecordStore {
    pub fn new() -> Self {
        Self {
            tables: RwLock::new(HashMap::new()),
            next_id: AtomicI64::new(1),
            offline: AtomicBool::new(false),
        }
    }

    /// Load a fixture of the form `{ "<table>": [record, ...], ... }`.
    pub async fn from_fixture_file(path: &Path) -> Result<Self, AppError> {
        let raw = tokio::fs::read_to_string(path).await.map_err(|e| {
            AppError::Config(format!("Cannot read fixture {}: {}", path.display(), e))
        })?;
        let fixture: HashMap<String, Vec<Record>> = serde_json::from_str(&raw)
            .map_err(|e| AppError::Config(format!("Invalid fixture {}: {}", path.display(), e)))?;

        let store = Self::new();
        for (table, records) in fixture {
            store.seed(&table, records).await;
        }
        Ok(store)
    }

    /// Insert records as-is, assigning ids to those without one.
    pub async fn seed(&self, table: &str, records: Vec<Record>) {
        let mut tables = self.tables.write().await;
        let rows = tables.entry(table.to_string()).or_default();
        for mut record in records {
            match record.get(ID_FIELD).and_then(super::value_id) {
                Some(id) => {
                    record.insert(ID_FIELD.to_string(), Value::from(id));
                    self.next_id.fetch_max(id + 1, Ordering::SeqCst);
                }
                None => {
                    record.insert(ID_FIELD.to_string(), Value::from(self.allocate_id()));
                }
            }
            rows.push(record);
        }
        tracing::debug!("Seeded table {} ({} records)", table, rows.len());
    }

    /// While offline every call fails with a transport error.
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    /// Number of records currently held in `table`.
    pub async fn len(&self, table: &str) -> usize {
        self.tables
            .read()
            .await
            .get(table)
            .map(Vec::len)
            .unwrap_or(0)
    }

    fn allocate_id(&self) -> i64 {
        self.next_id.fetch_add(1, Ordering::SeqCst)
    }

    fn ensure_online(&self) -> Result<(), AppError> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(AppError::Transport("Record store is offline".to_string()));
        }
        Ok(())
    }
}

fn record_id(record: &Record) -> Option<i64> {
    record.get(ID_FIELD).and_then(super::value_id)
}

fn project(record: &Record, fields: &[String]) -> Record {
    if fields.is_empty() {
        return record.clone();
    }
    record
        .iter()
        .filter(|(k, _)| k.as_str() == ID_FIELD || fields.iter().any(|f| f == *k))
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect()
}

#[async_trait]
impl RecordStore for MemoryRecordStore {
    async fn fetch_records(
        &self,
        table: &str,
        query: &FetchQuery,
    ) -> Result<FetchResponse, AppError> {
        self.ensure_online()?;
        let tables = self.tables.read().await;
        let data = tables
            .get(table)
            .map(|rows| {
                rows.iter()
                    .filter(|r| query.matches(r))
                    .map(|r| project(r, &query.fields))
                    .collect()
            })
            .unwrap_or_default();

        Ok(FetchResponse {
            success: true,
            message: None,
            data,
        })
    }

    async fn get_record_by_id(
        &self,
        table: &str,
        id: i64,
        fields: &[String],
    ) -> Result<RecordResponse, AppError> {
        self.ensure_online()?;
        let tables = self.tables.read().await;
        let found = tables
            .get(table)
            .and_then(|rows| rows.iter().find(|r| record_id(r) == Some(id)));

        Ok(match found {
            Some(record) => RecordResponse {
                success: true,
                message: None,
                data: Some(project(record, fields)),
            },
            None => RecordResponse {
                success: false,
                message: Some(format!("Record {} not found", id)),
                data: None,
            },
        })
    }

    async fn create_records(
        &self,
        table: &str,
        records: Vec<Record>,
    ) -> Result<BatchResponse, AppError> {
        self.ensure_online()?;
        let mut tables = self.tables.write().await;
        let rows = tables.entry(table.to_string()).or_default();

        let mut results = Vec::with_capacity(records.len());
        for mut record in records {
            record.insert(ID_FIELD.to_string(), Value::from(self.allocate_id()));
            rows.push(record.clone());
            results.push(RecordResult::ok(Some(record)));
        }

        Ok(BatchResponse {
            success: true,
            message: None,
            results,
        })
    }

    async fn update_records(
        &self,
        table: &str,
        records: Vec<Record>,
    ) -> Result<BatchResponse, AppError> {
        self.ensure_online()?;
        let mut tables = self.tables.write().await;
        let rows = tables.entry(table.to_string()).or_default();

        let mut results = Vec::with_capacity(records.len());
        for patch in records {
            let Some(id) = record_id(&patch) else {
                results.push(RecordResult::failed("Record Id is required"));
                continue;
            };
            match rows.iter_mut().find(|r| record_id(r) == Some(id)) {
                Some(existing) => {
                    for (field, value) in patch {
                        if field != ID_FIELD {
                            existing.insert(field, value);
                        }
                    }
                    results.push(RecordResult::ok(Some(existing.clone())));
                }
                None => results.push(RecordResult::failed(format!("Record {} not found", id))),
            }
        }

        Ok(BatchResponse {
            success: true,
            message: None,
            results,
        })
    }

    async fn delete_records(&self, table: &str, ids: &[i64]) -> Result<BatchResponse, AppError> {
        self.ensure_online()?;
        let mut tables = self.tables.write().await;
        let rows = tables.entry(table.to_string()).or_default();

        let results = ids
            .iter()
            .map(|&id| match rows.iter().position(|r| record_id(r) == Some(id)) {
                Some(index) => {
                    rows.remove(index);
                    RecordResult::ok(None)
                }
                None => RecordResult::failed(format!("Record {} not found", id)),
            })
            .collect();

        Ok(BatchResponse {
            success: true,
            message: None,
            results,
        })
    }
}
