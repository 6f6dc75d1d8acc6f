//! Record store module.
//!
//! The remote record store is the source of truth for employees and
//! departments. It is reached through the [`RecordStore`] trait; everything
//! in this module above the trait works on raw wire records until
//! [`schema`] normalizes them.

mod client;
mod http;
mod memory;
pub mod schema;

pub use client::*;
pub use http::*;
pub use memory::*;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::errors::AppError;

/// A record in its wire shape.
pub type Record = Map<String, Value>;

/// Identity field present on every stored record.
pub const ID_FIELD: &str = "Id";

/// Comparison applied by a [`Condition`].
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Operator {
    /// Exact string equality
    EqualTo,
    /// Case-insensitive substring match
    Contains,
}

/// A single field predicate understood by the store.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Condition {
    pub field_name: String,
    pub operator: Operator,
    pub values: Vec<String>,
}

impl Condition {
    pub fn equal_to(field: &str, value: impl Into<String>) -> Self {
        Self {
            field_name: field.to_string(),
            operator: Operator::EqualTo,
            values: vec![value.into()],
        }
    }

    pub fn contains(field: &str, value: impl Into<String>) -> Self {
        Self {
            field_name: field.to_string(),
            operator: Operator::Contains,
            values: vec![value.into()],
        }
    }

    /// Evaluate against a record. Any of `values` may match.
    pub fn matches(&self, record: &Record) -> bool {
        let Some(actual) = record.get(&self.field_name).and_then(value_text) else {
            return false;
        };
        match self.operator {
            Operator::EqualTo => self.values.iter().any(|v| *v == actual),
            Operator::Contains => {
                let actual = actual.to_lowercase();
                self.values
                    .iter()
                    .any(|v| actual.contains(&v.to_lowercase()))
            }
        }
    }
}

/// How the conditions of a group combine.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum GroupOperator {
    And,
    Or,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ConditionGroup {
    pub operator: GroupOperator,
    pub conditions: Vec<Condition>,
}

impl ConditionGroup {
    pub fn any(conditions: Vec<Condition>) -> Self {
        Self {
            operator: GroupOperator::Or,
            conditions,
        }
    }

    pub fn matches(&self, record: &Record) -> bool {
        match self.operator {
            GroupOperator::And => self.conditions.iter().all(|c| c.matches(record)),
            GroupOperator::Or => self.conditions.iter().any(|c| c.matches(record)),
        }
    }
}

/// Body of a list request: projected fields plus filters.
///
/// Top-level conditions and groups are all required to match.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FetchQuery {
    #[serde(default)]
    pub fields: Vec<String>,
    #[serde(rename = "where", default)]
    pub conditions: Vec<Condition>,
    #[serde(default)]
    pub where_groups: Vec<ConditionGroup>,
}

impl FetchQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_condition(mut self, condition: Condition) -> Self {
        self.conditions.push(condition);
        self
    }

    pub fn with_group(mut self, group: ConditionGroup) -> Self {
        self.where_groups.push(group);
        self
    }

    pub fn matches(&self, record: &Record) -> bool {
        self.conditions.iter().all(|c| c.matches(record))
            && self.where_groups.iter().all(|g| g.matches(record))
    }
}

/// Response to a list request.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FetchResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default)]
    pub data: Vec<Record>,
}

/// Response to a get-by-id request.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RecordResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default)]
    pub data: Option<Record>,
}

/// Field-level rejection reported for one record of a batch.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FieldError {
    pub field_label: String,
    pub message: String,
}

/// Outcome for one record of a batch write.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RecordResult {
    #[serde(default)]
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Record>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<FieldError>,
}

impl RecordResult {
    pub fn ok(data: Option<Record>) -> Self {
        Self {
            success: true,
            data,
            ..Default::default()
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: Some(message.into()),
            ..Default::default()
        }
    }

    /// User-facing messages for a failed record, one per field error.
    pub fn failure_messages(&self) -> Vec<String> {
        if !self.errors.is_empty() {
            return self
                .errors
                .iter()
                .map(|e| format!("{}: {}", e.field_label, e.message))
                .collect();
        }
        vec![self
            .message
            .clone()
            .unwrap_or_else(|| "Unknown error".to_string())]
    }
}

/// Response to a create, update or delete batch.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BatchResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default)]
    pub results: Vec<RecordResult>,
}

/// Body of a create or update batch.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RecordsPayload {
    pub records: Vec<Record>,
}

/// Body of a delete batch.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DeletePayload {
    #[serde(rename = "RecordIds")]
    pub record_ids: Vec<i64>,
}

/// The four verbs of the remote record store, addressed by table name.
///
/// Implementations report transport problems as `Err`; a store that answered
/// but refused the request returns `Ok` with `success: false`.
#[async_trait]
pub trait RecordStore: Send + Sync {
    async fn fetch_records(&self, table: &str, query: &FetchQuery)
        -> Result<FetchResponse, AppError>;

    async fn get_record_by_id(
        &self,
        table: &str,
        id: i64,
        fields: &[String],
    ) -> Result<RecordResponse, AppError>;

    async fn create_records(
        &self,
        table: &str,
        records: Vec<Record>,
    ) -> Result<BatchResponse, AppError>;

    async fn update_records(
        &self,
        table: &str,
        records: Vec<Record>,
    ) -> Result<BatchResponse, AppError>;

    async fn delete_records(&self, table: &str, ids: &[i64]) -> Result<BatchResponse, AppError>;
}

/// Text form of a scalar wire value.
pub fn value_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Numeric identity of a wire value, accepting numeric strings.
pub fn value_id(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}
