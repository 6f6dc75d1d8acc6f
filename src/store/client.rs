//! Typed client over a [`RecordStore`] table.
//!
//! Bulk reads are fail-soft: a failed list degrades to empty data plus one
//! error notice. Single reads and writes propagate an [`AppError`].

use std::marker::PhantomData;
use std::sync::Arc;

use serde_json::Value;

use super::schema::Entity;
use super::{BatchResponse, FetchQuery, Record, RecordResult, RecordStore, ID_FIELD};
use crate::errors::AppError;
use crate::models::{Envelope, Notice};

pub struct RecordClient<E> {
    store: Arc<dyn RecordStore>,
    _entity: PhantomData<fn() -> E>,
}

impl<E: Entity> RecordClient<E> {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self {
            store,
            _entity: PhantomData,
        }
    }

    fn fields() -> Vec<String> {
        E::fields().iter().map(|f| f.to_string()).collect()
    }

    /// List records matching `query`. Never fails.
    pub async fn list(&self, mut query: FetchQuery) -> Envelope<Vec<E>> {
        if query.fields.is_empty() {
            query.fields = Self::fields();
        }

        let failure = match self.store.fetch_records(E::TABLE, &query).await {
            Ok(response) if response.success => {
                let total = response.data.len();
                let records: Vec<E> = response.data.iter().filter_map(E::from_record).collect();
                if records.len() < total {
                    tracing::warn!(
                        "Dropped {} {} records without a usable Id",
                        total - records.len(),
                        E::LABEL
                    );
                }
                return Envelope::new(records);
            }
            Ok(response) => response
                .message
                .unwrap_or_else(|| format!("Failed to load {} records", E::LABEL)),
            Err(e) => e.to_string(),
        };

        tracing::warn!("Listing {} records failed: {}", E::LABEL, failure);
        Envelope::new(Vec::new()).with_notice(Notice::error(failure))
    }

    pub async fn get_by_id(&self, id: i64) -> Result<Envelope<E>, AppError> {
        let response = self
            .store
            .get_record_by_id(E::TABLE, id, &Self::fields())
            .await?;

        let found = response.success;
        let record = response
            .data
            .filter(|_| found)
            .and_then(|r| E::from_record(&r));

        match record {
            Some(entity) => Ok(Envelope::new(entity)),
            None => {
                if let Some(message) = response.message {
                    tracing::debug!("Get {} {} failed: {}", E::LABEL, id, message);
                }
                Err(AppError::NotFound(format!(
                    "{} {} not found",
                    capitalize(E::LABEL),
                    id
                )))
            }
        }
    }

    /// Create one record from already whitelisted fields.
    pub async fn create(&self, fields: Record) -> Result<Envelope<E>, AppError> {
        let response = self.store.create_records(E::TABLE, vec![fields]).await?;
        let message = format!("Failed to create {}", E::LABEL);

        let written = self
            .first_success(response, "create")
            .map_err(|(message_override, details)| AppError::CreateFailed {
                message: message_override.unwrap_or(message),
                details,
            })?;

        match written.data {
            Some(entity) => Ok(Envelope {
                data: entity,
                notices: written.notices,
            }),
            // No id to read it back by.
            None => Err(AppError::Transport(format!(
                "{} was created but the record store did not return it",
                capitalize(E::LABEL)
            ))),
        }
    }

    /// Patch one record. Only the given fields change.
    pub async fn update(&self, id: i64, mut fields: Record) -> Result<Envelope<E>, AppError> {
        fields.insert(ID_FIELD.to_string(), Value::from(id));
        let response = self.store.update_records(E::TABLE, vec![fields]).await?;
        let message = format!("Failed to update {}", E::LABEL);

        let written = self
            .first_success(response, "update")
            .map_err(|(message_override, details)| AppError::UpdateFailed {
                message: message_override.unwrap_or(message),
                details,
            })?;

        match written.data {
            Some(entity) => Ok(Envelope {
                data: entity,
                notices: written.notices,
            }),
            None => {
                tracing::debug!(
                    "Update of {} {} returned no record, reading it back",
                    E::LABEL,
                    id
                );
                let mut envelope = self.get_by_id(id).await?;
                envelope.absorb(written.notices);
                Ok(envelope)
            }
        }
    }

    /// Delete every id it can; fails if any id could not be deleted. Once
    /// results are reported, an id without one counts as failed.
    pub async fn delete(&self, ids: &[i64]) -> Result<Envelope<Vec<i64>>, AppError> {
        let response = self.store.delete_records(E::TABLE, ids).await?;

        if !response.success {
            let message = response
                .message
                .unwrap_or_else(|| format!("Failed to delete {}", E::LABEL));
            tracing::error!("Delete {} {:?} rejected: {}", E::LABEL, ids, message);
            return Err(AppError::DeleteFailed {
                message,
                details: Vec::new(),
            });
        }

        // A store that accepts the batch without per-record results deleted all of it.
        if response.results.is_empty() {
            return Ok(Envelope::new(ids.to_vec()));
        }

        let mut deleted = Vec::new();
        let mut details = Vec::new();
        for (index, &id) in ids.iter().enumerate() {
            match response.results.get(index) {
                Some(result) if result.success => deleted.push(id),
                Some(result) => {
                    for message in result.failure_messages() {
                        tracing::error!("Delete {} {} failed: {}", E::LABEL, id, message);
                        details.push(message);
                    }
                }
                None => details.push(format!("No result reported for {} {}", E::LABEL, id)),
            }
        }

        if !details.is_empty() {
            return Err(AppError::DeleteFailed {
                message: format!(
                    "Failed to delete {} of {} {} records",
                    ids.len() - deleted.len(),
                    ids.len(),
                    E::LABEL
                ),
                details,
            });
        }

        Ok(Envelope::new(deleted))
    }

    /// Pick the first successful record of a write batch, turning the failed
    /// ones into notices. `data` is `None` when a record succeeded but the
    /// store sent back nothing decodable. `Err` carries an optional store
    /// message and the per-record failures when nothing succeeded.
    fn first_success(
        &self,
        response: BatchResponse,
        action: &str,
    ) -> Result<Envelope<Option<E>>, (Option<String>, Vec<String>)> {
        if !response.success {
            tracing::error!("{} {} rejected: {:?}", action, E::LABEL, response.message);
            return Err((response.message, Vec::new()));
        }

        let (succeeded, failed): (Vec<RecordResult>, Vec<RecordResult>) =
            response.results.into_iter().partition(|r| r.success);

        let failures: Vec<String> = failed
            .iter()
            .flat_map(RecordResult::failure_messages)
            .collect();
        for message in &failures {
            tracing::error!("Failed to {} {}: {}", action, E::LABEL, message);
        }

        if succeeded.is_empty() {
            return Err((None, failures));
        }

        let entity = succeeded
            .iter()
            .filter_map(|r| r.data.as_ref())
            .find_map(E::from_record);

        let mut envelope = Envelope::new(entity);
        envelope.absorb(failures.into_iter().map(Notice::error).collect());
        Ok(envelope)
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Employee, NoticeLevel};
    use crate::store::{FetchResponse, FieldError, MemoryRecordStore, RecordResponse};
    use async_trait::async_trait;
    use serde_json::json;

    /// Store that answers every write with a canned batch response.
    /// Reads find `stored` when set and are refused otherwise.
    struct ScriptedStore {
        batch: BatchResponse,
        stored: Option<Record>,
    }

    #[async_trait]
    impl RecordStore for ScriptedStore {
        async fn fetch_records(
            &self,
            _table: &str,
            _query: &FetchQuery,
        ) -> Result<FetchResponse, AppError> {
            Ok(FetchResponse {
                success: false,
                message: Some("Table is locked".to_string()),
                data: Vec::new(),
            })
        }

        async fn get_record_by_id(
            &self,
            _table: &str,
            _id: i64,
            _fields: &[String],
        ) -> Result<RecordResponse, AppError> {
            Ok(match &self.stored {
                Some(stored) => RecordResponse {
                    success: true,
                    message: None,
                    data: Some(stored.clone()),
                },
                None => RecordResponse {
                    success: false,
                    message: None,
                    data: Some(record(json!({ "Id": 1 }))),
                },
            })
        }

        async fn create_records(
            &self,
            _table: &str,
            _records: Vec<Record>,
        ) -> Result<BatchResponse, AppError> {
            Ok(self.batch.clone())
        }

        async fn update_records(
            &self,
            _table: &str,
            _records: Vec<Record>,
        ) -> Result<BatchResponse, AppError> {
            Ok(self.batch.clone())
        }

        async fn delete_records(
            &self,
            _table: &str,
            _ids: &[i64],
        ) -> Result<BatchResponse, AppError> {
            Ok(self.batch.clone())
        }
    }

    fn record(value: Value) -> Record {
        value.as_object().cloned().unwrap()
    }

    fn rejected(field: &str) -> RecordResult {
        RecordResult {
            success: false,
            errors: vec![FieldError {
                field_label: field.to_string(),
                message: "Invalid value".to_string(),
            }],
            ..Default::default()
        }
    }

    fn scripted(results: Vec<RecordResult>) -> RecordClient<Employee> {
        RecordClient::new(Arc::new(ScriptedStore {
            batch: BatchResponse {
                success: true,
                message: None,
                results,
            },
            stored: None,
        }))
    }

    #[tokio::test]
    async fn test_list_unsuccessful_result_degrades_to_empty() {
        let client = scripted(Vec::new());
        let envelope = client.list(FetchQuery::new()).await;

        assert!(envelope.data.is_empty());
        assert_eq!(envelope.notices, vec![Notice::error("Table is locked")]);
    }

    #[tokio::test]
    async fn test_list_transport_failure_degrades_to_empty() {
        let store = Arc::new(MemoryRecordStore::new());
        store.set_offline(true);
        let client: RecordClient<Employee> = RecordClient::new(store);

        let envelope = client.list(FetchQuery::new()).await;
        assert!(envelope.data.is_empty());
        assert_eq!(envelope.notices.len(), 1);
        assert_eq!(envelope.notices[0].level, NoticeLevel::Error);
    }

    #[tokio::test]
    async fn test_get_by_id_treats_unsuccessful_as_not_found() {
        let client = scripted(Vec::new());
        let err = client.get_by_id(1).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
        assert_eq!(err.to_string(), "Employee 1 not found");
    }

    #[tokio::test]
    async fn test_create_partial_failure_surfaces_notices() {
        let client = scripted(vec![
            RecordResult::ok(Some(record(json!({ "Id": 5, "first_name": "Ann" })))),
            rejected("email"),
            rejected("email"),
        ]);

        let envelope = client.create(Record::new()).await.unwrap();
        assert_eq!(envelope.data.id, 5);
        assert_eq!(envelope.notices, vec![Notice::error("email: Invalid value")]);
    }

    #[tokio::test]
    async fn test_create_with_zero_successes_fails() {
        let client = scripted(vec![rejected("email"), RecordResult::failed("Duplicate")]);

        let err = client.create(Record::new()).await.unwrap_err();
        match err {
            AppError::CreateFailed { message, details } => {
                assert_eq!(message, "Failed to create employee");
                assert_eq!(details, vec!["email: Invalid value", "Duplicate"]);
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_update_with_rejected_batch_fails() {
        let client: RecordClient<Employee> = RecordClient::new(Arc::new(ScriptedStore {
            batch: BatchResponse {
                success: false,
                message: Some("Quota exceeded".to_string()),
                results: Vec::new(),
            },
            stored: None,
        }));

        let err = client.update(3, Record::new()).await.unwrap_err();
        assert!(matches!(err, AppError::UpdateFailed { ref message, .. } if message == "Quota exceeded"));
    }

    #[tokio::test]
    async fn test_create_success_without_record_is_not_reported_as_failed() {
        let client = scripted(vec![RecordResult::ok(None)]);

        let err = client.create(Record::new()).await.unwrap_err();
        assert!(matches!(err, AppError::Transport(_)));
        assert_eq!(
            err.to_string(),
            "Employee was created but the record store did not return it"
        );
    }

    #[tokio::test]
    async fn test_update_success_without_record_reads_it_back() {
        let client: RecordClient<Employee> = RecordClient::new(Arc::new(ScriptedStore {
            batch: BatchResponse {
                success: true,
                message: None,
                results: vec![RecordResult::ok(None), rejected("phone")],
            },
            stored: Some(record(json!({ "Id": 3, "first_name": "Cy", "role": "Lead" }))),
        }));

        let envelope = client.update(3, Record::new()).await.unwrap();
        assert_eq!(envelope.data.id, 3);
        assert_eq!(envelope.data.role, "Lead");
        assert_eq!(envelope.notices, vec![Notice::error("phone: Invalid value")]);
    }

    #[tokio::test]
    async fn test_delete_reports_each_failure() {
        let client = scripted(vec![
            RecordResult::ok(None),
            RecordResult::failed("Record 8 not found"),
        ]);

        let err = client.delete(&[7, 8, 9]).await.unwrap_err();
        match err {
            AppError::DeleteFailed { message, details } => {
                assert_eq!(message, "Failed to delete 2 of 3 employee records");
                assert_eq!(details.len(), 2);
                assert_eq!(details[0], "Record 8 not found");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_delete_accepted_without_results_succeeds() {
        let client = scripted(Vec::new());

        let envelope = client.delete(&[7, 8]).await.unwrap();
        assert_eq!(envelope.data, vec![7, 8]);
        assert!(envelope.notices.is_empty());
    }

    #[tokio::test]
    async fn test_update_sends_numeric_id() {
        let store = Arc::new(MemoryRecordStore::new());
        store
            .seed("employee", vec![record(json!({ "Id": 4, "role": "Dev" }))])
            .await;
        let client: RecordClient<Employee> = RecordClient::new(store);

        let mut fields = Record::new();
        fields.insert("role".to_string(), json!("Lead"));
        let envelope = client.update(4, fields).await.unwrap();

        assert_eq!(envelope.data.role, "Lead");
        assert!(envelope.notices.is_empty());
    }

    #[test]
    fn test_capitalize() {
        assert_eq!(capitalize("department"), "Department");
        assert_eq!(capitalize(""), "");
    }
}
