//! HTTP client for the remote record store.

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;

use super::{
    BatchResponse, DeletePayload, FetchQuery, FetchResponse, Record, RecordResponse, RecordStore,
    RecordsPayload,
};
use crate::errors::AppError;

/// Record store reached over JSON/HTTP.
#[derive(Debug, Clone)]
pub struct HttpRecordStore {
    client: Client,
    base_url: String,
    api_key: Option<String>,
}

impl HttpRecordStore {
    pub fn new(base_url: impl Into<String>, api_key: Option<String>) -> Result<Self, AppError> {
        let client = Client::builder().build()?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key,
        })
    }

    fn records_url(&self, table: &str) -> String {
        format!("{}/tables/{}/records", self.base_url, table)
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.api_key {
            Some(key) => request.bearer_auth(key),
            None => request,
        }
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, AppError> {
        let response = self.authorize(request).send().await?;
        let status = response.status();

        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            tracing::error!("Record store answered {}: {}", status, text);
            return Err(AppError::Transport(format!(
                "Record store answered {}",
                status
            )));
        }

        let body = response.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }
}

#[async_trait]
impl RecordStore for HttpRecordStore {
    async fn fetch_records(
        &self,
        table: &str,
        query: &FetchQuery,
    ) -> Result<FetchResponse, AppError> {
        let url = format!("{}/query", self.records_url(table));
        self.send(self.client.post(url).json(query)).await
    }

    async fn get_record_by_id(
        &self,
        table: &str,
        id: i64,
        fields: &[String],
    ) -> Result<RecordResponse, AppError> {
        let url = format!("{}/{}", self.records_url(table), id);
        let mut request = self.client.get(url);
        if !fields.is_empty() {
            request = request.query(&[("fields", fields.join(","))]);
        }

        let response = self.authorize(request).send().await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(RecordResponse {
                success: false,
                message: Some(format!("Record {} not found", id)),
                data: None,
            });
        }
        if !response.status().is_success() {
            return Err(AppError::Transport(format!(
                "Record store answered {}",
                response.status()
            )));
        }

        let body = response.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }

    async fn create_records(
        &self,
        table: &str,
        records: Vec<Record>,
    ) -> Result<BatchResponse, AppError> {
        let payload = RecordsPayload { records };
        self.send(self.client.post(self.records_url(table)).json(&payload))
            .await
    }

    async fn update_records(
        &self,
        table: &str,
        records: Vec<Record>,
    ) -> Result<BatchResponse, AppError> {
        let payload = RecordsPayload { records };
        self.send(self.client.patch(self.records_url(table)).json(&payload))
            .await
    }

    async fn delete_records(&self, table: &str, ids: &[i64]) -> Result<BatchResponse, AppError> {
        let payload = DeletePayload {
            record_ids: ids.to_vec(),
        };
        self.send(self.client.delete(self.records_url(table)).json(&payload))
            .await
    }
}
