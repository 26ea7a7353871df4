//! Data Service HTTP Client
//!
//! reqwest client for the data service endpoints, behind the `DataSource`
//! trait so the dashboard pipeline can run against any backend.

use async_trait::async_trait;
use reqwest::{Client, Response};
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;

use crate::api::dto::{HealthResponse, MessageResponse, StatisticsRequest};
use crate::dataset::{Column, Summary};

/// Where the dashboard gets its data from
#[async_trait]
pub trait DataSource: Send + Sync {
    /// Raw `/data` payload; shape is validated by the caller
    async fn fetch_data(&self) -> Result<Value, ClientError>;

    /// `/statistics` for one column
    async fn fetch_statistics(&self, column: Column) -> Result<StatisticsReply, ClientError>;
}

/// What the statistics endpoint answered
#[derive(Debug, Clone, PartialEq)]
pub enum StatisticsReply {
    Summary(Summary),
    /// The server answered with an `error` message
    Error(String),
}

/// Client for the data service REST API
pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    /// Every call made by this client fails after `timeout`
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, ClientError> {
        let client = Client::builder().timeout(timeout).build()?;
        let base_url = base_url.into().trim_end_matches('/').to_string();

        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// GET / liveness probe
    pub async fn ping(&self) -> Result<MessageResponse, ClientError> {
        let response = self.client.get(self.url("/")).send().await.map_err(classify)?;
        let response = ensure_success(response).await?;
        Ok(response.json().await?)
    }

    /// GET /health
    pub async fn health(&self) -> Result<HealthResponse, ClientError> {
        let response = self
            .client
            .get(self.url("/health"))
            .send()
            .await
            .map_err(classify)?;
        let response = ensure_success(response).await?;
        Ok(response.json().await?)
    }

    /// POST /statistics with any column name; the server does the validation
    pub async fn statistics(&self, column: &str) -> Result<StatisticsReply, ClientError> {
        let body = StatisticsRequest {
            column: column.to_string(),
        };

        tracing::debug!(column, "Requesting statistics");

        let response = self
            .client
            .post(self.url("/statistics"))
            .json(&body)
            .send()
            .await
            .map_err(classify)?;

        let status = response.status();
        let text = response.text().await.map_err(classify)?;

        // Error bodies carry a plain `error` message whatever the status
        if let Ok(Value::Object(map)) = serde_json::from_str::<Value>(&text) {
            if let Some(Value::String(message)) = map.get("error") {
                return Ok(StatisticsReply::Error(message.clone()));
            }
        }

        if !status.is_success() {
            return Err(ClientError::Status {
                status: status.as_u16(),
                message: text,
            });
        }

        serde_json::from_str::<Summary>(&text)
            .map(StatisticsReply::Summary)
            .map_err(|e| ClientError::InvalidBody(e.to_string()))
    }
}

#[async_trait]
impl DataSource for ApiClient {
    async fn fetch_data(&self) -> Result<Value, ClientError> {
        let response = self
            .client
            .get(self.url("/data"))
            .send()
            .await
            .map_err(classify)?;
        let response = ensure_success(response).await?;

        response
            .json()
            .await
            .map_err(|e| ClientError::InvalidBody(e.to_string()))
    }

    async fn fetch_statistics(&self, column: Column) -> Result<StatisticsReply, ClientError> {
        self.statistics(column.as_str()).await
    }
}

/// Map a non-2xx response to an error carrying its body
async fn ensure_success(response: Response) -> Result<Response, ClientError> {
    if response.status().is_success() {
        return Ok(response);
    }

    let status = response.status();
    let text = response.text().await.unwrap_or_default();
    Err(ClientError::Status {
        status: status.as_u16(),
        message: text,
    })
}

fn classify(e: reqwest::Error) -> ClientError {
    if e.is_timeout() {
        ClientError::Timeout
    } else if e.is_connect() {
        ClientError::Unavailable(e.to_string())
    } else {
        ClientError::Request(e)
    }
}

/// Errors that can occur when talking to the data service
#[derive(Error, Debug)]
pub enum ClientError {
    #[error("Data service unavailable: {0}")]
    Unavailable(String),

    #[error("Request timeout")]
    Timeout,

    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("HTTP {status}: {message}")]
    Status { status: u16, message: String },

    #[error("Unexpected response body: {0}")]
    InvalidBody(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_normalized() {
        let client = ApiClient::new("http://localhost:8000/", Duration::from_secs(1)).unwrap();
        assert_eq!(client.base_url(), "http://localhost:8000");
        assert_eq!(client.url("/data"), "http://localhost:8000/data");
    }

    #[tokio::test]
    async fn test_unreachable_server_is_an_error() {
        // Port 9 (discard) is closed on test machines
        let client = ApiClient::new("http://127.0.0.1:9", Duration::from_secs(2)).unwrap();

        let err = client.fetch_data().await.unwrap_err();
        assert!(matches!(
            err,
            ClientError::Unavailable(_) | ClientError::Timeout | ClientError::Request(_)
        ));
    }
}
