//! Elasticsearch HTTP client.
//!
//! # Responsibilities
//! - Resolve the endpoint from a cloud id or an explicit URL
//! - Authenticate with an API key
//! - Read cluster info, index documents, clean up probe documents
//! - Retry transient failures with jittered backoff

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use serde::Deserialize;
use serde_json::{json, Value};
use url::Url;

use crate::config::StoreConfig;
use crate::resilience::retries::{is_retryable, is_retryable_status};
use crate::resilience::RetryPolicy;
use crate::sink::cloud_id::decode_cloud_id;
use crate::sink::{DocumentSink, SinkError};

/// Identity reported by `GET /`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClusterInfo {
    pub cluster_name: String,
    pub version: String,
}

#[derive(Deserialize)]
struct InfoResponse {
    cluster_name: String,
    version: VersionResponse,
}

#[derive(Deserialize)]
struct VersionResponse {
    number: String,
}

/// Where and how to reach the store.
#[derive(Debug, Clone, Default)]
pub struct Credentials {
    pub cloud_id: Option<String>,
    pub endpoint: Option<String>,
    pub api_key: Option<String>,
}

impl Credentials {
    fn resolve(&self) -> Result<(Url, &str), SinkError> {
        let api_key = non_empty(&self.api_key).ok_or(SinkError::MissingCredentials)?;
        let base = match (non_empty(&self.cloud_id), non_empty(&self.endpoint)) {
            (Some(cloud_id), _) => decode_cloud_id(cloud_id)?,
            (None, Some(endpoint)) => {
                Url::parse(endpoint).map_err(|e| SinkError::InvalidEndpoint {
                    endpoint: endpoint.to_string(),
                    reason: e.to_string(),
                })?
            }
            (None, None) => return Err(SinkError::MissingCredentials),
        };
        Ok((base, api_key))
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

#[derive(Debug, Clone)]
pub struct ElasticsearchSink {
    client: reqwest::Client,
    base: Url,
    retry: RetryPolicy,
}

impl ElasticsearchSink {
    pub fn new(credentials: &Credentials, config: &StoreConfig) -> Result<Self, SinkError> {
        let (mut base, api_key) = credentials.resolve()?;
        // Paths join relative to the base, so a proxy prefix like `/elastic` survives.
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }

        let mut headers = HeaderMap::new();
        let mut auth = HeaderValue::from_str(&format!("ApiKey {}", api_key)).map_err(|_| {
            SinkError::InvalidEndpoint {
                endpoint: base.to_string(),
                reason: "api key contains invalid header characters".into(),
            }
        })?;
        auth.set_sensitive(true);
        headers.insert(AUTHORIZATION, auth);

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base,
            retry: RetryPolicy::from_config(config),
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    fn url(&self, path: &str) -> Result<Url, SinkError> {
        self.base.join(path.trim_start_matches('/')).map_err(|e| SinkError::InvalidEndpoint {
            endpoint: format!("{}{}", self.base, path),
            reason: e.to_string(),
        })
    }

    /// Send a request, retrying transient failures, and decode the JSON body.
    async fn send(&self, method: reqwest::Method, path: &str, body: Option<&Value>) -> Result<Value, SinkError> {
        let url = self.url(path)?;
        let mut attempt = 0;

        loop {
            let result = self.send_once(method.clone(), url.clone(), body).await;
            let error = match result {
                Ok(value) => return Ok(value),
                Err(e) => e,
            };

            attempt += 1;
            match self.retry.delay_for(attempt) {
                Some(delay) if is_retryable(&error) => {
                    tracing::debug!(
                        url = %url,
                        attempt,
                        delay_ms = delay.as_millis() as u64,
                        error = %error,
                        "Retrying store request"
                    );
                    tokio::time::sleep(delay).await;
                }
                _ => return Err(error),
            }
        }
    }

    async fn send_once(&self, method: reqwest::Method, url: Url, body: Option<&Value>) -> Result<Value, SinkError> {
        let mut request = self.client.request(method, url);
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            if !is_retryable_status(status) {
                tracing::debug!(status = %status, body = %body, "Store rejected request");
            }
            return Err(SinkError::Status { status, body });
        }

        response
            .json::<Value>()
            .await
            .map_err(|e| SinkError::Decode(e.to_string()))
    }

    /// `GET /`
    pub async fn info(&self) -> Result<ClusterInfo, SinkError> {
        let value = self.send(reqwest::Method::GET, "/", None).await?;
        let info: InfoResponse =
            serde_json::from_value(value).map_err(|e| SinkError::Decode(e.to_string()))?;
        Ok(ClusterInfo {
            cluster_name: info.cluster_name,
            version: info.version.number,
        })
    }

    /// `POST /{index}/_doc`
    pub async fn index(&self, index: &str, document: &Value) -> Result<(), SinkError> {
        self.send(reqwest::Method::POST, &format!("/{}/_doc", index), Some(document))
            .await
            .map(|_| ())
    }

    /// `POST /{index}/_delete_by_query`, returning the number of deleted documents.
    pub async fn delete_by_query(&self, index: &str, query: &Value) -> Result<u64, SinkError> {
        let body = json!({ "query": query });
        let value = self
            .send(reqwest::Method::POST, &format!("/{}/_delete_by_query", index), Some(&body))
            .await?;
        Ok(value.get("deleted").and_then(Value::as_u64).unwrap_or(0))
    }

    /// Write a probe document to `probe_index` and delete it again.
    pub async fn verify_write(&self, probe_index: &str) -> Result<(), SinkError> {
        let probe = json!({
            "@timestamp": "2024-01-01T00:00:00.000Z",
            "test": "connection_validation",
        });
        self.index(probe_index, &probe).await?;
        self.delete_by_query(probe_index, &json!({ "match": { "test": "connection_validation" } }))
            .await?;
        Ok(())
    }
}

#[async_trait]
impl DocumentSink for ElasticsearchSink {
    async fn write(&self, index: &str, document: &Value) -> Result<(), SinkError> {
        self.index(index, document).await
    }
}
