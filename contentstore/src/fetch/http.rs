//! Remote content service client
//!
//! `GET <url>/api/content/app/?app_id=<key>&app_secret=<secret>` with a
//! per-request timeout. An `error` field in the response body, a non-success
//! status, or an empty row list all count as fetch failures.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use crate::error::FetchError;
use crate::store::{TemplateParam, TemplateRecord};

use super::RemoteSource;

/// One row from the remote content service
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentRow {
    #[serde(default)]
    pub id: Option<Value>,
    pub key: String,
    pub app_type: String,
    pub lang: String,
    #[serde(default)]
    pub template: String,
    #[serde(default)]
    pub data: RowData,
    #[serde(default)]
    pub created: Option<Value>,
}

/// Nested payload of a row; both fields default to empty
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RowData {
    #[serde(default)]
    pub params: Vec<TemplateParam>,
    #[serde(default)]
    pub suggestions: Vec<Value>,
}

impl ContentRow {
    /// Flatten into a store record, lower-casing the type and language
    pub fn into_record(self) -> TemplateRecord {
        TemplateRecord {
            id: self.id,
            key: self.key,
            app_type: self.app_type.to_lowercase(),
            locale: self.lang.to_lowercase(),
            template: self.template,
            params: self.data.params,
            suggestions: self.data.suggestions,
            created: self.created,
        }
    }
}

/// Response envelope of the content endpoint
#[derive(Debug, Deserialize)]
struct ContentResponse {
    #[serde(default)]
    data: Vec<ContentRow>,
    #[serde(default)]
    error: Option<Value>,
}

/// Parse a response body; an error field or an empty row list is a failure
fn parse_content_response(body: &str) -> Result<Vec<ContentRow>, FetchError> {
    let response: ContentResponse = serde_json::from_str(body)?;
    if let Some(error) = response.error {
        let message = match error {
            Value::String(message) => message,
            other => other.to_string(),
        };
        return Err(FetchError::Service(message));
    }
    if response.data.is_empty() {
        return Err(FetchError::NoRows);
    }
    Ok(response.data)
}

/// Production remote source backed by reqwest
pub struct HttpRemoteSource {
    url: String,
    app_key: String,
    app_secret: String,
    http: reqwest::Client,
    debug: bool,
}

impl HttpRemoteSource {
    pub fn new(
        url: impl Into<String>,
        app_key: impl Into<String>,
        app_secret: impl Into<String>,
        debug: bool,
    ) -> Result<Self, FetchError> {
        let http = reqwest::Client::builder().build().map_err(FetchError::Network)?;
        Ok(Self {
            url: url.into(),
            app_key: app_key.into(),
            app_secret: app_secret.into(),
            http,
            debug,
        })
    }
}

#[async_trait]
impl RemoteSource for HttpRemoteSource {
    async fn fetch_rows(&self, timeout: Duration) -> Result<Vec<ContentRow>, FetchError> {
        let started = Instant::now();
        let endpoint = format!("{}/api/content/app/", self.url);

        let result = async {
            let response = self
                .http
                .get(&endpoint)
                .query(&[("app_id", self.app_key.as_str()), ("app_secret", self.app_secret.as_str())])
                .timeout(timeout)
                .send()
                .await?;

            let status = response.status();
            if !status.is_success() {
                return Err(FetchError::Service(format!("status {}", status.as_u16())));
            }

            let body = response.text().await?;
            parse_content_response(&body)
        }
        .await;

        if self.debug {
            let elapsed_ms = started.elapsed().as_millis() as u64;
            match &result {
                Ok(rows) => debug!(elapsed_ms, rows = rows.len(), "fetch url done"),
                Err(error) => debug!(elapsed_ms, %error, "fetch url failed"),
            }
        }

        result
    }
}
