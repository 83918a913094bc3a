//! HTTP backend abstraction.
//!
//! The production implementation uses reqwest. Only GET requests are
//! retried; synthesis and mixing create files server-side on every call.

use crate::config::TtsClientConfig;
use crate::error::{ClientError, ClientResult};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use std::time::Duration;
use url::Url;

// ============================================================================
// Request / response payloads
// ============================================================================

/// File part of a multipart form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilePart {
    pub field: &'static str,
    pub filename: String,
    pub bytes: Vec<u8>,
}

/// Transport-neutral multipart form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormPayload {
    pub fields: Vec<(&'static str, String)>,
    pub file: Option<FilePart>,
}

impl FormPayload {
    /// Append a text field.
    #[must_use]
    pub fn text(mut self, name: &'static str, value: impl Into<String>) -> Self {
        self.fields.push((name, value.into()));
        self
    }

    /// Attach a file part.
    #[must_use]
    pub fn file(mut self, field: &'static str, filename: impl Into<String>, bytes: Vec<u8>) -> Self {
        self.file = Some(FilePart {
            field,
            filename: filename.into(),
            bytes,
        });
        self
    }

    /// Value of the first text field named `name`.
    #[cfg(test)]
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(k, _)| *k == name)
            .map(|(_, v)| v.as_str())
    }

    fn into_reqwest(self) -> reqwest::multipart::Form {
        let mut form = reqwest::multipart::Form::new();
        for (name, value) in self.fields {
            form = form.text(name, value);
        }
        if let Some(file) = self.file {
            let part = reqwest::multipart::Part::bytes(file.bytes).file_name(file.filename);
            form = form.part(file.field, part);
        }
        form
    }
}

/// Body of a successful GET.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fetched {
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

impl Fetched {
    /// Whether the server answered with JSON instead of a file.
    pub fn is_json(&self) -> bool {
        self.content_type
            .as_deref()
            .is_some_and(|ct| ct.starts_with("application/json"))
    }
}

// ============================================================================
// HTTP Backend Trait
// ============================================================================

/// Trait for HTTP backends.
///
/// This is an implementation detail - external code should use the
/// `TtsBackendPort` trait.
#[async_trait]
pub trait HttpBackend: Send + Sync {
    /// POST a JSON body and decode the JSON answer.
    async fn post_json<T: DeserializeOwned + Send>(
        &self,
        url: &Url,
        body: &serde_json::Value,
    ) -> ClientResult<T>;

    /// POST a multipart form and decode the JSON answer.
    async fn post_form<T: DeserializeOwned + Send>(
        &self,
        url: &Url,
        form: FormPayload,
    ) -> ClientResult<T>;

    /// GET raw bytes.
    async fn get_bytes(&self, url: &Url) -> ClientResult<Fetched>;
}

// ============================================================================
// Reqwest Backend
// ============================================================================

/// Production HTTP backend using reqwest.
pub struct ReqwestBackend {
    client: reqwest::Client,
    max_retries: u8,
    retry_base_delay: Duration,
}

impl ReqwestBackend {
    /// Create a new reqwest backend with the given configuration.
    pub fn new(config: &TtsClientConfig) -> ClientResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent.clone())
            .build()?;

        Ok(Self {
            client,
            max_retries: config.max_retries,
            retry_base_delay: config.retry_base_delay,
        })
    }

    /// Reject non-2xx answers.
    fn check_status(response: reqwest::Response, url: &Url) -> ClientResult<reqwest::Response> {
        let status = response.status();
        if status.is_success() {
            Ok(response)
        } else {
            tracing::warn!(status = status.as_u16(), url = %url, "Backend returned error status");
            Err(ClientError::HttpStatus {
                status: status.as_u16(),
                url: url.to_string(),
            })
        }
    }

    /// GET a URL with automatic retry for transient errors.
    async fn get_with_retry(&self, url: &Url) -> ClientResult<reqwest::Response> {
        let mut last_error: Option<ClientError> = None;

        for attempt in 0..=self.max_retries {
            if attempt > 0 {
                let delay = self.retry_base_delay * 2u32.pow(u32::from(attempt) - 1);
                tracing::debug!(attempt, delay_ms = delay.as_millis(), url = %url, "Retrying download");
                tokio::time::sleep(delay).await;
            }

            match self.client.get(url.as_str()).send().await {
                Ok(response) => {
                    let status = response.status();
                    // 5xx errors are retryable (server-side issues)
                    if status.is_server_error() && attempt < self.max_retries {
                        last_error = Some(ClientError::HttpStatus {
                            status: status.as_u16(),
                            url: url.to_string(),
                        });
                        continue;
                    }
                    return Self::check_status(response, url);
                }
                Err(e) => {
                    // Network errors are retryable
                    if attempt < self.max_retries {
                        last_error = Some(e.into());
                        continue;
                    }
                    return Err(e.into());
                }
            }
        }

        Err(last_error.unwrap_or_else(|| ClientError::InvalidResponse {
            message: "Unknown error during download".to_string(),
        }))
    }
}

#[async_trait]
impl HttpBackend for ReqwestBackend {
    async fn post_json<T: DeserializeOwned + Send>(
        &self,
        url: &Url,
        body: &serde_json::Value,
    ) -> ClientResult<T> {
        tracing::debug!(url = %url, "POST json");
        let response = self.client.post(url.as_str()).json(body).send().await?;
        let response = Self::check_status(response, url)?;
        Ok(response.json().await?)
    }

    async fn post_form<T: DeserializeOwned + Send>(
        &self,
        url: &Url,
        form: FormPayload,
    ) -> ClientResult<T> {
        tracing::debug!(url = %url, fields = form.fields.len(), has_file = form.file.is_some(), "POST multipart");
        let response = self
            .client
            .post(url.as_str())
            .multipart(form.into_reqwest())
            .send()
            .await?;
        let response = Self::check_status(response, url)?;
        Ok(response.json().await?)
    }

    async fn get_bytes(&self, url: &Url) -> ClientResult<Fetched> {
        let response = self.get_with_retry(url).await?;
        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|h| h.to_str().ok())
            .map(str::to_string);
        let bytes = response.bytes().await?.to_vec();
        Ok(Fetched {
            content_type,
            bytes,
        })
    }
}

// ============================================================================
// Fake Backend for Testing
// ============================================================================
