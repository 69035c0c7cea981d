use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use reqwest::{StatusCode, Url};
use serde::de::DeserializeOwned;

use crate::data::error::DataError;
use crate::data::traits::TraceProvider;
use crate::data::types::{ListTracesParams, Page, Trace, TraceSummary};
use crate::utils::retry::{DEFAULT_BASE_DELAY_MS, retry_with_backoff_async};

const BACKEND: &str = "trace API";
const CURRENT_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Connection settings for the trace REST API
#[derive(Debug, Clone)]
pub struct HttpProviderConfig {
    pub base_url: String,
    pub token: Option<String>,
    pub timeout_secs: u64,
    /// Total attempts per request (1 disables retry)
    pub max_attempts: u32,
}

/// Trace provider backed by the REST API.
///
/// `GET {base}/traces` returns `{ items, total }` and
/// `GET {base}/traces/{id}` returns a full trace (404 when unknown).
#[derive(Debug)]
pub struct HttpTraceProvider {
    client: reqwest::Client,
    base_url: String,
    timeout_secs: u64,
    max_attempts: u32,
}

impl HttpTraceProvider {
    pub fn new(config: HttpProviderConfig) -> Result<Self, DataError> {
        let mut headers = HeaderMap::new();
        if let Some(token) = config.token.as_deref().filter(|t| !t.is_empty()) {
            headers.insert(
                AUTHORIZATION,
                HeaderValue::from_str(&format!("Bearer {}", token))
                    .map_err(|e| DataError::Config(format!("invalid API token: {}", e)))?,
            );
        }

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(format!("TraceScope/{}", CURRENT_VERSION))
            .default_headers(headers)
            .build()
            .map_err(|e| DataError::Config(format!("failed to build HTTP client: {}", e)))?;

        let base_url = config.base_url.trim_end_matches('/').to_string();
        Url::parse(&base_url)
            .map_err(|e| DataError::Config(format!("invalid API URL '{}': {}", base_url, e)))?;

        tracing::debug!(
            base_url = %base_url,
            timeout_secs = config.timeout_secs,
            max_attempts = config.max_attempts,
            "HTTP trace provider initialized"
        );
        Ok(Self {
            client,
            base_url,
            timeout_secs: config.timeout_secs,
            max_attempts: config.max_attempts.max(1),
        })
    }

    fn list_url(&self, params: &ListTracesParams) -> Result<Url, DataError> {
        let mut url = self.url(&["traces"])?;
        let (page, limit) = params.normalized();
        {
            let mut query = url.query_pairs_mut();
            query.append_pair("page", &page.to_string());
            query.append_pair("limit", &limit.to_string());
            if let Some(status) = &params.status {
                query.append_pair("status", status.as_str());
            }
            if let Some(search) = params.search.as_deref().filter(|s| !s.trim().is_empty()) {
                query.append_pair("search", search.trim());
            }
        }
        Ok(url)
    }

    /// Base URL joined with percent-encoded path segments
    fn url(&self, segments: &[&str]) -> Result<Url, DataError> {
        let mut url = Url::parse(&self.base_url)
            .map_err(|e| DataError::Config(format!("invalid API URL: {}", e)))?;
        url.path_segments_mut()
            .map_err(|_| DataError::Config(format!("API URL cannot be a base: {}", self.base_url)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// GET with retry; `Ok(None)` on 404
    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<Option<T>, DataError> {
        retry_with_backoff_async(
            self.max_attempts,
            DEFAULT_BASE_DELAY_MS,
            DataError::is_transient,
            || self.get_once(url.clone()),
        )
        .await
    }

    async fn get_once<T: DeserializeOwned>(&self, url: Url) -> Result<Option<T>, DataError> {
        let resp = self.client.get(url.clone()).send().await.map_err(|e| {
            if e.is_timeout() {
                DataError::timeout(BACKEND, self.timeout_secs)
            } else {
                DataError::Http(e)
            }
        })?;

        let status = resp.status();
        if status == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(DataError::status(
                BACKEND,
                status.as_u16(),
                format!("GET {} failed: {}", url.path(), body.trim()),
            ));
        }

        let bytes = resp.bytes().await?;
        serde_json::from_slice(&bytes)
            .map(Some)
            .map_err(|e| DataError::decode(format!("response from {}", url.path()), e))
    }
}

#[async_trait]
impl TraceProvider for HttpTraceProvider {
    async fn list_traces(
        &self,
        params: &ListTracesParams,
    ) -> Result<Page<TraceSummary>, DataError> {
        let url = self.list_url(params)?;
        Ok(self.get_json(url).await?.unwrap_or(Page {
            items: Vec::new(),
            total: 0,
        }))
    }

    async fn get_trace(&self, trace_id: &str) -> Result<Option<Trace>, DataError> {
        let url = self.url(&["traces", trace_id])?;
        let trace: Option<Trace> = self.get_json(url).await?;
        if trace.is_none() {
            tracing::debug!(trace_id, "Trace not found");
        }
        Ok(trace)
    }

    fn name(&self) -> &'static str {
        "http"
    }
}
