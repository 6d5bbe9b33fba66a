//! Reqwest-based GraphQL executor for the Kili API.

use std::time::Duration;

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use serde_json::Value;

use crate::config::Config;

/// Sends a GraphQL document with its variables and returns the raw JSON response.
#[async_trait]
pub trait Executor: Send + Sync {
    async fn execute(&self, document: &str, variables: Value) -> Result<Value>;
}

#[derive(Debug, Clone)]
pub struct GraphQlClient {
    http: reqwest::Client,
    endpoint: String,
    headers: HeaderMap,
}

impl GraphQlClient {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("failed to build HTTP client")?;

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(reqwest::header::ACCEPT, HeaderValue::from_static("application/json"));

        Ok(Self { http, endpoint: endpoint.into(), headers })
    }

    pub fn from_config(cfg: &Config) -> Result<Self> {
        Self::new(cfg.api_endpoint(), Duration::from_secs(cfg.request_timeout()))
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Send `token` verbatim as the `Authorization` header on every request.
    pub fn inject_token(&mut self, token: &str) -> Result<()> {
        let mut hv = HeaderValue::from_str(token).context("token is not a valid header value")?;
        hv.set_sensitive(true);
        self.headers.insert(AUTHORIZATION, hv);
        Ok(())
    }

    pub fn inject_api_key(&mut self, api_key: &str) -> Result<()> {
        let mut hv =
            HeaderValue::from_str(api_key).context("API key is not a valid header value")?;
        hv.set_sensitive(true);
        self.headers.insert(HeaderName::from_static("x-api-key"), hv);
        Ok(())
    }
}

#[async_trait]
impl Executor for GraphQlClient {
    async fn execute(&self, document: &str, variables: Value) -> Result<Value> {
        let body = serde_json::json!({
            "query": document,
            "variables": variables,
        });
        tracing::debug!(endpoint = %self.endpoint, "executing GraphQL request");

        let resp = self
            .http
            .post(&self.endpoint)
            .headers(self.headers.clone())
            .json(&body)
            .send()
            .await
            .context("failed to send GraphQL request")?;

        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            tracing::warn!(endpoint = %self.endpoint, %status, "GraphQL request failed");
            bail!("Kili API error: {} - {}", status, text);
        }

        resp.json::<Value>()
            .await
            .context("failed to parse GraphQL response")
    }
}
