use anyhow::{anyhow, Context, Result};
use reqwest::Client;
use serde_json::Value;
use std::error::Error as _;
use std::future::Future;

use crate::config::DashboardConfig;
use crate::shared::types::{HistoryQuery, Reading};

/// Where readings come from. The HTTP client is the production implementation.
pub trait ReadingSource: Send + Sync + 'static {
    /// Most recent readings (`/api/leituras`).
    fn latest(&self) -> impl Future<Output = Result<Vec<Reading>>> + Send;

    /// Full or day-filtered history.
    fn history(&self, query: HistoryQuery) -> impl Future<Output = Result<Vec<Reading>>> + Send;
}

#[derive(Debug, Clone)]
pub struct SensorApi {
    client: Client,
    base_url: String,
    collection: String,
}

impl SensorApi {
    pub fn new(config: &DashboardConfig) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().context("building HTTP client")?;
        Ok(Self {
            client,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            collection: config.collection.clone(),
        })
    }

    pub fn latest_url(&self) -> String {
        format!("{}/api/leituras/{}", self.base_url, self.collection)
    }

    pub fn history_url(&self, query: HistoryQuery) -> String {
        match query {
            HistoryQuery::All => {
                format!("{}/api/historico-todos/{}", self.base_url, self.collection)
            }
            HistoryQuery::Day(day) => format!(
                "{}/api/historico-dia/{}?data={}",
                self.base_url,
                self.collection,
                day.format("%Y-%m-%d")
            ),
        }
    }

    async fn fetch_readings(&self, url: &str) -> Result<Vec<Reading>> {
        tracing::debug!("[api] GET {}", url);
        let res = match self
            .client
            .get(url)
            .header("Cache-Control", "no-store")
            .send()
            .await
        {
            Ok(r) => r,
            Err(e) => {
                if e.is_timeout() {
                    tracing::warn!("[api] request to {} timed out", url);
                }
                if e.is_connect() {
                    tracing::warn!("[api] connection to {} failed; check SENSOR_API_BASE_URL", url);
                }
                let mut chain = Vec::new();
                let mut src: Option<&dyn std::error::Error> = e.source();
                while let Some(s) = src {
                    chain.push(s.to_string());
                    src = s.source();
                }
                if !chain.is_empty() {
                    tracing::debug!("[api] error chain: {}", chain.join(" -> "));
                }
                return Err(anyhow!("GET {}: {}", url, e));
            }
        };
        if !res.status().is_success() {
            let status = res.status();
            let text = res.text().await.unwrap_or_default();
            let snip = text.chars().take(300).collect::<String>();
            tracing::debug!("[api] {} answered {}: {}", url, status, snip);
            return Err(anyhow!("GET {} failed with status {}", url, status));
        }
        let bytes = res
            .bytes()
            .await
            .with_context(|| format!("reading body from GET {}", url))?;
        let body: Value = serde_json::from_slice(&bytes).map_err(|e| {
            let snip = String::from_utf8_lossy(&bytes);
            let snip = snip.chars().take(300).collect::<String>();
            anyhow!(
                "decoding JSON from GET {} failed: {}\nBody snippet: {}",
                url,
                e,
                snip
            )
        })?;
        Ok(decode_readings(body))
    }
}

impl ReadingSource for SensorApi {
    fn latest(&self) -> impl Future<Output = Result<Vec<Reading>>> + Send {
        async move { self.fetch_readings(&self.latest_url()).await }
    }

    fn history(&self, query: HistoryQuery) -> impl Future<Output = Result<Vec<Reading>>> + Send {
        async move { self.fetch_readings(&self.history_url(query)).await }
    }
}

/// Anything that is not a JSON array decodes to no readings.
pub fn decode_readings(body: Value) -> Vec<Reading> {
    match body {
        Value::Array(items) => items.into_iter().map(Reading::from_value).collect(),
        other => {
            tracing::debug!("[api] expected an array, got {}", kind(&other));
            Vec::new()
        }
    }
}

fn kind(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
