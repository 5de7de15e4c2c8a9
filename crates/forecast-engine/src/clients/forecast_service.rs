//! Forecast service client - trait and implementations

use async_trait::async_trait;
use common::HistoricalPoint;
use parking_lot::Mutex;
use serde::Serialize;
use serde_json::Value;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use crate::error::PredictionError;
use crate::Result;

/// Request body understood by the forecasting service
#[derive(Debug, Serialize)]
pub struct ForecastServiceRequest<'a> {
    pub data: &'a [HistoricalPoint],
    pub horizon: u32,
}

/// Client trait for the external forecasting service - protocol agnostic
///
/// Returns the undecoded response body; shape validation belongs to the
/// caller. Every transport failure is reported as `RemoteUnavailable`.
#[async_trait]
pub trait ForecastServiceClient: Send + Sync {
    async fn forecast(&self, history: &[HistoricalPoint], horizon_days: u32) -> Result<Value>;
}

// ==================== HTTP Implementation ====================

/// HTTP client posting to `{base_url}/forecast`
pub struct HttpForecastServiceClient {
    client: reqwest::Client,
    base_url: String,
}

impl HttpForecastServiceClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| PredictionError::forecast(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl ForecastServiceClient for HttpForecastServiceClient {
    async fn forecast(&self, history: &[HistoricalPoint], horizon_days: u32) -> Result<Value> {
        let url = format!("{}/forecast", self.base_url);
        let body = ForecastServiceRequest {
            data: history,
            horizon: horizon_days,
        };

        tracing::debug!(%url, points = history.len(), horizon_days, "Calling forecast service");

        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| PredictionError::remote_unavailable(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(PredictionError::remote_unavailable(format!(
                "forecast service returned {}: {}",
                status, error_text
            )));
        }

        response
            .json::<Value>()
            .await
            .map_err(|e| {
                PredictionError::remote_unavailable(format!("invalid response body: {}", e))
            })
    }
}

// ==================== Mock Implementation ====================

/// Mock forecast service client for testing
///
/// Answers every call with the same reply after an optional delay.
pub struct MockForecastServiceClient {
    reply: std::result::Result<Value, String>,
    delay: Option<Duration>,
    calls: AtomicU64,
    last_horizon: Mutex<Option<u32>>,
}

impl MockForecastServiceClient {
    /// Mock answering with `body`
    pub fn responding(body: Value) -> Self {
        Self::with_reply(Ok(body))
    }

    /// Mock failing every call as unavailable
    pub fn unavailable(reason: &str) -> Self {
        Self::with_reply(Err(reason.to_string()))
    }

    fn with_reply(reply: std::result::Result<Value, String>) -> Self {
        Self {
            reply,
            delay: None,
            calls: AtomicU64::new(0),
            last_horizon: Mutex::new(None),
        }
    }

    /// Wait this long before answering
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn calls(&self) -> u64 {
        self.calls.load(Ordering::Relaxed)
    }

    pub fn last_horizon(&self) -> Option<u32> {
        *self.last_horizon.lock()
    }
}

#[async_trait]
impl ForecastServiceClient for MockForecastServiceClient {
    async fn forecast(&self, _history: &[HistoricalPoint], horizon_days: u32) -> Result<Value> {
        self.calls.fetch_add(1, Ordering::Relaxed);
        *self.last_horizon.lock() = Some(horizon_days);

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        self.reply
            .clone()
            .map_err(PredictionError::remote_unavailable)
    }
}
