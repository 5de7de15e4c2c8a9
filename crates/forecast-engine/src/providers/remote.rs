//! Provider delegating to an external forecasting service

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use common::{ForecastPoint, HistoricalPoint};
use config::{BaselineConfig, RemoteConfig, REMOTE_PROVIDER};
use observability::PredictionMetrics;
use serde_json::{Map, Value};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

use crate::clients::{ForecastServiceClient, HttpForecastServiceClient};
use crate::error::PredictionError;
use crate::providers::{BaselineProvider, ForecastProvider, MIN_PROVIDER_POINTS};
use crate::Result;

/// Remote forecaster with baseline fallback
///
/// Any transport failure, timeout or structurally malformed response is
/// answered by the owned [`BaselineProvider`] on the same input, so callers
/// only ever see a degraded forecast, never the outage itself.
pub struct RemoteProvider {
    client: Arc<dyn ForecastServiceClient>,
    fallback: BaselineProvider,
    timeout: Duration,
    metrics: PredictionMetrics,
}

impl RemoteProvider {
    pub fn new(
        client: Arc<dyn ForecastServiceClient>,
        fallback: BaselineProvider,
        timeout: Duration,
    ) -> Self {
        Self {
            client,
            fallback,
            timeout,
            metrics: PredictionMetrics::new(),
        }
    }

    /// HTTP-backed provider built from configuration
    pub fn from_config(remote: &RemoteConfig, baseline: &BaselineConfig) -> Result<Self> {
        let timeout = Duration::from_secs(remote.timeout_seconds);
        let client = HttpForecastServiceClient::new(&remote.url, timeout)?;

        Ok(Self::new(
            Arc::new(client),
            BaselineProvider::from_config(baseline),
            timeout,
        ))
    }

    async fn forecast_remote(
        &self,
        history: &[HistoricalPoint],
        horizon_days: u32,
    ) -> Result<Vec<ForecastPoint>> {
        let body = tokio::time::timeout(self.timeout, self.client.forecast(history, horizon_days))
            .await
            .map_err(|_| {
                PredictionError::remote_unavailable(format!(
                    "no response within {}s",
                    self.timeout.as_secs_f64()
                ))
            })??;

        parse_response(&body, horizon_days)
    }
}

#[async_trait]
impl ForecastProvider for RemoteProvider {
    fn id(&self) -> &str {
        REMOTE_PROVIDER
    }

    async fn forecast(
        &self,
        history: &[HistoricalPoint],
        horizon_days: u32,
    ) -> Result<Vec<ForecastPoint>> {
        if history.len() < MIN_PROVIDER_POINTS {
            return Err(PredictionError::insufficient_data(MIN_PROVIDER_POINTS, history.len()));
        }

        match self.forecast_remote(history, horizon_days).await {
            Err(PredictionError::RemoteUnavailable(reason)) => {
                warn!(
                    %reason,
                    horizon_days,
                    "Remote forecaster unavailable, falling back to baseline"
                );
                self.metrics.record_fallback(REMOTE_PROVIDER);
                self.fallback.forecast(history, horizon_days).await
            }
            other => other,
        }
    }
}

/// Validate and decode a forecast service response
///
/// Structural problems are `RemoteUnavailable` and trigger the fallback. A
/// well-formed response whose rounded band is inverted is a `Forecast` error.
fn parse_response(body: &Value, horizon_days: u32) -> Result<Vec<ForecastPoint>> {
    let items = body
        .as_array()
        .ok_or_else(|| PredictionError::remote_unavailable("response is not an array"))?;

    if items.len() != horizon_days as usize {
        return Err(PredictionError::remote_unavailable(format!(
            "expected {} points, got {}",
            horizon_days,
            items.len()
        )));
    }

    let points = items
        .iter()
        .enumerate()
        .map(|(index, item)| parse_point(index, item))
        .collect::<Result<Vec<_>>>()?;

    if let Some((index, point)) = points.iter().enumerate().find(|(_, p)| p.p10 > p.p90) {
        return Err(PredictionError::forecast(format!(
            "point {} has p10 {} above p90 {}",
            index, point.p10, point.p90
        )));
    }

    debug!(points = points.len(), "Remote forecast decoded");
    Ok(points)
}

fn parse_point(index: usize, item: &Value) -> Result<ForecastPoint> {
    let object = item.as_object().ok_or_else(|| {
        PredictionError::remote_unavailable(format!("point {} is not an object", index))
    })?;

    let date = object
        .get("date")
        .and_then(Value::as_str)
        .and_then(parse_date)
        .ok_or_else(|| {
            PredictionError::remote_unavailable(format!("point {} has no valid date", index))
        })?;

    Ok(ForecastPoint::rounded(
        date,
        number_field(object, "p10", index)?,
        number_field(object, "p50", index)?,
        number_field(object, "p90", index)?,
    ))
}

fn number_field(object: &Map<String, Value>, field: &str, index: usize) -> Result<f64> {
    object
        .get(field)
        .and_then(Value::as_f64)
        .filter(|v| v.is_finite())
        .ok_or_else(|| {
            PredictionError::remote_unavailable(format!(
                "point {} has no numeric {}",
                index, field
            ))
        })
}

/// RFC 3339, a naive `YYYY-MM-DDTHH:MM:SS` in UTC, or a bare date at midnight UTC
fn parse_date(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(Utc.from_utc_datetime(&naive));
    }
    let date = NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok()?;
    Some(Utc.from_utc_datetime(&date.and_hms_opt(0, 0, 0)?))
}
