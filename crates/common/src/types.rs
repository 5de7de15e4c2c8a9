//! Common types used across PriceCast
//!
//! This module provides the fundamental domain types shared by the
//! forecasting engine, its collaborators and the binaries.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Smallest forecast horizon accepted by the engine
pub const MIN_HORIZON_DAYS: u32 = 1;

/// Largest forecast horizon accepted by the engine
pub const MAX_HORIZON_DAYS: u32 = 90;

/// Horizon used when a caller does not ask for one
pub const DEFAULT_HORIZON_DAYS: u32 = 14;

/// Round a price to two decimal places (currency semantics)
pub fn round_to_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Identifier of the item whose prices are tracked
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SubjectId(pub String);

impl SubjectId {
    /// Create a new SubjectId
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// Get the id as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for SubjectId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for SubjectId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for SubjectId {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

/// A single recorded price observation
///
/// After daily aggregation there is exactly one point per calendar day,
/// timestamped at midnight UTC.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HistoricalPoint {
    pub price: f64,
    pub timestamp: DateTime<Utc>,
}

impl HistoricalPoint {
    pub fn new(price: f64, timestamp: DateTime<Utc>) -> Self {
        Self { price, timestamp }
    }
}

/// One forecast day with its confidence band
///
/// `p10 <= p90` always holds. `p50` normally lies inside the band but is not
/// guaranteed to for unclamped baseline forecasts.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ForecastPoint {
    pub date: DateTime<Utc>,
    pub p10: f64,
    pub p50: f64,
    pub p90: f64,
}

impl ForecastPoint {
    /// Create a point with every percentile rounded to cents
    pub fn rounded(date: DateTime<Utc>, p10: f64, p50: f64, p90: f64) -> Self {
        Self {
            date,
            p10: round_to_cents(p10),
            p50: round_to_cents(p50),
            p90: round_to_cents(p90),
        }
    }

    /// Returns true if p50 lies within [p10, p90]
    pub fn median_in_band(&self) -> bool {
        self.p10 <= self.p50 && self.p50 <= self.p90
    }
}

/// A request for a forecast of one subject
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForecastRequest {
    pub subject_id: SubjectId,
    #[serde(default = "default_horizon_days")]
    pub horizon_days: u32,
}

fn default_horizon_days() -> u32 {
    DEFAULT_HORIZON_DAYS
}

impl ForecastRequest {
    pub fn new(subject_id: impl Into<SubjectId>, horizon_days: u32) -> Self {
        Self {
            subject_id: subject_id.into(),
            horizon_days,
        }
    }

    /// Request with the default 14 day horizon
    pub fn with_default_horizon(subject_id: impl Into<SubjectId>) -> Self {
        Self::new(subject_id, DEFAULT_HORIZON_DAYS)
    }
}

/// A forecast together with the metadata callers display or persist
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PredictionReport {
    pub subject_id: SubjectId,
    pub provider: String,
    pub horizon_days: u32,
    pub generated_at: DateTime<Utc>,
    pub data_points: usize,
    pub points: Vec<ForecastPoint>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_round_to_cents() {
        assert_eq!(round_to_cents(113.456), 113.46);
        assert_eq!(round_to_cents(113.454), 113.45);
        assert_eq!(round_to_cents(-0.004), -0.0);
        assert_eq!(round_to_cents(100.0), 100.0);
    }

    #[test]
    fn test_forecast_point_rounded() {
        let date = Utc.with_ymd_and_hms(2024, 1, 15, 0, 0, 0).unwrap();
        let point = ForecastPoint::rounded(date, 99.994, 100.006, 101.239);

        assert_eq!(point.p10, 99.99);
        assert_eq!(point.p50, 100.01);
        assert_eq!(point.p90, 101.24);
        assert!(point.median_in_band());
    }

    #[test]
    fn test_forecast_request_horizon() {
        let request = ForecastRequest::with_default_horizon("item-1");
        assert_eq!(request.horizon_days, 14);
        assert_eq!(request.subject_id.as_str(), "item-1");
    }

    #[test]
    fn test_forecast_request_json() {
        let request: ForecastRequest =
            serde_json::from_str(r#"{"subjectId":"item-7"}"#).unwrap();
        assert_eq!(request.subject_id.as_str(), "item-7");
        assert_eq!(request.horizon_days, DEFAULT_HORIZON_DAYS);
    }

    #[test]
    fn test_historical_point_json() {
        let point: HistoricalPoint =
            serde_json::from_str(r#"{"price":12.5,"timestamp":"2024-03-01T10:30:00Z"}"#).unwrap();
        assert_eq!(point.price, 12.5);
        assert_eq!(
            point.timestamp,
            Utc.with_ymd_and_hms(2024, 3, 1, 10, 30, 0).unwrap()
        );
    }
}
