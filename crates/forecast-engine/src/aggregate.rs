//! Daily aggregation of raw price observations
//!
//! Marketplaces report prices at arbitrary times and frequencies. Providers
//! forecast from one value per calendar day (UTC), the arithmetic mean of
//! that day's observations.

use chrono::{TimeZone, Utc};
use common::HistoricalPoint;
use std::collections::BTreeMap;
use tracing::debug;

/// Collapse raw observations into one mean price per UTC calendar day
///
/// Only the `max_raw_points` most recent observations are considered.
/// Non-finite prices are not usable and are dropped first. The result is
/// sorted ascending and every point is timestamped at midnight UTC.
pub fn daily_average(mut raw: Vec<HistoricalPoint>, max_raw_points: usize) -> Vec<HistoricalPoint> {
    let before = raw.len();
    raw.retain(|p| p.price.is_finite());
    if raw.len() < before {
        debug!(dropped = before - raw.len(), "Dropped non-finite price observations");
    }

    raw.sort_by_key(|p| p.timestamp);
    let start = raw.len().saturating_sub(max_raw_points);

    let mut days: BTreeMap<_, (f64, usize)> = BTreeMap::new();
    for point in &raw[start..] {
        let day = days.entry(point.timestamp.date_naive()).or_insert((0.0, 0));
        day.0 += point.price;
        day.1 += 1;
    }

    days.into_iter()
        .filter_map(|(date, (sum, count))| {
            let midnight = date.and_hms_opt(0, 0, 0)?;
            Some(HistoricalPoint::new(
                sum / count as f64,
                Utc.from_utc_datetime(&midnight),
            ))
        })
        .collect()
}
