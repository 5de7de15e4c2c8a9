//! Moving-average + linear-trend baseline with bootstrap uncertainty bands

use async_trait::async_trait;
use chrono::Duration;
use common::{ForecastPoint, HistoricalPoint};
use config::{BaselineConfig, BASELINE_PROVIDER};
use std::sync::Arc;
use tracing::debug;

use crate::error::PredictionError;
use crate::providers::{
    EntropySource, ForecastProvider, RandomSource, SeededSource, MIN_PROVIDER_POINTS,
};
use crate::stats;
use crate::Result;

/// Deterministic trend forecaster
///
/// The series is smoothed with a trailing moving average, a linear slope is
/// fitted over the smoothed values and projected forward from the last
/// smoothed value. The band around each projection comes from bootstrapped
/// residuals of a 3-point moving average.
///
/// `p50` is the projection itself while `p10`/`p90` come from the resampled
/// distribution, so `p50` can sit outside the band for short or skewed
/// residual sets. Enable `clamp_median` to pull it back into `[p10, p90]`.
pub struct BaselineProvider {
    bootstrap_samples: usize,
    max_window: usize,
    clamp_median: bool,
    random: Arc<dyn RandomSource>,
}

impl BaselineProvider {
    pub fn new() -> Self {
        Self::from_config(&BaselineConfig::default())
    }

    pub fn from_config(config: &BaselineConfig) -> Self {
        let random: Arc<dyn RandomSource> = match config.seed {
            Some(seed) => Arc::new(SeededSource(seed)),
            None => Arc::new(EntropySource),
        };

        Self {
            bootstrap_samples: config.bootstrap_samples.max(1),
            max_window: config.max_window.max(1),
            clamp_median: config.clamp_median,
            random,
        }
    }

    /// Replace the bootstrap random source
    pub fn with_random_source(mut self, random: Arc<dyn RandomSource>) -> Self {
        self.random = random;
        self
    }

    pub fn with_clamp_median(mut self, clamp_median: bool) -> Self {
        self.clamp_median = clamp_median;
        self
    }

    /// Synchronous core of [`ForecastProvider::forecast`]
    pub fn compute(
        &self,
        history: &[HistoricalPoint],
        horizon_days: u32,
    ) -> Result<Vec<ForecastPoint>> {
        if history.len() < MIN_PROVIDER_POINTS {
            return Err(PredictionError::insufficient_data(MIN_PROVIDER_POINTS, history.len()));
        }

        let mut sorted = history.to_vec();
        sorted.sort_by_key(|p| p.timestamp);

        let prices: Vec<f64> = sorted.iter().map(|p| p.price).collect();
        if prices.iter().any(|p| !p.is_finite()) {
            return Err(PredictionError::forecast("history contains non-finite prices"));
        }

        let window = stats::window_size(prices.len(), self.max_window);
        let smoothed = stats::moving_average(&prices, window);
        let slope = stats::trend(&smoothed);
        let base_price = *smoothed
            .last()
            .ok_or_else(|| PredictionError::forecast("smoothed series is empty"))?;

        let residuals = stats::residuals(&prices);
        if residuals.is_empty() {
            return Err(PredictionError::forecast("no residuals to resample"));
        }

        let last_date = sorted
            .last()
            .map(|p| p.timestamp)
            .ok_or_else(|| PredictionError::forecast("history is empty"))?;

        debug!(
            points = prices.len(),
            window,
            slope,
            base_price,
            horizon_days,
            "Computing baseline forecast"
        );

        let mut rng = self.random.rng();
        let mut points = Vec::with_capacity(horizon_days as usize);

        for day in 1..=horizon_days {
            let projected = base_price + slope * f64::from(day);

            let distribution: Vec<f64> =
                stats::bootstrap_sample(&residuals, self.bootstrap_samples, rng.as_mut())
                    .into_iter()
                    .map(|r| projected + r)
                    .collect();
            let band = stats::percentiles(&distribution)
                .ok_or_else(|| PredictionError::forecast("empty bootstrap distribution"))?;

            let mut point = ForecastPoint::rounded(
                last_date + Duration::days(i64::from(day)),
                band.p10,
                projected,
                band.p90,
            );
            if self.clamp_median {
                point.p50 = point.p50.max(point.p10).min(point.p90);
            }
            points.push(point);
        }

        Ok(points)
    }
}

impl Default for BaselineProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ForecastProvider for BaselineProvider {
    fn id(&self) -> &str {
        BASELINE_PROVIDER
    }

    async fn forecast(
        &self,
        history: &[HistoricalPoint],
        horizon_days: u32,
    ) -> Result<Vec<ForecastPoint>> {
        self.compute(history, horizon_days)
    }
}
