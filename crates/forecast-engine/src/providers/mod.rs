//! Forecast providers
//!
//! Every forecaster implements [`ForecastProvider`] and is dispatched through
//! the engine's registry. Providers keep no state between calls, so a single
//! instance is shared by all concurrent predictions.

mod baseline;
mod remote;

pub use baseline::BaselineProvider;
pub use remote::RemoteProvider;

use async_trait::async_trait;
use common::{ForecastPoint, HistoricalPoint};
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};

use crate::Result;

/// Fewest daily points any provider forecasts from
pub const MIN_PROVIDER_POINTS: usize = 10;

/// A forecaster
///
/// Implementations must be all-or-nothing: either every one of the
/// `horizon_days` points is returned, or an error.
#[async_trait]
pub trait ForecastProvider: Send + Sync {
    /// Unique provider id used for registration and selection
    fn id(&self) -> &str;

    /// Forecast `horizon_days` days following the latest point of `history`
    ///
    /// # Errors
    ///
    /// * `InsufficientData` - fewer than [`MIN_PROVIDER_POINTS`] points
    /// * `Forecast` - any other computation failure
    async fn forecast(
        &self,
        history: &[HistoricalPoint],
        horizon_days: u32,
    ) -> Result<Vec<ForecastPoint>>;
}

/// Random source for the bootstrap step
///
/// A fresh generator is handed out per forecast so providers hold no
/// mutable state.
pub trait RandomSource: Send + Sync {
    fn rng(&self) -> Box<dyn RngCore + Send>;
}

/// OS-seeded generator, a new seed per forecast
#[derive(Debug, Clone, Copy, Default)]
pub struct EntropySource;

impl RandomSource for EntropySource {
    fn rng(&self) -> Box<dyn RngCore + Send> {
        Box::new(StdRng::from_entropy())
    }
}

/// Fixed-seed generator; identical inputs give identical forecasts
#[derive(Debug, Clone, Copy)]
pub struct SeededSource(pub u64);

impl RandomSource for SeededSource {
    fn rng(&self) -> Box<dyn RngCore + Send> {
        Box::new(StdRng::seed_from_u64(self.0))
    }
}
