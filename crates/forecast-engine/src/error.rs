//! Forecasting error types

use thiserror::Error;

use crate::history::HistoryError;

/// Errors that can occur while producing a forecast
#[derive(Error, Debug)]
pub enum PredictionError {
    /// Too few usable price points to forecast from
    #[error("Insufficient historical data for prediction: {actual} points, minimum {required} required")]
    InsufficientData { required: usize, actual: usize },

    /// No provider registered under the given id
    #[error("Prediction provider not found: {0}")]
    ProviderNotFound(String),

    /// Horizon outside the accepted range
    #[error("Invalid horizon: {horizon} days, must be between 1 and {max}")]
    InvalidHorizon { horizon: u32, max: u32 },

    /// Malformed provider output or unclassified computation failure
    #[error("Forecast failed: {0}")]
    Forecast(String),

    /// External forecaster could not be used. Never leaves the remote provider.
    #[error("Remote forecaster unavailable: {0}")]
    RemoteUnavailable(String),

    /// Error from the historical data source, passed through unchanged
    #[error(transparent)]
    History(#[from] HistoryError),

    /// Detached forecast task did not complete
    #[error("Forecast task failed: {0}")]
    Task(String),
}

impl PredictionError {
    pub fn insufficient_data(required: usize, actual: usize) -> Self {
        Self::InsufficientData { required, actual }
    }

    pub fn forecast(msg: impl Into<String>) -> Self {
        Self::Forecast(msg.into())
    }

    pub fn remote_unavailable(msg: impl Into<String>) -> Self {
        Self::RemoteUnavailable(msg.into())
    }
}
