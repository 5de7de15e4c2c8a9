//! History source traits

use async_trait::async_trait;
use common::{HistoricalPoint, SubjectId};

/// Errors that can occur while reading price history
#[derive(Debug, thiserror::Error)]
pub enum HistoryError {
    #[error("History backend unavailable: {0}")]
    Unavailable(String),

    #[error("History error: {0}")]
    Other(String),
}

pub type HistoryResult<T> = Result<T, HistoryError>;

/// Source of raw price observations
///
/// Implementations may return points in any order; the engine sorts and
/// aggregates them. An unknown subject yields an empty history.
#[async_trait]
pub trait HistorySource: Send + Sync {
    /// Get every recorded observation for a subject
    async fn get_history(&self, subject_id: &SubjectId) -> HistoryResult<Vec<HistoricalPoint>>;
}
