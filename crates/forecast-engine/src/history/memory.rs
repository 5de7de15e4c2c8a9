//! In-memory history source

use async_trait::async_trait;
use common::{HistoricalPoint, SubjectId};
use parking_lot::RwLock;
use std::collections::HashMap;
use tracing::debug;

use crate::history::traits::{HistoryResult, HistorySource};

/// In-memory price history
///
/// Backs the CLI and tests. Data is lost on restart.
#[derive(Debug, Default)]
pub struct InMemoryHistory {
    points: RwLock<HashMap<SubjectId, Vec<HistoricalPoint>>>,
}

impl InMemoryHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a single observation
    pub fn record(&self, subject_id: SubjectId, point: HistoricalPoint) {
        self.points.write().entry(subject_id).or_default().push(point);
    }

    /// Append many observations for one subject
    pub fn extend<I>(&self, subject_id: SubjectId, points: I)
    where
        I: IntoIterator<Item = HistoricalPoint>,
    {
        let mut all = self.points.write();
        let entry = all.entry(subject_id.clone()).or_default();
        let before = entry.len();
        entry.extend(points);
        debug!(subject = %subject_id, added = entry.len() - before, "History extended");
    }

    /// Number of observations recorded for a subject
    pub fn len(&self, subject_id: &SubjectId) -> usize {
        self.points.read().get(subject_id).map_or(0, Vec::len)
    }

    /// Subjects with at least one observation
    pub fn subjects(&self) -> Vec<SubjectId> {
        let mut subjects: Vec<_> = self.points.read().keys().cloned().collect();
        subjects.sort();
        subjects
    }
}

#[async_trait]
impl HistorySource for InMemoryHistory {
    async fn get_history(&self, subject_id: &SubjectId) -> HistoryResult<Vec<HistoricalPoint>> {
        Ok(self.points.read().get(subject_id).cloned().unwrap_or_default())
    }
}
