//! Per-run analysis context.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Counters accumulated over one analysis run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunStatistics {
    /// Coverage records fed to the aggregator
    pub records_seen: usize,
    /// Suggestions fed to the aggregator
    pub suggestions_seen: usize,
    /// Reports built, including no-data reports
    pub reports_built: usize,
}

/// State owned by one analysis run and threaded through the aggregator.
///
/// A fresh context is created per run; nothing in the crate holds one globally.
#[derive(Debug, Clone)]
pub struct AnalysisContext {
    generated_at: DateTime<Utc>,
    stats: RunStatistics,
}

impl AnalysisContext {
    /// Context stamped with the current time.
    pub fn new() -> Self {
        Self::at(Utc::now())
    }

    /// Context stamped with a fixed time, for reproducible reports.
    pub fn at(generated_at: DateTime<Utc>) -> Self {
        Self {
            generated_at,
            stats: RunStatistics::default(),
        }
    }

    pub fn generated_at(&self) -> DateTime<Utc> {
        self.generated_at
    }

    pub fn stats(&self) -> &RunStatistics {
        &self.stats
    }

    pub(crate) fn record_build(&mut self, records: usize, suggestions: usize) {
        self.stats.records_seen += records;
        self.stats.suggestions_seen += suggestions;
        self.stats.reports_built += 1;
    }
}

impl Default for AnalysisContext {
    fn default() -> Self {
        Self::new()
    }
}
