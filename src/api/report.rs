//! Aggregate coverage report: per-run totals, per-file summaries, grouped
//! suggestions and recommendation text.

use chrono::{DateTime, Utc};
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use tracing::{debug, warn};

use crate::api::context::AnalysisContext;
use crate::core::config::RecommendationConfig;
use crate::detectors::coverage::classifier::LineCategory;
use crate::detectors::coverage::suggestions::{Priority, Suggestion};
use crate::detectors::coverage::types::{CoverageRecord, UncoveredLocation, REPOSITORY_SENTINEL};

/// Message carried by a report built from no coverage records.
pub const NO_DATA_MESSAGE: &str = "No coverage data available";

/// Result of aggregating one analysis run.
///
/// `NoData` serializes as `{"error": "No coverage data available"}`.
#[derive(Debug, Clone, PartialEq)]
pub enum CoverageReport {
    Complete(AggregateReport),
    NoData,
}

impl CoverageReport {
    pub fn as_complete(&self) -> Option<&AggregateReport> {
        match self {
            Self::Complete(report) => Some(report),
            Self::NoData => None,
        }
    }

    pub fn is_no_data(&self) -> bool {
        matches!(self, Self::NoData)
    }
}

impl Serialize for CoverageReport {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Complete(report) => report.serialize(serializer),
            Self::NoData => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry("error", NO_DATA_MESSAGE)?;
                map.end()
            }
        }
    }
}

/// Summary of a complete analysis run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregateReport {
    pub overall_coverage: OverallCoverage,
    /// One entry per input record, in input order
    pub file_coverage: Vec<FileCoverageSummary>,
    pub suggestions: SuggestionSummary,
    pub recommendations: Vec<String>,
    pub timestamp: DateTime<Utc>,
}

impl AggregateReport {
    /// Suggestions whose file has no `file_coverage` entry.
    ///
    /// Suggestions against the repository sentinel are exempt.
    pub fn orphan_suggestions(&self) -> Vec<&Suggestion> {
        self.suggestions
            .details
            .iter()
            .filter(|suggestion| suggestion.file_path != REPOSITORY_SENTINEL)
            .filter(|suggestion| {
                !self
                    .file_coverage
                    .iter()
                    .any(|file| file.file_path == suggestion.file_path)
            })
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverallCoverage {
    /// Rounded to two decimals
    pub percentage: f64,
    pub total_lines: usize,
    pub covered_lines: usize,
    /// Count of lines not covered
    pub uncovered_lines: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileCoverageSummary {
    pub file_path: String,
    /// Rounded to two decimals
    pub coverage_percentage: f64,
    pub total_lines: usize,
    pub covered_lines: usize,
    pub uncovered_lines: Vec<UncoveredLocation>,
}

impl From<&CoverageRecord> for FileCoverageSummary {
    fn from(record: &CoverageRecord) -> Self {
        Self {
            file_path: record.file_path().to_string(),
            coverage_percentage: round2(record.coverage_percentage()),
            total_lines: record.total_lines(),
            covered_lines: record.covered_lines(),
            uncovered_lines: record.uncovered_lines().to_vec(),
        }
    }
}

/// Suggestions grouped by priority, with the full list in input order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuggestionSummary {
    pub high_priority: usize,
    pub medium_priority: usize,
    pub low_priority: usize,
    pub total: usize,
    pub details: Vec<Suggestion>,
}

impl SuggestionSummary {
    fn from_suggestions(suggestions: &[Suggestion]) -> Self {
        let count = |priority: Priority| suggestions.iter().filter(|s| s.priority == priority).count();
        Self {
            high_priority: count(Priority::High),
            medium_priority: count(Priority::Medium),
            low_priority: count(Priority::Low),
            total: suggestions.len(),
            details: suggestions.to_vec(),
        }
    }

    /// Suggestions of one priority, in input order.
    pub fn bucket(&self, priority: Priority) -> impl Iterator<Item = &Suggestion> + '_ {
        self.details.iter().filter(move |s| s.priority == priority)
    }

    fn count_category(&self, category: LineCategory) -> usize {
        self.details.iter().filter(|s| s.category == category).count()
    }
}

/// Folds one run's records and suggestions into a [`CoverageReport`].
#[derive(Debug, Clone, Default)]
pub struct ReportBuilder {
    config: RecommendationConfig,
}

impl ReportBuilder {
    pub fn new(config: RecommendationConfig) -> Self {
        Self { config }
    }

    pub fn build(
        &self,
        ctx: &mut AnalysisContext,
        records: &[CoverageRecord],
        suggestions: &[Suggestion],
    ) -> CoverageReport {
        ctx.record_build(records.len(), suggestions.len());

        if records.is_empty() {
            debug!("no coverage records supplied; building no-data report");
            return CoverageReport::NoData;
        }

        let total_lines: usize = records.iter().map(CoverageRecord::total_lines).sum();
        let covered_lines: usize = records.iter().map(CoverageRecord::covered_lines).sum();
        let percentage = percentage_of(covered_lines, total_lines);

        let summary = SuggestionSummary::from_suggestions(suggestions);
        let recommendations = self.recommendations(percentage, &summary);

        let report = AggregateReport {
            overall_coverage: OverallCoverage {
                percentage: round2(percentage),
                total_lines,
                covered_lines,
                uncovered_lines: total_lines - covered_lines,
            },
            file_coverage: records.iter().map(FileCoverageSummary::from).collect(),
            suggestions: summary,
            recommendations,
            timestamp: ctx.generated_at(),
        };

        let orphans = report.orphan_suggestions();
        if !orphans.is_empty() {
            warn!(
                count = orphans.len(),
                first = %orphans[0].file_path,
                "suggestions reference files missing from the coverage records"
            );
        }

        debug!(
            files = report.file_coverage.len(),
            suggestions = report.suggestions.total,
            percentage = report.overall_coverage.percentage,
            "built coverage report"
        );

        CoverageReport::Complete(report)
    }

    fn recommendations(&self, overall: f64, summary: &SuggestionSummary) -> Vec<String> {
        let mut recommendations = Vec::new();

        if overall < self.config.critical_threshold {
            recommendations.push(format!(
                "Critical: Coverage is below {}%. Focus on high-priority test cases first.",
                self.config.critical_threshold
            ));
        } else if overall < self.config.improvement_threshold {
            recommendations.push(format!(
                "Coverage is below {}%. Add more comprehensive test cases.",
                self.config.improvement_threshold
            ));
        }

        if summary.high_priority > 0 {
            recommendations.push(format!(
                "Focus on {} high-priority test suggestions.",
                summary.high_priority
            ));
        }

        let null_checks = summary.count_category(LineCategory::NullCheck);
        if null_checks > 0 {
            recommendations.push(format!("Add {null_checks} null/empty input test cases."));
        }

        let edge_cases = summary.count_category(LineCategory::EdgeCase);
        if edge_cases > 0 {
            recommendations.push(format!("Add {edge_cases} edge case test scenarios."));
        }

        if recommendations.is_empty() {
            recommendations.push(
                "Good coverage! Consider adding integration tests for better confidence.".to_string(),
            );
        }

        recommendations
    }
}

fn percentage_of(covered: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        covered as f64 / total as f64 * 100.0
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
#[path = "report_tests.rs"]
mod tests;
