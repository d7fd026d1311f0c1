//! Test suggestions for uncovered code.
//!
//! Each record yields up to `max_line_suggestions` line-level suggestions
//! (never more than ten), all of medium priority, plus at most one file-level suggestion when the
//! file sits below the configured coverage threshold.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

use super::classifier::{classify, LineCategory};
use super::source::SourceLines;
use super::types::CoverageRecord;
use crate::core::config::{SuggestionConfig, MAX_LINE_SUGGESTIONS};

/// Suggestion ranking used for grouping and recommendation text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl Priority {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A recommendation to add a test for one line, or for a file as a whole.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Suggestion {
    pub file_path: String,
    /// 1-indexed line, or 0 for a file-level suggestion
    pub line_number: usize,
    #[serde(rename = "type")]
    pub category: LineCategory,
    pub description: String,
    pub priority: Priority,
    /// Trimmed source line; empty for file-level suggestions
    pub code_snippet: String,
}

impl Suggestion {
    pub fn is_file_level(&self) -> bool {
        self.line_number == 0
    }
}

/// Turns coverage records into ordered suggestion lists.
#[derive(Debug, Clone, Default)]
pub struct SuggestionGenerator {
    config: SuggestionConfig,
}

impl SuggestionGenerator {
    pub fn new(config: SuggestionConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SuggestionConfig {
        &self.config
    }

    /// Suggestions for one record, line-level first.
    ///
    /// Entries that cannot be resolved against `source` (no source, statement
    /// without a known line, line out of range) are skipped.
    pub fn generate(&self, record: &CoverageRecord, source: Option<&str>) -> Vec<Suggestion> {
        if record.uncovered_lines().is_empty() {
            return Vec::new();
        }

        let mut suggestions = Vec::new();

        if let Some(lines) = source.map(SourceLines::new) {
            for location in record
                .uncovered_lines()
                .iter()
                .take(self.config.max_line_suggestions.min(MAX_LINE_SUGGESTIONS))
            {
                let resolved = location
                    .source_line()
                    .and_then(|line_number| lines.get(line_number).map(|text| (line_number, text)));
                let Some((line_number, text)) = resolved else {
                    debug!(
                        file = record.file_path(),
                        location = %location,
                        "skipping uncovered entry that does not resolve to a source line"
                    );
                    continue;
                };

                let category = classify(text, record.language());
                suggestions.push(Suggestion {
                    file_path: record.file_path().to_string(),
                    line_number,
                    category,
                    description: category.describe(text),
                    priority: Priority::Medium,
                    code_snippet: text.trim().to_string(),
                });
            }
        } else {
            debug!(
                file = record.file_path(),
                "no source text available; emitting file-level suggestion only"
            );
        }

        if let Some(file_level) = self.file_level_suggestion(record) {
            suggestions.push(file_level);
        }

        suggestions
    }

    /// Generate suggestions for many records in parallel, preserving input order.
    pub fn generate_batch(&self, inputs: &[(CoverageRecord, Option<String>)]) -> Vec<Suggestion> {
        inputs
            .par_iter()
            .map(|(record, source)| self.generate(record, source.as_deref()))
            .collect::<Vec<_>>()
            .into_iter()
            .flatten()
            .collect()
    }

    fn file_level_suggestion(&self, record: &CoverageRecord) -> Option<Suggestion> {
        let percentage = record.coverage_percentage();
        let (priority, description) = if percentage < self.config.critical_threshold {
            (
                Priority::High,
                format!(
                    "Critical: Coverage is only {:.1}%. Add comprehensive test suite.",
                    percentage
                ),
            )
        } else if percentage < self.config.file_level_threshold {
            (
                Priority::Medium,
                format!(
                    "Improvement needed: Coverage is {:.1}%. Add more test cases.",
                    percentage
                ),
            )
        } else {
            return None;
        };

        Some(Suggestion {
            file_path: record.file_path().to_string(),
            line_number: 0,
            category: LineCategory::General,
            description,
            priority,
            code_snippet: String::new(),
        })
    }
}

#[cfg(test)]
#[path = "suggestions_tests.rs"]
mod tests;
