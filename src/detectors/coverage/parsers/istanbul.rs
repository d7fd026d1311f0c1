//! Istanbul `coverage-final.json` parser.
//!
//! The report is an object keyed by absolute file path; each entry holds an `s`
//! map of statement id to hit count and, usually, a `statementMap` locating
//! every statement.

use serde_json::Value;
use tracing::debug;

use crate::core::errors::{Result, TestgapError};
use crate::detectors::coverage::types::{CoverageRecord, Language, UncoveredLocation};

const FORMAT: &str = "istanbul";

/// Parse an Istanbul report. Without a target every file entry is summed.
pub fn parse_istanbul(bytes: &[u8], target: Option<&str>) -> Result<Option<CoverageRecord>> {
    let root: Value = serde_json::from_slice(bytes).map_err(|err| {
        TestgapError::parse(FORMAT, format!("Failed to parse Istanbul JSON coverage: {}", err))
    })?;
    let Value::Object(files) = root else {
        return Err(TestgapError::parse(
            FORMAT,
            "expected a JSON object keyed by file path",
        ));
    };

    match target {
        None => {
            let (total, covered) = files
                .values()
                .map(|entry| {
                    let statements = statement_hits(entry);
                    let covered = statements.iter().filter(|(_, hits)| is_hit(hits)).count();
                    (statements.len(), covered)
                })
                .fold((0, 0), |(total, covered), (t, c)| (total + t, covered + c));
            debug!(files = files.len(), total, covered, "summed Istanbul statements");
            CoverageRecord::repository(Language::JavaScript, total, covered).map(Some)
        }
        Some(target) => {
            let Some(entry) = files.get(target) else {
                debug!(target, "file key not present in Istanbul report");
                return Ok(None);
            };
            file_record(target, entry).map(Some)
        }
    }
}

fn file_record(target: &str, entry: &Value) -> Result<CoverageRecord> {
    let statements = statement_hits(entry);
    let covered = statements.iter().filter(|(_, hits)| is_hit(hits)).count();

    let mut missed: Vec<&String> = statements
        .iter()
        .filter(|(_, hits)| !is_hit(hits))
        .map(|(id, _)| *id)
        .collect();
    missed.sort_by_key(|id| statement_order(id));

    let uncovered = missed
        .into_iter()
        .map(|id| UncoveredLocation::statement(id.clone(), statement_start_line(entry, id)))
        .collect();

    let language = match Language::from_path(target) {
        Some(Language::TypeScript) => Language::TypeScript,
        _ => Language::JavaScript,
    };

    CoverageRecord::new(target, language, statements.len(), covered, uncovered)
}

/// Statement hit map of one file entry; a missing or malformed map is empty.
fn statement_hits(entry: &Value) -> Vec<(&String, &Value)> {
    entry
        .get("s")
        .and_then(Value::as_object)
        .map(|hits| hits.iter().collect())
        .unwrap_or_default()
}

fn is_hit(hits: &Value) -> bool {
    hits.as_f64().is_some_and(|count| count > 0.0)
}

/// Numeric ids sort numerically, anything else after them lexically.
fn statement_order(id: &str) -> (bool, u64, String) {
    match id.parse::<u64>() {
        Ok(value) => (false, value, String::new()),
        Err(_) => (true, 0, id.to_string()),
    }
}

fn statement_start_line(entry: &Value, id: &str) -> Option<usize> {
    entry
        .get("statementMap")?
        .get(id)?
        .get("start")?
        .get("line")?
        .as_u64()
        .and_then(|line| usize::try_from(line).ok())
        .filter(|line| *line > 0)
}
