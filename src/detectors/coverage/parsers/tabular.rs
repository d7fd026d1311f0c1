//! coverage.py `report` table parser.
//!
//! Only the `TOTAL` row is read, so records from this format never carry
//! uncovered-line detail. Columns are `Name Stmts Miss [Branch BrPart] Cover`.

use tracing::debug;

use super::record_path;
use crate::core::errors::{Result, TestgapError};
use crate::detectors::coverage::types::{CoverageRecord, Language};

const FORMAT: &str = "tabular";

/// Parse the aggregate `TOTAL` row of a coverage table.
pub fn parse_tabular(bytes: &[u8], target: Option<&str>) -> Result<Option<CoverageRecord>> {
    let text = String::from_utf8_lossy(bytes);

    for (index, line) in text.lines().enumerate() {
        let columns: Vec<&str> = line.split_whitespace().collect();
        if columns.first() != Some(&"TOTAL") || columns.len() < 4 {
            continue;
        }

        let statements = parse_column(columns[1], "Stmts", index)?;
        let missed = parse_column(columns[2], "Miss", index)?;
        let covered = statements.saturating_sub(missed);
        debug!(statements, missed, "read coverage table TOTAL row");

        return CoverageRecord::new(
            record_path(target),
            Language::Python,
            statements,
            covered,
            Vec::new(),
        )
        .map(Some);
    }

    debug!("coverage table has no TOTAL row");
    Ok(None)
}

fn parse_column(raw: &str, column: &str, index: usize) -> Result<usize> {
    raw.parse::<usize>().map_err(|err| {
        TestgapError::parse_at_line(
            FORMAT,
            format!("{} column of TOTAL row is not a count ('{}'): {}", column, raw, err),
            index + 1,
        )
    })
}
