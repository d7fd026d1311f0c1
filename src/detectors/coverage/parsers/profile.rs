//! Go cover profile parser.
//!
//! Standard block lines look like `path/file.go:10.2,12.16 3 1` (location,
//! statement count, execution count). Lines whose second token is a
//! `total/covered` ratio are accepted as well and summed verbatim.

use std::collections::{BTreeMap, BTreeSet};

use tracing::debug;

use super::record_path;
use crate::core::errors::{Result, TestgapError};
use crate::detectors::coverage::types::{CoverageRecord, Language, UncoveredLocation};

const FORMAT: &str = "profile";

/// Widest line span a single block may cover; a basic block longer than this
/// is a corrupt location.
const MAX_BLOCK_SPAN: usize = 10_000;

/// One profile block; duplicates from merged profiles keep the highest count.
struct Block {
    statements: usize,
    count: u64,
    start_line: usize,
    end_line: usize,
}

/// Parse a cover profile, keeping only blocks of `target` when given.
pub fn parse_profile(bytes: &[u8], target: Option<&str>) -> Result<Option<CoverageRecord>> {
    let text = String::from_utf8_lossy(bytes);
    let mut blocks: BTreeMap<&str, Block> = BTreeMap::new();
    let mut ratio_total = 0usize;
    let mut ratio_covered = 0usize;
    let mut matched = false;

    for (index, raw) in text.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with("mode:") {
            continue;
        }
        let parts: Vec<&str> = line.split_whitespace().collect();
        if parts.len() < 3 {
            continue;
        }

        let location = parts[0];
        let file = location.rsplit_once(':').map_or(location, |(file, _)| file);
        if let Some(target) = target {
            if !file.contains(target) {
                continue;
            }
        }
        matched = true;

        if let Some((total, covered)) = parts[1].split_once('/') {
            let total = parse_count(total, index)?;
            let covered = parse_count(covered, index)?;
            if covered > total {
                return Err(TestgapError::parse_at_line(
                    FORMAT,
                    format!("covered count {} exceeds total {}", covered, total),
                    index + 1,
                ));
            }
            ratio_total += total;
            ratio_covered += covered;
            continue;
        }

        let statements = parse_count(parts[1], index)?;
        let count = parse_count(parts[2], index)? as u64;
        let (start_line, end_line) = block_lines(location, index)?;
        blocks
            .entry(location)
            .and_modify(|block| block.count = block.count.max(count))
            .or_insert(Block {
                statements,
                count,
                start_line,
                end_line,
            });
    }

    if target.is_some() && !matched {
        debug!(target, "no profile blocks matched target");
        return Ok(None);
    }

    let block_total: usize = blocks.values().map(|block| block.statements).sum();
    let block_covered: usize = blocks
        .values()
        .filter(|block| block.count > 0)
        .map(|block| block.statements)
        .sum();

    let uncovered = if target.is_some() {
        blocks
            .values()
            .filter(|block| block.count == 0)
            .flat_map(|block| block.start_line..=block.end_line)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .map(UncoveredLocation::Line)
            .collect()
    } else {
        Vec::new()
    };

    debug!(
        blocks = blocks.len(),
        ratio_total, ratio_covered, "parsed cover profile"
    );

    CoverageRecord::new(
        record_path(target),
        Language::Go,
        ratio_total + block_total,
        ratio_covered + block_covered,
        uncovered,
    )
    .map(Some)
}

fn parse_count(raw: &str, index: usize) -> Result<usize> {
    raw.trim().parse::<usize>().map_err(|err| {
        TestgapError::parse_at_line(
            FORMAT,
            format!("expected a count, found '{}': {}", raw, err),
            index + 1,
        )
    })
}

/// Start and end line of a `file:l0.c0,l1.c1` block location.
fn block_lines(location: &str, index: usize) -> Result<(usize, usize)> {
    let malformed = || {
        TestgapError::parse_at_line(
            FORMAT,
            format!("malformed block location '{}'", location),
            index + 1,
        )
    };

    let (_, span) = location.rsplit_once(':').ok_or_else(malformed)?;
    let (start, end) = span.split_once(',').ok_or_else(malformed)?;
    let line_of = |pos: &str| {
        pos.split('.')
            .next()
            .and_then(|line| line.parse::<usize>().ok())
            .ok_or_else(malformed)
    };

    let start_line = line_of(start)?;
    let end_line = line_of(end)?;
    if end_line < start_line || end_line - start_line > MAX_BLOCK_SPAN {
        return Err(malformed());
    }
    Ok((start_line, end_line))
}
