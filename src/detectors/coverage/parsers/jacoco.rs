//! JaCoCo XML report parser.
//!
//! JaCoCo repeats rolled-up LINE counters at every structural level (method,
//! class, sourcefile, package, group, report). Repository totals are taken from
//! the shallowest level that carries any LINE counter so nothing is counted twice.

use std::collections::BTreeMap;

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use tracing::debug;

use super::{attribute_value, base_name};
use crate::core::errors::{Result, TestgapError};
use crate::detectors::coverage::types::{CoverageRecord, Language, UncoveredLocation};

const FORMAT: &str = "jacoco";

/// Parse a JaCoCo report. Without a target the whole report is summed.
///
/// Repository totals are not a sum over every LINE counter in the document.
/// JaCoCo writes rolled-up counters at each level, so only the counters at the
/// shallowest level present are added; a naive sum would count each line once
/// per enclosing element.
pub fn parse_jacoco(bytes: &[u8], target: Option<&str>) -> Result<Option<CoverageRecord>> {
    let scan = scan_report(bytes, target.map(base_name))?;

    match target {
        None => {
            let (covered, missed) = scan.repository_totals();
            debug!(covered, missed, "summed JaCoCo line counters");
            CoverageRecord::repository(Language::Java, covered + missed, covered).map(Some)
        }
        Some(target) => {
            let Some(file) = scan.file else {
                debug!(target, "source file not present in JaCoCo report");
                return Ok(None);
            };
            let language = match Language::from_path(target) {
                Some(Language::Kotlin) => Language::Kotlin,
                _ => Language::Java,
            };
            let uncovered = file
                .uncovered
                .into_iter()
                .map(UncoveredLocation::Line)
                .collect();
            CoverageRecord::new(
                target,
                language,
                file.covered + file.missed,
                file.covered,
                uncovered,
            )
            .map(Some)
        }
    }
}

/// Coverage of the first sourcefile that matched the target and had a LINE counter.
struct SourceFileCoverage {
    covered: usize,
    missed: usize,
    uncovered: Vec<usize>,
}

/// State for the sourcefile currently being read.
#[derive(Default)]
struct OpenSourceFile {
    counter: Option<(usize, usize)>,
    uncovered: Vec<usize>,
}

#[derive(Default)]
struct ReportScan {
    /// Summed (covered, missed) LINE counters keyed by the owning element's depth rank
    counters_by_rank: BTreeMap<u8, (usize, usize)>,
    file: Option<SourceFileCoverage>,
}

impl ReportScan {
    fn repository_totals(&self) -> (usize, usize) {
        self.counters_by_rank
            .values()
            .next()
            .copied()
            .unwrap_or((0, 0))
    }
}

/// Structural rank of a counter's parent element; lower is closer to the root.
fn structural_rank(element: &[u8]) -> u8 {
    match element {
        b"report" => 0,
        b"group" => 1,
        b"package" => 2,
        b"sourcefile" => 3,
        b"class" => 4,
        b"method" => 5,
        _ => 6,
    }
}

fn scan_report(bytes: &[u8], target_name: Option<&str>) -> Result<ReportScan> {
    let mut reader = Reader::from_reader(bytes);
    reader.trim_text(true);
    let mut buf = Vec::new();
    let mut stack: Vec<Vec<u8>> = Vec::new();
    let mut saw_root = false;
    let mut open_file: Option<OpenSourceFile> = None;
    let mut scan = ReportScan::default();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(tag)) => {
                saw_root = true;
                let name = tag.name().as_ref().to_vec();
                if name == b"sourcefile" {
                    let matches = target_name.is_some()
                        && scan.file.is_none()
                        && attribute_value(&tag, b"name").as_deref() == target_name;
                    open_file = matches.then(OpenSourceFile::default);
                }
                handle_element(&tag, stack.last(), open_file.as_mut(), &mut scan)?;
                stack.push(name);
            }
            Ok(Event::Empty(tag)) => {
                saw_root = true;
                handle_element(&tag, stack.last(), open_file.as_mut(), &mut scan)?;
            }
            Ok(Event::End(tag)) => {
                if tag.name().as_ref() == b"sourcefile" {
                    if let Some(file) = open_file.take() {
                        if let Some((covered, missed)) = file.counter {
                            scan.file = Some(SourceFileCoverage {
                                covered,
                                missed,
                                uncovered: file.uncovered,
                            });
                        }
                    }
                }
                stack.pop();
            }
            Ok(Event::Eof) => break,
            Err(err) => {
                return Err(TestgapError::parse(
                    FORMAT,
                    format!("Failed to parse JaCoCo XML: {}", err),
                ));
            }
            _ => {}
        }
        buf.clear();
    }

    if !saw_root {
        return Err(TestgapError::parse(FORMAT, "document has no root element"));
    }
    if let Some(unclosed) = stack.last() {
        return Err(TestgapError::parse(
            FORMAT,
            format!(
                "unexpected end of document inside <{}>",
                String::from_utf8_lossy(unclosed)
            ),
        ));
    }

    Ok(scan)
}

fn handle_element(
    tag: &BytesStart<'_>,
    parent: Option<&Vec<u8>>,
    open_file: Option<&mut OpenSourceFile>,
    scan: &mut ReportScan,
) -> Result<()> {
    match tag.name().as_ref() {
        b"counter" => {
            if attribute_value(tag, b"type").as_deref() != Some("LINE") {
                return Ok(());
            }
            let covered = numeric_attribute(tag, b"covered")?;
            let missed = numeric_attribute(tag, b"missed")?;
            let parent = parent.map(Vec::as_slice).unwrap_or_default();

            let totals = scan
                .counters_by_rank
                .entry(structural_rank(parent))
                .or_insert((0, 0));
            totals.0 += covered;
            totals.1 += missed;

            if parent == b"sourcefile" {
                if let Some(file) = open_file {
                    file.counter.get_or_insert((covered, missed));
                }
            }
        }
        b"line" => {
            if let Some(file) = open_file {
                let missed = attribute_value(tag, b"ci").as_deref() == Some("0");
                if missed && attribute_value(tag, b"nr").is_some() {
                    file.uncovered.push(numeric_attribute(tag, b"nr")?);
                }
            }
        }
        _ => {}
    }
    Ok(())
}

/// Read a numeric attribute, treating an absent attribute as zero.
fn numeric_attribute(tag: &BytesStart<'_>, name: &[u8]) -> Result<usize> {
    match attribute_value(tag, name) {
        None => Ok(0),
        Some(raw) => raw.trim().parse::<usize>().map_err(|err| {
            TestgapError::parse(
                FORMAT,
                format!(
                    "attribute '{}' has non-numeric value '{}': {}",
                    String::from_utf8_lossy(name),
                    raw,
                    err
                ),
            )
        }),
    }
}
