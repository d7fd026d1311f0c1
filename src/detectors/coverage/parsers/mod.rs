//! Coverage report parsers, one per toolchain, behind a single contract:
//! raw report bytes plus an optional target file in, `Option<CoverageRecord>` out.
//!
//! `Ok(None)` means the target could not be located in the report. Structurally
//! invalid input is always an error.

mod istanbul;
mod jacoco;
mod profile;
mod tabular;

pub use istanbul::parse_istanbul;
pub use jacoco::parse_jacoco;
pub use profile::parse_profile;
pub use tabular::parse_tabular;

use std::fs;
use std::path::Path;

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use tracing::debug;

use crate::core::errors::{Result, ResultExt, TestgapError};
use crate::detectors::coverage::types::{CoverageRecord, ReportFormat, REPOSITORY_SENTINEL};

impl ReportFormat {
    /// Parse a report of this format, either whole-repository (`target = None`)
    /// or for a single file.
    pub fn parse(self, bytes: &[u8], target: Option<&str>) -> Result<Option<CoverageRecord>> {
        debug!(format = %self, target, "parsing coverage report");
        match self {
            Self::JaCoCo => parse_jacoco(bytes, target),
            Self::Istanbul => parse_istanbul(bytes, target),
            Self::Tabular => parse_tabular(bytes, target),
            Self::Profile => parse_profile(bytes, target),
        }
    }
}

/// Read and parse a report file, detecting its format when not given.
pub fn parse_report_file(
    path: &Path,
    format: Option<ReportFormat>,
    target: Option<&str>,
) -> Result<Option<CoverageRecord>> {
    let bytes = fs::read(path)
        .with_context(|| format!("Failed to read coverage report at {}", path.display()))?;

    let format = match format.or_else(|| detect_format(path, &bytes)) {
        Some(format) => format,
        None => {
            return Err(TestgapError::unsupported(format!(
                "Unsupported or unknown coverage report format: {}",
                path.display()
            )))
        }
    };

    format.parse(&bytes, target)
}

/// Detect the report format using the file name and the leading content bytes.
pub fn detect_format(path: &Path, bytes: &[u8]) -> Option<ReportFormat> {
    if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
        match ext.to_ascii_lowercase().as_str() {
            "json" => return Some(ReportFormat::Istanbul),
            "xml" => return Some(ReportFormat::JaCoCo),
            _ => {}
        }
    }

    let snippet = String::from_utf8_lossy(&bytes[..bytes.len().min(4096)]);
    let trimmed = snippet.trim_start();

    if trimmed.starts_with('{') {
        return Some(ReportFormat::Istanbul);
    }
    if trimmed.starts_with("mode:") {
        return Some(ReportFormat::Profile);
    }
    if trimmed.starts_with('<') && root_element_is(bytes, b"report") {
        return Some(ReportFormat::JaCoCo);
    }
    if trimmed
        .lines()
        .next()
        .is_some_and(|header| header.split_whitespace().take(3).eq(["Name", "Stmts", "Miss"]))
    {
        return Some(ReportFormat::Tabular);
    }

    None
}

fn root_element_is(bytes: &[u8], expected: &[u8]) -> bool {
    let mut reader = Reader::from_reader(bytes);
    reader.trim_text(true);
    let mut buf = Vec::new();
    while let Ok(event) = reader.read_event_into(&mut buf) {
        match event {
            Event::Start(tag) | Event::Empty(tag) => return tag.name().as_ref() == expected,
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }
    false
}

/// File path for aggregate-style formats: the target when given, else the repository.
pub(crate) fn record_path(target: Option<&str>) -> &str {
    target.unwrap_or(REPOSITORY_SENTINEL)
}

/// Final path component of a target, as JaCoCo names its source files.
pub(crate) fn base_name(target: &str) -> &str {
    target
        .rsplit(&['/', '\\'][..])
        .next()
        .unwrap_or(target)
}

pub(crate) fn attribute_value(tag: &BytesStart<'_>, name: &[u8]) -> Option<String> {
    tag.attributes()
        .with_checks(false)
        .flatten()
        .find(|attr| attr.key.as_ref() == name)
        .and_then(|attr| String::from_utf8(attr.value.into_owned()).ok())
}
