use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::path::Path;

use crate::core::errors::{Result, TestgapError};

/// File path used for records that summarize a whole repository.
pub const REPOSITORY_SENTINEL: &str = "repository";

/// Languages whose coverage tooling the engine understands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    Java,
    Kotlin,
    JavaScript,
    TypeScript,
    Python,
    Go,
}

impl Language {
    /// Detect a language from a source file extension.
    pub fn from_path(path: impl AsRef<Path>) -> Option<Self> {
        let ext = path.as_ref().extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "java" => Some(Self::Java),
            "kt" | "kts" => Some(Self::Kotlin),
            "js" | "jsx" | "mjs" | "cjs" => Some(Self::JavaScript),
            "ts" | "tsx" => Some(Self::TypeScript),
            "py" => Some(Self::Python),
            "go" => Some(Self::Go),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Java => "java",
            Self::Kotlin => "kotlin",
            Self::JavaScript => "javascript",
            Self::TypeScript => "typescript",
            Self::Python => "python",
            Self::Go => "go",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Coverage report formats, one per supported toolchain
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportFormat {
    /// JaCoCo XML (Java, Kotlin)
    #[serde(rename = "jacoco")]
    JaCoCo,
    /// Istanbul `coverage-final.json` (JavaScript, TypeScript)
    Istanbul,
    /// coverage.py `report` table (Python)
    Tabular,
    /// Go `-coverprofile` output
    Profile,
}

impl ReportFormat {
    /// Report format produced by the standard toolchain of a language.
    pub fn for_language(language: Language) -> Self {
        match language {
            Language::Java | Language::Kotlin => Self::JaCoCo,
            Language::JavaScript | Language::TypeScript => Self::Istanbul,
            Language::Python => Self::Tabular,
            Language::Go => Self::Profile,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::JaCoCo => "jacoco",
            Self::Istanbul => "istanbul",
            Self::Tabular => "tabular",
            Self::Profile => "profile",
        }
    }

    /// Conventional report locations, relative to a project root, in lookup order.
    pub fn default_report_paths(self) -> &'static [&'static str] {
        match self {
            Self::JaCoCo => &[
                "target/site/jacoco/jacoco.xml",
                "build/reports/jacoco/test/jacocoTestReport.xml",
                "jacoco.xml",
            ],
            Self::Istanbul => &[
                "coverage/coverage-final.json",
                "coverage.json",
                ".nyc_output/out.json",
            ],
            Self::Tabular => &["coverage.txt"],
            Self::Profile => &["coverage.out"],
        }
    }
}

impl fmt::Display for ReportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One entry of a record's uncovered list, at the granularity the report supports.
///
/// Serializes as a bare number for lines and a bare string for statement ids.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum UncoveredLocation {
    /// A 1-indexed source line
    Line(usize),
    /// An Istanbul statement id, with its start line when the report maps it
    Statement { id: String, line: Option<usize> },
}

impl UncoveredLocation {
    pub fn statement(id: impl Into<String>, line: Option<usize>) -> Self {
        Self::Statement {
            id: id.into(),
            line,
        }
    }

    /// The 1-indexed source line this location resolves to, if known.
    pub fn source_line(&self) -> Option<usize> {
        match self {
            Self::Line(line) => Some(*line),
            Self::Statement { line, .. } => *line,
        }
    }
}

impl From<usize> for UncoveredLocation {
    fn from(line: usize) -> Self {
        Self::Line(line)
    }
}

impl fmt::Display for UncoveredLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Line(line) => write!(f, "{line}"),
            Self::Statement { id, .. } => write!(f, "{id}"),
        }
    }
}

impl Serialize for UncoveredLocation {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            Self::Line(line) => serializer.serialize_u64(*line as u64),
            Self::Statement { id, .. } => serializer.serialize_str(id),
        }
    }
}

impl<'de> Deserialize<'de> for UncoveredLocation {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Line(usize),
            Statement(String),
        }

        Ok(match Raw::deserialize(deserializer)? {
            Raw::Line(line) => Self::Line(line),
            Raw::Statement(id) => Self::Statement { id, line: None },
        })
    }
}

/// Normalized line-coverage summary for one file or a whole repository.
///
/// `covered_lines <= total_lines` holds for every constructed value; the
/// percentage is derived on demand and never stored.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CoverageRecord {
    file_path: String,
    language: Language,
    total_lines: usize,
    covered_lines: usize,
    uncovered_lines: Vec<UncoveredLocation>,
}

impl CoverageRecord {
    pub fn new(
        file_path: impl Into<String>,
        language: Language,
        total_lines: usize,
        covered_lines: usize,
        uncovered_lines: Vec<UncoveredLocation>,
    ) -> Result<Self> {
        let file_path = file_path.into();
        if covered_lines > total_lines {
            return Err(TestgapError::validation_field(
                format!(
                    "covered lines ({covered_lines}) exceed total lines ({total_lines}) for {file_path}"
                ),
                "covered_lines",
            ));
        }

        Ok(Self {
            file_path,
            language,
            total_lines,
            covered_lines,
            uncovered_lines,
        })
    }

    /// Record summarizing a whole repository, without line detail.
    pub fn repository(language: Language, total_lines: usize, covered_lines: usize) -> Result<Self> {
        Self::new(
            REPOSITORY_SENTINEL,
            language,
            total_lines,
            covered_lines,
            Vec::new(),
        )
    }

    pub fn file_path(&self) -> &str {
        &self.file_path
    }

    pub fn language(&self) -> Language {
        self.language
    }

    pub fn total_lines(&self) -> usize {
        self.total_lines
    }

    pub fn covered_lines(&self) -> usize {
        self.covered_lines
    }

    pub fn missed_lines(&self) -> usize {
        self.total_lines - self.covered_lines
    }

    pub fn uncovered_lines(&self) -> &[UncoveredLocation] {
        &self.uncovered_lines
    }

    pub fn is_repository(&self) -> bool {
        self.file_path == REPOSITORY_SENTINEL
    }

    /// `covered / total * 100`, or 0 for an empty record.
    pub fn coverage_percentage(&self) -> f64 {
        if self.total_lines == 0 {
            0.0
        } else {
            self.covered_lines as f64 / self.total_lines as f64 * 100.0
        }
    }
}
