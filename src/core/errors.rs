//! Error types for the testgap-rs library.
//!
//! Parsers are the only stage that fails on bad input; classification,
//! suggestion generation and aggregation are total. Every failure surfaced by
//! the crate is therefore either a rejected report, a bad configuration, or an
//! I/O problem at the file-reading edge.

use std::io;

use thiserror::Error;

/// Main result type for testgap operations.
pub type Result<T> = std::result::Result<T, TestgapError>;

/// Error type for all testgap operations.
#[derive(Error, Debug)]
pub enum TestgapError {
    /// I/O related errors (reading reports, config files)
    #[error("I/O error: {message}")]
    Io {
        /// Human-readable error message
        message: String,
        /// Underlying I/O error
        #[source]
        source: io::Error,
    },

    /// Configuration errors
    #[error("Configuration error: {message}")]
    Config {
        /// Error description
        message: String,
        /// Configuration field that caused the error
        field: Option<String>,
    },

    /// Structurally invalid coverage report
    #[error("Parse error in {format} report: {message}")]
    Parse {
        /// Report format being parsed
        format: String,
        /// Error description
        message: String,
        /// Line in the report where the problem was found (if available)
        line: Option<usize>,
    },

    /// Serialization/deserialization errors
    #[error("Serialization error: {message}")]
    Serialization {
        /// Error description
        message: String,
        /// Data type being serialized
        data_type: Option<String>,
        /// Underlying serialization error
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Validation errors for input data
    #[error("Validation error: {message}")]
    Validation {
        /// Error description
        message: String,
        /// Field or input that failed validation
        field: Option<String>,
    },

    /// Unsupported operation or input
    #[error("Unsupported: {message}")]
    Unsupported {
        /// Error description
        message: String,
    },
}

impl TestgapError {
    /// Create a new I/O error with context
    pub fn io(message: impl Into<String>, source: io::Error) -> Self {
        Self::Io {
            message: message.into(),
            source,
        }
    }

    /// Create a new configuration error with field context
    pub fn config_field(message: impl Into<String>, field: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
            field: Some(field.into()),
        }
    }

    /// Create a new report parse error
    pub fn parse(format: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Parse {
            format: format.into(),
            message: message.into(),
            line: None,
        }
    }

    /// Create a new report parse error pointing at a report line
    pub fn parse_at_line(format: impl Into<String>, message: impl Into<String>, line: usize) -> Self {
        Self::Parse {
            format: format.into(),
            message: message.into(),
            line: Some(line),
        }
    }

    /// Create a new validation error with field context
    pub fn validation_field(message: impl Into<String>, field: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
            field: Some(field.into()),
        }
    }

    /// Create a new unsupported error
    pub fn unsupported(message: impl Into<String>) -> Self {
        Self::Unsupported {
            message: message.into(),
        }
    }

    /// Prefix the error message with additional context
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        let context = context.into();
        match &mut self {
            Self::Io { message, .. }
            | Self::Config { message, .. }
            | Self::Parse { message, .. }
            | Self::Serialization { message, .. }
            | Self::Validation { message, .. }
            | Self::Unsupported { message } => {
                *message = format!("{context}: {message}");
            }
        }
        self
    }
}

impl From<io::Error> for TestgapError {
    fn from(err: io::Error) -> Self {
        Self::io("I/O operation failed", err)
    }
}

impl From<serde_json::Error> for TestgapError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            message: format!("JSON serialization failed: {err}"),
            data_type: Some("JSON".to_string()),
            source: Some(Box::new(err)),
        }
    }
}

impl From<serde_yaml::Error> for TestgapError {
    fn from(err: serde_yaml::Error) -> Self {
        Self::Serialization {
            message: format!("YAML serialization failed: {err}"),
            data_type: Some("YAML".to_string()),
            source: Some(Box::new(err)),
        }
    }
}

/// Result extension trait for adding context to errors
pub trait ResultExt<T> {
    /// Add lazily built context to an error result
    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String;

    /// Add static context to an error result
    fn context(self, msg: &'static str) -> Result<T>;
}

impl<T, E> ResultExt<T> for std::result::Result<T, E>
where
    E: Into<TestgapError>,
{
    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| e.into().with_context(f()))
    }

    fn context(self, msg: &'static str) -> Result<T> {
        self.map_err(|e| e.into().with_context(msg))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let err = TestgapError::unsupported("coverage.lcov");
        assert!(matches!(err, TestgapError::Unsupported { .. }));

        let err = TestgapError::parse("jacoco", "unexpected end of document");
        assert!(matches!(err, TestgapError::Parse { .. }));
    }

    #[test]
    fn test_parse_error_display_names_format() {
        let err = TestgapError::parse_at_line("profile", "bad block", 3);
        let display = err.to_string();
        assert!(display.contains("Parse error in profile report"));
        assert!(display.contains("bad block"));

        if let TestgapError::Parse { line, .. } = err {
            assert_eq!(line, Some(3));
        } else {
            panic!("Expected Parse error");
        }
    }

    #[test]
    fn test_with_context_prefixes_message() {
        let err = TestgapError::validation_field("covered exceeds total", "covered_lines")
            .with_context("record a.py");
        if let TestgapError::Validation { message, .. } = err {
            assert_eq!(message, "record a.py: covered exceeds total");
        } else {
            panic!("Expected Validation error");
        }
    }

    #[test]
    fn test_config_field_error() {
        let err = TestgapError::config_field("Invalid value", "max_line_suggestions");

        if let TestgapError::Config { message, field } = err {
            assert_eq!(message, "Invalid value");
            assert_eq!(field, Some("max_line_suggestions".to_string()));
        } else {
            panic!("Expected Config error");
        }
    }

    #[test]
    fn test_result_ext_context() {
        let result: std::result::Result<i32, std::io::Error> = Err(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "File not found",
        ));

        let err = result.context("Failed to read report").unwrap_err();
        if let TestgapError::Io { message, source } = err {
            assert!(message.starts_with("Failed to read report"));
            assert_eq!(source.kind(), std::io::ErrorKind::NotFound);
        } else {
            panic!("Expected Io error");
        }
    }

    #[test]
    fn test_from_json_error() {
        let json_err = serde_json::from_str::<i32>("invalid json").unwrap_err();
        let err: TestgapError = json_err.into();

        if let TestgapError::Serialization { data_type, .. } = err {
            assert_eq!(data_type, Some("JSON".to_string()));
        } else {
            panic!("Expected Serialization error");
        }
    }

    #[test]
    fn test_from_yaml_error() {
        let yaml_err = serde_yaml::from_str::<i32>("invalid: yaml: content").unwrap_err();
        let err: TestgapError = yaml_err.into();

        if let TestgapError::Serialization { data_type, .. } = err {
            assert_eq!(data_type, Some("YAML".to_string()));
        } else {
            panic!("Expected Serialization error");
        }
    }
}
