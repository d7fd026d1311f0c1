//! Configuration types for the suggestion engine and report aggregator.
//!
//! All thresholds are percentages in `0.0..=100.0`. Every field carries a serde
//! default so partial YAML documents load cleanly.

pub mod validation;

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::core::errors::{Result, ResultExt, TestgapError};

pub use validation::{
    validate_percentage, validate_range_usize, validate_threshold_order,
};

/// Hard upper bound on line-level suggestions per file.
pub const MAX_LINE_SUGGESTIONS: usize = 10;

/// Top-level configuration for a testgap analysis run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TestgapConfig {
    /// Per-file suggestion generation settings
    #[serde(default)]
    pub suggestions: SuggestionConfig,

    /// Recommendation thresholds used by the report aggregator
    #[serde(default)]
    pub recommendations: RecommendationConfig,
}

impl TestgapConfig {
    /// Load configuration from a YAML file
    pub fn from_yaml_file(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let content = std::fs::read_to_string(&path).map_err(|e| {
            TestgapError::io(format!("Failed to read config file: {}", path.display()), e)
        })?;

        Self::from_yaml_str(&content)
    }

    /// Parse and validate configuration from a YAML document
    pub fn from_yaml_str(content: &str) -> Result<Self> {
        let config: Self =
            serde_yaml::from_str(content).context("Failed to parse configuration YAML")?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a YAML file
    pub fn to_yaml_file(&self, path: impl Into<PathBuf>) -> Result<()> {
        let path = path.into();
        let content = serde_yaml::to_string(self)?;
        std::fs::write(&path, content).map_err(|e| {
            TestgapError::io(
                format!("Failed to write config file: {}", path.display()),
                e,
            )
        })
    }

    /// Validate configuration settings
    pub fn validate(&self) -> Result<()> {
        self.suggestions.validate()?;
        self.recommendations.validate()?;
        Ok(())
    }
}

/// Settings for per-file suggestion generation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuggestionConfig {
    /// Maximum number of uncovered entries turned into line-level suggestions per file,
    /// at most [`MAX_LINE_SUGGESTIONS`]
    #[serde(default = "SuggestionConfig::default_max_line_suggestions")]
    pub max_line_suggestions: usize,

    /// Files below this coverage percentage receive a file-level suggestion
    #[serde(default = "SuggestionConfig::default_file_level_threshold")]
    pub file_level_threshold: f64,

    /// Files below this coverage percentage get a high-priority file-level suggestion
    #[serde(default = "SuggestionConfig::default_critical_threshold")]
    pub critical_threshold: f64,
}

impl Default for SuggestionConfig {
    fn default() -> Self {
        Self {
            max_line_suggestions: Self::default_max_line_suggestions(),
            file_level_threshold: Self::default_file_level_threshold(),
            critical_threshold: Self::default_critical_threshold(),
        }
    }
}

impl SuggestionConfig {
    const fn default_max_line_suggestions() -> usize {
        MAX_LINE_SUGGESTIONS
    }

    const fn default_file_level_threshold() -> f64 {
        80.0
    }

    const fn default_critical_threshold() -> f64 {
        50.0
    }

    /// Validate suggestion settings
    pub fn validate(&self) -> Result<()> {
        validate_range_usize(
            self.max_line_suggestions,
            1,
            MAX_LINE_SUGGESTIONS,
            "suggestions.max_line_suggestions",
        )?;
        validate_percentage(self.file_level_threshold, "suggestions.file_level_threshold")?;
        validate_percentage(self.critical_threshold, "suggestions.critical_threshold")?;
        validate_threshold_order(
            self.critical_threshold,
            self.file_level_threshold,
            "suggestions.critical_threshold",
        )
    }
}

/// Overall-coverage thresholds that select recommendation messages
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendationConfig {
    /// Overall coverage below this value triggers the critical message
    #[serde(default = "RecommendationConfig::default_critical_threshold")]
    pub critical_threshold: f64,

    /// Overall coverage below this value (and above critical) triggers the improvement message
    #[serde(default = "RecommendationConfig::default_improvement_threshold")]
    pub improvement_threshold: f64,
}

impl Default for RecommendationConfig {
    fn default() -> Self {
        Self {
            critical_threshold: Self::default_critical_threshold(),
            improvement_threshold: Self::default_improvement_threshold(),
        }
    }
}

impl RecommendationConfig {
    const fn default_critical_threshold() -> f64 {
        50.0
    }

    const fn default_improvement_threshold() -> f64 {
        80.0
    }

    /// Validate recommendation thresholds
    pub fn validate(&self) -> Result<()> {
        validate_percentage(self.critical_threshold, "recommendations.critical_threshold")?;
        validate_percentage(
            self.improvement_threshold,
            "recommendations.improvement_threshold",
        )?;
        validate_threshold_order(
            self.critical_threshold,
            self.improvement_threshold,
            "recommendations.critical_threshold",
        )
    }
}
