//! # testgap-rs: Coverage Gap Analysis
//!
//! Normalizes coverage reports from several toolchains into one record shape and
//! turns uncovered lines into concrete missing-test suggestions:
//!
//! - **Report Parsing**: JaCoCo XML, Istanbul JSON, coverage.py tables, Go cover profiles
//! - **Line Classification**: keyword-based categories for uncovered source lines
//! - **Suggestions**: per-line and per-file test recommendations with priorities
//! - **Aggregation**: run-wide totals, priority buckets and recommendation text
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                        API Layer                            │
//! │             ReportBuilder  •  AnalysisContext               │
//! ├─────────────────────────────────────────────────────────────┤
//! │  Core           │  Coverage Detectors                       │
//! │ • Config        │ • Parsers (jacoco/istanbul/tabular/profile)│
//! │ • Errors        │ • Classifier  • Suggestions  • Source     │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::path::Path;
//! use testgap_rs::{AnalysisContext, ReportBuilder, SuggestionGenerator, TestgapConfig};
//! use testgap_rs::detectors::coverage::parse_report_file;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = TestgapConfig::default();
//!     let record = parse_report_file(Path::new("coverage/coverage-final.json"), None, Some("src/app.js"))?;
//!
//!     let records: Vec<_> = record.into_iter().collect();
//!     let source = std::fs::read_to_string("src/app.js").ok();
//!     let generator = SuggestionGenerator::new(config.suggestions.clone());
//!     let suggestions: Vec<_> = records
//!         .iter()
//!         .flat_map(|record| generator.generate(record, source.as_deref()))
//!         .collect();
//!
//!     let mut ctx = AnalysisContext::new();
//!     let report = ReportBuilder::new(config.recommendations).build(&mut ctx, &records, &suggestions);
//!     println!("{}", serde_json::to_string_pretty(&report)?);
//!     Ok(())
//! }
//! ```

#![warn(unsafe_code)]
#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![cfg_attr(docsrs, feature(doc_cfg))]

// Configuration and error handling
pub mod core {
    //! Configuration and error types shared by every stage.

    pub mod config;
    pub mod errors;
}

// Coverage parsing and suggestion generation
pub mod detectors {
    //! Coverage detectors.

    pub mod coverage;
}

// Public API: aggregation and run context
pub mod api {
    //! Report aggregation and per-run context.

    pub mod context;
    pub mod report;
}

// Re-export primary types for convenience
pub use api::context::AnalysisContext;
pub use api::report::{AggregateReport, CoverageReport, ReportBuilder};
pub use core::config::TestgapConfig;
pub use core::errors::{Result, ResultExt, TestgapError};
pub use detectors::coverage::{
    CoverageRecord, Language, ReportFormat, Suggestion, SuggestionGenerator,
};

/// Library version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
