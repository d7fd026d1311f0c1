//! Coverage report parsing and test suggestion generation.
//!
//! Reports from JaCoCo, Istanbul, coverage.py and Go's cover tool are normalized
//! into [`CoverageRecord`]s. Records plus source text then feed the
//! [`SuggestionGenerator`], which classifies each uncovered line and proposes a test.

pub mod classifier;
pub mod parsers;
pub mod source;
pub mod suggestions;
pub mod types;

pub use classifier::{classify, LineCategory};
pub use parsers::{detect_format, parse_report_file};
pub use source::{decode_source, SourceLines};
pub use suggestions::{Priority, Suggestion, SuggestionGenerator};
pub use types::*;
