//! Keyword classification of uncovered source lines.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::types::Language;

/// Kind of test an uncovered line most likely needs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LineCategory {
    NullCheck,
    EdgeCase,
    ErrorHandling,
    Boundary,
    ControlFlow,
    General,
}

impl LineCategory {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::NullCheck => "null_check",
            Self::EdgeCase => "edge_case",
            Self::ErrorHandling => "error_handling",
            Self::Boundary => "boundary",
            Self::ControlFlow => "control_flow",
            Self::General => "general",
        }
    }

    /// Suggestion text for an uncovered line of this category.
    pub fn describe(self, code_line: &str) -> String {
        let code_line = code_line.trim();
        match self {
            Self::NullCheck => format!("Add test case for null/empty input: '{code_line}'"),
            Self::EdgeCase => format!("Add test case for edge condition: '{code_line}'"),
            Self::ErrorHandling => format!("Add test case for error scenario: '{code_line}'"),
            Self::Boundary => format!("Add test case for boundary condition: '{code_line}'"),
            Self::ControlFlow => format!("Add test case for control flow: '{code_line}'"),
            Self::General => format!("Add test case for uncovered line: '{code_line}'"),
        }
    }
}

impl fmt::Display for LineCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Keyword rules in precedence order; the first rule with a matching keyword wins.
const RULES: &[(LineCategory, &[&str])] = &[
    (LineCategory::NullCheck, &["null", "none", "undefined"]),
    (LineCategory::EdgeCase, &["if", "else", "switch", "case"]),
    (LineCategory::ErrorHandling, &["try", "catch", "except", "throw"]),
    (LineCategory::Boundary, &["<", ">", "<=", ">="]),
    (LineCategory::ControlFlow, &["return", "break", "continue"]),
];

/// Classify a source line by case-insensitive substring match.
///
/// Keywords are matched as plain substrings, so `"notify"` counts as `if`. The
/// same keyword table is used for every language.
pub fn classify(code_line: &str, _language: Language) -> LineCategory {
    let lowered = code_line.to_lowercase();
    RULES
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|keyword| lowered.contains(keyword)))
        .map_or(LineCategory::General, |(category, _)| *category)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn null_check_takes_precedence_over_conditionals() {
        assert_eq!(
            classify("if user is null:", Language::Python),
            LineCategory::NullCheck
        );
        assert_eq!(
            classify("if (value === undefined) {", Language::JavaScript),
            LineCategory::NullCheck
        );
    }

    #[test]
    fn each_rule_is_reachable() {
        assert_eq!(classify("} else {", Language::Java), LineCategory::EdgeCase);
        assert_eq!(classify("switch (kind) {", Language::Java), LineCategory::EdgeCase);
        assert_eq!(
            classify("except ValueError as err:", Language::Python),
            LineCategory::ErrorHandling
        );
        assert_eq!(
            classify("throw new IllegalStateException();", Language::Java),
            LineCategory::ErrorHandling
        );
        assert_eq!(classify("for i < n {", Language::Go), LineCategory::Boundary);
        assert_eq!(classify("return total", Language::Go), LineCategory::ControlFlow);
        assert_eq!(classify("total += 1", Language::Go), LineCategory::General);
    }

    #[test]
    fn matching_is_case_insensitive() {
        assert_eq!(classify("return None", Language::Python), LineCategory::NullCheck);
        assert_eq!(classify("IF X THEN", Language::Python), LineCategory::EdgeCase);
        assert_eq!(classify("TRY {", Language::Kotlin), LineCategory::ErrorHandling);
    }

    #[test]
    fn keywords_match_inside_identifiers() {
        assert_eq!(classify("notify(listener)", Language::Java), LineCategory::EdgeCase);
        assert_eq!(classify("retry()", Language::Java), LineCategory::ErrorHandling);
    }

    #[test]
    fn blank_lines_are_general() {
        assert_eq!(classify("", Language::Go), LineCategory::General);
        assert_eq!(classify("   ", Language::Go), LineCategory::General);
    }

    #[test]
    fn descriptions_embed_trimmed_line() {
        assert_eq!(
            LineCategory::Boundary.describe("    if n >= limit {  "),
            "Add test case for boundary condition: 'if n >= limit {'"
        );
        assert_eq!(
            LineCategory::General.describe("x = 1"),
            "Add test case for uncovered line: 'x = 1'"
        );
    }

    #[test]
    fn categories_serialize_in_snake_case() {
        assert_eq!(
            serde_json::to_string(&LineCategory::ErrorHandling).unwrap(),
            "\"error_handling\""
        );
        assert_eq!(LineCategory::ControlFlow.to_string(), "control_flow");
    }

    proptest! {
        #[test]
        fn classification_is_deterministic(line in ".{0,80}") {
            let first = classify(&line, Language::Java);
            let second = classify(&line, Language::Java);
            prop_assert_eq!(first, second);
        }

        #[test]
        fn classification_ignores_case(line in "[ -~]{0,60}") {
            prop_assert_eq!(
                classify(&line.to_uppercase(), Language::Python),
                classify(&line.to_lowercase(), Language::Python)
            );
        }
    }
}
