use super::*;
use crate::detectors::coverage::types::Language;
use approx::assert_relative_eq;
use chrono::TimeZone;
use proptest::prelude::*;
use serde_json::json;

fn fixed_context() -> AnalysisContext {
    AnalysisContext::at(Utc.with_ymd_and_hms(2024, 5, 17, 9, 0, 0).unwrap())
}

fn record(path: &str, total: usize, covered: usize) -> CoverageRecord {
    CoverageRecord::new(path, Language::Java, total, covered, Vec::new()).unwrap()
}

fn suggestion(path: &str, category: LineCategory, priority: Priority) -> Suggestion {
    Suggestion {
        file_path: path.to_string(),
        line_number: 3,
        category,
        description: format!("Add test case for {category}"),
        priority,
        code_snippet: "x".to_string(),
    }
}

fn complete(report: CoverageReport) -> AggregateReport {
    match report {
        CoverageReport::Complete(report) => report,
        CoverageReport::NoData => panic!("expected a complete report"),
    }
}

#[test]
fn empty_input_yields_no_data() {
    let mut ctx = fixed_context();
    let report = ReportBuilder::default().build(&mut ctx, &[], &[]);

    assert!(report.is_no_data());
    assert!(report.as_complete().is_none());
    assert_eq!(
        serde_json::to_value(&report).unwrap(),
        json!({"error": "No coverage data available"})
    );
    assert_eq!(ctx.stats().reports_built, 1);
}

#[test]
fn overall_sums_records_and_rederives_percentage() {
    let mut ctx = fixed_context();
    let records = [record("A.java", 10, 8), record("B.java", 30, 15)];

    let report = complete(ReportBuilder::default().build(&mut ctx, &records, &[]));

    assert_eq!(report.overall_coverage.total_lines, 40);
    assert_eq!(report.overall_coverage.covered_lines, 23);
    assert_eq!(report.overall_coverage.uncovered_lines, 17);
    assert_relative_eq!(report.overall_coverage.percentage, 57.5);
    assert_eq!(
        report.recommendations,
        vec!["Coverage is below 80%. Add more comprehensive test cases.".to_string()]
    );
}

#[test]
fn file_coverage_preserves_input_order_and_rounds() {
    let mut ctx = fixed_context();
    let records = [record("Z.java", 3, 1), record("A.java", 3, 2)];

    let report = complete(ReportBuilder::default().build(&mut ctx, &records, &[]));

    let paths: Vec<_> = report
        .file_coverage
        .iter()
        .map(|file| file.file_path.as_str())
        .collect();
    assert_eq!(paths, ["Z.java", "A.java"]);
    assert_relative_eq!(report.file_coverage[0].coverage_percentage, 33.33);
    assert_relative_eq!(report.file_coverage[1].coverage_percentage, 66.67);
}

#[test]
fn buckets_are_always_present() {
    let mut ctx = fixed_context();
    let report = complete(ReportBuilder::default().build(&mut ctx, &[record("A.java", 10, 10)], &[]));

    let value = serde_json::to_value(&report).unwrap();
    assert_eq!(value["suggestions"]["high_priority"], 0);
    assert_eq!(value["suggestions"]["medium_priority"], 0);
    assert_eq!(value["suggestions"]["low_priority"], 0);
    assert_eq!(value["suggestions"]["total"], 0);
    assert_eq!(value["suggestions"]["details"], json!([]));
    assert_eq!(
        report.recommendations,
        vec!["Good coverage! Consider adding integration tests for better confidence.".to_string()]
    );
}

#[test]
fn recommendations_follow_fixed_order() {
    let mut ctx = fixed_context();
    let records = [record("A.java", 100, 40)];
    let suggestions = [
        suggestion("A.java", LineCategory::EdgeCase, Priority::Medium),
        suggestion("A.java", LineCategory::NullCheck, Priority::Medium),
        suggestion("A.java", LineCategory::NullCheck, Priority::Medium),
        suggestion("A.java", LineCategory::General, Priority::High),
    ];

    let report = complete(ReportBuilder::default().build(&mut ctx, &records, &suggestions));

    assert_eq!(
        report.recommendations,
        vec![
            "Critical: Coverage is below 50%. Focus on high-priority test cases first.".to_string(),
            "Focus on 1 high-priority test suggestions.".to_string(),
            "Add 2 null/empty input test cases.".to_string(),
            "Add 1 edge case test scenarios.".to_string(),
        ]
    );
    assert_eq!(report.suggestions.high_priority, 1);
    assert_eq!(report.suggestions.medium_priority, 3);
    assert_eq!(report.suggestions.total, 4);
}

#[test]
fn high_coverage_without_flagged_categories_reads_as_good() {
    let mut ctx = fixed_context();
    let records = [record("A.java", 100, 95)];
    let suggestions = [suggestion("A.java", LineCategory::ControlFlow, Priority::Medium)];

    let report = complete(ReportBuilder::default().build(&mut ctx, &records, &suggestions));

    assert_eq!(
        report.recommendations,
        vec!["Good coverage! Consider adding integration tests for better confidence.".to_string()]
    );
}

#[test]
fn configured_thresholds_change_messages() {
    let builder = ReportBuilder::new(RecommendationConfig {
        critical_threshold: 60.0,
        improvement_threshold: 90.0,
    });
    let mut ctx = fixed_context();

    let critical = complete(builder.build(&mut ctx, &[record("A.java", 100, 55)], &[]));
    assert_eq!(
        critical.recommendations[0],
        "Critical: Coverage is below 60%. Focus on high-priority test cases first."
    );

    let improving = complete(builder.build(&mut ctx, &[record("A.java", 100, 85)], &[]));
    assert_eq!(
        improving.recommendations[0],
        "Coverage is below 90%. Add more comprehensive test cases."
    );
}

#[test]
fn bucket_returns_suggestions_of_one_priority_in_order() {
    let mut ctx = fixed_context();
    let suggestions = [
        suggestion("A.java", LineCategory::General, Priority::Low),
        suggestion("A.java", LineCategory::Boundary, Priority::High),
        suggestion("A.java", LineCategory::EdgeCase, Priority::Low),
    ];

    let report = complete(ReportBuilder::default().build(
        &mut ctx,
        &[record("A.java", 10, 5)],
        &suggestions,
    ));

    let low: Vec<_> = report
        .suggestions
        .bucket(Priority::Low)
        .map(|s| s.category)
        .collect();
    assert_eq!(low, [LineCategory::General, LineCategory::EdgeCase]);
    assert_eq!(report.suggestions.bucket(Priority::Medium).count(), 0);
}

#[test]
fn orphan_suggestions_are_reported() {
    let mut ctx = fixed_context();
    let suggestions = [
        suggestion("A.java", LineCategory::General, Priority::Medium),
        suggestion("Missing.java", LineCategory::General, Priority::Medium),
        suggestion(REPOSITORY_SENTINEL, LineCategory::General, Priority::High),
    ];

    let report = complete(ReportBuilder::default().build(
        &mut ctx,
        &[record("A.java", 10, 5)],
        &suggestions,
    ));

    let orphans: Vec<_> = report
        .orphan_suggestions()
        .into_iter()
        .map(|s| s.file_path.as_str())
        .collect();
    assert_eq!(orphans, ["Missing.java"]);
}

#[test]
fn report_serializes_with_stable_field_names() {
    let mut ctx = fixed_context();
    let records = [CoverageRecord::new(
        "src/Cart.java",
        Language::Java,
        10,
        8,
        vec![UncoveredLocation::Line(5), UncoveredLocation::Line(9)],
    )
    .unwrap()];
    let suggestions = [suggestion("src/Cart.java", LineCategory::Boundary, Priority::Medium)];

    let report = ReportBuilder::default().build(&mut ctx, &records, &suggestions);
    let value = serde_json::to_value(&report).unwrap();

    assert_eq!(value["overall_coverage"]["percentage"], 80.0);
    assert_eq!(value["file_coverage"][0]["uncovered_lines"], json!([5, 9]));
    assert_eq!(value["suggestions"]["details"][0]["type"], "boundary");
    assert_eq!(value["timestamp"], "2024-05-17T09:00:00Z");
    assert_eq!(ctx.stats().records_seen, 1);
    assert_eq!(ctx.stats().suggestions_seen, 1);
}

proptest! {
    #[test]
    fn overall_matches_record_sums(
        counts in proptest::collection::vec((0usize..500, 0usize..500), 1..20)
    ) {
        let records: Vec<_> = counts
            .iter()
            .enumerate()
            .map(|(i, &(a, b))| record(&format!("F{i}.java"), a.max(b), a.min(b)))
            .collect();
        let mut ctx = fixed_context();

        let report = complete(ReportBuilder::default().build(&mut ctx, &records, &[]));

        let total: usize = records.iter().map(CoverageRecord::total_lines).sum();
        let covered: usize = records.iter().map(CoverageRecord::covered_lines).sum();
        prop_assert_eq!(report.overall_coverage.total_lines, total);
        prop_assert_eq!(report.overall_coverage.covered_lines, covered);
        prop_assert!(report.overall_coverage.percentage >= 0.0);
        prop_assert!(report.overall_coverage.percentage <= 100.0);
        prop_assert_eq!(report.file_coverage.len(), records.len());
        prop_assert!(!report.recommendations.is_empty());
    }
}
