//! Classification policy tests
//!
//! End-to-end policy scenarios over hand-built task records: include and
//! exclude modes, the ignored-code list, the next-run-time requirement,
//! and the ordering and exit rules of the aggregated report.

use check_wintask::classifier::{CheckPolicy, TaskClassifier, TaskRecord};
use check_wintask::report::{CheckReport, Severity};

fn record(name: &str, result: i64, next_run: &str) -> TaskRecord {
    TaskRecord {
        task_name: name.to_string(),
        task_path: "\\".to_string(),
        last_run_time: "12/11/2022 3:02:03 AM".to_string(),
        last_task_result: result,
        next_run_time: next_run.to_string(),
        number_of_missed_runs: "0".to_string(),
        trigger_enabled: None,
    }
}

fn include(names: &[&str]) -> CheckPolicy {
    CheckPolicy {
        include_tasks: names.iter().map(|s| s.to_string()).collect(),
        ..CheckPolicy::default()
    }
}

fn rendered(policy: &CheckPolicy, records: &[TaskRecord]) -> Vec<String> {
    let entries = TaskClassifier::new(policy.clone()).evaluate(records);
    CheckReport::from_entries(entries).ordered_lines()
}

// =============================================================================
// Mode scenarios
// =============================================================================

#[test]
fn test_exclude_mode_is_silent_on_success() {
    let records = [record("Backup", 0, "2024-01-01")];
    let lines = rendered(&CheckPolicy::default(), &records);

    assert!(lines.is_empty());
}

#[test]
fn test_include_mode_reports_success_verbatim() {
    let records = [record("Backup", 0, "2024-01-01")];
    let lines = rendered(&include(&["Backup"]), &records);

    assert_eq!(
        lines,
        vec!["OK - 'Backup': The task did run properly. Task location: \\. Result code: 0x0"]
    );
}

#[test]
fn test_nonzero_result_warns_in_both_modes() {
    // 267013 decimal is 0x41305, properties-not-set.
    let records = [record("Backup", 267013, "2024-01-01")];

    for policy in [CheckPolicy::default(), include(&["Backup"])] {
        let lines = rendered(&policy, &records);
        assert_eq!(lines.len(), 1);
        assert!(lines[0].starts_with("WARNING - "));
        assert!(lines[0].contains("have not been set"));
        assert!(lines[0].contains("0x41305"));
    }
}

#[test]
fn test_excluded_name_is_skipped_even_on_failure() {
    let policy = CheckPolicy {
        exclude_tasks: vec!["Flaky Vendor Task".to_string()],
        ..CheckPolicy::default()
    };
    let records = [
        record("Flaky Vendor Task", 1, "2024-01-01"),
        record("Backup", 1, "2024-01-01"),
    ];
    let lines = rendered(&policy, &records);

    assert_eq!(lines.len(), 1);
    assert!(lines[0].contains("'Backup'"));
}

#[test]
fn test_mode_exclusivity_include_wins() {
    // A non-empty include list switches modes; the exclude list is inert.
    let policy = CheckPolicy {
        include_tasks: vec!["Backup".to_string()],
        exclude_tasks: vec!["Backup".to_string()],
        ..CheckPolicy::default()
    };
    let records = [record("Backup", 0, "2024-01-01")];
    let lines = rendered(&policy, &records);

    assert_eq!(lines.len(), 1);
    assert!(lines[0].starts_with("OK - 'Backup'"));
}

#[test]
fn test_missing_include_name_warns_and_rest_evaluates() {
    let records = [record("A", 0, "2024-01-01")];
    let lines = rendered(&include(&["A", "B"]), &records);

    assert_eq!(lines.len(), 2);
    assert_eq!(
        lines[0],
        "WARNING - 'B' task can not be found. Please check task name!"
    );
    assert!(lines[1].starts_with("OK - 'A'"));
}

// =============================================================================
// Ignored result codes
// =============================================================================

#[test]
fn test_ignored_code_emits_nothing_in_either_mode() {
    // 267011 decimal is 0x41303, task-has-not-yet-run.
    let ignored = CheckPolicy::from_args(
        vec![],
        vec![],
        vec!["0x41303".to_string()],
        true,
    )
    .unwrap();
    let with_include = CheckPolicy {
        include_tasks: vec!["Backup".to_string()],
        ..ignored.clone()
    };
    let records = [record("Backup", 267011, "2024-01-01")];

    assert!(rendered(&ignored, &records).is_empty());
    assert!(rendered(&with_include, &records).is_empty());
}

#[test]
fn test_ignored_code_comparison_is_case_insensitive() {
    // 2147946720 decimal is 0x800710e0; the flag was typed uppercase.
    let policy = CheckPolicy::from_args(
        vec![],
        vec![],
        vec!["0x800710E0".to_string()],
        true,
    )
    .unwrap();
    let records = [record("Backup", 2147946720, "2024-01-01")];

    assert!(rendered(&policy, &records).is_empty());
}

#[test]
fn test_malformed_ignore_code_is_a_usage_error() {
    let attempt = CheckPolicy::from_args(
        vec![],
        vec![],
        vec!["41303".to_string()],
        true,
    );

    assert!(attempt.is_err());
}

// =============================================================================
// Next-run-time enforcement
// =============================================================================

#[test]
fn test_unscheduled_success_warns_when_enforced() {
    let records = [record("Backup", 0, "")];
    let lines = rendered(&CheckPolicy::default(), &records);

    assert_eq!(lines.len(), 1);
    assert_eq!(
        lines[0],
        "WARNING - 'Backup' is not scheduled or no trigger. Task location: \\."
    );
}

#[test]
fn test_unscheduled_success_passes_when_not_enforced() {
    let policy = CheckPolicy {
        include_tasks: vec!["Backup".to_string()],
        enforce_next_run: false,
        ..CheckPolicy::default()
    };
    let records = [record("Backup", 0, "")];
    let lines = rendered(&policy, &records);

    assert_eq!(lines.len(), 1);
    assert!(lines[0].starts_with("OK - 'Backup'"));
}

#[test]
fn test_disabled_trigger_warns_even_with_next_run() {
    let mut disabled = record("Backup", 0, "2024-01-01");
    disabled.trigger_enabled = Some(false);
    let lines = rendered(&CheckPolicy::default(), &[disabled]);

    assert_eq!(lines.len(), 1);
    assert!(lines[0].contains("is not scheduled or no trigger"));
}

// =============================================================================
// Report aggregation
// =============================================================================

#[test]
fn test_warnings_sort_ahead_of_ok_lines() {
    let records = [
        record("Backup", 0, "2024-01-01"),
        record("Sync Reports", 1, "2024-01-01"),
    ];
    let policy = include(&["Backup", "Sync Reports"]);
    let lines = rendered(&policy, &records);

    assert_eq!(lines.len(), 2);
    assert!(lines[0].starts_with("WARNING - 'Sync Reports'"));
    assert!(lines[1].starts_with("OK - 'Backup'"));
}

#[test]
fn test_exit_severity_tracks_worst_entry() {
    let records = [
        record("Backup", 0, "2024-01-01"),
        record("Sync Reports", 1, "2024-01-01"),
    ];
    let policy = include(&["Backup", "Sync Reports"]);
    let entries = TaskClassifier::new(policy).evaluate(&records);
    let report = CheckReport::from_entries(entries);

    assert_eq!(report.exit_severity(), Severity::Warning);
    assert_eq!(report.exit_severity().exit_code(), 1);
}

#[test]
fn test_empty_report_exits_ok() {
    let report = CheckReport::new();

    assert_eq!(report.exit_severity(), Severity::Ok);
    assert_eq!(report.exit_severity().exit_code(), 0);
}

#[test]
fn test_evaluation_is_idempotent() {
    let records = [
        record("A", 0, "2024-01-01"),
        record("B", 267013, ""),
        record("C", 0, ""),
    ];
    let policy = include(&["A", "B", "C", "Ghost"]);

    let first = rendered(&policy, &records);
    let second = rendered(&policy, &records);

    assert_eq!(first, second);
}
