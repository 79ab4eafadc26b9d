//! Task classification policy
//!
//! Applies the operator's check policy to parsed task records. Include mode
//! watches an explicit allowlist and reports every watched task (OK or
//! WARNING); exclude mode watches everything not on a denylist and stays
//! silent on success. Both modes share one result-code rule.

mod codes;
mod parser;

pub use codes::{canonical_hex, describe, UNKNOWN_CODE};
pub use parser::{parse_status_output, BlockError, ParseOutcome, TaskRecord};

use std::collections::HashSet;

use regex_lite::Regex;

use crate::report::{ResultEntry, Severity};

/// Operator-supplied check policy, fixed for the whole run
#[derive(Debug, Clone)]
pub struct CheckPolicy {
    /// Allowlist; non-empty switches evaluation to include mode
    pub include_tasks: Vec<String>,
    /// Denylist; consulted only in exclude mode
    pub exclude_tasks: Vec<String>,
    /// Canonical lowercase hex codes whose records are skipped entirely
    pub ignored_codes: Vec<String>,
    /// Warn when a succeeded task has no next run or no enabled trigger
    pub enforce_next_run: bool,
}

impl Default for CheckPolicy {
    fn default() -> Self {
        Self {
            include_tasks: Vec::new(),
            exclude_tasks: Vec::new(),
            ignored_codes: Vec::new(),
            enforce_next_run: true,
        }
    }
}

/// Malformed policy input
#[derive(Debug, thiserror::Error)]
pub enum PolicyError {
    #[error("ignore-resultcode '{0}' is not a hex code like 0x41303")]
    BadIgnoredCode(String),
}

impl CheckPolicy {
    /// Build a policy from raw CLI values
    ///
    /// Include names are trimmed (they are re-embedded into the remote
    /// query); ignored codes are validated and normalized to lowercase so
    /// comparison with computed codes is case-insensitive.
    pub fn from_args(
        include_tasks: Vec<String>,
        exclude_tasks: Vec<String>,
        ignored_codes: Vec<String>,
        enforce_next_run: bool,
    ) -> Result<Self, PolicyError> {
        let hex_code = Regex::new(r"^-?0x[0-9a-fA-F]+$").unwrap();
        let mut ignored = Vec::with_capacity(ignored_codes.len());
        for code in ignored_codes {
            if !hex_code.is_match(&code) {
                return Err(PolicyError::BadIgnoredCode(code));
            }
            ignored.push(code.to_lowercase());
        }

        Ok(Self {
            include_tasks: include_tasks
                .iter()
                .map(|name| name.trim().to_string())
                .collect(),
            exclude_tasks,
            ignored_codes: ignored,
            enforce_next_run,
        })
    }
}

/// Evaluates parsed task records against the policy
pub struct TaskClassifier {
    policy: CheckPolicy,
}

impl TaskClassifier {
    /// Create a classifier for the given policy
    pub fn new(policy: CheckPolicy) -> Self {
        Self { policy }
    }

    /// Classify all records into report entries
    ///
    /// Pure: identical records and policy always produce identical entries
    /// in identical order.
    pub fn evaluate(&self, records: &[TaskRecord]) -> Vec<ResultEntry> {
        let mut entries = Vec::new();
        if !self.policy.include_tasks.is_empty() {
            self.evaluate_include(records, &mut entries);
        } else {
            self.evaluate_exclude(records, &mut entries);
        }
        entries
    }

    fn evaluate_include(&self, records: &[TaskRecord], entries: &mut Vec<ResultEntry>) {
        // Watched names with no record come first, in flag order, warned once.
        let present: HashSet<&str> = records.iter().map(|r| r.task_name.as_str()).collect();
        let mut warned: HashSet<&str> = HashSet::new();
        for name in &self.policy.include_tasks {
            if !present.contains(name.as_str()) && warned.insert(name.as_str()) {
                entries.push(ResultEntry::new(
                    Severity::Warning,
                    format!("'{}' task can not be found. Please check task name!", name),
                ));
            }
        }

        for record in records {
            if self
                .policy
                .include_tasks
                .iter()
                .any(|name| name == &record.task_name)
            {
                self.classify(record, true, entries);
            }
        }
    }

    fn evaluate_exclude(&self, records: &[TaskRecord], entries: &mut Vec<ResultEntry>) {
        for record in records {
            if !self
                .policy
                .exclude_tasks
                .iter()
                .any(|name| name == &record.task_name)
            {
                self.classify(record, false, entries);
            }
        }
    }

    /// Shared result-code rule
    ///
    /// A non-zero last result is always a WARNING. A zero result is checked
    /// against the schedule (unless that check is disabled) and then reported
    /// as OK only when the mode is verbose.
    fn classify(&self, record: &TaskRecord, report_on_success: bool, entries: &mut Vec<ResultEntry>) {
        let code = canonical_hex(record.last_task_result);
        if self.policy.ignored_codes.iter().any(|c| c == &code) {
            return;
        }

        let summary = format!(
            "'{}': {} Task location: {}. Result code: {}",
            record.task_name,
            describe(&code),
            record.task_path,
            code
        );

        if record.last_task_result != 0 {
            entries.push(ResultEntry::new(Severity::Warning, summary));
            return;
        }

        if self.policy.enforce_next_run && !record.is_scheduled() {
            entries.push(ResultEntry::new(
                Severity::Warning,
                format!(
                    "'{}' is not scheduled or no trigger. Task location: {}.",
                    record.task_name, record.task_path
                ),
            ));
            return;
        }

        if report_on_success {
            entries.push(ResultEntry::new(Severity::Ok, summary));
        }
    }
}
