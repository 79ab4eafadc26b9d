//! Scheduled-task status text parser
//!
//! The remote query prints one block of `Label : value` lines per task,
//! anchored on `LastRunTime` and at most seven lines long (six info fields
//! plus, in include mode, one trailing `Enabled` line). Blocks are located
//! by their anchor and folded into typed records. Lines split on the first
//! colon only because the values themselves contain colons (timestamps).

use std::collections::HashMap;

use serde::Serialize;

/// Fixed block width emitted by the status query
const BLOCK_LINES: usize = 7;

const REQUIRED_FIELDS: &[&str] = &[
    "LastRunTime",
    "LastTaskResult",
    "NextRunTime",
    "NumberOfMissedRuns",
    "TaskName",
    "TaskPath",
];

/// One scheduled task snapshot, as reported by the remote scheduler
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaskRecord {
    /// Task name, unique within one evaluation pass
    pub task_name: String,
    /// Scheduler folder the task lives in, display only
    pub task_path: String,
    /// Opaque display string; empty when the task never ran
    pub last_run_time: String,
    /// Signed result code of the last run, reported in decimal
    pub last_task_result: i64,
    /// Empty means the task is not scheduled to run again
    pub next_run_time: String,
    /// Display only, not used for classification
    pub number_of_missed_runs: String,
    /// From the optional `Enabled` line; absent means enabled
    pub trigger_enabled: Option<bool>,
}

impl TaskRecord {
    /// Whether the task will run again (has a next run time and an enabled trigger)
    pub fn is_scheduled(&self) -> bool {
        !self.next_run_time.is_empty() && self.trigger_enabled != Some(false)
    }
}

/// Why a block could not be folded into a record
///
/// Line numbers are 1-based positions in the raw status text.
#[derive(Debug, thiserror::Error)]
pub enum BlockError {
    #[error("block at line {line}: missing required field '{field}'")]
    MissingField { line: usize, field: &'static str },

    #[error("block at line {line}: LastTaskResult '{value}' is not an integer")]
    BadResultCode { line: usize, value: String },
}

/// Records in source order, plus diagnostics for dropped blocks
#[derive(Debug, Default)]
pub struct ParseOutcome {
    pub records: Vec<TaskRecord>,
    pub errors: Vec<BlockError>,
}

/// Split raw status text into task records
///
/// Malformed blocks are dropped and recorded as diagnostics; parsing always
/// continues with the remaining blocks.
pub fn parse_status_output(raw: &str) -> ParseOutcome {
    // Lines are numbered before blanks are dropped, so diagnostics point at
    // the raw text rather than the filtered view of it.
    let lines: Vec<(usize, &str)> = raw
        .lines()
        .enumerate()
        .map(|(index, line)| (index + 1, line.trim()))
        .filter(|(_, line)| !line.is_empty())
        .collect();

    let mut outcome = ParseOutcome::default();
    for (position, &(line_number, line)) in lines.iter().enumerate() {
        if !line.contains("LastRunTime") {
            continue;
        }
        // A truncated final block takes whatever lines remain.
        let end = (position + BLOCK_LINES).min(lines.len());
        match fold_block(&lines[position..end], line_number) {
            Ok(record) => outcome.records.push(record),
            Err(error) => outcome.errors.push(error),
        }
    }
    outcome
}

/// Fold one block of `Label : value` lines into a record
fn fold_block(block: &[(usize, &str)], start_line: usize) -> Result<TaskRecord, BlockError> {
    let mut fields: HashMap<&str, &str> = HashMap::new();
    for &(_, line) in block {
        // First colon separates the label; later colons belong to the value.
        // A line with no colon degrades to an empty value.
        let (label, value) = match line.split_once(':') {
            Some((label, value)) => (label.trim(), value.trim()),
            None => (line, ""),
        };
        fields.insert(label, value);
    }

    for field in REQUIRED_FIELDS {
        if !fields.contains_key(field) {
            return Err(BlockError::MissingField {
                line: start_line,
                field,
            });
        }
    }

    let result_text = fields["LastTaskResult"];
    let last_task_result: i64 = result_text.parse().map_err(|_| BlockError::BadResultCode {
        line: start_line,
        value: result_text.to_string(),
    })?;

    Ok(TaskRecord {
        task_name: fields["TaskName"].to_string(),
        task_path: fields["TaskPath"].to_string(),
        last_run_time: fields["LastRunTime"].to_string(),
        last_task_result,
        next_run_time: fields["NextRunTime"].to_string(),
        number_of_missed_runs: fields["NumberOfMissedRuns"].to_string(),
        trigger_enabled: fields
            .get("Enabled")
            .map(|value| !value.eq_ignore_ascii_case("false")),
    })
}
