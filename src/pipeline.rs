//! The check pipeline
//!
//! One pass per invocation: fetch the status text, parse it into records,
//! evaluate the policy, aggregate the report. The pipeline is total;
//! connectivity failures become report entries with the appropriate severity
//! instead of bubbling out, so the caller always gets a printable report.

use crate::classifier::{parse_status_output, CheckPolicy, TaskClassifier};
use crate::remote::{build_status_query, StatusSource};
use crate::report::{CheckReport, ResultEntry, Severity};

/// Run one full evaluation pass against the given status source
///
/// A fetch failure with no output yields a single UNKNOWN entry (the check
/// could not be evaluated). A failure that still produced output is evaluated
/// as far as it goes, with a WARNING entry flagging the connection. Malformed
/// task blocks are dropped with a diagnostic on stderr.
pub fn run_check(
    source: &dyn StatusSource,
    policy: &CheckPolicy,
    hostname: &str,
    debug: bool,
) -> CheckReport {
    let query = build_status_query(&policy.include_tasks);
    if debug {
        eprintln!("remote query: {}", query);
    }

    let (status_text, fetch_warning) = match source.fetch_status(&query) {
        Ok(text) => (text, None),
        Err(error) => match error.partial_output() {
            Some(partial) => {
                eprintln!("ssh failed after partial output: {}", error);
                (partial.to_string(), Some(connection_entry(Severity::Warning, hostname)))
            }
            None => {
                eprintln!("ssh failed: {}", error);
                let mut report = CheckReport::new();
                report.push(connection_entry(Severity::Unknown, hostname));
                return report;
            }
        },
    };

    let outcome = parse_status_output(&status_text);
    for error in &outcome.errors {
        eprintln!("dropped malformed task block: {}", error);
    }
    if debug {
        match serde_json::to_string_pretty(&outcome.records) {
            Ok(json) => eprintln!("parsed {} task record(s):\n{}", outcome.records.len(), json),
            Err(error) => eprintln!("could not render task records: {}", error),
        }
    }

    let classifier = TaskClassifier::new(policy.clone());
    let mut entries = classifier.evaluate(&outcome.records);
    if let Some(warning) = fetch_warning {
        entries.push(warning);
    }

    CheckReport::from_entries(entries)
}

fn connection_entry(severity: Severity, hostname: &str) -> ResultEntry {
    ResultEntry::new(
        severity,
        format!(
            "Cannot run remote command on {}, please check ssh connection!",
            hostname
        ),
    )
}
