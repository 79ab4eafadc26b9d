//! Check report assembly and severity-ordered rendering
//!
//! Entries accumulate in emission order, are rendered grouped by severity
//! (CRITICAL first, then WARNING, then OK), and reduce to the exit code the
//! monitoring supervisor expects.

use serde::{Deserialize, Serialize};

/// Monitoring severity, per entry and for the whole check
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Severity {
    /// Check passed
    Ok,
    /// Anomaly that needs attention
    Warning,
    /// Hard failure
    Critical,
    /// The check could not be evaluated
    Unknown,
}

impl Severity {
    /// Process exit code per the plugin convention
    pub fn exit_code(&self) -> i32 {
        match self {
            Severity::Ok => 0,
            Severity::Warning => 1,
            Severity::Critical => 2,
            Severity::Unknown => 3,
        }
    }

    /// Line prefix label
    pub fn label(&self) -> &'static str {
        match self {
            Severity::Ok => "OK",
            Severity::Warning => "WARNING",
            Severity::Critical => "CRITICAL",
            Severity::Unknown => "UNKNOWN",
        }
    }
}

/// One classified line of the check report
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultEntry {
    pub severity: Severity,
    pub message: String,
}

impl ResultEntry {
    /// Create an entry
    pub fn new(severity: Severity, message: impl Into<String>) -> Self {
        Self {
            severity,
            message: message.into(),
        }
    }

    /// Rendered plugin line, e.g. `WARNING - 'Backup': ...`
    pub fn render(&self) -> String {
        format!("{} - {}", self.severity.label(), self.message)
    }
}

/// Aggregated outcome of one evaluation pass
///
/// Entries are only ever appended, never edited or removed.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CheckReport {
    entries: Vec<ResultEntry>,
}

impl CheckReport {
    /// Create an empty report
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a report from already-classified entries
    pub fn from_entries(entries: Vec<ResultEntry>) -> Self {
        Self { entries }
    }

    /// Append an entry
    pub fn push(&mut self, entry: ResultEntry) {
        self.entries.push(entry);
    }

    /// All entries in emission order
    pub fn entries(&self) -> &[ResultEntry] {
        &self.entries
    }

    /// True when nothing was reported
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// True when at least one entry carries the given severity
    pub fn has_severity(&self, severity: Severity) -> bool {
        self.entries.iter().any(|e| e.severity == severity)
    }

    /// Report lines grouped CRITICAL, WARNING, OK, UNKNOWN
    ///
    /// Emission order is preserved within each group.
    pub fn ordered_lines(&self) -> Vec<String> {
        let mut lines = Vec::with_capacity(self.entries.len());
        for group in [
            Severity::Critical,
            Severity::Warning,
            Severity::Ok,
            Severity::Unknown,
        ] {
            lines.extend(
                self.entries
                    .iter()
                    .filter(|e| e.severity == group)
                    .map(ResultEntry::render),
            );
        }
        lines
    }

    /// Severity the process exits with
    ///
    /// CRITICAL beats WARNING beats UNKNOWN; an empty report is OK.
    pub fn exit_severity(&self) -> Severity {
        if self.has_severity(Severity::Critical) {
            Severity::Critical
        } else if self.has_severity(Severity::Warning) {
            Severity::Warning
        } else if self.has_severity(Severity::Unknown) {
            Severity::Unknown
        } else {
            Severity::Ok
        }
    }
}
