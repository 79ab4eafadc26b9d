//! Result-code lexicon
//!
//! Maps the scheduler's last-run result codes, in canonical hex form, to the
//! explanations published in Microsoft's task scheduler documentation. Lookup
//! is total: unknown codes fall back to a fixed sentinel.

/// Sentinel description for codes missing from the table
pub const UNKNOWN_CODE: &str = "UNKNOWN error code!";

/// Known result codes, keyed by canonical lowercase hex
const RESULT_CODES: &[(&str, &str)] = &[
    ("0x0", "The task did run properly."),
    ("0x1", "The task did not run properly."),
    ("0x2", "File not found."),
    ("0xa", "The environment is incorrect."),
    ("0x103", "No more data is available."),
    ("0x420", "An instance of the service is already running."),
    ("0x41301", "The task is currently running."),
    (
        "0x41302",
        "The task will not run at the scheduled times because it has been disabled.",
    ),
    ("0x41303", "The task has not yet run."),
    (
        "0x41305",
        "One or more of the properties that are needed to run this task on a schedule have not been set.",
    ),
    ("0x41306", "The last run of the task was terminated by the user."),
    (
        "0x41307",
        "Either the task has no triggers or the existing triggers are disabled or not set.",
    ),
    (
        "0x8000000a",
        "The data necessary to complete this operation is not yet available.",
    ),
    ("0x80004003", "Invalid pointer."),
    ("0x80004005", "Unspecified error."),
    ("0x800700b7", "Cannot create a file when that file already exists."),
    ("0x8007042b", "The process terminated unexpectedly."),
    ("0x800710e0", "The operator or administrator has refused the request."),
    (
        "0x80090030",
        "The device that is required by this cryptographic provider is not ready for use.",
    ),
    ("0x40010004", "Debugger terminated the process."),
    (
        "0x10000000",
        "Task has a special error, see: https://devblogs.microsoft.com/oldnewthing/20121227-00/?p=5713",
    ),
];

/// Canonical hex rendering of a signed result code
///
/// Lowercase, unpadded, sign preserved for negative codes (`-0x7ff8fffe`),
/// the same form operators pass to the ignore flag.
pub fn canonical_hex(raw: i64) -> String {
    if raw < 0 {
        format!("-{:#x}", raw.unsigned_abs())
    } else {
        format!("{:#x}", raw)
    }
}

/// Meaning of a canonical hex result code
pub fn describe(code: &str) -> &'static str {
    RESULT_CODES
        .iter()
        .find(|(known, _)| *known == code)
        .map(|(_, description)| *description)
        .unwrap_or(UNKNOWN_CODE)
}
