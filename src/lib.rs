//! check_wintask - Windows scheduled task check over SSH
//!
//! This crate implements a monitoring plugin that queries the scheduled
//! tasks of a Windows host over SSH, classifies each task's last result
//! against a configurable policy, and renders a severity-ordered report
//! with Icinga/Nagios exit codes.

pub mod classifier;
pub mod config;
pub mod pipeline;
pub mod remote;
pub mod report;

pub use classifier::{
    canonical_hex, describe, parse_status_output, CheckPolicy, ParseOutcome, PolicyError,
    TaskClassifier, TaskRecord,
};
pub use config::{ConfigFile, ConnectionOverrides, ConnectionSettings};
pub use pipeline::run_check;
pub use remote::{build_status_query, SshStatusSource, StaticStatusSource, StatusSource};
pub use report::{CheckReport, ResultEntry, Severity};
