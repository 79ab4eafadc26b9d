//! Status transport
//!
//! Where the status text comes from:
//! - StatusSource trait: interface the pipeline consumes
//! - SshStatusSource: runs the query on the target through the system ssh binary
//! - StaticStatusSource: canned text or canned failure for tests

use std::process::{Command, Stdio};

use crate::config::ConnectionSettings;

/// Source of the raw scheduled-task status text
pub trait StatusSource: Send + Sync {
    /// Run the status query and return its decoded stdout
    fn fetch_status(&self, query: &str) -> Result<String, TransportError>;
}

/// Transport errors
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("Failed to spawn ssh: {0}")]
    Spawn(std::io::Error),

    #[error("ssh exited with {status}: {stderr}")]
    CommandFailed {
        status: String,
        stderr: String,
        /// Whatever the remote printed before failing
        stdout: String,
    },
}

impl TransportError {
    /// Partial status text captured before the failure, if any
    pub fn partial_output(&self) -> Option<&str> {
        match self {
            TransportError::CommandFailed { stdout, .. } if !stdout.is_empty() => Some(stdout),
            _ => None,
        }
    }
}

/// SSH transport for production use
///
/// One bounded, non-interactive invocation per check: BatchMode forbids
/// prompts, ConnectTimeout bounds connection and auth, and the ServerAlive
/// options bound a hung read.
pub struct SshStatusSource {
    settings: ConnectionSettings,
}

impl SshStatusSource {
    /// Create a transport from resolved connection settings
    pub fn new(settings: ConnectionSettings) -> Self {
        Self { settings }
    }

    /// Build ssh command arguments
    fn build_ssh_args(&self, query: &str) -> Vec<String> {
        let settings = &self.settings;
        vec![
            "-o".to_string(),
            "BatchMode=yes".to_string(),
            "-o".to_string(),
            format!("ConnectTimeout={}", settings.connect_timeout_seconds),
            "-o".to_string(),
            format!("ServerAliveInterval={}", settings.server_alive_interval),
            "-o".to_string(),
            format!("ServerAliveCountMax={}", settings.server_alive_count_max),
            "-o".to_string(),
            "StrictHostKeyChecking=accept-new".to_string(),
            "-i".to_string(),
            settings.expanded_key_path(),
            "-p".to_string(),
            settings.port.to_string(),
            format!("{}@{}", settings.user, settings.host),
            query.to_string(),
        ]
    }
}

impl StatusSource for SshStatusSource {
    fn fetch_status(&self, query: &str) -> Result<String, TransportError> {
        let args = self.build_ssh_args(query);

        let output = Command::new("ssh")
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .map_err(TransportError::Spawn)?;

        // The remote shell may answer in a legacy code page; replacement
        // characters only degrade display strings, never the field labels.
        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();

        if !output.status.success() {
            return Err(TransportError::CommandFailed {
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
                stdout,
            });
        }

        Ok(stdout)
    }
}

/// In-process source serving canned text, for tests
pub struct StaticStatusSource {
    text: String,
    exit_code: i32,
}

impl StaticStatusSource {
    /// Source that succeeds with the given status text
    pub fn ok(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            exit_code: 0,
        }
    }

    /// Source that fails like a remote command exiting non-zero, keeping
    /// whatever text it already produced
    pub fn failing(exit_code: i32, partial_text: impl Into<String>) -> Self {
        Self {
            text: partial_text.into(),
            exit_code,
        }
    }
}

impl StatusSource for StaticStatusSource {
    fn fetch_status(&self, _query: &str) -> Result<String, TransportError> {
        if self.exit_code == 0 {
            Ok(self.text.clone())
        } else {
            Err(TransportError::CommandFailed {
                status: format!("exit status: {}", self.exit_code),
                stderr: String::new(),
                stdout: self.text.clone(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings() -> ConnectionSettings {
        ConnectionSettings {
            host: "winhost.example.com".to_string(),
            user: "icinga".to_string(),
            port: 22,
            key_path: "/etc/icinga2/keys/wintask".to_string(),
            connect_timeout_seconds: 30,
            server_alive_interval: 15,
            server_alive_count_max: 2,
        }
    }

    #[test]
    fn test_ssh_args_shape() {
        let source = SshStatusSource::new(settings());
        let args = source.build_ssh_args("powershell query");

        assert!(args.contains(&"BatchMode=yes".to_string()));
        assert!(args.contains(&"ConnectTimeout=30".to_string()));
        assert!(args.contains(&"ServerAliveInterval=15".to_string()));
        assert!(args.contains(&"ServerAliveCountMax=2".to_string()));
        assert!(args.contains(&"StrictHostKeyChecking=accept-new".to_string()));
        assert!(args.contains(&"icinga@winhost.example.com".to_string()));
        assert_eq!(args.last(), Some(&"powershell query".to_string()));
    }

    #[test]
    fn test_ssh_args_use_port_and_key() {
        let mut custom = settings();
        custom.port = 2222;
        custom.key_path = "/home/icinga/.ssh/key".to_string();
        let source = SshStatusSource::new(custom);
        let args = source.build_ssh_args("q");

        let port_pos = args.iter().position(|a| a == "-p").unwrap();
        assert_eq!(args[port_pos + 1], "2222");
        let key_pos = args.iter().position(|a| a == "-i").unwrap();
        assert_eq!(args[key_pos + 1], "/home/icinga/.ssh/key");
    }

    #[test]
    fn test_static_source_ok() {
        let source = StaticStatusSource::ok("LastRunTime : x");
        assert_eq!(source.fetch_status("q").unwrap(), "LastRunTime : x");
    }

    #[test]
    fn test_static_source_failure_keeps_partial_output() {
        let source = StaticStatusSource::failing(255, "half a report");
        let err = source.fetch_status("q").unwrap_err();
        assert_eq!(err.partial_output(), Some("half a report"));
    }

    #[test]
    fn test_failure_without_output_has_no_partial() {
        let source = StaticStatusSource::failing(255, "");
        let err = source.fetch_status("q").unwrap_err();
        assert_eq!(err.partial_output(), None);
    }
}
