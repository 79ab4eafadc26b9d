//! Connection settings
//!
//! Resolves the SSH parameters for one check run through a layered merge:
//! builtin defaults, then the optional TOML config file at
//! `~/.config/check_wintask/config.toml` (or `--config`), then CLI flags,
//! highest layer wins per field. The merged result is validated once before
//! any connection attempt.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

const DEFAULT_PORT: u16 = 22;
const DEFAULT_CONNECT_TIMEOUT: u32 = 30;
const DEFAULT_SERVER_ALIVE_INTERVAL: u32 = 15;
const DEFAULT_SERVER_ALIVE_COUNT_MAX: u32 = 2;

/// Optional config file contents
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    /// Connection defaults, all optional
    #[serde(default)]
    pub ssh: SshSection,
}

/// The `[ssh]` section of the config file
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SshSection {
    pub user: Option<String>,
    pub port: Option<u16>,
    pub key_path: Option<String>,
    pub connect_timeout_seconds: Option<u32>,
    pub server_alive_interval: Option<u32>,
    pub server_alive_count_max: Option<u32>,
}

/// Connection flags passed on the command line, all optional
#[derive(Debug, Clone, Default)]
pub struct ConnectionOverrides {
    pub user: Option<String>,
    pub port: Option<u16>,
    pub key_path: Option<String>,
    pub connect_timeout_seconds: Option<u32>,
}

/// Errors loading or resolving connection settings
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Config file not found: {0}")]
    NotFound(PathBuf),

    #[error("Missing required setting '{0}': pass the flag or set it in the config file")]
    MissingField(&'static str),

    #[error("Invalid value for '{field}': {reason}")]
    InvalidValue { field: &'static str, reason: String },
}

impl ConfigFile {
    /// Parse config file contents from TOML text
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Load from an explicit path; the file must exist
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.to_path_buf()));
        }
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// Default config file location (~/.config/check_wintask/config.toml)
    pub fn default_path() -> Option<PathBuf> {
        std::env::var("HOME")
            .ok()
            .map(|home| PathBuf::from(home).join(".config/check_wintask/config.toml"))
    }

    /// Load the default config file when it exists, else empty settings
    pub fn load_default() -> Result<Self, ConfigError> {
        match Self::default_path() {
            Some(path) if path.exists() => Self::load(&path),
            _ => Ok(Self::default()),
        }
    }
}

/// Resolved SSH connection settings for one check run
#[derive(Debug, Clone, Serialize)]
pub struct ConnectionSettings {
    /// Target host FQDN or IP
    pub host: String,
    /// SSH user
    pub user: String,
    /// SSH port
    pub port: u16,
    /// Path to the SSH private key
    pub key_path: String,
    /// SSH connection timeout in seconds
    pub connect_timeout_seconds: u32,
    /// Server alive interval for detecting dead connections
    pub server_alive_interval: u32,
    /// Server alive count max
    pub server_alive_count_max: u32,
}

impl ConnectionSettings {
    /// Merge defaults, config file, and CLI flags into validated settings
    pub fn resolve(
        host: String,
        file: &ConfigFile,
        cli: &ConnectionOverrides,
    ) -> Result<Self, ConfigError> {
        let ssh = &file.ssh;

        let user = cli
            .user
            .clone()
            .or_else(|| ssh.user.clone())
            .ok_or(ConfigError::MissingField("sshuser"))?;
        let key_path = cli
            .key_path
            .clone()
            .or_else(|| ssh.key_path.clone())
            .ok_or(ConfigError::MissingField("sshkey"))?;

        let settings = Self {
            host,
            user,
            port: cli.port.or(ssh.port).unwrap_or(DEFAULT_PORT),
            key_path,
            connect_timeout_seconds: cli
                .connect_timeout_seconds
                .or(ssh.connect_timeout_seconds)
                .unwrap_or(DEFAULT_CONNECT_TIMEOUT),
            server_alive_interval: ssh
                .server_alive_interval
                .unwrap_or(DEFAULT_SERVER_ALIVE_INTERVAL),
            server_alive_count_max: ssh
                .server_alive_count_max
                .unwrap_or(DEFAULT_SERVER_ALIVE_COUNT_MAX),
        };
        settings.validate()?;
        Ok(settings)
    }

    /// Bounds checks on the merged settings
    fn validate(&self) -> Result<(), ConfigError> {
        if self.host.is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "hostname",
                reason: "hostname cannot be empty".to_string(),
            });
        }
        if self.user.is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "sshuser",
                reason: "user cannot be empty".to_string(),
            });
        }
        if self.key_path.is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "sshkey",
                reason: "key path cannot be empty".to_string(),
            });
        }
        if self.port == 0 {
            return Err(ConfigError::InvalidValue {
                field: "sshport",
                reason: "port cannot be 0".to_string(),
            });
        }
        // connect_timeout_seconds must be in (0, 300]
        if self.connect_timeout_seconds == 0 || self.connect_timeout_seconds > 300 {
            return Err(ConfigError::InvalidValue {
                field: "connect-timeout",
                reason: format!(
                    "must be in (0, 300], got {}",
                    self.connect_timeout_seconds
                ),
            });
        }
        Ok(())
    }

    /// Key path with a leading ~ expanded against $HOME
    pub fn expanded_key_path(&self) -> String {
        if let Some(rest) = self.key_path.strip_prefix("~/") {
            if let Ok(home) = std::env::var("HOME") {
                return format!("{}/{}", home, rest);
            }
        }
        self.key_path.clone()
    }
}
