//! Configuration types for mcp-prompts.
//!
//! # Examples
//!
//! ```
//! use mcp_prompts_core::{LogLevel, ServerConfig};
//!
//! let config = ServerConfig::builder()
//!     .prompts_dir("my-prompts")
//!     .log_level(LogLevel::Debug)
//!     .build();
//!
//! assert_eq!(config.prompts_dir.to_str(), Some("my-prompts"));
//! assert_eq!(config.resources_dir.to_str(), Some("resources"));
//! ```

use crate::{Error, Result};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// Default directory scanned for prompt templates.
pub const DEFAULT_PROMPTS_DIR: &str = "prompts";

/// Default directory scanned for resource files.
pub const DEFAULT_RESOURCES_DIR: &str = "resources";

/// Verbosity level for diagnostic logging.
///
/// Parsed case-insensitively from `trace`, `debug`, `info`, `warn` and
/// `error`.
///
/// # Examples
///
/// ```
/// use mcp_prompts_core::LogLevel;
///
/// assert_eq!("DEBUG".parse::<LogLevel>().unwrap(), LogLevel::Debug);
/// assert!("verbose".parse::<LogLevel>().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogLevel {
    /// Everything, including per-token substitution details
    Trace,
    /// Per-file load events
    Debug,
    /// Load summaries and lifecycle events
    #[default]
    Info,
    /// Skipped files and missing resources
    Warn,
    /// Unusable directories and fatal startup errors
    Error,
}

impl LogLevel {
    /// Resolves an optional setting, keeping the default when the value is
    /// absent or not a recognized level.
    ///
    /// # Examples
    ///
    /// ```
    /// use mcp_prompts_core::LogLevel;
    ///
    /// assert_eq!(LogLevel::from_setting(Some("warn")), LogLevel::Warn);
    /// assert_eq!(LogLevel::from_setting(Some("loud")), LogLevel::Info);
    /// assert_eq!(LogLevel::from_setting(None), LogLevel::Info);
    /// ```
    #[must_use]
    pub fn from_setting(setting: Option<&str>) -> Self {
        setting
            .and_then(|value| value.parse().ok())
            .unwrap_or_default()
    }

    /// Returns the filter directive understood by `tracing-subscriber`.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Trace => "trace",
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }
}

impl FromStr for LogLevel {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "trace" => Ok(Self::Trace),
            "debug" => Ok(Self::Debug),
            "info" => Ok(Self::Info),
            "warn" => Ok(Self::Warn),
            "error" => Ok(Self::Error),
            other => Err(Error::ConfigError {
                message: format!("unrecognized log level '{other}'"),
            }),
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Runtime configuration for the template server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Root directory scanned for prompt templates.
    ///
    /// Created on startup if missing.
    /// Default: `prompts`
    pub prompts_dir: PathBuf,

    /// Root directory scanned for resource files.
    ///
    /// Created on startup if missing.
    /// Default: `resources`
    pub resources_dir: PathBuf,

    /// Verbosity of diagnostic logging.
    /// Default: `info`
    pub log_level: LogLevel,
}

impl ServerConfig {
    /// Creates a new builder with default values.
    #[must_use]
    pub fn builder() -> ServerConfigBuilder {
        ServerConfigBuilder::default()
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            prompts_dir: PathBuf::from(DEFAULT_PROMPTS_DIR),
            resources_dir: PathBuf::from(DEFAULT_RESOURCES_DIR),
            log_level: LogLevel::default(),
        }
    }
}

/// Builder for [`ServerConfig`].
#[derive(Debug, Default)]
pub struct ServerConfigBuilder {
    config: ServerConfig,
}

impl ServerConfigBuilder {
    /// Sets the prompts root directory.
    #[must_use]
    pub fn prompts_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.prompts_dir = dir.into();
        self
    }

    /// Sets the resources root directory.
    #[must_use]
    pub fn resources_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.resources_dir = dir.into();
        self
    }

    /// Sets the log level.
    #[must_use]
    pub fn log_level(mut self, level: LogLevel) -> Self {
        self.config.log_level = level;
        self
    }

    /// Builds the configuration.
    #[must_use]
    pub fn build(self) -> ServerConfig {
        self.config
    }
}
