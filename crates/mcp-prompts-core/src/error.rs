//! Error types for mcp-prompts.
//!
//! A single error hierarchy is shared by the template pipeline and the
//! server. Most variants never escape the load phase: they are logged and
//! the affected file is skipped.
//!
//! # Examples
//!
//! ```
//! use mcp_prompts_core::{Error, Result};
//!
//! fn find_prompt(name: &str) -> Result<()> {
//!     Err(Error::PromptNotFound {
//!         name: name.to_string(),
//!     })
//! }
//!
//! let err = find_prompt("missing").unwrap_err();
//! assert!(err.is_not_found());
//! ```

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for mcp-prompts.
#[derive(Error, Debug)]
pub enum Error {
    /// A file could not be read.
    ///
    /// Raised by the file loader when the file is missing, unreadable,
    /// or not valid UTF-8.
    #[error("failed to load {path}")]
    LoadFailed {
        /// Path of the file that failed to load
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// File exceeds the maximum size the loader accepts.
    #[error("file too large: {path} ({size} bytes exceeds {limit} limit)")]
    FileTooLarge {
        /// Path of the oversized file
        path: PathBuf,
        /// Actual size in bytes
        size: u64,
        /// Configured limit in bytes
        limit: u64,
    },

    /// A template root directory could not be created or read.
    #[error("directory unavailable: {path}")]
    DirectoryUnavailable {
        /// Directory that could not be accessed
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Configuration error.
    #[error("Configuration error: {message}")]
    ConfigError {
        /// Description of the configuration problem
        message: String,
    },

    /// No prompt is registered under the requested name.
    #[error("prompt not found: {name}")]
    PromptNotFound {
        /// Requested prompt name
        name: String,
    },

    /// No tool is registered under the requested name.
    #[error("tool not found: {name}")]
    ToolNotFound {
        /// Requested tool name
        name: String,
    },

    /// A second endpoint tried to register under an existing name.
    #[error("duplicate {kind} name: {name}")]
    DuplicateName {
        /// Endpoint kind ("prompt" or "tool")
        kind: &'static str,
        /// Conflicting name
        name: String,
    },
}

impl Error {
    /// Returns `true` if this error came from reading a file.
    ///
    /// # Examples
    ///
    /// ```
    /// use mcp_prompts_core::Error;
    /// use std::path::PathBuf;
    ///
    /// let err = Error::LoadFailed {
    ///     path: PathBuf::from("prompts/missing.txt"),
    ///     source: std::io::Error::from(std::io::ErrorKind::NotFound),
    /// };
    /// assert!(err.is_load_error());
    /// ```
    #[must_use]
    pub const fn is_load_error(&self) -> bool {
        matches!(self, Self::LoadFailed { .. } | Self::FileTooLarge { .. })
    }

    /// Returns `true` if a requested prompt or tool does not exist.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::PromptNotFound { .. } | Self::ToolNotFound { .. })
    }

    /// Returns `true` if this is a configuration error.
    ///
    /// # Examples
    ///
    /// ```
    /// use mcp_prompts_core::Error;
    ///
    /// let err = Error::ConfigError {
    ///     message: "unknown log level".to_string(),
    /// };
    /// assert!(err.is_config_error());
    /// ```
    #[must_use]
    pub const fn is_config_error(&self) -> bool {
        matches!(self, Self::ConfigError { .. })
    }

    /// Returns `true` if this is a name collision during registration.
    #[must_use]
    pub const fn is_duplicate(&self) -> bool {
        matches!(self, Self::DuplicateName { .. })
    }
}

/// Result type alias for mcp-prompts operations.
pub type Result<T> = std::result::Result<T, Error>;
