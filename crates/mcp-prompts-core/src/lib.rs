//! Core types, configuration, and errors for mcp-prompts.
//!
//! This crate provides the foundational types shared by the template
//! pipeline and the MCP server.
//!
//! # Architecture
//!
//! The core consists of:
//! - Strong domain types (`LogicalPath`)
//! - Error hierarchy with contextual information
//! - Server configuration and log level selection
//! - An explicitly constructed logging context with scoped timing spans

#![deny(unsafe_code)]
#![warn(missing_docs, missing_debug_implementations)]

mod config;
mod error;
mod logging;
mod types;

pub use config::{
    DEFAULT_PROMPTS_DIR, DEFAULT_RESOURCES_DIR, LogLevel, ServerConfig, ServerConfigBuilder,
};
pub use error::{Error, Result};
pub use logging::{LogContext, SpanStatus, TimingSpan};
pub use types::LogicalPath;
