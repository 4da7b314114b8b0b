//! MCP server library for template-backed prompts and tools.
//!
//! At startup the server loads two directories of text files:
//!
//! - **resources** - Reusable snippets, referenced from templates as
//!   `{{resource:path}}`
//! - **prompts** - Templates with optional `---` front matter and
//!   `{{variable}}` placeholders
//!
//! Every template becomes a prompt named by its path relative to the
//! prompts directory, without extension. Templates whose front matter sets
//! `register_as_tool: true` also become tools.
//!
//! # Examples
//!
//! ```no_run
//! use mcp_prompts_core::{LogContext, ServerConfig};
//! use mcp_prompts_server::PromptService;
//! use rmcp::ServiceExt;
//! use rmcp::transport::stdio;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let config = ServerConfig::builder().prompts_dir("templates").build();
//! let log = LogContext::new(config.log_level);
//!
//! let service = PromptService::load(&config, &log).await;
//! service.serve(stdio()).await?.waiting().await?;
//! # Ok(())
//! # }
//! ```

pub mod cli;
pub mod registry;
pub mod service;

pub use cli::Cli;
pub use registry::{CATCH_ALL_INPUT, TemplateRegistry, ToolInput};
pub use service::PromptService;
