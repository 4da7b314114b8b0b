//! MCP server entry point for template-backed prompts and tools.
//!
//! # Usage
//!
//! Run the server via stdio transport:
//!
//! ```bash
//! mcp-prompts --prompts-dir ./prompts --resources-dir ./resources
//! ```
//!
//! Or configure in `~/.config/claude/mcp.json`:
//!
//! ```json
//! {
//!   "mcpServers": {
//!     "prompts": {
//!       "command": "mcp-prompts",
//!       "env": { "PROMPTS_DIR": "/path/to/prompts", "LOG_LEVEL": "debug" }
//!     }
//!   }
//! }
//! ```

use anyhow::{Context, Result};
use clap::Parser;
use mcp_prompts_core::LogContext;
use mcp_prompts_server::cli::env_filter;
use mcp_prompts_server::{Cli, PromptService};
use rmcp::ServiceExt;
use rmcp::transport::stdio;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let rejected_level = cli.unrecognized_log_level().map(str::to_string);
    let config = cli.into_config();
    let log = LogContext::new(config.log_level);

    // Initialize logging to stderr (stdout is for MCP protocol)
    tracing_subscriber::registry()
        .with(env_filter(&log))
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true),
        )
        .init();

    if let Some(value) = rejected_level {
        tracing::warn!(
            value = %value,
            using = %log.level(),
            "unrecognized log level, keeping default"
        );
    }

    tracing::info!(
        prompts_dir = %config.prompts_dir.display(),
        resources_dir = %config.resources_dir.display(),
        "Starting mcp-prompts v{}",
        env!("CARGO_PKG_VERSION")
    );

    let service = PromptService::load(&config, &log).await;

    let server = service
        .serve(stdio())
        .await
        .context("failed to attach stdio transport")?;
    server.waiting().await.context("server task failed")?;

    tracing::info!("Server shutdown complete");
    Ok(())
}
