//! Command-line and environment configuration for the server binary.

use clap::Parser;
use mcp_prompts_core::{
    DEFAULT_PROMPTS_DIR, DEFAULT_RESOURCES_DIR, LogContext, LogLevel, ServerConfig,
};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Serve prompt templates over the Model Context Protocol.
///
/// Templates are read from the prompts directory once at startup and served
/// over stdio. Logs are written to stderr.
#[derive(Parser, Debug)]
#[command(name = "mcp-prompts")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Directory containing prompt templates
    #[arg(long, env = "PROMPTS_DIR", default_value = DEFAULT_PROMPTS_DIR)]
    pub prompts_dir: PathBuf,

    /// Directory containing resource files referenced by templates
    #[arg(long, env = "RESOURCES_DIR", default_value = DEFAULT_RESOURCES_DIR)]
    pub resources_dir: PathBuf,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "LOG_LEVEL")]
    pub log_level: Option<String>,
}

impl Cli {
    /// Returns the requested log level if it is not a recognized level.
    ///
    /// Such a value is ignored in favor of the default; the caller reports
    /// it once logging is up.
    #[must_use]
    pub fn unrecognized_log_level(&self) -> Option<&str> {
        self.log_level
            .as_deref()
            .filter(|value| value.parse::<LogLevel>().is_err())
    }

    /// Converts the parsed arguments into a server configuration.
    #[must_use]
    pub fn into_config(self) -> ServerConfig {
        ServerConfig::builder()
            .prompts_dir(self.prompts_dir)
            .resources_dir(self.resources_dir)
            .log_level(LogLevel::from_setting(self.log_level.as_deref()))
            .build()
    }
}

/// Builds the subscriber filter for the verbosity carried by `log`.
#[must_use]
pub fn env_filter(log: &LogContext) -> EnvFilter {
    EnvFilter::new(log.level().as_str())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing_subscriber::filter::LevelFilter;

    #[test]
    fn test_cli_explicit_directories() {
        let cli = Cli::parse_from([
            "mcp-prompts",
            "--prompts-dir",
            "/srv/prompts",
            "--resources-dir",
            "/srv/resources",
        ]);
        let config = cli.into_config();

        assert_eq!(config.prompts_dir, PathBuf::from("/srv/prompts"));
        assert_eq!(config.resources_dir, PathBuf::from("/srv/resources"));
    }

    #[test]
    fn test_cli_log_level_case_insensitive() {
        let cli = Cli::parse_from(["mcp-prompts", "--log-level", "DEBUG"]);
        assert!(cli.unrecognized_log_level().is_none());
        assert_eq!(cli.into_config().log_level, LogLevel::Debug);
    }

    #[test]
    fn test_cli_unrecognized_log_level_keeps_default() {
        let cli = Cli::parse_from(["mcp-prompts", "--log-level", "chatty"]);
        assert_eq!(cli.unrecognized_log_level(), Some("chatty"));
        assert_eq!(cli.into_config().log_level, LogLevel::Info);
    }

    #[test]
    fn test_cli_rejects_unknown_flag() {
        let result = Cli::try_parse_from(["mcp-prompts", "--watch"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_cli_definition_is_valid() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_env_filter_follows_log_context() {
        let cli = Cli::parse_from(["mcp-prompts", "--log-level", "warn"]);
        let log = LogContext::new(cli.into_config().log_level);

        assert_eq!(env_filter(&log).max_level_hint(), Some(LevelFilter::WARN));
    }

    #[test]
    fn test_env_filter_default_is_info() {
        let filter = env_filter(&LogContext::default());
        assert_eq!(filter.max_level_hint(), Some(LevelFilter::INFO));
    }
}
