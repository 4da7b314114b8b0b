//! MCP server implementation serving templates as prompts and tools.
//!
//! The `PromptService` answers four requests:
//! 1. `prompts/list` - Every loaded template with its variables as arguments
//! 2. `prompts/get` - A template rendered with the supplied arguments
//! 3. `tools/list` - Templates flagged with `register_as_tool`
//! 4. `tools/call` - A tool template rendered with the supplied arguments

use crate::registry::TemplateRegistry;
use mcp_prompts_core::{Error, LogContext, ServerConfig};
use mcp_prompts_template::{load_resources, load_templates};
use rmcp::handler::server::ServerHandler;
use rmcp::model::{
    CallToolRequestParam, CallToolResult, Content, GetPromptRequestParam, GetPromptResult,
    Implementation, ListPromptsResult, ListToolsResult, PaginatedRequestParam, ProtocolVersion,
    ServerCapabilities, ServerInfo,
};
use rmcp::service::RequestContext;
use rmcp::{ErrorData as McpError, RoleServer};
use std::sync::Arc;

/// MCP server exposing a fixed set of templates.
///
/// The registry is built once at startup and shared read-only between
/// clones of the service.
///
/// # Examples
///
/// ```no_run
/// use mcp_prompts_core::{LogContext, ServerConfig};
/// use mcp_prompts_server::PromptService;
/// use rmcp::ServiceExt;
/// use rmcp::transport::stdio;
///
/// # async fn example() -> anyhow::Result<()> {
/// let config = ServerConfig::default();
/// let service = PromptService::load(&config, &LogContext::default()).await;
/// service.serve(stdio()).await?.waiting().await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct PromptService {
    registry: Arc<TemplateRegistry>,
}

impl PromptService {
    /// Creates a service around an already populated registry.
    #[must_use]
    pub fn new(registry: TemplateRegistry) -> Self {
        Self {
            registry: Arc::new(registry),
        }
    }

    /// Loads resources and templates from the configured directories and
    /// registers them.
    ///
    /// Unusable directories and unreadable files are logged and skipped, so
    /// loading always yields a service, possibly with nothing registered.
    pub async fn load(config: &ServerConfig, log: &LogContext) -> Self {
        let resources = load_resources(&config.resources_dir, log).await;
        let templates = load_templates(&config.prompts_dir, &resources, log).await;

        let skipped = templates.skipped;
        let missing_references = templates.missing_references;
        let registry = TemplateRegistry::from_templates(templates.records, log);

        tracing::info!(
            resources = resources.len(),
            prompts = registry.prompt_count(),
            tools = registry.tool_count(),
            skipped,
            missing_references,
            "load complete"
        );

        Self::new(registry)
    }

    /// Returns the registry backing this service.
    #[must_use]
    pub fn registry(&self) -> &TemplateRegistry {
        &self.registry
    }
}

/// Maps a registry error onto an MCP protocol error.
fn to_mcp_error(error: &Error) -> McpError {
    if error.is_not_found() {
        McpError::invalid_params(error.to_string(), None)
    } else {
        McpError::internal_error(error.to_string(), None)
    }
}

impl ServerHandler for PromptService {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::V_2024_11_05,
            capabilities: ServerCapabilities::builder()
                .enable_prompts()
                .enable_tools()
                .build(),
            server_info: Implementation::from_build_env(),
            instructions: Some(format!(
                "Serves {} prompt templates, {} of them also callable as tools. \
                 Pass template variables as prompt arguments or tool inputs; \
                 omitted variables render as empty text.",
                self.registry.prompt_count(),
                self.registry.tool_count(),
            )),
        }
    }

    async fn list_prompts(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListPromptsResult, McpError> {
        Ok(ListPromptsResult::with_all_items(self.registry.prompts()))
    }

    async fn get_prompt(
        &self,
        request: GetPromptRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> Result<GetPromptResult, McpError> {
        self.registry
            .get_prompt(&request.name, request.arguments.as_ref())
            .map_err(|e| to_mcp_error(&e))
    }

    async fn list_tools(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListToolsResult, McpError> {
        Ok(ListToolsResult::with_all_items(self.registry.tools()))
    }

    async fn call_tool(
        &self,
        request: CallToolRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, McpError> {
        let text = self
            .registry
            .call_tool(&request.name, request.arguments.as_ref())
            .map_err(|e| to_mcp_error(&e))?;

        Ok(CallToolResult::success(vec![Content::text(text)]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mcp_prompts_core::LogLevel;
    use tempfile::TempDir;

    fn config_in(temp: &TempDir) -> ServerConfig {
        ServerConfig::builder()
            .prompts_dir(temp.path().join("prompts"))
            .resources_dir(temp.path().join("resources"))
            .log_level(LogLevel::Debug)
            .build()
    }

    #[test]
    fn test_get_info() {
        let service = PromptService::new(TemplateRegistry::new());
        let info = service.get_info();

        assert_eq!(info.protocol_version, ProtocolVersion::V_2024_11_05);
        assert!(info.capabilities.tools.is_some());
        assert!(info.capabilities.prompts.is_some());
        assert!(info.instructions.unwrap().contains("Serves 0 prompt templates"));
    }

    #[test]
    fn test_clones_share_registry() {
        let service = PromptService::new(TemplateRegistry::new());
        let clone = service.clone();
        assert!(Arc::ptr_eq(&service.registry, &clone.registry));
    }

    #[test]
    fn test_not_found_maps_to_invalid_params() {
        let error = to_mcp_error(&Error::ToolNotFound {
            name: "nope".to_string(),
        });
        assert_eq!(error.code, McpError::invalid_params("", None).code);
        assert!(error.message.contains("nope"));
    }

    #[test]
    fn test_other_errors_map_to_internal() {
        let error = to_mcp_error(&Error::DuplicateName {
            kind: "tool",
            name: "dup".to_string(),
        });
        assert_eq!(error.code, McpError::internal_error("", None).code);
    }

    #[tokio::test]
    async fn test_load_from_directories() {
        let temp = TempDir::new().unwrap();
        let config = config_in(&temp);
        tokio::fs::create_dir_all(&config.prompts_dir).await.unwrap();
        tokio::fs::create_dir_all(&config.resources_dir).await.unwrap();
        tokio::fs::write(config.resources_dir.join("tone.txt"), "Be kind.")
            .await
            .unwrap();
        tokio::fs::write(
            config.prompts_dir.join("reply.txt"),
            "---\nregister_as_tool: true\n---\n{{resource:tone}} Reply to {{message}}",
        )
        .await
        .unwrap();

        let log = LogContext::new(config.log_level);
        let service = PromptService::load(&config, &log).await;

        assert_eq!(service.registry().prompt_count(), 1);
        assert_eq!(service.registry().tool_count(), 1);
        assert_eq!(log.in_flight_spans(), 0);

        let text = service.registry().call_tool("reply", None).unwrap();
        assert_eq!(text, "Be kind. Reply to ");
    }

    #[tokio::test]
    async fn test_load_creates_missing_directories() {
        let temp = TempDir::new().unwrap();
        let config = config_in(&temp);

        let service = PromptService::load(&config, &LogContext::default()).await;

        assert_eq!(service.registry().prompt_count(), 0);
        assert!(config.prompts_dir.is_dir());
        assert!(config.resources_dir.is_dir());
    }
}
