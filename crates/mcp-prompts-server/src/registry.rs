//! Prompt and tool registration for resolved templates.
//!
//! Every template is registered as a prompt under its logical name.
//! Templates flagged with `register_as_tool` are additionally exposed as a
//! tool whose input schema is derived from the template's variables.

use mcp_prompts_core::{Error, LogContext, Result};
use mcp_prompts_template::{MessageRole, TemplateRecord};
use rmcp::model::{
    GetPromptResult, JsonObject, Prompt, PromptArgument, PromptMessage, PromptMessageRole, Tool,
};
use serde_json::{Value, json};
use std::collections::btree_map::Entry;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

/// Name of the free-form input every tool accepts in addition to its
/// template variables.
pub const CATCH_ALL_INPUT: &str = "input";

/// Separator placed between the rendered template and the catch-all input.
const CATCH_ALL_SEPARATOR: &str = "\n\n";

/// Input contract of a template tool.
///
/// Computed once from the template's variable list.
///
/// # Examples
///
/// ```
/// use mcp_prompts_server::ToolInput;
///
/// let input = ToolInput::from_variables(&["topic".to_string()]);
/// let schema = input.json_schema();
///
/// assert_eq!(schema["type"], "object");
/// assert!(schema["properties"].get("topic").is_some());
/// assert!(schema["properties"].get("input").is_some());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolInput {
    variables: Vec<String>,
    catch_all: bool,
}

impl ToolInput {
    /// Builds the contract for a template with the given variables.
    ///
    /// The catch-all input is only separate when no variable already uses
    /// its name.
    #[must_use]
    pub fn from_variables(variables: &[String]) -> Self {
        Self {
            variables: variables.to_vec(),
            catch_all: !variables.iter().any(|v| v == CATCH_ALL_INPUT),
        }
    }

    /// Template variables accepted as named inputs.
    #[must_use]
    pub fn variables(&self) -> &[String] {
        &self.variables
    }

    /// Returns `true` if the catch-all input is accepted on its own.
    #[must_use]
    pub const fn accepts_catch_all(&self) -> bool {
        self.catch_all
    }

    /// JSON schema object describing the accepted inputs.
    ///
    /// Every property is an optional string.
    #[must_use]
    pub fn json_schema(&self) -> JsonObject {
        let mut properties = JsonObject::new();
        for name in &self.variables {
            properties.insert(
                name.clone(),
                json!({
                    "type": "string",
                    "description": format!("Value substituted for {{{{{name}}}}}"),
                }),
            );
        }
        if self.catch_all {
            properties.insert(
                CATCH_ALL_INPUT.to_string(),
                json!({
                    "type": "string",
                    "description": "Additional text appended after the rendered template",
                }),
            );
        }

        let mut schema = JsonObject::new();
        schema.insert("type".to_string(), json!("object"));
        schema.insert("properties".to_string(), Value::Object(properties));
        schema
    }

    /// Extracts the catch-all value from tool arguments, if it applies.
    fn catch_all_value(&self, values: &HashMap<String, String>) -> Option<String> {
        if !self.catch_all {
            return None;
        }
        values
            .get(CATCH_ALL_INPUT)
            .filter(|value| !value.is_empty())
            .cloned()
    }
}

#[derive(Debug)]
struct ToolEntry {
    record: Arc<TemplateRecord>,
    input: ToolInput,
    schema: Arc<JsonObject>,
}

/// Registered prompts and tools, keyed by exposed name.
///
/// Built once at startup and shared read-only afterwards. Names are unique
/// per kind: the first template registered under a name keeps it.
#[derive(Debug, Default)]
pub struct TemplateRegistry {
    prompts: BTreeMap<String, Arc<TemplateRecord>>,
    tools: BTreeMap<String, ToolEntry>,
}

impl TemplateRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers every template as a prompt, and as a tool when flagged.
    ///
    /// Name collisions are logged and the later template is skipped for
    /// that kind of endpoint.
    #[must_use]
    pub fn from_templates(
        records: impl IntoIterator<Item = TemplateRecord>,
        log: &LogContext,
    ) -> Self {
        let span = log.span("register templates");
        let mut registry = Self::new();

        for record in records {
            let record = Arc::new(record);

            if let Err(e) = registry.register_prompt(Arc::clone(&record)) {
                tracing::warn!(template = %record.name, error = %e, "prompt not registered");
            }

            if record.metadata.wants_tool()
                && let Err(e) = registry.register_tool(Arc::clone(&record))
            {
                tracing::warn!(template = %record.name, error = %e, "tool not registered");
            }
        }

        tracing::info!(
            prompts = registry.prompt_count(),
            tools = registry.tool_count(),
            "templates registered"
        );
        span.complete();
        registry
    }

    /// Registers `record` as a prompt under its logical name.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DuplicateName`] if a prompt with that name exists.
    pub fn register_prompt(&mut self, record: Arc<TemplateRecord>) -> Result<()> {
        match self.prompts.entry(record.name.as_str().to_string()) {
            Entry::Occupied(slot) => Err(Error::DuplicateName {
                kind: "prompt",
                name: slot.key().clone(),
            }),
            Entry::Vacant(slot) => {
                tracing::debug!(prompt = slot.key().as_str(), "registered prompt");
                slot.insert(record);
                Ok(())
            }
        }
    }

    /// Registers `record` as a tool under its tool name.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DuplicateName`] if a tool with that name exists.
    pub fn register_tool(&mut self, record: Arc<TemplateRecord>) -> Result<()> {
        match self.tools.entry(record.tool_name().to_string()) {
            Entry::Occupied(slot) => Err(Error::DuplicateName {
                kind: "tool",
                name: slot.key().clone(),
            }),
            Entry::Vacant(slot) => {
                let input = ToolInput::from_variables(&record.variables);
                let schema = Arc::new(input.json_schema());
                tracing::debug!(
                    tool = slot.key().as_str(),
                    inputs = ?input.variables(),
                    "registered tool"
                );
                slot.insert(ToolEntry {
                    record,
                    input,
                    schema,
                });
                Ok(())
            }
        }
    }

    /// Number of registered prompts.
    #[must_use]
    pub fn prompt_count(&self) -> usize {
        self.prompts.len()
    }

    /// Number of registered tools.
    #[must_use]
    pub fn tool_count(&self) -> usize {
        self.tools.len()
    }

    /// Prompt descriptors, sorted by name.
    #[must_use]
    pub fn prompts(&self) -> Vec<Prompt> {
        self.prompts
            .values()
            .map(|record| prompt_descriptor(record))
            .collect()
    }

    /// Renders a prompt with the supplied arguments.
    ///
    /// Missing arguments render as empty strings.
    ///
    /// # Errors
    ///
    /// Returns [`Error::PromptNotFound`] if no prompt has that name.
    pub fn get_prompt(&self, name: &str, arguments: Option<&JsonObject>) -> Result<GetPromptResult> {
        let record = self
            .prompts
            .get(name)
            .ok_or_else(|| Error::PromptNotFound {
                name: name.to_string(),
            })?;

        let text = record.render(&argument_values(arguments));
        let role = match record.metadata.message_role() {
            MessageRole::User => PromptMessageRole::User,
            MessageRole::Assistant => PromptMessageRole::Assistant,
        };

        Ok(GetPromptResult {
            description: record.metadata.description.clone(),
            messages: vec![PromptMessage::new_text(role, text)],
        })
    }

    /// Tool descriptors, sorted by name.
    #[must_use]
    pub fn tools(&self) -> Vec<Tool> {
        self.tools
            .iter()
            .map(|(name, entry)| {
                Tool::new(
                    name.clone(),
                    tool_description(&entry.record),
                    Arc::clone(&entry.schema),
                )
            })
            .collect()
    }

    /// Invokes a tool and returns the rendered text.
    ///
    /// Variables are replaced by the supplied values, or by empty strings
    /// when omitted. A non-empty catch-all input that is not itself a
    /// variable is appended after a blank line.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ToolNotFound`] if no tool has that name.
    pub fn call_tool(&self, name: &str, arguments: Option<&JsonObject>) -> Result<String> {
        let entry = self.tools.get(name).ok_or_else(|| Error::ToolNotFound {
            name: name.to_string(),
        })?;

        let values = argument_values(arguments);
        let mut text = entry.record.render(&values);
        if let Some(extra) = entry.input.catch_all_value(&values) {
            text.push_str(CATCH_ALL_SEPARATOR);
            text.push_str(&extra);
        }

        tracing::debug!(tool = name, bytes = text.len(), "tool rendered");
        Ok(text)
    }
}

fn prompt_descriptor(record: &TemplateRecord) -> Prompt {
    let arguments: Vec<PromptArgument> = record
        .variables
        .iter()
        .map(|name| PromptArgument {
            name: name.clone(),
            title: None,
            description: Some(format!("Value substituted for {{{{{name}}}}}")),
            required: Some(false),
        })
        .collect();

    Prompt::new(
        record.name.as_str(),
        record.metadata.description.clone(),
        (!arguments.is_empty()).then_some(arguments),
    )
}

fn tool_description(record: &TemplateRecord) -> String {
    record
        .metadata
        .description
        .clone()
        .unwrap_or_else(|| format!("Render the {} template", record.name))
}

/// Converts JSON arguments into substitution values.
///
/// Strings are taken as-is, `null` counts as omitted, and any other value
/// is rendered as JSON text.
fn argument_values(arguments: Option<&JsonObject>) -> HashMap<String, String> {
    arguments
        .map(|args| {
            args.iter()
                .filter_map(|(name, value)| {
                    let text = match value {
                        Value::Null => return None,
                        Value::String(s) => s.clone(),
                        other => other.to_string(),
                    };
                    Some((name.clone(), text))
                })
                .collect()
        })
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use mcp_prompts_template::ResourceMap;

    fn record(name: &str, raw: &str) -> TemplateRecord {
        TemplateRecord::resolve(name, raw, &ResourceMap::new())
    }

    fn args(value: Value) -> JsonObject {
        match value {
            Value::Object(map) => map,
            other => panic!("expected object, got {other}"),
        }
    }

    fn registry(records: Vec<TemplateRecord>) -> TemplateRegistry {
        TemplateRegistry::from_templates(records, &LogContext::default())
    }

    // ========================================================================
    // ToolInput Tests
    // ========================================================================

    #[test]
    fn test_tool_input_schema_properties() {
        let input = ToolInput::from_variables(&["a".to_string(), "b".to_string()]);
        let schema = input.json_schema();

        assert_eq!(schema["type"], "object");
        let properties = schema["properties"].as_object().unwrap();
        assert_eq!(properties.len(), 3);
        assert_eq!(properties["a"]["type"], "string");
        assert_eq!(properties["b"]["type"], "string");
        assert!(properties.contains_key(CATCH_ALL_INPUT));
        assert!(schema.get("required").is_none());
    }

    #[test]
    fn test_tool_input_variable_named_input() {
        let input = ToolInput::from_variables(&["input".to_string()]);
        assert!(!input.accepts_catch_all());

        let schema = input.json_schema();
        assert_eq!(schema["properties"].as_object().unwrap().len(), 1);
    }

    #[test]
    fn test_tool_input_no_variables() {
        let input = ToolInput::from_variables(&[]);
        assert!(input.variables().is_empty());
        assert!(input.accepts_catch_all());
    }

    // ========================================================================
    // Registration Tests
    // ========================================================================

    #[test]
    fn test_every_template_is_a_prompt() {
        let registry = registry(vec![
            record("a", "A {{x}}"),
            record("b", "---\nregister_as_tool: true\n---\nB"),
        ]);

        assert_eq!(registry.prompt_count(), 2);
        assert_eq!(registry.tool_count(), 1);
    }

    #[test]
    fn test_tool_name_override_used() {
        let registry = registry(vec![record(
            "dir/summarize",
            "---\nregister_as_tool: true\ntool_name: summarize\n---\n{{text}}",
        )]);

        let tools = registry.tools();
        assert_eq!(tools.len(), 1);
        assert_eq!(tools[0].name, "summarize");
        assert!(registry.call_tool("dir/summarize", None).is_err());

        let prompts = registry.prompts();
        assert_eq!(prompts[0].name, "dir/summarize");
    }

    #[test]
    fn test_duplicate_prompt_first_wins() {
        let mut registry = TemplateRegistry::new();
        registry
            .register_prompt(Arc::new(record("same", "first")))
            .unwrap();

        let err = registry
            .register_prompt(Arc::new(record("same", "second")))
            .unwrap_err();
        assert!(err.is_duplicate());

        let result = registry.get_prompt("same", None).unwrap();
        assert_eq!(result.messages.len(), 1);
        assert_eq!(registry.prompt_count(), 1);
    }

    #[test]
    fn test_duplicate_tool_name_first_wins() {
        let registry = registry(vec![
            record("a", "---\nregister_as_tool: true\ntool_name: t\n---\nfrom a"),
            record("b", "---\nregister_as_tool: true\ntool_name: t\n---\nfrom b"),
        ]);

        assert_eq!(registry.tool_count(), 1);
        assert_eq!(registry.prompt_count(), 2);
        assert_eq!(registry.call_tool("t", None).unwrap(), "from a");
    }

    // ========================================================================
    // Prompt Tests
    // ========================================================================

    #[test]
    fn test_prompt_descriptor() {
        let registry = registry(vec![record(
            "greet",
            "---\ndescription: Greets someone\n---\nHello {{name}} from {{place}}",
        )]);

        let prompts = registry.prompts();
        assert_eq!(prompts.len(), 1);
        assert_eq!(prompts[0].name, "greet");
        assert_eq!(prompts[0].description.as_deref(), Some("Greets someone"));

        let arguments = prompts[0].arguments.as_ref().unwrap();
        let names: Vec<&str> = arguments.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, vec!["name", "place"]);
        assert!(arguments.iter().all(|a| a.required == Some(false)));
    }

    #[test]
    fn test_prompt_without_variables_has_no_arguments() {
        let registry = registry(vec![record("static", "Just text")]);
        assert!(registry.prompts()[0].arguments.is_none());
    }

    #[test]
    fn test_get_prompt_renders_arguments() {
        let registry = registry(vec![record("greet", "Hello {{name}}{{suffix}}")]);
        let arguments = args(json!({"name": "Ada"}));

        let result = registry.get_prompt("greet", Some(&arguments)).unwrap();

        assert_eq!(result.messages.len(), 1);
        assert_eq!(result.messages[0].role, PromptMessageRole::User);
        let text = serde_json::to_value(&result.messages[0].content).unwrap();
        assert_eq!(text["text"], "Hello Ada");
    }

    #[test]
    fn test_get_prompt_assistant_role() {
        let registry = registry(vec![record("r", "---\nrole: Assistant\n---\nI can help.")]);
        let result = registry.get_prompt("r", None).unwrap();
        assert_eq!(result.messages[0].role, PromptMessageRole::Assistant);
    }

    #[test]
    fn test_get_prompt_unknown() {
        let registry = registry(vec![]);
        let err = registry.get_prompt("missing", None).unwrap_err();
        assert!(err.is_not_found());
    }

    // ========================================================================
    // Tool Tests
    // ========================================================================

    #[test]
    fn test_call_tool_replaces_without_append() {
        let registry = registry(vec![record(
            "calc",
            "---\nregister_as_tool: true\n---\nx is {{x}}",
        )]);
        let arguments = args(json!({"x": "5"}));

        let text = registry.call_tool("calc", Some(&arguments)).unwrap();

        assert_eq!(text, "x is 5");
    }

    #[test]
    fn test_call_tool_missing_values_empty() {
        let registry = registry(vec![record(
            "t",
            "---\nregister_as_tool: true\n---\n[{{a}}|{{b}}]",
        )]);
        assert_eq!(registry.call_tool("t", None).unwrap(), "[|]");
    }

    #[test]
    fn test_call_tool_appends_catch_all() {
        let registry = registry(vec![record(
            "t",
            "---\nregister_as_tool: true\n---\nTopic: {{topic}}",
        )]);
        let arguments = args(json!({"topic": "rust", "input": "extra notes"}));

        let text = registry.call_tool("t", Some(&arguments)).unwrap();

        assert_eq!(text, "Topic: rust\n\nextra notes");
    }

    #[test]
    fn test_call_tool_input_variable_not_appended() {
        let registry = registry(vec![record(
            "t",
            "---\nregister_as_tool: true\n---\nEcho {{input}}",
        )]);
        let arguments = args(json!({"input": "hi"}));

        assert_eq!(registry.call_tool("t", Some(&arguments)).unwrap(), "Echo hi");
    }

    #[test]
    fn test_call_tool_stringifies_values() {
        let registry = registry(vec![record(
            "t",
            "---\nregister_as_tool: true\n---\n{{n}} {{flag}} {{none}}",
        )]);
        let arguments = args(json!({"n": 42, "flag": true, "none": null}));

        assert_eq!(registry.call_tool("t", Some(&arguments)).unwrap(), "42 true ");
    }

    #[test]
    fn test_call_tool_unknown() {
        let registry = registry(vec![record("plain", "not a tool")]);
        let err = registry.call_tool("plain", None).unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_tool_descriptor_schema() {
        let registry = registry(vec![record(
            "t",
            "---\nregister_as_tool: true\ndescription: Does t\n---\n{{a}}",
        )]);

        let tools = registry.tools();
        assert_eq!(tools[0].description.as_deref(), Some("Does t"));
        assert_eq!(tools[0].input_schema["type"], "object");
        assert!(tools[0].input_schema["properties"].get("a").is_some());
    }
}
