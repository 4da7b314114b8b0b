//! Resolved templates and the load pipeline.

use crate::loader::scan_directory;
use crate::metadata::{Metadata, parse_metadata};
use crate::resources::{ResourceMap, resolve_resources};
use crate::variables::{extract_variables, substitute_variables};
use mcp_prompts_core::{LogContext, LogicalPath};
use std::collections::HashMap;
use std::path::Path;

/// A fully resolved template, ready for registration.
///
/// Built once at load time and never modified afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateRecord {
    /// Logical name, unique within the prompts directory.
    pub name: LogicalPath,

    /// Body with front matter removed and resource references resolved.
    pub body: String,

    /// Parsed front matter.
    pub metadata: Metadata,

    /// Distinct variable names in order of first appearance.
    pub variables: Vec<String>,
}

impl TemplateRecord {
    /// Runs the resolution pipeline on one raw template.
    ///
    /// Front matter is split off first, then resource references are
    /// substituted, then the remaining variables are extracted. Variables
    /// introduced by resource content are therefore part of the template.
    ///
    /// # Examples
    ///
    /// ```
    /// use mcp_prompts_template::{ResourceMap, TemplateRecord};
    ///
    /// let resources: ResourceMap = [("sig", "-- {{author}}")].into_iter().collect();
    /// let record = TemplateRecord::resolve(
    ///     "letter",
    ///     "---\ndescription: A letter\n---\nDear {{to}},\n{{resource:sig}}",
    ///     &resources,
    /// );
    ///
    /// assert_eq!(record.body, "Dear {{to}},\n-- {{author}}");
    /// assert_eq!(record.variables, vec!["to", "author"]);
    /// assert_eq!(record.metadata.description.as_deref(), Some("A letter"));
    /// ```
    #[must_use]
    pub fn resolve(name: impl Into<LogicalPath>, raw: &str, resources: &ResourceMap) -> Self {
        Self::resolve_counting(name.into(), raw, resources).0
    }

    /// Like [`TemplateRecord::resolve`], also returning the number of
    /// unresolved resource references.
    fn resolve_counting(name: LogicalPath, raw: &str, resources: &ResourceMap) -> (Self, usize) {
        let (metadata, body) = parse_metadata(raw);
        let resolved = resolve_resources(body, resources);

        if !resolved.missing.is_empty() {
            tracing::warn!(
                template = %name,
                missing = ?resolved.missing,
                "template references unknown resources"
            );
        }

        let variables = extract_variables(&resolved.text);
        let missing = resolved.missing.len();

        let record = Self {
            name,
            body: resolved.text,
            metadata,
            variables,
        };
        (record, missing)
    }

    /// Name under which the template is exposed as a tool.
    ///
    /// The `tool_name` override when present, the logical name otherwise.
    #[must_use]
    pub fn tool_name(&self) -> &str {
        self.metadata
            .tool_name
            .as_deref()
            .unwrap_or_else(|| self.name.as_str())
    }

    /// Fills the template's variables with the supplied values.
    ///
    /// Missing values become empty strings.
    #[must_use]
    pub fn render(&self, values: &HashMap<String, String>) -> String {
        substitute_variables(&self.body, &self.variables, values)
    }
}

/// Result of loading the prompts directory.
#[derive(Debug, Clone, Default)]
pub struct TemplateSet {
    /// Resolved templates sorted by logical name.
    pub records: Vec<TemplateRecord>,

    /// Number of template files found.
    pub considered: usize,

    /// Number of template files that failed to load.
    pub skipped: usize,

    /// Number of resource references that could not be resolved.
    pub missing_references: usize,
}

/// Loads every resource file under `dir` into a [`ResourceMap`].
///
/// An unusable directory yields an empty map.
pub async fn load_resources(dir: &Path, log: &LogContext) -> ResourceMap {
    let report = scan_directory(dir, log).await;
    tracing::info!(
        dir = %dir.display(),
        resources = report.loaded_count(),
        "resources loaded"
    );
    ResourceMap::from(report.loaded)
}

/// Loads and resolves every template under `dir`.
///
/// Resource references are resolved against `resources`, which must come
/// from the same load pass.
pub async fn load_templates(dir: &Path, resources: &ResourceMap, log: &LogContext) -> TemplateSet {
    let report = scan_directory(dir, log).await;
    let span = log.span("resolve templates");

    let mut set = TemplateSet {
        records: Vec::with_capacity(report.loaded_count()),
        considered: report.considered,
        skipped: report.skipped,
        missing_references: 0,
    };

    for (name, raw) in report.loaded {
        let (record, missing) = TemplateRecord::resolve_counting(name, &raw, resources);
        set.missing_references += missing;
        tracing::debug!(
            template = %record.name,
            variables = ?record.variables,
            tool = record.metadata.wants_tool(),
            "template resolved"
        );
        set.records.push(record);
    }

    tracing::info!(
        dir = %dir.display(),
        templates = set.records.len(),
        missing_references = set.missing_references,
        "templates loaded"
    );
    span.complete();
    set
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn resources() -> ResourceMap {
        [("test/resource", "resource content")].into_iter().collect()
    }

    #[test]
    fn test_resolve_pipeline_order() {
        let raw = "---\nregister_as_tool: true\n---\nUse {{resource:test/resource}} with {{x}}";
        let record = TemplateRecord::resolve("t", raw, &resources());

        assert_eq!(record.body, "Use resource content with {{x}}");
        assert_eq!(record.variables, vec!["x"]);
        assert!(record.metadata.wants_tool());
    }

    #[test]
    fn test_resolve_missing_resource_does_not_panic() {
        let record = TemplateRecord::resolve("t", "{{resource:gone}} {{v}}", &ResourceMap::new());
        assert_eq!(record.body, "[Resource not found: gone] {{v}}");
        assert_eq!(record.variables, vec!["v"]);
    }

    #[test]
    fn test_variables_never_include_resource_namespace() {
        let record = TemplateRecord::resolve(
            "t",
            "{{resource:a}} {{resource:test/resource}} {{b}}",
            &resources(),
        );
        assert!(record.variables.iter().all(|v| !v.starts_with("resource:")));
        assert_eq!(record.variables, vec!["b"]);
    }

    #[test]
    fn test_tool_name_override() {
        let mut record = TemplateRecord::resolve("dir/name", "body", &ResourceMap::new());
        assert_eq!(record.tool_name(), "dir/name");

        record.metadata.tool_name = Some("custom".to_string());
        assert_eq!(record.tool_name(), "custom");
    }

    #[test]
    fn test_render_fills_values() {
        let record = TemplateRecord::resolve("t", "{{x}}-{{x}}-{{y}}", &ResourceMap::new());
        let values = HashMap::from([("x".to_string(), "5".to_string())]);
        assert_eq!(record.render(&values), "5-5-");
    }

    #[tokio::test]
    async fn test_load_pipeline_end_to_end() {
        let temp = TempDir::new().unwrap();
        let resources_dir = temp.path().join("resources");
        let prompts_dir = temp.path().join("prompts");

        tokio::fs::create_dir_all(resources_dir.join("guides"))
            .await
            .unwrap();
        tokio::fs::create_dir_all(&prompts_dir).await.unwrap();
        tokio::fs::write(resources_dir.join("guides/style.txt"), "Be concise.")
            .await
            .unwrap();
        tokio::fs::write(
            prompts_dir.join("review.txt"),
            "---\ndescription: Review code\n---\n{{resource:guides/style}}\n{{code}} {{resource:nope}}",
        )
        .await
        .unwrap();

        let log = LogContext::default();
        let resources = load_resources(&resources_dir, &log).await;
        let set = load_templates(&prompts_dir, &resources, &log).await;

        assert_eq!(resources.len(), 1);
        assert_eq!(set.records.len(), 1);
        assert_eq!(set.considered, 1);
        assert_eq!(set.missing_references, 1);

        let record = &set.records[0];
        assert_eq!(record.name.as_str(), "review");
        assert_eq!(
            record.body,
            "Be concise.\n{{code}} [Resource not found: nope]"
        );
        assert_eq!(record.variables, vec!["code"]);
        assert_eq!(log.in_flight_spans(), 0);
    }

    #[tokio::test]
    async fn test_load_templates_missing_directory_is_created() {
        let temp = TempDir::new().unwrap();
        let dir = temp.path().join("prompts");

        let set = load_templates(&dir, &ResourceMap::new(), &LogContext::default()).await;

        assert!(set.records.is_empty());
        assert!(dir.is_dir());
    }
}
