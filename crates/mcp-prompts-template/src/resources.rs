//! Resource reference resolution.
//!
//! A `{{resource:<path>}}` token is replaced by the content of the resource
//! file loaded under that logical path. Resolution is a single pass: content
//! pulled in from a resource is not scanned for further references.

use mcp_prompts_core::LogicalPath;
use regex::{Captures, Regex};
use std::collections::{BTreeMap, HashMap};
use std::sync::LazyLock;

static RESOURCE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{\{resource:([^}]+)\}\}").expect("valid regex"));

/// Text inserted in place of a reference to an unknown resource.
///
/// # Examples
///
/// ```
/// use mcp_prompts_template::missing_resource_marker;
///
/// assert_eq!(missing_resource_marker("docs/api"), "[Resource not found: docs/api]");
/// ```
#[must_use]
pub fn missing_resource_marker(path: &str) -> String {
    format!("[Resource not found: {path}]")
}

/// Resource contents keyed by logical path.
///
/// Built once per load pass and read-only afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResourceMap {
    entries: HashMap<LogicalPath, String>,
}

impl ResourceMap {
    /// Creates an empty map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a resource, replacing any previous content under `path`.
    pub fn insert(&mut self, path: impl Into<LogicalPath>, content: impl Into<String>) {
        self.entries.insert(path.into(), content.into());
    }

    /// Looks up resource content by logical path.
    #[must_use]
    pub fn get(&self, path: &str) -> Option<&str> {
        self.entries.get(path).map(String::as_str)
    }

    /// Returns the number of resources.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if there are no resources.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl From<BTreeMap<LogicalPath, String>> for ResourceMap {
    fn from(loaded: BTreeMap<LogicalPath, String>) -> Self {
        Self {
            entries: loaded.into_iter().collect(),
        }
    }
}

impl<P: Into<LogicalPath>, C: Into<String>> FromIterator<(P, C)> for ResourceMap {
    fn from_iter<I: IntoIterator<Item = (P, C)>>(iter: I) -> Self {
        let mut map = Self::new();
        for (path, content) in iter {
            map.insert(path, content);
        }
        map
    }
}

/// Output of [`resolve_resources`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolved {
    /// Text with every reference substituted.
    pub text: String,

    /// Number of references processed, hits and misses together.
    pub references: usize,

    /// Paths that were not found, in order of appearance.
    pub missing: Vec<String>,
}

/// Replaces every `{{resource:<path>}}` token in `text`.
///
/// Known paths are replaced by their content verbatim. Unknown paths are
/// replaced by [`missing_resource_marker`] and processing continues with the
/// remaining tokens. The path is trimmed before lookup.
///
/// # Examples
///
/// ```
/// use mcp_prompts_template::{ResourceMap, resolve_resources};
///
/// let resources: ResourceMap = [("test/resource", "resource content")].into_iter().collect();
/// let resolved = resolve_resources("This references {{resource:test/resource}}.", &resources);
///
/// assert_eq!(resolved.text, "This references resource content.");
/// assert_eq!(resolved.references, 1);
/// assert!(resolved.missing.is_empty());
/// ```
#[must_use]
pub fn resolve_resources(text: &str, resources: &ResourceMap) -> Resolved {
    let mut references = 0usize;
    let mut missing = Vec::new();

    let resolved = RESOURCE_REGEX.replace_all(text, |caps: &Captures<'_>| {
        references += 1;
        let path = caps[1].trim();
        if let Some(content) = resources.get(path) {
            tracing::trace!(path, "resolved resource reference");
            content.to_string()
        } else {
            tracing::warn!(path, "resource not found");
            missing.push(path.to_string());
            missing_resource_marker(path)
        }
    });

    Resolved {
        text: resolved.into_owned(),
        references,
        missing,
    }
}
