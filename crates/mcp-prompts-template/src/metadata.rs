//! Front matter parsing.
//!
//! A template may begin with a block of `key: value` lines fenced by `---`:
//!
//! ```text
//! ---
//! description: Review a pull request
//! register_as_tool: true
//! tool_name: review_pr
//! ---
//!
//! Review the following change: {{diff}}
//! ```
//!
//! Only the keys listed on [`Metadata`] are recognized; anything else is
//! dropped without error.

use regex::Regex;
use std::fmt::Write as _;
use std::sync::LazyLock;

// The optional interior group is lazy (`??`) so an empty block is preferred
// over one that swallows a later `---` line.
static FRONT_MATTER_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\A---[ \t]*\r?\n(?:([\s\S]*?)\r?\n)??---\s*(?:\n|\z)").expect("valid regex")
});

/// Role attached to the message produced by a prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MessageRole {
    /// Message authored by the user (default)
    #[default]
    User,
    /// Message authored by the assistant
    Assistant,
}

/// Metadata parsed from a template's front matter.
///
/// Every field is optional; `None` means the key was absent and the default
/// behavior applies.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Metadata {
    /// Human-readable description attached to the prompt and tool.
    pub description: Option<String>,

    /// Display name of the template.
    pub name: Option<String>,

    /// Message role for the rendered prompt (`user` or `assistant`).
    pub role: Option<String>,

    /// `register_as_prompt` / `registerasprompt` flag.
    pub register_as_prompt: Option<bool>,

    /// `register_as_tool` / `registerastool` flag.
    pub register_as_tool: Option<bool>,

    /// `tool_name` / `toolname`: exposed tool name override.
    pub tool_name: Option<String>,
}

impl Metadata {
    /// Returns `true` if the template should also be exposed as a tool.
    #[must_use]
    pub fn wants_tool(&self) -> bool {
        self.register_as_tool.unwrap_or(false)
    }

    /// Maps the `role` key to a message role.
    ///
    /// `assistant` (any case) selects [`MessageRole::Assistant`]; anything
    /// else, including an absent key, selects [`MessageRole::User`].
    #[must_use]
    pub fn message_role(&self) -> MessageRole {
        match self.role.as_deref() {
            Some(role) if role.eq_ignore_ascii_case("assistant") => MessageRole::Assistant,
            _ => MessageRole::User,
        }
    }

    /// Renders the recognized fields back into a front matter block.
    ///
    /// Fields are written in a fixed order and absent fields are omitted.
    /// Parsing the output with [`parse_metadata`] yields `self` again, as
    /// long as no value contains a line break or surrounding whitespace.
    ///
    /// # Examples
    ///
    /// ```
    /// use mcp_prompts_template::{Metadata, parse_metadata};
    ///
    /// let metadata = Metadata {
    ///     description: Some("Say hello".to_string()),
    ///     register_as_tool: Some(true),
    ///     ..Default::default()
    /// };
    ///
    /// let rendered = metadata.to_front_matter();
    /// assert_eq!(rendered, "---\ndescription: Say hello\nregister_as_tool: true\n---\n");
    /// assert_eq!(parse_metadata(&rendered).0, metadata);
    /// ```
    #[must_use]
    pub fn to_front_matter(&self) -> String {
        let mut out = String::from("---\n");

        let strings = [
            ("description", &self.description),
            ("name", &self.name),
            ("role", &self.role),
        ];
        for (key, value) in strings {
            if let Some(value) = value {
                let _ = writeln!(out, "{key}: {value}");
            }
        }

        let flags = [
            ("register_as_prompt", self.register_as_prompt),
            ("register_as_tool", self.register_as_tool),
        ];
        for (key, value) in flags {
            if let Some(value) = value {
                let _ = writeln!(out, "{key}: {value}");
            }
        }

        if let Some(tool_name) = &self.tool_name {
            let _ = writeln!(out, "tool_name: {tool_name}");
        }

        out.push_str("---\n");
        out
    }

    fn apply(&mut self, key: &str, value: &str) {
        match key {
            "description" => self.description = Some(value.to_string()),
            "name" => self.name = Some(value.to_string()),
            "role" => self.role = Some(value.to_string()),
            "register_as_prompt" | "registerasprompt" => {
                self.register_as_prompt = Some(parse_flag(value));
            }
            "register_as_tool" | "registerastool" => {
                self.register_as_tool = Some(parse_flag(value));
            }
            "tool_name" | "toolname" => self.tool_name = Some(value.to_string()),
            _ => tracing::trace!(key, "ignoring unrecognized metadata key"),
        }
    }
}

fn parse_flag(value: &str) -> bool {
    value.eq_ignore_ascii_case("true")
}

/// Splits leading front matter from a template.
///
/// Returns the parsed metadata and the body with the whole block removed,
/// including both fence lines and any blank lines right after the closing
/// fence. An empty block (`---` directly followed by `---`) is removed just
/// the same. Without a leading block the metadata is empty and the text is
/// returned unchanged.
///
/// Lines without a colon are skipped. Keys are trimmed and lower-cased;
/// values are trimmed and may themselves contain colons.
///
/// # Examples
///
/// ```
/// use mcp_prompts_template::parse_metadata;
///
/// let (metadata, body) = parse_metadata("---\ndescription: Greets: warmly\n---\n\nHello {{name}}");
/// assert_eq!(metadata.description.as_deref(), Some("Greets: warmly"));
/// assert_eq!(body, "Hello {{name}}");
///
/// let (_, body) = parse_metadata("---\n---\nBody");
/// assert_eq!(body, "Body");
/// ```
#[must_use]
pub fn parse_metadata(text: &str) -> (Metadata, &str) {
    let Some(captures) = FRONT_MATTER_REGEX.captures(text) else {
        return (Metadata::default(), text);
    };

    let mut metadata = Metadata::default();
    if let Some(block) = captures.get(1) {
        for line in block.as_str().lines() {
            let Some((key, value)) = line.split_once(':') else {
                continue;
            };
            let key = key.trim().to_lowercase();
            if key.is_empty() {
                continue;
            }
            metadata.apply(&key, value.trim());
        }
    }

    let end = captures.get(0).map_or(0, |m| m.end());
    (metadata, &text[end..])
}
