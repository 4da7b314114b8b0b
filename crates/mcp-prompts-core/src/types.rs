//! Strong domain types for mcp-prompts.
//!
//! # Examples
//!
//! ```
//! use mcp_prompts_core::LogicalPath;
//! use std::path::Path;
//!
//! let path = LogicalPath::from_relative(Path::new("coding/review.txt")).unwrap();
//! assert_eq!(path.as_str(), "coding/review");
//! ```

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;
use std::path::{Component, Path};

/// Logical identifier of a template or resource (newtype over String).
///
/// Derived from a file's path relative to its root directory with the
/// extension removed. Components are always joined with `/`, independent of
/// the host platform, so `{{resource:guides/style}}` resolves the same way
/// everywhere.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct LogicalPath(String);

impl LogicalPath {
    /// Creates a logical path from an already normalized string.
    ///
    /// # Examples
    ///
    /// ```
    /// use mcp_prompts_core::LogicalPath;
    ///
    /// let path = LogicalPath::new("test/resource");
    /// assert_eq!(path.as_str(), "test/resource");
    /// ```
    #[inline]
    #[must_use]
    pub fn new(path: impl Into<String>) -> Self {
        Self(path.into())
    }

    /// Derives a logical path from a root-relative file path.
    ///
    /// Strips the final extension and joins the remaining components with
    /// `/`. Returns `None` for empty paths, paths containing `..`, root or
    /// prefix components, or components that are not valid UTF-8.
    ///
    /// # Examples
    ///
    /// ```
    /// use mcp_prompts_core::LogicalPath;
    /// use std::path::Path;
    ///
    /// let nested = LogicalPath::from_relative(Path::new("a/b/c.txt")).unwrap();
    /// assert_eq!(nested.as_str(), "a/b/c");
    ///
    /// assert!(LogicalPath::from_relative(Path::new("../escape.txt")).is_none());
    /// ```
    #[must_use]
    pub fn from_relative(relative: &Path) -> Option<Self> {
        let stripped = relative.with_extension("");
        let parts = stripped
            .components()
            .map(|component| match component {
                Component::Normal(part) => part.to_str(),
                _ => None,
            })
            .collect::<Option<Vec<_>>>()?;

        if parts.is_empty() {
            return None;
        }

        Some(Self(parts.join("/")))
    }

    /// Returns the logical path as a string slice.
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the `LogicalPath` and returns the inner `String`.
    #[inline]
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for LogicalPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for LogicalPath {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for LogicalPath {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl AsRef<str> for LogicalPath {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for LogicalPath {
    fn borrow(&self) -> &str {
        &self.0
    }
}
