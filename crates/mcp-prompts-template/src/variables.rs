//! Variable placeholder extraction and substitution.

use regex::{Captures, Regex};
use std::collections::{HashMap, HashSet};
use std::sync::LazyLock;

// Names cannot contain ':', so `{{resource:...}}` references never match.
static VARIABLE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{\{([a-zA-Z0-9_]+)\}\}").expect("valid regex"));

/// Returns the distinct variable names used in `text`, in order of first
/// appearance.
///
/// Only `{{name}}` tokens whose name consists of ASCII letters, digits and
/// underscores count. Resource references (`{{resource:...}}`) are never
/// reported.
///
/// # Examples
///
/// ```
/// use mcp_prompts_template::extract_variables;
///
/// let vars = extract_variables("This has {{variable1}} and {{resource:path/to/resource}}.");
/// assert_eq!(vars, vec!["variable1"]);
///
/// assert_eq!(extract_variables("{{a}}{{a}}{{b}}"), vec!["a", "b"]);
/// ```
#[must_use]
pub fn extract_variables(text: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    VARIABLE_REGEX
        .captures_iter(text)
        .filter_map(|c| c.get(1))
        .map(|m| m.as_str())
        .filter(|name| seen.insert(*name))
        .map(str::to_string)
        .collect()
}

/// Fills `{{name}}` placeholders for every name in `variables`.
///
/// Each placeholder is replaced by the matching entry of `values`, or by an
/// empty string when no value was supplied. Placeholders for names outside
/// `variables` are left untouched. Substitution is a single pass, so
/// placeholders that appear inside supplied values are not expanded.
///
/// # Examples
///
/// ```
/// use mcp_prompts_template::substitute_variables;
/// use std::collections::HashMap;
///
/// let variables = vec!["x".to_string(), "y".to_string()];
/// let values = HashMap::from([("x".to_string(), "5".to_string())]);
///
/// let text = substitute_variables("{{x}} + {{x}} = {{y}}", &variables, &values);
/// assert_eq!(text, "5 + 5 = ");
/// ```
#[must_use]
pub fn substitute_variables(
    text: &str,
    variables: &[String],
    values: &HashMap<String, String>,
) -> String {
    VARIABLE_REGEX
        .replace_all(text, |caps: &Captures<'_>| {
            let name = &caps[1];
            if variables.iter().any(|v| v == name) {
                values.get(name).cloned().unwrap_or_default()
            } else {
                caps[0].to_string()
            }
        })
        .into_owned()
}
