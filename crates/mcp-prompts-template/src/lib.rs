//! Template loading and interpolation for mcp-prompts.
//!
//! This crate turns two directories of text files into resolved templates
//! ready for registration.
//!
//! # Architecture
//!
//! The load pipeline:
//! 1. `loader` - Reads single files and scans directory trees
//! 2. `metadata` - Splits the leading `---` front matter block from the body
//! 3. `resources` - Substitutes `{{resource:path}}` references
//! 4. `variables` - Extracts and fills `{{name}}` placeholders
//! 5. `template` - Ties the steps together into [`TemplateRecord`]s
//!
//! # Examples
//!
//! ```no_run
//! use mcp_prompts_core::LogContext;
//! use mcp_prompts_template::{load_resources, load_templates};
//! use std::path::Path;
//!
//! # async fn example() {
//! let log = LogContext::default();
//! let resources = load_resources(Path::new("resources"), &log).await;
//! let templates = load_templates(Path::new("prompts"), &resources, &log).await;
//! println!("{} templates", templates.records.len());
//! # }
//! ```

mod loader;
mod metadata;
mod resources;
mod template;
mod variables;

pub use loader::{MAX_FILE_SIZE, ScanReport, TEMPLATE_EXTENSION, load_file, scan_directory};
pub use metadata::{Metadata, MessageRole, parse_metadata};
pub use resources::{Resolved, ResourceMap, missing_resource_marker, resolve_resources};
pub use template::{TemplateRecord, TemplateSet, load_resources, load_templates};
pub use variables::{extract_variables, substitute_variables};
