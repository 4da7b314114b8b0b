//! File loading and directory scanning.
//!
//! [`scan_directory`] walks a root directory recursively and loads every
//! `.txt` file into a map keyed by its [`LogicalPath`]. Failures are
//! contained: an unreadable file is logged and skipped, and an unusable root
//! yields an empty report instead of an error.

use mcp_prompts_core::{Error, LogContext, LogicalPath, Result};
use std::collections::btree_map::Entry;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Maximum file size to read in bytes (1MB).
pub const MAX_FILE_SIZE: u64 = 1024 * 1024;

/// Extension of files that participate in a scan (compared ASCII
/// case-insensitively).
pub const TEMPLATE_EXTENSION: &str = "txt";

/// Result of scanning one root directory.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanReport {
    /// Number of files with the template extension that were found.
    pub considered: usize,

    /// Successfully loaded files keyed by logical path.
    pub loaded: BTreeMap<LogicalPath, String>,

    /// Number of considered files that could not be loaded.
    pub skipped: usize,
}

impl ScanReport {
    /// Returns the number of loaded files.
    #[must_use]
    pub fn loaded_count(&self) -> usize {
        self.loaded.len()
    }
}

/// Reads a single file as UTF-8 text.
///
/// # Errors
///
/// Returns [`Error::LoadFailed`] if the file is missing, unreadable, or not
/// valid UTF-8, and [`Error::FileTooLarge`] if it exceeds [`MAX_FILE_SIZE`].
///
/// # Examples
///
/// ```no_run
/// use mcp_prompts_template::load_file;
/// use std::path::Path;
///
/// # async fn example() -> mcp_prompts_core::Result<()> {
/// let text = load_file(Path::new("prompts/greeting.txt")).await?;
/// # Ok(())
/// # }
/// ```
pub async fn load_file(path: &Path) -> Result<String> {
    let metadata = tokio::fs::metadata(path)
        .await
        .map_err(|source| Error::LoadFailed {
            path: path.to_path_buf(),
            source,
        })?;

    if metadata.len() > MAX_FILE_SIZE {
        return Err(Error::FileTooLarge {
            path: path.to_path_buf(),
            size: metadata.len(),
            limit: MAX_FILE_SIZE,
        });
    }

    tokio::fs::read_to_string(path)
        .await
        .map_err(|source| Error::LoadFailed {
            path: path.to_path_buf(),
            source,
        })
}

/// Scans `root` recursively and loads every template file.
///
/// The root is created if it does not exist. Subdirectories are traversed
/// but never reported, and symlinked directories are not followed. A
/// symlinked file is loaded only if its target lies inside `root`; other
/// links are counted as skipped. Entries are visited in sorted order, so
/// when two files map to the same logical path the first one in that order
/// is kept.
///
/// This never fails: if the root cannot be created or read, the error is
/// logged and an empty report is returned.
///
/// # Examples
///
/// ```no_run
/// use mcp_prompts_core::LogContext;
/// use mcp_prompts_template::scan_directory;
/// use std::path::Path;
///
/// # async fn example() {
/// let report = scan_directory(Path::new("resources"), &LogContext::default()).await;
/// println!("{} of {} loaded", report.loaded_count(), report.considered);
/// # }
/// ```
pub async fn scan_directory(root: &Path, log: &LogContext) -> ScanReport {
    let span = log.span(format!("scan {}", root.display()));

    match walk(root).await {
        Ok(report) => {
            tracing::info!(
                root = %root.display(),
                considered = report.considered,
                loaded = report.loaded_count(),
                skipped = report.skipped,
                "directory scanned"
            );
            span.complete();
            report
        }
        Err(e) => {
            tracing::error!(
                root = %root.display(),
                error = %e,
                "directory unavailable, continuing without its entries"
            );
            span.fail(&e);
            ScanReport::default()
        }
    }
}

fn unavailable(root: &Path) -> impl FnOnce(std::io::Error) -> Error + '_ {
    move |source| Error::DirectoryUnavailable {
        path: root.to_path_buf(),
        source,
    }
}

async fn walk(root: &Path) -> Result<ScanReport> {
    tokio::fs::create_dir_all(root)
        .await
        .map_err(unavailable(root))?;
    let canonical_root = tokio::fs::canonicalize(root)
        .await
        .map_err(unavailable(root))?;

    let listing_root = canonical_root.clone();
    let candidates = tokio::task::spawn_blocking(move || list_candidates(&listing_root))
        .await
        .map_err(|e| unavailable(root)(std::io::Error::other(e)))?
        .map_err(unavailable(root))?;

    let mut report = ScanReport::default();

    for path in candidates {
        report.considered += 1;

        // SECURITY: resolve symlinks and keep every read inside the root
        let Ok(canonical) = tokio::fs::canonicalize(&path).await else {
            tracing::warn!(path = %path.display(), "skipping file with unresolvable path");
            report.skipped += 1;
            continue;
        };
        if !canonical.starts_with(&canonical_root) {
            tracing::warn!(
                path = %path.display(),
                target = %canonical.display(),
                "skipping file outside root directory"
            );
            report.skipped += 1;
            continue;
        }

        let Some(logical) = path
            .strip_prefix(&canonical_root)
            .ok()
            .and_then(LogicalPath::from_relative)
        else {
            tracing::warn!(path = %path.display(), "skipping file without a logical path");
            report.skipped += 1;
            continue;
        };

        match load_file(&canonical).await {
            Ok(content) => match report.loaded.entry(logical) {
                Entry::Vacant(slot) => {
                    tracing::debug!(logical = %slot.key(), bytes = content.len(), "loaded file");
                    slot.insert(content);
                }
                Entry::Occupied(slot) => {
                    tracing::warn!(
                        logical = %slot.key(),
                        path = %path.display(),
                        "duplicate logical path, keeping first file"
                    );
                    report.skipped += 1;
                }
            },
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "failed to load file, skipping");
                report.skipped += 1;
            }
        }
    }

    Ok(report)
}

/// Lists template files below `root` in file name order.
///
/// Symlinked directories are not descended into, so every file keeps the
/// logical path of its real location. Symlinked files are listed and
/// checked against the root by the caller.
fn list_candidates(root: &Path) -> std::io::Result<Vec<PathBuf>> {
    let mut candidates = Vec::new();

    for entry in WalkDir::new(root).follow_links(false).sort_by_file_name() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) if e.depth() == 0 => return Err(e.into()),
            Err(e) => {
                tracing::warn!(error = %e, "skipping unreadable entry");
                continue;
            }
        };

        let is_file = entry.file_type().is_file()
            || (entry.path_is_symlink() && entry.path().is_file());
        if is_file && has_template_extension(entry.path()) {
            candidates.push(entry.into_path());
        }
    }

    Ok(candidates)
}

fn has_template_extension(path: &Path) -> bool {
    path.extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case(TEMPLATE_EXTENSION))
}
