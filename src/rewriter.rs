//! File rewriting.
//!
//! Reads a file, runs the rule set over its content and writes the result
//! back only when something changed. The read-transform-write of one file is
//! the sole mutation boundary; a file that fails to decode or write is
//! reported as a warning on its outcome and never aborts the run.

use crate::rules::RuleSet;
use std::path::{Path, PathBuf};

/// Result of processing a single file.
#[derive(Debug, Clone)]
pub struct FileOutcome {
    pub path: PathBuf,
    /// Whether the content differs from what was on disk. Under `--dry-run`
    /// this means "would change".
    pub changed: bool,
    /// The post-rewrite content. Used for in-memory verification when the
    /// file was not persisted.
    pub content: String,
    /// Local I/O problem, if any. The file is left untouched when set.
    pub warning: Option<String>,
}

/// Applies the rule set to content, returning the result and a changed flag.
///
/// Pure: no filesystem access, no dependence on any other file. One
/// application reaches the fixed point because every rule is idempotent.
pub fn rewrite(content: &str, rules: &RuleSet) -> (String, bool) {
    rules.apply(content)
}

/// Reads, rewrites and (unless `dry_run`) persists a single file.
///
/// Unreadable or undecodable files produce an outcome with a warning and
/// `changed == false`; the run continues.
pub fn rewrite_file(path: &Path, rules: &RuleSet, dry_run: bool) -> FileOutcome {
    let content = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(err) => {
            return FileOutcome {
                path: path.to_path_buf(),
                changed: false,
                content: String::new(),
                warning: Some(format!("Failed to read {}: {}", path.display(), err)),
            };
        }
    };

    let (new_content, changed) = rewrite(&content, rules);

    if changed && !dry_run {
        if let Err(err) = std::fs::write(path, &new_content) {
            return FileOutcome {
                path: path.to_path_buf(),
                changed: false,
                content,
                warning: Some(format!("Failed to write {}: {}", path.display(), err)),
            };
        }
    }

    FileOutcome {
        path: path.to_path_buf(),
        changed,
        content: new_content,
        warning: None,
    }
}
