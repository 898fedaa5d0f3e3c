//! Candidate file collection.
//!
//! Recursively walks the scan root to collect module files matching the
//! extension filter, skipping entries whose names start with `.` or `_` by
//! default plus any user-supplied exclude globs. Walk errors (permission
//! denied, symlink cycles) are collected as warnings, not fatal failures.
//! Output is sorted by path so reports are reproducible.

use glob::Pattern;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Collects all files under `root` whose extension is in `extensions`.
///
/// Returns the sorted file list together with warnings for entries that
/// could not be visited.
pub fn collect_module_files(
    root: &Path,
    extensions: &[String],
    excludes: &[Pattern],
    default_excludes: bool,
) -> (Vec<PathBuf>, Vec<String>) {
    let mut files = Vec::new();
    let mut warnings = Vec::new();

    let walker = WalkDir::new(root)
        .follow_links(true)
        .into_iter()
        .filter_entry(|e| e.depth() == 0 || !is_excluded(e, excludes, default_excludes));

    for entry in walker {
        match entry {
            Ok(entry) => {
                if entry.file_type().is_file()
                    && entry
                        .path()
                        .extension()
                        .and_then(|ext| ext.to_str())
                        .is_some_and(|ext| extensions.iter().any(|e| e == ext))
                {
                    files.push(entry.into_path());
                }
            }
            Err(err) => {
                let location = err
                    .path()
                    .map(|p| p.display().to_string())
                    .unwrap_or_else(|| root.display().to_string());
                warnings.push(format!("Skipping {}: {}", location, err));
            }
        }
    }

    files.sort();
    (files, warnings)
}

fn is_excluded(entry: &walkdir::DirEntry, excludes: &[Pattern], default_excludes: bool) -> bool {
    let Some(name) = entry.file_name().to_str() else {
        return false;
    };
    if default_excludes && (name.starts_with('.') || name.starts_with('_')) {
        return true;
    }
    excludes.iter().any(|p| p.matches(name))
}
