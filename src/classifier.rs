//! Specifier classification.
//!
//! Sorts a raw import/require specifier into one of a closed set of shapes.
//! Classification is purely lexical: no filesystem access, no resolution.
//! Rules and the verification scanner both dispatch on the shape returned
//! here, so the "already conforming" guards live next to it as explicit
//! predicates rather than being buried in regex lookarounds.

use crate::config::Config;

/// Extensions a strict loader accepts without rewriting.
const ACCEPTED_EXTENSIONS: [&str; 4] = [".js", ".mjs", ".cjs", ".json"];

/// The shape of a specifier, from the rewriter's point of view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Shape<'a> {
    /// Begins with `./` or `../`.
    Relative,
    /// A configured package name with no subpath (optionally one trailing `/`).
    PackageRoot { name: &'a str },
    /// A configured package name followed by one or more path segments.
    PackageSubpath { name: &'a str, subpath: &'a str },
    /// Final path segment ends in `.json`. Takes precedence over the other
    /// shapes: the import-assertion rule is authoritative for data files.
    DataFile,
    /// None of the above. Never rewritten, never a finding.
    Unrecognized,
}

/// Classifies a specifier against the configured package list.
///
/// Malformed input (empty string, embedded quotes or whitespace) classifies
/// as `Unrecognized` rather than erroring; the caller simply skips it.
pub fn classify<'a>(spec: &'a str, config: &'a Config) -> Shape<'a> {
    if spec.is_empty() || spec.contains(['\'', '"']) || spec.contains(char::is_whitespace) {
        return Shape::Unrecognized;
    }

    if final_segment(spec).ends_with(".json") {
        return Shape::DataFile;
    }

    for pkg in &config.packages {
        let name = pkg.name.as_str();
        match spec.strip_prefix(name) {
            Some("") | Some("/") => return Shape::PackageRoot { name },
            Some(rest) => {
                if let Some(subpath) = rest.strip_prefix('/') {
                    return Shape::PackageSubpath { name, subpath };
                }
            }
            None => {}
        }
    }

    if spec.starts_with("./") || spec.starts_with("../") {
        return Shape::Relative;
    }

    Shape::Unrecognized
}

/// Last path segment of a specifier (the whole specifier if it has no `/`).
pub fn final_segment(spec: &str) -> &str {
    spec.rsplit('/').next().unwrap_or(spec)
}

/// True when the final segment carries an extension the strict loader accepts.
pub fn has_accepted_extension(spec: &str) -> bool {
    let seg = final_segment(spec);
    ACCEPTED_EXTENSIONS.iter().any(|ext| seg.ends_with(ext))
}

/// True when the final segment carries no extension at all.
///
/// The extension rules only fire on extensionless specifiers: a path ending
/// in an unknown suffix like `.xyz` is left untouched and surfaces as a
/// finding instead of being blindly turned into `.xyz.js`.
pub fn is_extensionless(spec: &str) -> bool {
    let seg = final_segment(spec);
    !seg.is_empty() && !seg.contains('.')
}
