//! Post-rewrite verification.
//!
//! Re-scans content after the rule set has run and reports every specifier
//! that still fails its shape's conformance predicate. This catches rule
//! gaps (a shape the rule set does not cover yet) instead of silently
//! passing. Findings are report entries only; nothing is auto-fixed.

use crate::classifier::{self, Shape};
use crate::config::Config;
use crate::report::Finding;
use crate::rules::{JSON_IMPORT_RE, SPECIFIER_RE};
use std::path::Path;

/// Classifies every specifier occurrence in `content` and returns findings
/// for the non-conforming ones, sorted by line.
pub fn verify_content(path: &Path, content: &str, config: &Config) -> Vec<Finding> {
    let mut findings = Vec::new();

    for caps in SPECIFIER_RE.captures_iter(content) {
        if caps["open"] != caps["close"] {
            continue;
        }
        let Some(m) = caps.name("spec") else {
            continue;
        };
        let spec = m.as_str();

        let reason = match classifier::classify(spec, config) {
            Shape::Relative | Shape::PackageSubpath { .. }
                if !classifier::has_accepted_extension(spec) =>
            {
                if classifier::is_extensionless(spec) {
                    Some("missing file extension".to_string())
                } else {
                    Some(format!(
                        "unrecognized extension on '{}'",
                        classifier::final_segment(spec)
                    ))
                }
            }
            Shape::PackageRoot { .. } => Some("bare package root, no entry path".to_string()),
            _ => None,
        };

        if let Some(reason) = reason {
            findings.push(Finding {
                file: path.to_path_buf(),
                line: line_of_offset(content, m.start()),
                specifier: spec.to_string(),
                reason,
            });
        }
    }

    // Static JSON imports still missing the type assertion. The rewrite
    // pattern only matches unasserted statements, so a match here is exactly
    // a residual data-file finding.
    for caps in JSON_IMPORT_RE.captures_iter(content) {
        if caps["open"] != caps["close"] {
            continue;
        }
        let Some(m) = caps.name("spec") else {
            continue;
        };
        findings.push(Finding {
            file: path.to_path_buf(),
            line: line_of_offset(content, m.start()),
            specifier: m.as_str().to_string(),
            reason: "JSON import missing type assertion".to_string(),
        });
    }

    findings.sort_by_key(|f| f.line);
    findings
}

/// 1-indexed line containing the given byte offset.
fn line_of_offset(content: &str, offset: usize) -> usize {
    content[..offset.min(content.len())]
        .bytes()
        .filter(|&b| b == b'\n')
        .count()
        + 1
}
