//! Run reporting.
//!
//! Aggregates per-file outcomes, residual findings and warnings into a single
//! `RunReport`, the sole output artifact of a run. The human-readable summary
//! caps the findings preview for console use; `--json` emits the full report.

use crate::rewriter::FileOutcome;
use colored::Colorize;
use serde::Serialize;
use std::path::PathBuf;

/// How many findings the console summary shows before deferring to `--json`.
const FINDINGS_PREVIEW_CAP: usize = 20;

/// A specifier that still fails conformance after rewriting.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Finding {
    pub file: PathBuf,
    /// Line number, 1-indexed.
    pub line: usize,
    pub specifier: String,
    pub reason: String,
}

/// Aggregate result of a run.
#[derive(Debug, Default, Serialize)]
pub struct RunReport {
    pub files_scanned: usize,
    pub files_changed: usize,
    pub changed_files: Vec<PathBuf>,
    pub findings: Vec<Finding>,
    pub warnings: Vec<String>,
}

impl RunReport {
    /// Merges worker outcomes and verification findings into one report.
    ///
    /// Workers complete in arbitrary order under concurrency; everything is
    /// sorted here so two runs over the same tree produce equal reports.
    pub fn merge(
        outcomes: &[FileOutcome],
        mut findings: Vec<Finding>,
        mut warnings: Vec<String>,
    ) -> RunReport {
        let mut changed_files: Vec<PathBuf> = outcomes
            .iter()
            .filter(|o| o.changed)
            .map(|o| o.path.clone())
            .collect();
        changed_files.sort();

        warnings.extend(outcomes.iter().filter_map(|o| o.warning.clone()));
        warnings.sort();

        findings.sort_by(|a, b| (&a.file, a.line).cmp(&(&b.file, b.line)));

        RunReport {
            files_scanned: outcomes.len(),
            files_changed: changed_files.len(),
            changed_files,
            findings,
            warnings,
        }
    }

    /// Exit status for the command surface: 0 when the tree conforms,
    /// 1 when residual findings remain.
    pub fn exit_code(&self) -> u8 {
        if self.findings.is_empty() { 0 } else { 1 }
    }

    /// Prints the human-readable summary to stdout/stderr.
    pub fn print_human(&self, dry_run: bool) {
        for warning in &self.warnings {
            eprintln!("{} {}", "warn:".yellow().bold(), warning);
        }

        println!(
            "{} {} file(s) scanned, {} {}",
            "summary:".bold(),
            self.files_scanned,
            self.files_changed,
            if dry_run { "would change" } else { "changed" }
        );

        if self.findings.is_empty() {
            println!("{} No residual findings, tree is fully conforming", "ok:".green().bold());
            return;
        }

        println!(
            "\n{} {} residual finding(s):\n",
            "Found".red().bold(),
            self.findings.len()
        );

        for finding in self.findings.iter().take(FINDINGS_PREVIEW_CAP) {
            let loc = format!("{}:{}", finding.file.display(), finding.line);
            println!(
                "  {} {} {}",
                loc.dimmed(),
                finding.specifier.red(),
                format!("({})", finding.reason).dimmed()
            );
        }

        if self.findings.len() > FINDINGS_PREVIEW_CAP {
            println!(
                "\n{} {} more not shown, use --json for the full list",
                "hint:".cyan().bold(),
                self.findings.len() - FINDINGS_PREVIEW_CAP
            );
        }
    }
}
