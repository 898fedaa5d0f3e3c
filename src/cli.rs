//! Command-line interface definitions.
//!
//! Defines the argument parser and subcommands using clap's derive API.
//! Each subcommand corresponds to a distinct operation: rewriting a tree,
//! checking it without mutation, listing scan targets, or printing the
//! active rule table.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Rewrite compiled module imports to satisfy strict ESM loader resolution.
#[derive(Debug, Parser)]
#[command(author, version, about)]
pub struct Args {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Rewrite non-conforming specifiers in place, then verify the tree.
    Run {
        /// Root directory to scan.
        #[arg(short, long, default_value = ".")]
        root: PathBuf,

        /// File suffixes (without dot) to consider. Repeatable; defaults to
        /// the config's list (js).
        #[arg(short, long)]
        extensions: Vec<String>,

        /// Glob patterns for directories/files to exclude (e.g., "node_modules", "*.min.js").
        /// By default, entries starting with `.` or `_` are excluded.
        #[arg(short = 'x', long)]
        exclude: Vec<String>,

        /// Disable default exclusion of `.` and `_` prefixed entries.
        #[arg(long)]
        no_default_excludes: bool,

        /// JSON config file with packages and substitutions.
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Extra exact-match substitutions in `old=new` format. Evaluated first.
        #[arg(short, long, value_parser = parse_substitution)]
        substitute: Vec<(String, String)>,

        /// Rewrite in memory and report, without writing any file.
        #[arg(long)]
        dry_run: bool,

        /// Interactively confirm each file's changes before writing.
        #[arg(short, long)]
        interactive: bool,

        /// Emit the full report as JSON instead of human-readable output.
        #[arg(long)]
        json: bool,

        /// Print additional diagnostics to stderr.
        #[arg(short, long)]
        verbose: bool,
    },

    /// Verify conformance without modifying any file.
    Check {
        /// Root directory to scan.
        #[arg(short, long, default_value = ".")]
        root: PathBuf,

        /// File suffixes (without dot) to consider. Repeatable; defaults to
        /// the config's list (js).
        #[arg(short, long)]
        extensions: Vec<String>,

        /// Glob patterns for directories/files to exclude.
        #[arg(short = 'x', long)]
        exclude: Vec<String>,

        /// Disable default exclusion of `.` and `_` prefixed entries.
        #[arg(long)]
        no_default_excludes: bool,

        /// JSON config file with packages and substitutions.
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Emit the full report as JSON instead of human-readable output.
        #[arg(long)]
        json: bool,

        /// Print additional diagnostics to stderr.
        #[arg(short, long)]
        verbose: bool,
    },

    /// List files that would be scanned without processing them.
    Scan {
        /// Root directory to scan.
        #[arg(short, long, default_value = ".")]
        root: PathBuf,

        /// File suffixes (without dot) to consider. Repeatable; defaults to
        /// the config's list (js).
        #[arg(short, long)]
        extensions: Vec<String>,

        /// Glob patterns for directories/files to exclude.
        #[arg(short = 'x', long)]
        exclude: Vec<String>,

        /// Disable default exclusion of `.` and `_` prefixed entries.
        #[arg(long)]
        no_default_excludes: bool,
    },

    /// Print the active rule table.
    Rules {
        /// JSON config file with packages and substitutions.
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

pub fn parse_substitution(s: &str) -> Result<(String, String), String> {
    let parts: Vec<&str> = s.splitn(2, '=').collect();
    if parts.len() != 2 || parts[0].is_empty() {
        return Err(format!(
            "Invalid substitution format '{}', expected 'old=new'",
            s
        ));
    }
    Ok((parts[0].to_string(), parts[1].to_string()))
}
