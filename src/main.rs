//! esm-conform: Rewrite compiled module imports to satisfy strict ESM
//! loader resolution.
//!
//! Walks a tree of compiled module files, rewrites import/require specifiers
//! that a strict loader would reject (missing extensions, bare package roots,
//! unasserted JSON imports), then re-verifies the tree and reports anything
//! still non-conforming.

use anyhow::{Context, Result, ensure};
use clap::Parser;
use colored::Colorize;
use dialoguer::Confirm;
use esm_conform::config::{Config, Substitution};
use esm_conform::report::{Finding, RunReport};
use esm_conform::rewriter::{self, FileOutcome};
use esm_conform::rules::RuleSet;
use esm_conform::{scanner, verifier};
use glob::Pattern;
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

mod cli;
use cli::{Args, Commands};

fn main() -> ExitCode {
    let args = Args::parse();

    let result = match args.command {
        Commands::Run {
            root,
            extensions,
            exclude,
            no_default_excludes,
            config,
            substitute,
            dry_run,
            interactive,
            json,
            verbose,
        } => cmd_run(
            &root,
            extensions,
            &exclude,
            no_default_excludes,
            config.as_deref(),
            substitute,
            dry_run,
            interactive,
            json,
            verbose,
        ),
        Commands::Check {
            root,
            extensions,
            exclude,
            no_default_excludes,
            config,
            json,
            verbose,
        } => cmd_check(
            &root,
            extensions,
            &exclude,
            no_default_excludes,
            config.as_deref(),
            json,
            verbose,
        ),
        Commands::Scan {
            root,
            extensions,
            exclude,
            no_default_excludes,
        } => cmd_scan(&root, &extensions, &exclude, no_default_excludes),
        Commands::Rules { config } => cmd_rules(config.as_deref()),
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(err) => {
            eprintln!("{} {:#}", "error:".red().bold(), err);
            ExitCode::from(2)
        }
    }
}

#[allow(clippy::too_many_arguments)]
fn cmd_run(
    root: &Path,
    extensions: Vec<String>,
    exclude: &[String],
    no_default_excludes: bool,
    config_path: Option<&Path>,
    substitute: Vec<(String, String)>,
    dry_run: bool,
    interactive: bool,
    json_output: bool,
    verbose: bool,
) -> Result<u8> {
    let config = effective_config(config_path, extensions, substitute)?;
    let (files, scan_warnings) =
        collect_files(root, &config.extensions, exclude, no_default_excludes, verbose)?;

    let rules = RuleSet::new(&config);

    let outcomes: Vec<FileOutcome> = if interactive {
        rewrite_interactive(&files, &rules, dry_run)
    } else {
        files
            .par_iter()
            .map(|file| rewriter::rewrite_file(file, &rules, dry_run))
            .collect()
    };

    // Verify the final tree. Under --dry-run nothing was persisted, so the
    // in-memory rewrite output stands in for the tree.
    let (findings, verify_warnings) = if dry_run {
        let findings = outcomes
            .par_iter()
            .filter(|o| o.warning.is_none())
            .flat_map_iter(|o| verifier::verify_content(&o.path, &o.content, &config))
            .collect();
        (findings, Vec::new())
    } else {
        verify_tree(&files, &config)
    };

    let mut warnings = scan_warnings;
    warnings.extend(verify_warnings);
    let report = RunReport::merge(&outcomes, findings, warnings);

    if json_output {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        if verbose {
            for file in &report.changed_files {
                println!(
                    "{} {}",
                    if dry_run { "would update:" } else { "updated:" }
                        .yellow()
                        .bold(),
                    file.display()
                );
            }
        }
        report.print_human(dry_run);
    }

    Ok(report.exit_code())
}

fn cmd_check(
    root: &Path,
    extensions: Vec<String>,
    exclude: &[String],
    no_default_excludes: bool,
    config_path: Option<&Path>,
    json_output: bool,
    verbose: bool,
) -> Result<u8> {
    let config = effective_config(config_path, extensions, Vec::new())?;
    let (files, scan_warnings) =
        collect_files(root, &config.extensions, exclude, no_default_excludes, verbose)?;

    let (findings, verify_warnings) = verify_tree(&files, &config);

    // No rewriting happens here; outcomes exist only to carry scan counts.
    let outcomes: Vec<FileOutcome> = files
        .iter()
        .map(|file| FileOutcome {
            path: file.clone(),
            changed: false,
            content: String::new(),
            warning: None,
        })
        .collect();

    let mut warnings = scan_warnings;
    warnings.extend(verify_warnings);
    let report = RunReport::merge(&outcomes, findings, warnings);

    if json_output {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        report.print_human(true);
    }

    Ok(report.exit_code())
}

fn cmd_scan(
    root: &Path,
    extensions: &[String],
    exclude: &[String],
    no_default_excludes: bool,
) -> Result<u8> {
    let extensions = if extensions.is_empty() {
        Config::default().extensions
    } else {
        extensions.to_vec()
    };
    let (files, warnings) = collect_files(root, &extensions, exclude, no_default_excludes, false)?;

    for warning in &warnings {
        eprintln!("{} {}", "warn:".yellow().bold(), warning);
    }

    println!("Would scan {} file(s):", files.len());
    for file in files {
        println!("  {}", file.display());
    }

    Ok(0)
}

fn cmd_rules(config_path: Option<&Path>) -> Result<u8> {
    let config = Config::load(config_path)?;

    println!("{}", "Extension rules:".bold());
    println!(
        "  {} {}",
        "./<path>".cyan(),
        "append .js when extensionless".dimmed()
    );
    for pkg in &config.packages {
        println!(
            "  {} {}",
            format!("{}/<subpath>", pkg.name).cyan(),
            "append .js when extensionless".dimmed()
        );
    }

    println!("\n{}", "Package entry points:".bold());
    for pkg in &config.packages {
        println!(
            "  {} {} {}",
            pkg.name.red(),
            "->".green(),
            format!("{}/{}", pkg.name, pkg.entry).green()
        );
    }

    println!("\n{}", "Data files:".bold());
    println!(
        "  static JSON imports gain {}",
        "with { type: 'json' }".green()
    );

    println!("\n{}", "Substitutions:".bold());
    for sub in &config.substitutions {
        println!("  {} {} {}", sub.from.red(), "->".green(), sub.to.green());
    }

    Ok(0)
}

/// Loads the config file (or defaults) and folds in CLI overrides. CLI
/// substitutions go first so they win over the built-in table.
fn effective_config(
    config_path: Option<&Path>,
    extensions: Vec<String>,
    substitute: Vec<(String, String)>,
) -> Result<Config> {
    let mut config = Config::load(config_path)?;
    if !extensions.is_empty() {
        config.extensions = extensions;
    }
    let cli_subs: Vec<Substitution> = substitute
        .into_iter()
        .map(|(from, to)| Substitution { from, to })
        .collect();
    config.substitutions.splice(0..0, cli_subs);
    Ok(config)
}

/// Validates the root and collects candidate files. A missing root is the
/// one fatal configuration error; everything below it degrades to warnings.
fn collect_files(
    root: &Path,
    extensions: &[String],
    exclude: &[String],
    no_default_excludes: bool,
    verbose: bool,
) -> Result<(Vec<PathBuf>, Vec<String>)> {
    ensure!(
        root.is_dir(),
        "Root path {} does not exist or is not a directory",
        root.display()
    );
    // A root that exists but cannot be enumerated (no read/execute
    // permission) must be fatal, not a walk warning that lets the run
    // report an empty tree as conforming.
    std::fs::read_dir(root)
        .with_context(|| format!("Root path {} is not readable", root.display()))?;

    let excludes: Vec<Pattern> = exclude
        .iter()
        .map(|p| Pattern::new(p).with_context(|| format!("Invalid exclude pattern '{}'", p)))
        .collect::<Result<_>>()?;

    let (files, warnings) =
        scanner::collect_module_files(root, extensions, &excludes, !no_default_excludes);

    if verbose {
        eprintln!(
            "{} Found {} candidate file(s) under {}",
            "info:".blue().bold(),
            files.len(),
            root.display()
        );
    }

    Ok((files, warnings))
}

/// Re-reads every file from disk and classifies its specifiers.
fn verify_tree(files: &[PathBuf], config: &Config) -> (Vec<Finding>, Vec<String>) {
    let per_file: Vec<(Vec<Finding>, Option<String>)> = files
        .par_iter()
        .map(|file| match std::fs::read_to_string(file) {
            Ok(content) => (verifier::verify_content(file, &content, config), None),
            Err(err) => (
                Vec::new(),
                Some(format!("Failed to re-read {}: {}", file.display(), err)),
            ),
        })
        .collect();

    let mut findings = Vec::new();
    let mut warnings = Vec::new();
    for (file_findings, warning) in per_file {
        findings.extend(file_findings);
        if let Some(warning) = warning {
            warnings.push(warning);
        }
    }
    (findings, warnings)
}

/// Sequential rewrite with a per-file confirmation prompt. Declined files are
/// left untouched and will surface in the verification findings.
fn rewrite_interactive(files: &[PathBuf], rules: &RuleSet, dry_run: bool) -> Vec<FileOutcome> {
    let mut outcomes = Vec::with_capacity(files.len());

    for file in files {
        let content = match std::fs::read_to_string(file) {
            Ok(c) => c,
            Err(err) => {
                outcomes.push(FileOutcome {
                    path: file.clone(),
                    changed: false,
                    content: String::new(),
                    warning: Some(format!("Failed to read {}: {}", file.display(), err)),
                });
                continue;
            }
        };

        let (new_content, changed) = rewriter::rewrite(&content, rules);
        if !changed {
            outcomes.push(FileOutcome {
                path: file.clone(),
                changed: false,
                content: new_content,
                warning: None,
            });
            continue;
        }

        println!(
            "\n{} {}",
            if dry_run { "Would update:" } else { "Update:" }
                .yellow()
                .bold(),
            file.display()
        );
        print_line_changes(&content, &new_content);

        let accepted = dry_run || confirm_apply();
        if accepted && !dry_run {
            if let Err(err) = std::fs::write(file, &new_content) {
                outcomes.push(FileOutcome {
                    path: file.clone(),
                    changed: false,
                    content,
                    warning: Some(format!("Failed to write {}: {}", file.display(), err)),
                });
                continue;
            }
        }

        outcomes.push(FileOutcome {
            path: file.clone(),
            changed: accepted,
            content: if accepted { new_content } else { content },
            warning: None,
        });
    }

    outcomes
}

fn confirm_apply() -> bool {
    Confirm::new()
        .with_prompt("Apply these changes?")
        .default(true)
        .interact()
        .unwrap_or(false)
}

/// Prints changed lines as old -> new pairs. The rule set never adds or
/// removes lines, so a positional zip is an exact diff.
fn print_line_changes(old: &str, new: &str) {
    for (idx, (old_line, new_line)) in old.lines().zip(new.lines()).enumerate() {
        if old_line != new_line {
            println!(
                "  {}: {} {} {}",
                idx + 1,
                old_line.trim().red(),
                "->".dimmed(),
                new_line.trim().green()
            );
        }
    }
}
