//! esm-conform library for normalizing compiled module imports.
//!
//! This library provides programmatic access to the import normalization
//! functionality. The core workflow involves three phases:
//!
//! 1. **Scanning**: Collect candidate module files under a root directory
//! 2. **Rewriting**: Apply the ordered rule set to each file's specifiers
//! 3. **Verification**: Re-classify every specifier and report residual
//!    non-conformance as findings
//!
//! # Example
//!
//! ```no_run
//! use esm_conform::{Config, RuleSet, rewriter, scanner, verifier};
//! use std::path::Path;
//!
//! let config = Config::default();
//! let rules = RuleSet::new(&config);
//!
//! // Collect compiled module files
//! let (files, _warnings) =
//!     scanner::collect_module_files(Path::new("dist"), &config.extensions, &[], true);
//!
//! // Rewrite each file in place, then re-verify it
//! for file in &files {
//!     let outcome = rewriter::rewrite_file(file, &rules, false);
//!     if outcome.changed {
//!         println!("fixed {}", outcome.path.display());
//!     }
//!     let findings = verifier::verify_content(file, &outcome.content, &config);
//!     for finding in findings {
//!         println!("{}:{}: {}", finding.file.display(), finding.line, finding.specifier);
//!     }
//! }
//! ```

pub mod classifier;
pub mod config;
pub mod report;
pub mod rewriter;
pub mod rules;
pub mod scanner;
pub mod verifier;

// Re-export commonly used types at crate root
pub use classifier::{Shape, classify};
pub use config::{Config, PackageEntry, Substitution};
pub use report::{Finding, RunReport};
pub use rewriter::{FileOutcome, rewrite, rewrite_file};
pub use rules::RuleSet;
