//! Run configuration.
//!
//! Holds the knobs that drive classification and rewriting: which file
//! extensions to scan, which packages are subject to subpath/entry rules, and
//! the literal substitution table. A config can be loaded from a JSON file or
//! built from the defaults baked in below.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// A package whose subpaths need explicit extensions and whose bare root must
/// be canonicalized to a concrete entry file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PackageEntry {
    /// Package name as it appears in specifiers, e.g. `@uniswap/smart-order-router`.
    pub name: String,
    /// Entry file relative to the package root, e.g. `build/main/index.js`.
    pub entry: String,
}

/// An exact-match specifier replacement.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Substitution {
    pub from: String,
    pub to: String,
}

/// Full configuration for a normalization run.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// File suffixes (without the dot) considered candidate module files.
    pub extensions: Vec<String>,
    /// Packages eligible for the subpath-extension and root-canonicalization rules.
    pub packages: Vec<PackageEntry>,
    /// Literal specifier replacements, evaluated last. First match wins.
    pub substitutions: Vec<Substitution>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            extensions: vec!["js".to_string()],
            packages: vec![PackageEntry {
                name: "@uniswap/smart-order-router".to_string(),
                entry: "build/main/index.js".to_string(),
            }],
            substitutions: vec![
                substitution("uuid/index", "uuid"),
                substitution("aws-sdk/clients/s3", "aws-sdk/clients/s3.js"),
                substitution("aws-sdk/clients/dynamodb", "aws-sdk/clients/dynamodb.js"),
            ],
        }
    }
}

fn substitution(from: &str, to: &str) -> Substitution {
    Substitution {
        from: from.to_string(),
        to: to.to_string(),
    }
}

impl Config {
    /// Loads configuration from a JSON file, or returns the defaults when no
    /// path is given. Missing fields fall back to their defaults.
    pub fn load(path: Option<&Path>) -> Result<Config> {
        match path {
            Some(p) => {
                let text = std::fs::read_to_string(p)
                    .with_context(|| format!("Failed to read config {}", p.display()))?;
                serde_json::from_str(&text)
                    .with_context(|| format!("Failed to parse config {}", p.display()))
            }
            None => Ok(Config::default()),
        }
    }

    /// Looks up the entry file for a configured package name.
    pub fn entry_for(&self, name: &str) -> Option<&str> {
        self.packages
            .iter()
            .find(|p| p.name == name)
            .map(|p| p.entry.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn default_carries_known_substitutions() {
        let config = Config::default();
        assert_eq!(config.extensions, vec!["js"]);
        assert_eq!(config.packages.len(), 1);
        assert_eq!(config.packages[0].name, "@uniswap/smart-order-router");
        assert!(
            config
                .substitutions
                .iter()
                .any(|s| s.from == "uuid/index" && s.to == "uuid")
        );
    }

    #[test]
    fn entry_for_known_package() {
        let config = Config::default();
        assert_eq!(
            config.entry_for("@uniswap/smart-order-router"),
            Some("build/main/index.js")
        );
        assert_eq!(config.entry_for("lodash"), None);
    }

    #[test]
    fn load_without_path_returns_defaults() {
        let config = Config::load(None).unwrap();
        assert_eq!(config.extensions, vec!["js"]);
    }

    #[test]
    fn load_from_json_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{
                "extensions": ["js", "mjs"],
                "packages": [{{ "name": "@acme/router", "entry": "dist/index.js" }}],
                "substitutions": [{{ "from": "old/mod", "to": "new/mod.js" }}]
            }}"#
        )
        .unwrap();
        let config = Config::load(Some(file.path())).unwrap();
        assert_eq!(config.extensions, vec!["js", "mjs"]);
        assert_eq!(config.entry_for("@acme/router"), Some("dist/index.js"));
        assert_eq!(config.substitutions[0].to, "new/mod.js");
    }

    #[test]
    fn load_with_missing_fields_uses_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "extensions": ["cjs"] }}"#).unwrap();
        let config = Config::load(Some(file.path())).unwrap();
        assert_eq!(config.extensions, vec!["cjs"]);
        assert_eq!(config.packages.len(), 1);
    }

    #[test]
    fn load_rejects_invalid_json() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();
        assert!(Config::load(Some(file.path())).is_err());
    }
}
