//! The ordered rewrite rule set.
//!
//! Five rules, evaluated in a fixed order within a single pass over a file:
//!
//! 1. Relative extension: `./foo` -> `./foo.js` (extensionless only).
//! 2. Package-subpath extension: `@pkg/build/main/utils` -> `...utils.js`.
//! 3. Data-file import: static `import X from './x.json';` gains
//!    `with { type: 'json' }`.
//! 4. Package-root canonicalization: `@pkg` (or `@pkg/`) -> `@pkg/<entry>`.
//! 5. Named substitutions: exact-match table, e.g. `uuid/index` -> `uuid`.
//!
//! Each rule carries an explicit already-conforming guard, so applying the
//! set to conforming text is a no-op and the whole set is idempotent.

use crate::classifier::{self, Shape};
use crate::config::Config;
use regex::{Captures, Regex};
use std::sync::LazyLock;

/// Matches a quoted specifier in import position: `from '...'`, `import '...'`,
/// `import('...')` or `require('...')`. Quote characters are captured so a
/// mismatched pair can be rejected in the replacement closure (the regex
/// crate has no backreferences). The `spec` class excludes whitespace and `;`
/// so that a string literal ending in a keyword (`const s = 'from';`) cannot
/// pair with a later import's opening quote and swallow the real specifier.
pub(crate) static SPECIFIER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"(?P<kw>\bfrom\s*|\bimport\s*\(\s*|\brequire\s*\(\s*|\bimport\s+)(?P<open>['"])(?P<spec>[^'"\s;]+)(?P<close>['"])"#,
    )
    .unwrap()
});

/// Matches a full static JSON import statement that does not yet carry a type
/// assertion. The trailing `;` directly after the closing quote is what makes
/// this idempotent: once rewritten, ` with { type: 'json' };` follows the
/// quote instead and the pattern no longer matches.
pub(crate) static JSON_IMPORT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"\bimport\s+(?P<binding>[^'"\r\n;]+?)\s+from\s+(?P<open>['"])(?P<spec>[^'"\r\n]+\.json)(?P<close>['"])\s*;"#,
    )
    .unwrap()
});

/// The configured rule set. Built once per run and shared across workers.
#[derive(Debug, Clone)]
pub struct RuleSet {
    config: Config,
}

impl RuleSet {
    pub fn new(config: &Config) -> Self {
        RuleSet {
            config: config.clone(),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Applies the full rule set once across all specifier occurrences.
    ///
    /// Returns the rewritten content and whether anything changed. Because
    /// every rule is individually idempotent, one application reaches the
    /// fixed point.
    pub fn apply(&self, content: &str) -> (String, bool) {
        let pass = SPECIFIER_RE.replace_all(content, |caps: &Captures| {
            if caps["open"] != caps["close"] {
                return caps[0].to_string();
            }
            match self.rewrite_specifier(&caps["spec"]) {
                Some(new_spec) => {
                    format!("{}{}{}{}", &caps["kw"], &caps["open"], new_spec, &caps["close"])
                }
                None => caps[0].to_string(),
            }
        });

        let result = JSON_IMPORT_RE.replace_all(&pass, |caps: &Captures| {
            if caps["open"] != caps["close"] {
                return caps[0].to_string();
            }
            format!(
                "import {} from {}{}{} with {{ type: 'json' }};",
                &caps["binding"], &caps["open"], &caps["spec"], &caps["close"]
            )
        });

        let changed = result != content;
        (result.into_owned(), changed)
    }

    /// Runs the specifier-level rules (1, 2, 4, 5) on a single specifier.
    ///
    /// Returns `None` when no rule fires. Data files are deliberately left
    /// alone here; the statement-level assertion rule owns them.
    fn rewrite_specifier(&self, spec: &str) -> Option<String> {
        let rewritten = match classifier::classify(spec, &self.config) {
            Shape::Relative if classifier::is_extensionless(spec) => Some(format!("{}.js", spec)),
            Shape::PackageSubpath { subpath, .. }
                if classifier::is_extensionless(subpath) =>
            {
                Some(format!("{}.js", spec))
            }
            Shape::PackageRoot { name } => self.config.entry_for(name).map(|entry| {
                // An extensionless entry in the config would otherwise leave
                // a specifier the subpath rule fixes only on a second pass.
                let canonical = format!("{}/{}", name, entry);
                if classifier::is_extensionless(&canonical) {
                    format!("{}.js", canonical)
                } else {
                    canonical
                }
            }),
            _ => None,
        };

        // Substitutions run last and match the literal specifier text.
        let current = rewritten.as_deref().unwrap_or(spec);
        if let Some(sub) = self.config.substitutions.iter().find(|s| s.from == current) {
            return Some(sub.to.clone());
        }

        rewritten
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rules() -> RuleSet {
        RuleSet::new(&Config::default())
    }

    fn apply(content: &str) -> (String, bool) {
        rules().apply(content)
    }

    #[test]
    fn appends_extension_to_relative_import() {
        let (out, changed) = apply("import { x } from './foo';");
        assert_eq!(out, "import { x } from './foo.js';");
        assert!(changed);
    }

    #[test]
    fn leaves_conforming_relative_import_alone() {
        let (out, changed) = apply("import { x } from './foo.js';");
        assert_eq!(out, "import { x } from './foo.js';");
        assert!(!changed);
    }

    #[test]
    fn extension_rule_skips_unrecognized_suffix() {
        // Not extensionless, not accepted: left for the verifier to flag.
        let (out, changed) = apply("import { x } from './bar.xyz';");
        assert_eq!(out, "import { x } from './bar.xyz';");
        assert!(!changed);
    }

    #[test]
    fn rewrites_parent_relative_paths() {
        let (out, _) = apply("export { y } from '../lib/util';");
        assert_eq!(out, "export { y } from '../lib/util.js';");
    }

    #[test]
    fn appends_extension_to_package_subpath() {
        let (out, _) =
            apply("import { pool } from '@uniswap/smart-order-router/build/main/utils';");
        assert_eq!(
            out,
            "import { pool } from '@uniswap/smart-order-router/build/main/utils.js';"
        );
    }

    #[test]
    fn canonicalizes_bare_package_root() {
        let (out, _) = apply("import { AlphaRouter } from '@uniswap/smart-order-router';");
        assert_eq!(
            out,
            "import { AlphaRouter } from '@uniswap/smart-order-router/build/main/index.js';"
        );
    }

    #[test]
    fn trailing_slash_root_matches_bare_root() {
        let (bare, _) = apply("import x from '@uniswap/smart-order-router';");
        let (slash, _) = apply("import x from '@uniswap/smart-order-router/';");
        assert_eq!(bare, slash);
    }

    #[test]
    fn adds_json_type_assertion() {
        let (out, changed) = apply("import config from './config.json';");
        assert_eq!(
            out,
            "import config from './config.json' with { type: 'json' };"
        );
        assert!(changed);
    }

    #[test]
    fn json_assertion_not_added_twice() {
        let input = "import config from './config.json' with { type: 'json' };";
        let (out, changed) = apply(input);
        assert_eq!(out, input);
        assert!(!changed);
    }

    #[test]
    fn json_assertion_wins_over_subpath_extension() {
        // Data-file detection is authoritative for package subpaths too.
        let (out, _) =
            apply("import tokens from '@uniswap/smart-order-router/data/tokens.json';");
        assert_eq!(
            out,
            "import tokens from '@uniswap/smart-order-router/data/tokens.json' with { type: 'json' };"
        );
    }

    #[test]
    fn applies_literal_substitutions() {
        let (out, _) = apply("import { v4 } from 'uuid/index';");
        assert_eq!(out, "import { v4 } from 'uuid';");

        let (out, _) = apply("import S3 from 'aws-sdk/clients/s3';");
        assert_eq!(out, "import S3 from 'aws-sdk/clients/s3.js';");
    }

    #[test]
    fn unknown_bare_specifiers_untouched() {
        let input = "import _ from 'lodash';";
        let (out, changed) = apply(input);
        assert_eq!(out, input);
        assert!(!changed);
    }

    #[test]
    fn handles_double_quotes() {
        let (out, _) = apply(r#"import { x } from "./foo";"#);
        assert_eq!(out, r#"import { x } from "./foo.js";"#);
    }

    #[test]
    fn rewrites_require_and_dynamic_import() {
        let (out, _) = apply("const m = require('./mod');");
        assert_eq!(out, "const m = require('./mod.js');");

        let (out, _) = apply("const p = import('../lazy/page');");
        assert_eq!(out, "const p = import('../lazy/page.js');");
    }

    #[test]
    fn rewrites_side_effect_import() {
        let (out, _) = apply("import './polyfill';");
        assert_eq!(out, "import './polyfill.js';");
    }

    #[test]
    fn rewrites_every_occurrence_in_content() {
        let input = "import a from './a';\nimport b from './b';\nimport c from './c.js';\n";
        let (out, _) = apply(input);
        assert_eq!(
            out,
            "import a from './a.js';\nimport b from './b.js';\nimport c from './c.js';\n"
        );
    }

    #[test]
    fn whole_rule_set_is_idempotent() {
        let input = concat!(
            "import a from './a';\n",
            "import cfg from './config.json';\n",
            "import { r } from '@uniswap/smart-order-router';\n",
            "import { u } from '@uniswap/smart-order-router/build/main/utils';\n",
            "import { v4 } from 'uuid/index';\n",
            "const m = require('../deep/mod');\n",
        );
        let (once, changed) = apply(input);
        assert!(changed);
        let (twice, changed_again) = apply(&once);
        assert_eq!(once, twice);
        assert!(!changed_again);
    }

    #[test]
    fn words_containing_keywords_are_not_matched() {
        // "platform" ends in "form"/"m" but has no word boundary before a
        // keyword, and the string literal is not in import position.
        let (out, changed) = apply("const label = 'platform';");
        assert_eq!(out, "const label = 'platform';");
        assert!(!changed);
    }

    #[test]
    fn literal_ending_in_keyword_does_not_mask_real_import() {
        // The literal's closing quote must not pair with the import's
        // opening quote and hide the genuine specifier.
        let (out, changed) = apply("const s = 'from'; import x from './y';");
        assert_eq!(out, "const s = 'from'; import x from './y.js';");
        assert!(changed);
    }

    #[test]
    fn extensionless_config_entry_converges_in_one_pass() {
        let config = Config {
            packages: vec![crate::config::PackageEntry {
                name: "@acme/router".to_string(),
                entry: "dist/index".to_string(),
            }],
            substitutions: vec![],
            ..Config::default()
        };
        let rule_set = RuleSet::new(&config);

        let (once, changed) = rule_set.apply("import r from '@acme/router';");
        assert_eq!(once, "import r from '@acme/router/dist/index.js';");
        assert!(changed);

        let (twice, changed_again) = rule_set.apply(&once);
        assert_eq!(once, twice);
        assert!(!changed_again);
    }

    #[test]
    fn mismatched_quotes_are_skipped() {
        let input = r#"import x from './broken";"#;
        let (out, changed) = apply(input);
        assert_eq!(out, input);
        assert!(!changed);
    }
}
