//! Configured rule specifications
//!
//! Rules come from the ordered `[[rules]]` array of `osgify.toml`. Each one
//! names a transformation, carries the glob patterns selecting the files it
//! applies to, and a free-form options table handed to the rule at execution
//! time. Globs are compiled here, at descriptor-load time, so bad patterns
//! fail before any file is touched.

use globset::{GlobBuilder, GlobSet, GlobSetBuilder};
use serde::Deserialize;

use crate::error::ConfigError;

/// A `[[rules]]` entry as written in `osgify.toml`.
#[derive(Debug, Clone, Deserialize)]
pub struct RawRule {
    /// Name of the transformation to run.
    #[serde(rename = "use")]
    pub name: String,

    /// Glob patterns matched against posix-normalized relative paths.
    pub include: Vec<String>,

    /// `"file"` to short-circuit this rule per file instead of running it
    /// across all files before the next rule.
    #[serde(default)]
    pub scope: Option<String>,

    /// Free-form options handed to the rule (after token substitution).
    #[serde(default)]
    pub options: toml::Table,
}

/// A resolved, validated rule specification. Immutable once built.
#[derive(Debug, Clone)]
pub struct RuleSpec {
    pub name: String,
    pub include: Vec<String>,
    pub file_scoped: bool,
    pub options: toml::Table,
    matcher: GlobSet,
}

impl RuleSpec {
    /// Compile a raw rule entry, validating its globs.
    pub fn compile(raw: RawRule) -> Result<Self, ConfigError> {
        let mut builder = GlobSetBuilder::new();

        for pattern in &raw.include {
            validate_glob(pattern)?;

            // `*` must not cross path separators; `**` stays recursive
            let glob = GlobBuilder::new(pattern)
                .literal_separator(true)
                .build()
                .map_err(|e| ConfigError::BadGlob {
                    pattern: pattern.clone(),
                    reason: e.to_string(),
                })?;
            builder.add(glob);
        }

        let matcher = builder.build().map_err(|e| ConfigError::BadGlob {
            pattern: raw.include.join(", "),
            reason: e.to_string(),
        })?;

        let file_scoped = raw.scope.as_deref() == Some("file");

        Ok(RuleSpec {
            name: raw.name,
            include: raw.include,
            file_scoped,
            options: raw.options,
            matcher,
        })
    }

    /// Whether this rule applies to the given posix-normalized relative path.
    /// Matching is case-sensitive.
    pub fn matches(&self, rel_posix: &str) -> bool {
        self.matcher.is_match(rel_posix)
    }
}

/// A rule glob must select files, so its final segment needs a resolvable
/// file extension (`*.js`, `**/*.css`, `app.min.js`). Bare wildcard final
/// segments (`*`, `**`) select files of any name and are exempt.
fn validate_glob(pattern: &str) -> Result<(), ConfigError> {
    let last = pattern.rsplit('/').next().unwrap_or(pattern);

    if last == "*" || last == "**" {
        return Ok(());
    }

    let has_extension = match last.rsplit_once('.') {
        Some((_, ext)) => !ext.is_empty(),
        None => false,
    };

    if !has_extension {
        return Err(ConfigError::BadGlob {
            pattern: pattern.to_string(),
            reason: "pattern has no resolvable file extension".to_string(),
        });
    }

    Ok(())
}
