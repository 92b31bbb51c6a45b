//! `adapt-static-urls` rule
//!
//! Raw-text mode of the static-asset URL rewrite for files that are not
//! parseable JavaScript modules (minified bundles, templates). Each asset
//! path under `docroot` is matched as a double-quoted literal with a
//! regular expression; with `match-substring = true` the quoted value may
//! carry an arbitrary prefix before the asset path.

use osgify_ast::static_urls::RUNTIME_ADAPTER;
use regex::Regex;
use std::path::PathBuf;
use walkdir::WalkDir;

use super::{require_str_option, RuleContext, RuleError, RuleOutcome, RuleResult};

pub fn run(ctx: &mut RuleContext<'_>) -> RuleResult {
    let docroot = require_str_option(ctx.options, "docroot")?;
    let match_substring = ctx
        .options
        .get("match-substring")
        .and_then(toml::Value::as_bool)
        .unwrap_or(false);

    let mut docroot_path = PathBuf::from(docroot);
    if docroot_path.is_relative() {
        docroot_path = ctx.project.dir().join(docroot_path);
    }

    let mut content = ctx.content.to_string();
    let mut changed = false;

    for rel_posix in asset_paths(&docroot_path) {
        let pattern = if match_substring {
            format!("\"[^\"]*{}\"", regex::escape(&rel_posix))
        } else {
            format!("\"{}\"", regex::escape(&rel_posix))
        };
        let re = Regex::new(&pattern).map_err(|e| RuleError::InvalidOption {
            option: "docroot",
            reason: format!("cannot match asset path '{}': {}", rel_posix, e),
        })?;

        let mut count = 0usize;
        let rewritten = re
            .replace_all(&content, |caps: &regex::Captures<'_>| {
                count += 1;
                format!("{}({})", RUNTIME_ADAPTER, &caps[0])
            })
            .into_owned();

        if count > 0 {
            ctx.log.info(
                "adapt-static-urls",
                format!("Adapted static URL '{}' ({} occurrence(s))", rel_posix, count),
            );
            content = rewritten;
            changed = true;
        }
    }

    if changed {
        Ok(RuleOutcome::Replace(content))
    } else {
        Ok(RuleOutcome::Unchanged)
    }
}

/// Posix-relative paths of every file under `docroot`, in deterministic
/// order.
fn asset_paths(docroot: &std::path::Path) -> Vec<String> {
    WalkDir::new(docroot)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .filter_map(|e| {
            e.path().strip_prefix(docroot).ok().map(|rel| {
                rel.components()
                    .map(|c| c.as_os_str().to_string_lossy())
                    .collect::<Vec<_>>()
                    .join("/")
            })
        })
        .collect()
}
