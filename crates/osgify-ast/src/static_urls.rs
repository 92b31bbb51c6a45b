//! Static-asset URL rewriting
//!
//! Webpack emits assets under content-hashed names. Source code, however,
//! refers to the un-hashed path. The rewrite replaces every string literal
//! whose value is a known un-hashed asset path with a call that defers URL
//! resolution to the runtime adapter:
//!
//! ```text
//! "a/b.png"  ->  _ADAPT_RT_.adaptStaticURL("a/b.a1b2c3d4.png")
//! ```
//!
//! Only exact literal values are rewritten in this mode; there is no fuzzy
//! or substring matching here.

use globset::{GlobBuilder, GlobSet, GlobSetBuilder};
use std::collections::BTreeMap;
use std::path::Path;
use tracing::debug;
use walkdir::WalkDir;

use crate::error::ParseError;
use crate::tree::{NodeKind, SyntaxTree, Visit};
use crate::webpack::remove_webpack_hash;

/// The runtime helper the rewrite defers to.
pub const RUNTIME_ADAPTER: &str = "_ADAPT_RT_.adaptStaticURL";

/// Map from un-hashed asset path to the asset's actual (hashed) build
/// output path, both posix-relative to the asset docroot.
pub type AssetUrlMap = BTreeMap<String, String>;

/// Enumerate assets under `docroot` matching `globs` and build the URL map.
pub fn asset_url_map(docroot: &Path, globs: &[String]) -> Result<AssetUrlMap, ParseError> {
    let matcher = build_globset(globs)?;
    let mut map = AssetUrlMap::new();

    for entry in WalkDir::new(docroot).into_iter().filter_map(|e| e.ok()) {
        if !entry.file_type().is_file() {
            continue;
        }

        let Ok(rel) = entry.path().strip_prefix(docroot) else {
            continue;
        };
        let rel_posix = rel
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/");

        if !matcher.is_match(&rel_posix) {
            continue;
        }

        map.insert(remove_webpack_hash(&rel_posix), rel_posix);
    }

    debug!("asset url map: {} entries under {}", map.len(), docroot.display());
    Ok(map)
}

fn build_globset(globs: &[String]) -> Result<GlobSet, ParseError> {
    let mut builder = GlobSetBuilder::new();
    for pattern in globs {
        let glob = GlobBuilder::new(pattern)
            .literal_separator(true)
            .build()
            .map_err(|e| ParseError::BadAssetGlob(format!("{pattern}: {e}")))?;
        builder.add(glob);
    }
    builder
        .build()
        .map_err(|e| ParseError::BadAssetGlob(e.to_string()))
}

/// Rewrite string literals whose value is a key of `map` into runtime
/// adapter calls. Returns the rewritten source and the number of literals
/// replaced; literals not present in the map are left untouched.
pub fn adapt_static_urls(source: &str, map: &AssetUrlMap) -> Result<(String, usize), ParseError> {
    let tree = SyntaxTree::parse(source)?;
    let mut rewritten = 0usize;

    let out = tree.transform(&mut |node| {
        if node.kind != NodeKind::StringLiteral {
            return Visit::Keep;
        }

        let Some(value) = node.string_value.as_deref() else {
            return Visit::Keep;
        };

        let Some(target) = map.get(value) else {
            return Visit::Keep;
        };

        rewritten += 1;
        Visit::Replace(format!("{RUNTIME_ADAPTER}(\"{target}\")"))
    })?;

    Ok((out.serialize(), rewritten))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_asset_url_map_strips_hashes() {
        let tmp = TempDir::new().unwrap();
        fs::create_dir_all(tmp.path().join("media")).unwrap();
        fs::write(tmp.path().join("media/logo.a1b2c3d4.png"), b"png").unwrap();
        fs::write(tmp.path().join("media/plain.svg"), b"svg").unwrap();
        fs::write(tmp.path().join("media/notes.txt"), b"txt").unwrap();

        let map = asset_url_map(
            tmp.path(),
            &["media/**/*.png".to_string(), "media/**/*.svg".to_string()],
        )
        .unwrap();

        assert_eq!(
            map.get("media/logo.png").map(String::as_str),
            Some("media/logo.a1b2c3d4.png")
        );
        assert_eq!(
            map.get("media/plain.svg").map(String::as_str),
            Some("media/plain.svg")
        );
        assert!(!map.contains_key("media/notes.txt"));
    }

    #[test]
    fn test_adapt_rewrites_known_literal() {
        let mut map = AssetUrlMap::new();
        map.insert("a/b.png".to_string(), "a/b.a1b2c3d4.png".to_string());

        let source = r#"const logo = "a/b.png";"#;
        let (out, count) = adapt_static_urls(source, &map).unwrap();

        assert_eq!(count, 1);
        assert_eq!(
            out,
            r#"const logo = _ADAPT_RT_.adaptStaticURL("a/b.a1b2c3d4.png");"#
        );
    }

    #[test]
    fn test_unknown_literal_left_untouched() {
        let mut map = AssetUrlMap::new();
        map.insert("a/b.png".to_string(), "a/b.a1b2c3d4.png".to_string());

        let source = r#"const other = "c/d.png"; const partial = "x a/b.png y";"#;
        let (out, count) = adapt_static_urls(source, &map).unwrap();

        // no fuzzy or substring matching in AST mode
        assert_eq!(count, 0);
        assert_eq!(out, source);
    }
}
