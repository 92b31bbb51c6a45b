//! `static-url-rewrite` rule
//!
//! AST mode of the static-asset URL rewrite: string literals whose exact
//! value is a known un-hashed asset path become runtime adapter calls.
//! Options: `docroot` (required, resolved against the project directory)
//! and `include` (asset globs, default `**/*`).

use osgify_ast::static_urls::{adapt_static_urls, asset_url_map};
use std::path::PathBuf;

use super::{require_str_option, str_array_option, RuleContext, RuleOutcome, RuleResult};

pub fn run(ctx: &mut RuleContext<'_>) -> RuleResult {
    let docroot = require_str_option(ctx.options, "docroot")?;
    let include = str_array_option(ctx.options, "include")?
        .unwrap_or_else(|| vec!["**/*".to_string()]);

    let mut docroot_path = PathBuf::from(docroot);
    if docroot_path.is_relative() {
        docroot_path = ctx.project.dir().join(docroot_path);
    }

    let map = asset_url_map(&docroot_path, &include)?;
    if map.is_empty() {
        return Ok(RuleOutcome::Unchanged);
    }

    let (out, count) = adapt_static_urls(ctx.content, &map)?;
    if count == 0 {
        return Ok(RuleOutcome::Unchanged);
    }

    ctx.log.info(
        "static-url-rewrite",
        format!("Adapted {} static URL(s)", count),
    );
    Ok(RuleOutcome::Replace(out))
}

#[cfg(test)]
mod tests {
    use super::*;
    use osgify_config::descriptor::RULES_FILE;
    use osgify_config::Project;
    use osgify_logger::diagnostics::FileLog;
    use std::fs;
    use tempfile::TempDir;

    fn project(tmp: &TempDir) -> Project {
        fs::write(
            tmp.path().join("package.json"),
            r#"{"name": "my-app", "version": "1.0.0"}"#,
        )
        .unwrap();
        fs::write(tmp.path().join(RULES_FILE), "[build]\noutput = \"build\"\n").unwrap();
        fs::create_dir_all(tmp.path().join("src")).unwrap();
        Project::load(tmp.path(), &[]).unwrap()
    }

    #[test]
    fn test_rewrites_literal_matching_asset_map() {
        let tmp = TempDir::new().unwrap();
        let project = project(&tmp);
        fs::create_dir_all(tmp.path().join("build/media")).unwrap();
        fs::write(tmp.path().join("build/media/logo.a1b2c3d4.png"), b"png").unwrap();

        let mut options = toml::Table::new();
        options.insert("docroot".to_string(), toml::Value::String("build".into()));

        let mut log = FileLog::default();
        let mut ctx = RuleContext {
            project: &project,
            rel_path: "src/index.js",
            content: r#"const url = "media/logo.png";"#,
            log: &mut log,
            options: &options,
        };

        match run(&mut ctx).unwrap() {
            RuleOutcome::Replace(out) => {
                assert!(out.contains(r#"_ADAPT_RT_.adaptStaticURL("media/logo.a1b2c3d4.png")"#));
            }
            _ => panic!("expected a replacement"),
        }
        assert!(!log.is_empty());
    }

    #[test]
    fn test_missing_docroot_fails() {
        let tmp = TempDir::new().unwrap();
        let project = project(&tmp);

        let options = toml::Table::new();
        let mut log = FileLog::default();
        let mut ctx = RuleContext {
            project: &project,
            rel_path: "src/index.js",
            content: "var x = 1;",
            log: &mut log,
            options: &options,
        };

        assert!(run(&mut ctx).is_err());
    }
}
