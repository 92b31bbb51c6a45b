//! Token substitution for rule options
//!
//! Option values in `osgify.toml` may reference descriptor fields with
//! `{project.*}` placeholders. Substitution happens once, right before a
//! rule is invoked, so rules only ever see resolved values.

use crate::descriptor::Project;

const TOKENS: &[(&str, fn(&Project) -> String)] = &[
    ("{project.dir}", |p| p.dir().to_string_lossy().into_owned()),
    ("{project.name}", |p| p.name().to_string()),
    ("{project.version}", |p| p.version().to_string()),
    ("{project.output}", |p| p.output_name().to_string()),
];

/// Resolve `{project.*}` placeholders in every string value of `options`,
/// recursing into arrays and nested tables.
pub fn replace_tokens(project: &Project, options: &toml::Table) -> toml::Table {
    let mut resolved = toml::Table::new();
    for (key, value) in options {
        resolved.insert(key.clone(), replace_in_value(project, value));
    }
    resolved
}

/// Resolve `{project.*}` placeholders in a plain string.
pub fn replace_tokens_in_str(project: &Project, s: &str) -> String {
    replace_in_str(project, s)
}

fn replace_in_value(project: &Project, value: &toml::Value) -> toml::Value {
    match value {
        toml::Value::String(s) => toml::Value::String(replace_in_str(project, s)),
        toml::Value::Array(items) => toml::Value::Array(
            items.iter().map(|v| replace_in_value(project, v)).collect(),
        ),
        toml::Value::Table(table) => toml::Value::Table(replace_tokens(project, table)),
        other => other.clone(),
    }
}

fn replace_in_str(project: &Project, s: &str) -> String {
    let mut out = s.to_string();
    for (token, resolve) in TOKENS {
        if out.contains(token) {
            out = out.replace(token, &resolve(project));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::RULES_FILE;
    use std::fs;
    use tempfile::TempDir;

    fn project() -> (TempDir, Project) {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join("package.json"),
            r#"{"name": "my-app", "version": "1.2.3"}"#,
        )
        .unwrap();
        fs::write(tmp.path().join(RULES_FILE), "[build]\noutput = \"dist\"\n").unwrap();
        fs::create_dir_all(tmp.path().join("src")).unwrap();
        let project = Project::load(tmp.path(), &[]).unwrap();
        (tmp, project)
    }

    #[test]
    fn test_replaces_tokens_in_strings_and_arrays() {
        let (_tmp, project) = project();

        let mut options = toml::Table::new();
        options.insert(
            "docroot".to_string(),
            toml::Value::String("{project.output}/static".to_string()),
        );
        options.insert(
            "labels".to_string(),
            toml::Value::Array(vec![toml::Value::String(
                "{project.name}@{project.version}".to_string(),
            )]),
        );
        options.insert("count".to_string(), toml::Value::Integer(2));

        let resolved = replace_tokens(&project, &options);

        assert_eq!(
            resolved.get("docroot").and_then(|v| v.as_str()),
            Some("dist/static")
        );
        assert_eq!(
            resolved
                .get("labels")
                .and_then(|v| v.as_array())
                .and_then(|a| a[0].as_str()),
            Some("my-app@1.2.3")
        );
        assert_eq!(resolved.get("count").and_then(toml::Value::as_integer), Some(2));
    }

    #[test]
    fn test_untokenized_values_pass_through() {
        let (_tmp, project) = project();

        let mut options = toml::Table::new();
        options.insert(
            "include".to_string(),
            toml::Value::String("static/**/*.png".to_string()),
        );

        let resolved = replace_tokens(&project, &options);
        assert_eq!(
            resolved.get("include").and_then(|v| v.as_str()),
            Some("static/**/*.png")
        );
    }
}
