//! End-to-end tests driving the osgify binary.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn osgify() -> Command {
    match Command::cargo_bin("osgify") {
        Ok(cmd) => cmd,
        Err(e) => panic!("osgify binary not built: {}", e),
    }
}

fn write_project(dir: &Path, osgify_toml: &str) {
    fs::write(
        dir.join("package.json"),
        r#"{"name": "my-app", "version": "1.0.0"}"#,
    )
    .unwrap();
    fs::write(dir.join("osgify.toml"), osgify_toml).unwrap();
    fs::create_dir_all(dir.join("src")).unwrap();
}

#[test]
fn test_version_flag_prints_components_and_exits_clean() {
    let tmp = TempDir::new().unwrap();

    osgify()
        .current_dir(tmp.path())
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("\"osgify\""))
        .stdout(predicate::str::contains("\"osgify-manifest\""));

    // version never runs the pipeline, even in a non-project directory
    assert!(fs::read_dir(tmp.path()).unwrap().next().is_none());
}

#[test]
fn test_end_to_end_bundler_run() {
    let tmp = TempDir::new().unwrap();
    write_project(
        tmp.path(),
        r#"
[build]
output = "build"

[[rules]]
use = "replace-tokens"
include = ["**/*.js"]
"#,
    );
    fs::write(
        tmp.path().join("src/a.js"),
        "export const app = \"{project.name}\";",
    )
    .unwrap();
    fs::write(tmp.path().join("src/b.css"), "body { color: red }").unwrap();

    osgify()
        .arg("--project-dir")
        .arg(tmp.path())
        .assert()
        .success();

    // matched file transformed, unmatched file byte-identical
    assert_eq!(
        fs::read_to_string(tmp.path().join("build/a.js")).unwrap(),
        "export const app = \"my-app\";"
    );
    assert_eq!(
        fs::read(tmp.path().join("build/b.css")).unwrap(),
        fs::read(tmp.path().join("src/b.css")).unwrap()
    );

    let manifest: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(tmp.path().join("build/manifest.json")).unwrap())
            .unwrap();
    assert_eq!(manifest["my-app@1.0.0"], "build");
}

#[test]
fn test_missing_output_key_fails_before_any_writes() {
    let tmp = TempDir::new().unwrap();
    write_project(tmp.path(), "[build]\ninput = \"src\"\n");
    fs::write(tmp.path().join("src/a.js"), "var x = 1;").unwrap();

    osgify()
        .arg("--project-dir")
        .arg(tmp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("build.output"));

    // config failure happens before the pipeline touches the project
    let entries: Vec<String> = fs::read_dir(tmp.path())
        .unwrap()
        .filter_map(|e| e.ok())
        .map(|e| e.file_name().to_string_lossy().into_owned())
        .collect();
    assert!(!entries.contains(&"build".to_string()));
}

#[test]
fn test_unsupported_project_type_is_fatal() {
    let tmp = TempDir::new().unwrap();
    // no input dir, no adapter dependency
    fs::write(
        tmp.path().join("package.json"),
        r#"{"name": "bare", "version": "0.1.0"}"#,
    )
    .unwrap();
    fs::write(tmp.path().join("osgify.toml"), "[build]\noutput = \"build\"\n").unwrap();

    osgify()
        .arg("--project-dir")
        .arg(tmp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unsupported project type"));

    assert!(!tmp.path().join("build").exists());
}

#[test]
fn test_rule_failure_reported_but_run_succeeds() {
    let tmp = TempDir::new().unwrap();
    // static-url-rewrite without its docroot option fails per file
    write_project(
        tmp.path(),
        r#"
[build]
output = "build"

[[rules]]
use = "static-url-rewrite"
include = ["**/*.js"]
"#,
    );
    fs::write(tmp.path().join("src/broken.js"), "var x = 1;").unwrap();
    fs::write(tmp.path().join("src/safe.css"), "body {}").unwrap();

    osgify()
        .arg("--project-dir")
        .arg(tmp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("broken.js"))
        .stdout(predicate::str::contains("docroot"))
        .stderr(predicate::str::contains("excluded from the output"));

    assert!(!tmp.path().join("build/broken.js").exists());
    assert!(tmp.path().join("build/safe.css").exists());
}

#[test]
fn test_unknown_rule_rejected_at_load() {
    let tmp = TempDir::new().unwrap();
    write_project(
        tmp.path(),
        r#"
[build]
output = "build"

[[rules]]
use = "no-such-rule"
include = ["**/*.js"]
"#,
    );

    osgify()
        .arg("--project-dir")
        .arg(tmp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("no-such-rule"));
}

#[test]
fn test_report_file_written_when_configured() {
    let tmp = TempDir::new().unwrap();
    write_project(
        tmp.path(),
        r#"
[build]
output = "build"

[report]
file = "osgify-report.json"

[[rules]]
use = "replace-tokens"
include = ["**/*.js"]
"#,
    );
    fs::write(tmp.path().join("src/a.js"), "\"{project.version}\"").unwrap();

    osgify()
        .arg("--project-dir")
        .arg(tmp.path())
        .assert()
        .success();

    let report: serde_json::Value = serde_json::from_str(
        &fs::read_to_string(tmp.path().join("osgify-report.json")).unwrap(),
    )
    .unwrap();
    assert_eq!(report["rootPackage"]["name"], "my-app");
    assert!(report["files"]["a.js"].is_array());
}
