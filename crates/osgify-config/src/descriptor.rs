//! Project descriptor loading and validation
//!
//! `Project::load` reads `package.json` and `osgify.toml` under a project
//! root, merges user configuration over defaults (user values win, arrays
//! replace), validates everything that can be validated up front, and
//! returns an immutable descriptor for the run.

use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::ConfigError;
use crate::probe::{self, ProjectType};
use crate::rules::{RawRule, RuleSpec};

/// Name of the bundler rules file, resolved relative to the project root.
pub const RULES_FILE: &str = "osgify.toml";

const DEFAULT_INPUT_DIR: &str = "src";

/// The fields we read from `package.json`.
#[derive(Debug, Clone, Deserialize)]
pub struct PackageJson {
    pub name: String,
    pub version: String,
    #[serde(default)]
    pub dependencies: BTreeMap<String, String>,
    #[serde(default, rename = "devDependencies")]
    pub dev_dependencies: BTreeMap<String, String>,
}

#[derive(Debug, Default, Deserialize)]
struct RawConfig {
    build: Option<RawBuild>,
    #[serde(default)]
    rules: Vec<RawRule>,
    jar: Option<RawJar>,
    report: Option<RawReport>,
    adapt: Option<RawAdapt>,
}

#[derive(Debug, Default, Deserialize)]
struct RawBuild {
    input: Option<String>,
    output: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct RawJar {
    supported: Option<bool>,
    #[serde(rename = "output-filename")]
    output_filename: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct RawReport {
    file: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct RawAdapt {
    #[serde(rename = "build-dir")]
    build_dir: Option<String>,
}

/// Resolved, immutable configuration for one pipeline run.
#[derive(Debug, Clone)]
pub struct Project {
    root: PathBuf,
    pkg: PackageJson,
    input: String,
    output: String,
    rules: Vec<RuleSpec>,
    jar_supported: bool,
    jar_output_filename: Option<String>,
    report_file: Option<String>,
    adapt_build_dir: Option<String>,
    project_type: ProjectType,
}

impl Project {
    /// Load and validate the descriptor for the project at `root`.
    ///
    /// `known_rules` is the closed set of registered rule names; a `use`
    /// entry naming anything else fails here rather than at execution time.
    pub fn load(root: &Path, known_rules: &[&str]) -> Result<Self, ConfigError> {
        let pkg_json_path = root.join("package.json");
        if !pkg_json_path.is_file() {
            return Err(ConfigError::MissingFile(pkg_json_path));
        }

        let rules_path = root.join(RULES_FILE);
        if !rules_path.is_file() {
            return Err(ConfigError::MissingFile(rules_path));
        }

        let pkg: PackageJson = serde_json::from_str(&fs::read_to_string(&pkg_json_path)?)?;
        let raw: RawConfig = toml::from_str(&fs::read_to_string(&rules_path)?)?;

        let build = raw.build.unwrap_or_default();
        let output = build.output.ok_or(ConfigError::MissingKey("build.output"))?;
        if output.is_empty() {
            return Err(ConfigError::MissingKey("build.output"));
        }
        let input = build.input.unwrap_or_else(|| DEFAULT_INPUT_DIR.to_string());

        let mut rules = Vec::with_capacity(raw.rules.len());
        for entry in raw.rules {
            if !known_rules.contains(&entry.name.as_str()) {
                return Err(ConfigError::UnknownRule(
                    entry.name,
                    known_rules.join(", "),
                ));
            }
            rules.push(RuleSpec::compile(entry)?);
        }

        let jar = raw.jar.unwrap_or_default();
        let adapt = raw.adapt.unwrap_or_default();

        let dependencies: Vec<String> = pkg
            .dependencies
            .keys()
            .chain(pkg.dev_dependencies.keys())
            .cloned()
            .collect();

        let project_type = probe::classify(
            adapt.build_dir.is_some(),
            &dependencies,
            root.join(&input).is_dir(),
        );

        Ok(Project {
            root: root.to_path_buf(),
            pkg,
            input,
            output,
            rules,
            jar_supported: jar.supported.unwrap_or(false),
            jar_output_filename: jar.output_filename,
            report_file: raw.report.unwrap_or_default().file,
            adapt_build_dir: adapt.build_dir,
            project_type,
        })
    }

    /// The project root directory.
    pub fn dir(&self) -> &Path {
        &self.root
    }

    /// The root package name from `package.json`.
    pub fn name(&self) -> &str {
        &self.pkg.name
    }

    /// The root package version from `package.json`.
    pub fn version(&self) -> &str {
        &self.pkg.version
    }

    /// Runtime dependency names from `package.json`.
    pub fn dependencies(&self) -> impl Iterator<Item = &str> {
        self.pkg.dependencies.keys().map(String::as_str)
    }

    /// The source input directory (absolute).
    pub fn input_dir(&self) -> PathBuf {
        self.root.join(&self.input)
    }

    /// The build output directory (absolute).
    pub fn output_dir(&self) -> PathBuf {
        self.root.join(&self.output)
    }

    /// The configured output directory as written in `osgify.toml`.
    pub fn output_name(&self) -> &str {
        &self.output
    }

    /// The ordered rule specifications.
    pub fn rules(&self) -> &[RuleSpec] {
        &self.rules
    }

    /// Whether packaging into an archive is supported for this project.
    pub fn jar_supported(&self) -> bool {
        self.jar_supported
    }

    /// The archive file name, defaulting to `<name>-<version>.jar`.
    pub fn jar_output_filename(&self) -> String {
        self.jar_output_filename.clone().unwrap_or_else(|| {
            format!("{}-{}.jar", self.pkg.name.replace('/', "-"), self.pkg.version)
        })
    }

    /// Where to persist the diagnostic report, if configured.
    pub fn report_file(&self) -> Option<PathBuf> {
        self.report_file.as_ref().map(|f| self.root.join(f))
    }

    /// The pre-built application's build directory (adapter projects).
    pub fn adapt_build_dir(&self) -> Option<PathBuf> {
        self.adapt_build_dir.as_ref().map(|d| self.root.join(d))
    }

    /// The detected project type.
    pub fn project_type(&self) -> ProjectType {
        self.project_type
    }
}
