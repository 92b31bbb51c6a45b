//! Rule engine
//!
//! Transformations are registered in a closed registry keyed by rule name;
//! `osgify.toml` can only reference names validated against
//! [`known_rule_names`] at descriptor-load time, so an unknown rule fails
//! before execution ever starts.
//!
//! Execution order is rule-major: a rule is applied to every matching file
//! before the next rule begins. A contiguous run of rules declared
//! `scope = "file"` short-circuits per file instead (the whole run applies
//! to one file before moving to the next). A rule failure produces exactly
//! one fatal diagnostic for that file and excludes it from the remainder
//! of the pipeline without aborting the run.

mod replace_tokens;
mod static_urls;
mod text_urls;

use once_cell::sync::Lazy;
use osgify_config::{tokens, Project, RuleSpec};
use osgify_logger::diagnostics::FileLog;
use std::collections::BTreeMap;
use thiserror::Error;
use tracing::debug;

use crate::files::FileRecord;
use crate::report::RunReport;

/// Errors a rule can raise while executing against one file. These never
/// propagate past the rule engine; they become fatal per-file diagnostics.
#[derive(Error, Debug)]
pub enum RuleError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Parse(#[from] osgify_ast::ParseError),

    #[error("Missing rule option '{0}'")]
    MissingOption(&'static str),

    #[error("Invalid rule option '{option}': {reason}")]
    InvalidOption {
        option: &'static str,
        reason: String,
    },
}

/// What a rule did with the file it was handed.
pub enum RuleOutcome {
    /// Content untouched.
    Unchanged,
    /// Content replaced; the record becomes dirty.
    Replace(String),
    /// The file is dropped from the output tree.
    Remove,
}

pub type RuleResult = Result<RuleOutcome, RuleError>;

/// Everything a rule sees: the current file content, a diagnostic sink
/// bound to the file, and its resolved (token-substituted) options.
pub struct RuleContext<'r> {
    pub project: &'r Project,
    pub rel_path: &'r str,
    pub content: &'r str,
    pub log: &'r mut FileLog,
    pub options: &'r toml::Table,
}

type RuleHandler = fn(&mut RuleContext<'_>) -> RuleResult;

static REGISTRY: Lazy<BTreeMap<&'static str, RuleHandler>> = Lazy::new(|| {
    let mut registry: BTreeMap<&'static str, RuleHandler> = BTreeMap::new();
    registry.insert("static-url-rewrite", static_urls::run);
    registry.insert("adapt-static-urls", text_urls::run);
    registry.insert("replace-tokens", replace_tokens::run);
    registry
});

/// The closed set of registered rule names, for descriptor validation.
pub fn known_rule_names() -> Vec<&'static str> {
    REGISTRY.keys().copied().collect()
}

/// A configured rule bound to its handler, with options resolved against
/// the descriptor.
pub struct RuleHandle {
    pub spec: RuleSpec,
    handler: RuleHandler,
    options: toml::Table,
}

impl RuleHandle {
    pub fn name(&self) -> &str {
        &self.spec.name
    }
}

/// Bind every configured rule specification to its registered handler.
/// Option values get their `{project.*}` tokens substituted here, once.
pub fn resolve_rules(project: &Project) -> Vec<RuleHandle> {
    project
        .rules()
        .iter()
        .filter_map(|spec| {
            // names were validated at descriptor load
            let handler = REGISTRY.get(spec.name.as_str()).copied()?;
            Some(RuleHandle {
                options: tokens::replace_tokens(project, &spec.options),
                spec: spec.clone(),
                handler,
            })
        })
        .collect()
}

/// Apply the resolved rules to the file tree, collecting diagnostics into
/// `report`. Never fails: per-file errors are captured as diagnostics.
pub fn apply_rules(
    project: &Project,
    handles: &[RuleHandle],
    files: &mut [FileRecord],
    report: &mut RunReport,
) {
    let mut idx = 0;
    while idx < handles.len() {
        if handles[idx].spec.file_scoped {
            // contiguous run of file-scoped rules: file-major within the run
            let mut end = idx;
            while end < handles.len() && handles[end].spec.file_scoped {
                end += 1;
            }

            for file in files.iter_mut() {
                for handle in &handles[idx..end] {
                    if !file.is_active() {
                        break;
                    }
                    if handle.spec.matches(file.rel_posix()) {
                        execute(project, handle, file, report);
                    }
                }
            }

            idx = end;
        } else {
            let handle = &handles[idx];
            for file in files.iter_mut() {
                if file.is_active() && handle.spec.matches(file.rel_posix()) {
                    execute(project, handle, file, report);
                }
            }
            idx += 1;
        }
    }
}

fn execute(project: &Project, handle: &RuleHandle, file: &mut FileRecord, report: &mut RunReport) {
    debug!("rule '{}' on {}", handle.name(), file.rel_posix());

    let rel_path = file.rel_posix().to_string();

    let content = match file.content() {
        Ok(content) => content.to_string(),
        Err(e) => {
            report
                .file_log_mut(&rel_path)
                .error(handle.name(), format!("Cannot read file: {}", e));
            file.mark_failed();
            return;
        }
    };

    let log = report.file_log_mut(&rel_path);
    let mut ctx = RuleContext {
        project,
        rel_path: &rel_path,
        content: &content,
        log,
        options: &handle.options,
    };

    match (handle.handler)(&mut ctx) {
        Ok(RuleOutcome::Unchanged) => {}
        Ok(RuleOutcome::Replace(new_content)) => file.set_content(new_content),
        Ok(RuleOutcome::Remove) => file.mark_removed(),
        Err(e) => {
            report
                .file_log_mut(&rel_path)
                .error(handle.name(), format!("Rule failed: {}", e));
            file.mark_failed();
        }
    }
}

pub(crate) fn require_str_option<'o>(
    options: &'o toml::Table,
    key: &'static str,
) -> Result<&'o str, RuleError> {
    options
        .get(key)
        .and_then(toml::Value::as_str)
        .ok_or(RuleError::MissingOption(key))
}

pub(crate) fn str_array_option(
    options: &toml::Table,
    key: &'static str,
) -> Result<Option<Vec<String>>, RuleError> {
    let Some(value) = options.get(key) else {
        return Ok(None);
    };

    match value {
        toml::Value::String(s) => Ok(Some(vec![s.clone()])),
        toml::Value::Array(items) => {
            let mut out = Vec::with_capacity(items.len());
            for item in items {
                let s = item.as_str().ok_or(RuleError::InvalidOption {
                    option: key,
                    reason: "expected a string or array of strings".to_string(),
                })?;
                out.push(s.to_string());
            }
            Ok(Some(out))
        }
        _ => Err(RuleError::InvalidOption {
            option: key,
            reason: "expected a string or array of strings".to_string(),
        }),
    }
}
