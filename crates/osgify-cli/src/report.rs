//! Run-level diagnostic report
//!
//! Aggregates the per-file logs produced during a run together with run
//! metadata (start time, duration, root package identity, component
//! version snapshot). The report is rendered as a textual summary and,
//! when a report file is configured, persisted as JSON. Message display is
//! sorted by severity; the underlying logs keep insertion order.

use chrono::{DateTime, Utc};
use osgify_logger::diagnostics::{FileLog, Severity};
use osgify_manifest::PkgId;
use serde_json::json;
use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::Path;
use std::time::Duration;

/// Aggregated diagnostics and metadata for one pipeline run.
#[derive(Debug)]
pub struct RunReport {
    started_at: DateTime<Utc>,
    duration: Option<Duration>,
    root_pkg: Option<PkgId>,
    versions: Vec<(String, String)>,
    files: BTreeMap<String, FileLog>,
}

impl RunReport {
    pub fn new() -> Self {
        RunReport {
            started_at: Utc::now(),
            duration: None,
            root_pkg: None,
            versions: Vec::new(),
            files: BTreeMap::new(),
        }
    }

    pub fn set_root_package(&mut self, id: PkgId) {
        self.root_pkg = Some(id);
    }

    pub fn set_versions(&mut self, versions: Vec<(String, String)>) {
        self.versions = versions;
    }

    pub fn finish(&mut self, duration: Duration) {
        self.duration = Some(duration);
    }

    /// The diagnostic sink for a file, created on first use.
    pub fn file_log_mut(&mut self, rel_posix: &str) -> &mut FileLog {
        self.files.entry(rel_posix.to_string()).or_default()
    }

    pub fn file_log(&self, rel_posix: &str) -> Option<&FileLog> {
        self.files.get(rel_posix)
    }

    /// Files that collected at least one message.
    pub fn files_with_messages(&self) -> impl Iterator<Item = (&str, &FileLog)> {
        self.files
            .iter()
            .filter(|(_, log)| !log.is_empty())
            .map(|(path, log)| (path.as_str(), log))
    }

    pub fn error_count(&self) -> usize {
        self.files
            .values()
            .flat_map(|log| log.messages())
            .filter(|m| m.severity == Severity::Error)
            .count()
    }

    pub fn warning_count(&self) -> usize {
        self.files
            .values()
            .flat_map(|log| log.messages())
            .filter(|m| m.severity == Severity::Warn)
            .count()
    }

    /// Render the human-readable summary (messages sorted by severity for
    /// display only).
    pub fn render_text(&self) -> String {
        let mut out = String::new();

        if let Some(id) = &self.root_pkg {
            out.push_str(&format!("Report for {}\n", id));
        }
        out.push_str(&format!("Executed at: {}\n", self.started_at.to_rfc3339()));
        if let Some(duration) = self.duration {
            out.push_str(&format!("Execution took: {:.2}s\n", duration.as_secs_f64()));
        }

        for (path, log) in self.files_with_messages() {
            out.push_str(&format!("\n{}:\n", path));
            for msg in log.messages_for_display() {
                out.push_str(&format!("  [{}] {}: {}\n", msg.severity, msg.source, msg.text));
                if let Some(link) = &msg.link {
                    out.push_str(&format!("      see {}\n", link));
                }
            }
        }

        out
    }

    /// The structured report persisted when `[report] file` is configured.
    pub fn to_json(&self) -> serde_json::Value {
        let files: serde_json::Map<String, serde_json::Value> = self
            .files_with_messages()
            .map(|(path, log)| {
                let messages: Vec<serde_json::Value> = log
                    .messages_for_display()
                    .iter()
                    .map(|m| {
                        json!({
                            "severity": m.severity.to_string(),
                            "source": m.source,
                            "text": m.text,
                            "link": m.link,
                        })
                    })
                    .collect();
                (path.to_string(), serde_json::Value::Array(messages))
            })
            .collect();

        let versions: serde_json::Map<String, serde_json::Value> = self
            .versions
            .iter()
            .map(|(name, version)| (name.clone(), json!(version)))
            .collect();

        json!({
            "executedAt": self.started_at.to_rfc3339(),
            "durationMs": self.duration.map(|d| d.as_millis() as u64),
            "rootPackage": self.root_pkg.as_ref().map(|id| json!({
                "name": id.name,
                "version": id.version,
            })),
            "versions": versions,
            "files": files,
        })
    }

    /// Persist the JSON report.
    pub fn save_to_path(&self, path: &Path) -> io::Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(&self.to_json())?;
        fs::write(path, content)
    }
}

impl Default for RunReport {
    fn default() -> Self {
        RunReport::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_files_without_messages_are_omitted() {
        let mut report = RunReport::new();
        report.file_log_mut("a.js").info("rule", "rewrote url");
        let _ = report.file_log_mut("b.css");

        let with_messages: Vec<&str> =
            report.files_with_messages().map(|(path, _)| path).collect();
        assert_eq!(with_messages, vec!["a.js"]);
        assert!(report.file_log("b.css").is_some());
    }

    #[test]
    fn test_counts() {
        let mut report = RunReport::new();
        report.file_log_mut("a.js").error("rule", "boom");
        report.file_log_mut("a.js").warn("rule", "hmm");
        report.file_log_mut("c.js").error("other", "boom2");

        assert_eq!(report.error_count(), 2);
        assert_eq!(report.warning_count(), 1);
    }

    #[test]
    fn test_json_shape() {
        let mut report = RunReport::new();
        report.set_root_package(PkgId::new("my-app", "1.0.0"));
        report.set_versions(vec![("osgify".to_string(), "0.1.3".to_string())]);
        report.file_log_mut("a.js").info("static-url-rewrite", "ok");
        report.finish(Duration::from_millis(1200));

        let value = report.to_json();
        assert_eq!(value["rootPackage"]["name"], "my-app");
        assert_eq!(value["durationMs"], 1200);
        assert_eq!(value["versions"]["osgify"], "0.1.3");
        assert_eq!(value["files"]["a.js"][0]["severity"], "info");
    }

    #[test]
    fn test_display_sorted_by_severity() {
        let mut report = RunReport::new();
        let log = report.file_log_mut("a.js");
        log.info("r", "info first");
        log.error("r", "error second");

        let text = report.render_text();
        let error_pos = text.find("error second").unwrap_or(usize::MAX);
        let info_pos = text.find("info first").unwrap_or(usize::MAX);
        assert!(error_pos < info_pos);
    }
}
