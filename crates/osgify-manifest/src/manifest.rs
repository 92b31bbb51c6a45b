//! Manifest operations - incremental construction, validation, persistence

use serde_json::{Map, Value};
use std::io::Write;
use std::path::Path;
use tracing::debug;

use crate::errors::ManifestError;
use crate::types::{Entry, Manifest, PkgId};

impl Manifest {
    pub fn new() -> Self {
        Manifest::default()
    }

    /// Register a package's output directory. A package has exactly one
    /// entry; re-adding the same identity overwrites the previous location.
    pub fn add_package(&mut self, id: PkgId, output_dir: impl Into<String>) {
        let output_dir = output_dir.into();
        debug!("manifest: {} -> {}", id, output_dir);

        if let Some(&idx) = self.index.get(&id) {
            self.entries[idx].output_dir = output_dir;
        } else {
            let idx = self.entries.len();
            self.entries.push(Entry {
                id: id.clone(),
                output_dir,
            });
            self.index.insert(id, idx);
        }
    }

    /// O(1) lookup of a package's output directory.
    #[inline]
    pub fn output_dir(&self, id: &PkgId) -> Option<&str> {
        self.index
            .get(id)
            .map(|&idx| self.entries[idx].output_dir.as_str())
    }

    pub fn contains(&self, id: &PkgId) -> bool {
        self.index.contains_key(id)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Package identities in processing order.
    pub fn ids(&self) -> impl Iterator<Item = &PkgId> {
        self.entries.iter().map(|e| &e.id)
    }

    /// Check the manifest invariant: no entry may have an empty output
    /// location. Packaging must not start while this fails.
    pub fn validate(&self) -> Result<(), ManifestError> {
        for entry in &self.entries {
            if entry.output_dir.is_empty() {
                return Err(ManifestError::MissingOutputDir(entry.id.to_string()));
            }
        }
        Ok(())
    }

    /// Serialize as the flat JSON object consumed by packaging tooling:
    /// `{"name@version": "output/dir", ...}`.
    pub fn to_json_string(&self) -> Result<String, ManifestError> {
        let mut map = Map::new();
        for entry in &self.entries {
            map.insert(entry.id.to_string(), Value::String(entry.output_dir.clone()));
        }
        Ok(serde_json::to_string_pretty(&Value::Object(map))?)
    }

    /// Validate and save to `path` with an atomic write. Nothing is written
    /// when validation fails.
    pub fn save_to_path(&self, path: &Path) -> Result<(), ManifestError> {
        self.validate()?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = self.to_json_string()?;

        // Atomic write: write to temp file then rename
        let temp_path = path.with_extension("json.tmp");
        {
            let file = std::fs::File::create(&temp_path)?;
            let mut writer = std::io::BufWriter::new(file);
            writer.write_all(content.as_bytes())?;
            writer.flush()?;
        }

        std::fs::rename(&temp_path, path)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_add_and_lookup() {
        let mut manifest = Manifest::new();
        manifest.add_package(PkgId::new("my-app", "1.0.0"), "build");

        let id = PkgId::new("my-app", "1.0.0");
        assert!(manifest.contains(&id));
        assert_eq!(manifest.output_dir(&id), Some("build"));
        assert_eq!(manifest.len(), 1);
    }

    #[test]
    fn test_duplicate_add_keeps_one_entry() {
        let mut manifest = Manifest::new();
        let id = PkgId::new("dep", "2.0.0");
        manifest.add_package(id.clone(), "build/node_modules/dep@2.0.0");
        manifest.add_package(id.clone(), "build/other");

        assert_eq!(manifest.len(), 1);
        assert_eq!(manifest.output_dir(&id), Some("build/other"));
    }

    #[test]
    fn test_validate_rejects_empty_output_dir() {
        let mut manifest = Manifest::new();
        manifest.add_package(PkgId::new("my-app", "1.0.0"), "build");
        manifest.add_package(PkgId::new("broken", "0.1.0"), "");

        let err = manifest.validate().unwrap_err();
        assert!(matches!(err, ManifestError::MissingOutputDir(id) if id == "broken@0.1.0"));
    }

    #[test]
    fn test_save_writes_flat_json_object() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("manifest.json");

        let mut manifest = Manifest::new();
        manifest.add_package(PkgId::new("my-app", "1.0.0"), "build");
        manifest.add_package(PkgId::new("dep", "2.1.0"), "build/node_modules/dep@2.1.0");
        manifest.save_to_path(&path).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let value: serde_json::Value = serde_json::from_str(&content).unwrap();
        assert_eq!(value["my-app@1.0.0"], "build");
        assert_eq!(value["dep@2.1.0"], "build/node_modules/dep@2.1.0");

        // atomic write leaves no temp file behind
        assert!(!tmp.path().join("manifest.json.tmp").exists());
    }

    #[test]
    fn test_save_refuses_invalid_manifest() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("manifest.json");

        let mut manifest = Manifest::new();
        manifest.add_package(PkgId::new("broken", "0.1.0"), "");

        assert!(manifest.save_to_path(&path).is_err());
        assert!(!path.exists());
    }
}
