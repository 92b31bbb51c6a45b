//! File records under transformation
//!
//! A [`FileRecord`] tracks one source file through a pipeline run: its
//! absolute location, its posix-normalized relative path (the form all rule
//! patterns match against), lazily loaded content and the flags mutated by
//! rule execution. Records are owned by the orchestrator and visited by
//! rules strictly in sequence.

use osgify_config::FilePath;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// One source file under transformation.
#[derive(Debug)]
pub struct FileRecord {
    abs_path: PathBuf,
    rel_path: FilePath,
    /// None until a rule asks for the content; untouched files are copied
    /// from disk verbatim at write-out time.
    content: Option<String>,
    dirty: bool,
    removed: bool,
    /// Set after a fatal per-file diagnostic; excludes the file from the
    /// remainder of the run.
    failed: bool,
}

impl FileRecord {
    pub fn new(abs_path: PathBuf, rel_path: FilePath) -> Self {
        FileRecord {
            abs_path,
            rel_path,
            content: None,
            dirty: false,
            removed: false,
            failed: false,
        }
    }

    pub fn abs_path(&self) -> &Path {
        &self.abs_path
    }

    /// Posix-normalized path relative to the file tree root.
    pub fn rel_posix(&self) -> &str {
        self.rel_path.as_posix()
    }

    /// Current content, loading it from disk on first access.
    pub fn content(&mut self) -> io::Result<&str> {
        if self.content.is_none() {
            self.content = Some(fs::read_to_string(&self.abs_path)?);
        }
        // just populated above
        Ok(self.content.as_deref().unwrap_or(""))
    }

    /// Replace the in-memory content and mark the record dirty.
    pub fn set_content(&mut self, content: String) {
        self.content = Some(content);
        self.dirty = true;
    }

    pub fn mark_removed(&mut self) {
        self.removed = true;
    }

    pub fn mark_failed(&mut self) {
        self.failed = true;
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn is_removed(&self) -> bool {
        self.removed
    }

    pub fn is_failed(&self) -> bool {
        self.failed
    }

    /// Whether rules may still run against this record.
    pub fn is_active(&self) -> bool {
        !self.failed && !self.removed
    }

    /// Write the record under `out_root`, preserving its relative path.
    /// Dirty content is written from memory; untouched files are copied
    /// byte-identical from disk.
    pub fn write_to(&self, out_root: &Path) -> io::Result<()> {
        let target = out_root.join(self.rel_path.as_native());
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)?;
        }

        if self.dirty {
            if let Some(content) = &self.content {
                fs::write(&target, content)?;
                return Ok(());
            }
        }

        fs::copy(&self.abs_path, &target)?;
        Ok(())
    }
}

/// Enumerate every file under `root` into records with posix-normalized
/// relative paths. Order is deterministic (walkdir sorts by file name).
pub fn collect_records(root: &Path) -> io::Result<Vec<FileRecord>> {
    let mut records = Vec::new();

    for entry in WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
    {
        if !entry.file_type().is_file() {
            continue;
        }

        let rel = entry
            .path()
            .strip_prefix(root)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        records.push(FileRecord::new(
            entry.path().to_path_buf(),
            FilePath::from_path(rel),
        ));
    }

    Ok(records)
}
