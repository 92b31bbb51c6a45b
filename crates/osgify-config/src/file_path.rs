//! Host-independent file path wrapper
//!
//! Rule pattern matching must behave the same on every platform, so paths
//! flowing through the pipeline carry a posix-normalized representation
//! (`/` separators) alongside conversion back to native form for I/O.

use std::fmt;
use std::path::{Path, PathBuf};

/// A path with a posix-normalized string form.
///
/// Separators are normalized on construction; `..` and `.` segments are kept
/// verbatim (callers resolve paths before wrapping them when that matters).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FilePath {
    posix: String,
}

impl FilePath {
    /// Wrap a raw path string, normalizing separators to `/`.
    pub fn new(raw: &str) -> Self {
        FilePath {
            posix: raw.replace('\\', "/"),
        }
    }

    /// Wrap a native path, normalizing separators to `/`.
    pub fn from_path(path: &Path) -> Self {
        let parts: Vec<String> = path
            .components()
            .map(|c| c.as_os_str().to_string_lossy().into_owned())
            .collect();
        FilePath {
            posix: parts.join("/"),
        }
    }

    /// The posix-normalized form, used for all pattern matching.
    pub fn as_posix(&self) -> &str {
        &self.posix
    }

    /// Convert back to a native path for filesystem access.
    pub fn as_native(&self) -> PathBuf {
        PathBuf::from(self.posix.split('/').collect::<Vec<_>>().join(std::path::MAIN_SEPARATOR_STR))
    }

    /// Append a segment, collapsing duplicate separators.
    pub fn join(&self, segment: &str) -> FilePath {
        let segment = segment.replace('\\', "/");
        if self.posix.is_empty() {
            return FilePath { posix: segment };
        }
        let base = self.posix.trim_end_matches('/');
        FilePath {
            posix: format!("{}/{}", base, segment.trim_start_matches('/')),
        }
    }

    /// The path relative to `base`, or `None` when `self` is not under it.
    pub fn relative_to(&self, base: &FilePath) -> Option<FilePath> {
        let base = base.posix.trim_end_matches('/');
        let rest = self.posix.strip_prefix(base)?;
        let rest = rest.strip_prefix('/').unwrap_or(rest);
        Some(FilePath {
            posix: rest.to_string(),
        })
    }
}

impl fmt::Display for FilePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.posix)
    }
}

impl From<&str> for FilePath {
    fn from(raw: &str) -> Self {
        FilePath::new(raw)
    }
}
