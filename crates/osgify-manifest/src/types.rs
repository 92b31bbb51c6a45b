//! Manifest data types
//!
//! Entries keep insertion order (the order packages were processed in) and
//! an index keyed by package identity gives O(1) lookup.

use ahash::AHashMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A package identity: name plus version.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PkgId {
    pub name: String,
    pub version: String,
}

impl PkgId {
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        PkgId {
            name: name.into(),
            version: version.into(),
        }
    }
}

impl fmt::Display for PkgId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.name, self.version)
    }
}

/// One manifest entry: a package and its resolved output directory
/// (posix-normalized, relative to the project root).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Entry {
    pub id: PkgId,
    pub output_dir: String,
}

/// The run manifest, built incrementally as packages are processed.
#[derive(Debug, Clone, Default)]
pub struct Manifest {
    pub(crate) entries: Vec<Entry>,

    /// Runtime only - rebuilt on mutation for O(1) entry lookup
    pub(crate) index: AHashMap<PkgId, usize>,
}
