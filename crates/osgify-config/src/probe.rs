//! Project type detection
//!
//! The pipeline supports two project flavors: plain bundler projects whose
//! sources we transform directly, and pre-built application adapters (e.g.
//! a create-react-app build) whose existing output we adapt. Anything else
//! is unsupported and terminal.

use std::fmt;

/// The classified project type. Determined once at descriptor load.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectType {
    /// A single-package bundler project with a source tree to transform.
    Bundler,
    /// A pre-built application whose build output is adapted in place.
    Adapter,
    /// Neither of the above; the run aborts with a non-zero exit.
    Unsupported,
}

impl fmt::Display for ProjectType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProjectType::Bundler => f.write_str("bundler"),
            ProjectType::Adapter => f.write_str("adapter"),
            ProjectType::Unsupported => f.write_str("unsupported"),
        }
    }
}

/// Dependencies that mark a project as a pre-built application adapter.
const ADAPTER_DEPENDENCIES: &[&str] = &["react-scripts"];

pub(crate) fn classify(
    has_adapt_section: bool,
    dependencies: &[String],
    input_dir_exists: bool,
) -> ProjectType {
    let adapter_dep = dependencies
        .iter()
        .any(|d| ADAPTER_DEPENDENCIES.contains(&d.as_str()));

    if has_adapt_section || adapter_dep {
        ProjectType::Adapter
    } else if input_dir_exists {
        ProjectType::Bundler
    } else {
        ProjectType::Unsupported
    }
}
