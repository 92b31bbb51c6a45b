//! Project descriptor and configuration loading for the osgify bundler
//!
//! This crate resolves everything a pipeline run needs to know up front:
//! the package manifest (`package.json`), the bundler rules file
//! (`osgify.toml`), the detected project type and the packaging flags.
//! The resulting [`Project`] is immutable after load and is passed
//! explicitly to every component; there is no process-wide singleton.

pub mod descriptor;
pub mod error;
pub mod file_path;
pub mod probe;
pub mod rules;
pub mod tokens;

/// This crate's version, reported in the CLI's component snapshot.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub use descriptor::Project;
pub use error::ConfigError;
pub use file_path::FilePath;
pub use probe::ProjectType;
pub use rules::RuleSpec;
