//! Package manifest for the osgify bundler
//!
//! The manifest maps every processed package identity (`name@version`) to
//! the directory its output was written to. It is built incrementally while
//! the pipeline runs and persisted once, as a flat JSON object, at the end
//! of a successful run. Downstream packaging tooling consumes that file
//! verbatim.

mod errors;
mod manifest;
mod types;

/// This crate's version, reported in the CLI's component snapshot.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub use errors::ManifestError;
pub use types::{Manifest, PkgId};
