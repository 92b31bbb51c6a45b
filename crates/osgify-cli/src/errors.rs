//! Centralized error types for the osgify pipeline
//!
//! Per-file failures never surface here; they are swallowed into the
//! diagnostic report by the rule engine. These are the run-scoped errors
//! that abort the pipeline and produce a non-zero exit.

use osgify_config::{ConfigError, ProjectType};
use osgify_manifest::ManifestError;
use std::io;
use thiserror::Error;

/// Fatal, run-aborting pipeline errors
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("{0}")]
    Config(#[from] ConfigError),

    #[error("Unsupported project type '{0}': cannot run osgify")]
    UnsupportedProjectType(ProjectType),

    #[error("{0}")]
    Manifest(#[from] ManifestError),

    #[error("Packaging failed: {0}")]
    Packaging(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unsupported_project_type_display() {
        let err = PipelineError::UnsupportedProjectType(ProjectType::Unsupported);
        assert_eq!(
            err.to_string(),
            "Unsupported project type 'unsupported': cannot run osgify"
        );
    }
}
