//! osgify library - expose modules for testing
//!
//! The binary is a thin wrapper; integration tests drive the pipeline
//! through these modules directly.

pub mod errors;
pub mod files;
pub mod packager;
pub mod pipeline;
pub mod report;
pub mod rules;
pub mod versions;
