//! Archive packaging
//!
//! Packages the build output directory into a deployable archive by
//! shelling out to `zip`. Runs only when `[jar] supported = true` and only
//! after the manifest has been validated and written.

use osgify_config::Project;
use std::path::PathBuf;
use std::process::Command;
use tracing::debug;

use crate::errors::PipelineError;

/// Create the archive for `project` and return its path.
pub fn package(project: &Project) -> Result<PathBuf, PipelineError> {
    let zip = which::which("zip").map_err(|_| {
        PipelineError::Packaging("zip executable not found in PATH".to_string())
    })?;

    // archive lands in the project root; the command runs inside the
    // output directory, so resolve the destination to an absolute path
    let archive = project
        .dir()
        .canonicalize()?
        .join(project.jar_output_filename());

    debug!("packaging {} with {}", archive.display(), zip.display());

    let output = Command::new(zip)
        .current_dir(project.output_dir())
        .arg("-r")
        .arg("-q")
        .arg(&archive)
        .arg(".")
        .output()?;

    if !output.status.success() {
        return Err(PipelineError::Packaging(format!(
            "zip exited with {}: {}",
            output.status,
            String::from_utf8_lossy(&output.stderr).trim()
        )));
    }

    Ok(archive)
}
