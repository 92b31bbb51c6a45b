//! Pipeline orchestrator
//!
//! One run moves through fixed stages: probe the project type, stage the
//! file tree for either the bundler or the adapter path, execute the
//! configured rules, validate and write the manifest together with the
//! transformed files, optionally package the output into an archive, and
//! finish the diagnostic report. An unsupported project type aborts before
//! anything is written to disk.

use osgify_config::descriptor::PackageJson;
use osgify_config::{Project, ProjectType};
use osgify_manifest::{Manifest, PkgId};
use std::fs;
use std::path::Path;
use std::time::Instant;
use tracing::{debug, info};
use walkdir::WalkDir;

use crate::errors::PipelineError;
use crate::files::{collect_records, FileRecord};
use crate::packager;
use crate::report::RunReport;
use crate::rules;
use crate::versions;

/// Execute the full pipeline for `project`.
pub fn run(project: &Project) -> Result<RunReport, PipelineError> {
    let started = Instant::now();

    let mut report = RunReport::new();
    report.set_versions(versions::snapshot());
    report.set_root_package(PkgId::new(project.name(), project.version()));

    // probe before touching the filesystem
    let mut manifest = Manifest::new();
    let mut records = match project.project_type() {
        ProjectType::Unsupported => {
            return Err(PipelineError::UnsupportedProjectType(
                ProjectType::Unsupported,
            ))
        }
        ProjectType::Bundler => stage_bundler(project, &mut manifest)?,
        ProjectType::Adapter => stage_adapter(project, &mut manifest)?,
    };

    info!(
        "staged {} file(s) for {} project '{}'",
        records.len(),
        project.project_type(),
        project.name()
    );

    let handles = rules::resolve_rules(project);
    rules::apply_rules(project, &handles, &mut records, &mut report);

    write_output(project, &manifest, &records)?;

    if project.jar_supported() {
        osgify_logger::spinner_start("Packaging output...");
        match packager::package(project) {
            Ok(archive) => {
                osgify_logger::spinner_success(&format!("Packaged {}", archive.display()));
            }
            Err(e) => {
                osgify_logger::spinner_error("Packaging failed");
                return Err(e);
            }
        }
    }

    report.finish(started.elapsed());
    if let Some(path) = project.report_file() {
        report.save_to_path(&path)?;
        info!("diagnostic report written to {}", path.display());
    }

    Ok(report)
}

/// Bundler staging: the input tree goes through the rules, the root package
/// and every installed dependency get manifest entries, and dependency
/// packages are copied under `node_modules/<name>@<version>`.
fn stage_bundler(
    project: &Project,
    manifest: &mut Manifest,
) -> Result<Vec<FileRecord>, PipelineError> {
    let out = project.output_dir();
    fs::create_dir_all(&out)?;
    fs::copy(
        project.dir().join("package.json"),
        out.join("package.json"),
    )?;

    manifest.add_package(
        PkgId::new(project.name(), project.version()),
        project.output_name(),
    );

    for dep in project.dependencies() {
        let dep_dir = project.dir().join("node_modules").join(dep);
        let dep_json = dep_dir.join("package.json");
        if !dep_json.is_file() {
            debug!("dependency '{}' not installed, skipping", dep);
            continue;
        }

        let pkg: PackageJson = serde_json::from_str(&fs::read_to_string(&dep_json)?)
            .map_err(|e| {
                PipelineError::Io(std::io::Error::new(
                    std::io::ErrorKind::InvalidData,
                    format!("{}: {}", dep_json.display(), e),
                ))
            })?;

        let pkg_dir = format!("node_modules/{}@{}", pkg.name.replace('/', "%2F"), pkg.version);
        copy_tree(&dep_dir, &out.join(&pkg_dir))?;
        manifest.add_package(
            PkgId::new(&pkg.name, &pkg.version),
            format!("{}/{}", project.output_name(), pkg_dir),
        );
    }

    Ok(collect_records(&project.input_dir())?)
}

/// Adapter staging: the pre-built application under `[adapt] build-dir` is
/// the file tree; only the root package enters the manifest.
fn stage_adapter(
    project: &Project,
    manifest: &mut Manifest,
) -> Result<Vec<FileRecord>, PipelineError> {
    let build_dir = project
        .adapt_build_dir()
        .ok_or(PipelineError::UnsupportedProjectType(ProjectType::Adapter))?;
    if !build_dir.is_dir() {
        return Err(PipelineError::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("adapt build dir not found: {}", build_dir.display()),
        )));
    }

    let out = project.output_dir();
    fs::create_dir_all(&out)?;
    fs::copy(
        project.dir().join("package.json"),
        out.join("package.json"),
    )?;

    manifest.add_package(
        PkgId::new(project.name(), project.version()),
        project.output_name(),
    );

    Ok(collect_records(&build_dir)?)
}

/// Validate the manifest, write the surviving records under the output
/// directory, then persist `manifest.json` atomically. Failed and removed
/// records never reach the output tree.
fn write_output(
    project: &Project,
    manifest: &Manifest,
    records: &[FileRecord],
) -> Result<(), PipelineError> {
    manifest.validate()?;

    let out = project.output_dir();
    for record in records {
        if record.is_removed() || record.is_failed() {
            debug!("skipping {}", record.rel_posix());
            continue;
        }
        record.write_to(&out)?;
    }

    manifest.save_to_path(&out.join("manifest.json"))?;
    Ok(())
}

fn copy_tree(from: &Path, to: &Path) -> Result<(), PipelineError> {
    for entry in WalkDir::new(from).into_iter().filter_map(|e| e.ok()) {
        if !entry.file_type().is_file() {
            continue;
        }
        let rel = entry
            .path()
            .strip_prefix(from)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        let target = to.join(rel);
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::copy(entry.path(), &target)?;
    }
    Ok(())
}
