//! Component version snapshot
//!
//! The snapshot is printed by `--version` and embedded in the diagnostic
//! report so a report can always be tied back to the toolchain that
//! produced it. Each component reports its own compiled-in version.

const COMPONENTS: &[(&str, &str)] = &[
    ("osgify", env!("CARGO_PKG_VERSION")),
    ("osgify-config", osgify_config::VERSION),
    ("osgify-logger", osgify_logger::VERSION),
    ("osgify-manifest", osgify_manifest::VERSION),
    ("osgify-ast", osgify_ast::VERSION),
];

/// Component name/version pairs for this build.
pub fn snapshot() -> Vec<(String, String)> {
    COMPONENTS
        .iter()
        .map(|(name, version)| ((*name).to_string(), (*version).to_string()))
        .collect()
}

/// Render the snapshot the way `--version` prints it.
pub fn render() -> String {
    snapshot()
        .iter()
        .map(|(name, version)| format!("\"{}\": \"{}\"", name, version))
        .collect::<Vec<_>>()
        .join("\n")
}
