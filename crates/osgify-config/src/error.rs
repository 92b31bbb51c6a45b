use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while loading or validating the project descriptor.
///
/// All of these are fatal and occur before any source file is processed.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Failed to parse package.json: {0}")]
    PackageJson(#[from] serde_json::Error),

    #[error("Failed to parse bundler rules file: {0}")]
    RulesFile(#[from] toml::de::Error),

    #[error("Required file not found: {0}")]
    MissingFile(PathBuf),

    #[error("Missing required key '{0}' in osgify.toml")]
    MissingKey(&'static str),

    #[error("Unknown rule '{0}' in osgify.toml (known rules: {1})")]
    UnknownRule(String, String),

    #[error("Invalid glob pattern '{pattern}': {reason}")]
    BadGlob { pattern: String, reason: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_display() {
        let err = ConfigError::MissingKey("build.output");
        assert_eq!(
            err.to_string(),
            "Missing required key 'build.output' in osgify.toml"
        );
    }
}
