use thiserror::Error;

/// Errors raised by the source transform layer.
#[derive(Error, Debug)]
pub enum ParseError {
    #[error("Syntax error at byte {offset}: {snippet:?}")]
    Syntax { offset: usize, snippet: String },

    #[error("Replacement is not a valid expression: {0:?}")]
    BadReplacement(String),

    #[error("Invalid asset glob pattern: {0}")]
    BadAssetGlob(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
