//! JavaScript syntax-tree transforms for the osgify bundler
//!
//! The parse / transform / serialize contract lives in [`tree`]: a source
//! file is parsed once, a visitor runs over the tree in pre-order and may
//! replace whole subtrees, and the result is serialized back to source
//! text. [`static_urls`] builds on that for the static-asset URL rewrite,
//! with [`webpack`] providing content-hash stripping.

pub mod error;
pub mod static_urls;
pub mod tree;
pub mod webpack;

/// This crate's version, reported in the CLI's component snapshot.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub use error::ParseError;
pub use tree::{NodeKind, NodeView, SyntaxTree, Visit};
