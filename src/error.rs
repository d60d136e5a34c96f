//! Error taxonomy for catalog building, tracking and the host surfaces around them.
//!
//! Configuration, validation and range errors are caller mistakes: they surface
//! synchronously and are never retried. Geometry lookup misses are not errors at all,
//! the tracker skips the event instead.

use thiserror::Error;

#[derive(Error, Debug)]
/// Everything that can go wrong while building or driving a scroll spy.
pub enum SpyError {
    #[error("viewport boundary must be within [0, 1], got {0}")]
    /// The boundary fraction lies outside the unit interval (or is NaN).
    InvalidBoundary(f64),

    #[error("section {index} has no string value for title accessor `{accessor}`")]
    /// A descriptor has no title source, or its title value is not a string.
    MissingTitle {
        /// Position of the offending descriptor in the input sequence.
        index: usize,
        /// Name of the title accessor that failed to resolve.
        accessor: String,
    },

    #[error("section index {0} is out of range")]
    /// An explicit index assignment fell outside the catalog.
    OutOfRange(i64),

    #[error("configuration error: {0}")]
    /// A configuration file could not be parsed.
    Config(String),

    #[error("parse error: {0}")]
    /// Tree-sitter could not load the grammar, compile a query or parse a document.
    Parse(String),

    #[error("IO error: {0}")]
    /// Reading documents or configuration from disk failed.
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    /// The catalog could not be serialised.
    Json(#[from] serde_json::Error),
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, SpyError>;
