//! Error types for the resume editor library

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the resume editor library
#[derive(Error, Debug)]
pub enum Error {
    /// PDF processing error
    #[error("PDF error: {0}")]
    Pdf(#[from] lopdf::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Input file does not exist
    #[error("File not found: {}", .0.display())]
    MissingFile(PathBuf),

    /// Requested page is not in the document (pages are 1-based)
    #[error("{} has no page {index} (document has {available} page(s))", .path.display())]
    InvalidPageIndex {
        path: PathBuf,
        index: u32,
        available: usize,
    },

    /// The re-flow tool could not be run or exited unsuccessfully
    #[error("External tool failed: `{command}`: {reason}")]
    ExternalToolFailed { command: String, reason: String },

    /// Output name cannot be turned into a file path
    #[error("Malformed output path: {0:?}")]
    MalformedOutputPath(String),

    /// General error
    #[error("{0}")]
    General(String),
}
