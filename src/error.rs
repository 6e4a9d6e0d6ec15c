//! Centralized error handling for the mincer pipeline.
//!
//! Data-quality problems (an unparsable salary, a city that cleans down to
//! nothing) are never errors; each extractor absorbs them with a documented
//! default. This module covers everything else: infrastructure faults that
//! abort the run, and programmer-facing misuse of the pipeline itself.
//!
//! Pipeline logic propagates `anyhow::Result` with context; the variants here
//! exist so the CLI can tell a missing artifact (fixable by running another
//! command) apart from a malformed file or an out-of-order call.

use std::fmt;
use std::path::PathBuf;

/// Main error type for mincer operations.
#[derive(Debug)]
pub enum MincerError {
    /// I/O errors (file operations)
    Io(std::io::Error),

    /// Data processing errors (Polars, array conversion, JSON parsing)
    Data(String),

    /// Input file is missing a required column
    Schema(String),

    /// Input path does not exist
    InvalidPath(PathBuf),

    /// A required upstream artifact is absent; `remedy` names the command
    /// that produces it
    MissingArtifact { path: PathBuf, remedy: &'static str },

    /// Pipeline invoked out of order (e.g. assembly before extraction)
    PipelineOrder(&'static str),
}

impl fmt::Display for MincerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::Data(msg) => write!(f, "Data processing error: {msg}"),
            Self::Schema(msg) => write!(f, "Schema error: {msg}"),
            Self::InvalidPath(path) => write!(f, "File not found: {}", path.display()),
            Self::MissingArtifact { path, remedy } => write!(
                f,
                "Missing artifact: {} (run `{remedy}` first)",
                path.display()
            ),
            Self::PipelineOrder(msg) => write!(f, "Pipeline misuse: {msg}"),
        }
    }
}

impl std::error::Error for MincerError {}

impl From<std::io::Error> for MincerError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<polars::error::PolarsError> for MincerError {
    fn from(err: polars::error::PolarsError) -> Self {
        Self::Data(err.to_string())
    }
}

impl From<serde_json::Error> for MincerError {
    fn from(err: serde_json::Error) -> Self {
        Self::Data(format!("JSON error: {err}"))
    }
}

impl From<ndarray_npy::ReadNpyError> for MincerError {
    fn from(err: ndarray_npy::ReadNpyError) -> Self {
        Self::Data(format!("npy read error: {err}"))
    }
}

impl From<ndarray_npy::WriteNpyError> for MincerError {
    fn from(err: ndarray_npy::WriteNpyError) -> Self {
        Self::Data(format!("npy write error: {err}"))
    }
}

/// Result type alias for mincer operations.
pub type Result<T> = std::result::Result<T, MincerError>;
