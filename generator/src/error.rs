//! Error types for the region API generator.
//!
//! - [`LoadError`] - reading one of the input tables
//! - [`WriteError`] - writing one output document
//! - [`PipelineError`] - top-level orchestration errors
//!
//! Every variant is fatal: the pipeline never retries or skips past one.
//! Error conversion is automatic via `From`, so `?` works across stages.

use std::path::PathBuf;
use thiserror::Error;

// =============================================================================
// Load Errors
// =============================================================================

/// Underlying fault while reading a table.
#[derive(Debug, Error)]
pub enum ReadFault {
    /// Filesystem read failed.
    #[error("{0}")]
    Io(#[from] std::io::Error),

    /// Fault raised by the csv reader. Input is decoded before parsing and
    /// records are flexible, so in practice this is reader I/O only.
    #[error("{0}")]
    Csv(#[from] csv::Error),
}

/// Errors while loading an input table.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The expected input file does not exist.
    #[error("File not found: {}", path.display())]
    MissingFile { path: PathBuf },

    /// I/O or parse failure mid-read. Rows read so far are discarded.
    #[error("Error reading {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: ReadFault,
    },
}

impl LoadError {
    pub(crate) fn read(path: impl Into<PathBuf>, source: impl Into<ReadFault>) -> Self {
        Self::Read {
            path: path.into(),
            source: source.into(),
        }
    }

    /// Path of the input that failed.
    pub fn path(&self) -> &std::path::Path {
        match self {
            Self::MissingFile { path } | Self::Read { path, .. } => path,
        }
    }
}

// =============================================================================
// Write Errors
// =============================================================================

/// Underlying fault while writing a document.
#[derive(Debug, Error)]
pub enum WriteFault {
    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Json(#[from] serde_json::Error),
}

/// Failure to write one output document (or create its directory).
#[derive(Debug, Error)]
#[error("Failed to write {}: {source}", path.display())]
pub struct WriteError {
    pub path: PathBuf,
    #[source]
    pub source: WriteFault,
}

impl WriteError {
    pub(crate) fn new(path: impl Into<PathBuf>, source: impl Into<WriteFault>) -> Self {
        Self {
            path: path.into(),
            source: source.into(),
        }
    }
}

// =============================================================================
// Pipeline Errors (top-level)
// =============================================================================

/// Top-level pipeline errors, returned by [`crate::transform::pipeline::run`].
#[derive(Debug, Error)]
pub enum PipelineError {
    /// An input table could not be loaded.
    #[error(transparent)]
    Load(#[from] LoadError),

    /// The province table normalized to zero records.
    #[error("No provinces data found! Please check your CSV file.")]
    EmptyDataset,

    /// An output document could not be written.
    #[error(transparent)]
    Write(#[from] WriteError),
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Result type for load operations.
pub type LoadResult<T> = Result<T, LoadError>;

/// Result type for write operations.
pub type WriteResult<T> = Result<T, WriteError>;

/// Result type for pipeline operations.
pub type PipelineResult<T> = Result<T, PipelineError>;
