//! Error types for FileSorter
//!
//! Precondition failures abort a run; everything raised while copying a
//! single file is captured into that file's outcome instead.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for FileSorter operations
#[derive(Error, Debug)]
pub enum FileSorterError {
    /// I/O error during file operations
    #[error("I/O error at '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Source folder does not exist
    #[error("Source folder does not exist: {0}")]
    SourceNotFound(PathBuf),

    /// Source path exists but is not a directory
    #[error("Source path is not a directory: {0}")]
    SourceNotDirectory(PathBuf),

    /// Path has no usable file name component
    #[error("Invalid path: {0}")]
    InvalidPath(PathBuf),

    /// Directory traversal error
    #[error("Walk error at '{path}': {message}")]
    WalkError { path: PathBuf, message: String },

    /// Copy task did not finish in time
    #[error("Operation timed out after {0} seconds")]
    Timeout(u64),

    /// Copy task panicked or was cancelled before finishing
    #[error("Copy task aborted: {0}")]
    TaskAborted(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Report serialization error
    #[error("Report error: {0}")]
    ReportError(String),
}

impl FileSorterError {
    /// Create an I/O error with path context
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Create a walk error
    pub fn walk(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::WalkError {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::ConfigError(message.into())
    }

    /// Check if this error aborts the whole run rather than a single file
    pub fn is_precondition_failure(&self) -> bool {
        matches!(
            self,
            Self::SourceNotFound(_) | Self::SourceNotDirectory(_) | Self::ConfigError(_)
        )
    }

    /// Check if this error is a permission issue
    pub fn is_permission_error(&self) -> bool {
        match self {
            Self::Io { source, .. } => source.kind() == std::io::ErrorKind::PermissionDenied,
            _ => false,
        }
    }

    /// Get the path associated with this error, if any
    pub fn path(&self) -> Option<&PathBuf> {
        match self {
            Self::Io { path, .. }
            | Self::SourceNotFound(path)
            | Self::SourceNotDirectory(path)
            | Self::InvalidPath(path)
            | Self::WalkError { path, .. } => Some(path),
            _ => None,
        }
    }
}

/// Result type alias for FileSorter operations
pub type Result<T> = std::result::Result<T, FileSorterError>;

impl From<serde_json::Error> for FileSorterError {
    fn from(err: serde_json::Error) -> Self {
        FileSorterError::ReportError(err.to_string())
    }
}

/// Extension trait for adding path context to std::io::Result
pub trait IoResultExt<T> {
    /// Add path context to an I/O error
    fn with_path(self, path: impl Into<PathBuf>) -> Result<T>;
}

impl<T> IoResultExt<T> for std::io::Result<T> {
    fn with_path(self, path: impl Into<PathBuf>) -> Result<T> {
        self.map_err(|e| FileSorterError::io(path, e))
    }
}
