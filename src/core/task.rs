//! Per-file copy tasks
//!
//! A [`FileTask`] is one file's planned move into its extension bucket.
//! Running it never fails outward: every error becomes a
//! [`CopyOutcome::Failure`] that is logged where it happened.

use crate::config::NoExtensionPolicy;
use crate::error::{FileSorterError, Result};
use crate::fs::{ensure_dir, CopyStats, FileCopier};
use serde::{Deserialize, Serialize};
use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// A single file to be sorted
#[derive(Debug, Clone)]
pub struct FileTask {
    /// Task ID, in discovery order
    pub id: u64,
    /// File to copy
    pub source_path: PathBuf,
    /// Suffix after the last dot, without the dot; empty when there is none
    pub extension: OsString,
    /// Output root
    pub destination_root: PathBuf,
    /// Folder under the output root, `None` for the root itself
    bucket: Option<OsString>,
    file_name: OsString,
}

impl FileTask {
    /// Plan a task for `source_path`
    pub fn new(
        id: u64,
        source_path: PathBuf,
        destination_root: PathBuf,
        no_extension: &NoExtensionPolicy,
    ) -> Result<Self> {
        let file_name = source_path
            .file_name()
            .ok_or_else(|| FileSorterError::InvalidPath(source_path.clone()))?
            .to_os_string();
        let extension = extension_of(&source_path).to_os_string();

        let bucket = if extension.is_empty() {
            match no_extension {
                NoExtensionPolicy::OutputRoot => None,
                NoExtensionPolicy::Bucket(name) => Some(OsString::from(name)),
            }
        } else {
            Some(extension.clone())
        };

        Ok(Self {
            id,
            source_path,
            extension,
            destination_root,
            bucket,
            file_name,
        })
    }

    /// Extension as a printable string
    pub fn extension_lossy(&self) -> String {
        self.extension.to_string_lossy().into_owned()
    }

    /// Folder the file is copied into
    pub fn destination_dir(&self) -> PathBuf {
        match &self.bucket {
            Some(bucket) => self.destination_root.join(bucket),
            None => self.destination_root.clone(),
        }
    }

    /// Full destination path
    pub fn destination_path(&self) -> PathBuf {
        self.destination_dir().join(&self.file_name)
    }

    /// Ensure the bucket exists and copy the file into it
    pub async fn run(&self, copier: &FileCopier) -> Result<CopyStats> {
        ensure_dir(&self.destination_dir()).await?;
        copier.copy(&self.source_path, &self.destination_path()).await
    }

    /// Run the task to a terminal outcome and log it
    pub async fn execute(&self, copier: &FileCopier, timeout: Option<Duration>) -> CopyOutcome {
        let result = match timeout {
            Some(limit) => match tokio::time::timeout(limit, self.run(copier)).await {
                Ok(result) => result,
                Err(_) => Err(FileSorterError::Timeout(limit.as_secs())),
            },
            None => self.run(copier).await,
        };

        match result {
            Ok(stats) => self.succeed(&stats),
            Err(e) => self.fail(e),
        }
    }

    /// Outcome for a planned but not executed copy
    pub fn plan(&self) -> CopyOutcome {
        let destination = self.destination_path();
        tracing::info!(
            "Would copy file {} to {}",
            self.source_path.display(),
            destination.display()
        );
        CopyOutcome::Planned {
            source: self.source_path.clone(),
            destination,
        }
    }

    fn succeed(&self, stats: &CopyStats) -> CopyOutcome {
        let destination = self.destination_path();
        tracing::info!(
            "Copy file {} to {}",
            self.source_path.display(),
            destination.display()
        );
        tracing::debug!(
            "Task {}: {} bytes of .{} in {:?} ({:?})",
            self.id,
            stats.bytes_copied,
            self.extension_lossy(),
            stats.duration,
            stats.method
        );
        CopyOutcome::Success {
            source: self.source_path.clone(),
            destination,
            bytes: stats.bytes_copied,
        }
    }

    /// Failure outcome for this task, logged
    pub fn fail(&self, error: FileSorterError) -> CopyOutcome {
        CopyOutcome::failure(self.source_path.clone(), error)
    }
}

/// Extension used for bucketing: verbatim, case preserved, empty if none.
///
/// Dot-files such as `.bashrc` have no extension; `name.` has an empty one.
pub fn extension_of(path: &Path) -> &OsStr {
    path.extension().unwrap_or_else(|| OsStr::new(""))
}

/// Terminal result of one file task
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum CopyOutcome {
    /// File copied
    Success {
        /// Source file
        source: PathBuf,
        /// Where it was written
        destination: PathBuf,
        /// Bytes written
        bytes: u64,
    },
    /// Copy skipped in dry-run mode
    Planned {
        /// Source file
        source: PathBuf,
        /// Where it would be written
        destination: PathBuf,
    },
    /// Copy failed
    Failure {
        /// Source file
        source: PathBuf,
        /// Error detail
        error: String,
    },
}

impl CopyOutcome {
    /// Build a failure outcome and log it
    pub fn failure(source: PathBuf, error: FileSorterError) -> Self {
        tracing::error!(
            "An error occurred while copying the file {}: {}",
            source.display(),
            error
        );
        if error.is_permission_error() {
            if let Some(path) = error.path() {
                tracing::warn!("Check permissions on {}", path.display());
            }
        }
        Self::Failure {
            source,
            error: error.to_string(),
        }
    }

    /// Did the task end without error?
    pub fn is_success(&self) -> bool {
        !matches!(self, Self::Failure { .. })
    }

    /// Source file of this outcome
    pub fn source(&self) -> &Path {
        match self {
            Self::Success { source, .. }
            | Self::Planned { source, .. }
            | Self::Failure { source, .. } => source,
        }
    }

    /// Destination path, when one was reached or planned
    pub fn destination(&self) -> Option<&Path> {
        match self {
            Self::Success { destination, .. } | Self::Planned { destination, .. } => {
                Some(destination)
            }
            Self::Failure { .. } => None,
        }
    }
}
