//! Recursive source tree walker
//!
//! Enumerates every regular file under a root. Unreadable entries are
//! skipped with a warning and recorded, never fatal.

use crate::error::FileSorterError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use walkdir::{DirEntry, WalkDir};

/// Result of a directory walk
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WalkResult {
    /// Root path that was walked
    pub root: PathBuf,
    /// Every regular file found, in traversal order
    pub files: Vec<PathBuf>,
    /// Entries skipped because they could not be read
    pub errors: Vec<String>,
    /// Walk duration
    pub duration: Duration,
}

impl WalkResult {
    /// Number of files found
    pub fn file_count(&self) -> usize {
        self.files.len()
    }
}

/// Configuration for directory walking
#[derive(Debug, Clone, Default)]
pub struct WalkConfig {
    /// Follow symbolic links into directories
    pub follow_symlinks: bool,
    /// Skip names starting with '.'
    pub skip_hidden: bool,
    /// Maximum depth (None = unlimited)
    pub max_depth: Option<usize>,
}

/// Source tree walker
#[derive(Debug, Clone, Default)]
pub struct Walker {
    config: WalkConfig,
}

impl Walker {
    /// Create a new walker with the given configuration
    pub fn new(config: WalkConfig) -> Self {
        Self { config }
    }

    /// Walk `root` and collect every regular file below it
    pub fn walk(&self, root: &Path) -> WalkResult {
        let start_time = Instant::now();

        let mut walker = WalkDir::new(root).follow_links(self.config.follow_symlinks);
        if let Some(max_depth) = self.config.max_depth {
            walker = walker.max_depth(max_depth);
        }

        let skip_hidden = self.config.skip_hidden;
        let entries = walker
            .into_iter()
            .filter_entry(|e| !(skip_hidden && e.depth() > 0 && is_hidden(e)));

        let mut files = Vec::new();
        let mut errors = Vec::new();

        for entry in entries {
            match entry {
                Ok(e) => match classify(&e) {
                    EntryKind::File => files.push(e.into_path()),
                    EntryKind::Directory => {}
                    EntryKind::Skipped(reason) => {
                        let err = FileSorterError::walk(e.path(), reason);
                        tracing::warn!("Skipping {}", err);
                        errors.push(err.to_string());
                    }
                    EntryKind::Special => {
                        tracing::debug!("Skipping special file {}", e.path().display());
                    }
                },
                Err(err) => {
                    let path = err.path().map(Path::to_path_buf).unwrap_or_else(|| root.to_path_buf());
                    let err = FileSorterError::walk(path, err.to_string());
                    tracing::warn!("Skipping unreadable entry: {}", err);
                    errors.push(err.to_string());
                }
            }
        }

        tracing::debug!(
            "Walked {} in {:?}: {} files, {} skipped",
            root.display(),
            start_time.elapsed(),
            files.len(),
            errors.len()
        );

        WalkResult {
            root: root.to_path_buf(),
            files,
            errors,
            duration: start_time.elapsed(),
        }
    }
}

enum EntryKind {
    File,
    Directory,
    Special,
    Skipped(String),
}

fn classify(entry: &DirEntry) -> EntryKind {
    let file_type = entry.file_type();

    if file_type.is_file() {
        return EntryKind::File;
    }
    if file_type.is_dir() {
        return EntryKind::Directory;
    }
    if file_type.is_symlink() {
        // Only reached when links are not followed: resolve once to decide.
        return match std::fs::metadata(entry.path()) {
            Ok(meta) if meta.is_file() => EntryKind::File,
            Ok(meta) if meta.is_dir() => EntryKind::Directory,
            Ok(_) => EntryKind::Special,
            Err(e) => EntryKind::Skipped(format!("dangling symlink: {}", e)),
        };
    }
    EntryKind::Special
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry
        .file_name()
        .to_str()
        .map(|s| s.starts_with('.'))
        .unwrap_or(false)
}
