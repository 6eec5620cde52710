//! Async file operations
//!
//! Idempotent bucket creation and streaming file copies, either straight
//! into the destination or through a temp file that is renamed into place.

use crate::config::DEFAULT_BUFFER_SIZE;
use crate::error::{IoResultExt, Result, FileSorterError};
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};
use tokio::fs::{self, File};
use tokio::io::{AsyncWriteExt, BufReader};

static TEMP_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Copy operation statistics
#[derive(Debug, Clone, Default)]
pub struct CopyStats {
    /// Bytes copied
    pub bytes_copied: u64,
    /// Duration of the copy
    pub duration: Duration,
    /// Method used for copy
    pub method: CopyMethod,
}

/// Copy method used
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CopyMethod {
    /// Temp file in the destination folder, then rename
    #[default]
    Atomic,
    /// Truncate and write the destination directly
    InPlace,
}

/// Options for file copy operations
#[derive(Debug, Clone)]
pub struct CopyOptions {
    /// Read buffer size
    pub buffer_size: usize,
    /// Copy through a temp file and rename
    pub atomic: bool,
}

impl Default for CopyOptions {
    fn default() -> Self {
        Self {
            buffer_size: DEFAULT_BUFFER_SIZE,
            atomic: true,
        }
    }
}

/// Create `dir` and its parents if missing.
///
/// Safe to call from many tasks at once for the same path: losing the race
/// to another creator is not an error.
pub async fn ensure_dir(dir: &Path) -> Result<()> {
    match fs::create_dir_all(dir).await {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {
            let meta = fs::metadata(dir).await.with_path(dir)?;
            if meta.is_dir() {
                Ok(())
            } else {
                Err(FileSorterError::io(dir, e))
            }
        }
        Err(e) => Err(FileSorterError::io(dir, e)),
    }
}

/// Async file copier
#[derive(Debug, Clone, Default)]
pub struct FileCopier {
    options: CopyOptions,
}

impl FileCopier {
    /// Create a new file copier with the given options
    pub fn new(options: CopyOptions) -> Self {
        Self { options }
    }

    /// Copy `source` to `dest`, overwriting any existing file.
    ///
    /// The parent of `dest` must already exist.
    pub async fn copy(&self, source: &Path, dest: &Path) -> Result<CopyStats> {
        let start = Instant::now();

        let (bytes_copied, method) = if self.options.atomic {
            (self.copy_atomic(source, dest).await?, CopyMethod::Atomic)
        } else {
            (self.copy_streamed(source, dest).await?, CopyMethod::InPlace)
        };

        Ok(CopyStats {
            bytes_copied,
            duration: start.elapsed(),
            method,
        })
    }

    async fn copy_atomic(&self, source: &Path, dest: &Path) -> Result<u64> {
        // Removed on every exit path, including the future being dropped
        let temp = TempFile::new(temp_path_for(dest)?);

        let bytes = self.copy_streamed(source, temp.path()).await?;
        fs::rename(temp.path(), dest).await.with_path(dest)?;
        temp.persist();

        Ok(bytes)
    }

    async fn copy_streamed(&self, source: &Path, dest: &Path) -> Result<u64> {
        let src = File::open(source).await.with_path(source)?;
        let mut reader = BufReader::with_capacity(self.options.buffer_size, src);

        let mut dst = File::create(dest).await.with_path(dest)?;
        let bytes = tokio::io::copy_buf(&mut reader, &mut dst)
            .await
            .with_path(source)?;

        // tokio buffers writes in the background; flush before the handle drops
        dst.flush().await.with_path(dest)?;

        Ok(bytes)
    }
}

/// Temp file that is deleted on drop unless persisted
struct TempFile {
    path: PathBuf,
    persisted: bool,
}

impl TempFile {
    fn new(path: PathBuf) -> Self {
        Self {
            path,
            persisted: false,
        }
    }

    fn path(&self) -> &Path {
        &self.path
    }

    /// The file was renamed away; nothing left to clean up
    fn persist(mut self) {
        self.persisted = true;
    }
}

impl Drop for TempFile {
    fn drop(&mut self) {
        if self.persisted {
            return;
        }
        match std::fs::remove_file(&self.path) {
            Ok(()) => tracing::debug!("Removed temp file {}", self.path.display()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => tracing::warn!(
                "Failed to remove temp file {}: {}",
                self.path.display(),
                e
            ),
        }
    }
}

/// Unique hidden temp path next to `dest`
fn temp_path_for(dest: &Path) -> Result<PathBuf> {
    let file_name = dest
        .file_name()
        .ok_or_else(|| FileSorterError::InvalidPath(dest.to_path_buf()))?;

    let mut name = OsString::from(".");
    name.push(file_name);
    name.push(format!(
        ".{}.{}.part",
        std::process::id(),
        TEMP_COUNTER.fetch_add(1, Ordering::Relaxed)
    ));

    Ok(dest.with_file_name(name))
}
