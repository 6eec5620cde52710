//! Sorting engine
//!
//! Checks preconditions, walks the source tree, spawns one copy task per
//! file and waits until every task has reached a terminal outcome.

use crate::config::SortConfig;
use crate::core::{CopyOutcome, FileTask};
use crate::error::{FileSorterError, Result};
use crate::fs::{ensure_dir, CopyOptions, FileCopier, WalkConfig, WalkResult, Walker};
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Semaphore;

/// Result of a sorting run
#[derive(Debug, Clone, Serialize)]
pub struct SortReport {
    /// Source folder
    pub source: PathBuf,
    /// Output folder
    pub destination: PathBuf,
    /// Files found by the walk
    pub files_discovered: u64,
    /// Files copied
    pub files_copied: u64,
    /// Files only planned (dry run)
    pub files_planned: u64,
    /// Files that failed to copy
    pub files_failed: u64,
    /// Total bytes copied
    pub bytes_copied: u64,
    /// File count per bucket, relative to the output folder ("" = output root)
    pub buckets: BTreeMap<String, u64>,
    /// Entries the walk had to skip
    pub walk_errors: Vec<String>,
    /// Total duration
    pub duration: Duration,
    /// Every per-file outcome
    pub outcomes: Vec<CopyOutcome>,
}

impl SortReport {
    fn new(config: &SortConfig, walk: WalkResult, outcomes: Vec<CopyOutcome>, duration: Duration) -> Self {
        let mut report = Self {
            source: config.source.clone(),
            destination: config.destination.clone(),
            files_discovered: walk.file_count() as u64,
            files_copied: 0,
            files_planned: 0,
            files_failed: 0,
            bytes_copied: 0,
            buckets: BTreeMap::new(),
            walk_errors: walk.errors,
            duration,
            outcomes: Vec::new(),
        };

        for outcome in &outcomes {
            match outcome {
                CopyOutcome::Success { bytes, .. } => {
                    report.files_copied += 1;
                    report.bytes_copied += bytes;
                }
                CopyOutcome::Planned { .. } => report.files_planned += 1,
                CopyOutcome::Failure { .. } => report.files_failed += 1,
            }
            if let Some(bucket) = outcome
                .destination()
                .and_then(Path::parent)
                .and_then(|dir| dir.strip_prefix(&config.destination).ok())
            {
                *report
                    .buckets
                    .entry(bucket.to_string_lossy().into_owned())
                    .or_default() += 1;
            }
        }

        report.outcomes = outcomes;
        report
    }

    /// Check if every discovered file was handled without error
    pub fn is_success(&self) -> bool {
        self.files_failed == 0
    }

    /// Failed outcomes only
    pub fn failures(&self) -> impl Iterator<Item = &CopyOutcome> {
        self.outcomes.iter().filter(|o| !o.is_success())
    }

    /// Render the report as pretty JSON
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Print summary to console
    pub fn print_summary(&self) {
        let rounded = Duration::from_millis(self.duration.as_millis() as u64);

        println!("\n=== Sort Summary ===");
        println!("Files found:     {}", self.files_discovered);
        if self.files_planned > 0 {
            println!("Files planned:   {}", self.files_planned);
        }
        println!("Files copied:    {}", self.files_copied);
        println!("Bytes copied:    {}", humansize::format_size(self.bytes_copied, humansize::BINARY));
        println!("Duration:        {}", humantime::format_duration(rounded));

        if !self.buckets.is_empty() {
            println!("\nBuckets:");
            for (bucket, count) in &self.buckets {
                let name = if bucket.is_empty() { "(output root)" } else { bucket.as_str() };
                println!("  {:<20} {}", name, count);
            }
        }

        if self.files_failed > 0 {
            println!("\nFailures: {}", self.files_failed);
            for outcome in self.failures() {
                if let CopyOutcome::Failure { source, error } = outcome {
                    println!("  {} - {}", source.display(), error);
                }
            }
        }

        if !self.walk_errors.is_empty() {
            println!("\nSkipped while walking: {}", self.walk_errors.len());
            for error in &self.walk_errors {
                println!("  {}", error);
            }
        }
    }
}

/// Main sorting engine
pub struct SortEngine {
    /// Configuration
    config: SortConfig,
    /// Shared file copier
    copier: Arc<FileCopier>,
}

impl SortEngine {
    /// Create a new sorting engine
    pub fn new(config: SortConfig) -> Self {
        let copier = FileCopier::new(CopyOptions {
            buffer_size: config.buffer_size,
            atomic: config.atomic,
        });

        Self {
            config,
            copier: Arc::new(copier),
        }
    }

    /// Engine configuration
    pub fn config(&self) -> &SortConfig {
        &self.config
    }

    /// Execute the sort.
    ///
    /// Returns an error only when a precondition fails, in which case the
    /// output folder has not been touched. Per-file failures are reported in
    /// the returned [`SortReport`].
    pub async fn execute(&self) -> Result<SortReport> {
        let start_time = Instant::now();

        check_source(&self.config.source).await?;

        if !self.config.dry_run {
            ensure_dir(&self.config.destination).await?;
        }
        self.warn_if_nested();

        let walk = self.walk_source().await?;
        tracing::debug!(
            "Found {} files under {}",
            walk.file_count(),
            self.config.source.display()
        );

        let mut outcomes = Vec::with_capacity(walk.file_count());
        let mut tasks = Vec::with_capacity(walk.file_count());
        for (id, path) in walk.files.iter().enumerate() {
            match FileTask::new(
                id as u64,
                path.clone(),
                self.config.destination.clone(),
                &self.config.no_extension,
            ) {
                Ok(task) => tasks.push(task),
                Err(e) => outcomes.push(CopyOutcome::failure(path.clone(), e)),
            }
        }

        if self.config.dry_run {
            outcomes.extend(tasks.iter().map(FileTask::plan));
        } else {
            outcomes.extend(self.dispatch(tasks).await);
        }

        Ok(SortReport::new(&self.config, walk, outcomes, start_time.elapsed()))
    }

    /// Walk the source tree on the blocking pool
    async fn walk_source(&self) -> Result<WalkResult> {
        let walker = Walker::new(WalkConfig {
            follow_symlinks: self.config.follow_symlinks,
            skip_hidden: self.config.skip_hidden,
            max_depth: self.config.max_depth,
        });
        let root = self.config.source.clone();

        tokio::task::spawn_blocking(move || walker.walk(&root))
            .await
            .map_err(|e| FileSorterError::TaskAborted(format!("walker: {}", e)))
    }

    /// Spawn one task per file and collect every outcome.
    ///
    /// All tasks are spawned up front; the semaphore caps how many of them
    /// are doing I/O at the same time.
    async fn dispatch(&self, tasks: Vec<FileTask>) -> Vec<CopyOutcome> {
        let semaphore = Arc::new(Semaphore::new(self.config.effective_max_concurrent()));
        let timeout = self.config.timeout_secs.map(Duration::from_secs);

        let mut handles = Vec::with_capacity(tasks.len());
        for task in tasks {
            let semaphore = Arc::clone(&semaphore);
            let copier = Arc::clone(&self.copier);
            let source = task.source_path.clone();

            let handle = tokio::spawn(async move {
                let _permit = match semaphore.acquire().await {
                    Ok(permit) => permit,
                    Err(e) => return task.fail(FileSorterError::TaskAborted(e.to_string())),
                };
                task.execute(&copier, timeout).await
            });
            handles.push((source, handle));
        }

        let mut outcomes = Vec::with_capacity(handles.len());
        for (source, handle) in handles {
            match handle.await {
                Ok(outcome) => outcomes.push(outcome),
                Err(e) => outcomes.push(CopyOutcome::failure(
                    source,
                    FileSorterError::TaskAborted(e.to_string()),
                )),
            }
        }
        outcomes
    }

    fn warn_if_nested(&self) {
        let (Ok(source), Ok(dest)) = (
            self.config.source.canonicalize(),
            self.config.destination.canonicalize(),
        ) else {
            return;
        };
        if dest.starts_with(&source) {
            tracing::warn!(
                "Output folder {} is inside the source folder; files already sorted there will be copied again",
                self.config.destination.display()
            );
        }
    }
}

/// Verify that `source` exists and is a directory
pub async fn check_source(source: &Path) -> Result<()> {
    match tokio::fs::metadata(source).await {
        Ok(meta) if meta.is_dir() => Ok(()),
        Ok(_) => Err(FileSorterError::SourceNotDirectory(source.to_path_buf())),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            Err(FileSorterError::SourceNotFound(source.to_path_buf()))
        }
        Err(e) => Err(FileSorterError::io(source, e)),
    }
}

/// Sort `source` into `dest` with default settings
pub async fn sort_folder(source: &Path, dest: &Path) -> Result<SortReport> {
    let config = SortConfig {
        source: source.to_path_buf(),
        destination: dest.to_path_buf(),
        ..Default::default()
    };

    SortEngine::new(config).execute().await
}
