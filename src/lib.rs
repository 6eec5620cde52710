//! # FileSorter - Sort Files Into Extension Folders
//!
//! FileSorter copies every file under a source folder into an output
//! folder, grouped into one subfolder per file extension:
//!
//! ```text
//! source/notes/todo.txt      ->  output/txt/todo.txt
//! source/photos/IMG_01.JPG   ->  output/JPG/IMG_01.JPG
//! source/Makefile            ->  output/Makefile
//! ```
//!
//! Each file is copied by its own async task. A failure is logged and
//! recorded for that file only; the run always finishes every task.
//!
//! ## Quick Start
//!
//! ```no_run
//! use filesorter::core::sort_folder;
//! use std::path::Path;
//!
//! # async fn run() -> filesorter::Result<()> {
//! let report = sort_folder(Path::new("/source"), Path::new("/sorted")).await?;
//! println!("Copied {} of {} files", report.files_copied, report.files_discovered);
//! # Ok(())
//! # }
//! ```
//!
//! ## Advanced Usage
//!
//! ```no_run
//! use filesorter::config::{NoExtensionPolicy, SortConfig};
//! use filesorter::core::SortEngine;
//! use std::path::PathBuf;
//!
//! # async fn run() -> filesorter::Result<()> {
//! let config = SortConfig {
//!     source: PathBuf::from("/source"),
//!     destination: PathBuf::from("/sorted"),
//!     max_concurrent: 16,
//!     no_extension: NoExtensionPolicy::Bucket("no_ext".to_string()),
//!     ..Default::default()
//! };
//!
//! let report = SortEngine::new(config).execute().await?;
//! report.print_summary();
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod core;
pub mod error;
pub mod fs;

// Re-export commonly used types
pub use config::{NoExtensionPolicy, SortConfig};
pub use self::core::{CopyOutcome, FileTask, SortEngine, SortReport};
pub use error::{FileSorterError, Result};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
