//! Configuration settings for FileSorter
//!
//! Defines the CLI arguments, the runtime configuration derived from them,
//! and their defaults.

use clap::{Parser, ValueEnum};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Default upper bound on copy tasks doing I/O at the same time.
pub const DEFAULT_MAX_CONCURRENT: usize = 64;

/// Default buffer size for streaming copies: 256 KB.
pub const DEFAULT_BUFFER_SIZE: usize = 256 * 1024;

/// FileSorter - sort files into per-extension folders
#[derive(Parser, Debug, Clone)]
#[command(name = "filesorter")]
#[command(author = "FileSorter Team")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Asynchronous sorting of files by extension")]
#[command(long_about = r#"
FileSorter copies every file found under SOURCE_FOLDER into OUTPUT_FOLDER,
grouped into subfolders named after the file extension.

  photos/2021/img.JPG   ->  OUTPUT_FOLDER/JPG/img.JPG
  notes/todo.txt        ->  OUTPUT_FOLDER/txt/todo.txt
  Makefile              ->  OUTPUT_FOLDER/Makefile

Files that fail to copy are logged and skipped; the run always finishes.

Examples:
  filesorter ~/Downloads ~/Sorted
  filesorter src out -j 16 --no-extension-dir no_ext
  RUST_LOG=debug filesorter src out --summary json
"#)]
pub struct CliArgs {
    /// The path to the source folder with the files
    #[arg(value_name = "SOURCE_FOLDER")]
    pub source_folder: PathBuf,

    /// The path to the destination folder for sorting files
    #[arg(value_name = "OUTPUT_FOLDER")]
    pub output_folder: PathBuf,

    /// Maximum number of files copied at once (0 = default of 64)
    #[arg(short = 'j', long, default_value = "0", value_name = "NUM")]
    pub max_concurrent: usize,

    /// Buffer size for streaming copies (e.g., 64K, 1M)
    #[arg(short = 'b', long, default_value = "256K", value_name = "SIZE")]
    pub buffer_size: String,

    /// Put files without an extension into this folder instead of the output root
    #[arg(long, value_name = "NAME")]
    pub no_extension_dir: Option<String>,

    /// Write directly into the destination instead of a temp file plus rename.
    /// Same-name files copied at the same time may then end up mixed; only
    /// the default mode guarantees one complete copy wins
    #[arg(long)]
    pub in_place: bool,

    /// Give up on a single file after this many seconds
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Follow symbolic links to directories
    #[arg(short = 'L', long)]
    pub follow_symlinks: bool,

    /// Skip hidden files and directories (names starting with '.')
    #[arg(long)]
    pub skip_hidden: bool,

    /// Maximum directory depth to descend into
    #[arg(long, value_name = "N")]
    pub max_depth: Option<usize>,

    /// Show what would be copied without touching the output folder
    #[arg(short = 'n', long)]
    pub dry_run: bool,

    /// Verbose output (can be repeated: -v, -vv)
    #[arg(short = 'v', long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (only errors are logged)
    #[arg(short = 'q', long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Log line format
    #[arg(long, value_enum, default_value = "text")]
    pub log_format: LogFormat,

    /// End-of-run summary format
    #[arg(long, value_enum, default_value = "text")]
    pub summary: SummaryFormat,
}

impl CliArgs {
    /// Log filter directive implied by -v / -q
    pub fn log_level(&self) -> &'static str {
        if self.quiet {
            return "error";
        }
        match self.verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    }
}

/// Log line format
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// `LEVEL message` lines
    #[default]
    Text,
    /// One JSON object per line
    Json,
}

/// Summary output format
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SummaryFormat {
    /// Human-readable text
    #[default]
    Text,
    /// JSON report
    Json,
    /// No summary
    None,
}

/// Where files without an extension end up
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum NoExtensionPolicy {
    /// Directly in the output root (the empty-named bucket)
    #[default]
    OutputRoot,
    /// In a dedicated bucket folder
    Bucket(String),
}

/// Runtime configuration derived from CLI args
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SortConfig {
    /// Source folder
    pub source: PathBuf,
    /// Output folder
    pub destination: PathBuf,
    /// Concurrency bound for copy tasks
    pub max_concurrent: usize,
    /// Buffer size in bytes
    pub buffer_size: usize,
    /// Placement of files without an extension
    pub no_extension: NoExtensionPolicy,
    /// Copy through a temp file and rename
    pub atomic: bool,
    /// Per-file timeout in seconds
    pub timeout_secs: Option<u64>,
    /// Follow symlinks
    pub follow_symlinks: bool,
    /// Skip hidden entries
    pub skip_hidden: bool,
    /// Max walk depth
    pub max_depth: Option<usize>,
    /// Dry run mode
    pub dry_run: bool,
}

impl Default for SortConfig {
    fn default() -> Self {
        Self {
            source: PathBuf::new(),
            destination: PathBuf::new(),
            max_concurrent: DEFAULT_MAX_CONCURRENT,
            buffer_size: DEFAULT_BUFFER_SIZE,
            no_extension: NoExtensionPolicy::OutputRoot,
            atomic: true,
            timeout_secs: None,
            follow_symlinks: false,
            skip_hidden: false,
            max_depth: None,
            dry_run: false,
        }
    }
}

impl SortConfig {
    /// Create config from CLI arguments
    pub fn from_cli(args: &CliArgs) -> Result<Self, String> {
        let buffer_size = parse_size(&args.buffer_size)
            .map_err(|e| format!("Invalid buffer size: {}", e))?;
        if buffer_size == 0 {
            return Err("Invalid buffer size: must be greater than zero".to_string());
        }

        let no_extension = match &args.no_extension_dir {
            Some(name) => {
                validate_bucket_name(name)?;
                NoExtensionPolicy::Bucket(name.clone())
            }
            None => NoExtensionPolicy::OutputRoot,
        };

        Ok(Self {
            source: args.source_folder.clone(),
            destination: args.output_folder.clone(),
            max_concurrent: args.max_concurrent,
            buffer_size: buffer_size as usize,
            no_extension,
            atomic: !args.in_place,
            timeout_secs: args.timeout,
            follow_symlinks: args.follow_symlinks,
            skip_hidden: args.skip_hidden,
            max_depth: args.max_depth,
            dry_run: args.dry_run,
        })
    }

    /// Concurrency bound with the 0 = default rule applied
    pub fn effective_max_concurrent(&self) -> usize {
        if self.max_concurrent == 0 {
            DEFAULT_MAX_CONCURRENT
        } else {
            self.max_concurrent
        }
    }
}

/// A bucket name must be a single plain path component
fn validate_bucket_name(name: &str) -> Result<(), String> {
    if name.is_empty()
        || name == "."
        || name == ".."
        || name.contains('/')
        || name.contains(std::path::MAIN_SEPARATOR)
    {
        return Err(format!("Invalid no-extension folder name: '{}'", name));
    }
    Ok(())
}

/// Parse human-readable size string to bytes
pub fn parse_size(size: &str) -> Result<u64, String> {
    let size = size.trim().to_uppercase();

    if size.is_empty() {
        return Err("Empty size string".to_string());
    }

    let (num_str, multiplier) = if size.ends_with("GB") || size.ends_with('G') {
        (size.trim_end_matches(|c| c == 'G' || c == 'B'), 1024u64 * 1024 * 1024)
    } else if size.ends_with("MB") || size.ends_with('M') {
        (size.trim_end_matches(|c| c == 'M' || c == 'B'), 1024u64 * 1024)
    } else if size.ends_with("KB") || size.ends_with('K') {
        (size.trim_end_matches(|c| c == 'K' || c == 'B'), 1024u64)
    } else if size.ends_with('B') {
        (size.trim_end_matches('B'), 1u64)
    } else {
        // Assume bytes if no suffix
        (size.as_str(), 1u64)
    };

    let num: f64 = num_str
        .trim()
        .parse()
        .map_err(|_| format!("Invalid number: {}", num_str))?;

    if num < 0.0 || !num.is_finite() {
        return Err(format!("Invalid number: {}", num_str));
    }

    Ok((num * multiplier as f64) as u64)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(extra: &[&str]) -> CliArgs {
        let mut argv = vec!["filesorter", "src", "out"];
        argv.extend_from_slice(extra);
        CliArgs::parse_from(argv)
    }

    #[test]
    fn test_parse_size() {
        assert_eq!(parse_size("1024").unwrap(), 1024);
        assert_eq!(parse_size("1K").unwrap(), 1024);
        assert_eq!(parse_size("64kb").unwrap(), 64 * 1024);
        assert_eq!(parse_size("1M").unwrap(), 1024 * 1024);
        assert_eq!(parse_size("1G").unwrap(), 1024 * 1024 * 1024);
        assert!(parse_size("").is_err());
        assert!(parse_size("lots").is_err());
        assert!(parse_size("-1K").is_err());
    }

    #[test]
    fn test_defaults_from_cli() {
        let config = SortConfig::from_cli(&args(&[])).unwrap();
        assert_eq!(config.source, PathBuf::from("src"));
        assert_eq!(config.destination, PathBuf::from("out"));
        assert_eq!(config.buffer_size, DEFAULT_BUFFER_SIZE);
        assert_eq!(config.no_extension, NoExtensionPolicy::OutputRoot);
        assert!(config.atomic);
        assert_eq!(config.effective_max_concurrent(), DEFAULT_MAX_CONCURRENT);
    }

    #[test]
    fn test_options_from_cli() {
        let config = SortConfig::from_cli(&args(&[
            "-j",
            "8",
            "--no-extension-dir",
            "no_ext",
            "--in-place",
            "--timeout",
            "30",
        ]))
        .unwrap();
        assert_eq!(config.effective_max_concurrent(), 8);
        assert_eq!(config.no_extension, NoExtensionPolicy::Bucket("no_ext".to_string()));
        assert!(!config.atomic);
        assert_eq!(config.timeout_secs, Some(30));
    }

    #[test]
    fn test_rejects_bad_bucket_name() {
        assert!(SortConfig::from_cli(&args(&["--no-extension-dir", "a/b"])).is_err());
        assert!(SortConfig::from_cli(&args(&["--no-extension-dir", ".."])).is_err());
        assert!(SortConfig::from_cli(&args(&["-b", "0"])).is_err());
    }

    #[test]
    fn test_log_level() {
        assert_eq!(args(&[]).log_level(), "info");
        assert_eq!(args(&["-v"]).log_level(), "debug");
        assert_eq!(args(&["-vv"]).log_level(), "trace");
        assert_eq!(args(&["-q"]).log_level(), "error");
    }

    #[test]
    fn test_missing_positionals_rejected() {
        assert!(CliArgs::try_parse_from(["filesorter", "only-source"]).is_err());
    }
}
