//! FileSorter CLI - Asynchronous Sorting of Files by Extension
//!
//! Copies every file under SOURCE_FOLDER into OUTPUT_FOLDER/<extension>/.

use clap::Parser;
use filesorter::config::{CliArgs, LogFormat, SortConfig, SummaryFormat};
use filesorter::core::SortEngine;
use filesorter::error::{FileSorterError, Result};
use tracing_subscriber::EnvFilter;

fn main() {
    // Parse CLI arguments
    let args = CliArgs::parse();

    // Initialize logging
    init_logging(&args);

    // Handle result
    if let Err(e) = run(args) {
        tracing::error!("{}", e);
        std::process::exit(1);
    }
}

fn init_logging(args: &CliArgs) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(args.log_level()));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr);

    match args.log_format {
        LogFormat::Text => builder.without_time().init(),
        LogFormat::Json => builder.json().init(),
    }
}

fn run(args: CliArgs) -> Result<()> {
    // Build configuration
    let config = SortConfig::from_cli(&args).map_err(FileSorterError::ConfigError)?;
    let engine = SortEngine::new(config);

    if engine.config().dry_run {
        tracing::info!("Dry run: no files will be copied");
    }

    tracing::debug!("Configuration: {:?}", engine.config());

    // One thread drives every copy task
    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| FileSorterError::config(format!("Failed to create runtime: {}", e)))?;

    let report = rt.block_on(engine.execute())?;

    // Print results
    match args.summary {
        SummaryFormat::Text if !args.quiet => report.print_summary(),
        SummaryFormat::Json => println!("{}", report.to_json()?),
        _ => {}
    }

    if !report.is_success() {
        tracing::warn!(
            "{} of {} files could not be copied",
            report.files_failed,
            report.files_discovered
        );
    }

    Ok(())
}
