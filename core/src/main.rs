use clap::Parser;
use dicomsort_core::cli::report::TextReport;
use dicomsort_core::cli::{Cli, OutputFormat};
use dicomsort_core::lock::{FileRunLock, RunLock};
use dicomsort_core::placement::SystemOwnership;
use dicomsort_core::routing::{PolicyTable, RoutingConfig};
use dicomsort_core::{DcmdumpSource, SortError, StudySorter};
use log::{error, info};
use std::process;

// Exit codes, one per failure category
const EXIT_PARTIAL: i32 = 1;
const EXIT_CONFIG: i32 = 3;
const EXIT_LOCK: i32 = 4;
const EXIT_TOOL_MISSING: i32 = 5;
const EXIT_PLACEMENT: i32 = 6;

fn main() {
    let cli = Cli::parse();

    setup_logging(cli.verbose);

    if !cli.directory.is_dir() {
        eprintln!("Error: {} is not a directory", cli.directory.display());
        process::exit(EXIT_CONFIG);
    }

    let source = DcmdumpSource::new(&cli.dump_tool);
    if let Err(e) = source.probe() {
        eprintln!("Error: {}", e);
        process::exit(EXIT_TOOL_MISSING);
    }

    let policy = match PolicyTable::load(&cli.policy) {
        Ok(policy) => policy,
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(EXIT_CONFIG);
        }
    };
    info!(
        "loaded {} policy entries from {}",
        policy.len(),
        cli.policy.display()
    );

    // serialize against other runs before touching anything shared
    let mut lock = FileRunLock::new(&cli.lock_file);
    if let Err(e) = lock.acquire() {
        eprintln!("Error: {}", e);
        process::exit(EXIT_LOCK);
    }

    let config = RoutingConfig::default();
    let ownership = SystemOwnership;
    let sorter = StudySorter::new(&source, &policy, &config, &ownership);

    let summary = match sorter.sort_study(&cli.directory) {
        Ok(summary) => summary,
        Err(e) => {
            error!("run aborted: {}", e);
            eprintln!("Error: {}", e);
            process::exit(exit_code_for(&e));
        }
    };

    output_summary(&summary, cli.format);

    if !summary.is_clean() {
        process::exit(EXIT_PARTIAL);
    }
}

fn setup_logging(verbose: bool) {
    if verbose {
        env_logger::Builder::from_default_env()
            .filter_level(log::LevelFilter::Debug)
            .init();
    } else {
        env_logger::Builder::from_default_env()
            .filter_level(log::LevelFilter::Info)
            .init();
    }
}

fn exit_code_for(error: &SortError) -> i32 {
    match error {
        SortError::Config(_) => EXIT_CONFIG,
        SortError::Lock(_) => EXIT_LOCK,
        SortError::ToolMissing(_) => EXIT_TOOL_MISSING,
        _ => EXIT_PLACEMENT,
    }
}

fn output_summary(summary: &dicomsort_core::RunSummary, format: OutputFormat) {
    match format {
        OutputFormat::Text => {
            println!("{}", TextReport::new(summary));
        }
        OutputFormat::Json => {
            #[cfg(feature = "json")]
            {
                match dicomsort_core::cli::report::json_report(summary) {
                    Ok(json) => println!("{}", json),
                    Err(e) => {
                        error!("Failed to serialize to JSON: {}", e);
                        eprintln!("Error: Failed to serialize to JSON: {}", e);
                        process::exit(EXIT_CONFIG);
                    }
                }
            }
            #[cfg(not(feature = "json"))]
            {
                eprintln!("Error: JSON output requires the 'json' feature");
                eprintln!("Rebuild with: cargo build --features json");
                process::exit(EXIT_CONFIG);
            }
        }
    }
}
