pub mod report;

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Command-line arguments for dicomsort
#[derive(Parser, Debug)]
#[command(name = "dicomsort")]
#[command(about = "Sort a study's DICOM files into the archive by their metadata")]
#[command(version)]
pub struct Cli {
    /// Directory holding one completed study's files
    #[arg(value_name = "DIRECTORY")]
    pub directory: PathBuf,

    /// Metadata dump tool command or path
    #[arg(long, default_value = "dcmdump", value_name = "TOOL")]
    pub dump_tool: PathBuf,

    /// Region policy table file
    #[arg(long, default_value = "/etc/dicomsort/policy.conf", value_name = "FILE")]
    pub policy: PathBuf,

    /// Lock file serializing concurrent runs
    #[arg(long, default_value = "/var/lock/dicomsort.lock", value_name = "FILE")]
    pub lock_file: PathBuf,

    /// Output format for the run summary
    #[arg(short, long, default_value = "text")]
    pub format: OutputFormat,

    /// Verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

/// Output format options
#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text format
    Text,
    /// JSON format
    Json,
}
