use cgm_merge::VoltageCheck;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "cgm", author, version, about = "Common grid model assembly", long_about = None)]
pub struct Cli {
    /// Set the logging level
    #[arg(long, default_value = "info")]
    pub log_level: tracing::Level,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Merge network fragments into one model, pairing boundary stubs
    Merge {
        /// Fragment documents, in merge order
        #[arg(required = true)]
        fragments: Vec<PathBuf>,
        /// Where to write the merged network
        #[arg(short, long)]
        out: PathBuf,
        /// Merge options file (toml, yaml or json)
        #[arg(long)]
        config: Option<PathBuf>,
        /// Reject dangling lines without a boundary identifier
        #[arg(long)]
        strict: bool,
        /// Nominal voltage check for paired stubs: ignore, warn or reject
        #[arg(long)]
        voltage_check: Option<VoltageCheck>,
        /// Id of the merged network
        #[arg(long)]
        id: Option<String>,
        /// Print the tie-line characteristics of merged boundaries
        #[arg(long)]
        report: bool,
    },
    /// Print statistics, boundary stubs, islands and validation findings
    Inspect {
        /// Network document
        network: PathBuf,
    },
}
