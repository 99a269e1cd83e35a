use anyhow::Result;
use cgm_cli::{Cli, Commands};
use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::FmtSubscriber;

mod commands;

use commands::merge::MergeArgs;

fn main() {
    let cli = Cli::parse();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(cli.log_level)
        .with_writer(std::io::stderr)
        .finish();
    if let Err(err) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("setting default subscriber failed: {err}");
    }

    if let Err(err) = run(&cli.command) {
        error!("{err:#}");
        std::process::exit(1);
    }
}

fn run(command: &Commands) -> Result<()> {
    match command {
        Commands::Merge {
            fragments,
            out,
            config,
            strict,
            voltage_check,
            id,
            report,
        } => {
            info!("Merging {} fragment(s)", fragments.len());
            commands::merge::handle(MergeArgs {
                fragments,
                out,
                config: config.as_deref(),
                strict: *strict,
                voltage_check: *voltage_check,
                id: id.as_deref(),
                report: *report,
            })
        }
        Commands::Inspect { network } => commands::inspect::handle(network),
    }
}
