use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use cgm_cli::config::load_options;
use cgm_core::Network;
use cgm_io::{load_network, write_network};
use cgm_merge::{tie_line_report, MergeOptions, MergeReport, Merger, VoltageCheck};
use tabwriter::TabWriter;
use tracing::{info, warn};

pub struct MergeArgs<'a> {
    pub fragments: &'a [PathBuf],
    pub out: &'a Path,
    pub config: Option<&'a Path>,
    pub strict: bool,
    pub voltage_check: Option<VoltageCheck>,
    pub id: Option<&'a str>,
    pub report: bool,
}

pub fn handle(args: MergeArgs<'_>) -> Result<()> {
    let mut options = match args.config {
        Some(path) => load_options(path)?,
        None => MergeOptions::default(),
    };
    if args.strict {
        options.strict_identifiers = true;
    }
    if let Some(check) = args.voltage_check {
        options.nominal_voltage_check = check;
    }
    if let Some(id) = args.id {
        options.network_id = id.to_string();
    }

    let fragments = args
        .fragments
        .iter()
        .map(|path| {
            info!("Loading fragment {}", path.display());
            load_network(path)
        })
        .collect::<Result<Vec<_>>>()?;

    let outcome = Merger::new(options)
        .merge(fragments)
        .context("merging fragments")?;
    for issue in outcome.report.diagnostics.warnings() {
        warn!("{issue}");
    }

    write_network(&outcome.network, args.out)?;
    info!(
        "Merged network written to {} ({})",
        args.out.display(),
        outcome.report.summary()
    );
    println!(
        "Merged {} into {}: {}",
        outcome.report.fragment_ids.join(", "),
        outcome.network.id,
        outcome.network.stats()
    );

    if args.report {
        print_tie_lines(&outcome.network, &outcome.report)?;
    }
    Ok(())
}

fn print_tie_lines(network: &Network, report: &MergeReport) -> Result<()> {
    let mut writer = TabWriter::new(io::stdout());
    writeln!(writer, "BOUNDARY\tLINE 1\tLINE 2\tR (Ω)\tX (Ω)\tG1 (S)\tB1 (S)\tG2 (S)\tB2 (S)")?;
    for tie in tie_line_report(network, report) {
        writeln!(
            writer,
            "{}\t{}\t{}\t{:.4}\t{:.4}\t{:.6e}\t{:.6e}\t{:.6e}\t{:.6e}",
            tie.boundary,
            tie.lines[0],
            tie.lines[1],
            tie.r.value(),
            tie.x.value(),
            tie.g1.value(),
            tie.b1.value(),
            tie.g2.value(),
            tie.b2.value()
        )?;
    }
    writer.flush()?;
    for stub in &report.unmatched {
        println!(
            "Unmatched: {} ({}) in {}",
            stub.stub,
            stub.identifier.as_deref().unwrap_or("no boundary"),
            report.fragment_ids[stub.fragment]
        );
    }
    Ok(())
}
