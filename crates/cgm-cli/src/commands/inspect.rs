use std::io::{self, Write};
use std::path::Path;

use anyhow::Result;
use cgm_core::graph_utils;
use cgm_io::parse_network;
use tabwriter::TabWriter;

pub fn handle(path: &Path) -> Result<()> {
    let result = parse_network(path)?;
    let network = &result.network;

    println!("Network {} ({}):", network.id, network.source_format);
    let stats = network.stats();
    println!("  Substations     : {}", stats.num_substations);
    println!("  Voltage levels  : {}", stats.num_voltage_levels);
    println!("  Buses           : {}", stats.num_buses);
    println!("  Lines           : {}", stats.num_lines);
    println!("  Dangling lines  : {}", stats.num_dangling_lines);
    println!("  Pairable inside : {}", stats.num_paired_boundaries);

    if !network.dangling_lines().is_empty() {
        println!();
        let mut writer = TabWriter::new(io::stdout());
        writeln!(writer, "STUB\tBOUNDARY\tVOLTAGE LEVEL\tCONNECTED")?;
        for dl in network.dangling_lines() {
            writeln!(
                writer,
                "{}\t{}\t{}\t{}",
                dl.id,
                dl.boundary_id().unwrap_or("-"),
                dl.terminal.voltage_level,
                dl.terminal.connected
            )?;
        }
        writer.flush()?;
    }

    let graph = graph_utils::graph_stats(network);
    let analysis = graph_utils::find_islands(network);
    println!();
    println!(
        "Topology: {} connection points, {} edges, degree [min/avg/max] {}/{:.2}/{}",
        graph.node_count, graph.edge_count, graph.min_degree, graph.avg_degree, graph.max_degree
    );
    for summary in &analysis.islands {
        println!(
            "Island {}: {} connection point(s)",
            summary.island_id, summary.node_count
        );
    }

    println!();
    println!("Validation: {}", result.diagnostics.summary());
    for issue in &result.diagnostics.issues {
        println!("  {issue}");
    }
    Ok(())
}
