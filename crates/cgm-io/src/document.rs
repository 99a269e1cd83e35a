use std::{fs, path::Path};

use anyhow::{anyhow, Context, Result};
use cgm_core::{DanglingLine, Diagnostics, Line, Network, Substation, VoltageLevel};
use serde::{Deserialize, Serialize};

/// On-disk form of a [`Network`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkDocument {
    pub id: String,
    #[serde(default = "default_source_format")]
    pub source_format: String,
    #[serde(default)]
    pub substations: Vec<Substation>,
    #[serde(default)]
    pub voltage_levels: Vec<VoltageLevel>,
    #[serde(default)]
    pub lines: Vec<Line>,
    #[serde(default)]
    pub dangling_lines: Vec<DanglingLine>,
}

fn default_source_format() -> String {
    "json".to_string()
}

/// Network plus the validation findings of the loaded document
#[derive(Debug)]
pub struct ImportResult {
    pub network: Network,
    pub diagnostics: Diagnostics,
}

pub fn to_document(network: &Network) -> NetworkDocument {
    NetworkDocument {
        id: network.id.clone(),
        source_format: network.source_format.clone(),
        substations: network.substations().to_vec(),
        voltage_levels: network.voltage_levels().to_vec(),
        lines: network.lines().to_vec(),
        dangling_lines: network.dangling_lines().to_vec(),
    }
}

/// Rebuild a network from a document.
///
/// Substations go first, then voltage levels (with their buses), lines and
/// dangling lines, so every reference points at an entity already present.
/// Missing names default to the entity id.
pub fn network_from_document(document: NetworkDocument) -> Result<Network> {
    let mut network = Network::new(document.id, document.source_format);

    for mut substation in document.substations {
        default_name(&mut substation.name, &substation.id);
        let id = substation.id.clone();
        network
            .add_substation(substation)
            .with_context(|| format!("adding substation '{id}'"))?;
    }
    for mut vl in document.voltage_levels {
        default_name(&mut vl.name, &vl.id);
        for bus in &mut vl.buses {
            default_name(&mut bus.name, &bus.id);
        }
        let id = vl.id.clone();
        network
            .add_voltage_level(vl)
            .with_context(|| format!("adding voltage level '{id}'"))?;
    }
    for mut line in document.lines {
        default_name(&mut line.name, &line.id);
        let id = line.id.clone();
        network
            .add_line(line)
            .with_context(|| format!("adding line '{id}'"))?;
    }
    for mut dl in document.dangling_lines {
        default_name(&mut dl.name, &dl.id);
        let id = dl.id.clone();
        network
            .add_dangling_line(dl)
            .with_context(|| format!("adding dangling line '{id}'"))?;
    }
    Ok(network)
}

fn default_name(name: &mut String, id: &str) {
    if name.is_empty() {
        *name = id.to_string();
    }
}

/// Parse a network document from a JSON string.
pub fn parse_network_string(content: &str) -> Result<ImportResult> {
    let document: NetworkDocument =
        serde_json::from_str(content).with_context(|| "parsing network JSON")?;
    let network = network_from_document(document)?;
    let mut diagnostics = Diagnostics::new();
    network.validate_into(&mut diagnostics);
    Ok(ImportResult {
        network,
        diagnostics,
    })
}

/// Parse a network document from a path.
pub fn parse_network<P: AsRef<Path>>(path: P) -> Result<ImportResult> {
    let content = fs::read_to_string(path.as_ref())
        .with_context(|| format!("reading network file: {:?}", path.as_ref()))?;
    parse_network_string(&content).with_context(|| format!("loading {:?}", path.as_ref()))
}

/// Load a network, failing if validation reported errors.
pub fn load_network<P: AsRef<Path>>(path: P) -> Result<Network> {
    let result = parse_network(path.as_ref())?;
    if result.diagnostics.has_errors() {
        return Err(anyhow!(
            "{:?} failed validation: {}",
            path.as_ref(),
            result
                .diagnostics
                .errors()
                .map(|issue| issue.to_string())
                .collect::<Vec<_>>()
                .join("; ")
        ));
    }
    Ok(result.network)
}

/// Write a network as pretty-printed JSON.
pub fn write_network<P: AsRef<Path>>(network: &Network, path: P) -> Result<()> {
    let json = serde_json::to_string_pretty(&to_document(network))
        .with_context(|| format!("serializing network '{}'", network.id))?;
    fs::write(path.as_ref(), json)
        .with_context(|| format!("writing network file: {:?}", path.as_ref()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgm_core::{Connection, Kilovolts, TopologyKind};

    const FRAGMENT: &str = r#"{
        "id": "BE",
        "substations": [{ "id": "S1", "country": "BE" }],
        "voltage_levels": [
            { "id": "VL1", "substation": "S1", "nominal_v": 380.0,
              "topology": "bus_breaker", "buses": [{ "id": "B1" }] },
            { "id": "VL2", "substation": "S1", "nominal_v": 220.0,
              "topology": "node_breaker" }
        ],
        "lines": [
            { "id": "L12", "r": 0.5, "x": 5.0,
              "terminal1": { "voltage_level": "VL1", "bus": "B1", "connected": true },
              "terminal2": { "voltage_level": "VL2", "node": 3, "connected": false } }
        ],
        "dangling_lines": [
            { "id": "DL1", "r": 1.0, "x": 10.0, "b": 0.0001, "boundary": "XBE_NL",
              "terminal": { "voltage_level": "VL2", "node": 7, "connected": true } }
        ]
    }"#;

    #[test]
    fn test_parse_fragment() {
        let result = parse_network_string(FRAGMENT).unwrap();
        let network = result.network;
        assert_eq!(network.source_format, "json");
        assert_eq!(network.substation("S1").unwrap().country.as_deref(), Some("BE"));
        assert_eq!(network.substation("S1").unwrap().name, "S1");
        let vl = network.voltage_level("VL2").unwrap();
        assert_eq!(vl.topology, TopologyKind::NodeBreaker);
        assert_eq!(vl.nominal_v, Kilovolts(220.0));
        assert_eq!(network.bus("B1").unwrap().name, "B1");
        let line = network.line("L12").unwrap();
        assert_eq!(line.terminal2.connection, Connection::Node(3));
        assert!(!line.terminal2.connected);
        let dl = network.dangling_line("DL1").unwrap();
        assert_eq!(dl.boundary_id(), Some("XBE_NL"));
        assert_eq!(dl.terminal.connection, Connection::Node(7));
        assert!(!result.diagnostics.has_errors());
    }

    #[test]
    fn test_unknown_bus_reported_with_entity() {
        let content = FRAGMENT.replace(r#""bus": "B1""#, r#""bus": "B9""#);
        let err = parse_network_string(&content).unwrap_err();
        let message = format!("{err:#}");
        assert!(message.contains("adding line 'L12'"), "{message}");
        assert!(message.contains("B9"), "{message}");
    }

    #[test]
    fn test_malformed_json() {
        let err = parse_network_string("{ \"id\": ").unwrap_err();
        assert!(err.to_string().contains("parsing network JSON"));
    }

    #[test]
    fn test_document_serialization_flattens_connection() {
        let network = parse_network_string(FRAGMENT).unwrap().network;
        let json = serde_json::to_value(to_document(&network)).unwrap();
        let terminal = &json["dangling_lines"][0]["terminal"];
        assert_eq!(terminal["node"], 7);
        assert_eq!(terminal["voltage_level"], "VL2");
        assert!(terminal.get("connection").is_none());
    }
}
