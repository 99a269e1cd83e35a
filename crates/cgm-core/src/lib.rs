//! # cgm-core: Network Model Core
//!
//! Provides the network model shared by every stage of common grid model
//! assembly: individually modelled grid fragments are loaded into a
//! [`Network`], merged by `cgm-merge`, and the merged result is again a
//! [`Network`].
//!
//! ## Design Philosophy
//!
//! A network is a set of uniquely identified entities:
//! - **Substations** grouping one or more voltage levels
//! - **Voltage levels** with a nominal voltage and a topology kind
//!   ([`TopologyKind::NodeBreaker`] connection points are numbered nodes,
//!   [`TopologyKind::BusBreaker`] connection points are named [`Bus`]es)
//! - **Lines** joining two [`Terminal`]s
//! - **Dangling lines** (boundary stubs): half-lines with a single terminal,
//!   tagged with the boundary identifier of the connection point they lead to
//!
//! Entities are stored in insertion order so that every traversal of a
//! network, and therefore every merge result, is deterministic. An identifier
//! index guarantees that no two entities share an id.
//!
//! ## Quick Start
//!
//! ```rust
//! use cgm_core::*;
//!
//! let mut network = Network::new("BE", "json");
//! network.add_substation(Substation::new("S1")).unwrap();
//! network
//!     .add_voltage_level(VoltageLevel::new("VL1", "S1", Kilovolts(380.0), TopologyKind::BusBreaker))
//!     .unwrap();
//! network.add_bus("VL1", Bus::new("B1")).unwrap();
//!
//! network
//!     .add_dangling_line(
//!         DanglingLine::new("L1", Terminal::bus("VL1", "B1", true))
//!             .with_impedance(Ohms(1.0), Ohms(2.0))
//!             .with_boundary("X1"),
//!     )
//!     .unwrap();
//!
//! assert_eq!(network.stats().num_dangling_lines, 1);
//! ```
//!
//! ## Modules
//!
//! - [`adder`] - Plain-data line construction requests ([`LineAdder`])
//! - [`diagnostics`] - Validation and merge diagnostic reporting
//! - [`graph_utils`] - Topological analysis (connection-point graph, islands)
//! - [`units`] - Unit newtypes for voltages, impedances and admittances

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

pub mod adder;
pub mod diagnostics;
pub mod error;
pub mod graph_utils;
pub mod units;

pub use adder::LineAdder;
pub use diagnostics::{DiagnosticIssue, Diagnostics, Severity};
pub use error::{CgmError, CgmResult};
pub use graph_utils::*;
pub use units::{Kilovolts, Megavars, Megawatts, Ohms, Siemens};

/// How a voltage level records its connection points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TopologyKind {
    /// Connection points are numbered nodes joined by switches
    NodeBreaker,
    /// Connection points are named buses
    BusBreaker,
}

impl TopologyKind {
    pub fn label(&self) -> &'static str {
        match self {
            TopologyKind::NodeBreaker => "node-breaker",
            TopologyKind::BusBreaker => "bus-breaker",
        }
    }
}

/// Connection point of a terminal inside its voltage level.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Connection {
    /// Node index in a node-breaker voltage level
    Node(u32),
    /// Bus id in a bus-breaker voltage level. For a disconnected terminal
    /// this is the bus the terminal can be connected to.
    Bus(String),
}

impl Connection {
    pub fn label(&self) -> &'static str {
        match self {
            Connection::Node(_) => "node",
            Connection::Bus(_) => "bus",
        }
    }

    /// Topology kind a voltage level must have to host this connection
    pub fn required_topology(&self) -> TopologyKind {
        match self {
            Connection::Node(_) => TopologyKind::NodeBreaker,
            Connection::Bus(_) => TopologyKind::BusBreaker,
        }
    }
}

/// One end of a line or dangling line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Terminal {
    pub voltage_level: String,
    #[serde(flatten)]
    pub connection: Connection,
    pub connected: bool,
}

impl Terminal {
    pub fn node(voltage_level: impl Into<String>, node: u32, connected: bool) -> Self {
        Self {
            voltage_level: voltage_level.into(),
            connection: Connection::Node(node),
            connected,
        }
    }

    pub fn bus(voltage_level: impl Into<String>, bus: impl Into<String>, connected: bool) -> Self {
        Self {
            voltage_level: voltage_level.into(),
            connection: Connection::Bus(bus.into()),
            connected,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Substation {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    /// Transmission system operator owning the substation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tso: Option<String>,
}

impl Substation {
    pub fn new(id: impl Into<String>) -> Self {
        let id = id.into();
        Self {
            name: id.clone(),
            id,
            country: None,
            tso: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bus {
    pub id: String,
    #[serde(default)]
    pub name: String,
}

impl Bus {
    pub fn new(id: impl Into<String>) -> Self {
        let id = id.into();
        Self {
            name: id.clone(),
            id,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VoltageLevel {
    pub id: String,
    #[serde(default)]
    pub name: String,
    /// Owning substation id
    pub substation: String,
    pub nominal_v: Kilovolts,
    pub topology: TopologyKind,
    /// Buses of a bus-breaker voltage level (always empty for node-breaker)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub buses: Vec<Bus>,
}

impl VoltageLevel {
    pub fn new(
        id: impl Into<String>,
        substation: impl Into<String>,
        nominal_v: Kilovolts,
        topology: TopologyKind,
    ) -> Self {
        let id = id.into();
        Self {
            name: id.clone(),
            id,
            substation: substation.into(),
            nominal_v,
            topology,
            buses: Vec::new(),
        }
    }

    pub fn bus(&self, id: &str) -> Option<&Bus> {
        self.buses.iter().find(|bus| bus.id == id)
    }
}

/// Two-terminal line with a pi-model: series R/X and a shunt G/B per side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Line {
    pub id: String,
    #[serde(default)]
    pub name: String,
    pub terminal1: Terminal,
    pub terminal2: Terminal,
    pub r: Ohms,
    pub x: Ohms,
    #[serde(default)]
    pub g1: Siemens,
    #[serde(default)]
    pub b1: Siemens,
    #[serde(default)]
    pub g2: Siemens,
    #[serde(default)]
    pub b2: Siemens,
}

/// Boundary stub: a half-line whose far end is an external connection point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DanglingLine {
    pub id: String,
    #[serde(default)]
    pub name: String,
    pub terminal: Terminal,
    pub r: Ohms,
    pub x: Ohms,
    #[serde(default)]
    pub g: Siemens,
    #[serde(default)]
    pub b: Siemens,
    /// Constant active power consumed at the open end
    #[serde(default)]
    pub p0: Megawatts,
    /// Constant reactive power consumed at the open end
    #[serde(default)]
    pub q0: Megavars,
    /// Boundary identifier (external connection marker) shared with the
    /// matching stub of the neighbouring fragment
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub boundary: Option<String>,
}

impl DanglingLine {
    pub fn new(id: impl Into<String>, terminal: Terminal) -> Self {
        let id = id.into();
        Self {
            name: id.clone(),
            id,
            terminal,
            r: Ohms::ZERO,
            x: Ohms::ZERO,
            g: Siemens::ZERO,
            b: Siemens::ZERO,
            p0: Megawatts::ZERO,
            q0: Megavars::ZERO,
            boundary: None,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_impedance(mut self, r: Ohms, x: Ohms) -> Self {
        self.r = r;
        self.x = x;
        self
    }

    pub fn with_shunt(mut self, g: Siemens, b: Siemens) -> Self {
        self.g = g;
        self.b = b;
        self
    }

    pub fn with_boundary(mut self, boundary: impl Into<String>) -> Self {
        self.boundary = Some(boundary.into());
        self
    }

    /// Boundary identifier, treating an empty marker as absent.
    pub fn boundary_id(&self) -> Option<&str> {
        self.boundary.as_deref().filter(|id| !id.trim().is_empty())
    }
}

/// Kind of entity an identifier refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Substation,
    VoltageLevel,
    Bus,
    Line,
    DanglingLine,
}

impl EntityKind {
    pub fn label(&self) -> &'static str {
        match self {
            EntityKind::Substation => "substation",
            EntityKind::VoltageLevel => "voltage level",
            EntityKind::Bus => "bus",
            EntityKind::Line => "line",
            EntityKind::DanglingLine => "dangling line",
        }
    }
}

// Position of an entity in its storage vector. Dangling lines are the only
// removable entities, so their position is looked up on demand.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Slot {
    Substation(usize),
    VoltageLevel(usize),
    Bus(usize),
    Line(usize),
    DanglingLine,
}

impl Slot {
    fn kind(&self) -> EntityKind {
        match self {
            Slot::Substation(_) => EntityKind::Substation,
            Slot::VoltageLevel(_) => EntityKind::VoltageLevel,
            Slot::Bus(_) => EntityKind::Bus,
            Slot::Line(_) => EntityKind::Line,
            Slot::DanglingLine => EntityKind::DanglingLine,
        }
    }

    fn shifted(self, offsets: &SlotOffsets) -> Self {
        match self {
            Slot::Substation(pos) => Slot::Substation(pos + offsets.substations),
            Slot::VoltageLevel(pos) => Slot::VoltageLevel(pos + offsets.voltage_levels),
            Slot::Bus(vl) => Slot::Bus(vl + offsets.voltage_levels),
            Slot::Line(pos) => Slot::Line(pos + offsets.lines),
            Slot::DanglingLine => Slot::DanglingLine,
        }
    }
}

struct SlotOffsets {
    substations: usize,
    voltage_levels: usize,
    lines: usize,
}

/// A network model: a fragment loaded from one modelling authority, or the
/// merged common grid model.
#[derive(Debug, Clone, Default)]
pub struct Network {
    pub id: String,
    pub source_format: String,
    substations: Vec<Substation>,
    voltage_levels: Vec<VoltageLevel>,
    lines: Vec<Line>,
    dangling_lines: Vec<DanglingLine>,
    index: HashMap<String, Slot>,
}

impl Network {
    pub fn new(id: impl Into<String>, source_format: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            source_format: source_format.into(),
            ..Self::default()
        }
    }

    // =========================================================================
    // Construction
    // =========================================================================

    pub fn add_substation(&mut self, substation: Substation) -> CgmResult<()> {
        self.ensure_free(&substation.id)?;
        self.index.insert(
            substation.id.clone(),
            Slot::Substation(self.substations.len()),
        );
        self.substations.push(substation);
        Ok(())
    }

    /// Add a voltage level to an existing substation. Buses already listed in
    /// the voltage level are registered with it.
    pub fn add_voltage_level(&mut self, voltage_level: VoltageLevel) -> CgmResult<()> {
        self.ensure_free(&voltage_level.id)?;
        if self.substation(&voltage_level.substation).is_none() {
            return Err(CgmError::UnknownReference {
                kind: "substation",
                id: voltage_level.substation.clone(),
                referrer: voltage_level.id.clone(),
            });
        }
        if voltage_level.topology == TopologyKind::NodeBreaker && !voltage_level.buses.is_empty()
        {
            return Err(CgmError::Validation(format!(
                "node-breaker voltage level '{}' cannot own buses",
                voltage_level.id
            )));
        }
        for (i, bus) in voltage_level.buses.iter().enumerate() {
            self.ensure_free(&bus.id)?;
            if bus.id == voltage_level.id
                || voltage_level.buses[..i].iter().any(|other| other.id == bus.id)
            {
                return Err(CgmError::DuplicateId(bus.id.clone()));
            }
        }

        let pos = self.voltage_levels.len();
        self.index
            .insert(voltage_level.id.clone(), Slot::VoltageLevel(pos));
        for bus in &voltage_level.buses {
            self.index.insert(bus.id.clone(), Slot::Bus(pos));
        }
        self.voltage_levels.push(voltage_level);
        Ok(())
    }

    /// Add a bus to an existing bus-breaker voltage level.
    pub fn add_bus(&mut self, voltage_level: &str, bus: Bus) -> CgmResult<()> {
        self.ensure_free(&bus.id)?;
        let pos = match self.index.get(voltage_level) {
            Some(Slot::VoltageLevel(pos)) => *pos,
            _ => {
                return Err(CgmError::UnknownReference {
                    kind: "voltage level",
                    id: voltage_level.to_string(),
                    referrer: bus.id,
                })
            }
        };
        let vl = &mut self.voltage_levels[pos];
        if vl.topology != TopologyKind::BusBreaker {
            return Err(CgmError::TopologyMismatch {
                entity: bus.id,
                voltage_level: vl.id.clone(),
                connection: "bus",
                topology: vl.topology.label(),
            });
        }
        self.index.insert(bus.id.clone(), Slot::Bus(pos));
        vl.buses.push(bus);
        Ok(())
    }

    pub fn add_line(&mut self, line: Line) -> CgmResult<()> {
        self.ensure_free(&line.id)?;
        self.check_terminal(&line.id, &line.terminal1)?;
        self.check_terminal(&line.id, &line.terminal2)?;
        self.index
            .insert(line.id.clone(), Slot::Line(self.lines.len()));
        self.lines.push(line);
        Ok(())
    }

    pub fn add_dangling_line(&mut self, dangling_line: DanglingLine) -> CgmResult<()> {
        self.ensure_free(&dangling_line.id)?;
        self.check_terminal(&dangling_line.id, &dangling_line.terminal)?;
        self.index
            .insert(dangling_line.id.clone(), Slot::DanglingLine);
        self.dangling_lines.push(dangling_line);
        Ok(())
    }

    /// Detach a dangling line from the network and hand it back.
    pub fn remove_dangling_line(&mut self, id: &str) -> Option<DanglingLine> {
        if self.index.get(id) != Some(&Slot::DanglingLine) {
            return None;
        }
        let pos = self.dangling_lines.iter().position(|dl| dl.id == id)?;
        self.index.remove(id);
        Some(self.dangling_lines.remove(pos))
    }

    /// Move every entity of `other` into this network.
    ///
    /// All identifiers of `other` are checked first; on a collision this
    /// network is left untouched and the first colliding identifier (in
    /// `other`'s storage order) is reported.
    pub fn absorb(&mut self, other: Network) -> CgmResult<()> {
        if let Some(id) = other.identifiers().find(|id| self.index.contains_key(*id)) {
            return Err(CgmError::DuplicateId(id.to_string()));
        }

        let offsets = SlotOffsets {
            substations: self.substations.len(),
            voltage_levels: self.voltage_levels.len(),
            lines: self.lines.len(),
        };
        self.index.extend(
            other
                .index
                .into_iter()
                .map(|(id, slot)| (id, slot.shifted(&offsets))),
        );
        self.substations.extend(other.substations);
        self.voltage_levels.extend(other.voltage_levels);
        self.lines.extend(other.lines);
        self.dangling_lines.extend(other.dangling_lines);
        Ok(())
    }

    fn ensure_free(&self, id: &str) -> CgmResult<()> {
        if id.trim().is_empty() {
            return Err(CgmError::Validation("entity identifier is empty".into()));
        }
        if self.index.contains_key(id) {
            return Err(CgmError::DuplicateId(id.to_string()));
        }
        Ok(())
    }

    fn check_terminal(&self, entity: &str, terminal: &Terminal) -> CgmResult<()> {
        let vl = self
            .voltage_level(&terminal.voltage_level)
            .ok_or_else(|| CgmError::UnknownReference {
                kind: "voltage level",
                id: terminal.voltage_level.clone(),
                referrer: entity.to_string(),
            })?;
        if terminal.connection.required_topology() != vl.topology {
            return Err(CgmError::TopologyMismatch {
                entity: entity.to_string(),
                voltage_level: vl.id.clone(),
                connection: terminal.connection.label(),
                topology: vl.topology.label(),
            });
        }
        if let Connection::Bus(bus) = &terminal.connection {
            if vl.bus(bus).is_none() {
                return Err(CgmError::UnknownReference {
                    kind: "bus",
                    id: bus.clone(),
                    referrer: entity.to_string(),
                });
            }
        }
        Ok(())
    }

    // =========================================================================
    // Queries
    // =========================================================================

    pub fn substations(&self) -> &[Substation] {
        &self.substations
    }

    pub fn substation(&self, id: &str) -> Option<&Substation> {
        match self.index.get(id) {
            Some(Slot::Substation(pos)) => self.substations.get(*pos),
            _ => None,
        }
    }

    pub fn voltage_levels(&self) -> &[VoltageLevel] {
        &self.voltage_levels
    }

    pub fn voltage_level(&self, id: &str) -> Option<&VoltageLevel> {
        match self.index.get(id) {
            Some(Slot::VoltageLevel(pos)) => self.voltage_levels.get(*pos),
            _ => None,
        }
    }

    /// All buses of all bus-breaker voltage levels, in storage order.
    pub fn buses(&self) -> impl Iterator<Item = &Bus> {
        self.voltage_levels.iter().flat_map(|vl| vl.buses.iter())
    }

    pub fn bus(&self, id: &str) -> Option<&Bus> {
        match self.index.get(id) {
            Some(Slot::Bus(vl)) => self.voltage_levels.get(*vl).and_then(|vl| vl.bus(id)),
            _ => None,
        }
    }

    pub fn lines(&self) -> &[Line] {
        &self.lines
    }

    pub fn line(&self, id: &str) -> Option<&Line> {
        match self.index.get(id) {
            Some(Slot::Line(pos)) => self.lines.get(*pos),
            _ => None,
        }
    }

    pub fn dangling_lines(&self) -> &[DanglingLine] {
        &self.dangling_lines
    }

    pub fn dangling_line(&self, id: &str) -> Option<&DanglingLine> {
        match self.index.get(id) {
            Some(Slot::DanglingLine) => self.dangling_lines.iter().find(|dl| dl.id == id),
            _ => None,
        }
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    pub fn entity_kind(&self, id: &str) -> Option<EntityKind> {
        self.index.get(id).map(Slot::kind)
    }

    /// Every identifier of the network in storage order: substations, then
    /// each voltage level followed by its buses, then lines, then dangling lines.
    pub fn identifiers(&self) -> impl Iterator<Item = &str> {
        let substations = self.substations.iter().map(|s| s.id.as_str());
        let voltage_levels = self.voltage_levels.iter().flat_map(|vl| {
            std::iter::once(vl.id.as_str()).chain(vl.buses.iter().map(|b| b.id.as_str()))
        });
        let lines = self.lines.iter().map(|l| l.id.as_str());
        let dangling_lines = self.dangling_lines.iter().map(|dl| dl.id.as_str());
        substations
            .chain(voltage_levels)
            .chain(lines)
            .chain(dangling_lines)
    }

    /// Compute basic statistics about the network
    pub fn stats(&self) -> NetworkStats {
        NetworkStats {
            num_substations: self.substations.len(),
            num_voltage_levels: self.voltage_levels.len(),
            num_buses: self.buses().count(),
            num_lines: self.lines.len(),
            num_dangling_lines: self.dangling_lines.len(),
            num_paired_boundaries: 0,
        }
        .with_boundary_pairs(&self.dangling_lines)
    }

    /// Validate network data for issues that downstream load-flow or export
    /// collaborators would trip over.
    ///
    /// Reference integrity is enforced on insertion, so this only reports
    /// findings that are legal to store but suspicious.
    pub fn validate_into(&self, diag: &mut Diagnostics) {
        if self.substations.is_empty() {
            diag.add_error("structure", "Network has no substations");
            return;
        }

        for vl in &self.voltage_levels {
            if vl.nominal_v.value() <= 0.0 || !vl.nominal_v.is_finite() {
                diag.add_error_with_entity(
                    "structure",
                    &format!("Nominal voltage {} is not positive", vl.nominal_v),
                    &vl.id,
                );
            }
            if vl.topology == TopologyKind::BusBreaker && vl.buses.is_empty() {
                diag.add_warning_with_entity(
                    "structure",
                    "Bus-breaker voltage level has no buses",
                    &vl.id,
                );
            }
        }

        for line in &self.lines {
            if !line.terminal1.connected && !line.terminal2.connected {
                diag.add_warning_with_entity(
                    "structure",
                    "Line is disconnected at both ends",
                    &line.id,
                );
            }
            if Ohms::magnitude(line.r, line.x).value() < 1e-12 {
                diag.add_warning_with_entity("physical", "Line has zero impedance", &line.id);
            }
        }

        for dl in &self.dangling_lines {
            if dl.boundary_id().is_none() {
                diag.add_warning_with_entity(
                    "boundary",
                    "Dangling line has no boundary identifier",
                    &dl.id,
                );
            }
        }
    }
}

/// Statistics about a network's size
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NetworkStats {
    pub num_substations: usize,
    pub num_voltage_levels: usize,
    pub num_buses: usize,
    pub num_lines: usize,
    pub num_dangling_lines: usize,
    /// Boundary identifiers carried by exactly two dangling lines of this network
    pub num_paired_boundaries: usize,
}

impl NetworkStats {
    fn with_boundary_pairs(mut self, dangling_lines: &[DanglingLine]) -> Self {
        let mut counts: HashMap<&str, usize> = HashMap::new();
        for id in dangling_lines.iter().filter_map(DanglingLine::boundary_id) {
            *counts.entry(id).or_default() += 1;
        }
        self.num_paired_boundaries = counts.values().filter(|count| **count == 2).count();
        self
    }

    /// Substations, voltage levels, buses and lines (everything but stubs)
    pub fn non_boundary_entities(&self) -> usize {
        self.num_substations + self.num_voltage_levels + self.num_buses + self.num_lines
    }
}

impl std::fmt::Display for NetworkStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} substations, {} voltage levels, {} buses, {} lines, {} dangling lines",
            self.num_substations,
            self.num_voltage_levels,
            self.num_buses,
            self.num_lines,
            self.num_dangling_lines
        )
    }
}
