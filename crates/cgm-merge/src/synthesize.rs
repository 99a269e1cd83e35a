//! Topology synthesis for matched boundaries.
//!
//! A pairable boundary `X` becomes a substation `X` holding a bus-breaker
//! voltage level `X_VL` with a single bus `X_BUS`. Both equivalent lines of
//! the boundary end on that bus.

use cgm_core::{
    Bus, CgmResult, Kilovolts, Network, Substation, TopologyKind, VoltageLevel,
};
use serde::Serialize;

/// Identifiers of the substation / voltage level / bus created for a boundary.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoundaryNode {
    pub identifier: String,
    pub substation: String,
    pub voltage_level: String,
    pub bus: String,
    pub nominal_v: Kilovolts,
}

impl BoundaryNode {
    /// Deterministic ids derived from the boundary identifier
    pub fn for_boundary(identifier: &str, nominal_v: Kilovolts) -> Self {
        Self {
            identifier: identifier.to_string(),
            substation: identifier.to_string(),
            voltage_level: format!("{identifier}_VL"),
            bus: format!("{identifier}_BUS"),
            nominal_v,
        }
    }
}

/// Create the boundary node of `identifier` in `dest`.
///
/// `nominal_v` is taken from one of the matched stubs; checking that both
/// stubs agree is left to the caller.
pub fn synthesize_boundary_node(
    dest: &mut Network,
    identifier: &str,
    nominal_v: Kilovolts,
) -> CgmResult<BoundaryNode> {
    let node = BoundaryNode::for_boundary(identifier, nominal_v);
    dest.add_substation(Substation::new(&node.substation))?;
    dest.add_voltage_level(VoltageLevel::new(
        &node.voltage_level,
        &node.substation,
        nominal_v,
        TopologyKind::BusBreaker,
    ))?;
    dest.add_bus(&node.voltage_level, Bus::new(&node.bus))?;
    Ok(node)
}
