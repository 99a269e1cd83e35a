//! Tie-line characteristics of merged boundaries.
//!
//! The merged network keeps both segments of a boundary as separate lines.
//! This report computes the characteristics a single fused tie-line would
//! have, for comparison against models that fuse the pair:
//! `r = r1 + r2`, `x = x1 + x2`, and each side's shunt is the sum of the
//! corresponding segment's two shunts.

use cgm_core::{Network, Ohms, Siemens};
use serde::Serialize;

use crate::report::{BoundaryRecord, MergeReport};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TieLineCharacteristics {
    pub boundary: String,
    pub lines: [String; 2],
    pub r: Ohms,
    pub x: Ohms,
    pub g1: Siemens,
    pub b1: Siemens,
    pub g2: Siemens,
    pub b2: Siemens,
}

/// `None` if either segment is missing from `network`.
pub fn tie_line_characteristics(
    network: &Network,
    record: &BoundaryRecord,
) -> Option<TieLineCharacteristics> {
    let line1 = network.line(&record.lines[0])?;
    let line2 = network.line(&record.lines[1])?;
    Some(TieLineCharacteristics {
        boundary: record.node.identifier.clone(),
        lines: record.lines.clone(),
        r: line1.r + line2.r,
        x: line1.x + line2.x,
        g1: line1.g1 + line1.g2,
        b1: line1.b1 + line1.b2,
        g2: line2.g1 + line2.g2,
        b2: line2.b1 + line2.b2,
    })
}

pub fn tie_line_report(network: &Network, report: &MergeReport) -> Vec<TieLineCharacteristics> {
    report
        .boundaries
        .iter()
        .filter_map(|record| tie_line_characteristics(network, record))
        .collect()
}
