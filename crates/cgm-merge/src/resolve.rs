//! Boundary resolution: decide the merge action for every boundary group.
//!
//! | Stubs | Class | Action |
//! |-------|-------|--------|
//! | 0 or 1 | [`BoundaryClass::Unmatched`] | keep the stub as an open network edge |
//! | 2 | [`BoundaryClass::Pairable`] | replace both stubs by equivalent lines |
//! | 3+ | [`BoundaryClass::OverDetermined`] | abort with `AmbiguousBoundary` |

use cgm_core::{Diagnostics, Kilovolts, Network};
use tracing::warn;

use crate::index::{BoundaryIndex, StubRef};
use crate::{MergeError, MergeResult, VoltageCheck};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoundaryClass {
    Unmatched,
    Pairable,
    OverDetermined,
}

impl BoundaryClass {
    pub fn of(count: usize) -> Self {
        match count {
            0 | 1 => BoundaryClass::Unmatched,
            2 => BoundaryClass::Pairable,
            _ => BoundaryClass::OverDetermined,
        }
    }
}

/// Two stubs meeting at one boundary, in fragment arrival order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoundaryPair {
    pub identifier: String,
    pub first: StubRef,
    pub second: StubRef,
}

#[derive(Debug, Clone, Default)]
pub struct Resolution {
    /// Pairable boundaries sorted by identifier
    pub pairs: Vec<BoundaryPair>,
    /// Stubs that stay dangling, with their boundary identifier
    pub unmatched: Vec<(String, StubRef)>,
}

/// Classify every group of the index. The first over-determined group (in
/// identifier order) aborts the resolution.
pub fn resolve(index: &BoundaryIndex) -> MergeResult<Resolution> {
    let mut resolution = Resolution::default();
    for (identifier, stubs) in index.groups() {
        match (BoundaryClass::of(stubs.len()), stubs) {
            (BoundaryClass::Pairable, [first, second]) => {
                resolution.pairs.push(BoundaryPair {
                    identifier: identifier.to_string(),
                    first: first.clone(),
                    second: second.clone(),
                })
            }
            (BoundaryClass::OverDetermined, _) => {
                return Err(MergeError::AmbiguousBoundary {
                    identifier: identifier.to_string(),
                    count: stubs.len(),
                    fragments: stubs.iter().map(|stub| stub.fragment).collect(),
                })
            }
            _ => resolution.unmatched.extend(
                stubs
                    .iter()
                    .map(|stub| (identifier.to_string(), stub.clone())),
            ),
        }
    }
    Ok(resolution)
}

/// Nominal voltage of the voltage level a stub is attached to
pub fn stub_nominal_voltage(fragments: &[Network], stub: &StubRef) -> Option<Kilovolts> {
    let dl = stub.get(fragments)?;
    fragments[stub.fragment]
        .voltage_level(&dl.terminal.voltage_level)
        .map(|vl| vl.nominal_v)
}

/// Compare the nominal voltages on both sides of a pair according to `check`.
pub fn check_nominal_voltage(
    pair: &BoundaryPair,
    first_kv: Kilovolts,
    second_kv: Kilovolts,
    check: VoltageCheck,
    diag: &mut Diagnostics,
) -> MergeResult<()> {
    if check == VoltageCheck::Ignore || first_kv.approx_eq(second_kv) {
        return Ok(());
    }
    match check {
        VoltageCheck::Reject => Err(MergeError::MismatchedNominalVoltage {
            identifier: pair.identifier.clone(),
            first_kv,
            second_kv,
            fragments: [pair.first.fragment, pair.second.fragment],
        }),
        _ => {
            warn!(
                boundary = %pair.identifier,
                "paired stubs {} and {} have nominal voltages {} and {}",
                pair.first.stub, pair.second.stub, first_kv, second_kv
            );
            diag.add_warning_with_entity(
                "voltage",
                &format!(
                    "nominal voltage mismatch ({first_kv} vs {second_kv}); boundary node uses {first_kv}"
                ),
                &pair.identifier,
            );
            Ok(())
        }
    }
}
