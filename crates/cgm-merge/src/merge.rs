//! Merge orchestration.
//!
//! The fragments are consumed in a fixed sequence:
//!
//! 1. index every dangling line by boundary identifier
//! 2. resolve the groups into pairs and unmatched stubs, checking the nominal
//!    voltage of each pair
//! 3. synthesize one boundary node per pair in the destination network and
//!    prepare the two equivalent lines as [`LineAdder`]s
//! 4. remove the paired stubs from their fragments
//! 5. absorb every fragment, in arrival order, into the destination
//! 6. add the prepared equivalent lines
//!
//! Equivalent lines are only added once every fragment has been absorbed,
//! because their terminal 1 refers to a voltage level that exists in the
//! destination only after step 5.

use cgm_core::{CgmError, DanglingLine, Kilovolts, LineAdder, Network};
use tracing::{debug, info, warn};

use crate::equivalent::equivalent_line;
use crate::index::{BoundaryIndex, StubRef};
use crate::report::{BoundaryRecord, MergeReport, UnmatchedStub};
use crate::resolve::{check_nominal_voltage, resolve, stub_nominal_voltage, BoundaryPair};
use crate::synthesize::synthesize_boundary_node;
use crate::{MergeError, MergeOptions, MergeResult};

/// Merged network plus the report of what the merge did.
#[derive(Debug)]
pub struct MergeOutcome {
    pub network: Network,
    pub report: MergeReport,
}

#[derive(Debug, Clone, Default)]
pub struct Merger {
    options: MergeOptions,
}

impl Merger {
    pub fn new(options: MergeOptions) -> Self {
        Self { options }
    }

    /// Merge `fragments` into a new network.
    ///
    /// The fragments are consumed. On error nothing is returned; the caller
    /// keeps no partially merged state.
    pub fn merge(&self, mut fragments: Vec<Network>) -> MergeResult<MergeOutcome> {
        let mut report = MergeReport {
            fragment_ids: fragments.iter().map(|f| f.id.clone()).collect(),
            ..Default::default()
        };
        info!(
            fragments = fragments.len(),
            network = %self.options.network_id,
            "merging network fragments"
        );

        let index = BoundaryIndex::build(&fragments, self.options.strict_identifiers)?;
        debug!(
            boundaries = index.len(),
            unidentified = index.unidentified().len(),
            "boundary index built"
        );
        for stub in index.unidentified() {
            warn!(
                stub = %stub.stub,
                fragment = %report.fragment_ids[stub.fragment],
                "dangling line has no boundary identifier, keeping it unmatched"
            );
            report.diagnostics.add_warning_with_entity(
                "boundary",
                "dangling line has no boundary identifier",
                &stub.stub,
            );
            report.unmatched.push(UnmatchedStub {
                identifier: None,
                stub: stub.stub.clone(),
                fragment: stub.fragment,
            });
        }

        let resolution = resolve(&index)?;
        for (identifier, stub) in &resolution.unmatched {
            debug!(boundary = %identifier, stub = %stub.stub, "boundary has a single stub");
            report.unmatched.push(UnmatchedStub {
                identifier: Some(identifier.clone()),
                stub: stub.stub.clone(),
                fragment: stub.fragment,
            });
        }

        let mut dest = Network::new(&self.options.network_id, &self.options.source_format);
        let mut adders = Vec::with_capacity(resolution.pairs.len() * 2);
        for pair in &resolution.pairs {
            let (first, second) = pair_voltages(&fragments, pair)?;
            check_nominal_voltage(
                pair,
                first,
                second,
                self.options.nominal_voltage_check,
                &mut report.diagnostics,
            )?;

            let node = synthesize_boundary_node(&mut dest, &pair.identifier, first)?;
            let line1 = equivalent_line(&node, stub(&fragments, &pair.first)?);
            let line2 = equivalent_line(&node, stub(&fragments, &pair.second)?);
            debug!(
                boundary = %pair.identifier,
                first = %line1.id,
                second = %line2.id,
                "boundary paired"
            );
            report.boundaries.push(BoundaryRecord {
                node,
                lines: [line1.id.clone(), line2.id.clone()],
                fragments: [pair.first.fragment, pair.second.fragment],
            });
            adders.push((pair.first.fragment, line1));
            adders.push((pair.second.fragment, line2));
        }

        for pair in &resolution.pairs {
            for stub in [&pair.first, &pair.second] {
                fragments[stub.fragment]
                    .remove_dangling_line(&stub.stub)
                    .ok_or_else(|| missing_stub(stub))?;
            }
        }

        for (position, fragment) in fragments.into_iter().enumerate() {
            for id in fragment.identifiers() {
                report.origins.insert(id.to_string(), position);
            }
            debug!(fragment = %fragment.id, "absorbing fragment");
            dest.absorb(fragment)?;
        }

        apply_adders(&mut dest, adders, &mut report)?;

        dest.validate_into(&mut report.diagnostics);
        info!(
            boundaries = report.boundaries.len(),
            unmatched = report.unmatched.len(),
            "merge complete"
        );
        Ok(MergeOutcome {
            network: dest,
            report,
        })
    }
}

/// Merge with default options, returning only the network.
pub fn merge(fragments: Vec<Network>) -> MergeResult<Network> {
    Merger::default()
        .merge(fragments)
        .map(|outcome| outcome.network)
}

fn pair_voltages(
    fragments: &[Network],
    pair: &BoundaryPair,
) -> MergeResult<(Kilovolts, Kilovolts)> {
    let voltage = |stub: &StubRef| {
        stub_nominal_voltage(fragments, stub).ok_or_else(|| missing_stub(stub))
    };
    Ok((voltage(&pair.first)?, voltage(&pair.second)?))
}

fn stub<'a>(fragments: &'a [Network], stub: &StubRef) -> MergeResult<&'a DanglingLine> {
    stub.get(fragments).ok_or_else(|| missing_stub(stub))
}

fn missing_stub(stub: &StubRef) -> MergeError {
    CgmError::Other(format!(
        "dangling line '{}' disappeared from fragment {} during the merge",
        stub.stub, stub.fragment
    ))
    .into()
}

fn apply_adders(
    dest: &mut Network,
    adders: Vec<(usize, LineAdder)>,
    report: &mut MergeReport,
) -> MergeResult<()> {
    for (fragment, adder) in adders {
        report.origins.insert(adder.id.clone(), fragment);
        adder.add(dest)?;
    }
    Ok(())
}
