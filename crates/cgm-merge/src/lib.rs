//! # cgm-merge: Common Grid Model assembly
//!
//! Merges independently modelled network fragments (one per TSO, area or
//! study zone) into a single network. Fragments meet at boundary points:
//! each side models its half of a cross-border line as a dangling line
//! carrying the identifier of the shared boundary node.
//!
//! ## Boundary handling
//!
//! | Stubs sharing an identifier | Result |
//! |-----------------------------|--------|
//! | 1 | the stub stays a dangling line in the merged network |
//! | 2 | both stubs become lines ending on a synthesized boundary bus |
//! | 3+ | the merge fails with [`MergeError::AmbiguousBoundary`] |
//!
//! For a paired boundary `X` the merged network gains a substation `X`, a
//! bus-breaker voltage level `X_VL` and a bus `X_BUS`. Each stub is replaced
//! by a line of the same id from its original connection point to `X_BUS`.
//!
//! ## Example
//!
//! ```
//! use cgm_core::{Bus, DanglingLine, Kilovolts, Network, Substation, Terminal, TopologyKind, VoltageLevel};
//! use cgm_merge::{MergeOptions, Merger};
//!
//! fn fragment(id: &str) -> Network {
//!     let mut network = Network::new(id, "example");
//!     let (s, vl, bus) = (format!("{id}_S"), format!("{id}_VL"), format!("{id}_B"));
//!     network.add_substation(Substation::new(&s)).unwrap();
//!     network
//!         .add_voltage_level(VoltageLevel::new(&vl, &s, Kilovolts(380.0), TopologyKind::BusBreaker))
//!         .unwrap();
//!     network.add_bus(&vl, Bus::new(&bus)).unwrap();
//!     network
//!         .add_dangling_line(
//!             DanglingLine::new(format!("{id}_DL"), Terminal::bus(&vl, &bus, true)).with_boundary("XNODE"),
//!         )
//!         .unwrap();
//!     network
//! }
//!
//! let outcome = Merger::new(MergeOptions::default())
//!     .merge(vec![fragment("BE"), fragment("NL")])
//!     .unwrap();
//! assert!(outcome.network.bus("XNODE_BUS").is_some());
//! assert_eq!(outcome.network.lines().len(), 2);
//! assert_eq!(outcome.report.origin_of("NL_DL"), Some("NL"));
//! ```

pub mod equivalent;
pub mod error;
pub mod index;
pub mod merge;
pub mod options;
pub mod report;
pub mod resolve;
pub mod synthesize;
pub mod tie_line;

#[cfg(test)]
mod test_utils;

pub use equivalent::equivalent_line;
pub use error::{MergeError, MergeResult};
pub use index::{BoundaryIndex, StubRef};
pub use merge::{merge, MergeOutcome, Merger};
pub use options::{MergeOptions, VoltageCheck};
pub use report::{BoundaryRecord, MergeReport, UnmatchedStub};
pub use resolve::{resolve, BoundaryClass, BoundaryPair, Resolution};
pub use synthesize::{synthesize_boundary_node, BoundaryNode};
pub use tie_line::{tie_line_characteristics, tie_line_report, TieLineCharacteristics};
