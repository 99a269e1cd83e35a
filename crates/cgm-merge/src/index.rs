//! Boundary key index: dangling lines of all fragments grouped by boundary
//! identifier.
//!
//! Groups are kept in a `BTreeMap`, so iteration is sorted by identifier,
//! and stubs inside a group follow fragment arrival order, then storage
//! order inside the fragment. Every merge over the same inputs therefore
//! visits boundaries in the same order.

use std::collections::BTreeMap;

use cgm_core::{DanglingLine, Network};

use crate::{MergeError, MergeResult};

/// Location of a dangling line: owning fragment and stub id.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StubRef {
    pub fragment: usize,
    pub stub: String,
}

impl StubRef {
    /// Resolve the stub in its fragment
    pub fn get<'a>(&self, fragments: &'a [Network]) -> Option<&'a DanglingLine> {
        fragments
            .get(self.fragment)
            .and_then(|network| network.dangling_line(&self.stub))
    }
}

#[derive(Debug, Clone, Default)]
pub struct BoundaryIndex {
    groups: BTreeMap<String, Vec<StubRef>>,
    unidentified: Vec<StubRef>,
}

impl BoundaryIndex {
    /// Scan every dangling line of every fragment once.
    ///
    /// Stubs without a boundary identifier are set aside as unidentified, or
    /// rejected with `MissingIdentifier` when `strict` is set.
    pub fn build(fragments: &[Network], strict: bool) -> MergeResult<Self> {
        let mut index = Self::default();
        for (fragment, network) in fragments.iter().enumerate() {
            for dl in network.dangling_lines() {
                let stub = StubRef {
                    fragment,
                    stub: dl.id.clone(),
                };
                match dl.boundary_id() {
                    Some(boundary) => index
                        .groups
                        .entry(boundary.to_string())
                        .or_default()
                        .push(stub),
                    None if strict => {
                        return Err(MergeError::MissingIdentifier {
                            stub: stub.stub,
                            fragment,
                        })
                    }
                    None => index.unidentified.push(stub),
                }
            }
        }
        Ok(index)
    }

    /// Groups sorted by boundary identifier
    pub fn groups(&self) -> impl Iterator<Item = (&str, &[StubRef])> {
        self.groups
            .iter()
            .map(|(id, stubs)| (id.as_str(), stubs.as_slice()))
    }

    pub fn group(&self, identifier: &str) -> Option<&[StubRef]> {
        self.groups.get(identifier).map(Vec::as_slice)
    }

    /// Stubs excluded from matching because they carry no boundary identifier
    pub fn unidentified(&self) -> &[StubRef] {
        &self.unidentified
    }

    /// Number of distinct boundary identifiers
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}
