use std::collections::BTreeMap;

use cgm_core::Diagnostics;
use serde::Serialize;

use crate::synthesize::BoundaryNode;

/// One merged boundary.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoundaryRecord {
    pub node: BoundaryNode,
    /// Equivalent line ids, first and second stub of the pair
    pub lines: [String; 2],
    /// Fragment index each stub came from
    pub fragments: [usize; 2],
}

/// A stub left dangling in the merged network.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UnmatchedStub {
    /// `None` when the stub had no boundary identifier
    pub identifier: Option<String>,
    pub stub: String,
    pub fragment: usize,
}

/// What a merge did, alongside the merged network.
#[derive(Debug, Clone, Default, Serialize)]
pub struct MergeReport {
    /// Fragment ids in arrival order
    pub fragment_ids: Vec<String>,
    /// Merged boundaries sorted by identifier
    pub boundaries: Vec<BoundaryRecord>,
    pub unmatched: Vec<UnmatchedStub>,
    /// Source fragment index of every entity taken from a fragment
    /// (equivalent lines map to the fragment of their stub)
    pub origins: BTreeMap<String, usize>,
    pub diagnostics: Diagnostics,
}

impl MergeReport {
    pub fn boundary(&self, identifier: &str) -> Option<&BoundaryRecord> {
        self.boundaries
            .iter()
            .find(|record| record.node.identifier == identifier)
    }

    /// Id of the fragment an entity of the merged network came from.
    /// Synthesized boundary entities have no origin.
    pub fn origin_of(&self, id: &str) -> Option<&str> {
        self.origins
            .get(id)
            .and_then(|fragment| self.fragment_ids.get(*fragment))
            .map(String::as_str)
    }

    /// Ids of the merged-network entities contributed by one fragment, sorted.
    pub fn subnetwork(&self, fragment: usize) -> impl Iterator<Item = &str> {
        self.origins
            .iter()
            .filter(move |(_, origin)| **origin == fragment)
            .map(|(id, _)| id.as_str())
    }

    pub fn summary(&self) -> String {
        format!(
            "{} fragments, {} boundaries merged, {} stubs left dangling | {}",
            self.fragment_ids.len(),
            self.boundaries.len(),
            self.unmatched.len(),
            self.diagnostics.summary()
        )
    }
}
