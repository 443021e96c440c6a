//! Multicast trees and heuristic-tagged tree batches.

use crate::topology::Topology;

/// One of the redundant multicast trees built for a trial.
#[derive(Debug, Clone)]
pub struct MulticastTree {
    /// Position of this tree among the redundant trees (0-based).
    pub ordinal: usize,
    /// The tree as a subgraph of the full topology.
    pub graph: Topology,
}

impl MulticastTree {
    /// Creates a tree.
    #[must_use]
    pub const fn new(ordinal: usize, graph: Topology) -> Self {
        Self { ordinal, graph }
    }
}

/// The trees one heuristic produced for one trial.
///
/// The heuristic name is carried once for the whole batch.
#[derive(Debug, Clone)]
pub struct TreeBatch {
    /// Name of the heuristic that built every tree in the batch.
    pub heuristic: String,
    /// The trees, ordered by ordinal. May hold fewer than requested.
    pub trees: Vec<MulticastTree>,
}

impl TreeBatch {
    /// Creates a batch.
    #[must_use]
    pub fn new(heuristic: impl Into<String>, trees: Vec<MulticastTree>) -> Self {
        Self {
            heuristic: heuristic.into(),
            trees,
        }
    }

    /// Returns the number of trees.
    #[must_use]
    pub fn len(&self) -> usize {
        self.trees.len()
    }

    /// Returns true if the heuristic produced no trees.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.trees.is_empty()
    }

    /// Returns the tree graphs.
    pub fn graphs(&self) -> impl Iterator<Item = &Topology> {
        self.trees.iter().map(|t| &t.graph)
    }
}
