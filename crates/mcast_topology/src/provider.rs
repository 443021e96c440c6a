//! The topology seam consumed by the trial runner.

use crate::error::{Error, Result};
use crate::heuristics::{HeuristicRegistry, TreeBuilder};
use crate::node::NodeId;
use crate::spec::TopologySpec;
use crate::topology::Topology;
use crate::tree::MulticastTree;

/// Access to a network topology and to multicast tree construction over it.
///
/// Implementations never mutate the topology they hand out; tree graphs
/// are returned as independent values.
pub trait TopologyProvider {
    /// Returns the full topology.
    fn topology(&self) -> &Topology;

    /// Returns the hosts that may be chosen as subscribers.
    fn hosts(&self) -> Vec<NodeId> {
        self.topology().hosts()
    }

    /// Returns the servers that may be chosen as the source.
    fn servers(&self) -> Vec<NodeId> {
        self.topology().servers()
    }

    /// Returns true if trees can be built with the named heuristic.
    fn supports_heuristic(&self, heuristic: &str) -> bool;

    /// Builds up to `k` redundant multicast trees from `source` to
    /// `subscribers` with the named heuristic.
    ///
    /// # Errors
    ///
    /// Returns an error for an unknown heuristic or unknown nodes.
    fn redundant_multicast_trees(
        &self,
        source: &NodeId,
        subscribers: &[NodeId],
        k: usize,
        heuristic: &str,
    ) -> Result<Vec<MulticastTree>>;
}

/// An in-memory SDN topology with the built-in tree heuristics.
#[derive(Debug)]
pub struct SdnTopology {
    topology: Topology,
    heuristics: HeuristicRegistry,
}

impl SdnTopology {
    /// Wraps a topology with the default heuristics.
    #[must_use]
    pub fn new(topology: Topology) -> Self {
        Self {
            topology,
            heuristics: HeuristicRegistry::new(),
        }
    }

    /// Builds the topology described by `spec`.
    ///
    /// # Errors
    ///
    /// Returns an error if the topology cannot be built.
    pub fn from_spec(spec: &TopologySpec) -> Result<Self> {
        spec.build().map(Self::new)
    }

    /// Adds a custom heuristic.
    #[must_use]
    pub fn with_heuristic(mut self, builder: Box<dyn TreeBuilder>) -> Self {
        self.heuristics.register(builder);
        self
    }
}

impl TopologyProvider for SdnTopology {
    fn topology(&self) -> &Topology {
        &self.topology
    }

    fn supports_heuristic(&self, heuristic: &str) -> bool {
        self.heuristics.contains(heuristic)
    }

    fn redundant_multicast_trees(
        &self,
        source: &NodeId,
        subscribers: &[NodeId],
        k: usize,
        heuristic: &str,
    ) -> Result<Vec<MulticastTree>> {
        if !self.topology.contains(source) {
            return Err(Error::UnknownNode(source.to_string()));
        }
        self.heuristics
            .redundant_trees(&self.topology, source, subscribers, k, heuristic)
    }
}
