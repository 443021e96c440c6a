//! Failure instances.

use mcast_topology::{Link, NodeId};
use std::collections::BTreeSet;

/// The nodes and links failed in one trial.
///
/// An instance is produced fresh per trial and never applied to a topology
/// in place; traversals consult it as an exclusion set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FailureInstance {
    /// Failed nodes.
    pub failed_nodes: BTreeSet<NodeId>,
    /// Failed links.
    pub failed_links: BTreeSet<Link>,
}

impl FailureInstance {
    /// Creates an instance with no failures.
    #[must_use]
    pub fn none() -> Self {
        Self::default()
    }

    /// Adds a failed node.
    #[must_use]
    pub fn with_node(mut self, node: impl Into<NodeId>) -> Self {
        self.failed_nodes.insert(node.into());
        self
    }

    /// Adds a failed link.
    #[must_use]
    pub fn with_link(mut self, a: impl Into<NodeId>, b: impl Into<NodeId>) -> Self {
        self.failed_links.insert(Link::new(a, b));
        self
    }

    /// Returns true if nothing failed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.failed_nodes.is_empty() && self.failed_links.is_empty()
    }

    /// Returns true if the node failed.
    #[must_use]
    pub fn node_failed(&self, node: &NodeId) -> bool {
        self.failed_nodes.contains(node)
    }

    /// Returns true if the link is unusable: failed itself or attached to a
    /// failed node.
    #[must_use]
    pub fn link_failed(&self, link: &Link) -> bool {
        self.failed_links.contains(link) || self.node_failed(link.a()) || self.node_failed(link.b())
    }
}
