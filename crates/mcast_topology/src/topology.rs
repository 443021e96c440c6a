//! Undirected network graph.

use crate::error::{Error, Result};
use crate::node::{Link, NodeId, NodeKind};
use petgraph::algo::astar;
use petgraph::graph::{NodeIndex, UnGraph};
use std::collections::HashMap;

/// A node stored in the topology graph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    /// Node identifier.
    pub id: NodeId,
    /// Role of the node.
    pub kind: NodeKind,
}

/// A network of switches, hosts and servers joined by undirected links.
///
/// Every edge carries its own normalized [`Link`], so traversals can test
/// link exclusion without a reverse lookup. Node and link iteration follow
/// insertion order, which keeps seeded experiments reproducible.
#[derive(Debug, Clone, Default)]
pub struct Topology {
    graph: UnGraph<Node, Link>,
    index: HashMap<NodeId, NodeIndex>,
}

impl Topology {
    /// Creates an empty topology.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a node, returning the existing index if the id is already present.
    pub fn add_node(&mut self, id: impl Into<NodeId>, kind: NodeKind) -> NodeIndex {
        let id = id.into();
        if let Some(&ix) = self.index.get(&id) {
            return ix;
        }
        let ix = self.graph.add_node(Node {
            id: id.clone(),
            kind,
        });
        self.index.insert(id, ix);
        ix
    }

    /// Adds a link between two existing nodes. Duplicate links are ignored.
    ///
    /// # Errors
    ///
    /// Returns `Error::UnknownNode` if either endpoint is missing, or
    /// `Error::InvalidTopology` for a self-loop.
    pub fn add_link(&mut self, x: &NodeId, y: &NodeId) -> Result<()> {
        if x == y {
            return Err(Error::InvalidTopology(format!("self-loop on {x}")));
        }
        let ix = self.require(x)?;
        let iy = self.require(y)?;
        if self.graph.find_edge(ix, iy).is_none() {
            self.graph.add_edge(ix, iy, Link::new(x.clone(), y.clone()));
        }
        Ok(())
    }

    fn require(&self, id: &NodeId) -> Result<NodeIndex> {
        self.index_of(id)
            .ok_or_else(|| Error::UnknownNode(id.to_string()))
    }

    /// Returns the graph index of a node.
    #[must_use]
    pub fn index_of(&self, id: &NodeId) -> Option<NodeIndex> {
        self.index.get(id).copied()
    }

    /// Returns the underlying graph.
    #[must_use]
    pub const fn graph(&self) -> &UnGraph<Node, Link> {
        &self.graph
    }

    /// Returns true if the node exists.
    #[must_use]
    pub fn contains(&self, id: &NodeId) -> bool {
        self.index.contains_key(id)
    }

    /// Returns true if the link exists.
    #[must_use]
    pub fn has_link(&self, link: &Link) -> bool {
        match (self.index_of(link.a()), self.index_of(link.b())) {
            (Some(a), Some(b)) => self.graph.find_edge(a, b).is_some(),
            _ => false,
        }
    }

    /// Returns the role of a node.
    #[must_use]
    pub fn kind(&self, id: &NodeId) -> Option<NodeKind> {
        self.index_of(id).map(|ix| self.graph[ix].kind)
    }

    /// Returns the number of nodes.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Returns the number of links.
    #[must_use]
    pub fn link_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Returns an iterator over all nodes in insertion order.
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.graph.node_weights()
    }

    /// Returns an iterator over all links in insertion order.
    pub fn links(&self) -> impl Iterator<Item = &Link> {
        self.graph.edge_weights()
    }

    /// Returns the ids of all nodes of the given kind.
    #[must_use]
    pub fn nodes_of_kind(&self, kind: NodeKind) -> Vec<NodeId> {
        self.nodes()
            .filter(|n| n.kind == kind)
            .map(|n| n.id.clone())
            .collect()
    }

    /// Returns the hosts (candidate subscribers).
    #[must_use]
    pub fn hosts(&self) -> Vec<NodeId> {
        self.nodes_of_kind(NodeKind::Host)
    }

    /// Returns the servers (candidate sources).
    #[must_use]
    pub fn servers(&self) -> Vec<NodeId> {
        self.nodes_of_kind(NodeKind::Server)
    }

    /// Returns the switches.
    #[must_use]
    pub fn switches(&self) -> Vec<NodeId> {
        self.nodes_of_kind(NodeKind::Switch)
    }

    /// Finds a least-cost path between two nodes.
    ///
    /// Returns the total cost and the node sequence including both endpoints,
    /// or `None` if `to` is unreachable.
    pub fn shortest_path<F>(&self, from: &NodeId, to: &NodeId, cost: F) -> Option<(f64, Vec<NodeId>)>
    where
        F: Fn(&Link) -> f64,
    {
        let start = self.index_of(from)?;
        let goal = self.index_of(to)?;
        let (total, path) = astar(
            &self.graph,
            start,
            |n| n == goal,
            |e| cost(e.weight()),
            |_| 0.0,
        )?;
        Some((total, path.into_iter().map(|ix| self.graph[ix].id.clone()).collect()))
    }

    /// Builds a new topology holding the given nodes plus the given links
    /// and their endpoints. Node roles are copied from `self`.
    ///
    /// # Errors
    ///
    /// Returns `Error::UnknownNode` if a node or link endpoint is not in `self`.
    pub fn subgraph<'a, N, L>(&self, nodes: N, links: L) -> Result<Self>
    where
        N: IntoIterator<Item = &'a NodeId>,
        L: IntoIterator<Item = &'a Link>,
    {
        let mut sub = Self::new();
        for id in nodes {
            let ix = self.require(id)?;
            sub.add_node(id.clone(), self.graph[ix].kind);
        }
        for link in links {
            if !self.has_link(link) {
                return Err(Error::UnknownNode(format!("no link {link}")));
            }
            for end in [link.a(), link.b()] {
                let ix = self.require(end)?;
                sub.add_node(end.clone(), self.graph[ix].kind);
            }
            sub.add_link(link.a(), link.b())?;
        }
        Ok(sub)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line() -> Topology {
        let mut topo = Topology::new();
        for id in ["a", "b", "c", "d"] {
            topo.add_node(id, NodeKind::Switch);
        }
        topo.add_link(&"a".into(), &"b".into()).unwrap();
        topo.add_link(&"b".into(), &"c".into()).unwrap();
        topo.add_link(&"c".into(), &"d".into()).unwrap();
        topo
    }

    #[test]
    fn duplicate_nodes_and_links_are_ignored() {
        let mut topo = line();
        topo.add_node("a", NodeKind::Host);
        topo.add_link(&"b".into(), &"a".into()).unwrap();
        assert_eq!(topo.node_count(), 4);
        assert_eq!(topo.link_count(), 3);
        assert_eq!(topo.kind(&"a".into()), Some(NodeKind::Switch));
    }

    #[test]
    fn link_to_unknown_node_fails() {
        let mut topo = line();
        let result = topo.add_link(&"a".into(), &"zz".into());
        assert!(matches!(result, Err(Error::UnknownNode(_))));
    }

    #[test]
    fn self_loop_is_rejected() {
        let mut topo = line();
        assert!(topo.add_link(&"a".into(), &"a".into()).is_err());
    }

    #[test]
    fn shortest_path_follows_line() {
        let topo = line();
        let (cost, path) = topo
            .shortest_path(&"a".into(), &"d".into(), |_| 1.0)
            .unwrap();
        assert!((cost - 3.0).abs() < f64::EPSILON);
        let ids: Vec<&str> = path.iter().map(NodeId::as_str).collect();
        assert_eq!(ids, ["a", "b", "c", "d"]);
    }

    #[test]
    fn shortest_path_none_when_disconnected() {
        let mut topo = line();
        topo.add_node("island", NodeKind::Host);
        assert!(topo
            .shortest_path(&"a".into(), &"island".into(), |_| 1.0)
            .is_none());
    }

    #[test]
    fn subgraph_keeps_only_requested_links() {
        let topo = line();
        let sub = topo
            .subgraph([&NodeId::from("a")], [&Link::new("c", "d")])
            .unwrap();
        assert_eq!(sub.node_count(), 3);
        assert_eq!(sub.link_count(), 1);
        assert!(sub.has_link(&Link::new("d", "c")));
        assert!(!sub.has_link(&Link::new("a", "b")));
    }

    #[test]
    fn subgraph_rejects_missing_link() {
        let topo = line();
        let result = topo.subgraph(std::iter::empty(), [&Link::new("a", "d")]);
        assert!(result.is_err());
    }
}
