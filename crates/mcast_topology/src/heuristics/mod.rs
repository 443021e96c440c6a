//! Pluggable multicast tree heuristics.
//!
//! Each heuristic implements [`TreeBuilder`] and builds a single tree from a
//! source to a set of subscribers under a set of link costs. The
//! [`HeuristicRegistry`] turns a single-tree builder into `k` redundant trees:
//! after each tree, the links it used are penalized so the next tree is
//! steered onto different links where the topology allows it.
//!
//! # Example
//!
//! ```rust,ignore
//! use mcast_topology::HeuristicRegistry;
//!
//! let registry = HeuristicRegistry::new();
//! let trees = registry.redundant_trees(&topology, &source, &subscribers, 3, "closure")?;
//! ```

mod closure;
mod paths;

pub use closure::ClosureHeuristic;
pub use paths::ShortestPathHeuristic;

use crate::error::{Error, Result};
use crate::node::{Link, NodeId};
use crate::topology::Topology;
use crate::tree::MulticastTree;
use std::collections::{BTreeMap, BTreeSet, HashMap};

/// Cost multiplier applied to links already used by an earlier redundant tree.
pub const REDUNDANCY_PENALTY: f64 = 10.0;

/// A trait for building one multicast tree.
pub trait TreeBuilder: Send + Sync {
    /// Returns the heuristic name (e.g., "closure", "paths").
    fn name(&self) -> &'static str;

    /// Builds one tree spanning `source` and every subscriber reachable from it.
    ///
    /// Returns the links of the tree. Unreachable subscribers are left out.
    ///
    /// # Errors
    ///
    /// Returns `Error::UnknownNode` if the source or a subscriber is not in
    /// the topology.
    fn build_tree(
        &self,
        topology: &Topology,
        source: &NodeId,
        subscribers: &[NodeId],
        costs: &LinkCosts,
    ) -> Result<BTreeSet<Link>>;
}

/// Per-link traversal costs. Links without an explicit cost weigh 1.0.
#[derive(Debug, Clone, Default)]
pub struct LinkCosts {
    costs: HashMap<Link, f64>,
}

impl LinkCosts {
    /// Creates uniform costs.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cost of a link.
    #[must_use]
    pub fn cost(&self, link: &Link) -> f64 {
        self.costs.get(link).copied().unwrap_or(1.0)
    }

    /// Sets the cost of a link.
    pub fn set(&mut self, link: Link, cost: f64) {
        self.costs.insert(link, cost);
    }

    /// Multiplies the cost of each given link by `factor`.
    pub fn penalize<'a>(&mut self, links: impl IntoIterator<Item = &'a Link>, factor: f64) {
        for link in links {
            let cost = self.cost(link) * factor;
            self.costs.insert(link.clone(), cost);
        }
    }
}

/// Registry of available tree heuristics.
pub struct HeuristicRegistry {
    builders: Vec<Box<dyn TreeBuilder>>,
}

impl Default for HeuristicRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for HeuristicRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HeuristicRegistry")
            .field("heuristics", &self.names())
            .finish()
    }
}

impl HeuristicRegistry {
    /// Creates a registry with the built-in heuristics.
    #[must_use]
    pub fn new() -> Self {
        let mut registry = Self {
            builders: Vec::new(),
        };
        registry.register(Box::new(ClosureHeuristic));
        registry.register(Box::new(ShortestPathHeuristic));
        registry
    }

    /// Registers a heuristic. A later registration shadows an earlier one
    /// with the same name.
    pub fn register(&mut self, builder: Box<dyn TreeBuilder>) {
        self.builders.retain(|b| b.name() != builder.name());
        self.builders.push(builder);
    }

    /// Looks up a heuristic by name.
    ///
    /// # Errors
    ///
    /// Returns `Error::UnknownHeuristic` if no heuristic has that name.
    pub fn get(&self, name: &str) -> Result<&dyn TreeBuilder> {
        self.builders
            .iter()
            .find(|b| b.name() == name)
            .map(|b| &**b)
            .ok_or_else(|| Error::UnknownHeuristic(name.to_string()))
    }

    /// Returns true if a heuristic with that name is registered.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.builders.iter().any(|b| b.name() == name)
    }

    /// Returns the names of all registered heuristics.
    #[must_use]
    pub fn names(&self) -> Vec<&'static str> {
        self.builders.iter().map(|b| b.name()).collect()
    }

    /// Builds up to `k` redundant trees with the named heuristic.
    ///
    /// A tree identical to an earlier one is dropped, so sparse topologies
    /// can yield fewer than `k` trees.
    ///
    /// # Errors
    ///
    /// Returns `Error::UnknownHeuristic` for an unregistered name, or any
    /// error raised by the heuristic.
    pub fn redundant_trees(
        &self,
        topology: &Topology,
        source: &NodeId,
        subscribers: &[NodeId],
        k: usize,
        heuristic: &str,
    ) -> Result<Vec<MulticastTree>> {
        let builder = self.get(heuristic)?;
        let mut costs = LinkCosts::new();
        let mut built: Vec<BTreeSet<Link>> = Vec::with_capacity(k);

        for attempt in 0..k {
            let links = builder.build_tree(topology, source, subscribers, &costs)?;
            costs.penalize(&links, REDUNDANCY_PENALTY);
            if built.contains(&links) {
                tracing::debug!("{heuristic} tree {attempt} duplicates an earlier tree, dropped");
                continue;
            }
            built.push(links);
        }

        built
            .iter()
            .enumerate()
            .map(|(ordinal, links)| {
                topology
                    .subgraph([source], links)
                    .map(|graph| MulticastTree::new(ordinal, graph))
            })
            .collect()
    }
}

/// Returns the links along a node path.
pub(crate) fn path_links(path: &[NodeId]) -> impl Iterator<Item = Link> + '_ {
    path.windows(2).map(|w| Link::new(w[0].clone(), w[1].clone()))
}

/// Checks that the source and subscribers exist, and returns the
/// deduplicated subscribers that have some path from the source.
pub(crate) fn reachable_terminals(
    topology: &Topology,
    source: &NodeId,
    subscribers: &[NodeId],
) -> Result<Vec<NodeId>> {
    if !topology.contains(source) {
        return Err(Error::UnknownNode(source.to_string()));
    }
    let mut seen = BTreeSet::new();
    let mut terminals = Vec::with_capacity(subscribers.len());
    for sub in subscribers {
        if !topology.contains(sub) {
            return Err(Error::UnknownNode(sub.to_string()));
        }
        if sub == source || !seen.insert(sub.clone()) {
            continue;
        }
        if topology.shortest_path(source, sub, |_| 1.0).is_some() {
            terminals.push(sub.clone());
        } else {
            tracing::debug!("subscriber {sub} has no path from {source}");
        }
    }
    Ok(terminals)
}

/// Repeatedly removes leaf links whose leaf is not a terminal.
pub(crate) fn prune_leaves(mut links: BTreeSet<Link>, terminals: &BTreeSet<&NodeId>) -> BTreeSet<Link> {
    loop {
        let mut degree: BTreeMap<&NodeId, usize> = BTreeMap::new();
        for link in &links {
            *degree.entry(link.a()).or_default() += 1;
            *degree.entry(link.b()).or_default() += 1;
        }
        let dangling: Vec<Link> = links
            .iter()
            .filter(|link| {
                [link.a(), link.b()]
                    .into_iter()
                    .any(|end| degree[end] == 1 && !terminals.contains(end))
            })
            .cloned()
            .collect();
        if dangling.is_empty() {
            return links;
        }
        for link in &dangling {
            links.remove(link);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::NodeKind;

    /// Two disjoint routes from `s` to `h`: s-x-h and s-y-h.
    fn diamond() -> Topology {
        let mut topo = Topology::new();
        topo.add_node("s", NodeKind::Server);
        topo.add_node("x", NodeKind::Switch);
        topo.add_node("y", NodeKind::Switch);
        topo.add_node("h", NodeKind::Host);
        for (a, b) in [("s", "x"), ("x", "h"), ("s", "y"), ("y", "h")] {
            topo.add_link(&a.into(), &b.into()).unwrap();
        }
        topo
    }

    #[test]
    fn registry_has_default_heuristics() {
        let registry = HeuristicRegistry::new();
        assert!(registry.contains("closure"));
        assert!(registry.contains("paths"));
    }

    #[test]
    fn unknown_heuristic_is_an_error() {
        let registry = HeuristicRegistry::new();
        let result = registry.get("steiner-magic");
        assert!(matches!(result, Err(Error::UnknownHeuristic(_))));
    }

    #[test]
    fn redundant_trees_use_disjoint_links_when_possible() {
        let registry = HeuristicRegistry::new();
        let topo = diamond();
        let trees = registry
            .redundant_trees(&topo, &"s".into(), &["h".into()], 2, "paths")
            .unwrap();

        assert_eq!(trees.len(), 2);
        let first: BTreeSet<&Link> = trees[0].graph.links().collect();
        let second: BTreeSet<&Link> = trees[1].graph.links().collect();
        assert!(first.is_disjoint(&second));
        assert_eq!(trees[1].ordinal, 1);
    }

    #[test]
    fn duplicate_trees_are_dropped() {
        let registry = HeuristicRegistry::new();
        let mut topo = Topology::new();
        topo.add_node("s", NodeKind::Server);
        topo.add_node("h", NodeKind::Host);
        topo.add_link(&"s".into(), &"h".into()).unwrap();

        let trees = registry
            .redundant_trees(&topo, &"s".into(), &["h".into()], 3, "closure")
            .unwrap();
        assert_eq!(trees.len(), 1);
    }

    #[test]
    fn prune_removes_non_terminal_leaves() {
        let links: BTreeSet<Link> = [Link::new("s", "x"), Link::new("x", "h"), Link::new("x", "dead")]
            .into_iter()
            .collect();
        let s = NodeId::from("s");
        let h = NodeId::from("h");
        let terminals: BTreeSet<&NodeId> = [&s, &h].into_iter().collect();
        let pruned = prune_leaves(links, &terminals);
        assert_eq!(pruned.len(), 2);
        assert!(!pruned.contains(&Link::new("x", "dead")));
    }

    #[test]
    fn penalize_compounds() {
        let mut costs = LinkCosts::new();
        let link = Link::new("a", "b");
        costs.penalize([&link], 2.0);
        costs.penalize([&link], 3.0);
        assert!((costs.cost(&link) - 6.0).abs() < f64::EPSILON);
        assert!((costs.cost(&Link::new("a", "c")) - 1.0).abs() < f64::EPSILON);
    }
}
