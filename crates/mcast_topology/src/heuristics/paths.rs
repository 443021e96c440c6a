//! Shortest-path tree heuristic.

use super::{path_links, prune_leaves, reachable_terminals, LinkCosts, TreeBuilder};
use crate::error::Result;
use crate::node::{Link, NodeId};
use crate::topology::Topology;
use std::collections::BTreeSet;

/// Union of least-cost source-to-subscriber paths, registered as `paths`.
///
/// Every subscriber gets its individually cheapest route, at the price of a
/// larger tree than `closure` builds. Routes that split and rejoin leave a
/// cycle in the union; reachability is unaffected.
#[derive(Debug, Clone, Copy, Default)]
pub struct ShortestPathHeuristic;

impl TreeBuilder for ShortestPathHeuristic {
    fn name(&self) -> &'static str {
        "paths"
    }

    fn build_tree(
        &self,
        topology: &Topology,
        source: &NodeId,
        subscribers: &[NodeId],
        costs: &LinkCosts,
    ) -> Result<BTreeSet<Link>> {
        let terminals = reachable_terminals(topology, source, subscribers)?;
        let mut links = BTreeSet::new();
        for sub in &terminals {
            if let Some((_, path)) = topology.shortest_path(source, sub, |l| costs.cost(l)) {
                links.extend(path_links(&path));
            }
        }
        let keep: BTreeSet<&NodeId> = terminals.iter().chain([source]).collect();
        Ok(prune_leaves(links, &keep))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::NodeKind;

    #[test]
    fn path_tree_follows_cheapest_route() {
        let mut topo = Topology::new();
        topo.add_node("s", NodeKind::Server);
        topo.add_node("a", NodeKind::Switch);
        topo.add_node("b", NodeKind::Switch);
        topo.add_node("h", NodeKind::Host);
        for (x, y) in [("s", "a"), ("a", "h"), ("s", "b"), ("b", "h")] {
            topo.add_link(&x.into(), &y.into()).unwrap();
        }

        let mut costs = LinkCosts::new();
        costs.set(Link::new("s", "a"), 50.0);
        let links = ShortestPathHeuristic
            .build_tree(&topo, &"s".into(), &["h".into()], &costs)
            .unwrap();

        let expected: BTreeSet<Link> = [Link::new("s", "b"), Link::new("b", "h")].into_iter().collect();
        assert_eq!(links, expected);
    }

    #[test]
    fn source_as_subscriber_yields_empty_tree() {
        let mut topo = Topology::new();
        topo.add_node("s", NodeKind::Server);
        let links = ShortestPathHeuristic
            .build_tree(&topo, &"s".into(), &["s".into()], &LinkCosts::new())
            .unwrap();
        assert!(links.is_empty());
    }
}
