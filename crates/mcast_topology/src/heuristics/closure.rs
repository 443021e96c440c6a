//! Steiner tree approximation by metric closure.
//!
//! Kou-Markowsky-Berman construction:
//! 1. Shortest paths between every pair of terminals form a complete
//!    "closure" graph over the terminals.
//! 2. A minimum spanning tree of the closure selects which paths to keep.
//! 3. The kept paths are expanded back into topology links.
//! 4. A minimum spanning tree of the expanded links removes cycles.
//! 5. Non-terminal leaves are pruned.

use super::{path_links, prune_leaves, reachable_terminals, LinkCosts, TreeBuilder};
use crate::error::Result;
use crate::node::{Link, NodeId};
use crate::topology::Topology;
use petgraph::algo::min_spanning_tree;
use petgraph::data::Element;
use petgraph::graph::{NodeIndex, UnGraph};
use petgraph::unionfind::UnionFind;
use std::collections::{BTreeMap, BTreeSet, HashMap};

/// Metric-closure Steiner tree heuristic, registered as `closure`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ClosureHeuristic;

impl TreeBuilder for ClosureHeuristic {
    fn name(&self) -> &'static str {
        "closure"
    }

    fn build_tree(
        &self,
        topology: &Topology,
        source: &NodeId,
        subscribers: &[NodeId],
        costs: &LinkCosts,
    ) -> Result<BTreeSet<Link>> {
        let mut terminals = vec![source.clone()];
        terminals.extend(reachable_terminals(topology, source, subscribers)?);
        if terminals.len() < 2 {
            return Ok(BTreeSet::new());
        }

        // Closure node i is terminal i.
        let mut closure = UnGraph::<usize, f64>::new_undirected();
        for i in 0..terminals.len() {
            closure.add_node(i);
        }
        let mut paths: HashMap<(usize, usize), Vec<NodeId>> = HashMap::new();
        for i in 0..terminals.len() {
            for j in (i + 1)..terminals.len() {
                if let Some((cost, path)) =
                    topology.shortest_path(&terminals[i], &terminals[j], |l| costs.cost(l))
                {
                    closure.add_edge(NodeIndex::new(i), NodeIndex::new(j), cost);
                    paths.insert((i, j), path);
                }
            }
        }

        let mut expanded = BTreeSet::new();
        for element in min_spanning_tree(&closure) {
            if let Element::Edge { source: a, target: b, .. } = element {
                let key = (a.min(b), a.max(b));
                if let Some(path) = paths.get(&key) {
                    expanded.extend(path_links(path));
                }
            }
        }

        let spanning = spanning_tree(expanded, costs);
        let keep: BTreeSet<&NodeId> = terminals.iter().collect();
        Ok(prune_leaves(spanning, &keep))
    }
}

/// Kruskal over a link set, cheapest links first.
fn spanning_tree(links: BTreeSet<Link>, costs: &LinkCosts) -> BTreeSet<Link> {
    let mut ids: BTreeMap<&NodeId, usize> = BTreeMap::new();
    for link in &links {
        let next = ids.len();
        ids.entry(link.a()).or_insert(next);
        let next = ids.len();
        ids.entry(link.b()).or_insert(next);
    }

    let mut ordered: Vec<&Link> = links.iter().collect();
    ordered.sort_by(|x, y| costs.cost(x).total_cmp(&costs.cost(y)).then_with(|| x.cmp(y)));

    let mut components = UnionFind::<usize>::new(ids.len());
    let mut tree = BTreeSet::new();
    for link in ordered {
        if components.union(ids[link.a()], ids[link.b()]) {
            tree.insert(link.clone());
        }
    }
    tree
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::NodeKind;
    use crate::spec::TopologySpec;
    use proptest::prelude::*;

    /// A hub `x` reaches both hosts in one hop each, while the direct
    /// route between the hosts is long.
    fn star_with_detour() -> Topology {
        let mut topo = Topology::new();
        topo.add_node("s", NodeKind::Server);
        for id in ["x", "d1", "d2"] {
            topo.add_node(id, NodeKind::Switch);
        }
        topo.add_node("h1", NodeKind::Host);
        topo.add_node("h2", NodeKind::Host);
        for (a, b) in [
            ("s", "x"),
            ("x", "h1"),
            ("x", "h2"),
            ("h1", "d1"),
            ("d1", "d2"),
            ("d2", "h2"),
        ] {
            topo.add_link(&a.into(), &b.into()).unwrap();
        }
        topo
    }

    #[test]
    fn closure_tree_spans_all_terminals() {
        let topo = star_with_detour();
        let links = ClosureHeuristic
            .build_tree(&topo, &"s".into(), &["h1".into(), "h2".into()], &LinkCosts::new())
            .unwrap();

        let expected: BTreeSet<Link> = [Link::new("s", "x"), Link::new("x", "h1"), Link::new("x", "h2")]
            .into_iter()
            .collect();
        assert_eq!(links, expected);
    }

    #[test]
    fn closure_tree_is_acyclic() {
        let topo = star_with_detour();
        let links = ClosureHeuristic
            .build_tree(&topo, &"s".into(), &["h1".into(), "h2".into()], &LinkCosts::new())
            .unwrap();
        let nodes: BTreeSet<&NodeId> = links.iter().flat_map(|l| [l.a(), l.b()]).collect();
        assert_eq!(links.len(), nodes.len() - 1);
    }

    #[test]
    fn unreachable_subscribers_are_skipped() {
        let mut topo = star_with_detour();
        topo.add_node("lonely", NodeKind::Host);
        let links = ClosureHeuristic
            .build_tree(&topo, &"s".into(), &["h1".into(), "lonely".into()], &LinkCosts::new())
            .unwrap();
        assert!(links.contains(&Link::new("x", "h1")));
        assert!(links.iter().all(|l| !l.touches(&"lonely".into())));
    }

    #[test]
    fn unknown_source_is_an_error() {
        let topo = star_with_detour();
        let result = ClosureHeuristic.build_tree(&topo, &"nope".into(), &["h1".into()], &LinkCosts::new());
        assert!(result.is_err());
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(48))]

        #[test]
        fn grid_trees_are_spanning_subtrees(
            rows in 1usize..5,
            cols in 2usize..5,
            picks in prop::collection::vec(any::<prop::sample::Index>(), 1..6),
        ) {
            let topo = TopologySpec::Grid { rows, cols }.build().unwrap();
            let hosts = topo.hosts();
            let subscribers: Vec<NodeId> = picks.iter().map(|ix| ix.get(&hosts).clone()).collect();
            let source = NodeId::from("srv");
            let links = ClosureHeuristic
                .build_tree(&topo, &source, &subscribers, &LinkCosts::new())
                .unwrap();

            prop_assert!(links.iter().all(|l| topo.has_link(l)));
            let nodes: BTreeSet<&NodeId> = links.iter().flat_map(|l| [l.a(), l.b()]).collect();
            prop_assert_eq!(links.len() + 1, nodes.len());
            prop_assert!(nodes.contains(&source));
            for sub in &subscribers {
                prop_assert!(nodes.contains(sub));
            }
        }
    }
}
