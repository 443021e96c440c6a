//! Post-failure reachability analysis.
//!
//! A subscriber counts as served if it is reachable from the source in at
//! least one candidate graph after the failures are taken out. Candidate
//! graphs are either the full topology (the oracle) or the redundant trees
//! of one heuristic. Reachability is computed per candidate and then
//! unioned, matching "any of the k trees delivers" semantics; unioning the
//! trees first would credit paths that no single tree carries.
//!
//! Failures are applied as an exclusion set during traversal. Candidate
//! graphs are only borrowed and never modified, so the canonical topology
//! and the built trees can be evaluated any number of times.

use crate::error::{Error, Result};
use mcast_failure::FailureInstance;
use mcast_topology::{Link, NodeId, Topology};
use petgraph::graph::EdgeReference;
use petgraph::visit::{Bfs, EdgeFiltered};
use std::collections::BTreeSet;
use tracing::debug;

/// Result key of the full-topology upper bound.
pub const ORACLE: &str = "oracle";

/// Evaluates reachability for one trial's failures, source and subscribers.
#[derive(Debug, Clone, Copy)]
pub struct ReachabilityEvaluator<'a> {
    failures: &'a FailureInstance,
    server: &'a NodeId,
    subscribers: &'a BTreeSet<NodeId>,
}

impl<'a> ReachabilityEvaluator<'a> {
    /// Creates an evaluator.
    ///
    /// # Errors
    ///
    /// Returns `Error::EmptySubscribers` if `subscribers` is empty.
    pub fn new(
        failures: &'a FailureInstance,
        server: &'a NodeId,
        subscribers: &'a BTreeSet<NodeId>,
    ) -> Result<Self> {
        if subscribers.is_empty() {
            return Err(Error::EmptySubscribers);
        }
        Ok(Self {
            failures,
            server,
            subscribers,
        })
    }

    /// Returns every node reachable from the server in `candidate` once the
    /// failed nodes and links are excluded.
    ///
    /// Empty if the server failed or is not part of the candidate.
    pub fn reachable_nodes(&self, candidate: &Topology) -> BTreeSet<NodeId> {
        let mut reached = BTreeSet::new();
        let Some(start) = candidate.index_of(self.server) else {
            return reached;
        };
        if self.failures.node_failed(self.server) {
            return reached;
        }

        let failures = self.failures;
        let graph = candidate.graph();
        // link_failed also covers links touching a failed node, so no failed
        // node other than the start is ever entered.
        let surviving = EdgeFiltered::from_fn(graph, |edge: EdgeReference<'_, Link>| {
            !failures.link_failed(edge.weight())
        });
        let mut bfs = Bfs::new(&surviving, start);
        while let Some(ix) = bfs.next(&surviving) {
            reached.insert(graph[ix].id.clone());
        }
        reached
    }

    /// Returns the subscribers reachable in `candidate`.
    pub fn reachable_subscribers(&self, candidate: &Topology) -> BTreeSet<NodeId> {
        let reached = self.reachable_nodes(candidate);
        self.subscribers
            .iter()
            .filter(|s| reached.contains(*s))
            .cloned()
            .collect()
    }

    /// Returns the fraction of subscribers reachable in at least one of the
    /// candidates. `label` names the candidates in logs.
    ///
    /// An empty candidate sequence reaches nobody.
    #[allow(clippy::cast_precision_loss)]
    pub fn reachability<'t, I>(&self, label: &str, candidates: I) -> f64
    where
        I: IntoIterator<Item = &'t Topology>,
    {
        let mut served: BTreeSet<NodeId> = BTreeSet::new();
        for candidate in candidates {
            let reached = self.reachable_subscribers(candidate);
            debug!("{label} heuristic reached {} subscribers", reached.len());
            served.extend(reached);
        }
        served.len() as f64 / self.subscribers.len() as f64
    }
}

/// Returns the fraction of `subscribers` reachable from `server` in at
/// least one of `candidates` after `failures`.
///
/// # Errors
///
/// Returns `Error::EmptySubscribers` if `subscribers` is empty.
pub fn reachability<'t, I>(
    failures: &FailureInstance,
    server: &NodeId,
    subscribers: &BTreeSet<NodeId>,
    label: &str,
    candidates: I,
) -> Result<f64>
where
    I: IntoIterator<Item = &'t Topology>,
{
    Ok(ReachabilityEvaluator::new(failures, server, subscribers)?.reachability(label, candidates))
}
