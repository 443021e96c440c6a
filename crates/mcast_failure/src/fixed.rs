//! Fixed-size failure draws.

use crate::error::{Error, Result};
use crate::instance::FailureInstance;
use crate::model::{rng_from_seed, FailureModel};
use mcast_topology::Topology;
use rand::seq::IteratorRandom;
use rand_chacha::ChaCha8Rng;
use serde_json::json;

/// Fails exactly `nodes` switches and `links` links per trial, chosen
/// uniformly without replacement.
#[derive(Debug, Clone)]
pub struct FixedCountFailureModel {
    nodes: usize,
    links: usize,
    rng: ChaCha8Rng,
}

impl FixedCountFailureModel {
    /// Creates a model failing the given numbers of switches and links.
    #[must_use]
    pub fn new(nodes: usize, links: usize, seed: Option<u64>) -> Self {
        Self {
            nodes,
            links,
            rng: rng_from_seed(seed),
        }
    }
}

impl FailureModel for FixedCountFailureModel {
    fn name(&self) -> &'static str {
        "fixed"
    }

    fn validate(&self, topology: &Topology) -> Result<()> {
        let switches = topology.switches().len();
        if self.nodes > switches {
            return Err(Error::TooManyFailures {
                what: "switches",
                requested: self.nodes,
                available: switches,
            });
        }
        if self.links > topology.link_count() {
            return Err(Error::TooManyFailures {
                what: "links",
                requested: self.links,
                available: topology.link_count(),
            });
        }
        Ok(())
    }

    fn apply_failure_model(&mut self, topology: &Topology) -> FailureInstance {
        // choose_multiple returns fewer items when the pool is short.
        let failed_nodes = topology
            .switches()
            .into_iter()
            .choose_multiple(&mut self.rng, self.nodes)
            .into_iter()
            .collect();
        let failed_links = topology
            .links()
            .cloned()
            .choose_multiple(&mut self.rng, self.links)
            .into_iter()
            .collect();
        let failures = FailureInstance {
            failed_nodes,
            failed_links,
        };
        tracing::trace!(
            "fixed failed {:?} and {:?}",
            failures.failed_nodes,
            failures.failed_links
        );
        failures
    }

    fn params(&self) -> serde_json::Value {
        json!({ "fmodel": self.name(), "nodes": self.nodes, "links": self.links })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mcast_topology::TopologySpec;
    use proptest::prelude::*;

    #[test]
    fn fails_exact_counts() {
        let topo = TopologySpec::DEFAULT_CAMPUS.build().unwrap();
        let mut model = FixedCountFailureModel::new(2, 3, Some(9));
        for _ in 0..10 {
            let failures = model.apply_failure_model(&topo);
            assert_eq!(failures.failed_nodes.len(), 2);
            assert_eq!(failures.failed_links.len(), 3);
        }
    }

    #[test]
    fn validate_rejects_oversized_requests() {
        let topo = TopologySpec::Path(3).build().unwrap();
        let model = FixedCountFailureModel::new(1, 0, None);
        assert!(matches!(
            model.validate(&topo),
            Err(Error::TooManyFailures { what: "switches", .. })
        ));
        let model = FixedCountFailureModel::new(0, 5, None);
        assert!(model.validate(&topo).is_err());
        let model = FixedCountFailureModel::new(0, 2, None);
        assert!(model.validate(&topo).is_ok());
    }

    proptest! {
        #[test]
        fn counts_never_exceed_request(
            seed in any::<u64>(),
            nodes in 0usize..6,
            links in 0usize..30,
        ) {
            let topo = TopologySpec::DEFAULT_CAMPUS.build().unwrap();
            let mut model = FixedCountFailureModel::new(nodes, links, Some(seed));
            prop_assume!(model.validate(&topo).is_ok());
            let failures = model.apply_failure_model(&topo);
            prop_assert_eq!(failures.failed_nodes.len(), nodes);
            prop_assert_eq!(failures.failed_links.len(), links);
        }
    }
}
