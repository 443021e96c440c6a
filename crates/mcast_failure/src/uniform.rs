//! Independent per-element failures.

use crate::error::{Error, Result};
use crate::instance::FailureInstance;
use crate::model::{rng_from_seed, FailureModel};
use mcast_topology::Topology;
use rand::Rng;
use rand_chacha::ChaCha8Rng;
use serde_json::json;

/// Fails every switch and every link independently with probability `fprob`.
///
/// Hosts and servers are end devices and never fail themselves; they are
/// cut off when their attachment link or switch fails.
#[derive(Debug, Clone)]
pub struct UniformFailureModel {
    fprob: f64,
    rng: ChaCha8Rng,
}

impl UniformFailureModel {
    /// Creates a model with the given failure probability and seed.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidProbability` if `fprob` is outside `[0, 1]`.
    pub fn new(fprob: f64, seed: Option<u64>) -> Result<Self> {
        if !(0.0..=1.0).contains(&fprob) {
            return Err(Error::InvalidProbability(fprob));
        }
        Ok(Self {
            fprob,
            rng: rng_from_seed(seed),
        })
    }
}

impl FailureModel for UniformFailureModel {
    fn name(&self) -> &'static str {
        "uniform"
    }

    fn apply_failure_model(&mut self, topology: &Topology) -> FailureInstance {
        let mut failures = FailureInstance::none();
        for switch in topology.switches() {
            if self.rng.gen_bool(self.fprob) {
                failures.failed_nodes.insert(switch);
            }
        }
        for link in topology.links() {
            if self.rng.gen_bool(self.fprob) {
                failures.failed_links.insert(link.clone());
            }
        }
        tracing::trace!(
            "uniform({}) failed {} switches and {} links",
            self.fprob,
            failures.failed_nodes.len(),
            failures.failed_links.len()
        );
        failures
    }

    fn params(&self) -> serde_json::Value {
        json!({ "fmodel": self.name(), "fprob": self.fprob })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mcast_topology::TopologySpec;
    use proptest::prelude::*;

    fn campus() -> Topology {
        TopologySpec::DEFAULT_CAMPUS.build().unwrap()
    }

    #[test]
    fn rejects_bad_probability() {
        assert!(matches!(
            UniformFailureModel::new(1.5, None),
            Err(Error::InvalidProbability(_))
        ));
        assert!(UniformFailureModel::new(-0.1, None).is_err());
    }

    #[test]
    fn zero_probability_fails_nothing() {
        let mut model = UniformFailureModel::new(0.0, Some(1)).unwrap();
        assert!(model.apply_failure_model(&campus()).is_empty());
    }

    #[test]
    fn certain_failure_takes_all_switches_and_links() {
        let topo = campus();
        let mut model = UniformFailureModel::new(1.0, Some(1)).unwrap();
        let failures = model.apply_failure_model(&topo);
        assert_eq!(failures.failed_nodes.len(), topo.switches().len());
        assert_eq!(failures.failed_links.len(), topo.link_count());
    }

    #[test]
    fn only_switches_fail() {
        let topo = campus();
        let mut model = UniformFailureModel::new(0.5, Some(3)).unwrap();
        for _ in 0..20 {
            let failures = model.apply_failure_model(&topo);
            for node in &failures.failed_nodes {
                assert_eq!(topo.kind(node), Some(mcast_topology::NodeKind::Switch));
            }
        }
    }

    #[test]
    fn same_seed_same_draws() {
        let topo = campus();
        let mut a = UniformFailureModel::new(0.3, Some(42)).unwrap();
        let mut b = UniformFailureModel::new(0.3, Some(42)).unwrap();
        for _ in 0..10 {
            assert_eq!(a.apply_failure_model(&topo), b.apply_failure_model(&topo));
        }
    }

    #[test]
    fn params_record_probability() {
        let model = UniformFailureModel::new(0.25, None).unwrap();
        let params = model.params();
        assert_eq!(params["fmodel"], "uniform");
        assert_eq!(params["fprob"], 0.25);
    }

    proptest! {
        #[test]
        fn failures_stay_inside_the_topology(seed in any::<u64>(), fprob in 0.0f64..=1.0) {
            let topo = campus();
            let mut model = UniformFailureModel::new(fprob, Some(seed)).unwrap();
            let failures = model.apply_failure_model(&topo);
            prop_assert!(failures.failed_nodes.iter().all(|n| topo.contains(n)));
            prop_assert!(failures.failed_links.iter().all(|l| topo.has_link(l)));
        }
    }
}
