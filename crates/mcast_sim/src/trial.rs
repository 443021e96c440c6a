//! One simulation trial.

use crate::error::{Error, Result};
use crate::evaluator::{ReachabilityEvaluator, ORACLE};
use crate::results::{TrialResult, RUN};
use mcast_failure::{FailureInstance, FailureModel};
use mcast_topology::{NodeId, TopologyProvider, TreeBatch};
use rand::seq::SliceRandom;
use rand_chacha::ChaCha8Rng;
use std::collections::BTreeSet;
use tracing::{debug, warn};

/// Per-trial parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrialSettings {
    /// Redundant trees to request.
    pub ntrees: usize,
    /// Subscribers to sample.
    pub nsubscribers: usize,
    /// Tree-building heuristic name.
    pub heuristic: String,
}

impl TrialSettings {
    /// Checks the settings that do not depend on the topology.
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` for zero trees or subscribers, or a heuristic
    /// name that collides with a reserved result key.
    pub fn validate(&self) -> Result<()> {
        if self.ntrees == 0 {
            return Err(Error::config("ntrees must be at least 1"));
        }
        if self.nsubscribers == 0 {
            return Err(Error::config("nsubscribers must be at least 1"));
        }
        if [ORACLE, RUN].contains(&self.heuristic.as_str()) {
            return Err(Error::config(format!(
                "'{}' is a reserved result key",
                self.heuristic
            )));
        }
        Ok(())
    }
}

/// Runs trials against one topology provider and one failure model.
///
/// Subscriber and server choice draw from the runner's own stream; failure
/// draws come from the model's stream. The two never share state.
pub struct TrialRunner<P: TopologyProvider> {
    provider: P,
    failure_model: Box<dyn FailureModel>,
    rng: ChaCha8Rng,
    settings: TrialSettings,
}

impl<P: TopologyProvider> TrialRunner<P> {
    /// Creates a runner after checking the settings against the topology.
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` if the settings cannot be satisfied by the
    /// topology, or the failure model's own validation error.
    pub fn new(
        provider: P,
        failure_model: Box<dyn FailureModel>,
        rng: ChaCha8Rng,
        settings: TrialSettings,
    ) -> Result<Self> {
        settings.validate()?;
        if !provider.supports_heuristic(&settings.heuristic) {
            return Err(Error::config(format!(
                "unknown mcast heuristic '{}'",
                settings.heuristic
            )));
        }
        let hosts = provider.hosts().len();
        if settings.nsubscribers > hosts {
            return Err(Error::config(format!(
                "nsubscribers ({}) exceeds the {hosts} hosts in the topology",
                settings.nsubscribers
            )));
        }
        if provider.servers().is_empty() {
            return Err(Error::config("topology defines no servers"));
        }
        failure_model.validate(provider.topology())?;

        Ok(Self {
            provider,
            failure_model,
            rng,
            settings,
        })
    }

    /// Returns the topology provider.
    pub const fn provider(&self) -> &P {
        &self.provider
    }

    /// Returns the trial settings.
    pub const fn settings(&self) -> &TrialSettings {
        &self.settings
    }

    /// Samples `nsubscribers` distinct hosts.
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` if there are fewer hosts than requested.
    pub fn choose_subscribers(&mut self) -> Result<Vec<NodeId>> {
        let hosts = self.provider.hosts();
        let n = self.settings.nsubscribers;
        if n > hosts.len() {
            return Err(Error::config(format!(
                "cannot choose {n} subscribers from {} hosts",
                hosts.len()
            )));
        }
        let subscribers: Vec<NodeId> = hosts.choose_multiple(&mut self.rng, n).cloned().collect();
        debug!("Subscribers: {subscribers:?}");
        Ok(subscribers)
    }

    /// Picks the multicast source uniformly among the servers.
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` if the topology has no servers.
    pub fn choose_server(&mut self) -> Result<NodeId> {
        let server = self
            .provider
            .servers()
            .choose(&mut self.rng)
            .cloned()
            .ok_or_else(|| Error::config("topology defines no servers"))?;
        debug!("Server: {server}");
        Ok(server)
    }

    /// Draws this trial's failures. The topology is left untouched.
    pub fn apply_failure_model(&mut self) -> FailureInstance {
        let failures = self
            .failure_model
            .apply_failure_model(self.provider.topology());
        debug!("Failed nodes: {:?}", failures.failed_nodes);
        debug!("Failed links: {:?}", failures.failed_links);
        failures
    }

    /// Builds the redundant trees for this trial with the configured heuristic.
    ///
    /// # Errors
    ///
    /// Returns an error raised by the provider.
    pub fn build_mcast_trees(&self, source: &NodeId, subscribers: &[NodeId]) -> Result<TreeBatch> {
        let heuristic = &self.settings.heuristic;
        let trees = self.provider.redundant_multicast_trees(
            source,
            subscribers,
            self.settings.ntrees,
            heuristic,
        )?;
        if trees.len() < self.settings.ntrees {
            debug!(
                "{heuristic} built {} of {} requested trees",
                trees.len(),
                self.settings.ntrees
            );
        }
        Ok(TreeBatch::new(heuristic.as_str(), trees))
    }

    /// Scores the oracle and the tree batch under one set of failures.
    ///
    /// # Errors
    ///
    /// Returns `Error::EmptySubscribers` if `subscribers` is empty.
    pub fn evaluate(
        &self,
        run: usize,
        failures: &FailureInstance,
        server: &NodeId,
        subscribers: &BTreeSet<NodeId>,
        batch: &TreeBatch,
    ) -> Result<TrialResult> {
        let evaluator = ReachabilityEvaluator::new(failures, server, subscribers)?;
        let oracle = evaluator.reachability(ORACLE, [self.provider.topology()]);
        if batch.is_empty() {
            warn!("{} produced no trees in run {run}", batch.heuristic);
        }
        let heuristic = evaluator.reachability(&batch.heuristic, batch.graphs());
        Ok(TrialResult::new(run)
            .with(ORACLE, oracle)
            .with(batch.heuristic.as_str(), heuristic))
    }

    /// Runs one full trial: subscribers, server, failures, trees, scoring.
    ///
    /// # Errors
    ///
    /// Returns an error if any step fails.
    pub fn run_trial(&mut self, run: usize) -> Result<TrialResult> {
        let subscribers = self.choose_subscribers()?;
        let server = self.choose_server()?;
        let failures = self.apply_failure_model();
        let batch = self.build_mcast_trees(&server, &subscribers)?;
        let subscribers: BTreeSet<NodeId> = subscribers.into_iter().collect();
        self.evaluate(run, &failures, &server, &subscribers, &batch)
    }
}
