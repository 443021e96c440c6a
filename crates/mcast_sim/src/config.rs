//! Experiment configuration.

use crate::error::{Error, Result};
use crate::trial::TrialSettings;
use mcast_failure::FailureModelConfig;
use mcast_topology::TopologySpec;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Static configuration of one experiment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExperimentConfig {
    /// Number of trials to run.
    pub nruns: usize,
    /// Redundant multicast trees built per trial.
    pub ntrees: usize,
    /// Tree-building heuristic name.
    pub mcast_heuristic: String,
    /// Subscribers sampled per trial.
    pub nsubscribers: usize,
    /// Topology type and its parameters, e.g. `["campus", "4", "8"]`.
    pub topo: Vec<String>,
    /// Seed for subscriber and server choice.
    pub choice_rand_seed: Option<u64>,
    /// Seed for the failure model.
    pub failure_rand_seed: Option<u64>,
    /// Failure model selection.
    pub failure_model: FailureModelConfig,
    /// Where the JSON results are written.
    pub output_file: PathBuf,
}

impl Default for ExperimentConfig {
    fn default() -> Self {
        Self {
            nruns: 1,
            ntrees: 3,
            mcast_heuristic: "closure".to_string(),
            nsubscribers: 5,
            topo: vec!["campus".to_string()],
            choice_rand_seed: None,
            failure_rand_seed: None,
            failure_model: FailureModelConfig::default(),
            output_file: PathBuf::from("results.json"),
        }
    }
}

impl ExperimentConfig {
    /// Loads a config from a YAML file. Missing fields take their defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_yaml_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&content)
    }

    /// Parses a config from YAML.
    ///
    /// # Errors
    ///
    /// Returns an error if the YAML does not describe a config.
    pub fn from_yaml_str(content: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(content)?)
    }

    /// Sets the number of trials.
    #[must_use]
    pub const fn with_nruns(mut self, nruns: usize) -> Self {
        self.nruns = nruns;
        self
    }

    /// Sets the number of redundant trees.
    #[must_use]
    pub const fn with_ntrees(mut self, ntrees: usize) -> Self {
        self.ntrees = ntrees;
        self
    }

    /// Sets the number of subscribers.
    #[must_use]
    pub const fn with_nsubscribers(mut self, nsubscribers: usize) -> Self {
        self.nsubscribers = nsubscribers;
        self
    }

    /// Sets the heuristic.
    #[must_use]
    pub fn with_heuristic(mut self, heuristic: impl Into<String>) -> Self {
        self.mcast_heuristic = heuristic.into();
        self
    }

    /// Sets the topology spec words.
    #[must_use]
    pub fn with_topo<S: Into<String>>(mut self, words: impl IntoIterator<Item = S>) -> Self {
        self.topo = words.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the subscriber/server choice seed.
    #[must_use]
    pub const fn with_choice_rand_seed(mut self, seed: u64) -> Self {
        self.choice_rand_seed = Some(seed);
        self
    }

    /// Sets the failure model seed.
    #[must_use]
    pub const fn with_failure_rand_seed(mut self, seed: u64) -> Self {
        self.failure_rand_seed = Some(seed);
        self
    }

    /// Sets the failure model.
    #[must_use]
    pub fn with_failure_model(mut self, model: FailureModelConfig) -> Self {
        self.failure_model = model;
        self
    }

    /// Sets the output path.
    #[must_use]
    pub fn with_output_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.output_file = path.into();
        self
    }

    /// Parses the topology spec.
    ///
    /// # Errors
    ///
    /// Returns an error for an unrecognized or malformed topology.
    pub fn topology_spec(&self) -> Result<TopologySpec> {
        Ok(TopologySpec::parse(&self.topo)?)
    }

    /// Returns the per-trial settings.
    #[must_use]
    pub fn trial_settings(&self) -> TrialSettings {
        TrialSettings {
            ntrees: self.ntrees,
            nsubscribers: self.nsubscribers,
            heuristic: self.mcast_heuristic.clone(),
        }
    }

    /// Checks the parts of the config that do not depend on the topology.
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` describing the first problem found.
    pub fn validate(&self) -> Result<()> {
        self.trial_settings().validate()?;
        self.topology_spec()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evaluator::ORACLE;
    use crate::results::RUN;

    #[test]
    fn default_config_is_valid() {
        assert!(ExperimentConfig::default().validate().is_ok());
    }

    #[test]
    fn yaml_fills_missing_fields_with_defaults() {
        let yaml = "
nruns: 50
topo: [campus, '6', '10']
failure_model:
  fmodel: fixed
  nodes: 1
  links: 2
";
        let config = ExperimentConfig::from_yaml_str(yaml).unwrap();
        assert_eq!(config.nruns, 50);
        assert_eq!(config.ntrees, 3);
        assert_eq!(config.topo, ["campus", "6", "10"]);
        assert_eq!(config.failure_model, FailureModelConfig::fixed(1, 2));
    }

    #[test]
    fn reserved_heuristic_names_are_rejected() {
        for name in [ORACLE, RUN] {
            let config = ExperimentConfig::default().with_heuristic(name);
            assert!(matches!(config.validate(), Err(Error::Config(_))), "{name}");
        }
    }

    #[test]
    fn zero_subscribers_is_rejected() {
        let config = ExperimentConfig::default().with_nsubscribers(0);
        assert!(matches!(config.validate(), Err(Error::Config(_))));
    }

    #[test]
    fn unknown_topology_is_rejected() {
        let config = ExperimentConfig::default().with_topo(["ns3"]);
        assert!(matches!(
            config.validate(),
            Err(Error::Topology(mcast_topology::Error::UnknownTopology(_)))
        ));
    }
}
