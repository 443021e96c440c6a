//! Experiment driver: runs `nruns` trials and persists the results.

use crate::config::ExperimentConfig;
use crate::error::Result;
use crate::results::{ExperimentParams, ExperimentResults, TrialResult};
use crate::trial::TrialRunner;
use mcast_failure::rng_from_seed;
use mcast_topology::{SdnTopology, TopologyProvider};
use std::path::PathBuf;
use tracing::{debug, info};

/// Runs repeated trials and collects their results.
pub struct ExperimentDriver<P: TopologyProvider> {
    runner: TrialRunner<P>,
    nruns: usize,
    output_file: PathBuf,
    results: ExperimentResults,
}

impl ExperimentDriver<SdnTopology> {
    /// Sets up an experiment from its configuration.
    ///
    /// Everything that can be checked before the first trial is checked here,
    /// so a bad configuration yields no results at all.
    ///
    /// # Errors
    ///
    /// Returns a configuration, topology or failure model error.
    pub fn from_config(config: &ExperimentConfig) -> Result<Self> {
        config.validate()?;
        let spec = config.topology_spec()?;
        let provider = SdnTopology::from_spec(&spec)?;
        info!(
            "Loaded {spec} topology: {} hosts, {} servers",
            provider.hosts().len(),
            provider.servers().len()
        );

        let failure_model = config.failure_model.build(config.failure_rand_seed)?;
        let params = ExperimentParams::new(config, failure_model.params());
        let runner = TrialRunner::new(
            provider,
            failure_model,
            rng_from_seed(config.choice_rand_seed),
            config.trial_settings(),
        )?;
        Ok(Self::new(runner, config.nruns, config.output_file.clone(), params))
    }
}

impl<P: TopologyProvider> ExperimentDriver<P> {
    /// Creates a driver around an existing runner.
    pub fn new(
        runner: TrialRunner<P>,
        nruns: usize,
        output_file: impl Into<PathBuf>,
        params: ExperimentParams,
    ) -> Self {
        Self {
            runner,
            nruns,
            output_file: output_file.into(),
            results: ExperimentResults::new(params),
        }
    }

    /// Runs every trial in order, recording each result.
    ///
    /// # Errors
    ///
    /// Returns the first trial error; results recorded so far are kept.
    pub fn run_trials(&mut self) -> Result<()> {
        for run in 0..self.nruns {
            debug!("Starting run {run}");
            let result = self.runner.run_trial(run)?;
            self.record_result(result);
        }
        Ok(())
    }

    /// Appends one trial result.
    pub fn record_result(&mut self, result: TrialResult) {
        self.results.record(result);
    }

    /// Returns the results collected so far.
    pub const fn results(&self) -> &ExperimentResults {
        &self.results
    }

    /// Writes the results document to the output file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn output_results(&self) -> Result<()> {
        self.results.save(&self.output_file)?;
        info!(
            "Wrote {} trial results to {}",
            self.results.len(),
            self.output_file.display()
        );
        Ok(())
    }

    /// Runs all trials, logs the summary and writes the output file.
    ///
    /// # Errors
    ///
    /// Returns a trial or output error.
    pub fn run_all_experiments(mut self) -> Result<ExperimentResults> {
        info!(
            "Running {} trials with {} trees from '{}'",
            self.nruns,
            self.runner.settings().ntrees,
            self.runner.settings().heuristic
        );
        self.run_trials()?;
        for line in self.results.summary() {
            info!("{line}");
        }
        self.output_results()?;
        Ok(self.results)
    }
}
