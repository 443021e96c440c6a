//! Run command implementation.

use anyhow::{Context, Result};
use clap::Args;
use mcast_failure::{FailureModelConfig, DEFAULT_FPROB};
use mcast_sim::{ExperimentConfig, ExperimentDriver};
use std::path::PathBuf;
use tracing::info;

/// Experiment options.
#[derive(Debug, Args)]
pub struct RunArgs {
    /// YAML experiment config; when given, the flags below are ignored
    #[arg(long)]
    config: Option<PathBuf>,

    /// Number of trials
    #[arg(short = 'r', long, default_value_t = 1)]
    nruns: usize,

    /// Redundant multicast trees per trial
    #[arg(short = 't', long, default_value_t = 3)]
    ntrees: usize,

    /// Tree-building heuristic (closure, paths)
    #[arg(short = 'a', long, default_value = "closure")]
    mcast_heuristic: String,

    /// Subscribers chosen per trial
    #[arg(short = 's', long, default_value_t = 5)]
    nsubscribers: usize,

    /// Topology type and parameters, e.g. `--topo campus 4 8 1`
    #[arg(long, num_args = 1.., default_value = "campus")]
    topo: Vec<String>,

    /// Output path for the results JSON
    #[arg(short = 'o', long, default_value = "results.json")]
    output_file: PathBuf,

    /// Seed for subscriber and server choice
    #[arg(long)]
    choice_rand_seed: Option<u64>,

    /// Seed for the failure model
    #[arg(long, visible_alias = "failure-rand-seed")]
    rand_seed: Option<u64>,

    /// Failure model (uniform, fixed)
    #[arg(long, default_value = "uniform")]
    fmodel: String,

    /// Per-switch and per-link failure probability (uniform model)
    #[arg(long, default_value_t = DEFAULT_FPROB)]
    fprob: f64,

    /// Switches to fail per trial (fixed model)
    #[arg(long, default_value_t = 0)]
    fail_nodes: usize,

    /// Links to fail per trial (fixed model)
    #[arg(long, default_value_t = 0)]
    fail_links: usize,
}

impl RunArgs {
    /// Resolves the experiment configuration from the config file or flags.
    fn to_config(&self) -> Result<ExperimentConfig> {
        if let Some(path) = &self.config {
            return ExperimentConfig::from_yaml_file(path)
                .with_context(|| format!("Failed to load config: {}", path.display()));
        }

        let failure_model =
            FailureModelConfig::named(&self.fmodel, self.fprob, self.fail_nodes, self.fail_links)
                .with_context(|| format!("Invalid failure model: {}", self.fmodel))?;
        let mut config = ExperimentConfig::default()
            .with_nruns(self.nruns)
            .with_ntrees(self.ntrees)
            .with_heuristic(self.mcast_heuristic.as_str())
            .with_nsubscribers(self.nsubscribers)
            .with_topo(self.topo.iter().map(String::as_str))
            .with_failure_model(failure_model)
            .with_output_file(self.output_file.clone());
        config.choice_rand_seed = self.choice_rand_seed;
        config.failure_rand_seed = self.rand_seed;
        Ok(config)
    }
}

/// Runs the run command.
pub fn run(args: &RunArgs) -> Result<()> {
    let config = args.to_config()?;
    info!("Topology: {}", config.topo.join(" "));

    let driver =
        ExperimentDriver::from_config(&config).with_context(|| "Invalid experiment configuration")?;
    let results = driver
        .run_all_experiments()
        .with_context(|| format!("Experiment failed ({})", config.output_file.display()))?;

    info!("Results fingerprint: {:016x}", results.fingerprint());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Parser)]
    struct Harness {
        #[command(flatten)]
        args: RunArgs,
    }

    fn parse(argv: &[&str]) -> ExperimentConfig {
        let harness = Harness::try_parse_from(std::iter::once("mcastsim").chain(argv.iter().copied()))
            .unwrap();
        harness.args.to_config().unwrap()
    }

    #[test]
    fn defaults_match_experiment_defaults() {
        assert_eq!(parse(&[]), ExperimentConfig::default());
    }

    #[test]
    fn short_flags() {
        let config = parse(&["-r", "10", "-t", "2", "-a", "paths", "-s", "3", "-o", "out.json"]);
        assert_eq!(config.nruns, 10);
        assert_eq!(config.ntrees, 2);
        assert_eq!(config.mcast_heuristic, "paths");
        assert_eq!(config.nsubscribers, 3);
        assert_eq!(config.output_file, PathBuf::from("out.json"));
    }

    #[test]
    fn topology_words_and_seeds() {
        let config = parse(&[
            "--topo",
            "campus",
            "6",
            "10",
            "--choice-rand-seed",
            "4",
            "--failure-rand-seed",
            "8",
        ]);
        assert_eq!(config.topo, ["campus", "6", "10"]);
        assert_eq!(config.choice_rand_seed, Some(4));
        assert_eq!(config.failure_rand_seed, Some(8));
    }

    #[test]
    fn fixed_failure_model_flags() {
        let config = parse(&["--fmodel", "fixed", "--fail-nodes", "2", "--fail-links", "1"]);
        assert_eq!(config.failure_model, FailureModelConfig::fixed(2, 1));
    }

    #[test]
    fn unknown_failure_model_is_rejected() {
        let harness = Harness::try_parse_from(["mcastsim", "--fmodel", "weibull"]).unwrap();
        assert!(harness.args.to_config().is_err());
    }
}
