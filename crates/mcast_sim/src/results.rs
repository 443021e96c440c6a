//! Experiment results document.
//!
//! Persisted as one JSON document:
//!
//! ```json
//! {
//!   "params": { "ntrees": 3, "nsubscribers": 5, "failure_model": {...}, ... },
//!   "results": [ { "closure": 0.8, "oracle": 1.0, "run": 0 }, ... ]
//! }
//! ```

use crate::config::ExperimentConfig;
use crate::error::Result;
use crate::evaluator::ORACLE;
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;
use xxhash_rust::xxh64::Xxh64;

/// Result key holding the trial index.
pub const RUN: &str = "run";

/// Reachability fractions of one trial, keyed by heuristic name.
///
/// Serialized as one flat object whose keys, `run` included, are sorted.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TrialResult {
    /// Trial index.
    pub run: usize,
    /// Fraction of subscribers reached, per heuristic (including `oracle`).
    #[serde(flatten)]
    pub reachability: BTreeMap<String, f64>,
}

impl TrialResult {
    /// Creates an empty result for the given run.
    #[must_use]
    pub const fn new(run: usize) -> Self {
        Self {
            run,
            reachability: BTreeMap::new(),
        }
    }

    /// Records a heuristic's reachability.
    #[must_use]
    pub fn with(mut self, heuristic: impl Into<String>, fraction: f64) -> Self {
        self.reachability.insert(heuristic.into(), fraction);
        self
    }

    /// Returns a heuristic's reachability.
    #[must_use]
    pub fn get(&self, heuristic: &str) -> Option<f64> {
        self.reachability.get(heuristic).copied()
    }

    /// Returns the oracle reachability.
    #[must_use]
    pub fn oracle(&self) -> Option<f64> {
        self.get(ORACLE)
    }
}

impl Serialize for TrialResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        let mut run_written = false;
        for (heuristic, value) in &self.reachability {
            if heuristic.as_str() == RUN {
                continue;
            }
            if !run_written && heuristic.as_str() > RUN {
                map.serialize_entry(RUN, &self.run)?;
                run_written = true;
            }
            map.serialize_entry(heuristic, value)?;
        }
        if !run_written {
            map.serialize_entry(RUN, &self.run)?;
        }
        map.end()
    }
}

/// Static run parameters recorded alongside the results.
///
/// Fields are declared in key order so the output is sorted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExperimentParams {
    /// Failure model seed.
    pub failrandseed: Option<u64>,
    /// Failure model parameters.
    pub failure_model: serde_json::Value,
    /// Heuristic used to build trees.
    pub mcast_heuristic: String,
    /// Number of trials.
    pub nruns: usize,
    /// Subscribers per trial.
    pub nsubscribers: usize,
    /// Redundant trees per trial.
    pub ntrees: usize,
    /// Subscriber/server choice seed.
    pub randseed: Option<u64>,
    /// Topology spec words.
    pub topo: Vec<String>,
}

impl ExperimentParams {
    /// Captures the parameters of a config.
    #[must_use]
    pub fn new(config: &ExperimentConfig, failure_model: serde_json::Value) -> Self {
        Self {
            failrandseed: config.failure_rand_seed,
            failure_model,
            mcast_heuristic: config.mcast_heuristic.clone(),
            nruns: config.nruns,
            nsubscribers: config.nsubscribers,
            ntrees: config.ntrees,
            randseed: config.choice_rand_seed,
            topo: config.topo.clone(),
        }
    }
}

/// Parameters plus the append-only list of trial results.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExperimentResults {
    /// Run parameters.
    pub params: ExperimentParams,
    /// One entry per trial, in run order.
    pub results: Vec<TrialResult>,
}

impl ExperimentResults {
    /// Creates an empty document.
    #[must_use]
    pub const fn new(params: ExperimentParams) -> Self {
        Self {
            params,
            results: Vec::new(),
        }
    }

    /// Appends a trial result.
    pub fn record(&mut self, result: TrialResult) {
        self.results.push(result);
    }

    /// Returns the number of recorded trials.
    #[must_use]
    pub fn len(&self) -> usize {
        self.results.len()
    }

    /// Returns true if no trials are recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    /// Writes the document as pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn save(&self, path: &Path) -> Result<()> {
        let mut writer = BufWriter::new(File::create(path)?);
        serde_json::to_writer_pretty(&mut writer, self)?;
        writeln!(writer)?;
        writer.flush()?;
        Ok(())
    }

    /// Reads a document written by [`ExperimentResults::save`].
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        let reader = BufReader::new(File::open(path)?);
        Ok(serde_json::from_reader(reader)?)
    }

    /// Writes the results as long-form CSV: `run,heuristic,reachability`.
    ///
    /// # Errors
    ///
    /// Returns an error if writing fails.
    pub fn write_csv<W: Write>(&self, writer: W) -> Result<()> {
        #[derive(Serialize)]
        struct Row<'a> {
            run: usize,
            heuristic: &'a str,
            reachability: f64,
        }

        let mut csv = csv::Writer::from_writer(writer);
        for trial in &self.results {
            for (heuristic, &reachability) in &trial.reachability {
                csv.serialize(Row {
                    run: trial.run,
                    heuristic,
                    reachability,
                })?;
            }
        }
        csv.flush()?;
        Ok(())
    }

    /// Returns per-heuristic statistics over all trials, sorted by name.
    #[must_use]
    pub fn summary(&self) -> Vec<HeuristicSummary> {
        let mut samples: BTreeMap<&str, Vec<f64>> = BTreeMap::new();
        for trial in &self.results {
            for (heuristic, &value) in &trial.reachability {
                samples.entry(heuristic).or_default().push(value);
            }
        }
        samples
            .into_iter()
            .map(|(heuristic, values)| HeuristicSummary::from_samples(heuristic, &values))
            .collect()
    }

    /// Returns a hash of every recorded result value.
    ///
    /// Two experiments with the same seeds and configuration produce the
    /// same fingerprint.
    #[must_use]
    pub fn fingerprint(&self) -> u64 {
        let mut hasher = Xxh64::new(0);
        for trial in &self.results {
            hasher.update(&trial.run.to_le_bytes());
            for (heuristic, value) in &trial.reachability {
                hasher.update(heuristic.as_bytes());
                hasher.update(&value.to_bits().to_le_bytes());
            }
        }
        hasher.digest()
    }
}

/// Aggregate reachability of one heuristic across trials.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HeuristicSummary {
    /// Heuristic name.
    pub heuristic: String,
    /// Trials that recorded this heuristic.
    pub runs: usize,
    /// Mean reachability.
    pub mean: f64,
    /// Lowest reachability.
    pub min: f64,
    /// Highest reachability.
    pub max: f64,
    /// Population standard deviation.
    pub std_dev: f64,
}

impl HeuristicSummary {
    #[allow(clippy::cast_precision_loss)]
    fn from_samples(heuristic: &str, values: &[f64]) -> Self {
        let runs = values.len();
        let n = runs.max(1) as f64;
        let mean = values.iter().sum::<f64>() / n;
        let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
        Self {
            heuristic: heuristic.to_string(),
            runs,
            mean,
            min: values.iter().copied().fold(f64::INFINITY, f64::min),
            max: values.iter().copied().fold(f64::NEG_INFINITY, f64::max),
            std_dev: variance.sqrt(),
        }
    }
}

impl fmt::Display for HeuristicSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:<10} runs={:<5} mean={:.4} std={:.4} min={:.4} max={:.4}",
            self.heuristic, self.runs, self.mean, self.std_dev, self.min, self.max
        )
    }
}
