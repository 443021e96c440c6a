//! Summarize command implementation.

use anyhow::{Context, Result};
use mcast_sim::ExperimentResults;
use std::fs::File;
use std::path::Path;
use tracing::info;

/// Runs the summarize command.
pub fn run(results_path: &Path, csv_path: Option<&Path>) -> Result<()> {
    let results = ExperimentResults::load(results_path)
        .with_context(|| format!("Failed to read results: {}", results_path.display()))?;
    info!(
        "{} trials, {} trees per trial, heuristic '{}'",
        results.len(),
        results.params.ntrees,
        results.params.mcast_heuristic
    );

    for summary in results.summary() {
        println!("{summary}");
    }

    if let Some(path) = csv_path {
        let file = File::create(path)
            .with_context(|| format!("Failed to create CSV file: {}", path.display()))?;
        results
            .write_csv(file)
            .with_context(|| format!("Failed to write CSV file: {}", path.display()))?;
        info!("Wrote CSV to {}", path.display());
    }

    Ok(())
}
