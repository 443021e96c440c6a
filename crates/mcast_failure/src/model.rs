//! The failure model trait.

use crate::instance::FailureInstance;
use crate::error::Result;
use mcast_topology::Topology;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// Draws one failure instance per trial from some distribution.
pub trait FailureModel {
    /// Returns the model name (e.g., "uniform").
    fn name(&self) -> &'static str;

    /// Checks that the model can be applied to `topology`. Called once at
    /// experiment setup, before any trial runs.
    ///
    /// # Errors
    ///
    /// Returns an error if the model's configuration cannot fit the topology.
    fn validate(&self, _topology: &Topology) -> Result<()> {
        Ok(())
    }

    /// Selects the nodes and links that fail in one trial. The topology is
    /// only read.
    fn apply_failure_model(&mut self, topology: &Topology) -> FailureInstance;

    /// Returns the model configuration, recorded with the experiment results.
    fn params(&self) -> serde_json::Value;
}

/// Creates a random stream from an optional seed, falling back to OS entropy.
#[must_use]
pub fn rng_from_seed(seed: Option<u64>) -> ChaCha8Rng {
    seed.map_or_else(ChaCha8Rng::from_entropy, ChaCha8Rng::seed_from_u64)
}
