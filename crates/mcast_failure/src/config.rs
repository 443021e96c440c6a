//! Serializable failure model selection.

use crate::error::{Error, Result};
use crate::fixed::FixedCountFailureModel;
use crate::model::FailureModel;
use crate::uniform::UniformFailureModel;
use serde::{Deserialize, Serialize};

/// Default per-element failure probability.
pub const DEFAULT_FPROB: f64 = 0.1;

/// Which failure model to use, and its parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "fmodel", rename_all = "lowercase")]
pub enum FailureModelConfig {
    /// Independent switch and link failures.
    Uniform {
        /// Failure probability per switch and per link.
        fprob: f64,
    },
    /// A fixed number of switch and link failures.
    Fixed {
        /// Switches to fail.
        nodes: usize,
        /// Links to fail.
        links: usize,
    },
}

impl Default for FailureModelConfig {
    fn default() -> Self {
        Self::uniform(DEFAULT_FPROB)
    }
}

impl FailureModelConfig {
    /// Creates a uniform model config.
    #[must_use]
    pub const fn uniform(fprob: f64) -> Self {
        Self::Uniform { fprob }
    }

    /// Creates a fixed-count model config.
    #[must_use]
    pub const fn fixed(nodes: usize, links: usize) -> Self {
        Self::Fixed { nodes, links }
    }

    /// Selects a model by name, taking only the parameters it uses.
    ///
    /// # Errors
    ///
    /// Returns `Error::UnknownModel` for an unrecognized name.
    pub fn named(name: &str, fprob: f64, nodes: usize, links: usize) -> Result<Self> {
        match name {
            "uniform" => Ok(Self::uniform(fprob)),
            "fixed" => Ok(Self::fixed(nodes, links)),
            other => Err(Error::UnknownModel(other.to_string())),
        }
    }

    /// Builds the model with its own random stream.
    ///
    /// # Errors
    ///
    /// Returns an error if the parameters are invalid.
    pub fn build(&self, seed: Option<u64>) -> Result<Box<dyn FailureModel>> {
        let model: Box<dyn FailureModel> = match *self {
            Self::Uniform { fprob } => Box::new(UniformFailureModel::new(fprob, seed)?),
            Self::Fixed { nodes, links } => Box::new(FixedCountFailureModel::new(nodes, links, seed)),
        };
        Ok(model)
    }
}
