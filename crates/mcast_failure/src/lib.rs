//! Stochastic failure models for mcastsim.
//!
//! This crate provides:
//! - `FailureInstance`, the nodes and links failed in one trial
//! - The `FailureModel` trait that draws failure instances
//! - Uniform (independent Bernoulli) and fixed-count failure models
//! - `FailureModelConfig`, the serializable model selection
//!
//! Every model owns its own seeded random stream, so failure draws can be
//! reproduced independently of any other randomness in an experiment.
//!
//! # Example
//!
//! ```rust,ignore
//! use mcast_failure::FailureModelConfig;
//!
//! let mut model = FailureModelConfig::uniform(0.1).build(Some(7))?;
//! let failures = model.apply_failure_model(&topology);
//! ```

#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

pub mod config;
pub mod error;
pub mod fixed;
pub mod instance;
pub mod model;
pub mod uniform;

pub use config::{FailureModelConfig, DEFAULT_FPROB};
pub use error::{Error, Result};
pub use fixed::FixedCountFailureModel;
pub use instance::FailureInstance;
pub use model::{rng_from_seed, FailureModel};
pub use uniform::UniformFailureModel;
