//! Monte-Carlo evaluation of redundant multicast trees under failures.
//!
//! Each trial samples subscribers and a source, draws a failure instance,
//! builds redundant multicast trees with one heuristic, and measures which
//! fraction of the subscribers the trees still reach. The same measurement
//! over the full topology (the `oracle`) gives the upper bound every
//! heuristic is compared against.
//!
//! # Reproducibility
//!
//! Two independent seeded streams drive an experiment: one for subscriber
//! and server choice, owned by the [`TrialRunner`], and one owned by the
//! failure model. Fixing both seeds replays an experiment exactly.
//!
//! # Example
//!
//! ```rust,ignore
//! use mcast_sim::{ExperimentConfig, ExperimentDriver};
//!
//! let config = ExperimentConfig::default().with_nruns(100).with_choice_rand_seed(7);
//! let results = ExperimentDriver::from_config(&config)?.run_all_experiments()?;
//! ```

#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

pub mod config;
pub mod driver;
pub mod error;
pub mod evaluator;
pub mod results;
pub mod trial;

pub use config::ExperimentConfig;
pub use driver::ExperimentDriver;
pub use error::{Error, Result};
pub use evaluator::{reachability, ReachabilityEvaluator, ORACLE};
pub use results::{ExperimentParams, ExperimentResults, HeuristicSummary, TrialResult, RUN};
pub use trial::{TrialRunner, TrialSettings};
