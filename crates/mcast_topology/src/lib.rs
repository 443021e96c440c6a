//! Network topology model for mcastsim.
//!
//! This crate provides:
//! - An undirected graph of switches, hosts and servers
//! - Topology generators (campus, path, grid) and JSON topology files
//! - Pluggable multicast tree heuristics with redundancy
//! - The `TopologyProvider` seam consumed by the trial runner
//!
//! # Example
//!
//! ```rust,ignore
//! use mcast_topology::{SdnTopology, TopologyProvider, TopologySpec};
//!
//! let spec = TopologySpec::parse(&["campus".to_string()])?;
//! let provider = SdnTopology::from_spec(&spec)?;
//! let trees = provider.redundant_multicast_trees(&source, &subscribers, 3, "closure")?;
//! ```

#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

pub mod error;
pub mod heuristics;
pub mod node;
pub mod provider;
pub mod spec;
pub mod topology;
pub mod tree;

pub use error::{Error, Result};
pub use heuristics::{HeuristicRegistry, LinkCosts, TreeBuilder};
pub use node::{Link, NodeId, NodeKind};
pub use provider::{SdnTopology, TopologyProvider};
pub use spec::TopologySpec;
pub use topology::{Node, Topology};
pub use tree::{MulticastTree, TreeBatch};
