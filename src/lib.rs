#![warn(warnings)]
#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::needless_return)]
#![allow(clippy::items_after_statements)]
#![allow(clippy::module_name_repetitions)]

//! Label-setting core for the fixed route vehicle charging problem (FRVCP).
//!
//! Given a fixed node sequence with per-arc time and energy costs, an
//! external driver grows partial paths as [`Label`]s whose resource profile
//! maps elapsed time to the best reachable state of charge. This crate holds
//! the primitives the driver is built from:
//!
//! - [`Label`] / [`LabelArena`]: immutable labels with bicriteria dominance,
//!   profile evaluation and a total processing order.
//! - [`LabelQueue`]: decrease-key priority queue over labels.
//! - [`Frontier`] / [`Frontiers`]: per-node Pareto sets.
//! - reconstruction of route and charging schedule from a terminal label
//!   ([`Label::route`], [`Label::charging_amounts`]).
//! - [`FrvcpInstance`]: arc costs and station charging functions.
//!
//! The driver loop itself is not part of this crate: pop a label, extend it
//! along the route and through charging decisions, offer each child to its
//! node's frontier, repeat until the queue is empty.

pub mod config;
pub mod error;
pub mod frontier;
pub mod instance;
pub mod label;
pub mod node;
pub mod queue;
pub mod reconstruct;
pub mod soc;

pub use config::LabelingConfig;
pub use error::{FrontierError, InstanceError, LabelError, QueueError};
pub use frontier::{Admission, Frontier, Frontiers};
pub use instance::{ChargingFunction, FrvcpInstance};
pub use label::{Label, LabelArena, LabelId, LabelPriority, LabelState};
pub use node::{Node, NodeId, NodeType};
pub use queue::LabelQueue;
pub use reconstruct::FeasibleRoute;
pub use soc::SocFunction;
