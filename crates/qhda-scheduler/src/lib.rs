//! # qhda-scheduler
//!
//! Conflict-aware execution scheduler for batches of pending orders.
//!
//! Orders declare the resources (pools, accounts) they read and write. Two
//! orders conflict when one writes a resource the other reads or writes; the
//! scheduler places conflicting orders in different execution slots and
//! tries to use as few slots as possible.
//!
//! Features:
//! - Order model and batch validation
//! - Conflict graph construction (pairwise or key-indexed, optionally parallel)
//! - Interchangeable colorers (greedy, DSATUR, simulated annealing)
//! - Schedule verification and reporting
//! - Comparison against the one-order-per-slot baseline

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod cancel;
pub mod coloring;
pub mod compare;
pub mod config;
pub mod error;
#[cfg(any(test, feature = "fixtures"))]
pub mod fixtures;
pub mod graph;
pub mod matrix;
pub mod order;
pub mod report;
pub mod resource_key;
pub mod rw_set;
pub mod scheduler;

pub use cancel::CancelFlag;
pub use coloring::{
    AnnealingColorer, AnnealingConfig, Colorer, ColorerKind, Coloring, DsaturColorer,
    GreedyColorer,
};
pub use compare::{ComparisonResult, ReductionPolicy, Rounding, TiePolicy, Winner};
pub use config::SchedulerConfig;
pub use error::{ErrorKind, SchedulerError, SchedulerResult};
pub use graph::{BuildOptions, ConflictGraph, GraphStats, GraphStrategy};
pub use matrix::ConflictMatrix;
pub use order::{validate_batch, Order};
pub use report::{Schedule, ScheduleReport, Slot};
pub use resource_key::{KeyConvention, ResourceKey};
pub use rw_set::{ConflictSet, RWSet};
pub use scheduler::Scheduler;
