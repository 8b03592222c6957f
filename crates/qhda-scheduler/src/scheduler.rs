//! Main scheduler implementation
//!
//! Runs a batch through validation, conflict graph construction, coloring,
//! verification and reporting.

use crate::cancel::CancelFlag;
use crate::coloring::Colorer;
use crate::config::SchedulerConfig;
use crate::error::{SchedulerError, SchedulerResult};
use crate::graph::{BuildOptions, ConflictGraph};
use crate::order::{validate_batch, Order};
use crate::report::ScheduleReport;
use std::time::Instant;

/// Conflict-aware slot scheduler
///
/// Holds only configuration; each call to [`Scheduler::schedule`] is
/// independent and the scheduler can be shared across threads.
pub struct Scheduler {
    config: SchedulerConfig,
    colorer: Box<dyn Colorer>,
}

impl Default for Scheduler {
    fn default() -> Self {
        Self::new(SchedulerConfig::default())
    }
}

impl std::fmt::Debug for Scheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scheduler")
            .field("config", &self.config)
            .field("colorer", &self.colorer.name())
            .finish()
    }
}

impl Scheduler {
    /// Create a scheduler with the given configuration
    pub fn new(config: SchedulerConfig) -> Self {
        let colorer = config.colorer.build(&config.annealing);
        Self { config, colorer }
    }

    /// Active configuration
    pub fn config(&self) -> &SchedulerConfig {
        &self.config
    }

    /// Name of the active colorer
    pub fn colorer_name(&self) -> &'static str {
        self.colorer.name()
    }

    /// Schedule a batch using the conflict predicate
    pub fn schedule(&self, orders: &[Order]) -> SchedulerResult<ScheduleReport> {
        self.schedule_cancellable(orders, None, &CancelFlag::new())
    }

    /// Schedule a batch, optionally taking conflicts from a caller-supplied
    /// 0/1 matrix instead of the predicate
    pub fn schedule_with_matrix(
        &self,
        orders: &[Order],
        matrix: Option<&[Vec<u8>]>,
    ) -> SchedulerResult<ScheduleReport> {
        self.schedule_cancellable(orders, matrix, &CancelFlag::new())
    }

    /// Schedule a batch, giving up with [`SchedulerError::Cancelled`] once
    /// `cancel` is raised
    ///
    /// The batch is either scheduled completely or rejected; no partial
    /// schedule is ever returned.
    pub fn schedule_cancellable(
        &self,
        orders: &[Order],
        matrix: Option<&[Vec<u8>]>,
        cancel: &CancelFlag,
    ) -> SchedulerResult<ScheduleReport> {
        let started = Instant::now();

        if orders.len() > self.config.max_batch_size {
            tracing::warn!(
                size = orders.len(),
                limit = self.config.max_batch_size,
                "rejecting oversized batch"
            );
            return Err(SchedulerError::BatchTooLarge {
                size: orders.len(),
                limit: self.config.max_batch_size,
            });
        }

        validate_batch(orders, self.config.max_key_len)?;
        cancel.check()?;

        let graph = match matrix {
            Some(rows) => ConflictGraph::from_matrix(orders, rows)?,
            None => ConflictGraph::build(orders, &self.build_options()),
        };
        cancel.check()?;

        let coloring = self.colorer.color(&graph, cancel)?;
        cancel.check()?;

        if let Some((a, b)) = graph.find_violation(coloring.slots()) {
            tracing::error!(
                colorer = self.colorer.name(),
                first = graph.id(a),
                second = graph.id(b),
                "colorer produced an invalid schedule"
            );
            return Err(SchedulerError::InvalidColoring {
                colorer: self.colorer.name(),
                first: graph.id(a).to_string(),
                second: graph.id(b).to_string(),
                slot: coloring.slot_of(a),
            });
        }

        let report = ScheduleReport::build(
            &graph,
            &coloring,
            self.colorer.name(),
            &self.config.reduction,
            self.config.matrix_limit,
            started.elapsed(),
        );

        tracing::info!(
            orders = orders.len(),
            conflicts = report.total_conflicts,
            slots = report.total_slots,
            colorer = report.colorer,
            reduction = %report.conflict_reduction,
            elapsed_ms = report.elapsed.as_millis() as u64,
            "batch scheduled"
        );

        Ok(report)
    }

    fn build_options(&self) -> BuildOptions {
        BuildOptions {
            strategy: self.config.graph_strategy,
            index_threshold: self.config.index_threshold,
            parallel_threshold: self.config.parallel_threshold,
        }
    }
}
