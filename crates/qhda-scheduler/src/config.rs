//! Scheduler configuration

use crate::coloring::{AnnealingConfig, ColorerKind};
use crate::compare::ReductionPolicy;
use crate::graph::GraphStrategy;
use serde::{Deserialize, Serialize};

/// Default ceiling on orders per batch
pub const DEFAULT_MAX_BATCH_SIZE: usize = 10_000;

/// Default maximum resource key length in bytes
pub const DEFAULT_MAX_KEY_LEN: usize = 256;

/// Default batch size at which `auto` switches to the indexed graph builder
pub const DEFAULT_INDEX_THRESHOLD: usize = 128;

/// Default batch size at which graph construction fans out over worker threads
pub const DEFAULT_PARALLEL_THRESHOLD: usize = 512;

/// Default largest batch whose conflict matrix is included in reports
pub const DEFAULT_MATRIX_LIMIT: usize = 256;

/// Configuration passed into [`crate::Scheduler::new`]
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchedulerConfig {
    /// Batches larger than this are rejected with a capacity error
    pub max_batch_size: usize,
    /// Resource keys longer than this are rejected
    pub max_key_len: usize,
    /// Coloring strategy
    pub colorer: ColorerKind,
    /// Conflict graph construction strategy
    pub graph_strategy: GraphStrategy,
    /// Batch size at which `auto` uses the resource-key index
    pub index_threshold: usize,
    /// Batch size at which graph construction runs in parallel
    pub parallel_threshold: usize,
    /// Largest batch whose conflict matrix is reported
    pub matrix_limit: usize,
    /// Reduction rounding and winner tie-break
    pub reduction: ReductionPolicy,
    /// Parameters for the annealing colorer
    pub annealing: AnnealingConfig,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            max_batch_size: DEFAULT_MAX_BATCH_SIZE,
            max_key_len: DEFAULT_MAX_KEY_LEN,
            colorer: ColorerKind::default(),
            graph_strategy: GraphStrategy::default(),
            index_threshold: DEFAULT_INDEX_THRESHOLD,
            parallel_threshold: DEFAULT_PARALLEL_THRESHOLD,
            matrix_limit: DEFAULT_MATRIX_LIMIT,
            reduction: ReductionPolicy::default(),
            annealing: AnnealingConfig::default(),
        }
    }
}

impl SchedulerConfig {
    /// Use the given colorer
    pub fn with_colorer(mut self, colorer: ColorerKind) -> Self {
        self.colorer = colorer;
        self
    }

    /// Use the given batch ceiling
    pub fn with_max_batch_size(mut self, max_batch_size: usize) -> Self {
        self.max_batch_size = max_batch_size;
        self
    }

    /// Use the given graph strategy
    pub fn with_graph_strategy(mut self, strategy: GraphStrategy) -> Self {
        self.graph_strategy = strategy;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compare::{Rounding, TiePolicy};

    #[test]
    fn test_defaults() {
        let config = SchedulerConfig::default();
        assert_eq!(config.max_batch_size, 10_000);
        assert_eq!(config.max_key_len, 256);
        assert_eq!(config.colorer, ColorerKind::Greedy);
        assert_eq!(config.graph_strategy, GraphStrategy::Auto);
        assert_eq!(config.matrix_limit, 256);
        assert_eq!(config.reduction.rounding, Rounding::Whole);
        assert_eq!(config.reduction.ties, TiePolicy::Baseline);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let json = r#"{ "colorer": "dsatur", "max_batch_size": 50 }"#;
        let config: SchedulerConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.colorer, ColorerKind::Dsatur);
        assert_eq!(config.max_batch_size, 50);
        assert_eq!(config.parallel_threshold, DEFAULT_PARALLEL_THRESHOLD);
        assert_eq!(config.annealing, AnnealingConfig::default());
    }

    #[test]
    fn test_builders() {
        let config = SchedulerConfig::default()
            .with_colorer(ColorerKind::Annealing)
            .with_max_batch_size(3)
            .with_graph_strategy(GraphStrategy::Pairwise);
        assert_eq!(config.colorer, ColorerKind::Annealing);
        assert_eq!(config.max_batch_size, 3);
        assert_eq!(config.graph_strategy, GraphStrategy::Pairwise);
    }
}
