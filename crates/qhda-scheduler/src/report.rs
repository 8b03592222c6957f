//! Schedule reporting
//!
//! Packages a coloring into slot membership lists plus the statistics shown
//! to callers. No scheduling decisions are made here.

use crate::coloring::Coloring;
use crate::compare::{ComparisonResult, ReductionPolicy};
use crate::graph::{ConflictGraph, GraphStats};
use crate::matrix::ConflictMatrix;
use std::collections::BTreeMap;
use std::time::Duration;

/// One execution slot; its orders may run concurrently
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Slot {
    /// Zero-based slot number
    pub index: usize,
    /// Member order identifiers, in batch order
    pub orders: Vec<String>,
}

impl Slot {
    /// Wire label, 1-based: `slot_1`, `slot_2`, ...
    pub fn label(&self) -> String {
        format!("slot_{}", self.index + 1)
    }

    /// Get number of orders in the slot
    pub fn len(&self) -> usize {
        self.orders.len()
    }

    /// Check if slot is empty
    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }
}

/// Slot membership for a whole batch
///
/// Every order of the batch is in exactly one slot.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Schedule {
    slots: Vec<Slot>,
}

impl Schedule {
    /// Group the nodes of `graph` by their slot in `coloring`
    pub fn from_coloring(graph: &ConflictGraph, coloring: &Coloring) -> Self {
        let mut slots: Vec<Slot> = (0..coloring.slot_count())
            .map(|index| Slot {
                index,
                orders: Vec::new(),
            })
            .collect();
        for (node, &slot) in coloring.slots().iter().enumerate() {
            slots[slot].orders.push(graph.id(node).to_string());
        }
        Self { slots }
    }

    /// Slots in ascending order
    pub fn slots(&self) -> &[Slot] {
        &self.slots
    }

    /// Get number of slots
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Check if schedule has no slots
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Total number of scheduled orders
    pub fn order_count(&self) -> usize {
        self.slots.iter().map(Slot::len).sum()
    }

    /// Slot number holding the given order
    pub fn slot_of(&self, order_id: &str) -> Option<usize> {
        self.slots
            .iter()
            .find(|slot| slot.orders.iter().any(|id| id == order_id))
            .map(|slot| slot.index)
    }

    /// Label → member identifiers
    pub fn to_map(&self) -> BTreeMap<String, Vec<String>> {
        self.slots
            .iter()
            .map(|slot| (slot.label(), slot.orders.clone()))
            .collect()
    }
}

/// Everything reported for one scheduled batch
#[derive(Clone, Debug)]
pub struct ScheduleReport {
    /// Slot membership
    pub schedule: Schedule,
    /// Number of slots used
    pub total_slots: usize,
    /// Conflicting pairs in the batch
    pub total_conflicts: usize,
    /// Dense matrix, omitted above the configured size
    pub conflict_matrix: Option<ConflictMatrix>,
    /// Reduction against the baseline, e.g. "50%"
    pub conflict_reduction: String,
    /// Baseline comparison
    pub comparison: ComparisonResult,
    /// Conflict graph statistics
    pub graph_stats: GraphStats,
    /// Name of the colorer that produced the schedule
    pub colorer: &'static str,
    /// Wall time spent scheduling
    pub elapsed: Duration,
}

impl ScheduleReport {
    /// Aggregate a verified coloring into a report
    pub fn build(
        graph: &ConflictGraph,
        coloring: &Coloring,
        colorer: &'static str,
        policy: &ReductionPolicy,
        matrix_limit: usize,
        elapsed: Duration,
    ) -> Self {
        let schedule = Schedule::from_coloring(graph, coloring);
        let conflicts_remaining = graph
            .edges()
            .filter(|&(a, b)| coloring.slot_of(a) == coloring.slot_of(b))
            .count();
        let comparison = ComparisonResult::evaluate(
            graph.len(),
            coloring.slot_count(),
            conflicts_remaining,
            policy,
        );
        let conflict_matrix =
            (graph.len() <= matrix_limit).then(|| ConflictMatrix::from_graph(graph));

        Self {
            total_slots: schedule.len(),
            total_conflicts: graph.edge_count(),
            conflict_reduction: policy.statement(comparison.reduction_pct),
            schedule,
            conflict_matrix,
            comparison,
            graph_stats: graph.stats(),
            colorer,
            elapsed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cancel::CancelFlag;
    use crate::coloring::{Colorer, GreedyColorer};
    use crate::compare::Winner;
    use crate::order::Order;

    fn pool_pairs() -> ConflictGraph {
        let orders = vec![
            Order::new("order_1").writing("pool_A"),
            Order::new("order_2").writing("pool_A"),
            Order::new("order_3").writing("pool_B"),
            Order::new("order_4").writing("pool_B"),
        ];
        ConflictGraph::build_pairwise(&orders, false)
    }

    fn report(graph: &ConflictGraph, matrix_limit: usize) -> ScheduleReport {
        let coloring = GreedyColorer.color(graph, &CancelFlag::new()).unwrap();
        ScheduleReport::build(
            graph,
            &coloring,
            "greedy",
            &ReductionPolicy::default(),
            matrix_limit,
            Duration::ZERO,
        )
    }

    #[test]
    fn test_pool_pairs_report() {
        let graph = pool_pairs();
        let report = report(&graph, 256);

        assert_eq!(report.total_slots, 2);
        assert_eq!(report.total_conflicts, 2);
        assert_eq!(report.conflict_reduction, "50%");
        assert_eq!(report.comparison.winner, Winner::Coloring);
        assert_eq!(report.comparison.achieved_conflicts_remaining, 0);
        assert_eq!(report.schedule.order_count(), 4);
        assert_ne!(
            report.schedule.slot_of("order_1"),
            report.schedule.slot_of("order_2")
        );
        assert_eq!(report.graph_stats.edges, 2);
        assert_eq!(report.colorer, "greedy");

        let map = report.schedule.to_map();
        assert_eq!(map.len(), 2);
        assert_eq!(map["slot_1"], vec!["order_1", "order_3"]);
        assert_eq!(map["slot_2"], vec!["order_2", "order_4"]);
    }

    #[test]
    fn test_matrix_limit() {
        let graph = pool_pairs();
        assert!(report(&graph, 4).conflict_matrix.is_some());
        assert!(report(&graph, 3).conflict_matrix.is_none());
    }

    #[test]
    fn test_empty_report() {
        let report = report(&ConflictGraph::default(), 256);
        assert_eq!(report.total_slots, 0);
        assert!(report.schedule.is_empty());
        assert!(report.schedule.to_map().is_empty());
        assert_eq!(report.conflict_reduction, "0%");
        assert_eq!(report.schedule.slot_of("missing"), None);
    }

    #[test]
    fn test_slot_labels_are_one_based() {
        let slot = Slot {
            index: 0,
            orders: vec!["a".to_string()],
        };
        assert_eq!(slot.label(), "slot_1");
        assert_eq!(slot.len(), 1);
        assert!(!slot.is_empty());
    }
}
