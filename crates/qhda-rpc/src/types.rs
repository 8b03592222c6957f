//! Wire types for the scheduling API

use qhda_scheduler::{
    ComparisonResult, Order, RWSet, ResourceKey, ScheduleReport, SchedulerConfig,
};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Body of `POST /api/scheduler`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleRequest {
    /// Orders to schedule
    #[serde(alias = "orders")]
    pub pending_orders: Vec<OrderInput>,
    /// Conflicts to use instead of the read/write sets, one 0/1 row per order
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conflict_matrix: Option<Vec<Vec<u8>>>,
}

/// A pending order as sent by clients
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderInput {
    /// Order identifier
    pub id: String,
    /// Classification tag
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    /// Trading pair label
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pair: Option<String>,
    /// Originating account
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account: Option<String>,
    /// Resource keys read
    #[serde(default)]
    pub reads: Vec<String>,
    /// Resource keys written
    #[serde(default)]
    pub writes: Vec<String>,
}

impl From<OrderInput> for Order {
    fn from(input: OrderInput) -> Self {
        Order {
            id: input.id,
            kind: input.kind,
            pair: input.pair,
            account: input.account,
            rw_set: RWSet::from_lists(input.reads, input.writes),
        }
    }
}

impl From<&Order> for OrderInput {
    fn from(order: &Order) -> Self {
        Self {
            id: order.id.clone(),
            kind: order.kind.clone(),
            pair: order.pair.clone(),
            account: order.account.clone(),
            reads: sorted_keys(&order.rw_set.reads),
            writes: sorted_keys(&order.rw_set.writes),
        }
    }
}

fn sorted_keys(keys: &HashSet<ResourceKey>) -> Vec<String> {
    let mut keys: Vec<String> = keys.iter().map(|k| k.as_str().to_string()).collect();
    keys.sort();
    keys
}

/// Graph statistics returned alongside a schedule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphMetrics {
    /// Number of orders
    pub nodes: usize,
    /// Number of conflicting pairs
    pub edges: usize,
    /// Most conflicts of any single order
    pub max_degree: usize,
    /// Edges over possible pairs
    pub density: f64,
    /// Slots used by the coloring
    pub coloring_slots: usize,
    /// Slots used by the sequential baseline
    pub baseline_slots: usize,
}

/// Response of `POST /api/scheduler`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleResponse {
    /// Slot label → order identifiers, in slot order
    pub schedule: IndexMap<String, Vec<String>>,
    /// Number of slots used
    pub total_slots: usize,
    /// Dense 0/1 conflict matrix, omitted for large batches
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conflict_matrix: Option<Vec<Vec<u8>>>,
    /// Conflicting pairs in the batch
    pub total_conflicts: usize,
    /// Reduction against the baseline, e.g. "50%"
    pub conflict_reduction: String,
    /// Baseline comparison
    pub comparison: ComparisonResult,
    /// Conflict graph statistics
    pub graph_metrics: GraphMetrics,
    /// Colorer that produced the schedule
    pub colorer: String,
    /// Scheduling time in milliseconds
    pub elapsed_ms: f64,
}

impl From<ScheduleReport> for ScheduleResponse {
    fn from(report: ScheduleReport) -> Self {
        let elapsed_ms = (report.elapsed.as_secs_f64() * 1000.0 * 100.0).round() / 100.0;
        Self {
            schedule: report
                .schedule
                .slots()
                .iter()
                .map(|slot| (slot.label(), slot.orders.clone()))
                .collect(),
            total_slots: report.total_slots,
            conflict_matrix: report.conflict_matrix.as_ref().map(|m| m.to_rows()),
            total_conflicts: report.total_conflicts,
            conflict_reduction: report.conflict_reduction,
            graph_metrics: GraphMetrics {
                nodes: report.graph_stats.nodes,
                edges: report.graph_stats.edges,
                max_degree: report.graph_stats.max_degree,
                density: report.graph_stats.density,
                coloring_slots: report.comparison.achieved_slots,
                baseline_slots: report.comparison.baseline_slots,
            },
            comparison: report.comparison,
            colorer: report.colorer.to_string(),
            elapsed_ms,
        }
    }
}

/// Response of `GET /api/scheduler/status`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusResponse {
    /// Whether the service accepts batches
    pub ready: bool,
    /// Service version
    pub version: String,
    /// Active colorer
    pub colorer: String,
    /// Largest accepted batch
    pub max_batch_size: usize,
    /// Largest batch whose matrix is returned
    pub matrix_limit: usize,
    /// Request deadline in milliseconds
    pub request_timeout_ms: u64,
}

impl StatusResponse {
    /// Describe a scheduler configuration
    pub fn new(config: &SchedulerConfig, request_timeout_ms: u64) -> Self {
        Self {
            ready: true,
            version: env!("CARGO_PKG_VERSION").to_string(),
            colorer: config.colorer.to_string(),
            max_batch_size: config.max_batch_size,
            matrix_limit: config.matrix_limit,
            request_timeout_ms,
        }
    }
}

/// Response of `GET /api/health`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Always "ok" while the process serves requests
    pub status: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use qhda_scheduler::Scheduler;

    #[test]
    fn test_request_accepts_both_field_names() {
        let json = r#"{"pending_orders": [{"id": "order_1", "type": "swap", "writes": ["pool_A"]}]}"#;
        let request: ScheduleRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.pending_orders.len(), 1);
        assert_eq!(request.pending_orders[0].kind.as_deref(), Some("swap"));
        assert!(request.pending_orders[0].reads.is_empty());
        assert!(request.conflict_matrix.is_none());

        let json = r#"{"orders": [{"id": "order_1"}], "conflict_matrix": [[0]]}"#;
        let request: ScheduleRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.pending_orders[0].id, "order_1");
        assert_eq!(request.conflict_matrix, Some(vec![vec![0]]));
    }

    #[test]
    fn test_order_conversion() {
        let input = OrderInput {
            id: "order_1".to_string(),
            kind: Some("swap".to_string()),
            pair: Some("ETH/USDC".to_string()),
            account: None,
            reads: vec!["pool_A".to_string()],
            writes: vec!["pool_A".to_string(), "account_1".to_string(), "pool_A".to_string()],
        };
        let order: Order = input.into();
        assert_eq!(order.rw_set.write_count(), 2);
        assert!(order.rw_set.reads_key(&ResourceKey::new("pool_A")));

        let back = OrderInput::from(&order);
        assert_eq!(back.writes, vec!["account_1", "pool_A"]);
        assert_eq!(back.kind.as_deref(), Some("swap"));
    }

    #[test]
    fn test_response_from_report() {
        let orders = vec![
            Order::new("order_1").writing("pool_A"),
            Order::new("order_2").writing("pool_A"),
        ];
        let report = Scheduler::default().schedule(&orders).unwrap();
        let response = ScheduleResponse::from(report);

        assert_eq!(response.total_slots, 2);
        assert_eq!(response.schedule["slot_1"], vec!["order_1"]);
        assert_eq!(response.schedule["slot_2"], vec!["order_2"]);
        assert_eq!(response.conflict_matrix, Some(vec![vec![0, 1], vec![1, 0]]));
        assert_eq!(response.graph_metrics.baseline_slots, 2);
        assert_eq!(response.colorer, "greedy");

        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["conflict_reduction"], "0%");
        assert_eq!(json["comparison"]["winner"], "baseline");
    }

    #[test]
    fn test_schedule_keys_in_slot_order() {
        // Eleven writers on one pool: one slot each
        let orders: Vec<Order> = (1..=11)
            .map(|i| Order::new(format!("order_{i}")).writing("pool_X"))
            .collect();
        let report = Scheduler::default().schedule(&orders).unwrap();
        let response = ScheduleResponse::from(report);

        let labels: Vec<&str> = response.schedule.keys().map(String::as_str).collect();
        assert_eq!(labels[..3], ["slot_1", "slot_2", "slot_3"]);
        assert_eq!(labels[10], "slot_11");

        let json = serde_json::to_string(&response).unwrap();
        let slot_2 = json.find("\"slot_2\"").unwrap();
        let slot_10 = json.find("\"slot_10\"").unwrap();
        assert!(slot_2 < slot_10);
    }

    #[test]
    fn test_kind_omitted_when_absent() {
        let json = serde_json::to_string(&OrderInput::from(&Order::new("x"))).unwrap();
        assert!(!json.contains("type"));
        assert!(json.contains("\"reads\":[]"));
    }
}
