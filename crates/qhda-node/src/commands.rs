//! Subcommand implementations

use anyhow::{Context, Result};
use qhda_rpc::{OrderInput, RpcServer, ScheduleRequest, ScheduleResponse};
use qhda_scheduler::fixtures::OrderGenerator;
use qhda_scheduler::{ColorerKind, Order, Scheduler};
use std::io::Read;
use std::net::SocketAddr;
use std::path::Path;

use crate::config::NodeConfig;

/// Run the HTTP service until Ctrl+C
pub async fn serve(
    mut config: NodeConfig,
    listen: Option<SocketAddr>,
    colorer: Option<ColorerKind>,
) -> Result<()> {
    if let Some(addr) = listen {
        config.server.listen_addr = addr;
    }
    if let Some(colorer) = colorer {
        config.scheduler.colorer = colorer;
    }

    let scheduler = Scheduler::new(config.scheduler);
    let server = RpcServer::new(config.server.to_server_config(), scheduler);

    tokio::select! {
        result = server.run() => result.context("scheduler service failed")?,
        _ = tokio::signal::ctrl_c() => tracing::info!("shutdown signal received"),
    }

    Ok(())
}

/// Schedule the request stored in `file` (or stdin for `-`)
pub fn schedule_file(
    config: NodeConfig,
    file: &Path,
    colorer: Option<ColorerKind>,
) -> Result<ScheduleResponse> {
    let content = if file == Path::new("-") {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("failed to read request from stdin")?;
        buf
    } else {
        std::fs::read_to_string(file)
            .with_context(|| format!("failed to read request {}", file.display()))?
    };

    let mut scheduler_config = config.scheduler;
    if let Some(colorer) = colorer {
        scheduler_config.colorer = colorer;
    }
    schedule_json(Scheduler::new(scheduler_config), &content)
}

/// Schedule a JSON-encoded [`ScheduleRequest`]
pub fn schedule_json(scheduler: Scheduler, content: &str) -> Result<ScheduleResponse> {
    let request: ScheduleRequest =
        serde_json::from_str(content).context("request is not a valid scheduling request")?;
    let orders: Vec<Order> = request.pending_orders.into_iter().map(Order::from).collect();

    let report = scheduler.schedule_with_matrix(&orders, request.conflict_matrix.as_deref())?;
    Ok(ScheduleResponse::from(report))
}

/// Synthetic request with `count` orders
pub fn generate(count: usize, pools: usize, read_only_ratio: f64, seed: u64) -> ScheduleRequest {
    let orders = OrderGenerator::new()
        .with_pool_count(pools)
        .with_read_only_ratio(read_only_ratio)
        .with_seed(seed)
        .generate(count);
    tracing::debug!(count, pools, read_only_ratio, seed, "generated synthetic batch");

    ScheduleRequest {
        pending_orders: orders.iter().map(OrderInput::from).collect(),
        conflict_matrix: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_generated_request_schedules() {
        let request = generate(12, 4, 0.0, 42);
        assert_eq!(request.pending_orders.len(), 12);
        assert_eq!(request.pending_orders[0].kind.as_deref(), Some("swap"));

        let json = serde_json::to_string(&request).unwrap();
        let response = schedule_json(Scheduler::default(), &json).unwrap();
        assert_eq!(response.total_slots, 3);
        assert_eq!(response.conflict_reduction, "75%");
    }

    #[test]
    fn test_schedule_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"orders": [
                {{"id": "order_1", "writes": ["pool_X"]}},
                {{"id": "order_2", "writes": ["pool_X"]}},
                {{"id": "order_3", "reads": ["pool_Y"]}}
            ]}}"#
        )
        .unwrap();

        let response =
            schedule_file(NodeConfig::default(), file.path(), Some(ColorerKind::Dsatur)).unwrap();
        assert_eq!(response.total_slots, 2);
        assert_eq!(response.colorer, "dsatur");
    }

    #[test]
    fn test_schedule_rejects_invalid_batch() {
        let err = schedule_json(
            Scheduler::default(),
            r#"{"pending_orders": [{"id": ""}]}"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("empty identifier"));
    }

    #[test]
    fn test_schedule_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = schedule_file(NodeConfig::default(), &dir.path().join("none.json"), None);
        assert!(result.is_err());
    }
}
