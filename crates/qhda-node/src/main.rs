//! qhda binary
//!
//! Runs the scheduling service, or schedules and generates batches from the
//! command line.

mod cli;
mod commands;
mod config;

use anyhow::Result;
use cli::{Cli, Command};
use config::NodeConfig;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse_args();

    // Initialize tracing; logs go to stderr so stdout stays machine-readable
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&cli.log_level));
    let registry = tracing_subscriber::registry().with(filter);
    if cli.json_logs {
        registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry.with(fmt::layer().with_writer(std::io::stderr)).init();
    }

    let config = NodeConfig::load_or_default(cli.config.as_deref())?;
    if let Some(path) = &cli.config {
        tracing::info!(path = %path.display(), "loaded configuration");
    }

    match cli.command {
        Command::Serve { listen, colorer } => {
            tracing::info!("qhda scheduler service starting...");
            commands::serve(config, listen, colorer).await?;
        }
        Command::Schedule {
            file,
            colorer,
            pretty,
        } => {
            let response = commands::schedule_file(config, &file, colorer)?;
            let output = if pretty {
                serde_json::to_string_pretty(&response)?
            } else {
                serde_json::to_string(&response)?
            };
            println!("{}", output);
        }
        Command::Generate {
            count,
            pools,
            read_only_ratio,
            seed,
        } => {
            let request = commands::generate(count, pools, read_only_ratio, seed);
            println!("{}", serde_json::to_string_pretty(&request)?);
        }
    }

    Ok(())
}
