//! CLI argument parsing for qhda

use clap::{Parser, Subcommand};
use qhda_scheduler::ColorerKind;
use std::net::SocketAddr;
use std::path::PathBuf;

/// Conflict-aware order batch scheduler
#[derive(Parser, Debug, Clone)]
#[command(name = "qhda")]
#[command(about = "Conflict-aware order batch scheduler")]
#[command(version)]
pub struct Cli {
    /// Configuration file (TOML)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error); RUST_LOG takes precedence
    #[arg(long, default_value = "info", global = true)]
    pub log_level: String,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    pub json_logs: bool,

    /// Command to run
    #[command(subcommand)]
    pub command: Command,
}

/// Subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Run the HTTP scheduling service
    Serve {
        /// Listen address, overrides the config file
        #[arg(long)]
        listen: Option<SocketAddr>,

        /// Colorer (greedy, dsatur, annealing), overrides the config file
        #[arg(long)]
        colorer: Option<ColorerKind>,
    },

    /// Schedule a batch read from a JSON request file and print the result
    Schedule {
        /// Request file; `-` reads standard input
        file: PathBuf,

        /// Colorer (greedy, dsatur, annealing), overrides the config file
        #[arg(long)]
        colorer: Option<ColorerKind>,

        /// Pretty-print the response
        #[arg(long)]
        pretty: bool,
    },

    /// Print a synthetic scheduling request
    Generate {
        /// Number of orders
        #[arg(long, default_value_t = 8)]
        count: usize,

        /// Number of pools
        #[arg(long, default_value_t = 4)]
        pools: usize,

        /// Probability that an order only reads, in [0, 1]
        #[arg(long, default_value_t = 0.0, value_parser = parse_ratio)]
        read_only_ratio: f64,

        /// RNG seed
        #[arg(long, default_value_t = 42)]
        seed: u64,
    },
}

/// Parse a probability in [0, 1]
fn parse_ratio(value: &str) -> Result<f64, String> {
    let ratio: f64 = value
        .parse()
        .map_err(|e| format!("`{value}` is not a number: {e}"))?;
    if (0.0..=1.0).contains(&ratio) {
        Ok(ratio)
    } else {
        Err(format!("`{value}` is not in [0, 1]"))
    }
}

impl Cli {
    /// Parse CLI arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serve_defaults() {
        let cli = Cli::parse_from(["qhda", "serve"]);
        assert_eq!(cli.log_level, "info");
        assert!(!cli.json_logs);
        assert!(cli.config.is_none());
        match cli.command {
            Command::Serve { listen, colorer } => {
                assert!(listen.is_none());
                assert!(colorer.is_none());
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_serve_overrides() {
        let cli = Cli::parse_from([
            "qhda",
            "--config", "/etc/qhda.toml",
            "serve",
            "--listen", "127.0.0.1:9000",
            "--colorer", "dsatur",
            "--log-level", "debug",
        ]);
        assert_eq!(cli.config, Some(PathBuf::from("/etc/qhda.toml")));
        assert_eq!(cli.log_level, "debug");
        match cli.command {
            Command::Serve { listen, colorer } => {
                assert_eq!(listen.map(|a| a.port()), Some(9000));
                assert_eq!(colorer, Some(ColorerKind::Dsatur));
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_unknown_colorer_rejected() {
        let result = Cli::try_parse_from(["qhda", "serve", "--colorer", "quantum"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_schedule_and_generate() {
        let cli = Cli::parse_from(["qhda", "schedule", "batch.json", "--pretty"]);
        assert!(matches!(
            cli.command,
            Command::Schedule { ref file, pretty: true, colorer: None } if file == &PathBuf::from("batch.json")
        ));

        let cli = Cli::parse_from(["qhda", "generate", "--count", "20", "--read-only-ratio", "0.5"]);
        match cli.command {
            Command::Generate { count, pools, read_only_ratio, seed } => {
                assert_eq!(count, 20);
                assert_eq!(pools, 4);
                assert_eq!(read_only_ratio, 0.5);
                assert_eq!(seed, 42);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_read_only_ratio_bounds() {
        for bad in ["NaN", "inf", "-0.1", "1.5", "half"] {
            let result = Cli::try_parse_from(["qhda", "generate", "--read-only-ratio", bad]);
            assert!(result.is_err(), "{bad} accepted");
        }
        let cli = Cli::parse_from(["qhda", "generate", "--read-only-ratio", "1"]);
        assert!(matches!(cli.command, Command::Generate { read_only_ratio, .. } if read_only_ratio == 1.0));
    }
}
