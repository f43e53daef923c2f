//! CLI interface and argument parsing
//!
//! This module provides the command-line interface using clap.

pub mod commands;

use clap::{Parser, Subcommand};

/// Sentinel - community health surveillance core
#[derive(Parser, Debug)]
#[command(name = "sentinel")]
#[command(version, about, long_about = None)]
#[command(author = "Sentinel Contributors")]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "sentinel.toml", env = "SENTINEL_CONFIG")]
    pub config: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "SENTINEL_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Recompute and correct community counters
    Reconcile(commands::reconcile::ReconcileArgs),

    /// Print dashboard aggregates
    Report(commands::report::ReportArgs),

    /// Audit counters against authoritative recomputation
    Status(commands::status::StatusArgs),

    /// Validate configuration file
    ValidateConfig(commands::validate::ValidateArgs),

    /// Initialize a new configuration file
    Init(commands::init::InitArgs),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parse_reconcile() {
        let cli = Cli::parse_from(["sentinel", "reconcile", "--all"]);
        assert_eq!(cli.config, "sentinel.toml");
        assert!(matches!(cli.command, Commands::Reconcile(_)));
    }

    #[test]
    fn test_cli_parse_with_config() {
        let cli = Cli::parse_from(["sentinel", "--config", "custom.toml", "report"]);
        assert_eq!(cli.config, "custom.toml");
    }

    #[test]
    fn test_cli_parse_with_log_level() {
        let cli = Cli::parse_from(["sentinel", "--log-level", "debug", "status"]);
        assert_eq!(cli.log_level, Some("debug".to_string()));
    }

    #[test]
    fn test_cli_parse_report() {
        let cli = Cli::parse_from(["sentinel", "report", "--authoritative"]);
        assert!(matches!(cli.command, Commands::Report(_)));
    }

    #[test]
    fn test_cli_parse_validate_config() {
        let cli = Cli::parse_from(["sentinel", "validate-config"]);
        assert!(matches!(cli.command, Commands::ValidateConfig(_)));
    }

    #[test]
    fn test_cli_parse_init() {
        let cli = Cli::parse_from(["sentinel", "init"]);
        assert!(matches!(cli.command, Commands::Init(_)));
    }
}
