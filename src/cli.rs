//! Command-line interface for tabclose.
//!
//! This module handles CLI argument parsing and the `run` and `check-config`
//! subcommands.

use crate::config::{Config, LogLevel};
use crate::scenario::{Scenario, ScenarioRunner};
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

/// tabclose - replay pending tab closures and group removal flows
#[derive(Parser)]
#[command(name = "tabclose")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Debug log level (off, error, warn, info, debug, trace); overrides DEBUG_LEVEL
    #[arg(long, global = true, value_name = "LEVEL", value_parser = parse_log_level)]
    pub log_level: Option<LogLevel>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Replay a scenario file and print the resulting tab state
    Run {
        /// Scenario YAML file
        scenario: PathBuf,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,

        /// Config file to use instead of ~/.config/tabclose/config.yaml
        #[arg(long, value_name = "PATH")]
        config: Option<PathBuf>,
    },
    /// Validate a config file (defaults to ~/.config/tabclose/config.yaml)
    CheckConfig {
        path: Option<PathBuf>,
    },
}

/// Result of CLI processing
pub enum CliResult {
    /// Exit with the given code (subcommand completed)
    Exit(i32),
}

fn parse_log_level(value: &str) -> Result<LogLevel, String> {
    LogLevel::from_name(value).ok_or_else(|| {
        let names: Vec<&str> = LogLevel::all().iter().map(|l| l.display_name()).collect();
        format!("unknown log level '{}' (expected one of {})", value, names.join(", "))
    })
}

/// Process CLI arguments and run the requested subcommand
pub fn process_cli() -> CliResult {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Run {
            scenario,
            json,
            config,
        } => run_scenario(&scenario, json, config.as_deref(), cli.log_level),
        Commands::CheckConfig { path } => {
            crate::debug::init_log_bridge(cli.log_level, LogLevel::Off);
            check_config(path.as_deref())
        }
    };

    match result {
        Ok(()) => CliResult::Exit(0),
        Err(e) => {
            log::error!("{:#}", e);
            eprintln!("tabclose: error: {e:#}");
            CliResult::Exit(1)
        }
    }
}

/// Load the config at `path`, or the default config when no path is given.
pub fn load_config(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(path) => Config::load_from(path)
            .with_context(|| format!("Failed to load config from {:?}", path)),
        None => Config::load(),
    }
}

fn run_scenario(
    path: &Path,
    json: bool,
    config_path: Option<&Path>,
    log_level: Option<LogLevel>,
) -> Result<()> {
    let config = load_config(config_path)?;
    let level = crate::debug::init_log_bridge(log_level, config.log_level);
    log::info!("Starting tabclose {} (log level {})", crate::VERSION, level);

    let scenario = Scenario::load(path)
        .with_context(|| format!("Failed to load scenario from {:?}", path))?;
    log::info!(
        "Replaying {} steps from {:?}",
        scenario.steps.len(),
        path
    );
    let report = ScenarioRunner::run(&scenario, &config)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{}", report);
    }
    Ok(())
}

fn check_config(path: Option<&Path>) -> Result<()> {
    let path = path.map_or_else(Config::config_path, Path::to_path_buf);
    let config = Config::load_from(&path)
        .with_context(|| format!("Invalid config at {:?}", path))?;

    println!("Config OK: {}", path.display());
    println!(
        "  undo:    {} (off-the-record: {})",
        on_off(config.undo.enabled),
        on_off(config.undo.off_the_record_pending_closures)
    );
    println!(
        "  dialogs: {} (skip delete-group confirmation: {})",
        on_off(config.dialogs.enabled),
        on_off(config.dialogs.skip_delete_group_confirmation)
    );
    println!("  log:     {}", config.log_level.display_name());
    Ok(())
}

fn on_off(value: bool) -> &'static str {
    if value { "on" } else { "off" }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_run_with_flags() {
        let cli = Cli::try_parse_from([
            "tabclose",
            "run",
            "demo.yaml",
            "--json",
            "--log-level",
            "debug",
        ])
        .unwrap();
        assert_eq!(cli.log_level, Some(LogLevel::Debug));
        match cli.command {
            Commands::Run { scenario, json, config } => {
                assert_eq!(scenario, PathBuf::from("demo.yaml"));
                assert!(json);
                assert!(config.is_none());
            }
            Commands::CheckConfig { .. } => panic!("expected run"),
        }
    }

    #[test]
    fn rejects_unknown_log_level() {
        assert!(Cli::try_parse_from(["tabclose", "check-config", "--log-level", "loud"]).is_err());
    }
}
