//! Triad CLI - persona analysis from the terminal
//!
//! This CLI provides:
//! - Analysis of a questionnaire answer file into three hexagrams
//! - Transition projection against an optional history file
//! - Hexagram lookup by id
//! - Inspection of the effective configuration

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use triad_core::{ContextFactors, PersonaEngine};

mod commands;
mod config;
mod error;

use config::TriadConfig;
use error::{CliError, CliResult};

/// Triad CLI application
#[derive(Parser)]
#[command(name = "triad")]
#[command(about = "Triad - persona analysis and transition projection", long_about = None)]
#[command(version)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, env = "TRIAD_CONFIG")]
    config: Option<String>,

    /// Log level (overrides the configuration file)
    #[arg(long, env = "TRIAD_LOG_LEVEL")]
    log_level: Option<String>,

    /// Enable JSON logging
    #[arg(long, env = "TRIAD_LOG_JSON")]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands
#[derive(Subcommand)]
enum Commands {
    /// Analyse an answer file and project the next transition
    Analyze {
        /// JSON array of answers
        #[arg(short, long)]
        answers: PathBuf,

        /// History file; created if missing and updated after projection
        #[arg(long)]
        history: Option<PathBuf>,

        /// Under stress
        #[arg(long)]
        stress: bool,

        /// In a creative phase
        #[arg(long)]
        creativity: bool,

        /// Under social pressure
        #[arg(long)]
        social_pressure: bool,
    },

    /// Show a hexagram by id (1-64)
    Hexagram { id: u8 },

    /// Show the effective configuration
    Config,
}

fn main() -> CliResult<()> {
    let cli = Cli::parse();
    let config = TriadConfig::load(cli.config.as_deref())?;

    // Initialize tracing; logs go to stderr so stdout stays machine-readable
    let level = cli
        .log_level
        .clone()
        .unwrap_or_else(|| config.logging.level.clone());
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| level.into());

    if cli.json || config.logging.json {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }

    let engine = PersonaEngine::new(config.engine.clone())?;

    match cli.command {
        Commands::Analyze {
            answers,
            history,
            stress,
            creativity,
            social_pressure,
        } => {
            let request = commands::AnalyzeRequest {
                answers: &answers,
                history: history.as_deref(),
                context: ContextFactors {
                    stress,
                    creativity,
                    social_pressure,
                },
            };
            print_json(&commands::analyze(&engine, &request)?)
        }
        Commands::Hexagram { id } => print_json(&commands::hexagram(&engine, id)?),
        Commands::Config => {
            println!("{}", config.to_toml()?);
            Ok(())
        }
    }
}

fn print_json<T: Serialize>(value: &T) -> CliResult<()> {
    let rendered =
        serde_json::to_string_pretty(value).map_err(|e| CliError::Render(e.to_string()))?;
    println!("{rendered}");
    Ok(())
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
    fn parses_analyze_flags() {
        let cli = Cli::try_parse_from([
            "triad",
            "analyze",
            "--answers",
            "a.json",
            "--history",
            "h.json",
            "--stress",
            "--social-pressure",
        ])
        .unwrap();
        match cli.command {
            Commands::Analyze {
                answers,
                history,
                stress,
                creativity,
                social_pressure,
            } => {
                assert_eq!(answers, PathBuf::from("a.json"));
                assert_eq!(history, Some(PathBuf::from("h.json")));
                assert!(stress);
                assert!(!creativity);
                assert!(social_pressure);
            }
            _ => panic!("expected analyze"),
        }
    }

    #[test]
    fn parses_hexagram_id() {
        let cli = Cli::try_parse_from(["triad", "hexagram", "12"]).unwrap();
        assert!(matches!(cli.command, Commands::Hexagram { id: 12 }));
        assert!(Cli::try_parse_from(["triad", "hexagram", "300"]).is_err());
    }
}
