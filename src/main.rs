//! Daybreak CLI - Command-line interface for running and replaying sessions.

// Allow print in the CLI binary
#![allow(clippy::print_stdout, clippy::print_stderr)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

mod cli;

use clap::{Parser, Subcommand};
use daybreak::sim::Strategy;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter.
const LOG_ENV: &str = "DAYBREAK_LOG";

/// Daybreak - A deterministic outpost survival rules engine
#[derive(Parser, Debug)]
#[command(name = "daybreak")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Log engine decisions to stderr (overrides DAYBREAK_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
enum Commands {
    /// Play a single session with a built-in player
    Run {
        /// Random seed (default: random)
        #[arg(short, long)]
        seed: Option<u64>,

        /// Days to play before stopping (default: 30)
        #[arg(short, long, default_value = "30")]
        days: u32,

        /// Built-in player
        #[arg(long, default_value = "greedy")]
        strategy: Strategy,

        /// Directory holding building.json, enemy.json and counter.json
        #[arg(long)]
        data: Option<PathBuf>,

        /// Session configuration file (JSON)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Output format: text or json
        #[arg(short, long, default_value = "text")]
        format: cli::OutputFormat,

        /// Save recording to file
        #[arg(long)]
        save: Option<PathBuf>,

        /// Suppress the event log
        #[arg(short, long)]
        quiet: bool,
    },

    /// Run many seeded sessions in parallel and aggregate statistics
    Simulate {
        /// Number of sessions to run (default: 1000)
        #[arg(short = 'n', long, default_value = "1000")]
        sessions: u64,

        /// Starting seed (increments for each session)
        #[arg(short, long)]
        seed: Option<u64>,

        /// Days per session (default: 30)
        #[arg(short, long, default_value = "30")]
        days: u32,

        /// Built-in player
        #[arg(long, default_value = "greedy")]
        strategy: Strategy,

        /// Directory holding the catalog files
        #[arg(long)]
        data: Option<PathBuf>,

        /// Session configuration file (JSON)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Parallel threads (default: CPU count)
        #[arg(short = 'j', long)]
        threads: Option<usize>,

        /// Output format: text, json, or csv
        #[arg(short, long, default_value = "text")]
        format: cli::SimulateFormat,

        /// Show progress bar
        #[arg(short, long)]
        progress: bool,
    },

    /// Replay a recorded session
    Replay {
        /// Recording file (.json)
        #[arg(required = true)]
        recording: PathBuf,

        /// Directory holding the catalog files
        #[arg(long)]
        data: Option<PathBuf>,

        /// Output format: events or status
        #[arg(short, long, default_value = "events")]
        format: cli::ReplayFormat,
    },

    /// Check catalog data and configuration
    Validate {
        /// Directory holding the catalog files (default: built-in data)
        #[arg(long)]
        data: Option<PathBuf>,

        /// Session configuration file (JSON)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_tracing(args.verbose);

    let result = match args.command {
        Commands::Run {
            seed,
            days,
            strategy,
            data,
            config,
            format,
            save,
            quiet,
        } => cli::run::execute(seed, days, strategy, data, config, format, save, quiet),

        Commands::Simulate {
            sessions,
            seed,
            days,
            strategy,
            data,
            config,
            threads,
            format,
            progress,
        } => cli::simulate::execute(
            sessions, seed, days, strategy, data, config, threads, format, progress,
        ),

        Commands::Replay {
            recording,
            data,
            format,
        } => cli::replay::execute(recording, data, format),

        Commands::Validate { data, config } => cli::validate::execute(data, config),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_parse_simulate() {
        let args =
            Args::try_parse_from(["daybreak", "simulate", "-n", "10", "--strategy", "random"])
                .unwrap();
        match args.command {
            Commands::Simulate {
                sessions, strategy, ..
            } => {
                assert_eq!(sessions, 10);
                assert_eq!(strategy, Strategy::Random);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }
}
