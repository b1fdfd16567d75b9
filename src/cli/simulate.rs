//! Simulate command implementation.

// Session counts fit comfortably in f64 for the rate display
#![allow(clippy::cast_precision_loss)]

use super::output::{
    JsonSimulationResult, SimulationStats, format_simulation_csv, format_simulation_text,
};
use super::{CliError, SimulateFormat, load_catalog, load_config, resolve_seed};
use daybreak::sim::{SimConfig, Strategy, run_session};
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use std::path::PathBuf;
use std::time::Instant;
use tracing::warn;

/// Execute the simulate command.
///
/// # Errors
///
/// Returns an error if data or configuration cannot be loaded.
#[allow(clippy::too_many_arguments)]
pub(crate) fn execute(
    sessions: u64,
    seed: Option<u64>,
    days: u32,
    strategy: Strategy,
    data: Option<PathBuf>,
    config: Option<PathBuf>,
    threads: Option<usize>,
    format: SimulateFormat,
    progress: bool,
) -> Result<(), CliError> {
    let catalog = load_catalog(data.as_deref())?;
    let config = load_config(config.as_deref())?;

    // Set thread pool size if specified
    if let Some(num_threads) = threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(num_threads)
            .build_global()
            .ok(); // Ignore error if already initialized
    }

    let base_seed = resolve_seed(seed);
    let sim = SimConfig {
        max_days: days,
        ..SimConfig::default()
    };

    let pb = if progress {
        let pb = ProgressBar::new(sessions);
        let style = ProgressStyle::default_bar()
            .template(
                "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} sessions ({per_sec})",
            )
            .map_err(|e| CliError::new(format!("Invalid progress template: {e}")))?
            .progress_chars("=>-");
        pb.set_style(style);
        Some(pb)
    } else {
        None
    };

    let start = Instant::now();

    // Each thread accumulates into its own stats, merged at the end
    let stats = (0..sessions)
        .into_par_iter()
        .fold(SimulationStats::default, |mut local, i| {
            let session_seed = base_seed.wrapping_add(i);
            match run_session(session_seed, &catalog, &config, &sim, strategy) {
                Ok(result) => local.add_result(&result),
                Err(e) => {
                    warn!(seed = session_seed, error = %e, "session failed");
                    local.add_failure();
                }
            }
            if let Some(pb) = &pb {
                pb.inc(1);
            }
            local
        })
        .reduce(SimulationStats::default, |mut a, b| {
            a.merge(&b);
            a
        });

    if let Some(pb) = pb {
        pb.finish_with_message("done");
    }

    let duration = start.elapsed();
    let per_sec = if duration.as_secs_f64() > 0.0 {
        (stats.sessions + stats.failures) as f64 / duration.as_secs_f64()
    } else {
        0.0
    };

    match format {
        SimulateFormat::Text => {
            println!();
            print!("{}", format_simulation_text(&stats));
            println!();
            println!(
                "Duration: {:.2}s ({per_sec:.0} sessions/sec)",
                duration.as_secs_f64()
            );
        }
        SimulateFormat::Json => {
            let json_result = JsonSimulationResult::from_stats(&stats);
            let json = serde_json::to_string_pretty(&json_result)
                .map_err(|e| CliError::new(format!("JSON serialization failed: {e}")))?;
            println!("{json}");
        }
        SimulateFormat::Csv => {
            print!("{}", format_simulation_csv(&stats));
        }
    }

    if stats.failures > 0 {
        return Err(CliError::new(format!(
            "{} session(s) violated invariants",
            stats.failures
        )));
    }
    Ok(())
}
