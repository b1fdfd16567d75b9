//! Run command implementation.

use super::output::{JsonSessionResult, format_text};
use super::{CliError, OutputFormat, load_catalog, load_config, resolve_seed};
use daybreak::replay::{Recording, render_event, render_status, replay};
use daybreak::sim::{SimConfig, Strategy, run_session};
use std::path::PathBuf;

/// Execute the run command.
///
/// # Errors
///
/// Returns an error if data or configuration cannot be loaded, the session
/// breaks an invariant, or the recording cannot be saved.
#[allow(clippy::too_many_arguments)]
pub(crate) fn execute(
    seed: Option<u64>,
    days: u32,
    strategy: Strategy,
    data: Option<PathBuf>,
    config: Option<PathBuf>,
    format: OutputFormat,
    save: Option<PathBuf>,
    quiet: bool,
) -> Result<(), CliError> {
    let catalog = load_catalog(data.as_deref())?;
    let config = load_config(config.as_deref())?;
    let seed = resolve_seed(seed);

    let sim = SimConfig {
        max_days: days,
        ..SimConfig::default()
    };

    if !quiet && format == OutputFormat::Text {
        println!("Running session with seed {seed} ({strategy})...");
        println!();
    }

    let result = run_session(seed, &catalog, &config, &sim, strategy)?;
    let recording = Recording::from_result(&result, &config);

    if let Some(save_path) = save {
        recording
            .save(&save_path)
            .map_err(|e| CliError::new(format!("Failed to save recording: {e}")))?;
        if !quiet && format == OutputFormat::Text {
            println!("Recording saved to: {}", save_path.display());
            println!();
        }
    }

    match format {
        OutputFormat::Text => {
            if !quiet {
                // The runner keeps no event log; replay to get one.
                let (session, events) = replay(&recording, &catalog);
                for event in &events {
                    println!("{}", render_event(event));
                }
                println!();
                print!("{}", render_status(&session));
                println!();
            }
            print!("{}", format_text(&result));
        }
        OutputFormat::Json => {
            let json_result = JsonSessionResult::from_result(&result);
            let json = serde_json::to_string_pretty(&json_result)
                .map_err(|e| CliError::new(format!("JSON serialization failed: {e}")))?;
            println!("{json}");
        }
    }

    Ok(())
}
