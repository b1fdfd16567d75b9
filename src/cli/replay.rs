//! Replay command implementation.

use super::{CliError, ReplayFormat, load_catalog};
use daybreak::replay::{Recording, render_event, render_status, replay};
use std::path::PathBuf;

/// Execute the replay command.
///
/// # Errors
///
/// Returns an error if the recording or catalog data cannot be loaded.
pub(crate) fn execute(
    recording_path: PathBuf,
    data: Option<PathBuf>,
    format: ReplayFormat,
) -> Result<(), CliError> {
    let recording = Recording::load(&recording_path).map_err(|e| {
        CliError::new(format!(
            "Failed to load recording {}: {e}",
            recording_path.display()
        ))
    })?;
    let catalog = load_catalog(data.as_deref())?;

    let (session, events) = replay(&recording, &catalog);

    println!(
        "Replaying seed {} ({} commands)",
        recording.seed,
        recording.commands.len()
    );
    println!();

    if format == ReplayFormat::Events {
        for event in &events {
            println!("{}", render_event(event));
        }
        println!();
    }

    print!("{}", render_status(&session));

    Ok(())
}
