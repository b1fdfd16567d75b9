//! Data validation command implementation.

use super::{CliError, load_config};
use daybreak::game::{Catalog, CatalogKind, CatalogSource, DirSource, EmbeddedSource};
use std::path::PathBuf;

/// Execute the validate command.
///
/// # Errors
///
/// Returns an error if any catalog or the configuration fails to load, or
/// if the loaded data has problems.
pub(crate) fn execute(data: Option<PathBuf>, config: Option<PathBuf>) -> Result<(), CliError> {
    match &data {
        Some(dir) => println!("Validating data in: {}", dir.display()),
        None => println!("Validating built-in data"),
    }
    println!();

    let mut catalog = Catalog::new();
    let mut failed = false;
    for kind in CatalogKind::ALL {
        let loaded = match &data {
            Some(dir) => load_kind(&mut catalog, kind, &DirSource::new(dir)),
            None => load_kind(&mut catalog, kind, &EmbeddedSource),
        };
        failed |= !loaded;
    }

    let config_result = load_config(config.as_deref());
    print_check("session config", config_result.is_ok());
    let config = match config_result {
        Ok(config) => config,
        Err(e) => {
            println!("      {e}");
            return Err(CliError::new("Configuration failed to load"));
        }
    };
    if failed {
        return Err(CliError::new("Catalog data failed to load"));
    }

    let issues = catalog.validate(&config.levels);
    println!();
    if issues.is_empty() {
        println!("Summary:");
        println!("  Buildings:  {}", catalog.buildings().count());
        println!("  Enemies:    {}", catalog.enemies().count());
        println!("  Counters:   {}", catalog.counters().count());
        println!("  Level days: {}", config.levels.len());
        println!();
        println!("Validation successful!");
        Ok(())
    } else {
        println!("Problems:");
        for issue in &issues {
            println!("  - {issue}");
        }
        Err(CliError::new(format!("{} problem(s) found", issues.len())))
    }
}

fn load_kind(catalog: &mut Catalog, kind: CatalogKind, source: &impl CatalogSource) -> bool {
    match catalog.load(kind, source) {
        Ok(_) => {
            print_check(kind.file_name(), true);
            true
        }
        Err(e) => {
            print_check(kind.file_name(), false);
            println!("      {e}");
            false
        }
    }
}

fn print_check(name: &str, ok: bool) {
    let status = if ok { "OK" } else { "FAILED" };
    let symbol = if ok { "✓" } else { "✗" };
    println!("  {symbol} {name}: {status}");
}
