//! Static catalogs of building types, enemy types and dashboard counters.
//!
//! Each catalog is read once from a [`CatalogSource`]. Loading a kind that is
//! already loaded is a no-op that reports `false`. A failed load leaves the
//! catalog untouched, so the caller may simply try again.
//!
//! A file holds a map from key to entry, either bare or wrapped in an object
//! named after the kind (`{"enemies": {...}}`). Entries reject unknown
//! fields, so a misspelled wrapper fails to parse instead of loading empty.

use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::CatalogError;
use crate::game::{Action, LevelTable, ResourceKey};

/// The three catalog files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CatalogKind {
    /// Building types, `building.json`.
    Buildings,
    /// Enemy types, `enemy.json`.
    Enemies,
    /// Dashboard counters, `counter.json`.
    Counters,
}

impl CatalogKind {
    /// Every catalog kind, in load order.
    pub const ALL: [CatalogKind; 3] = [
        CatalogKind::Buildings,
        CatalogKind::Enemies,
        CatalogKind::Counters,
    ];

    /// File name of this catalog inside a data directory.
    #[must_use]
    pub const fn file_name(self) -> &'static str {
        match self {
            CatalogKind::Buildings => "building.json",
            CatalogKind::Enemies => "enemy.json",
            CatalogKind::Counters => "counter.json",
        }
    }

    const fn index(self) -> usize {
        self as usize
    }

    /// Name of the optional object wrapping the entries of this catalog.
    const fn wrapper_key(self) -> &'static str {
        match self {
            CatalogKind::Buildings => "buildings",
            CatalogKind::Enemies => "enemies",
            CatalogKind::Counters => "counters",
        }
    }
}

impl fmt::Display for CatalogKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            CatalogKind::Buildings => "building",
            CatalogKind::Enemies => "enemy",
            CatalogKind::Counters => "counter",
        })
    }
}

/// A building type that can be placed on the grid.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BuildingType {
    /// Display name.
    pub name: String,
    /// Flavour text.
    pub desc: String,
    /// Grid icon.
    #[serde(rename = "iconURI")]
    pub icon_uri: String,
    /// Panel actions.
    pub actions: Vec<Action>,
}

/// An enemy type that can appear in the fight row.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EnemyType {
    /// Display name.
    pub name: String,
    /// Flavour text.
    pub desc: String,
    /// Card art.
    #[serde(rename = "artURI")]
    pub art_uri: String,
    /// Percent chance, 0 to 100, to land a hit each day.
    #[serde(rename = "hitChance")]
    pub hit_chance: f64,
    /// Health lost per hit.
    #[serde(rename = "hitDamage")]
    pub hit_damage: i64,
    /// Panel actions.
    pub actions: Vec<Action>,
}

/// Dashboard definition of a counter.
///
/// Shows either a live ledger value (`key`) or a fixed `number`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CounterDef {
    /// Heading.
    pub title: String,
    /// Tooltip.
    pub desc: String,
    /// Emblem shown next to the value.
    pub emblem: String,
    /// Ledger counter to display.
    pub key: Option<ResourceKey>,
    /// Fixed value to display.
    pub number: Option<i64>,
}

/// What a [`CounterDef`] displays.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CounterValue {
    /// The live value of a ledger counter.
    Resource(ResourceKey),
    /// A constant.
    Fixed(i64),
}

impl CounterDef {
    /// The displayed value source, if exactly one of `key`/`number` is set.
    #[must_use]
    pub fn value(&self) -> Option<CounterValue> {
        match (self.key, self.number) {
            (Some(key), None) => Some(CounterValue::Resource(key)),
            (None, Some(number)) => Some(CounterValue::Fixed(number)),
            _ => None,
        }
    }
}

/// Where catalog text comes from.
pub trait CatalogSource {
    /// Fetch the raw JSON text for one catalog.
    ///
    /// # Errors
    ///
    /// Returns an error if the data cannot be read.
    fn fetch(&self, kind: CatalogKind) -> Result<String, CatalogError>;
}

/// Reads catalogs from files in a data directory.
#[derive(Debug, Clone)]
pub struct DirSource {
    root: PathBuf,
}

impl DirSource {
    /// Read catalogs from `root/<file_name>`.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The data directory.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl CatalogSource for DirSource {
    fn fetch(&self, kind: CatalogKind) -> Result<String, CatalogError> {
        let path = self.root.join(kind.file_name());
        fs::read_to_string(&path).map_err(|source| CatalogError::Io { kind, path, source })
    }
}

/// The game data shipped inside the binary.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmbeddedSource;

const EMBEDDED_BUILDINGS: &str = include_str!("../../data/building.json");
const EMBEDDED_ENEMIES: &str = include_str!("../../data/enemy.json");
const EMBEDDED_COUNTERS: &str = include_str!("../../data/counter.json");

impl CatalogSource for EmbeddedSource {
    fn fetch(&self, kind: CatalogKind) -> Result<String, CatalogError> {
        let text = match kind {
            CatalogKind::Buildings => EMBEDDED_BUILDINGS,
            CatalogKind::Enemies => EMBEDDED_ENEMIES,
            CatalogKind::Counters => EMBEDDED_COUNTERS,
        };
        Ok(text.to_string())
    }
}

fn parse_entries<T: DeserializeOwned>(
    kind: CatalogKind,
    text: &str,
) -> Result<BTreeMap<String, T>, CatalogError> {
    let parse_error = |source: serde_json::Error| CatalogError::Parse { kind, source };
    let mut root: serde_json::Value = serde_json::from_str(text).map_err(parse_error)?;
    let wrapped = root
        .as_object_mut()
        .and_then(|object| object.remove(kind.wrapper_key()));
    let entries = wrapped.unwrap_or(root);
    serde_json::from_value(entries).map_err(parse_error)
}

/// A problem found by [`Catalog::validate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogIssue {
    /// Catalog the offending entry belongs to.
    pub kind: CatalogKind,
    /// Key of the offending entry.
    pub key: String,
    /// What is wrong with it.
    pub message: String,
}

impl fmt::Display for CatalogIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} '{}': {}", self.kind, self.key, self.message)
    }
}

/// All loaded catalog entries.
///
/// Entries are shared behind `Arc` so spawned instances and notifications can
/// point at them without copying.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    buildings: BTreeMap<String, Arc<BuildingType>>,
    enemies: BTreeMap<String, Arc<EnemyType>>,
    counters: BTreeMap<String, CounterDef>,
    loaded: [bool; 3],
}

impl Catalog {
    /// An empty catalog with nothing loaded.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Load every catalog kind from a source.
    ///
    /// # Errors
    ///
    /// Returns the first fetch or parse failure.
    pub fn from_source(source: &impl CatalogSource) -> Result<Self, CatalogError> {
        let mut catalog = Self::new();
        catalog.load_all(source)?;
        Ok(catalog)
    }

    /// The game data compiled into the crate.
    ///
    /// # Errors
    ///
    /// Returns an error only if the embedded data is malformed.
    pub fn embedded() -> Result<Self, CatalogError> {
        Self::from_source(&EmbeddedSource)
    }

    /// Load one catalog kind, at most once.
    ///
    /// Returns `Ok(false)` without fetching if `kind` is already loaded.
    ///
    /// # Errors
    ///
    /// Returns an error if the source cannot be read or parsed. The catalog
    /// is left unchanged and `kind` stays unloaded.
    pub fn load(
        &mut self,
        kind: CatalogKind,
        source: &impl CatalogSource,
    ) -> Result<bool, CatalogError> {
        if self.is_loaded(kind) {
            return Ok(false);
        }

        let text = source.fetch(kind)?;
        let count = match kind {
            CatalogKind::Buildings => {
                let entries: BTreeMap<String, BuildingType> = parse_entries(kind, &text)?;
                self.buildings = entries
                    .into_iter()
                    .map(|(key, entry)| (key, Arc::new(entry)))
                    .collect();
                self.buildings.len()
            }
            CatalogKind::Enemies => {
                let entries: BTreeMap<String, EnemyType> = parse_entries(kind, &text)?;
                self.enemies = entries
                    .into_iter()
                    .map(|(key, entry)| (key, Arc::new(entry)))
                    .collect();
                self.enemies.len()
            }
            CatalogKind::Counters => {
                self.counters = parse_entries(kind, &text)?;
                self.counters.len()
            }
        };

        self.loaded[kind.index()] = true;
        info!(%kind, count, "catalog loaded");
        Ok(true)
    }

    /// Load every kind that is not loaded yet.
    ///
    /// # Errors
    ///
    /// Returns the first failure; kinds loaded before it stay loaded.
    pub fn load_all(&mut self, source: &impl CatalogSource) -> Result<(), CatalogError> {
        for kind in CatalogKind::ALL {
            self.load(kind, source)?;
        }
        Ok(())
    }

    /// Whether a catalog kind has been loaded.
    #[must_use]
    pub fn is_loaded(&self, kind: CatalogKind) -> bool {
        self.loaded[kind.index()]
    }

    /// Look up a building type.
    #[must_use]
    pub fn building(&self, key: &str) -> Option<&Arc<BuildingType>> {
        self.buildings.get(key)
    }

    /// Look up an enemy type.
    #[must_use]
    pub fn enemy(&self, key: &str) -> Option<&Arc<EnemyType>> {
        self.enemies.get(key)
    }

    /// Look up a counter definition.
    #[must_use]
    pub fn counter(&self, key: &str) -> Option<&CounterDef> {
        self.counters.get(key)
    }

    /// All building types, sorted by key.
    pub fn buildings(&self) -> impl Iterator<Item = (&str, &Arc<BuildingType>)> {
        self.buildings.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// All enemy types, sorted by key.
    pub fn enemies(&self) -> impl Iterator<Item = (&str, &Arc<EnemyType>)> {
        self.enemies.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// All counter definitions, sorted by key.
    pub fn counters(&self) -> impl Iterator<Item = (&str, &CounterDef)> {
        self.counters.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Report dangling references and malformed entries.
    ///
    /// Nothing here stops the engine: every reported problem resolves to a
    /// no-op at play time.
    #[must_use]
    pub fn validate(&self, levels: &LevelTable) -> Vec<CatalogIssue> {
        let mut issues = Vec::new();

        let mut check_builds = |kind: CatalogKind, key: &str, actions: &[Action]| {
            for action in actions {
                for target in &action.build {
                    if !self.buildings.contains_key(target) {
                        issues.push(CatalogIssue {
                            kind,
                            key: key.to_string(),
                            message: format!(
                                "action '{}' builds unknown building '{target}'",
                                action.name
                            ),
                        });
                    }
                }
            }
        };

        for (key, building) in &self.buildings {
            check_builds(CatalogKind::Buildings, key, &building.actions);
        }
        for (key, enemy) in &self.enemies {
            check_builds(CatalogKind::Enemies, key, &enemy.actions);
        }

        for (key, enemy) in &self.enemies {
            if !(0.0..=100.0).contains(&enemy.hit_chance) {
                issues.push(CatalogIssue {
                    kind: CatalogKind::Enemies,
                    key: key.clone(),
                    message: format!("hitChance {} outside 0..=100", enemy.hit_chance),
                });
            }
            if enemy.hit_damage < 0 {
                issues.push(CatalogIssue {
                    kind: CatalogKind::Enemies,
                    key: key.clone(),
                    message: format!("negative hitDamage {}", enemy.hit_damage),
                });
            }
        }

        for (key, counter) in &self.counters {
            if counter.value().is_none() {
                issues.push(CatalogIssue {
                    kind: CatalogKind::Counters,
                    key: key.clone(),
                    message: "needs exactly one of 'key' or 'number'".to_string(),
                });
            }
        }

        for (day, level) in levels.iter().enumerate() {
            for group in &level.groups {
                for (enemy, _) in &group.spawns {
                    if !self.enemies.contains_key(enemy) {
                        issues.push(CatalogIssue {
                            kind: CatalogKind::Enemies,
                            key: enemy.clone(),
                            message: format!("spawned by level {day} but not defined"),
                        });
                    }
                }
            }
        }

        issues
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    /// Source that counts fetches and serves fixed text.
    struct CountingSource {
        fetches: Cell<u32>,
        buildings: &'static str,
    }

    impl CatalogSource for CountingSource {
        fn fetch(&self, kind: CatalogKind) -> Result<String, CatalogError> {
            self.fetches.set(self.fetches.get() + 1);
            match kind {
                CatalogKind::Buildings => Ok(self.buildings.to_string()),
                other => Err(CatalogError::Missing(other)),
            }
        }
    }

    /// Source serving the same text for every kind.
    struct TextSource(&'static str);

    impl CatalogSource for TextSource {
        fn fetch(&self, _kind: CatalogKind) -> Result<String, CatalogError> {
            Ok(self.0.to_string())
        }
    }

    #[test]
    fn test_bare_entry_map_loads() {
        let source =
            TextSource(r#"{"zombie": {"name": "Zombie", "hitChance": 50, "hitDamage": 1}}"#);
        let mut catalog = Catalog::new();
        assert!(catalog.load(CatalogKind::Enemies, &source).unwrap());
        let zombie = catalog.enemy("zombie").unwrap();
        assert_eq!(zombie.name, "Zombie");
        assert_eq!(zombie.hit_damage, 1);
    }

    #[test]
    fn test_misspelled_wrapper_fails_and_stays_unloaded() {
        let source = TextSource(r#"{"enemys": {"zombie": {"name": "Zombie"}}}"#);
        let mut catalog = Catalog::new();
        let err = catalog.load(CatalogKind::Enemies, &source).unwrap_err();
        assert!(matches!(err, CatalogError::Parse { kind: CatalogKind::Enemies, .. }));
        assert!(!catalog.is_loaded(CatalogKind::Enemies));
    }

    #[test]
    fn test_embedded_catalog_loads() {
        let catalog = Catalog::embedded().unwrap();
        for kind in CatalogKind::ALL {
            assert!(catalog.is_loaded(kind));
        }
        assert!(catalog.building("campfire").is_some());
        assert!(catalog.enemy("zombie").is_some());
        assert_eq!(catalog.counter("slots").unwrap().value(), Some(CounterValue::Fixed(9)));
    }

    #[test]
    fn test_embedded_catalog_is_valid() {
        let catalog = Catalog::embedded().unwrap();
        let issues = catalog.validate(&LevelTable::default());
        assert!(issues.is_empty(), "{issues:?}");
    }

    #[test]
    fn test_second_load_is_noop() {
        let source = CountingSource {
            fetches: Cell::new(0),
            buildings: r#"{"buildings": {"hut": {"name": "Hut"}}}"#,
        };
        let mut catalog = Catalog::new();
        assert!(catalog.load(CatalogKind::Buildings, &source).unwrap());
        assert!(!catalog.load(CatalogKind::Buildings, &source).unwrap());
        assert_eq!(source.fetches.get(), 1);
        assert_eq!(catalog.buildings().count(), 1);
    }

    #[test]
    fn test_failed_load_can_be_retried() {
        let bad = CountingSource {
            fetches: Cell::new(0),
            buildings: "{ not json",
        };
        let mut catalog = Catalog::new();
        let err = catalog.load(CatalogKind::Buildings, &bad).unwrap_err();
        assert!(matches!(err, CatalogError::Parse { .. }));
        assert!(!catalog.is_loaded(CatalogKind::Buildings));

        let good = CountingSource {
            fetches: Cell::new(0),
            buildings: r#"{"buildings": {}}"#,
        };
        assert!(catalog.load(CatalogKind::Buildings, &good).unwrap());
    }

    #[test]
    fn test_missing_optional_fields_default() {
        let source = CountingSource {
            fetches: Cell::new(0),
            buildings: r#"{"buildings": {"ruin": {}}}"#,
        };
        let mut catalog = Catalog::new();
        catalog.load(CatalogKind::Buildings, &source).unwrap();
        let ruin = catalog.building("ruin").unwrap();
        assert!(ruin.name.is_empty());
        assert!(ruin.actions.is_empty());
    }

    #[test]
    fn test_dir_source_reports_path() {
        let source = DirSource::new("/definitely/not/here");
        let err = source.fetch(CatalogKind::Enemies).unwrap_err();
        match err {
            CatalogError::Io { kind, path, .. } => {
                assert_eq!(kind, CatalogKind::Enemies);
                assert!(path.ends_with("enemy.json"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_validate_reports_dangling_references() {
        let mut catalog = Catalog::new();
        let source = CountingSource {
            fetches: Cell::new(0),
            buildings: r#"{"buildings": {"camp": {"actions": [{"name": "Grow", "build": ["tower"]}]}}}"#,
        };
        catalog.load(CatalogKind::Buildings, &source).unwrap();

        let issues = catalog.validate(&LevelTable::default());
        assert!(issues.iter().any(|i| i.message.contains("unknown building 'tower'")));
        // The default level table spawns zombies, which this catalog lacks.
        assert!(issues.iter().any(|i| i.key == "zombie"));
    }
}
