//! Session configuration.
//!
//! Every field has a default matching the shipped game, so a configuration
//! file only needs the values it changes. This holds inside `limits` too: a
//! listed counter keeps the default of every field it does not name, and
//! `"renewFloor": null` removes a floor.
//!
//! ```json
//! {
//!     "enemyCapacity": 6,
//!     "limits": { "hp": { "start": 4, "max": 6 } },
//!     "levels": [[{ "spawns": [["wolf", 1]] }]]
//! }
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::ConfigError;
use crate::game::{
    CounterLimits, DEFAULT_ENEMY_CAPACITY, Ledger, LevelTable, ResourceKey, SelectionPolicy,
};

/// Rules for one game session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SessionConfig {
    /// Maximum enemies alive at once.
    pub enemy_capacity: usize,
    /// Counter bounds; keys not listed use their defaults.
    #[serde(deserialize_with = "deserialize_limits")]
    pub limits: BTreeMap<ResourceKey, CounterLimits>,
    /// Encounter table indexed by day.
    pub levels: LevelTable,
    /// Buildings placed when the game starts.
    pub starter_buildings: Vec<String>,
    /// How killing an enemy affects the current selection.
    pub kill_selection: SelectionPolicy,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            enemy_capacity: DEFAULT_ENEMY_CAPACITY,
            limits: BTreeMap::new(),
            levels: LevelTable::default(),
            starter_buildings: vec!["campfire".to_string()],
            kill_selection: SelectionPolicy::default(),
        }
    }
}

impl SessionConfig {
    /// Parse a configuration from JSON text.
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not a valid configuration.
    pub fn from_json_str(text: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Read a configuration file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&text)
    }

    /// Effective limits for a key.
    #[must_use]
    pub fn limits_for(&self, key: ResourceKey) -> CounterLimits {
        self.limits
            .get(&key)
            .copied()
            .unwrap_or_else(|| CounterLimits::default_for(key))
    }

    /// A fresh ledger using these limits.
    #[must_use]
    pub fn ledger(&self) -> Ledger {
        Ledger::new(|key| self.limits_for(key))
    }
}

/// Field overrides for one counter.
#[derive(Deserialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
struct LimitsPatch {
    start: Option<i64>,
    min: Option<i64>,
    max: Option<i64>,
    /// Outer `None`: not listed. `Some(None)`: explicitly `null`.
    #[serde(default, deserialize_with = "present")]
    renew_floor: Option<Option<i64>>,
}

impl LimitsPatch {
    fn apply(self, base: CounterLimits) -> CounterLimits {
        CounterLimits {
            start: self.start.unwrap_or(base.start),
            min: self.min.unwrap_or(base.min),
            max: self.max.unwrap_or(base.max),
            renew_floor: self.renew_floor.unwrap_or(base.renew_floor),
        }
    }
}

fn present<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Option<i64>>, D::Error> {
    Option::<i64>::deserialize(deserializer).map(Some)
}

fn deserialize_limits<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<BTreeMap<ResourceKey, CounterLimits>, D::Error> {
    let patches = BTreeMap::<ResourceKey, LimitsPatch>::deserialize(deserializer)?;
    Ok(patches
        .into_iter()
        .map(|(key, patch)| (key, patch.apply(CounterLimits::default_for(key))))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = SessionConfig::from_json_str("{}").unwrap();
        assert_eq!(config, SessionConfig::default());
        assert_eq!(config.enemy_capacity, 4);
        assert_eq!(config.starter_buildings, vec!["campfire"]);
    }

    #[test]
    fn test_partial_limits_override() {
        let config = SessionConfig::from_json_str(
            r#"{"limits": {"hp": {"start": 3, "max": 6}}, "killSelection": "always_clear"}"#,
        )
        .unwrap();
        let ledger = config.ledger();
        assert_eq!(ledger.get(ResourceKey::Hp), 3);
        assert_eq!(ledger.counter(ResourceKey::Hp).max, 6);
        // Unlisted keys keep the shipped defaults.
        assert_eq!(ledger.counter(ResourceKey::Troops).renew_floor, Some(2));
        assert_eq!(config.kill_selection, SelectionPolicy::AlwaysClear);
    }

    #[test]
    fn test_listed_key_keeps_its_other_defaults() {
        let config = SessionConfig::from_json_str(
            r#"{"limits": {"troops": {"max": 10}, "days": {"max": 100}}}"#,
        )
        .unwrap();
        let ledger = config.ledger();
        let troops = ledger.counter(ResourceKey::Troops);
        assert_eq!(troops.max, 10);
        assert_eq!(troops.renew_floor, Some(2));
        let days = ledger.counter(ResourceKey::Days);
        assert_eq!((days.current, days.min, days.max), (1, 1, 100));
    }

    #[test]
    fn test_null_renew_floor_removes_it() {
        let config =
            SessionConfig::from_json_str(r#"{"limits": {"troops": {"renewFloor": null}}}"#)
                .unwrap();
        assert_eq!(config.limits_for(ResourceKey::Troops).renew_floor, None);
        assert_eq!(config.limits_for(ResourceKey::Troops).max, 888);
    }

    #[test]
    fn test_saved_limits_load_back_unchanged() {
        let mut config = SessionConfig::default();
        config.limits.insert(
            ResourceKey::Hp,
            CounterLimits {
                start: 1,
                min: 0,
                max: 9,
                renew_floor: Some(1),
            },
        );
        let json = serde_json::to_string(&config).unwrap();
        assert_eq!(SessionConfig::from_json_str(&json).unwrap(), config);
    }

    #[test]
    fn test_misspelled_limit_field_rejected() {
        let result = SessionConfig::from_json_str(r#"{"limits": {"hp": {"mx": 6}}}"#);
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_unknown_resource_rejected() {
        let result = SessionConfig::from_json_str(r#"{"limits": {"gold": {}}}"#);
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_load_missing_file() {
        let result = SessionConfig::load(Path::new("/no/such/config.json"));
        assert!(matches!(result, Err(ConfigError::Io { .. })));
    }
}
