//! Actions offered by buildings and enemies, and their resource gates.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::game::{Ledger, ResourceKey};

/// Which kind of spawned instance performs an action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActorKind {
    /// A building on the grid.
    Building,
    /// An enemy in the fight row.
    Enemy,
}

/// One button on a building or enemy panel.
///
/// Gates are exclusive at the top: an action is refused when a `min` key is
/// below its threshold or a `max` key is at or above its threshold.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Action {
    /// Button label.
    pub name: String,
    /// Button icon.
    #[serde(rename = "iconURI")]
    pub icon_uri: String,
    /// Resource deltas applied when the action runs.
    pub adjust: BTreeMap<ResourceKey, i64>,
    /// Refuse unless `current >= min` for every key.
    pub min: BTreeMap<ResourceKey, i64>,
    /// Refuse unless `current < max` for every key.
    pub max: BTreeMap<ResourceKey, i64>,
    /// Building keys to place on the grid.
    pub build: Vec<String>,
    /// Remove the acting enemy.
    pub kill: bool,
}

impl Action {
    /// Check the action's gates against the ledger.
    #[must_use]
    pub fn gates_pass(&self, ledger: &Ledger) -> bool {
        let below_min = self.min.iter().any(|(&key, &min)| ledger.get(key) < min);
        let at_max = self.max.iter().any(|(&key, &max)| ledger.get(key) >= max);
        !below_min && !at_max
    }

    /// Whether running this action moves the day counter forward.
    #[must_use]
    pub fn advances_days(&self) -> bool {
        self.adjust
            .get(&ResourceKey::Days)
            .is_some_and(|&delta| delta > 0)
    }
}

/// Result of invoking an action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionOutcome {
    /// Gates passed and every effect was applied.
    Applied,
    /// Nothing of the requested kind is selected.
    NoActor,
    /// The actor has no action at that index.
    NoSuchAction,
    /// A min or max gate refused the action.
    Gated,
}
