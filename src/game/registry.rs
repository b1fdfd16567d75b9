//! Live building and enemy instances.
//!
//! Instances are addressed by position only. Removing an enemy shifts every
//! later enemy down by one, so callers must never hold indices across a kill.

use std::sync::Arc;

use crate::game::{BuildingType, EnemyType};

/// Default number of enemies that may be alive at once.
pub const DEFAULT_ENEMY_CAPACITY: usize = 4;

/// A spawned occurrence of a catalog entry.
#[derive(Debug, Clone, PartialEq)]
pub struct Spawned<T> {
    /// Catalog key the instance was spawned from.
    pub key: String,
    /// The shared catalog entry.
    pub entry: Arc<T>,
}

/// One enemy placed by a spawn call.
#[derive(Debug, Clone, PartialEq)]
pub struct EnemySpawn {
    /// Catalog key.
    pub key: String,
    /// Enemy type.
    pub entry: Arc<EnemyType>,
    /// Position in the fight row at spawn time.
    pub index: usize,
}

/// Buildings on the grid, in placement order. Buildings are never removed.
#[derive(Debug, Clone, Default)]
pub struct BuildingRegistry {
    buildings: Vec<Spawned<BuildingType>>,
}

impl BuildingRegistry {
    /// An empty grid.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Place a building, returning its index.
    pub fn spawn(&mut self, key: &str, entry: Arc<BuildingType>) -> usize {
        self.buildings.push(Spawned {
            key: key.to_string(),
            entry,
        });
        self.buildings.len() - 1
    }

    /// The building at an index.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Spawned<BuildingType>> {
        self.buildings.get(index)
    }

    /// Number of placed buildings.
    #[must_use]
    pub fn len(&self) -> usize {
        self.buildings.len()
    }

    /// Whether the grid is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buildings.is_empty()
    }

    /// Iterate in placement order.
    pub fn iter(&self) -> impl Iterator<Item = &Spawned<BuildingType>> {
        self.buildings.iter()
    }
}

/// Enemies in the fight row, capped at a fixed capacity.
///
/// Each enemy carries a recent-spawn flag, set when it is spawned and cleared
/// the first time combat visits it.
#[derive(Debug, Clone)]
pub struct EnemyRegistry {
    enemies: Vec<Spawned<EnemyType>>,
    recent: Vec<bool>,
    capacity: usize,
}

impl Default for EnemyRegistry {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_ENEMY_CAPACITY)
    }
}

impl EnemyRegistry {
    /// An empty row holding at most `capacity` enemies.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            enemies: Vec::with_capacity(capacity),
            recent: Vec::with_capacity(capacity),
            capacity,
        }
    }

    /// Append up to `count` enemies, stopping silently at capacity.
    ///
    /// Returns one message per enemy actually placed.
    pub fn spawn(&mut self, key: &str, entry: &Arc<EnemyType>, count: u32) -> Vec<EnemySpawn> {
        let mut spawned = Vec::new();
        for _ in 0..count {
            if self.is_full() {
                break;
            }
            let index = self.enemies.len();
            self.enemies.push(Spawned {
                key: key.to_string(),
                entry: Arc::clone(entry),
            });
            self.recent.push(true);
            spawned.push(EnemySpawn {
                key: key.to_string(),
                entry: Arc::clone(entry),
                index,
            });
        }
        spawned
    }

    /// Remove the enemy at `index`, shifting later enemies down.
    pub fn remove(&mut self, index: usize) -> Option<Spawned<EnemyType>> {
        if index >= self.enemies.len() {
            return None;
        }
        self.recent.remove(index);
        Some(self.enemies.remove(index))
    }

    /// Clear the recent-spawn flag at `index`, returning whether it was set.
    pub fn consume_grace(&mut self, index: usize) -> bool {
        match self.recent.get_mut(index) {
            Some(flag) if *flag => {
                *flag = false;
                true
            }
            _ => false,
        }
    }

    /// Whether the enemy at `index` spawned since combat last visited it.
    #[must_use]
    pub fn is_recent(&self, index: usize) -> bool {
        self.recent.get(index).copied().unwrap_or(false)
    }

    /// The enemy at an index.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Spawned<EnemyType>> {
        self.enemies.get(index)
    }

    /// Number of live enemies.
    #[must_use]
    pub fn len(&self) -> usize {
        self.enemies.len()
    }

    /// Whether no enemies are alive.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.enemies.is_empty()
    }

    /// Whether the row is at capacity.
    #[must_use]
    pub fn is_full(&self) -> bool {
        self.enemies.len() >= self.capacity
    }

    /// Maximum number of live enemies.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of recent-spawn flags tracked; equals `len()` when consistent.
    #[must_use]
    pub fn flag_count(&self) -> usize {
        self.recent.len()
    }

    /// Iterate in row order.
    pub fn iter(&self) -> impl Iterator<Item = &Spawned<EnemyType>> {
        self.enemies.iter()
    }
}
