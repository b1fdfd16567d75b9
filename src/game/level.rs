//! Daily encounter tables and weighted spawn-group selection.
//!
//! A level lists the spawn groups that could appear on one day. One group
//! is drawn per day with probability `weight / total weight`. If no group
//! has a positive weight, the first group is used.

use rand::Rng;
use serde::{Deserialize, Serialize};

/// A bundle of enemies that may spawn together on one day.
///
/// An empty `spawns` list is a chance of nothing spawning.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpawnGroup {
    /// `(enemy key, amount)` pairs.
    pub spawns: Vec<(String, u32)>,
    /// Relative chance to pick this group. Missing counts as zero.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
}

impl SpawnGroup {
    /// Effective weight: missing, negative or non-finite weights count as 0.
    #[must_use]
    pub fn weight(&self) -> f64 {
        match self.weight {
            Some(w) if w.is_finite() && w > 0.0 => w,
            _ => 0.0,
        }
    }
}

/// The spawn groups available on one day.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Level {
    /// Candidate groups, in declaration order.
    pub groups: Vec<SpawnGroup>,
}

impl Level {
    /// Create a level from its groups.
    #[must_use]
    pub fn new(groups: Vec<SpawnGroup>) -> Self {
        Self { groups }
    }

    /// Sum of all effective weights.
    #[must_use]
    pub fn total_weight(&self) -> f64 {
        self.groups.iter().map(SpawnGroup::weight).sum()
    }
}

/// Pick one spawn group from a level.
///
/// Returns `None` only when the level has no groups.
pub fn select_group<'a, R: Rng>(level: &'a Level, rng: &mut R) -> Option<&'a SpawnGroup> {
    let first = level.groups.first()?;
    let total = level.total_weight();
    if total <= 0.0 {
        return Some(first);
    }

    let mut roll = rng.random::<f64>() * total;
    for group in &level.groups {
        roll -= group.weight();
        if roll < 0.0 {
            return Some(group);
        }
    }

    // Rounding can leave a sliver of the roll unspent.
    level.groups.iter().rev().find(|g| g.weight() > 0.0)
}

/// Levels indexed by game day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LevelTable {
    /// `levels[day]` is the encounter table for that day.
    pub levels: Vec<Level>,
}

impl LevelTable {
    /// Create a table from levels indexed by day.
    #[must_use]
    pub fn new(levels: Vec<Level>) -> Self {
        Self { levels }
    }

    /// The level for a day, if one is declared.
    #[must_use]
    pub fn get(&self, day: i64) -> Option<&Level> {
        usize::try_from(day).ok().and_then(|d| self.levels.get(d))
    }

    /// Iterate over levels in day order.
    pub fn iter(&self) -> impl Iterator<Item = &Level> {
        self.levels.iter()
    }

    /// Number of declared days.
    #[must_use]
    pub fn len(&self) -> usize {
        self.levels.len()
    }

    /// Whether no days are declared.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }
}

fn group(spawns: &[(&str, u32)], weight: Option<f64>) -> SpawnGroup {
    SpawnGroup {
        spawns: spawns.iter().map(|&(k, n)| (k.to_string(), n)).collect(),
        weight,
    }
}

impl Default for LevelTable {
    /// The shipped encounter table.
    ///
    /// Day 0 is the opening encounter spawned by `start_game`.
    fn default() -> Self {
        Self::new(vec![
            Level::new(vec![group(&[("zombie", 3)], None)]),
            Level::new(vec![group(&[("zombie", 1)], None)]),
            Level::new(vec![group(&[("zombie", 1)], None)]),
            Level::new(vec![
                group(&[("zombie", 1)], Some(3.0)),
                group(&[], Some(1.0)),
            ]),
            Level::new(vec![
                group(&[("zombie", 2)], Some(2.0)),
                group(&[("wolf", 1)], Some(1.0)),
            ]),
            Level::new(vec![
                group(&[("zombie", 1)], Some(2.0)),
                group(&[("wolf", 1), ("zombie", 1)], Some(1.0)),
                group(&[], Some(1.0)),
            ]),
            Level::new(vec![
                group(&[("zombie", 3)], Some(1.0)),
                group(&[("wolf", 2)], Some(1.0)),
            ]),
        ])
    }
}
