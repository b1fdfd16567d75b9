//! Resource ledger: the player's named counters and their bounds.
//!
//! Every counter is clamped to `[min, max]` after each adjustment. Advancing
//! the `days` counter also runs the morning renewal: counters with a renew
//! floor are topped up to it, never lowered.

use std::fmt;
use std::ops::RangeInclusive;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Identifies one counter in the ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceKey {
    /// Game days elapsed.
    Days,
    /// Player health points.
    #[serde(alias = "health")]
    Hp,
    /// Wood stockpile.
    Wood,
    /// Crafted tools.
    Tools,
    /// Troops available to fight.
    Troops,
}

/// Number of distinct resource keys.
pub const RESOURCE_COUNT: usize = 5;

impl ResourceKey {
    /// Every key, in ledger order.
    pub const ALL: [ResourceKey; RESOURCE_COUNT] = [
        ResourceKey::Days,
        ResourceKey::Hp,
        ResourceKey::Wood,
        ResourceKey::Tools,
        ResourceKey::Troops,
    ];

    /// Position of this key in [`ResourceKey::ALL`].
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// The lowercase name used in data files.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            ResourceKey::Days => "days",
            ResourceKey::Hp => "hp",
            ResourceKey::Wood => "wood",
            ResourceKey::Tools => "tools",
            ResourceKey::Troops => "troops",
        }
    }
}

impl fmt::Display for ResourceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown resource name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownResource(pub String);

impl fmt::Display for UnknownResource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown resource key: {}", self.0)
    }
}

impl std::error::Error for UnknownResource {}

impl FromStr for ResourceKey {
    type Err = UnknownResource;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "days" => Ok(ResourceKey::Days),
            "hp" | "health" => Ok(ResourceKey::Hp),
            "wood" => Ok(ResourceKey::Wood),
            "tools" => Ok(ResourceKey::Tools),
            "troops" => Ok(ResourceKey::Troops),
            other => Err(UnknownResource(other.to_string())),
        }
    }
}

/// Configured bounds for one counter.
///
/// Configuration files override these per field, on top of
/// [`CounterLimits::default_for`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CounterLimits {
    /// Value at the start of a session.
    pub start: i64,
    /// Lowest allowed value.
    pub min: i64,
    /// Highest allowed value.
    pub max: i64,
    /// Value the counter is raised to each morning, if below it.
    pub renew_floor: Option<i64>,
}

impl CounterLimits {
    /// Default limits for a key, matching the shipped game.
    #[must_use]
    pub const fn default_for(key: ResourceKey) -> Self {
        match key {
            ResourceKey::Days => Self {
                start: 1,
                min: 1,
                max: 888,
                renew_floor: None,
            },
            ResourceKey::Hp => Self {
                start: 2,
                min: 0,
                max: 4,
                renew_floor: None,
            },
            ResourceKey::Wood | ResourceKey::Tools => Self {
                start: 0,
                min: 0,
                max: 888,
                renew_floor: None,
            },
            ResourceKey::Troops => Self {
                start: 0,
                min: 0,
                max: 888,
                renew_floor: Some(2),
            },
        }
    }
}

/// A named numeric value with bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Counter {
    /// Current value, always within `[min, max]`.
    pub current: i64,
    /// Lowest allowed value.
    pub min: i64,
    /// Highest allowed value.
    pub max: i64,
    /// Morning top-up floor.
    pub renew_floor: Option<i64>,
}

impl Counter {
    /// Build a counter from limits, repairing inconsistent bounds.
    #[must_use]
    pub fn from_limits(limits: CounterLimits) -> Self {
        let (min, max) = if limits.min <= limits.max {
            (limits.min, limits.max)
        } else {
            (limits.max, limits.min)
        };
        Self {
            current: limits.start.clamp(min, max),
            min,
            max,
            renew_floor: limits.renew_floor.map(|floor| floor.min(max)),
        }
    }

    /// Whether the counter sits at its lower bound.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.current <= self.min
    }
}

/// One applied change to a counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Adjustment {
    /// The counter that changed.
    pub key: ResourceKey,
    /// The change the caller asked for.
    pub requested: i64,
    /// The change actually applied after clamping.
    pub delta: i64,
    /// The counter's new value.
    pub total: i64,
}

impl Adjustment {
    /// Day indices crossed by a positive `days` adjustment, oldest first.
    ///
    /// Empty for any other key or for a non-positive change.
    #[must_use]
    pub fn days_elapsed(&self) -> RangeInclusive<i64> {
        if self.key == ResourceKey::Days && self.delta > 0 {
            (self.total - self.delta + 1)..=self.total
        } else {
            RangeInclusive::new(1, 0)
        }
    }
}

/// All player counters.
#[derive(Debug, Clone, PartialEq, Eq)]
#[allow(missing_copy_implementations)]
pub struct Ledger {
    /// Counters indexed by [`ResourceKey::index`].
    counters: [Counter; RESOURCE_COUNT],
}

impl Default for Ledger {
    fn default() -> Self {
        Self::new(CounterLimits::default_for)
    }
}

impl Ledger {
    /// Create a ledger, asking `limits` for each key's bounds.
    #[must_use]
    pub fn new(limits: impl Fn(ResourceKey) -> CounterLimits) -> Self {
        Self {
            counters: ResourceKey::ALL.map(|key| Counter::from_limits(limits(key))),
        }
    }

    /// Current value of a counter.
    #[must_use]
    #[inline]
    pub fn get(&self, key: ResourceKey) -> i64 {
        self.counters[key.index()].current
    }

    /// Full counter state for a key.
    #[must_use]
    #[inline]
    pub fn counter(&self, key: ResourceKey) -> &Counter {
        &self.counters[key.index()]
    }

    /// Iterate over `(key, counter)` pairs in ledger order.
    pub fn iter(&self) -> impl Iterator<Item = (ResourceKey, &Counter)> {
        ResourceKey::ALL.into_iter().zip(self.counters.iter())
    }

    /// Snapshot of every current value in ledger order.
    #[must_use]
    pub fn values(&self) -> [i64; RESOURCE_COUNT] {
        self.counters.map(|c| c.current)
    }

    /// Adjust a counter by `delta`, clamped to its bounds.
    ///
    /// The first returned adjustment is for `key`. If `key` is
    /// [`ResourceKey::Days`] and the day actually advanced, morning renewals
    /// follow in ledger order.
    pub fn adjust(&mut self, key: ResourceKey, delta: i64) -> Vec<Adjustment> {
        let primary = self.apply(key, delta);
        let mut adjustments = vec![primary];

        if key == ResourceKey::Days && primary.delta > 0 {
            adjustments.extend(self.renew());
        }

        adjustments
    }

    /// Raise every renewable counter that is below its floor.
    fn renew(&mut self) -> Vec<Adjustment> {
        let mut renewals = Vec::new();
        for key in ResourceKey::ALL {
            if key == ResourceKey::Days {
                continue;
            }
            let counter = self.counters[key.index()];
            if let Some(floor) = counter.renew_floor {
                if counter.current < floor {
                    renewals.push(self.apply(key, floor.saturating_sub(counter.current)));
                }
            }
        }
        renewals
    }

    fn apply(&mut self, key: ResourceKey, delta: i64) -> Adjustment {
        let counter = &mut self.counters[key.index()];
        let before = counter.current;
        counter.current = before.saturating_add(delta).clamp(counter.min, counter.max);
        Adjustment {
            key,
            requested: delta,
            delta: counter.current - before,
            total: counter.current,
        }
    }
}
