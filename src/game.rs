//! Game layer for Daybreak.
//!
//! Implements the rules of the outpost:
//! - Resource ledger with bounded counters and morning renewals
//! - Catalogs of building types, enemy types and dashboard counters
//! - Spawn registries for the building grid and the enemy row
//! - Day-indexed encounter tables with weighted spawn groups
//! - Action gates, enemy attacks and typed notifications

mod action;
mod catalog;
mod combat;
mod commands;
mod economy;
mod events;
mod invariants;
mod level;
mod registry;
mod state;

pub use action::{Action, ActionOutcome, ActorKind};
pub use catalog::{
    BuildingType, Catalog, CatalogIssue, CatalogKind, CatalogSource, CounterDef, CounterValue,
    DirSource, EmbeddedSource, EnemyType,
};
pub use combat::{AttackRoll, roll_attack};
pub use commands::{Command, CommandOutcome};
pub use economy::{
    Adjustment, Counter, CounterLimits, Ledger, RESOURCE_COUNT, ResourceKey, UnknownResource,
};
pub use events::{EventBus, EventLog, GameEvent, SubscriptionId};
pub use invariants::{InvariantViolation, check_invariants};
pub use level::{Level, LevelTable, SpawnGroup, select_group};
pub use registry::{BuildingRegistry, DEFAULT_ENEMY_CAPACITY, EnemyRegistry, EnemySpawn, Spawned};
pub use state::{GameSession, Selection, SelectionPolicy};
