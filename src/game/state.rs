//! Game session: the single owner of all mutable game state.
//!
//! Every inbound command goes through [`GameSession`]. Each mutation
//! publishes its notifications on the session's [`EventBus`] before the
//! mutating call returns.

use std::sync::Arc;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::config::SessionConfig;
use crate::error::CatalogError;
use crate::game::{
    ActionOutcome, ActorKind, AttackRoll, BuildingRegistry, Catalog, CatalogKind, CatalogSource,
    Command, CommandOutcome, CounterDef, CounterValue, EnemyRegistry, EnemySpawn, EnemyType,
    EventBus, GameEvent, Ledger, ResourceKey, Spawned, SubscriptionId, roll_attack, select_group,
};

/// The currently selected instance.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Selection {
    /// Nothing is selected.
    #[default]
    None,
    /// A grid slot, occupied or not.
    Building(usize),
    /// An enemy in the fight row.
    Enemy(usize),
}

impl Selection {
    /// The selected index if it refers to an instance of `kind`.
    #[must_use]
    pub const fn index_of(self, kind: ActorKind) -> Option<usize> {
        match (self, kind) {
            (Selection::Building(index), ActorKind::Building)
            | (Selection::Enemy(index), ActorKind::Enemy) => Some(index),
            _ => None,
        }
    }
}

/// How killing an enemy changes an enemy selection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionPolicy {
    /// Clear only a selection of the killed enemy; a selection further along
    /// the row moves down with its enemy.
    #[default]
    ClearOnMatch,
    /// Clear any enemy selection.
    AlwaysClear,
}

/// One running game.
#[derive(Debug)]
pub struct GameSession {
    catalog: Catalog,
    config: SessionConfig,
    ledger: Ledger,
    buildings: BuildingRegistry,
    enemies: EnemyRegistry,
    selection: Selection,
    rng: ChaCha8Rng,
    seed: u64,
    bus: EventBus,
    started: bool,
    enemies_killed: u32,
}

impl GameSession {
    /// Create a session. Nothing is spawned until [`GameSession::start_game`].
    #[must_use]
    pub fn new(catalog: Catalog, config: SessionConfig, seed: u64) -> Self {
        Self {
            catalog,
            ledger: config.ledger(),
            buildings: BuildingRegistry::new(),
            enemies: EnemyRegistry::with_capacity(config.enemy_capacity),
            selection: Selection::None,
            rng: ChaCha8Rng::seed_from_u64(seed),
            seed,
            bus: EventBus::new(),
            started: false,
            enemies_killed: 0,
            config,
        }
    }

    /// Load one catalog kind into the session's catalog.
    ///
    /// # Errors
    ///
    /// Returns an error if the source cannot be read or parsed.
    pub fn load_catalog(
        &mut self,
        kind: CatalogKind,
        source: &impl CatalogSource,
    ) -> Result<bool, CatalogError> {
        self.catalog.load(kind, source)
    }

    /// Register a notification callback.
    pub fn subscribe(&mut self, callback: impl FnMut(&GameEvent) + 'static) -> SubscriptionId {
        self.bus.subscribe(callback)
    }

    /// Remove a notification callback.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.bus.unsubscribe(id)
    }

    /// Run one inbound command.
    pub fn execute(&mut self, command: &Command) -> CommandOutcome {
        match *command {
            Command::StartGame => {
                if self.start_game() {
                    CommandOutcome::Started
                } else {
                    CommandOutcome::AlreadyStarted
                }
            }
            Command::SelectGridSlot { index } => {
                self.select_grid_slot(index);
                CommandOutcome::Selected
            }
            Command::SelectEnemy { index } => {
                if self.select_enemy(index) {
                    CommandOutcome::Selected
                } else {
                    CommandOutcome::Ignored
                }
            }
            Command::InvokeAction { actor, action } => {
                CommandOutcome::Action(self.invoke_action(actor, action))
            }
        }
    }

    /// Place the starter buildings and spawn the opening encounter.
    ///
    /// Returns `false` without doing anything if the game already started.
    pub fn start_game(&mut self) -> bool {
        if self.started {
            debug!("start_game ignored: already started");
            return false;
        }
        self.started = true;
        info!(seed = self.seed, "game started");

        let starters = self.config.starter_buildings.clone();
        for key in &starters {
            self.spawn_building(key);
        }
        self.spawn_level(0);
        true
    }

    /// Select a grid slot. Any index is accepted; empty slots simply have
    /// no actions.
    pub fn select_grid_slot(&mut self, index: usize) {
        self.set_selection(Selection::Building(index));
    }

    /// Select the enemy at `index`. Returns `false` if no enemy lives there.
    pub fn select_enemy(&mut self, index: usize) -> bool {
        if index >= self.enemies.len() {
            debug!(index, "select_enemy ignored: no enemy at index");
            return false;
        }
        self.set_selection(Selection::Enemy(index));
        true
    }

    /// Run action `action_index` of the selected instance of kind `actor`.
    ///
    /// On success the effects run in a fixed order: resource adjustments by
    /// ascending key, then buildings, then the kill. A refused action
    /// changes nothing and publishes nothing.
    pub fn invoke_action(&mut self, actor: ActorKind, action_index: usize) -> ActionOutcome {
        let Some(index) = self.selection.index_of(actor) else {
            debug!(?actor, "invoke_action: nothing of that kind selected");
            return ActionOutcome::NoActor;
        };

        let actions = match actor {
            ActorKind::Building => self.buildings.get(index).map(|b| &b.entry.actions),
            ActorKind::Enemy => self.enemies.get(index).map(|e| &e.entry.actions),
        };
        let Some(actions) = actions else {
            debug!(?actor, index, "invoke_action: selected slot is empty");
            return ActionOutcome::NoActor;
        };
        let Some(action) = actions.get(action_index) else {
            debug!(?actor, index, action_index, "invoke_action: no such action");
            return ActionOutcome::NoSuchAction;
        };
        if !action.gates_pass(&self.ledger) {
            debug!(action = %action.name, "action refused by gates");
            return ActionOutcome::Gated;
        }

        let action = action.clone();
        debug!(?actor, index, action = %action.name, "action applied");

        for (&key, &delta) in &action.adjust {
            self.adjust_resource(key, delta);
        }
        for key in &action.build {
            self.spawn_building(key);
        }
        if action.kill && actor == ActorKind::Enemy {
            self.kill_enemy(index);
        }
        ActionOutcome::Applied
    }

    /// Adjust a counter and run everything that follows from it.
    ///
    /// Returns the change actually applied after clamping. When the day
    /// advances, each elapsed day is played out once, oldest first: enemies
    /// attack, then that day's encounter spawns.
    pub fn adjust_resource(&mut self, key: ResourceKey, delta: i64) -> i64 {
        let adjustments = self.ledger.adjust(key, delta);
        for adjustment in &adjustments {
            self.bus.publish(&GameEvent::ResourceAdjusted {
                key: adjustment.key,
                requested: adjustment.requested,
                delta: adjustment.delta,
                total: adjustment.total,
            });
        }

        let Some(primary) = adjustments.first().copied() else {
            return 0;
        };
        let days = primary.days_elapsed();
        if !days.is_empty() {
            self.bus.publish(&GameEvent::DaysElapsed {
                total: primary.total,
                elapsed: primary.delta,
            });
            for day in days {
                debug!(day, "day begins");
                self.resolve_attacks();
                self.spawn_level(day);
            }
        }
        primary.delta
    }

    /// Place a building from the catalog. Unknown keys are ignored.
    pub fn spawn_building(&mut self, key: &str) -> Option<usize> {
        let Some(entry) = self.catalog.building(key).cloned() else {
            warn!(key, "cannot spawn unknown building");
            return None;
        };
        let index = self.buildings.spawn(key, Arc::clone(&entry));
        debug!(key, index, "building spawned");
        self.bus.publish(&GameEvent::BuildingSpawned {
            key: key.to_string(),
            entry,
            index,
        });
        Some(index)
    }

    /// Spawn up to `count` enemies, stopping at capacity.
    ///
    /// Publishes one [`GameEvent::EnemiesSpawned`] for the whole batch, or
    /// nothing if no enemy was placed.
    pub fn spawn_enemy(&mut self, key: &str, count: u32) -> Vec<EnemySpawn> {
        let Some(entry) = self.catalog.enemy(key).cloned() else {
            warn!(key, "cannot spawn unknown enemy");
            return Vec::new();
        };
        let spawned = self.enemies.spawn(key, &entry, count);
        if spawned.len() < usize::try_from(count).unwrap_or(usize::MAX) {
            debug!(key, count, placed = spawned.len(), "enemy row full");
        }
        if !spawned.is_empty() {
            self.bus.publish(&GameEvent::EnemiesSpawned(spawned.clone()));
        }
        spawned
    }

    /// Remove the enemy at `index`, keeping the rest of the row in order.
    pub fn kill_enemy(&mut self, index: usize) -> Option<Spawned<EnemyType>> {
        let removed = self.enemies.remove(index)?;
        self.enemies_killed += 1;
        debug!(key = %removed.key, index, "enemy killed");
        self.bus.publish(&GameEvent::EnemyKilled {
            key: removed.key.clone(),
            entry: Arc::clone(&removed.entry),
            index,
        });

        if let Selection::Enemy(selected) = self.selection {
            let next = match self.config.kill_selection {
                SelectionPolicy::AlwaysClear => Selection::None,
                SelectionPolicy::ClearOnMatch if selected == index => Selection::None,
                SelectionPolicy::ClearOnMatch if selected > index => {
                    Selection::Enemy(selected - 1)
                }
                SelectionPolicy::ClearOnMatch => Selection::Enemy(selected),
            };
            self.set_selection(next);
        }
        Some(removed)
    }

    /// Spawn the encounter for `day`. Days without a level spawn nothing.
    pub fn spawn_level(&mut self, day: i64) -> Vec<EnemySpawn> {
        let Some(level) = self.config.levels.get(day) else {
            return Vec::new();
        };
        let Some(group) = select_group(level, &mut self.rng) else {
            return Vec::new();
        };
        let spawns = group.spawns.clone();
        debug!(day, groups = level.groups.len(), "level selected");

        let mut spawned = Vec::new();
        for (key, count) in &spawns {
            spawned.extend(self.spawn_enemy(key, *count));
        }
        spawned
    }

    fn resolve_attacks(&mut self) {
        for index in 0..self.enemies.len() {
            if self.enemies.consume_grace(index) {
                continue;
            }
            let Some(enemy) = self.enemies.get(index) else {
                break;
            };
            let entry = Arc::clone(&enemy.entry);
            let roll = roll_attack(&entry, &mut self.rng);
            self.bus.publish(&GameEvent::EnemyAttacked {
                index,
                damage: roll.damage(),
            });
            if let AttackRoll::Hit { damage } = roll {
                if damage > 0 {
                    self.adjust_resource(ResourceKey::Hp, -damage);
                }
            }
        }
    }

    fn set_selection(&mut self, selection: Selection) {
        if self.selection != selection {
            self.selection = selection;
            self.bus.publish(&GameEvent::SelectionChanged(selection));
        }
    }

    /// The loaded catalogs.
    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// The session rules.
    #[must_use]
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// The player's counters.
    #[must_use]
    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    /// Buildings on the grid.
    #[must_use]
    pub fn buildings(&self) -> &BuildingRegistry {
        &self.buildings
    }

    /// Enemies in the fight row.
    #[must_use]
    pub fn enemies(&self) -> &EnemyRegistry {
        &self.enemies
    }

    /// The current selection.
    #[must_use]
    pub fn selection(&self) -> Selection {
        self.selection
    }

    /// Current day.
    #[must_use]
    pub fn day(&self) -> i64 {
        self.ledger.get(ResourceKey::Days)
    }

    /// The seed this session was created with.
    #[must_use]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Whether [`GameSession::start_game`] has run.
    #[must_use]
    pub fn is_started(&self) -> bool {
        self.started
    }

    /// Whether health has hit its lower bound.
    #[must_use]
    pub fn is_defeated(&self) -> bool {
        self.ledger.counter(ResourceKey::Hp).is_empty()
    }

    /// Enemies killed so far.
    #[must_use]
    pub fn enemies_killed(&self) -> u32 {
        self.enemies_killed
    }

    /// The value a dashboard counter shows right now.
    #[must_use]
    pub fn counter_value(&self, def: &CounterDef) -> Option<i64> {
        match def.value()? {
            CounterValue::Resource(key) => Some(self.ledger.get(key)),
            CounterValue::Fixed(number) => Some(number),
        }
    }
}
