//! Property-based tests for game mechanics.
//!
//! These tests verify properties of the ledger, spawning and actions.
//! Run with: cargo test --release prop_game

#![allow(missing_docs)]
#![allow(clippy::unwrap_used)]

use std::collections::BTreeMap;
use std::sync::{Arc, LazyLock};

use proptest::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use daybreak::game::{
    Action, ActionOutcome, ActorKind, Catalog, CatalogKind, CounterLimits, EmbeddedSource,
    EnemyRegistry, EnemyType, Ledger, Level, ResourceKey, SpawnGroup, check_invariants,
    select_group,
};
use daybreak::{GameSession, SessionConfig};

static CATALOG: LazyLock<Catalog> = LazyLock::new(|| Catalog::embedded().unwrap());

fn resource_key() -> impl Strategy<Value = ResourceKey> {
    prop::sample::select(ResourceKey::ALL.to_vec())
}

fn limits() -> impl Strategy<Value = CounterLimits> {
    (-50i64..50, -50i64..50, -50i64..50, prop::option::of(-50i64..50)).prop_map(
        |(start, min, max, renew_floor)| CounterLimits {
            start,
            min,
            max,
            renew_floor,
        },
    )
}

fn group(name: &str, weight: Option<f64>) -> SpawnGroup {
    SpawnGroup {
        spawns: vec![(name.to_string(), 1)],
        weight,
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(2000))]

    /// Every counter stays within its bounds whatever is thrown at it.
    #[test]
    fn prop_ledger_clamps(
        bounds in prop::collection::vec(limits(), 5),
        ops in prop::collection::vec((resource_key(), any::<i64>()), 1..40)
    ) {
        let mut ledger = Ledger::new(|key| bounds[key.index()]);
        for (key, delta) in ops {
            let before = ledger.get(key);
            let adjustments = ledger.adjust(key, delta);
            let primary = adjustments[0];
            prop_assert_eq!(primary.key, key);
            prop_assert_eq!(primary.requested, delta);
            prop_assert_eq!(primary.total - before, primary.delta);

            for (_, counter) in ledger.iter() {
                prop_assert!(counter.min <= counter.max);
                prop_assert!(counter.current >= counter.min);
                prop_assert!(counter.current <= counter.max);
            }
        }
    }

    /// After the day advances every renewable counter is at least its floor.
    #[test]
    fn prop_renewal_floor(
        troops_delta in -10i64..10,
        days in 1i64..5
    ) {
        let mut ledger = Ledger::default();
        ledger.adjust(ResourceKey::Troops, troops_delta);
        let before = ledger.get(ResourceKey::Troops);
        ledger.adjust(ResourceKey::Days, days);
        prop_assert!(ledger.get(ResourceKey::Troops) >= 2);
        prop_assert_eq!(ledger.get(ResourceKey::Troops), before.max(2));
    }

    /// Spawning never exceeds capacity and places exactly what fits.
    #[test]
    fn prop_spawn_capacity(
        capacity in 0usize..8,
        batches in prop::collection::vec(0u32..6, 1..10)
    ) {
        let mut row = EnemyRegistry::with_capacity(capacity);
        let zombie = Arc::new(EnemyType::default());
        for count in batches {
            let before = row.len();
            let room = capacity - before;
            let spawned = row.spawn("zombie", &zombie, count);
            prop_assert_eq!(spawned.len(), room.min(count as usize));
            prop_assert!(row.len() <= capacity);
            for (offset, s) in spawned.iter().enumerate() {
                prop_assert_eq!(s.index, before + offset);
            }
        }
    }

    /// A level without positive weight always yields its first group.
    #[test]
    fn prop_weightless_level_picks_first(
        weights in prop::collection::vec(prop::option::of(-5.0f64..=0.0), 1..6),
        seed in any::<u64>()
    ) {
        let groups = weights
            .iter()
            .enumerate()
            .map(|(i, w)| group(&format!("g{i}"), *w))
            .collect();
        let level = Level::new(groups);
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let chosen = select_group(&level, &mut rng).unwrap();
        prop_assert_eq!(&chosen.spawns[0].0, "g0");
    }

    /// A group with zero weight is never chosen when another has weight.
    #[test]
    fn prop_zero_weight_never_chosen(
        weight in 0.01f64..100.0,
        position in 0usize..3,
        seed in any::<u64>()
    ) {
        let mut groups = vec![group("dead", Some(0.0)), group("dead", Some(0.0))];
        groups.insert(position, group("live", Some(weight)));
        let level = Level::new(groups);
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        for _ in 0..20 {
            let chosen = select_group(&level, &mut rng).unwrap();
            prop_assert_eq!(&chosen.spawns[0].0, "live");
        }
    }

    /// Removing an enemy keeps the others in their original order.
    #[test]
    fn prop_kill_preserves_order(
        count in 1usize..=4,
        kill in 0usize..4
    ) {
        let mut row = EnemyRegistry::default();
        for i in 0..count {
            let enemy = Arc::new(EnemyType { name: format!("e{i}"), ..EnemyType::default() });
            row.spawn(&format!("e{i}"), &enemy, 1);
        }
        let mut expected: Vec<String> = (0..count).map(|i| format!("e{i}")).collect();
        let removed = row.remove(kill);
        if kill < count {
            prop_assert_eq!(removed.unwrap().key, expected.remove(kill));
        } else {
            prop_assert!(removed.is_none());
        }
        let keys: Vec<String> = row.iter().map(|e| e.key.clone()).collect();
        prop_assert_eq!(keys, expected);
        prop_assert_eq!(row.flag_count(), row.len());
    }

    /// An action whose gates fail changes nothing.
    #[test]
    fn prop_gated_action_is_noop(
        wood in 0i64..10,
        need in 1i64..20
    ) {
        let action = Action {
            name: "Test".to_string(),
            adjust: BTreeMap::from([(ResourceKey::Wood, -need)]),
            min: BTreeMap::from([(ResourceKey::Wood, need)]),
            ..Action::default()
        };
        let mut ledger = Ledger::default();
        ledger.adjust(ResourceKey::Wood, wood);
        prop_assert_eq!(action.gates_pass(&ledger), wood >= need);
    }

    /// Random command streams never break session invariants.
    #[test]
    fn prop_commands_keep_invariants(
        seed in any::<u64>(),
        commands in prop::collection::vec((0u8..4, 0usize..6, 0usize..5), 1..60)
    ) {
        let mut session = GameSession::new(CATALOG.clone(), SessionConfig::default(), seed);
        for (kind, index, action) in commands {
            let command = match kind {
                0 => daybreak::Command::StartGame,
                1 => daybreak::Command::SelectGridSlot { index },
                2 => daybreak::Command::SelectEnemy { index },
                _ => daybreak::Command::InvokeAction {
                    actor: if index % 2 == 0 { ActorKind::Building } else { ActorKind::Enemy },
                    action,
                },
            };
            let before = session.ledger().clone();
            let outcome = session.execute(&command);
            if outcome == daybreak::CommandOutcome::Action(ActionOutcome::Gated) {
                prop_assert_eq!(session.ledger(), &before);
            }
            let violations = check_invariants(&session);
            prop_assert!(violations.is_empty(), "{:?}", violations);
        }
    }
}

/// Loading a catalog kind twice is a no-op.
#[test]
fn test_catalog_load_is_idempotent() {
    let mut catalog = Catalog::new();
    for kind in CatalogKind::ALL {
        assert!(catalog.load(kind, &EmbeddedSource).unwrap());
        assert!(!catalog.load(kind, &EmbeddedSource).unwrap());
    }
    assert_eq!(catalog.buildings().count(), 2);
}

/// Selection frequency tracks the declared weights.
#[test]
fn test_weighted_selection_ratio() {
    let level = Level::new(vec![group("a", Some(3.0)), group("b", Some(1.0))]);
    let mut rng = ChaCha8Rng::seed_from_u64(2024);
    let trials = 20_000;
    let a = (0..trials)
        .filter(|_| select_group(&level, &mut rng).unwrap().spawns[0].0 == "a")
        .count();
    let share = a as f64 / f64::from(trials);
    assert!((share - 0.75).abs() < 0.02, "share = {share}");
}
