#![no_main]

//! Spawn-group selection fuzzer.
//!
//! Any level with at least one group must yield a group, and a group with
//! no effective weight is only chosen when the whole level is weightless.

use arbitrary::Arbitrary;
use daybreak::game::{Level, SpawnGroup, select_group};
use libfuzzer_sys::fuzz_target;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

#[derive(Arbitrary, Debug)]
struct LevelInput {
    weights: Vec<Option<f64>>,
    seed: u64,
    draws: u8,
}

fuzz_target!(|input: LevelInput| {
    let groups: Vec<SpawnGroup> = input
        .weights
        .iter()
        .take(32)
        .enumerate()
        .map(|(i, &weight)| SpawnGroup {
            spawns: vec![(format!("g{i}"), 1)],
            weight,
        })
        .collect();
    let level = Level::new(groups);
    let mut rng = ChaCha8Rng::seed_from_u64(input.seed);
    let weighted = level.total_weight() > 0.0;

    for _ in 0..input.draws {
        let Some(chosen) = select_group(&level, &mut rng) else {
            assert!(level.groups.is_empty());
            return;
        };
        if weighted {
            assert!(chosen.weight() > 0.0, "picked weightless group {chosen:?}");
        } else {
            assert!(std::ptr::eq(chosen, &level.groups[0]));
        }
    }
});
