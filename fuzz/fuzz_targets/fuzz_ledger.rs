#![no_main]

//! Ledger fuzzer.
//!
//! Throws arbitrary bounds and deltas at a ledger and checks that every
//! counter stays inside its bounds and that reported deltas add up.

use arbitrary::Arbitrary;
use daybreak::game::{CounterLimits, Ledger, ResourceKey};
use libfuzzer_sys::fuzz_target;

#[derive(Arbitrary, Debug, Clone, Copy)]
struct FuzzLimits {
    start: i32,
    min: i32,
    max: i32,
    renew_floor: Option<i32>,
}

impl From<FuzzLimits> for CounterLimits {
    fn from(l: FuzzLimits) -> Self {
        Self {
            start: i64::from(l.start),
            min: i64::from(l.min),
            max: i64::from(l.max),
            renew_floor: l.renew_floor.map(i64::from),
        }
    }
}

#[derive(Arbitrary, Debug)]
struct LedgerInput {
    limits: [FuzzLimits; 5],
    ops: Vec<(u8, i64)>,
}

fuzz_target!(|input: LedgerInput| {
    let mut ledger = Ledger::new(|key| input.limits[key.index()].into());

    for &(key, delta) in input.ops.iter().take(256) {
        let key = ResourceKey::ALL[usize::from(key) % ResourceKey::ALL.len()];
        let before = ledger.get(key);
        let adjustments = ledger.adjust(key, delta);

        let primary = adjustments.first().expect("adjust reports the requested key");
        assert_eq!(primary.key, key);
        assert_eq!(primary.total - before, primary.delta);

        for (key, counter) in ledger.iter() {
            assert!(counter.min <= counter.max, "{key:?} bounds inverted");
            assert!(
                counter.current >= counter.min && counter.current <= counter.max,
                "{key:?} out of bounds: {counter:?}"
            );
        }
    }
});
