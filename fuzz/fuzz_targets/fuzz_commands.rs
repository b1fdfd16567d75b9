#![no_main]

//! Command stream fuzzer.
//!
//! Drives a session with arbitrary player commands and checks the session
//! invariants after every one. Gated actions must leave the ledger alone.

use std::sync::LazyLock;

use arbitrary::Arbitrary;
use daybreak::game::{ActionOutcome, ActorKind, Catalog, check_invariants};
use daybreak::{Command, CommandOutcome, GameSession, SessionConfig};
use libfuzzer_sys::fuzz_target;

static CATALOG: LazyLock<Catalog> =
    LazyLock::new(|| Catalog::embedded().expect("embedded catalog parses"));

#[derive(Arbitrary, Debug, Clone, Copy)]
enum FuzzCommand {
    Start,
    SelectSlot(u8),
    SelectEnemy(u8),
    InvokeBuilding(u8),
    InvokeEnemy(u8),
}

impl From<FuzzCommand> for Command {
    fn from(cmd: FuzzCommand) -> Self {
        match cmd {
            FuzzCommand::Start => Command::StartGame,
            FuzzCommand::SelectSlot(i) => Command::SelectGridSlot {
                index: usize::from(i % 12),
            },
            FuzzCommand::SelectEnemy(i) => Command::SelectEnemy {
                index: usize::from(i % 6),
            },
            FuzzCommand::InvokeBuilding(a) => Command::InvokeAction {
                actor: ActorKind::Building,
                action: usize::from(a % 6),
            },
            FuzzCommand::InvokeEnemy(a) => Command::InvokeAction {
                actor: ActorKind::Enemy,
                action: usize::from(a % 4),
            },
        }
    }
}

#[derive(Arbitrary, Debug)]
struct SessionInput {
    seed: u64,
    enemy_capacity: u8,
    commands: Vec<FuzzCommand>,
}

fuzz_target!(|input: SessionInput| {
    let config = SessionConfig {
        enemy_capacity: usize::from(input.enemy_capacity % 8),
        ..SessionConfig::default()
    };
    let mut session = GameSession::new(CATALOG.clone(), config, input.seed);

    for (i, &cmd) in input.commands.iter().take(500).enumerate() {
        let before = session.ledger().clone();
        let outcome = session.execute(&cmd.into());
        if outcome == CommandOutcome::Action(ActionOutcome::Gated) {
            assert_eq!(session.ledger(), &before, "gated action changed ledger");
        }

        let violations = check_invariants(&session);
        assert!(
            violations.is_empty(),
            "command {i} ({cmd:?}) broke invariants: {violations:?}"
        );
    }
});
