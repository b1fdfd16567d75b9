//! Built-in automatic players.
//!
//! A player looks at the session and returns the next command to feed it.
//! Invoking an action takes two commands: select the actor, then invoke.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::game::{Action, ActorKind, Command, GameSession};

/// Mixed into the session seed so the random player does not replay the
/// session's own draws.
const PLAYER_SEED_SALT: u64 = 0x9E37_79B9_7F4A_7C15;

/// Chooses commands for a running session.
pub trait Autoplayer {
    /// The next command, or `None` if the player has nothing left to do.
    fn next_command(&mut self, session: &GameSession) -> Option<Command>;
}

/// An action of one live instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Target {
    actor: ActorKind,
    index: usize,
    action: usize,
}

impl Target {
    /// Select the actor first if needed, then invoke.
    fn command(self, session: &GameSession) -> Command {
        if session.selection().index_of(self.actor) == Some(self.index) {
            return Command::InvokeAction {
                actor: self.actor,
                action: self.action,
            };
        }
        match self.actor {
            ActorKind::Building => Command::SelectGridSlot { index: self.index },
            ActorKind::Enemy => Command::SelectEnemy { index: self.index },
        }
    }
}

/// Every action the ledger currently allows, buildings first.
fn affordable(session: &GameSession) -> Vec<(Target, &Action)> {
    let ledger = session.ledger();
    let buildings = session
        .buildings()
        .iter()
        .enumerate()
        .map(|(index, b)| (ActorKind::Building, index, &b.entry.actions));
    let enemies = session
        .enemies()
        .iter()
        .enumerate()
        .map(|(index, e)| (ActorKind::Enemy, index, &e.entry.actions));

    buildings
        .chain(enemies)
        .flat_map(|(actor, index, actions)| {
            actions.iter().enumerate().map(move |(action, a)| {
                (
                    Target {
                        actor,
                        index,
                        action,
                    },
                    a,
                )
            })
        })
        .filter(|(_, action)| action.gates_pass(ledger))
        .collect()
}

/// Kills whatever it can, works a few actions, then rests.
///
/// Work actions are picked newest building first and last action first,
/// which favours upgrades over gathering.
#[derive(Debug, Clone, Copy)]
pub struct GreedyPlayer {
    actions_per_day: u32,
    day: i64,
    spent: u32,
}

impl GreedyPlayer {
    /// A player that spends at most `actions_per_day` work actions per day.
    #[must_use]
    pub fn new(actions_per_day: u32) -> Self {
        Self {
            actions_per_day,
            day: i64::MIN,
            spent: 0,
        }
    }

    fn pick(&self, session: &GameSession) -> Option<Target> {
        let options = affordable(session);

        if let Some((target, _)) = options
            .iter()
            .find(|(t, a)| t.actor == ActorKind::Enemy && a.kill)
        {
            return Some(*target);
        }

        if self.spent < self.actions_per_day {
            let work = options.iter().rev().find(|(t, a)| {
                t.actor == ActorKind::Building && !a.advances_days() && !a.adjust.is_empty()
            });
            if let Some((target, _)) = work {
                return Some(*target);
            }
        }

        options
            .iter()
            .find(|(t, a)| t.actor == ActorKind::Building && a.advances_days())
            .map(|(target, _)| *target)
    }
}

impl Autoplayer for GreedyPlayer {
    fn next_command(&mut self, session: &GameSession) -> Option<Command> {
        if !session.is_started() {
            return Some(Command::StartGame);
        }
        if session.day() != self.day {
            self.day = session.day();
            self.spent = 0;
        }

        let target = self.pick(session)?;
        let command = target.command(session);
        if matches!(command, Command::InvokeAction { .. }) && target.actor == ActorKind::Building {
            self.spent += 1;
        }
        Some(command)
    }
}

/// Picks uniformly among every affordable action.
#[derive(Debug, Clone)]
pub struct RandomPlayer {
    rng: ChaCha8Rng,
    pending: Option<Target>,
}

impl RandomPlayer {
    /// A player whose choices are fixed by `seed`.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed ^ PLAYER_SEED_SALT),
            pending: None,
        }
    }
}

impl Autoplayer for RandomPlayer {
    fn next_command(&mut self, session: &GameSession) -> Option<Command> {
        if !session.is_started() {
            return Some(Command::StartGame);
        }

        let target = match self.pending.take() {
            Some(target) => target,
            None => {
                let options = affordable(session);
                if options.is_empty() {
                    return None;
                }
                options[self.rng.random_range(0..options.len())].0
            }
        };

        let command = target.command(session);
        if !matches!(command, Command::InvokeAction { .. }) {
            self.pending = Some(target);
        }
        Some(command)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SessionConfig;
    use crate::game::{Catalog, ResourceKey};

    fn started() -> GameSession {
        let mut session =
            GameSession::new(Catalog::embedded().unwrap(), SessionConfig::default(), 5);
        session.start_game();
        session
    }

    #[test]
    fn test_players_start_the_game() {
        let session = GameSession::new(Catalog::embedded().unwrap(), SessionConfig::default(), 5);
        assert_eq!(GreedyPlayer::new(2).next_command(&session), Some(Command::StartGame));
        assert_eq!(RandomPlayer::new(5).next_command(&session), Some(Command::StartGame));
    }

    #[test]
    fn test_greedy_kills_first() {
        let mut session = started();
        session.adjust_resource(ResourceKey::Troops, 1);
        let mut player = GreedyPlayer::new(2);

        let select = player.next_command(&session).unwrap();
        assert_eq!(select, Command::SelectEnemy { index: 0 });
        session.execute(&select);
        assert_eq!(
            player.next_command(&session),
            Some(Command::InvokeAction {
                actor: ActorKind::Enemy,
                action: 0
            })
        );
    }

    #[test]
    fn test_greedy_rests_after_budget() {
        let mut session = started();
        let mut player = GreedyPlayer::new(1);

        // Only chopping wood is affordable: select, chop, then rest.
        for _ in 0..2 {
            let command = player.next_command(&session).unwrap();
            session.execute(&command);
        }
        assert_eq!(session.ledger().get(ResourceKey::Wood), 1);
        assert_eq!(
            player.next_command(&session),
            Some(Command::InvokeAction {
                actor: ActorKind::Building,
                action: 0
            })
        );
    }

    #[test]
    fn test_random_player_is_seeded() {
        let play = |seed| {
            let mut session = started();
            let mut player = RandomPlayer::new(seed);
            (0..40)
                .map_while(|_| {
                    let command = player.next_command(&session)?;
                    session.execute(&command);
                    Some(command)
                })
                .collect::<Vec<_>>()
        };
        assert_eq!(play(9), play(9));
    }

    #[test]
    fn test_random_player_invokes_what_it_selected() {
        let mut session = started();
        let mut player = RandomPlayer::new(1);
        let first = player.next_command(&session).unwrap();
        session.execute(&first);
        let second = player.next_command(&session).unwrap();
        assert!(matches!(second, Command::InvokeAction { .. }));
    }
}
