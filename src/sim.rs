//! Headless session runner.
//!
//! Provides a pure function interface: `(seed, strategy) -> SessionResult`.
//! The same seed, catalog, configuration and strategy always produce the
//! same result and the same command list.

mod autoplay;

pub use autoplay::{Autoplayer, GreedyPlayer, RandomPlayer};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::SessionConfig;
use crate::game::{
    Catalog, Command, GameSession, InvariantViolation, RESOURCE_COUNT, check_invariants,
};

/// Which built-in player drives a session.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    /// [`GreedyPlayer`].
    #[default]
    Greedy,
    /// [`RandomPlayer`].
    Random,
}

impl Strategy {
    /// Build the player for a session.
    #[must_use]
    pub fn player(self, seed: u64, sim: &SimConfig) -> Box<dyn Autoplayer> {
        match self {
            Strategy::Greedy => Box::new(GreedyPlayer::new(sim.actions_per_day)),
            Strategy::Random => Box::new(RandomPlayer::new(seed)),
        }
    }

    /// Lowercase name, as accepted on the command line.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Strategy::Greedy => "greedy",
            Strategy::Random => "random",
        }
    }
}

impl std::fmt::Display for Strategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Limits for one simulated session.
#[derive(Debug, Clone, Copy)]
pub struct SimConfig {
    /// Stop once this many days have passed.
    pub max_days: u32,
    /// Stop after this many commands, the opening `StartGame` included.
    pub max_commands: usize,
    /// Work actions the greedy player takes before resting.
    pub actions_per_day: u32,
    /// Check invariants after every command.
    pub check_invariants: bool,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            max_days: 30,
            max_commands: 5_000,
            actions_per_day: 3,
            check_invariants: true,
        }
    }
}

/// Final result of a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionResult {
    /// The seed used for this session.
    pub seed: u64,
    /// The player that drove it.
    pub strategy: Strategy,
    /// Day reached.
    pub days: i64,
    /// Whether health ran out.
    pub defeated: bool,
    /// Whether the player ran out of moves.
    pub stalled: bool,
    /// Final counter values in ledger order.
    pub resources: [i64; RESOURCE_COUNT],
    /// Buildings on the grid.
    pub buildings: usize,
    /// Enemies still alive.
    pub enemies_alive: usize,
    /// Enemies killed.
    pub enemies_killed: u32,
    /// Every command fed to the session, in order.
    pub commands: Vec<Command>,
}

/// Error type for simulation runs.
#[derive(Debug)]
pub enum SimError {
    /// An invariant broke after a command.
    InvariantViolated {
        /// Session seed.
        seed: u64,
        /// Position of the offending command.
        command: usize,
        /// Everything that broke.
        violations: Vec<InvariantViolation>,
    },
}

impl std::fmt::Display for SimError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvariantViolated {
                seed,
                command,
                violations,
            } => {
                write!(f, "seed {seed}, command {command}: ")?;
                let messages: Vec<String> = violations.iter().map(ToString::to_string).collect();
                f.write_str(&messages.join("; "))
            }
        }
    }
}

impl std::error::Error for SimError {}

/// Run a complete session with a built-in player.
///
/// # Errors
///
/// Returns an error if invariant checking is on and any check fails.
pub fn run_session(
    seed: u64,
    catalog: &Catalog,
    config: &SessionConfig,
    sim: &SimConfig,
    strategy: Strategy,
) -> Result<SessionResult, SimError> {
    let mut session = GameSession::new(catalog.clone(), config.clone(), seed);
    let mut player = strategy.player(seed, sim);
    let mut commands = vec![Command::StartGame];
    session.execute(&Command::StartGame);

    let first_day = session.day();
    let mut stalled = false;

    while !session.is_defeated()
        && session.day() - first_day < i64::from(sim.max_days)
        && commands.len() < sim.max_commands
    {
        let Some(command) = player.next_command(&session) else {
            stalled = true;
            break;
        };
        let outcome = session.execute(&command);
        debug!(?command, ?outcome, day = session.day(), "command executed");
        commands.push(command);

        if sim.check_invariants {
            let violations = check_invariants(&session);
            if !violations.is_empty() {
                return Err(SimError::InvariantViolated {
                    seed,
                    command: commands.len() - 1,
                    violations,
                });
            }
        }
    }

    Ok(SessionResult {
        seed,
        strategy,
        days: session.day(),
        defeated: session.is_defeated(),
        stalled,
        resources: session.ledger().values(),
        buildings: session.buildings().len(),
        enemies_alive: session.enemies().len(),
        enemies_killed: session.enemies_killed(),
        commands,
    })
}
