//! Inbound commands from the presentation layer.

use serde::{Deserialize, Serialize};

use crate::game::{ActionOutcome, ActorKind};

/// One user input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum Command {
    /// Place starter buildings and spawn the opening encounter.
    StartGame,
    /// Select a grid slot (occupied or not).
    SelectGridSlot {
        /// Grid index.
        index: usize,
    },
    /// Select an enemy in the fight row.
    SelectEnemy {
        /// Row index.
        index: usize,
    },
    /// Run an action of the selected instance.
    InvokeAction {
        /// Which kind of instance must be selected.
        actor: ActorKind,
        /// Index into the instance's action list.
        action: usize,
    },
}

/// What a command did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CommandOutcome {
    /// The game started.
    Started,
    /// The game was already running; nothing happened.
    AlreadyStarted,
    /// The selection changed.
    Selected,
    /// The command referred to nothing; nothing happened.
    Ignored,
    /// An action was attempted.
    Action(ActionOutcome),
}

impl CommandOutcome {
    /// Whether the command changed any state.
    #[must_use]
    pub const fn changed_state(self) -> bool {
        matches!(
            self,
            CommandOutcome::Started
                | CommandOutcome::Selected
                | CommandOutcome::Action(ActionOutcome::Applied)
        )
    }
}
