//! Game invariants - sanity checks that detect bugs.
//!
//! These should NEVER trigger in a correctly implemented engine: every rule
//! that could break them is enforced where state changes. They are not
//! gameplay limits.

use crate::game::{GameSession, Selection};

/// Invariant violation error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvariantViolation {
    /// Description of the violated invariant.
    pub message: String,
}

impl std::fmt::Display for InvariantViolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Invariant violation: {}", self.message)
    }
}

impl std::error::Error for InvariantViolation {}

/// Check all session invariants.
///
/// Returns a list of violations found, or empty if all invariants hold.
#[must_use]
pub fn check_invariants(session: &GameSession) -> Vec<InvariantViolation> {
    let mut violations = Vec::new();

    for (key, counter) in session.ledger().iter() {
        if counter.min > counter.max {
            violations.push(InvariantViolation {
                message: format!("{key} has min {} > max {}", counter.min, counter.max),
            });
        }
        if counter.current < counter.min || counter.current > counter.max {
            violations.push(InvariantViolation {
                message: format!(
                    "{key} = {} outside [{}, {}]",
                    counter.current, counter.min, counter.max
                ),
            });
        }
    }

    let enemies = session.enemies();
    if enemies.len() > enemies.capacity() {
        violations.push(InvariantViolation {
            message: format!(
                "{} enemies alive > capacity {}",
                enemies.len(),
                enemies.capacity()
            ),
        });
    }

    if enemies.flag_count() != enemies.len() {
        violations.push(InvariantViolation {
            message: format!(
                "{} recent-spawn flags for {} enemies",
                enemies.flag_count(),
                enemies.len()
            ),
        });
    }

    if let Selection::Enemy(index) = session.selection() {
        if index >= enemies.len() {
            violations.push(InvariantViolation {
                message: format!(
                    "selected enemy {index} but only {} alive",
                    enemies.len()
                ),
            });
        }
    }

    if !session.is_started() && (!session.buildings().is_empty() || session.enemies_killed() > 0)
    {
        violations.push(InvariantViolation {
            message: "state changed before the game started".to_string(),
        });
    }

    violations
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SessionConfig;
    use crate::game::{ActorKind, Catalog, ResourceKey};

    fn session() -> GameSession {
        GameSession::new(Catalog::embedded().unwrap(), SessionConfig::default(), 1)
    }

    #[test]
    fn test_fresh_session_is_valid() {
        assert!(check_invariants(&session()).is_empty());
    }

    #[test]
    fn test_played_session_is_valid() {
        let mut session = session();
        session.start_game();
        session.select_grid_slot(0);
        for _ in 0..20 {
            session.invoke_action(ActorKind::Building, 1);
            session.invoke_action(ActorKind::Building, 0);
            if session.select_enemy(0) {
                session.invoke_action(ActorKind::Enemy, 0);
            }
            session.select_grid_slot(0);
        }
        session.adjust_resource(ResourceKey::Hp, -1_000);
        let violations = check_invariants(&session);
        assert!(violations.is_empty(), "{violations:?}");
    }

    #[test]
    fn test_violation_display() {
        let v = InvariantViolation {
            message: "hp = 9 outside [0, 4]".to_string(),
        };
        assert_eq!(v.to_string(), "Invariant violation: hp = 9 outside [0, 4]");
    }
}
