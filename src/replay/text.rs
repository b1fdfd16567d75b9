//! Plain text rendering of sessions and events.
//!
//! One line per event, and a short block for the session status. No layout
//! beyond line breaks; the output is meant for terminals and logs.

// Allow format! with push_str for readability - the allocation overhead is negligible for text rendering
#![allow(clippy::format_push_string)]

use crate::game::{GameEvent, GameSession, ResourceKey, Selection};

/// Render the session's dashboard.
///
/// Output format:
/// ```text
/// === DAY 3 ===
/// days 3 | hp 2/4 | wood 1 | tools 0 | troops 2
/// Buildings (1): campfire
/// Enemies (2/4): zombie, zombie
/// Selected: enemy 0
/// ```
#[must_use]
pub fn render_status(session: &GameSession) -> String {
    let mut output = String::new();

    output.push_str(&format!("=== DAY {} ===\n", session.day()));

    let counters: Vec<String> = session
        .ledger()
        .iter()
        .map(|(key, counter)| {
            if key == ResourceKey::Hp {
                format!("{key} {}/{}", counter.current, counter.max)
            } else {
                format!("{key} {}", counter.current)
            }
        })
        .collect();
    output.push_str(&counters.join(" | "));
    output.push('\n');

    let buildings: Vec<&str> = session.buildings().iter().map(|b| b.key.as_str()).collect();
    output.push_str(&format!(
        "Buildings ({}): {}\n",
        buildings.len(),
        buildings.join(", ")
    ));

    let enemies = session.enemies();
    let names: Vec<&str> = enemies.iter().map(|e| e.key.as_str()).collect();
    output.push_str(&format!(
        "Enemies ({}/{}): {}\n",
        names.len(),
        enemies.capacity(),
        names.join(", ")
    ));

    let selected = match session.selection() {
        Selection::None => "nothing".to_string(),
        Selection::Building(index) => format!("grid slot {index}"),
        Selection::Enemy(index) => format!("enemy {index}"),
    };
    output.push_str(&format!("Selected: {selected}\n"));

    if session.is_defeated() {
        output.push_str("DEFEATED\n");
    }

    output
}

/// Render one event as a single line.
#[must_use]
pub fn render_event(event: &GameEvent) -> String {
    match event {
        GameEvent::ResourceAdjusted {
            key,
            requested,
            delta,
            total,
        } => {
            if requested == delta {
                format!("{key} {delta:+} -> {total}")
            } else {
                format!("{key} {delta:+} (asked {requested:+}) -> {total}")
            }
        }
        GameEvent::BuildingSpawned { key, index, .. } => {
            format!("built {key} in slot {index}")
        }
        GameEvent::EnemiesSpawned(batch) => {
            let spawned: Vec<String> = batch
                .iter()
                .map(|s| format!("{}#{}", s.key, s.index))
                .collect();
            format!("spawned {}", spawned.join(", "))
        }
        GameEvent::EnemyKilled { key, index, .. } => format!("killed {key}#{index}"),
        GameEvent::EnemyAttacked { index, damage: 0 } => format!("enemy {index} missed"),
        GameEvent::EnemyAttacked { index, damage } => {
            format!("enemy {index} hit for {damage}")
        }
        GameEvent::DaysElapsed { total, elapsed } => {
            format!("day {total} ({elapsed} elapsed)")
        }
        GameEvent::SelectionChanged(Selection::None) => "selection cleared".to_string(),
        GameEvent::SelectionChanged(Selection::Building(index)) => {
            format!("selected grid slot {index}")
        }
        GameEvent::SelectionChanged(Selection::Enemy(index)) => format!("selected enemy {index}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SessionConfig;
    use crate::game::Catalog;

    #[test]
    fn test_render_status_after_start() {
        let mut session =
            GameSession::new(Catalog::embedded().unwrap(), SessionConfig::default(), 1);
        session.start_game();
        session.select_enemy(0);
        let text = render_status(&session);
        assert!(text.starts_with("=== DAY 1 ===\n"));
        assert!(text.contains("hp 2/4"));
        assert!(text.contains("Buildings (1): campfire"));
        assert!(text.contains("Enemies (3/4): zombie, zombie, zombie"));
        assert!(text.contains("Selected: enemy 0"));
        assert!(!text.contains("DEFEATED"));
    }

    #[test]
    fn test_render_clamped_adjustment() {
        let event = GameEvent::ResourceAdjusted {
            key: ResourceKey::Hp,
            requested: 5,
            delta: 2,
            total: 4,
        };
        assert_eq!(render_event(&event), "hp +2 (asked +5) -> 4");
    }

    #[test]
    fn test_render_attack_lines() {
        assert_eq!(
            render_event(&GameEvent::EnemyAttacked { index: 1, damage: 0 }),
            "enemy 1 missed"
        );
        assert_eq!(
            render_event(&GameEvent::EnemyAttacked { index: 1, damage: 2 }),
            "enemy 1 hit for 2"
        );
    }
}
