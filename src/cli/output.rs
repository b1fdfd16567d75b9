//! Output formatting utilities for CLI.

// Allow format! with push_str and float statistics over counts
#![allow(clippy::format_push_string, clippy::cast_precision_loss)]

use daybreak::game::{RESOURCE_COUNT, ResourceKey};
use daybreak::sim::SessionResult;
use serde::Serialize;
use std::collections::BTreeMap;

/// JSON-serializable session result.
#[derive(Debug, Serialize)]
pub(super) struct JsonSessionResult {
    /// Random seed used.
    seed: u64,
    /// Player strategy.
    strategy: String,
    /// Day reached.
    days: i64,
    /// Whether health ran out.
    defeated: bool,
    /// Whether the player ran out of moves.
    stalled: bool,
    /// Final counter values by name.
    resources: BTreeMap<&'static str, i64>,
    /// Buildings on the grid.
    buildings: usize,
    /// Enemies still alive.
    enemies_alive: usize,
    /// Enemies killed.
    enemies_killed: u32,
    /// Number of commands issued.
    commands: usize,
}

impl JsonSessionResult {
    /// Create from a `SessionResult`.
    pub(super) fn from_result(result: &SessionResult) -> Self {
        Self {
            seed: result.seed,
            strategy: result.strategy.to_string(),
            days: result.days,
            defeated: result.defeated,
            stalled: result.stalled,
            resources: ResourceKey::ALL
                .iter()
                .map(|key| (key.as_str(), result.resources[key.index()]))
                .collect(),
            buildings: result.buildings,
            enemies_alive: result.enemies_alive,
            enemies_killed: result.enemies_killed,
            commands: result.commands.len(),
        }
    }
}

/// Format a session result as human-readable text.
pub(super) fn format_text(result: &SessionResult) -> String {
    let mut output = String::new();

    output.push_str(&format!(
        "Session Result (seed: {}, strategy: {})\n",
        result.seed, result.strategy
    ));
    let ending = if result.defeated {
        "defeated"
    } else if result.stalled {
        "stalled"
    } else {
        "survived"
    };
    output.push_str(&format!("  Outcome: {ending} on day {}\n", result.days));
    output.push_str(&format!("  Commands: {}\n\n", result.commands.len()));

    for key in ResourceKey::ALL {
        output.push_str(&format!("  {key:<7} {}\n", result.resources[key.index()]));
    }
    output.push_str(&format!(
        "\n  Buildings: {}\n  Enemies alive: {}\n  Enemies killed: {}\n",
        result.buildings, result.enemies_alive, result.enemies_killed
    ));

    output
}

/// Aggregated statistics over many sessions.
#[derive(Debug, Default)]
pub(super) struct SimulationStats {
    /// Total sessions played.
    pub(super) sessions: u64,
    /// Sessions that ended in defeat.
    pub(super) defeats: u64,
    /// Sessions where the player ran out of moves.
    pub(super) stalls: u64,
    /// Sessions that hit an invariant violation.
    pub(super) failures: u64,
    /// Sum of days reached.
    total_days: i64,
    /// Sum of squared days reached, for std dev.
    days_sq_sum: f64,
    /// Sum of final counter values.
    total_resources: [i64; RESOURCE_COUNT],
    /// Sum of enemies killed.
    total_kills: u64,
    /// Sum of buildings placed.
    total_buildings: u64,
}

impl SimulationStats {
    /// Add a session result to the stats.
    pub(super) fn add_result(&mut self, result: &SessionResult) {
        self.sessions += 1;
        if result.defeated {
            self.defeats += 1;
        }
        if result.stalled {
            self.stalls += 1;
        }
        self.total_days += result.days;
        self.days_sq_sum += (result.days as f64) * (result.days as f64);
        for (total, value) in self.total_resources.iter_mut().zip(result.resources) {
            *total += value;
        }
        self.total_kills += u64::from(result.enemies_killed);
        self.total_buildings += result.buildings as u64;
    }

    /// Count a session that failed its invariant checks.
    pub(super) fn add_failure(&mut self) {
        self.failures += 1;
    }

    /// Merge another stats object into this one.
    pub(super) fn merge(&mut self, other: &Self) {
        self.sessions += other.sessions;
        self.defeats += other.defeats;
        self.stalls += other.stalls;
        self.failures += other.failures;
        self.total_days += other.total_days;
        self.days_sq_sum += other.days_sq_sum;
        for (total, value) in self.total_resources.iter_mut().zip(other.total_resources) {
            *total += value;
        }
        self.total_kills += other.total_kills;
        self.total_buildings += other.total_buildings;
    }

    fn per_session(&self, total: f64) -> f64 {
        if self.sessions == 0 {
            return 0.0;
        }
        total / self.sessions as f64
    }

    /// Fraction of sessions that ended in defeat (0.0-1.0).
    pub(super) fn defeat_rate(&self) -> f64 {
        self.per_session(self.defeats as f64)
    }

    /// Average day reached.
    pub(super) fn avg_days(&self) -> f64 {
        self.per_session(self.total_days as f64)
    }

    /// Standard deviation of the day reached.
    pub(super) fn days_std_dev(&self) -> f64 {
        let mean = self.avg_days();
        let variance = self.per_session(self.days_sq_sum) - mean * mean;
        if variance < 0.0 { 0.0 } else { variance.sqrt() }
    }

    /// Average final value of a counter.
    pub(super) fn avg_resource(&self, key: ResourceKey) -> f64 {
        self.per_session(self.total_resources[key.index()] as f64)
    }

    /// Average enemies killed.
    pub(super) fn avg_kills(&self) -> f64 {
        self.per_session(self.total_kills as f64)
    }

    /// Average buildings placed.
    pub(super) fn avg_buildings(&self) -> f64 {
        self.per_session(self.total_buildings as f64)
    }
}

/// JSON-serializable simulation summary.
#[derive(Debug, Serialize)]
pub(super) struct JsonSimulationResult {
    /// Total sessions played.
    sessions: u64,
    /// Sessions that ended in defeat.
    defeats: u64,
    /// Defeat rate (0.0-1.0).
    defeat_rate: f64,
    /// Sessions where the player stalled.
    stalls: u64,
    /// Sessions that failed invariant checks.
    failures: u64,
    /// Average day reached.
    avg_days: f64,
    /// Standard deviation of the day reached.
    days_std_dev: f64,
    /// Average enemies killed.
    avg_kills: f64,
    /// Average buildings placed.
    avg_buildings: f64,
    /// Average final counter values.
    avg_resources: BTreeMap<&'static str, f64>,
}

impl JsonSimulationResult {
    /// Create from stats.
    pub(super) fn from_stats(stats: &SimulationStats) -> Self {
        Self {
            sessions: stats.sessions,
            defeats: stats.defeats,
            defeat_rate: stats.defeat_rate(),
            stalls: stats.stalls,
            failures: stats.failures,
            avg_days: stats.avg_days(),
            days_std_dev: stats.days_std_dev(),
            avg_kills: stats.avg_kills(),
            avg_buildings: stats.avg_buildings(),
            avg_resources: ResourceKey::ALL
                .iter()
                .map(|&key| (key.as_str(), stats.avg_resource(key)))
                .collect(),
        }
    }
}

/// Format simulation stats as human-readable text.
pub(super) fn format_simulation_text(stats: &SimulationStats) -> String {
    let mut output = String::new();

    output.push_str(&format!("Simulation Results ({} sessions)\n", stats.sessions));
    output.push_str("========================================\n\n");

    output.push_str(&format!(
        "Defeats: {} ({:.1}%)\nStalls: {}\n",
        stats.defeats,
        stats.defeat_rate() * 100.0,
        stats.stalls
    ));
    if stats.failures > 0 {
        output.push_str(&format!("Invariant failures: {}\n", stats.failures));
    }

    output.push_str(&format!(
        "\nDays reached: {:.1} (+/- {:.1})\n",
        stats.avg_days(),
        stats.days_std_dev()
    ));
    output.push_str(&format!("Enemies killed: {:.1}\n", stats.avg_kills()));
    output.push_str(&format!("Buildings: {:.1}\n\n", stats.avg_buildings()));

    output.push_str("Average Final Resources:\n");
    for key in ResourceKey::ALL {
        output.push_str(&format!("  {key:<7} {:.1}\n", stats.avg_resource(key)));
    }

    output
}

/// Format simulation stats as CSV.
pub(super) fn format_simulation_csv(stats: &SimulationStats) -> String {
    let mut output = String::new();

    output.push_str("sessions,defeats,stalls,failures,avg_days,days_std_dev,avg_kills");
    for key in ResourceKey::ALL {
        output.push_str(&format!(",avg_{key}"));
    }
    output.push('\n');

    output.push_str(&format!(
        "{},{},{},{},{:.2},{:.2},{:.2}",
        stats.sessions,
        stats.defeats,
        stats.stalls,
        stats.failures,
        stats.avg_days(),
        stats.days_std_dev(),
        stats.avg_kills()
    ));
    for key in ResourceKey::ALL {
        output.push_str(&format!(",{:.2}", stats.avg_resource(key)));
    }
    output.push('\n');

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use daybreak::sim::Strategy;

    fn result(days: i64, defeated: bool) -> SessionResult {
        SessionResult {
            seed: 1,
            strategy: Strategy::Greedy,
            days,
            defeated,
            stalled: false,
            resources: [days, 0, 3, 1, 2],
            buildings: 2,
            enemies_alive: 1,
            enemies_killed: 4,
            commands: Vec::new(),
        }
    }

    #[test]
    fn test_stats_merge_matches_sequential() {
        let mut all = SimulationStats::default();
        let mut left = SimulationStats::default();
        let mut right = SimulationStats::default();
        for (i, r) in [result(4, true), result(10, false), result(6, false)]
            .iter()
            .enumerate()
        {
            all.add_result(r);
            if i == 0 {
                left.add_result(r);
            } else {
                right.add_result(r);
            }
        }
        left.merge(&right);
        assert_eq!(left.sessions, all.sessions);
        assert_eq!(left.defeats, 1);
        assert!((left.avg_days() - all.avg_days()).abs() < 1e-9);
        assert!((left.avg_days() - 20.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_empty_stats() {
        let stats = SimulationStats::default();
        assert!(stats.avg_days().abs() < f64::EPSILON);
        assert!(stats.days_std_dev().abs() < f64::EPSILON);
    }

    #[test]
    fn test_csv_has_header_and_row() {
        let mut stats = SimulationStats::default();
        stats.add_result(&result(5, false));
        let csv = format_simulation_csv(&stats);
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].ends_with("avg_troops"));
        assert!(lines[1].starts_with("1,0,0,0,5.00"));
    }

    #[test]
    fn test_json_result_names_resources() {
        let json = serde_json::to_string(&JsonSessionResult::from_result(&result(3, true))).unwrap();
        assert!(json.contains("\"wood\":3"));
        assert!(json.contains("\"strategy\":\"greedy\""));
    }
}
