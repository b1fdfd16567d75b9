//! Enemy attack rolls.
//!
//! Each elapsed day every live enemy rolls once against its hit chance.
//! Enemies spawned since the previous roll skip their first one.

use rand::Rng;

use crate::game::EnemyType;

/// Outcome of one enemy's daily attack.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttackRoll {
    /// Rolled and missed.
    Miss,
    /// Rolled and hit.
    Hit {
        /// Health to remove.
        damage: i64,
    },
}

impl AttackRoll {
    /// Health lost to this roll.
    #[must_use]
    pub const fn damage(self) -> i64 {
        match self {
            AttackRoll::Hit { damage } => damage,
            AttackRoll::Miss => 0,
        }
    }
}

/// Roll one attack: a hit when a uniform draw in `[0, 100)` is below the
/// enemy's hit chance. Negative damage is treated as zero.
pub fn roll_attack<R: Rng>(enemy: &EnemyType, rng: &mut R) -> AttackRoll {
    let roll = rng.random::<f64>() * 100.0;
    if roll < enemy.hit_chance {
        AttackRoll::Hit {
            damage: enemy.hit_damage.max(0),
        }
    } else {
        AttackRoll::Miss
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn enemy(hit_chance: f64, hit_damage: i64) -> EnemyType {
        EnemyType {
            hit_chance,
            hit_damage,
            ..EnemyType::default()
        }
    }

    #[test]
    fn test_certain_hit_and_certain_miss() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        for _ in 0..100 {
            assert_eq!(roll_attack(&enemy(100.0, 2), &mut rng), AttackRoll::Hit { damage: 2 });
            assert_eq!(roll_attack(&enemy(0.0, 2), &mut rng), AttackRoll::Miss);
        }
    }

    #[test]
    fn test_negative_damage_clamped() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        assert_eq!(roll_attack(&enemy(100.0, -5), &mut rng).damage(), 0);
    }

    #[test]
    fn test_hit_rate_tracks_chance() {
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        let zombie = enemy(50.0, 1);
        let hits = (0..10_000)
            .filter(|_| matches!(roll_attack(&zombie, &mut rng), AttackRoll::Hit { .. }))
            .count();
        assert!((4_500..5_500).contains(&hits), "hits = {hits}");
    }
}
