//! Enemy roster.
//!
//! A wave is a dense, ordered list of enemies. Destroyed enemies are removed
//! immediately and later entries shift down, so indices stay contiguous and
//! the relative order of survivors never changes.

use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{
    collision::{Ray, Sphere},
    math::Vec3,
};

/// Drift pattern selected by an enemy's behavior code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Behavior {
    /// Code 0: drifts along the camera's offset from the world origin.
    Follow,
    /// Code 1: holds position.
    Idle,
    /// Code 2: drifts opposite to the camera's offset from the world origin.
    Mirror,
}

impl Behavior {
    pub const COUNT: i32 = 3;

    /// Maps a behavior code; codes outside `0..3` fall back to `Idle`.
    pub fn from_code(code: i32) -> Self {
        match code {
            0 => Behavior::Follow,
            2 => Behavior::Mirror,
            _ => Behavior::Idle,
        }
    }

    pub fn code(self) -> i32 {
        match self {
            Behavior::Follow => 0,
            Behavior::Idle => 1,
            Behavior::Mirror => 2,
        }
    }

    /// Signed multiplier applied to the per-frame drift step.
    pub fn drift_sign(self) -> f32 {
        (self.code() - 1) as f32
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Enemy {
    pub position: Vec3,
    pub behavior: Behavior,
    pub hp: i32,
}

impl Enemy {
    pub fn new(position: Vec3, behavior: Behavior, hp: i32) -> Self {
        Self {
            position,
            behavior,
            hp,
        }
    }

    /// Random enemy with integer coordinates in `[0, extent)` on each axis.
    pub fn spawn<R: Rng>(rng: &mut R, extent: i32, hp: i32) -> Self {
        let extent = extent.max(1);
        let mut coord = || rng.gen_range(0..extent) as f32;
        let position = Vec3::new(coord(), coord(), coord());
        let behavior = Behavior::from_code(rng.gen_range(0..Behavior::COUNT));
        Self::new(position, behavior, hp)
    }

    pub fn is_destroyed(&self) -> bool {
        self.hp <= 0
    }

    /// One frame of drift relative to the camera position.
    pub fn drift(&mut self, camera_position: Vec3, divisor: f32) {
        if divisor == 0.0 {
            return;
        }
        let step = -camera_position * (1.0 / divisor);
        self.position += step * self.behavior.drift_sign();
    }

    /// Collision sphere centered on the enemy.
    pub fn hitbox(&self, radius: f32) -> Sphere {
        Sphere::new(self.position, radius)
    }
}

/// Result of resolving one shot against the roster.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ShotOutcome {
    /// Enemies struck (including the ones destroyed).
    pub hits: usize,
    /// Enemies removed from the roster by this shot, in roster order.
    pub destroyed: Vec<Enemy>,
}

/// Ordered list of live enemies.
#[derive(Debug, Clone, Default)]
pub struct Roster {
    enemies: Vec<Enemy>,
}

impl Roster {
    pub fn new(enemies: Vec<Enemy>) -> Self {
        Self { enemies }
    }

    /// Spawns a fresh wave of `count` random enemies, replacing the current one.
    pub fn spawn_wave<R: Rng>(&mut self, rng: &mut R, count: usize, extent: i32, hp: i32) {
        self.enemies = (0..count).map(|_| Enemy::spawn(rng, extent, hp)).collect();
        debug!(count, "spawned wave");
    }

    pub fn len(&self) -> usize {
        self.enemies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.enemies.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Enemy> {
        self.enemies.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut Enemy> {
        self.enemies.get_mut(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Enemy> {
        self.enemies.iter()
    }

    /// Removes the enemy at `index`, shifting later entries down by one.
    pub fn remove(&mut self, index: usize) -> Option<Enemy> {
        (index < self.enemies.len()).then(|| self.enemies.remove(index))
    }

    /// Drifts every enemy by its behavior.
    pub fn drift_all(&mut self, camera_position: Vec3, divisor: f32) {
        for enemy in &mut self.enemies {
            enemy.drift(camera_position, divisor);
        }
    }

    /// Tests `ray` against every enemy's hitbox; each hit costs `damage` HP and
    /// enemies at or below zero are removed.
    ///
    /// Hits behind the ray origin count too.
    pub fn resolve_shot(&mut self, ray: &Ray, radius: f32, damage: i32) -> ShotOutcome {
        let mut outcome = ShotOutcome::default();
        let mut i = 0;
        while i < self.enemies.len() {
            let enemy = &mut self.enemies[i];
            if ray.intersect(&enemy.hitbox(radius)).is_none() {
                i += 1;
                continue;
            }

            enemy.hp -= damage;
            outcome.hits += 1;
            if enemy.is_destroyed() {
                // The next enemy slides into slot `i`; do not advance.
                outcome.destroyed.push(self.enemies.remove(i));
            } else {
                i += 1;
            }
        }
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use rand::{rngs::StdRng, SeedableRng};

    fn forward_ray() -> Ray {
        Ray::new(Vec3::new(0.0, 0.0, 5.0), Vec3::new(0.0, 0.0, -1.0))
    }

    fn line_up(hps: &[i32]) -> Roster {
        Roster::new(
            hps.iter()
                .enumerate()
                .map(|(i, hp)| Enemy::new(Vec3::new(0.0, 0.0, -(i as f32) * 3.0), Behavior::Idle, *hp))
                .collect(),
        )
    }

    #[test]
    fn spawn_respects_extent() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut roster = Roster::default();
        roster.spawn_wave(&mut rng, 10, 10, 100);
        assert_eq!(roster.len(), 10);
        for e in roster.iter() {
            for c in [e.position.x, e.position.y, e.position.z] {
                assert!((0.0..10.0).contains(&c));
                assert_eq!(c.fract(), 0.0);
            }
            assert_eq!(e.hp, 100);
        }
    }

    #[test]
    fn behavior_codes_roundtrip() {
        for code in 0..Behavior::COUNT {
            assert_eq!(Behavior::from_code(code).code(), code);
        }
        assert_eq!(Behavior::from_code(9), Behavior::Idle);
    }

    #[test]
    fn drift_by_behavior() {
        let cam = Vec3::new(0.0, 0.0, 500.0);
        let mut follow = Enemy::new(Vec3::ZERO, Behavior::Follow, 100);
        let mut idle = Enemy::new(Vec3::ZERO, Behavior::Idle, 100);
        let mut mirror = Enemy::new(Vec3::ZERO, Behavior::Mirror, 100);
        follow.drift(cam, 500.0);
        idle.drift(cam, 500.0);
        mirror.drift(cam, 500.0);
        assert_abs_diff_eq!(follow.position.z, 1.0);
        assert_eq!(idle.position, Vec3::ZERO);
        assert_abs_diff_eq!(mirror.position.z, -1.0);
    }

    #[test]
    fn shot_damages_everything_on_the_line() {
        let mut roster = line_up(&[100, 100, 100]);
        let outcome = roster.resolve_shot(&forward_ray(), 1.0, 5);
        assert_eq!(outcome.hits, 3);
        assert!(outcome.destroyed.is_empty());
        assert!(roster.iter().all(|e| e.hp == 95));
    }

    #[test]
    fn destroyed_enemy_is_compacted_out() {
        let mut roster = line_up(&[100, 5, 100, 100]);
        roster.get_mut(2).unwrap().position.x = 50.0;
        let before: Vec<Vec3> = roster.iter().map(|e| e.position).collect();

        let outcome = roster.resolve_shot(&forward_ray(), 1.0, 5);

        assert_eq!(outcome.destroyed.len(), 1);
        assert_eq!(roster.len(), 3);
        let after: Vec<Vec3> = roster.iter().map(|e| e.position).collect();
        assert_eq!(after, vec![before[0], before[2], before[3]]);
        // The entry that slid into the freed slot was still tested.
        assert_eq!(roster.get(1).unwrap().hp, 100);
        assert_eq!(roster.get(2).unwrap().hp, 95);
    }

    #[test]
    fn adjacent_kills_are_not_skipped() {
        let mut roster = line_up(&[5, 5, 5]);
        let outcome = roster.resolve_shot(&forward_ray(), 1.0, 5);
        assert_eq!(outcome.destroyed.len(), 3);
        assert!(roster.is_empty());
    }

    #[test]
    fn remove_out_of_range_is_none() {
        let mut roster = line_up(&[1]);
        assert!(roster.remove(3).is_none());
        assert!(roster.remove(0).is_some());
        assert!(roster.is_empty());
    }
}
