//! Configuration system.
//!
//! Loads game tuning from JSON strings (file IO left to the app). Every
//! section and field has a default, so a partial document is valid.

use serde::{Deserialize, Serialize};

use crate::{
    camera::{Camera, DEFAULT_TARGET_OFFSET},
    math::{Mat4, Vec3},
};

/// Root configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Frame rate of the driver loop.
    pub tick_hz: u32,
    /// Seed for wave spawning; random when absent.
    pub seed: Option<u64>,
    pub camera: CameraConfig,
    pub projection: ProjectionConfig,
    pub flight: FlightConfig,
    pub combat: CombatConfig,
    pub shop: ShopConfig,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            tick_hz: 60,
            seed: None,
            camera: CameraConfig::default(),
            projection: ProjectionConfig::default(),
            flight: FlightConfig::default(),
            combat: CombatConfig::default(),
            shop: ShopConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Start position, also restored after every cleared wave.
    pub start_position: Vec3,
    /// Local-space look direction before rotation.
    pub target_offset: Vec3,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            start_position: Vec3::new(0.0, 0.0, 2.0),
            target_offset: DEFAULT_TARGET_OFFSET,
        }
    }
}

impl CameraConfig {
    pub fn build(&self) -> Camera {
        Camera::new(self.start_position, self.target_offset)
    }
}

/// Fixed projection parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectionConfig {
    pub fov_y_deg: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for ProjectionConfig {
    fn default() -> Self {
        Self {
            fov_y_deg: 67.0,
            aspect: 16.0 / 9.0,
            near: 0.1,
            far: 300.0,
        }
    }
}

impl ProjectionConfig {
    pub fn matrix(&self) -> Mat4 {
        Mat4::perspective(self.fov_y_deg, self.aspect, self.near, self.far)
    }
}

/// Key-driven speed accumulation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FlightConfig {
    /// Forward speed added per frame while W/S is held.
    pub thrust_step: f32,
    /// Strafe speed added per frame while A/D is held.
    pub strafe_step: f32,
    /// Rise/sink speed for Q/E, units per second.
    pub vertical_speed: f32,
    /// Multiplier on all of the above while the boost runs.
    pub boost_multiplier: f32,
    pub boost_duration_secs: f64,
    pub brake_step: f32,
    /// Speeds within this band stop outright when braking.
    pub brake_threshold: f32,
}

impl Default for FlightConfig {
    fn default() -> Self {
        Self {
            thrust_step: 0.1,
            strafe_step: 0.07,
            vertical_speed: 1.0,
            boost_multiplier: 3.0,
            boost_duration_secs: 5.0,
            brake_step: 0.2,
            brake_threshold: 1.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CombatConfig {
    pub wave_size: usize,
    pub enemy_hp: i32,
    /// Enemies spawn on integer coordinates in `[0, spawn_extent)`.
    pub spawn_extent: i32,
    pub hitbox_radius: f32,
    /// HP removed per frame the fire key hits an enemy.
    pub damage: i32,
    /// Money awarded per destroyed enemy.
    pub reward: u32,
    /// Drift step is `camera_position / drift_divisor` per frame.
    pub drift_divisor: f32,
}

impl Default for CombatConfig {
    fn default() -> Self {
        Self {
            wave_size: 10,
            enemy_hp: 100,
            spawn_extent: 10,
            hitbox_radius: 1.0,
            damage: 5,
            reward: 5,
            drift_divisor: 500.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ShopConfig {
    pub boost_price: u32,
}

impl Default for ShopConfig {
    fn default() -> Self {
        Self { boost_price: 30 }
    }
}

impl GameConfig {
    /// Parses config from JSON.
    pub fn from_json_str(s: &str) -> serde_json::Result<Self> {
        serde_json::from_str(s)
    }

    /// Rejects values the simulation cannot run with.
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.tick_hz == 0 {
            anyhow::bail!("tick_hz must be positive");
        }
        if self.combat.hitbox_radius <= 0.0 {
            anyhow::bail!("combat.hitbox_radius must be positive");
        }
        if self.combat.wave_size == 0 {
            anyhow::bail!("combat.wave_size must be positive");
        }
        if self.combat.spawn_extent <= 0 {
            anyhow::bail!("combat.spawn_extent must be positive");
        }
        let p = &self.projection;
        if p.near <= 0.0 || p.far <= p.near {
            anyhow::bail!("projection needs 0 < near < far (got {} / {})", p.near, p.far);
        }
        if self.camera.target_offset.try_normalize().is_none() {
            anyhow::bail!("camera.target_offset must be non-zero");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_uses_defaults() {
        let cfg = GameConfig::from_json_str("{}").unwrap();
        assert_eq!(cfg.combat.wave_size, 10);
        assert_eq!(cfg.shop.boost_price, 30);
        assert_eq!(cfg.camera.start_position, Vec3::new(0.0, 0.0, 2.0));
        assert_eq!(cfg.seed, None);
        assert_eq!(cfg.tick_hz, 60);
        cfg.validate().unwrap();
    }

    #[test]
    fn partial_sections_merge_with_defaults() {
        let cfg = GameConfig::from_json_str(
            r#"{ "tick_hz": 30, "seed": 4, "combat": { "damage": 50 } }"#,
        )
        .unwrap();
        assert_eq!(cfg.tick_hz, 30);
        assert_eq!(cfg.seed, Some(4));
        assert_eq!(cfg.combat.damage, 50);
        assert_eq!(cfg.combat.reward, 5);
        cfg.validate().unwrap();
    }

    #[test]
    fn validate_rejects_bad_projection() {
        let mut cfg = GameConfig::from_json_str(r#"{ "tick_hz": 60 }"#).unwrap();
        cfg.projection.far = 0.05;
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn validate_rejects_empty_wave() {
        let cfg = GameConfig::from_json_str(r#"{ "combat": { "wave_size": 0 } }"#).unwrap();
        let err = cfg.validate().unwrap_err();
        assert!(err.to_string().contains("wave_size"));
    }
}
