//! Data-driven game balance
//!
//! Every gameplay constant the simulation reads lives in [`Tuning`]. Hosts can
//! ship a partial JSON file; missing fields fall back to [`crate::consts`].

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;

/// How thrust input turns into player velocity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccelerationModel {
    /// Thrust accumulates into velocity, which is damped and clamped each tick
    #[default]
    Accumulate,
    /// Velocity is set straight from the thrust axis (no inertia)
    Instant,
}

/// Whether the heading changes before or after the thrust direction is taken
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RotationOrder {
    #[default]
    BeforeThrust,
    AfterThrust,
}

/// Rejected tuning input
#[derive(Debug, Error)]
pub enum TuningError {
    #[error("failed to parse tuning JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid tuning value for `{field}`: {reason}")]
    Invalid {
        field: &'static str,
        reason: &'static str,
    },
}

/// Gameplay balance, all distances in world units and speeds per tick
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Play volume ===
    pub half_extent: f32,
    pub wrap_buffer: f32,
    pub cull_margin: f32,

    // === Player ===
    pub player_radius: f32,
    pub player_acceleration: f32,
    pub player_damping: f32,
    pub player_max_speed: f32,
    pub player_rotation_speed: f32,
    pub acceleration_model: AccelerationModel,
    pub rotation_order: RotationOrder,
    pub starting_lives: u8,
    /// Respawn protection window (ms)
    pub respawn_invincibility_ms: f64,
    /// Allow shooting while respawn protection is active
    pub fire_while_invincible: bool,

    // === Bullets ===
    pub bullet_speed: f32,
    pub bullet_radius: f32,
    /// Ticks before a bullet expires
    pub bullet_lifetime: u32,

    // === Asteroids ===
    pub max_asteroids: usize,
    pub spawn_interval_ms: f64,
    pub asteroid_min_speed: f32,
    pub asteroid_max_speed: f32,
    pub asteroid_min_radius: f32,
    pub asteroid_max_radius: f32,
    pub asteroid_max_rotation: f32,
    pub spawn_target_spread: f32,
    pub min_spawn_distance: f32,
    pub max_spawn_attempts: u32,
    pub asteroid_reward: u64,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            half_extent: HALF_EXTENT,
            wrap_buffer: WRAP_BUFFER,
            cull_margin: CULL_MARGIN,

            player_radius: PLAYER_RADIUS,
            player_acceleration: PLAYER_ACCELERATION,
            player_damping: PLAYER_DAMPING,
            player_max_speed: PLAYER_MAX_SPEED,
            player_rotation_speed: PLAYER_ROTATION_SPEED,
            acceleration_model: AccelerationModel::default(),
            rotation_order: RotationOrder::default(),
            starting_lives: STARTING_LIVES,
            respawn_invincibility_ms: RESPAWN_INVINCIBILITY_MS,
            fire_while_invincible: false,

            bullet_speed: BULLET_SPEED,
            bullet_radius: BULLET_RADIUS,
            bullet_lifetime: BULLET_LIFETIME,

            max_asteroids: MAX_ASTEROIDS,
            spawn_interval_ms: SPAWN_INTERVAL_MS,
            asteroid_min_speed: ASTEROID_MIN_SPEED,
            asteroid_max_speed: ASTEROID_MAX_SPEED,
            asteroid_min_radius: ASTEROID_MIN_RADIUS,
            asteroid_max_radius: ASTEROID_MAX_RADIUS,
            asteroid_max_rotation: ASTEROID_MAX_ROTATION,
            spawn_target_spread: SPAWN_TARGET_SPREAD,
            min_spawn_distance: MIN_SPAWN_DISTANCE,
            max_spawn_attempts: MAX_SPAWN_ATTEMPTS,
            asteroid_reward: ASTEROID_REWARD,
        }
    }
}

impl Tuning {
    /// Parse a (possibly partial) JSON tuning document and validate it
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Coordinate beyond which the player and asteroids wrap
    #[inline]
    pub fn wrap_limit(&self) -> f32 {
        self.half_extent + self.wrap_buffer
    }

    /// Chebyshev distance beyond which bullets are culled
    #[inline]
    pub fn cull_limit(&self) -> f32 {
        self.half_extent + self.cull_margin
    }

    /// Check every value the simulation relies on
    pub fn validate(&self) -> Result<(), TuningError> {
        fn invalid(field: &'static str, reason: &'static str) -> Result<(), TuningError> {
            Err(TuningError::Invalid { field, reason })
        }

        if !(self.half_extent > 0.0) {
            return invalid("half_extent", "must be positive");
        }
        if !(self.wrap_buffer >= 0.0) {
            return invalid("wrap_buffer", "must be non-negative");
        }
        // Bullets must be culled before they could ever wrap
        if !(self.cull_margin > self.wrap_buffer) {
            return invalid("cull_margin", "must be larger than wrap_buffer");
        }
        if !(self.player_damping > 0.0 && self.player_damping < 1.0) {
            return invalid("player_damping", "must lie strictly between 0 and 1");
        }
        if !(self.player_max_speed >= 0.0) {
            return invalid("player_max_speed", "must be non-negative");
        }
        if !(self.player_radius >= 0.0) {
            return invalid("player_radius", "must be non-negative");
        }
        if self.starting_lives == 0 {
            return invalid("starting_lives", "must be at least 1");
        }
        if !(self.respawn_invincibility_ms >= 0.0) {
            return invalid("respawn_invincibility_ms", "must be non-negative");
        }
        if !(self.bullet_radius >= 0.0) {
            return invalid("bullet_radius", "must be non-negative");
        }
        if self.max_asteroids == 0 {
            return invalid("max_asteroids", "must be at least 1");
        }
        if !(self.spawn_interval_ms >= 0.0) {
            return invalid("spawn_interval_ms", "must be non-negative");
        }
        if !(self.asteroid_min_speed >= 0.0 && self.asteroid_min_speed <= self.asteroid_max_speed)
        {
            return invalid("asteroid_min_speed", "must be in [0, asteroid_max_speed]");
        }
        if !(self.asteroid_min_radius >= 0.0
            && self.asteroid_min_radius <= self.asteroid_max_radius)
        {
            return invalid("asteroid_min_radius", "must be in [0, asteroid_max_radius]");
        }
        if !(self.asteroid_max_rotation >= 0.0) {
            return invalid("asteroid_max_rotation", "must be non-negative");
        }
        if !(self.spawn_target_spread >= 0.0) {
            return invalid("spawn_target_spread", "must be non-negative");
        }
        if self.max_spawn_attempts == 0 {
            return invalid("max_spawn_attempts", "must be at least 1");
        }
        Ok(())
    }
}
