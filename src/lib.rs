//! Astro Drift - simulation core for a browser-based 3D asteroids shooter
//!
//! Core modules:
//! - `sim`: Deterministic simulation (entities, physics, collisions, player lifecycle)
//! - `tuning`: Data-driven game balance
//! - `port`: Typed rendering collaborator interface
//! - `wasm`: JavaScript bindings for the browser host (wasm32 only)

pub mod port;
pub mod sim;
pub mod tuning;
#[cfg(target_arch = "wasm32")]
pub mod wasm;

pub use port::{RenderingPort, dispatch};
pub use sim::{Effect, EntityKind, Simulation};
pub use tuning::{AccelerationModel, RotationOrder, Tuning, TuningError};

use glam::Vec3;

/// Default gameplay constants (overridable through [`Tuning`])
pub mod consts {
    /// Half the edge length of the play cube
    pub const HALF_EXTENT: f32 = 30.0;
    /// Extra distance past the cube face before wrapping (hides popping)
    pub const WRAP_BUFFER: f32 = 0.5;
    /// Extra distance past the cube face before bullets are culled
    pub const CULL_MARGIN: f32 = 5.0;

    /// Player ship
    pub const PLAYER_RADIUS: f32 = 1.0;
    pub const PLAYER_ACCELERATION: f32 = 0.01;
    pub const PLAYER_DAMPING: f32 = 0.98;
    pub const PLAYER_MAX_SPEED: f32 = 0.5;
    /// Radians per tick at full stick deflection
    pub const PLAYER_ROTATION_SPEED: f32 = 0.05;
    pub const STARTING_LIVES: u8 = 3;
    /// Respawn protection window (ms)
    pub const RESPAWN_INVINCIBILITY_MS: f64 = 3000.0;

    /// Bullets
    pub const BULLET_SPEED: f32 = 1.0;
    pub const BULLET_RADIUS: f32 = 0.2;
    /// Lifetime in ticks
    pub const BULLET_LIFETIME: u32 = 100;

    /// Asteroids
    pub const MAX_ASTEROIDS: usize = 20;
    pub const SPAWN_INTERVAL_MS: f64 = 2000.0;
    pub const ASTEROID_MIN_SPEED: f32 = 0.02;
    pub const ASTEROID_MAX_SPEED: f32 = 0.06;
    pub const ASTEROID_MIN_RADIUS: f32 = 1.0;
    pub const ASTEROID_MAX_RADIUS: f32 = 3.0;
    /// Max tumble rate (radians per tick)
    pub const ASTEROID_MAX_ROTATION: f32 = 0.02;
    /// Asteroids aim at a random point within this distance of the center
    pub const SPAWN_TARGET_SPREAD: f32 = 5.0;
    /// Asteroids never spawn closer than this to the player
    pub const MIN_SPAWN_DISTANCE: f32 = 10.0;
    pub const MAX_SPAWN_ATTEMPTS: u32 = 10;
    pub const ASTEROID_REWARD: u64 = 100;
}

/// Normalized angle to [-π, π)
#[inline]
pub fn normalize_angle(mut angle: f32) -> f32 {
    use std::f32::consts::PI;
    while angle >= PI {
        angle -= 2.0 * PI;
    }
    while angle < -PI {
        angle += 2.0 * PI;
    }
    angle
}

/// Forward direction for a yaw heading (rotation about +Y, +Z forward)
#[inline]
pub fn heading_to_forward(heading: f32) -> Vec3 {
    Vec3::new(heading.sin(), 0.0, heading.cos())
}
