//! Core simulation types
//!
//! Entities, the player, session stats and the effects a tick reports back to
//! the host. Nothing here knows about meshes; renderables are matched by id.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::heading_to_forward;

/// Stable identifier for a bullet or asteroid
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(pub u32);

impl std::fmt::Display for EntityId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Entity class, used to select collections and bounds policies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    Bullet,
    Asteroid,
}

/// Kind-specific entity data
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Role {
    /// Expires when `remaining_life` reaches zero
    Bullet { remaining_life: u32 },
    /// Tumbles by `rotation_speed` radians per tick
    Asteroid { rotation_speed: f32 },
}

/// A bullet or asteroid
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    pub id: EntityId,
    pub pos: Vec3,
    pub vel: Vec3,
    pub radius: f32,
    /// Accumulated Euler rotation (asteroids only change it)
    pub orientation: Vec3,
    pub role: Role,
}

impl Entity {
    pub fn bullet(id: EntityId, pos: Vec3, vel: Vec3, radius: f32, lifetime: u32) -> Self {
        Self {
            id,
            pos,
            vel,
            radius: radius.max(0.0),
            orientation: Vec3::ZERO,
            role: Role::Bullet {
                remaining_life: lifetime,
            },
        }
    }

    pub fn asteroid(id: EntityId, pos: Vec3, vel: Vec3, radius: f32, rotation_speed: f32) -> Self {
        Self {
            id,
            pos,
            vel,
            radius: radius.max(0.0),
            orientation: Vec3::ZERO,
            role: Role::Asteroid { rotation_speed },
        }
    }

    #[inline]
    pub fn kind(&self) -> EntityKind {
        match self.role {
            Role::Bullet { .. } => EntityKind::Bullet,
            Role::Asteroid { .. } => EntityKind::Asteroid,
        }
    }

    /// Remaining ticks for bullets, `None` for asteroids
    pub fn remaining_life(&self) -> Option<u32> {
        match self.role {
            Role::Bullet { remaining_life } => Some(remaining_life),
            Role::Asteroid { .. } => None,
        }
    }

    /// Half-extents of the bounding box reported to the renderer
    #[inline]
    pub fn extents(&self) -> Vec3 {
        Vec3::splat(self.radius)
    }

    /// Effect announcing this entity to the host
    pub fn spawned_effect(&self) -> Effect {
        Effect::EntitySpawned {
            id: self.id,
            kind: self.kind(),
            position: self.pos,
            extents: self.extents(),
        }
    }

    /// Effect telling the host to dispose this entity's renderable
    pub fn destroyed_effect(&self) -> Effect {
        Effect::EntityDestroyed {
            id: self.id,
            kind: self.kind(),
        }
    }
}

/// Player lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PlayerState {
    /// Collidable and controllable
    Alive,
    /// Controllable, immune to collisions until the deadline (host ms)
    Invincible { until: f64 },
    /// Terminal for the session
    Dead,
}

/// Normalized control input from the host
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PlayerControl {
    /// -1..1, scaled by the rotation speed into heading change per tick
    pub rotation_delta: f32,
    /// -1..1, forward/backward thrust
    pub thrust_axis: f32,
}

/// The player's ship
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub pos: Vec3,
    pub vel: Vec3,
    /// Yaw in radians, normalized to [-π, π)
    pub heading: f32,
    pub radius: f32,
    pub state: PlayerState,
    pub control: PlayerControl,
}

impl Player {
    pub fn new(radius: f32) -> Self {
        Self {
            pos: Vec3::ZERO,
            vel: Vec3::ZERO,
            heading: 0.0,
            radius,
            state: PlayerState::Alive,
            control: PlayerControl::default(),
        }
    }

    /// Put the ship back at the spawn point, motionless
    pub fn reset_to_spawn(&mut self) {
        self.pos = Vec3::ZERO;
        self.vel = Vec3::ZERO;
        self.heading = 0.0;
        self.control = PlayerControl::default();
    }

    #[inline]
    pub fn forward(&self) -> Vec3 {
        heading_to_forward(self.heading)
    }

    #[inline]
    pub fn is_alive(&self) -> bool {
        matches!(self.state, PlayerState::Alive)
    }

    #[inline]
    pub fn is_dead(&self) -> bool {
        matches!(self.state, PlayerState::Dead)
    }

    /// Collisions against the player are only checked while Alive
    #[inline]
    pub fn is_collidable(&self) -> bool {
        self.is_alive()
    }

    pub fn invincible_until(&self) -> Option<f64> {
        match self.state {
            PlayerState::Invincible { until } => Some(until),
            _ => None,
        }
    }
}

/// Session counters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameStats {
    pub score: u64,
    pub lives: u8,
    /// Monotonic: never cleared within a session
    pub is_game_over: bool,
}

impl GameStats {
    pub fn new(lives: u8) -> Self {
        Self {
            score: 0,
            lives,
            is_game_over: false,
        }
    }
}

/// Gate for periodic asteroid spawning
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SpawnClock {
    /// Host time of the last spawn, `None` until the first one
    pub last_spawn: Option<f64>,
    /// Set by game-over teardown; a frozen clock never fires
    pub frozen: bool,
}

impl SpawnClock {
    /// Whether enough time has passed since the last spawn
    pub fn is_due(&self, now: f64, interval: f64) -> bool {
        if self.frozen {
            return false;
        }
        match self.last_spawn {
            Some(last) => now - last >= interval,
            None => true,
        }
    }
}

/// State changes reported to the host after a tick or command
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Effect {
    ScoreChanged {
        score: u64,
    },
    EntityDestroyed {
        id: EntityId,
        kind: EntityKind,
    },
    EntitySpawned {
        id: EntityId,
        kind: EntityKind,
        position: Vec3,
        extents: Vec3,
    },
    PlayerHit {
        lives_remaining: u8,
    },
    /// Player was reset to the spawn point and is now invincible
    PlayerRespawned,
    /// Invincibility window elapsed; the player is collidable again
    InvincibilityEnded,
    GameOver,
}

/// Position and rotation of one entity, for renderer sync
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EntityTransform {
    pub id: EntityId,
    pub kind: EntityKind,
    pub position: Vec3,
    pub orientation: Vec3,
}

impl From<&Entity> for EntityTransform {
    fn from(entity: &Entity) -> Self {
        Self {
            id: entity.id,
            kind: entity.kind(),
            position: entity.pos,
            orientation: entity.orientation,
        }
    }
}

/// Read-only view of the whole session for the rendering/GUI collaborator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub stats: GameStats,
    pub player_position: Vec3,
    pub player_heading: f32,
    pub player_state: PlayerState,
    pub entities: Vec<EntityTransform>,
}
