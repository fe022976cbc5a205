//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Host-supplied timestamps only, no wall clock
//! - Seeded RNG only
//! - Stable iteration order (by entity ID)
//! - No rendering or platform dependencies

pub mod bounds;
pub mod collision;
pub mod integrate;
pub mod player;
pub mod spawn;
pub mod state;
pub mod store;
pub mod tick;

pub use collision::spheres_overlap;
pub use player::HitOutcome;
pub use state::{
    Effect, Entity, EntityId, EntityKind, EntityTransform, GameStats, Player, PlayerControl,
    PlayerState, Role, Snapshot, SpawnClock,
};
pub use store::EntityStore;
pub use tick::Simulation;
