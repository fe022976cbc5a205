//! Rendering collaborator interface
//!
//! The simulation never talks to the 3D engine. Hosts implement
//! [`RenderingPort`] and feed it the effects returned by each tick; meshes are
//! matched to entities by id on the host side.

use glam::Vec3;

use crate::sim::{Effect, EntityId, EntityKind};

pub trait RenderingPort {
    /// Create a renderable for a new bullet or asteroid
    fn entity_spawned(&mut self, id: EntityId, kind: EntityKind, position: Vec3, extents: Vec3);

    /// Dispose the renderable for `id`
    fn entity_destroyed(&mut self, id: EntityId, kind: EntityKind);

    fn score_changed(&mut self, score: u64);

    fn player_hit(&mut self, lives_remaining: u8);

    /// Ship is back at the spawn point; start the invincibility cue
    fn player_respawned(&mut self) {}

    /// Stop the invincibility cue
    fn invincibility_ended(&mut self) {}

    fn game_over(&mut self);
}

/// Route a batch of effects to the port, in order
pub fn dispatch<P: RenderingPort + ?Sized>(effects: &[Effect], port: &mut P) {
    for effect in effects {
        match *effect {
            Effect::ScoreChanged { score } => port.score_changed(score),
            Effect::EntityDestroyed { id, kind } => port.entity_destroyed(id, kind),
            Effect::EntitySpawned {
                id,
                kind,
                position,
                extents,
            } => port.entity_spawned(id, kind, position, extents),
            Effect::PlayerHit { lives_remaining } => port.player_hit(lives_remaining),
            Effect::PlayerRespawned => port.player_respawned(),
            Effect::InvincibilityEnded => port.invincibility_ended(),
            Effect::GameOver => port.game_over(),
        }
    }
}
