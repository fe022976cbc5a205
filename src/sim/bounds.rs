//! Play-volume boundaries
//!
//! The player and asteroids wrap to the opposite face; bullets are culled
//! once they leave the cube (or run out of life) and never wrap.

use glam::Vec3;

use super::state::{Effect, EntityKind, Role};
use super::store::EntityStore;
use crate::tuning::Tuning;

/// Teleport a single coordinate to the opposite face when it passes `limit`
#[inline]
pub fn wrap_axis(value: f32, limit: f32) -> f32 {
    if value > limit {
        -limit
    } else if value < -limit {
        limit
    } else {
        value
    }
}

/// Wrap all three axes
#[inline]
pub fn wrap_position(pos: Vec3, limit: f32) -> Vec3 {
    Vec3::new(
        wrap_axis(pos.x, limit),
        wrap_axis(pos.y, limit),
        wrap_axis(pos.z, limit),
    )
}

/// True when a point is farther than `limit` from the center on any axis
#[inline]
pub fn is_outside(pos: Vec3, limit: f32) -> bool {
    pos.abs().max_element() > limit
}

/// Wrap every asteroid back into the play volume
pub fn wrap_asteroids(store: &mut EntityStore, tuning: &Tuning) {
    let limit = tuning.wrap_limit();
    for asteroid in store.slice_mut(EntityKind::Asteroid) {
        asteroid.pos = wrap_position(asteroid.pos, limit);
    }
}

/// Age bullets by one tick and remove those that expired or left the volume
pub fn cull_bullets(store: &mut EntityStore, tuning: &Tuning, effects: &mut Vec<Effect>) {
    let limit = tuning.cull_limit();
    for idx in (0..store.count(EntityKind::Bullet)).rev() {
        let bullet = &mut store.slice_mut(EntityKind::Bullet)[idx];
        let expired = match &mut bullet.role {
            Role::Bullet { remaining_life } => {
                *remaining_life = remaining_life.saturating_sub(1);
                *remaining_life == 0
            }
            Role::Asteroid { .. } => false,
        };
        if expired || is_outside(bullet.pos, limit) {
            if let Some(removed) = store.remove_at(EntityKind::Bullet, idx) {
                log::trace!("Bullet {} culled (expired: {})", removed.id, expired);
                effects.push(removed.destroyed_effect());
            }
        }
    }
}
