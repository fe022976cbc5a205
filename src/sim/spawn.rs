//! Periodic asteroid spawning
//!
//! Asteroids appear on a random face of the play cube and drift loosely
//! toward the center. The spawn clock gates the rate; the store count caps
//! the population.

use glam::Vec3;
use rand::Rng;

use super::state::{Effect, Entity, EntityKind, GameStats, SpawnClock};
use super::store::EntityStore;
use crate::tuning::Tuning;

/// Pick a point on a random face of the cube `[-h, h]^3`
pub fn random_face_point<R: Rng>(rng: &mut R, half_extent: f32) -> Vec3 {
    let axis = rng.random_range(0..3usize);
    let side = if rng.random_bool(0.5) { half_extent } else { -half_extent };
    let mut p = Vec3::new(
        rng.random_range(-half_extent..=half_extent),
        rng.random_range(-half_extent..=half_extent),
        rng.random_range(-half_extent..=half_extent),
    );
    p[axis] = side;
    p
}

/// Sample from `[lo, hi]`, tolerating a degenerate range
fn sample<R: Rng>(rng: &mut R, lo: f32, hi: f32) -> f32 {
    if hi > lo { rng.random_range(lo..=hi) } else { lo }
}

/// Build an asteroid at `pos` heading for a point near the center.
/// `None` if the store has no ids left.
pub fn make_asteroid<R: Rng>(
    rng: &mut R,
    store: &mut EntityStore,
    pos: Vec3,
    tuning: &Tuning,
) -> Option<Entity> {
    let id = store.allocate_id()?;
    let spread = tuning.spawn_target_spread;
    let target = Vec3::new(
        sample(rng, -spread, spread),
        sample(rng, -spread, spread),
        sample(rng, -spread, spread),
    );
    let speed = sample(rng, tuning.asteroid_min_speed, tuning.asteroid_max_speed);
    let vel = (target - pos).normalize_or_zero() * speed;
    let radius = sample(rng, tuning.asteroid_min_radius, tuning.asteroid_max_radius);
    let spin = sample(rng, -tuning.asteroid_max_rotation, tuning.asteroid_max_rotation);

    Some(Entity::asteroid(id, pos, vel, radius, spin))
}

/// Spawn at most one asteroid if the clock and the population allow it
pub fn maybe_spawn<R: Rng>(
    rng: &mut R,
    store: &mut EntityStore,
    clock: &mut SpawnClock,
    stats: &GameStats,
    player_pos: Vec3,
    now: f64,
    tuning: &Tuning,
) -> Option<Effect> {
    if stats.is_game_over
        || !clock.is_due(now, tuning.spawn_interval_ms)
        || store.count(EntityKind::Asteroid) >= tuning.max_asteroids
    {
        return None;
    }

    // Never drop a rock on top of the ship
    let min_dist_sq = tuning.min_spawn_distance * tuning.min_spawn_distance;
    let pos = (0..tuning.max_spawn_attempts)
        .map(|_| random_face_point(rng, tuning.half_extent))
        .find(|p| p.distance_squared(player_pos) >= min_dist_sq);

    let Some(pos) = pos else {
        log::debug!(
            "No spawn point clear of the player after {} attempts",
            tuning.max_spawn_attempts
        );
        return None;
    };

    let Some(asteroid) = make_asteroid(rng, store, pos, tuning) else {
        log::warn!("Entity ids exhausted, asteroid spawn skipped");
        return None;
    };
    let effect = asteroid.spawned_effect();
    log::debug!(
        "Asteroid {} spawned at {:?} (r={:.2})",
        asteroid.id,
        asteroid.pos,
        asteroid.radius
    );
    if !store.add(asteroid) {
        return None;
    }
    clock.last_spawn = Some(now);
    Some(effect)
}
