//! Collision detection and resolution
//!
//! Everything is a bounding sphere: two bodies touch when the distance
//! between their centers is at most the sum of their radii. Resolution walks
//! both collections back to front so removals never disturb pending indices.

use glam::Vec3;

use super::state::{Effect, EntityId, EntityKind, Player};
use super::store::EntityStore;

/// Bounding-sphere overlap test (touching counts as a hit)
#[inline]
pub fn spheres_overlap(p1: Vec3, r1: f32, p2: Vec3, r2: f32) -> bool {
    let reach = r1 + r2;
    p1.distance_squared(p2) <= reach * reach
}

/// Outcome of the bullet/asteroid pass
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BulletHits {
    /// (bullet, asteroid) pairs destroyed this tick
    pub pairs: Vec<(EntityId, EntityId)>,
}

impl BulletHits {
    pub fn kills(&self) -> usize {
        self.pairs.len()
    }
}

/// Destroy every bullet/asteroid pair that overlaps
///
/// Each bullet takes out at most one asteroid. An asteroid consumed by one
/// bullet is gone before the next bullet is tested.
pub fn resolve_bullet_hits(store: &mut EntityStore, effects: &mut Vec<Effect>) -> BulletHits {
    let mut hits = BulletHits::default();

    for b in (0..store.count(EntityKind::Bullet)).rev() {
        let bullet = &store.slice(EntityKind::Bullet)[b];
        let (bullet_pos, bullet_radius) = (bullet.pos, bullet.radius);

        let target = store
            .slice(EntityKind::Asteroid)
            .iter()
            .enumerate()
            .rev()
            .find(|(_, rock)| spheres_overlap(bullet_pos, bullet_radius, rock.pos, rock.radius))
            .map(|(idx, _)| idx);

        let Some(a) = target else {
            continue;
        };

        let rock = store.remove_at(EntityKind::Asteroid, a);
        let shot = store.remove_at(EntityKind::Bullet, b);
        if let (Some(shot), Some(rock)) = (shot, rock) {
            log::debug!("Bullet {} destroyed asteroid {}", shot.id, rock.id);
            effects.push(shot.destroyed_effect());
            effects.push(rock.destroyed_effect());
            hits.pairs.push((shot.id, rock.id));
        }
    }

    hits
}

/// Find and remove the first asteroid touching the player
///
/// Returns nothing unless the player is collidable. At most one asteroid is
/// consumed per call.
pub fn resolve_player_hit(
    store: &mut EntityStore,
    player: &Player,
    effects: &mut Vec<Effect>,
) -> Option<EntityId> {
    if !player.is_collidable() {
        return None;
    }

    let idx = store
        .slice(EntityKind::Asteroid)
        .iter()
        .rposition(|rock| spheres_overlap(player.pos, player.radius, rock.pos, rock.radius))?;

    let rock = store.remove_at(EntityKind::Asteroid, idx)?;
    log::debug!("Player struck by asteroid {}", rock.id);
    effects.push(rock.destroyed_effect());
    Some(rock.id)
}
