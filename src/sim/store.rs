//! Entity storage
//!
//! One vector per kind, each kept sorted by id for deterministic iteration.
//! Removing at an index never moves lower indices, so callers may remove
//! while walking a collection from the back.

use super::state::{Entity, EntityId, EntityKind};

#[derive(Debug, Clone)]
pub struct EntityStore {
    bullets: Vec<Entity>,
    asteroids: Vec<Entity>,
    next_id: u32,
}

impl Default for EntityStore {
    fn default() -> Self {
        Self::new()
    }
}

impl EntityStore {
    pub fn new() -> Self {
        Self {
            bullets: Vec::new(),
            asteroids: Vec::new(),
            next_id: 1,
        }
    }

    /// Allocate a new entity ID. `None` once the id space is used up.
    pub fn allocate_id(&mut self) -> Option<EntityId> {
        let id = EntityId(self.next_id);
        // next_id is always above every stored id until it saturates
        self.next_id = self.next_id.checked_add(1)?;
        Some(id)
    }

    fn vec(&self, kind: EntityKind) -> &Vec<Entity> {
        match kind {
            EntityKind::Bullet => &self.bullets,
            EntityKind::Asteroid => &self.asteroids,
        }
    }

    fn vec_mut(&mut self, kind: EntityKind) -> &mut Vec<Entity> {
        match kind {
            EntityKind::Bullet => &mut self.bullets,
            EntityKind::Asteroid => &mut self.asteroids,
        }
    }

    /// Insert an entity. Returns false (and changes nothing) if the id is taken.
    pub fn add(&mut self, entity: Entity) -> bool {
        if self.contains(entity.id) {
            return false;
        }
        // Keep the allocator ahead of externally chosen ids
        self.next_id = self.next_id.max(entity.id.0.saturating_add(1));
        let list = self.vec_mut(entity.kind());
        let pos = list.partition_point(|e| e.id < entity.id);
        list.insert(pos, entity);
        true
    }

    /// Remove by id. Missing ids are a no-op.
    pub fn remove(&mut self, id: EntityId) -> Option<Entity> {
        for kind in [EntityKind::Bullet, EntityKind::Asteroid] {
            let list = self.vec_mut(kind);
            if let Ok(idx) = list.binary_search_by_key(&id, |e| e.id) {
                return Some(list.remove(idx));
            }
        }
        None
    }

    /// Remove the entity at `index` within the `kind` collection
    pub fn remove_at(&mut self, kind: EntityKind, index: usize) -> Option<Entity> {
        let list = self.vec_mut(kind);
        (index < list.len()).then(|| list.remove(index))
    }

    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        [EntityKind::Bullet, EntityKind::Asteroid]
            .into_iter()
            .find_map(|kind| {
                let list = self.vec(kind);
                list.binary_search_by_key(&id, |e| e.id)
                    .ok()
                    .map(|idx| &list[idx])
            })
    }

    #[inline]
    pub fn contains(&self, id: EntityId) -> bool {
        self.get(id).is_some()
    }

    #[inline]
    pub fn count(&self, kind: EntityKind) -> usize {
        self.vec(kind).len()
    }

    pub fn len(&self) -> usize {
        self.bullets.len() + self.asteroids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// All entities of one kind, ascending by id
    #[inline]
    pub fn slice(&self, kind: EntityKind) -> &[Entity] {
        self.vec(kind)
    }

    #[inline]
    pub fn slice_mut(&mut self, kind: EntityKind) -> &mut [Entity] {
        self.vec_mut(kind)
    }

    pub fn iter(&self, kind: EntityKind) -> impl Iterator<Item = &Entity> {
        self.vec(kind).iter()
    }

    /// Every live entity, bullets first
    pub fn iter_all(&self) -> impl Iterator<Item = &Entity> {
        self.bullets.iter().chain(self.asteroids.iter())
    }

    /// Drop every entity, returning them so callers can report the removals
    pub fn clear(&mut self) -> Vec<Entity> {
        let mut removed = std::mem::take(&mut self.bullets);
        removed.append(&mut self.asteroids);
        removed
    }
}
