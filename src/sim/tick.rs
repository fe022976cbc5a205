//! Per-frame simulation tick
//!
//! The host calls [`Simulation::tick`] once per rendered frame. Phases always
//! run in the same order: integrate, bounds, spawn, collide, player state.

use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::bounds::{cull_bullets, wrap_asteroids, wrap_position};
use super::collision::{resolve_bullet_hits, resolve_player_hit};
use super::integrate::{integrate_entity, integrate_player};
use super::player::{self, HitOutcome};
use super::spawn::maybe_spawn;
use super::state::{
    Effect, Entity, EntityKind, EntityTransform, GameStats, Player, PlayerControl, Snapshot,
    SpawnClock,
};
use super::store::EntityStore;
use crate::tuning::{Tuning, TuningError};

/// One game session
#[derive(Debug, Clone)]
pub struct Simulation {
    tuning: Tuning,
    seed: u64,
    rng: Pcg32,
    store: EntityStore,
    player: Player,
    stats: GameStats,
    clock: SpawnClock,
    /// Number of ticks run so far
    ticks: u64,
}

impl Simulation {
    /// New session with default tuning
    pub fn new(seed: u64) -> Self {
        Self::build(Tuning::default(), seed)
    }

    /// New session with custom tuning, rejected if it fails validation
    pub fn with_tuning(tuning: Tuning, seed: u64) -> Result<Self, TuningError> {
        if let Err(err) = tuning.validate() {
            log::warn!("Rejected tuning: {err}");
            return Err(err);
        }
        Ok(Self::build(tuning, seed))
    }

    fn build(tuning: Tuning, seed: u64) -> Self {
        log::info!("Simulation created with seed {seed}");
        Self {
            rng: Pcg32::seed_from_u64(seed),
            seed,
            store: EntityStore::new(),
            player: Player::new(tuning.player_radius),
            stats: GameStats::new(tuning.starting_lives),
            clock: SpawnClock::default(),
            ticks: 0,
            tuning,
        }
    }

    /// Advance one frame at host time `now` (ms, non-decreasing)
    pub fn tick(&mut self, now: f64) -> Vec<Effect> {
        let mut effects = Vec::new();
        self.ticks += 1;

        // Integrate
        integrate_player(&mut self.player, &self.tuning);
        for kind in [EntityKind::Bullet, EntityKind::Asteroid] {
            for entity in self.store.slice_mut(kind) {
                integrate_entity(entity);
            }
        }

        // Bounds
        if !self.player.is_dead() {
            self.player.pos = wrap_position(self.player.pos, self.tuning.wrap_limit());
        }
        wrap_asteroids(&mut self.store, &self.tuning);
        cull_bullets(&mut self.store, &self.tuning, &mut effects);

        // Spawn
        if let Some(spawned) = maybe_spawn(
            &mut self.rng,
            &mut self.store,
            &mut self.clock,
            &self.stats,
            self.player.pos,
            now,
            &self.tuning,
        ) {
            effects.push(spawned);
        }

        // Collide
        let hits = resolve_bullet_hits(&mut self.store, &mut effects);
        for _ in 0..hits.kills() {
            self.stats.score += self.tuning.asteroid_reward;
            effects.push(Effect::ScoreChanged {
                score: self.stats.score,
            });
        }
        if resolve_player_hit(&mut self.store, &self.player, &mut effects).is_some() {
            self.apply_hit(now, &mut effects);
        }

        // Player state
        player::update(&mut self.player, now, &mut effects);
        if self.stats.lives == 0 {
            self.teardown(&mut effects);
        }

        effects
    }

    /// Spawn a bullet from the ship's nose. `None` if the ship cannot fire.
    pub fn fire(&mut self) -> Option<Effect> {
        let can_fire = match self.player.invincible_until() {
            Some(_) => self.tuning.fire_while_invincible,
            None => self.player.is_alive(),
        };
        if !can_fire || self.stats.is_game_over {
            return None;
        }

        let Some(id) = self.store.allocate_id() else {
            log::warn!("Entity ids exhausted, shot dropped");
            return None;
        };
        let forward = self.player.forward();
        let muzzle = self.player.pos + forward * (self.player.radius + self.tuning.bullet_radius);
        let bullet = Entity::bullet(
            id,
            muzzle,
            forward * self.tuning.bullet_speed,
            self.tuning.bullet_radius,
            self.tuning.bullet_lifetime,
        );
        let effect = bullet.spawned_effect();
        log::trace!("Bullet {} fired", bullet.id);
        self.store.add(bullet).then_some(effect)
    }

    /// Store normalized control input for the next tick
    pub fn set_player_control(&mut self, rotation_delta: f32, thrust_axis: f32) {
        let clamp = |v: f32| if v.is_finite() { v.clamp(-1.0, 1.0) } else { 0.0 };
        self.player.control = PlayerControl {
            rotation_delta: clamp(rotation_delta),
            thrust_axis: clamp(thrust_axis),
        };
    }

    /// Hit the player directly (collisions normally do this)
    pub fn hit_player(&mut self, now: f64) -> Vec<Effect> {
        let mut effects = Vec::new();
        self.apply_hit(now, &mut effects);
        effects
    }

    /// Force the session to end. The ship is retired with no lives left.
    /// Safe to call more than once.
    pub fn game_over(&mut self) -> Vec<Effect> {
        let mut effects = Vec::new();
        self.teardown(&mut effects);
        effects
    }

    fn apply_hit(&mut self, now: f64, effects: &mut Vec<Effect>) {
        let outcome = player::hit(&mut self.player, &mut self.stats, now, &self.tuning, effects);
        if outcome == HitOutcome::Killed {
            self.teardown(effects);
        }
    }

    fn teardown(&mut self, effects: &mut Vec<Effect>) {
        player::game_over_teardown(
            &mut self.store,
            &mut self.clock,
            &mut self.player,
            &mut self.stats,
            effects,
        );
    }

    pub fn stats(&self) -> &GameStats {
        &self.stats
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn entities(&self, kind: EntityKind) -> &[Entity] {
        self.store.slice(kind)
    }

    pub fn store(&self) -> &EntityStore {
        &self.store
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Everything the renderer and HUD need this frame
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            stats: self.stats,
            player_position: self.player.pos,
            player_heading: self.player.heading,
            player_state: self.player.state,
            entities: self.store.iter_all().map(EntityTransform::from).collect(),
        }
    }

    /// Insert a pre-built entity (scripted scenarios, tests).
    /// Returns false if the id is taken or the asteroid cap is reached.
    pub fn insert_entity(&mut self, entity: Entity) -> bool {
        if entity.kind() == EntityKind::Asteroid
            && self.store.count(EntityKind::Asteroid) >= self.tuning.max_asteroids
        {
            return false;
        }
        if self.stats.is_game_over {
            return false;
        }
        self.store.add(entity)
    }

    /// Move the ship (scripted scenarios, tests)
    pub fn place_player(&mut self, pos: glam::Vec3) {
        self.player.pos = pos;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::{EntityId, PlayerState};
    use glam::Vec3;
    use proptest::prelude::*;

    /// Session that never spawns on its own
    fn quiet_sim() -> Simulation {
        let tuning = Tuning {
            spawn_interval_ms: f64::MAX,
            ..Default::default()
        };
        let mut sim = Simulation::with_tuning(tuning, 1).unwrap();
        // Use up the free first spawn
        sim.clock.last_spawn = Some(0.0);
        sim
    }

    fn count_game_over(effects: &[Effect]) -> usize {
        effects.iter().filter(|e| **e == Effect::GameOver).count()
    }

    #[test]
    fn test_fire_twice_same_frame() {
        let mut sim = quiet_sim();
        let first = sim.fire();
        let second = sim.fire();
        let (Some(Effect::EntitySpawned { id: a, .. }), Some(Effect::EntitySpawned { id: b, .. })) =
            (first, second)
        else {
            panic!("both shots should spawn");
        };
        assert_ne!(a, b);
        let lifetime = sim.tuning().bullet_lifetime;
        for bullet in sim.entities(EntityKind::Bullet) {
            assert_eq!(bullet.remaining_life(), Some(lifetime));
        }
        assert_eq!(sim.entities(EntityKind::Bullet).len(), 2);

        // Counters are independent
        sim.tick(1.0);
        let lives: Vec<_> = sim
            .entities(EntityKind::Bullet)
            .iter()
            .map(|b| b.remaining_life())
            .collect();
        assert_eq!(lives, vec![Some(lifetime - 1), Some(lifetime - 1)]);
    }

    #[test]
    fn test_fire_follows_heading() {
        let mut sim = quiet_sim();
        sim.player.heading = std::f32::consts::FRAC_PI_2;
        sim.fire();
        let bullet = &sim.entities(EntityKind::Bullet)[0];
        assert!(bullet.vel.x > 0.0);
        assert!(bullet.pos.x > 0.0);
    }

    #[test]
    fn test_fire_blocked_unless_alive() {
        let mut sim = quiet_sim();
        sim.hit_player(0.0);
        assert!(sim.fire().is_none());

        let mut relaxed = Simulation::with_tuning(
            Tuning {
                fire_while_invincible: true,
                ..Default::default()
            },
            1,
        )
        .unwrap();
        relaxed.hit_player(0.0);
        assert!(relaxed.fire().is_some());

        let mut dead = quiet_sim();
        dead.game_over();
        assert!(dead.fire().is_none());
    }

    #[test]
    fn test_forced_game_over_is_terminal() {
        let mut sim = quiet_sim();
        let effects = sim.game_over();
        assert_eq!(count_game_over(&effects), 1);
        assert_eq!(sim.stats().lives, 0);
        assert!(sim.stats().is_game_over);
        assert_eq!(sim.player().state, PlayerState::Dead);

        assert!(sim.hit_player(0.0).is_empty());
        assert_eq!(sim.stats().lives, 0);
        assert!(sim.tick(1.0).is_empty());
    }

    #[test]
    fn test_fire_after_ids_exhausted() {
        let mut sim = quiet_sim();
        let parked = Vec3::new(0.0, 20.0, 0.0);
        let last = Entity::bullet(EntityId(u32::MAX), parked, Vec3::ZERO, 0.2, 500);
        assert!(sim.insert_entity(last));
        assert!(sim.fire().is_none());
        assert_eq!(sim.entities(EntityKind::Bullet).len(), 1);
    }

    #[test]
    fn test_bullet_kills_asteroid_scores_100() {
        let mut sim = quiet_sim();
        let id = EntityId(500);
        let rock = Entity::asteroid(id, Vec3::new(0.0, 0.0, 3.0), Vec3::ZERO, 1.0, 0.0);
        assert!(sim.insert_entity(rock));
        sim.fire();

        let mut effects = Vec::new();
        for t in 0..5 {
            effects.extend(sim.tick(t as f64));
        }
        assert_eq!(sim.stats().score, 100);
        assert!(effects.contains(&Effect::ScoreChanged { score: 100 }));
        assert!(effects.contains(&Effect::EntityDestroyed {
            id,
            kind: EntityKind::Asteroid
        }));
        assert!(sim.entities(EntityKind::Bullet).is_empty());
    }

    #[test]
    fn test_collision_hits_player() {
        let mut sim = quiet_sim();
        let rock = Entity::asteroid(EntityId(77), Vec3::new(1.0, 0.0, 0.0), Vec3::ZERO, 1.0, 0.0);
        sim.insert_entity(rock);
        let effects = sim.tick(10.0);
        assert!(effects.contains(&Effect::PlayerHit { lives_remaining: 2 }));
        assert!(effects.contains(&Effect::PlayerRespawned));
        assert!(matches!(sim.player().state, PlayerState::Invincible { .. }));
        assert_eq!(sim.entities(EntityKind::Asteroid).len(), 0);
    }

    #[test]
    fn test_invincibility_window() {
        let mut sim = quiet_sim();
        sim.hit_player(1000.0);
        let until = sim.player().invincible_until().unwrap();

        let effects = sim.tick(until - 1.0);
        assert!(matches!(sim.player().state, PlayerState::Invincible { .. }));
        assert!(!effects.contains(&Effect::InvincibilityEnded));

        let effects = sim.tick(until);
        assert_eq!(sim.player().state, PlayerState::Alive);
        assert!(effects.contains(&Effect::InvincibilityEnded));
    }

    #[test]
    fn test_invincible_player_passes_through() {
        let mut sim = quiet_sim();
        sim.hit_player(0.0);
        sim.insert_entity(Entity::asteroid(EntityId(90), Vec3::ZERO, Vec3::ZERO, 2.0, 0.0));
        sim.tick(1.0);
        assert_eq!(sim.stats().lives, 2);
        assert_eq!(sim.entities(EntityKind::Asteroid).len(), 1);
    }

    #[test]
    fn test_three_hits_end_the_game() {
        let mut sim = quiet_sim();
        let far = Entity::asteroid(EntityId(900), Vec3::new(20.0, 0.0, 0.0), Vec3::ZERO, 1.0, 0.0);
        sim.insert_entity(far);
        let window = sim.tuning().respawn_invincibility_ms;
        let mut effects = Vec::new();
        let mut now = 0.0;

        for _ in 0..3 {
            effects.extend(sim.hit_player(now));
            now += window;
            effects.extend(sim.tick(now));
        }

        assert_eq!(sim.player().state, PlayerState::Dead);
        assert_eq!(sim.stats().lives, 0);
        assert!(sim.stats().is_game_over);
        assert_eq!(count_game_over(&effects), 1);
        assert!(effects.contains(&Effect::EntityDestroyed {
            id: EntityId(900),
            kind: EntityKind::Asteroid
        }));

        // Further hits and ticks change nothing
        effects.extend(sim.hit_player(now));
        effects.extend(sim.tick(now + 1.0));
        effects.extend(sim.game_over());
        assert_eq!(count_game_over(&effects), 1);
        assert_eq!(sim.stats().lives, 0);
    }

    #[test]
    fn test_game_over_teardown_idempotent() {
        let mut sim = Simulation::new(3);
        for t in 0..10 {
            sim.tick(t as f64 * 5000.0);
            sim.fire();
        }
        assert!(!sim.store().is_empty());

        let first = sim.game_over();
        assert_eq!(count_game_over(&first), 1);
        assert!(sim.store().is_empty());
        let after_once = sim.snapshot();

        let second = sim.game_over();
        assert!(second.is_empty());
        assert_eq!(sim.snapshot(), after_once);

        // Spawning stays off
        let effects = sim.tick(1e12);
        assert!(effects.is_empty());
        assert!(sim.store().is_empty());
    }

    #[test]
    fn test_spawn_on_first_tick() {
        let mut sim = Simulation::new(11);
        let effects = sim.tick(0.0);
        assert!(effects.iter().any(|e| matches!(
            e,
            Effect::EntitySpawned {
                kind: EntityKind::Asteroid,
                ..
            }
        )));
    }

    #[test]
    fn test_player_wraps() {
        let mut sim = quiet_sim();
        let limit = sim.tuning().wrap_limit();
        sim.place_player(Vec3::new(0.0, 0.0, limit + 0.1));
        sim.tick(1.0);
        assert_eq!(sim.player().pos.z, -limit);
    }

    #[test]
    fn test_control_inputs_clamped() {
        let mut sim = quiet_sim();
        sim.set_player_control(5.0, f32::NAN);
        assert_eq!(sim.player().control.rotation_delta, 1.0);
        assert_eq!(sim.player().control.thrust_axis, 0.0);
    }

    #[test]
    fn test_determinism() {
        // Two sessions with the same seed and inputs stay identical
        let mut sim1 = Simulation::new(99999);
        let mut sim2 = Simulation::new(99999);

        for frame in 0..600 {
            let now = frame as f64 * 16.0;
            let rot = ((frame / 40) % 3) as f32 - 1.0;
            for sim in [&mut sim1, &mut sim2] {
                sim.set_player_control(rot, 0.6);
                if frame % 15 == 0 {
                    sim.fire();
                }
            }
            assert_eq!(sim1.tick(now), sim2.tick(now));
        }

        assert_eq!(sim1.snapshot(), sim2.snapshot());
        assert_eq!(sim1.ticks(), 600);
    }

    #[test]
    fn test_asteroid_drifts_through_center() {
        let mut sim = quiet_sim();
        // Keep the ship out of the rock's path along the x axis
        sim.place_player(Vec3::new(0.0, 0.0, 15.0));
        let start = Vec3::new(30.0, 0.0, 0.0);
        let id = EntityId(1);
        let vel = (Vec3::ZERO - start).normalize() * 0.04;
        assert!(sim.insert_entity(Entity::asteroid(id, start, vel, 1.0, 0.0)));

        for t in 0..750 {
            sim.tick(t as f64);
        }
        let rock = sim.store().get(id).expect("asteroid still live");
        assert!(rock.pos.x < 0.0);
        assert!(rock.pos.x > -0.04);
    }

    proptest! {
        #[test]
        fn prop_population_and_lives(
            seed in any::<u64>(),
            frames in proptest::collection::vec(
                (-1.0f32..=1.0, -1.0f32..=1.0, any::<bool>(), 1.0f64..2500.0),
                1..300,
            ),
        ) {
            let tuning = Tuning {
                max_asteroids: 6,
                spawn_interval_ms: 100.0,
                asteroid_max_speed: 0.5,
                ..Default::default()
            };
            let cap = tuning.max_asteroids;
            let mut sim = Simulation::with_tuning(tuning, seed).unwrap();
            let mut now = 0.0;
            let mut lives = sim.stats().lives;
            let mut game_overs = 0;

            for (rot, thrust, shoot, step) in frames {
                now += step;
                sim.set_player_control(rot, thrust);
                if shoot {
                    sim.fire();
                }
                let effects = sim.tick(now);
                game_overs += count_game_over(&effects);

                prop_assert!(sim.entities(EntityKind::Asteroid).len() <= cap);
                prop_assert!(sim.stats().lives <= lives);
                lives = sim.stats().lives;
                prop_assert_eq!(sim.stats().lives == 0, sim.stats().is_game_over);
                prop_assert!(game_overs <= 1);
            }
        }
    }
}
