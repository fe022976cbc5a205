//! Per-tick motion
//!
//! Velocities are per-tick displacements, so nothing here is scaled by dt.

use super::state::{Entity, Player, Role};
use crate::heading_to_forward;
use crate::normalize_angle;
use crate::tuning::{AccelerationModel, RotationOrder, Tuning};

/// Advance one entity: move it, and tumble it if it is an asteroid
pub fn integrate_entity(entity: &mut Entity) {
    entity.pos += entity.vel;
    if let Role::Asteroid { rotation_speed } = entity.role {
        entity.orientation.x += rotation_speed;
        entity.orientation.y += rotation_speed;
    }
}

/// Apply the stored control input, then damp, clamp and move the player
pub fn integrate_player(player: &mut Player, tuning: &Tuning) {
    if player.is_dead() {
        return;
    }

    let control = player.control;
    let turn = control.rotation_delta * tuning.player_rotation_speed;

    // Thrust direction depends on whether this tick's turn is already applied
    let thrust_dir = match tuning.rotation_order {
        RotationOrder::BeforeThrust => {
            player.heading = normalize_angle(player.heading + turn);
            heading_to_forward(player.heading)
        }
        RotationOrder::AfterThrust => {
            let dir = heading_to_forward(player.heading);
            player.heading = normalize_angle(player.heading + turn);
            dir
        }
    };

    match tuning.acceleration_model {
        AccelerationModel::Accumulate => {
            player.vel += thrust_dir * control.thrust_axis * tuning.player_acceleration;
            // damp -> clamp -> integrate
            player.vel *= tuning.player_damping;
            player.vel = player.vel.clamp_length_max(tuning.player_max_speed);
        }
        AccelerationModel::Instant => {
            player.vel = thrust_dir * control.thrust_axis * tuning.player_max_speed;
        }
    }

    player.pos += player.vel;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::{EntityId, PlayerControl, PlayerState};
    use glam::Vec3;
    use std::f32::consts::FRAC_PI_2;

    #[test]
    fn test_entity_moves_by_velocity() {
        let mut e = Entity::bullet(EntityId(1), Vec3::new(1.0, 2.0, 3.0), Vec3::X, 0.2, 10);
        integrate_entity(&mut e);
        assert_eq!(e.pos, Vec3::new(2.0, 2.0, 3.0));
        assert_eq!(e.orientation, Vec3::ZERO);
    }

    #[test]
    fn test_asteroid_tumbles() {
        let mut e = Entity::asteroid(EntityId(1), Vec3::ZERO, Vec3::ZERO, 1.0, 0.1);
        integrate_entity(&mut e);
        integrate_entity(&mut e);
        assert!((e.orientation.x - 0.2).abs() < 1e-6);
        assert!((e.orientation.y - 0.2).abs() < 1e-6);
        assert_eq!(e.orientation.z, 0.0);
    }

    #[test]
    fn test_damping_without_thrust() {
        let tuning = Tuning::default();
        let mut player = Player::new(1.0);
        player.vel = Vec3::new(0.1, 0.0, 0.0);
        integrate_player(&mut player, &tuning);
        let expected = 0.1 * tuning.player_damping;
        assert!((player.vel.x - expected).abs() < 1e-6);
        assert!((player.pos.x - expected).abs() < 1e-6);
    }

    #[test]
    fn test_speed_clamped_after_damping() {
        let tuning = Tuning::default();
        let mut player = Player::new(1.0);
        player.vel = Vec3::new(10.0, 0.0, 0.0);
        integrate_player(&mut player, &tuning);
        assert!((player.vel.length() - tuning.player_max_speed).abs() < 1e-5);
        assert!((player.pos.x - tuning.player_max_speed).abs() < 1e-5);
    }

    #[test]
    fn test_thrust_accumulates_along_heading() {
        let tuning = Tuning::default();
        let mut player = Player::new(1.0);
        player.control = PlayerControl {
            rotation_delta: 0.0,
            thrust_axis: 1.0,
        };
        for _ in 0..10 {
            integrate_player(&mut player, &tuning);
        }
        assert!(player.vel.z > 0.0);
        assert!(player.vel.x.abs() < 1e-6);
        assert!(player.vel.length() <= tuning.player_max_speed + 1e-6);
    }

    #[test]
    fn test_rotation_order_changes_thrust_direction() {
        let tuning = Tuning {
            player_rotation_speed: FRAC_PI_2,
            ..Default::default()
        };
        let control = PlayerControl {
            rotation_delta: 1.0,
            thrust_axis: 1.0,
        };

        let mut before = Player::new(1.0);
        before.control = control;
        integrate_player(&mut before, &tuning);
        // Turned a quarter first, so the push is along +X
        assert!(before.vel.x > 0.0 && before.vel.z.abs() < 1e-6);

        let after_tuning = Tuning {
            rotation_order: RotationOrder::AfterThrust,
            ..tuning
        };
        let mut after = Player::new(1.0);
        after.control = control;
        integrate_player(&mut after, &after_tuning);
        assert!(after.vel.z > 0.0 && after.vel.x.abs() < 1e-6);
        assert!((after.heading - FRAC_PI_2).abs() < 1e-6);
    }

    #[test]
    fn test_instant_model_sets_velocity() {
        let tuning = Tuning {
            acceleration_model: AccelerationModel::Instant,
            ..Default::default()
        };
        let mut player = Player::new(1.0);
        player.control.thrust_axis = 0.5;
        integrate_player(&mut player, &tuning);
        assert!((player.vel.z - 0.5 * tuning.player_max_speed).abs() < 1e-6);

        // Releasing thrust stops immediately
        player.control.thrust_axis = 0.0;
        integrate_player(&mut player, &tuning);
        assert_eq!(player.vel, Vec3::ZERO);
    }

    #[test]
    fn test_dead_player_frozen() {
        let tuning = Tuning::default();
        let mut player = Player::new(1.0);
        player.state = PlayerState::Dead;
        player.vel = Vec3::X;
        integrate_player(&mut player, &tuning);
        assert_eq!(player.pos, Vec3::ZERO);
    }
}
