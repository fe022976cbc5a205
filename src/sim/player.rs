//! Player lifecycle: Alive -> Invincible -> Alive, or Alive -> Dead
//!
//! Dead is terminal. Game-over teardown is guarded by the monotonic
//! `is_game_over` flag, so running it twice changes nothing. Once the game
//! is over the player is Dead with no lives, however the session ended.

use glam::Vec3;

use super::state::{Effect, GameStats, Player, PlayerState, SpawnClock};
use super::store::EntityStore;
use crate::tuning::Tuning;

/// What a hit did to the player
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitOutcome {
    /// Player was not Alive or the game is over; nothing changed
    Ignored,
    /// Lost a life and respawned under protection
    Respawned,
    /// Lost the last life
    Killed,
}

/// Apply a hit at host time `now`
pub fn hit(
    player: &mut Player,
    stats: &mut GameStats,
    now: f64,
    tuning: &Tuning,
    effects: &mut Vec<Effect>,
) -> HitOutcome {
    if stats.is_game_over || !player.is_alive() {
        return HitOutcome::Ignored;
    }

    stats.lives = stats.lives.saturating_sub(1);
    player.reset_to_spawn();
    effects.push(Effect::PlayerHit {
        lives_remaining: stats.lives,
    });

    if stats.lives > 0 {
        let until = now + tuning.respawn_invincibility_ms;
        player.state = PlayerState::Invincible { until };
        log::info!("Player hit, {} lives left (invincible until {until:.0})", stats.lives);
        effects.push(Effect::PlayerRespawned);
        HitOutcome::Respawned
    } else {
        player.state = PlayerState::Dead;
        log::info!("Player destroyed, no lives left");
        HitOutcome::Killed
    }
}

/// End the invincibility window once `now` reaches the deadline
pub fn update(player: &mut Player, now: f64, effects: &mut Vec<Effect>) {
    if let PlayerState::Invincible { until } = player.state {
        if now >= until {
            player.state = PlayerState::Alive;
            effects.push(Effect::InvincibilityEnded);
        }
    }
}

/// Clear the field, stop spawning and retire the player.
/// Returns false if already torn down.
pub fn game_over_teardown(
    store: &mut EntityStore,
    clock: &mut SpawnClock,
    player: &mut Player,
    stats: &mut GameStats,
    effects: &mut Vec<Effect>,
) -> bool {
    if stats.is_game_over {
        return false;
    }

    let removed = store.clear();
    effects.extend(removed.iter().map(|e| e.destroyed_effect()));
    clock.frozen = true;
    if stats.lives > 0 {
        log::info!("Game ended early with {} lives left", stats.lives);
    }
    stats.lives = 0;
    player.state = PlayerState::Dead;
    player.vel = Vec3::ZERO;
    stats.is_game_over = true;
    effects.push(Effect::GameOver);
    log::info!(
        "Game over: final score {}, {} entities cleared",
        stats.score,
        removed.len()
    );
    true
}
