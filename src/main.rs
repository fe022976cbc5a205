//! Astro Drift entry point
//!
//! In the browser the JS host drives the simulation through `astro_drift::wasm`.
//! Natively this binary runs a headless autopilot session and prints a summary.

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use std::path::PathBuf;

    use astro_drift::sim::{EntityId, EntityKind, Simulation};
    use astro_drift::{RenderingPort, Tuning, dispatch, normalize_angle};
    use clap::Parser;
    use glam::Vec3;
    use serde::Serialize;

    /// Headless session runner - autopilot vs the asteroid field
    #[derive(Parser, Debug)]
    #[command(name = "astro-drift")]
    #[command(about = "Run a headless Astro Drift session and print a JSON summary")]
    pub struct Args {
        /// Random seed for deterministic runs (defaults to the current time)
        #[arg(long)]
        seed: Option<u64>,

        /// Number of frames to simulate
        #[arg(long, default_value_t = 7200)]
        frames: u32,

        /// Host frame time in milliseconds
        #[arg(long, default_value_t = 1000.0 / 60.0)]
        frame_ms: f64,

        /// Tuning JSON file (partial files are filled with defaults)
        #[arg(long)]
        tuning: Option<PathBuf>,

        /// Frames between autopilot shots
        #[arg(long, default_value_t = 12)]
        fire_every: u32,
    }

    #[derive(Serialize)]
    struct Summary {
        seed: u64,
        frames: u32,
        score: u64,
        lives: u8,
        game_over: bool,
        asteroids_spawned: u32,
        asteroids_destroyed: u32,
        shots_fired: u32,
        hits_taken: u32,
    }

    /// Stands in for the 3D engine: counts and logs what it would draw
    #[derive(Default)]
    struct LogPort {
        asteroids_spawned: u32,
        asteroids_destroyed: u32,
        shots_fired: u32,
        hits_taken: u32,
    }

    impl RenderingPort for LogPort {
        fn entity_spawned(
            &mut self,
            id: EntityId,
            kind: EntityKind,
            position: Vec3,
            extents: Vec3,
        ) {
            match kind {
                EntityKind::Asteroid => {
                    self.asteroids_spawned += 1;
                    log::debug!("spawn asteroid {id} at {position:?} size {extents:?}");
                }
                EntityKind::Bullet => self.shots_fired += 1,
            }
        }

        fn entity_destroyed(&mut self, id: EntityId, kind: EntityKind) {
            if kind == EntityKind::Asteroid {
                self.asteroids_destroyed += 1;
                log::debug!("dispose asteroid {id}");
            }
        }

        fn score_changed(&mut self, score: u64) {
            log::info!("Score: {score}");
        }

        fn player_hit(&mut self, lives_remaining: u8) {
            self.hits_taken += 1;
            log::info!("Ship hit! Lives: {lives_remaining}");
        }

        fn player_respawned(&mut self) {
            log::info!("Ship respawned (invincible)");
        }

        fn game_over(&mut self) {
            log::info!("GAME OVER");
        }
    }

    /// Turn toward the nearest asteroid, drift gently, shoot when lined up
    fn autopilot(sim: &Simulation) -> (f32, f32, bool) {
        let player = sim.player();
        let nearest = sim
            .entities(EntityKind::Asteroid)
            .iter()
            .min_by(|a, b| {
                a.pos
                    .distance_squared(player.pos)
                    .total_cmp(&b.pos.distance_squared(player.pos))
            });

        let Some(rock) = nearest else {
            return (0.0, 0.0, false);
        };

        let to_rock = rock.pos - player.pos;
        let desired = to_rock.x.atan2(to_rock.z);
        let error = normalize_angle(desired - player.heading);
        let rotation = (error / sim.tuning().player_rotation_speed).clamp(-1.0, 1.0);
        // Back off when a rock gets close
        let thrust = if to_rock.length() < 8.0 { -0.5 } else { 0.1 };
        (rotation, thrust, error.abs() < 0.15)
    }

    pub fn run() -> Result<(), Box<dyn std::error::Error>> {
        let args = Args::parse();

        let tuning = match &args.tuning {
            Some(path) => Tuning::from_json(&std::fs::read_to_string(path)?)?,
            None => Tuning::default(),
        };
        let seed = args.seed.unwrap_or_else(|| {
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .map(|d| d.as_millis() as u64)
                .unwrap_or(0)
        });
        log::info!("Astro Drift (headless) starting, seed {seed}, {} frames", args.frames);

        let mut sim = Simulation::with_tuning(tuning, seed)?;
        let mut port = LogPort::default();

        let mut frames_run = 0;
        for frame in 0..args.frames {
            let now = frame as f64 * args.frame_ms;
            let (rotation, thrust, lined_up) = autopilot(&sim);
            sim.set_player_control(rotation, thrust);
            if lined_up && frame % args.fire_every.max(1) == 0 {
                if let Some(effect) = sim.fire() {
                    dispatch(&[effect], &mut port);
                }
            }
            dispatch(&sim.tick(now), &mut port);
            frames_run = frame + 1;
            if sim.stats().is_game_over {
                break;
            }
        }

        let stats = sim.stats();
        let summary = Summary {
            seed,
            frames: frames_run,
            score: stats.score,
            lives: stats.lives,
            game_over: stats.is_game_over,
            asteroids_spawned: port.asteroids_spawned,
            asteroids_destroyed: port.asteroids_destroyed,
            shots_fired: port.shots_fired,
            hits_taken: port.hits_taken,
        };
        println!("{}", serde_json::to_string_pretty(&summary)?);
        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    if let Err(err) = headless::run() {
        log::error!("{err}");
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is astro_drift::wasm::wasm_start, this is just to satisfy the compiler
}
