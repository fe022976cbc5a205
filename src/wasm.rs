//! JavaScript bindings for the browser host
//!
//! The 3D engine owns meshes, XR input and the HUD. Each frame it calls
//! `tick(performance.now())`, applies the returned effects, and syncs mesh
//! transforms from `asteroid_transforms()` / `snapshot()`.

use wasm_bindgen::prelude::*;

use crate::sim::{EntityKind, Simulation};
use crate::tuning::Tuning;

#[wasm_bindgen(start)]
pub fn wasm_start() {
    console_error_panic_hook::set_once();
    // A second init (hot reload) is harmless
    let _ = console_log::init_with_level(log::Level::Info);
    log::info!("Astro Drift simulation core loaded");
}

fn to_js<E: std::fmt::Display>(err: E) -> JsValue {
    JsValue::from_str(&err.to_string())
}

/// Simulation handle exposed to JavaScript
#[wasm_bindgen]
pub struct WasmSimulation {
    sim: Simulation,
}

#[wasm_bindgen]
impl WasmSimulation {
    /// `seed` defaults to the current time; `tuning_json` may be partial
    #[wasm_bindgen(constructor)]
    pub fn new(seed: Option<f64>, tuning_json: Option<String>) -> Result<WasmSimulation, JsValue> {
        let seed = seed.unwrap_or_else(js_sys::Date::now) as u64;
        let tuning = match tuning_json {
            Some(json) => Tuning::from_json(&json).map_err(to_js)?,
            None => Tuning::default(),
        };
        let sim = Simulation::with_tuning(tuning, seed).map_err(to_js)?;
        Ok(WasmSimulation { sim })
    }

    /// Advance one frame; returns the effects as a JSON array
    pub fn tick(&mut self, now: f64) -> Result<String, JsValue> {
        let effects = self.sim.tick(now);
        serde_json::to_string(&effects).map_err(to_js)
    }

    /// Fire from the ship; returns the spawn effect as JSON, or undefined
    pub fn fire(&mut self) -> Result<Option<String>, JsValue> {
        self.sim
            .fire()
            .map(|effect| serde_json::to_string(&effect).map_err(to_js))
            .transpose()
    }

    #[wasm_bindgen(js_name = setPlayerControl)]
    pub fn set_player_control(&mut self, rotation_delta: f32, thrust_axis: f32) {
        self.sim.set_player_control(rotation_delta, thrust_axis);
    }

    /// End the session immediately; returns the teardown effects as JSON
    #[wasm_bindgen(js_name = gameOver)]
    pub fn game_over(&mut self) -> Result<String, JsValue> {
        serde_json::to_string(&self.sim.game_over()).map_err(to_js)
    }

    /// Full state (stats, player, entity transforms) as JSON
    pub fn snapshot(&self) -> Result<String, JsValue> {
        serde_json::to_string(&self.sim.snapshot()).map_err(to_js)
    }

    /// Packed `[id, x, y, z, rx, ry, rz]` per asteroid, for per-frame mesh sync
    #[wasm_bindgen(js_name = asteroidTransforms)]
    pub fn asteroid_transforms(&self) -> js_sys::Float32Array {
        let rocks = self.sim.entities(EntityKind::Asteroid);
        let mut packed = Vec::with_capacity(rocks.len() * 7);
        for rock in rocks {
            packed.push(rock.id.0 as f32);
            packed.extend_from_slice(&rock.pos.to_array());
            packed.extend_from_slice(&rock.orientation.to_array());
        }
        js_sys::Float32Array::from(packed.as_slice())
    }

    /// Packed `[x, y, z, heading]` for the ship
    #[wasm_bindgen(js_name = playerTransform)]
    pub fn player_transform(&self) -> js_sys::Float32Array {
        let player = self.sim.player();
        let packed = [player.pos.x, player.pos.y, player.pos.z, player.heading];
        js_sys::Float32Array::from(&packed[..])
    }

    pub fn score(&self) -> f64 {
        self.sim.stats().score as f64
    }

    pub fn lives(&self) -> u8 {
        self.sim.stats().lives
    }

    #[wasm_bindgen(js_name = isGameOver)]
    pub fn is_game_over(&self) -> bool {
        self.sim.stats().is_game_over
    }

    /// Invincibility deadline (host ms) while the ship is protected
    #[wasm_bindgen(js_name = invincibleUntil)]
    pub fn invincible_until(&self) -> Option<f64> {
        self.sim.player().invincible_until()
    }
}
