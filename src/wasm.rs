#![cfg(target_arch = "wasm32")]

use crate::config::{GeodesicParams, SandboxConfig};
use crate::engine::{SceneInfo, SimulationState, scene_catalog};
use crate::models::particles::ParticleField;
use crate::persistence;
use crate::Vec3;
use serde::Deserialize;
use wasm_bindgen::prelude::*;

#[wasm_bindgen]
pub fn available_scenes() -> js_sys::Array {
    let out = js_sys::Array::new();
    for info in scene_catalog() {
        out.push(&scene_info_to_js(info));
    }
    out
}

#[wasm_bindgen]
pub fn sandbox_defaults() -> JsValue {
    serde_wasm_bindgen::to_value(&SandboxConfig::default()).unwrap_or(JsValue::NULL)
}

fn scene_info_to_js(info: &SceneInfo) -> JsValue {
    let obj = js_sys::Object::new();
    let _ = js_sys::Reflect::set(&obj, &JsValue::from_str("id"), &JsValue::from_str(info.id));
    let _ = js_sys::Reflect::set(&obj, &JsValue::from_str("name"), &JsValue::from_str(info.name));
    let _ = js_sys::Reflect::set(
        &obj,
        &JsValue::from_str("description"),
        &JsValue::from_str(info.description),
    );
    JsValue::from(obj)
}

fn parse_config(config: JsValue) -> Result<SandboxConfig, JsValue> {
    if config.is_undefined() || config.is_null() {
        return Ok(SandboxConfig::default());
    }
    let cfg: SandboxConfig = serde_wasm_bindgen::from_value(config)
        .map_err(|e| JsValue::from_str(&format!("invalid config: {}", e)))?;
    cfg.validate()
        .map_err(|e| JsValue::from_str(&format!("invalid config: {}", e)))?;
    Ok(cfg)
}

#[wasm_bindgen]
pub struct WasmGeodesics {
    field: ParticleField,
}

#[wasm_bindgen]
impl WasmGeodesics {
    #[wasm_bindgen(constructor)]
    pub fn new(config: JsValue) -> Result<WasmGeodesics, JsValue> {
        let cfg = parse_config(config)?;
        Ok(WasmGeodesics {
            field: ParticleField::populated(cfg.geodesic),
        })
    }

    pub fn new_demo() -> WasmGeodesics {
        WasmGeodesics {
            field: ParticleField::populated(GeodesicParams::default()),
        }
    }

    pub fn len(&self) -> usize { self.field.len() }

    pub fn captured(&self) -> usize { self.field.captured() }

    pub fn step(&mut self) -> usize { self.field.step().len() }

    pub fn spawn(&mut self, count: usize) { self.field.spawn(count); }

    /// `[x, y]` per live particle.
    pub fn positions(&self) -> Vec<f32> {
        let mut out = Vec::with_capacity(self.field.len() * 2);
        for [x, y] in self.field.positions() {
            out.push(x as f32);
            out.push(y as f32);
        }
        out
    }

    /// Trails concatenated oldest-first; pair with `trail_lengths` to split.
    pub fn trails(&self) -> Vec<f32> {
        let mut out = Vec::new();
        for p in self.field.particles() {
            for [x, y] in p.trail().iter() {
                out.push(*x as f32);
                out.push(*y as f32);
            }
        }
        out
    }

    pub fn trail_lengths(&self) -> Vec<u32> {
        self.field.particles().iter().map(|p| p.trail().len() as u32).collect()
    }
}

#[wasm_bindgen]
pub struct WasmSandbox {
    state: SimulationState,
}

#[wasm_bindgen]
impl WasmSandbox {
    #[wasm_bindgen(constructor)]
    pub fn new(config: JsValue) -> Result<WasmSandbox, JsValue> {
        let cfg = parse_config(config)?;
        Ok(WasmSandbox {
            state: SimulationState::new(&cfg),
        })
    }

    pub fn len(&self) -> usize { self.state.bodies().len() }

    pub fn tick(&mut self) { self.state.tick(); }

    pub fn step(&mut self, dt: f64) {
        let paused = self.state.is_paused();
        self.state.bodies_mut().step(dt, paused);
    }

    pub fn toggle_pause(&mut self) -> bool { self.state.toggle_pause() }

    pub fn reset(&mut self) { self.state.reset(); }

    pub fn set_gravity_multiplier(&mut self, multiplier: f64) {
        self.state.bodies_mut().set_gravity_multiplier(multiplier);
    }

    pub fn insert(&mut self, body: JsValue) -> Result<(), JsValue> {
        let b: CustomBody = serde_wasm_bindgen::from_value(body)
            .map_err(|e| JsValue::from_str(&format!("invalid body: {}", e)))?;
        self.state.bodies_mut().add_body(
            Vec3::from(b.position),
            Vec3::from(b.velocity),
            b.radius,
            b.color,
            b.mass,
        );
        Ok(())
    }

    pub fn spawn_planet_at_screen(&mut self, x: f64, y: f64) { self.state.spawn_planet_at_screen(x, y); }

    pub fn spawn_star_at_screen(&mut self, x: f64, y: f64) { self.state.spawn_star_at_screen(x, y); }

    pub fn pan(&mut self, dx: f64, dy: f64) { self.state.camera_mut().pan(dx, dy); }

    pub fn zoom_in(&mut self) { self.state.camera_mut().zoom_in(); }

    pub fn zoom_out(&mut self) { self.state.camera_mut().zoom_out(); }

    pub fn set_viewport(&mut self, width: f64, height: f64) {
        self.state.camera_mut().set_viewport(width, height);
    }

    /// `[x, y, z, radius]` per body.
    pub fn bodies(&self) -> Vec<f32> {
        let bodies = self.state.bodies().bodies();
        let mut out = Vec::with_capacity(bodies.len() * 4);
        for b in bodies {
            out.push(b.position.x as f32);
            out.push(b.position.y as f32);
            out.push(b.position.z as f32);
            out.push(b.radius() as f32);
        }
        out
    }

    /// `[r, g, b]` per body.
    pub fn colors(&self) -> Vec<f32> {
        self.state
            .bodies()
            .bodies()
            .iter()
            .flat_map(|b| b.color().map(|c| c as f32))
            .collect()
    }

    /// Snapshot as JSON text for the page to store.
    pub fn save_json(&self) -> Result<String, JsValue> {
        persistence::to_json(self.state.bodies()).map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Returns `false` (and reseeds) when `text` is not a usable save.
    pub fn restore_json(&mut self, text: &str) -> bool {
        match persistence::from_json(text) {
            Some(bodies) => {
                self.state.replace_bodies(bodies);
                true
            }
            None => {
                self.state.reset();
                false
            }
        }
    }
}

#[derive(Debug, Deserialize)]
struct CustomBody {
    position: [f64; 3],
    #[serde(default)]
    velocity: [f64; 3],
    radius: f64,
    #[serde(default = "default_color")]
    color: [f64; 3],
    #[serde(default)]
    mass: Option<f64>,
}

fn default_color() -> [f64; 3] { [1.0, 1.0, 1.0] }
