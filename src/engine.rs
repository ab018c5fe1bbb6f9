use crate::Vec3;
use crate::config::{CameraParams, MAX_ZOOM, MIN_ZOOM, SandboxConfig};
use crate::error::{EngineError, PersistError};
use crate::models::bodies::{Body, BodySet};
use crate::models::particles::ParticleField;
use crate::persistence;
use std::path::{Path, PathBuf};

pub const SCENE_GEODESICS: &str = "geodesics";
pub const SCENE_SOLAR_SYSTEM: &str = "solar-system";

pub struct SceneInfo {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
}

pub fn scene_catalog() -> &'static [SceneInfo] {
    &[
        SceneInfo {
            id: SCENE_GEODESICS,
            name: "Black hole geodesics",
            description: "Photons or massive test particles orbiting a Schwarzschild hole, RK4 in the affine parameter.",
        },
        SceneInfo {
            id: SCENE_SOLAR_SYSTEM,
            name: "Solar system sandbox",
            description: "Sun, three planets and an asteroid cloud under direct-sum gravity, with live spawning.",
        },
    ]
}

/// Orthographic view onto the sandbox: pan, zoom and screen picking.
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    position: Vec3,
    zoom: f64,
    zoom_speed: f64,
    pan_sensitivity: f64,
    viewport: [f64; 2],
}

impl Camera {
    pub fn new(params: &CameraParams) -> Self {
        Self {
            position: params.position_vec(),
            zoom: params.zoom.clamp(MIN_ZOOM, MAX_ZOOM),
            zoom_speed: params.zoom_speed,
            pan_sensitivity: params.pan_sensitivity,
            viewport: params.viewport,
        }
    }

    pub fn position(&self) -> Vec3 { self.position }
    pub fn zoom(&self) -> f64 { self.zoom }
    pub fn viewport(&self) -> [f64; 2] { self.viewport }

    pub fn set_viewport(&mut self, width: f64, height: f64) {
        self.viewport = [width, height];
    }

    pub fn zoom_in(&mut self) {
        self.zoom = (self.zoom * self.zoom_speed).min(MAX_ZOOM);
    }

    pub fn zoom_out(&mut self) {
        self.zoom = (self.zoom / self.zoom_speed).max(MIN_ZOOM);
    }

    /// Drag by `(dx, dy)` screen pixels; y grows downward on screen.
    pub fn pan(&mut self, dx: f64, dy: f64) {
        self.position.x += dx * self.pan_sensitivity / self.zoom;
        self.position.y -= dy * self.pan_sensitivity / self.zoom;
    }

    /// World point under pixel `(x, y)`, on the camera's depth plane.
    pub fn screen_to_world(&self, x: f64, y: f64) -> Vec3 {
        let [w, h] = self.viewport;
        Vec3::new(
            (x - w / 2.0) / self.zoom + self.position.x,
            (h - y - h / 2.0) / self.zoom + self.position.y,
            self.position.z,
        )
    }
}

/// Everything the N-body frame loop mutates, passed around explicitly.
#[derive(Debug)]
pub struct SimulationState {
    bodies: BodySet,
    camera: Camera,
    paused: bool,
    save_path: PathBuf,
}

impl SimulationState {
    /// Fresh seed constellation.
    pub fn new(cfg: &SandboxConfig) -> Self {
        Self {
            bodies: BodySet::new(cfg.gravity.clone()),
            camera: Camera::new(&cfg.camera),
            paused: false,
            save_path: cfg.save_path.clone(),
        }
    }

    /// Resume from `cfg.save_path` if a usable save exists there, otherwise
    /// the same fresh constellation [`SimulationState::new`] builds.
    pub fn restore(cfg: &SandboxConfig) -> Self {
        let bodies = match persistence::load_universe(&cfg.save_path) {
            Some(bodies) => BodySet::from_bodies(bodies, cfg.gravity.clone()),
            None => BodySet::new(cfg.gravity.clone()),
        };
        Self {
            bodies,
            camera: Camera::new(&cfg.camera),
            paused: false,
            save_path: cfg.save_path.clone(),
        }
    }

    pub fn bodies(&self) -> &BodySet { &self.bodies }
    pub fn bodies_mut(&mut self) -> &mut BodySet { &mut self.bodies }
    pub fn camera(&self) -> &Camera { &self.camera }
    pub fn camera_mut(&mut self) -> &mut Camera { &mut self.camera }
    pub fn is_paused(&self) -> bool { self.paused }
    pub fn save_path(&self) -> &Path { &self.save_path }

    pub fn set_paused(&mut self, paused: bool) { self.paused = paused; }

    pub fn toggle_pause(&mut self) -> bool {
        self.paused = !self.paused;
        self.paused
    }

    /// One frame with the configured `dt`.
    pub fn tick(&mut self) {
        let dt = self.bodies.params().dt;
        self.bodies.step(dt, self.paused);
    }

    pub fn spawn_planet_at_screen(&mut self, x: f64, y: f64) {
        let at = self.camera.screen_to_world(x, y);
        self.bodies.spawn_planet(at);
    }

    pub fn spawn_star_at_screen(&mut self, x: f64, y: f64) {
        let at = self.camera.screen_to_world(x, y);
        self.bodies.spawn_star(at);
    }

    pub fn reset(&mut self) {
        self.bodies.reset();
    }

    pub fn save(&self) -> Result<(), PersistError> {
        persistence::save_universe(&self.save_path, &self.bodies)
    }

    /// Replace the bodies with the saved ones, or reseed when there is no
    /// usable save. Returns `true` when a save was loaded.
    pub fn load_or_reset(&mut self) -> bool {
        match persistence::load_universe(&self.save_path) {
            Some(bodies) => {
                self.replace_bodies(bodies);
                true
            }
            None => {
                self.bodies.reset();
                false
            }
        }
    }

    /// Install a restored body list, keeping the current gravity knobs.
    pub fn replace_bodies(&mut self, bodies: Vec<Body>) {
        self.bodies = BodySet::from_bodies(bodies, self.bodies.params().clone());
    }
}

enum SceneKind {
    Geodesics(ParticleField),
    Sandbox(SimulationState),
}

/// One runnable scene picked from [`scene_catalog`].
pub struct Engine {
    scene_id: &'static str,
    scene: SceneKind,
}

impl Engine {
    pub fn new_builtin(scene_id: &str, cfg: &SandboxConfig) -> Result<Self, EngineError> {
        let scene_id = normalize_scene_id(scene_id)
            .ok_or_else(|| EngineError::UnknownScene(scene_id.to_string()))?;
        cfg.validate()?;
        let scene = match scene_id {
            SCENE_GEODESICS => SceneKind::Geodesics(ParticleField::populated(cfg.geodesic.clone())),
            _ => SceneKind::Sandbox(SimulationState::new(cfg)),
        };
        log::info!("built scene '{}'", scene_id);
        Ok(Self { scene_id, scene })
    }

    pub fn scene_id(&self) -> &'static str { self.scene_id }

    pub fn len(&self) -> usize {
        match &self.scene {
            SceneKind::Geodesics(field) => field.len(),
            SceneKind::Sandbox(state) => state.bodies().len(),
        }
    }

    pub fn is_empty(&self) -> bool { self.len() == 0 }

    pub fn tick(&mut self) {
        match &mut self.scene {
            SceneKind::Geodesics(field) => {
                #[cfg(feature = "parallel")]
                field.step_par();
                #[cfg(not(feature = "parallel"))]
                field.step();
            }
            SceneKind::Sandbox(state) => state.tick(),
        }
    }

    pub fn particles(&self) -> Option<&ParticleField> {
        match &self.scene {
            SceneKind::Geodesics(field) => Some(field),
            SceneKind::Sandbox(_) => None,
        }
    }

    pub fn particles_mut(&mut self) -> Option<&mut ParticleField> {
        match &mut self.scene {
            SceneKind::Geodesics(field) => Some(field),
            SceneKind::Sandbox(_) => None,
        }
    }

    pub fn sandbox(&self) -> Option<&SimulationState> {
        match &self.scene {
            SceneKind::Sandbox(state) => Some(state),
            SceneKind::Geodesics(_) => None,
        }
    }

    pub fn sandbox_mut(&mut self) -> Option<&mut SimulationState> {
        match &mut self.scene {
            SceneKind::Sandbox(state) => Some(state),
            SceneKind::Geodesics(_) => None,
        }
    }

    /// `[x, y, z]` per live object; geodesic particles sit on `z = 0`.
    pub fn positions_flat(&self) -> Vec<f32> {
        match &self.scene {
            SceneKind::Geodesics(field) => {
                let mut out = Vec::with_capacity(field.len() * 3);
                for [x, y] in field.positions() {
                    out.push(x as f32);
                    out.push(y as f32);
                    out.push(0.0);
                }
                out
            }
            SceneKind::Sandbox(state) => {
                let bodies = state.bodies().bodies();
                let mut out = Vec::with_capacity(bodies.len() * 3);
                for b in bodies {
                    out.push(b.position.x as f32);
                    out.push(b.position.y as f32);
                    out.push(b.position.z as f32);
                }
                out
            }
        }
    }
}

fn normalize_scene_id(id: &str) -> Option<&'static str> {
    match id {
        SCENE_GEODESICS => Some(SCENE_GEODESICS),
        SCENE_SOLAR_SYSTEM => Some(SCENE_SOLAR_SYSTEM),
        _ => None,
    }
}
