//! Numerical core of a two-scene gravity sandbox: RK4 geodesics around a
//! Schwarzschild black hole, and a direct-sum N-body system with live
//! spawning and save/restore.
//!
//! A frame loop owns either a [`ParticleField`] or a [`SimulationState`]
//! and calls `step`/`tick` once per frame, then reads positions back for
//! drawing. Nothing in here renders or blocks.

use nalgebra::Vector3;

pub mod config;
pub mod engine;
pub mod error;
pub mod geodesic;
pub mod gravity;
pub mod models;
pub mod persistence;

#[cfg(target_arch = "wasm32")]
pub mod wasm;

/// World-space vector, double precision throughout.
pub type Vec3 = Vector3<f64>;

pub use config::{CameraParams, GeodesicParams, GravityParams, Interval, SandboxConfig};
pub use engine::{Camera, Engine, SimulationState, scene_catalog};
pub use error::{ConfigError, EngineError, PersistError};
pub use geodesic::{GeodesicState, Potential};
pub use models::bodies::{Body, BodySet, Rgb};
pub use models::particles::{ParticleField, TestParticle, Trail};
pub use persistence::{BodyRecord, load_universe, save_universe};
