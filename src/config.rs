//! Scalar knobs consumed when the scenes are constructed.
//!
//! Every struct here is `serde`-friendly and fills missing fields from its
//! `Default`, so a config file only needs to name what it overrides:
//!
//! ```json
//! {
//!   "geodesic": { "potential": "massive", "particle_count": 200 },
//!   "gravity":  { "gravity_multiplier": 0.5, "seed": 7 }
//! }
//! ```

use std::path::{Path, PathBuf};

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::Vec3;
use crate::error::ConfigError;
use crate::geodesic::Potential;

pub const DEFAULT_HORIZON_RADIUS: f64 = 2.0;
pub const DEFAULT_CAPTURE_MULTIPLIER: f64 = 0.9;
pub const DEFAULT_PARTICLE_COUNT: usize = 1000;
pub const DEFAULT_TRAIL_CAPACITY: usize = 100;
pub const DEFAULT_MIN_ANGULAR_MOMENTUM: f64 = 2.0;
pub const DEFAULT_MAX_ANGULAR_MOMENTUM: f64 = 5.0;
pub const DEFAULT_MIN_INITIAL_RADIUS: f64 = 4.0;
pub const DEFAULT_MAX_INITIAL_RADIUS: f64 = 10.0;
pub const DEFAULT_AFFINE_STEP: f64 = 0.01;

pub const DEFAULT_G: f64 = 5000.0;
pub const DEFAULT_GRAVITY_MULTIPLIER: f64 = 1.0;
pub const DEFAULT_SOFTENING: f64 = 0.1;
pub const DEFAULT_DT: f64 = 0.01;
pub const DEFAULT_ASTEROID_COUNT: usize = 30;

pub const DEFAULT_CAMERA_POSITION: [f64; 3] = [0.0, 0.0, 100.0];
pub const DEFAULT_ZOOM: f64 = 1.0;
pub const DEFAULT_ZOOM_SPEED: f64 = 1.1;
pub const MIN_ZOOM: f64 = 0.1;
pub const MAX_ZOOM: f64 = 10.0;
pub const DEFAULT_PAN_SENSITIVITY: f64 = 0.7;
pub const DEFAULT_VIEWPORT: [f64; 2] = [1000.0, 800.0];

pub const DEFAULT_SAVE_PATH: &str = "saves/auto_save.json";

/// Closed interval `[min, max]` used for uniform sampling.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Interval {
    pub min: f64,
    pub max: f64,
}

impl Interval {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Uniform draw. A degenerate interval (`min == max`) always yields `min`.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        rng.gen_range(self.min..=self.max)
    }

    fn validate(&self, field: &'static str) -> Result<(), ConfigError> {
        if !(self.min.is_finite() && self.max.is_finite()) {
            return Err(ConfigError::invalid(field, "bounds must be finite"));
        }
        if self.min > self.max {
            return Err(ConfigError::invalid(
                field,
                format!("min {} exceeds max {}", self.min, self.max),
            ));
        }
        Ok(())
    }
}

/// Knobs for the black-hole photon/particle demo.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeodesicParams {
    pub horizon_radius: f64,
    /// Particles below `horizon_radius * capture_multiplier` are retired.
    pub capture_multiplier: f64,
    pub potential: Potential,
    pub particle_count: usize,
    pub trail_capacity: usize,
    pub angular_momentum: Interval,
    pub initial_radius: Interval,
    /// Affine-parameter increment per frame.
    pub step_size: f64,
    pub seed: Option<u64>,
}

impl Default for GeodesicParams {
    fn default() -> Self {
        Self {
            horizon_radius: DEFAULT_HORIZON_RADIUS,
            capture_multiplier: DEFAULT_CAPTURE_MULTIPLIER,
            potential: Potential::Photon,
            particle_count: DEFAULT_PARTICLE_COUNT,
            trail_capacity: DEFAULT_TRAIL_CAPACITY,
            angular_momentum: Interval::new(DEFAULT_MIN_ANGULAR_MOMENTUM, DEFAULT_MAX_ANGULAR_MOMENTUM),
            initial_radius: Interval::new(DEFAULT_MIN_INITIAL_RADIUS, DEFAULT_MAX_INITIAL_RADIUS),
            step_size: DEFAULT_AFFINE_STEP,
            seed: None,
        }
    }
}

impl GeodesicParams {
    pub fn capture_radius(&self) -> f64 {
        self.horizon_radius * self.capture_multiplier
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("geodesic.horizon_radius", self.horizon_radius)?;
        positive("geodesic.capture_multiplier", self.capture_multiplier)?;
        positive("geodesic.step_size", self.step_size)?;
        if self.trail_capacity == 0 {
            return Err(ConfigError::invalid("geodesic.trail_capacity", "must be at least 1"));
        }
        self.angular_momentum.validate("geodesic.angular_momentum")?;
        if self.angular_momentum.min <= 0.0 {
            return Err(ConfigError::invalid(
                "geodesic.angular_momentum",
                "angular momentum must be positive",
            ));
        }
        self.initial_radius.validate("geodesic.initial_radius")?;
        if self.initial_radius.min <= 0.0 {
            return Err(ConfigError::invalid("geodesic.initial_radius", "radius must be positive"));
        }
        Ok(())
    }
}

/// Knobs for the N-body sandbox.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GravityParams {
    pub g: f64,
    /// User-facing scale on `g`.
    pub gravity_multiplier: f64,
    /// Squared-distance floor; closer pairs contribute nothing.
    pub softening: f64,
    pub dt: f64,
    pub asteroid_count: usize,
    pub seed: Option<u64>,
}

impl Default for GravityParams {
    fn default() -> Self {
        Self {
            g: DEFAULT_G,
            gravity_multiplier: DEFAULT_GRAVITY_MULTIPLIER,
            softening: DEFAULT_SOFTENING,
            dt: DEFAULT_DT,
            asteroid_count: DEFAULT_ASTEROID_COUNT,
            seed: None,
        }
    }
}

impl GravityParams {
    /// Gravitational constant actually fed to the integrator.
    pub fn effective_g(&self) -> f64 {
        self.g * self.gravity_multiplier
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("gravity.g", self.g)?;
        positive("gravity.gravity_multiplier", self.gravity_multiplier)?;
        positive("gravity.softening", self.softening)?;
        positive("gravity.dt", self.dt)?;
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraParams {
    pub position: [f64; 3],
    pub zoom: f64,
    pub zoom_speed: f64,
    pub pan_sensitivity: f64,
    /// Viewport `[width, height]` in pixels.
    pub viewport: [f64; 2],
}

impl Default for CameraParams {
    fn default() -> Self {
        Self {
            position: DEFAULT_CAMERA_POSITION,
            zoom: DEFAULT_ZOOM,
            zoom_speed: DEFAULT_ZOOM_SPEED,
            pan_sensitivity: DEFAULT_PAN_SENSITIVITY,
            viewport: DEFAULT_VIEWPORT,
        }
    }
}

impl CameraParams {
    pub fn position_vec(&self) -> Vec3 {
        Vec3::from(self.position)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("camera.zoom", self.zoom)?;
        positive("camera.zoom_speed", self.zoom_speed)?;
        positive("camera.pan_sensitivity", self.pan_sensitivity)?;
        positive("camera.viewport.width", self.viewport[0])?;
        positive("camera.viewport.height", self.viewport[1])?;
        Ok(())
    }
}

/// Top-level configuration for both scenes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SandboxConfig {
    pub geodesic: GeodesicParams,
    pub gravity: GravityParams,
    pub camera: CameraParams,
    pub save_path: PathBuf,
}

impl Default for SandboxConfig {
    fn default() -> Self {
        Self {
            geodesic: GeodesicParams::default(),
            gravity: GravityParams::default(),
            camera: CameraParams::default(),
            save_path: PathBuf::from(DEFAULT_SAVE_PATH),
        }
    }
}

impl SandboxConfig {
    /// Parse and validate a JSON document.
    pub fn from_json_str(text: &str) -> Result<Self, ConfigError> {
        let cfg: SandboxConfig = serde_json::from_str(text)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&text)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.geodesic.validate()?;
        self.gravity.validate()?;
        self.camera.validate()?;
        Ok(())
    }
}

fn positive(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::invalid(field, format!("expected a positive number, got {}", value)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        SandboxConfig::default().validate().expect("defaults must validate");
    }

    #[test]
    fn partial_json_falls_back_to_defaults() {
        let cfg = SandboxConfig::from_json_str(
            r#"{ "geodesic": { "potential": "massive", "particle_count": 12 },
                 "gravity": { "gravity_multiplier": 0.5 } }"#,
        )
        .expect("partial config");

        assert_eq!(cfg.geodesic.potential, Potential::Massive);
        assert_eq!(cfg.geodesic.particle_count, 12);
        assert_eq!(cfg.geodesic.trail_capacity, DEFAULT_TRAIL_CAPACITY);
        assert!((cfg.gravity.effective_g() - 2500.0).abs() < 1e-12);
        assert_eq!(cfg.camera, CameraParams::default());
    }

    #[test]
    fn rejects_non_positive_softening() {
        let err = SandboxConfig::from_json_str(r#"{ "gravity": { "softening": 0.0 } }"#)
            .expect_err("zero softening must be rejected");
        match err {
            ConfigError::Invalid { field, .. } => assert_eq!(field, "gravity.softening"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn rejects_inverted_interval() {
        let mut cfg = SandboxConfig::default();
        cfg.geodesic.initial_radius = Interval::new(10.0, 4.0);
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn rejects_garbage() {
        assert!(matches!(
            SandboxConfig::from_json_str("not json"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn capture_radius_scales_horizon() {
        let p = GeodesicParams::default();
        assert!((p.capture_radius() - 1.8).abs() < 1e-12);
    }
}
