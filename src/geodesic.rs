//! Planar geodesic motion around a Schwarzschild black hole (G = c = M = 1).
//!
//! State is `(r, p, φ)` with `p = dr/dλ`; the angular momentum `L` is a
//! per-particle constant. The system integrated here is
//!
//! ```text
//! dr/dλ = p
//! dp/dλ = L²/r³ − 3L²/r⁴ + κ(−1/r² + 1/r³)
//! dφ/dλ = L/r²
//! ```
//!
//! with κ = 0 for light and κ = 1 for massive test particles.

use serde::{Deserialize, Serialize};

/// Radius at or below which the angular rate is pinned to zero.
pub const ANGULAR_RATE_CUTOFF: f64 = 0.1;

/// Which effective potential the test particles feel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Potential {
    /// Null geodesics (κ = 0).
    #[default]
    Photon,
    /// Timelike geodesics (κ = 1).
    Massive,
}

impl Potential {
    pub fn kappa(self) -> f64 {
        match self {
            Potential::Photon => 0.0,
            Potential::Massive => 1.0,
        }
    }
}

/// `(r, p, φ)` for one test particle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeodesicState {
    pub radius: f64,
    pub radial_momentum: f64,
    pub angle: f64,
}

impl GeodesicState {
    pub fn new(radius: f64, radial_momentum: f64, angle: f64) -> Self {
        Self {
            radius,
            radial_momentum,
            angle,
        }
    }

    /// Cartesian `(r cosφ, r sinφ)`.
    pub fn cartesian(&self) -> [f64; 2] {
        [self.radius * self.angle.cos(), self.radius * self.angle.sin()]
    }
}

/// `d²r/dλ²` for angular momentum `l`. Zero for `r <= 0`.
pub fn radial_acceleration(r: f64, l: f64, potential: Potential) -> f64 {
    if r <= 0.0 {
        return 0.0;
    }
    let l2 = l * l;
    let r2 = r * r;
    let r3 = r2 * r;
    let r4 = r3 * r;
    let centrifugal = l2 / r3 - 3.0 * l2 / r4;
    let newtonian = potential.kappa() * (-1.0 / r2 + 1.0 / r3);
    centrifugal + newtonian
}

/// One classical RK4 step of size `h`.
///
/// Never fails. The caller checks the new radius against its capture
/// boundary.
pub fn rk4_step(state: GeodesicState, l: f64, h: f64, potential: Potential) -> GeodesicState {
    let GeodesicState {
        radius: r,
        radial_momentum: p,
        angle: phi,
    } = state;

    // The angular cutoff keys off the radius at the start of the step.
    let spinning = r > ANGULAR_RATE_CUTOFF;
    let angular_rate = |radius: f64| if spinning { l / (radius * radius) } else { 0.0 };

    // k1
    let k1_r = p;
    let k1_p = radial_acceleration(r, l, potential);
    let k1_phi = angular_rate(r);

    // k2
    let r2 = r + 0.5 * h * k1_r;
    let k2_r = p + 0.5 * h * k1_p;
    let k2_p = radial_acceleration(r2, l, potential);
    let k2_phi = angular_rate(r2);

    // k3
    let r3 = r + 0.5 * h * k2_r;
    let k3_r = p + 0.5 * h * k2_p;
    let k3_p = radial_acceleration(r3, l, potential);
    let k3_phi = angular_rate(r3);

    // k4
    let r4 = r + h * k3_r;
    let k4_r = p + h * k3_p;
    let k4_p = radial_acceleration(r4, l, potential);
    let k4_phi = angular_rate(r4);

    GeodesicState {
        radius: r + (h / 6.0) * (k1_r + 2.0 * k2_r + 2.0 * k3_r + k4_r),
        radial_momentum: p + (h / 6.0) * (k1_p + 2.0 * k2_p + 2.0 * k3_p + k4_p),
        angle: phi + (h / 6.0) * (k1_phi + 2.0 * k2_phi + 2.0 * k3_phi + k4_phi),
    }
}
