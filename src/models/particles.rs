use crate::config::GeodesicParams;
use crate::geodesic::{self, GeodesicState, Potential};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::VecDeque;
use std::f64::consts::TAU;

/// Fixed-capacity FIFO of recent Cartesian samples.
#[derive(Debug, Clone, PartialEq)]
pub struct Trail {
    capacity: usize,
    points: VecDeque<[f64; 2]>,
}

impl Trail {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            points: VecDeque::with_capacity(capacity + 1),
        }
    }

    /// Append, dropping the oldest sample once over capacity.
    pub fn push(&mut self, point: [f64; 2]) {
        self.points.push_back(point);
        while self.points.len() > self.capacity {
            self.points.pop_front();
        }
    }

    pub fn len(&self) -> usize { self.points.len() }

    pub fn is_empty(&self) -> bool { self.points.is_empty() }

    pub fn capacity(&self) -> usize { self.capacity }

    pub fn latest(&self) -> Option<[f64; 2]> { self.points.back().copied() }

    /// Oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &[f64; 2]> + '_ {
        self.points.iter()
    }
}

/// Photon or massive test particle orbiting the hole.
#[derive(Debug, Clone, PartialEq)]
pub struct TestParticle {
    angular_momentum: f64,
    state: GeodesicState,
    trail: Trail,
    active: bool,
}

impl TestParticle {
    /// Starts at rest radially: `p = 0`.
    pub fn new(angular_momentum: f64, radius: f64, angle: f64, trail_capacity: usize) -> Self {
        Self {
            angular_momentum,
            state: GeodesicState::new(radius, 0.0, angle),
            trail: Trail::new(trail_capacity),
            active: true,
        }
    }

    pub fn angular_momentum(&self) -> f64 { self.angular_momentum }
    pub fn radius(&self) -> f64 { self.state.radius }
    pub fn radial_momentum(&self) -> f64 { self.state.radial_momentum }
    pub fn angle(&self) -> f64 { self.state.angle }
    pub fn state(&self) -> &GeodesicState { &self.state }
    pub fn trail(&self) -> &Trail { &self.trail }
    pub fn is_active(&self) -> bool { self.active }

    /// Latest Cartesian sample, or the current position before the first step.
    pub fn position(&self) -> [f64; 2] {
        self.trail.latest().unwrap_or_else(|| self.state.cartesian())
    }

    /// Retire if already inside `capture_radius`, otherwise integrate one
    /// step and record the new position. Returns whether it is still active.
    fn advance(&mut self, capture_radius: f64, h: f64, potential: Potential) -> bool {
        if !self.active {
            return false;
        }
        if self.state.radius < capture_radius {
            self.active = false;
            return false;
        }
        self.state = geodesic::rk4_step(self.state, self.angular_momentum, h, potential);
        self.trail.push(self.state.cartesian());
        true
    }
}

/// All live test particles of the black-hole scene.
#[derive(Debug)]
pub struct ParticleField {
    particles: Vec<TestParticle>,
    params: GeodesicParams,
    rng: StdRng,
    captured: usize,
}

impl ParticleField {
    /// Empty field.
    pub fn new(params: GeodesicParams) -> Self {
        let rng = match params.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            particles: Vec::new(),
            params,
            rng,
            captured: 0,
        }
    }

    /// Field pre-populated with `params.particle_count` random particles.
    pub fn populated(params: GeodesicParams) -> Self {
        let count = params.particle_count;
        let mut field = Self::new(params);
        field.spawn(count);
        field
    }

    pub fn len(&self) -> usize { self.particles.len() }

    pub fn is_empty(&self) -> bool { self.particles.is_empty() }

    pub fn particles(&self) -> &[TestParticle] { &self.particles }

    pub fn params(&self) -> &GeodesicParams { &self.params }

    /// Particles retired since construction.
    pub fn captured(&self) -> usize { self.captured }

    pub fn capture_radius(&self) -> f64 { self.params.capture_radius() }

    /// Add `count` particles with `L`, `r` and `φ` drawn uniformly from the
    /// configured ranges.
    pub fn spawn(&mut self, count: usize) {
        self.particles.reserve(count);
        for _ in 0..count {
            let l = self.params.angular_momentum.sample(&mut self.rng);
            let angle = self.rng.gen_range(0.0..TAU);
            let radius = self.params.initial_radius.sample(&mut self.rng);
            self.particles
                .push(TestParticle::new(l, radius, angle, self.params.trail_capacity));
        }
    }

    /// Add one particle at an explicit starting point.
    pub fn insert(&mut self, angular_momentum: f64, radius: f64, angle: f64) {
        self.particles.push(TestParticle::new(
            angular_momentum,
            radius,
            angle,
            self.params.trail_capacity,
        ));
    }

    /// One frame: retire captured particles, integrate the rest.
    /// Returns the survivors.
    pub fn step(&mut self) -> &[TestParticle] {
        let capture = self.capture_radius();
        let h = self.params.step_size;
        let potential = self.params.potential;
        for p in self.particles.iter_mut() {
            p.advance(capture, h, potential);
        }
        self.sweep()
    }

    /// Same as [`ParticleField::step`], integrating particles across the rayon pool.
    #[cfg(feature = "parallel")]
    pub fn step_par(&mut self) -> &[TestParticle] {
        use rayon::prelude::*;
        let capture = self.capture_radius();
        let h = self.params.step_size;
        let potential = self.params.potential;
        self.particles.par_iter_mut().for_each(|p| {
            p.advance(capture, h, potential);
        });
        self.sweep()
    }

    fn sweep(&mut self) -> &[TestParticle] {
        let before = self.particles.len();
        self.particles.retain(|p| p.active);
        let retired = before - self.particles.len();
        if retired > 0 {
            self.captured += retired;
            log::debug!("{} particles crossed the capture radius, {} left", retired, self.particles.len());
        }
        &self.particles
    }

    /// Latest `[x, y]` for every live particle.
    pub fn positions(&self) -> Vec<[f64; 2]> {
        self.particles.iter().map(|p| p.position()).collect()
    }
}
