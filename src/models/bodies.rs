use crate::Vec3;
use crate::config::{GravityParams, Interval};
use crate::gravity;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Mass assigned per unit radius when a body is created without one.
pub const MASS_PER_RADIUS: f64 = 100.0;

pub const PLANET_RADIUS: f64 = 3.0;
pub const PLANET_COLOR: Rgb = [0.4, 0.6, 1.0];
pub const PLANET_SPEED: Interval = Interval::new(-5.0, 5.0);

pub const STAR_RADIUS: f64 = 12.0;
pub const STAR_COLOR: Rgb = [1.0, 0.9, 0.4];
pub const STAR_MASS: f64 = 30000.0;

pub const ASTEROID_COLOR: Rgb = [0.5, 0.5, 0.5];

/// Linear RGB, each channel in `[0, 1]`.
pub type Rgb = [f64; 3];

/// A gravitating sphere. Radius, color and mass never change after creation;
/// only the integrator moves `position` and `velocity`.
#[derive(Debug, Clone, PartialEq)]
pub struct Body {
    pub position: Vec3,
    pub velocity: Vec3,
    radius: f64,
    color: Rgb,
    mass: f64,
}

impl Body {
    /// A missing or non-positive `mass` is replaced by `radius * MASS_PER_RADIUS`.
    /// Color channels are clamped to `[0, 1]`.
    pub fn new(position: Vec3, velocity: Vec3, radius: f64, color: Rgb, mass: Option<f64>) -> Self {
        let mass = mass
            .filter(|m| *m > 0.0)
            .unwrap_or(radius * MASS_PER_RADIUS);
        Self {
            position,
            velocity,
            radius,
            color: color.map(|c| c.clamp(0.0, 1.0)),
            mass,
        }
    }

    pub fn radius(&self) -> f64 { self.radius }
    pub fn color(&self) -> Rgb { self.color }
    pub fn mass(&self) -> f64 { self.mass }

    pub fn speed(&self) -> f64 {
        self.velocity.norm()
    }

    /// Small blue planet with a random in-plane drift.
    pub fn planet_at<R: Rng + ?Sized>(position: Vec3, rng: &mut R) -> Self {
        let velocity = Vec3::new(PLANET_SPEED.sample(rng), PLANET_SPEED.sample(rng), 0.0);
        Body::new(position, velocity, PLANET_RADIUS, PLANET_COLOR, None)
    }

    /// Heavy star at rest.
    pub fn star_at(position: Vec3) -> Self {
        Body::new(position, Vec3::zeros(), STAR_RADIUS, STAR_COLOR, Some(STAR_MASS))
    }
}

/// Sun, three planets on roughly circular starts, and a cloud of asteroids.
pub fn seed_constellation<R: Rng + ?Sized>(asteroid_count: usize, rng: &mut R) -> Vec<Body> {
    let mut bodies = Vec::with_capacity(4 + asteroid_count);
    // Sun
    bodies.push(Body::new(Vec3::zeros(), Vec3::zeros(), 15.0, [1.0, 0.8, 0.2], Some(50000.0)));
    // Earth
    bodies.push(Body::new(
        Vec3::new(200.0, 0.0, 0.0),
        Vec3::new(0.0, 0.0, 30.0),
        8.0,
        [0.0, 0.5, 1.0],
        None,
    ));
    // Mars
    bodies.push(Body::new(
        Vec3::new(350.0, 0.0, 0.0),
        Vec3::new(0.0, 0.0, 25.0),
        6.0,
        [0.6, 0.4, 0.2],
        None,
    ));
    // Jupiter
    bodies.push(Body::new(
        Vec3::new(500.0, 0.0, 0.0),
        Vec3::new(0.0, 0.0, 18.0),
        12.0,
        [0.9, 0.7, 0.3],
        None,
    ));

    let spread = Interval::new(100.0, 800.0);
    let height = Interval::new(-20.0, 20.0);
    let drift = Interval::new(-5.0, 5.0);
    let lift = Interval::new(-1.0, 1.0);
    let size = Interval::new(1.5, 3.0);
    for _ in 0..asteroid_count {
        let position = Vec3::new(spread.sample(rng), height.sample(rng), spread.sample(rng));
        let velocity = Vec3::new(drift.sample(rng), lift.sample(rng), drift.sample(rng));
        bodies.push(Body::new(position, velocity, size.sample(rng), ASTEROID_COLOR, None));
    }
    bodies
}

/// Owns every gravitating body of the sandbox.
///
/// Bodies are updated one after another, in place: when body `i` is pushed,
/// bodies `0..i` already sit at their new positions for this tick. Bodies
/// spawned during a tick go to a pending list and join once it finishes.
#[derive(Debug)]
pub struct BodySet {
    bodies: Vec<Body>,
    pending: Vec<Body>,
    params: GravityParams,
    rng: StdRng,
}

impl BodySet {
    /// Fresh seed constellation.
    pub fn new(params: GravityParams) -> Self {
        let mut set = Self::from_bodies(Vec::new(), params);
        set.reset();
        set
    }

    /// Wrap an existing list, e.g. one restored from a save file.
    pub fn from_bodies(bodies: Vec<Body>, params: GravityParams) -> Self {
        let rng = match params.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            bodies,
            pending: Vec::new(),
            params,
            rng,
        }
    }

    pub fn len(&self) -> usize { self.bodies.len() }

    pub fn is_empty(&self) -> bool { self.bodies.is_empty() }

    pub fn bodies(&self) -> &[Body] { &self.bodies }

    pub fn pending(&self) -> &[Body] { &self.pending }

    pub fn params(&self) -> &GravityParams { &self.params }

    pub fn set_gravity_multiplier(&mut self, multiplier: f64) {
        self.params.gravity_multiplier = multiplier;
    }

    /// Append immediately. The body feels and exerts gravity from the next
    /// `step` on.
    pub fn insert(&mut self, body: Body) {
        log::debug!(
            "inserted body r={} m={} at {:?}",
            body.radius(),
            body.mass(),
            body.position.as_slice()
        );
        self.bodies.push(body);
    }

    /// Build and [`insert`](BodySet::insert) a body from its parts.
    pub fn add_body(&mut self, position: Vec3, velocity: Vec3, radius: f64, color: Rgb, mass: Option<f64>) {
        self.insert(Body::new(position, velocity, radius, color, mass));
    }

    /// Defer until the end of the current (or next) tick.
    pub fn queue(&mut self, body: Body) {
        self.pending.push(body);
    }

    pub fn spawn_planet(&mut self, position: Vec3) {
        let body = Body::planet_at(position, &mut self.rng);
        self.insert(body);
    }

    pub fn spawn_star(&mut self, position: Vec3) {
        self.insert(Body::star_at(position));
    }

    /// Replace everything with a new seed constellation.
    pub fn reset(&mut self) {
        self.bodies = seed_constellation(self.params.asteroid_count, &mut self.rng);
        self.pending.clear();
        log::info!("seeded {} bodies", self.bodies.len());
    }

    /// Advance every body by `dt` unless `paused`.
    pub fn step(&mut self, dt: f64, paused: bool) {
        self.step_with(dt, paused, |_, _, _| {});
    }

    /// Like [`BodySet::step`], calling `on_body(i, body, spawns)` right after
    /// body `i` moves. Anything pushed to `spawns` is appended once every
    /// body that existed at the start of the tick has been visited.
    ///
    /// When paused no body moves and the hook is not called, but previously
    /// queued bodies are still merged.
    pub fn step_with<F>(&mut self, dt: f64, paused: bool, mut on_body: F)
    where
        F: FnMut(usize, &Body, &mut Vec<Body>),
    {
        if !paused {
            let g = self.params.effective_g();
            let softening = self.params.softening;
            let n = self.bodies.len();
            for i in 0..n {
                gravity::step_body(i, &mut self.bodies, g, softening, dt);
                on_body(i, &self.bodies[i], &mut self.pending);
            }
        }
        self.flush_pending();
    }

    fn flush_pending(&mut self) {
        if self.pending.is_empty() {
            return;
        }
        log::debug!("merging {} spawned bodies", self.pending.len());
        self.bodies.append(&mut self.pending);
    }
}
