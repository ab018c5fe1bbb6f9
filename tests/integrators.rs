use orbiverse::geodesic::{self, GeodesicState, Potential};
use orbiverse::gravity;
use orbiverse::persistence;
use orbiverse::{Body, BodySet, GeodesicParams, GravityParams, ParticleField, Vec3};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const HORIZON: f64 = 2.0;

/// Gravity parameters with the sandbox defaults and a fixed seed.
pub fn gravity_params() -> GravityParams {
    GravityParams {
        seed: Some(42),
        ..GravityParams::default()
    }
}

/// Empty photon field with a fixed seed.
pub fn photon_field() -> ParticleField {
    ParticleField::new(GeodesicParams {
        horizon_radius: HORIZON,
        seed: Some(42),
        ..GeodesicParams::default()
    })
}

/// Heavy sun at the origin and an Earth-like body 200 units out along x.
pub fn sun_and_planet() -> BodySet {
    BodySet::from_bodies(
        vec![
            Body::new(Vec3::zeros(), Vec3::zeros(), 15.0, [1.0, 0.8, 0.2], Some(50000.0)),
            Body::new(Vec3::new(200.0, 0.0, 0.0), Vec3::new(0.0, 0.0, 30.0), 8.0, [0.0, 0.5, 1.0], Some(8.0)),
        ],
        gravity_params(),
    )
}

pub fn three_bodies() -> Vec<Body> {
    vec![
        Body::new(Vec3::zeros(), Vec3::zeros(), 10.0, [1.0, 1.0, 0.0], Some(20000.0)),
        Body::new(Vec3::new(120.0, 0.0, 0.0), Vec3::new(0.0, 0.0, 20.0), 4.0, [0.0, 0.0, 1.0], None),
        Body::new(Vec3::new(-80.0, 10.0, 0.0), Vec3::new(0.0, -5.0, 15.0), 2.0, [1.0, 0.0, 0.0], None),
    ]
}

fn doubled_mass(b: &Body) -> Body {
    Body::new(b.position, b.velocity, b.radius(), b.color(), Some(2.0 * b.mass()))
}

fn close(a: &Vec3, b: &Vec3, eps: f64) -> bool {
    (a - b).norm() < eps
}

// ==================================================================================
// Geodesic integrator
// ==================================================================================

#[test]
fn zero_step_returns_input_state() {
    let s = GeodesicState::new(6.3, -0.42, 1.7);
    for potential in [Potential::Photon, Potential::Massive] {
        let next = geodesic::rk4_step(s, 3.5, 0.0, potential);
        assert_eq!(next, s);
    }
}

#[test]
fn photon_sphere_orbit_keeps_its_radius() {
    // r = 3 is where L²/r³ and 3L²/r⁴ cancel
    let l = 4.0;
    let mut s = GeodesicState::new(3.0, 0.0, 0.0);
    for _ in 0..500 {
        s = geodesic::rk4_step(s, l, 0.01, Potential::Photon);
    }
    assert!((s.radius - 3.0).abs() < 1e-9, "radius drifted to {}", s.radius);
    let expected_angle = 500.0 * 0.01 * l / 9.0;
    assert!((s.angle - expected_angle).abs() < 1e-9);
}

#[test]
fn rk4_matches_small_step_reference() {
    // One coarse step against many fine ones.
    let l = 3.2;
    let start = GeodesicState::new(7.0, 0.1, 0.3);
    let coarse = geodesic::rk4_step(start, l, 0.1, Potential::Massive);
    let mut fine = start;
    for _ in 0..100 {
        fine = geodesic::rk4_step(fine, l, 0.001, Potential::Massive);
    }
    assert!((coarse.radius - fine.radius).abs() < 1e-6);
    assert!((coarse.radial_momentum - fine.radial_momentum).abs() < 1e-6);
    assert!((coarse.angle - fine.angle).abs() < 1e-6);
}

// ==================================================================================
// Particle field
// ==================================================================================

#[test]
fn particle_inside_capture_radius_is_dropped_on_first_step() {
    let mut field = photon_field();
    field.insert(3.0, 0.3 * HORIZON, 0.0);
    field.insert(3.0, 8.0, 0.0);

    let live = field.step();
    assert_eq!(live.len(), 1);
    assert!(live[0].radius() > 0.9 * HORIZON);
    assert_eq!(field.captured(), 1);
}

#[test]
fn photon_started_just_outside_horizon_falls_in() {
    let mut field = photon_field();
    field.insert(3.0, 0.95 * HORIZON, 0.0);

    let mut steps = 0;
    while !field.is_empty() {
        let l = field.particles()[0].angular_momentum();
        field.step();
        if let Some(p) = field.particles().first() {
            assert_eq!(p.angular_momentum(), l);
        }
        steps += 1;
        assert!(steps < 2_000, "particle never crossed the capture radius");
    }
    assert_eq!(field.captured(), 1);
}

#[test]
fn angular_momentum_is_never_mutated() {
    let mut field = photon_field();
    field.spawn(64);
    let before: Vec<f64> = field.particles().iter().map(|p| p.angular_momentum()).collect();
    for _ in 0..50 {
        field.step();
    }
    // Every particle starts at r >= 4 with p = 0, far from the hole for 50 small steps.
    let after: Vec<f64> = field.particles().iter().map(|p| p.angular_momentum()).collect();
    assert_eq!(before.len(), after.len());
    assert_eq!(before, after);
}

#[test]
fn trail_tracks_cartesian_position() {
    let mut field = photon_field();
    field.insert(4.0, 8.0, 0.5);
    field.step();
    let p = &field.particles()[0];
    let [x, y] = p.trail().latest().expect("one sample");
    assert!((x - p.radius() * p.angle().cos()).abs() < 1e-12);
    assert!((y - p.radius() * p.angle().sin()).abs() < 1e-12);
}

// ==================================================================================
// Gravity integrator
// ==================================================================================

#[test]
fn softened_pair_contributes_nothing() {
    let here = Vec3::zeros();
    let there = Vec3::new(0.2, 0.1, 0.0); // r² = 0.05 < 0.1
    for mass in [1.0, 1e6, 1e15] {
        let a = gravity::pair_acceleration(&here, &there, mass, 5000.0, 0.1);
        assert_eq!(a, Vec3::zeros());
    }
}

#[test]
fn acceleration_points_at_the_other_body() {
    let here = Vec3::new(1.0, 2.0, 3.0);
    let there = Vec3::new(4.0, -2.0, 3.0);
    let a = gravity::pair_acceleration(&here, &there, 10.0, 1.0, 0.1);
    assert!(a.dot(&(there - here)) > 0.0);
    assert!((a.norm() - 10.0 / 25.0).abs() < 1e-12);
}

#[test]
fn acceleration_scales_with_other_mass_only() {
    let bodies = vec![
        Body::new(Vec3::zeros(), Vec3::zeros(), 1.0, [1.0; 3], Some(3.0)),
        Body::new(Vec3::new(10.0, 0.0, 0.0), Vec3::zeros(), 1.0, [1.0; 3], Some(12.0)),
    ];
    let on_a = gravity::acceleration_on(0, &bodies, 5000.0, 0.1);
    let on_b = gravity::acceleration_on(1, &bodies, 5000.0, 0.1);

    // A feels B's mass, B feels A's mass: 12 / 3 = 4.
    assert!((on_a.norm() / on_b.norm() - 4.0).abs() < 1e-12);
    assert!((on_a + on_b).norm() > 1.0, "unequal masses must not cancel");

    let mut heavier = bodies.clone();
    heavier[1] = doubled_mass(&bodies[1]);
    let on_a_heavier = gravity::acceleration_on(0, &heavier, 5000.0, 0.1);
    assert!((on_a_heavier.norm() - 2.0 * on_a.norm()).abs() < 1e-9);

    let mut heavier_self = bodies.clone();
    heavier_self[0] = doubled_mass(&bodies[0]);
    assert_eq!(gravity::acceleration_on(0, &heavier_self, 5000.0, 0.1), on_a);
}

#[test]
fn inverse_square_law() {
    let a1 = gravity::pair_acceleration(&Vec3::zeros(), &Vec3::new(10.0, 0.0, 0.0), 1.0, 1.0, 0.1);
    let a2 = gravity::pair_acceleration(&Vec3::zeros(), &Vec3::new(20.0, 0.0, 0.0), 1.0, 1.0, 0.1);
    assert!((a1.norm() / a2.norm() - 4.0).abs() < 1e-12);
}

// ==================================================================================
// Body set
// ==================================================================================

#[test]
fn planet_moves_by_post_step_velocity_and_speeds_up() {
    let mut set = sun_and_planet();
    let before = set.bodies()[1].clone();
    let dt = 0.01;

    set.step(dt, false);

    let after = &set.bodies()[1];
    let displacement = after.position - before.position;
    assert!(close(&displacement, &(after.velocity * dt), 1e-12));
    assert!(after.speed() > before.speed());
    // pulled toward the sun along -x
    assert!(after.velocity.x < 0.0);
}

#[test]
fn later_bodies_see_earlier_bodies_already_moved() {
    let mut set = sun_and_planet();
    let dt = 0.01;
    let g = set.params().effective_g();
    let softening = set.params().softening;
    let planet_before = set.bodies()[1].clone();

    set.step(dt, false);

    let sun_after = &set.bodies()[0];
    let expected_acc = gravity::pair_acceleration(
        &planet_before.position,
        &sun_after.position,
        sun_after.mass(),
        g,
        softening,
    );
    let expected_velocity = planet_before.velocity + expected_acc * dt;
    assert!(close(&set.bodies()[1].velocity, &expected_velocity, 1e-12));
}

#[test]
fn body_spawned_mid_tick_joins_after_the_tick() {
    let dt = 0.01;
    let mut reference = BodySet::from_bodies(three_bodies(), gravity_params());
    reference.step(dt, false);

    let newcomer = Body::new(Vec3::new(5.0, 5.0, 0.0), Vec3::new(1.0, 0.0, 0.0), 12.0, [1.0, 0.9, 0.4], Some(30000.0));
    let mut set = BodySet::from_bodies(three_bodies(), gravity_params());
    let mut visited = Vec::new();
    set.step_with(dt, false, |i, _, spawns| {
        visited.push(i);
        if i == 1 {
            spawns.push(newcomer.clone());
        }
    });

    // only the three original bodies were integrated, none of them felt the newcomer
    assert_eq!(visited, vec![0, 1, 2]);
    assert_eq!(set.len(), 4);
    assert_eq!(&set.bodies()[..3], reference.bodies());
    assert_eq!(set.bodies()[3], newcomer);

    // from the next tick on it pulls like everyone else
    let mut without = BodySet::from_bodies(reference.bodies().to_vec(), gravity_params());
    without.step(dt, false);
    set.step(dt, false);
    assert_ne!(set.bodies()[0].velocity, without.bodies()[0].velocity);
}

#[test]
fn inserted_body_participates_from_next_step() {
    let dt = 0.01;
    let mut set = BodySet::from_bodies(three_bodies(), gravity_params());
    set.insert(Body::star_at(Vec3::new(0.0, 50.0, 0.0)));
    assert_eq!(set.len(), 4);
    let before = set.bodies()[0].velocity;
    set.step(dt, false);
    // the star sits straight above the central body
    assert!(set.bodies()[0].velocity.y - before.y > 0.0);
}

#[test]
fn paused_set_does_not_move() {
    let mut set = BodySet::from_bodies(three_bodies(), gravity_params());
    set.step(0.01, true);
    assert_eq!(set.bodies(), &three_bodies()[..]);
}

// ==================================================================================
// Persistence
// ==================================================================================

#[test]
fn five_body_round_trip_is_exact() {
    let mut rng = StdRng::seed_from_u64(7);
    let bodies: Vec<Body> = (0..5)
        .map(|_| {
            Body::new(
                Vec3::new(rng.gen_range(-900.0..900.0), rng.gen_range(-900.0..900.0), rng.gen_range(-900.0..900.0)),
                Vec3::new(rng.gen_range(-30.0..30.0), rng.gen_range(-30.0..30.0), rng.gen_range(-30.0..30.0)),
                rng.gen_range(0.5..20.0),
                [rng.gen_range(0.0..1.0), rng.gen_range(0.0..1.0), rng.gen_range(0.0..1.0)],
                Some(rng.gen_range(1.0..60000.0)),
            )
        })
        .collect();
    let set = BodySet::from_bodies(bodies.clone(), gravity_params());

    let records = persistence::serialize(&set);
    assert_eq!(records.len(), 5);
    let restored = persistence::deserialize(&records).expect("valid records");
    assert_eq!(restored, bodies);

    let json = persistence::to_json(&set).expect("encode");
    let from_text = persistence::from_json(&json).expect("decode");
    assert_eq!(from_text, bodies);
}

#[test]
fn malformed_json_means_no_prior_state() {
    assert!(persistence::from_json("{ not a list }").is_none());
    assert!(persistence::from_json("").is_none());
}
