//! Direct-sum Newtonian gravity with a hard softening cut, advanced by
//! semi-implicit Euler.

use crate::Vec3;
use crate::models::bodies::Body;

/// Acceleration felt at `self_pos` due to a point mass at `other_pos`.
///
/// Pairs with `|r|² < softening` contribute exactly zero, whatever the mass.
pub fn pair_acceleration(self_pos: &Vec3, other_pos: &Vec3, other_mass: f64, g: f64, softening: f64) -> Vec3 {
    let r_vec = other_pos - self_pos;
    let r_sq = r_vec.norm_squared();
    if r_sq < softening {
        return Vec3::zeros();
    }
    let r = r_sq.sqrt();
    let force_mag = g * other_mass / r_sq;
    r_vec * (force_mag / r)
}

/// Net acceleration on `bodies[index]` from every other body, as the slice
/// currently stands.
pub fn acceleration_on(index: usize, bodies: &[Body], g: f64, softening: f64) -> Vec3 {
    let self_pos = bodies[index].position;
    let mut acc = Vec3::zeros();
    for (j, other) in bodies.iter().enumerate() {
        if j == index {
            continue;
        }
        acc += pair_acceleration(&self_pos, &other.position, other.mass(), g, softening);
    }
    acc
}

/// `v += a·dt`, then `x += v·dt` with the updated velocity.
pub fn euler_advance(body: &mut Body, acc: &Vec3, dt: f64) {
    body.velocity += acc * dt;
    body.position += body.velocity * dt;
}

/// Compute and apply one step for `bodies[index]` in place.
pub fn step_body(index: usize, bodies: &mut [Body], g: f64, softening: f64, dt: f64) {
    let acc = acceleration_on(index, bodies, g, softening);
    euler_advance(&mut bodies[index], &acc, dt);
}
