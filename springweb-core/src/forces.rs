//! Force models: damped springs and ground contact.

use crate::particle::Particle;
use glam::DVec3;

/// The ground is the plane through the origin with this normal.
pub const GROUND_NORMAL: DVec3 = DVec3::Y;

/// Viscoelastic force exerted on `particle_i` by a spring to `particle_j`.
///
/// The force on `particle_j` is the exact negation. A stretched spring pulls
/// `particle_i` toward `particle_j`. Damping only acts along the current
/// spring axis. Coincident endpoints have no axis and produce no force.
pub fn viscoelastic_force(
    particle_i: &Particle,
    particle_j: &Particle,
    ks: f64,
    kd: f64,
    rest_length: f64,
) -> DVec3 {
    let d = particle_j.pos - particle_i.pos;
    let dist = d.length();
    if dist <= 0.0 {
        return DVec3::ZERO;
    }
    let u = d / dist;
    let rel_vel = particle_j.vel - particle_i.vel;

    let spring = u * ((dist - rest_length) * ks);
    let damper = u * (rel_vel.dot(u) * kd);
    spring + damper
}

/// Penalty force for a particle that has sunk below the ground plane.
///
/// The spring term pushes straight up in proportion to the penetration
/// depth. The damping term acts along the direction opposing the current
/// velocity, which makes it a drag on all motion while in contact rather
/// than a pure normal damper. Particles on or above the plane get nothing.
pub fn ground_force(pos: DVec3, vel: DVec3, ks: f64, kd: f64) -> DVec3 {
    let signed_dist = pos.dot(GROUND_NORMAL);
    if signed_dist >= 0.0 {
        return DVec3::ZERO;
    }

    let friction_dir = (-vel).normalize_or_zero();
    let spring = GROUND_NORMAL * (-signed_dist * ks);
    let damper = friction_dir * (vel.dot(friction_dir) * kd);
    spring - damper
}

#[cfg(test)]
mod tests {
    use super::*;

    fn particle(pos: DVec3, vel: DVec3) -> Particle {
        Particle::new(1.0, pos, vel)
    }

    #[test]
    fn stretched_spring_attracts() {
        let a = particle(DVec3::ZERO, DVec3::ZERO);
        let b = particle(DVec3::new(5.0, 0.0, 0.0), DVec3::ZERO);
        let f = viscoelastic_force(&a, &b, 10.0, 3.0, 3.0);
        assert!((f - DVec3::new(20.0, 0.0, 0.0)).length() < 1e-12);
    }

    #[test]
    fn compressed_spring_repels() {
        let a = particle(DVec3::ZERO, DVec3::ZERO);
        let b = particle(DVec3::new(2.0, 0.0, 0.0), DVec3::ZERO);
        let f = viscoelastic_force(&a, &b, 10.0, 0.0, 5.0);
        assert!(f.x < 0.0);
    }

    #[test]
    fn damping_ignores_perpendicular_velocity() {
        let a = particle(DVec3::ZERO, DVec3::ZERO);
        let b = particle(DVec3::new(1.0, 0.0, 0.0), DVec3::new(0.0, 7.0, 0.0));
        let f = viscoelastic_force(&a, &b, 0.0, 50.0, 1.0);
        assert_eq!(f, DVec3::ZERO);
    }

    #[test]
    fn coincident_endpoints_produce_no_force() {
        let a = particle(DVec3::ONE, DVec3::ZERO);
        let f = viscoelastic_force(&a, &a, 100.0, 1.0, 1.0);
        assert_eq!(f, DVec3::ZERO);
    }

    #[test]
    fn ground_pushes_up_in_proportion_to_depth() {
        let shallow = ground_force(DVec3::new(0.0, -0.1, 0.0), DVec3::ZERO, 500.0, 0.1);
        let deep = ground_force(DVec3::new(0.0, -0.2, 0.0), DVec3::ZERO, 500.0, 0.1);
        assert!((shallow - DVec3::new(0.0, 50.0, 0.0)).length() < 1e-9);
        assert!((deep.y - 2.0 * shallow.y).abs() < 1e-9);
    }

    #[test]
    fn ground_ignores_particles_on_or_above_plane() {
        let vel = DVec3::new(1.0, -3.0, 0.0);
        assert_eq!(ground_force(DVec3::ZERO, vel, 500.0, 0.1), DVec3::ZERO);
        assert_eq!(ground_force(DVec3::new(0.0, 2.0, 0.0), vel, 500.0, 0.1), DVec3::ZERO);
    }

    #[test]
    fn ground_damping_opposes_motion() {
        let vel = DVec3::new(2.0, -1.0, 0.0);
        let f = ground_force(DVec3::new(0.0, -0.01, 0.0), vel, 0.0, 3.0);
        assert!((f - vel * -3.0).length() < 1e-12);
    }
}
